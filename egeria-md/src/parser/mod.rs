pub mod error;
mod structural;

pub use error::ParseError;

use crate::CommandDocument;

/// Parser entry point.
pub struct Parser {
    source: String,
    file_id: usize,
}

impl Parser {
    pub fn new(source: String, file_id: usize) -> Self {
        Parser { source, file_id }
    }

    /// Parse the source markdown into a complete command document.
    pub fn parse(&self) -> Result<CommandDocument, Vec<ParseError>> {
        let blocks = structural::parse_blocks(&self.source, self.file_id)?;
        Ok(CommandDocument {
            blocks,
            source_id: self.file_id,
        })
    }
}
