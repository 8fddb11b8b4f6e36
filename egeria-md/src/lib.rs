pub mod block;
pub mod extract;
pub mod labels;
pub mod parser;
pub mod rewrite;

use crate::block::CommandBlock;

/// A parsed Dr.Egeria command document.
#[derive(Debug, Clone)]
pub struct CommandDocument {
    /// Top-level command blocks, in document order.
    pub blocks: Vec<CommandBlock>,
    /// The source file ID (for error reporting with codespan-reporting).
    pub source_id: usize,
}

impl CommandDocument {
    /// Blocks that carry a command heading (preamble blocks are skipped).
    pub fn command_blocks(&self) -> impl Iterator<Item = &CommandBlock> {
        self.blocks.iter().filter(|b| b.heading.is_some())
    }
}
