pub mod cache;
pub mod client;
pub mod directive;
pub mod formats;
pub mod handlers;
pub mod http;
pub mod report;
pub mod resolve;

pub use cache::ElementCache;
pub use client::{ClientError, EgeriaClient};
pub use directive::Directive;
pub use formats::OutputFormat;
pub use handlers::{CommandOutcome, process_command_block, process_document};
pub use http::HttpEgeriaClient;
pub use report::{Note, NoteLevel, Reporter};
