pub mod client;
pub mod parser;

pub use client::WebsterClient;
pub use parser::{DefiningElement, EntryParser, ParseError, ParsedResponse};
