//! Input parsing and data source handling.

mod parser;
mod source;

pub use parser::{parse_delimiter, Parser, ParserConfig, DEFAULT_NULL_VALUES};
pub use source::{format_name, SourceMetadata};
