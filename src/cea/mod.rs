pub mod fields;
pub mod parser;

pub use parser::{extract_case, parse, parse_file, parse_file_with, parse_with, split_blocks};
