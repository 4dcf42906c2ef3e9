// Parser module for reading noweb's tagged line stream

pub mod line;
mod stream;

pub use line::{is_file_directive, TagLine};
pub use stream::StreamParser;
