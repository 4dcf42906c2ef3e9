//! noweb-figures - typeset noweb code chunks as LaTeX figures
//!
//! Reads noweb's tagged pipeline format, infers the language of each code
//! chunk from file-extension roots and `@use` references, and rewrites
//! tagged chunks as captioned, labeled listing figures.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod parser;

// Re-export main types
pub use analysis::{ChunkId, ChunkName, ChunkTable, Language, Pipeline, Report};
pub use config::Config;
pub use error::{Error, Result};
