use crate::analysis::{ChunkId, ChunkName, Language};
use thiserror::Error;

/// Errors raised while filtering a noweb stream
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    ConfigValidation(String),

    #[error("Malformed input at line {line}: {message}")]
    Structural { line: usize, message: String },

    #[error("Malformed input at line {line}: end marker for chunk {found} while chunk {expected} is open")]
    MismatchedEnd {
        line: usize,
        expected: ChunkId,
        found: ChunkId,
    },

    #[error("Language conflict on chunk {chunk} <<{name}>>: already {existing}, propagated {incoming}")]
    LanguageConflict {
        name: ChunkName,
        chunk: ChunkId,
        existing: Language,
        incoming: Language,
    },

    #[error("Chunk {0} has no @defn line")]
    MissingDefinition(ChunkId),
}

/// Result type alias for filter operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a config validation error
    pub fn config_validation(msg: impl Into<String>) -> Self {
        Error::ConfigValidation(msg.into())
    }

    /// Create a structural error for a 1-based input line
    pub fn structural(line: usize, message: impl Into<String>) -> Self {
        Error::Structural {
            line,
            message: message.into(),
        }
    }
}
