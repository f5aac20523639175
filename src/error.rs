use thiserror::Error;

/// Errors raised by the assembly core and its file adapters
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// A base outside {A, C, G, T}; never replaced by a default base
    #[error("Invalid symbol '{}' at position {position}", char::from(*symbol))]
    InvalidSymbol { symbol: u8, position: usize },
    /// Parameters out of their accepted range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Writing a CSV layout failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, AssemblyError>;
