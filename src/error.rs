use std::io;

/// Rejected engine configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("grid size must be at least 2, got {0}")]
    GridTooSmall(usize),
    #[error("win value must be a power of two >= 4, got {0}")]
    InvalidWinValue(u64),
    #[error("four-tile probability must lie in [0, 1], got {0}")]
    InvalidFourProbability(f64),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Rejected grid contents (building a `Grid` from raw values, or restoring state).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("grid must have at least 2 rows, got {0}")]
    TooSmall(usize),
    #[error("row {row} has {found} cells, expected {expected}")]
    NotSquare { row: usize, expected: usize, found: usize },
    #[error("grid size {found} does not match engine size {expected}")]
    SizeMismatch { expected: usize, found: usize },
    #[error("invalid tile value {value} at ({row}, {col})")]
    InvalidTile { row: usize, col: usize, value: u64 },
}

/// Either of the above, for constructors that validate both.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Grid(#[from] GridError),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown move {0:?} (expected up, down, left or right)")]
pub struct ParseMoveError(pub String);
