use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("coordinates are outside the board")]
    OutOfBounds,
    #[error("impossible combination of board size and mine count")]
    InvalidConfiguration,
}

pub type Result<T> = core::result::Result<T, GameError>;
