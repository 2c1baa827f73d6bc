use minegrid_core::GameError;
use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("no session with the requested id")]
    SessionNotFound,
    #[error(transparent)]
    Game(#[from] GameError),
}

pub type Result<T> = core::result::Result<T, ServiceError>;
