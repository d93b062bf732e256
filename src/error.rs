use thiserror::Error;

use crate::model::{CandidateId, ValidationError};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Please select a candidate")]
    NoSelection,
    #[error("Candidate {0} not found")]
    NotFound(CandidateId),
    #[error("`{action}` is not available on the {screen} screen")]
    WrongScreen {
        action: &'static str,
        screen: &'static str,
    },
    #[error("Invalid configuration: {0}")]
    Config(#[from] Box<figment::Error>),
    #[error("The candidate list is empty")]
    EmptyRegistry,
    #[error("Candidate id {0} is listed more than once")]
    DuplicateCandidate(CandidateId),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}
