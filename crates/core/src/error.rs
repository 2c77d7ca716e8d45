use thiserror::Error;

use crate::model::{AssessmentError, SelectionError, StageError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Assessment(#[from] AssessmentError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Stage(#[from] StageError),
}
