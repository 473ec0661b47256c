use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid identifier: {0:?}")]
    InvalidId(String),
    #[error("invalid date {value:?}, expected YYYY-MM-DD")]
    InvalidDate { value: String },
    #[error("unknown custom field input type: {0}")]
    UnknownInputType(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
