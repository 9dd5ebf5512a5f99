use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenError {
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    #[error("Constraint violation: requested {requested} distinct items from a pool of {available}")]
    ConstraintViolation { requested: usize, available: usize },

    #[error("Invalid generator config: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type GenResult<T> = Result<T, GenError>;
