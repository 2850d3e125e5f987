use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    InvalidUrl { input: String },
    ZeroLimit { field: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidUrl { input } => write!(f, "invalid API url: {input}"),
            Self::ZeroLimit { field } => write!(f, "{field} must be greater than zero"),
        }
    }
}

impl std::error::Error for ValidationError {}
