use thiserror::Error;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the library
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A filter token that no form of the field's grammar accepts.
    #[error("Invalid {field} format: '{token}'")]
    Format {
        field: &'static str,
        token: String,
        hint: &'static str,
    },

    /// The color/silent flags only accept 0 or 1.
    #[error("The {field} flag only takes {allowed}. Please try again.")]
    InvalidFlag {
        field: &'static str,
        allowed: &'static str,
    },

    #[error("Either a positive integer or \"all\" must be provided for the count flag. Please try again.")]
    InvalidCount(String),

    #[error("Count ({requested}) cannot be larger than available movies ({available}). Please try again.")]
    CountTooLarge { requested: usize, available: usize },

    #[error("No movie found with ID {0}.")]
    NotFound(String),

    #[error("That movie has already been removed from the pool.")]
    AlreadyRemoved(String),

    #[error("Catalog is missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("Duplicate movie ID in catalog: {0}")]
    DuplicateId(String),
}

impl Error {
    /// Usage example printed after a malformed filter, if the error has one.
    pub fn usage_hint(&self) -> Option<&'static str> {
        match self {
            Error::Format { hint, .. } => Some(hint),
            _ => None,
        }
    }

    /// Whether the error came from malformed user input rather than the environment.
    pub fn is_user_input(&self) -> bool {
        matches!(
            self,
            Error::Format { .. }
                | Error::InvalidFlag { .. }
                | Error::InvalidCount(_)
                | Error::CountTooLarge { .. }
        )
    }
}
