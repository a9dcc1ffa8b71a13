use thiserror::Error;

#[derive(Error, Debug)]
pub enum LinkError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid coordinates '{value}'")]
    InvalidCoordinatesError { value: String },
}

impl LinkError {
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            LinkError::IoError(_) => "Check that the file exists and is readable",
            LinkError::TomlParseError(_) | LinkError::ConfigValidationError { .. } => {
                "Fix the TOML syntax; every key is optional and falls back to a default"
            }
            LinkError::InvalidConfigValueError { .. } => {
                "Adjust the reported value so that min <= new <= max and ratios are positive"
            }
            LinkError::InvalidCoordinatesError { .. } => {
                "Anchors are written as 'x,y,z' with integer components"
            }
            LinkError::TomlSerializeError(_) | LinkError::SerializationError(_) => {
                "This is a bug; please report it with the failing input"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, LinkError>;
