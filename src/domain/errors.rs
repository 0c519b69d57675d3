use thiserror::Error;

/// Local form validation failures. These never reach the backend.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("invalid mobile number")]
    InvalidMobile,
    #[error("password must be at least 6 characters long")]
    PasswordTooShort,
    #[error("passwords don't match")]
    PasswordMismatch,
    #[error("required fields are missing")]
    MissingRequiredFields,
    #[error("land size {0} is out of range")]
    LandSizeOutOfRange(f64),
}

impl ValidationError {
    /// Translation key for the user-facing message.
    pub fn message_key(&self) -> &'static str {
        match self {
            ValidationError::InvalidMobile => "invalid_mobile",
            ValidationError::PasswordTooShort => "invalid_password",
            ValidationError::PasswordMismatch => "passwords_dont_match",
            ValidationError::MissingRequiredFields => "fill_required",
            ValidationError::LandSizeOutOfRange(_) => "land_size_range",
        }
    }
}

/// Failures reported by a credential or record backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record {0} not found")]
    NotFound(String),
    #[error("record {0} already exists")]
    AlreadyExists(String),
    #[error("identity provider rejected the request: {0}")]
    Identity(String),
    #[error("backend answered HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected backend response: {0}")]
    Decode(String),
    #[error("serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
