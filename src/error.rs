use miette::Diagnostic;
use thiserror::Error;

/// Errors surfaced by the gateway core.
///
/// Every variant except [`GatewayError::InternalStateViolation`] describes a
/// caller-facing failure that can be reported back over the API. An internal
/// state violation means the payment store contradicted itself and must not
/// be treated as a user error.
#[derive(Error, Diagnostic, Debug)]
pub enum GatewayError {
    #[error("Consent not found: {0}")]
    #[diagnostic(code(gateway::consent::not_found))]
    NotFound(String),

    #[error("Forbidden: {0}")]
    #[diagnostic(code(gateway::consent::forbidden))]
    Forbidden(String),

    #[error("Unauthorized: {0}")]
    #[diagnostic(code(gateway::consent::unauthorized))]
    Unauthorized(String),

    #[error("Consent permissions invalid, required {acceptable}")]
    #[diagnostic(code(gateway::consent::permissions_invalid))]
    PermissionsInvalid { acceptable: String },

    #[error("Idempotency conflict for consent {consent_id}, mismatching fields: {}", .fields.join(", "))]
    #[diagnostic(
        code(gateway::payment::idempotency_conflict),
        help("resubmit with the original payload or use a new consent")
    )]
    IdempotencyConflict {
        consent_id: String,
        fields: Vec<String>,
    },

    #[error("Frequency '{input}' doesn't match regex '{pattern}'")]
    #[diagnostic(code(gateway::frequency::invalid_format))]
    InvalidFrequencyFormat { input: String, pattern: String },

    #[error("Frequency type value not found: {0}")]
    #[diagnostic(code(gateway::frequency::unknown_type))]
    UnknownFrequencyType(String),

    #[error("Frequency '{input}' produces day {day} which does not exist in {year}-{month:02}")]
    #[diagnostic(code(gateway::frequency::date_out_of_range))]
    FrequencyDateOutOfRange {
        input: String,
        year: i32,
        month: u32,
        day: u32,
    },

    #[error("Internal state violation: {0}")]
    #[diagnostic(code(gateway::internal_state_violation))]
    InternalStateViolation(String),

    #[error("Validation error: {0}")]
    #[diagnostic(code(gateway::validation))]
    ValidationError(String),

    #[error("Storage error: {0}")]
    #[diagnostic(code(gateway::storage))]
    StorageError(Box<dyn std::error::Error + Send + Sync>),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(gateway::serialization))]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    #[diagnostic(code(gateway::csv))]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    #[diagnostic(code(gateway::io))]
    IoError(#[from] std::io::Error),
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for GatewayError {
    fn from(err: rocksdb::Error) -> Self {
        GatewayError::StorageError(Box::new(err))
    }
}

impl GatewayError {
    /// Store inconsistencies are the only unrecoverable kind.
    pub fn is_fatal(&self) -> bool {
        matches!(self, GatewayError::InternalStateViolation(_))
    }

    /// HTTP status an API layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            GatewayError::NotFound(_) => 404,
            GatewayError::Forbidden(_) => 403,
            GatewayError::Unauthorized(_) => 401,
            GatewayError::PermissionsInvalid { .. } => 403,
            GatewayError::IdempotencyConflict { .. } => 409,
            GatewayError::InvalidFrequencyFormat { .. }
            | GatewayError::UnknownFrequencyType(_)
            | GatewayError::FrequencyDateOutOfRange { .. }
            | GatewayError::ValidationError(_)
            | GatewayError::CsvError(_) => 400,
            GatewayError::InternalStateViolation(_)
            | GatewayError::StorageError(_)
            | GatewayError::SerializationError(_)
            | GatewayError::IoError(_) => 500,
        }
    }

    /// Open Banking error code reported in the `Errors[].ErrorCode` field.
    pub fn ob_error_code(&self) -> &'static str {
        match self {
            GatewayError::NotFound(_) => "UK.OBIE.Resource.NotFound",
            GatewayError::Forbidden(_) => "UK.OBIE.Resource.ConsentMismatch",
            GatewayError::Unauthorized(_) => "UK.OBIE.Resource.InvalidConsentStatus",
            GatewayError::PermissionsInvalid { .. } => "UK.OBIE.Resource.InvalidConsentPermissions",
            GatewayError::IdempotencyConflict { .. } => "UK.OBIE.Resource.ConsentMismatch",
            GatewayError::InvalidFrequencyFormat { .. }
            | GatewayError::UnknownFrequencyType(_)
            | GatewayError::FrequencyDateOutOfRange { .. } => "UK.OBIE.Field.InvalidDate",
            GatewayError::ValidationError(_) | GatewayError::CsvError(_) => "UK.OBIE.Field.Invalid",
            GatewayError::InternalStateViolation(_)
            | GatewayError::StorageError(_)
            | GatewayError::SerializationError(_)
            | GatewayError::IoError(_) => "UK.OBIE.UnexpectedError",
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
