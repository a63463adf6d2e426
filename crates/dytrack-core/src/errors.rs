use thiserror::Error;

/// Result type alias using TrackError
pub type Result<T> = std::result::Result<T, TrackError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// This taxonomy provides a stable, structured classification of all errors
/// raised by the tracking engine. Each kind maps to a stable error code that
/// can be used for programmatic error handling and testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Configuration
    InvalidBlueprint,
    InvalidConfig,

    // Object shape
    NotAnObject,
    TypeMismatch,

    // Identity
    MissingIdentity,
    InvalidIdentity,
    DuplicateEntityKey,

    // Integration
    Serialization,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidBlueprint => "ERR_INVALID_BLUEPRINT",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::NotAnObject => "ERR_NOT_AN_OBJECT",
            ExErrorKind::TypeMismatch => "ERR_TYPE_MISMATCH",
            ExErrorKind::MissingIdentity => "ERR_MISSING_IDENTITY",
            ExErrorKind::InvalidIdentity => "ERR_INVALID_IDENTITY",
            ExErrorKind::DuplicateEntityKey => "ERR_DUPLICATE_ENTITY_KEY",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification of a [`TrackError`] plus the operation and
/// location it was raised from, for logging and programmatic handling.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    path: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            path: None,
            message: String::new(),
        }
    }

    /// Set the operation name
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Set the identity of the top-level entity involved
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Set the dotted field path the error was raised at
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the error message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for blueprint construction, capture and comparison
///
/// Paths are dotted field paths from the root of the tracked object, with
/// list entities addressed as `field[key]`. The root itself is `$`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackError {
    /// The blueprint is structurally unusable
    #[error("Invalid blueprint at {path}: {reason}")]
    InvalidBlueprint { path: String, reason: String },

    /// Tracker configuration is unusable
    #[error("Invalid tracker config: {reason}")]
    InvalidConfig { reason: String },

    /// A tracked object (or list entity) is not a JSON object
    #[error("Expected an object at {path}")]
    NotAnObject { path: String },

    /// A field holds a value of the wrong shape for its blueprint node
    #[error("Type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },

    /// An entity has no value under its key field
    #[error("Missing identity field `{key_name}` at {path}")]
    MissingIdentity { path: String, key_name: String },

    /// An entity's key field holds a value that cannot serve as an identity
    #[error("Identity field `{key_name}` at {path} is not a usable key: {value}")]
    InvalidIdentity {
        path: String,
        key_name: String,
        value: String,
    },

    /// Two entities in one tracked list share a key
    #[error("Duplicate entity key {key} in list at {path}")]
    DuplicateEntityKey { path: String, key: String },

    /// Configuration or blueprint JSON could not be decoded
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl TrackError {
    /// The canonical kind for this error
    pub fn kind(&self) -> ExErrorKind {
        match self {
            TrackError::InvalidBlueprint { .. } => ExErrorKind::InvalidBlueprint,
            TrackError::InvalidConfig { .. } => ExErrorKind::InvalidConfig,
            TrackError::NotAnObject { .. } => ExErrorKind::NotAnObject,
            TrackError::TypeMismatch { .. } => ExErrorKind::TypeMismatch,
            TrackError::MissingIdentity { .. } => ExErrorKind::MissingIdentity,
            TrackError::InvalidIdentity { .. } => ExErrorKind::InvalidIdentity,
            TrackError::DuplicateEntityKey { .. } => ExErrorKind::DuplicateEntityKey,
            TrackError::Serialization { .. } => ExErrorKind::Serialization,
        }
    }
}

/// Conversion from TrackError to the structured ExError
impl From<TrackError> for ExError {
    fn from(err: TrackError) -> Self {
        let ex = ExError::new(err.kind()).with_message(err.to_string());
        match err {
            TrackError::InvalidBlueprint { path, .. }
            | TrackError::NotAnObject { path }
            | TrackError::TypeMismatch { path, .. }
            | TrackError::MissingIdentity { path, .. }
            | TrackError::InvalidIdentity { path, .. }
            | TrackError::DuplicateEntityKey { path, .. } => ex.with_path(path),
            TrackError::InvalidConfig { .. } | TrackError::Serialization { .. } => ex,
        }
    }
}

/// Conversion from serde_json::Error to TrackError
impl From<serde_json::Error> for TrackError {
    fn from(err: serde_json::Error) -> Self {
        TrackError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Short name of a JSON value's type, used in mismatch errors
pub(crate) fn type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
