use thiserror::Error;

#[derive(Error, Debug)]
pub enum ZoneError {
    #[error("Placement zone not found: {identifier}")]
    NotFound { identifier: String },

    #[error(
        "'{identifier}' matches more than one placement zone ({}), provide the full ID to target a specific placement zone",
        .candidates.join(", ")
    )]
    AmbiguousIdentifier {
        identifier: String,
        candidates: Vec<String>,
    },

    #[error("Tag resolution failed for '{tag}': {message}")]
    TagResolutionFailure { tag: String, message: String },

    #[error("Transport failure: {0}")]
    TransportFailure(#[from] reqwest::Error),

    #[error("{method} {path} failed with status {status}: {body}")]
    RemoteStatus {
        method: String,
        path: String,
        status: u16,
        body: String,
    },

    #[error("Malformed stored metric {key}={value}: {reason}")]
    MalformedStoredMetric {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Lookup,
    Remote,
    Data,
    Configuration,
    Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ZoneError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ZoneError::NotFound { .. } | ZoneError::AmbiguousIdentifier { .. } => {
                ErrorCategory::Lookup
            }
            ZoneError::TagResolutionFailure { .. }
            | ZoneError::TransportFailure(_)
            | ZoneError::RemoteStatus { .. } => ErrorCategory::Remote,
            ZoneError::MalformedStoredMetric { .. }
            | ZoneError::SerializationError(_)
            | ZoneError::IoError(_) => ErrorCategory::Data,
            ZoneError::ConfigError { .. }
            | ZoneError::ConfigValidationError { .. }
            | ZoneError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ZoneError::ValidationError { .. } => ErrorCategory::Input,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Lookup | ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Remote => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Data => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ZoneError::NotFound { .. } => {
                "Run `pz ls` to see the available placement zones and their IDs".to_string()
            }
            ZoneError::AmbiguousIdentifier { candidates, .. } => format!(
                "Use one of the placement zone IDs instead of the name: {}",
                candidates.join(", ")
            ),
            ZoneError::TagResolutionFailure { .. } => {
                "Check that tags are written as key:value and that the tag service is reachable"
                    .to_string()
            }
            ZoneError::TransportFailure(_) => {
                "Check the server URL and that the server is reachable".to_string()
            }
            ZoneError::RemoteStatus { status, .. } if *status == 401 || *status == 403 => {
                "Provide a valid auth token with --token or in the config file".to_string()
            }
            ZoneError::RemoteStatus { .. } => {
                "Inspect the server response above and retry the command".to_string()
            }
            ZoneError::MalformedStoredMetric { .. } => {
                "The stored zone document is corrupted, contact the server administrator"
                    .to_string()
            }
            ZoneError::SerializationError(_) => {
                "The server returned an unexpected document shape".to_string()
            }
            ZoneError::IoError(_) => "Check file paths and permissions".to_string(),
            ZoneError::ConfigError { .. }
            | ZoneError::ConfigValidationError { .. }
            | ZoneError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command-line flags".to_string()
            }
            ZoneError::ValidationError { .. } => "Check the command arguments".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ZoneError::TransportFailure(e) if e.is_timeout() => {
                "The server did not answer in time".to_string()
            }
            ZoneError::TransportFailure(e) if e.is_connect() => {
                "Could not connect to the server".to_string()
            }
            ZoneError::RemoteStatus { status, body, .. } => {
                format!("The server rejected the request ({}): {}", status, body)
            }
            other => other.to_string(),
        }
    }

    pub fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            ZoneError::TransportFailure(_) | ZoneError::RemoteStatus { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ZoneError>;
