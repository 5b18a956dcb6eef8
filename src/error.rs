//! Error types for apivet

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for apivet operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Suite(#[from] SuiteError),

    #[error(transparent)]
    Bench(#[from] BenchError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Interactive prompt error: {0}")]
    Prompt(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Deadline exceeded while {0}")]
    DeadlineExceeded(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Prompt(err.to_string())
    }
}

/// Configuration store errors. All of these abort before any network activity.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Environment '{env}' is missing required values: {}", .fields.join(", "))]
    Incomplete { env: String, fields: Vec<&'static str> },

    #[error("Invalid environment '{0}'. Supported environments: dev")]
    InvalidEnvironment(String),

    #[error("Environment '{0}' has no record in the configuration file")]
    UnknownEnvironment(String),

    #[error("Failed to save configuration: {0}")]
    Save(String),
}

/// Errors talking to the remote API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to API".to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Credential lifecycle errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Credential refresh failed: {0}")]
    RefreshFailed(String),
}

/// Functional suite errors
#[derive(Debug, Error)]
pub enum SuiteError {
    #[error("Collection runner failed to start: {0}")]
    RunnerUnavailable(String),

    #[error("Collection runner output could not be read: {0}")]
    Summary(String),

    #[error("Runner environment file {} has no value for '{key}'", .path.display())]
    EnvFileIncomplete { path: PathBuf, key: String },

    #[error("Functional suites failed: {0}")]
    SuitesFailed(String),
}

/// Benchmark errors
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("Iteration count must be at least 1")]
    InvalidIterations,

    #[error("Benchmark request list is empty")]
    EmptySpec,

    #[error("Request name '{0}' appears more than once")]
    DuplicateRequest(String),

    #[error("Request name '{0}' is reserved in result files")]
    ReservedRequestName(String),

    #[error("Runs cannot be compared: request lists differ ({base} vs {target})")]
    MismatchedRequests { base: String, target: String },
}

/// Run registry errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("A tag is not provided. Pass tag=<name>.")]
    MissingTag,

    #[error("Invalid tag '{0}': tags must be a single path component")]
    InvalidTag(String),

    #[error("Tag '{0}' already exists. Please provide a new tag.")]
    DuplicateTag(String),

    #[error("No stored run for tag '{0}'")]
    UnknownTag(String),

    #[error("Stored run '{tag}' is unreadable: {reason}")]
    CorruptRun { tag: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_incomplete_lists_fields() {
        let err = ConfigError::Incomplete {
            env: "dev".to_string(),
            fields: vec!["SPI_URL", "AUTH"],
        };
        let msg = err.to_string();
        assert!(msg.contains("dev"));
        assert!(msg.contains("SPI_URL, AUTH"));
    }

    #[test]
    fn test_config_error_invalid_environment() {
        let err = ConfigError::InvalidEnvironment("prod".to_string());
        assert!(err.to_string().contains("prod"));
        assert!(err.to_string().contains("dev"));
    }

    #[test]
    fn test_api_error_status() {
        let err = ApiError::Status {
            status: 502,
            url: "https://api.example/x".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("502"));
        assert!(msg.contains("api.example"));
    }

    #[test]
    fn test_registry_error_duplicate_tag() {
        let err = RegistryError::DuplicateTag("baseline".to_string());
        assert!(err.to_string().contains("baseline"));
        assert!(err.to_string().contains("new tag"));
    }

    #[test]
    fn test_bench_error_mismatch() {
        let err = BenchError::MismatchedRequests {
            base: "profile".to_string(),
            target: "orders".to_string(),
        };
        assert!(err.to_string().contains("profile vs orders"));
    }

    #[test]
    fn test_error_from_config_error() {
        let err: Error = ConfigError::NotFound(PathBuf::from("x.json")).into();
        match err {
            Error::Config(ConfigError::NotFound(path)) => assert_eq!(path, PathBuf::from("x.json")),
            _ => panic!("Expected Error::Config(ConfigError::NotFound)"),
        }
    }

    #[test]
    fn test_error_from_auth_error() {
        let err: Error = AuthError::RefreshFailed("timeout".to_string()).into();
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn test_config_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
