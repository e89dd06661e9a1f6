use crate::domain::ports::GraphQLErrorEntry;
use crate::utils::case::camel_path;
use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Extension code the API attaches to lookups that matched nothing.
pub const RECORD_NOT_FOUND: &str = "RECORD_NOT_FOUND";

#[derive(Error, Debug)]
pub enum FirmhouseError {
    #[error("Record not found: {message}")]
    NotFound { message: String },

    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        details: BTreeMap<String, String>,
    },

    #[error("Server error: {message}")]
    Server { message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "cli")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}': {reason} (got '{value}')")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Operation '{operation}' requires a write access token")]
    AccessDenied { operation: String },
}

pub type Result<T> = std::result::Result<T, FirmhouseError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Server,
    /// Raised locally before or after talking to the API.
    Client,
}

impl FirmhouseError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::Server {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Server { .. } | Self::Http(_) => ErrorKind::Server,
            #[cfg(feature = "cli")]
            Self::Csv(_) => ErrorKind::Client,
            Self::Serialization(_)
            | Self::Io(_)
            | Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::AccessDenied { .. } => ErrorKind::Client,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Field-path to message map of a validation failure.
    pub fn details(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Self::Validation { details, .. } => Some(details),
            _ => None,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::NotFound { message } => format!("Nothing found: {}", message),
            Self::Validation { message, details } if details.is_empty() => {
                format!("The request was rejected: {}", message)
            }
            Self::Validation { details, .. } => {
                let fields: Vec<String> = details
                    .iter()
                    .map(|(field, msg)| format!("{} {}", field, msg))
                    .collect();
                format!("The request was rejected: {}", fields.join("; "))
            }
            Self::Server { message } => format!("The Firmhouse API reported an error: {}", message),
            Self::Http(e) => format!("Could not reach the Firmhouse API: {}", e),
            Self::AccessDenied { operation } => {
                format!("'{}' needs a write access token", operation)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "Check the id or token you passed",
            Self::Validation { .. } => "Fix the listed fields and try again",
            Self::Server { .. } => "Try again later or check the API status",
            Self::Http(_) => "Check your network connection and the base URL",
            Self::Serialization(_) => "The API answered with an unexpected shape; upgrade the client",
            Self::Io(_) => "Check file paths and permissions",
            #[cfg(feature = "cli")]
            Self::Csv(_) => "Try --format json for this output",
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Check your configuration file and environment",
            Self::AccessDenied { .. } => "Use a project access token with write access",
        }
    }
}

#[derive(Debug, Deserialize)]
struct Problem {
    #[serde(default)]
    path: Vec<serde_json::Value>,
    #[serde(default)]
    explanation: String,
}

/// Turns the `errors` array of a GraphQL response into one library error.
///
/// A `RECORD_NOT_FOUND` code wins over everything else, then any entry carrying
/// `extensions.problems` becomes a validation error. Anything left is a server
/// error described by the first entry.
pub fn classify_graphql_errors(errors: &[GraphQLErrorEntry]) -> FirmhouseError {
    if let Some(entry) = errors.iter().find(|e| e.code() == Some(RECORD_NOT_FOUND)) {
        return FirmhouseError::not_found(entry.message.clone());
    }

    if let Some((entry, problems)) = errors
        .iter()
        .find_map(|e| e.extension("problems").map(|p| (e, p)))
    {
        let problems: Vec<Problem> = serde_json::from_value(problems.clone()).unwrap_or_default();
        let details = problems
            .into_iter()
            .map(|problem| {
                let segments: Vec<String> = problem
                    .path
                    .iter()
                    .map(|segment| match segment {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect();
                (camel_path(&segments), problem.explanation)
            })
            .collect();
        return FirmhouseError::Validation {
            message: entry.message.clone(),
            details,
        };
    }

    match errors.first() {
        Some(entry) => FirmhouseError::server(entry.message.clone()),
        None => FirmhouseError::server("The API returned an unspecified error"),
    }
}

/// Error entry returned inside a mutation payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PayloadError {
    pub attribute: Option<String>,
    pub message: String,
    #[serde(default)]
    pub path: Option<Vec<String>>,
}

/// Mutation payloads report rejected input as a list of errors instead of
/// top-level GraphQL errors.
pub fn validation_from_payload(errors: Option<&[PayloadError]>) -> Result<()> {
    let errors = match errors {
        Some(errors) if !errors.is_empty() => errors,
        _ => return Ok(()),
    };

    let mut details = BTreeMap::new();
    for error in errors {
        let key = match (&error.path, &error.attribute) {
            (Some(path), _) if !path.is_empty() => camel_path(path),
            (_, Some(attribute)) => camel_path(std::slice::from_ref(attribute)),
            _ => "base".to_string(),
        };
        details
            .entry(key)
            .and_modify(|existing: &mut String| {
                existing.push_str(", ");
                existing.push_str(&error.message);
            })
            .or_insert_with(|| error.message.clone());
    }

    let message = errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    Err(FirmhouseError::Validation { message, details })
}
