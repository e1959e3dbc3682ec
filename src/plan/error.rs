use std::fmt;

/// Error types for plan acquisition and parsing
#[derive(Debug)]
pub enum PlanError {
    /// The plan source string could not be understood
    InvalidSource(String),

    /// Reading stdin failed
    Io(std::io::Error),

    /// Reading a plan file failed
    Read { path: String, message: String },

    /// Fetching a plan over HTTP failed
    Fetch { url: String, message: String },

    /// The document is not valid JSON or does not have the plan shape
    Parse(String),

    /// The document parsed as JSON but the top level is not an object
    NotAnObject,

    /// An action token given as a filter is not one of the known actions
    UnknownAction(String),
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::InvalidSource(source) => {
                write!(f, "Invalid plan source: {}", source)
            }
            PlanError::Io(err) => {
                write!(f, "I/O error: {}", err)
            }
            PlanError::Read { path, message } => {
                write!(f, "Failed to read plan file '{}': {}", path, message)
            }
            PlanError::Fetch { url, message } => {
                write!(f, "Failed to fetch plan from '{}': {}", url, message)
            }
            PlanError::Parse(msg) => {
                write!(f, "Failed to parse plan: {}", msg)
            }
            PlanError::NotAnObject => {
                write!(f, "Failed to parse plan: top-level value must be a JSON object")
            }
            PlanError::UnknownAction(token) => {
                write!(
                    f,
                    "Unknown action '{}' (expected one of: no-op, create, read, update, delete)",
                    token
                )
            }
        }
    }
}

impl std::error::Error for PlanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlanError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PlanError {
    fn from(err: std::io::Error) -> Self {
        PlanError::Io(err)
    }
}

impl From<serde_json::Error> for PlanError {
    fn from(err: serde_json::Error) -> Self {
        PlanError::Parse(err.to_string())
    }
}

/// Result type for plan operations
pub type PlanResult<T> = Result<T, PlanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = PlanError::Fetch {
            url: "https://example.com/plan.json".to_string(),
            message: "HTTP 404".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to fetch plan from 'https://example.com/plan.json': HTTP 404"
        );

        let err = PlanError::UnknownAction("explode".to_string());
        assert!(err.to_string().contains("'explode'"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: PlanError = json_err.into();
        assert!(matches!(err, PlanError::Parse(_)));
    }
}
