use std::fmt;

/// Server error codes the bootstrap cares about.
pub const NAMESPACE_EXISTS: i32 = 48;
pub const INDEX_OPTIONS_CONFLICT: i32 = 85;
pub const INDEX_KEY_SPECS_CONFLICT: i32 = 86;

#[derive(Debug)]
pub enum BootstrapError {
    Config(String),
    Connection(String),
    Database { operation: String, message: String },
    IndexConflict { collection: String, index: String, message: String },
    LayoutMismatch { collection: String, message: String },
}

impl BootstrapError {
    pub fn database(operation: impl Into<String>, message: impl fmt::Display) -> Self {
        BootstrapError::Database {
            operation: operation.into(),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootstrapError::Config(msg) => write!(f, "Configuration error: {}", msg),
            BootstrapError::Connection(msg) => write!(f, "Connection error: {}", msg),
            BootstrapError::Database { operation, message } => {
                write!(f, "Database error during {}: {}", operation, message)
            }
            BootstrapError::IndexConflict { collection, index, message } => write!(
                f,
                "Conflicting index {} on {}: {}",
                index, collection, message
            ),
            BootstrapError::LayoutMismatch { collection, message } => {
                write!(f, "Unexpected layout for {}: {}", collection, message)
            }
        }
    }
}

impl std::error::Error for BootstrapError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_operation() {
        let err = BootstrapError::database("createIndex(expenses)", "not authorized");
        assert_eq!(
            err.to_string(),
            "Database error during createIndex(expenses): not authorized"
        );
    }

    #[test]
    fn test_display_conflict() {
        let err = BootstrapError::IndexConflict {
            collection: "users".to_string(),
            index: "email_1".to_string(),
            message: "existing index has different options".to_string(),
        };
        assert!(err.to_string().starts_with("Conflicting index email_1 on users"));
    }
}
