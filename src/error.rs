use std::fmt;
use thiserror::Error;

/// Which of the two required fields an entry was missing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    Id,
    Type,
}

impl fmt::Display for KeyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyRole::Id => f.write_str("ID"),
            KeyRole::Type => f.write_str("type"),
        }
    }
}

/// Errors raised while unwrapping an entry graph
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnwrapError {
    /// An object about to be flattened has no usable value for a required key
    #[error("unwrap requires {role} field `{key}` on all objects")]
    MissingRequiredField { key: String, role: KeyRole },
}

impl UnwrapError {
    pub fn missing(key: &str, role: KeyRole) -> Self {
        UnwrapError::MissingRequiredField {
            key: key.to_string(),
            role,
        }
    }

    /// Name of the configured field that was missing
    pub fn key(&self) -> &str {
        match self {
            UnwrapError::MissingRequiredField { key, .. } => key,
        }
    }

    pub fn role(&self) -> KeyRole {
        match self {
            UnwrapError::MissingRequiredField { role, .. } => *role,
        }
    }
}

pub type Result<T> = std::result::Result<T, UnwrapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_names_key() {
        let err = UnwrapError::missing("uuid", KeyRole::Id);
        assert_eq!(
            err.to_string(),
            "unwrap requires ID field `uuid` on all objects"
        );
        assert_eq!(err.key(), "uuid");
        assert_eq!(err.role(), KeyRole::Id);
    }

    #[test]
    fn test_type_role() {
        let err = UnwrapError::missing("kind", KeyRole::Type);
        assert!(err.to_string().contains("type field `kind`"));
    }
}
