use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by document import/export and collection edits
#[derive(Debug, Error)]
pub enum TypesError {
    /// The file could not be read at all
    #[error("could not read '{}': {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    /// The document is not well-formed XML
    #[error("malformed XML at byte {position}: {message}")]
    Xml { message: String, position: u64 },

    /// The document parsed but its root is not `<types>`
    #[error("root element is <{0}>, expected <types>")]
    WrongRoot(String),

    /// Rendering or writing the document failed
    #[error("could not write '{}': {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("type '{0}' already exists")]
    DuplicateName(String),

    #[error("position {index} is out of range (collection has {len} entries)")]
    Index { index: usize, len: usize },

    #[error("{0}")]
    Validation(String),
}

impl TypesError {
    pub fn validation(msg: impl Into<String>) -> Self {
        TypesError::Validation(msg.into())
    }

    /// True for the failures that abort an import: unreadable file,
    /// malformed XML or a wrong root element.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            TypesError::Read { .. } | TypesError::Xml { .. } | TypesError::WrongRoot(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TypesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_grouping() {
        assert!(TypesError::WrongRoot("items".into()).is_parse_error());
        assert!(TypesError::Xml {
            message: "eof".into(),
            position: 3
        }
        .is_parse_error());
        assert!(!TypesError::DuplicateName("AKM".into()).is_parse_error());
        assert!(!TypesError::validation("Type name is required").is_parse_error());
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            TypesError::DuplicateName("AKM".into()).to_string(),
            "type 'AKM' already exists"
        );
        assert_eq!(
            TypesError::WrongRoot("items".into()).to_string(),
            "root element is <items>, expected <types>"
        );
        assert_eq!(
            TypesError::Index { index: 4, len: 2 }.to_string(),
            "position 4 is out of range (collection has 2 entries)"
        );
    }
}
