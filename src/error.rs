//! Error types for the agenda store.

use crate::types::{AreaId, EventId};
use std::path::PathBuf;
use thiserror::Error;

/// Broad class of a [`StoreError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Empty names, out-of-range date fields, sentinel id misuse.
    Validation,
    /// Unknown area or event ids.
    Referential,
    /// Unreadable, unwritable or malformed documents.
    Io,
}

/// Main error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} name must not be empty")]
    EmptyName { entity: &'static str },

    #[error("cannot {operation} {entity} with the new-entity id 0")]
    SentinelId {
        entity: &'static str,
        operation: &'static str,
    },

    #[error("new {entity} must carry id 0, got {id}")]
    ExpectedSentinel { entity: &'static str, id: u32 },

    #[error("{field} must be in range [{min}, {max}], got {value}")]
    DateTimeRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("year must be in range [0, 9999], got {0}")]
    NegativeYear(i32),

    #[error("{year:04}-{month:02}-{day:02} is not a calendar date")]
    InvalidDate { year: u32, month: u32, day: u32 },

    #[error("Malformed date-time token: {0:?}")]
    MalformedDateTime(String),

    #[error("no Area with id {0}")]
    AreaNotFound(AreaId),

    #[error("no Event with id {event} in Area {area}")]
    EventNotFound { area: AreaId, event: EventId },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Document not found: {0}")]
    NotFound(PathBuf),

    #[error("Document is locked by another session")]
    Locked,
}

impl StoreError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::EmptyName { .. }
            | StoreError::SentinelId { .. }
            | StoreError::ExpectedSentinel { .. }
            | StoreError::DateTimeRange { .. }
            | StoreError::NegativeYear(_)
            | StoreError::InvalidDate { .. }
            | StoreError::MalformedDateTime(_) => ErrorKind::Validation,

            StoreError::AreaNotFound(_) | StoreError::EventNotFound { .. } => {
                ErrorKind::Referential
            }

            StoreError::Io(_)
            | StoreError::Xml(_)
            | StoreError::MalformedDocument(_)
            | StoreError::NotFound(_)
            | StoreError::Locked => ErrorKind::Io,
        }
    }
}

impl From<quick_xml::Error> for StoreError {
    fn from(e: quick_xml::Error) -> Self {
        StoreError::Xml(e.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for StoreError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        StoreError::Xml(e.to_string())
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            StoreError::EmptyName { entity: "Area" }.kind(),
            ErrorKind::Validation
        );
        assert_eq!(StoreError::AreaNotFound(AreaId(4)).kind(), ErrorKind::Referential);
        assert_eq!(StoreError::Locked.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_messages_name_the_invariant() {
        assert_eq!(StoreError::AreaNotFound(AreaId(4)).to_string(), "no Area with id 4");
        assert_eq!(
            StoreError::EmptyName { entity: "Event" }.to_string(),
            "Event name must not be empty"
        );
    }
}
