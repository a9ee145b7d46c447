//! Error types for floorplan-anchor

use std::io;
use thiserror::Error;

/// Error raised while decoding a drawing payload
#[derive(Debug, Error)]
pub enum DxfError {
    /// IO error occurred while reading the payload
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Structurally invalid payload
    #[error("Parse error: {0}")]
    Parse(String),

    /// A group code line that is not an integer
    #[error("Invalid DXF code at line {line}: '{text}'")]
    InvalidDxfCode { line: usize, text: String },

    /// Payload ended between a group code and its value
    #[error("Unexpected end of payload after code {code} at line {line}")]
    UnexpectedEof { code: i32, line: usize },

    /// Block definitions reference each other in a cycle
    #[error("Cyclic block reference: {}", .0.join(" -> "))]
    CyclicBlock(Vec<String>),

    /// Full block expansion would visit more entities than allowed
    #[error("Block expansion needs {size} entity visits, limit is {limit}")]
    ExpansionLimit { size: u64, limit: usize },

    /// Text could not be decoded with the declared code page
    #[error("Encoding error: {0}")]
    Encoding(String),
}

impl DxfError {
    /// Whether this error means the payload itself is malformed.
    ///
    /// Every variant except `Io` describes a bad payload; an IO failure is a
    /// problem with the source, not the drawing.
    pub fn is_parse_error(&self) -> bool {
        !matches!(self, DxfError::Io(_))
    }
}

/// Result type alias for decoding operations
pub type Result<T> = std::result::Result<T, DxfError>;

/// Error reported by a placement store
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    /// The store refused the record
    #[error("placement rejected: {0}")]
    Rejected(String),

    /// The store could not be reached
    #[error("placement store unavailable: {0}")]
    Unavailable(String),
}

/// Error raised by placement editing
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PlacementError {
    /// A draft operation was attempted with no session open
    #[error("no placement session is active")]
    NotEditing,

    /// `begin_edit` was called while a session is already open
    #[error("a placement session is already active")]
    AlreadyEditing,

    /// Bounds that violate south < north, west < east
    #[error("invalid bounds: south={south}, west={west}, north={north}, east={east}")]
    InvalidBounds {
        south: f64,
        west: f64,
        north: f64,
        east: f64,
    },

    /// A scale factor that is not finite and positive
    #[error("invalid scale factor: {0}")]
    InvalidFactor(f64),

    /// An intrinsic aspect ratio that is not finite and positive
    #[error("invalid aspect ratio: {0}")]
    InvalidAspect(f64),

    /// Commit failed at the persistence boundary
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<String> for DxfError {
    fn from(s: String) -> Self {
        DxfError::Parse(s)
    }
}

impl From<&str> for DxfError {
    fn from(s: &str) -> Self {
        DxfError::Parse(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DxfError::Parse("no ENTITIES section".to_string());
        assert_eq!(err.to_string(), "Parse error: no ENTITIES section");
    }

    #[test]
    fn test_cycle_display() {
        let err = DxfError::CyclicBlock(vec!["A".into(), "B".into(), "A".into()]);
        assert_eq!(err.to_string(), "Cyclic block reference: A -> B -> A");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let dxf_err: DxfError = io_err.into();
        assert!(matches!(dxf_err, DxfError::Io(_)));
        assert!(!dxf_err.is_parse_error());
    }

    #[test]
    fn test_parse_classification() {
        assert!(DxfError::UnexpectedEof { code: 10, line: 4 }.is_parse_error());
        assert!(DxfError::InvalidDxfCode { line: 1, text: "x".into() }.is_parse_error());
        assert!(DxfError::ExpansionLimit { size: 10, limit: 5 }.is_parse_error());
    }

    #[test]
    fn test_store_error_into_placement_error() {
        let err: PlacementError = StoreError::Unavailable("offline".into()).into();
        assert_eq!(err.to_string(), "placement store unavailable: offline");
    }
}
