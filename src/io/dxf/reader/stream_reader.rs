//! DXF stream reader trait and common types

use crate::error::Result;
use crate::io::dxf::GroupCodeValueType;
use crate::types::Vector2;
use encoding_rs::Encoding;

/// A DXF code/value pair
#[derive(Debug, Clone, PartialEq)]
pub struct DxfCodePair {
    /// The DXF group code
    pub code: i32,

    /// The value type implied by the code
    pub value_type: GroupCodeValueType,

    /// String representation of the value
    pub value_string: String,

    /// Integer value (if applicable)
    pub value_int: Option<i64>,

    /// Floating-point value (if applicable)
    pub value_double: Option<f64>,

    /// Boolean value (if applicable)
    pub value_bool: Option<bool>,
}

impl DxfCodePair {
    /// Create a new code/value pair, parsing the value by group code type
    pub fn new(code: i32, value_string: String) -> Self {
        let value_type = GroupCodeValueType::from_code(code);
        let trimmed = value_string.trim();

        let value_int = if value_type.is_integer() {
            trimmed.parse::<i64>().ok()
        } else {
            None
        };

        let value_double = match value_type {
            GroupCodeValueType::Double => trimmed.parse::<f64>().ok(),
            _ => None,
        };

        let value_bool = match value_type {
            GroupCodeValueType::Bool => trimmed.parse::<i32>().ok().map(|v| v != 0),
            _ => None,
        };

        Self {
            code,
            value_type,
            value_string,
            value_int,
            value_double,
            value_bool,
        }
    }

    /// Whether this pair is `0 / <name>`
    pub fn is_marker(&self, name: &str) -> bool {
        self.code == 0 && self.value_string == name
    }

    /// Get value as integer
    pub fn as_int(&self) -> Option<i64> {
        self.value_int
    }

    /// Get value as i16
    pub fn as_i16(&self) -> Option<i16> {
        self.value_int.and_then(|v| i16::try_from(v).ok())
    }

    /// Get value as double
    pub fn as_double(&self) -> Option<f64> {
        self.value_double
    }

    /// Get value as boolean
    pub fn as_bool(&self) -> Option<bool> {
        self.value_bool
    }
}

/// Trait for reading DXF code/value pairs from a stream
pub trait DxfStreamReader {
    /// Read the next code/value pair
    fn read_pair(&mut self) -> Result<Option<DxfCodePair>>;

    /// Peek at the next code without consuming it
    fn peek_code(&mut self) -> Result<Option<i32>>;

    /// Push a pair back to be read again on next read_pair call
    fn push_back(&mut self, pair: DxfCodePair);

    /// Reset the reader to the beginning
    fn reset(&mut self) -> Result<()>;

    /// Set the fallback encoding for strings that are not valid UTF-8
    fn set_encoding(&mut self, encoding: &'static Encoding);
}

/// Decode raw string bytes: UTF-8 first, then the declared code page, then
/// Latin-1.
pub(crate) fn decode_string(bytes: &[u8], encoding: Option<&'static Encoding>) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => match encoding {
            Some(enc) => enc.decode_without_bom_handling(bytes).0.into_owned(),
            // Latin-1 is a 1:1 mapping of bytes 0-255 to Unicode code points
            None => bytes.iter().map(|&b| b as char).collect(),
        },
    }
}

/// Helper for reading 2D points from consecutive code pairs
///
/// Z coordinates are accepted and dropped; floor plans are planar.
pub struct PointReader {
    x: Option<f64>,
    y: Option<f64>,
    group: Option<usize>,
}

impl PointReader {
    /// Create a new point reader
    pub fn new() -> Self {
        Self {
            x: None,
            y: None,
            group: None,
        }
    }

    /// Add a coordinate value; returns false when the pair is not a
    /// coordinate of this point
    pub fn add_coordinate(&mut self, pair: &DxfCodePair) -> bool {
        let (Some(axis), Some(group)) = (
            GroupCodeValueType::coordinate_axis(pair.code),
            GroupCodeValueType::coordinate_group(pair.code),
        ) else {
            return false;
        };

        if self.group.is_some() && self.group != Some(group) {
            return false;
        }
        self.group = Some(group);

        match (axis, pair.as_double()) {
            (0, Some(v)) => self.x = Some(v),
            (1, Some(v)) => self.y = Some(v),
            (2, Some(_)) => {}
            _ => return false,
        }
        true
    }

    /// Get the point if both X and Y were seen
    pub fn get_point(&self) -> Option<Vector2> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Some(Vector2::new(x, y)),
            _ => None,
        }
    }
}

impl Default for PointReader {
    fn default() -> Self {
        Self::new()
    }
}
