//! DXF group code value types
//!
//! A group code alone determines how its value is stored: as a text line in
//! ASCII DXF, or as a fixed-width little-endian value in binary DXF.

/// Storage type of the value that follows a group code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupCodeValueType {
    /// Text value
    String,
    /// 64-bit float (coordinates, distances, angles)
    Double,
    /// 16-bit integer
    Int16,
    /// 32-bit integer
    Int32,
    /// 64-bit integer
    Int64,
    /// Hexadecimal object handle, stored as text
    Handle,
    /// Single byte boolean
    Bool,
    /// Length-prefixed binary data (hex encoded in ASCII DXF)
    Chunk,
    /// Group code outside every documented range
    None,
}

impl GroupCodeValueType {
    /// Resolve the value type for a group code
    pub fn from_code(code: i32) -> Self {
        match code {
            0..=4 | 6..=9 => Self::String,
            5 => Self::Handle,
            10..=59 => Self::Double,
            60..=79 => Self::Int16,
            90..=99 => Self::Int32,
            100..=102 => Self::String,
            105 => Self::Handle,
            110..=149 => Self::Double,
            160..=169 => Self::Int64,
            170..=179 => Self::Int16,
            210..=239 => Self::Double,
            270..=289 => Self::Int16,
            290..=299 => Self::Bool,
            300..=309 => Self::String,
            310..=319 => Self::Chunk,
            320..=369 => Self::Handle,
            370..=389 => Self::Int16,
            390..=399 => Self::Handle,
            400..=409 => Self::Int16,
            410..=419 => Self::String,
            420..=429 => Self::Int32,
            430..=439 => Self::String,
            440..=459 => Self::Int32,
            460..=469 => Self::Double,
            470..=479 => Self::String,
            480..=481 => Self::Handle,
            999 => Self::String,
            1004 => Self::Chunk,
            1000..=1009 => Self::String,
            1010..=1059 => Self::Double,
            1060..=1070 => Self::Int16,
            1071 => Self::Int32,
            _ => Self::None,
        }
    }

    /// Whether the value is an integer of any width
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Int16 | Self::Int32 | Self::Int64)
    }

    /// Axis (0 = X, 1 = Y, 2 = Z) of a point coordinate code
    pub fn coordinate_axis(code: i32) -> Option<usize> {
        match code {
            10..=39 => Some(((code - 10) / 10) as usize),
            _ => None,
        }
    }

    /// Which point of an entity a coordinate belongs to (10/20/30 → 0,
    /// 11/21/31 → 1, ...)
    pub fn coordinate_group(code: i32) -> Option<usize> {
        match code {
            10..=39 => Some((code % 10) as usize),
            _ => None,
        }
    }
}
