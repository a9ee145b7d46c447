//! DXF (Drawing Exchange Format) reading

mod code_page;
mod group_code;
mod reader;

pub use code_page::encoding_from_code_page;
pub use group_code::GroupCodeValueType;
pub use reader::{
    DxfBinaryReader, DxfCodePair, DxfReader, DxfReaderConfiguration, DxfStreamReader, DxfTextReader,
    BINARY_SENTINEL,
};

use crate::document::DrawingDocument;
use crate::error::Result;

/// Decode a DXF payload (ASCII or binary) with the default strict configuration
pub fn decode(bytes: &[u8]) -> Result<DrawingDocument> {
    DxfReader::from_bytes(bytes)?.read()
}

/// Decode a DXF payload with an explicit reader configuration
pub fn decode_with(bytes: &[u8], config: DxfReaderConfiguration) -> Result<DrawingDocument> {
    DxfReader::from_bytes(bytes)?.with_configuration(config).read()
}
