//! I/O: DXF decoding and decode memoization

pub mod cache;
pub mod dxf;

pub use cache::{DecodeCache, PayloadKey};
pub use dxf::{DxfReader, DxfReaderConfiguration};
