//! DXF binary reader
//!
//! Binary DXF starts with a 22-byte sentinel followed by pairs of a group
//! code and a value whose width depends on the code. R13 and later write
//! little-endian `u16` codes; older files write one byte, with 255 escaping
//! to a `u16`. The width is detected from the first pair, which is always
//! code 0 followed by `SECTION`.

use super::stream_reader::{decode_string, DxfCodePair, DxfStreamReader};
use crate::error::{DxfError, Result};
use crate::io::dxf::GroupCodeValueType;
use byteorder::{LittleEndian, ReadBytesExt};
use encoding_rs::Encoding;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};

/// Sentinel at the start of every binary DXF file
pub const BINARY_SENTINEL: &[u8; 22] = b"AutoCAD Binary DXF\r\n\x1a\0";

/// DXF binary file reader
pub struct DxfBinaryReader<R: Read + Seek> {
    reader: BufReader<R>,
    /// Index of the next pair, reported in place of a line number
    pair_index: usize,
    peeked_pair: Option<DxfCodePair>,
    encoding: Option<&'static Encoding>,
    /// Two-byte group codes (R13+)
    wide_codes: bool,
}

impl<R: Read + Seek> DxfBinaryReader<R> {
    /// Create a binary reader, consuming and checking the sentinel
    pub fn new(mut reader: BufReader<R>) -> Result<Self> {
        Self::skip_sentinel(&mut reader)?;
        let wide_codes = Self::detect_wide_codes(&mut reader)?;
        Ok(Self {
            reader,
            pair_index: 0,
            peeked_pair: None,
            encoding: None,
            wide_codes,
        })
    }

    /// A one-byte code 0 is followed directly by the `S` of `SECTION`
    fn detect_wide_codes(reader: &mut BufReader<R>) -> Result<bool> {
        let buf = reader.fill_buf()?;
        Ok(!(buf.len() >= 2 && buf[0] == 0 && buf[1] != 0))
    }

    fn skip_sentinel(reader: &mut BufReader<R>) -> Result<()> {
        let mut sentinel = [0u8; 22];
        reader.read_exact(&mut sentinel).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => DxfError::Parse("truncated binary DXF sentinel".into()),
            _ => DxfError::Io(e),
        })?;
        if &sentinel != BINARY_SENTINEL {
            return Err(DxfError::Parse("missing binary DXF sentinel".into()));
        }
        Ok(())
    }

    fn eof_error(&self, code: i32) -> impl Fn(io::Error) -> DxfError {
        let line = self.pair_index;
        move |e| match e.kind() {
            io::ErrorKind::UnexpectedEof => DxfError::UnexpectedEof { code, line },
            _ => DxfError::Io(e),
        }
    }

    fn read_code(&mut self) -> Result<Option<i32>> {
        // A clean end of stream is only allowed on a pair boundary
        if self.reader.fill_buf()?.is_empty() {
            return Ok(None);
        }
        let on_eof = self.eof_error(-1);
        let code = if self.wide_codes {
            self.reader.read_u16::<LittleEndian>().map_err(on_eof)?
        } else {
            match self.reader.read_u8().map_err(&on_eof)? {
                255 => self.reader.read_u16::<LittleEndian>().map_err(on_eof)?,
                short => u16::from(short),
            }
        };
        Ok(Some(code as i32))
    }

    fn read_null_terminated(&mut self, code: i32) -> Result<String> {
        let mut bytes = Vec::new();
        self.reader.read_until(0, &mut bytes)?;
        if bytes.pop() != Some(0) {
            return Err(DxfError::UnexpectedEof { code, line: self.pair_index });
        }
        Ok(decode_string(&bytes, self.encoding))
    }

    fn read_value(&mut self, code: i32) -> Result<String> {
        let on_eof = self.eof_error(code);
        let value = match GroupCodeValueType::from_code(code) {
            GroupCodeValueType::String | GroupCodeValueType::Handle | GroupCodeValueType::None => {
                self.read_null_terminated(code)?
            }
            GroupCodeValueType::Double => self.reader.read_f64::<LittleEndian>().map_err(on_eof)?.to_string(),
            GroupCodeValueType::Int16 => self.reader.read_i16::<LittleEndian>().map_err(on_eof)?.to_string(),
            GroupCodeValueType::Int32 => self.reader.read_i32::<LittleEndian>().map_err(on_eof)?.to_string(),
            GroupCodeValueType::Int64 => self.reader.read_i64::<LittleEndian>().map_err(on_eof)?.to_string(),
            GroupCodeValueType::Bool => self.reader.read_u8().map_err(on_eof)?.to_string(),
            GroupCodeValueType::Chunk => {
                let len = self.reader.read_u8().map_err(&on_eof)? as usize;
                let mut chunk = vec![0u8; len];
                self.reader.read_exact(&mut chunk).map_err(on_eof)?;
                chunk.iter().map(|b| format!("{:02X}", b)).collect()
            }
        };
        Ok(value)
    }

    fn read_pair_internal(&mut self) -> Result<Option<DxfCodePair>> {
        let Some(code) = self.read_code()? else {
            return Ok(None);
        };
        let value = self.read_value(code)?;
        self.pair_index += 1;
        Ok(Some(DxfCodePair::new(code, value)))
    }
}

impl<R: Read + Seek> DxfStreamReader for DxfBinaryReader<R> {
    fn read_pair(&mut self) -> Result<Option<DxfCodePair>> {
        if let Some(pair) = self.peeked_pair.take() {
            return Ok(Some(pair));
        }
        self.read_pair_internal()
    }

    fn peek_code(&mut self) -> Result<Option<i32>> {
        if let Some(ref pair) = self.peeked_pair {
            return Ok(Some(pair.code));
        }
        match self.read_pair_internal()? {
            Some(pair) => {
                let code = pair.code;
                self.peeked_pair = Some(pair);
                Ok(Some(code))
            }
            None => Ok(None),
        }
    }

    fn push_back(&mut self, pair: DxfCodePair) {
        self.peeked_pair = Some(pair);
    }

    fn reset(&mut self) -> Result<()> {
        self.reader.seek(SeekFrom::Start(0))?;
        Self::skip_sentinel(&mut self.reader)?;
        self.pair_index = 0;
        self.peeked_pair = None;
        Ok(())
    }

    fn set_encoding(&mut self, encoding: &'static Encoding) {
        self.encoding = Some(encoding);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::WriteBytesExt;
    use std::io::{Cursor, Write};

    fn binary(body: impl FnOnce(&mut Vec<u8>)) -> DxfBinaryReader<Cursor<Vec<u8>>> {
        let mut data = BINARY_SENTINEL.to_vec();
        body(&mut data);
        DxfBinaryReader::new(BufReader::new(Cursor::new(data))).unwrap()
    }

    fn put_string(data: &mut Vec<u8>, code: u16, value: &str) {
        data.write_u16::<LittleEndian>(code).unwrap();
        data.write_all(value.as_bytes()).unwrap();
        data.push(0);
    }

    #[test]
    fn test_typed_values() {
        let mut reader = binary(|d| {
            put_string(d, 0, "LINE");
            d.write_u16::<LittleEndian>(10).unwrap();
            d.write_f64::<LittleEndian>(12.25).unwrap();
            d.write_u16::<LittleEndian>(62).unwrap();
            d.write_i16::<LittleEndian>(-3).unwrap();
            d.write_u16::<LittleEndian>(420).unwrap();
            d.write_i32::<LittleEndian>(0x00FF8000).unwrap();
            d.write_u16::<LittleEndian>(290).unwrap();
            d.write_u8(1).unwrap();
            d.write_u16::<LittleEndian>(310).unwrap();
            d.write_u8(2).unwrap();
            d.write_all(&[0xAB, 0x01]).unwrap();
        });

        assert!(reader.read_pair().unwrap().unwrap().is_marker("LINE"));
        assert_eq!(reader.read_pair().unwrap().unwrap().as_double(), Some(12.25));
        assert_eq!(reader.read_pair().unwrap().unwrap().as_i16(), Some(-3));
        assert_eq!(reader.read_pair().unwrap().unwrap().as_int(), Some(0x00FF8000));
        assert_eq!(reader.read_pair().unwrap().unwrap().as_bool(), Some(true));
        assert_eq!(reader.read_pair().unwrap().unwrap().value_string, "AB01");
        assert!(reader.read_pair().unwrap().is_none());
    }

    #[test]
    fn test_truncated_value() {
        let mut reader = binary(|d| {
            d.write_u16::<LittleEndian>(10).unwrap();
            d.write_all(&[0, 0, 0]).unwrap();
        });
        let err = reader.read_pair().unwrap_err();
        assert!(matches!(err, DxfError::UnexpectedEof { code: 10, .. }));
    }

    #[test]
    fn test_unterminated_string() {
        let mut reader = binary(|d| {
            d.write_u16::<LittleEndian>(8).unwrap();
            d.write_all(b"WALLS").unwrap();
        });
        assert!(matches!(reader.read_pair().unwrap_err(), DxfError::UnexpectedEof { code: 8, .. }));
    }

    #[test]
    fn test_bad_sentinel() {
        let data = b"AutoCAD Binary DXX\r\n\x1a\0".to_vec();
        let result = DxfBinaryReader::new(BufReader::new(Cursor::new(data)));
        assert!(matches!(result, Err(DxfError::Parse(_))));
    }

    #[test]
    fn test_reset_skips_sentinel() {
        let mut reader = binary(|d| put_string(d, 0, "EOF"));
        reader.read_pair().unwrap();
        reader.reset().unwrap();
        assert!(reader.read_pair().unwrap().unwrap().is_marker("EOF"));
    }

    #[test]
    fn test_one_byte_group_codes() {
        let mut data = BINARY_SENTINEL.to_vec();
        data.push(0);
        data.extend_from_slice(b"SECTION\0");
        data.push(2);
        data.extend_from_slice(b"ENTITIES\0");
        data.push(10);
        data.write_f64::<LittleEndian>(4.5).unwrap();
        // 255 escapes to a two-byte code
        data.push(255);
        data.write_u16::<LittleEndian>(1001).unwrap();
        data.extend_from_slice(b"APP\0");
        let mut reader = DxfBinaryReader::new(BufReader::new(Cursor::new(data))).unwrap();

        assert!(reader.read_pair().unwrap().unwrap().is_marker("SECTION"));
        assert_eq!(reader.read_pair().unwrap().unwrap().value_string, "ENTITIES");
        assert_eq!(reader.read_pair().unwrap().unwrap().as_double(), Some(4.5));
        let escaped = reader.read_pair().unwrap().unwrap();
        assert_eq!((escaped.code, escaped.value_string.as_str()), (1001, "APP"));
        assert!(reader.read_pair().unwrap().is_none());

        reader.reset().unwrap();
        assert!(reader.read_pair().unwrap().unwrap().is_marker("SECTION"));
    }
}
