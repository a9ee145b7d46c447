//! DXF ASCII text reader

use super::stream_reader::{decode_string, DxfCodePair, DxfStreamReader};
use crate::error::{DxfError, Result};
use encoding_rs::Encoding;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};

/// DXF ASCII text file reader
pub struct DxfTextReader<R: Read + Seek> {
    reader: BufReader<R>,
    line_number: usize,
    peeked_pair: Option<DxfCodePair>,
    /// Non-UTF8 fallback encoding.  `None` means use Latin-1 (byte-to-char).
    encoding: Option<&'static Encoding>,
}

impl<R: Read + Seek> DxfTextReader<R> {
    /// Create a new DXF text reader
    pub fn new(reader: BufReader<R>) -> Result<Self> {
        Ok(Self {
            reader,
            line_number: 0,
            peeked_pair: None,
            encoding: None,
        })
    }

    /// Read a single line, trimmed of surrounding whitespace and CR/LF
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut bytes = Vec::new();
        if self.reader.read_until(b'\n', &mut bytes)? == 0 {
            return Ok(None);
        }
        self.line_number += 1;

        let line = decode_string(&bytes, self.encoding);
        Ok(Some(line.trim().to_string()))
    }

    /// Read a code/value pair from the stream
    fn read_pair_internal(&mut self) -> Result<Option<DxfCodePair>> {
        let code_line = loop {
            match self.read_line()? {
                // Trailing blank lines after EOF are common
                Some(line) if line.is_empty() => continue,
                Some(line) => break line,
                None => return Ok(None),
            }
        };

        let code = code_line.parse::<i32>().map_err(|_| DxfError::InvalidDxfCode {
            line: self.line_number,
            text: code_line.clone(),
        })?;

        let value_line = self.read_line()?.ok_or(DxfError::UnexpectedEof {
            code,
            line: self.line_number,
        })?;

        let value = self.process_string_value(&value_line);
        Ok(Some(DxfCodePair::new(code, value)))
    }

    /// Process control character escapes in DXF strings
    fn process_string_value(&self, value: &str) -> String {
        if !value.contains('^') {
            return value.to_string();
        }
        value
            .replace("^J", "\n")
            .replace("^M", "\r")
            .replace("^I", "\t")
            .replace("^ ", "^")
    }
}

impl<R: Read + Seek> DxfStreamReader for DxfTextReader<R> {
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
        self.line_number = 0;
        self.peeked_pair = None;
        Ok(())
    }

    fn set_encoding(&mut self, encoding: &'static Encoding) {
        self.encoding = Some(encoding);
    }
}
