//! DXF file reader

mod binary_reader;
mod section_reader;
mod stream_reader;
mod text_reader;

pub use binary_reader::{DxfBinaryReader, BINARY_SENTINEL};
pub use stream_reader::{DxfCodePair, DxfStreamReader};
pub use text_reader::DxfTextReader;

use section_reader::SectionReader;

use crate::document::{DrawingDocument, DEFAULT_MAX_EXPANDED_ENTITIES};
use crate::entities::EntityType;
use crate::error::{DxfError, Result};
use crate::notification::NotificationType;
use crate::types::DxfVersion;
use ahash::AHashSet;
use indexmap::IndexMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

/// Configuration for the DXF reader.
#[derive(Debug, Clone)]
pub struct DxfReaderConfiguration {
    /// When `true`, errors inside a section, cyclic block definitions, and
    /// oversized block expansions are reported as notifications instead of
    /// aborting the read.
    ///
    /// Default: `false` (strict mode, errors propagate).
    pub failsafe: bool,

    /// Largest [`DrawingDocument::expansion_size`] accepted in strict mode.
    ///
    /// Default: [`DEFAULT_MAX_EXPANDED_ENTITIES`].
    pub max_expanded_entities: usize,
}

impl Default for DxfReaderConfiguration {
    fn default() -> Self {
        Self {
            failsafe: false,
            max_expanded_entities: DEFAULT_MAX_EXPANDED_ENTITIES,
        }
    }
}

impl DxfReaderConfiguration {
    /// Failsafe configuration with default limits
    pub fn failsafe() -> Self {
        Self {
            failsafe: true,
            ..Self::default()
        }
    }
}

/// DXF file reader
pub struct DxfReader {
    reader: Box<dyn DxfStreamReader>,
    version: DxfVersion,
    config: DxfReaderConfiguration,
}

impl DxfReader {
    /// Create a reader over an in-memory payload
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(DxfError::Parse("empty payload".into()));
        }
        Self::from_reader(Cursor::new(bytes.to_vec()))
    }

    /// Create a new DXF reader from any reader
    pub fn from_reader<R: Read + Seek + 'static>(reader: R) -> Result<Self> {
        let mut buf_reader = BufReader::new(reader);

        let reader: Box<dyn DxfStreamReader> = if Self::is_binary(&mut buf_reader)? {
            Box::new(DxfBinaryReader::new(buf_reader)?)
        } else {
            Box::new(DxfTextReader::new(buf_reader)?)
        };

        Ok(Self {
            reader,
            version: DxfVersion::Unknown,
            config: DxfReaderConfiguration::default(),
        })
    }

    /// Create a new DXF reader from a file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_reader(File::open(path)?)
    }

    /// Check if a stream contains binary DXF data; leaves the stream at the start
    fn is_binary<R: Read + Seek>(reader: &mut R) -> Result<bool> {
        let mut buffer = [0u8; 22];
        let mut filled = 0;
        while filled < buffer.len() {
            match reader.read(&mut buffer[filled..])? {
                0 => break,
                n => filled += n,
            }
        }
        reader.seek(SeekFrom::Start(0))?;

        Ok(filled == buffer.len() && &buffer == BINARY_SENTINEL)
    }

    /// Set the reader configuration.
    pub fn with_configuration(mut self, config: DxfReaderConfiguration) -> Self {
        self.config = config;
        self
    }

    /// Read the payload into a [`DrawingDocument`]
    pub fn read(mut self) -> Result<DrawingDocument> {
        self.read_version()?;

        let mut document = DrawingDocument::new();
        document.header.version = self.version;
        let failsafe = self.config.failsafe;
        let mut found_entities = false;

        tracing::debug!(version = ?self.version, failsafe, "decoding drawing");

        while let Some(pair) = self.reader.read_pair()? {
            if pair.is_marker("EOF") {
                break;
            }
            if !pair.is_marker("SECTION") {
                continue;
            }
            let Some(section_pair) = self.reader.read_pair()? else {
                break;
            };
            if section_pair.code != 2 {
                continue;
            }

            let section_name = section_pair.value_string;
            let mut section_reader = SectionReader::new(&mut self.reader);
            let result = match section_name.as_str() {
                "HEADER" => section_reader.read_header(&mut document),
                "TABLES" => section_reader.read_tables(&mut document),
                "BLOCKS" => section_reader.read_blocks(&mut document),
                "ENTITIES" => {
                    found_entities = true;
                    section_reader.read_entities(&mut document)
                }
                _ => {
                    document.notifications.notify(
                        NotificationType::NotImplemented,
                        format!("{} section skipped", section_name),
                    );
                    self.skip_section()
                }
            };

            if let Err(e) = result {
                if failsafe && !matches!(e, DxfError::Io(_)) {
                    document.notifications.notify(
                        NotificationType::Error,
                        format!("Error reading {} section: {}", section_name, e),
                    );
                    // A broken stream may not recover; stop rather than loop
                    if self.skip_section().is_err() {
                        break;
                    }
                } else {
                    return Err(e);
                }
            }
        }

        if !found_entities {
            return Err(DxfError::Parse("no ENTITIES section".into()));
        }

        self.check_blocks(&mut document)?;
        Self::report_unknown_entities(&mut document);

        tracing::debug!(
            entities = document.entities().len(),
            blocks = document.blocks.len(),
            layers = document.layers.len(),
            notifications = document.notifications.len(),
            "decoded drawing"
        );

        Ok(document)
    }

    /// Pre-scan the HEADER section for $ACADVER and $DWGCODEPAGE.
    ///
    /// After this call the reader is reset to the beginning and `self.version`
    /// is populated.  If the version is older than AC1021 (AutoCAD 2007) and a
    /// code page is found, the stream reader's encoding is set accordingly.
    fn read_version(&mut self) -> Result<()> {
        let mut code_page: Option<String> = None;
        let mut saw_pair = false;

        'scan: while let Some(pair) = self.reader.read_pair()? {
            saw_pair = true;
            if !pair.is_marker("SECTION") {
                continue;
            }
            match self.reader.read_pair()? {
                Some(p) if p.code == 2 && p.value_string == "HEADER" => {}
                // HEADER, when present, is always the first section
                _ => break,
            }

            while let Some(header_pair) = self.reader.read_pair()? {
                if header_pair.is_marker("ENDSEC") {
                    break 'scan;
                }
                if header_pair.code != 9 {
                    continue;
                }
                match header_pair.value_string.as_str() {
                    "$ACADVER" => {
                        if let Some(vp) = self.reader.read_pair()? {
                            if vp.code == 1 {
                                self.version = DxfVersion::from_version_string(&vp.value_string);
                            }
                        }
                    }
                    "$DWGCODEPAGE" => {
                        if let Some(cp) = self.reader.read_pair()? {
                            if cp.code == 3 {
                                code_page = Some(cp.value_string);
                            }
                        }
                    }
                    _ => {}
                }
            }
            break;
        }

        if !saw_pair {
            return Err(DxfError::Parse("empty payload".into()));
        }

        if !self.version.is_unicode() {
            if let Some(enc) = code_page.as_deref().and_then(super::code_page::encoding_from_code_page) {
                self.reader.set_encoding(enc);
            }
        }

        self.reader.reset()
    }

    /// Check the block reference graph: cycles, expansion size, and
    /// dangling references
    fn check_blocks(&self, document: &mut DrawingDocument) -> Result<()> {
        if let Some(cycle) = document.find_block_cycle() {
            if !self.config.failsafe {
                return Err(DxfError::CyclicBlock(cycle));
            }
            document.notifications.notify(
                NotificationType::Warning,
                format!("cyclic block reference truncated: {}", cycle.join(" -> ")),
            );
        }

        let size = document.expansion_size();
        let limit = self.config.max_expanded_entities;
        if size > limit as u64 {
            if !self.config.failsafe {
                return Err(DxfError::ExpansionLimit { size, limit });
            }
            document.notifications.notify(
                NotificationType::Warning,
                format!("block expansion truncated: {} entity visits needed, limit is {}", size, limit),
            );
        }

        let mut missing: AHashSet<String> = AHashSet::new();
        let referenced = document
            .entities()
            .iter()
            .chain(document.blocks.iter().flat_map(|b| b.entities.iter()))
            .filter_map(EntityType::referenced_block);
        for name in referenced {
            if !document.blocks.contains(name) {
                missing.insert(name.to_string());
            }
        }

        let mut missing: Vec<String> = missing.into_iter().collect();
        missing.sort();
        for name in missing {
            document.notifications.notify(
                NotificationType::Warning,
                format!("block '{}' is referenced but not defined", name),
            );
        }
        Ok(())
    }

    /// One notification per unsupported entity kind, with its count
    fn report_unknown_entities(document: &mut DrawingDocument) {
        let mut kinds: IndexMap<String, usize> = IndexMap::new();
        let all = document
            .entities()
            .iter()
            .chain(document.blocks.iter().flat_map(|b| b.entities.iter()));
        for entity in all {
            if let EntityType::Unknown(unknown) = entity {
                *kinds.entry(unknown.dxf_name.clone()).or_insert(0) += 1;
            }
        }

        for (kind, count) in kinds {
            document.notifications.notify(
                NotificationType::NotImplemented,
                format!("{} {} entities carry no renderable geometry", count, kind),
            );
        }
    }

    /// Skip the current section
    fn skip_section(&mut self) -> Result<()> {
        while let Some(pair) = self.reader.read_pair()? {
            if pair.is_marker("ENDSEC") {
                break;
            }
        }
        Ok(())
    }
}
