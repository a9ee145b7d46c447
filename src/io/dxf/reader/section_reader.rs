//! DXF section readers
//!
//! Every entity record is mapped into [`EntityType`] right here, so nothing
//! downstream ever sees raw group codes.

use super::stream_reader::{DxfCodePair, DxfStreamReader, PointReader};
use crate::document::DrawingDocument;
use crate::entities::*;
use crate::error::Result;
use crate::notification::NotificationType;
use crate::tables::{BlockRecord, Layer, LayerFlags};
use crate::types::{BoundingBox2D, DrawingUnit, DxfVersion, Rgb, Vector2};

/// Section reader for parsing DXF sections
pub struct SectionReader<'a> {
    reader: &'a mut Box<dyn DxfStreamReader>,
}

impl<'a> SectionReader<'a> {
    /// Create a new section reader
    pub fn new(reader: &'a mut Box<dyn DxfStreamReader>) -> Self {
        Self { reader }
    }

    // ===== HEADER =====

    /// Read the HEADER section
    pub fn read_header(&mut self, document: &mut DrawingDocument) -> Result<()> {
        let mut ext_min: Option<Vector2> = None;
        let mut ext_max: Option<Vector2> = None;

        while let Some(pair) = self.reader.read_pair()? {
            if pair.is_marker("ENDSEC") {
                break;
            }
            if pair.code != 9 {
                continue;
            }

            let values = self.read_variable_values()?;
            let hdr = &mut document.header;
            match pair.value_string.as_str() {
                "$ACADVER" => {
                    if let Some(v) = values.iter().find(|v| v.code == 1) {
                        hdr.version = DxfVersion::from_version_string(&v.value_string);
                    }
                }
                "$DWGCODEPAGE" => {
                    if let Some(v) = values.iter().find(|v| v.code == 3) {
                        hdr.code_page = Some(v.value_string.clone());
                    }
                }
                "$INSUNITS" => {
                    if let Some(units) = values.iter().find_map(|v| v.as_i16()) {
                        hdr.insertion_units = DrawingUnit::from_insunits(units);
                    }
                }
                "$EXTMIN" => ext_min = Self::point_from_values(&values),
                "$EXTMAX" => ext_max = Self::point_from_values(&values),
                _ => {}
            }
        }

        // Empty drawings write EXTMIN > EXTMAX (+1e20 / -1e20)
        if let (Some(min), Some(max)) = (ext_min, ext_max) {
            if min.x <= max.x && min.y <= max.y {
                document.header.declared_extents = Some(BoundingBox2D::new(min, max));
            }
        }

        Ok(())
    }

    /// Consume the value pairs of one header variable, up to the next
    /// variable name or the end of the section
    fn read_variable_values(&mut self) -> Result<Vec<DxfCodePair>> {
        let mut values = Vec::new();
        while let Some(p) = self.reader.read_pair()? {
            if p.code == 9 || p.code == 0 {
                self.reader.push_back(p);
                break;
            }
            values.push(p);
        }
        Ok(values)
    }

    fn point_from_values(values: &[DxfCodePair]) -> Option<Vector2> {
        let mut point = PointReader::new();
        for v in values {
            point.add_coordinate(v);
        }
        point.get_point()
    }

    // ===== TABLES =====

    /// Read the TABLES section; only the LAYER table is kept
    pub fn read_tables(&mut self, document: &mut DrawingDocument) -> Result<()> {
        while let Some(pair) = self.reader.read_pair()? {
            if pair.is_marker("ENDSEC") {
                break;
            }

            if pair.is_marker("TABLE") {
                if let Some(name_pair) = self.reader.read_pair()? {
                    if name_pair.code == 2 && name_pair.value_string == "LAYER" {
                        self.read_layer_table(document)?;
                    } else {
                        self.skip_to_endtab()?;
                    }
                }
            }
        }
        Ok(())
    }

    fn skip_to_endtab(&mut self) -> Result<()> {
        while let Some(pair) = self.reader.read_pair()? {
            if pair.is_marker("ENDTAB") {
                break;
            }
        }
        Ok(())
    }

    /// Read LAYER table
    fn read_layer_table(&mut self, document: &mut DrawingDocument) -> Result<()> {
        while let Some(pair) = self.reader.read_pair()? {
            if pair.is_marker("ENDTAB") {
                break;
            }

            if pair.is_marker("LAYER") {
                if let Some(layer) = self.read_layer_entry()? {
                    if let Err(e) = document.layers.add(layer) {
                        document.notifications.notify(NotificationType::Warning, e);
                    }
                }
            }
        }
        Ok(())
    }

    /// Read a single LAYER entry
    fn read_layer_entry(&mut self) -> Result<Option<Layer>> {
        let mut layer = Layer::new("");

        while let Some(pair) = self.reader.read_pair()? {
            if pair.code == 0 {
                self.reader.push_back(pair);
                break;
            }

            match pair.code {
                2 => layer.name = pair.value_string.clone(),
                62 => {
                    if let Some(color_index) = pair.as_i16() {
                        layer.color = color_index;
                    }
                }
                420 => layer.true_color = pair.as_int().map(Rgb::from_true_color),
                70 => {
                    if let Some(flags) = pair.as_i16() {
                        layer.flags = LayerFlags::from_bits_truncate(flags);
                    }
                }
                _ => {}
            }
        }

        if layer.name.is_empty() {
            return Ok(None);
        }
        Ok(Some(layer))
    }

    // ===== BLOCKS =====

    /// Read the BLOCKS section
    pub fn read_blocks(&mut self, document: &mut DrawingDocument) -> Result<()> {
        while let Some(pair) = self.reader.read_pair()? {
            if pair.is_marker("ENDSEC") {
                break;
            }

            if pair.is_marker("BLOCK") {
                let block = self.read_block()?;
                if let Err(e) = document.blocks.add(block) {
                    document.notifications.notify(NotificationType::Warning, e);
                }
            }
        }
        Ok(())
    }

    /// Read a single BLOCK...ENDBLK definition
    fn read_block(&mut self) -> Result<BlockRecord> {
        let mut block = BlockRecord::new("");
        let mut base_point = PointReader::new();

        // BLOCK entity properties
        while let Some(pair) = self.reader.read_pair()? {
            match pair.code {
                0 => {
                    self.reader.push_back(pair);
                    break;
                }
                2 => block.name = pair.value_string.clone(),
                3 if block.name.is_empty() => block.name = pair.value_string.clone(),
                10 | 20 | 30 => {
                    base_point.add_coordinate(&pair);
                }
                _ => {}
            }
        }
        if let Some(pt) = base_point.get_point() {
            block.base_point = pt;
        }

        // Block entities up to ENDBLK
        while let Some(pair) = self.reader.read_pair()? {
            if pair.code != 0 {
                continue;
            }
            if pair.value_string == "ENDBLK" {
                self.skip_entity_body()?;
                break;
            }
            if pair.value_string == "ENDSEC" {
                // Unterminated block; let the caller see the section end
                self.reader.push_back(pair);
                break;
            }
            let entity = self.read_entity(&pair.value_string)?;
            block.entities.push(entity);
        }

        Ok(block)
    }

    // ===== ENTITIES =====

    /// Read the ENTITIES section
    pub fn read_entities(&mut self, document: &mut DrawingDocument) -> Result<()> {
        while let Some(pair) = self.reader.read_pair()? {
            if pair.is_marker("ENDSEC") {
                break;
            }

            if pair.code == 0 {
                let entity = self.read_entity(&pair.value_string)?;
                document.add_entity(entity);
            }
        }
        Ok(())
    }

    /// Map one entity record into the strict entity union
    fn read_entity(&mut self, type_name: &str) -> Result<EntityType> {
        let entity = match type_name {
            "LINE" => EntityType::Line(self.read_line()?),
            "LWPOLYLINE" => EntityType::Polyline(self.read_lwpolyline()?),
            "POLYLINE" => EntityType::Polyline(self.read_polyline()?),
            "CIRCLE" => EntityType::Circle(self.read_circle(false)?),
            "ARC" => EntityType::Circle(self.read_circle(true)?),
            "INSERT" => EntityType::Insert(self.read_insert()?),
            "TEXT" => EntityType::Text(self.read_text(false)?),
            "MTEXT" => EntityType::Text(self.read_text(true)?),
            other => EntityType::Unknown(self.read_unknown(other)?),
        };
        Ok(entity)
    }

    /// Apply a property shared by every entity; returns false when the
    /// code is entity specific
    fn read_common(common: &mut EntityCommon, pair: &DxfCodePair) -> bool {
        match pair.code {
            8 => common.layer = pair.value_string.clone(),
            62 => {
                if let Some(color_index) = pair.as_i16() {
                    common.color = Some(color_index);
                }
            }
            420 => common.true_color = pair.as_int().map(Rgb::from_true_color),
            60 => common.invisible = pair.as_i16() == Some(1),
            _ => return false,
        }
        true
    }

    /// Consume pairs up to the next `0` code
    fn skip_entity_body(&mut self) -> Result<()> {
        while let Some(pair) = self.reader.read_pair()? {
            if pair.code == 0 {
                self.reader.push_back(pair);
                break;
            }
        }
        Ok(())
    }

    /// Read a LINE entity
    fn read_line(&mut self) -> Result<Line> {
        let mut line = Line::new();
        let mut start = PointReader::new();
        let mut end = PointReader::new();

        while let Some(pair) = self.reader.read_pair()? {
            if pair.code == 0 {
                self.reader.push_back(pair);
                break;
            }
            if Self::read_common(&mut line.common, &pair) {
                continue;
            }

            match pair.code {
                10 | 20 | 30 => {
                    start.add_coordinate(&pair);
                }
                11 | 21 | 31 => {
                    end.add_coordinate(&pair);
                }
                _ => {}
            }
        }

        if let Some(pt) = start.get_point() {
            line.start = pt;
        }
        if let Some(pt) = end.get_point() {
            line.end = pt;
        }
        Ok(line)
    }

    /// Read a CIRCLE or ARC entity
    fn read_circle(&mut self, is_arc: bool) -> Result<Circle> {
        let mut circle = Circle::new();
        let mut center = PointReader::new();
        let mut start_angle = 0.0;
        let mut end_angle = 360.0;

        while let Some(pair) = self.reader.read_pair()? {
            if pair.code == 0 {
                self.reader.push_back(pair);
                break;
            }
            if Self::read_common(&mut circle.common, &pair) {
                continue;
            }

            match pair.code {
                10 | 20 | 30 => {
                    center.add_coordinate(&pair);
                }
                40 => {
                    if let Some(radius) = pair.as_double() {
                        circle.radius = radius;
                    }
                }
                50 => start_angle = pair.as_double().unwrap_or(start_angle),
                51 => end_angle = pair.as_double().unwrap_or(end_angle),
                _ => {}
            }
        }

        if let Some(pt) = center.get_point() {
            circle.center = pt;
        }
        if is_arc {
            circle.arc = Some(ArcAngles {
                start: start_angle,
                end: end_angle,
            });
        }
        Ok(circle)
    }

    /// Read an LWPOLYLINE entity
    fn read_lwpolyline(&mut self) -> Result<Polyline> {
        let mut polyline = Polyline::new();

        while let Some(pair) = self.reader.read_pair()? {
            if pair.code == 0 {
                self.reader.push_back(pair);
                break;
            }
            if Self::read_common(&mut polyline.common, &pair) {
                continue;
            }

            match pair.code {
                70 => {
                    if let Some(flags) = pair.as_i16() {
                        polyline.flags = PolylineFlags::from_bits_truncate(flags);
                    }
                }
                // Each 10 starts a new vertex; 20 and 42 refine the last one
                10 => {
                    if let Some(x) = pair.as_double() {
                        polyline.vertices.push(PolylineVertex::new(Vector2::new(x, 0.0)));
                    }
                }
                20 => {
                    if let (Some(y), Some(v)) = (pair.as_double(), polyline.vertices.last_mut()) {
                        v.location.y = y;
                    }
                }
                42 => {
                    if let (Some(bulge), Some(v)) = (pair.as_double(), polyline.vertices.last_mut()) {
                        v.bulge = bulge;
                    }
                }
                _ => {}
            }
        }

        Ok(polyline)
    }

    /// Read a POLYLINE entity with its VERTEX records and SEQEND
    fn read_polyline(&mut self) -> Result<Polyline> {
        let mut polyline = Polyline::new();

        while let Some(pair) = self.reader.read_pair()? {
            if pair.code == 0 {
                match pair.value_string.as_str() {
                    "VERTEX" => {
                        if let Some(vertex) = self.read_vertex()? {
                            polyline.vertices.push(vertex);
                        }
                    }
                    "SEQEND" => {
                        self.skip_entity_body()?;
                        break;
                    }
                    _ => {
                        // Missing SEQEND; the next entity starts here
                        self.reader.push_back(pair);
                        break;
                    }
                }
                continue;
            }
            if Self::read_common(&mut polyline.common, &pair) {
                continue;
            }

            if pair.code == 70 {
                if let Some(flags) = pair.as_i16() {
                    polyline.flags = PolylineFlags::from_bits_truncate(flags);
                }
            }
        }

        Ok(polyline)
    }

    /// Read a VERTEX record; polyface face records carry no location
    fn read_vertex(&mut self) -> Result<Option<PolylineVertex>> {
        let mut location = PointReader::new();
        let mut bulge = 0.0;
        let mut flags = 0i16;

        while let Some(pair) = self.reader.read_pair()? {
            if pair.code == 0 {
                self.reader.push_back(pair);
                break;
            }
            match pair.code {
                10 | 20 | 30 => {
                    location.add_coordinate(&pair);
                }
                42 => bulge = pair.as_double().unwrap_or(0.0),
                70 => flags = pair.as_i16().unwrap_or(0),
                _ => {}
            }
        }

        let is_face_record = flags & 128 != 0 && flags & 64 == 0;
        if is_face_record {
            return Ok(None);
        }
        Ok(location
            .get_point()
            .map(|pt| PolylineVertex::with_bulge(pt, bulge)))
    }

    /// Read an INSERT entity, skipping any trailing ATTRIB...SEQEND run
    fn read_insert(&mut self) -> Result<Insert> {
        let mut insert = Insert::new("", Vector2::ZERO);
        let mut insertion = PointReader::new();
        let mut has_attributes = false;

        while let Some(pair) = self.reader.read_pair()? {
            if pair.code == 0 {
                self.reader.push_back(pair);
                break;
            }
            if Self::read_common(&mut insert.common, &pair) {
                continue;
            }

            match pair.code {
                2 => insert.block_name = pair.value_string.clone(),
                10 | 20 | 30 => {
                    insertion.add_coordinate(&pair);
                }
                41 => insert.x_scale = pair.as_double().unwrap_or(1.0),
                42 => insert.y_scale = pair.as_double().unwrap_or(1.0),
                50 => insert.rotation = pair.as_double().unwrap_or(0.0),
                66 => has_attributes = pair.as_i16() == Some(1),
                70 => {
                    if let Some(count) = pair.as_i16() {
                        insert.column_count = count.max(1) as u16;
                    }
                }
                71 => {
                    if let Some(count) = pair.as_i16() {
                        insert.row_count = count.max(1) as u16;
                    }
                }
                44 => insert.column_spacing = pair.as_double().unwrap_or(0.0),
                45 => insert.row_spacing = pair.as_double().unwrap_or(0.0),
                _ => {}
            }
        }

        if let Some(pt) = insertion.get_point() {
            insert.insert_point = pt;
        }

        if has_attributes {
            while let Some(pair) = self.reader.read_pair()? {
                match pair.value_string.as_str() {
                    "ATTRIB" if pair.code == 0 => self.skip_entity_body()?,
                    "SEQEND" if pair.code == 0 => {
                        self.skip_entity_body()?;
                        break;
                    }
                    _ => {
                        self.reader.push_back(pair);
                        break;
                    }
                }
            }
        }

        Ok(insert)
    }

    /// Read a TEXT or MTEXT entity
    fn read_text(&mut self, multiline: bool) -> Result<Text> {
        let mut text = Text::new("", Vector2::ZERO);
        text.multiline = multiline;
        let mut insertion = PointReader::new();
        let mut chunks = String::new();

        while let Some(pair) = self.reader.read_pair()? {
            if pair.code == 0 {
                self.reader.push_back(pair);
                break;
            }
            if Self::read_common(&mut text.common, &pair) {
                continue;
            }

            match pair.code {
                1 => text.value = pair.value_string.clone(),
                // MTEXT splits long values into 250-char code 3 chunks
                3 => chunks.push_str(&pair.value_string),
                10 | 20 | 30 => {
                    insertion.add_coordinate(&pair);
                }
                40 => text.height = pair.as_double().unwrap_or(text.height),
                50 => text.rotation = pair.as_double().unwrap_or(0.0),
                _ => {}
            }
        }

        if !chunks.is_empty() {
            text.value = chunks + &text.value;
        }
        if let Some(pt) = insertion.get_point() {
            text.insertion_point = pt;
        }
        Ok(text)
    }

    /// Keep the common properties of an entity kind we do not model
    fn read_unknown(&mut self, type_name: &str) -> Result<UnknownEntity> {
        let mut unknown = UnknownEntity::new(type_name);

        while let Some(pair) = self.reader.read_pair()? {
            if pair.code == 0 {
                self.reader.push_back(pair);
                break;
            }
            Self::read_common(&mut unknown.common, &pair);
        }

        Ok(unknown)
    }
}
