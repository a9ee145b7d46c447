//! Shared test utilities for floorplan-anchor integration tests.
//!
//! Holds a small DXF writer (`DxfBuilder`) so tests can describe drawings
//! as code instead of checked-in sample files, plus float helpers. All test
//! crates import it via `mod common;`.

#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};
use floorplan_anchor::io::dxf::{GroupCodeValueType, BINARY_SENTINEL};
use floorplan_anchor::placement::GeoPoint;

// ===========================================================================
// Float helpers
// ===========================================================================

pub const EPS: f64 = 1e-9;

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < EPS
}

pub fn approx_tol(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() < tol
}

pub fn geo_approx(p: GeoPoint, lat: f64, lng: f64) -> bool {
    approx(p.lat, lat) && approx(p.lng, lng)
}

// ===========================================================================
// Entity records
// ===========================================================================

/// Group code / value pairs of one or more entity records
#[derive(Debug, Default, Clone)]
pub struct Entities {
    pairs: Vec<(i32, String)>,
}

impl Entities {
    pub fn pair(&mut self, code: i32, value: impl ToString) -> &mut Self {
        self.pairs.push((code, value.to_string()));
        self
    }

    fn start(&mut self, kind: &str, layer: &str, color: Option<i16>) -> &mut Self {
        self.pair(0, kind).pair(8, layer);
        if let Some(color) = color {
            self.pair(62, color);
        }
        self
    }

    fn point(&mut self, code: i32, (x, y): (f64, f64)) -> &mut Self {
        self.pair(code, x).pair(code + 10, y)
    }

    pub fn line(&mut self, layer: &str, color: Option<i16>, a: (f64, f64), b: (f64, f64)) -> &mut Self {
        self.start("LINE", layer, color).point(10, a).point(11, b)
    }

    pub fn circle(&mut self, layer: &str, center: (f64, f64), radius: f64) -> &mut Self {
        self.start("CIRCLE", layer, None).point(10, center).pair(40, radius)
    }

    pub fn arc(&mut self, layer: &str, center: (f64, f64), radius: f64, start: f64, end: f64) -> &mut Self {
        self.start("ARC", layer, None)
            .point(10, center)
            .pair(40, radius)
            .pair(50, start)
            .pair(51, end)
    }

    pub fn lwpolyline(&mut self, layer: &str, points: &[(f64, f64)], closed: bool) -> &mut Self {
        self.start("LWPOLYLINE", layer, None)
            .pair(90, points.len())
            .pair(70, if closed { 1 } else { 0 });
        for p in points {
            self.point(10, *p);
        }
        self
    }

    pub fn insert(&mut self, layer: &str, color: Option<i16>, block: &str, at: (f64, f64)) -> &mut Self {
        self.start("INSERT", layer, color).pair(2, block).point(10, at)
    }

    pub fn text(&mut self, layer: &str, at: (f64, f64), value: &str) -> &mut Self {
        self.start("TEXT", layer, None).point(10, at).pair(40, 2.5).pair(1, value)
    }

    /// A record of a kind the decoder does not model
    pub fn other(&mut self, kind: &str) -> &mut Self {
        self.start(kind, "0", None).point(10, (0.0, 0.0))
    }
}

// ===========================================================================
// Document builder
// ===========================================================================

/// Assembles a complete DXF payload section by section
#[derive(Debug, Clone)]
pub struct DxfBuilder {
    header: Vec<(i32, String)>,
    layers: Vec<(i32, String)>,
    blocks: Vec<(i32, String)>,
    entities: Entities,
    entities_section: bool,
}

impl Default for DxfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DxfBuilder {
    pub fn new() -> Self {
        DxfBuilder {
            header: Vec::new(),
            layers: Vec::new(),
            blocks: Vec::new(),
            entities: Entities::default(),
            entities_section: true,
        }
    }

    fn variable(mut self, name: &str, code: i32, value: impl ToString) -> Self {
        self.header.push((9, name.to_string()));
        self.header.push((code, value.to_string()));
        self
    }

    pub fn version(self, version: &str) -> Self {
        self.variable("$ACADVER", 1, version)
    }

    pub fn code_page(self, code_page: &str) -> Self {
        self.variable("$DWGCODEPAGE", 3, code_page)
    }

    pub fn units(self, insunits: i16) -> Self {
        self.variable("$INSUNITS", 70, insunits)
    }

    pub fn layer(mut self, name: &str, color: i16) -> Self {
        self.layers.extend([
            (0, "LAYER".to_string()),
            (2, name.to_string()),
            (70, "0".to_string()),
            (62, color.to_string()),
        ]);
        self
    }

    pub fn block(mut self, name: &str, base: (f64, f64), body: impl FnOnce(&mut Entities)) -> Self {
        let mut entities = Entities::default();
        body(&mut entities);
        self.blocks.extend([
            (0, "BLOCK".to_string()),
            (8, "0".to_string()),
            (2, name.to_string()),
            (70, "0".to_string()),
            (10, base.0.to_string()),
            (20, base.1.to_string()),
        ]);
        self.blocks.extend(entities.pairs);
        self.blocks.push((0, "ENDBLK".to_string()));
        self
    }

    pub fn entities(mut self, body: impl FnOnce(&mut Entities)) -> Self {
        body(&mut self.entities);
        self
    }

    /// Leave out the ENTITIES section entirely
    pub fn without_entities_section(mut self) -> Self {
        self.entities_section = false;
        self
    }

    fn pairs(&self) -> Vec<(i32, String)> {
        let mut out = Vec::new();
        let mut section = |name: &str, body: &[(i32, String)]| {
            out.push((0, "SECTION".to_string()));
            out.push((2, name.to_string()));
            out.extend_from_slice(body);
            out.push((0, "ENDSEC".to_string()));
        };

        if !self.header.is_empty() {
            section("HEADER", &self.header);
        }
        if !self.layers.is_empty() {
            let mut table = vec![(0, "TABLE".to_string()), (2, "LAYER".to_string())];
            table.extend_from_slice(&self.layers);
            table.push((0, "ENDTAB".to_string()));
            section("TABLES", &table);
        }
        if !self.blocks.is_empty() {
            section("BLOCKS", &self.blocks);
        }
        if self.entities_section {
            section("ENTITIES", &self.entities.pairs);
        }
        out.push((0, "EOF".to_string()));
        out
    }

    /// ASCII DXF with right-aligned group codes, as AutoCAD writes them
    pub fn build_string(&self) -> String {
        let mut s = String::new();
        for (code, value) in self.pairs() {
            s.push_str(&format!("{code:>3}\n{value}\n"));
        }
        s
    }

    pub fn build(&self) -> Vec<u8> {
        self.build_string().into_bytes()
    }

    /// Binary DXF carrying the same pairs
    pub fn build_binary(&self) -> Vec<u8> {
        let mut out = BINARY_SENTINEL.to_vec();
        for (code, value) in self.pairs() {
            out.write_u16::<LittleEndian>(code as u16).unwrap();
            match GroupCodeValueType::from_code(code) {
                GroupCodeValueType::Double => out.write_f64::<LittleEndian>(value.parse().unwrap()).unwrap(),
                GroupCodeValueType::Int16 => out.write_i16::<LittleEndian>(value.parse().unwrap()).unwrap(),
                GroupCodeValueType::Int32 => out.write_i32::<LittleEndian>(value.parse().unwrap()).unwrap(),
                GroupCodeValueType::Int64 => out.write_i64::<LittleEndian>(value.parse().unwrap()).unwrap(),
                GroupCodeValueType::Bool => out.push(value.parse().unwrap()),
                _ => {
                    out.extend_from_slice(value.as_bytes());
                    out.push(0);
                }
            }
        }
        out
    }
}

/// The drawing used by the end-to-end scenario: one line from (0,0) to (10,5)
pub fn single_line_dxf() -> Vec<u8> {
    DxfBuilder::new()
        .entities(|e| {
            e.line("0", None, (0.0, 0.0), (10.0, 5.0));
        })
        .build()
}
