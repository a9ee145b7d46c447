//! Diagnostic: decode a DXF plan, place it at a coordinate, and summarize
//! what the map surface would receive.
//!
//! Usage: `plan_probe <file.dxf> [lat lng]`. Set `RUST_LOG=debug` for the
//! decoder's trace output.

use anyhow::{bail, Context};
use floorplan_anchor::placement::PlacementConfig;
use floorplan_anchor::render::{RenderConfig, RenderGeometry};
use floorplan_anchor::{DecodeCache, FloorPlan, GeoPoint, ItemId, PlanPayload, PlanSource};
use indexmap::IndexMap;
use tracing_subscriber::prelude::*;

fn setup_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,floorplan_anchor=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

fn parse_center(args: &[String]) -> anyhow::Result<GeoPoint> {
    match args {
        [] => Ok(GeoPoint::new(0.0, 0.0)),
        [lat, lng] => {
            let lat: f64 = lat.parse().with_context(|| format!("bad latitude '{lat}'"))?;
            let lng: f64 = lng.parse().with_context(|| format!("bad longitude '{lng}'"))?;
            Ok(GeoPoint::new(lat, lng))
        }
        _ => bail!("expected both latitude and longitude"),
    }
}

fn main() -> anyhow::Result<()> {
    setup_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((path, rest)) = args.split_first() else {
        bail!("usage: plan_probe <file.dxf> [lat lng]");
    };
    let center = parse_center(rest)?;

    let bytes = std::fs::read(path).with_context(|| format!("reading {path}"))?;
    let cache = DecodeCache::new();
    let plan = FloorPlan::attach(
        ItemId::from(path.as_str()),
        &PlanPayload::vector(bytes),
        center,
        &cache,
        &PlacementConfig::default(),
    )?;

    let (document, info) = match plan.source() {
        PlanSource::Vector { document, info } => (document, info),
        PlanSource::Invalid { reason } => bail!("{path}: {reason}"),
        PlanSource::Raster { .. } => bail!("{path}: not a vector drawing"),
    };

    println!("File:       {path}");
    println!("Version:    {:?}", document.header.version);
    println!("Units:      {:?}", document.header.insertion_units);
    println!(
        "Contents:   {} entities, {} blocks, {} layers",
        document.entities().len(),
        document.blocks.len(),
        document.layers.len()
    );
    println!(
        "Extent:     ({:.3}, {:.3}) .. ({:.3}, {:.3})  [{:.3} x {:.3}]",
        info.min_x, info.min_y, info.max_x, info.max_y, info.width, info.height
    );
    if let Some(controller) = plan.controller() {
        let (w, h) = controller.placement().bounds.size_meters();
        println!("Placement:  {}  ({w:.1} m x {h:.1} m)", controller.placement().bounds);
    }
    if let Some(unit) = plan.suggested_unit() {
        println!("Suggested:  1 unit = {} m ({unit:?})", unit.meters_per_unit().unwrap_or(1.0));
    }

    for note in document.notifications.iter() {
        println!("  {note}");
    }

    let primitives = plan.render(&RenderConfig::default());
    let mut by_kind: IndexMap<&'static str, usize> = IndexMap::new();
    let mut by_color: IndexMap<String, usize> = IndexMap::new();
    for primitive in &primitives {
        let kind = match primitive.geometry {
            RenderGeometry::Polyline { closed: true, .. } => "closed polyline",
            RenderGeometry::Polyline { .. } => "polyline",
            RenderGeometry::Circle { .. } => "circle",
            RenderGeometry::Point(_) => "point",
        };
        *by_kind.entry(kind).or_default() += 1;
        *by_color.entry(primitive.color.rgb.to_hex()).or_default() += 1;
    }

    println!("Primitives: {}", primitives.len());
    for (kind, count) in &by_kind {
        println!("  {kind:<16} {count}");
    }
    println!("Colors:");
    for (color, count) in &by_color {
        println!("  {color}  {count}");
    }

    Ok(())
}
