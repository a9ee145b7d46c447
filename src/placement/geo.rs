//! Geographic coordinates and the placement of a plan on the map

use crate::error::PlacementError;
use std::fmt;

/// A WGS84 coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        GeoPoint { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.7}, {:.7})", self.lat, self.lng)
    }
}

/// Meters spanned by one degree of latitude and of longitude at `lat_deg`.
///
/// Series expansion of the WGS84 ellipsoid; good to centimeters per degree.
pub fn meters_per_degree(lat_deg: f64) -> (f64, f64) {
    let phi = lat_deg.to_radians();
    let lat_m = 111_132.92 - 559.82 * (2.0 * phi).cos() + 1.175 * (4.0 * phi).cos()
        - 0.0023 * (6.0 * phi).cos();
    let lng_m = 111_412.84 * phi.cos() - 93.5 * (3.0 * phi).cos() + 0.118 * (5.0 * phi).cos();
    (lat_m, lng_m)
}

/// Geographic rectangle; always satisfies `south < north` and `west < east`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    south: f64,
    west: f64,
    north: f64,
    east: f64,
}

impl GeoBounds {
    /// Create validated bounds
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Result<Self, PlacementError> {
        let finite = [south, west, north, east].iter().all(|v| v.is_finite());
        if !finite || south >= north || west >= east {
            return Err(PlacementError::InvalidBounds {
                south,
                west,
                north,
                east,
            });
        }
        Ok(GeoBounds {
            south,
            west,
            north,
            east,
        })
    }

    /// Bounds of `width_m` x `height_m` meters centered on `center`
    pub fn from_center_size(center: GeoPoint, width_m: f64, height_m: f64) -> Result<Self, PlacementError> {
        let (lat_m, lng_m) = meters_per_degree(center.lat);
        let half_lat = height_m / lat_m / 2.0;
        let half_lng = width_m / lng_m / 2.0;
        GeoBounds::new(
            center.lat - half_lat,
            center.lng - half_lng,
            center.lat + half_lat,
            center.lng + half_lng,
        )
    }

    pub fn south(&self) -> f64 {
        self.south
    }

    pub fn west(&self) -> f64 {
        self.west
    }

    pub fn north(&self) -> f64 {
        self.north
    }

    pub fn east(&self) -> f64 {
        self.east
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new((self.south + self.north) / 2.0, (self.west + self.east) / 2.0)
    }

    /// Longitude span in degrees
    pub fn lng_span(&self) -> f64 {
        self.east - self.west
    }

    /// Latitude span in degrees
    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    /// Approximate (width, height) in meters, measured at the center latitude
    pub fn size_meters(&self) -> (f64, f64) {
        let (lat_m, lng_m) = meters_per_degree(self.center().lat);
        (self.lng_span() * lng_m, self.lat_span() * lat_m)
    }

    /// The same rectangle moved by a delta in degrees
    pub fn translated(&self, d_lat: f64, d_lng: f64) -> Result<Self, PlacementError> {
        GeoBounds::new(
            self.south + d_lat,
            self.west + d_lng,
            self.north + d_lat,
            self.east + d_lng,
        )
    }

    /// Corners in order south-west, south-east, north-west, north-east
    pub fn corners(&self) -> [GeoPoint; 4] {
        [
            GeoPoint::new(self.south, self.west),
            GeoPoint::new(self.south, self.east),
            GeoPoint::new(self.north, self.west),
            GeoPoint::new(self.north, self.east),
        ]
    }
}

impl fmt::Display for GeoBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "S{:.6} W{:.6} N{:.6} E{:.6}",
            self.south, self.west, self.north, self.east
        )
    }
}

/// Placement defaults
#[derive(Debug, Clone)]
pub struct PlacementConfig {
    /// Real-world length given to the longer side of a freshly attached plan
    pub default_span_meters: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            default_span_meters: 100.0,
        }
    }
}

/// Where a plan sits on the map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeographicPlacement {
    pub bounds: GeoBounds,
    /// Clockwise rotation in degrees; cumulative, never wrapped
    pub rotation: f64,
    /// Width of the plan in drawing units (or pixels for raster plans)
    pub intrinsic_width: f64,
    /// Height of the plan in drawing units (or pixels for raster plans)
    pub intrinsic_height: f64,
}

impl GeographicPlacement {
    /// Default placement for a newly attached plan.
    ///
    /// The longer intrinsic side spans `default_span_meters`, the shorter
    /// side follows the aspect ratio, centered on `center`.
    pub fn initial(
        intrinsic_width: f64,
        intrinsic_height: f64,
        center: GeoPoint,
        config: &PlacementConfig,
    ) -> Result<Self, PlacementError> {
        let aspect = intrinsic_width / intrinsic_height;
        if !aspect.is_finite() || aspect <= 0.0 {
            return Err(PlacementError::InvalidAspect(aspect));
        }

        let span = config.default_span_meters;
        let (width_m, height_m) = if aspect >= 1.0 {
            (span, span / aspect)
        } else {
            (span * aspect, span)
        };

        Ok(GeographicPlacement {
            bounds: GeoBounds::from_center_size(center, width_m, height_m)?,
            rotation: 0.0,
            intrinsic_width,
            intrinsic_height,
        })
    }

    /// Intrinsic width over height
    pub fn aspect_ratio(&self) -> f64 {
        self.intrinsic_width / self.intrinsic_height
    }
}
