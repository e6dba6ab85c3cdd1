//! Coordinate reference systems and the transforms between them.
//!
//! Every supported system converts to and from geographic longitude/latitude
//! in degrees, so reprojection always passes through the geographic frame:
//! source -> lon/lat -> target. Transverse Mercator uses the USGS series
//! expansion (Snyder, *Map Projections: A Working Manual*, 1987), which is
//! accurate to well under a millimetre inside a UTM zone.
//!
//! The NAD83 and WGS 84 datums differ by less than two metres across North
//! America. That offset is far below any buffer radius used for scoring, so
//! the datum shift is treated as the identity and only the ellipsoid differs.

use std::fmt;
use std::str::FromStr;

use geo::Coord;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::LayerKind;

const SEMI_MAJOR_AXIS: f64 = 6_378_137.0;
const WGS84_INVERSE_FLATTENING: f64 = 298.257_223_563;
const GRS80_INVERSE_FLATTENING: f64 = 298.257_222_101;
const UTM_SCALE: f64 = 0.9996;
const UTM_FALSE_EASTING: f64 = 500_000.0;
const UTM_FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;
const MAX_UTM_ZONE: u8 = 60;
const OGC_EPSG_URN: &str = "URN:OGC:DEF:CRS:EPSG:";

/// Planar frame covering the New York / New Jersey study region
/// (NAD83 / UTM zone 18N, EPSG:26918).
pub const DEFAULT_TARGET_CRS: Crs = Crs::Nad83Utm {
    zone: UtmZone(18),
};

/// A validated UTM zone number in `1..=60`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UtmZone(u8);

impl UtmZone {
    /// Return the zone when `zone` lies in `1..=60`.
    #[must_use]
    pub const fn new(zone: u8) -> Option<Self> {
        if zone >= 1 && zone <= MAX_UTM_ZONE {
            Some(Self(zone))
        } else {
            None
        }
    }

    /// Zone number.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Longitude of the zone's central meridian in degrees.
    #[must_use]
    pub fn central_meridian(self) -> f64 {
        f64::from(self.0) * 6.0 - 183.0
    }
}

/// Hemisphere of a UTM zone, which selects the false northing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hemisphere {
    /// Northern hemisphere (false northing 0 m).
    North,
    /// Southern hemisphere (false northing 10 000 000 m).
    South,
}

/// Reference systems understood by the scoring engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Crs {
    /// WGS 84 longitude/latitude (EPSG:4326, `OGC:CRS84`).
    Wgs84,
    /// NAD83 longitude/latitude (EPSG:4269).
    Nad83,
    /// Spherical Web Mercator (EPSG:3857).
    WebMercator,
    /// WGS 84 / UTM (EPSG:326zz north, EPSG:327zz south).
    WgsUtm {
        /// UTM zone.
        zone: UtmZone,
        /// Hemisphere of the zone.
        hemisphere: Hemisphere,
    },
    /// NAD83 / UTM north (EPSG:269zz, zones 1 to 23).
    Nad83Utm {
        /// UTM zone.
        zone: UtmZone,
    },
}

/// Errors raised when a reference system is missing, unknown, or unusable.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProjectionError {
    /// A layer carries no reference system at all.
    #[error("the {layer} layer has no coordinate reference system")]
    Undefined {
        /// Layer lacking a reference system.
        layer: LayerKind,
    },
    /// The EPSG code is not one of the supported systems.
    #[error("EPSG:{code} is not a supported coordinate reference system")]
    Unsupported {
        /// Offending EPSG code.
        code: u32,
    },
    /// A textual reference system could not be interpreted.
    #[error("cannot interpret {value:?} as a coordinate reference system")]
    Unparseable {
        /// Text that failed to parse.
        value: String,
    },
    /// The scoring frame must be projected and measured in metres.
    #[error("{crs} is not a planar metric reference system")]
    NotPlanar {
        /// Rejected target system.
        crs: Crs,
    },
    /// Reprojection produced NaN or infinite coordinates.
    #[error("reprojecting the {layer} layer from {from} to {to} produced non-finite coordinates")]
    NonFinite {
        /// Layer being reprojected.
        layer: LayerKind,
        /// Source system.
        from: Crs,
        /// Target system.
        to: Crs,
    },
}

impl Crs {
    /// Resolve an EPSG code.
    ///
    /// # Errors
    /// Returns [`ProjectionError::Unsupported`] for codes outside the
    /// supported set.
    pub fn from_epsg(code: u32) -> Result<Self, ProjectionError> {
        let zone_of = |offset: u32| {
            u8::try_from(code - offset)
                .ok()
                .and_then(UtmZone::new)
                .ok_or(ProjectionError::Unsupported { code })
        };
        match code {
            4326 => Ok(Self::Wgs84),
            4269 => Ok(Self::Nad83),
            3857 => Ok(Self::WebMercator),
            32601..=32660 => Ok(Self::WgsUtm {
                zone: zone_of(32_600)?,
                hemisphere: Hemisphere::North,
            }),
            32701..=32760 => Ok(Self::WgsUtm {
                zone: zone_of(32_700)?,
                hemisphere: Hemisphere::South,
            }),
            26901..=26923 => Ok(Self::Nad83Utm {
                zone: zone_of(26_900)?,
            }),
            _ => Err(ProjectionError::Unsupported { code }),
        }
    }

    /// EPSG code of this system.
    #[must_use]
    pub fn epsg(self) -> u32 {
        match self {
            Self::Wgs84 => 4326,
            Self::Nad83 => 4269,
            Self::WebMercator => 3857,
            Self::WgsUtm {
                zone,
                hemisphere: Hemisphere::North,
            } => 32_600 + u32::from(zone.get()),
            Self::WgsUtm {
                zone,
                hemisphere: Hemisphere::South,
            } => 32_700 + u32::from(zone.get()),
            Self::Nad83Utm { zone } => 26_900 + u32::from(zone.get()),
        }
    }

    /// OGC URN spelling, as written into GeoJSON `crs` members.
    #[must_use]
    pub fn urn(self) -> String {
        format!("urn:ogc:def:crs:EPSG::{}", self.epsg())
    }

    /// Whether distances and areas in this system are planar metres.
    ///
    /// Web Mercator units are nominal metres that stretch with latitude, so
    /// only the UTM systems qualify.
    #[must_use]
    pub const fn is_planar_metric(self) -> bool {
        matches!(self, Self::WgsUtm { .. } | Self::Nad83Utm { .. })
    }

    /// Transform `coord` from this system into `target`.
    ///
    /// Identical systems return the coordinate untouched.
    #[must_use]
    pub fn transform(self, target: Self, coord: Coord<f64>) -> Coord<f64> {
        if self == target {
            return coord;
        }
        target.from_geographic(self.to_geographic(coord))
    }

    /// Convert a coordinate in this system to longitude/latitude degrees.
    #[must_use]
    pub fn to_geographic(self, coord: Coord<f64>) -> Coord<f64> {
        match self {
            Self::Wgs84 | Self::Nad83 => coord,
            Self::WebMercator => web_mercator_inverse(coord),
            Self::WgsUtm { zone, hemisphere } => {
                TransverseMercator::utm(WGS84_INVERSE_FLATTENING, zone, hemisphere).inverse(coord)
            }
            Self::Nad83Utm { zone } => {
                TransverseMercator::utm(GRS80_INVERSE_FLATTENING, zone, Hemisphere::North)
                    .inverse(coord)
            }
        }
    }

    /// Convert longitude/latitude degrees into this system.
    #[must_use]
    pub fn from_geographic(self, coord: Coord<f64>) -> Coord<f64> {
        match self {
            Self::Wgs84 | Self::Nad83 => coord,
            Self::WebMercator => web_mercator_forward(coord),
            Self::WgsUtm { zone, hemisphere } => {
                TransverseMercator::utm(WGS84_INVERSE_FLATTENING, zone, hemisphere).forward(coord)
            }
            Self::Nad83Utm { zone } => {
                TransverseMercator::utm(GRS80_INVERSE_FLATTENING, zone, Hemisphere::North)
                    .forward(coord)
            }
        }
    }
}

impl Default for Crs {
    fn default() -> Self {
        DEFAULT_TARGET_CRS
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

impl FromStr for Crs {
    type Err = ProjectionError;

    /// Accepts `EPSG:n`, `urn:ogc:def:crs:EPSG::n` (optionally versioned),
    /// `urn:ogc:def:crs:OGC:1.3:CRS84`, `CRS84`, or a bare integer code.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let upper = value.trim().to_ascii_uppercase();
        if upper == "CRS84" || upper.ends_with(":CRS84") {
            return Ok(Self::Wgs84);
        }
        let code_text = if upper.starts_with(OGC_EPSG_URN) {
            upper.rsplit(':').next().unwrap_or_default()
        } else {
            upper.strip_prefix("EPSG:").unwrap_or(upper.as_str())
        };
        let code = code_text
            .trim()
            .parse::<u32>()
            .map_err(|_| ProjectionError::Unparseable {
                value: value.to_owned(),
            })?;
        Self::from_epsg(code)
    }
}

#[cfg(feature = "serde")]
impl Serialize for Crs {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Crs {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

fn web_mercator_forward(coord: Coord<f64>) -> Coord<f64> {
    let lat = coord.y.to_radians();
    Coord {
        x: SEMI_MAJOR_AXIS * coord.x.to_radians(),
        y: SEMI_MAJOR_AXIS * (std::f64::consts::FRAC_PI_4 + lat / 2.0).tan().ln(),
    }
}

fn web_mercator_inverse(coord: Coord<f64>) -> Coord<f64> {
    let lat = 2.0 * (coord.y / SEMI_MAJOR_AXIS).exp().atan() - std::f64::consts::FRAC_PI_2;
    Coord {
        x: (coord.x / SEMI_MAJOR_AXIS).to_degrees(),
        y: lat.to_degrees(),
    }
}

/// Ellipsoidal transverse Mercator with a latitude of origin at the equator.
struct TransverseMercator {
    a: f64,
    e2: f64,
    ep2: f64,
    central_meridian: f64,
    scale: f64,
    false_easting: f64,
    false_northing: f64,
}

impl TransverseMercator {
    fn utm(inverse_flattening: f64, zone: UtmZone, hemisphere: Hemisphere) -> Self {
        let f = 1.0 / inverse_flattening;
        let e2 = f * (2.0 - f);
        Self {
            a: SEMI_MAJOR_AXIS,
            e2,
            ep2: e2 / (1.0 - e2),
            central_meridian: zone.central_meridian(),
            scale: UTM_SCALE,
            false_easting: UTM_FALSE_EASTING,
            false_northing: match hemisphere {
                Hemisphere::North => 0.0,
                Hemisphere::South => UTM_FALSE_NORTHING_SOUTH,
            },
        }
    }

    /// Distance along the central meridian from the equator to `phi`.
    fn meridional_arc(&self, phi: f64) -> f64 {
        let e2 = self.e2;
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        self.a
            * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
                - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
                + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
                - (35.0 * e6 / 3072.0) * (6.0 * phi).sin())
    }

    fn forward(&self, geographic: Coord<f64>) -> Coord<f64> {
        let phi = geographic.y.to_radians();
        let (sin_phi, cos_phi) = phi.sin_cos();
        let tan_phi = phi.tan();
        let n = self.a / (1.0 - self.e2 * sin_phi * sin_phi).sqrt();
        let t = tan_phi * tan_phi;
        let c = self.ep2 * cos_phi * cos_phi;
        let a = (geographic.x - self.central_meridian).to_radians() * cos_phi;
        let m = self.meridional_arc(phi);

        let x = self.scale
            * n
            * (a + (1.0 - t + c) * a.powi(3) / 6.0
                + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * self.ep2) * a.powi(5) / 120.0);
        let y = self.scale
            * (m + n
                * tan_phi
                * (a * a / 2.0
                    + (5.0 - t + 9.0 * c + 4.0 * c * c) * a.powi(4) / 24.0
                    + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * self.ep2) * a.powi(6)
                        / 720.0));
        Coord {
            x: x + self.false_easting,
            y: y + self.false_northing,
        }
    }

    fn inverse(&self, projected: Coord<f64>) -> Coord<f64> {
        let e2 = self.e2;
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        let m = (projected.y - self.false_northing) / self.scale;
        let mu = m / (self.a * (1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0));
        let root = (1.0 - e2).sqrt();
        let e1 = (1.0 - root) / (1.0 + root);
        let phi1 = mu
            + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
            + (21.0 * e1 * e1 / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
            + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
            + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

        let (sin_phi1, cos_phi1) = phi1.sin_cos();
        let tan_phi1 = phi1.tan();
        let c1 = self.ep2 * cos_phi1 * cos_phi1;
        let t1 = tan_phi1 * tan_phi1;
        let denom = 1.0 - e2 * sin_phi1 * sin_phi1;
        let n1 = self.a / denom.sqrt();
        let r1 = self.a * (1.0 - e2) / denom.powf(1.5);
        let d = (projected.x - self.false_easting) / (n1 * self.scale);

        let phi = phi1
            - (n1 * tan_phi1 / r1)
                * (d * d / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * self.ep2) * d.powi(4)
                        / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1
                        - 252.0 * self.ep2
                        - 3.0 * c1 * c1)
                        * d.powi(6)
                        / 720.0);
        let lambda = (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * self.ep2 + 24.0 * t1 * t1)
                * d.powi(5)
                / 120.0)
            / cos_phi1;

        Coord {
            x: self.central_meridian + lambda.to_degrees(),
            y: phi.to_degrees(),
        }
    }
}
