use serde::Serialize;

use crate::error::{Error, Result};

/// A validated EPSG-coded coordinate reference system.
///
/// Values can only be built through [`Crs::from_epsg`], the named constants,
/// or [`Crs::utm`], all of which reject codes outside the supported table.
/// Holding a `Crs` therefore guarantees a PROJ.4 definition exists for it.
/// (No `Deserialize` on purpose: it would bypass that check.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Crs {
    epsg: u32,
}

impl Crs {
    /// WGS84 geographic lon/lat in degrees.
    pub const WGS84: Crs = Crs { epsg: 4326 };
    /// NAD83 geographic lon/lat in degrees.
    pub const NAD83: Crs = Crs { epsg: 4269 };
    /// ETRS89 Lambert Azimuthal Equal Area, meters. Default metric CRS.
    pub const ETRS89_LAEA: Crs = Crs { epsg: 3035 };
    /// World Cylindrical Equal Area, meters.
    pub const WORLD_CEA: Crs = Crs { epsg: 6933 };

    /// Build a `Crs` from an EPSG code, rejecting unknown codes.
    pub fn from_epsg(epsg: u32) -> Result<Crs> {
        let crs = Crs { epsg };
        crs.proj4()?; // membership check
        Ok(crs)
    }

    /// WGS84 UTM zone (326zz north / 327zz south).
    pub fn utm(zone: u8, north: bool) -> Result<Crs> {
        let base = if north { 32600 } else { 32700 };
        Crs::from_epsg(base + zone as u32)
    }

    /// Get the EPSG code.
    #[inline] pub fn epsg(&self) -> u32 { self.epsg }

    /// True for angular-unit (degree) systems, where lengths are meaningless.
    #[inline]
    pub fn is_geographic(&self) -> bool {
        matches!(self.epsg, 4326 | 4269)
    }

    /// True for linear-unit (meter) systems suitable for measurement.
    #[inline]
    pub fn is_projected(&self) -> bool {
        !self.is_geographic()
    }

    /// PROJ.4 definition string for this CRS.
    pub(crate) fn proj4(&self) -> Result<String> {
        let s = match self.epsg {
            4326 => "+proj=longlat +datum=WGS84 +no_defs +type=crs".to_string(),
            4269 => "+proj=longlat +datum=NAD83 +no_defs +type=crs".to_string(),
            3035 => "+proj=laea +lat_0=52 +lon_0=10 +x_0=4321000 +y_0=3210000 \
                     +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs +type=crs"
                .to_string(),
            6933 => "+proj=cea +lat_ts=30 +lon_0=0 +x_0=0 +y_0=0 +datum=WGS84 \
                     +units=m +no_defs +type=crs"
                .to_string(),
            z @ 32601..=32660 => {
                format!("+proj=utm +zone={} +datum=WGS84 +units=m +no_defs +type=crs", z - 32600)
            }
            z @ 32701..=32760 => {
                format!("+proj=utm +zone={} +south +datum=WGS84 +units=m +no_defs +type=crs", z - 32700)
            }
            epsg => return Err(Error::UnsupportedCrs { epsg }),
        };
        Ok(s)
    }
}
