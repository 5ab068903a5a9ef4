mod region;
mod road;

pub use region::{RegionFeature, RegionSet};
pub use road::{RoadFeature, RoadSet};
