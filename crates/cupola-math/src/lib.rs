//! Spatial primitives shared by the camera and mission crates: geodesic
//! projection onto the planet sphere, the tunnel bounding box, and the
//! yaw/pitch/roll camera orientation.

mod bounds;
pub mod geo;
mod orientation;

pub use bounds::TunnelBounds;
pub use geo::{GeoPoint, region_name, to_cartesian, to_geo};
pub use orientation::{Orientation, wrap_angle};
