//!
//! Library for turning voxelized surface meshes into solid occupancy volumes.
//!
//! The entry point of the library is the [`fill_interior`] function which segments the
//! empty space of a binary occupancy volume into exterior and enclosed cells using a
//! 6-connected flood fill seeded on the volume boundary. Around this core, the library
//! provides the companion stages of a typical solidification pipeline:
//!  - rasterization of a triangle mesh into a surface occupancy volume ([`voxelize_surface`])
//!  - sampling of a signed distance volume of a triangle mesh ([`sample_sdf`])
//!  - isosurface extraction from a signed distance volume ([`extract_isosurface`])
//!  - normalization of meshes into the unit cube ([`TriMesh3d::scale_to_unit_cube`])
//!
//! All volumes are dense `(D, H, W)` arrays with `(z, y, x)` index order and x varying
//! fastest, see [`VoxelVolume`].
//!
//! ## Feature flags
//!
//! - **`io`**: Enables the [`io`] module with import and export functions for the
//!   compressed volume container format and OFF surface meshes.
//!

mod aabb;
pub mod flood_fill;
#[cfg(feature = "io")]
pub mod io;
pub mod isosurface;
pub mod mesh;
mod numeric_types;
pub mod sdf;
pub mod topology;
pub mod volume;
pub mod voxelize;

pub use aabb::{Aabb3d, AxisAlignedBoundingBox};
pub use flood_fill::{fill_interior, SegmentationError};
pub use isosurface::{extract_isosurface, IsosurfaceError};
pub use mesh::TriMesh3d;
pub use numeric_types::{Index, Real, ThreadSafe};
pub use sdf::sample_sdf;
pub use volume::{VolumeError, VoxelVolume};
pub use voxelize::{voxelize_surface, VoxelizeError};

// Re-export the version of nalgebra used by this crate
pub use nalgebra;
