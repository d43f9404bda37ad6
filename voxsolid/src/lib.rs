//! The `voxsolid` voxel solidification CLI.
//!
//! The pipeline stages of the CLI (voxelization, interior segmentation, isosurface
//! extraction and mesh normalization) are provided by the [`voxsolid_lib`] crate.

pub mod cli;
mod extract;
mod fill;
mod logging;
mod normalize;
mod voxelize;
