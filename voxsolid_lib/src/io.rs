//! Convenience functions for importing and exporting volumes and meshes
//!
//! This module is only available if the `io` feature of the crate is enabled.
//! The CLI frontend is built on top of these functions, but they are kept in the library
//! so that custom pipelines can reuse the file formats.

pub mod off_format;
pub mod vol_format;
