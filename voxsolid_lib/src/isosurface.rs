//! Isosurface extraction from signed distance volumes

use fast_surface_nets::ndshape::RuntimeShape;
use fast_surface_nets::{surface_nets, SurfaceNetsBuffer};
use log::info;
use nalgebra::Vector3;
use thiserror::Error as ThisError;

use crate::mesh::TriMesh3d;
use crate::volume::VoxelVolume;

/// Error type returned when isosurface extraction fails
#[derive(Clone, Eq, PartialEq, Debug, ThisError)]
pub enum IsosurfaceError {
    /// The volume does not contain at least one full cell per axis
    #[error("invalid grid shape {0:?}, isosurface extraction needs at least two samples per axis")]
    GridTooSmall([usize; 3]),
    /// The extents of the volume overflow the index type of the extraction backend
    #[error("grid shape {0:?} cannot be represented by the index type of the extraction backend")]
    IndexTypeTooSmall([usize; 3]),
}

/// Extracts the isosurface of the given scalar volume at the given iso level
///
/// The volume is interpreted as a signed distance sampling with negative values inside the
/// surface. Vertex coordinates of the output mesh are in voxel space, i.e. sample `[z, y, x]`
/// corresponds to the point `(x, y, z)`, so vertices lie inside `[0, W-1] x [0, H-1] x [0, D-1]`.
pub fn extract_isosurface(
    volume: &VoxelVolume<f32>,
    iso_level: f32,
) -> Result<TriMesh3d<f32>, IsosurfaceError> {
    let dims = volume.dims();
    let [d, h, w] = dims;
    if d < 2 || h < 2 || w < 2 {
        return Err(IsosurfaceError::GridTooSmall(dims));
    }
    let [d_u32, h_u32, w_u32] = volume
        .dims_as::<u32>()
        .ok_or(IsosurfaceError::IndexTypeTooSmall(dims))?;

    // The extraction backend works on the zero level set, other levels are shifted onto it
    let shifted_samples: Vec<f32>;
    let samples: &[f32] = if iso_level != 0.0 {
        shifted_samples = volume.data().iter().map(|&s| s - iso_level).collect();
        &shifted_samples
    } else {
        volume.data()
    };

    // The backend linearizes x-fastest, matching the volume layout for shape (W, H, D)
    let shape = RuntimeShape::<u32, 3>::new([w_u32, h_u32, d_u32]);
    let mut buffer = SurfaceNetsBuffer::default();
    surface_nets(
        samples,
        &shape,
        [0; 3],
        [w_u32 - 1, h_u32 - 1, d_u32 - 1],
        &mut buffer,
    );

    info!(
        "Extracted isosurface at level {} with {} vertices and {} triangles",
        iso_level,
        buffer.positions.len(),
        buffer.indices.len() / 3
    );

    let vertices = buffer
        .positions
        .iter()
        .map(|&[x, y, z]| Vector3::new(x, y, z))
        .collect();
    let triangles = buffer
        .indices
        .chunks_exact(3)
        .map(|tri| [tri[0] as usize, tri[1] as usize, tri[2] as usize])
        .collect();

    Ok(TriMesh3d {
        vertices,
        triangles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Analytic signed distance sampling of a sphere in voxel coordinates
    fn sphere_volume(dims: [usize; 3], center: Vector3<f32>, radius: f32) -> VoxelVolume<f32> {
        let mut volume = VoxelVolume::new_filled(dims, 0.0f32).unwrap();
        for z in 0..dims[0] {
            for y in 0..dims[1] {
                for x in 0..dims[2] {
                    let point = Vector3::new(x as f32, y as f32, z as f32);
                    volume.set([z, y, x], (point - center).norm() - radius);
                }
            }
        }
        volume
    }

    #[test]
    fn test_extract_rejects_small_grids() {
        let volume = VoxelVolume::new_filled([1, 8, 8], 0.0f32).unwrap();
        assert_eq!(
            extract_isosurface(&volume, 0.0),
            Err(IsosurfaceError::GridTooSmall([1, 8, 8]))
        );
    }

    #[test]
    fn test_extract_empty_volume() {
        // Positive everywhere: the level set is empty
        let volume = VoxelVolume::new_filled([8, 8, 8], 1.0f32).unwrap();
        let mesh = extract_isosurface(&volume, 0.0).unwrap();
        assert!(mesh.vertices.is_empty());
        assert!(mesh.triangles.is_empty());
    }

    #[test]
    fn test_extract_sphere() {
        let center = Vector3::repeat(7.5f32);
        let volume = sphere_volume([16, 16, 16], center, 5.0);
        let mesh = extract_isosurface(&volume, 0.0).unwrap();

        assert!(!mesh.triangles.is_empty());
        for tri in &mesh.triangles {
            assert!(tri.iter().all(|&i| i < mesh.vertices.len()));
        }
        // All vertices lie close to the sphere surface
        for vertex in &mesh.vertices {
            let radius = (vertex - center).norm();
            assert!((4.0..=6.0).contains(&radius), "vertex radius {}", radius);
        }
    }

    #[test]
    fn test_extract_level_shift() {
        // Extracting at a positive level grows the sphere by that level
        let center = Vector3::repeat(7.5f32);
        let volume = sphere_volume([16, 16, 16], center, 4.0);
        let mesh = extract_isosurface(&volume, 2.0).unwrap();

        assert!(!mesh.triangles.is_empty());
        for vertex in &mesh.vertices {
            let radius = (vertex - center).norm();
            assert!((5.0..=7.0).contains(&radius), "vertex radius {}", radius);
        }
    }
}
