//! Rasterization of triangle meshes into surface occupancy volumes

use log::info;
use rayon::prelude::*;
use thiserror::Error as ThisError;

use crate::mesh::TriMesh3d;
use crate::volume::VoxelVolume;
use crate::{Aabb3d, Real};

/// Error type returned when voxelization of a mesh fails
#[derive(Clone, Eq, PartialEq, Debug, ThisError)]
pub enum VoxelizeError {
    /// The target grid has a zero extent on at least one axis
    #[error("invalid grid shape {0:?}, every axis extent has to be at least one")]
    InvalidShape([usize; 3]),
    /// The target grid is too coarse to place distance samples on
    #[error("invalid grid shape {0:?}, distance sampling needs at least two cells per axis")]
    ShapeTooSmallForSampling([usize; 3]),
    /// The mesh contains no triangles, its bounding box is undefined
    #[error("mesh does not contain any triangles")]
    EmptyMesh,
}

/// Inclusive voxel index range covered by one triangle, ordered `(z, y, x)`
type CellRange = [(usize, usize); 3];

/// Rasterizes the surface of the given mesh into a `(D, H, W)` occupancy volume
///
/// Mesh coordinates are normalized by the mesh bounding box and its largest extent, so the
/// mesh is mapped aspect-preserving into the grid. Every voxel overlapped by the bounding
/// box of a (normalized) triangle is stamped with `1`; all other cells stay `0`. This
/// yields a conservative surface shell suitable as input for interior segmentation.
pub fn voxelize_surface<R: Real>(
    mesh: &TriMesh3d<R>,
    dims: [usize; 3],
) -> Result<VoxelVolume<u8>, VoxelizeError> {
    let [d, h, w] = dims;
    if d < 1 || h < 1 || w < 1 {
        return Err(VoxelizeError::InvalidShape(dims));
    }
    if mesh.triangles.is_empty() {
        return Err(VoxelizeError::EmptyMesh);
    }

    info!(
        "Voxelizing surface of a mesh with {} triangles into a {}x{}x{} volume",
        mesh.triangles.len(),
        d,
        h,
        w
    );

    let aabb = Aabb3d::par_from_points(&mesh.vertices);
    let min = *aabb.min();
    let scale = uniform_scale(&aabb);

    // Per-triangle voxel ranges in normalized coordinates
    let cell_ranges: Vec<CellRange> = mesh
        .triangles
        .par_iter()
        .map(|&[i0, i1, i2]| {
            let v0 = (mesh.vertices[i0] - min) / scale;
            let v1 = (mesh.vertices[i1] - min) / scale;
            let v2 = (mesh.vertices[i2] - min) / scale;

            let tri_min = v0.inf(&v1).inf(&v2);
            let tri_max = v0.sup(&v1).sup(&v2);

            [
                grid_range(tri_min[2], tri_max[2], d),
                grid_range(tri_min[1], tri_max[1], h),
                grid_range(tri_min[0], tri_max[0], w),
            ]
        })
        .collect();

    // Stamp the ranges slice by slice, every z-slice is owned by exactly one task
    let mut volume = VoxelVolume::new_filled(dims, 0u8)
        .map_err(|_| VoxelizeError::InvalidShape(dims))?;
    volume
        .data_mut()
        .par_chunks_mut(h * w)
        .enumerate()
        .for_each(|(z, slice)| {
            for &[(z0, z1), (y0, y1), (x0, x1)] in &cell_ranges {
                if z < z0 || z > z1 {
                    continue;
                }
                for y in y0..=y1 {
                    slice[y * w + x0..=y * w + x1].fill(1);
                }
            }
        });

    Ok(volume)
}

/// Returns the largest extent of the AABB, or one for degenerate boxes
pub(crate) fn uniform_scale<R: Real>(aabb: &Aabb3d<R>) -> R {
    let max_extent = aabb.max_extent();
    if max_extent > R::zero() {
        max_extent
    } else {
        R::one()
    }
}

/// Maps a normalized `[0,1]` coordinate interval to the covered inclusive voxel index range
fn grid_range<R: Real>(min_v: R, max_v: R, n: usize) -> (usize, usize) {
    let n_minus_one = (n - 1) as i64;
    let scale = R::from_i64(n_minus_one).unwrap_or_else(R::zero);
    let lo = (min_v * scale)
        .floor()
        .to_index::<i64>()
        .unwrap_or(0)
        .clamp(0, n_minus_one) as usize;
    let hi = (max_v * scale)
        .ceil()
        .to_index::<i64>()
        .unwrap_or(n_minus_one)
        .clamp(0, n_minus_one) as usize;
    (lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flood_fill::fill_interior;
    use nalgebra::Vector3;

    /// Triangulated axis-aligned box between the two given corners
    pub(crate) fn box_mesh(min: Vector3<f32>, max: Vector3<f32>) -> TriMesh3d<f32> {
        let vertices = vec![
            Vector3::new(min.x, min.y, min.z),
            Vector3::new(max.x, min.y, min.z),
            Vector3::new(max.x, max.y, min.z),
            Vector3::new(min.x, max.y, min.z),
            Vector3::new(min.x, min.y, max.z),
            Vector3::new(max.x, min.y, max.z),
            Vector3::new(max.x, max.y, max.z),
            Vector3::new(min.x, max.y, max.z),
        ];
        let triangles = vec![
            [0, 2, 1], [0, 3, 2], // bottom
            [4, 5, 6], [4, 6, 7], // top
            [0, 1, 5], [0, 5, 4], // front
            [2, 3, 7], [2, 7, 6], // back
            [1, 2, 6], [1, 6, 5], // right
            [3, 0, 4], [3, 4, 7], // left
        ];
        TriMesh3d {
            vertices,
            triangles,
        }
    }

    #[test]
    fn test_grid_range() {
        assert_eq!(grid_range(0.0, 1.0, 8), (0, 7));
        assert_eq!(grid_range(0.5, 0.5, 9), (4, 4));
        assert_eq!(grid_range(-0.5, 1.5, 8), (0, 7));
        assert_eq!(grid_range(0.0, 0.0, 1), (0, 0));
    }

    #[test]
    fn test_voxelize_rejects_bad_input() {
        let mesh = box_mesh(Vector3::zeros(), Vector3::repeat(1.0));
        assert_eq!(
            voxelize_surface(&mesh, [0, 8, 8]),
            Err(VoxelizeError::InvalidShape([0, 8, 8]))
        );
        assert_eq!(
            voxelize_surface(&TriMesh3d::<f32>::default(), [8, 8, 8]),
            Err(VoxelizeError::EmptyMesh)
        );
    }

    #[test]
    fn test_voxelize_box_shell() {
        let mesh = box_mesh(Vector3::zeros(), Vector3::repeat(1.0));
        let volume = voxelize_surface(&mesh, [8, 8, 8]).unwrap();

        // The box spans the whole normalized domain: all outer faces are stamped
        assert_eq!(volume.get([0, 3, 3]), Some(&1));
        assert_eq!(volume.get([7, 3, 3]), Some(&1));
        assert_eq!(volume.get([3, 0, 3]), Some(&1));
        assert_eq!(volume.get([3, 3, 7]), Some(&1));
        // The inner region stays empty
        assert_eq!(volume.get([3, 3, 3]), Some(&0));

        // The shell is closed: interior segmentation turns the whole volume solid
        let mask = fill_interior(&volume).unwrap();
        assert!(mask.data().iter().all(|&m| m == 1));
    }
}
