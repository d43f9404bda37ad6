//! Sampling of signed distance volumes from triangle meshes

use log::info;
use nalgebra::Vector3;
use rayon::prelude::*;

use crate::mesh::TriMesh3d;
use crate::volume::VoxelVolume;
use crate::voxelize::{uniform_scale, VoxelizeError};
use crate::{Aabb3d, Real};

/// Samples the signed distance field of the given mesh on a regular `(D, H, W)` grid
///
/// The sample lattice spans the mesh bounding box, uniformly scaled by the largest box
/// extent so the mesh aspect ratio is preserved. Sample `[z, y, x]` is placed at the grid
/// node `min + (x/(W-1), y/(H-1), z/(D-1)) * scale`; with `sample_at_cell_centers` enabled
/// every sample is additionally shifted by half a cell along all axes.
///
/// Each sample stores the Euclidean distance to the closest point on the mesh surface,
/// negated for samples inside the mesh. Containment is decided by parity of the
/// intersection count of a ray in positive x-direction, so the mesh has to be watertight
/// for the sign to be meaningful.
pub fn sample_sdf<R: Real>(
    mesh: &TriMesh3d<R>,
    dims: [usize; 3],
    sample_at_cell_centers: bool,
) -> Result<VoxelVolume<R>, VoxelizeError> {
    let [d, h, w] = dims;
    if d < 2 || h < 2 || w < 2 {
        return Err(VoxelizeError::ShapeTooSmallForSampling(dims));
    }
    if mesh.triangles.is_empty() {
        return Err(VoxelizeError::EmptyMesh);
    }

    info!(
        "Sampling signed distances of a mesh with {} triangles on a {}x{}x{} grid",
        mesh.triangles.len(),
        d,
        h,
        w
    );

    let aabb = Aabb3d::par_from_points(&mesh.vertices);
    let min = *aabb.min();
    let scale = uniform_scale(&aabb);

    let triangles: Vec<[Vector3<R>; 3]> = mesh
        .triangles
        .iter()
        .map(|&[i0, i1, i2]| [mesh.vertices[i0], mesh.vertices[i1], mesh.vertices[i2]])
        .collect();

    // Uniform scale makes all cells cubes with this edge length per axis divisor
    let steps = Vector3::new(
        scale / R::from_usize(w - 1).expect("grid extent has to be representable"),
        scale / R::from_usize(h - 1).expect("grid extent has to be representable"),
        scale / R::from_usize(d - 1).expect("grid extent has to be representable"),
    );
    let half = R::from_f64(0.5).expect("0.5 has to be representable");
    let offset = if sample_at_cell_centers {
        steps.scale(half)
    } else {
        Vector3::zeros()
    };

    let mut volume = VoxelVolume::new_filled(dims, R::zero())
        .map_err(|_| VoxelizeError::InvalidShape(dims))?;
    volume
        .data_mut()
        .par_chunks_mut(h * w)
        .enumerate()
        .for_each(|(z, slice)| {
            let pz = min[2] + steps[2] * R::from_usize(z).unwrap_or_else(R::zero) + offset[2];
            for y in 0..h {
                let py = min[1] + steps[1] * R::from_usize(y).unwrap_or_else(R::zero) + offset[1];
                for x in 0..w {
                    let px =
                        min[0] + steps[0] * R::from_usize(x).unwrap_or_else(R::zero) + offset[0];
                    let point = Vector3::new(px, py, pz);

                    let distance = triangles
                        .iter()
                        .map(|tri| point_triangle_distance(&point, tri))
                        .reduce(|a, b| if b < a { b } else { a })
                        .unwrap_or_else(R::zero);

                    let hits = triangles
                        .iter()
                        .filter(|tri| ray_hits_triangle(&point, tri))
                        .count();

                    slice[y * w + x] = if hits % 2 == 1 { -distance } else { distance };
                }
            }
        });

    Ok(volume)
}

/// Euclidean distance from a point to the closest point on a triangle
///
/// Case distinction over the Voronoi regions of the triangle (vertices, edges, face).
fn point_triangle_distance<R: Real>(p: &Vector3<R>, [a, b, c]: &[Vector3<R>; 3]) -> R {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;

    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    if d1 <= R::zero() && d2 <= R::zero() {
        return ap.norm();
    }

    let bp = p - b;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    if d3 >= R::zero() && d4 <= d3 {
        return bp.norm();
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= R::zero() && d1 >= R::zero() && d3 <= R::zero() {
        let v = d1 / (d1 - d3);
        return (p - (a + ab.scale(v))).norm();
    }

    let cp = p - c;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    if d6 >= R::zero() && d5 <= d6 {
        return cp.norm();
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= R::zero() && d2 >= R::zero() && d6 <= R::zero() {
        let w = d2 / (d2 - d6);
        return (p - (a + ac.scale(w))).norm();
    }

    let va = d3 * d6 - d5 * d4;
    if va <= R::zero() && (d4 - d3) >= R::zero() && (d5 - d6) >= R::zero() {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return (p - (b + (c - b).scale(w))).norm();
    }

    // Projection onto the face plane is inside the triangle
    let normal = ab.cross(&ac).normalize();
    ap.dot(&normal).abs()
}

/// Möller-Trumbore intersection test of a ray in positive x-direction against a triangle
fn ray_hits_triangle<R: Real>(origin: &Vector3<R>, [a, b, c]: &[Vector3<R>; 3]) -> bool {
    let eps = R::from_f64(1e-6).expect("epsilon has to be representable");
    let direction = Vector3::new(R::one(), R::zero(), R::zero());

    let edge1 = b - a;
    let edge2 = c - a;
    let h = direction.cross(&edge2);
    let det = edge1.dot(&h);
    if det.abs() < eps {
        // Ray is parallel to the triangle plane
        return false;
    }

    let inv_det = R::one() / det;
    let s = origin - a;
    let u = s.dot(&h) * inv_det;
    if u < R::zero() || u > R::one() {
        return false;
    }

    let q = s.cross(&edge1);
    let v = direction.dot(&q) * inv_det;
    if v < R::zero() || u + v > R::one() {
        return false;
    }

    let t = edge2.dot(&q) * inv_det;
    t > eps
}

#[cfg(test)]
mod tests {
    use super::*;

    fn box_mesh(min: Vector3<f32>, max: Vector3<f32>) -> TriMesh3d<f32> {
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
            [0, 2, 1], [0, 3, 2],
            [4, 5, 6], [4, 6, 7],
            [0, 1, 5], [0, 5, 4],
            [2, 3, 7], [2, 7, 6],
            [1, 2, 6], [1, 6, 5],
            [3, 0, 4], [3, 4, 7],
        ];
        TriMesh3d {
            vertices,
            triangles,
        }
    }

    #[test]
    fn test_point_triangle_distance() {
        let tri = [
            Vector3::new(0.0f64, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        ];

        // Face region, vertex region, edge region
        assert!((point_triangle_distance(&Vector3::new(0.25, 0.25, 1.0), &tri) - 1.0).abs() < 1e-12);
        assert!((point_triangle_distance(&Vector3::new(2.0, 0.0, 0.0), &tri) - 1.0).abs() < 1e-12);
        assert!((point_triangle_distance(&Vector3::new(0.5, -1.0, 0.0), &tri) - 1.0).abs() < 1e-12);
        assert!(
            (point_triangle_distance(&Vector3::new(-1.0, -1.0, 0.0), &tri) - 2.0f64.sqrt()).abs()
                < 1e-12
        );
        // On the triangle itself
        assert!(point_triangle_distance(&Vector3::new(0.25, 0.25, 0.0), &tri).abs() < 1e-12);
    }

    #[test]
    fn test_ray_triangle_intersection() {
        // Triangle in the x = 1 plane
        let tri = [
            Vector3::new(1.0f64, 0.0, 0.0),
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::new(1.0, 0.0, 1.0),
        ];

        assert!(ray_hits_triangle(&Vector3::new(0.0, 0.25, 0.25), &tri));
        // Triangle behind the ray origin
        assert!(!ray_hits_triangle(&Vector3::new(2.0, 0.25, 0.25), &tri));
        // Ray passes next to the triangle
        assert!(!ray_hits_triangle(&Vector3::new(0.0, 0.9, 0.9), &tri));
        // Ray parallel to the triangle plane
        let parallel_tri = [
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::new(0.0, 1.0, 1.0),
        ];
        assert!(!ray_hits_triangle(&Vector3::new(0.0, 0.0, 0.0), &parallel_tri));
    }

    #[test]
    fn test_sdf_rejects_bad_input() {
        let mesh = box_mesh(Vector3::zeros(), Vector3::repeat(1.0));
        assert_eq!(
            sample_sdf(&mesh, [1, 8, 8], false),
            Err(VoxelizeError::ShapeTooSmallForSampling([1, 8, 8]))
        );
        assert_eq!(
            sample_sdf(&TriMesh3d::<f32>::default(), [8, 8, 8], false),
            Err(VoxelizeError::EmptyMesh)
        );
    }

    #[test]
    fn test_sdf_unit_box_centers() {
        // The box spans the whole sample domain: the half-cell shift keeps all samples
        // with indices below the last lattice plane inside the box
        let mesh = box_mesh(Vector3::zeros(), Vector3::repeat(1.0));
        let sdf = sample_sdf(&mesh, [8, 8, 8], true).unwrap();

        for z in 0..7 {
            for y in 0..7 {
                for x in 0..7 {
                    assert!(*sdf.get([z, y, x]).unwrap() < 0.0, "sample {:?}", [z, y, x]);
                }
            }
        }
        // Sample [3, 3, 3] sits exactly at the box center, half a unit from every face
        assert!((sdf.get([3, 3, 3]).unwrap() + 0.5).abs() < 1e-4);
        // Samples on the last lattice plane are shifted past the box surface
        assert!((sdf.get([7, 3, 3]).unwrap() - 1.0 / 14.0).abs() < 1e-4);
    }

    #[test]
    fn test_sdf_slab_sign_change() {
        // A thin slab covers only the lower quarter of the (cubical) sample domain
        let mesh = box_mesh(Vector3::zeros(), Vector3::new(1.0, 1.0, 0.25));
        let sdf = sample_sdf(&mesh, [8, 8, 8], true).unwrap();

        let inside = *sdf.get([0, 3, 3]).unwrap();
        let outside = *sdf.get([7, 3, 3]).unwrap();
        assert!((inside + 1.0 / 14.0).abs() < 1e-4);
        assert!(outside > 0.5);
    }

    #[test]
    fn test_sdf_node_sampling_matches_lattice() {
        // Without cell centering the lattice spans the box exactly, so the sample in the
        // middle of the lattice lies in the mesh interior
        let mesh = box_mesh(Vector3::zeros(), Vector3::repeat(2.0));
        let sdf = sample_sdf(&mesh, [9, 9, 9], false).unwrap();
        assert!((sdf.get([4, 4, 4]).unwrap() + 1.0).abs() < 1e-4);
    }
}
