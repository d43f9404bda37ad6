//! Basic triangle mesh type used by the library and mesh normalization

use nalgebra::Vector3;

use crate::{Aabb3d, Real};

/// A triangle (surface) mesh in 3D
#[derive(Clone, Default, Debug, PartialEq)]
pub struct TriMesh3d<R: Real> {
    /// Coordinates of all vertices of the mesh
    pub vertices: Vec<Vector3<R>>,
    /// The triangles of the mesh identified by their vertex indices
    pub triangles: Vec<[usize; 3]>,
}

impl<R: Real> TriMesh3d<R> {
    /// Clears the vertex and triangle storage, preserves allocated memory
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.triangles.clear();
    }

    /// Appends the other mesh to this mesh, adjusting the vertex indices of the appended triangles
    pub fn append(&mut self, other: &mut TriMesh3d<R>) {
        let vertex_offset = self.vertices.len();
        self.vertices.append(&mut other.vertices);
        self.triangles.extend(
            other
                .triangles
                .drain(..)
                .map(|tri| [tri[0] + vertex_offset, tri[1] + vertex_offset, tri[2] + vertex_offset]),
        );
    }

    /// Returns the smallest AABB enclosing all vertices of the mesh
    pub fn bounding_box(&self) -> Aabb3d<R> {
        Aabb3d::from_points(&self.vertices)
    }

    /// Rescales the vertex coordinates affinely into the unit cube `[0,1]^3`
    ///
    /// The mesh is translated to the origin and divided by the largest extent of its
    /// bounding box, so the aspect ratio of the mesh is always preserved. With
    /// `pad_to_center` enabled the shorter axes are additionally centered inside the unit
    /// cube by symmetric padding; otherwise they remain anchored at the lower corner.
    ///
    /// A mesh with a degenerate bounding box (zero extent along its largest axis) is only
    /// translated, matching a unit divisor.
    pub fn scale_to_unit_cube(&mut self, pad_to_center: bool) {
        let aabb = self.bounding_box();
        let min = *aabb.min();

        let max_extent = aabb.max_extent();
        let scale = if max_extent > R::zero() {
            max_extent
        } else {
            R::one()
        };

        let padding = if pad_to_center {
            let half = R::from_f64(0.5).expect("0.5 has to be representable");
            (Vector3::repeat(scale) - aabb.extents()).scale(half / scale)
        } else {
            Vector3::zeros()
        };

        for vertex in &mut self.vertices {
            *vertex = (*vertex - min) / scale + padding;
        }
    }
}
