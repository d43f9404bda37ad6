//! Dense 3D voxel volumes and their construction invariants

use thiserror::Error as ThisError;

use crate::Index;

/// A dense, owned 3D array of cell values
///
/// The volume stores one value per grid cell with extents `(D, H, W)` along the
/// `(z, y, x)` axes. Storage is z-major with x varying fastest, i.e. the flat
/// index of cell `[z, y, x]` is `(z * H + y) * W + x`.
#[derive(Clone, PartialEq, Debug)]
pub struct VoxelVolume<T> {
    /// Extents of the volume along the `(z, y, x)` axes
    dims: [usize; 3],
    /// Cell values in z-major, x-fastest order
    data: Vec<T>,
}

/// Error type for the construction of a [`VoxelVolume`]
#[derive(Clone, Eq, PartialEq, Debug, ThisError)]
pub enum VolumeError {
    /// The total number of cells of the volume overflows the platform index type
    #[error("total number of cells of a {0:?} volume cannot be represented by the index type")]
    IndexTypeTooSmall([usize; 3]),
    /// The flat data does not contain exactly one value per cell
    #[error("volume data has {data_len} elements but shape {dims:?} requires {expected}")]
    InvalidElementCount {
        dims: [usize; 3],
        data_len: usize,
        expected: usize,
    },
}

impl<T> VoxelVolume<T> {
    /// Constructs a volume of the given extents with every cell set to the given value
    pub fn new_filled(dims: [usize; 3], value: T) -> Result<Self, VolumeError>
    where
        T: Clone,
    {
        let num_cells = Self::checked_num_cells(dims)?;
        Ok(Self {
            dims,
            data: vec![value; num_cells],
        })
    }

    /// Constructs a volume of the given extents from flat cell data in z-major, x-fastest order
    pub fn from_vec(dims: [usize; 3], data: Vec<T>) -> Result<Self, VolumeError> {
        let num_cells = Self::checked_num_cells(dims)?;
        if data.len() != num_cells {
            return Err(VolumeError::InvalidElementCount {
                dims,
                data_len: data.len(),
                expected: num_cells,
            });
        }
        Ok(Self { dims, data })
    }

    fn checked_num_cells(dims: [usize; 3]) -> Result<usize, VolumeError> {
        dims[0]
            .checked_mul(dims[1])
            .and_then(|dh| dh.checked_mul(dims[2]))
            .ok_or(VolumeError::IndexTypeTooSmall(dims))
    }

    /// Returns the extents of the volume along the `(z, y, x)` axes
    #[inline(always)]
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    /// Tries to convert the extents of the volume to the given index type, returns `None` if any extent cannot be represented
    pub fn dims_as<I: Index>(&self) -> Option<[I; 3]> {
        Some([
            I::from_usize(self.dims[0])?,
            I::from_usize(self.dims[1])?,
            I::from_usize(self.dims[2])?,
        ])
    }

    /// Returns the total number of cells of the volume
    #[inline(always)]
    pub fn num_cells(&self) -> usize {
        self.data.len()
    }

    /// Returns whether the given `[z, y, x]` index triplet is inside the volume
    #[inline(always)]
    pub fn contains_index(&self, index: [usize; 3]) -> bool {
        index[0] < self.dims[0] && index[1] < self.dims[1] && index[2] < self.dims[2]
    }

    /// Returns whether the given cell lies on one of the six bounding faces of the volume
    #[inline(always)]
    pub fn is_boundary_index(&self, index: [usize; 3]) -> bool {
        index
            .iter()
            .zip(self.dims.iter())
            .any(|(&i, &n)| i == 0 || i + 1 == n)
    }

    /// Flattens a `[z, y, x]` index triplet into the flat cell index
    #[inline(always)]
    pub fn flatten_index(&self, index: [usize; 3]) -> usize {
        debug_assert!(self.contains_index(index));
        (index[0] * self.dims[1] + index[1]) * self.dims[2] + index[2]
    }

    /// Converts a flat cell index back into a `[z, y, x]` index triplet
    #[inline(always)]
    pub fn unflatten_index(&self, flat_index: usize) -> [usize; 3] {
        debug_assert!(flat_index < self.data.len());
        let x = flat_index % self.dims[2];
        let zy = flat_index / self.dims[2];
        [zy / self.dims[1], zy % self.dims[1], x]
    }

    /// Returns a reference to the value of the given cell, `None` if the index is out of bounds
    #[inline(always)]
    pub fn get(&self, index: [usize; 3]) -> Option<&T> {
        if self.contains_index(index) {
            self.data.get(self.flatten_index(index))
        } else {
            None
        }
    }

    /// Sets the value of the given cell, panics if the index is out of bounds
    #[inline(always)]
    pub fn set(&mut self, index: [usize; 3], value: T) {
        let flat_index = self.flatten_index(index);
        self.data[flat_index] = value;
    }

    /// Returns the flat cell data in z-major, x-fastest order
    #[inline(always)]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Returns the flat cell data mutably
    #[inline(always)]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consumes the volume and returns its flat cell data
    pub fn into_data(self) -> Vec<T> {
        self.data
    }
}
