//! Helper types for cartesian coordinate system topology

use num_traits::{CheckedAdd, CheckedSub, One};

/// Direction on a number line/coordinate axis or identifiers for the end points of a line
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Direction {
    Negative = 0,
    Positive = 1,
}

/// Abbreviated type alias for cartesian coordinate axes in 3D
pub type Axis = CartesianAxis3d;

/// The cartesian coordinate axes in 3D
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum CartesianAxis3d {
    /// The x-axis
    X = 0,
    /// The y-axis
    Y = 1,
    /// The z-axis
    Z = 2,
}

/// Identifies a direction along a specific cartesian axis
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct DirectedAxis {
    pub axis: Axis,
    pub direction: Direction,
}

impl Direction {
    /// Returns a reference to an array containing all possible directions
    pub const fn all_possible() -> &'static [Direction; 2] {
        &ALL_DIRECTIONS
    }

    /// Returns the opposite direction
    pub const fn opposite(&self) -> Self {
        match self {
            Direction::Positive => Direction::Negative,
            Direction::Negative => Direction::Positive,
        }
    }

    /// Same as `apply_step` but uses `checked_add` and `checked_sub`, i.e. returns `None` on overflow
    /// ```
    /// use voxsolid_lib::topology::Direction;
    /// assert_eq!(Direction::Positive.checked_apply_step(27, 3), Some(30));
    /// assert_eq!(Direction::Negative.checked_apply_step(0 as u32, 10), None);
    /// ```
    #[inline(always)]
    pub fn checked_apply_step<N: CheckedAdd<Output = N> + CheckedSub<Output = N>>(
        &self,
        n: N,
        step: N,
    ) -> Option<N> {
        if self.is_positive() {
            n.checked_add(&step)
        } else {
            n.checked_sub(&step)
        }
    }

    /// Returns whether the direction is positive
    #[inline(always)]
    pub const fn is_positive(&self) -> bool {
        match self {
            Direction::Positive => true,
            Direction::Negative => false,
        }
    }

    /// Returns whether the direction is negative
    #[inline(always)]
    pub const fn is_negative(&self) -> bool {
        !self.is_positive()
    }
}

const ALL_DIRECTIONS: [Direction; 2] = [Direction::Negative, Direction::Positive];

impl CartesianAxis3d {
    /// Returns a reference to an array containing all 3D cartesian axes
    /// ```
    /// use voxsolid_lib::topology::Axis;
    /// assert_eq!(Axis::all_possible()[0], Axis::X);
    /// assert_eq!(Axis::all_possible().len(), 3);
    /// ```
    #[inline(always)]
    pub const fn all_possible() -> &'static [Axis; 3] {
        &ALL_AXES
    }

    /// Converts the cartesian axis into the corresponding 3D dimension index (X=0, Y=1, Z=2)
    #[inline(always)]
    pub const fn dim(self) -> usize {
        self as usize
    }

    /// Combines this coordinate axis with a direction into a DirectedAxis
    #[inline(always)]
    pub const fn with_direction(self, direction: Direction) -> DirectedAxis {
        DirectedAxis::new(self, direction)
    }
}

const ALL_AXES: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

impl DirectedAxis {
    /// Returns a reference to an array of all possible directed axes in 3D
    #[inline(always)]
    pub const fn all_possible() -> &'static [DirectedAxis; 6] {
        &ALL_DIRECTED_AXES
    }

    /// Constructs a new directed axis
    #[inline(always)]
    pub const fn new(axis: Axis, direction: Direction) -> Self {
        Self { axis, direction }
    }

    /// Returns a directed axis with the opposite direction
    #[inline(always)]
    pub const fn opposite(&self) -> Self {
        Self::new(self.axis, self.direction.opposite())
    }

    /// Converts the directed axis into a unique index in the range `(0..=5)`
    #[inline(always)]
    pub const fn to_usize(&self) -> usize {
        self.axis as usize + (self.direction as usize * 3)
    }

    /// Converts an index in the range `(0..=5)` to the corresponding directed axis, panics if the index is out of range
    #[inline(always)]
    pub const fn from_usize(n: usize) -> Self {
        Self::all_possible()[n]
    }

    /// Applies an increment of `1` in the direction of this directed axis to the given index array, returns `None` on overflow
    /// ```
    /// use voxsolid_lib::topology::{Axis, DirectedAxis, Direction};
    /// assert_eq!(DirectedAxis::new(Axis::X, Direction::Positive)
    ///                 .apply_single_step(&[1_usize, 2, 3]), Some([2, 2, 3]));
    /// assert_eq!(DirectedAxis::new(Axis::Z, Direction::Negative)
    ///                 .apply_single_step(&[1_usize, 2, 0]), None);
    /// ```
    #[inline(always)]
    pub fn apply_single_step<N: Clone + CheckedAdd<Output = N> + CheckedSub<Output = N> + One>(
        &self,
        index: &[N; 3],
    ) -> Option<[N; 3]> {
        self.checked_apply_step(index, N::one())
    }

    /// Applies the given step in the direction of this directed axis to the given index array, returns `None` on overflow
    #[inline(always)]
    pub fn checked_apply_step<N: Clone + CheckedAdd<Output = N> + CheckedSub<Output = N>>(
        &self,
        index: &[N; 3],
        step: N,
    ) -> Option<[N; 3]> {
        let mut index = index.clone();
        index[self.axis.dim()] = self
            .direction
            .checked_apply_step(index[self.axis.dim()].clone(), step)?;
        Some(index)
    }
}

const ALL_DIRECTED_AXES: [DirectedAxis; 6] = [
    DirectedAxis::new(Axis::X, Direction::Negative),
    DirectedAxis::new(Axis::Y, Direction::Negative),
    DirectedAxis::new(Axis::Z, Direction::Negative),
    DirectedAxis::new(Axis::X, Direction::Positive),
    DirectedAxis::new(Axis::Y, Direction::Positive),
    DirectedAxis::new(Axis::Z, Direction::Positive),
];

#[test]
fn test_directed_axis_usize_conversion() {
    for i in 0..6 {
        assert_eq!(DirectedAxis::from_usize(i).to_usize(), i);
    }
}

#[test]
fn test_directed_axis_all_possible_consistency() {
    let all_directed_axes = DirectedAxis::all_possible();
    for (i, ax) in all_directed_axes.iter().enumerate() {
        assert_eq!(ax.to_usize(), i);
        assert_eq!(*ax, DirectedAxis::from_usize(i));
        assert_eq!(ax.opposite().opposite(), *ax);
    }
}
