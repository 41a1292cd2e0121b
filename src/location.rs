use std::num::NonZero;

use ndarray::Ix;

/// A cell coordinate.
pub type Coord = usize;
/// One board dimension.
pub type Dimension = NonZero<Coord>;

/// A cell position on a board, in `(x, y)` order.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Location(pub Coord, pub Coord);

impl Location {
    pub(crate) fn as_index(&self) -> (Coord, Coord) {
        (self.1, self.0)
    }

    /// Steps by the given offset. Underflow wraps around, so out-of-bounds
    /// results stay detectable by an ordinary bounds check.
    pub fn offset_by(self, rhs: (isize, isize)) -> Self {
        Self(
            self.0.wrapping_add_signed(rhs.0),
            self.1.wrapping_add_signed(rhs.1),
        )
    }
}

impl From<(Ix, Ix)> for Location {
    fn from(value: (Ix, Ix)) -> Self {
        Self(value.1, value.0)
    }
}
