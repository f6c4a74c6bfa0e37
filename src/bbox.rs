/*

    Axis Aligned Bounding Box in min/max corner representation.

    The box is a fold over a stream of points: it starts at
    EMPTY (min at +inf, max at -inf) and absorbs points one by
    one. Absorbing is commutative and associative, so point
    batches can be folded on separate threads and combined
    with merge( ) afterwards.

    @author: bartu
    @date: 16 Dec, 2025
*/

use crate::numeric::{Float, Vector3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub min: Vector3,
    pub max: Vector3,
}

impl BBox {

    /// Identity of the point fold. Not a reportable box until
    /// at least one point is absorbed.
    pub const EMPTY: Self = Self {
        min: Vector3::INFINITY,
        max: Vector3::NEG_INFINITY,
    };

    pub fn new(min: Vector3, max: Vector3) -> Self {
        Self {
            min,
            max,
        }
    }

    pub fn validate(&self) -> bool {
        self.max.cmpge(self.min).all()
    }

    /// True while no point has been absorbed yet.
    pub fn is_empty(&self) -> bool {
        !self.validate()
    }

    /// Grow the box to contain the given point.
    pub fn expand(&mut self, point: Vector3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Combine two partial folds into one.
    pub fn merge(&self, other: &BBox) -> BBox {
        BBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn extents(&self) -> Vector3 {
        self.max - self.min
    }

    pub fn volume(&self) -> Float {
        debug_assert!(self.validate(), "Invalid bbox, found max < min");
        let dim = self.extents();
        dim.x * dim.y * dim.z
    }

}
