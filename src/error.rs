/*

    Error kinds raised by model access, transform building
    and the bounding box search. Geometry defects are data
    problems, not transient faults, so none of these are
    retried anywhere, they propagate to the caller as is.

    @date: 16 Dec, 2025
    @author: Bartu
*/

use crate::numeric::Vector3;

#[derive(Debug, Clone, thiserror::Error)]
pub enum BBoxError {
    #[error("Entity #{0} not found in model")]
    UnknownEntity(usize),

    #[error("Entity #{id} is not {expected}")]
    EntityKindMismatch { id: usize, expected: &'static str },

    #[error("Placement #{id} is malformed: {reason}")]
    InvalidPlacement { id: usize, reason: &'static str },

    #[error("Placement #{id} axes do not span a frame")]
    DegeneratePlacement { id: usize },

    #[error("Transform of part #{id} is not invertible")]
    SingularTransform { id: usize },

    #[error("Part #{part} has a non-finite vertex {point}")]
    InvalidPoint { part: usize, point: Vector3 },

    #[error("Assembly #{id} '{name}' has no usable solid geometry")]
    NoGeometry { id: usize, name: String },
}
