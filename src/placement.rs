/*

    Local placement of a part: an origin plus two axis
    vectors (Axis = local Z, RefDirection = local X) spanning
    a right-handed frame relative to the parent frame.

    to_transform( ) turns the record into a 4x4 homogeneous
    matrix = translation(origin) * rotation([X, Y, Z]) where
    Y = Z x X, i.e. local coordinates are rotated first and
    then shifted onto the origin.

    @date: 18 Dec, 2025
    @author: Bartu
*/

use crate::json_parser::{deser_usize, deser_opt_vec3};
use crate::prelude::*;

pub const AXIS_PLACEMENT_3D: &str = "axis-placement-3d";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlacementRecord {
    #[serde(rename = "_id", deserialize_with = "deser_usize")]
    pub _id: usize,

    #[serde(rename = "_type")]
    pub _type: String,

    #[serde(rename = "Location", deserialize_with = "deser_opt_vec3")]
    pub location: Option<Vector3>,

    #[serde(rename = "Axis", deserialize_with = "deser_opt_vec3")]
    pub axis: Option<Vector3>,

    #[serde(rename = "RefDirection", deserialize_with = "deser_opt_vec3")]
    pub ref_direction: Option<Vector3>,
}

impl Default for PlacementRecord {
    fn default() -> Self {
        // A record that omits _type is taken as an axis placement,
        // only an explicitly different tag is rejected.
        Self {
            _id: 0,
            _type: String::from(AXIS_PLACEMENT_3D),
            location: None,
            axis: None,
            ref_direction: None,
        }
    }
}

impl PlacementRecord {

    pub fn axis3d(location: Vector3, axis: Vector3, ref_direction: Vector3) -> Self {
        Self {
            location: Some(location),
            axis: Some(axis),
            ref_direction: Some(ref_direction),
            ..Self::default()
        }
    }

    /// Build the local-to-parent homogeneous transform.
    ///
    /// The columns are orthonormalized (Z from Axis, Y from Z x X,
    /// X completing the right-handed frame) so the rotation block
    /// is rigid even when the two input vectors are not exactly
    /// unit length or perpendicular. `epsilon` bounds the squared
    /// norms below which the frame counts as degenerate.
    pub fn to_transform(&self, epsilon: Float) -> Result<Matrix4, BBoxError> {

        if self._type != AXIS_PLACEMENT_3D {
            return Err(BBoxError::InvalidPlacement {
                id: self._id,
                reason: "kind tag is not an axis placement",
            });
        }

        let location = self.location.ok_or(BBoxError::InvalidPlacement {
            id: self._id,
            reason: "missing Location",
        })?;
        let axis = self.axis.ok_or(BBoxError::InvalidPlacement {
            id: self._id,
            reason: "missing Axis",
        })?;
        let ref_direction = self.ref_direction.ok_or(BBoxError::InvalidPlacement {
            id: self._id,
            reason: "missing RefDirection",
        })?;

        if !location.is_finite() || !axis.is_finite() || !ref_direction.is_finite() {
            return Err(BBoxError::InvalidPlacement {
                id: self._id,
                reason: "non-finite placement coordinates",
            });
        }

        if axis.length_squared() < epsilon || ref_direction.length_squared() < epsilon {
            return Err(BBoxError::DegeneratePlacement { id: self._id });
        }

        // Y axis to relative axes; vanishes when Axis and RefDirection are parallel
        let y_raw = axis.cross(ref_direction);
        if y_raw.length_squared() < epsilon {
            return Err(BBoxError::DegeneratePlacement { id: self._id });
        }

        let z = axis.normalize();
        let y = y_raw.normalize();
        let x = y.cross(z);

        let rotation = Matrix4::from_mat3(Matrix3::from_cols(x, y, z));
        Ok(Matrix4::from_translation(location) * rotation)
    }
}
