/*

    Declare the materialized model document: assemblies made of
    sibling parts, each part carrying one local placement and
    zero or more polygonal faces (ordered vertex loops).

    This is the read-only handle the search works against. The
    core never mutates it and geometry absence is visible as an
    Option here instead of a fault raised somewhere downstream.

    @date: 20 Dec, 2025
    @author: Bartu
*/

use crate::json_parser::{deser_usize, deser_float, deser_vecvec3};
use crate::placement::PlacementRecord;
use crate::prelude::*;

pub const ELEMENT_ASSEMBLY: &str = "element-assembly";

// To handle JSON file having a single <object>
// or an array of <object>s
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum SingleOrVec<T> {
    Empty,
    Single(T),
    Multiple(Vec<T>),
}

impl<T> SingleOrVec<T> {
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        match self {
            SingleOrVec::Empty => [].iter(),
            SingleOrVec::Single(t) => std::slice::from_ref(t).iter(),
            SingleOrVec::Multiple(vec) => vec.iter(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SingleOrVec::Empty => 0,
            SingleOrVec::Single(_) => 1,
            SingleOrVec::Multiple(vec) => vec.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for SingleOrVec<T> {
    fn default() -> Self {
        SingleOrVec::Empty
    }
}


#[derive(Debug, Deserialize)]
pub struct RootModel {
    #[serde(rename = "Model")]
    pub model: Model,
}

#[derive(Debug, Deserialize, SmartDefault)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct Model {
    /// Squared-norm floor below which placement axes count as degenerate
    #[default = 1e-9]
    #[serde(deserialize_with = "deser_float")]
    pub degeneracy_epsilon: Float,

    #[serde(rename = "ElementAssembly")]
    pub assemblies: SingleOrVec<Assembly>,
}

impl Model {
    pub fn assembly_by_id(&self, id: usize) -> Result<&Assembly, BBoxError> {
        let assembly = self
            .assemblies
            .iter()
            .find(|a| a._id == id)
            .ok_or(BBoxError::UnknownEntity(id))?;

        if assembly._type != ELEMENT_ASSEMBLY {
            return Err(BBoxError::EntityKindMismatch {
                id,
                expected: ELEMENT_ASSEMBLY,
            });
        }
        Ok(assembly)
    }
}


#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Assembly {
    #[serde(rename = "_id", deserialize_with = "deser_usize")]
    pub _id: usize,

    #[serde(rename = "_name")]
    pub _name: String,

    #[serde(rename = "_type")]
    pub _type: String,

    #[serde(rename = "Part")]
    pub parts: SingleOrVec<Part>,
}

impl Default for Assembly {
    fn default() -> Self {
        // Like placements, an untagged record passes the kind check
        Self {
            _id: 0,
            _name: String::new(),
            _type: String::from(ELEMENT_ASSEMBLY),
            parts: SingleOrVec::Empty,
        }
    }
}


#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Part {
    #[serde(rename = "_id", deserialize_with = "deser_usize")]
    pub _id: usize,

    #[serde(rename = "_name")]
    pub _name: String,

    #[serde(rename = "Placement")]
    pub placement: PlacementRecord,

    #[serde(rename = "Face")]
    pub faces: SingleOrVec<Face>,
}

impl Part {
    /// Faces of the part's outer shell, or None when the part
    /// carries no solid geometry. Auxiliary parts without any
    /// surface are expected in real assemblies, so absence is
    /// not an error here.
    pub fn solid_faces(&self) -> Option<Vec<&Face>> {
        let faces: Vec<&Face> = self
            .faces
            .iter()
            .filter(|f| !f.bound.is_empty())
            .collect();
        (!faces.is_empty()).then_some(faces)
    }
}


#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Face {
    /// Ordered vertex loop bounding the face
    #[serde(rename = "Bound", deserialize_with = "deser_vecvec3")]
    pub bound: Vec<Vector3>,
}
