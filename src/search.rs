/*

    Given an assembly of sibling parts, find the reference
    frame minimizing the axis-aligned bounding box volume.

    Every part's own placement is tried as the candidate
    frame: all sibling vertices are re-expressed in that
    frame, folded into a box, and the candidate with the
    smallest volume wins. Candidates are independent, so
    they are evaluated in parallel and only the final
    minimum selection runs on one thread.

    @date: 22 Dec, 2025
    @author: Bartu
*/

use rayon::prelude::*;
use std::{self, time::Instant};

use crate::bbox::BBox;
use crate::model::{Assembly, Model, Part};
use crate::prelude::*;

#[derive(Debug, Clone)]
pub struct AssemblyResult {
    pub ref_id: usize,
    pub ref_name: String,
    pub bbox: BBox,
    pub dimensions: Vector3,
    pub volume: Float,
}

/// Look up the assembly in the model and search it.
pub fn find_assembly_bbox(model: &Model, assembly_id: usize, verbose: bool) -> Result<AssemblyResult, BBoxError> {
    let assembly = model.assembly_by_id(assembly_id)?;
    find_min_bbox(assembly, model.degeneracy_epsilon, verbose)
}

/// Search all candidate reference frames of one assembly.
pub fn find_min_bbox(assembly: &Assembly, epsilon: Float, verbose: bool) -> Result<AssemblyResult, BBoxError> {

    let start = Instant::now();
    let parts: Vec<&Part> = assembly.parts.iter().collect();
    if verbose {
        info!("ASSEMBLY: #{} '{}' with {} parts", assembly._id, assembly._name, parts.len());
    }

    // --- Rayon Multithreading ---
    let candidates: Vec<Option<BBox>> = parts
        .par_iter()
        .map(|ref_part| {
            if verbose {
                info!("REFERENCE: #{} '{}'", ref_part._id, ref_part._name);
            }
            evaluate_reference(&parts, ref_part, epsilon)
        })
        .collect::<Result<Vec<_>, BBoxError>>()?;
    // -----------------------------

    // Candidate order follows part-list order here, and the strict <
    // below keeps the earliest candidate on exact volume ties.
    let mut best: Option<AssemblyResult> = None;
    for (ref_part, bbox) in parts.iter().zip(candidates) {
        let Some(bbox) = bbox else { continue };

        let volume = bbox.volume();
        if best.as_ref().is_none_or(|b| volume < b.volume) {
            best = Some(AssemblyResult {
                ref_id: ref_part._id,
                ref_name: ref_part._name.clone(),
                dimensions: bbox.extents(),
                volume,
                bbox,
            });
        }
    }

    // A box that absorbed no point at all must not be reported
    let res = best.ok_or_else(|| BBoxError::NoGeometry {
        id: assembly._id,
        name: assembly._name.clone(),
    })?;

    if verbose {
        info!(
            "*** Minimum bbox:\n   Reference to #{} '{}'\n   Dimension: {}\n   Volume: {}\n   Bounding box: {} .. {}",
            res.ref_id, res.ref_name, res.dimensions, res.volume, res.bbox.min, res.bbox.max
        );
    }
    info!("Search over {} candidates took: {:?}", parts.len(), start.elapsed());
    Ok(res)
}

/// Fold every sibling vertex into a box measured in the candidate's
/// frame. None when no part contributed a single point.
fn evaluate_reference(parts: &[&Part], ref_part: &Part, epsilon: Float) -> Result<Option<BBox>, BBoxError> {

    // Candidate's local frame to the parent frame
    let ref_mat = ref_part.placement.to_transform(epsilon)?;
    if approx_zero(ref_mat.determinant()) {
        // Inverting a near-singular matrix silently yields garbage,
        // so refuse before inversion
        return Err(BBoxError::SingularTransform { id: ref_part._id });
    }
    let to_ref = ref_mat.inverse();

    let mut bbox = BBox::EMPTY;
    for part in parts {
        let Some(faces) = part.solid_faces() else {
            debug!("Part #{} '{}' has no solid geometry, skipping", part._id, part._name);
            continue;
        };

        // Part's local coordinates directly into the candidate's frame
        let rel_mat = to_ref * part.placement.to_transform(epsilon)?;

        for face in faces {
            for point in &face.bound {
                if !point.is_finite() {
                    return Err(BBoxError::InvalidPoint { part: part._id, point: *point });
                }
                bbox.expand(transform_point(&rel_mat, point));
            }
        }
    }

    Ok((!bbox.is_empty()).then_some(bbox))
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Face, SingleOrVec, ELEMENT_ASSEMBLY};
    use crate::placement::PlacementRecord;

    const EPS: Float = 1e-9;

    fn identity_placement_at(origin: Vector3) -> PlacementRecord {
        PlacementRecord::axis3d(origin, Vector3::new(0.0, 0.0, 1.0), Vector3::new(1.0, 0.0, 0.0))
    }

    // Six quad loops bounding the box [min, max]
    fn box_faces(min: Vector3, max: Vector3) -> SingleOrVec<Face> {
        let (a, b) = (min, max);
        let corners = |pts: [[Float; 3]; 4]| Face {
            bound: pts.iter().map(|p| Vector3::new(p[0], p[1], p[2])).collect(),
        };
        SingleOrVec::Multiple(vec![
            corners([[a.x, a.y, a.z], [b.x, a.y, a.z], [b.x, b.y, a.z], [a.x, b.y, a.z]]),
            corners([[a.x, a.y, b.z], [b.x, a.y, b.z], [b.x, b.y, b.z], [a.x, b.y, b.z]]),
            corners([[a.x, a.y, a.z], [b.x, a.y, a.z], [b.x, a.y, b.z], [a.x, a.y, b.z]]),
            corners([[a.x, b.y, a.z], [b.x, b.y, a.z], [b.x, b.y, b.z], [a.x, b.y, b.z]]),
            corners([[a.x, a.y, a.z], [a.x, b.y, a.z], [a.x, b.y, b.z], [a.x, a.y, b.z]]),
            corners([[b.x, a.y, a.z], [b.x, b.y, a.z], [b.x, b.y, b.z], [b.x, a.y, b.z]]),
        ])
    }

    fn solid_part(id: usize, name: &str, placement: PlacementRecord, min: Vector3, max: Vector3) -> Part {
        Part {
            _id: id,
            _name: name.into(),
            placement,
            faces: box_faces(min, max),
        }
    }

    fn empty_part(id: usize, name: &str, placement: PlacementRecord) -> Part {
        Part {
            _id: id,
            _name: name.into(),
            placement,
            faces: SingleOrVec::Empty,
        }
    }

    fn assembly_of(parts: Vec<Part>) -> Assembly {
        Assembly {
            _id: 100,
            _name: String::from("rig"),
            _type: String::from(ELEMENT_ASSEMBLY),
            parts: SingleOrVec::Multiple(parts),
        }
    }

    #[test]
    fn test_single_part_box_in_own_frame() {
        let half = Vector3::new(0.5, 0.5, 0.5);
        let assembly = assembly_of(vec![
            solid_part(1, "cube", identity_placement_at(Vector3::ZERO), -half, half),
            empty_part(2, "marker", identity_placement_at(Vector3::new(9.0, 9.0, 9.0))),
        ]);

        let res = find_min_bbox(&assembly, EPS, false).unwrap();
        assert_eq!(res.ref_id, 1);
        assert_eq!(res.bbox, BBox::new(-half, half));
        assert_eq!(res.dimensions, Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(res.volume, 1.0);
    }

    #[test]
    fn test_translated_sibling_covers_both() {
        let half = Vector3::new(0.5, 0.5, 0.5);
        let assembly = assembly_of(vec![
            solid_part(1, "cube-a", identity_placement_at(Vector3::ZERO), -half, half),
            solid_part(2, "cube-b", identity_placement_at(Vector3::new(5.0, 0.0, 0.0)), -half, half),
        ]);

        let res = find_min_bbox(&assembly, EPS, false).unwrap();
        // Both frames measure the same 6 x 1 x 1 box, so the
        // earlier part stays the reference
        assert_eq!(res.ref_id, 1);
        assert_eq!(res.volume, 6.0);
        assert_eq!(res.dimensions, Vector3::new(6.0, 1.0, 1.0));
        assert_eq!(res.bbox.min, Vector3::new(-0.5, -0.5, -0.5));
        assert_eq!(res.bbox.max, Vector3::new(5.5, 0.5, 0.5));
    }

    #[test]
    fn test_minimization_prefers_tighter_frame() {
        // A long slab is axis aligned in part 1's frame; part 2 is
        // rotated 45 degrees about Z, so measuring in its frame
        // inflates the box
        let assembly = assembly_of(vec![
            solid_part(
                1,
                "slab",
                identity_placement_at(Vector3::ZERO),
                Vector3::new(-2.0, -0.5, -0.5),
                Vector3::new(2.0, 0.5, 0.5),
            ),
            empty_part(
                2,
                "skewed-frame",
                PlacementRecord::axis3d(
                    Vector3::ZERO,
                    Vector3::new(0.0, 0.0, 1.0),
                    Vector3::new(1.0, 1.0, 0.0),
                ),
            ),
        ]);

        let res = find_min_bbox(&assembly, EPS, false).unwrap();
        assert_eq!(res.ref_id, 1);
        assert!(approx_zero(res.volume - 4.0));
    }

    #[test]
    fn test_equal_volumes_keep_first_candidate() {
        let half = Vector3::new(0.5, 0.5, 0.5);
        let assembly = assembly_of(vec![
            solid_part(7, "twin-a", identity_placement_at(Vector3::ZERO), -half, half),
            solid_part(8, "twin-b", identity_placement_at(Vector3::ZERO), -half, half),
        ]);

        let res = find_min_bbox(&assembly, EPS, false).unwrap();
        assert_eq!(res.ref_id, 7);
        assert_eq!(res.volume, 1.0);
    }

    #[test]
    fn test_no_geometry_is_an_error() {
        let assembly = assembly_of(vec![
            empty_part(1, "marker-a", identity_placement_at(Vector3::ZERO)),
            empty_part(2, "marker-b", identity_placement_at(Vector3::new(1.0, 0.0, 0.0))),
        ]);

        assert!(matches!(
            find_min_bbox(&assembly, EPS, false),
            Err(BBoxError::NoGeometry { id: 100, .. })
        ));
    }

    #[test]
    fn test_degenerate_placement_propagates() {
        let half = Vector3::new(0.5, 0.5, 0.5);
        let broken = PlacementRecord::axis3d(
            Vector3::ZERO,
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(0.0, 0.0, 4.0), // parallel to Axis
        );
        let assembly = assembly_of(vec![
            solid_part(1, "cube", identity_placement_at(Vector3::ZERO), -half, half),
            solid_part(2, "broken", broken, -half, half),
        ]);

        assert!(matches!(
            find_min_bbox(&assembly, EPS, false),
            Err(BBoxError::DegeneratePlacement { id: 0 })
        ));
    }

    #[test]
    fn test_nonfinite_vertex_is_rejected() {
        let part = Part {
            _id: 3,
            _name: String::from("bad-vertex"),
            placement: identity_placement_at(Vector3::ZERO),
            faces: SingleOrVec::Single(Face {
                bound: vec![Vector3::new(Float::NAN, 0.0, 0.0)],
            }),
        };
        let assembly = assembly_of(vec![part]);

        assert!(matches!(
            find_min_bbox(&assembly, EPS, false),
            Err(BBoxError::InvalidPoint { part: 3, .. })
        ));
    }

    #[test]
    fn test_lookup_through_model_handle() {
        let half = Vector3::new(0.5, 0.5, 0.5);
        let assembly = assembly_of(vec![solid_part(
            1,
            "cube",
            identity_placement_at(Vector3::ZERO),
            -half,
            half,
        )]);
        let model = Model {
            degeneracy_epsilon: EPS,
            assemblies: SingleOrVec::Single(assembly),
        };

        let res = find_assembly_bbox(&model, 100, false).unwrap();
        assert_eq!(res.ref_id, 1);

        assert!(matches!(
            find_assembly_bbox(&model, 42, false),
            Err(BBoxError::UnknownEntity(42))
        ));
    }
}
