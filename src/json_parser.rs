/*

    Provide utilities to parse the JSON model document.

    This format currently assumes:
        - Scalars may be given in quotes (e.g. "6") or as is
        - Vector3 data fields are either "<a> <a> <a>" strings
          or arrays [<a>, <a>, <a>] where <a> is integer or float
        - Vertex loops are arrays of Vector3 values, or a single
          flat "x y z x y z ..." string

    @date: 20 Dec, 2025
    @author: bartu
*/

use std::fs::File;
use std::io::BufReader;

use serde_json::{self, Value};
use serde::{Deserialize, Deserializer};
use serde::de::{self};

use crate::prelude::*;
use crate::model::{RootModel};

pub fn parse_model(path: &str) -> Result<RootModel, Box<dyn std::error::Error>> {

    let span = tracing::span!(tracing::Level::INFO, "load_model");
    let _enter = span.enter();

    // Open file
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    debug!("Reading model file from {}", path);

    // Parse JSON into the model document
    let root: RootModel = serde_json::from_reader(reader)?;
    Ok(root)
}


pub(crate) fn deser_usize<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    /*
        Deserialize usize type given as either string or number in JSON
    */
    let s: Value = Deserialize::deserialize(deserializer)?;
    match s {
        Value::Number(n) => n.as_u64()
            .map(|v| v as usize)
            .ok_or_else(|| de::Error::custom("Invalid integer")),
        Value::String(s) => s.parse::<usize>()
            .map_err(|_| de::Error::custom("Failed to parse integer from string")),
        t => Err(de::Error::custom(format!("Expected int or string, found {t}"))),
    }
}

// Handles floats as string or number
pub(crate) fn deser_float<'de, D>(deserializer: D) -> Result<Float, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Value = Deserialize::deserialize(deserializer)?;
    match s {
        Value::Number(n) => n.as_f64()
            .ok_or_else(|| de::Error::custom("Invalid float")),
        Value::String(s) => s.parse::<Float>()
            .map_err(|_| de::Error::custom("Failed to parse float from string")),
        t => Err(de::Error::custom(format!("Expected float or string, found {t}"))),
    }
}

pub(crate) fn deser_opt_vec3<'de, D>(deserializer: D) -> Result<Option<Vector3>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => vec3_from_value(v).map(Some).map_err(de::Error::custom),
    }
}

pub(crate) fn deser_vecvec3<'de, D>(deserializer: D) -> Result<Vec<Vector3>, D::Error>
where
    D: Deserializer<'de>,
{
    // Deserialize a vertex loop given either as a flat
    // "X1 Y1 Z1 X2 Y2 Z2 ..." string or as an array of Vector3
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::String(s) => parse_string_vecvec3(&s).map_err(de::Error::custom),
        Value::Array(items) => items
            .into_iter()
            .map(|item| vec3_from_value(item).map_err(de::Error::custom))
            .collect(),
        t => Err(de::Error::custom(format!(
            "Expected vertex loop as array or string, found {t}"
        ))),
    }
}

fn vec3_from_value(value: Value) -> Result<Vector3, String> {
    match value {
        Value::String(s) => parse_vec3_str(&s),
        Value::Array(items) => {
            if items.len() != 3 {
                return Err(format!("Expected 3 elements in Vec3 array, got {}", items.len()));
            }
            let mut out = [0.0 as Float; 3];
            for (i, item) in items.into_iter().enumerate() {
                out[i] = match item {
                    Value::Number(n) => n.as_f64().ok_or_else(|| String::from("Invalid float in Vec3 array"))?,
                    Value::String(s) => s.parse::<Float>().map_err(|e| e.to_string())?,
                    t => return Err(format!("Expected float or string in Vec3 array, found {t}")),
                };
            }
            Ok(Vector3::new(out[0], out[1], out[2]))
        }
        t => Err(format!("Expected Vec3 as 'x y z' string or array, found {t}")),
    }
}

/// Helper function: parse a string like "25 25 25" into Vector3
fn parse_vec3_str(s: &str) -> Result<Vector3, String> {
    let parts: Vec<&str> = s.split_whitespace().collect();
    if parts.len() != 3 {
        return Err(format!("Expected 3 values, got {}", parts.len()));
    }
    let x = parts[0].parse::<Float>().map_err(|e| e.to_string())?;
    let y = parts[1].parse::<Float>().map_err(|e| e.to_string())?;
    let z = parts[2].parse::<Float>().map_err(|e| e.to_string())?;
    Ok(Vector3::new(x, y, z))
}

pub(crate) fn parse_string_vecvec3(s: &str) -> Result<Vec<Vector3>, String> {
    let nums: Vec<Float> = s
        .split_whitespace()
        .map(|x| x.parse::<Float>().map_err(|e| e.to_string()))
        .collect::<Result<_, _>>()?;

    if nums.len() % 3 != 0 {
        return Err(format!("Vertex stream length not divisible by 3, got {}", nums.len()));
    }

    Ok(nums
        .chunks_exact(3)
        .map(|chunk| Vector3::new(chunk[0], chunk[1], chunk[2]))
        .collect())
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_vec3_from_string_and_array() {
        let v = vec3_from_value(json!("1 -2 3.5")).unwrap();
        assert_eq!(v, Vector3::new(1.0, -2.0, 3.5));

        let v = vec3_from_value(json!([1, -2, 3.5])).unwrap();
        assert_eq!(v, Vector3::new(1.0, -2.0, 3.5));

        let v = vec3_from_value(json!(["1", "-2", "3.5"])).unwrap();
        assert_eq!(v, Vector3::new(1.0, -2.0, 3.5));
    }

    #[test]
    fn test_vec3_rejects_wrong_arity() {
        assert!(vec3_from_value(json!("1 2")).is_err());
        assert!(vec3_from_value(json!([1, 2, 3, 4])).is_err());
        assert!(vec3_from_value(json!(true)).is_err());
    }

    #[test]
    fn test_flat_vertex_stream() {
        let loop_points = parse_string_vecvec3("0 0 0  1 0 0  1 1 0").unwrap();
        assert_eq!(loop_points.len(), 3);
        assert_eq!(loop_points[2], Vector3::new(1.0, 1.0, 0.0));

        assert!(parse_string_vecvec3("0 0 0 1").is_err());
    }
}
