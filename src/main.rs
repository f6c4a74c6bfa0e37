/*

    Find the minimum-volume axis-aligned bounding box of an
    assembly by trying each part's local frame as reference.

    @date: 22 Dec, 2025
    @author: Bartu

*/

use std::{self, env};
use tracing::{error, warn};
use tracing_subscriber;

mod bbox;
mod error;
mod json_parser;
mod model;
mod numeric;
mod placement;
mod prelude;
mod search;
use crate::json_parser::parse_model;
use crate::search::find_assembly_bbox;

fn main() -> Result<(), Box<dyn std::error::Error>> {

    // Logging on console
    tracing_subscriber::fmt::init();

    // Parse args
    let args: Vec<String> = env::args().collect();
    let (model_path, assembly_id): (String, usize) = if args.len() == 1 {
        warn!("No arguments were provided, setting default model path...");
        (String::from("./inputs/sample_assembly.json"), 100)
    } else if args.len() >= 3 {
        let id = match args[2].parse() {
            Ok(id) => id,
            Err(_) => {
                error!("Assembly id '{}' is not an integer", args[2]);
                std::process::exit(1);
            }
        };
        (args[1].clone(), id)
    } else {
        error!("Usage: {} <model>.json <assembly-id> [--quiet]", args[0]);
        std::process::exit(1);
    };
    let verbose = !args.iter().any(|a| a == "--quiet");

    // Parse JSON
    let root = parse_model(&model_path).map_err(|e| {
        error!("Failed to load model: {}", e);
        e
    })?;

    // Search all candidate reference frames of the assembly
    let res = find_assembly_bbox(&root.model, assembly_id, verbose)?;

    println!("reference part: #{} '{}'", res.ref_id, res.ref_name);
    println!("dimensions: {} x {} x {}", res.dimensions.x, res.dimensions.y, res.dimensions.z);
    println!("volume: {}", res.volume);
    println!("bbox: {} .. {}", res.bbox.min, res.bbox.max);
    Ok(())
}
