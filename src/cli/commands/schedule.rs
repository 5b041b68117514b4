//! Schedule command handler

use std::path::Path;

use campus_scheduler::core::report::ScheduleReport;
use campus_scheduler::core::scheduler::{PlacementEngine, SchedulingInputs};
use logger::{error, info};

/// Load a `SchedulingInputs` document from `input`, run the placement engine,
/// and write the result to `output` (or stdout) as plain text or JSON.
///
/// Exits the process with a non-zero status on any I/O, parse, or scheduler
/// configuration error.
pub fn run(input: &Path, output: Option<&Path>, json: bool) {
    let raw = match std::fs::read_to_string(input) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("Failed to read {}: {e}", input.display());
            std::process::exit(1);
        }
    };

    let inputs: SchedulingInputs = match serde_json::from_str(&raw) {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!("Failed to parse {}: {e}", input.display());
            std::process::exit(1);
        }
    };

    info!("loaded {} streams from {}", inputs.streams.len(), input.display());

    let result = match PlacementEngine::run(inputs) {
        Ok(result) => result,
        Err(e) => {
            error!("scheduling failed: {e}");
            eprintln!("Scheduling failed: {e}");
            std::process::exit(1);
        }
    };

    let rendered = if json {
        match serde_json::to_string_pretty(&result) {
            Ok(rendered) => rendered,
            Err(e) => {
                eprintln!("Failed to serialize result: {e}");
                std::process::exit(1);
            }
        }
    } else {
        ScheduleReport(&result).to_string()
    };

    match output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, &rendered) {
                eprintln!("Failed to write {}: {e}", path.display());
                std::process::exit(1);
            }
            println!("✓ Wrote schedule to {}", path.display());
        }
        None => print!("{rendered}"),
    }
}
