//! Recorded pointer scripts: a JSON array of `{ "t", "x", "y" }` samples,
//! replayed by the simulator through [`gyre_core::ScriptedInput`].

use std::fs;
use std::path::Path;

use gyre_core::PointerSample;

use crate::error::{ConfigError, Result};

/// Parse a script and sort it by time. Samples with a non-finite time are
/// rejected; non-finite coordinates are kept (the engine ignores them).
pub fn parse_script(text: &str) -> Result<Vec<PointerSample>> {
    let mut samples: Vec<PointerSample> = serde_json::from_str(text)?;
    if let Some(bad) = samples.iter().position(|s| !s.t.is_finite()) {
        return Err(ConfigError::Invalid(format!(
            "script sample {bad}: time must be finite"
        )));
    }
    samples.sort_by(|a, b| a.t.total_cmp(&b.t));
    Ok(samples)
}

pub fn load_script(path: &Path) -> Result<Vec<PointerSample>> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let samples = parse_script(&text)?;
    tracing::info!("loaded {} pointer samples from {}", samples.len(), path.display());
    Ok(samples)
}

pub fn save_script(path: &Path, samples: &[PointerSample]) -> Result<()> {
    let json = serde_json::to_string_pretty(samples)?;
    fs::write(path, json).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
