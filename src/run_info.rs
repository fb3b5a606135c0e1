use serde::Serialize;
use std::fs::File;
use std::path::Path;

/// Description of a driver invocation, written next to its outputs as `config.json`.
#[derive(Debug, Serialize)]
pub struct RunInfo {
    pub command: String,
    pub size: usize,
    pub steps: usize,
    pub temperatures: Vec<f64>,
    /// Final lattices per temperature (`store`).
    pub replicas: Option<usize>,
    /// Independent runs per temperature (`average`).
    pub runs: Option<usize>,
    pub base_seed: u64,
    pub initial_state: String,
    pub tracking: Option<String>,
    pub sequential: bool,
    pub outputs: Vec<String>,
    pub version: String,
}

impl RunInfo {
    pub fn new(command: &str, size: usize, steps: usize, base_seed: u64) -> Self {
        Self {
            command: command.to_string(),
            size,
            steps,
            temperatures: Vec::new(),
            replicas: None,
            runs: None,
            base_seed,
            initial_state: String::from("random"),
            tracking: None,
            sequential: false,
            outputs: Vec::new(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn write_to_dir(&self, out_dir: &Path) -> std::io::Result<()> {
        let path = out_dir.join("config.json");
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}
