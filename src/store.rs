use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use ising_sim::{AverageResult, LatticeSnapshot, Trajectory};

/// `{size}_{steps}.csv`, the name a snapshot table is stored under.
pub fn snapshot_file_name(size: usize, steps: usize) -> String {
    format!("{size}_{steps}.csv")
}

/// Write final lattices as one row each.
///
/// Header is `,T,S0,...,S{size²-1}`; each row starts with the
/// `"temperature:replica"` label, then the temperature and the flattened spins.
pub fn write_snapshots(
    path: &Path,
    size: usize,
    snapshots: &[LatticeSnapshot],
) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);

    write!(w, ",T")?;
    for k in 0..size * size {
        write!(w, ",S{k}")?;
    }
    writeln!(w)?;

    for snap in snapshots {
        write!(w, "{},{:.1}", snap.label(), snap.temperature)?;
        for s in &snap.spins {
            write!(w, ",{s}")?;
        }
        writeln!(w)?;
    }
    w.flush()
}

/// Write a per-site trajectory as `step,energy,magnetization`.
pub fn write_trajectory(path: &Path, trajectory: &Trajectory) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(w, "step,energy,magnetization")?;
    for (step, obs) in trajectory.iter().enumerate() {
        writeln!(w, "{},{},{}", step, obs.energy, obs.magnetization)?;
    }
    w.flush()
}

/// Write one row per temperature; an absent magnetization branch is an empty cell.
pub fn write_averages(path: &Path, averages: &[AverageResult]) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(
        w,
        "temperature,energy,energy2,magnetization_pos,magnetization_neg,n_pos,n_neg,n_zero"
    )?;
    for avg in averages {
        writeln!(
            w,
            "{},{},{},{},{},{},{},{}",
            avg.temperature,
            avg.energy,
            avg.energy2,
            optional(avg.magnetization_pos),
            optional(avg.magnetization_neg),
            avg.n_pos,
            avg.n_neg,
            avg.n_zero,
        )?;
    }
    w.flush()
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
