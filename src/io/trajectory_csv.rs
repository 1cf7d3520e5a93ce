use anyhow::Context;
use serde::Serialize;

use crate::model::sird::Trajectory;

#[derive(Debug, Serialize)]
struct PointRow {
    t: f64,
    #[serde(rename = "S")]
    s: f64,
    #[serde(rename = "I")]
    i: f64,
    #[serde(rename = "R")]
    r: f64,
    #[serde(rename = "D")]
    d: f64,
}

/// Write a trajectory as CSV with columns `t,S,I,R,D`.
pub fn write_trajectory_csv<W: std::io::Write>(out: W, traj: &Trajectory) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for j in 0..traj.len() {
        if let Some((t, s, i, r, d)) = traj.point(j) {
            wtr.serialize(PointRow { t, s, i, r, d })?;
        }
    }
    wtr.flush().context("flush trajectory CSV failed")?;
    Ok(())
}

pub fn save_trajectory_csv(path: impl AsRef<std::path::Path>, traj: &Trajectory) -> anyhow::Result<()> {
    let path = path.as_ref();
    let f = std::fs::File::create(path)
        .with_context(|| format!("create trajectory CSV failed (path={:?})", path))?;
    write_trajectory_csv(f, traj)
}
