use anyhow::Context;

use crate::model::scenario::{Comparison, Scenario};

/// Write a plain-text dump of one baseline/intervention comparison to
/// `<out_dir>/sird_<run_id>.txt` and return the file path.
pub fn write_sird_debug_log(
    out_dir: impl AsRef<std::path::Path>,
    run_id: &str,
    scenario: &Scenario,
    cmp: &Comparison,
) -> anyhow::Result<std::path::PathBuf> {
    use std::io::Write;

    std::fs::create_dir_all(out_dir.as_ref()).context("create logs dir failed")?;
    let path = out_dir.as_ref().join(format!("sird_{}.txt", run_id));
    let mut f = std::fs::File::create(&path)
        .with_context(|| format!("create debug log file failed (path={:?})", path))?;

    writeln!(f, "run_id={}", run_id)?;
    writeln!(f, "beta={:.6}", scenario.params.beta)?;
    writeln!(f, "gamma={:.6}", scenario.params.gamma)?;
    writeln!(f, "mu={:.6}", scenario.params.mu)?;
    writeln!(f, "reduction={:.2}", cmp.reduction)?;
    writeln!(f, "t_end_days={:.6}", scenario.t_end)?;
    writeln!(f, "dt_days={:.6}", scenario.dt)?;
    for line in cmp.stats.summary_lines() {
        writeln!(f, "{}", line)?;
    }
    writeln!(f)?;
    writeln!(f, "t,S,I,R,D,S_int,I_int,R_int,D_int")?;

    let (base, int) = (&cmp.baseline, &cmp.intervention);
    anyhow::ensure!(base.len() == int.len(), "trajectory length mismatch");
    for j in 0..base.len() {
        let (t1, s, i, r, d) = base.point(j).context("baseline point missing")?;
        let (t2, si, ii, ri, di) = int.point(j).context("intervention point missing")?;
        anyhow::ensure!((t1 - t2).abs() < 1e-9, "timeline t mismatch");
        writeln!(
            f,
            "{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6}",
            t1, s, i, r, d, si, ii, ri, di
        )?;
    }

    Ok(path)
}
