use std::collections::HashSet;

use anyhow::Context;
use serde::Deserialize;

use crate::model::scenario::Scenario;

#[derive(Debug, Deserialize)]
struct ParamRow {
    name: String,
    value: f64,
}

/// Load scenario overrides from a CSV file with columns: `name,value`.
///
/// Recognised names are `beta, gamma, mu, s0, i0, r0, d0, dt, t_end`. Names not
/// present in the file keep the value from `base`. Unknown or repeated names
/// are rejected.
pub fn load_scenario_csv(path: &str, base: &Scenario) -> anyhow::Result<Scenario> {
    let rdr = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open scenario CSV: {}", path))?;
    read_scenario(rdr, base).with_context(|| format!("Invalid scenario CSV: {}", path))
}

pub fn parse_scenario_csv(text: &str, base: &Scenario) -> anyhow::Result<Scenario> {
    read_scenario(csv::Reader::from_reader(text.as_bytes()), base)
}

fn read_scenario<R: std::io::Read>(mut rdr: csv::Reader<R>, base: &Scenario) -> anyhow::Result<Scenario> {
    let mut sc = *base;
    let mut seen = HashSet::new();
    for result in rdr.deserialize::<ParamRow>() {
        let row = result?;
        let name = row.name.trim().to_lowercase();
        anyhow::ensure!(seen.insert(name.clone()), "parameter '{}' given more than once", name);
        let slot = match name.as_str() {
            "beta" => &mut sc.params.beta,
            "gamma" => &mut sc.params.gamma,
            "mu" => &mut sc.params.mu,
            "s0" => &mut sc.initial.s0,
            "i0" => &mut sc.initial.i0,
            "r0" => &mut sc.initial.r0,
            "d0" => &mut sc.initial.d0,
            "dt" => &mut sc.dt,
            "t_end" => &mut sc.t_end,
            other => anyhow::bail!("unknown parameter '{}'", other),
        };
        anyhow::ensure!(row.value.is_finite(), "parameter '{}' must be finite", name);
        *slot = row.value;
    }
    Ok(sc)
}
