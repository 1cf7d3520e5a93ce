//! Baseline versus intervention comparison.
//!
//! A [`Scenario`] fixes parameters, initial conditions and the time grid. For a
//! transmission reduction factor it runs the integrator twice, once with the
//! baseline rates and once with `beta * (1 - reduction)`, and derives the
//! reproduction number of both runs.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::calibration::basic_reproduction_number;
use crate::error::validation::validate_unit_interval;
use crate::error::SirdResult;
use crate::model::sird::{simulate, InitialConditions, ModelParameters, Trajectory};

/// Best-fit rates the dashboard starts from.
pub const BEST_FIT_PARAMETERS: ModelParameters = ModelParameters {
    beta: 0.3789473684210526,
    gamma: 0.11157894736842105,
    mu: 0.010,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub params: ModelParameters,
    pub initial: InitialConditions,
    pub dt: f64,
    pub t_end: f64,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            params: BEST_FIT_PARAMETERS,
            initial: InitialConditions::new(0.99, 0.01, 0.0, 0.0),
            dt: 0.01,
            t_end: 90.0,
        }
    }
}

impl Scenario {
    pub fn baseline(&self) -> SirdResult<Trajectory> {
        simulate(&self.params, &self.initial, self.dt, self.t_end)
    }

    /// Runs both scenarios for `reduction` in `[0, 1]`.
    pub fn compare(&self, reduction: f64) -> SirdResult<Comparison> {
        validate_unit_interval("reduction", reduction)?;
        let reduced = self.params.with_reduced_transmission(reduction);

        let baseline = self.baseline()?;
        let intervention = simulate(&reduced, &self.initial, self.dt, self.t_end)?;
        let stats = ReproductionStats::new(&self.params, &reduced);

        tracing::info!(
            reduction,
            r0_baseline = stats.r0_baseline,
            r0_intervention = stats.r0_intervention,
            points = baseline.len(),
            "scenario comparison computed"
        );

        Ok(Comparison { reduction, baseline, intervention, stats })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub reduction: f64,
    pub baseline: Trajectory,
    pub intervention: Trajectory,
    pub stats: ReproductionStats,
}

impl Comparison {
    /// Down-samples both trajectories for transport.
    pub fn thinned(&self, stride: usize) -> SirdResult<Comparison> {
        Ok(Comparison {
            reduction: self.reduction,
            baseline: self.baseline.every(stride)?,
            intervention: self.intervention.every(stride)?,
            stats: self.stats,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReproductionStats {
    pub r0_baseline: f64,
    pub r0_intervention: f64,
    /// `None` when the baseline R0 is zero or not finite.
    pub r0_reduction_pct: Option<f64>,
}

impl ReproductionStats {
    pub fn new(baseline: &ModelParameters, intervention: &ModelParameters) -> Self {
        let r0_baseline = basic_reproduction_number(baseline);
        let r0_intervention = basic_reproduction_number(intervention);
        let r0_reduction_pct = if r0_baseline != 0.0 && r0_baseline.is_finite() {
            Some((r0_baseline - r0_intervention) / r0_baseline * 100.0)
        } else {
            None
        };
        Self { r0_baseline, r0_intervention, r0_reduction_pct }
    }

    /// Display lines for the statistics block.
    pub fn summary_lines(&self) -> Vec<String> {
        let pct = match self.r0_reduction_pct {
            Some(p) => format!("{:.1}%", p),
            None => "n/a".to_string(),
        };
        vec![
            format!("R0 without intervention: {:.2}", self.r0_baseline),
            format!("R0 with intervention: {:.2}", self.r0_intervention),
            format!("R0 reduction: {}", pct),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compartment {
    Susceptible,
    Infected,
    Recovered,
    Deceased,
}

impl Compartment {
    pub const ALL: [Compartment; 4] = [
        Compartment::Susceptible,
        Compartment::Infected,
        Compartment::Recovered,
        Compartment::Deceased,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Compartment::Susceptible => "Susceptible",
            Compartment::Infected => "Infected",
            Compartment::Recovered => "Recovered",
            Compartment::Deceased => "Deceased",
        }
    }

    /// Short key used in serialized trajectories.
    pub fn key(self) -> &'static str {
        match self {
            Compartment::Susceptible => "S",
            Compartment::Infected => "I",
            Compartment::Recovered => "R",
            Compartment::Deceased => "D",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Compartment::Susceptible => "rgba(255,0,0,0.8)",
            Compartment::Infected => "rgba(0,0,255,0.8)",
            Compartment::Recovered => "rgba(0,255,0,0.8)",
            Compartment::Deceased => "rgba(0,0,0,0.8)",
        }
    }

    pub fn series(self, traj: &Trajectory) -> &[f64] {
        match self {
            Compartment::Susceptible => traj.s(),
            Compartment::Infected => traj.i(),
            Compartment::Recovered => traj.r(),
            Compartment::Deceased => traj.d(),
        }
    }
}

/// Serialized as its display metadata: `{"key", "label", "color"}`.
impl Serialize for Compartment {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        let mut st = serializer.serialize_struct("Compartment", 3)?;
        st.serialize_field("key", self.key())?;
        st.serialize_field("label", self.label())?;
        st.serialize_field("color", self.color())?;
        st.end()
    }
}
