use serde::{Deserialize, Serialize};

use crate::error::validation::validate_positive;
use crate::error::{SirdError, SirdResult};
use crate::math::ode::{euler_step_ws, fill_time_grid, EulerWorkspace};

// State layout: S | I | R | D
const S: usize = 0;
const I: usize = 1;
const R: usize = 2;
const D: usize = 3;

/// Rates (per day).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    pub beta: f64,  // transmission
    pub gamma: f64, // recovery
    pub mu: f64,    // mortality of infected
}

impl ModelParameters {
    pub fn new(beta: f64, gamma: f64, mu: f64) -> Self {
        Self { beta, gamma, mu }
    }

    /// Same recovery and mortality, transmission scaled by `1 - reduction`.
    pub fn with_reduced_transmission(&self, reduction: f64) -> Self {
        Self { beta: self.beta * (1.0 - reduction), ..*self }
    }

    /// Increments of one explicit Euler step, evaluated from the state at the
    /// start of the step with the nominal `dt`.
    fn increment(&self, dt: f64, y: &[f64], delta: &mut [f64]) {
        let (s, i) = (y[S], y[I]);
        delta[S] = -(dt * self.beta * s * i);
        delta[I] = dt * (self.beta * s * i - self.gamma * i - self.mu * i);
        delta[R] = dt * self.gamma * i;
        delta[D] = dt * self.mu * i;
    }
}

/// Compartment fractions at t = 0. Nothing forces them to sum to one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitialConditions {
    pub s0: f64,
    pub i0: f64,
    pub r0: f64,
    pub d0: f64,
}

impl InitialConditions {
    pub fn new(s0: f64, i0: f64, r0: f64, d0: f64) -> Self {
        Self { s0, i0, r0, d0 }
    }

    fn state(&self) -> [f64; 4] {
        [self.s0, self.i0, self.r0, self.d0]
    }
}

/// Time series of the four compartments, all of equal length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trajectory {
    time: Vec<f64>,
    #[serde(rename = "S")]
    s: Vec<f64>,
    #[serde(rename = "I")]
    i: Vec<f64>,
    #[serde(rename = "R")]
    r: Vec<f64>,
    #[serde(rename = "D")]
    d: Vec<f64>,
}

impl Trajectory {
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn s(&self) -> &[f64] {
        &self.s
    }

    pub fn i(&self) -> &[f64] {
        &self.i
    }

    pub fn r(&self) -> &[f64] {
        &self.r
    }

    pub fn d(&self) -> &[f64] {
        &self.d
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// `(t, S, I, R, D)` at index `j`.
    pub fn point(&self, j: usize) -> Option<(f64, f64, f64, f64, f64)> {
        Some((*self.time.get(j)?, self.s[j], self.i[j], self.r[j], self.d[j]))
    }

    /// Spacing of the time grid. This is `T / (n - 1)` and differs from the
    /// `dt` used in the update whenever `T` is not a multiple of `dt`.
    pub fn grid_spacing(&self) -> Option<f64> {
        match self.time.len() {
            0 | 1 => None,
            n => Some(self.time[n - 1] / (n - 1) as f64),
        }
    }

    /// Time and value of the largest infected fraction (first one on ties).
    pub fn peak_infected(&self) -> Option<(f64, f64)> {
        let mut best: Option<(f64, f64)> = None;
        for (t, v) in self.time.iter().zip(self.i.iter()) {
            if best.map_or(true, |(_, b)| *v > b) {
                best = Some((*t, *v));
            }
        }
        best
    }

    /// Every `stride`-th point, always keeping the last one.
    pub fn every(&self, stride: usize) -> SirdResult<Trajectory> {
        if stride == 0 {
            return Err(SirdError::invalid("stride", 0.0, "must be at least 1"));
        }
        let n = self.len();
        let mut idx: Vec<usize> = (0..n).step_by(stride).collect();
        if n > 0 && idx.last() != Some(&(n - 1)) {
            idx.push(n - 1);
        }
        let pick = |v: &[f64]| idx.iter().map(|&j| v[j]).collect::<Vec<f64>>();
        Ok(Trajectory {
            time: pick(&self.time),
            s: pick(&self.s),
            i: pick(&self.i),
            r: pick(&self.r),
            d: pick(&self.d),
        })
    }
}

/// Integrates the SIRD system with fixed-step explicit Euler.
///
/// The trajectory has `n = floor(t_end / dt)` points on an evenly spaced grid
/// over `[0, t_end]`. Each step uses the nominal `dt`:
///
/// ```text
/// S[j+1] = S[j] - dt*beta*S[j]*I[j]
/// I[j+1] = I[j] + dt*(beta*S[j]*I[j] - gamma*I[j] - mu*I[j])
/// R[j+1] = R[j] + dt*gamma*I[j]
/// D[j+1] = D[j] + dt*mu*I[j]
/// ```
///
/// Parameters and initial conditions are taken as given. Fails with
/// [`SirdError::InvalidArgument`] when `dt` or `t_end` is not positive or
/// when `t_end < dt` leaves no grid point.
pub fn simulate(
    params: &ModelParameters,
    initial: &InitialConditions,
    dt: f64,
    t_end: f64,
) -> SirdResult<Trajectory> {
    validate_positive("dt", dt)?;
    validate_positive("t_end", t_end)?;

    let n = (t_end / dt).floor();
    if !(n >= 1.0) || !n.is_finite() || n > usize::MAX as f64 {
        return Err(SirdError::invalid(
            "t_end",
            t_end,
            format!("yields {} time points with dt = {}", n, dt),
        ));
    }
    let n = n as usize;

    // Counts that pass the float checks can still be far beyond memory.
    let series = || -> SirdResult<Vec<f64>> {
        let mut v = Vec::new();
        v.try_reserve_exact(n).map_err(|e| {
            SirdError::invalid(
                "t_end",
                t_end,
                format!("cannot allocate {} time points with dt = {}: {}", n, dt, e),
            )
        })?;
        Ok(v)
    };
    let mut time = series()?;
    let mut s = series()?;
    let mut i = series()?;
    let mut r = series()?;
    let mut d = series()?;
    fill_time_grid(&mut time, t_end, n);

    let mut y = initial.state();
    let mut ws = EulerWorkspace::new(y.len());
    for j in 0..n {
        s.push(y[S]);
        i.push(y[I]);
        r.push(y[R]);
        d.push(y[D]);
        if j + 1 < n {
            euler_step_ws(&mut y, time[j], dt, &mut ws, |_, dt, y, delta| {
                params.increment(dt, y, delta)
            });
        }
    }

    tracing::debug!(n, dt, t_end, "sird trajectory integrated");
    Ok(Trajectory { time, s, i, r, d })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn best_fit() -> ModelParameters {
        ModelParameters::new(0.3789473684210526, 0.11157894736842105, 0.010)
    }

    fn seeded() -> InitialConditions {
        InitialConditions::new(0.99, 0.01, 0.0, 0.0)
    }

    #[test]
    fn first_step_matches_update_equations_bitwise() {
        let p = best_fit();
        let dt = 0.01;
        let traj = simulate(&p, &seeded(), dt, 90.0).unwrap();
        let (s0, i0, r0, d0) = (0.99_f64, 0.01_f64, 0.0_f64, 0.0_f64);
        assert_eq!(traj.s()[1], s0 - dt * p.beta * s0 * i0);
        assert_eq!(traj.i()[1], i0 + dt * (p.beta * s0 * i0 - p.gamma * i0 - p.mu * i0));
        assert_eq!(traj.r()[1], r0 + dt * p.gamma * i0);
        assert_eq!(traj.d()[1], d0 + dt * p.mu * i0);
    }

    #[test]
    fn single_point_trajectory() {
        let traj = simulate(&best_fit(), &seeded(), 1.0, 1.5).unwrap();
        assert_eq!(traj.len(), 1);
        assert_eq!(traj.time(), &[0.0]);
        assert_eq!(traj.s(), &[0.99]);
        assert_eq!(traj.grid_spacing(), None);
    }

    #[test]
    fn grid_spacing_differs_from_dt() {
        let traj = simulate(&best_fit(), &seeded(), 0.01, 90.0).unwrap();
        let spacing = traj.grid_spacing().unwrap();
        assert!((spacing - 90.0 / 8999.0).abs() < 1e-15);
        assert!(spacing > 0.01);
    }

    #[test]
    fn rejects_non_finite_arguments() {
        assert!(simulate(&best_fit(), &seeded(), f64::NAN, 90.0).is_err());
        assert!(simulate(&best_fit(), &seeded(), 0.01, f64::NAN).is_err());
        assert!(simulate(&best_fit(), &seeded(), 0.01, f64::INFINITY).is_err());
    }

    #[test]
    fn unallocatable_point_count_is_invalid_argument() {
        match simulate(&best_fit(), &seeded(), 1e-19, 1.0) {
            Err(SirdError::InvalidArgument { name, reason, .. }) => {
                assert_eq!(name, "t_end");
                assert!(reason.contains("cannot allocate"));
            }
            other => panic!("expected InvalidArgument, got {:?}", other.map(|t| t.len())),
        }
    }

    #[test]
    fn every_keeps_endpoints() {
        let traj = simulate(&best_fit(), &seeded(), 1.0, 10.0).unwrap();
        let thin = traj.every(4).unwrap();
        assert_eq!(thin.time().len(), 4); // 0, 4, 8 and the last index 9
        assert_eq!(thin.time()[0], 0.0);
        assert_eq!(thin.time()[3], 10.0);
        assert_eq!(thin.s()[3], traj.s()[9]);
        assert_eq!(traj.every(1).unwrap(), traj);
        assert!(traj.every(0).is_err());
    }

    #[test]
    fn peak_infected_is_interior_for_growing_epidemic() {
        let traj = simulate(&best_fit(), &seeded(), 0.01, 90.0).unwrap();
        let (t_peak, i_peak) = traj.peak_infected().unwrap();
        assert!(t_peak > 0.0 && t_peak < 90.0);
        assert!(traj.i().iter().all(|v| *v <= i_peak));
    }

    #[test]
    fn trajectory_serializes_with_compartment_names() {
        let traj = simulate(&best_fit(), &seeded(), 1.0, 2.0).unwrap();
        let v = serde_json::to_value(&traj).unwrap();
        assert_eq!(v["time"].as_array().unwrap().len(), 2);
        assert_eq!(v["S"][0], 0.99);
        assert!(v.get("D").is_some());
    }
}
