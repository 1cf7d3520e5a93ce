/// `n` evenly spaced points over `[0, t_end]`, both endpoints included.
/// The last point is pinned to `t_end` so it carries no accumulated rounding.
pub fn time_grid(t_end: f64, n: usize) -> Vec<f64> {
    let mut t = Vec::with_capacity(n);
    fill_time_grid(&mut t, t_end, n);
    t
}

/// Same grid as [`time_grid`], appended to a caller-reserved buffer.
pub fn fill_time_grid(out: &mut Vec<f64>, t_end: f64, n: usize) {
    match n {
        0 => {}
        1 => out.push(0.0),
        _ => {
            let step = t_end / (n - 1) as f64;
            out.extend((0..n - 1).map(|j| j as f64 * step));
            out.push(t_end);
        }
    }
}

/// Scratch buffer for allocation-free Euler steps.
pub struct EulerWorkspace {
    pub delta: Vec<f64>,
}

impl EulerWorkspace {
    pub fn new(n: usize) -> Self {
        Self { delta: vec![0.0; n] }
    }

    pub fn resize(&mut self, n: usize) {
        if self.delta.len() != n {
            self.delta.resize(n, 0.0);
        }
    }
}

/// One explicit Euler step: `y <- y + delta(t, dt, y)`.
///
/// `increment` writes the whole step increment, already scaled by `dt`, so the
/// model decides the floating point evaluation order of each term. It only sees
/// the state at the start of the step.
pub fn euler_step_ws<F>(y: &mut [f64], t: f64, dt: f64, ws: &mut EulerWorkspace, mut increment: F)
where
    F: FnMut(f64, f64, &[f64], &mut [f64]),
{
    ws.resize(y.len());
    ws.delta.fill(0.0);
    increment(t, dt, y, &mut ws.delta);
    for (yi, di) in y.iter_mut().zip(ws.delta.iter()) {
        *yi += *di;
    }
}
