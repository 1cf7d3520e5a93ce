use crate::model::sird::ModelParameters;

/// Basic reproduction number of the SIRD model: R0 = beta / (gamma + mu).
pub fn basic_reproduction_number(params: &ModelParameters) -> f64 {
    params.beta / (params.gamma + params.mu)
}

/// Transmission rate that yields a target R0 for the given recovery and mortality rates.
/// beta = R0 * (gamma + mu)
pub fn beta_from_r0(r0: f64, gamma: f64, mu: f64) -> f64 {
    r0 * (gamma + mu)
}
