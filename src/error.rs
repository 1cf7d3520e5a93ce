use thiserror::Error;

/// Errors raised by the integrator and the scenario comparison.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SirdError {
    /// An argument is outside the domain the integrator accepts.
    #[error("invalid argument '{name}' = {value}: {reason}")]
    InvalidArgument {
        name: &'static str,
        value: f64,
        reason: String,
    },
}

pub type SirdResult<T> = Result<T, SirdError>;

impl SirdError {
    pub fn invalid(name: &'static str, value: f64, reason: impl Into<String>) -> Self {
        SirdError::InvalidArgument { name, value, reason: reason.into() }
    }
}

/// Argument checks shared by the integrator and the scenario layer.
pub mod validation {
    use super::{SirdError, SirdResult};

    /// Strictly positive. NaN fails the comparison and is rejected too.
    pub fn validate_positive(name: &'static str, value: f64) -> SirdResult<()> {
        if value > 0.0 {
            Ok(())
        } else {
            Err(SirdError::invalid(name, value, "must be positive (> 0)"))
        }
    }

    pub fn validate_unit_interval(name: &'static str, value: f64) -> SirdResult<()> {
        if (0.0..=1.0).contains(&value) {
            Ok(())
        } else {
            Err(SirdError::invalid(name, value, "must be in range [0, 1]"))
        }
    }
}
