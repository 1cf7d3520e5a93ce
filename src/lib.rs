pub mod api;
pub mod calibration;
pub mod config;
pub mod error;
pub mod io;
pub mod math;
pub mod model;

pub use error::{SirdError, SirdResult};
pub use model::scenario::{Comparison, ReproductionStats, Scenario};
pub use model::sird::{simulate, InitialConditions, ModelParameters, Trajectory};
