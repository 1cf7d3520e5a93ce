pub mod scenario;
pub mod sird;
