pub mod debug_log;
pub mod scenario_csv;
pub mod trajectory_csv;
