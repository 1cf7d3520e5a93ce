use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;

use crate::io::scenario_csv::load_scenario_csv;
use crate::model::scenario::Scenario;

/// Settings of the dashboard API, read from the environment.
///
/// - `HOST`, `PORT`: listen address (default `0.0.0.0:8000`)
/// - `VSIRD_SCENARIO_CSV`: optional `name,value` file overriding the best-fit scenario
/// - `VSIRD_DEBUG_LOG_DIR`: when set, every comparison is dumped there
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub host: String,
    pub port: u16,
    pub scenario: Scenario,
    pub debug_log_dir: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            scenario: Scenario::default(),
            debug_log_dir: None,
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`DashboardConfig::from_env`] with an explicit variable lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(host) = lookup("HOST") {
            cfg.host = host;
        }
        if let Some(port) = lookup("PORT") {
            cfg.port = port
                .trim()
                .parse()
                .with_context(|| format!("invalid PORT '{}'", port))?;
        }
        if let Some(path) = lookup("VSIRD_SCENARIO_CSV") {
            cfg.scenario = load_scenario_csv(&path, &cfg.scenario)?;
        }
        cfg.debug_log_dir = lookup("VSIRD_DEBUG_LOG_DIR")
            .filter(|d| !d.is_empty())
            .map(PathBuf::from);

        // Fail at startup rather than on the first request.
        cfg.scenario
            .baseline()
            .context("configured scenario cannot be simulated")?;
        Ok(cfg)
    }

    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid HOST/PORT {}:{}", self.host, self.port))
    }
}
