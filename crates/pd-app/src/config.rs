//! Application configuration, loaded from a YAML file.
//!
//! Every field has a default, so an absent file or a partial file both
//! yield a usable configuration.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use pd_core::CostRates;
use serde::{Deserialize, Serialize};

use crate::dashboard::SummaryDefaults;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory the detection engine writes report CSVs into.
    pub reports_dir: PathBuf,
    /// Directory holding per-request upload slots.
    pub uploads_dir: PathBuf,
    pub engine: EngineConfig,
    pub live: CommandSpec,
    pub costs: CostConfig,
    pub dashboard: DashboardConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            reports_dir: PathBuf::from("python/csv"),
            uploads_dir: PathBuf::from("python/uploads"),
            engine: EngineConfig::default(),
            live: CommandSpec::python("python/live_pothole_detection.py"),
            costs: CostConfig::default(),
            dashboard: DashboardConfig::default(),
        }
    }
}

/// An external script and the interpreter that runs it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub script: PathBuf,
    pub working_dir: PathBuf,
}

impl CommandSpec {
    pub fn python(script: &str) -> Self {
        Self {
            program: "python3".to_string(),
            args: Vec::new(),
            script: PathBuf::from(script),
            working_dir: PathBuf::from("."),
        }
    }

    /// `<program> <args…> <script>` in the working directory; callers append
    /// their own positional arguments.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if !self.script.as_os_str().is_empty() {
            cmd.arg(&self.script);
        }
        cmd.current_dir(&self.working_dir);
        cmd
    }

    /// Resolve a path printed by the script against its working directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        }
    }
}

impl Default for CommandSpec {
    fn default() -> Self {
        Self::python("")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub command: CommandSpec,
    pub timeout_secs: u64,
}

impl EngineConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            command: CommandSpec::python("python/pothole_detection.py"),
            timeout_secs: 900,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CostConfig {
    pub cement_per_m3: f64,
    pub concrete_per_m3: f64,
    /// Label appended to cost column headers.
    pub currency: String,
}

impl CostConfig {
    pub fn rates(&self) -> CostRates {
        CostRates::new(self.cement_per_m3, self.concrete_per_m3)
    }
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            cement_per_m3: CostRates::DEFAULT_CEMENT_PER_M3,
            concrete_per_m3: CostRates::DEFAULT_CONCRETE_PER_M3,
            currency: "INR".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub defaults: SummaryDefaults,
    /// JSON summary document; when unset the summary is derived from the
    /// report store.
    pub summary_file: Option<PathBuf>,
}

impl AppConfig {
    /// Load from a YAML file, or return defaults when no path is given.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path).map_err(|e| AppError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: AppConfig = serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.engine.timeout_secs == 0 {
            return Err(AppError::Config(
                "engine.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.engine.command.program.trim().is_empty() {
            return Err(AppError::Config(
                "engine.command.program must not be empty".to_string(),
            ));
        }
        let rates = [
            ("costs.cement_per_m3", self.costs.cement_per_m3),
            ("costs.concrete_per_m3", self.costs.concrete_per_m3),
        ];
        for (what, rate) in rates {
            if !rate.is_finite() || rate < 0.0 {
                return Err(AppError::Config(format!(
                    "{what} must be a non-negative number, got {rate}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_yields_defaults() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config.reports_dir, PathBuf::from("python/csv"));
        assert_eq!(config.engine.timeout_secs, 900);
        assert_eq!(config.costs.rates(), CostRates::default());
        assert_eq!(config.dashboard.defaults.potholes_detected, 120);
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("desk.yaml");
        std::fs::write(
            &path,
            "reports_dir: /srv/potholes/csv\n\
             engine:\n  command:\n    program: py\n    args: [\"-3.12\"]\n    script: python/pothole_detection.py\n  timeout_secs: 60\n\
             costs:\n  concrete_per_m3: 12.5\n",
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.reports_dir, PathBuf::from("/srv/potholes/csv"));
        assert_eq!(config.engine.command.program, "py");
        assert_eq!(config.engine.command.args, vec!["-3.12"]);
        assert_eq!(
            config.engine.command.script,
            PathBuf::from("python/pothole_detection.py")
        );
        assert_eq!(config.engine.timeout_secs, 60);
        assert_eq!(config.costs.cement_per_m3, 5.0);
        assert_eq!(config.costs.concrete_per_m3, 12.5);
        assert_eq!(config.uploads_dir, PathBuf::from("python/uploads"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("desk.yaml");
        std::fs::write(&path, "engine:\n  timeout_secs: 0\n").unwrap();

        let err = AppConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn unreadable_file_reports_path() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/desk.yaml"))).unwrap_err();
        assert!(matches!(err, AppError::ConfigRead { .. }));
    }
}
