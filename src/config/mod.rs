use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    errors::PlannerError,
    utils::{app_data_dir, ensure_dir},
};

const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

const DEFAULT_BUDGET_CYCLE_INTERVAL_SECS: u64 = 3600;
const DEFAULT_EXPENSE_EXPANSION_INTERVAL_SECS: u64 = 86_400;

/// Runtime settings: where data lives and how often the two reconciliation
/// passes wake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    pub budget_cycle_interval_secs: u64,
    pub expense_expansion_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            budget_cycle_interval_secs: DEFAULT_BUDGET_CYCLE_INTERVAL_SECS,
            expense_expansion_interval_secs: DEFAULT_EXPENSE_EXPANSION_INTERVAL_SECS,
        }
    }
}

impl Config {
    pub fn budget_cycle_interval(&self) -> Duration {
        Duration::from_secs(self.budget_cycle_interval_secs.max(1))
    }

    pub fn expense_expansion_interval(&self) -> Duration {
        Duration::from_secs(self.expense_expansion_interval_secs.max(1))
    }

    /// Effective storage root, falling back to the app data dir.
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(app_data_dir)
    }
}

/// Loads and saves the configuration file under the app data dir.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, PlannerError> {
        Self::from_base(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, PlannerError> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self, PlannerError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    pub fn load(&self) -> Result<Config, PlannerError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), PlannerError> {
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), PlannerError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
