use figment::Figment;
use figment::providers::{Env, Serialized};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const ENV_PREFIX: &str = "COURSE_PLANNER_";

/// Path value that makes the store live in memory only.
pub const IN_MEMORY_DATABASE: &str = ":memory:";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    pub database_path: PathBuf,
    pub log_level: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("data/course_planner.db"),
            log_level: "info".to_string(),
        }
    }
}

impl PlannerConfig {
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(PlannerConfig::default()))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Defaults overridden by `COURSE_PLANNER_*` variables, including ones
    /// picked up from a `.env` file.
    pub fn load() -> Result<Self, figment::Error> {
        dotenvy::dotenv().ok();
        Self::figment().extract()
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY_DATABASE
    }
}
