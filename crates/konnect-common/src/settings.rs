use std::{env, path::PathBuf, sync::OnceLock, time::Duration};

use anyhow::Context;
use config::{Environment, File};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs::canonicalize;

pub static CONFIG_INSTANCE: OnceLock<Settings> = OnceLock::new();

use crate::error::{CommonError, CommonResult};

pub const ENV_PREFIX: &str = "KSYNC";

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct KonnectArgs {
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Personal or system access token. Usually set via `KSYNC__KONNECT__TOKEN`.
    #[serde(default)]
    pub token: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for KonnectArgs {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            token: String::new(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl KonnectArgs {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct OperatorArgs {
    #[serde(default = "default_sync_period_secs")]
    pub sync_period_secs: u64,

    #[serde(default = "default_not_ready_requeue_secs")]
    pub not_ready_requeue_secs: u64,

    #[serde(default = "default_error_backoff_initial_secs")]
    pub error_backoff_initial_secs: u64,

    #[serde(default = "default_error_backoff_max_secs")]
    pub error_backoff_max_secs: u64,

    /// Parallel reconciles per kind.
    #[serde(default = "default_concurrency")]
    pub concurrency: u16,

    /// Watch a single namespace instead of the whole cluster.
    #[serde(default)]
    pub namespace: Option<String>,
}

impl Default for OperatorArgs {
    fn default() -> Self {
        Self {
            sync_period_secs: default_sync_period_secs(),
            not_ready_requeue_secs: default_not_ready_requeue_secs(),
            error_backoff_initial_secs: default_error_backoff_initial_secs(),
            error_backoff_max_secs: default_error_backoff_max_secs(),
            concurrency: default_concurrency(),
            namespace: None,
        }
    }
}

impl OperatorArgs {
    pub fn sync_period(&self) -> Duration {
        Duration::from_secs(self.sync_period_secs)
    }

    pub fn not_ready_requeue(&self) -> Duration {
        Duration::from_secs(self.not_ready_requeue_secs)
    }

    pub fn error_backoff_initial(&self) -> Duration {
        Duration::from_secs(self.error_backoff_initial_secs)
    }

    pub fn error_backoff_max(&self) -> Duration {
        Duration::from_secs(self.error_backoff_max_secs)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_log_level")]
    pub log_level: LevelFilter,

    #[serde(default = "KonnectArgs::default")]
    pub konnect: KonnectArgs,

    #[serde(default = "OperatorArgs::default")]
    pub operator: OperatorArgs,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            konnect: KonnectArgs::default(),
            operator: OperatorArgs::default(),
        }
    }
}

pub fn get_config() -> CommonResult<&'static Settings> {
    CONFIG_INSTANCE.get().ok_or(CommonError::ConfigNotInitialized)
}

pub fn set_config(settings: Settings) -> CommonResult<&'static Settings> {
    CONFIG_INSTANCE
        .set(settings)
        .map_err(|_| CommonError::ConfigAlreadyInitialized)?;
    get_config()
}

impl Settings {
    /// `root` is either a settings file or a directory holding `config.*`.
    pub fn from_root(root: Option<PathBuf>) -> CommonResult<Self> {
        let curr_dir = std::env::current_dir().context("unable to get working directory")?;
        let root = root.unwrap_or(curr_dir);
        let root = canonicalize(root).context("unable to canonicalize root directory")?;

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let mut s = config::Config::builder();
        if root.is_file() {
            s = s.add_source(File::from(root.as_path()));
        }
        s = s
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config.{}", run_mode)).required(false));
        if root.is_dir() {
            s = s.add_source(File::with_name(&root.join("config").to_string_lossy()).required(false));
        }
        let s = s
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let cfg = s.try_deserialize()?;
        Ok(cfg)
    }
}

fn default_log_level() -> LevelFilter {
    LevelFilter::Info
}

fn default_server_url() -> String {
    "https://us.api.konghq.com".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_sync_period_secs() -> u64 {
    60
}

fn default_not_ready_requeue_secs() -> u64 {
    5
}

fn default_error_backoff_initial_secs() -> u64 {
    1
}

fn default_error_backoff_max_secs() -> u64 {
    300
}

fn default_concurrency() -> u16 {
    4
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_any_source() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::from_root(Some(dir.path().to_path_buf())).unwrap();

        assert_eq!(settings.log_level, LevelFilter::Info);
        assert_eq!(settings.operator.sync_period(), Duration::from_secs(60));
        assert_eq!(settings.operator.not_ready_requeue(), Duration::from_secs(5));
        assert_eq!(settings.konnect.request_timeout(), Duration::from_secs(30));
        assert_eq!(settings.operator.namespace, None);
    }

    #[test]
    fn test_reads_explicit_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ksync.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "log_level: debug\nkonnect:\n  server_url: https://eu.api.konghq.com\n  token: kpat_test\noperator:\n  sync_period_secs: 15\n  namespace: kong"
        )
        .unwrap();

        let settings = Settings::from_root(Some(path)).unwrap();

        assert_eq!(settings.log_level, LevelFilter::Debug);
        assert_eq!(settings.konnect.server_url, "https://eu.api.konghq.com");
        assert_eq!(settings.konnect.token, "kpat_test");
        assert_eq!(settings.operator.sync_period_secs, 15);
        assert_eq!(settings.operator.namespace.as_deref(), Some("kong"));
        // untouched keys keep their defaults
        assert_eq!(settings.operator.error_backoff_max_secs, 300);
    }

    #[test]
    fn test_reads_config_from_root_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "[operator]\nconcurrency = 9\n",
        )
        .unwrap();

        let settings = Settings::from_root(Some(dir.path().to_path_buf())).unwrap();

        assert_eq!(settings.operator.concurrency, 9);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");

        let err = Settings::from_root(Some(missing)).unwrap_err();

        assert!(matches!(err, CommonError::Runtime(_)));
        assert!(err.to_string().contains("unable to canonicalize root directory"));
    }
}
