use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::error::DliPowerError;

pub const CONFIG_FILE_NAME: &str = ".dlipower.conf";
pub const DEFAULT_HOSTNAME: &str = "192.168.0.100";
pub const DEFAULT_USERID: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "4321";
pub const DEFAULT_TIMEOUT: u64 = 20;
pub const DEFAULT_CYCLETIME: f64 = 3.0;

/// Per-user switch defaults kept in `~/.dlipower.conf`.
///
/// Fields the file leaves out fall back to `DLIPOWER_*` environment variables
/// and then to the factory settings of a Digital Loggers switch.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SwitchDefaults {
    pub hostname: Option<String>,
    pub userid: Option<String>,
    pub password: Option<String>,
    pub timeout: Option<u64>,
    pub cycletime: Option<f64>,
}

impl SwitchDefaults {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn config_path() -> Option<PathBuf> {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(CONFIG_FILE_NAME))
    }

    pub fn load() -> Result<Self, DliPowerError> {
        match Self::config_path() {
            Some(config_path) if config_path.exists() => Self::load_from(&config_path),
            _ => Ok(Self::empty()),
        }
    }

    pub fn load_from(config_path: &Path) -> Result<Self, DliPowerError> {
        let config_file_string = fs::read_to_string(config_path)?;
        toml::from_str(&config_file_string).map_err(|error| {
            DliPowerError::Config(format!("{}: {}", config_path.display(), error))
        })
    }

    pub fn save(&self) -> Result<(), DliPowerError> {
        match Self::config_path() {
            Some(config_path) => self.save_to(&config_path),
            None => Err(DliPowerError::Config("HOME is not set, nowhere to save defaults".to_string())),
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<(), DliPowerError> {
        let config_file_string = toml::to_string_pretty(self)
            .map_err(|error| DliPowerError::Config(error.to_string()))?;
        fs::write(config_path, config_file_string)?;
        Ok(())
    }

    pub fn hostname(&self) -> String {
        self.hostname.clone().unwrap_or_else(|| {
            env::var("DLIPOWER_HOSTNAME").unwrap_or_else(|_| DEFAULT_HOSTNAME.to_string())
        })
    }

    pub fn userid(&self) -> String {
        self.userid.clone().unwrap_or_else(|| {
            env::var("DLIPOWER_USERID").unwrap_or_else(|_| DEFAULT_USERID.to_string())
        })
    }

    pub fn password(&self) -> String {
        self.password.clone().unwrap_or_else(|| {
            env::var("DLIPOWER_PASSWORD").unwrap_or_else(|_| DEFAULT_PASSWORD.to_string())
        })
    }

    pub fn timeout(&self) -> u64 {
        self.timeout.unwrap_or_else(|| {
            env::var("DLIPOWER_TIMEOUT")
                .ok()
                .and_then(|timeout| timeout.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT)
        })
    }

    pub fn cycletime(&self) -> f64 {
        self.cycletime.unwrap_or_else(|| {
            env::var("DLIPOWER_CYCLETIME")
                .ok()
                .and_then(|cycletime| cycletime.parse().ok())
                .unwrap_or(DEFAULT_CYCLETIME)
        })
    }
}

/// Connection parameters for one switch. `None` means "use the default".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwitchConfig {
    pub hostname: Option<String>,
    pub userid: Option<String>,
    pub password: Option<String>,
    pub timeout: Option<u64>,
    pub cycletime: Option<f64>,
}

impl SwitchConfig {
    pub fn resolve(self, defaults: &SwitchDefaults) -> Result<SwitchSettings, DliPowerError> {
        let timeout = self.timeout.unwrap_or_else(|| defaults.timeout());
        let cycletime = self.cycletime.unwrap_or_else(|| defaults.cycletime());

        if timeout == 0 {
            return Err(DliPowerError::Config("timeout must be at least one second".to_string()));
        }
        let cycle_duration = Duration::try_from_secs_f64(cycletime)
            .map_err(|error| DliPowerError::Config(format!("cycletime {}: {}", cycletime, error)))?;

        Ok(SwitchSettings {
            hostname: self.hostname.unwrap_or_else(|| defaults.hostname()),
            userid: self.userid.unwrap_or_else(|| defaults.userid()),
            password: self.password.unwrap_or_else(|| defaults.password()),
            timeout: Duration::from_secs(timeout),
            cycletime: cycle_duration,
        })
    }
}

/// Fully resolved connection parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchSettings {
    pub hostname: String,
    pub userid: String,
    pub password: String,
    pub timeout: Duration,
    pub cycletime: Duration,
}

impl SwitchSettings {
    pub fn base_url(&self) -> String {
        let hostname = self.hostname.trim_end_matches('/');
        if hostname.starts_with("http://") || hostname.starts_with("https://") {
            hostname.to_string()
        } else {
            format!("http://{}", hostname)
        }
    }
}

impl From<&SwitchSettings> for SwitchDefaults {
    fn from(settings: &SwitchSettings) -> Self {
        Self {
            hostname: Some(settings.hostname.clone()),
            userid: Some(settings.userid.clone()),
            password: Some(settings.password.clone()),
            timeout: Some(settings.timeout.as_secs()),
            cycletime: Some(settings.cycletime.as_secs_f64()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_defaults() -> SwitchDefaults {
        SwitchDefaults {
            hostname: Some("10.1.1.1".to_string()),
            userid: Some("ops".to_string()),
            password: Some("hunter2".to_string()),
            timeout: Some(7),
            cycletime: Some(1.5),
        }
    }

    #[test]
    fn explicit_values_win_over_defaults() {
        let config = SwitchConfig {
            hostname: Some("10.0.0.1".to_string()),
            userid: Some("admin".to_string()),
            password: Some("secret".to_string()),
            timeout: Some(30),
            cycletime: None,
        };
        let settings = config.resolve(&file_defaults()).unwrap();
        assert_eq!(settings.hostname, "10.0.0.1");
        assert_eq!(settings.password, "secret");
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert_eq!(settings.cycletime, Duration::from_millis(1500));
    }

    #[test]
    fn missing_values_come_from_defaults_file() {
        let settings = SwitchConfig::default().resolve(&file_defaults()).unwrap();
        assert_eq!(settings.hostname, "10.1.1.1");
        assert_eq!(settings.userid, "ops");
        assert_eq!(settings.timeout, Duration::from_secs(7));
    }

    #[test]
    fn negative_cycletime_is_rejected() {
        let config = SwitchConfig { cycletime: Some(-1.0), ..SwitchConfig::default() };
        assert!(matches!(config.resolve(&file_defaults()), Err(DliPowerError::Config(_))));
    }

    #[test]
    fn base_url_adds_scheme_only_when_missing() {
        let mut settings = SwitchConfig::default().resolve(&file_defaults()).unwrap();
        assert_eq!(settings.base_url(), "http://10.1.1.1");
        settings.hostname = "https://pdu.example.com/".to_string();
        assert_eq!(settings.base_url(), "https://pdu.example.com");
    }

    #[test]
    fn defaults_file_round_trips_through_disk() {
        let directory = tempfile::tempdir().unwrap();
        let config_path = directory.path().join(CONFIG_FILE_NAME);

        file_defaults().save_to(&config_path).unwrap();
        assert_eq!(SwitchDefaults::load_from(&config_path).unwrap(), file_defaults());
    }

    #[test]
    fn partial_defaults_file_is_accepted() {
        let directory = tempfile::tempdir().unwrap();
        let config_path = directory.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "hostname = \"pdu1\"\ntimeout = 5\n").unwrap();

        let defaults = SwitchDefaults::load_from(&config_path).unwrap();
        assert_eq!(defaults.hostname.as_deref(), Some("pdu1"));
        assert_eq!(defaults.timeout(), 5);
        assert_eq!(defaults.userid, None);
    }

    #[test]
    fn malformed_defaults_file_is_a_config_error() {
        let directory = tempfile::tempdir().unwrap();
        let config_path = directory.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "timeout = \"soon\"").unwrap();

        assert!(matches!(SwitchDefaults::load_from(&config_path), Err(DliPowerError::Config(_))));
    }
}
