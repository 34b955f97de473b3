use anyhow::{anyhow, Result};
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

const CONFIG_PATH_REL_HOME: &str = ".config/yoshitobot/config.toml";

/// Upper bound for `images.history_capacity`; the buffer is scanned on every pick
pub const MAX_HISTORY_CAPACITY: usize = 100_000;

/// Bot configuration
///
/// Read from `~/.config/yoshitobot/config.toml` if present, then overridden by the `BOT_TOKEN`,
/// `IMAGE_FOLDER` and `PORT` environment variables.
#[derive(Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: General,
    pub images: Images,
    pub health: Health,
    pub logging: Logging,
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct General {
    pub discord_token: String,
    pub image_folder: PathBuf,
    /// Prefix for the plain-message form of commands, e.g. `/yoshito`
    pub command_prefix: String,
    /// Name of the random image command
    pub command_name: String,
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Images {
    /// How many recently sent images are excluded from random selection
    pub history_capacity: usize,
    pub caption_max_chars: usize,
    pub download_timeout_seconds: u64,
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Health {
    pub enabled: bool,
    pub bind: String,
    pub port: u16,
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Logging {
    /// Seconds between "still running" log lines.  0 disables them.
    pub heartbeat_seconds: u64,
}

impl Default for General {
    fn default() -> Self {
        Self {
            discord_token: String::new(),
            image_folder: PathBuf::new(),
            command_prefix: "/".to_owned(),
            command_name: "yoshito".to_owned(),
        }
    }
}

impl Default for Images {
    fn default() -> Self {
        Self {
            history_capacity: 50,
            caption_max_chars: 200,
            download_timeout_seconds: 10,
        }
    }
}

impl Default for Health {
    fn default() -> Self {
        Self {
            enabled: true,
            bind: "0.0.0.0".to_owned(),
            port: 8080,
        }
    }
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            heartbeat_seconds: 60,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Missing required setting `{0}`")]
    MissingSetting(&'static str),
    #[error("Invalid value `{value}` for `{name}`")]
    InvalidSetting { name: &'static str, value: String },
    #[error("Image folder `{}` is inaccessible: {source}", .path.to_string_lossy())]
    ImageFolderInaccessible {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Image folder `{}` is not a directory", .0.to_string_lossy())]
    ImageFolderNotDirectory(PathBuf),
}

impl Config {
    fn config_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|p| p.join(CONFIG_PATH_REL_HOME))
            .ok_or(anyhow!("Could not find home directory"))
    }

    pub async fn load() -> Result<Self> {
        let path = Self::config_path()?;

        let mut cfg = match tokio::fs::File::open(&path).await {
            Ok(mut file) => {
                let mut contents = String::new();
                file.read_to_string(&mut contents).await.map_err(|e| {
                    anyhow!(
                        "Could not read configuration at `{}`: {}",
                        path.to_string_lossy(),
                        e
                    )
                })?;
                Self::parse(&contents).map_err(|e| {
                    anyhow!(
                        "Could not parse configuration at `{}`: {}",
                        path.to_string_lossy(),
                        e
                    )
                })?
            }
            // Everything can come from the environment instead
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Config::default(),
            Err(e) => {
                return Err(anyhow!(
                    "Could not open configuration at `{}`: {}",
                    path.to_string_lossy(),
                    e
                ))
            }
        };

        cfg.apply_env(|name| std::env::var(name).ok())?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Override settings with environment variables.  Empty variables count as unset.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        let var = |name: &str| var(name).filter(|value| !value.is_empty());

        if let Some(token) = var("BOT_TOKEN") {
            self.general.discord_token = token;
        }
        if let Some(folder) = var("IMAGE_FOLDER") {
            self.general.image_folder = PathBuf::from(folder);
        }
        if let Some(port) = var("PORT") {
            self.health.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidSetting {
                    name: "PORT",
                    value: port,
                })?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.general.discord_token.trim().is_empty() {
            return Err(ConfigError::MissingSetting("BOT_TOKEN"));
        }
        if self.general.image_folder.as_os_str().is_empty() {
            return Err(ConfigError::MissingSetting("IMAGE_FOLDER"));
        }
        if !(1..=MAX_HISTORY_CAPACITY).contains(&self.images.history_capacity) {
            return Err(ConfigError::InvalidSetting {
                name: "images.history_capacity",
                value: self.images.history_capacity.to_string(),
            });
        }
        if self.general.command_name.is_empty() {
            return Err(ConfigError::MissingSetting("general.command_name"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.images.history_capacity, 50);
        assert_eq!(cfg.images.caption_max_chars, 200);
        assert_eq!(cfg.images.download_timeout_seconds, 10);
        assert_eq!(cfg.health.port, 8080);
        assert_eq!(cfg.general.command_prefix, "/");
        assert_eq!(cfg.general.command_name, "yoshito");
    }

    #[test]
    fn test_parse_partial_file_keeps_defaults() {
        let cfg = Config::parse(
            r#"
            [general]
            discord_token = "abc"
            image_folder = "/srv/images"

            [images]
            history_capacity = 10
            "#,
        )
        .unwrap();

        assert_eq!(cfg.general.discord_token, "abc");
        assert_eq!(cfg.general.image_folder, PathBuf::from("/srv/images"));
        assert_eq!(cfg.images.history_capacity, 10);
        assert_eq!(cfg.images.caption_max_chars, 200);
        assert!(cfg.health.enabled);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_env_overrides_file() {
        let mut cfg = Config::parse("[general]\ndiscord_token = \"file\"\n").unwrap();
        cfg.apply_env(env(&[
            ("BOT_TOKEN", "env"),
            ("IMAGE_FOLDER", "/tmp/images"),
            ("PORT", "9000"),
        ]))
        .unwrap();

        assert_eq!(cfg.general.discord_token, "env");
        assert_eq!(cfg.general.image_folder, PathBuf::from("/tmp/images"));
        assert_eq!(cfg.health.port, 9000);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_empty_env_is_ignored() {
        let mut cfg = Config::parse("[general]\ndiscord_token = \"file\"\n").unwrap();
        cfg.apply_env(env(&[("BOT_TOKEN", "")])).unwrap();
        assert_eq!(cfg.general.discord_token, "file");
    }

    #[test]
    fn test_bad_port() {
        let mut cfg = Config::default();
        let err = cfg.apply_env(env(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSetting { name: "PORT", .. }));
    }

    #[test]
    fn test_missing_required_settings() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::MissingSetting("BOT_TOKEN"))
        ));

        cfg.apply_env(env(&[("BOT_TOKEN", "abc")])).unwrap();
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::MissingSetting("IMAGE_FOLDER"))
        ));
    }

    #[test]
    fn test_zero_history_capacity_rejected() {
        let mut cfg = Config::default();
        cfg.apply_env(env(&[("BOT_TOKEN", "abc"), ("IMAGE_FOLDER", "/srv")]))
            .unwrap();
        cfg.images.history_capacity = 0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidSetting { .. })
        ));
    }

    #[test]
    fn test_history_capacity_bounds() {
        let mut cfg = Config::default();
        cfg.apply_env(env(&[("BOT_TOKEN", "abc"), ("IMAGE_FOLDER", "/srv")]))
            .unwrap();

        cfg.images.history_capacity = MAX_HISTORY_CAPACITY;
        assert!(cfg.validate().is_ok());

        for capacity in [MAX_HISTORY_CAPACITY + 1, usize::MAX] {
            cfg.images.history_capacity = capacity;
            assert!(matches!(
                cfg.validate(),
                Err(ConfigError::InvalidSetting {
                    name: "images.history_capacity",
                    ..
                })
            ));
        }
    }
}
