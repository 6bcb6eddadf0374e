use std::time::Duration;

const BONUS_FLASH_VAR: &str = "BONUS_FLASH_MS";
const DEFAULT_BONUS_FLASH: Duration = Duration::from_millis(1200);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a whole number of milliseconds, got {value:?}")]
    InvalidDuration { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// How long the "+1"/"-1" message stays in the chat after a theme switch.
    pub bonus_flash: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bonus_flash: DEFAULT_BONUS_FLASH,
        }
    }
}

impl Config {
    /// `TELOXIDE_TOKEN` is not read here, `Bot::from_env` takes care of it.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup(BONUS_FLASH_VAR) {
            let millis = value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidDuration {
                    var: BONUS_FLASH_VAR,
                    value: value.clone(),
                })?;
            config.bonus_flash = Duration::from_millis(millis);
        }

        Ok(config)
    }
}
