use chrono_tz::Tz;
use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Settings {
    pub debug: bool,
    pub enable_swagger: bool,
    pub port: u16,
    pub display_timezone: String,
    pub calendar_name: String,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            // APP_PORT, APP_DISPLAY_TIMEZONE, ...
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("debug", false)?
            .set_default("enable_swagger", true)?
            .set_default("port", 8080)?
            .set_default("display_timezone", "Asia/Kolkata")?
            .set_default("calendar_name", "Fitness Studio Classes")?
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        settings.timezone()?;
        Ok(settings)
    }

    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        self.display_timezone.parse::<Tz>().map_err(|_| {
            ConfigError::Message(format!(
                "unknown display timezone: {}",
                self.display_timezone
            ))
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,
            enable_swagger: true,
            port: 8080,
            display_timezone: "Asia/Kolkata".to_string(),
            calendar_name: "Fitness Studio Classes".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    const VARS: [&str; 3] = ["APP_PORT", "APP_DISPLAY_TIMEZONE", "APP_ENABLE_SWAGGER"];

    fn clear_env() {
        for var in VARS {
            unsafe { std::env::remove_var(var) };
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.port, 8080);
        assert!(settings.enable_swagger);
        assert_eq!(settings.timezone().unwrap(), chrono_tz::Asia::Kolkata);
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        unsafe {
            std::env::set_var("APP_PORT", "9090");
            std::env::set_var("APP_DISPLAY_TIMEZONE", "Europe/Warsaw");
            std::env::set_var("APP_ENABLE_SWAGGER", "false");
        }
        let settings = Settings::from_env().unwrap();
        clear_env();
        assert_eq!(settings.port, 9090);
        assert!(!settings.enable_swagger);
        assert_eq!(settings.timezone().unwrap(), chrono_tz::Europe::Warsaw);
    }

    #[test]
    #[serial]
    fn test_invalid_timezone() {
        clear_env();
        unsafe { std::env::set_var("APP_DISPLAY_TIMEZONE", "Mars/Olympus") };
        let result = Settings::from_env();
        clear_env();
        assert!(result.is_err());
    }
}
