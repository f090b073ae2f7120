use std::path::PathBuf;

use serde::Deserialize;

use crate::prompt::ProcessingMode;

const ENV_PREFIX: &str = "ZIPODE";

/// Runtime settings, read from `ZIPODE_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name used when a report carries no usable fields.
    pub fallback_name: String,
    /// JSON file holding `custom_poem` prompt settings.
    pub custom_settings: Option<PathBuf>,
    pub mode: ProcessingMode,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            fallback_name: "transcript".into(),
            custom_settings: None,
            mode: ProcessingMode::default(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_source(config::Environment::with_prefix(ENV_PREFIX))
    }

    fn from_source<S>(source: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn defaults_without_env() {
        let s = Settings::from_source(env(&[])).unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.mode, ProcessingMode::ZipOde);
    }

    #[test]
    fn env_overrides() {
        let s = Settings::from_source(env(&[
            ("ZIPODE_FALLBACK_NAME", "scan"),
            ("ZIPODE_CUSTOM_SETTINGS", "/etc/zipode/custom.json"),
            ("ZIPODE_MODE", "poem"),
        ]))
        .unwrap();
        assert_eq!(s.fallback_name, "scan");
        assert_eq!(s.custom_settings, Some(PathBuf::from("/etc/zipode/custom.json")));
        assert_eq!(s.mode, ProcessingMode::Poem);
    }
}
