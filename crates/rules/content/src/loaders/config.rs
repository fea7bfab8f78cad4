//! Rules configuration loader.

use std::path::Path;

use rules_core::RulesConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for rules configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Keys missing from the file keep their defaults.
    pub fn load(path: &Path) -> LoadResult<RulesConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<RulesConfig> {
        let config: RulesConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse rules config TOML: {}", e))?;
        tracing::debug!("Loaded rules config: {:?}", config);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "dark_vision_floor = 0.5").unwrap();
        writeln!(file, "vitality_formula = \"12 + grit\"").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.dark_vision_floor, 0.5);
        assert_eq!(config.vitality_formula, "12 + grit");
        assert_eq!(config.night_vision_floor, RulesConfig::DEFAULT_NIGHT_VISION);
        assert_eq!(config.default_tag, RulesConfig::DEFAULT_TAG);
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let error = ConfigLoader::load(&path).unwrap_err().to_string();
        assert!(error.contains("absent.toml"));
    }

    #[test]
    fn bad_toml_is_an_error() {
        assert!(ConfigLoader::parse("night_vision_floor = [").is_err());
    }
}
