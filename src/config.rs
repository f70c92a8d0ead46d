use crate::classes::ClassRegistry;
use crate::error::AppError;
use crate::export::{CSV_FILENAME, SUMMARY_FILENAME};
use crate::pipeline::decode::EncodingKind;
use crate::pipeline::orchestration::{BatchAnalyzer, BatchAnalyzerBuilder};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "maskstat.toml";
pub const ENV_PREFIX: &str = "MASKSTAT";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub analysis: AnalysisSettings,
    pub batch: BatchSettings,
    pub export: ExportSettings,
    pub input: InputSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// How a pixel maps to a class value.
    pub channel: EncodingKind,
    /// Keep "Out of Focus" out of the percentage denominator.
    pub exclude_out_of_focus: bool,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            channel: EncodingKind::Red,
            exclude_out_of_focus: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    pub max_concurrency: usize,
    pub decode_timeout_ms: Option<u64>,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            max_concurrency: 8,
            decode_timeout_ms: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub output_dir: PathBuf,
    pub csv_filename: String,
    pub summary_filename: String,
    pub chart_filename: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            csv_filename: CSV_FILENAME.to_string(),
            summary_filename: SUMMARY_FILENAME.to_string(),
            chart_filename: "chart_series.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    pub mask_suffix: String,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            mask_suffix: "_mask.png".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Defaults, then the optional TOML file, then `MASKSTAT__SECTION__KEY` variables.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        Self::load_from(Self::file_layer(path).add_source(Self::environment()))
    }

    /// Builder holding only the settings file layer.
    pub fn file_layer(path: Option<&Path>) -> ConfigBuilder<DefaultState> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };
        Config::builder().add_source(file)
    }

    pub fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    pub fn load_from(builder: ConfigBuilder<DefaultState>) -> Result<Self, AppError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.batch.max_concurrency == 0 {
            return Err(AppError::Settings(
                "Max concurrency must be greater than 0".to_string(),
            ));
        }

        if self.batch.decode_timeout_ms == Some(0) {
            return Err(AppError::Settings(
                "Decode timeout must be greater than 0".to_string(),
            ));
        }

        if self.input.mask_suffix.is_empty() {
            return Err(AppError::Settings("Mask suffix must not be empty".to_string()));
        }

        let filenames = [
            &self.export.csv_filename,
            &self.export.summary_filename,
            &self.export.chart_filename,
        ];
        if filenames.iter().any(|name| name.trim().is_empty()) {
            return Err(AppError::Settings(
                "Export filenames must not be empty".to_string(),
            ));
        }

        if self.logging.level.parse::<tracing::Level>().is_err() {
            return Err(AppError::Settings(format!(
                "Unknown log level '{}'",
                self.logging.level
            )));
        }

        Ok(())
    }

    pub fn registry(&self) -> ClassRegistry {
        if self.analysis.exclude_out_of_focus {
            ClassRegistry::grandqc()
        } else {
            ClassRegistry::grandqc_with_exclusion(None)
        }
    }

    pub fn log_level(&self) -> tracing::Level {
        self.logging.level.parse().unwrap_or(tracing::Level::INFO)
    }

    pub fn analyzer_builder(&self, registry: Arc<ClassRegistry>) -> BatchAnalyzerBuilder {
        let mut builder = BatchAnalyzer::builder(registry)
            .encoding(self.analysis.channel.build())
            .max_concurrency(self.batch.max_concurrency);
        if let Some(ms) = self.batch.decode_timeout_ms {
            builder = builder.decode_timeout(Duration::from_millis(ms));
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.analysis.channel, EncodingKind::Red);
        assert_eq!(settings.export.csv_filename, "artifact_analysis.csv");
        assert_eq!(settings.input.mask_suffix, "_mask.png");
        assert_eq!(settings.registry().excluded_from_denominator(), Some(6));
    }

    #[test]
    fn rejects_zero_concurrency() {
        let mut settings = Settings::default();
        settings.batch.max_concurrency = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn rejects_unknown_log_level() {
        let mut settings = Settings::default();
        settings.logging.level = "loud".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn loads_overrides_from_toml_file() {
        let path = std::env::temp_dir().join(format!("maskstat-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            "[analysis]\nchannel = \"green\"\nexclude_out_of_focus = false\n\n[batch]\nmax_concurrency = 2\ndecode_timeout_ms = 500\n",
        )
        .unwrap();

        let settings = Settings::load_from(Settings::file_layer(Some(&path))).unwrap();
        assert_eq!(settings.analysis.channel, EncodingKind::Green);
        assert_eq!(settings.batch.max_concurrency, 2);
        assert_eq!(settings.batch.decode_timeout_ms, Some(500));
        assert_eq!(settings.registry().excluded_from_denominator(), None);
        assert_eq!(settings.export.summary_filename, "summary_statistics.csv");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("maskstat-absent-{}.toml", uuid::Uuid::new_v4()));
        assert!(matches!(
            Settings::load_from(Settings::file_layer(Some(&path))),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn environment_overrides_file_values() {
        let path = std::env::temp_dir().join(format!("maskstat-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[batch]\nmax_concurrency = 2\n").unwrap();

        let vars = [
            ("MASKSTAT__BATCH__MAX_CONCURRENCY", "3"),
            ("MASKSTAT__ANALYSIS__CHANNEL", "blue"),
            ("OTHER__BATCH__MAX_CONCURRENCY", "9"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let builder = Settings::file_layer(Some(&path))
            .add_source(Settings::environment().source(Some(vars)));

        let settings = Settings::load_from(builder).unwrap();
        assert_eq!(settings.batch.max_concurrency, 3);
        assert_eq!(settings.analysis.channel, EncodingKind::Blue);

        std::fs::remove_file(&path).unwrap();
    }
}
