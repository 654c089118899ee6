use crate::models::AppSettings;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use ::config::{Config, ConfigError, Environment};
use std::fs;

/// Prefix of the environment variables that override file settings.
pub const ENV_PREFIX: &str = "VCA";

/// Configuration manager for the `Vehicle Config Audit.yaml` settings file.
///
/// Settings are read from YAML, then `VCA_MODS_ROOT`, `VCA_BACKUP_ON_SAVE`
/// and `VCA_DEBUG_MODE` from the environment are layered on top.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    settings_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the specified configuration directory.
    ///
    /// # Arguments
    /// * `config_dir` - Directory holding the settings file (created if missing)
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            settings_path: config_dir.join("Vehicle Config Audit.yaml"),
            config_dir,
        })
    }

    /// Load the settings file without environment overrides.
    ///
    /// # Returns
    /// The loaded AppSettings, or defaults if the file doesn't exist
    pub fn load_settings_file(&self) -> Result<AppSettings> {
        if !self.settings_path.exists() {
            tracing::warn!(
                "Settings file not found at {}, using defaults",
                self.settings_path
            );
            return Ok(AppSettings::default());
        }

        let file_contents = fs::read_to_string(&self.settings_path)
            .with_context(|| format!("Failed to read settings: {}", self.settings_path))?;

        // An empty file deserializes as unit, not as a mapping
        if file_contents.trim().is_empty() {
            return Ok(AppSettings::default());
        }

        let settings: AppSettings = serde_yaml_ng::from_str(&file_contents)
            .with_context(|| format!("Failed to parse settings: {}", self.settings_path))?;

        tracing::info!("Loaded settings from {}", self.settings_path);
        Ok(settings)
    }

    /// Load the settings file and apply `VCA_*` environment overrides.
    pub fn load_settings(&self) -> Result<AppSettings> {
        let mut settings = self.load_settings_file()?;
        apply_env_overrides(&mut settings, Environment::with_prefix(ENV_PREFIX))?;
        Ok(settings)
    }

    /// Save the settings file.
    pub fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(settings).context("Failed to serialize settings to YAML")?;

        fs::write(&self.settings_path, yaml_string)
            .with_context(|| format!("Failed to write settings: {}", self.settings_path))?;

        tracing::info!("Saved settings to {}", self.settings_path);
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    pub fn settings_path(&self) -> &Utf8Path {
        &self.settings_path
    }
}

/// Layer values from `source` over `settings`.
///
/// Keys are the lowercased variable names without the prefix, e.g.
/// `VCA_BACKUP_ON_SAVE` becomes `backup_on_save`.
pub fn apply_env_overrides(settings: &mut AppSettings, source: Environment) -> Result<()> {
    let env = Config::builder()
        .add_source(source.try_parsing(true))
        .build()
        .context("Failed to read environment overrides")?;

    if let Some(root) = optional(env.get_string("mods_root"))? {
        tracing::debug!("Mods root overridden from environment: {}", root);
        settings.mods_root = Some(Utf8PathBuf::from(root));
    }
    if let Some(backup) = optional(env.get_bool("backup_on_save"))? {
        settings.backup_on_save = backup;
    }
    if let Some(debug) = optional(env.get_bool("debug_mode"))? {
        settings.debug_mode = debug;
    }

    Ok(())
}

fn optional<T>(value: Result<T, ConfigError>) -> Result<Option<T>> {
    match value {
        Ok(value) => Ok(Some(value)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(e).context("Invalid environment override"),
    }
}
