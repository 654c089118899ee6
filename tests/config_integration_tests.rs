//! Integration tests for ConfigManager and the settings file
//!
//! These tests verify:
//! - Settings loading and saving
//! - Defaults when the file is missing or partial
//! - Auto-fill settings feeding the form filler

use camino::Utf8PathBuf;
use std::fs;
use tempfile::TempDir;
use vehicle_config_audit::ConfigManager;
use vehicle_config_audit::models::{AppSettings, EditedFields};
use vehicle_config_audit::services::autofill;

fn create_test_config_dir() -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    (temp_dir, config_path)
}

#[test]
fn test_create_config_manager() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    assert_eq!(manager.config_dir(), &config_path);
}

#[test]
fn test_config_dir_is_created() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let nested = config_path.join("Vehicle Config Audit Data");
    assert!(!nested.exists());

    ConfigManager::new(&nested).unwrap();
    assert!(nested.is_dir());
}

#[test]
fn test_load_default_settings() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    let settings = manager.load_settings_file().unwrap();

    assert_eq!(settings.mods_root, None);
    assert!(settings.backup_on_save);
    assert!(!settings.debug_mode);
    assert_eq!(settings.autofill.brand, "Custom");
    assert_eq!(settings.autofill.country, "United States");
    assert_eq!(settings.autofill.value, 5000.0);
    assert_eq!(settings.autofill.population, 1000);
}

#[test]
fn test_partial_settings_file() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    fs::write(
        manager.settings_path(),
        "Mods Root: /games/BeamNG/mods\nAuto Fill:\n  Brand: Ibishu\n  Use Population: false\n",
    )
    .unwrap();

    let settings = manager.load_settings_file().unwrap();
    assert_eq!(settings.mods_root, Some(Utf8PathBuf::from("/games/BeamNG/mods")));
    assert!(settings.backup_on_save);
    assert_eq!(settings.autofill.brand, "Ibishu");
    assert!(!settings.autofill.use_population);
    assert!(settings.autofill.use_brand);
}

#[test]
fn test_save_and_reload_settings() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    let mut settings = AppSettings::default();
    settings.backup_on_save = false;
    settings.autofill.year = Some(1987);
    settings.autofill.body_style = "Wagon".to_string();
    manager.save_settings(&settings).unwrap();

    let yaml = fs::read_to_string(manager.settings_path()).unwrap();
    assert!(yaml.contains("Backup On Save: false"));
    assert!(yaml.contains("Body Style: Wagon"));

    let loaded = manager.load_settings_file().unwrap();
    assert_eq!(loaded, settings);
}

#[test]
fn test_settings_drive_autofill() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();
    fs::write(
        manager.settings_path(),
        "Auto Fill:\n  Country: Japan\n  Year: 1995\n  Use Value: false\n",
    )
    .unwrap();
    let settings = manager.load_settings_file().unwrap();

    let mut form = EditedFields {
        brand: "Hirochi".to_string(),
        ..Default::default()
    };
    let filled = autofill::fill_missing(&mut form, &settings.autofill, 2024);

    assert_eq!(form.brand, "Hirochi");
    assert_eq!(form.country, "Japan");
    assert_eq!(form.year_min, "1995");
    assert!(form.value.is_empty());
    assert!(!filled.contains(&"Value"));
}
