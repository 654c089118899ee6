use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Settings from `Vehicle Config Audit.yaml`
///
/// Passed explicitly into scan/save entry points; nothing here is global.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(rename = "Mods Root", default)]
    pub mods_root: Option<Utf8PathBuf>,

    #[serde(rename = "Backup On Save", default = "default_true")]
    pub backup_on_save: bool,

    #[serde(rename = "Debug Mode", default)]
    pub debug_mode: bool,

    #[serde(rename = "Auto Fill", default)]
    pub autofill: AutoFillSettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            mods_root: None,
            backup_on_save: true,
            debug_mode: false,
            autofill: AutoFillSettings::default(),
        }
    }
}

/// Defaults used to fill blank fields of the edit form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoFillSettings {
    #[serde(rename = "Brand")]
    pub brand: String,

    #[serde(rename = "Country")]
    pub country: String,

    #[serde(rename = "Type")]
    pub vehicle_type: String,

    #[serde(rename = "Body Style")]
    pub body_style: String,

    #[serde(rename = "Config Type")]
    pub config_type: String,

    /// `None` means the current year
    #[serde(rename = "Year")]
    pub year: Option<i32>,

    #[serde(rename = "Value")]
    pub value: f64,

    #[serde(rename = "Population")]
    pub population: i32,

    #[serde(rename = "Use Brand")]
    pub use_brand: bool,

    #[serde(rename = "Use Country")]
    pub use_country: bool,

    #[serde(rename = "Use Type")]
    pub use_type: bool,

    #[serde(rename = "Use Body Style")]
    pub use_body_style: bool,

    #[serde(rename = "Use Config Type")]
    pub use_config_type: bool,

    #[serde(rename = "Use Year")]
    pub use_year: bool,

    #[serde(rename = "Use Value")]
    pub use_value: bool,

    #[serde(rename = "Use Population")]
    pub use_population: bool,
}

impl Default for AutoFillSettings {
    fn default() -> Self {
        Self {
            brand: "Custom".to_string(),
            country: "United States".to_string(),
            vehicle_type: "Car".to_string(),
            body_style: "Sedan".to_string(),
            config_type: "Custom".to_string(),
            year: None,
            value: 5000.0,
            population: 1000,
            use_brand: true,
            use_country: true,
            use_type: true,
            use_body_style: true,
            use_config_type: true,
            use_year: true,
            use_value: true,
            use_population: true,
        }
    }
}

/// Named rarity levels for the `Population` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PopulationPreset {
    UltraRare,
    Rare,
    Uncommon,
    Common,
    VeryCommon,
}

impl PopulationPreset {
    /// Rarest first
    pub const ALL: [PopulationPreset; 5] = [
        PopulationPreset::UltraRare,
        PopulationPreset::Rare,
        PopulationPreset::Uncommon,
        PopulationPreset::Common,
        PopulationPreset::VeryCommon,
    ];

    pub fn value(self) -> i32 {
        match self {
            PopulationPreset::UltraRare => 25,
            PopulationPreset::Rare => 100,
            PopulationPreset::Uncommon => 400,
            PopulationPreset::Common => 1500,
            PopulationPreset::VeryCommon => 6000,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PopulationPreset::UltraRare => "Ultra-rare",
            PopulationPreset::Rare => "Rare",
            PopulationPreset::Uncommon => "Uncommon",
            PopulationPreset::Common => "Common",
            PopulationPreset::VeryCommon => "Very common",
        }
    }
}

impl fmt::Display for PopulationPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PopulationPreset {
    type Err = String;

    /// Accepts the label in any case, with spaces, dashes or underscores
    /// between words (`very common`, `Very-Common`, `ultra_rare`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();

        Self::ALL
            .into_iter()
            .find(|preset| preset.label().replace('-', "").replace(' ', "").to_lowercase() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|p| p.label()).collect();
                format!("unknown population preset `{}` (expected one of: {})", s, names.join(", "))
            })
    }
}

fn default_true() -> bool {
    true
}
