//! Fill blank form fields from [`AutoFillSettings`].

use crate::models::{AutoFillSettings, EditedFields};
use chrono::Datelike;

/// Year used when the settings leave `Year` unset.
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Fill every enabled field that is blank in `edited`.
///
/// Fields that already hold text are never overwritten. Returns the labels of
/// the fields that were filled, in form order.
pub fn fill_missing(
    edited: &mut EditedFields,
    settings: &AutoFillSettings,
    current_year: i32,
) -> Vec<&'static str> {
    let mut filled = Vec::new();
    let year = settings.year.unwrap_or(current_year).to_string();

    let mut fill = |label: &'static str, enabled: bool, slot: &mut String, value: &str| {
        if enabled && slot.trim().is_empty() {
            *slot = value.to_string();
            filled.push(label);
        }
    };

    fill("Brand", settings.use_brand, &mut edited.brand, &settings.brand);
    fill("Country", settings.use_country, &mut edited.country, &settings.country);
    fill("Type", settings.use_type, &mut edited.vehicle_type, &settings.vehicle_type);
    fill(
        "Body Style",
        settings.use_body_style,
        &mut edited.body_style,
        &settings.body_style,
    );
    fill(
        "Config Type",
        settings.use_config_type,
        &mut edited.config_type,
        &settings.config_type,
    );
    fill("Year Min", settings.use_year, &mut edited.year_min, &year);
    fill("Year Max", settings.use_year, &mut edited.year_max, &year);
    fill(
        "Value",
        settings.use_value,
        &mut edited.value,
        &settings.value.to_string(),
    );
    fill(
        "Population",
        settings.use_population,
        &mut edited.population,
        &settings.population.to_string(),
    );

    if !filled.is_empty() {
        tracing::debug!("Auto-filled {}", filled.join(", "));
    }
    filled
}
