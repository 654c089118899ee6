//! Vehicle Config Audit - command-line entry point.
//!
//! # Overview
//!
//! Indexes the vehicle configurations of a BeamNG mods folder (plain folders,
//! `unpacked/` folders and zip archives), reports which descriptive fields are
//! missing, audits part values against the model's `.jbeam` files, and writes
//! edits back into the info files.
//!
//! # Execution Flow
//!
//! 1. Load `Vehicle Config Audit.yaml` (plus `VCA_*` environment overrides)
//! 2. Initialize logging → `logs/vehicle-config-audit.<date>`
//! 3. Scan the mods root into a [`Catalog`]
//! 4. Run the subcommand against the catalog
//! 5. Log the session summary

use anyhow::{Context, Result, bail};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use std::time::Instant;
use vehicle_config_audit::logging::{self, LOG_PREFIX};
use vehicle_config_audit::models::{AppSettings, EditedFields, PopulationPreset};
use vehicle_config_audit::services::{auditor, autofill, normalizer, writer};
use vehicle_config_audit::{
    APP_NAME, Catalog, ConfigManager, ConfigQuery, ConfigWriter, Metrics, SortOrder, VERSION,
};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Directory holding `Vehicle Config Audit.yaml`
    #[arg(long, value_name = "DIR", default_value = "Vehicle Config Audit Data")]
    config_dir: Utf8PathBuf,

    #[arg(long, value_name = "DIR", default_value = "logs")]
    log_dir: Utf8PathBuf,

    /// Also log to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List vehicle configurations and their missing fields
    Scan {
        /// Mods root; defaults to `Mods Root` from the settings
        root: Option<Utf8PathBuf>,
        /// Only configurations with at least one missing field
        #[arg(long)]
        missing_only: bool,
        /// Case-insensitive text matched against mod, model, config and name
        #[arg(long, value_name = "TEXT")]
        search: Option<String>,
        /// List incomplete configurations before complete ones
        #[arg(long)]
        missing_first: bool,
        /// Group the listing by mod
        #[arg(long)]
        by_mod: bool,
    },
    /// Audit the parts of one configuration
    Audit {
        #[arg(value_name = "MOD")]
        mod_name: String,
        config: String,
        #[arg(long)]
        root: Option<Utf8PathBuf>,
    },
    /// Fill blank fields from the auto-fill settings and save
    Fill {
        #[arg(value_name = "MOD")]
        mod_name: String,
        config: String,
        #[arg(long)]
        root: Option<Utf8PathBuf>,
        #[arg(long)]
        no_backup: bool,
    },
    /// Set fields by label (`--field "Body Style=Sedan"`) and save
    Set {
        #[arg(value_name = "MOD")]
        mod_name: String,
        config: String,
        #[arg(long)]
        root: Option<Utf8PathBuf>,
        #[arg(
            long = "field",
            value_name = "NAME=VALUE",
            value_parser = parse_assignment,
            required_unless_present = "population_preset"
        )]
        fields: Vec<(String, String)>,
        /// Set Population from a rarity level (ultra-rare, rare, uncommon, common, very-common)
        #[arg(long, value_name = "LEVEL")]
        population_preset: Option<PopulationPreset>,
        #[arg(long)]
        no_backup: bool,
    },
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got `{}`", raw)),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_manager = ConfigManager::new(&cli.config_dir)?;
    let settings = config_manager.load_settings()?;

    let _guard = logging::setup_logging_with_console(
        &cli.log_dir,
        LOG_PREFIX,
        settings.debug_mode,
        cli.verbose,
    )?;
    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let metrics = Metrics::new();
    let result = run(cli.command, &settings, &metrics);
    if let Err(e) = &result {
        tracing::error!("{:#}", e);
    }

    metrics.log_summary();
    result
}

fn run(command: Command, settings: &AppSettings, metrics: &Metrics) -> Result<()> {
    match command {
        Command::Scan {
            root,
            missing_only,
            search,
            missing_first,
            by_mod,
        } => {
            let catalog = load_catalog(root.as_deref(), settings, metrics)?;
            let query = ConfigQuery {
                text: search.unwrap_or_default(),
                missing_only,
            };
            let order = SortOrder { missing_first };

            if by_mod {
                for (mod_name, records) in catalog.grouped_view(&query, order) {
                    println!("{} ({})", mod_name, records.len());
                    for record in records {
                        println!("    {}", describe_record(record));
                    }
                }
            } else {
                for record in catalog.view(&query, order) {
                    println!("{}  {}", record.mod_name(), describe_record(record));
                }
            }

            println!("{}", catalog.status());
            Ok(())
        }
        Command::Audit {
            mod_name,
            config,
            root,
        } => {
            let catalog = load_catalog(root.as_deref(), settings, metrics)?;
            let record = catalog
                .find(&mod_name, &config)
                .with_context(|| format!("No config `{}` in mod `{}`", config, mod_name))?;

            let outcome = auditor::audit(record);
            metrics.record_audit(outcome.report().is_some());
            println!("{}", outcome.describe());
            Ok(())
        }
        Command::Fill {
            mod_name,
            config,
            root,
            no_backup,
        } => {
            let mut catalog = load_catalog(root.as_deref(), settings, metrics)?;
            let record = catalog
                .find_mut(&mod_name, &config)
                .with_context(|| format!("No config `{}` in mod `{}`", config, mod_name))?;

            let mut edited = EditedFields::from_record(record);
            let filled = autofill::fill_missing(&mut edited, &settings.autofill, autofill::current_year());
            if filled.is_empty() {
                println!("Nothing to fill for {}", record.display_path());
                return Ok(());
            }
            println!("Filled: {}", filled.join(", "));

            let config_writer = ConfigWriter::new(settings.backup_on_save && !no_backup);
            save(&config_writer, record, &edited, metrics)
        }
        Command::Set {
            mod_name,
            config,
            root,
            fields,
            population_preset,
            no_backup,
        } => {
            let mut catalog = load_catalog(root.as_deref(), settings, metrics)?;
            let record = catalog
                .find_mut(&mod_name, &config)
                .with_context(|| format!("No config `{}` in mod `{}`", config, mod_name))?;

            let mut edited = EditedFields::from_record(record);
            for (name, value) in fields {
                if !edited.set_by_label(&name, value) {
                    bail!("Unknown field: {}", name);
                }
            }
            if let Some(preset) = population_preset {
                edited.set_population_preset(preset);
            }

            let config_writer = ConfigWriter::new(settings.backup_on_save && !no_backup);
            save(&config_writer, record, &edited, metrics)
        }
    }
}

fn load_catalog(root: Option<&Utf8Path>, settings: &AppSettings, metrics: &Metrics) -> Result<Catalog> {
    let root = root
        .or(settings.mods_root.as_deref())
        .context("No mods root given and none configured (Mods Root / VCA_MODS_ROOT)")?;

    let started = Instant::now();
    let catalog = Catalog::load(root)?;
    metrics.record_scan(catalog.len(), catalog.error_count(), started.elapsed());
    Ok(catalog)
}

fn describe_record(record: &vehicle_config_audit::VehicleConfigRecord) -> String {
    let missing = normalizer::missing_summary(record);
    format!(
        "{}/{}  {}  [{}]{}",
        record.model_key(),
        record.config_key(),
        record.fields.vehicle_name,
        normalizer::status_line(record),
        if missing.is_empty() {
            String::new()
        } else {
            format!("  missing: {}", missing)
        }
    )
}

fn save(
    config_writer: &ConfigWriter,
    record: &mut vehicle_config_audit::VehicleConfigRecord,
    edited: &EditedFields,
    metrics: &Metrics,
) -> Result<()> {
    match config_writer.save(record, edited) {
        Ok(outcome) => {
            metrics.record_save();
            if outcome.backup_created {
                metrics.record_backup();
                println!("Backup written to {}", writer::backup_path(&record.backing_file()));
            }
            println!("Saved {}", record.display_path());
            Ok(())
        }
        Err(e) => {
            metrics.record_save_failure();
            Err(e).with_context(|| format!("Failed to save {}", record.display_path()))
        }
    }
}
