use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use climbrs::config::AppConfig;
use climbrs::constants::CUSTOM_CLIMB_ID;
use climbrs::custom_climb::infer_missing;
use climbrs::display::{
    format_distance, format_elevation, format_number, format_percent, format_speed, format_time,
    format_vam, format_weight,
};
use climbrs::environment::EnvironmentSummary;
use climbrs::export::{export_report, ClimbReport, ExportFormat};
use climbrs::logging::init_logging;
use climbrs::storage::{self, FileStore, STORAGE_KEY};
use climbrs::{
    Action, Calculator, CalculatorDerived, CalculatorState, ClimbField, CustomClimbFields,
    GearAnalysis, ImportManager, ReferenceData, UnitSystem,
};

/// climbrs - Climb Performance CLI
///
/// Estimates how long a rider needs for a climb from power, weight and
/// conditions, and which gears keep the cadence comfortable.
#[derive(Parser)]
#[command(name = "climbrs")]
#[command(author = "climbrs Contributors")]
#[command(version)]
#[command(about = "Climb time, VAM and gearing estimator", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Rider and condition overrides applied on top of the saved state
#[derive(Args, Debug, Default)]
struct RiderArgs {
    /// Display units (metric, imperial); also the units of the weights given here
    #[arg(short, long)]
    units: Option<UnitSystem>,

    /// Rider weight in the active units
    #[arg(long)]
    rider_weight: Option<f64>,

    /// Bike weight in the active units
    #[arg(long)]
    bike_weight: Option<f64>,

    /// Sustained power (W)
    #[arg(short, long)]
    power: Option<f64>,

    /// Altitude at the start of the climb (m)
    #[arg(long)]
    altitude: Option<f64>,

    /// Air temperature (°C)
    #[arg(long)]
    temperature: Option<f64>,

    /// Chainring id (see `climbrs gears --list`)
    #[arg(long)]
    chainring: Option<String>,

    /// Cassette id (see `climbrs gears --list`)
    #[arg(long)]
    cassette: Option<String>,
}

impl RiderArgs {
    /// Actions for every option given, in a fixed order
    fn actions(&self, current_units: UnitSystem) -> Vec<Action> {
        let units = self.units.unwrap_or(current_units);
        let mut actions = Vec::new();

        if let Some(unit_system) = self.units {
            actions.push(Action::SetUnitSystem { unit_system });
        }
        if let Some(weight) = self.rider_weight {
            actions.push(Action::rider_weight_in(units, weight));
        }
        if let Some(weight) = self.bike_weight {
            actions.push(Action::bike_weight_in(units, weight));
        }
        if let Some(watts) = self.power {
            actions.push(Action::SetPower { watts });
        }
        if let Some(altitude_m) = self.altitude {
            actions.push(Action::SetAltitude { altitude_m });
        }
        if let Some(temperature_c) = self.temperature {
            actions.push(Action::SetTemperature { temperature_c });
        }
        if let Some(id) = &self.chainring {
            actions.push(Action::SetChainring { id: id.clone() });
        }
        if let Some(id) = &self.cassette {
            actions.push(Action::SetCassette { id: id.clone() });
        }
        actions
    }
}

/// Custom climb values in the active units
#[derive(Args, Debug, Default)]
struct CustomClimbArgs {
    /// Climb length (km or mi)
    #[arg(long)]
    distance: Option<f64>,

    /// Elevation gain (m or ft)
    #[arg(long)]
    elevation: Option<f64>,

    /// Average gradient (%)
    #[arg(long)]
    gradient: Option<f64>,
}

impl CustomClimbArgs {
    fn is_empty(&self) -> bool {
        self.distance.is_none() && self.elevation.is_none() && self.gradient.is_none()
    }

    /// Field edits in canonical units
    fn edits(&self, units: UnitSystem) -> Vec<(ClimbField, f64)> {
        let mut edits = Vec::new();
        if let Some(d) = self.distance {
            edits.push((ClimbField::Distance, units.distance_to_km(d)));
        }
        if let Some(e) = self.elevation {
            edits.push((ClimbField::Elevation, units.elevation_to_m(e)));
        }
        if let Some(g) = self.gradient {
            edits.push((ClimbField::Gradient, g));
        }
        edits
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate time, speed and VAM for a climb
    Climb {
        /// Preset climb id (see `climbrs climbs`)
        id: Option<String>,

        #[command(flatten)]
        custom: CustomClimbArgs,

        /// Build the climb from a GPX track instead
        #[arg(long, value_name = "FILE", conflicts_with = "id")]
        gpx: Option<PathBuf>,

        /// Profile point spacing for GPX tracks (km)
        #[arg(long, default_value_t = climbrs::import::gpx::DEFAULT_SPACING_KM)]
        spacing: f64,

        #[command(flatten)]
        rider: RiderArgs,

        /// Write a report to this file
        #[arg(short, long, value_name = "FILE")]
        export: Option<PathBuf>,

        /// Report format (json, text, csv, svg); defaults to the file extension
        #[arg(short = 'f', long)]
        format: Option<ExportFormat>,

        /// Remember the inputs for next time
        #[arg(short, long)]
        save: bool,
    },

    /// List the preset climbs
    Climbs,

    /// Show cadence for each gear at the current climb speed
    Gears {
        /// List the available chainrings and cassettes instead
        #[arg(short, long)]
        list: bool,

        /// Analyse at this speed (km/h) instead of the climb speed
        #[arg(long)]
        speed: Option<f64>,

        #[command(flatten)]
        rider: RiderArgs,
    },

    /// Infer the missing custom climb value from the other two
    Infer {
        #[command(flatten)]
        custom: CustomClimbArgs,

        /// Field that was just edited and must not be recomputed
        #[arg(long, default_value = "distance")]
        changed: ClimbField,

        /// Units of distance and elevation
        #[arg(short, long, default_value = "metric")]
        units: UnitSystem,
    },

    /// Show air density and power loss at an altitude
    Environment {
        /// Altitude (m)
        #[arg(long, default_value_t = 0.0)]
        altitude: f64,

        /// Air temperature (°C)
        #[arg(long, default_value_t = climbrs::constants::defaults::TEMPERATURE_C)]
        temperature: f64,
    },

    /// Manage the saved calculator state
    State {
        #[command(subcommand)]
        action: StateCommand,
    },

    /// Configure application settings
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Subcommand)]
enum StateCommand {
    /// Print the saved state as JSON
    Show,
    /// Update and save rider inputs
    Set {
        #[command(flatten)]
        rider: RiderArgs,

        /// Selected climb id
        #[arg(long)]
        climb: Option<String>,
    },
    /// Forget the saved state
    Reset,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the active configuration
    Show,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Tabled)]
struct ClimbRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Distance")]
    distance: String,
    #[tabled(rename = "Elevation")]
    elevation: String,
    #[tabled(rename = "Gradient")]
    gradient: String,
    #[tabled(rename = "Category")]
    category: String,
}

#[derive(Tabled)]
struct GearRow {
    #[tabled(rename = "Gear")]
    gear: String,
    #[tabled(rename = "Ratio")]
    ratio: String,
    #[tabled(rename = "Gear inches")]
    inches: String,
    #[tabled(rename = "Cadence")]
    cadence: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&GearAnalysis> for GearRow {
    fn from(gear: &GearAnalysis) -> Self {
        GearRow {
            gear: format!("{}x{}", gear.chainring, gear.cog),
            ratio: format_number(gear.ratio, 2),
            inches: format_number(gear.gear_inches, 1),
            cadence: format!("{:.0} rpm", gear.required_rpm),
            status: gear.status.label().to_string(),
        }
    }
}

#[derive(Tabled)]
struct OptionRow {
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Teeth")]
    teeth: String,
}

/// Everything a command needs: settings, reference tables and the saved state
struct Session {
    config: AppConfig,
    reference: ReferenceData,
    store: FileStore,
    state: CalculatorState,
}

impl Session {
    fn open(config: AppConfig) -> Result<Self> {
        let mut reference = ReferenceData::builtin();
        if let Some(path) = &config.storage.reference_data {
            reference = reference
                .with_overlay_file(path)
                .with_context(|| format!("Failed to load reference data: {}", path.display()))?;
        }

        let store = FileStore::new(config.storage.data_dir.clone());
        let state = storage::load_state_or(&store, config.rider.initial_state());

        Ok(Session {
            config,
            reference,
            store,
            state,
        })
    }

    fn apply(&mut self, actions: Vec<Action>) {
        let state = std::mem::take(&mut self.state);
        self.state = state.apply_all(actions);
    }

    fn calculator(&self) -> Calculator {
        Calculator::new(self.reference.clone(), self.config.physics)
    }

    fn save(&mut self) {
        storage::save_state(&mut self.store, &self.state);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_or_default(cli.config.as_deref());
    let log_config = config.logging.clone().with_verbosity(cli.verbose);
    init_logging(&log_config).context("Failed to initialize logging")?;

    if cli.verbose > 0 {
        eprintln!("{}", format!("Log level: {}", log_config.level.to_filter()).dimmed());
    }

    match cli.command {
        Commands::Climb {
            id,
            custom,
            gpx,
            spacing,
            rider,
            export,
            format,
            save,
        } => {
            let mut session = Session::open(config)?;
            session.apply(rider.actions(session.state.unit_system));

            if let Some(path) = gpx {
                let climb = ImportManager::with_spacing(spacing)
                    .import_file(&path)
                    .with_context(|| format!("Failed to import {}", path.display()))?;
                println!(
                    "{} {} ({} points)",
                    "✓ Imported".green(),
                    climb.name,
                    climb.terrain.profile().map(|p| p.len()).unwrap_or(0)
                );
                let climb_id = climb.id.clone();
                session.reference.climbs.retain(|c| c.id != climb_id);
                session.reference.climbs.push(climb);
                session.apply(vec![Action::SetClimb { climb_id }]);
            } else if !custom.is_empty() {
                let units = session.state.unit_system;
                let mut actions = vec![Action::SetClimb {
                    climb_id: CUSTOM_CLIMB_ID.to_string(),
                }];
                actions.extend(
                    custom
                        .edits(units)
                        .into_iter()
                        .map(|(field, value)| Action::SetCustomClimbField {
                            field,
                            value: Some(value),
                        }),
                );
                session.apply(actions);
            } else if let Some(climb_id) = id {
                session.apply(vec![Action::SetClimb { climb_id }]);
            }

            let derived = session.calculator().derive(&session.state);
            print_climb(&session.state, &derived);

            if let Some(path) = export {
                let report = ClimbReport::new(&session.state, &derived)
                    .context("No climb selected; nothing to export")?;
                let format = match format {
                    Some(format) => format,
                    None => ExportFormat::from_path(&path)?,
                };
                export_report(&report, format, &path)
                    .with_context(|| format!("Failed to export report to {}", path.display()))?;
                println!("{} {}", "✓ Report written to".green(), path.display());
            }

            if save {
                session.save();
            }
        }

        Commands::Climbs => {
            let session = Session::open(config)?;
            let units = session.state.unit_system;
            let rows: Vec<ClimbRow> = session
                .reference
                .climbs
                .iter()
                .map(|c| ClimbRow {
                    id: c.id.clone(),
                    name: c.name.clone(),
                    location: c.location.clone(),
                    distance: format_distance(c.distance_km, units),
                    elevation: format_elevation(c.elevation_m, units),
                    gradient: format_percent(c.gradient_pct, 1),
                    category: c.category.to_string(),
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::rounded()));
        }

        Commands::Gears { list, speed, rider } => {
            let mut session = Session::open(config)?;
            if list {
                print_gear_options(&session.reference);
                return Ok(());
            }
            session.apply(rider.actions(session.state.unit_system));

            let derived = session.calculator().derive(&session.state);
            let speed_kmh = speed.unwrap_or(derived.avg_speed_kmh);
            let gears = match speed {
                Some(s) => climbrs::analyze_gears(
                    session.reference.chainring_teeth(&session.state.selected_chainring_id),
                    session.reference.cassette_cogs(&session.state.selected_cassette_id),
                    s,
                ),
                None => derived.gear_analysis,
            };

            if gears.is_empty() {
                println!("{}", "No climb speed available; pass --speed".yellow());
                return Ok(());
            }
            println!(
                "{} {} / {} at {}",
                "Gearing:".cyan().bold(),
                session.state.selected_chainring_id,
                session.state.selected_cassette_id,
                format_speed(speed_kmh, session.state.unit_system)
            );
            print_gears(&gears);
        }

        Commands::Infer {
            custom,
            changed,
            units,
        } => {
            let mut fields = CustomClimbFields::default();
            for (field, value) in custom.edits(units) {
                fields = fields.with(field, Some(value));
            }
            match infer_missing(&fields, changed) {
                Some(inferred) => {
                    println!("{}", "Inferred climb:".cyan().bold());
                    print_custom_fields(&inferred, units);
                }
                None => {
                    println!(
                        "{}",
                        "Nothing to infer: give at least two values, including the changed one"
                            .yellow()
                    );
                }
            }
        }

        Commands::Environment {
            altitude,
            temperature,
        } => {
            print_environment(&EnvironmentSummary::at(altitude, temperature));
        }

        Commands::State { action } => match action {
            StateCommand::Show => {
                let session = Session::open(config)?;
                println!("{}", serde_json::to_string_pretty(&session.state)?);
            }
            StateCommand::Set { rider, climb } => {
                let mut session = Session::open(config)?;
                let mut actions = rider.actions(session.state.unit_system);
                if let Some(climb_id) = climb {
                    actions.push(Action::SetClimb { climb_id });
                }
                session.apply(actions);
                session.save();
                println!(
                    "{} {}",
                    "✓ State saved to".green(),
                    session.store.path_for(STORAGE_KEY).display()
                );
            }
            StateCommand::Reset => {
                let mut store = FileStore::new(config.storage.data_dir.clone());
                store
                    .remove(STORAGE_KEY)
                    .context("Failed to remove saved state")?;
                println!("{}", "✓ Saved state cleared".green());
            }
        },

        Commands::Config { action } => match action {
            ConfigCommand::Show => {
                println!("{}", toml::to_string_pretty(&config)?);
            }
            ConfigCommand::Init { force } => {
                let path = cli
                    .config
                    .clone()
                    .unwrap_or_else(AppConfig::default_config_path);
                init_config(&path, force)?;
            }
        },
    }

    Ok(())
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        println!(
            "{} {} (use --force to overwrite)",
            "Config already exists:".yellow(),
            path.display()
        );
        return Ok(());
    }
    let mut config = AppConfig::default();
    config.save_to_file(path)?;
    println!("{} {}", "✓ Config written to".green(), path.display());
    Ok(())
}

fn print_climb(state: &CalculatorState, derived: &CalculatorDerived) {
    let units = state.unit_system;

    println!("{}", "Rider".cyan().bold());
    println!(
        "  Weight: {} + {} bike",
        format_weight(derived.rider_weight_kg, units),
        format_weight(derived.bike_weight_kg, units)
    );
    println!(
        "  Power: {:.0} W ({} W/kg, {})",
        state.power_watts,
        format_number(derived.power_to_weight, 2),
        derived.power_category
    );

    let (climb, result) = match (&derived.selected_climb, &derived.climb_result) {
        (Some(climb), Some(result)) => (climb, result),
        _ => {
            if state.is_custom_climb() {
                println!("{}", "Custom climb is incomplete:".yellow());
                print_custom_fields(&state.custom_climb, units);
            } else {
                println!(
                    "{} {}",
                    "Unknown climb:".yellow(),
                    state.selected_climb_id
                );
            }
            return;
        }
    };

    println!();
    println!("{} {}", climb.name.cyan().bold(), format!("({})", climb.category).dimmed());
    if !climb.location.is_empty() {
        println!("  {}", climb.location);
    }
    println!(
        "  {} at {} average, {} gain",
        format_distance(climb.distance_km, units),
        format_percent(climb.gradient_pct, 1),
        format_elevation(climb.elevation_m, units)
    );
    if state.altitude_m != 0.0 {
        println!(
            "  Starts at {}, {} of sea-level power on average",
            format_elevation(state.altitude_m, units),
            format_percent(result.avg_power_percent, 1)
        );
    }

    println!();
    println!("  Time:  {}", format_time(result.time_seconds).green().bold());
    println!("  Speed: {}", format_speed(result.avg_speed_kmh, units));
    println!(
        "  VAM:   {} ({})",
        format_vam(result.vam, units),
        derived.vam_category.unwrap_or("-")
    );

    if !derived.gear_analysis.is_empty() {
        println!();
        println!("{}", "Gears".cyan().bold());
        print_gears(&derived.gear_analysis);
    }
}

fn print_gears(gears: &[GearAnalysis]) {
    let rows: Vec<GearRow> = gears.iter().map(GearRow::from).collect();
    println!("{}", Table::new(rows).with(Style::rounded()));
}

fn print_gear_options(reference: &ReferenceData) {
    let join = |teeth: &[u32]| {
        teeth
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join("/")
    };
    let rows: Vec<OptionRow> = reference
        .chainrings
        .iter()
        .map(|c| OptionRow {
            kind: "chainring",
            id: c.id.clone(),
            label: c.label.clone(),
            teeth: join(&c.teeth),
        })
        .chain(reference.cassettes.iter().map(|c| OptionRow {
            kind: "cassette",
            id: c.id.clone(),
            label: c.label.clone(),
            teeth: join(&c.cogs),
        }))
        .collect();
    println!("{}", Table::new(rows).with(Style::rounded()));
}

fn print_custom_fields(fields: &CustomClimbFields, units: UnitSystem) {
    let show = |value: Option<f64>, render: &dyn Fn(f64) -> String| {
        value.map(render).unwrap_or_else(|| "-".to_string())
    };
    println!(
        "  Distance:  {}",
        show(fields.distance, &|v| format_distance(v, units))
    );
    println!(
        "  Elevation: {}",
        show(fields.elevation, &|v| format_elevation(v, units))
    );
    println!(
        "  Gradient:  {}",
        show(fields.gradient, &|v| format_percent(v, 1))
    );
}

fn print_environment(env: &EnvironmentSummary) {
    println!("{}", "Conditions".cyan().bold());
    println!("  Altitude:    {:.0} m", env.altitude_m);
    println!("  Temperature: {:.0} °C", env.temperature_c);
    println!(
        "  Air density: {:.3} kg/m³ ({:+.1}% vs sea level)",
        env.air_density, env.density_change_percent
    );
    println!("  Oxygen:      {}", format_percent(env.oxygen_percent, 1));

    let loss = format!(
        "{} power available, {} loss ({:?})",
        format_percent(env.power_percent, 1),
        format_percent(env.power_loss_percent, 1),
        env.severity
    );
    let loss = if env.power_loss_percent < 2.0 {
        loss.green()
    } else if env.power_loss_percent < 10.0 {
        loss.yellow()
    } else {
        loss.red()
    };
    println!("  Power:       {}", loss);
}
