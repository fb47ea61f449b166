#![warn(clippy::unwrap_used, clippy::pedantic)]
#![allow(
    clippy::cast_lossless,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::too_many_lines,
    clippy::doc_markdown
)]
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{self, bail, OptionExt};
use config::Session;
use itertools::Itertools;
use orrery::{
    bodies::Catalog,
    kepler::orbits::AU,
    physics::PhysicsParameters,
    report::BodyReport,
    system::SolarSystem,
    time::{DayNumber, Timeline, ANIMATION_SPEEDS},
};
use time::{macros::format_description, Date};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;

#[derive(Parser)]
#[command(name = "orrery", about = "Keplerian solar system propagator")]
struct Cli {
    /// Session file (RON) to start from
    #[arg(short, long, global = true)]
    session: Option<PathBuf>,

    /// Body catalog (TOML) to use instead of the built-in solar system
    #[arg(short, long, global = true)]
    catalog: Option<PathBuf>,

    #[command(flatten)]
    time: TimeArgs,

    /// Days per animation tick
    #[arg(long, global = true)]
    step: Option<f64>,

    #[command(flatten)]
    physics: PhysicsArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct TimeArgs {
    /// Calendar date, YYYY-MM-DD
    #[arg(long, global = true)]
    date: Option<String>,

    /// Days since 2000-01-01
    #[arg(long, global = true, allow_negative_numbers = true)]
    day: Option<f64>,
}

impl TimeArgs {
    fn day_number(&self) -> eyre::Result<Option<DayNumber>> {
        match (&self.date, self.day) {
            (Some(_), Some(_)) => bail!("Pass either --date or --day, not both"),
            (Some(date), None) => {
                let date = Date::parse(date, format_description!("[year]-[month]-[day]"))?;
                Ok(Some(DayNumber::from_date(date)))
            }
            (None, Some(day)) => Ok(Some(DayNumber::new(day))),
            (None, None) => Ok(None),
        }
    }
}

#[derive(Args)]
struct PhysicsArgs {
    /// Gravitational constant multiplier
    #[arg(long, global = true)]
    gravity: Option<f64>,

    /// Eccentricity multiplier
    #[arg(long, global = true)]
    eccentricity: Option<f64>,

    /// Inclination multiplier
    #[arg(long, global = true)]
    inclination: Option<f64>,

    /// Central body mass scale
    #[arg(long, global = true)]
    central_mass: Option<f64>,
}

impl PhysicsArgs {
    fn over(&self, base: PhysicsParameters) -> PhysicsParameters {
        PhysicsParameters {
            gravity: self.gravity.unwrap_or(base.gravity),
            eccentricity: self.eccentricity.unwrap_or(base.eccentricity),
            inclination: self.inclination.unwrap_or(base.inclination),
            central_mass: self.central_mass.unwrap_or(base.central_mass),
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Print the position of every body
    Positions,
    /// Print the inspection report of one body
    Info { body: String },
    /// Print the orbit path of one body in world coordinates (AU)
    Path {
        body: String,
        /// Number of segments
        #[arg(short = 'n', long)]
        samples: Option<usize>,
    },
    /// Run the animation clock and print one body's track
    Animate {
        #[arg(short, long, default_value_t = 10)]
        ticks: u32,
        /// Day number to start from, inside the animation window
        #[arg(long, allow_negative_numbers = true)]
        from: Option<f64>,
        #[arg(short, long, default_value = "Earth")]
        body: String,
    },
    /// Write the effective settings to a session file
    Save { path: PathBuf },
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut session = match &cli.session {
        Some(path) => Session::load(path)?,
        None => Session::default(),
    };
    if let Some(day) = cli.time.day_number()? {
        session.day = Some(day.days());
    }
    if let Some(step) = cli.step {
        session.set_step(step)?;
    }
    let requested = cli.physics.over(session.physics);
    session.physics = requested.clamped();
    if session.physics != requested {
        warn!("Physics modifiers clamped to {:?}", session.physics);
    }

    let catalog = match &cli.catalog {
        Some(path) => config::load_catalog(path)?,
        None => Catalog::solar_system(),
    };
    let start = session.day.map_or_else(DayNumber::now, DayNumber::new);
    let mut system = SolarSystem::new(&catalog, start)?;
    if session.samples != system.path_samples() {
        system.set_path_samples(session.samples);
    }
    if !session.physics.is_neutral() {
        system.apply_physics(session.physics);
    }

    match cli.command {
        Command::Positions => print_positions(&system),
        Command::Info { body } => {
            let id = lookup(&system, &body)?;
            let report = BodyReport::new(&system, id).ok_or_eyre("Body vanished")?;
            println!("{report}");
        }
        Command::Path { body, samples } => {
            let id = lookup(&system, &body)?;
            if let Some(samples) = samples {
                system.set_path_samples(samples);
            }
            let path = system
                .world_orbit_path(id)
                .ok_or_eyre(format!("{body} has no orbit"))?;
            for p in path {
                let p = p / AU;
                println!("{:>12.6} {:>12.6} {:>12.6}", p.x, p.y, p.z);
            }
        }
        Command::Animate { ticks, from, body } => {
            let id = lookup(&system, &body)?;
            let mut timeline = Timeline::new(start);
            timeline.set_step(session.step);
            if !ANIMATION_SPEEDS
                .iter()
                .any(|&speed| f64::from(speed) == timeline.step)
            {
                info!("Stepping {} days per tick", timeline.step);
            }
            if let Some(from) = from {
                let day = timeline.clamp(DayNumber::new(from));
                if day.days() != from {
                    warn!("Starting day {from} is outside the window, using {day:?}");
                }
                system.set_day(day);
            }
            for _ in 0..ticks {
                system.tick(&timeline);
                let b = &system[id];
                let p = b.position / AU;
                println!(
                    "{} {:>12.6} {:>12.6} {:>12.6} {:>8.2}",
                    system.day(),
                    p.x,
                    p.y,
                    p.z,
                    b.rotation_angle
                );
            }
        }
        Command::Save { path } => {
            session.day = Some(start.days());
            session.save(&path)?;
            info!("Saved session to {}", path.display());
        }
    }
    Ok(())
}

fn lookup(system: &SolarSystem, name: &str) -> eyre::Result<orrery::bodies::BodyId> {
    system.id(name).ok_or_eyre(format!(
        "Unknown body {name:?}; known bodies: {}",
        system.bodies().map(|(_, b)| &*b.name).join(", ")
    ))
}

fn print_positions(system: &SolarSystem) {
    println!("{}", system.day());
    println!(
        "{:<10} {:>12} {:>12} {:>12} {:>10} {:>8}",
        "body", "x (AU)", "y (AU)", "z (AU)", "r (AU)", "spin"
    );
    for (_, body) in system.bodies() {
        let p = body.position / AU;
        println!(
            "{:<10} {:>12.6} {:>12.6} {:>12.6} {:>10.6} {:>8.2}",
            body.name,
            p.x,
            p.y,
            p.z,
            p.norm(),
            body.rotation_angle
        );
    }
}
