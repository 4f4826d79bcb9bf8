#![warn(clippy::pedantic)]

mod config;
mod solver;

use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
    sync::atomic::{AtomicBool, Ordering},
    thread,
    time::Duration,
};

use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{self, WrapErr, bail, eyre};
use color_resolver::{
    ColorResolver, ComputeProfile, Resolution, ResolvedCube, Scan, geometry::render_layout,
};
use config::CliConfig;
use crossbeam_channel::{after, bounded, select};
use env_logger::TimestampPrecision;
use itertools::Itertools;
use log::{LevelFilter, debug, info, warn};

/// Recovers a legal cube coloring from a color sensor scan
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file to use, in TOML format
    #[arg(long, short = 'c', value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ScanArgs {
    /// JSON scan file mapping facets 1 to 54 to `[r, g, b]` or `"#rrggbb"`.
    /// Read from standard input when absent or `-`.
    scan: Option<PathBuf>,

    /// The JSON scan itself, instead of a file
    #[arg(long, conflicts_with = "scan")]
    rgb: Option<String>,

    /// Override the compute profile from the configuration
    #[arg(long)]
    profile: Option<ComputeProfile>,

    /// Give up resolving after this many seconds
    #[arg(long, value_name = "SECS")]
    time_limit: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a scan and print its encodings.
    Resolve {
        #[command(flatten)]
        scan: ScanArgs,

        #[arg(long, value_enum, default_value_t = Format::All)]
        format: Format,
    },
    /// Resolve a scan and ask the configured engine for a solution.
    Solve {
        #[command(flatten)]
        scan: ScanArgs,
    },
    /// Print the facet numbering.
    Layout,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Side letters in U, L, F, R, B, D order
    Kociemba,
    /// Side digits 1 to 6 in U, L, F, R, B, D order
    Cubex,
    /// Side letters in U, R, F, D, L, B order
    Twophase,
    All,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    let config = CliConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Resolve { scan, format } => {
            let cube = match resolve(&config, &scan)? {
                Resolution::Resolved(cube) => cube,
                Resolution::Degraded { cube, defects } => {
                    for defect in &defects {
                        warn!("The scan is not solvable: {defect}");
                    }
                    cube
                }
                Resolution::Cancelled => bail!("Resolution did not finish within the time limit"),
            };
            print_encodings(&cube, format);
        }
        Commands::Solve { scan } => {
            let solver = config
                .solver
                .as_ref()
                .ok_or_else(|| eyre!("No [solver] table in the configuration"))?;
            let cube = match resolve(&config, &scan)? {
                Resolution::Resolved(cube) => cube,
                Resolution::Degraded { defects, .. } => {
                    bail!(
                        "The scan is not solvable ({}); rescan the cube",
                        defects.iter().join(", ")
                    )
                }
                Resolution::Cancelled => bail!("Resolution did not finish within the time limit"),
            };
            let moves = solver::solve(solver, cube.facelets())?;
            println!("{}", moves.join(" "));
        }
        Commands::Layout => println!("{}", render_layout()),
    }

    Ok(())
}

fn read_scan(args: &ScanArgs) -> eyre::Result<Scan> {
    let json = match (&args.rgb, &args.scan) {
        (Some(rgb), _) => rgb.clone(),
        (None, Some(path)) if path.as_os_str() != "-" => fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read scan {}", path.display()))?,
        (None, _) => {
            let mut json = String::new();
            io::stdin().read_to_string(&mut json)?;
            json
        }
    };
    Ok(Scan::from_json(&json)?)
}

fn resolve(config: &CliConfig, args: &ScanArgs) -> eyre::Result<Resolution> {
    let scan = read_scan(args)?;
    let mut resolver_config = config.resolver.clone();
    if let Some(profile) = args.profile {
        resolver_config.profile = profile;
    }
    let time_limit = args
        .time_limit
        .map(Duration::try_from_secs_f64)
        .transpose()
        .wrap_err("Invalid time limit")?;

    let resolver = ColorResolver::new(resolver_config);
    debug!("Resolver configuration: {:?}", resolver.config());
    let cancel = AtomicBool::new(false);
    let resolution = with_time_limit(time_limit, &cancel, || resolver.resolve(&scan, &cancel))?;

    if let Some(cube) = resolution.cube() {
        info!("Resolved cube:\n{}", cube.render());
    }
    Ok(resolution)
}

/// Run `work`, raising `cancel` if it is still running once `time_limit`
/// has passed.
fn with_time_limit<T>(
    time_limit: Option<Duration>,
    cancel: &AtomicBool,
    work: impl FnOnce() -> T,
) -> T {
    let Some(time_limit) = time_limit else {
        return work();
    };

    thread::scope(|s| {
        let (done_tx, done_rx) = bounded::<()>(1);
        s.spawn(move || {
            select! {
                recv(done_rx) -> _ => {},
                recv(after(time_limit)) -> _ => {
                    warn!("Time limit of {:.1}s reached, cancelling", time_limit.as_secs_f64());
                    cancel.store(true, Ordering::Relaxed);
                },
            }
        });
        let out = work();
        // Ignored if the watchdog already gave up
        let _ = done_tx.send(());
        out
    })
}

fn print_encodings(cube: &ResolvedCube, format: Format) {
    let facelets = cube.facelets();
    match format {
        Format::Kociemba => println!("{}", facelets.kociemba()),
        Format::Cubex => println!("{}", facelets.cubex_string()),
        Format::Twophase => println!("{}", facelets.twophase_input()),
        Format::All => {
            println!("kociemba: {}", facelets.kociemba());
            println!("cubex:    {}", facelets.cubex_string());
            println!("twophase: {}", facelets.twophase_input());
        }
    }
}
