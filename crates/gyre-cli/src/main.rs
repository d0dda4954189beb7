mod output;
mod realtime;
mod simulate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use gyre_config::{default_config_path, load_config, load_effective, load_script, save_config, to_toml};
use gyre_core::{EngineConfig, Viewport};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::output::Format;
use crate::realtime::RunOptions;
use crate::simulate::SimulateOptions;

#[derive(Parser)]
#[command(name = "gyre", about = "Quaternion orientation engine: drift, pointer tracking, idle handoff")]
struct Cli {
    /// Config file (default: $GYRE_CONFIG, then ~/.gyre/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct ViewArgs {
    /// Viewport width in pixels
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 720.0)]
    height: f64,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// RNG seed for the drift generator (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run headless on simulated time and print every frame
    Simulate {
        /// Simulated seconds
        #[arg(long, default_value_t = 5.0)]
        duration: f64,

        /// Simulated frame rate
        #[arg(long, default_value_t = 60.0)]
        fps: f64,

        /// JSON pointer script: [{"t": s, "x": px, "y": px}, ...]
        #[arg(long)]
        script: Option<PathBuf>,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Run on the wall clock, reading `x y` pointer lines from stdin
    Run {
        /// Frame rate
        #[arg(long, default_value_t = 60.0)]
        fps: f64,

        /// Stop after this many seconds (runs until Ctrl-C if omitted)
        #[arg(long)]
        duration: Option<f64>,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Inspect or create configuration files
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,

    /// Validate a config file
    Check {
        path: PathBuf,
    },

    /// Write the default configuration to a file
    Init {
        /// Destination (default: ~/.gyre/config.toml)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn open_config(cli: &Cli) -> Result<EngineConfig> {
    load_effective(cli.config.as_deref()).context("failed to load config")
}

fn make_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    }
}

fn viewport(view: &ViewArgs) -> Result<Viewport> {
    if !(view.width.is_finite() && view.width > 0.0 && view.height.is_finite() && view.height > 0.0)
    {
        bail!(
            "viewport must be positive, got {}x{}",
            view.width,
            view.height
        );
    }
    Ok(Viewport::new(view.width, view.height))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Simulate {
            duration,
            fps,
            script,
            view,
        } => cmd_simulate(&cli, *duration, *fps, script.as_deref(), view),
        Commands::Run {
            fps,
            duration,
            view,
        } => cmd_run(&cli, *fps, *duration, view).await,
        Commands::Config { action } => match action {
            ConfigAction::Show => cmd_config_show(&cli),
            ConfigAction::Check { path } => cmd_config_check(path),
            ConfigAction::Init { path, force } => cmd_config_init(path.as_deref(), *force),
        },
    }
}

fn cmd_simulate(
    cli: &Cli,
    duration: f64,
    fps: f64,
    script: Option<&Path>,
    view: &ViewArgs,
) -> Result<()> {
    let config = open_config(cli)?;
    let samples = match script {
        Some(path) => load_script(path)
            .with_context(|| format!("failed to load script {}", path.display()))?,
        None => Vec::new(),
    };
    let options = SimulateOptions {
        duration,
        fps,
        viewport: viewport(view)?,
        format: view.format,
    };

    let stdout = std::io::stdout().lock();
    let summary = simulate::simulate(config, &options, samples, make_rng(view.seed), stdout)?;

    if cli.verbose {
        eprintln!(
            "--- frames={}, tracking={}, mode_changes={} ---",
            summary.frames, summary.tracking_frames, summary.mode_changes
        );
    }
    Ok(())
}

async fn cmd_run(cli: &Cli, fps: f64, duration: Option<f64>, view: &ViewArgs) -> Result<()> {
    let config = open_config(cli)?;
    let options = RunOptions {
        fps,
        duration,
        viewport: viewport(view)?,
        format: view.format,
    };
    let frames = realtime::run(config, &options, make_rng(view.seed), std::io::stdout()).await?;
    if cli.verbose {
        eprintln!("--- frames={frames} ---");
    }
    Ok(())
}

fn cmd_config_show(cli: &Cli) -> Result<()> {
    let config = open_config(cli)?;
    print!("{}", to_toml(&config).context("failed to serialize config")?);
    Ok(())
}

fn cmd_config_check(path: &Path) -> Result<()> {
    load_config(path).with_context(|| format!("{} is not a valid config", path.display()))?;
    println!("ok: {}", path.display());
    Ok(())
}

fn cmd_config_init(path: Option<&Path>, force: bool) -> Result<()> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    save_config(&path, &EngineConfig::default())
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("wrote {}", path.display());
    Ok(())
}
