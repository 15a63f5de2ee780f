use anyhow::{Context, Result};
use chartgrid::{Config, RenderSettings, viz};
use clap::{Args, Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "chartgrid",
    version,
    about = "Validate and render multi-panel chart grids from a JSON configuration"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a configuration to an image (.svg or .png).
    Render(RenderArgs),
    /// Validate a configuration and print a one-line summary.
    Check(CheckArgs),
    /// Print the built-in sample configuration.
    Sample,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Configuration file, or `-` to read from stdin.
    config: PathBuf,
    /// Output image; the extension selects the format.
    #[arg(short, long)]
    out: PathBuf,
    /// Pixels per inch applied to the layout's figsize.
    #[arg(long, default_value_t = viz::DEFAULT_DPI)]
    dpi: f64,
    /// Output width in pixels (requires --height; overrides --dpi).
    #[arg(long, requires = "height")]
    width: Option<u32>,
    /// Output height in pixels (requires --width).
    #[arg(long, requires = "width")]
    height: Option<u32>,
    /// Locale for tick labels (en, de, fr, es, it, pt, nl).
    #[arg(long, default_value = "en")]
    locale: String,
    /// TrueType/OpenType font file used for all text (default: $CHARTGRID_FONT,
    /// then system fonts).
    #[arg(long)]
    font: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Configuration file, or `-` to read from stdin.
    config: PathBuf,
}

fn read_config(path: &Path) -> Result<Config> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("cannot read configuration from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?
    };
    Ok(Config::from_json_str(&text)?)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Check(args) => cmd_check(args),
        Command::Sample => {
            print!("{}", chartgrid::SAMPLE_CONFIG);
            Ok(())
        }
    }
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    let config = read_config(&args.config)?;
    let figure = chartgrid::render(&config)?;
    let settings = RenderSettings {
        dpi: args.dpi,
        size: args.width.zip(args.height),
        locale: args.locale,
        font: args.font,
    };
    viz::save(&figure, &args.out, &settings)?;
    eprintln!("Wrote plot to {}", args.out.display());
    Ok(())
}

fn cmd_check(args: CheckArgs) -> Result<()> {
    let config = read_config(&args.config)?;
    let kinds: Vec<&str> = config.charts.iter().map(|c| c.kind().as_str()).collect();
    println!(
        "ok: {} chart(s) in a {}x{} grid ({})",
        config.charts.len(),
        config.layout.rows,
        config.layout.columns,
        kinds.join(", ")
    );
    Ok(())
}
