//! icecover command-line tool.
//!
//! Classifies polar satellite passes into ice, open water and cloud, and
//! answers navigation queries against the regional tiles.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use icecover_common::{GeoPosition, TileId};
use projection::{geo_to_index, geo_to_planar, geo_to_tile_id, GridLookup, ProjectionSpec};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use icecover::{classify_scene, load_coefficients, load_config, write_product, SceneBundle};

/// icecover
#[derive(Parser, Debug)]
#[command(name = "icecover")]
#[command(about = "Sea-ice, open water and cloud classification of polar satellite passes")]
struct Args {
    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG", global = true)]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value = "json", env = "ICECOVER_LOG_FORMAT", global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Preset {
    Spherical,
    Wgs84,
}

impl From<Preset> for ProjectionSpec {
    fn from(preset: Preset) -> Self {
        match preset {
            Preset::Spherical => ProjectionSpec::Spherical,
            Preset::Wgs84 => ProjectionSpec::Wgs84,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify a scene bundle and write the product planes
    Classify {
        /// JSON scene bundle
        #[arg(short, long)]
        scene: PathBuf,

        /// Configuration file path
        #[arg(short, long, default_value = "config/icecover.yaml", env = "ICECOVER_CONFIG")]
        config: PathBuf,

        /// Output product path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print the regional tile containing a position
    Tile {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },

    /// Print the planar position of a geographic position
    Locate {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Figure of the Earth
        #[arg(long, value_enum, default_value = "spherical")]
        preset: Preset,

        /// Also locate the pixel in this tile (ns, nr, gr, at)
        #[arg(long)]
        tile: Option<TileId>,
    },
}

fn init_tracing(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr);

    match args.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args);

    match args.command {
        Command::Classify {
            scene,
            config,
            output,
        } => run_classify(scene, config, output),
        Command::Tile { lat, lon } => {
            let tile = geo_to_tile_id(GeoPosition::new(lat, lon));
            println!("{}", tile.map_or("none", |t| t.name()));
            Ok(())
        }
        Command::Locate {
            lat,
            lon,
            preset,
            tile,
        } => run_locate(GeoPosition::new(lat, lon), preset.into(), tile),
    }
}

fn run_classify(scene: PathBuf, config_path: PathBuf, output: PathBuf) -> Result<()> {
    info!(config = %config_path.display(), scene = %scene.display(), "Starting classification");

    let config = load_config(&config_path)?;
    let table = load_coefficients(&config)?;
    let bundle = SceneBundle::from_json_file(&scene)?;

    let product = classify_scene(&bundle, &config.classifier, &table)
        .context("Classification pass failed")?;

    if product.report.counts.estimator_failed > 0 {
        warn!(
            estimator_failed = product.report.counts.estimator_failed,
            "Pass finished with partial results"
        );
    }

    write_product(&output, &product)
}

fn run_locate(geo: GeoPosition, spec: ProjectionSpec, tile: Option<TileId>) -> Result<()> {
    let pos = geo_to_planar(geo, spec).with_context(|| format!("Cannot project {}", geo))?;

    let mut located = serde_json::json!({
        "lat": geo.lat,
        "lon": geo.lon,
        "preset": spec.name(),
        "x": pos.x,
        "y": pos.y,
    });

    if let Some(tile) = tile {
        let index = match geo_to_index(&tile.reference(), geo, spec) {
            GridLookup::Inside(index) => serde_json::json!({ "row": index.row, "col": index.col }),
            GridLookup::OutOfGrid | GridLookup::ProjectionFailed(_) => serde_json::Value::Null,
        };
        located["tile"] = serde_json::json!(tile.name());
        located["index"] = index;
    }

    println!("{}", located);
    Ok(())
}
