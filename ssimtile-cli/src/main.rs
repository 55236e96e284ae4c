use clap::Parser;
use serde::{Deserialize, Serialize};
use ssimtile::io::{load_gray_image, save_map_png};
use ssimtile::{ImageViewMut, Ssim, SsimConfig};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Tiled SSIM CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Config {
    image_a: String,
    image_b: String,
    map_path: Option<String>,
    output_path: Option<String>,
    parallel: bool,
}

#[derive(Debug, Serialize)]
struct Output {
    score: f32,
    width: usize,
    height: usize,
    map_path: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("ssimtile=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.image_a.is_empty() || config.image_b.is_empty() {
        return Err("image_a and image_b must be set in the config".into());
    }

    let image_a = load_gray_image(&config.image_a)?;
    let image_b = load_gray_image(&config.image_b)?;
    let (width, height) = (image_a.width(), image_a.height());

    let ssim = Ssim::new().with_config(SsimConfig {
        parallel: config.parallel,
    });
    let score = match &config.map_path {
        Some(path) => {
            let mut map_data = vec![0.0f32; width * height];
            let mut map = ImageViewMut::from_slice(&mut map_data, width, height)?;
            let score = ssim.compute_with_map(image_a.view(), image_b.view(), &mut map)?;
            save_map_png(path, &map_data, width, height)?;
            score
        }
        None => ssim.compute(image_a.view(), image_b.view())?,
    };

    let output = Output {
        score,
        width,
        height,
        map_path: config.map_path,
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
