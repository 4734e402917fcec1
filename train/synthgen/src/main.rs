use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::{config::GenerateCfg, generator::DatasetGenerator};

mod config;
mod generator;
mod io;
mod record;

#[derive(Parser, Debug)]
#[command(name = "synthgen", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose random scenes and write images, masks and a manifest.
    Generate(GenerateArgs),
    /// Build `annotation.json` from a generated dataset directory.
    Convert(ConvertArgs),
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Canvas edge length in pixels.
    #[arg(long, default_value_t = 128)]
    imsize: u32,

    #[arg(long, default_value_t = 100)]
    n_samples: u64,

    /// Output directory.
    #[arg(long, default_value = "dataset")]
    save_to: PathBuf,

    /// Directory searched recursively for .ttf/.otf fonts.
    #[arg(long, default_value = "assets/fonts")]
    fonts: PathBuf,

    /// Directory of .jpg photos used as backgrounds.
    #[arg(long)]
    photos: Option<PathBuf>,

    /// Base seed; sample `i` is derived from `seed + i`.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Dataset directory containing `images/` and `annotations/`.
    #[arg(long)]
    root: PathBuf,

    /// Polygon simplification tolerance in pixels.
    #[arg(long, default_value_t = coco::DEFAULT_TOLERANCE)]
    tolerance: f64,

    /// Output path, defaults to `<root>/annotation.json`.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Convert(args) => cmd_convert(args),
    }
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let config = GenerateCfg {
        out_dir: args.save_to,
        imsize: args.imsize,
        n_samples: args.n_samples,
        font_dir: args.fonts,
        photo_dir: args.photos,
        seed: args.seed,
    };
    DatasetGenerator::new(config)?.run()
}

fn cmd_convert(args: ConvertArgs) -> anyhow::Result<()> {
    let out = args.out.unwrap_or_else(|| args.root.join("annotation.json"));
    coco::convert_to_file(&args.root, &out, args.tolerance)?;
    Ok(())
}
