use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use rayon::prelude::*;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use walkdir::WalkDir;

use observation_mapper::config::{
    load_palette_or_default, MapStyle, MapViewOptions, PipelineConfig, PlausibilityRange, RowOrder,
};
use observation_mapper::{run_csv, PipelineReport};

const CLEANED_SUFFIX: &str = "_cleaned";

#[derive(Parser, Debug)]
#[command(author, version, about = "Clean GPS observation logs for mapping", long_about = None)]
struct Cli {
    /// Observation CSV, or a directory searched for *.csv files
    input: PathBuf,

    /// Smallest plausible distance between observations (meters)
    #[arg(long, default_value_t = 0)]
    min_distance: u32,

    /// Largest plausible distance between observations (meters)
    #[arg(long, default_value_t = 200)]
    max_distance: u32,

    /// Marker radius for the scatter layer
    #[arg(long, default_value_t = 8)]
    marker_size: u32,

    #[arg(long, value_enum, default_value_t = StyleOpt::Dark)]
    map_style: StyleOpt,

    /// Category palette CSV (category,label,r,g,b,a)
    #[arg(long)]
    palette: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OrderOpt::Upload)]
    order: OrderOpt,

    /// Where cleaned CSVs go; defaults to next to each input
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum StyleOpt {
    Dark,
    Light,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OrderOpt {
    /// Keep file order
    Upload,
    /// Sort by the time column first
    Time,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "observation_mapper=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;

    let inputs = collect_inputs(&cli.input)?;
    if inputs.is_empty() {
        bail!("no CSV files found under {}", cli.input.display());
    }
    info!(files = inputs.len(), "processing observation logs");

    // Each file is its own run; nothing is merged.
    let failures: usize = inputs
        .par_iter()
        .map(|path| match process_file(path, &cli.input, cli.output.as_deref(), &config) {
            Ok(()) => 0,
            Err(e) => {
                error!(file = %path.display(), "{:#}", e);
                1
            }
        })
        .sum();

    println!("\n✅ Processed {} of {} files", inputs.len() - failures, inputs.len());
    if failures > 0 {
        bail!("{} file(s) could not be processed", failures);
    }
    Ok(())
}

fn build_config(cli: &Cli) -> Result<PipelineConfig> {
    let range = PlausibilityRange::new(cli.min_distance, cli.max_distance)?;
    let style = match cli.map_style {
        StyleOpt::Dark => MapStyle::Dark,
        StyleOpt::Light => MapStyle::Light,
    };
    let map = MapViewOptions::new(cli.marker_size, style)?;
    let palette = load_palette_or_default(cli.palette.as_deref()).context("loading category palette")?;
    let order = match cli.order {
        OrderOpt::Upload => RowOrder::AsUploaded,
        OrderOpt::Time => RowOrder::ByTime,
    };
    Ok(PipelineConfig { range, palette, order, map })
}

fn collect_inputs(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(input) {
        let entry = entry?;
        let path = entry.path();
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .map_or(false, |e| e.eq_ignore_ascii_case("csv"));
        let is_output = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map_or(false, |s| s.ends_with(CLEANED_SUFFIX));
        if entry.file_type().is_file() && is_csv && !is_output {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

/// Cleaned file location. Under `--output` the input's path relative to the
/// input root is kept, so `a/x.csv` and `b/x.csv` don't collide.
fn output_path(path: &Path, input_root: &Path, output_dir: Option<&Path>) -> PathBuf {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("observations");
    let file_name = format!("{}{}.csv", stem, CLEANED_SUFFIX);

    let dir = match output_dir {
        Some(out) => {
            let relative_parent = path
                .strip_prefix(input_root)
                .ok()
                .and_then(|rel| rel.parent())
                .unwrap_or_else(|| Path::new(""));
            out.join(relative_parent)
        }
        None => path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf(),
    };
    dir.join(file_name)
}

fn process_file(path: &Path, input_root: &Path, output_dir: Option<&Path>, config: &PipelineConfig) -> Result<()> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let report = run_csv(&bytes, config).with_context(|| format!("cleaning {}", path.display()))?;

    let out_path = output_path(path, input_root, output_dir);
    if let Some(dir) = out_path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(&out_path, &report.csv).with_context(|| format!("writing {}", out_path.display()))?;

    print_report(path, &report, config);
    println!("📁 Cleaned data saved to: {}", out_path.display());
    Ok(())
}

fn print_report(path: &Path, report: &PipelineReport, config: &PipelineConfig) {
    println!("\n🔄 {}", path.display());
    println!("  {}", report.summary.message());
    if let Some(stats) = &report.distance_stats {
        println!(
            "  Observed distances: {:.2}m to {:.2}m (range selector up to {}m)",
            stats.min_m, stats.max_m, stats.slider_upper_bound
        );
    }

    let vis = match report.visualization() {
        Ok(vis) => vis,
        Err(e) => {
            println!("  ⚠️  {} - widen the distance range to see charts and map", e);
            return;
        }
    };
    let center = vis.map_view.center.rounded(4);

    println!("  Observations per category:");
    for (id, label, _) in config.palette.legend() {
        println!("    {} ({}): {}", id, label, vis.category_counts.get(id));
    }

    println!("  Satellite counts (most common first):");
    for freq in &vis.satellite_distribution {
        println!("    {} sats: {}", freq.sats, freq.count);
    }

    println!(
        "  Map: centre {} and {}, zoom {}, {} markers, {}",
        center.latitude,
        center.longitude,
        vis.map_view.zoom,
        vis.map_points.len(),
        vis.map_view.style.url()
    );
}
