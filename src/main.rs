use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use cosponsor_graph::app::{AppOptions, CosponsorApp};
use cosponsor_graph::config::{LayoutConfig, load_layout_config};
use cosponsor_graph::interaction::DragMode;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Members file: a JSON member array or an object with `members` and `bills`.
    data: PathBuf,

    /// Focal member id; defaults to the member with the most co-sponsorships.
    #[arg(long)]
    focal: Option<String>,

    /// Minimum shared bill count for a member to appear.
    #[arg(long, default_value_t = 10.0)]
    threshold: f64,

    /// Release dragged nodes on drop instead of leaving them fixed.
    #[arg(long)]
    release: bool,

    /// Also show bills shared by the members in view.
    #[arg(long)]
    bills: bool,

    /// JSON file with simulation, interaction and force settings.
    #[arg(long)]
    layout_config: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,

    #[arg(long)]
    debug: bool,
}

fn init_tracing(args: &Args) {
    let default_directive = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else {
        "warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args);

    let mut layout = match &args.layout_config {
        Some(path) => load_layout_config(path)?,
        None => LayoutConfig::default(),
    };
    if args.release {
        layout.interaction.mode = DragMode::Release;
    }

    info!(data = %args.data.display(), threshold = args.threshold, bills = args.bills, "starting");

    let options = AppOptions {
        data_path: args.data,
        focal: args.focal,
        threshold: args.threshold,
        include_bills: args.bills,
        layout,
    };
    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "cosponsor-graph",
        native_options,
        Box::new(move |cc| Ok(Box::new(CosponsorApp::new(cc, options)))),
    )
    .map_err(|error| anyhow::anyhow!("{error}"))
    .context("window event loop failed")
}
