//! Research project sorter.
//!
//! Reads research screenshots, reconciles them with the project catalog and
//! prints the projects together with the order they should be picked in.

mod config;
mod identify;
mod selector;
mod util {
	pub mod assets;
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::{
	config::Config,
	identify::{DetailIdentifier, OcrIdentifier},
	selector::{ResearchSelector, SortMode},
};

#[derive(Parser)]
#[command(name = "research")]
#[command(about = "Identify and prioritize research projects from screenshots", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Command,

	#[command(flatten)]
	overrides: Overrides,
}

#[derive(Subcommand)]
enum Command {
	/// Read the research list (five cards) with OCR
	List {
		screenshot: PathBuf,

		#[arg(long, value_enum, default_value_t)]
		sort: SortMode,
	},

	/// Read one or more project detail panels with the template libraries
	Detail {
		#[arg(required = true)]
		screenshots: Vec<PathBuf>,

		#[arg(long, value_enum, default_value_t)]
		sort: SortMode,
	},

	/// Print the effective configuration
	Config {
		/// Also write it to the config file
		#[arg(long)]
		save: bool,
	},
}

/// Per-run overrides of the stored configuration.
#[derive(Args)]
struct Overrides {
	/// Research catalog JSON
	#[arg(long, global = true)]
	catalog: Option<PathBuf>,

	/// Folder containing `ocr/` and `research/`
	#[arg(long, global = true)]
	assets: Option<PathBuf>,

	/// Filter preset, or `customized` to use --filter
	#[arg(long, global = true)]
	preset: Option<String>,

	/// Custom rule string, implies `--preset customized`
	#[arg(long, global = true)]
	filter: Option<String>,

	#[arg(long, global = true)]
	no_coin: bool,

	#[arg(long, global = true)]
	no_cube: bool,

	#[arg(long, global = true)]
	no_part: bool,
}

impl Overrides {
	fn apply(self, config: &mut Config) {
		if let Some(catalog) = self.catalog {
			config.catalog_path = Some(catalog);
		}
		if let Some(assets) = self.assets {
			config.assets_dir = Some(assets);
		}
		if let Some(preset) = self.preset {
			config.filter_preset = preset;
		}
		if let Some(filter) = self.filter {
			config.filter_preset = data::CUSTOMIZED.to_string();
			config.filter_string = filter;
		}
		config.use_coin &= !self.no_coin;
		config.use_cube &= !self.no_cube;
		config.use_part &= !self.no_part;
	}
}

fn main() -> Result<()> {
	// Structured logging. Use `RUST_LOG=info` etc.
	tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_writer(std::io::stderr)
		.init();

	let cli = Cli::parse();
	let mut config = Config::load_or_default();
	cli.overrides.apply(&mut config);

	let (screenshots, mode, detail) = match cli.command {
		Command::Config { save } => {
			println!("{}", serde_json::to_string_pretty(&config)?);
			if save {
				config.save()?;
				tracing::info!(path = %Config::path()?.display(), "saved config");
			}
			return Ok(());
		}
		Command::List { screenshot, sort } => (vec![screenshot], sort, false),
		Command::Detail { screenshots, sort } => (screenshots, sort, true),
	};

	let assets = util::assets::resolve_assets(config.assets_dir.as_deref())?;
	let ie = ie::Ie::try_new(&assets.detection, &assets.recognition, &assets.charset, &assets.templates)?;

	let images = screenshots
		.iter()
		.map(|path| ie::OwnedImage::open(path))
		.collect::<Result<Vec<_>>>()?;
	let views = images.iter().map(|image| image.as_image()).collect::<Vec<_>>();

	let mut selector = ResearchSelector::new(&config);
	if detail {
		selector.detect_detail(&DetailIdentifier { ie: &ie }, &views);
	} else {
		let path = config.catalog_path.clone().unwrap_or(assets.catalog);
		let catalog = data::Catalog::load(&path).with_context(|| format!("Load catalog {}", path.display()))?;
		selector.detect(&OcrIdentifier { ie: &ie, catalog: &catalog }, views[0]);
	}

	tracing::info!(projects = selector.projects().len(), ?mode, "identified research projects");

	println!("{}", serde_json::to_string_pretty(&selector.select(mode))?);
	Ok(())
}
