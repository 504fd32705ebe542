use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

pub const ASSETS_ENV: &str = "RESEARCH_ASSETS_DIR";

#[derive(Debug, Clone)]
pub struct Assets {
	pub detection: PathBuf,
	pub recognition: PathBuf,
	pub charset: PathBuf,
	/// Holds the `genre/` and `ship/` template libraries.
	pub templates: PathBuf,
	/// Default research catalog.
	pub catalog: PathBuf,
}

impl Assets {
	/// Layout under one assets root.
	pub fn in_dir(root: &Path) -> Self {
		let ocr = root.join("ocr");
		let research = root.join("research");
		Self {
			detection: ocr.join("detection.mnn"),
			recognition: ocr.join("latin_recognition.mnn"),
			charset: ocr.join("latin_charset.txt"),
			catalog: research.join("catalog.json"),
			templates: research,
		}
	}

	fn has_ocr(&self) -> bool {
		self.detection.is_file() && self.recognition.is_file() && self.charset.is_file()
	}
}

fn candidates(explicit: Option<&Path>) -> Vec<PathBuf> {
	let mut candidates: Vec<PathBuf> = Vec::new();
	if let Some(dir) = explicit {
		candidates.push(dir.to_path_buf());
	}
	if let Some(dir) = std::env::var_os(ASSETS_ENV) {
		candidates.push(PathBuf::from(dir));
	}
	if let Ok(exe) = std::env::current_exe()
		&& let Some(dir) = exe.parent()
	{
		candidates.push(dir.to_path_buf());
	}
	if let Ok(cwd) = std::env::current_dir() {
		candidates.push(cwd);
	}
	// Compile-time path to the workspace. Useful during local dev if launched with a different CWD.
	#[cfg(debug_assertions)]
	candidates.push(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(".."));
	candidates
}

/// Resolve the assets root in a way that works both:
/// - when running from the repo (`cargo run`), and
/// - when running a packaged binary (assets next to the executable).
///
/// `explicit` (the configured `assets_dir`) is searched first, then `RESEARCH_ASSETS_DIR`.
pub fn resolve_assets(explicit: Option<&Path>) -> Result<Assets> {
	let mut tried = Vec::new();

	for base in candidates(explicit) {
		let assets = Assets::in_dir(&base);
		if assets.has_ocr() {
			tracing::debug!(root = %base.display(), "found assets");
			return Ok(assets);
		}
		tried.push(base);
	}

	bail!(
		"OCR model files not found. Expected these files:\n  - ocr/detection.mnn\n  - ocr/latin_recognition.mnn\n  - ocr/latin_charset.txt\n\nSearched in:\n{}\n\nFix: copy the 'ocr/' folder next to the executable (or set {ASSETS_ENV} to the folder that contains it).",
		tried
			.into_iter()
			.map(|p| format!("  - {}", p.display()))
			.collect::<Vec<_>>()
			.join("\n")
	)
}
