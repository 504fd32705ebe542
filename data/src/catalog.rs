use std::{collections::HashMap, fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};

/// One input or output line of a research project.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CatalogItem {
	pub name: String,
}

impl CatalogItem {
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into() }
	}
}

/// A known research project definition.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CatalogEntry {
	pub series: u8,
	/// Project code such as `C-057-UL`; the first letter is the genre.
	pub name: String,
	/// Duration in seconds.
	pub time: u32,
	#[serde(default)]
	pub input: Vec<CatalogItem>,
	#[serde(default)]
	pub output: Vec<CatalogItem>,
}

impl CatalogEntry {
	pub fn genre(&self) -> Option<char> {
		self.name.chars().next()
	}
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum CatalogFile {
	List(Vec<CatalogEntry>),
	Wrapped { projects: Vec<CatalogEntry> },
}

/// Read-only table of every research project, in catalog order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
	entries: Vec<CatalogEntry>,
	index: HashMap<(u8, String), Vec<usize>>,
}

impl Catalog {
	pub fn new(entries: Vec<CatalogEntry>) -> Self {
		let mut index: HashMap<(u8, String), Vec<usize>> = HashMap::new();
		for (i, entry) in entries.iter().enumerate() {
			index.entry((entry.series, entry.name.clone())).or_default().push(i);
		}
		Self { entries, index }
	}

	/// Parse a JSON catalog: either a bare array of entries or `{"projects": [...]}`.
	pub fn from_json_str(json: &str) -> Result<Self> {
		let file: CatalogFile = serde_json::from_str(json).context("Parse research catalog")?;
		Ok(Self::from_file(file))
	}

	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let file = File::open(path).with_context(|| format!("Open catalog {}", path.display()))?;
		let file: CatalogFile = serde_json::from_reader(BufReader::new(file))
			.with_context(|| format!("Parse catalog {}", path.display()))?;
		let catalog = Self::from_file(file);
		tracing::info!(path = %path.display(), projects = catalog.len(), "loaded research catalog");
		Ok(catalog)
	}

	fn from_file(file: CatalogFile) -> Self {
		match file {
			CatalogFile::List(entries) | CatalogFile::Wrapped { projects: entries } => Self::new(entries),
		}
	}

	pub fn entries(&self) -> &[CatalogEntry] {
		&self.entries
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Indices of entries with exactly this series and name, in catalog order.
	pub(crate) fn exact_indices(&self, series: u8, name: &str) -> &[usize] {
		self.index
			.get(&(series, name.to_owned()))
			.map(Vec::as_slice)
			.unwrap_or(&[])
	}
}
