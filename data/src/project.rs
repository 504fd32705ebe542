use std::time::Duration;

use crate::{Catalog, CatalogEntry, MatchLayer, Resource, Ship, ShipRarity, check_name};

/// One research project as read from the screen.
///
/// Invalid projects (nothing in the catalog matched) are kept in the batch so
/// indices keep lining up with screen slots, but carry no attributes and are
/// never selected.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ProjectRecord {
	pub name: String,
	pub series: u8,
	pub genre: Option<char>,
	/// Hours, formatted without trailing zeros (`"6"`, `"0.5"`).
	pub duration: Option<String>,
	pub ship: Option<Ship>,
	pub ship_rarity: Option<ShipRarity>,
	pub need_coin: bool,
	pub need_cube: bool,
	pub need_part: bool,
	pub valid: bool,
}

impl ProjectRecord {
	fn invalid(name: String, series: u8) -> Self {
		Self {
			name,
			series,
			genre: None,
			duration: None,
			ship: None,
			ship_rarity: None,
			need_coin: false,
			need_cube: false,
			need_part: false,
			valid: false,
		}
	}

	/// Build a record from an OCR'd project code and its series badge.
	pub fn from_ocr(catalog: &Catalog, raw_name: &str, series: u8) -> Self {
		let name = check_name(raw_name);

		let Some(found) = catalog.resolve(&name, series).next() else {
			let record = Self::invalid(name, series);
			tracing::warn!(
				project = %record,
				closest = catalog.closest_name(&record.name, series).unwrap_or(""),
				"invalid research project"
			);
			return record;
		};

		if found.layer != MatchLayer::Exact {
			tracing::debug!(raw = raw_name, matched = %found.entry.name, layer = ?found.layer, "corrected research name");
		}
		Self::from_entry(found.entry)
	}

	/// Derive every attribute from a catalog entry.
	pub fn from_entry(entry: &CatalogEntry) -> Self {
		let mut record = Self::invalid(entry.name.clone(), entry.series);
		record.valid = true;
		record.genre = entry.genre();
		record.duration = Some(format_hours(Duration::from_secs(entry.time as u64)));

		for item in &entry.input {
			match Resource::search(&item.name) {
				Some(Resource::Coin) => record.need_coin = true,
				Some(Resource::Cube) => record.need_cube = true,
				Some(Resource::Part) => record.need_part = true,
				None => {}
			}
		}

		record.ship = entry.output.iter().find_map(|item| Ship::search(&item.name));
		record.ship_rarity = record.ship.map(|ship| ship.rarity());
		record
	}

	/// Build a record from the fields read off a project detail panel.
	///
	/// `genre` and `ship` are template labels; unknown ship labels yield no ship.
	/// Costs cannot be read from that screen, so no `need_*` flag is set.
	pub fn from_detail(series: u8, genre: &str, duration: Option<Duration>, ship: &str) -> Self {
		let genre = genre.chars().next().map(|c| c.to_ascii_uppercase());
		let duration = duration.map(format_hours);
		let ship = Ship::from_label(ship);

		let name = format!(
			"S{series}-{}-{} {}",
			genre.map(String::from).unwrap_or_default(),
			duration.as_deref().unwrap_or(""),
			ship.map(|s| s.as_str()).unwrap_or(""),
		);

		Self {
			name: name.trim_end().to_owned(),
			series,
			genre,
			duration,
			ship,
			ship_rarity: ship.map(|s| s.rarity()),
			need_coin: false,
			need_cube: false,
			need_part: false,
			valid: (1..=3).contains(&series),
		}
	}

	pub fn series_label(&self) -> String {
		format!("S{}", self.series)
	}

	pub fn needs(&self, resource: Resource) -> bool {
		match resource {
			Resource::Coin => self.need_coin,
			Resource::Cube => self.need_cube,
			Resource::Part => self.need_part,
		}
	}
}

impl std::fmt::Display for ProjectRecord {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} {}", self.series_label(), self.name)?;
		if !self.valid {
			f.write_str(" (Invalid)")?;
		}
		Ok(())
	}
}

/// Hours as a short decimal string: 6h is `"6"`, 30min is `"0.5"`, 10h is `"10"`.
///
/// Not rounded, so 5h59m59s stays distinct from `"6"`.
pub fn format_hours(duration: Duration) -> String {
	format!("{}", duration.as_secs_f64() / 3600.0)
}
