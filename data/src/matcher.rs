//! Reconciles OCR'd project codes with the catalog.
//!
//! OCR of project codes fails in a handful of well known ways. Each one gets
//! its own narrow correction instead of a generic edit-distance search, since
//! neighbouring codes (`D-057-UL`, `D-051-UL`) differ by a single glyph.

use crate::{Catalog, CatalogEntry};

/// Leading letter that the shining card border makes look like `SUBSTITUTE`.
const CONFUSED_LEADING: char = 'D';
const SUBSTITUTE: char = 'C';

/// Rarity/type suffix characters that are dropped for the loose comparison.
const LOOSE_SUFFIX: [char; 7] = ['M', 'I', 'R', 'F', 'U', 'L', '-'];

/// Which fallback produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchLayer {
	Exact,
	/// Matched after replacing the leading `D` by `C`.
	LeadingLetter,
	/// Matched after dropping trailing suffix characters on both sides.
	Loose,
}

#[derive(Debug, Clone, Copy)]
pub struct Match<'a> {
	pub entry: &'a CatalogEntry,
	pub layer: MatchLayer,
}

/// Normalize a raw project code before lookup.
///
/// Strips surrounding `-`. For a three part code (`prefix-number-suffix`) the
/// letters OCR confuses with digits are corrected in the number part only:
/// `D` and `O` become `0`, `S` becomes `5`.
pub fn check_name(name: &str) -> String {
	let name = name.trim_matches('-');
	let parts = name.split('-').collect::<Vec<_>>();
	if let [prefix, number, suffix] = parts.as_slice() {
		let number = number.replace(['D', 'O'], "0").replace('S', "5");
		return [*prefix, number.as_str(), *suffix].join("-");
	}
	name.to_owned()
}

impl Catalog {
	/// Every catalog entry matching `name` (already passed through
	/// [`check_name`]) in `series`, best first.
	///
	/// Layers are tried in order: exact, leading `D` read as `C`, loose
	/// suffix. The iterator is lazy, so taking the first item only evaluates
	/// as many layers as needed.
	pub fn resolve<'a>(&'a self, name: &str, series: u8) -> impl Iterator<Item = Match<'a>> + use<'a> {
		let exact = self
			.exact_indices(series, name)
			.iter()
			.map(|&i| (i, MatchLayer::Exact));

		let substituted = name
			.strip_prefix(CONFUSED_LEADING)
			.map(|rest| format!("{SUBSTITUTE}{rest}"));
		let leading = substituted
			.map(|name| self.exact_indices(series, &name))
			.unwrap_or(&[])
			.iter()
			.map(|&i| (i, MatchLayer::LeadingLetter));

		let key = name.trim_end_matches(LOOSE_SUFFIX).to_owned();
		let loose = self
			.entries()
			.iter()
			.enumerate()
			.filter(move |(_, entry)| entry.series == series && entry.name.trim_end_matches(LOOSE_SUFFIX) == key)
			.map(|(i, _)| (i, MatchLayer::Loose));

		exact
			.chain(leading)
			.chain(loose)
			.map(move |(i, layer)| Match {
				entry: &self.entries()[i],
				layer,
			})
	}

	/// Nearest catalog code of the same series by edit distance.
	///
	/// Only used to make "no match" warnings actionable; never committed.
	pub fn closest_name(&self, name: &str, series: u8) -> Option<&str> {
		self.entries()
			.iter()
			.filter(|entry| entry.series == series)
			.min_by_key(|entry| levenshtein::levenshtein(name, &entry.name))
			.map(|entry| entry.name.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::CatalogItem;

	fn entry(series: u8, name: &str) -> CatalogEntry {
		CatalogEntry {
			series,
			name: name.to_owned(),
			time: 3600,
			input: vec![CatalogItem::new("Coins")],
			output: vec![],
		}
	}

	fn catalog() -> Catalog {
		Catalog::new(vec![
			entry(1, "C-057-UL"),
			entry(1, "D-057-UL"),
			entry(2, "D-057-UL"),
			entry(1, "H-339-MI"),
			entry(3, "Q-031-RF"),
			entry(1, "C-121-UL"),
			entry(3, "T-248-MI"),
		])
	}

	#[test]
	fn check_name_fixes_the_number_segment_only() {
		assert_eq!(check_name("D-O5S-UL"), "D-055-UL");
		assert_eq!(check_name("D-D57-UL"), "D-057-UL");
		assert_eq!(check_name("-D-057-UL-"), "D-057-UL");
		// Prefix and suffix letters are left alone.
		assert_eq!(check_name("S-057-DO"), "S-057-DO");
		// Not a three part code: untouched apart from the trimming.
		assert_eq!(check_name("DOS-057"), "DOS-057");
		assert_eq!(check_name(""), "");
	}

	#[test]
	fn check_name_is_idempotent() {
		for raw in ["D-O5S-UL", "-C-0S7-MI", "Q-DOD-RF", "DOS", "A-B-C-D", "--", "H-339-MI"] {
			let once = check_name(raw);
			assert_eq!(check_name(&once), once, "{raw}");
		}
	}

	#[test]
	fn every_entry_resolves_to_itself_first() {
		let catalog = catalog();
		for entry in catalog.entries() {
			let first = catalog.resolve(&entry.name, entry.series).next().unwrap();
			assert_eq!(first.entry, entry);
			assert_eq!(first.layer, MatchLayer::Exact);
		}
	}

	#[test]
	fn series_must_agree() {
		let catalog = catalog();
		assert_eq!(catalog.resolve("H-339-MI", 2).count(), 0);
	}

	#[test]
	fn leading_d_falls_back_to_c() {
		let catalog = catalog();
		let first = catalog.resolve("D-121-UL", 1).next().unwrap();
		assert_eq!(first.entry.name, "C-121-UL");
		assert_eq!(first.layer, MatchLayer::LeadingLetter);
	}

	#[test]
	fn exact_beats_substitution() {
		let catalog = catalog();
		let layers = catalog
			.resolve("D-057-UL", 1)
			.map(|m| (m.entry.name.as_str(), m.layer))
			.collect::<Vec<_>>();
		assert_eq!(
			layers,
			vec![
				("D-057-UL", MatchLayer::Exact),
				("C-057-UL", MatchLayer::LeadingLetter),
				("D-057-UL", MatchLayer::Loose),
			]
		);
	}

	#[test]
	fn suffix_noise_is_tolerated() {
		let catalog = catalog();
		let first = catalog.resolve("Q-031-R", 3).next().unwrap();
		assert_eq!(first.entry.name, "Q-031-RF");
		assert_eq!(first.layer, MatchLayer::Loose);

		let first = catalog.resolve("T-248", 3).next().unwrap();
		assert_eq!(first.entry.name, "T-248-MI");
	}

	#[test]
	fn unknown_codes_resolve_to_nothing() {
		let catalog = catalog();
		assert!(catalog.resolve("G-999-UL", 1).next().is_none());
		assert!(catalog.resolve("", 1).next().is_none());
		assert!(Catalog::default().resolve("C-057-UL", 1).next().is_none());
	}

	#[test]
	fn closest_name_stays_in_series() {
		let catalog = catalog();
		assert_eq!(catalog.closest_name("H-339-M", 1), Some("H-339-MI"));
		assert_ne!(catalog.closest_name("H-339-M", 3), Some("H-339-MI"));
		assert_eq!(catalog.closest_name("anything", 9), None);
	}
}
