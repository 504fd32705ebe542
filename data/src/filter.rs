//! Rule-string sorting.
//!
//! A rule is a `>` separated list of selectors, highest priority first:
//!
//! ```text
//! S3-Drake-0.5 > S3-DR-2.5 > S3-Q0.5 > 0.5 > shortest > reset
//! ```
//!
//! Each selector either names a preset token (passed through to the caller
//! verbatim) or describes attributes that a project must all share. Every
//! project matching a selector is emitted once, at the position of the first
//! selector it matches.

use std::sync::LazyLock;

use regex::Regex;

use crate::{ProjectRecord, Ship};

/// Tokens a rule may contain besides attribute selectors.
pub const FILTER_PRESETS: [&str; 3] = ["shortest", "cheapest", "reset"];

/// One element of an ordering: a project index or an instruction for the caller.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum Priority {
	Index(usize),
	Token(String),
}

/// Attributes a selector can constrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterAttr {
	Series,
	Ship,
	ShipRarity,
	Genre,
	Duration,
}

impl FilterAttr {
	/// In capture group order.
	pub const ALL: [FilterAttr; 5] = [
		FilterAttr::Series,
		FilterAttr::Ship,
		FilterAttr::ShipRarity,
		FilterAttr::Genre,
		FilterAttr::Duration,
	];
}

/// Anything a rule can be applied to.
pub trait Filterable {
	/// Lowercased attribute value; empty when the attribute is unknown.
	fn filter_attr(&self, attr: FilterAttr) -> String;
}

impl Filterable for ProjectRecord {
	fn filter_attr(&self, attr: FilterAttr) -> String {
		match attr {
			FilterAttr::Series => self.series_label().to_lowercase(),
			FilterAttr::Ship => self.ship.map(|s| s.as_str().to_owned()).unwrap_or_default(),
			FilterAttr::ShipRarity => self.ship_rarity.map(|r| r.as_str().to_owned()).unwrap_or_default(),
			FilterAttr::Genre => self.genre.map(|g| g.to_ascii_lowercase().to_string()).unwrap_or_default(),
			FilterAttr::Duration => self.duration.clone().unwrap_or_default(),
		}
	}
}

/// Sorting capability used by the priority engine.
pub trait SortFilter {
	/// Order `objs` by `rule`, interleaving preset tokens.
	fn apply<T: Filterable>(&self, rule: &str, objs: &[T]) -> Vec<Priority>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Selector {
	Preset(String),
	/// One expected value per [`FilterAttr::ALL`] entry.
	Attrs([Option<String>; 5]),
}

static SELECTOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	let ships = Ship::ALL.map(|ship| ship.as_str()).join("|");
	Regex::new(&format!(r"^(s[123])?-?({ships})?(dr|pry)?([bcdeghqt])?-?(\d\.\d|\d\d?)?")).expect("selector regex")
});

/// The stock rule parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleFilter;

impl RuleFilter {
	fn parse(rule: &str) -> Vec<Selector> {
		let rule = rule
			.chars()
			.filter(|c| !c.is_whitespace())
			.collect::<String>()
			.to_lowercase();

		rule.split('>')
			.filter(|s| !s.is_empty())
			.filter_map(|selector| {
				if FILTER_PRESETS.contains(&selector) {
					return Some(Selector::Preset(selector.to_owned()));
				}

				let parsed = SELECTOR_REGEX.captures(selector).map(|caps| {
					std::array::from_fn(|i| caps.get(i + 1).map(|m| m.as_str().to_owned()))
				});
				match parsed {
					Some(attrs) if attrs.iter().any(Option::is_some) => Some(Selector::Attrs(attrs)),
					_ => {
						tracing::warn!(selector, "invalid filter selector, ignored");
						None
					}
				}
			})
			.collect()
	}
}

impl SortFilter for RuleFilter {
	fn apply<T: Filterable>(&self, rule: &str, objs: &[T]) -> Vec<Priority> {
		let mut out = Vec::new();
		let mut used = vec![false; objs.len()];

		for selector in Self::parse(rule) {
			match selector {
				Selector::Preset(token) => out.push(Priority::Token(token)),
				Selector::Attrs(attrs) => {
					for (index, obj) in objs.iter().enumerate() {
						if used[index] {
							continue;
						}
						let matched = FilterAttr::ALL
							.iter()
							.zip(&attrs)
							.all(|(attr, want)| want.as_ref().is_none_or(|want| obj.filter_attr(*attr) == *want));
						if matched {
							used[index] = true;
							out.push(Priority::Index(index));
						}
					}
				}
			}
		}

		out
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{Catalog, CatalogEntry, CatalogItem};

	fn record(series: u8, name: &str, hours: f32, ship: Option<&str>) -> ProjectRecord {
		let entry = CatalogEntry {
			series,
			name: name.to_owned(),
			time: (hours * 3600.0) as u32,
			input: vec![],
			output: ship.into_iter().map(CatalogItem::new).collect(),
		};
		ProjectRecord::from_ocr(&Catalog::new(vec![entry]), name, series)
	}

	fn projects() -> Vec<ProjectRecord> {
		vec![
			record(2, "C-121-UL", 12.0, None),
			record(3, "D-022-MI", 0.5, Some("Drake")),
			record(3, "H-339-MI", 0.5, None),
			record(3, "D-057-UL", 2.5, Some("Seattle")),
			record(1, "Q-031-RF", 4.0, None),
		]
	}

	fn idx(v: &[usize]) -> Vec<Priority> {
		v.iter().map(|i| Priority::Index(*i)).collect()
	}

	#[test]
	fn attributes_of_records() {
		let p = &projects()[1];
		assert_eq!(p.filter_attr(FilterAttr::Series), "s3");
		assert_eq!(p.filter_attr(FilterAttr::Ship), "drake");
		assert_eq!(p.filter_attr(FilterAttr::ShipRarity), "dr");
		assert_eq!(p.filter_attr(FilterAttr::Genre), "d");
		assert_eq!(p.filter_attr(FilterAttr::Duration), "0.5");
		assert_eq!(projects()[0].filter_attr(FilterAttr::Ship), "");
	}

	#[test]
	fn selectors_parse_into_attributes() {
		let parsed = RuleFilter::parse("S3-Drake-0.5 > S3-DR-2.5 > Q1 > reset");
		assert_eq!(
			parsed,
			vec![
				Selector::Attrs([Some("s3".into()), Some("drake".into()), None, None, Some("0.5".into())]),
				Selector::Attrs([Some("s3".into()), None, Some("dr".into()), None, Some("2.5".into())]),
				Selector::Attrs([None, None, None, Some("q".into()), Some("1".into())]),
				Selector::Preset("reset".into()),
			]
		);
	}

	#[test]
	fn garbage_selectors_are_skipped() {
		assert_eq!(RuleFilter::parse("nonsense > > reset"), vec![Selector::Preset("reset".into())]);
	}

	#[test]
	fn trailing_noise_after_a_selector_is_ignored() {
		assert_eq!(
			RuleFilter::parse("S3x"),
			vec![Selector::Attrs([Some("s3".into()), None, None, None, None])]
		);
		let out = RuleFilter.apply("S3x > reset", &projects());
		let mut expected = idx(&[1, 2, 3]);
		expected.push(Priority::Token("reset".into()));
		assert_eq!(out, expected);
	}

	#[test]
	fn orders_by_first_matching_selector() {
		let out = RuleFilter.apply("S3-Drake-0.5 > 0.5 > S3 > shortest > reset", &projects());
		let mut expected = idx(&[1, 2, 3]);
		expected.push(Priority::Token("shortest".into()));
		expected.push(Priority::Token("reset".into()));
		assert_eq!(out, expected);
	}

	#[test]
	fn each_project_appears_once() {
		let out = RuleFilter.apply("S3 > D > 0.5 > Q4 > C12", &projects());
		assert_eq!(out, idx(&[1, 2, 3, 4, 0]));
	}

	#[test]
	fn rarity_selector() {
		let out = RuleFilter.apply("PRY > DR", &projects());
		assert_eq!(out, idx(&[3, 1]));
	}
}
