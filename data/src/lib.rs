//! Research project catalog, name reconciliation and prioritization.

mod catalog;
mod filter;
mod matcher;
mod preset;
mod priority;
mod project;
mod structs;

pub use self::{
	catalog::{Catalog, CatalogEntry, CatalogItem},
	filter::{FILTER_PRESETS, FilterAttr, Filterable, Priority, RuleFilter, SortFilter},
	matcher::{Match, MatchLayer, check_name},
	preset::{
		CUSTOMIZED, DEFAULT_PRESET, FILTER_STRING_CHEAPEST, FILTER_STRING_SHORTEST, preset, preset_names,
		resolve_rule,
	},
	priority::{
		Availability, CONDITIONAL_DURATION, CONDITIONAL_GENRE, EXCLUDED_GENRE, PriorityEngine, check_filter,
		describe,
	},
	project::{ProjectRecord, format_hours},
	structs::{Resource, Ship, ShipRarity, normalize_label},
};
