use crate::{
	FILTER_STRING_CHEAPEST, FILTER_STRING_SHORTEST, Priority, ProjectRecord, Resource, RuleFilter, SortFilter,
	resolve_rule,
};

/// Genre never selected: low value for its cost.
pub const EXCLUDED_GENRE: char = 'B';
/// Genre only selected at [`CONDITIONAL_DURATION`]; shorter ones have preconditions.
pub const CONDITIONAL_GENRE: char = 'E';
pub const CONDITIONAL_DURATION: &str = "6";

/// Resources the operator allows projects to consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Availability {
	pub coin: bool,
	pub cube: bool,
	pub part: bool,
}

impl Default for Availability {
	fn default() -> Self {
		Self {
			coin: true,
			cube: true,
			part: true,
		}
	}
}

impl Availability {
	pub fn allows(&self, resource: Resource) -> bool {
		match resource {
			Resource::Coin => self.coin,
			Resource::Cube => self.cube,
			Resource::Part => self.part,
		}
	}
}

/// Drop indices the operator must never be offered. Tokens pass through in order.
pub fn check_filter(priority: Vec<Priority>, projects: &[ProjectRecord], availability: Availability) -> Vec<Priority> {
	priority
		.into_iter()
		.filter(|entry| {
			let Priority::Index(index) = entry else {
				return true;
			};
			let Some(project) = projects.get(*index) else {
				tracing::warn!(index, "priority index out of range");
				return false;
			};
			if !project.valid {
				return false;
			}
			if Resource::ALL
				.into_iter()
				.any(|res| project.needs(res) && !availability.allows(res))
			{
				return false;
			}
			match project.genre.map(|g| g.to_ascii_uppercase()) {
				Some(EXCLUDED_GENRE) => false,
				Some(CONDITIONAL_GENRE) => project.duration.as_deref() == Some(CONDITIONAL_DURATION),
				_ => true,
			}
		})
		.collect()
}

/// Orders a batch of projects by a rule and applies the fixed exclusions.
#[derive(Debug, Clone, Default)]
pub struct PriorityEngine<F: SortFilter = RuleFilter> {
	pub filter: F,
	pub availability: Availability,
}

impl PriorityEngine {
	pub fn new(availability: Availability) -> Self {
		Self {
			filter: RuleFilter,
			availability,
		}
	}
}

impl<F: SortFilter> PriorityEngine<F> {
	pub fn with_filter(filter: F, availability: Availability) -> Self {
		Self { filter, availability }
	}

	/// Order `projects` by an explicit rule string.
	pub fn prioritize(&self, projects: &[ProjectRecord], rule: &str) -> Vec<Priority> {
		let priority = self.filter.apply(rule, projects);
		check_filter(priority, projects, self.availability)
	}

	/// Order by a configured preset, `custom` being used for [`crate::CUSTOMIZED`].
	pub fn sort_default(&self, projects: &[ProjectRecord], preset: &str, custom: &str) -> Vec<Priority> {
		let priority = self.prioritize(projects, &resolve_rule(preset, custom));
		tracing::info!(order = %describe(&priority, projects), "filter sort");
		priority
	}

	pub fn sort_shortest(&self, projects: &[ProjectRecord]) -> Vec<Priority> {
		let priority = self.prioritize(projects, FILTER_STRING_SHORTEST);
		tracing::info!(order = %describe(&priority, projects), "shortest sort");
		priority
	}

	pub fn sort_cheapest(&self, projects: &[ProjectRecord]) -> Vec<Priority> {
		let priority = self.prioritize(projects, FILTER_STRING_CHEAPEST);
		tracing::info!(order = %describe(&priority, projects), "cheapest sort");
		priority
	}
}

/// Project names and tokens joined with `" > "`.
pub fn describe(priority: &[Priority], projects: &[ProjectRecord]) -> String {
	priority
		.iter()
		.map(|entry| match entry {
			Priority::Index(index) => projects.get(*index).map_or("?", |p| p.name.as_str()),
			Priority::Token(token) => token.as_str(),
		})
		.collect::<Vec<_>>()
		.join(" > ")
}
