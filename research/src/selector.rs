use data::{Priority, PriorityEngine, ProjectRecord};
use ie::Image;

use crate::{config::Config, identify::Identify};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortMode {
	/// The configured preset (or custom rule string).
	#[default]
	Default,
	Shortest,
	Cheapest,
}

/// What gets printed for one run.
#[derive(Debug, serde::Serialize)]
pub struct Selection<'a> {
	pub projects: &'a [ProjectRecord],
	pub priority: Vec<Priority>,
}

/// The projects currently on screen and how to order them.
pub struct ResearchSelector<'a> {
	config: &'a Config,
	engine: PriorityEngine,
	projects: Vec<ProjectRecord>,
}

impl<'a> ResearchSelector<'a> {
	pub fn new(config: &'a Config) -> Self {
		Self {
			config,
			engine: PriorityEngine::new(config.availability()),
			projects: Vec::new(),
		}
	}

	pub fn projects(&self) -> &[ProjectRecord] {
		&self.projects
	}

	/// Replace the batch with the projects of one research list screenshot.
	pub fn detect(&mut self, identifier: &impl Identify, image: Image) {
		self.projects = identifier.identify(image);
	}

	/// Replace the batch with one project per detail screenshot, in order.
	pub fn detect_detail(&mut self, identifier: &impl Identify, images: &[Image]) {
		self.projects = images
			.iter()
			.flat_map(|image| identifier.identify(*image))
			.collect();
	}

	pub fn sort(&self, mode: SortMode) -> Vec<Priority> {
		match mode {
			SortMode::Default => {
				self.engine
					.sort_default(&self.projects, &self.config.filter_preset, &self.config.filter_string)
			}
			SortMode::Shortest => self.engine.sort_shortest(&self.projects),
			SortMode::Cheapest => self.engine.sort_cheapest(&self.projects),
		}
	}

	pub fn select(&self, mode: SortMode) -> Selection<'_> {
		Selection {
			projects: &self.projects,
			priority: self.sort(mode),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::identify::{
		DetailIdentifier, OcrIdentifier,
		tests::{Script, catalog, detail_screen, libraries, list_screen},
	};

	fn list_selector(config: &Config) -> ResearchSelector<'_> {
		let (genres, ships) = libraries();
		let ie = ie::Ie::with_recognizer(
			Script::per_region(&["D-022-MI", "E-315-MI", "B-004-UL", "H-339-MI", "D-057-UL"]),
			genres,
			ships,
		);
		let catalog = catalog();
		let mut selector = ResearchSelector::new(config);
		selector.detect(
			&OcrIdentifier { ie: &ie, catalog: &catalog },
			list_screen([3, 3, 2, 3, 1]).as_image(),
		);
		selector
	}

	#[test]
	fn default_preset_orders_the_list() {
		let config = Config::default();
		let selector = list_selector(&config);
		assert_eq!(selector.projects().len(), 5);

		let priority = selector.sort(SortMode::Default);
		// Drake first, then the 1h H project. The rest is left to the tail tokens.
		assert_eq!(
			priority,
			vec![
				Priority::Index(0),
				Priority::Index(3),
				Priority::Token("shortest".into()),
				Priority::Token("reset".into()),
			]
		);
	}

	#[test]
	fn disabled_resources_follow_config() {
		let config = Config {
			use_cube: false,
			use_coin: false,
			..Config::default()
		};
		let selector = list_selector(&config);
		let priority = selector.sort(SortMode::Shortest);
		assert_eq!(priority, vec![Priority::Index(1), Priority::Token("reset".into())]);
	}

	#[test]
	fn customized_rule_string() {
		let config = Config {
			filter_preset: data::CUSTOMIZED.into(),
			filter_string: "S1 > reset".into(),
			..Config::default()
		};
		let selector = list_selector(&config);
		let selection = selector.select(SortMode::Default);
		assert_eq!(selection.priority, vec![Priority::Index(4), Priority::Token("reset".into())]);

		let json = serde_json::to_value(&selection).unwrap();
		assert_eq!(json["priority"], serde_json::json!([4, "reset"]));
		assert_eq!(json["projects"][4]["name"], "C-057-UL");
		assert_eq!(json["projects"][0]["ship"], "drake");
	}

	#[test]
	fn detail_batch_has_one_project_per_screenshot() {
		let config = Config::default();
		let (genres, ships) = libraries();
		let ie = ie::Ie::with_recognizer(Script::new(&["00:30:00", "", "", "06:00:00", "", ""]), genres, ships);
		let first = detail_screen(true, true);
		let second = detail_screen(false, false);

		let mut selector = ResearchSelector::new(&config);
		selector.detect_detail(&DetailIdentifier { ie: &ie }, &[first.as_image(), second.as_image()]);

		assert_eq!(selector.projects().len(), 2);
		assert_eq!(selector.projects()[0].name, "S3-D-0.5 drake");
		assert_eq!(selector.projects()[1].duration.as_deref(), Some("6"));
		assert_eq!(selector.sort(SortMode::Default)[0], Priority::Index(0));
	}
}
