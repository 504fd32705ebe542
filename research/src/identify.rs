//! Turning screenshots into project records.

use data::{Catalog, ProjectRecord};
use ie::{Ie, Image, TextRecognizer};

/// Genre whose detail panel shows a ship among the rewards.
const SHIP_GENRE: &str = "D";

pub trait Identify {
	/// Every project visible on `image`.
	fn identify(&self, image: Image) -> Vec<ProjectRecord>;
}

/// Reads the research list: one record per card, codes via OCR.
pub struct OcrIdentifier<'a, R: TextRecognizer> {
	pub ie: &'a Ie<R>,
	pub catalog: &'a Catalog,
}

impl<R: TextRecognizer> Identify for OcrIdentifier<'_, R> {
	fn identify(&self, image: Image) -> Vec<ProjectRecord> {
		let names = self.ie.research_get_names(image);
		let series = self.ie.research_get_series(image);

		names
			.iter()
			.zip(series)
			.map(|(name, series)| {
				let project = ProjectRecord::from_ocr(self.catalog, name, series);
				tracing::info!(%project, "research project");
				project
			})
			.collect()
	}
}

/// Reads one project detail panel with the template libraries.
pub struct DetailIdentifier<'a, R: TextRecognizer> {
	pub ie: &'a Ie<R>,
}

impl<R: TextRecognizer> Identify for DetailIdentifier<'_, R> {
	fn identify(&self, image: Image) -> Vec<ProjectRecord> {
		let series = self.ie.detail_get_series(image);
		let duration = self.ie.detail_get_duration(image);
		let genre = self.ie.detail_get_genre(image);
		let ship = if genre.eq_ignore_ascii_case(SHIP_GENRE) {
			self.ie.detail_get_ship(image)
		} else {
			String::new()
		};

		let project = ProjectRecord::from_detail(series, &genre, duration, &ship);
		tracing::info!(%project, "research project");
		vec![project]
	}
}
