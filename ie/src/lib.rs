mod image;
pub use self::image::*;
mod ocr;
pub use ocr::{read_batch, Ocr, TextRecognizer};
mod series;
pub use series::{find_peaks, SeriesClassifier};
mod template;
pub use template::{correlation_coefficient, match_template, TemplateClassifier, SIMILARITY};
mod util;
pub use util::parse_time;

pub mod screen;

/// Image engine: the recognizers needed to read the research screens.
///
/// Built once at startup and shared by reference; nothing in here is mutated
/// after construction.
pub struct Ie<R: TextRecognizer = Ocr> {
	ocr: R,
	series: SeriesClassifier,
	genres: TemplateClassifier,
	ships: TemplateClassifier,
}

impl Ie<Ocr> {
	pub fn try_new(
		ocr_detection: impl AsRef<std::path::Path>,
		ocr_recognition: impl AsRef<std::path::Path>,
		ocr_charsset: impl AsRef<std::path::Path>,
		templates: impl AsRef<std::path::Path>,
	) -> anyhow::Result<Self> {
		let templates = templates.as_ref();
		Ok(Self::with_recognizer(
			Ocr::try_new(ocr_detection, ocr_recognition, ocr_charsset)?,
			TemplateClassifier::from_folder(templates.join("genre")),
			TemplateClassifier::from_folder(templates.join("ship")),
		))
	}
}

impl<R: TextRecognizer> Ie<R> {
	pub fn with_recognizer(ocr: R, genres: TemplateClassifier, ships: TemplateClassifier) -> Self {
		Self {
			ocr,
			series: SeriesClassifier::default(),
			genres,
			ships,
		}
	}

	pub fn research_get_series(&self, image: Image) -> Vec<u8> {
		screen::research::get_series(image, &self.series)
	}

	pub fn research_get_names(&self, image: Image) -> Vec<String> {
		screen::research::get_names(image, &self.ocr)
	}

	pub fn detail_get_series(&self, image: Image) -> u8 {
		screen::research::get_detail_series(image, &self.series)
	}

	pub fn detail_get_duration(&self, image: Image) -> Option<std::time::Duration> {
		screen::research::get_detail_duration(image, &self.ocr)
	}

	pub fn detail_get_genre(&self, image: Image) -> String {
		screen::research::get_detail_genre(image, &self.genres)
	}

	pub fn detail_get_ship(&self, image: Image) -> String {
		screen::research::get_detail_ship(image, &self.ships)
	}
}
