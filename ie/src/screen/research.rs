//! Research screens.
//!
//! Two screens are read:
//! - the research list, which shows five project cards side by side, each
//!   with a series badge and a project code such as `D-057-UL`;
//! - the project detail panel, used by locales whose project codes are not
//!   OCR friendly. It is read with template libraries instead.
//!
//! All rectangles are expressed on a 1280×720 capture and scaled to the
//! actual capture height.

use std::time::Duration;

use crate::{
	Image, Rect, SeriesClassifier, TemplateClassifier, TextRecognizer,
	util::{crop_scaled, parse_time},
};

/// Number of project cards on the research list.
pub const SLOTS: usize = 5;

/// Characters the project codes are made of.
pub const NAME_ALPHABET: &str = "0123456789BCDEGHQTMIULRF-";

pub const TIME_ALPHABET: &str = "0123456789:";

const SERIES_AREAS: [Rect; SLOTS] = [
	Rect::new(104, 151, 46, 25),
	Rect::new(339, 151, 46, 25),
	Rect::new(575, 151, 46, 25),
	Rect::new(811, 151, 46, 25),
	Rect::new(1046, 151, 46, 25),
];

const NAME_AREAS: [Rect; SLOTS] = [
	Rect::new(60, 484, 170, 30),
	Rect::new(295, 484, 170, 30),
	Rect::new(531, 484, 170, 30),
	Rect::new(767, 484, 170, 30),
	Rect::new(1002, 484, 170, 30),
];

const DETAIL_SERIES: Rect = Rect::from_area(285, 109, 319, 134);
const DETAIL_GENRE: Rect = Rect::from_area(323, 110, 418, 133);
const DETAIL_DURATION: Rect = Rect::from_area(790, 275, 911, 321);
// Reward icons. 0.5h D projects list three items, the others four, which
// shifts the ship icon by half a slot.
const DETAIL_SHIP_EVEN: Rect = Rect::from_area(331, 448, 407, 524);
const DETAIL_SHIP_ODD: Rect = Rect::from_area(377, 448, 453, 524);
// Centre of the reward row. Occupied by an icon only for odd item counts.
const DETAIL_ITEMS_ODD: Rect = Rect::from_area(395, 466, 435, 506);

/// Icons have a much higher luma deviation than the panel background.
const ITEM_STD_DEV: f32 = 10.0;

/// Series of every card on the research list, 0 where unreadable.
pub fn get_series(image: Image, classifier: &SeriesClassifier) -> Vec<u8> {
	SERIES_AREAS
		.iter()
		.map(|area| classifier.classify(crop_scaled(image, *area)))
		.collect()
}

/// Raw project codes of every card on the research list, such as `D-057-UL`.
pub fn get_names(image: Image, ocr: &(impl TextRecognizer + ?Sized)) -> Vec<String> {
	let regions = NAME_AREAS
		.iter()
		.map(|area| crop_scaled(image, *area))
		.collect::<Vec<_>>();

	crate::ocr::read_batch(ocr, &regions, NAME_ALPHABET)
		.into_iter()
		.map(|name| fix_name(&name))
		.collect()
}

/// S3 D-022-MI (Drake, 0.5h) reads as `D-022-ML`, the ship's white cloth
/// bleeds into the `I`.
pub fn fix_name(name: &str) -> String {
	name.replace("ML", "MI").replace("MIL", "MI")
}

pub fn get_detail_series(image: Image, classifier: &SeriesClassifier) -> u8 {
	classifier.classify(crop_scaled(image, DETAIL_SERIES))
}

/// Remaining (or total) research time shown on the detail panel.
pub fn get_detail_duration(image: Image, ocr: &(impl TextRecognizer + ?Sized)) -> Option<Duration> {
	let text = crop_scaled(image, DETAIL_DURATION).get_text(ocr, TIME_ALPHABET);
	parse_time(&text)
}

/// Genre letter drawn on the detail panel, empty if no template matched.
pub fn get_detail_genre(image: Image, genres: &TemplateClassifier) -> String {
	genres.classify(crop_scaled(image, DETAIL_GENRE))
}

/// Ship reward icon label, empty if no template matched.
pub fn get_detail_ship(image: Image, ships: &TemplateClassifier) -> String {
	let area = if items_num_is_odd(image) {
		DETAIL_SHIP_ODD
	} else {
		DETAIL_SHIP_EVEN
	};
	ships.classify(crop_scaled(image, area))
}

/// Whether the reward row of the detail panel holds an odd number of items.
pub fn items_num_is_odd(image: Image) -> bool {
	crop_scaled(image, DETAIL_ITEMS_ODD).luma_std_dev() > ITEM_STD_DEV
}
