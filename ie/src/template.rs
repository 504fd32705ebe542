//! Reference-image classification.
//!
//! Some screens are not readable with OCR (locales whose font the recognition
//! model does not cover, icon-only rewards). For those we compare the crop
//! against a folder of reference images and pick the most similar one.
//!
//! A per-template threshold does not work well here: some references are
//! near-duplicates of each other (similar ship art), so every reference is
//! scored and the best one wins, as long as it clears a global floor.

use std::path::Path;

use crate::{Image, OwnedImage};

/// Minimum correlation a reference must strictly exceed to be reported.
pub const SIMILARITY: f32 = 0.85;

/// Immutable library of labelled reference images.
#[derive(Debug, Clone, Default)]
pub struct TemplateClassifier {
	// Kept as a list so iteration order (and therefore tie breaking) is the load order.
	templates: Vec<(String, OwnedImage)>,
}

impl TemplateClassifier {
	/// Load every image in `folder`, keyed by file base name.
	///
	/// A missing folder produces an empty library. Files are visited in name
	/// order; if two files share a base name (`drake.png`, `drake.bmp`) the
	/// first one wins. Undecodable files are skipped.
	pub fn from_folder(folder: impl AsRef<Path>) -> Self {
		let folder = folder.as_ref();
		let entries = match std::fs::read_dir(folder) {
			Ok(entries) => entries,
			Err(err) => {
				tracing::warn!(error = %err, folder = %folder.display(), "template folder unavailable; library is empty");
				return Self::default();
			}
		};

		let mut paths = entries
			.filter_map(|entry| entry.ok().map(|e| e.path()))
			.filter(|path| path.is_file())
			.collect::<Vec<_>>();
		paths.sort();

		let mut library = Self::default();
		for path in paths {
			let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
				continue;
			};
			if library.contains(name) {
				continue;
			}

			match OwnedImage::open(&path) {
				Ok(image) => library.templates.push((name.to_owned(), image)),
				Err(err) => tracing::warn!(error = ?err, "skipping template"),
			}
		}

		tracing::debug!(folder = %folder.display(), count = library.len(), "loaded templates");
		library
	}

	/// Build a library from already decoded images. Duplicate labels are skipped.
	pub fn from_templates(templates: impl IntoIterator<Item = (String, OwnedImage)>) -> Self {
		let mut library = Self::default();
		for (name, image) in templates {
			if !library.contains(&name) {
				library.templates.push((name, image));
			}
		}
		library
	}

	pub fn contains(&self, name: &str) -> bool {
		self.templates.iter().any(|(n, _)| n == name)
	}

	pub fn len(&self) -> usize {
		self.templates.len()
	}

	pub fn is_empty(&self) -> bool {
		self.templates.is_empty()
	}

	pub fn labels(&self) -> impl Iterator<Item = &str> {
		self.templates.iter().map(|(n, _)| n.as_str())
	}

	/// Label of the best matching reference, or an empty string if no
	/// reference scores above [`SIMILARITY`].
	pub fn classify(&self, image: Image) -> String {
		let mut similarity = SIMILARITY;
		let mut result = "";

		for (name, template) in &self.templates {
			let Some(sim) = match_template(image, template.as_image()) else {
				continue;
			};
			tracing::trace!(template = %name, sim, "template score");
			if sim > similarity {
				similarity = sim;
				result = name.as_str();
			}
		}

		tracing::debug!(matched = result, similarity, "template match");
		result.to_owned()
	}
}

/// Best correlation coefficient of `template` over all placements inside `image`.
///
/// Returns `None` when the template does not fit.
pub fn match_template(image: Image, template: Image) -> Option<f32> {
	if template.width() == 0
		|| template.height() == 0
		|| template.width() > image.width()
		|| template.height() > image.height()
	{
		return None;
	}

	let mut best = f32::MIN;
	for y in 0..=image.height() - template.height() {
		for x in 0..=image.width() - template.width() {
			let window = image.sub_image(x, y, template.width(), template.height());
			best = best.max(correlation_coefficient(window, template));
		}
	}
	Some(best)
}

/// Zero-mean normalized cross-correlation of two equally sized images over RGB.
///
/// Ranges from -1 (inverted) to 1 (identical up to brightness and contrast).
/// Two flat images score 1 when equal and 0 otherwise.
pub fn correlation_coefficient(a: Image, b: Image) -> f32 {
	debug_assert_eq!((a.width(), a.height()), (b.width(), b.height()));

	let n = (a.width() * a.height()) as f64;
	if n == 0.0 {
		return 0.0;
	}

	let mut mean_a = [0.0f64; 3];
	let mut mean_b = [0.0f64; 3];
	for y in 0..a.height() {
		for x in 0..a.width() {
			let (pa, pb) = (channels(a.get(x, y)), channels(b.get(x, y)));
			for c in 0..3 {
				mean_a[c] += pa[c];
				mean_b[c] += pb[c];
			}
		}
	}
	for c in 0..3 {
		mean_a[c] /= n;
		mean_b[c] /= n;
	}

	let mut cross = 0.0f64;
	let mut var_a = 0.0f64;
	let mut var_b = 0.0f64;
	for y in 0..a.height() {
		for x in 0..a.width() {
			let (pa, pb) = (channels(a.get(x, y)), channels(b.get(x, y)));
			for c in 0..3 {
				let da = pa[c] - mean_a[c];
				let db = pb[c] - mean_b[c];
				cross += da * db;
				var_a += da * da;
				var_b += db * db;
			}
		}
	}

	let denom = (var_a * var_b).sqrt();
	if denom < f64::EPSILON {
		return if var_a < f64::EPSILON && var_b < f64::EPSILON && mean_a == mean_b {
			1.0
		} else {
			0.0
		};
	}

	(cross / denom) as f32
}

#[inline]
fn channels(c: crate::Color) -> [f64; 3] {
	[c.r as f64, c.g as f64, c.b as f64]
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Color;

	fn gradient(w: u32, h: u32, seed: u32) -> OwnedImage {
		OwnedImage::from_fn(w, h, |x, y| {
			let v = ((x * 7 + y * 13 + seed * 31) % 251) as u8;
			Color::new(v, v.wrapping_mul(3), 255 - v)
		})
	}

	fn inverted(img: &OwnedImage) -> OwnedImage {
		let view = img.as_image();
		OwnedImage::from_fn(img.width(), img.height(), |x, y| {
			let c = view.get(x, y);
			Color::new(255 - c.r, 255 - c.g, 255 - c.b)
		})
	}

	#[test]
	fn identical_images_correlate_fully() {
		let img = gradient(12, 9, 1);
		let score = correlation_coefficient(img.as_image(), img.as_image());
		assert!((score - 1.0).abs() < 1e-5);
	}

	#[test]
	fn inverted_images_anticorrelate() {
		let img = gradient(12, 9, 1);
		let inv = inverted(&img);
		let score = correlation_coefficient(img.as_image(), inv.as_image());
		assert!((score + 1.0).abs() < 1e-5);
	}

	#[test]
	fn brightness_shift_does_not_matter() {
		let img = OwnedImage::from_fn(8, 8, |x, y| Color::gray((x * 10 + y * 3) as u8));
		let brighter = OwnedImage::from_fn(8, 8, |x, y| Color::gray((x * 10 + y * 3 + 40) as u8));
		let score = correlation_coefficient(img.as_image(), brighter.as_image());
		assert!((score - 1.0).abs() < 1e-5);
	}

	#[test]
	fn smaller_template_is_found_inside_larger_image() {
		let img = gradient(20, 20, 3);
		let tpl = img.as_image().sub_image(5, 6, 8, 8).to_owned_image();
		let score = match_template(img.as_image(), tpl.as_image()).unwrap();
		assert!((score - 1.0).abs() < 1e-5);
	}

	#[test]
	fn oversized_template_is_skipped() {
		let img = gradient(8, 8, 0);
		let tpl = gradient(9, 8, 0);
		assert_eq!(match_template(img.as_image(), tpl.as_image()), None);
	}

	#[test]
	fn classify_returns_identical_reference() {
		let drake = gradient(16, 16, 1);
		let library = TemplateClassifier::from_templates([
			("seattle".to_string(), inverted(&drake)),
			("drake".to_string(), drake.clone()),
		]);
		assert_eq!(library.classify(drake.as_image()), "drake");
	}

	#[test]
	fn classify_without_confident_match_is_empty() {
		let query = gradient(16, 16, 1);
		let library = TemplateClassifier::from_templates([("seattle".to_string(), inverted(&query))]);
		assert_eq!(library.classify(query.as_image()), "");
		assert_eq!(TemplateClassifier::default().classify(query.as_image()), "");
	}

	#[test]
	fn ties_go_to_the_first_reference() {
		let query = gradient(10, 10, 2);
		let library = TemplateClassifier::from_templates([
			("kitakaze".to_string(), query.clone()),
			("seattle".to_string(), query.clone()),
		]);
		assert_eq!(library.classify(query.as_image()), "kitakaze");
	}

	#[test]
	fn duplicate_labels_keep_the_first() {
		let library = TemplateClassifier::from_templates([
			("drake".to_string(), gradient(4, 4, 0)),
			("drake".to_string(), gradient(4, 4, 1)),
		]);
		assert_eq!(library.len(), 1);
	}

	#[test]
	fn missing_folder_gives_empty_library() {
		let dir = tempfile::tempdir().unwrap();
		let library = TemplateClassifier::from_folder(dir.path().join("missing"));
		assert!(library.is_empty());
		assert_eq!(library.classify(gradient(4, 4, 0).as_image()), "");
	}

	#[test]
	fn folder_is_keyed_by_base_name_first_file_wins() {
		let dir = tempfile::tempdir().unwrap();
		let azuma = gradient(10, 10, 5);
		azuma.to_rgb_image().save(dir.path().join("azuma.bmp")).unwrap();
		inverted(&azuma).to_rgb_image().save(dir.path().join("azuma.png")).unwrap();
		gradient(10, 10, 9).to_rgb_image().save(dir.path().join("odin.png")).unwrap();
		std::fs::write(dir.path().join("notes.txt"), "not an image").unwrap();

		let library = TemplateClassifier::from_folder(dir.path());
		assert_eq!(library.labels().collect::<Vec<_>>(), vec!["azuma", "odin"]);
		assert_eq!(library.classify(azuma.as_image()), "azuma");
	}
}
