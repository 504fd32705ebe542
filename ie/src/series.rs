//! Research series detection.
//!
//! The series badge is drawn as one to three bright vertical strokes (I, II,
//! III). Instead of OCR we normalize the crop to a canonical size, average a
//! horizontal band through its middle and count the bright peaks.

use std::ops::Range;

use crate::Image;

/// Canonical badge size every crop is resized to before counting.
pub const CANONICAL_SIZE: (u32, u32) = (46, 25);

/// Rows of the canonical crop that are averaged into the column signal.
const BAND: Range<u32> = 8..17;

/// Minimum peak height, tuned for `CANONICAL_SIZE`.
const MIN_PEAK_HEIGHT: f32 = 200.0;

/// Largest series the heuristic can tell apart. IV and V would need another
/// detector.
pub const MAX_SERIES: u8 = 3;

#[derive(Debug, Clone, Copy)]
pub struct SeriesClassifier {
	min_peak_height: f32,
}

impl Default for SeriesClassifier {
	fn default() -> Self {
		Self {
			min_peak_height: MIN_PEAK_HEIGHT,
		}
	}
}

impl SeriesClassifier {
	/// Returns the series number (1..=3), or 0 if the badge could not be read.
	pub fn classify(&self, region: Image) -> u8 {
		let peaks = self.count_peaks(region);
		if (1..=MAX_SERIES as usize).contains(&peaks) {
			peaks as u8
		} else {
			tracing::warn!(peaks, width = region.width(), height = region.height(), "unknown research series");
			0
		}
	}

	/// Number of bright strokes in the badge.
	pub fn count_peaks(&self, region: Image) -> usize {
		if region.width() == 0 || region.height() == 0 {
			return 0;
		}

		let mut canonical = region.to_owned_image();
		if let Err(err) = canonical.resize(CANONICAL_SIZE.0, CANONICAL_SIZE.1) {
			tracing::warn!(error = %err, "failed to normalize series crop");
			return 0;
		}

		let signal = canonical.as_image().column_means(BAND);
		find_peaks(&signal, self.min_peak_height).len()
	}
}

/// Indices of local maxima in `signal` that are at least `min_height` high.
///
/// A peak is a sample strictly greater than its left neighbour, followed by a
/// (possibly empty) run of equal samples and then a strictly smaller sample.
/// For flat tops the middle of the run is reported (rounded down). The first
/// and last samples are never peaks.
pub fn find_peaks(signal: &[f32], min_height: f32) -> Vec<usize> {
	let mut peaks = Vec::new();
	if signal.len() < 3 {
		return peaks;
	}

	let last = signal.len() - 1;
	let mut i = 1;
	while i < last {
		if signal[i - 1] < signal[i] {
			let mut ahead = i + 1;
			while ahead < last && signal[ahead] == signal[i] {
				ahead += 1;
			}

			if signal[ahead] < signal[i] {
				if signal[i] >= min_height {
					peaks.push((i + ahead - 1) / 2);
				}
				i = ahead;
			}
		}
		i += 1;
	}

	peaks
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{Color, OwnedImage};

	/// Canonical-size badge with white strokes at the given columns.
	fn badge(strokes: &[u32]) -> OwnedImage {
		OwnedImage::from_fn(CANONICAL_SIZE.0, CANONICAL_SIZE.1, |x, _| {
			if strokes.iter().any(|s| x >= *s && x < s + 2) {
				Color::WHITE
			} else {
				Color::gray(30)
			}
		})
	}

	#[test]
	fn single_sample_peaks() {
		assert_eq!(find_peaks(&[0.0, 255.0, 0.0, 210.0, 0.0], 200.0), vec![1, 3]);
	}

	#[test]
	fn low_peaks_are_ignored() {
		assert_eq!(find_peaks(&[0.0, 150.0, 0.0, 250.0, 0.0], 200.0), vec![3]);
	}

	#[test]
	fn plateaus_count_once_at_their_middle() {
		assert_eq!(find_peaks(&[0.0, 255.0, 255.0, 255.0, 0.0], 200.0), vec![2]);
		assert_eq!(find_peaks(&[0.0, 255.0, 255.0, 0.0], 200.0), vec![1]);
	}

	#[test]
	fn edges_are_never_peaks() {
		assert!(find_peaks(&[255.0, 0.0, 255.0], 200.0).is_empty());
		assert!(find_peaks(&[0.0, 255.0, 255.0], 200.0).is_empty());
		assert!(find_peaks(&[255.0, 255.0], 200.0).is_empty());
	}

	#[test]
	fn counts_strokes() {
		let classifier = SeriesClassifier::default();
		assert_eq!(classifier.classify(badge(&[22]).as_image()), 1);
		assert_eq!(classifier.classify(badge(&[17, 27]).as_image()), 2);
		assert_eq!(classifier.classify(badge(&[12, 22, 32]).as_image()), 3);
	}

	#[test]
	fn out_of_range_is_unknown() {
		let classifier = SeriesClassifier::default();
		assert_eq!(classifier.classify(badge(&[]).as_image()), 0);
		assert_eq!(classifier.classify(badge(&[6, 14, 22, 30]).as_image()), 0);
	}

	#[test]
	fn empty_region_is_unknown() {
		let img = badge(&[22]);
		let empty = img.as_image().sub_image(0, 0, 0, 0);
		assert_eq!(SeriesClassifier::default().classify(empty), 0);
	}
}
