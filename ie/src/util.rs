use std::time::Duration;

use crate::{Image, Rect};

pub static TIME_REGEX: std::sync::LazyLock<regex::Regex> =
	std::sync::LazyLock::new(|| regex::Regex::new(r"(?<h>\d+):(?<m>\d+):(?<s>\d+)").expect("time regex"));

/// Height of the reference layout all screen rectangles are expressed in.
const BASE_HEIGHT: f32 = 720.0;

#[inline]
fn scale_factor(image: Image) -> f32 {
	image.height() as f32 / BASE_HEIGHT
}

#[inline]
fn px(base: u32, s: f32) -> u32 {
	if base == 0 {
		0
	} else {
		((base as f32) * s).round().max(1.0) as u32
	}
}

/// Scale a rectangle from the 1280×720 reference layout to `image`.
pub fn scaled(image: Image, rect: Rect) -> Rect {
	let s = scale_factor(image);
	Rect::new(px(rect.x, s), px(rect.y, s), px(rect.w, s), px(rect.h, s))
}

/// Crop a reference-layout rectangle out of a capture of any height.
pub fn crop_scaled<'a>(image: Image<'a>, rect: Rect) -> Image<'a> {
	image.crop(scaled(image, rect))
}

/// Parse a countdown such as `01:00:00`, `05:47:10` or `17:50:51`.
///
/// The first `H:M:S` group anywhere in the text is used. Returns `None` (and
/// logs) when the text does not contain one.
pub fn parse_time(text: &str) -> Option<Duration> {
	let parsed = TIME_REGEX.captures(text).and_then(|caps| {
		let h = caps["h"].parse::<u64>().ok()?;
		let m = caps["m"].parse::<u64>().ok()?;
		let s = caps["s"].parse::<u64>().ok()?;
		let secs = h.checked_mul(3600)?.checked_add(m.checked_mul(60)?)?.checked_add(s)?;
		Some(Duration::from_secs(secs))
	});

	if parsed.is_none() {
		tracing::warn!(text, "invalid time string");
	}
	parsed
}
