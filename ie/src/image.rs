//! Image primitives and utilities.
//!
//! The project uses a lightweight owned RGB image type (`OwnedImage`) that is
//! optimized for repeated cropping/resizing of screenshots.
//!
//! For most operations we borrow a view (`Image<'a>`) instead of copying pixels.
//! Crops of a screenshot (series badges, name plates, reward icons) are views;
//! they are only converted to owned images when pixels must be transformed
//! (resizing, OCR preprocessing).

use std::ops::Range;
use std::path::Path;

use anyhow::{Context, Result};

/// Owned RGB image (no alpha).
#[derive(Clone, Debug)]
pub struct OwnedImage {
    width: u32,
    height: u32,
    data: Vec<Color>,
}

impl OwnedImage {
    /// Build an image by evaluating `f` for every pixel (row-major).
    pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> Color) -> Self {
        let mut data = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }

        Self {
            width,
            height,
            data,
        }
    }

    /// Decode any format supported by `image` (PNG, BMP, JPEG, ...).
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path)
            .with_context(|| format!("decode image {}", path.display()))?
            .to_rgb8();
        Ok(Self::from_rgb_image(&img))
    }

    pub fn from_rgb_image(img: &image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        let data = img
            .pixels()
            .map(|p| Color::new(p.0[0], p.0[1], p.0[2]))
            .collect::<Vec<_>>();

        Self {
            width,
            height,
            data,
        }
    }

    pub fn to_rgb_image(&self) -> image::RgbImage {
        let bytes = self.as_image().get_bytes();
        // The buffer length always matches `width * height * 3`.
        image::RgbImage::from_raw(self.width, self.height, bytes).unwrap_or_default()
    }

    #[inline(always)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Resize this image to exactly `width` x `height`.
    ///
    /// Uses `fast_image_resize` (SIMD-optimized) with a Catmull-Rom (bicubic)
    /// filter and keeps output in `Vec<Color>`.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        let width = width.max(1);
        let height = height.max(1);
        if self.width == width && self.height == height {
            return Ok(());
        }

        let bytes = self.as_image().get_bytes();
        let src = fast_image_resize::images::ImageRef::new(
            self.width,
            self.height,
            &bytes,
            fast_image_resize::PixelType::U8x3,
        )
        .context("fast_image_resize: wrap source buffer")?;

        let mut dst = fast_image_resize::images::Image::new(width, height, fast_image_resize::PixelType::U8x3);

        let mut resizer = fast_image_resize::Resizer::new();
        let options = fast_image_resize::ResizeOptions::new().resize_alg(
            fast_image_resize::ResizeAlg::Interpolation(fast_image_resize::FilterType::CatmullRom),
        );

        resizer
            .resize(&src, &mut dst, &Some(options))
            .context("fast_image_resize: resize")?;

        let bytes: Vec<u8> = dst.into_vec();
        self.data = bytes
            .chunks_exact(3)
            .map(|px| Color::new(px[0], px[1], px[2]))
            .collect();
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Resize to the given height, preserving aspect ratio.
    pub fn resized_h(mut self, height: u32) -> Result<Self> {
        let height = height.max(1);
        let width = (self.width as u64 * height as u64 / self.height.max(1) as u64).max(1) as u32;
        self.resize(width, height)?;
        Ok(self)
    }

    /// Create a borrowed view of this entire image.
    pub fn as_image<'a>(&'a self) -> Image<'a> {
        Image {
            x1: 0,
            y1: 0,
            x2: self.width,
            y2: self.height,
            true_width: self.width,
            data: &self.data,
        }
    }

    /// Luma channel as an `image` buffer, for the `imageproc` thresholding.
    pub fn to_gray_image(&self) -> image::GrayImage {
        let view = self.as_image();
        image::GrayImage::from_fn(self.width, self.height, |x, y| image::Luma([view.get(x, y).luma()]))
    }

    /// Inverse of [`OwnedImage::to_gray_image`], replicating luma into RGB.
    pub fn from_gray_as_rgb(gray: &image::GrayImage) -> Self {
        let (width, height) = gray.dimensions();
        let data = gray.pixels().map(|p| Color::gray(p.0[0])).collect();
        Self {
            width,
            height,
            data,
        }
    }
}

// ----------

/// Axis-aligned rectangle in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Build from corner coordinates `(x1, y1, x2, y2)`.
    pub const fn from_area(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self {
            x: x1,
            y: y1,
            w: x2 - x1,
            h: y2 - y1,
        }
    }
}

/// Borrowed image view into an `OwnedImage`.
#[derive(Clone, Copy)]
pub struct Image<'a> {
    x1: u32,
    y1: u32,
    x2: u32,
    y2: u32,
    true_width: u32,
    data: &'a [Color],
}

impl<'a> Image<'a> {
    #[inline(always)]
    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    #[inline(always)]
    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }

    #[inline(always)]
    fn pixel(&self, x: u32, y: u32) -> &Color {
        &self.data[(x + y * self.true_width) as usize]
    }

    /// Pixel at view-relative coordinates.
    #[inline(always)]
    pub fn get(&self, x: u32, y: u32) -> Color {
        *self.pixel(self.x1 + x, self.y1 + y)
    }

    /// Copy the viewed pixels out.
    pub fn to_owned_image(self) -> OwnedImage {
        OwnedImage::from_fn(self.width(), self.height(), |x, y| self.get(x, y))
    }

    /// Tightly packed RGB bytes of the view, row-major.
    pub fn get_bytes(&self) -> Vec<u8> {
        (self.y1..self.y2)
            .flat_map(|y| (self.x1..self.x2).map(move |x| (x, y)))
            .flat_map(|(x, y)| {
                let clr = self.pixel(x, y);
                [clr.r, clr.g, clr.b]
            })
            .collect()
    }

    /// Create an arbitrary subimage (relative coordinates).
    pub fn sub_image(&self, x: u32, y: u32, width: u32, height: u32) -> Self {
        let x = x.min(self.width());
        let y = y.min(self.height());
        let width = width.min(self.width() - x);
        let height = height.min(self.height() - y);

        Self {
            x1: self.x1 + x,
            y1: self.y1 + y,
            x2: self.x1 + x + width,
            y2: self.y1 + y + height,
            true_width: self.true_width,
            data: self.data,
        }
    }

    #[inline]
    pub fn crop(&self, rect: Rect) -> Self {
        self.sub_image(rect.x, rect.y, rect.w, rect.h)
    }

    /// Mean luma of every column, restricted to the given row band.
    pub fn column_means(&self, rows: Range<u32>) -> Vec<f32> {
        let rows = rows.start.min(self.height())..rows.end.min(self.height());
        let count = rows.len().max(1) as f32;

        (0..self.width())
            .map(|x| {
                let sum: u32 = rows.clone().map(|y| self.get(x, y).luma() as u32).sum();
                sum as f32 / count
            })
            .collect()
    }

    /// Standard deviation of the luma channel.
    ///
    /// Item icons are much busier than the flat panel background, so this is
    /// a cheap "is something drawn here" check.
    pub fn luma_std_dev(&self) -> f32 {
        let n = (self.width() * self.height()) as f64;
        if n == 0.0 {
            return 0.0;
        }

        let mut sum = 0.0f64;
        let mut sum_sq = 0.0f64;
        for y in 0..self.height() {
            for x in 0..self.width() {
                let v = self.get(x, y).luma() as f64;
                sum += v;
                sum_sq += v * v;
            }
        }

        let mean = sum / n;
        ((sum_sq / n - mean * mean).max(0.0)).sqrt() as f32
    }

    /// Extract text using OCR with preprocessing (grayscale, thresholding, upscale).
    ///
    /// Research names and timers are light glyphs on a dark card. The function
    /// tries a few binarizations, keeps only characters of `alphabet` and picks
    /// the most plausible result.
    pub fn get_text(&self, ocr: &(impl crate::TextRecognizer + ?Sized), alphabet: &str) -> String {
        use imageproc::contrast::{equalize_histogram, otsu_level, threshold, ThresholdType};

        // Upscale small crops; OCR generally performs better on larger glyphs.
        let mut base = self.to_owned_image();
        const MIN_H: u32 = 80;
        if base.height < MIN_H {
            base = match base.clone().resized_h(MIN_H) {
                Ok(v) => v,
                Err(err) => {
                    tracing::warn!(error = %err, "failed to upscale OCR crop");
                    base
                }
            };
        }

        // Candidate 1: fixed threshold tuned for the research card text.
        let fixed = {
            let bin = threshold(&base.to_gray_image(), OCR_THRESHOLD, ThresholdType::Binary);
            OwnedImage::from_gray_as_rgb(&ensure_dark_text_on_light(bin))
        };

        // Candidate 2: global Otsu.
        let otsu = {
            let gray = equalize_histogram(&base.to_gray_image());
            let level = otsu_level(&gray);
            let bin = threshold(&gray, level, ThresholdType::Binary);
            OwnedImage::from_gray_as_rgb(&ensure_dark_text_on_light(bin))
        };

        let mut best = String::new();
        let mut best_score = i64::MIN;

        for cand in [fixed, otsu, base] {
            let text = filter_alphabet(&ocr.recognize(cand.as_image()), alphabet);
            let score = score_ocr_text(&text);
            if score > best_score {
                best_score = score;
                best = text;
            }
        }

        best
    }
}

const OCR_THRESHOLD: u8 = 64;

/// The recognizer is trained on dark glyphs over a light background.
fn ensure_dark_text_on_light(mut bin: image::GrayImage) -> image::GrayImage {
    let dark = bin.pixels().filter(|p| p.0[0] == 0).count();
    if dark * 2 > (bin.width() * bin.height()) as usize {
        image::imageops::invert(&mut bin);
    }
    bin
}

/// Keep only characters of `alphabet` (uppercased first, since the game font is caps only).
pub fn filter_alphabet(text: &str, alphabet: &str) -> String {
    text.chars()
        .map(|c| c.to_ascii_uppercase())
        .filter(|c| alphabet.contains(*c))
        .collect()
}

/// Alphanumerics weigh more than separators, longer reads win ties.
fn score_ocr_text(text: &str) -> i64 {
    text.chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { 4 } else { 2 })
        .sum()
}

// ----------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub const fn gray(v: u8) -> Self {
        Self::new(v, v, v)
    }

    /// Compute luma (grayscale intensity, ITU-R 601-2).
    pub fn luma(&self) -> u8 {
        let r = self.r as u32;
        let g = self.g as u32;
        let b = self.b as u32;
        ((299 * r + 587 * g + 114 * b) / 1000) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_image_is_clamped_to_parent() {
        let img = OwnedImage::from_fn(10, 8, |_, _| Color::BLACK);
        let view = img.as_image().sub_image(6, 5, 10, 10);
        assert_eq!(view.width(), 4);
        assert_eq!(view.height(), 3);
    }

    #[test]
    fn crop_reads_relative_pixels() {
        let img = OwnedImage::from_fn(10, 10, |x, y| Color::gray((x + y * 10) as u8));
        let view = img.as_image().crop(Rect::from_area(2, 3, 5, 6));
        assert_eq!(view.get(0, 0), Color::gray(32));
        assert_eq!(view.to_owned_image().width(), 3);
    }

    #[test]
    fn column_means_average_the_band() {
        let img = OwnedImage::from_fn(3, 4, |x, y| if y < 2 { Color::gray(x as u8 * 100) } else { Color::BLACK });
        let means = img.as_image().column_means(0..2);
        assert_eq!(means, vec![0.0, 100.0, 200.0]);
        let means = img.as_image().column_means(0..4);
        assert_eq!(means, vec![0.0, 50.0, 100.0]);
    }

    #[test]
    fn std_dev_of_flat_image_is_zero() {
        let img = OwnedImage::from_fn(5, 5, |_, _| Color::gray(90));
        assert_eq!(img.as_image().luma_std_dev(), 0.0);

        let img = OwnedImage::from_fn(2, 1, |x, _| Color::gray(if x == 0 { 0 } else { 200 }));
        assert!((img.as_image().luma_std_dev() - 100.0).abs() < 1e-3);
    }

    #[test]
    fn resize_to_same_size_is_a_no_op() {
        let mut img = OwnedImage::from_fn(4, 4, |x, _| Color::gray(x as u8));
        img.resize(4, 4).unwrap();
        assert_eq!(img.as_image().get(3, 0), Color::gray(3));
    }

    #[test]
    fn resize_changes_dimensions() {
        let mut img = OwnedImage::from_fn(20, 10, |_, _| Color::gray(128));
        img.resize(46, 25).unwrap();
        assert_eq!((img.width(), img.height()), (46, 25));
        assert_eq!(img.as_image().get(20, 12), Color::gray(128));
    }

    #[test]
    fn alphabet_filter_uppercases_and_drops_noise() {
        assert_eq!(filter_alphabet("c-057-ul.", "0123456789BCDEGHQTMIULRF-"), "C-057-UL");
        assert_eq!(filter_alphabet("01:30:00 h", "0123456789:"), "01:30:00");
    }
}
