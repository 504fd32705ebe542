//! OCR wrapper.
//!
//! The project primarily relies on `ocr-rs` (Rust PaddleOCR bindings), but the
//! rest of the crate only talks to the [`TextRecognizer`] trait so any engine
//! (or a scripted fake in tests) can be plugged in.
//! OCR engines are sensitive to input quality, so most preprocessing is done
//! in `Image::get_text(...)` before calling into this module.

use std::path::Path;

use anyhow::Context;

/// Anything that turns an image region into a line of text.
///
/// No guarantee of correctness is expected; all error tolerance lives in the
/// catalog matcher.
pub trait TextRecognizer {
    fn recognize(&self, image: crate::Image) -> String;
}

pub struct Ocr {
    engine: ocr_rs::OcrEngine,
}

impl Ocr {
    /// Initialize the OCR engine with the given model paths.
    pub fn try_new(
        detection: impl AsRef<Path>,
        recognition: impl AsRef<Path>,
        charsset: impl AsRef<Path>,
    ) -> anyhow::Result<Self> {
        let thread_count = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        let engine = ocr_rs::OcrEngine::new(
            detection,
            recognition,
            charsset,
            Some(ocr_rs::OcrEngineConfig {
                backend: ocr_rs::Backend::CPU,
                thread_count: i32::try_from(thread_count).unwrap_or(i32::MAX),
                // Project codes are short and rendered in a small stylized font,
                // High precision is worth the CPU cost here.
                precision_mode: ocr_rs::PrecisionMode::High,
                enable_parallel: thread_count > 1,
                min_result_confidence: 0.5,
                ..Default::default()
            }),
        )
        .context("failed to initialize OCR engine")?;

        Ok(Self { engine })
    }
}

impl TextRecognizer for Ocr {
    /// Recognize text from an RGB image view.
    fn recognize(&self, image: crate::Image) -> String {
        let image = ocr_rs::preprocess::rgb_to_image(&image.get_bytes(), image.width(), image.height());

        match self.engine.recognize(&image) {
            Ok(results) => results
                .into_iter()
                .map(|v| v.text)
                .collect::<Vec<_>>()
                .join(""),
            Err(err) => {
                tracing::debug!(error = %err, "OCR engine returned an error");
                String::new()
            }
        }
    }
}

/// Recognize a batch of regions, one string per region in input order.
pub fn read_batch(
    ocr: &(impl TextRecognizer + ?Sized),
    regions: &[crate::Image],
    alphabet: &str,
) -> Vec<String> {
    regions.iter().map(|region| region.get_text(ocr, alphabet)).collect()
}
