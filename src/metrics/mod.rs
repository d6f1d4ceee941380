//! Fidelity metrics for image comparison.
//!
//! Two metrics are supported:
//!
//! - **PSNR**: Peak Signal-to-Noise Ratio in dB (higher is better,
//!   infinite for pixel-identical images)
//! - **SSIM**: mean Structural Similarity over local windows
//!   (1.0 = identical, bounded in [-1, 1])
//!
//! Both are pure functions of two equally-shaped pixel buffers; the
//! degenerate cases (identical images, images smaller than the SSIM
//! window) have defined results rather than being errors.

pub mod ssim;

use imgref::ImgVec;
use rgb::alt::BGR8;
use serde::{Deserialize, Serialize};

pub use ssim::{DEFAULT_WINDOW, calculate_ssim};

/// Scores for one ground-truth/candidate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    /// PSNR in dB. Infinite for identical images.
    pub psnr: f64,
    /// Mean SSIM over channels and windows. 1.0 for identical images.
    pub ssim: f64,
}

/// Calculate PSNR between two images.
///
/// The mean squared error is accumulated in `f64` over every pixel and
/// channel, so 8-bit differences cannot wrap. Channel order does not affect
/// the result.
///
/// # Panics
///
/// Panics if the images differ in dimensions; callers validate shapes
/// before scoring.
///
/// # Returns
///
/// PSNR in decibels. Returns `f64::INFINITY` when the images are
/// pixel-identical (MSE of zero); this is a defined result, not an error.
#[must_use]
pub fn calculate_psnr(reference: &ImgVec<BGR8>, test: &ImgVec<BGR8>) -> f64 {
    assert_eq!(reference.width(), test.width());
    assert_eq!(reference.height(), test.height());

    let sample_count = (reference.width() * reference.height() * 3) as f64;

    let mut mse_sum: f64 = 0.0;
    for (a, b) in reference.pixels().zip(test.pixels()) {
        for (x, y) in [(a.b, b.b), (a.g, b.g), (a.r, b.r)] {
            let diff = f64::from(x) - f64::from(y);
            mse_sum += diff * diff;
        }
    }

    let mse = mse_sum / sample_count;

    if mse == 0.0 {
        f64::INFINITY
    } else {
        10.0 * (255.0_f64 * 255.0 / mse).log10()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Solid-color test image, channel values given as (b, g, r).
    pub(crate) fn solid(width: usize, height: usize, bgr: (u8, u8, u8)) -> ImgVec<BGR8> {
        let pixels = vec![
            BGR8 {
                b: bgr.0,
                g: bgr.1,
                r: bgr.2,
            };
            width * height
        ];
        ImgVec::new(pixels, width, height)
    }

    /// Deterministic gradient pattern so windows see real structure.
    pub(crate) fn gradient(width: usize, height: usize, seed: u8) -> ImgVec<BGR8> {
        let pixels: Vec<BGR8> = (0..width * height)
            .map(|i| {
                let v = ((i * 7 + usize::from(seed)) % 256) as u8;
                BGR8 {
                    b: v,
                    g: v.wrapping_add(40),
                    r: v.wrapping_add(90),
                }
            })
            .collect();
        ImgVec::new(pixels, width, height)
    }

    #[test]
    fn test_psnr_identical() {
        let img = solid(32, 32, (128, 128, 128));
        assert!(calculate_psnr(&img, &img).is_infinite());
    }

    #[test]
    fn test_psnr_constant_offset() {
        let a = solid(32, 32, (100, 100, 100));
        let b = solid(32, 32, (110, 110, 110));
        // Constant offset of 10: 10 * log10(255^2 / 100) ~= 28.13
        let psnr = calculate_psnr(&a, &b);
        assert!(psnr > 28.0);
        assert!(psnr < 29.0);
    }

    #[test]
    fn test_psnr_symmetric() {
        let a = gradient(16, 16, 0);
        let b = gradient(16, 16, 31);
        assert_eq!(calculate_psnr(&a, &b), calculate_psnr(&b, &a));
    }

    #[test]
    fn test_psnr_monotonic_in_offset() {
        let base = solid(16, 16, (100, 100, 100));
        let offsets = [102u8, 110, 130, 180];
        let mut last = f64::INFINITY;
        for v in offsets {
            let shifted = solid(16, 16, (v, v, v));
            let psnr = calculate_psnr(&base, &shifted);
            assert!(psnr < last, "PSNR should fall as the offset grows");
            last = psnr;
        }
    }
}
