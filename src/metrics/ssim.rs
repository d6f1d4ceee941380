//! Structural similarity (SSIM) over local windows.
//!
//! Mean SSIM in the Wang et al. formulation: local means, variances, and
//! covariance per window position, stabilized with the standard C1/C2
//! constants, averaged over every window and channel into a single scalar.
//! Channels are compared in RGB order; both inputs get the identical
//! reorder, so the comparison stays meaningful and results are comparable
//! across datasets.

use imgref::ImgVec;
use rgb::alt::BGR8;

use crate::error::{Error, Result};

/// Nominal window size used when none is configured.
pub const DEFAULT_WINDOW: usize = 7;

const K1: f64 = 0.01;
const K2: f64 = 0.03;
/// Dynamic range of 8-bit samples.
const L: f64 = 255.0;

/// Calculate mean SSIM between two images.
///
/// `window` is the nominal window size. When the smaller image dimension is
/// below it, the effective window shrinks to the largest odd value that
/// fits; the shrunk size applies to this one comparison only.
///
/// # Panics
///
/// Panics if `window` is even or zero.
///
/// # Errors
///
/// Returns [`Error::DimensionMismatch`] if the images differ in shape, and
/// [`Error::InvalidImage`] if either dimension is zero (no window can be
/// formed).
pub fn calculate_ssim(
    reference: &ImgVec<BGR8>,
    test: &ImgVec<BGR8>,
    window: usize,
) -> Result<f64> {
    assert!(
        window >= 1 && window % 2 == 1,
        "SSIM window must be odd and >= 1, got {window}"
    );

    if reference.width() != test.width() || reference.height() != test.height() {
        return Err(Error::DimensionMismatch {
            expected: (reference.width(), reference.height()),
            actual: (test.width(), test.height()),
        });
    }

    let width = reference.width();
    let height = reference.height();
    if width == 0 || height == 0 {
        return Err(Error::InvalidImage {
            reason: format!("no SSIM window fits a {width}x{height} image"),
        });
    }

    let win = effective_window(window, width.min(height));

    let c1 = (K1 * L) * (K1 * L);
    let c2 = (K2 * L) * (K2 * L);

    let ref_planes = rgb_planes(reference);
    let test_planes = rgb_planes(test);

    let mut total = 0.0_f64;
    let mut windows = 0_usize;

    for (rp, tp) in ref_planes.iter().zip(test_planes.iter()) {
        for y in 0..=(height - win) {
            for x in 0..=(width - win) {
                total += window_ssim(rp, tp, width, x, y, win, c1, c2);
                windows += 1;
            }
        }
    }

    Ok(total / windows as f64)
}

/// Largest odd window that fits an image whose smaller dimension is
/// `min_dim`, starting from the nominal size.
fn effective_window(nominal: usize, min_dim: usize) -> usize {
    if min_dim >= nominal {
        nominal
    } else if min_dim % 2 == 1 {
        min_dim
    } else {
        min_dim - 1
    }
}

/// Extract per-channel f64 planes in RGB order from a BGR image.
fn rgb_planes(img: &ImgVec<BGR8>) -> [Vec<f64>; 3] {
    let len = img.width() * img.height();
    let mut r = Vec::with_capacity(len);
    let mut g = Vec::with_capacity(len);
    let mut b = Vec::with_capacity(len);
    for p in img.pixels() {
        r.push(f64::from(p.r));
        g.push(f64::from(p.g));
        b.push(f64::from(p.b));
    }
    [r, g, b]
}

/// SSIM of one window at (x, y) on a pair of planes with row stride
/// `stride`.
#[allow(clippy::too_many_arguments)]
fn window_ssim(
    a: &[f64],
    b: &[f64],
    stride: usize,
    x: usize,
    y: usize,
    win: usize,
    c1: f64,
    c2: f64,
) -> f64 {
    let n = (win * win) as f64;

    let mut sum_a = 0.0;
    let mut sum_b = 0.0;
    for row in y..y + win {
        for col in x..x + win {
            let i = row * stride + col;
            sum_a += a[i];
            sum_b += b[i];
        }
    }
    let mean_a = sum_a / n;
    let mean_b = sum_b / n;

    let mut var_a = 0.0;
    let mut var_b = 0.0;
    let mut covar = 0.0;
    for row in y..y + win {
        for col in x..x + win {
            let i = row * stride + col;
            let da = a[i] - mean_a;
            let db = b[i] - mean_b;
            var_a += da * da;
            var_b += db * db;
            covar += da * db;
        }
    }
    var_a /= n;
    var_b /= n;
    covar /= n;

    ((2.0 * mean_a * mean_b + c1) * (2.0 * covar + c2))
        / ((mean_a * mean_a + mean_b * mean_b + c1) * (var_a + var_b + c2))
}
