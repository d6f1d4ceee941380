//! Decoding images into the canonical pixel representation.
//!
//! Decoded images are 8-bit, interleaved, BGR channel order. All metric code
//! assumes this layout; [`load_bgr8`] is the only place pixels enter the
//! crate.

use std::path::Path;

use imgref::ImgVec;
use rgb::alt::BGR8;

use crate::error::{Error, Result};

/// Decode an image file into an 8-bit BGR pixel buffer.
///
/// Any raster format enabled in the `image` crate build is accepted. The
/// decoded pixels are converted to 8-bit RGB and reordered to BGR. No
/// resizing and no color management happen here.
///
/// # Errors
///
/// Returns [`Error::ImageLoad`] if the file is missing or cannot be parsed
/// as an image.
pub fn load_bgr8(path: &Path) -> Result<ImgVec<BGR8>> {
    let decoded = image::open(path).map_err(|e| Error::ImageLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let rgb = decoded.into_rgb8();
    let (width, height) = rgb.dimensions();
    let pixels: Vec<BGR8> = rgb
        .pixels()
        .map(|p| BGR8 {
            b: p.0[2],
            g: p.0[1],
            r: p.0[0],
        })
        .collect();

    Ok(ImgVec::new(pixels, width as usize, height as usize))
}
