use image::{RgbaImage, imageops};

use crate::error::{SceneError, SceneResult};

/// Composites `src` over `dst` (straight-alpha source-over); both must have
/// the same dimensions.
pub fn over_in_place(dst: &mut RgbaImage, src: &RgbaImage) -> SceneResult<()> {
    if dst.dimensions() != src.dimensions() {
        return Err(SceneError::configuration(format!(
            "layer is {:?}, canvas is {:?}",
            src.dimensions(),
            dst.dimensions()
        )));
    }
    imageops::overlay(dst, src, 0, 0);
    Ok(())
}
