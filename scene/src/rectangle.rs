use image::{Rgba, RgbaImage};
use imageproc::{drawing::draw_filled_rect_mut, rect::Rect};
use rand::rngs::SmallRng;

use crate::{
    error::SceneResult,
    param::{ParamSpace, bounding_box, extent, rgb, uniform_pair, uniform_triple},
    primitive::Block,
};

/// An opaque axis-aligned box of a single random color.
#[derive(Clone, Debug)]
pub struct Rectangle {
    pub(crate) block: Block,
}

impl Rectangle {
    pub const TYPE_NAME: &'static str = "Rectangle";

    pub fn new() -> Self {
        let space = ParamSpace::declared(vec![
            ("_wh", extent(0.4, 0.2)),
            ("_cxy", uniform_pair()),
            ("_rgb", uniform_triple()),
            ("rgb", rgb()),
            ("box", bounding_box()),
        ]);
        Self {
            block: Block::new(Self::TYPE_NAME, space),
        }
    }

    pub(crate) fn sample(&mut self, canvas: u32, rng: &mut SmallRng) -> SceneResult<()> {
        let params = self.block.begin(canvas, rng)?;
        let [x0, y0, x1, y1] = params.rect("box")?;
        let [r, g, b] = params.color("rgb")?;

        let mut layer = RgbaImage::new(canvas, canvas);
        let w = (x1 - x0 + 1).max(1) as u32;
        let h = (y1 - y0 + 1).max(1) as u32;
        draw_filled_rect_mut(&mut layer, Rect::at(x0, y0).of_size(w, h), Rgba([r, g, b, 255]));

        self.block.finish(params, layer);
        Ok(())
    }
}

impl Default for Rectangle {
    fn default() -> Self {
        Self::new()
    }
}
