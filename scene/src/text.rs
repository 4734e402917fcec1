use std::path::Path;

use ab_glyph::PxScale;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use rand::rngs::SmallRng;
use rand_distr::Distribution;

use crate::{
    error::{SceneError, SceneResult},
    fonts::FontPool,
    lorem,
    param::{
        ParamSpace, Value, choice, normal, resolver, rgb, to_canvas, uniform_pair, uniform_triple,
    },
    primitive::Block,
};

pub const SENTENCE_WORDS: usize = 7;

/// A short random sentence in a random font, size and color.
#[derive(Clone, Debug)]
pub struct Text {
    pub(crate) block: Block,
    fonts: FontPool,
}

impl Text {
    pub const TYPE_NAME: &'static str = "Text";

    pub fn new(font_root: impl AsRef<Path>) -> SceneResult<Self> {
        Ok(Self::with_fonts(FontPool::scan(font_root)?))
    }

    pub fn with_fonts(fonts: FontPool) -> Self {
        let space = ParamSpace::declared(vec![
            (
                "i_font",
                choice(fonts.len(), Self::TYPE_NAME, fonts.root().display().to_string()),
            ),
            (
                "textsize",
                resolver(|_, _, rng| {
                    let size = normal(12.0, 3.0)?.sample(rng) as i32;
                    Ok(Value::Int(size.max(1)))
                }),
            ),
            ("_cxy", uniform_pair()),
            ("_rgb", uniform_triple()),
            ("rgb", rgb()),
            ("cxy", to_canvas("_cxy")),
            (
                "text",
                resolver(|_, _, rng| Ok(Value::Text(lorem::sentence(rng, SENTENCE_WORDS, true)))),
            ),
        ]);
        Self {
            block: Block::new(Self::TYPE_NAME, space),
            fonts,
        }
    }

    pub fn fonts(&self) -> &FontPool {
        &self.fonts
    }

    pub(crate) fn sample(&mut self, canvas: u32, rng: &mut SmallRng) -> SceneResult<()> {
        let params = self.block.begin(canvas, rng)?;
        let i_font = params.index("i_font")?;
        let face = self.fonts.get(i_font).ok_or_else(|| {
            SceneError::empty_pool(Self::TYPE_NAME, self.fonts.root().display().to_string())
        })?;
        let scale = PxScale::from(params.int("textsize")? as f32);
        let [cx, cy] = params.point("cxy")?;
        let [r, g, b] = params.color("rgb")?;
        let text = params.text("text")?;

        let (w, h) = text_size(scale, &face.font, &text);
        let x = (cx as f32 - w as f32 / 2.0) as i32;
        let y = (cy as f32 - h as f32 / 2.0) as i32;

        let mut layer = RgbaImage::new(canvas, canvas);
        draw_text_mut(&mut layer, Rgba([r, g, b, 255]), x, y, scale, &face.font, &text);

        self.block.finish(params, layer);
        Ok(())
    }
}
