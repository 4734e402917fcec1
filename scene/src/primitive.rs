use std::sync::Arc;

use image::RgbaImage;
use rand::rngs::SmallRng;

use crate::{
    background::Background,
    error::{SceneError, SceneResult},
    param::{ParamSpace, Params},
    photo::Photo,
    rectangle::Rectangle,
    text::Text,
};

/// One single-primitive mask, labelled with the primitive's type name.
#[derive(Clone, Debug)]
pub struct Annotation {
    pub type_name: &'static str,
    pub mask: Arc<RgbaImage>,
}

#[derive(Clone, Debug)]
pub struct Sample {
    pub params: Params,
    pub layer: Arc<RgbaImage>,
    pub annotations: Vec<Annotation>,
}

/// What a primitive holds between calls: nothing until a sample succeeds.
#[derive(Clone, Debug, Default)]
pub enum Rendered {
    #[default]
    Unsampled,
    Sampled(Sample),
}

/// State shared by every primitive variant.
#[derive(Clone, Debug)]
pub(crate) struct Block {
    pub(crate) type_name: &'static str,
    pub(crate) space: ParamSpace,
    pub(crate) state: Rendered,
}

impl Block {
    pub(crate) fn new(type_name: &'static str, space: ParamSpace) -> Self {
        Self {
            type_name,
            space,
            state: Rendered::Unsampled,
        }
    }

    /// Drops the previous sample and resolves a fresh set of parameters.
    pub(crate) fn begin(&mut self, canvas: u32, rng: &mut SmallRng) -> SceneResult<Params> {
        self.state = Rendered::Unsampled;
        self.space.resolve(canvas, rng)
    }

    pub(crate) fn finish(&mut self, params: Params, layer: RgbaImage) {
        let layer = Arc::new(layer);
        let annotations = vec![Annotation {
            type_name: self.type_name,
            mask: Arc::clone(&layer),
        }];
        self.state = Rendered::Sampled(Sample {
            params,
            layer,
            annotations,
        });
    }

    pub(crate) fn sample(&self) -> SceneResult<&Sample> {
        match &self.state {
            Rendered::Sampled(s) => Ok(s),
            Rendered::Unsampled => Err(SceneError::Unsampled {
                primitive: self.type_name,
            }),
        }
    }
}

/// The closed set of things a scene can be built from.
#[derive(Clone, Debug)]
pub enum Primitive {
    Rectangle(Rectangle),
    Photo(Photo),
    Text(Text),
    Background(Background),
}

impl Primitive {
    /// Resolves parameters and renders a fresh `canvas × canvas` layer.
    ///
    /// On error the primitive is left unsampled.
    pub fn sample(&mut self, canvas: u32, rng: &mut SmallRng) -> SceneResult<()> {
        match self {
            Primitive::Rectangle(p) => p.sample(canvas, rng),
            Primitive::Photo(p) => p.sample(canvas, rng),
            Primitive::Text(p) => p.sample(canvas, rng),
            Primitive::Background(p) => p.sample(canvas, rng),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.block().type_name
    }

    pub fn space(&self) -> &ParamSpace {
        &self.block().space
    }

    pub fn state(&self) -> &Rendered {
        &self.block().state
    }

    pub fn params(&self) -> SceneResult<&Params> {
        Ok(&self.block().sample()?.params)
    }

    pub fn layer(&self) -> SceneResult<&Arc<RgbaImage>> {
        Ok(&self.block().sample()?.layer)
    }

    pub fn annotations(&self) -> SceneResult<&[Annotation]> {
        Ok(&self.block().sample()?.annotations)
    }

    /// Grafts `overrides` into this primitive's space (see [`ParamSpace::overridden`]).
    pub fn override_space(&mut self, overrides: &ParamSpace) {
        let block = self.block_mut();
        block.space = block.space.overridden(overrides);
    }

    fn block(&self) -> &Block {
        match self {
            Primitive::Rectangle(p) => &p.block,
            Primitive::Photo(p) => &p.block,
            Primitive::Text(p) => &p.block,
            Primitive::Background(p) => &p.block,
        }
    }

    fn block_mut(&mut self) -> &mut Block {
        match self {
            Primitive::Rectangle(p) => &mut p.block,
            Primitive::Photo(p) => &mut p.block,
            Primitive::Text(p) => &mut p.block,
            Primitive::Background(p) => &mut p.block,
        }
    }
}

impl From<Rectangle> for Primitive {
    fn from(p: Rectangle) -> Self {
        Primitive::Rectangle(p)
    }
}

impl From<Photo> for Primitive {
    fn from(p: Photo) -> Self {
        Primitive::Photo(p)
    }
}

impl From<Text> for Primitive {
    fn from(p: Text) -> Self {
        Primitive::Text(p)
    }
}

impl From<Background> for Primitive {
    fn from(p: Background) -> Self {
        Primitive::Background(p)
    }
}
