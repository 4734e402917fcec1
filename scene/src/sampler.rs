use std::sync::Arc;

use image::RgbaImage;
use rand::rngs::SmallRng;
use tracing::debug;

use crate::{
    composite::over_in_place,
    error::{SceneError, SceneResult},
    primitive::Primitive,
};

/// Masks of one composed image, grouped by primitive type in first-seen order.
#[derive(Clone, Debug, Default)]
pub struct MaskGroups {
    groups: Vec<(&'static str, Vec<Arc<RgbaImage>>)>,
}

impl MaskGroups {
    pub fn push(&mut self, type_name: &'static str, mask: Arc<RgbaImage>) {
        match self.groups.iter_mut().find(|(k, _)| *k == type_name) {
            Some((_, masks)) => masks.push(mask),
            None => self.groups.push((type_name, vec![mask])),
        }
    }

    pub fn get(&self, type_name: &str) -> Option<&[Arc<RgbaImage>]> {
        self.groups
            .iter()
            .find(|(k, _)| *k == type_name)
            .map(|(_, v)| v.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[Arc<RgbaImage>])> {
        self.groups.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    /// Total number of masks across all groups.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|(_, v)| v.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct Composition {
    pub canvas: RgbaImage,
    pub masks: MaskGroups,
}

/// A scene: primitives stacked bottom to top on a square canvas.
#[derive(Clone, Debug)]
pub struct Sampler {
    primitives: Vec<Primitive>,
    canvas: u32,
}

impl Sampler {
    pub fn new(primitives: Vec<Primitive>, canvas: u32) -> SceneResult<Self> {
        if canvas == 0 {
            return Err(SceneError::configuration("canvas size must be positive"));
        }
        Ok(Self { primitives, canvas })
    }

    pub fn canvas(&self) -> u32 {
        self.canvas
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Samples every primitive in order and composites each layer over the
    /// ones before it. The first failing primitive aborts the whole image.
    pub fn sample(&mut self, rng: &mut SmallRng) -> SceneResult<Composition> {
        let mut canvas = RgbaImage::new(self.canvas, self.canvas);
        let mut masks = MaskGroups::default();

        for primitive in &mut self.primitives {
            primitive.sample(self.canvas, rng)?;
            over_in_place(&mut canvas, primitive.layer()?)?;
            for ann in primitive.annotations()? {
                masks.push(ann.type_name, Arc::clone(&ann.mask));
            }
        }

        debug!(
            primitives = self.primitives.len(),
            masks = masks.len(),
            "composed scene"
        );
        Ok(Composition { canvas, masks })
    }
}
