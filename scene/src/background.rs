use std::sync::Arc;

use rand::rngs::SmallRng;

use crate::{
    error::{SceneError, SceneResult},
    param::{ParamSpace, Value, choice, constant},
    primitive::{Block, Primitive, Rendered, Sample},
};

/// Draws one of its children stretched over the whole canvas.
///
/// The full-canvas geometry (`_wh`, `_cxy`) is grafted into every child's
/// space when the background is built, so the children keep their own
/// parameter order and any other draws they make.
#[derive(Clone, Debug)]
pub struct Background {
    pub(crate) block: Block,
    choices: Vec<Primitive>,
}

impl Background {
    pub const TYPE_NAME: &'static str = "Background";

    pub fn new(choices: Vec<Primitive>) -> Self {
        let geometry = full_canvas();
        let choices = choices
            .into_iter()
            .map(|mut child| {
                child.override_space(&geometry);
                child
            })
            .collect::<Vec<_>>();
        let mut entries = vec![(
            "i_bk",
            choice(choices.len(), Self::TYPE_NAME, "background choices".into()),
        )];
        entries.extend(geometry.entries());
        let space = ParamSpace::declared(entries);
        Self {
            block: Block::new(Self::TYPE_NAME, space),
            choices,
        }
    }

    pub fn choices(&self) -> &[Primitive] {
        &self.choices
    }

    /// The child drawn by the last successful sample.
    pub fn chosen(&self) -> Option<&Primitive> {
        let sample = self.block.sample().ok()?;
        let i = sample.params.index("i_bk").ok()?;
        self.choices.get(i)
    }

    pub(crate) fn sample(&mut self, canvas: u32, rng: &mut SmallRng) -> SceneResult<()> {
        let params = self.block.begin(canvas, rng)?;
        let i = params.index("i_bk")?;
        let len = self.choices.len();
        let child = self.choices.get_mut(i).ok_or_else(|| {
            SceneError::configuration(format!("`i_bk` = {i} is out of range for {len} choices"))
        })?;
        child.sample(canvas, rng)?;

        self.block.state = Rendered::Sampled(Sample {
            params,
            layer: Arc::clone(child.layer()?),
            annotations: child.annotations()?.to_vec(),
        });
        Ok(())
    }
}

fn full_canvas() -> ParamSpace {
    ParamSpace::declared(vec![
        ("_wh", constant(Value::Pair([1.0, 1.0]))),
        ("_cxy", constant(Value::Pair([0.5, 0.5]))),
    ])
}
