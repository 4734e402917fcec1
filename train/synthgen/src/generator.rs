use std::{fs::File, io::BufWriter};

use anyhow::{Context, bail};
use rand::{Rng, RngCore, SeedableRng, rngs::SmallRng};
use rand_xoshiro::SplitMix64;
use scene::{Background, Composition, Photo, Primitive, Rectangle, Sampler, Text};
use tracing::{debug, info};

use crate::{config::GenerateCfg, record::SampleRecord};

pub struct DatasetGenerator {
    pub config: GenerateCfg,
    samplers: Vec<Sampler>,
    pub(crate) writer: Option<BufWriter<File>>,
}

impl DatasetGenerator {
    /// Loads fonts (and photos, if configured) and builds the scene set.
    pub fn new(config: GenerateCfg) -> anyhow::Result<Self> {
        let text = Text::new(&config.font_dir)
            .with_context(|| format!("scan fonts in '{}'", config.font_dir.display()))?;
        let photo = config
            .photo_dir
            .as_ref()
            .map(|dir| {
                Photo::new(dir).with_context(|| format!("scan photos in '{}'", dir.display()))
            })
            .transpose()?;

        let samplers = build_scenes(config.imsize, text.into(), photo.map(Primitive::from))?;
        Self::with_samplers(config, samplers)
    }

    pub fn with_samplers(config: GenerateCfg, samplers: Vec<Sampler>) -> anyhow::Result<Self> {
        if samplers.is_empty() {
            bail!("no scenes to sample from");
        }
        Ok(Self {
            config,
            samplers,
            writer: None,
        })
    }

    /// Picks a scene and composes one image, all driven by `seed`.
    pub fn sample_with_seed(&mut self, seed: u64) -> anyhow::Result<(usize, Composition)> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let scene = rng.random_range(0..self.samplers.len());
        let comp = self.samplers[scene]
            .sample(&mut rng)
            .with_context(|| format!("sample scene {scene} (seed {seed})"))?;
        Ok((scene, comp))
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        self.init_output()
            .with_context(|| format!("prepare '{}'", self.config.out_dir.display()))?;

        for id in 0..self.config.n_samples {
            let mut sm = SplitMix64::seed_from_u64(self.config.seed.wrapping_add(id));
            let seed = sm.next_u64();

            let (scene, comp) = self.sample_with_seed(seed)?;
            let masks = self.save_sample(id, &comp)?;
            self.write_record(&SampleRecord {
                schema: "v1",
                id,
                image: format!("images/{id}.png"),
                imsize: self.config.imsize,
                seed,
                scene,
                masks,
            })?;
            debug!(id, scene, seed, "sample written");

            if (id + 1) % 100 == 0 {
                info!(done = id + 1, total = self.config.n_samples, "progress");
            }
        }

        self.finalize_output()?;
        info!(
            samples = self.config.n_samples,
            out = %self.config.out_dir.display(),
            "dataset generated"
        );
        Ok(())
    }
}

/// The three stock layouts: a background, one or two rectangles and a line of text.
pub fn build_scenes(
    imsize: u32,
    text: Primitive,
    photo: Option<Primitive>,
) -> scene::SceneResult<Vec<Sampler>> {
    let mut backgrounds = vec![Primitive::from(Rectangle::new())];
    backgrounds.extend(photo);
    let bg = Primitive::from(Background::new(backgrounds));
    let rect = Primitive::from(Rectangle::new());

    Ok(vec![
        Sampler::new(vec![bg.clone(), rect.clone(), text.clone()], imsize)?,
        Sampler::new(
            vec![bg.clone(), rect.clone(), rect.clone(), text.clone()],
            imsize,
        )?,
        Sampler::new(vec![bg, rect.clone(), text, rect], imsize)?,
    ])
}
