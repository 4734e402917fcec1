use std::{
    fs::read_dir,
    path::{Path, PathBuf},
    sync::Arc,
};

use image::{RgbaImage, imageops};
use rand::rngs::SmallRng;
use tracing::info;

use crate::{
    error::{SceneError, SceneResult},
    param::{
        ParamSpace, bounding_box, choice, extent, rgb, to_canvas, uniform_pair, uniform_triple,
    },
    primitive::Block,
};

/// A JPEG from a fixed pool, shrunk to a random size and pasted at a random spot.
#[derive(Clone, Debug)]
pub struct Photo {
    pub(crate) block: Block,
    pool: Arc<[PathBuf]>,
    root: PathBuf,
}

impl Photo {
    pub const TYPE_NAME: &'static str = "Photo";

    /// Scans `root` (non-recursively) for `.jpg`/`.jpeg` files.
    pub fn new(root: impl AsRef<Path>) -> SceneResult<Self> {
        let root = root.as_ref();
        let pool = scan_jpegs(root)?;
        info!(root = %root.display(), photos = pool.len(), "photo pool loaded");
        Ok(Self::with_pool(pool, root.to_path_buf()))
    }

    fn with_pool(pool: Vec<PathBuf>, root: PathBuf) -> Self {
        let space = ParamSpace::declared(vec![
            ("_wh", extent(0.8, 0.2)),
            ("_cxy", uniform_pair()),
            ("_rgb", uniform_triple()),
            ("rgb", rgb()),
            ("wh", to_canvas("_wh")),
            ("cxy", to_canvas("_cxy")),
            ("box", bounding_box()),
            (
                "idx",
                choice(pool.len(), Self::TYPE_NAME, root.display().to_string()),
            ),
        ]);
        Self {
            block: Block::new(Self::TYPE_NAME, space),
            pool: pool.into(),
            root,
        }
    }

    pub fn pool(&self) -> &[PathBuf] {
        &self.pool
    }

    pub(crate) fn sample(&mut self, canvas: u32, rng: &mut SmallRng) -> SceneResult<()> {
        let params = self.block.begin(canvas, rng)?;
        let idx = params.index("idx")?;
        let [w, h] = params.point("wh")?;
        let [cx, cy] = params.point("cxy")?;

        let path = self.pool.get(idx).ok_or_else(|| {
            SceneError::empty_pool(Self::TYPE_NAME, self.root.display().to_string())
        })?;
        let photo = image::open(path).map_err(|source| SceneError::Load {
            path: path.clone(),
            source,
        })?;
        let (w, h) = (w.max(1) as u32, h.max(1) as u32);
        let photo = if photo.width() > w || photo.height() > h {
            photo.thumbnail(w, h)
        } else {
            photo
        };
        let photo = photo.to_rgba8();

        let x = (cx as f32 - photo.width() as f32 / 2.0) as i64;
        let y = (cy as f32 - photo.height() as f32 / 2.0) as i64;
        let mut layer = RgbaImage::new(canvas, canvas);
        imageops::replace(&mut layer, &photo, x, y);

        self.block.finish(params, layer);
        Ok(())
    }
}

fn scan_jpegs(root: &Path) -> SceneResult<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = read_dir(root)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            matches!(
                p.extension()
                    .and_then(|s| s.to_str())
                    .map(str::to_ascii_lowercase)
                    .as_deref(),
                Some("jpg") | Some("jpeg")
            )
        })
        .collect();
    paths.sort();
    Ok(paths)
}
