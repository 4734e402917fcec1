use std::path::PathBuf;

pub struct GenerateCfg {
    pub out_dir: PathBuf,
    pub imsize: u32,
    pub n_samples: u64,
    pub font_dir: PathBuf,
    /// Photos become an extra background choice when set.
    pub photo_dir: Option<PathBuf>,
    pub seed: u64,
}

impl Default for GenerateCfg {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("dataset"),
            imsize: 128,
            n_samples: 100,
            font_dir: PathBuf::from("assets/fonts"),
            photo_dir: None,
            seed: 0,
        }
    }
}
