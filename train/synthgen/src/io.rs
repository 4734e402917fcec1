use std::{
    fs::File,
    io::{BufWriter, Error, Write},
};

use anyhow::Context;
use scene::Composition;

use crate::{
    generator::DatasetGenerator,
    record::{MaskRecord, SampleRecord},
};

impl DatasetGenerator {
    pub fn init_output(&mut self) -> std::io::Result<()> {
        let root = &self.config.out_dir;
        std::fs::create_dir_all(root.join("images"))?;
        std::fs::create_dir_all(root.join("annotations"))?;
        if self.writer.is_none() {
            let file = File::create(root.join("samples.jsonl"))?;
            self.writer = Some(BufWriter::with_capacity(1 << 20, file));
        }
        Ok(())
    }

    /// Writes one `annotations/{id}_crowd_{type}_{n}.png` per mask, `n`
    /// counting across the whole sample, then `images/{id}.png`.
    ///
    /// The image goes last so a failed mask write never leaves an image
    /// that the converter would pick up without its masks.
    pub fn save_sample(&self, id: u64, comp: &Composition) -> anyhow::Result<Vec<MaskRecord>> {
        let root = &self.config.out_dir;
        let mut masks = Vec::with_capacity(comp.masks.len());
        for (category, layers) in comp.masks.iter() {
            for layer in layers {
                let rel = format!("annotations/{id}_crowd_{category}_{}.png", masks.len());
                let path = root.join(&rel);
                layer
                    .save(&path)
                    .with_context(|| format!("write '{}'", path.display()))?;
                masks.push(MaskRecord {
                    category,
                    path: rel,
                });
            }
        }

        let image_path = root.join("images").join(format!("{id}.png"));
        comp.canvas
            .save(&image_path)
            .with_context(|| format!("write '{}'", image_path.display()))?;
        Ok(masks)
    }

    pub fn write_record(&mut self, rec: &SampleRecord) -> Result<(), Error> {
        let json = serde_json::to_string(rec)?;
        if let Some(ref mut writer) = self.writer {
            writeln!(writer, "{json}")?;
        }
        Ok(())
    }

    pub fn finalize_output(&mut self) -> Result<(), Error> {
        if let Some(writer) = self.writer.take() {
            writer.into_inner()?.sync_all()?;
        }
        Ok(())
    }
}

impl Drop for DatasetGenerator {
    fn drop(&mut self) {
        let _ = self.finalize_output();
    }
}
