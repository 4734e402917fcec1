//! Builds a COCO document from a generated dataset directory.
//!
//! Layout: `<root>/images/<stem>.{png,jpg,jpeg}` and
//! `<root>/annotations/<stem>_*.png`, one mask per file.

use std::{
    fs::read_dir,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::{
    annotation::{CategoryInfo, create_annotation},
    dataset::{Dataset, ImageInfo, category_for_file},
    error::{CocoError, CocoResult},
    mask::{ALPHA_THRESHOLD, binary_mask},
};

pub const DEFAULT_TOLERANCE: f64 = 2.0;

pub fn convert(root: &Path, tolerance: f64) -> CocoResult<Dataset> {
    let images = list_files(&root.join("images"), &["png", "jpg", "jpeg"])?;
    let masks = list_files(&root.join("annotations"), &["png"])?;

    let mut dataset = Dataset::default();
    let mut image_id = 1u64;
    let mut annotation_id = 1u64;

    for image_path in &images {
        let image_name = file_name(image_path);
        let size = image::image_dimensions(image_path)
            .map_err(|e| CocoError::image(image_path, e))?;
        dataset
            .images
            .push(ImageInfo::new(image_id, image_name.clone(), size));

        let is_crowd = image_name.contains("crowd");
        let prefix = format!("{}_", file_stem(image_path));
        for mask_path in masks
            .iter()
            .filter(|p| file_stem(p).starts_with(&prefix))
        {
            let mask_name = file_name(mask_path);
            let category = CategoryInfo {
                id: category_for_file(&dataset.categories, &mask_name)?,
                is_crowd,
            };
            let layer = image::open(mask_path)
                .map_err(|e| CocoError::image(mask_path, e))?
                .to_rgba8();
            let mask = binary_mask(&layer, ALPHA_THRESHOLD);

            match create_annotation(annotation_id, image_id, category, &mask, size, tolerance) {
                Some(ann) => dataset.annotations.push(ann),
                None => debug!(mask = %mask_name, "no region found"),
            }
            annotation_id += 1;
        }
        image_id += 1;
    }

    info!(
        images = dataset.images.len(),
        annotations = dataset.annotations.len(),
        "coco dataset assembled"
    );
    Ok(dataset)
}

/// Converts `root` and writes the document to `out`.
pub fn convert_to_file(root: &Path, out: &Path, tolerance: f64) -> CocoResult<Dataset> {
    let dataset = convert(root, tolerance)?;
    dataset.save(out)?;
    info!(path = %out.display(), "annotation file written");
    Ok(dataset)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// Numeric stems sort by value so `10.png` follows `9.png`.
fn list_files(dir: &Path, extensions: &[&str]) -> CocoResult<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .and_then(|s| s.to_str())
                .is_some_and(|ext| extensions.contains(&ext.to_ascii_lowercase().as_str()))
        })
        .collect();
    files.sort_by_key(|p| {
        let stem = file_stem(p);
        let leading: String = stem.chars().take_while(|c| c.is_ascii_digit()).collect();
        (leading.parse::<u64>().unwrap_or(u64::MAX), stem)
    });
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn write_mask(dir: &Path, name: &str, x0: u32, x1: u32) {
        let img = RgbaImage::from_fn(16, 16, |x, y| {
            if (x0..=x1).contains(&x) && (x0..=x1).contains(&y) {
                Rgba([9, 9, 9, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        });
        img.save(dir.join(name)).unwrap();
    }

    fn layout() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("images")).unwrap();
        std::fs::create_dir_all(tmp.path().join("annotations")).unwrap();
        tmp
    }

    #[test]
    fn masks_are_matched_by_exact_stem_prefix() {
        let tmp = layout();
        let images = tmp.path().join("images");
        let anns = tmp.path().join("annotations");
        for i in [1, 2, 10] {
            RgbaImage::new(16, 16)
                .save(images.join(format!("{i}.png")))
                .unwrap();
        }
        write_mask(&anns, "1_crowd_Rectangle_0.png", 2, 6);
        write_mask(&anns, "1_crowd_Text_1.png", 8, 12);
        write_mask(&anns, "10_crowd_Rectangle_0.png", 0, 3);
        // empty mask still consumes an annotation id
        write_mask(&anns, "2_crowd_Rectangle_0.png", 20, 30);
        write_mask(&anns, "2_crowd_Photo_1.png", 1, 14);

        let ds = convert(tmp.path(), DEFAULT_TOLERANCE).unwrap();
        let names: Vec<_> = ds.images.iter().map(|i| i.file_name.as_str()).collect();
        assert_eq!(names, ["1.png", "2.png", "10.png"]);

        let per_image = |id: u64| ds.annotations.iter().filter(|a| a.image_id == id).count();
        assert_eq!(per_image(1), 2);
        assert_eq!(per_image(2), 1);
        assert_eq!(per_image(3), 1);

        let ids: Vec<_> = ds.annotations.iter().map(|a| a.id).collect();
        assert_eq!(ids, [1, 2, 3, 5]);
        let photo = ds.annotations.iter().find(|a| a.category_id == 4).unwrap();
        assert_eq!(photo.image_id, 2);
        assert!(ds.annotations.iter().all(|a| a.iscrowd == 0));
    }

    #[test]
    fn unknown_category_is_reported() {
        let tmp = layout();
        RgbaImage::new(16, 16)
            .save(tmp.path().join("images/0.png"))
            .unwrap();
        write_mask(&tmp.path().join("annotations"), "0_crowd_Circle_0.png", 2, 6);

        let err = convert(tmp.path(), DEFAULT_TOLERANCE).unwrap_err();
        assert!(matches!(err, CocoError::UnknownCategory { .. }));
    }

    #[test]
    fn writes_annotation_file() {
        let tmp = layout();
        RgbaImage::new(16, 16)
            .save(tmp.path().join("images/0.png"))
            .unwrap();
        write_mask(&tmp.path().join("annotations"), "0_crowd_Rectangle_0.png", 2, 6);

        let out = tmp.path().join("annotation.json");
        let ds = convert_to_file(tmp.path(), &out, DEFAULT_TOLERANCE).unwrap();
        assert_eq!(Dataset::load(&out).unwrap(), ds);
    }
}
