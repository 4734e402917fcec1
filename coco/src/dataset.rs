//! COCO document model.
//! http://cocodataset.org/#format-data

use std::{fs::File, io::BufWriter, path::Path};

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{CocoError, CocoResult},
    mask::Rle,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Info {
    pub description: String,
    pub url: String,
    pub version: String,
    pub year: i32,
    pub contributor: String,
    pub date_created: String,
}

impl Default for Info {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            description: "Synthetic block dataset".to_string(),
            url: String::new(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            year: now.year(),
            contributor: "synthgen".to_string(),
            date_created: now.format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct License {
    pub id: u64,
    pub name: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
    pub supercategory: String,
}

impl Category {
    fn shape(id: u64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            supercategory: "shape".to_string(),
        }
    }
}

/// One category per primitive type the generator emits.
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::shape(1, "Rectangle"),
        Category::shape(2, "Text"),
        Category::shape(3, "Background"),
        Category::shape(4, "Photo"),
    ]
}

/// Id of the first category whose name occurs in `file_name`.
pub fn category_for_file(categories: &[Category], file_name: &str) -> CocoResult<u64> {
    categories
        .iter()
        .find(|c| file_name.contains(&c.name))
        .map(|c| c.id)
        .ok_or_else(|| CocoError::UnknownCategory {
            file: file_name.to_string(),
        })
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub id: u64,
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub date_captured: String,
    pub license: u64,
    pub coco_url: String,
    pub flickr_url: String,
}

impl ImageInfo {
    pub fn new(id: u64, file_name: impl Into<String>, (width, height): (u32, u32)) -> Self {
        Self {
            id,
            file_name: file_name.into(),
            width,
            height,
            date_captured: Utc::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
            license: 1,
            coco_url: String::new(),
            flickr_url: String::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Segmentation {
    Polygons(Vec<Vec<f64>>),
    Rle(Rle),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: u64,
    pub image_id: u64,
    pub category_id: u64,
    pub iscrowd: u8,
    pub area: u64,
    /// `[x, y, width, height]`
    pub bbox: [f64; 4],
    pub segmentation: Segmentation,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub info: Info,
    pub licenses: Vec<License>,
    pub categories: Vec<Category>,
    pub images: Vec<ImageInfo>,
    pub annotations: Vec<Annotation>,
}

impl Default for Dataset {
    fn default() -> Self {
        Self {
            info: Info::default(),
            licenses: vec![License {
                id: 1,
                name: "Attribution-NonCommercial-ShareAlike License".to_string(),
                url: "http://creativecommons.org/licenses/by-nc-sa/2.0/".to_string(),
            }],
            categories: default_categories(),
            images: Vec::new(),
            annotations: Vec::new(),
        }
    }
}

impl Dataset {
    pub fn save(&self, path: &Path) -> CocoResult<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    pub fn load(path: &Path) -> CocoResult<Self> {
        let reader = std::io::BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}
