//! COCO export for composed scenes: binary masks, annotation records and the
//! dataset document.

pub mod annotation;
pub mod convert;
pub mod dataset;
pub mod error;
pub mod mask;
pub mod polygon;

pub use annotation::{CategoryInfo, create_annotation};
pub use convert::{DEFAULT_TOLERANCE, convert, convert_to_file};
pub use dataset::{
    Annotation, Category, Dataset, ImageInfo, Segmentation, category_for_file, default_categories,
};
pub use error::{CocoError, CocoResult};
pub use mask::{ALPHA_THRESHOLD, Rle, area, bbox, binary_mask, encode_rle};
pub use polygon::mask_to_polygons;
