use image::{GrayImage, imageops};
use tracing::debug;

use crate::{
    dataset::{Annotation, Segmentation},
    mask::{area, bbox, encode_rle},
    polygon::mask_to_polygons,
};

#[derive(Clone, Copy, Debug)]
pub struct CategoryInfo {
    pub id: u64,
    pub is_crowd: bool,
}

/// Builds the COCO record for one binary mask.
///
/// Returns `None` for an empty mask, or when a non-crowd mask yields no
/// polygon with at least three vertices. Masks whose size differs from
/// `image_size` are resized (nearest neighbour) first.
pub fn create_annotation(
    annotation_id: u64,
    image_id: u64,
    category: CategoryInfo,
    mask: &GrayImage,
    image_size: (u32, u32),
    tolerance: f64,
) -> Option<Annotation> {
    let resized;
    let mask = if mask.dimensions() == image_size {
        mask
    } else {
        resized = imageops::resize(
            mask,
            image_size.0,
            image_size.1,
            imageops::FilterType::Nearest,
        );
        &resized
    };

    let area = area(mask);
    if area == 0 {
        debug!(annotation_id, image_id, "empty mask");
        return None;
    }
    let bbox = bbox(mask)?;

    let segmentation = if category.is_crowd {
        Segmentation::Rle(encode_rle(mask))
    } else {
        let polygons = mask_to_polygons(mask, tolerance);
        if polygons.is_empty() {
            debug!(annotation_id, image_id, "mask has no usable polygon");
            return None;
        }
        Segmentation::Polygons(polygons)
    };

    Some(Annotation {
        id: annotation_id,
        image_id,
        category_id: category.id,
        iscrowd: u8::from(category.is_crowd),
        area,
        bbox,
        segmentation,
        width: image_size.0,
        height: image_size.1,
    })
}
