use image::{GrayImage, Luma, RgbaImage};
use serde::{Deserialize, Serialize};

/// Alpha values strictly above this count as foreground.
pub const ALPHA_THRESHOLD: u8 = 128;

/// 255 where `alpha > threshold`, 0 elsewhere.
pub fn binary_mask(layer: &RgbaImage, threshold: u8) -> GrayImage {
    GrayImage::from_fn(layer.width(), layer.height(), |x, y| {
        if layer.get_pixel(x, y).0[3] > threshold {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

pub fn area(mask: &GrayImage) -> u64 {
    mask.pixels().filter(|p| p.0[0] > 0).count() as u64
}

/// `[x, y, width, height]` of the foreground, extents inclusive.
pub fn bbox(mask: &GrayImage) -> Option<[f64; 4]> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, p) in mask.enumerate_pixels() {
        if p.0[0] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    bounds.map(|(x0, y0, x1, y1)| {
        [
            f64::from(x0),
            f64::from(y0),
            f64::from(x1 - x0 + 1),
            f64::from(y1 - y0 + 1),
        ]
    })
}

/// Uncompressed COCO run-length encoding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rle {
    /// Alternating run lengths, column-major, starting with a background run.
    pub counts: Vec<u32>,
    /// `[height, width]`.
    pub size: [u32; 2],
}

pub fn encode_rle(mask: &GrayImage) -> Rle {
    let (w, h) = mask.dimensions();
    let mut counts = Vec::new();
    let mut current = false;
    let mut run = 0u32;
    for x in 0..w {
        for y in 0..h {
            let on = mask.get_pixel(x, y).0[0] > 0;
            if on != current {
                counts.push(run);
                run = 0;
                current = on;
            }
            run += 1;
        }
    }
    counts.push(run);
    Rle {
        counts,
        size: [h, w],
    }
}
