use coco::{ALPHA_THRESHOLD, CategoryInfo, Segmentation, binary_mask, create_annotation};
use rand::{SeedableRng, rngs::SmallRng};
use scene::{Background, Primitive, Rectangle, Sampler};

const CANVAS: i32 = 128;

#[test]
fn rectangle_mask_yields_clipped_bbox() {
    let mut sampler = Sampler::new(vec![Rectangle::new().into()], CANVAS as u32).unwrap();
    let mut rng = SmallRng::seed_from_u64(77);
    let cat = CategoryInfo {
        id: 1,
        is_crowd: false,
    };

    let mut clipped = 0;
    for i in 0..80 {
        let out = sampler.sample(&mut rng).unwrap();
        let [x0, y0, x1, y1] = sampler.primitives()[0]
            .params()
            .unwrap()
            .rect("box")
            .unwrap();
        let (cx0, cy0) = (x0.max(0), y0.max(0));
        let (cx1, cy1) = (x1.min(CANVAS - 1), y1.min(CANVAS - 1));

        let mask = binary_mask(&out.masks.get("Rectangle").unwrap()[0], ALPHA_THRESHOLD);
        let ann = create_annotation(i + 1, 1, cat, &mask, (128, 128), 2.0);
        if cx0 > cx1 || cy0 > cy1 {
            assert!(ann.is_none());
            continue;
        }
        if (cx0, cy0, cx1, cy1) != (x0, y0, x1, y1) {
            clipped += 1;
        }

        let ann = ann.unwrap_or_else(|| panic!("no record for box {:?}", [x0, y0, x1, y1]));
        assert_eq!(ann.category_id, 1);
        assert_eq!(
            ann.bbox,
            [
                f64::from(cx0),
                f64::from(cy0),
                f64::from(cx1 - cx0 + 1),
                f64::from(cy1 - cy0 + 1),
            ]
        );
        assert!(matches!(ann.segmentation, Segmentation::Polygons(ref p) if !p.is_empty()));
    }
    assert!(clipped > 0);
}

#[test]
fn background_mask_yields_a_full_canvas_record() {
    let bg = Primitive::from(Background::new(vec![Rectangle::new().into()]));
    let mut sampler = Sampler::new(vec![bg], 64).unwrap();
    let out = sampler.sample(&mut SmallRng::seed_from_u64(5)).unwrap();

    let layers = out.masks.get("Rectangle").unwrap();
    assert_eq!(layers.len(), 1);
    let mask = binary_mask(&layers[0], ALPHA_THRESHOLD);
    let cat = CategoryInfo {
        id: 1,
        is_crowd: false,
    };
    let ann = create_annotation(1, 1, cat, &mask, (64, 64), 2.0).unwrap();
    assert_eq!(ann.area, 64 * 64);
    assert_eq!(ann.bbox, [0.0, 0.0, 64.0, 64.0]);
    assert!(matches!(ann.segmentation, Segmentation::Polygons(ref p) if p.len() == 1));
}
