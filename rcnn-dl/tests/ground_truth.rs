use approx::assert_abs_diff_eq;
use bbox::prelude::*;
use image::{GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};
use itertools::izip;
use ndarray::{arr1, s};
use noisy_float::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
use rcnn_dl::{
    load_image, load_image_gt, load_image_infos, parse_image_meta, BoxAnnotation, ImageConfig,
    ImageInfo, ResizeMode,
};
use std::path::{Path, PathBuf};

fn test_dir(name: &str) -> PathBuf {
    let dir = Path::new(env!("CARGO_TARGET_TMPDIR")).join(name);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn square_config(dim: usize) -> ImageConfig {
    ImageConfig {
        image_min_dim: Some(dim),
        image_min_scale: None,
        image_max_dim: Some(dim),
        image_resize_mode: ResizeMode::Square,
    }
}

#[test]
fn load_grayscale_image() {
    let path = test_dir("load_grayscale_image").join("gray.png");
    GrayImage::from_fn(20, 10, |x, y| Luma([(x + y * 20) as u8]))
        .save(&path)
        .unwrap();

    let image = load_image(&path).unwrap();
    assert_eq!(image.dim(), (10, 20, 3));
    for ((y, x, _), &value) in image.indexed_iter() {
        assert_eq!(value as usize, x + y * 20);
    }
}

#[test]
fn load_rgba_image() {
    let path = test_dir("load_rgba_image").join("rgba.png");
    RgbaImage::from_fn(6, 4, |x, y| Rgba([x as u8, y as u8, 7, 128]))
        .save(&path)
        .unwrap();

    let image = load_image(&path).unwrap();
    assert_eq!(image.dim(), (4, 6, 3));
    for ((y, x, c), &value) in image.indexed_iter() {
        assert_eq!(value, [x as u8, y as u8, 7][c]);
    }
}

#[test]
fn load_missing_image() {
    let path = test_dir("load_missing_image").join("missing.png");
    let err = load_image(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("missing.png"));
}

#[test]
fn ground_truth_square_mode() {
    let path = test_dir("ground_truth_square_mode").join("image.png");
    RgbImage::from_pixel(200, 100, Rgb([50, 100, 150]))
        .save(&path)
        .unwrap();

    let info = ImageInfo {
        filepath: path,
        bboxes: vec![BoxAnnotation {
            class_id: 2,
            y1: 10,
            x1: 20,
            y2: 30,
            x2: 40,
        }],
    };
    let gt = load_image_gt(&square_config(128), &info, 7, &mut StdRng::seed_from_u64(0)).unwrap();

    assert_eq!(gt.image.dim(), (128, 128, 3));
    assert!(gt.image.slice(s![..32, .., ..]).iter().all(|&value| value == 0));
    assert!(gt.image.slice(s![96.., .., ..]).iter().all(|&value| value == 0));
    assert_eq!(gt.class_ids, arr1(&[2]));
    assert_eq!(gt.bbox.dim(), (1, 4));
    izip!(gt.bbox.iter(), [38.4, 12.8, 51.2, 25.6]).for_each(|(&actual, expect)| {
        assert_abs_diff_eq!(actual, expect, epsilon = 1e-9);
    });

    let meta = &gt.image_meta;
    assert_eq!(meta.image_id, 7);
    assert_eq!(meta.original_image_shape, [100, 200, 3]);
    assert_eq!(meta.image_shape, [128, 128, 3]);
    assert_eq!(meta.scale, r64(0.64));

    let batch = gt.meta_array().insert_axis(ndarray::Axis(0));
    let parsed = parse_image_meta(&batch).unwrap();
    assert_eq!(parsed.image_id, arr1(&[7]));
    assert_eq!(parsed.window.row(0).to_vec(), vec![32, 0, 96, 128]);
    assert_eq!(parsed.to_metas().unwrap()[0].window, meta.window);
}

#[test]
fn ground_truth_without_boxes() {
    let path = test_dir("ground_truth_without_boxes").join("image.png");
    GrayImage::from_pixel(64, 64, Luma([9])).save(&path).unwrap();

    let info = ImageInfo {
        filepath: path,
        bboxes: vec![],
    };
    let gt = load_image_gt(&square_config(64), &info, 0, &mut StdRng::seed_from_u64(0)).unwrap();

    assert_eq!(gt.image.dim(), (64, 64, 3));
    assert!(gt.image.iter().all(|&value| value == 9));
    assert_eq!(gt.class_ids.len(), 0);
    assert_eq!(gt.bbox.dim(), (0, 4));
    assert_eq!(gt.image_meta.window.tlbr(), [0, 0, 64, 64]);
}

#[test]
fn ground_truth_crop_mode_shifts_boxes() {
    let path = test_dir("ground_truth_crop_mode_shifts_boxes").join("image.png");
    RgbImage::from_pixel(300, 200, Rgb([1, 2, 3]))
        .save(&path)
        .unwrap();

    let config = ImageConfig {
        image_min_dim: Some(128),
        image_min_scale: None,
        image_max_dim: None,
        image_resize_mode: ResizeMode::Crop,
    };
    let info = ImageInfo {
        filepath: path,
        bboxes: vec![BoxAnnotation {
            class_id: 1,
            y1: 50,
            x1: 60,
            y2: 100,
            x2: 120,
        }],
    };
    let gt = load_image_gt(&config, &info, 3, &mut StdRng::seed_from_u64(42)).unwrap();

    assert_eq!(gt.image.dim(), (128, 128, 3));
    assert_eq!(gt.image_meta.scale, r64(1.0));
    let row = gt.bbox.row(0);
    assert!(row[0] <= 50.0 && row[1] <= 60.0);
    assert_abs_diff_eq!(row[2] - row[0], 50.0, epsilon = 1e-9);
    assert_abs_diff_eq!(row[3] - row[1], 60.0, epsilon = 1e-9);
}

#[test]
fn load_annotation_file() {
    let dir = test_dir("load_annotation_file");
    let path = dir.join("annotations.json");
    std::fs::write(
        &path,
        r#"[
            {
                "filepath": "images/a.jpg",
                "bboxes": [{"class_id": 1, "y1": 0, "x1": 1, "y2": 10, "x2": 11}]
            },
            {"filepath": "images/b.jpg", "bboxes": []}
        ]"#,
    )
    .unwrap();

    let infos = load_image_infos(&path).unwrap();
    assert_eq!(infos.len(), 2);
    assert_eq!(infos[0].filepath, dir.join("images/a.jpg"));
    assert_eq!(infos[0].bboxes[0].x2, 11);
    assert!(infos[1].bboxes.is_empty());

    let broken = dir.join("broken.json");
    std::fs::write(
        &broken,
        r#"[{"filepath": "a.jpg", "bboxes": [{"class_id": 1, "y1": 0}]}]"#,
    )
    .unwrap();
    assert!(load_image_infos(&broken).is_err());
}
