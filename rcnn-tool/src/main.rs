use anyhow::{Context as _, Result};
use bbox::prelude::*;
use clap::Parser;
use log::info;
use ndarray::Axis;
use prettytable::{cell, row, Table};
use rand::{rngs::StdRng, SeedableRng};
use rcnn_dl::{
    compose_image_meta_batch, fix_num_pad, load_image_gt, load_image_infos, Config, GroundTruth,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Parser)]
/// Inspect the preprocessed ground truth of a detection dataset
enum Opts {
    /// Print the image meta of each sample in a table
    Inspect {
        /// configuration file
        config_file: PathBuf,
        /// JSON annotation file
        annotation_file: PathBuf,
        #[clap(long)]
        /// only process the first N samples
        limit: Option<usize>,
        #[clap(long, default_value = "0")]
        /// random seed for crop mode
        seed: u64,
    },
    /// Print packed image meta records and fixed-length boxes as JSON
    Dump {
        /// configuration file
        config_file: PathBuf,
        /// JSON annotation file
        annotation_file: PathBuf,
        #[clap(long, default_value = "100")]
        /// number of box rows per sample after padding
        max_instances: usize,
        #[clap(long)]
        /// only process the first N samples
        limit: Option<usize>,
        #[clap(long, default_value = "0")]
        /// random seed for crop mode
        seed: u64,
    },
}

#[derive(Debug, Serialize)]
struct DumpOutput {
    /// `[batch, 12]`
    image_meta: Vec<Vec<f64>>,
    /// `[batch, max_instances, (y1, x1, y2, x2, tag)]`
    bbox: Vec<Vec<Vec<f64>>>,
    /// `[batch, max_instances, (class_id, tag)]`
    class_ids: Vec<Vec<Vec<i32>>>,
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    match Opts::parse() {
        Opts::Inspect {
            config_file,
            annotation_file,
            limit,
            seed,
        } => {
            inspect(config_file, annotation_file, limit, seed)?;
        }
        Opts::Dump {
            config_file,
            annotation_file,
            max_instances,
            limit,
            seed,
        } => {
            dump(config_file, annotation_file, max_instances, limit, seed)?;
        }
    }

    Ok(())
}

fn load_samples(
    config_file: impl AsRef<Path>,
    annotation_file: impl AsRef<Path>,
    limit: Option<usize>,
    seed: u64,
) -> Result<Vec<(PathBuf, GroundTruth)>> {
    let config_file = config_file.as_ref();
    let config = Config::open(config_file)
        .with_context(|| format!("failed to load config file '{}'", config_file.display()))?;
    let infos = load_image_infos(annotation_file)?;
    let limit = limit.unwrap_or(infos.len());
    let mut rng = StdRng::seed_from_u64(seed);

    infos
        .iter()
        .take(limit)
        .enumerate()
        .map(|(image_id, info)| -> Result<_> {
            let gt = load_image_gt(&config.image, info, image_id, &mut rng)?;
            Ok((info.filepath.clone(), gt))
        })
        .collect()
}

fn inspect(
    config_file: impl AsRef<Path>,
    annotation_file: impl AsRef<Path>,
    limit: Option<usize>,
    seed: u64,
) -> Result<()> {
    let samples = load_samples(config_file, annotation_file, limit, seed)?;

    let mut table = Table::new();
    table.add_row(row![
        "id",
        "path",
        "original shape",
        "image shape",
        "window",
        "scale",
        "boxes"
    ]);

    samples.iter().for_each(|(path, gt)| {
        let meta = &gt.image_meta;
        table.add_row(row![
            meta.image_id,
            path.display(),
            format!("{:?}", meta.original_image_shape),
            format!("{:?}", meta.image_shape),
            format!("{:?}", meta.window.tlbr()),
            format!("{:.4}", meta.scale.raw()),
            gt.bbox.nrows(),
        ]);
    });

    table.printstd();
    Ok(())
}

fn dump(
    config_file: impl AsRef<Path>,
    annotation_file: impl AsRef<Path>,
    max_instances: usize,
    limit: Option<usize>,
    seed: u64,
) -> Result<()> {
    let samples = load_samples(config_file, annotation_file, limit, seed)?;

    let metas: Vec<_> = samples
        .iter()
        .map(|(_, gt)| gt.image_meta.clone())
        .collect();
    let image_meta = compose_image_meta_batch(&metas)
        .outer_iter()
        .map(|row| row.to_vec())
        .collect();

    let mut bbox: Vec<Vec<Vec<f64>>> = vec![];
    let mut class_ids: Vec<Vec<Vec<i32>>> = vec![];

    for (path, gt) in &samples {
        let padded_bbox = fix_num_pad(&gt.bbox, max_instances)
            .with_context(|| format!("too many boxes in '{}'", path.display()))?;
        let class_id_column = gt.class_ids.clone().insert_axis(Axis(1));
        let padded_class_ids = fix_num_pad(&class_id_column, max_instances)
            .with_context(|| format!("too many boxes in '{}'", path.display()))?;

        bbox.push(padded_bbox.outer_iter().map(|row| row.to_vec()).collect());
        class_ids.push(
            padded_class_ids
                .outer_iter()
                .map(|row| row.to_vec())
                .collect(),
        );
    }

    info!("dumped {} samples", samples.len());

    let output = DumpOutput {
        image_meta,
        bbox,
        class_ids,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
