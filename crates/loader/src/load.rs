//! # Shapefile load
//!
//! Streams a shapefile into `fazendas` in fixed-size batches and finishes
//! with the geography column and index build.

use anyhow::{bail, Context};
use indicatif::{ProgressBar, ProgressStyle};
use sqlx::PgPool;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::record::FazendaRecord;
use crate::schema;
use crate::shapes;
use crate::writer::{BatchWriter, FazendaRow};

/// Parameters of one load run.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub shapefile: PathBuf,
    pub batch_size: usize,
    /// SRID of the shapefile coordinates (SIRGAS 2000 = 4674).
    pub source_srid: i32,
    /// Append to the existing table instead of recreating it.
    pub keep_existing: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct LoadSummary {
    pub loaded: u64,
    pub skipped: u64,
    pub elapsed: Duration,
}

pub async fn load(pool: &PgPool, options: &LoadOptions) -> anyhow::Result<LoadSummary> {
    if !options.shapefile.exists() {
        bail!("Shapefile not found: {}", options.shapefile.display());
    }
    if options.batch_size == 0 {
        bail!("batch size must be at least 1");
    }

    let start = Instant::now();

    if options.keep_existing {
        schema::create(pool).await.context("Failed to create table")?;
    } else {
        schema::recreate(pool).await.context("Failed to recreate table")?;
    }

    let mut reader = shapefile::Reader::from_path(&options.shapefile)
        .with_context(|| format!("Failed to open {}", options.shapefile.display()))?;

    let progress = match reader.shape_count() {
        Ok(total) => {
            tracing::info!("Shapefile holds {} records", total);
            ProgressBar::new(total as u64)
        }
        Err(_) => ProgressBar::new_spinner(),
    };
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} registros ({per_sec})",
        )?,
    );

    tracing::info!("Processing in batches of {} records", options.batch_size);

    let writer = BatchWriter::new(pool.clone(), options.source_srid);
    let mut batch: Vec<FazendaRow> = Vec::with_capacity(options.batch_size);
    let mut loaded = 0u64;
    let mut skipped = 0u64;

    for item in reader.iter_shapes_and_records() {
        let (shape, record) = item.context("Failed to read shape record")?;
        progress.inc(1);

        match shapes::to_geojson(shape)? {
            Some(geometry) => batch.push(FazendaRow {
                record: FazendaRecord::from_record(record),
                geometry,
            }),
            None => skipped += 1,
        }

        if batch.len() >= options.batch_size {
            loaded += writer.insert(&batch).await.context("Batch insert failed")?;
            batch.clear();
        }
    }

    if !batch.is_empty() {
        loaded += writer.insert(&batch).await.context("Batch insert failed")?;
    }
    progress.finish_and_clear();

    tracing::info!("Building geography column and spatial indexes...");
    schema::finalize(pool).await.context("Failed to finalize table")?;

    Ok(LoadSummary {
        loaded,
        skipped,
        elapsed: start.elapsed(),
    })
}
