//! Drives a whole split: chunk every top-level folder and write one collection
//! file per chunk.

use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::assembler::{assemble, inherit_settings};
use crate::chunker::chunk;
use crate::config::SplitConfig;
use crate::error::{Result, SplitError};
use crate::model::{Collection, Item, ItemGroup, Request};
use crate::naming::chunk_name;
use crate::rewrite::rewrite_identifier;
use crate::sink::{file_stem, output_path, write_document};

#[derive(Debug)]
pub struct ChunkFailure {
    pub name: String,
    pub path: PathBuf,
    pub error: SplitError,
}

/// Outcome of a run. Files in `written` stay on disk even when `failures` is not empty.
#[derive(Debug, Default)]
pub struct SplitReport {
    pub written: Vec<PathBuf>,
    pub failures: Vec<ChunkFailure>,
}

impl SplitReport {
    pub fn files_written(&self) -> usize {
        self.written.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

struct PlannedChunk<'a> {
    name: String,
    path: PathBuf,
    group: &'a ItemGroup,
    children: &'a [Item],
    collides: bool,
}

/// Splits every top-level folder of `source` into files under `config.output_dir`.
///
/// Only an invalid limit or an unusable output directory aborts the run. Failures
/// of individual chunks are collected in the report and the remaining chunks are
/// still written.
pub fn run(source: &Collection, config: &SplitConfig) -> Result<SplitReport> {
    let limit = config.limit()?;

    fs::create_dir_all(&config.output_dir).map_err(|e| SplitError::WriteFailure {
        path: config.output_dir.clone(),
        source: e,
    })?;

    let loose = match &config.loose_requests_group {
        Some(name) => collect_loose_requests(source, name),
        None => {
            for item in &source.item {
                if let Item::Request(request) = item {
                    let method = request.request.as_ref().map_or("GET", Request::method);
                    warn!(request = %request.name, %method, "skipping top-level request outside any folder");
                }
            }
            None
        }
    };

    let groups: Vec<&ItemGroup> = source
        .item
        .iter()
        .filter_map(|item| match item {
            Item::Group(group) => Some(group),
            Item::Request(_) => None,
        })
        .chain(loose.as_ref())
        .collect();

    let plan = plan_chunks(&groups, limit, config)?;
    let emit = |job: &PlannedChunk<'_>| emit_chunk(source, job, config);

    let results: Vec<Result<PathBuf>> = if config.jobs > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.jobs)
            .build()
            .map_err(|e| SplitError::Config(format!("cannot start worker pool: {}", e)))?;
        pool.install(|| plan.par_iter().map(emit).collect())
    } else {
        plan.iter().map(emit).collect()
    };

    let mut report = SplitReport::default();
    for (job, result) in plan.into_iter().zip(results) {
        match result {
            Ok(path) => report.written.push(path),
            Err(error) => {
                warn!(chunk = %job.name, %error, "chunk not written");
                report.failures.push(ChunkFailure {
                    name: job.name,
                    path: job.path,
                    error,
                });
            }
        }
    }

    info!(
        written = report.files_written(),
        failed = report.failures.len(),
        output = %config.output_dir.display(),
        "split finished"
    );
    Ok(report)
}

/// Gathers top-level requests into a virtual folder, or `None` if there are none.
fn collect_loose_requests(source: &Collection, name: &str) -> Option<ItemGroup> {
    let requests: Vec<Item> = source
        .item
        .iter()
        .filter(|item| !item.is_group())
        .cloned()
        .collect();

    if requests.is_empty() {
        return None;
    }
    debug!(group = %name, requests = requests.len(), "collected top-level requests");
    Some(ItemGroup::new(name, requests))
}

/// Chunks and names everything up front so names are decided in document order
/// regardless of how many workers write the files.
fn plan_chunks<'a>(
    groups: &[&'a ItemGroup],
    limit: usize,
    config: &SplitConfig,
) -> Result<Vec<PlannedChunk<'a>>> {
    let mut seen = HashSet::new();
    let mut plan = Vec::new();

    for &group in groups {
        let chunks = chunk(&group.item, limit)?;
        debug!(group = %group.name, children = group.item.len(), chunks = chunks.len(), "chunked folder");

        for c in chunks {
            let name = chunk_name(&group.name, c.index);
            // Case-insensitive filesystems map "Auth" and "auth" to the same file.
            let collides = !seen.insert(file_stem(&name).to_lowercase());
            plan.push(PlannedChunk {
                path: output_path(&config.output_dir, &name),
                name,
                group,
                children: c.items,
                collides,
            });
        }
    }

    Ok(plan)
}

fn emit_chunk(source: &Collection, job: &PlannedChunk<'_>, config: &SplitConfig) -> Result<PathBuf> {
    if job.collides {
        return Err(SplitError::NameCollision(job.name.clone()));
    }

    let mut collection = assemble(&job.name, &job.group.name, job.children);
    if config.inherit_settings {
        inherit_settings(&mut collection, source, job.group);
    }

    let document = collection.to_json()?;
    write_document(&job.path, &document)?;

    let document = rewrite_identifier(&document, &config.postman_id)?;
    write_document(&job.path, &document)?;

    info!(path = %job.path.display(), requests = job.children.len(), "wrote chunk");
    Ok(job.path.clone())
}
