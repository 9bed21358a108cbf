//! Batch resolution: many collections across files, resolved on parallel workers.

use std::path::PathBuf;
use std::time::Instant;

use indicatif::ProgressBar;
use serde_json::Value;
use tagprune_core::{
    read_collections, OutputWriter, OverlapResolver, ResolveStats, ResolvedRecord,
    SourcedCollection,
};

use super::{open_writer, ResolveArgs, ResolveContext};

/// A collection that could not be resolved.
#[derive(Debug)]
pub(super) struct RecordFailure {
    pub source: String,
    pub message: String,
}

pub(super) type Outcome = Result<ResolvedRecord, RecordFailure>;

/// Resolve every collection in `files` and write the records in input order.
pub(super) async fn resolve_batch(
    ctx: &ResolveContext,
    args: &ResolveArgs,
    files: Vec<PathBuf>,
) -> anyhow::Result<()> {
    let start_time = Instant::now();
    let mut stats = ResolveStats::default();

    let mut pending = Vec::new();
    for file in &files {
        match read_collections(file) {
            Ok(collections) => pending.extend(collections),
            Err(e) => {
                stats.failed += 1;
                tracing::error!("Failed: {:?} - {}", file, e);
            }
        }
    }

    let progress = create_progress_bar(pending.len() as u64);
    let outcomes = resolve_parallel(ctx.resolver, pending, ctx.workers, progress.clone()).await?;
    progress.finish_and_clear();

    let mut records = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        match outcome {
            Ok(record) => {
                stats.resolved += 1;
                stats.tags_dropped += record.dropped;
                records.push(record);
            }
            Err(failure) => {
                stats.failed += 1;
                tracing::error!("Failed: {} - {}", failure.source, failure.message);
            }
        }
    }

    let mut writer = OutputWriter::new(open_writer(&args.output)?, ctx.format, ctx.pretty);
    writer.write_records(&records)?;
    writer.flush()?;
    if let Some(output_path) = &args.output {
        tracing::info!("Output written to {:?}", output_path);
    }

    stats.total_seconds = start_time.elapsed().as_secs_f64();
    tracing::info!(
        "Resolved {} collection(s), {} failed, {} tag(s) dropped",
        stats.resolved,
        stats.failed,
        stats.tags_dropped
    );
    print_summary(&stats);

    Ok(())
}

/// Validate and resolve a single raw collection.
pub(super) fn resolve_one(resolver: &OverlapResolver<'_>, collection: SourcedCollection) -> Outcome {
    let SourcedCollection { source, value } = collection;

    let value = match value {
        Ok(value) => value,
        Err(e) => {
            return Err(RecordFailure {
                source,
                message: format!("invalid JSON: {e}"),
            })
        }
    };
    let tags = match resolver.resolve_value(&value) {
        Ok(tags) => tags,
        Err(e) => {
            return Err(RecordFailure {
                source,
                message: e.to_string(),
            })
        }
    };

    Ok(ResolvedRecord {
        dropped: entry_count(&value) - entry_count(&tags),
        tags,
        source,
    })
}

/// Entries in a validated collection.
fn entry_count(value: &Value) -> usize {
    match value {
        Value::Array(items) => items.len(),
        Value::Object(scores) => scores.len(),
        _ => 0,
    }
}

/// Split `pending` into contiguous chunks, one blocking task per chunk.
///
/// Outcomes come back in the order of `pending`.
pub(super) async fn resolve_parallel(
    resolver: OverlapResolver<'static>,
    pending: Vec<SourcedCollection>,
    workers: usize,
    progress: ProgressBar,
) -> anyhow::Result<Vec<Outcome>> {
    let total = pending.len();
    let chunk_size = total.div_ceil(workers.max(1)).max(1);

    let mut handles = Vec::new();
    let mut pending = pending.into_iter().peekable();
    while pending.peek().is_some() {
        let chunk: Vec<SourcedCollection> = pending.by_ref().take(chunk_size).collect();
        let progress = progress.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            chunk
                .into_iter()
                .map(|collection| {
                    let outcome = resolve_one(&resolver, collection);
                    progress.inc(1);
                    outcome
                })
                .collect::<Vec<_>>()
        }));
    }

    let mut outcomes = Vec::with_capacity(total);
    for handle in handles {
        outcomes.extend(handle.await?);
    }
    Ok(outcomes)
}

/// Create a progress bar for batch resolution.
fn create_progress_bar(total: u64) -> ProgressBar {
    use indicatif::ProgressStyle;

    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar().template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
    ) {
        pb.set_style(style.progress_chars("##-"));
    }
    pb
}

/// Print a formatted summary table after a batch run.
fn print_summary(stats: &ResolveStats) {
    let total = stats.resolved + stats.failed;
    let rate = if stats.total_seconds > 0.0 {
        stats.resolved as f64 / stats.total_seconds
    } else {
        0.0
    };

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Resolved:     {:>8}", stats.resolved);
    if stats.failed > 0 {
        eprintln!("    Failed:       {:>8}", stats.failed);
    }
    eprintln!("    Tags dropped: {:>8}", stats.tags_dropped);
    eprintln!("  ------------------------------------");
    eprintln!("    Total:        {:>8}", total);
    eprintln!("    Duration:     {:>7.2}s", stats.total_seconds);
    eprintln!("    Rate:         {:>7.1} sets/sec", rate);
    eprintln!("  ====================================");
}
