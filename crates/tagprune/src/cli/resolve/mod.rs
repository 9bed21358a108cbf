//! The `tagprune resolve` command for dropping redundant tags.

mod batch;
pub mod types;

pub use types::OutputFormat;

use clap::Args;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::PathBuf;
use tagprune_core::{
    Config, FileDiscovery, OutputFormat as CoreOutputFormat, OutputWriter, OverlapResolver,
};

use batch::resolve_batch;

/// Arguments for the `resolve` command.
#[derive(Args, Debug, Default)]
pub struct ResolveArgs {
    /// Tag file (.json / .jsonl), directory of tag files, or `-` for stdin
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (defaults to `output.format` from config)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Number of parallel workers (defaults to `processing.parallel_workers`)
    #[arg(short, long)]
    pub parallel: Option<usize>,

    /// Relations dataset to use instead of the configured or bundled one
    #[arg(long)]
    pub relations: Option<PathBuf>,

    /// Write compact JSON even when config asks for pretty output
    #[arg(long)]
    pub compact: bool,
}

/// Resolution context assembled from config and CLI overrides.
pub(crate) struct ResolveContext {
    pub resolver: OverlapResolver<'static>,
    pub format: CoreOutputFormat,
    pub pretty: bool,
    pub workers: usize,
    pub config: Config,
}

/// Execute the resolve command.
pub async fn execute(args: ResolveArgs, config: Config) -> anyhow::Result<()> {
    let ctx = setup(&args, config)?;

    if args.input.as_os_str() == "-" {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        return resolve_single(&ctx, &content, &args.output);
    }

    if !args.input.exists() {
        anyhow::bail!("Input not found: {}", args.input.display());
    }

    let is_lines = args
        .input
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jsonl"));
    if args.input.is_file() && !is_lines {
        let content = std::fs::read_to_string(&args.input)?;
        return resolve_single(&ctx, &content, &args.output);
    }

    let files = FileDiscovery::new(ctx.config.processing.clone()).discover(&args.input);
    if files.is_empty() {
        tracing::warn!("No tag files found at {:?}", args.input);
        return Ok(());
    }
    tracing::info!("Found {} tag file(s) to resolve", files.len());

    resolve_batch(&ctx, &args, files).await
}

/// Apply CLI overrides to `config` and install the relation table.
fn setup(args: &ResolveArgs, mut config: Config) -> anyhow::Result<ResolveContext> {
    if let Some(path) = &args.relations {
        config.relations.path = Some(path.to_string_lossy().into_owned());
    }

    let format = match args.format {
        Some(format) => format.into(),
        None => config.output.format.parse::<CoreOutputFormat>()?,
    };

    let workers = args.parallel.unwrap_or(config.processing.parallel_workers);
    if workers == 0 {
        anyhow::bail!("--parallel must be > 0");
    }

    let table = tagprune_core::init_global_relations(&config)?;
    tracing::debug!(
        "Relation table ready: {} edges over {} tags",
        table.len(),
        table.tag_count()
    );

    Ok(ResolveContext {
        resolver: OverlapResolver::new(table),
        format,
        pretty: config.output.pretty && !args.compact,
        workers,
        config,
    })
}

/// Resolve one collection and write the bare result.
fn resolve_single(
    ctx: &ResolveContext,
    content: &str,
    output: &Option<PathBuf>,
) -> anyhow::Result<()> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    let resolved = ctx.resolver.resolve_value(&value)?;

    let mut writer = OutputWriter::new(open_writer(output)?, ctx.format, ctx.pretty);
    writer.write_value(&resolved)?;
    writer.flush()?;

    if let Some(path) = output {
        tracing::info!("Output written to {:?}", path);
    }
    Ok(())
}

/// Buffered writer for the output file, or stdout when none is given.
pub(crate) fn open_writer(output: &Option<PathBuf>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(std::io::stdout())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_args_default_option_fields_are_none() {
        let args = ResolveArgs::default();
        assert!(args.output.is_none());
        assert!(args.format.is_none());
        assert!(args.parallel.is_none());
        assert!(args.relations.is_none());
        assert!(!args.compact);
    }

    #[test]
    fn setup_uses_config_defaults() {
        let ctx = setup(&ResolveArgs::default(), Config::default()).unwrap();
        assert_eq!(ctx.format, CoreOutputFormat::Json);
        assert_eq!(ctx.workers, 4);
        assert!(ctx.pretty);
    }

    #[test]
    fn setup_applies_cli_overrides() {
        let args = ResolveArgs {
            format: Some(OutputFormat::Jsonl),
            parallel: Some(2),
            compact: true,
            ..ResolveArgs::default()
        };
        let ctx = setup(&args, Config::default()).unwrap();
        assert_eq!(ctx.format, CoreOutputFormat::JsonLines);
        assert_eq!(ctx.workers, 2);
        assert!(!ctx.pretty);
    }

    #[test]
    fn setup_rejects_zero_workers() {
        let args = ResolveArgs {
            parallel: Some(0),
            ..ResolveArgs::default()
        };
        assert!(setup(&args, Config::default()).is_err());
    }

    #[test]
    fn resolve_single_writes_file_in_input_shape() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.json");
        let args = ResolveArgs {
            compact: true,
            ..ResolveArgs::default()
        };
        let ctx = setup(&args, Config::default()).unwrap();

        resolve_single(
            &ctx,
            r#"{"1girl": 0.99, "long_hair": 0.8, "very_long_hair": 0.7}"#,
            &Some(out.clone()),
        )
        .unwrap();

        assert_eq!(
            std::fs::read_to_string(&out).unwrap(),
            "{\"1girl\":0.99,\"very_long_hair\":0.7}\n"
        );
    }

    #[test]
    fn resolve_single_rejects_scalar() {
        let ctx = setup(&ResolveArgs::default(), Config::default()).unwrap();
        let err = resolve_single(&ctx, "42", &None).unwrap_err();
        assert!(err.to_string().contains("Invalid input type"));
    }
}
