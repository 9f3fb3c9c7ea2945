//! `lod` — rebuild and export the LOD lexical database.
//!
//! Reads `config.toml` (or the path given with `--config`) layered with
//! `LOD_`-prefixed environment variables; flags override both. All logic
//! lives in the library crates; this binary only wires fetcher → rebuild →
//! report → optional persistence/export.

use std::{fs, path::PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use lod_graph::{GraphRepository as _, GraphStore};
use lod_linker::{KeyLinking, LinkOptions, SourceSet, export};
use lod_store_sqlite::SqliteStore;
use lod_text::{
  AutoFetcher, DEFAULT_SEPARATOR, FILE_PLAN, FileSpec, RecordKind,
  serialize_all,
};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "LOD lexical database tool")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Fetch the source tables, rebuild the linked graph and print the
  /// report.
  Rebuild {
    /// Directory or URL prefix holding the flat tables.
    #[arg(long)]
    source: Option<String>,

    /// Persist the rebuilt graph into this SQLite database.
    #[arg(long)]
    db: Option<PathBuf>,

    /// Only link keys that already exist; never create them.
    #[arg(long)]
    lookup_only: bool,

    /// Emit the full report as JSON instead of a summary.
    #[arg(long)]
    json: bool,
  },

  /// Restore a persisted graph and write the flat export files.
  Export {
    /// SQLite database to restore from.
    #[arg(long)]
    db: Option<PathBuf>,

    /// Directory the export files are written into.
    #[arg(long, default_value = "export")]
    out: PathBuf,
  },
}

#[derive(Debug, Clone, Default, Deserialize)]
struct LodConfig {
  /// Default source location for `rebuild`.
  source:    Option<String>,
  /// Field separator of the flat tables.
  separator: Option<char>,
  /// Language attached to definitions and harvested keys.
  language:  Option<String>,
  /// Default SQLite database path.
  db_path:   Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config.clone()).required(false))
    .add_source(config::Environment::with_prefix("LOD"))
    .build()
    .context("failed to read config file")?;
  let cfg: LodConfig = settings
    .try_deserialize()
    .context("failed to deserialise configuration")?;

  match cli.command {
    Command::Rebuild {
      source,
      db,
      lookup_only,
      json,
    } => rebuild_command(cfg, source, db, lookup_only, json),
    Command::Export { db, out } => export_command(cfg, db, out),
  }
}

fn rebuild_command(
  cfg: LodConfig,
  source: Option<String>,
  db: Option<PathBuf>,
  lookup_only: bool,
  json: bool,
) -> anyhow::Result<()> {
  let source = source
    .or(cfg.source)
    .context("no source configured (--source flag or `source` in config)")?;
  let separator = cfg.separator.unwrap_or(DEFAULT_SEPARATOR);

  let fetcher = AutoFetcher::new();
  let sources = SourceSet::load(&fetcher, &source, separator)
    .with_context(|| format!("failed to load source tables from {source}"))?;

  let options = LinkOptions {
    key_linking: if lookup_only {
      KeyLinking::LookupOnly
    } else {
      KeyLinking::CreateMissing
    },
    language:    cfg.language.or_else(|| Some("en".to_string())),
  };

  let mut graph = GraphStore::new();
  let report = lod_linker::rebuild_with(&mut graph, &sources, &options)
    .context("rebuild failed")?;

  if json {
    println!("{}", serde_json::to_string_pretty(&report)?);
  } else {
    println!("words:            {}", report.words);
    println!("definitions:      {}", report.definitions);
    println!("keys:             {}", report.keys);
    println!("author edges:     {}", report.author_edges);
    println!("derivative edges: {}", report.derivative_edges);
    println!("affix edges:      {}", report.affix_edges);
    println!("key edges:        {}", report.key_edges);
    println!("warnings:         {}", report.warnings.len());
    for warning in &report.warnings {
      println!("  - {warning:?}");
    }
  }

  if let Some(db) = db.or(cfg.db_path) {
    let mut repo = SqliteStore::open(&db)
      .with_context(|| format!("failed to open store at {db:?}"))?;
    repo.persist(&graph).context("failed to persist graph")?;
    tracing::info!(path = %db.display(), "graph persisted");
  }

  Ok(())
}

fn export_command(
  cfg: LodConfig,
  db: Option<PathBuf>,
  out: PathBuf,
) -> anyhow::Result<()> {
  let db = db
    .or(cfg.db_path)
    .context("no database configured (--db flag or `db_path` in config)")?;
  let separator = cfg.separator.unwrap_or(DEFAULT_SEPARATOR);

  let mut repo = SqliteStore::open(&db)
    .with_context(|| format!("failed to open store at {db:?}"))?;
  let graph = repo.restore().context("failed to restore graph")?;
  let records = export::export(&graph);

  fs::create_dir_all(&out)
    .with_context(|| format!("failed to create {out:?}"))?;

  let mut plan: Vec<&FileSpec> = FILE_PLAN.iter().collect();
  plan.sort_by_key(|spec| spec.export_order);
  for spec in plan {
    let lines = match spec.kind {
      RecordKind::Author => serialize_all(&records.authors, separator),
      RecordKind::Definition => {
        serialize_all(&records.definitions, separator)
      }
      RecordKind::Event => serialize_all(&records.events, separator),
      RecordKind::Setting => serialize_all(&records.settings, separator),
      RecordKind::Syllable => serialize_all(&records.syllables, separator),
      RecordKind::Type => serialize_all(&records.types, separator),
      RecordKind::Word => serialize_all(&records.words, separator),
      RecordKind::WordSpell => serialize_all(&records.spells, separator),
    }
    .with_context(|| format!("failed to serialize {}", spec.kind))?;

    let path = out.join(spec.file_name);
    fs::write(&path, lines.join("\n") + "\n")
      .with_context(|| format!("failed to write {path:?}"))?;
    tracing::info!(file = %path.display(), records = lines.len(), "exported");
  }

  Ok(())
}
