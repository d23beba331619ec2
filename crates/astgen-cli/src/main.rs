use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use astgen_contracts::{MANIFEST_SCHEMA_VERSION, REPORT_SCHEMA_VERSION};
use astgen_core::header::strip_provenance;
use astgen_core::{Declaration, GenerateReport};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "ASTGEN_LOG";

#[derive(Parser, Debug)]
#[command(name = "astgen")]
#[command(about = "Deterministic AST schema code generator.", long_about = None)]
struct Cli {
    /// Log resolution decisions to stderr.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate `GetNodeId` impls for a schema.
    NodeIds {
        /// Schema file (`.json`, otherwise Rust syntax).
        #[arg(long)]
        schema: PathBuf,
        /// Generated Rust file.
        #[arg(long)]
        out: PathBuf,
        /// If set, fail if output differs (ignoring the timestamp line); do not write.
        #[arg(long, default_value_t = false)]
        check: bool,
        /// Timestamp written into the provenance header (default: now).
        #[arg(long)]
        timestamp: Option<String>,
    },
    /// Generate for every entry of a manifest.
    Batch {
        #[arg(long)]
        manifest: PathBuf,
        /// If set, fail if any output differs; do not write.
        #[arg(long, default_value_t = false)]
        check: bool,
    },
    /// Print the diagnostics catalog as Markdown.
    Diagnostics,
}

fn main() -> Result<()> {
    try_main().map_err(|err| {
        eprintln!("{err:#}");
        err
    })
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Command::NodeIds {
            schema,
            out,
            check,
            timestamp,
        } => {
            let ts = timestamp.unwrap_or_else(now_timestamp);
            run_node_ids(&schema, &out, check, &ts)
        }
        Command::Batch { manifest, check } => run_batch(&manifest, check),
        Command::Diagnostics => {
            print!("{}", astgen_core::diagnostics::render_diagnostics_md());
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn now_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

fn load_schema(path: &Path) -> Result<Vec<Declaration>> {
    let src = std::fs::read_to_string(path)
        .with_context(|| format!("read schema: {}", path.display()))?;
    let parsed = if path.extension().is_some_and(|ext| ext == "json") {
        astgen_core::frontend::parse_schema_json(&src)
    } else {
        astgen_core::frontend::parse_schema(&src)
    };
    parsed
        .map_err(|e| anyhow::anyhow!("{}", e.diagnostic()))
        .with_context(|| format!("load schema: {}", path.display()))
}

fn run_node_ids(schema: &Path, out: &Path, check: bool, timestamp: &str) -> Result<()> {
    let decls = load_schema(schema)?;
    let report = astgen_core::generate_report(&decls, timestamp)
        .map_err(|e| anyhow::anyhow!("{}", e.diagnostic()))
        .with_context(|| format!("generate node ids: {}", schema.display()))?;
    write_output(out, &report.document, check)?;
    print_report(out, &report)
}

#[derive(Debug, serde::Deserialize)]
struct Manifest {
    schema_version: String,
    /// Shared by all entries so a batch yields a single provenance stamp.
    #[serde(default)]
    timestamp: Option<String>,
    entries: Vec<ManifestEntry>,
}

#[derive(Debug, serde::Deserialize)]
struct ManifestEntry {
    schema: String,
    out: String,
}

fn run_batch(manifest_path: &Path, check: bool) -> Result<()> {
    let bytes = std::fs::read(manifest_path)
        .with_context(|| format!("read manifest: {}", manifest_path.display()))?;
    let m: Manifest = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse manifest JSON: {}", manifest_path.display()))?;
    if m.schema_version.trim() != MANIFEST_SCHEMA_VERSION {
        anyhow::bail!(
            "manifest schema_version mismatch: expected {MANIFEST_SCHEMA_VERSION} got {:?}",
            m.schema_version
        );
    }

    let ts = m.timestamp.clone().unwrap_or_else(now_timestamp);
    for (idx, e) in m.entries.iter().enumerate() {
        run_node_ids(Path::new(&e.schema), Path::new(&e.out), check, &ts)
            .with_context(|| format!("manifest entry[{idx}]"))?;
    }
    Ok(())
}

fn write_output(out_path: &Path, doc: &str, check: bool) -> Result<()> {
    if check {
        let cur = std::fs::read_to_string(out_path)
            .with_context(|| format!("read existing output: {}", out_path.display()))?;
        if strip_provenance(&cur) != strip_provenance(doc) {
            anyhow::bail!("generated output differs: {}", out_path.display());
        }
        debug!(out = %out_path.display(), "output up to date");
        return Ok(());
    }

    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir: {}", parent.display()))?;
    }
    std::fs::write(out_path, doc.as_bytes())
        .with_context(|| format!("write output: {}", out_path.display()))?;
    info!(out = %out_path.display(), bytes = doc.len(), "output written");
    Ok(())
}

fn print_report(out_path: &Path, report: &GenerateReport) -> Result<()> {
    let v = serde_json::json!({
        "schema_version": REPORT_SCHEMA_VERSION,
        "ok": true,
        "out": out_path.display().to_string(),
        "declarations": report.declarations,
        "records": report.records,
        "accessors": report.accessors,
        "body_sha256": astgen_core::util::body_sha256(&report.document),
    });
    println!("{}", serde_json::to_string(&v)?);
    Ok(())
}
