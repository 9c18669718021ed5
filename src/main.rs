use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use techtree::render;
use techtree::{load_corpus, Config, ErrorPolicy, TaskGraph};

#[derive(Parser, Debug)]
#[command(name = "techtree")]
#[command(version)]
#[command(about = "Compile .rst task descriptions into a Graphviz dependency graph")]
struct Args {
    /// Path to data directory
    data_directory: PathBuf,

    /// Output file name (the graph description goes to <output>.dot)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip documents that fail to parse instead of aborting
    #[arg(short, long)]
    keep_going: bool,

    /// Only write the graph description, do not run the renderer
    #[arg(long)]
    no_render: bool,

    /// Also write the parsed tasks and graph to <output>.json
    #[arg(long)]
    json: bool,

    /// Config file (defaults to $TECHTREE_CONFIG, then ./techtree.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;

    // Initialize logger from RUST_LOG or the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", config.techtree.log_level.as_str())
    ).init();

    log::info!("Starting techtree v{}", env!("CARGO_PKG_VERSION"));

    let output = args.output.unwrap_or_else(|| config.output().to_path_buf());
    let policy = if args.keep_going || config.techtree.keep_going {
        ErrorPolicy::KeepGoing
    } else {
        ErrorPolicy::FailFast
    };

    let report = load_corpus(&args.data_directory, policy)
        .with_context(|| format!("Failed to load tasks from {}", args.data_directory.display()))?;

    if report.corpus.is_empty() {
        log::warn!("No tasks found in {}", args.data_directory.display());
    }

    let graph = TaskGraph::from_corpus(&report.corpus);
    let dot_file = render::write_dot(&output, &graph.to_dot())?;

    if args.json {
        let json_file = render::json_path(&output);
        let dump = serde_json::json!({
            "tasks": &report.corpus,
            "graph": &graph,
        });
        std::fs::write(&json_file, serde_json::to_string_pretty(&dump)?)
            .with_context(|| format!("Failed to write {}", json_file.display()))?;
        log::info!("Task dump written to {}", json_file.display());
    }

    if config.render.enabled && !args.no_render {
        if let Err(e) = render::render(&config.render, &dot_file, &output) {
            log::warn!("Could not run {}: {}", config.render.command, e);
        }
    }

    if let Some(summary) = report.failure_summary() {
        anyhow::bail!(summary);
    }

    Ok(())
}
