use anyhow::Result;
use clap::Parser;
use git_lanes::git::GitRepository;
use git_lanes::graph::GraphBuilder;
use git_lanes::state::GraphConfig;
use std::io::Write;
use std::path::PathBuf;

/// Print the lane layout of a repository's history.
#[derive(Debug, Parser)]
#[command(name = "git-lanes", version, about)]
struct Cli {
    /// Repository to read (any path inside the work tree)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Maximum number of commits to lay out
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Commits per page
    #[arg(long)]
    page_size: Option<usize>,

    /// Walk all local branches instead of HEAD
    #[arg(long)]
    all: bool,

    /// Emit the layout as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = GraphConfig::load();
    if let Some(limit) = cli.limit {
        config.max_commits = limit;
    }
    if let Some(page_size) = cli.page_size {
        config.page_size = page_size;
    }
    config.all_branches |= cli.all;

    let repo = GitRepository::discover(&cli.path)?;
    let mut builder = GraphBuilder::new().with_lane_warning_threshold(config.lane_warning_threshold);
    let (commits, layout) = repo
        .pages(config.scope(), config.page_size, Some(config.max_commits))
        .layout_all(&mut builder)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if cli.json {
        serde_json::to_writer_pretty(&mut out, &layout)?;
        writeln!(out)?;
        return Ok(());
    }

    for (commit, row) in commits.iter().zip(&layout.rows) {
        let segments: Vec<String> = row.segments.iter().map(|s| s.to_string()).collect();
        writeln!(
            out,
            "{:>5} {:>3} {} {:<24} {}",
            row.row,
            row.lane,
            commit.short_id,
            segments.join(" "),
            commit.summary
        )?;
    }

    if !layout.warnings.is_empty() {
        tracing::warn!("{} unresolved parent references", layout.warnings.len());
    }

    Ok(())
}
