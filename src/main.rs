use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use similar::{ChangeTag, TextDiff};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use stress_tester::config::{load_from_path, StressConfig};
use stress_tester::page::{paginate, select, PageSpec, RequestFilter};
use stress_tester::{
    Action, ActionKind, LineIndex, NullService, Position, RewriteMode, RustParser, Session,
    SyntaxTree,
};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "stress-tester")]
#[command(about = "Generate and verify language-service stress actions for Rust sources", long_about = None)]
#[command(version)]
struct Cli {
    /// Log generator and session details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the actions of one page for a file
    Generate {
        file: PathBuf,

        /// Rewrite mode: none, basic, concurrent or inside-out
        #[arg(short, long, default_value = "none")]
        mode: RewriteMode,

        /// Page to print, as N/M
        #[arg(short, long, default_value = "1/1")]
        page: PageSpec,

        /// Only print these request kinds (edits are always printed)
        #[arg(short, long = "request")]
        requests: Vec<ActionKind>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Run every mode over a file or directory and check that replaying the
    /// edits rebuilds each file
    Verify {
        path: PathBuf,

        /// Modes to verify (defaults to the config, or all modes)
        #[arg(short, long = "mode")]
        modes: Vec<RewriteMode>,

        /// Number of pages to split each action list into
        #[arg(long)]
        pages: Option<usize>,

        /// Stress config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Count actions per kind for every mode
    Stats { file: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Generate {
            file,
            mode,
            page,
            requests,
            json,
        } => cmd_generate(&file, mode, page, requests, json),

        Commands::Verify {
            path,
            modes,
            pages,
            config,
        } => cmd_verify(&path, modes, pages, config),

        Commands::Stats { file } => cmd_stats(&file),
    }
}

fn init_logging(verbose: bool) {
    // RUST_LOG decides unless --verbose asks for more.
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) if !verbose => filter,
        Ok(filter) => filter.add_directive(tracing::Level::DEBUG.into()),
        Err(_) if verbose => EnvFilter::new("debug"),
        Err(_) => EnvFilter::new("warn"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Helper: Read and parse a source file, warning about syntax errors.
fn load_tree(parser: &mut RustParser, file: &Path) -> Result<(String, SyntaxTree)> {
    let source = fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let parsed = parser.parse_with_source(&source)?;
    let issues = parsed.syntax_issues();
    if let Some(first) = issues.first() {
        let at = LineIndex::new(&source).line_col(Position::new(first.span.start));
        eprintln!(
            "{}",
            format!(
                "Warning: {} has {} syntax error(s), first at {}",
                file.display(),
                issues.len(),
                at
            )
            .yellow()
        );
    }
    let tree = parsed.syntax_tree()?;
    Ok((source, tree))
}

#[derive(Serialize)]
struct GeneratedPage<'a> {
    file: &'a Path,
    mode: RewriteMode,
    page: String,
    start_fingerprint: String,
    actions: &'a [Action],
}

fn cmd_generate(
    file: &Path,
    mode: RewriteMode,
    spec: PageSpec,
    requests: Vec<ActionKind>,
    json: bool,
) -> Result<()> {
    let mut parser = RustParser::new()?;
    let (source, tree) = load_tree(&mut parser, file)?;

    let actions = mode.generate(&tree);
    let mut page = select(mode, &source, &actions, spec)?;
    RequestFilter::only(requests).apply(&mut page.actions);
    let fingerprint = format!("{:016x}", page.start_fingerprint());

    if json {
        let output = GeneratedPage {
            file,
            mode,
            page: spec.to_string(),
            start_fingerprint: fingerprint,
            actions: &page.actions,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", format!("Actions for {}", file.display()).bold());
    println!("Mode: {mode}");
    println!("Page: {spec} ({} actions)", page.actions.len());
    println!("Start fingerprint: {fingerprint}");
    println!();

    // Line/column are relative to the buffer as it is when each action runs.
    let mut state = page.start;
    let mut index = LineIndex::new(state.content());
    for action in &page.actions {
        let location = match action.offset() {
            Some(offset) => index.line_col(Position::new(offset)).to_string(),
            None => "-".to_string(),
        };
        println!("{:>10}  {}", location.dimmed(), action);
        if action.is_edit() {
            state
                .apply(action)
                .with_context(|| format!("generated edit does not apply: {action}"))?;
            index = LineIndex::new(state.content());
        }
    }

    Ok(())
}

/// Helper: Show unified diff between original and rebuilt content
fn display_diff(file: &Path, original: &str, rebuilt: &str) {
    println!(
        "\n{}",
        format!("--- {} (original)", file.display()).dimmed()
    );
    println!("{}", format!("+++ {} (rebuilt)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, rebuilt);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", sign);
    }
}

/// Helper: Collect the source files below `path` in a stable order.
fn discover_sources(path: &Path, config: &StressConfig) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(path) {
        let entry = entry?;
        if entry.file_type().is_file() && config.accepts_file(entry.path()) {
            files.push(entry.path().to_path_buf());
        }
    }
    files.sort();

    if files.is_empty() {
        anyhow::bail!(
            "No source files with extension(s) {} found under {}",
            config.files.extensions.join(", "),
            path.display()
        );
    }
    Ok(files)
}

enum Outcome {
    Verified { actions: usize },
    Mismatch { rebuilt: String },
    Failed { reason: String },
}

/// Helper: Run one mode over a file page by page and report whether the
/// edits rebuild it.
fn verify_mode(
    tree: &SyntaxTree,
    mode: RewriteMode,
    page_count: usize,
    filter: &RequestFilter,
) -> Outcome {
    let actions = mode.generate(tree);
    let pages = match paginate(mode, tree.source(), &actions, page_count) {
        Ok(pages) => pages,
        Err(e) => {
            return Outcome::Failed {
                reason: e.to_string(),
            }
        }
    };

    let mut executed = 0;
    let mut rebuilt = tree.source().to_string();
    for mut page in pages {
        // Each page must start where the previous one ended.
        if page.number > 1 && page.start.content() != rebuilt {
            return Outcome::Failed {
                reason: format!(
                    "page {} does not start where page {} ended",
                    page.number,
                    page.number - 1
                ),
            };
        }
        filter.apply(&mut page.actions);
        match Session::run(page.start, &page.actions, &mut NullService) {
            Ok(report) => {
                executed += report.total();
                rebuilt = report.content;
            }
            Err(e) => {
                return Outcome::Failed {
                    reason: format!("page {}: {e}", page.number),
                }
            }
        }
    }

    if rebuilt == tree.source() {
        Outcome::Verified { actions: executed }
    } else {
        Outcome::Mismatch { rebuilt }
    }
}

fn cmd_verify(
    path: &Path,
    modes: Vec<RewriteMode>,
    pages: Option<usize>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = match config_path {
        Some(path) => load_from_path(&path)?,
        None => StressConfig::default(),
    };
    let modes = if modes.is_empty() {
        config.generation.modes.clone()
    } else {
        modes
    };
    let page_count = pages.unwrap_or(config.generation.page_count);
    if page_count == 0 {
        anyhow::bail!("--pages must be at least 1");
    }
    let filter = config.request_filter();
    let files = discover_sources(path, &config)?;

    println!("{}", "Verifying action replay...".bold());
    println!("Path: {}", path.display());
    println!(
        "Modes: {}",
        modes.iter().map(|m| m.name()).collect::<Vec<_>>().join(", ")
    );
    println!("Pages: {page_count}");
    println!();

    let mut parser = RustParser::new()?;
    let mut verified = 0;
    let mut failed = 0;
    let mut skipped = 0;

    for file in &files {
        let tree = match load_tree(&mut parser, file) {
            Ok((_, tree)) => tree,
            Err(e) => {
                println!("{} {}: Skipped ({})", "⊘".cyan(), file.display(), e);
                skipped += 1;
                continue;
            }
        };

        for &mode in &modes {
            match verify_mode(&tree, mode, page_count, &filter) {
                Outcome::Verified { actions } => {
                    println!(
                        "{} {} [{}]: {} actions",
                        "✓".green(),
                        file.display(),
                        mode,
                        actions
                    );
                    verified += 1;
                }
                Outcome::Mismatch { rebuilt } => {
                    eprintln!("{} {} [{}]: MISMATCH", "✗".red(), file.display(), mode);
                    display_diff(file, tree.source(), &rebuilt);
                    failed += 1;
                }
                Outcome::Failed { reason } => {
                    eprintln!("{} {} [{}]: FAILED", "✗".red(), file.display(), mode);
                    eprintln!("  Error: {}", reason);
                    failed += 1;
                }
            }
        }
    }

    println!();
    println!("{}", "Summary:".bold());
    println!("  {} verified", format!("{}", verified).green());
    println!("  {} failed", format!("{}", failed).red());
    println!("  {} skipped", format!("{}", skipped).cyan());

    if failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_stats(file: &Path) -> Result<()> {
    let mut parser = RustParser::new()?;
    let (source, tree) = load_tree(&mut parser, file)?;

    println!("{}", format!("Action statistics for {}", file.display()).bold());
    println!("Bytes: {}", source.len());
    println!("Tokens: {}", tree.token_count());
    println!();

    print!("{:<24}", "kind");
    for mode in RewriteMode::ALL {
        print!("{:>12}", mode.name());
    }
    println!();

    let counts: Vec<BTreeMap<ActionKind, usize>> = RewriteMode::ALL
        .iter()
        .map(|mode| {
            let mut counts = BTreeMap::new();
            for action in mode.generate(&tree) {
                *counts.entry(action.kind()).or_insert(0) += 1;
            }
            counts
        })
        .collect();

    for kind in ActionKind::ALL {
        print!("{:<24}", kind.name());
        for per_mode in &counts {
            print!("{:>12}", per_mode.get(&kind).copied().unwrap_or(0));
        }
        println!();
    }
    print!("{:<24}", "total".bold());
    for per_mode in &counts {
        print!("{:>12}", per_mode.values().sum::<usize>());
    }
    println!();

    Ok(())
}
