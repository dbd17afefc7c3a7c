//! Kitscope CLI - sortable tables and summaries over UI-kit usage reports

#![deny(warnings)]

// Global invariants enforced:
// - Deterministic output ordering
// - Identical input yields byte-for-byte identical output
// - Logs go to stderr, rendered output to stdout (or --output)

use anyhow::Context;
use clap::{Parser, Subcommand};
use kitscope_core::aggregates::compute_summary;
use kitscope_core::config::{self, ResolvedConfig};
use kitscope_core::render::{self, DEFAULT_WIDTH};
use kitscope_core::table::find_column;
use kitscope_core::{compute_view, html, open_reports, tables, SortState, TableKind};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kitscope")]
#[command(about = "Sortable tables and summaries over UI-kit usage reports")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one report as a sorted table
    Table {
        /// Directory holding the report files
        dir: PathBuf,

        /// Which table to show
        #[arg(long, default_value = "components")]
        table: TableName,

        /// Column to sort by, like a header click: a new column starts in the
        /// first-click direction, the active column flips
        #[arg(long)]
        sort: Option<String>,

        /// Force the sort ascending
        #[arg(long)]
        ascending: bool,

        /// Show at most N rows (overrides config file)
        #[arg(long)]
        max_rows: Option<usize>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Write output to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Path to config file (default: auto-discover in DIR)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Target width of text tables
        #[arg(long, default_value_t = DEFAULT_WIDTH)]
        width: usize,
    },
    /// Show headline numbers and top-N lists
    Summary {
        /// Directory holding the report files
        dir: PathBuf,

        /// Length of the top-N lists (overrides config file)
        #[arg(long)]
        top: Option<usize>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Path to config file (default: auto-discover in DIR)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List where a component is used, one page at a time
    References {
        /// Directory holding the report files
        dir: PathBuf,

        /// Component name
        component: String,

        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: usize,

        /// Rows per page (overrides config file)
        #[arg(long)]
        page_size: Option<usize>,

        /// Column to sort by (default: report order)
        #[arg(long)]
        sort: Option<String>,

        /// Sort ascending instead of descending
        #[arg(long, requires = "sort")]
        ascending: bool,

        /// Path to config file (default: auto-discover in DIR)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Target width of text tables
        #[arg(long, default_value_t = DEFAULT_WIDTH)]
        width: usize,
    },
    /// Validate or show configuration
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file
    Validate {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show the resolved configuration (merged defaults + config file)
    Show {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Html,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum TableName {
    Components,
    Props,
    Tags,
    Styles,
}

impl From<TableName> for TableKind {
    fn from(name: TableName) -> Self {
        match name {
            TableName::Components => TableKind::Components,
            TableName::Props => TableKind::Props,
            TableName::Tags => TableKind::Tags,
            TableName::Styles => TableKind::Styles,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet)?;

    match cli.command {
        Commands::Table {
            dir,
            table,
            sort,
            ascending,
            max_rows,
            format,
            output,
            config: config_path,
            width,
        } => {
            let kind = TableKind::from(table);
            let (bundle, mut resolved) = open_reports(&dir, config_path.as_deref())
                .context("failed to open reports")?;
            log_config_source(&resolved);

            if max_rows == Some(0) {
                anyhow::bail!("--max-rows must be positive");
            }

            // CLI flags override config file values
            if max_rows.is_some() {
                resolved.tables.entry(kind).or_default().max_rows = max_rows;
            }

            let mut table_view = tables::build_table(&bundle, kind, &resolved)?;
            if let Some(key) = sort.as_deref() {
                if !kind.has_column(key) {
                    tracing::warn!(
                        table = %kind,
                        key = %key,
                        "unknown sort column, rows keep report order"
                    );
                }
            }
            if let Some(changed) = tables::apply_sort_request(&mut table_view, sort.as_deref(), ascending) {
                tracing::info!(key = %changed.key, direction = changed.direction.as_str(), "sorting");
            }
            let view = table_view.view();
            let columns = table_view.columns();
            let sort_state = table_view.sort_state();

            let rendered = match format {
                OutputFormat::Text => {
                    let mut text = format!("{}\n\n", kind.title());
                    text.push_str(&render::render_text(columns, &view, sort_state, width));
                    text
                }
                OutputFormat::Json => {
                    let mut json = render::render_json(columns, &view, sort_state);
                    json.push('\n');
                    json
                }
                OutputFormat::Html => html::render_html_table(kind.title(), columns, &view, sort_state),
            };
            emit(&rendered, output.as_deref())?;
        }
        Commands::Summary {
            dir,
            top,
            format,
            config: config_path,
        } => {
            let (bundle, resolved) = open_reports(&dir, config_path.as_deref())
                .context("failed to open reports")?;
            log_config_source(&resolved);

            let effective_top = top.unwrap_or(resolved.top);
            if effective_top == 0 {
                anyhow::bail!("--top must be positive");
            }

            let summary = compute_summary(&bundle, &resolved.codebases, effective_top);
            match format {
                OutputFormat::Text => print!("{}", render::render_summary_text(&summary)),
                OutputFormat::Json => println!("{}", render::render_summary_json(&summary)),
                OutputFormat::Html => {
                    anyhow::bail!("HTML output is only available for the table command")
                }
            }
        }
        Commands::References {
            dir,
            component,
            page,
            page_size,
            sort,
            ascending,
            config: config_path,
            width,
        } => {
            let (bundle, resolved) = open_reports(&dir, config_path.as_deref())
                .context("failed to open reports")?;
            log_config_source(&resolved);

            let usage = bundle
                .component(&component)
                .with_context(|| format!("component not found in report: {}", component))?;

            let columns = tables::reference_columns();
            let rows = tables::reference_rows(usage, &resolved.codebases);
            let sort_state = match sort {
                Some(key) => {
                    if find_column(&columns, &key).is_none() {
                        tracing::warn!(key = %key, "unknown sort column, rows keep report order");
                    }
                    SortState::by(key, !ascending)
                }
                None => SortState::unsorted(),
            };

            let view = compute_view(&rows, &columns, &sort_state, None);
            let page = view.page(page, page_size.unwrap_or(resolved.page_size));
            println!("{} ({} references)\n", component, view.total);
            print!(
                "{}",
                render::render_page_text(&columns, &page, &sort_state, width)
            );
        }
        Commands::Config { action } => match action {
            ConfigAction::Validate { path } => {
                let project_root = std::env::current_dir()?;
                let resolved = config::load_and_resolve(&project_root, path.as_deref());

                match resolved {
                    Ok(config) => {
                        if let Some(ref p) = config.config_path {
                            println!("Config valid: {}", p.display());
                        } else {
                            println!("No config file found. Using defaults.");
                        }
                    }
                    Err(e) => {
                        eprintln!("Config validation failed: {:#}", e);
                        std::process::exit(1);
                    }
                }
            }
            ConfigAction::Show { path } => {
                let project_root = std::env::current_dir()?;
                let resolved = config::load_and_resolve(&project_root, path.as_deref())
                    .context("failed to load configuration")?;
                print_config(&resolved);
            }
        },
    }

    Ok(())
}

/// Install the stderr log subscriber
///
/// `RUST_LOG` directives are honoured; the flags set the default level.
fn init_logging(verbose: u8, quiet: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(format!("kitscope={}", level).parse()?)
        .add_directive(format!("kitscope_core={}", level).parse()?);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn log_config_source(resolved: &ResolvedConfig) {
    if let Some(path) = &resolved.config_path {
        tracing::info!(path = %path.display(), "using config");
    }
}

/// Print to stdout, or write to `output` when given
fn emit(rendered: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("failed to create output directory: {}", parent.display())
                    })?;
                }
            }
            std::fs::write(path, rendered)
                .with_context(|| format!("failed to write output: {}", path.display()))?;
            eprintln!("Output written to: {}", path.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

fn print_config(resolved: &ResolvedConfig) {
    println!("Configuration:");
    if let Some(ref p) = resolved.config_path {
        println!("  Source: {}", p.display());
    } else {
        println!("  Source: defaults (no config file found)");
    }
    println!();
    println!("Sorting:");
    println!("  default_descending: {}", resolved.default_descending);
    println!("  first_click_descending: {}", resolved.first_click_descending);
    println!();
    println!("Limits:");
    println!(
        "  max_rows: {}",
        resolved
            .max_rows
            .map(|v| v.to_string())
            .unwrap_or_else(|| "none".to_string())
    );
    println!("  page_size: {}", resolved.page_size);
    println!("  top: {}", resolved.top);
    println!();
    println!("Codebases:");
    println!(
        "  filter: {}",
        if resolved.codebases.is_pass_through() {
            "all codebases"
        } else {
            "custom patterns"
        }
    );
    println!();
    println!("Tables:");
    for kind in TableKind::ALL {
        let options = resolved.sort_options(kind);
        println!(
            "  {}: sort {} {}, max_rows {}",
            kind,
            options.default_key.as_deref().unwrap_or(kind.default_sort_key()),
            if options.default_descending { "desc" } else { "asc" },
            resolved
                .max_rows(kind)
                .map(|v| v.to_string())
                .unwrap_or_else(|| "none".to_string())
        );
    }
}
