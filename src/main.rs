use clap::{Parser, Subcommand};
use docnav::config::{self, CONFIG_FILENAME, SIDEBAR_DIR};
use docnav::links;
use docnav::output;
use docnav::resolve::SiteResolver;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "docnav", version)]
#[command(about = "Navigation and sidebar resolver for documentation sites")]
#[command(long_about = "\
Navigation and sidebar resolver for documentation sites

The content directory holds the markdown documents and the site configuration.
Each page gets the same navigation bar; its sidebar is the one whose path prefix
is the longest match for the page path.

Content structure:

  docs/
  ├── config.toml                  # Site config: title, base, nav, theme
  ├── sidebar/                     # Optional sidebar fragments
  │   ├── computer.toml            # [[\"/computer/\"]] sections
  │   └── handbook.toml
  ├── index.md                     # → /
  ├── computer/
  │   ├── index.md                 # → /computer/
  │   └── graph.md                 # → /computer/graph
  └── public/                      # Static files, checked by dead-link detection

Run 'docnav gen-config' to generate a documented config.toml.")]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "docs", global = true)]
    source: PathBuf,

    /// Log at info level (otherwise RUST_LOG, default warn)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate configuration and check every link against the content tree
    Check,
    /// Print the navigation bar
    Nav {
        /// Highlight the entries active on this page
        #[arg(long)]
        path: Option<String>,
    },
    /// Print the sidebar resolved for a page
    Sidebar {
        /// Requested page path, e.g. /handbook/react/chapter_1
        path: String,
    },
    /// Print resolved pages as JSON for a renderer
    ///
    /// Checks links first and fails on dead links unless ignore_dead_links is set.
    Resolve {
        /// Requested page paths
        #[arg(required_unless_present = "all")]
        paths: Vec<String>,
        /// Resolve every document in the content directory
        #[arg(long, conflicts_with = "paths")]
        all: bool,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let site_config = config::load_config(&cli.source)?;
            let resolver = SiteResolver::new(&site_config)?;
            let report = links::scan_site(&resolver, &cli.source)?;
            output::print_check_output(&output::CheckSummary {
                config_files: config_files(&cli.source)?,
                sidebar: resolver.sidebar_map(),
                document_count: report.document_count,
                dead_links: &report.dead_links,
                ignore_dead_links: site_config.ignore_dead_links,
            });
            report.enforce(site_config.ignore_dead_links)?;
            println!("==> Configuration is valid");
        }
        Command::Nav { path } => {
            let resolver = load_resolver(&cli.source)?;
            let current = path.map(|p| resolver.normalize(&p));
            output::print_nav(resolver.resolve_nav(current.as_deref().unwrap_or("/")), current.as_deref());
        }
        Command::Sidebar { path } => {
            let resolver = load_resolver(&cli.source)?;
            let path = resolver.normalize(&path);
            let (prev, next) = resolver.prev_next(&path);
            output::print_sidebar(&path, resolver.resolve_sidebar(&path), prev, next);
        }
        Command::Resolve { paths, all } => {
            let site_config = config::load_config(&cli.source)?;
            let resolver = SiteResolver::new(&site_config)?;
            let report = links::verify_site(&resolver, &cli.source, site_config.ignore_dead_links)?;
            let paths = if all { report.page_paths } else { paths };
            tracing::info!(pages = paths.len(), "Resolving pages");
            let pages = resolver.pages(paths.as_slice());
            println!("{}", serde_json::to_string_pretty(&pages)?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn load_resolver(source: &Path) -> Result<SiteResolver, Box<dyn std::error::Error>> {
    let site_config = config::load_config(source)?;
    Ok(SiteResolver::new(&site_config)?)
}

/// Config files present under the content root, for display.
fn config_files(source: &Path) -> Result<Vec<String>, config::ConfigError> {
    let mut files = Vec::new();
    if source.join(CONFIG_FILENAME).is_file() {
        files.push(CONFIG_FILENAME.to_string());
    }
    for path in config::fragment_files(source)? {
        if let Some(name) = path.file_name() {
            files.push(format!("{SIDEBAR_DIR}/{}", name.to_string_lossy()));
        }
    }
    Ok(files)
}
