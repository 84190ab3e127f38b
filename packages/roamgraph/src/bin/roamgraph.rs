//! roamgraph CLI
//!
//! # Usage
//!
//! ```bash
//! # Node and link counts
//! roamgraph --db ~/.emacs.d/org-roam.db stats
//!
//! # Nodes nobody links to and that link nowhere
//! roamgraph orphans
//!
//! # Look a node up by ID or title
//! roamgraph node "monoidal category"
//!
//! # Export the connected, non-draft part of the collection as JSON
//! roamgraph export --remove-orphans --tag draft --exclude
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use roamgraph::{GraphConfig, GraphError, LoadStatus, RoamGraph};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "roamgraph")]
#[command(about = "Query the link graph of an org-roam database", long_about = None)]
struct Cli {
    /// org-roam database (overrides config and ROAMGRAPH_DB)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Fail when the database cannot be read instead of using an empty collection
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Node, link and orphan counts
    Stats,

    /// List orphan nodes
    Orphans,

    /// Show one node
    Node {
        /// Node ID or title
        identifier: String,
    },

    /// List nodes linking to a node
    Backlinks {
        /// Node ID or title
        identifier: String,
    },

    /// List every tag
    Tags,

    /// Print nodes as JSON
    Export {
        /// Drop orphan nodes first
        #[arg(long)]
        remove_orphans: bool,

        /// Tag to filter by (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Treat --tag values as regular expressions
        #[arg(long)]
        regex: bool,

        /// Drop nodes with the tags instead of keeping only them
        #[arg(long)]
        exclude: bool,

        /// Pretty-print
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<GraphConfig, GraphError> {
    let mut config = match &cli.config {
        Some(path) => GraphConfig::from_file(path)?,
        None => GraphConfig::default(),
    }
    .with_env_overrides()?;

    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if cli.strict {
        config.strict = true;
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<(), GraphError> {
    let config = load_config(&cli)?;
    let graph = RoamGraph::open_with(&config)?;

    let report = graph.load_report();
    if report.status() == LoadStatus::Failed {
        eprintln!("warning: {} could not be read:", config.expanded_db_path().display());
        for failure in &report.failures {
            eprintln!("  {}", failure);
        }
    }

    match cli.command {
        Commands::Stats => {
            let (nodes, links) = graph.size()?;
            println!("nodes:            {}", nodes);
            println!("links:            {}", links);
            println!("orphans:          {}", graph.orphans().len());
            println!("tags:             {}", graph.all_tags().len());
            println!("duplicate titles: {}", graph.duplicate_titles()?.len());
        }
        Commands::Orphans => {
            for node in graph.orphans() {
                println!("{}\t{}\t{}", node.id, node.title, node.file);
            }
        }
        Commands::Node { identifier } => {
            let resolved = graph.resolve(&identifier)?;
            if let Some(warning) = &resolved.warning {
                eprintln!("warning: {}", warning);
            }
            let node = resolved.node;
            println!("id:    {}", node.id);
            println!("title: {}", node.title);
            println!("file:  {}", node.file);
            println!("tags:  {}", node.tags.iter().cloned().collect::<Vec<_>>().join(", "));
            for dest in &node.links_to {
                let title = graph.node_title(dest).unwrap_or("?");
                println!("  -> {} ({})", title, dest);
            }
            for link in &node.misc_links {
                println!("  -> {}:{}", link.link_type, link.content);
            }
        }
        Commands::Backlinks { identifier } => {
            for source in graph.node_backlinks(&identifier)? {
                println!("{}\t{}", source, graph.node_title(source)?);
            }
        }
        Commands::Tags => {
            for tag in graph.all_tags() {
                println!("{}", tag);
            }
        }
        Commands::Export {
            remove_orphans,
            tags,
            regex,
            exclude,
            pretty,
        } => {
            let mut selected = if remove_orphans {
                graph.remove_orphans()
            } else {
                graph
            };
            if !tags.is_empty() {
                selected = if regex {
                    selected.filter_tag_patterns(tags.as_slice(), exclude)?
                } else {
                    selected.filter_tags(tags.as_slice(), exclude)
                };
            }
            println!("{}", selected.to_json(pretty)?);
        }
    }

    Ok(())
}
