//! CLI entry point for folio

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Load and validate the pages and posts of a Jekyll-style site", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load all content and report every problem
    Check,

    /// List site information
    List {
        /// Type of content to list (post, page, tag, category)
        #[arg(default_value = "post")]
        r#type: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show one item by permalink
    Show {
        /// Permalink, e.g. /about/
        permalink: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Create a new post or page
    New {
        /// Layout to use (post, page)
        #[arg(short, long)]
        layout: Option<String>,

        /// Title of the new post
        title: String,
    },

    /// Reload content whenever a source changes
    #[command(alias = "w")]
    Watch,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio=debug,info"
    } else {
        "folio=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let site = folio::Folio::new(&base_dir)?;

    match cli.command {
        Commands::Check => folio::commands::check::run(&site)?,

        Commands::List { r#type, json } => folio::commands::list::run(&site, &r#type, json)?,

        Commands::Show { permalink, json } => {
            folio::commands::show::run(&site, &permalink, json)?
        }

        Commands::New { layout, title } => {
            let layout = layout.as_deref();
            tracing::info!(
                "Creating new {} with title: {}",
                layout.unwrap_or(&site.config.default_layout),
                title
            );
            let path = site.new_post(&title, layout)?;
            println!("Created: {:?}", path);
        }

        Commands::Watch => folio::commands::watch::run(&site)?,
    }

    Ok(())
}
