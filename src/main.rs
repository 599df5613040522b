//! # Composer - A Visual Page Composer
//!
//! Builds pages out of blocks and exports them as static HTML.
//!
//! ## Quick Start
//!
//! ```bash
//! # Create a document
//! cargo run -- new --title "Landing page"
//!
//! # Add blocks to it
//! cargo run -- add <DOC> heading
//! cargo run -- add <DOC> image --at 0
//!
//! # Export a standalone preview page
//! cargo run -- export <DOC> --preview -o page.html
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use composer_blocks::{BlockId, ContentValue, registry};
use composer_core::{Composer, Config, DocumentId, DocumentStore, FileStore};

/// Composer - a block-based visual page composer
#[derive(Parser, Debug)]
#[command(name = "composer")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Action,

    /// Config file to use instead of the default location
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Documents directory, overriding the config
    #[arg(long, value_name = "DIR", global = true)]
    store: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// List the block types in the palette
    Blocks,

    /// Create an empty document
    New {
        /// Document title
        #[arg(short, long, default_value = "Untitled")]
        title: String,
    },

    /// List stored documents
    List,

    /// Show the blocks of a document
    Show {
        /// Document id
        document: String,
    },

    /// Add a block to a document
    Add {
        /// Document id
        document: String,

        /// Block type key (see `composer blocks`)
        block_type: String,

        /// Insert position, defaults to the end
        #[arg(long, value_name = "INDEX")]
        at: Option<usize>,
    },

    /// Remove a block from a document
    Remove {
        /// Document id
        document: String,

        /// Block id
        block: String,
    },

    /// Move a block to a drop-zone index
    Move {
        /// Document id
        document: String,

        /// Block id
        block: String,

        /// Drop-zone index (0 is before the first block)
        #[arg(long, value_name = "ZONE")]
        to: usize,
    },

    /// Set one content field of a block
    Set {
        /// Document id
        document: String,

        /// Block id
        block: String,

        /// Field name, as shown by `show`
        field: String,

        /// New value
        value: String,
    },

    /// Export a document as HTML
    Export {
        /// Document id
        document: String,

        /// Wrap the markup in a standalone preview page
        #[arg(long)]
        preview: bool,

        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    tracing::info!("Starting Composer v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args)?;
    let root = config
        .documents_dir()
        .context("Could not locate the documents directory")?;
    tracing::debug!("Documents directory: {}", root.display());
    let store: Arc<dyn DocumentStore> = Arc::new(FileStore::new(root));

    run(args.command, config, store).await
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => Config::load(),
    };
    if let Some(dir) = &args.store {
        config.store.directory = Some(dir.clone());
    }
    Ok(config)
}

async fn run(
    action: Action,
    config: Config,
    store: Arc<dyn DocumentStore>,
) -> anyhow::Result<()> {
    match action {
        Action::Blocks => {
            for def in registry::all() {
                let kind = if def.is_container { "container" } else { "" };
                println!("{:<14} {:<18} {}", def.key, def.label, kind);
            }
        }

        Action::New { title } => {
            let mut composer = Composer::new(config, store);
            composer.set_title(&title)?;
            let id = composer.save().await?;
            println!("{}", id);
        }

        Action::List => {
            for summary in store.list().await? {
                let updated = summary
                    .updated_at
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default();
                println!("{}  {:<16}  {}", summary.id, updated, summary.title);
            }
        }

        Action::Show { document } => {
            let composer = open(config, store, &document).await?;
            let doc = composer.document();
            println!("{} ({} blocks)", doc.title(), doc.len());
            for (index, block) in doc.blocks().iter().enumerate() {
                println!("{:>3}  {:<14} {}", index, block.kind(), block.id);
                for (key, value) in block.content.fields() {
                    println!("       {} = {}", key, value);
                }
            }
        }

        Action::Add {
            document,
            block_type,
            at,
        } => {
            let mut composer = open(config, store, &document).await?;
            let index = at.unwrap_or(composer.document().len());
            let id = composer.add_block(&block_type, index)?;
            composer.save().await?;
            println!("{}", id);
        }

        Action::Remove { document, block } => {
            let mut composer = open(config, store, &document).await?;
            composer.delete_block(&BlockId::from(block))?;
            composer.save().await?;
        }

        Action::Move {
            document,
            block,
            to,
        } => {
            let mut composer = open(config, store, &document).await?;
            if composer.move_block_to(&BlockId::from(block), to)? {
                composer.save().await?;
            }
        }

        Action::Set {
            document,
            block,
            field,
            value,
        } => {
            let mut composer = open(config, store, &document).await?;
            let id = BlockId::from(block);
            if composer.update_block_content(&id, &field, parse_value(&value))? {
                composer.save().await?;
            }
        }

        Action::Export {
            document,
            preview,
            output,
        } => {
            let composer = open(config, store, &document).await?;
            let html = if preview {
                composer.preview()
            } else {
                composer.export_markup()
            };
            match output {
                Some(path) => tokio::fs::write(&path, html)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => println!("{}", html),
            }
        }
    }

    Ok(())
}

async fn open(
    config: Config,
    store: Arc<dyn DocumentStore>,
    id: &str,
) -> anyhow::Result<Composer> {
    let mut composer = Composer::new(config, store);
    composer
        .load(&DocumentId::from(id))
        .await
        .with_context(|| format!("Failed to open document {}", id))?;
    Ok(composer)
}

/// Reads a command-line value as a number, a flag, a list or text.
fn parse_value(raw: &str) -> ContentValue {
    if let Ok(n) = raw.parse::<i64>() {
        return ContentValue::from(n);
    }
    match raw {
        "true" => ContentValue::from(true),
        "false" => ContentValue::from(false),
        _ if raw.contains('\n') => {
            ContentValue::from(raw.lines().map(str::to_string).collect::<Vec<_>>())
        }
        _ => ContentValue::from(raw),
    }
}
