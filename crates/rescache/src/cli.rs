//! Command line interface
//!
//! Inspects and maintains a cache through the same store the agents use.
//! Every command prints one JSON document on stdout.
//!
//! The in-memory backend lives and dies with a single process, so the CLI
//! only runs against a shared Redis cache.

use clap::{Parser, Subcommand};
use rescache_application::CacheStore;
use rescache_domain::error::{Error, Result};
use rescache_domain::ports::ProviderCache;
use rescache_domain::value_objects::RelationshipFilter;
use rescache_infrastructure::logging::init_logging;
use rescache_infrastructure::{CacheBackendKind, ConfigLoader, build_store};
use serde_json::{Value, json};
use std::path::PathBuf;

/// Command line interface for rescache
#[derive(Parser, Debug)]
#[command(name = "rescache")]
#[command(about = "Inspect and maintain a resource cache")]
#[command(
    long_about = "Inspect and maintain a resource cache.\n\nRequires a shared backend: set cache.provider = \"redis\" and cache.redis_url in the configuration file or through RESCACHE_CACHE__PROVIDER and RESCACHE_CACHE__REDIS_URL."
)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Operation to run
    #[command(subcommand)]
    pub command: Command,
}

/// Cache operations
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the ids of a type
    Ids {
        /// Entity type
        #[arg(value_name = "TYPE")]
        type_name: String,

        /// Only ids matching this glob
        #[arg(long)]
        pattern: Option<String>,
    },

    /// Show one entity
    Get {
        /// Entity type
        #[arg(value_name = "TYPE")]
        type_name: String,

        /// Entity id
        id: String,

        /// Only these relationships (repeatable)
        #[arg(long = "rel", value_name = "NAME")]
        relationships: Vec<String>,

        /// Attributes only
        #[arg(long, conflicts_with = "relationships")]
        no_relationships: bool,
    },

    /// Remove entities and their relationships
    Evict {
        /// Entity type
        #[arg(value_name = "TYPE")]
        type_name: String,

        /// Ids to remove
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Show or change change detection for a type
    Hashing {
        /// Entity type
        #[arg(value_name = "TYPE")]
        type_name: String,

        /// Compare content hashes before writing
        #[arg(long, conflicts_with = "disable")]
        enable: bool,

        /// Always write, ignoring stored hashes
        #[arg(long)]
        disable: bool,
    },
}

/// Run one command against a store and return its JSON output
pub async fn execute(command: &Command, store: &CacheStore) -> Result<Value> {
    match command {
        Command::Ids { type_name, pattern } => {
            let ids = match pattern {
                Some(pattern) => store.filter_identifiers(type_name, pattern).await?,
                None => store.get_identifiers(type_name).await?,
            };
            Ok(json!(ids))
        }
        Command::Get {
            type_name,
            id,
            relationships,
            no_relationships,
        } => {
            let filter = if *no_relationships {
                RelationshipFilter::None
            } else if relationships.is_empty() {
                RelationshipFilter::All
            } else {
                RelationshipFilter::include(relationships)
            };
            let item = store.get(type_name, id, &filter).await?;
            Ok(serde_json::to_value(item)?)
        }
        Command::Evict { type_name, ids } => {
            let evicted = store.evict_all(type_name, ids).await?;
            Ok(json!({ "type": type_name, "evicted": evicted }))
        }
        Command::Hashing {
            type_name,
            enable,
            disable,
        } => {
            if *enable || *disable {
                store.set_hashing_disabled(type_name, *disable).await?;
            }
            let disabled = store.is_hashing_disabled(type_name).await?;
            Ok(json!({ "type": type_name, "hashingDisabled": disabled }))
        }
    }
}

/// Load configuration, start logging, build the store and run the command
pub async fn run(cli: Cli) -> Result<()> {
    let loader = match &cli.config {
        Some(path) => ConfigLoader::new().with_config_path(path),
        None => ConfigLoader::new(),
    };
    let config = loader.load()?;
    if config.cache.provider == CacheBackendKind::Memory {
        return Err(Error::configuration(
            "the CLI needs a shared cache: set cache.provider = \"redis\" and cache.redis_url",
        ));
    }
    init_logging(&config.logging)?;

    let store = build_store(&config.cache)?;
    let output = execute(&cli.command, &store).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
