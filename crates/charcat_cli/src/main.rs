//! charcat CLI
//!
//! Command-line front end for the character catalog. Every command prints
//! JSON on stdout; failures go to stderr with a non-zero exit code.

mod error;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use log::info;
use serde::Serialize;

use charcat_core::query::page::{
    DEFAULT_PAGE_SIZE, DEFAULT_SEARCH_PAGE_SIZE, DEFAULT_SORT_DIRECTION, DEFAULT_SORT_FIELD,
};
use charcat_core::{
    init_logging, open_db, CatalogConfig, CharacterCatalog, CharacterId, CharacterInput,
    CharacterPatch, CharacterType, FilterSpec, FsAssetStore, PageRequest,
    SqliteCharacterRepository,
};

use crate::error::CliError;

#[derive(Parser)]
#[command(name = "charcat")]
#[command(about = "Manage a catalog of game characters", long_about = None)]
struct Cli {
    /// SQLite database file (overrides CHARCAT_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Sprite storage directory (overrides CHARCAT_ASSET_DIR)
    #[arg(long, global = true)]
    assets: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Paging and sorting shared by listing commands.
#[derive(Args, Clone)]
struct PageArgs {
    /// Zero-based page index
    #[arg(long, default_value_t = 0)]
    page: u32,

    /// Page size (defaults to 10 for `page`, 12 for `search`)
    #[arg(long)]
    size: Option<u32>,

    /// Attribute to sort by (e.g. id, name, baseAttack)
    #[arg(long, default_value = DEFAULT_SORT_FIELD)]
    sort_by: String,

    /// Sort direction: asc or desc
    #[arg(long, default_value = DEFAULT_SORT_DIRECTION)]
    sort_dir: String,
}

impl PageArgs {
    fn to_request(&self, default_size: u32) -> Result<PageRequest, CliError> {
        Ok(PageRequest::new(
            self.page,
            self.size.unwrap_or(default_size),
            &self.sort_by,
            &self.sort_dir,
        )?)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create a character from a JSON document
    Create {
        /// Character JSON, e.g. '{"name":"Aria","baseAttack":12}'
        json: String,

        /// Force the HERO type
        #[arg(long, conflicts_with = "villain")]
        hero: bool,

        /// Force the VILLAIN type
        #[arg(long)]
        villain: bool,
    },

    /// List every visible character
    List,

    /// Show one page of visible characters
    Page {
        #[command(flatten)]
        paging: PageArgs,
    },

    /// Search characters by name and attributes
    Search {
        /// Case-insensitive name substring
        #[arg(short, long)]
        term: Option<String>,

        /// Attribute filter as key=value (e.g. type=HERO, minBaseAttack=10); repeatable
        #[arg(short, long = "filter")]
        filters: Vec<String>,

        #[command(flatten)]
        paging: PageArgs,
    },

    /// Show one character
    Get { id: CharacterId },

    /// Apply a partial JSON update; explicit nulls clear nullable fields
    Update { id: CharacterId, json: String },

    /// Replace a character's sprite with an image file
    Sprite { id: CharacterId, file: PathBuf },

    /// Delete a character (soft delete unless --hard)
    Delete {
        id: CharacterId,

        /// Remove the row physically, including already soft-deleted ones
        #[arg(long)]
        hard: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = CatalogConfig::from_env()?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(assets) = cli.assets {
        config.asset_dir = assets;
    }

    if let Some(log_dir) = &config.log_dir {
        init_logging(config.log_level, absolute(log_dir)?)?;
    }

    let conn = open_db(&config.db_path)?;
    let repo = SqliteCharacterRepository::try_new(&conn)?;
    let assets = FsAssetStore::open(&config.asset_dir)?;
    let catalog = CharacterCatalog::new(repo, assets);

    match cli.command {
        Commands::Create {
            json,
            hero,
            villain,
        } => {
            let input: CharacterInput = serde_json::from_str(&json)?;
            let created = if hero {
                catalog.create_as(&input, CharacterType::Hero)?
            } else if villain {
                catalog.create_as(&input, CharacterType::Villain)?
            } else {
                catalog.create(&input)?
            };
            print_json(&created)
        }
        Commands::List => print_json(&catalog.get_all()?),
        Commands::Page { paging } => {
            let request = paging.to_request(DEFAULT_PAGE_SIZE)?;
            print_json(&catalog.get_page(&request)?)
        }
        Commands::Search {
            term,
            filters,
            paging,
        } => {
            let filter = parse_filters(&filters)?;
            let request = paging.to_request(DEFAULT_SEARCH_PAGE_SIZE)?;
            print_json(&catalog.search(term.as_deref(), Some(&filter), &request)?)
        }
        Commands::Get { id } => print_json(&catalog.get_by_id(id)?),
        Commands::Update { id, json } => {
            let patch: CharacterPatch = serde_json::from_str(&json)?;
            print_json(&catalog.update(id, &patch)?)
        }
        Commands::Sprite { id, file } => {
            let bytes = fs::read(&file)?;
            let original_name = file.file_name().and_then(|name| name.to_str());
            print_json(&catalog.update_sprite(id, &bytes, original_name)?)
        }
        Commands::Delete { id, hard } => {
            if hard {
                catalog.hard_delete(id)?;
            } else {
                catalog.soft_delete(id)?;
            }
            info!("event=cli_delete module=cli status=ok id={id} hard={hard}");
            print_json(&serde_json::json!({ "id": id, "deleted": true, "hard": hard }))
        }
    }
}

fn parse_filters(raw: &[String]) -> Result<FilterSpec, CliError> {
    let mut pairs = Vec::with_capacity(raw.len());
    for entry in raw {
        let (key, value) = entry
            .split_once('=')
            .ok_or_else(|| CliError::FilterSyntax(entry.clone()))?;
        pairs.push((key, value));
    }
    Ok(FilterSpec::from_pairs(pairs)?)
}

fn absolute(path: &Path) -> Result<PathBuf, CliError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(path))
}

fn print_json(value: &impl Serialize) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
