//! zlogon CLI
//!
//! Maintains the tree of SAP connection shortcuts and starts SAP GUI for a
//! chosen link.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use zlogon_engine::Engine;

/// SAP connection shortcut manager.
#[derive(Parser)]
#[command(name = "zlogon")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the database file
    #[arg(global = true, long, env = "ZLOGON_DB")]
    db: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct LinkArgs {
    /// SAP system name as listed in SAP Logon
    #[arg(long)]
    system: String,

    #[arg(long)]
    client: String,

    #[arg(long)]
    user: String,

    #[arg(long)]
    password: String,

    #[arg(long, default_value = "EN")]
    language: String,

    /// Display name, defaults to SYSTEM-CLIENT
    #[arg(long, default_value = "")]
    name: String,

    #[arg(long, default_value = "")]
    description: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the connection tree
    Tree {
        /// Print JSON instead of an indented listing
        #[arg(long)]
        json: bool,
    },

    /// Add a folder
    AddFolder {
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Parent folder UUID; omit for a top-level folder
        #[arg(long)]
        parent: Option<String>,
    },

    /// Add a connection link
    AddLink {
        /// Parent folder UUID
        #[arg(long)]
        parent: Option<String>,

        #[command(flatten)]
        link: LinkArgs,
    },

    /// Rename or re-describe a folder
    EditFolder {
        uuid: String,

        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Edit a link's credentials, optionally moving it to another folder
    EditLink {
        uuid: String,

        /// Destination folder UUID; omit for top level
        #[arg(long)]
        parent: Option<String>,

        #[command(flatten)]
        link: LinkArgs,
    },

    /// Mark a folder expanded
    Expand { uuid: String },

    /// Mark a folder collapsed
    Collapse { uuid: String },

    /// Delete a link, or a folder with everything below it
    Delete { uuid: String },

    /// Read or change settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Start SAP GUI for a link
    Logon {
        uuid: String,

        /// Print the command instead of running it
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print a setting
    Get {
        #[arg(default_value = zlogon_engine::settings::INSTALL_DIR_KEY)]
        key: String,
    },

    /// Set the SAP GUI installation directory (the one holding sapshcut.exe)
    SetPath { path: String },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let db = match cli.db {
        Some(path) => path,
        None => zlogon_engine::paths::default_database_path()?,
    };
    tracing::debug!(db = %db.display(), "opening database");
    let engine = Engine::open(&db)?;

    match cli.command {
        Commands::Tree { json } => commands::tree::run(&engine, json)?,
        Commands::AddFolder {
            name,
            description,
            parent,
        } => commands::nodes::add_folder(&engine, name, description, parent.as_deref())?,
        Commands::AddLink { parent, link } => {
            commands::nodes::add_link(&engine, link.into(), parent.as_deref())?
        }
        Commands::EditFolder {
            uuid,
            name,
            description,
        } => commands::nodes::edit_folder(&engine, &uuid, name, description)?,
        Commands::EditLink { uuid, parent, link } => {
            commands::nodes::edit_link(&engine, &uuid, link.into(), parent.as_deref())?
        }
        Commands::Expand { uuid } => commands::nodes::set_expanded(&engine, &uuid, true)?,
        Commands::Collapse { uuid } => commands::nodes::set_expanded(&engine, &uuid, false)?,
        Commands::Delete { uuid } => commands::nodes::delete(&engine, &uuid)?,
        Commands::Config { action } => match action {
            ConfigAction::Get { key } => commands::config::get(&engine, &key)?,
            ConfigAction::SetPath { path } => commands::config::set_path(&engine, &path)?,
        },
        Commands::Logon { uuid, dry_run } => commands::logon::run(&engine, &uuid, dry_run)?,
    }

    Ok(())
}

impl From<LinkArgs> for zlogon_engine::LinkDraft {
    fn from(args: LinkArgs) -> Self {
        Self {
            name: args.name,
            description: args.description,
            system: args.system,
            client: args.client,
            user: args.user,
            password: args.password,
            language: args.language,
        }
    }
}
