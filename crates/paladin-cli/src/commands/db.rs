//! Notes database commands
//!
//! Usage: paladin db [--database PATH] <init|add|list|rename|done|remove|clear>

use crate::commands::timed;
use crate::note::{Note, NOTES};
use clap::{Args, Subcommand};
use paladin_core::errors::{ExError, ExErrorKind};
use paladin_core::{AppConfig, DbConfig, PaladinError};
use paladin_orm::{setup_db, Filters, Record, SqliteBackend};

/// Notes file used when neither `--database` nor the configuration names one
pub const DEFAULT_DATABASE: &str = "paladin.db";

#[derive(Debug, Args)]
pub struct DbArgs {
    /// Database file (overrides db.database; `paladin.db` when neither is set)
    #[arg(long)]
    pub database: Option<String>,

    #[command(subcommand)]
    pub command: DbCommand,
}

#[derive(Debug, Subcommand)]
pub enum DbCommand {
    /// Create the notes table
    Init,
    /// Add a note
    Add { title: String },
    /// List notes in insertion order
    List(ListArgs),
    /// Change a note's title
    Rename { id: i64, title: String },
    /// Mark a note as done
    Done { id: i64 },
    /// Remove one note by id, or every note with a given title
    Remove(RemoveArgs),
    /// Remove every note
    Clear,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only notes with this title
    #[arg(long)]
    pub title: Option<String>,

    /// Only finished notes
    #[arg(long, conflicts_with = "pending")]
    pub done: bool,

    /// Only unfinished notes
    #[arg(long)]
    pub pending: bool,

    #[arg(long)]
    pub limit: Option<u64>,

    #[arg(long)]
    pub offset: Option<u64>,
}

#[derive(Debug, Args)]
pub struct RemoveArgs {
    #[arg(required_unless_present = "title", conflicts_with = "title")]
    pub id: Option<i64>,

    #[arg(long)]
    pub title: Option<String>,
}

/// Execute db command
pub fn execute(args: DbArgs, conf: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let db_conf = DbConfig {
        database: database_path(args.database, &conf.db)?,
        auto_create_tables: conf.db.auto_create_tables || matches!(args.command, DbCommand::Init),
        ..conf.db.clone()
    };
    let backend = setup_db(&db_conf, &[&NOTES])?;

    match args.command {
        DbCommand::Init => println!("Initialized {}", db_conf.database),
        DbCommand::Add { title } => {
            let mut note = Note::new(title);
            timed("db_add", || note.create(&backend))?;
            println!("Added note {}", note.id().unwrap_or_default());
        }
        DbCommand::List(list) => {
            let mut filters = Filters::new();
            if let Some(title) = list.title {
                filters = filters.eq("title", title);
            }
            if list.done || list.pending {
                filters = filters.eq("done", list.done);
            }
            let notes = timed("db_list", || {
                Note::query(&backend, &filters, list.limit, list.offset)
            })?;
            for note in notes {
                println!(
                    "{}\t[{}] {}",
                    note.id().unwrap_or_default(),
                    if note.done() { "x" } else { " " },
                    note.title()
                );
            }
        }
        DbCommand::Rename { id, title } => {
            let mut note = find(&backend, id)?;
            note.set_title(title);
            timed("db_rename", || note.save(&backend))?;
            println!("Renamed note {}", id);
        }
        DbCommand::Done { id } => {
            let mut note = find(&backend, id)?;
            note.set_done(true);
            timed("db_done", || note.save(&backend))?;
            println!("Finished note {}", id);
        }
        DbCommand::Remove(remove) => {
            if let Some(title) = remove.title {
                let removed = timed("db_remove", || {
                    Note::delete_where(&backend, &Filters::new().eq("title", title))
                })?;
                println!("Removed {} note(s)", removed);
            } else if let Some(id) = remove.id {
                let note = find(&backend, id)?;
                timed("db_remove", || note.delete(&backend))?;
                println!("Removed note {}", id);
            }
        }
        DbCommand::Clear => {
            let removed = timed("db_clear", || Note::delete_all(&backend))?;
            println!("Removed {} note(s)", removed);
        }
    }

    Ok(())
}

/// Resolve the notes database; notes must outlive the process, so an
/// in-memory database is refused
fn database_path(explicit: Option<String>, conf: &DbConfig) -> Result<String, ExError> {
    let database = match explicit {
        Some(database) => database,
        None if conf.is_in_memory() => DEFAULT_DATABASE.to_string(),
        None => conf.database.clone(),
    };
    if database == ":memory:" {
        return Err(PaladinError::InvalidInput {
            reason: "notes need a database file, pass --database PATH".to_string(),
        }
        .into());
    }
    Ok(database)
}

fn find(backend: &SqliteBackend, id: i64) -> Result<Note, ExError> {
    Note::find_one(backend, &Filters::new().eq("id", id))?.ok_or_else(|| {
        ExError::new(ExErrorKind::NotFound)
            .with_op("find")
            .with_entity(NOTES.name)
            .with_entity_id(id)
            .with_message("no such note")
    })
}
