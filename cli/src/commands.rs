//! Subcommands and their execution.
//!
//! Input validation lives here, in front of the client: indices must parse
//! as non-negative integers and values must be non-empty. After any
//! successful change the whole collection is listed again.

use std::io::Write;

use clap::Subcommand;
use tracing::debug;
use values_core::{Entity, EntityClient, Index, Transport};

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List every entity with its current index
    List,

    /// Show the entity at INDEX
    Get { index: Index },

    /// Append VALUE to the collection
    Create {
        #[arg(value_parser = non_empty)]
        value: String,
    },

    /// Replace the entity at INDEX with VALUE
    Replace {
        index: Index,
        #[arg(value_parser = non_empty)]
        value: String,
    },

    /// Delete the entity at INDEX; later entities move up by one
    Delete { index: Index },
}

pub fn execute<T: Transport>(
    client: &EntityClient<T>,
    command: &Command,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    debug!(?command, base_url = client.base_url(), "executing");
    match command {
        Command::List => print_entities(out, &client.list_all()?)?,
        Command::Get { index } => {
            let entity = client.get_by_index(*index)?;
            writeln!(out, "{index}: {entity}")?;
        }
        Command::Create { value } => {
            client.create(value)?;
            writeln!(out, "Success in Post")?;
            refresh(client, out)?;
        }
        Command::Replace { index, value } => {
            client.replace(*index, value)?;
            writeln!(out, "Success in Put")?;
            refresh(client, out)?;
        }
        Command::Delete { index } => {
            client.delete(*index)?;
            writeln!(out, "Success in Delete")?;
            refresh(client, out)?;
        }
    }
    Ok(())
}

fn refresh<T: Transport>(client: &EntityClient<T>, out: &mut impl Write) -> anyhow::Result<()> {
    print_entities(out, &client.list_all()?)?;
    Ok(())
}

fn print_entities(out: &mut impl Write, entities: &[Entity]) -> std::io::Result<()> {
    if entities.is_empty() {
        return writeln!(out, "(no entities)");
    }
    for (index, entity) in entities.iter().enumerate() {
        writeln!(out, "{index}: {entity}")?;
    }
    Ok(())
}

fn non_empty(value: &str) -> Result<String, String> {
    if value.is_empty() {
        Err("please enter a value for the entity".to_string())
    } else {
        Ok(value.to_string())
    }
}
