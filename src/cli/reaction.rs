//! Reaction catalog commands

use std::path::Path;

use anyhow::Result;

use super::{AdminContext, print_json, read_list};
use crate::commands::ReactionCommands;
use crate::{Reaction, ReactionKind};

fn kind(parent: bool) -> ReactionKind {
    if parent {
        ReactionKind::ParentReaction
    } else {
        ReactionKind::Reaction
    }
}

pub fn reaction_command(ctx: &AdminContext, command: ReactionCommands) -> Result<()> {
    match command {
        ReactionCommands::List { parent, json } => list(ctx, kind(parent), json),
        ReactionCommands::Import { file, parent } => import(ctx, &file, kind(parent)),
    }
}

fn list(ctx: &AdminContext, kind: ReactionKind, json: bool) -> Result<()> {
    let catalog = ctx.store.reactions().catalog(kind)?;
    if json {
        return print_json(catalog.entries());
    }
    if catalog.is_empty() {
        println!("No active entries in {}", kind.table());
    }
    for reaction in catalog.entries() {
        println!("{:>4}  {}  {}", reaction.reaction_id, reaction.emoji, reaction.label);
    }
    Ok(())
}

fn import(ctx: &AdminContext, file: &Path, kind: ReactionKind) -> Result<()> {
    let reactions: Vec<Reaction> = read_list(file)?;
    ctx.store.reactions().upsert_many(kind, &reactions)?;
    println!("Loaded {} entries into {}", reactions.len(), kind.table());
    Ok(())
}
