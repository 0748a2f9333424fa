//! Plan card commands

use std::path::Path;

use anyhow::{Context, Result};

use super::{AdminContext, print_json, read_list};
use crate::commands::PlanCommands;
use crate::editor::PlanSet;
use crate::{PlanDisplayConfig, PlanKey, ProductRef};

pub fn plan_command(ctx: &AdminContext, command: PlanCommands) -> Result<()> {
    match command {
        PlanCommands::List { products, json } => list(ctx, products.as_deref(), json),
        PlanCommands::Set {
            key,
            title,
            description,
            features,
        } => set(ctx, &key, title, description, features),
        PlanCommands::Sync { products } => sync(ctx, &products),
        PlanCommands::Remove { key } => {
            let key = parse_key(&key)?;
            commit(ctx, ctx.store.plans().load()?.remove(&key)?)
        }
        PlanCommands::Show { key } => visibility(ctx, &key, true),
        PlanCommands::Hide { key } => visibility(ctx, &key, false),
        PlanCommands::Reorder { keys } => commit(ctx, ctx.store.plans().load()?.reorder(&keys)?),
        PlanCommands::Move { from, to } => {
            commit(ctx, ctx.store.plans().load()?.move_item(from, to)?)
        }
    }
}

fn parse_key(raw: &str) -> Result<PlanKey> {
    PlanKey::parse(raw).with_context(|| {
        format!(
            "Invalid plan key '{}', expected internal:<id> or woocommerce:<id>",
            raw
        )
    })
}

fn print_configs(set: &PlanSet) {
    for config in set.configs() {
        let visibility = if config.show_on_plans_page { "shown" } else { "hidden" };
        println!(
            "{:>2}  {:<32} {:<7} {}",
            config.display_order,
            config.key.to_string(),
            visibility,
            config.custom_title.as_deref().unwrap_or("-")
        );
    }
}

fn commit(ctx: &AdminContext, set: PlanSet) -> Result<()> {
    ctx.store.plans().commit(&set)?;
    print_configs(&set);
    Ok(())
}

fn list(ctx: &AdminContext, products: Option<&Path>, json: bool) -> Result<()> {
    let set = ctx.store.plans().load()?;

    let Some(products) = products else {
        if json {
            return print_json(set.configs());
        }
        if set.is_empty() {
            println!("No plan configurations");
        }
        print_configs(&set);
        return Ok(());
    };

    let products: Vec<ProductRef> = read_list(products)?;
    let cards = set.plan_cards(&products);
    if json {
        return print_json(&cards);
    }
    for card in &cards {
        println!("{:>2}  {} ({})", card.display_order, card.title, card.key);
        if !card.description.is_empty() {
            println!("    {}", card.description);
        }
        for feature in &card.features {
            println!("    - {}", feature);
        }
    }
    Ok(())
}

fn set(
    ctx: &AdminContext,
    key: &str,
    title: Option<String>,
    description: Option<String>,
    features: Vec<String>,
) -> Result<()> {
    let key = parse_key(key)?;
    let plans = ctx.store.plans().load()?;

    let mut config = plans
        .get(&key)
        .cloned()
        .unwrap_or_else(|| PlanDisplayConfig::new(key));
    if title.is_some() {
        config.custom_title = title;
    }
    if description.is_some() {
        config.custom_description = description;
    }
    if !features.is_empty() {
        config.custom_features = features;
    }
    commit(ctx, plans.upsert(config))
}

fn sync(ctx: &AdminContext, products: &Path) -> Result<()> {
    let products: Vec<ProductRef> = read_list(products)?;
    let plans = ctx.store.plans().load()?;
    let before = plans.len();
    let next = plans.with_products(&products);
    println!("Added {} plan configurations", next.len() - before);
    commit(ctx, next)
}

fn visibility(ctx: &AdminContext, key: &str, visible: bool) -> Result<()> {
    let key = parse_key(key)?;
    commit(ctx, ctx.store.plans().load()?.set_visibility(&key, visible)?)
}
