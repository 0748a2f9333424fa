//! Challenge commands

use anyhow::{Context, Result, bail};
use tracing::info;

use super::{AdminContext, print_json, read_list};
use crate::commands::{ChallengeCommands, ChallengeFields};
use crate::dashboard::ChallengeView;
use crate::editor::{ChallengeForm, ChallengeSet};
use crate::{Challenge, ShopType, SubmissionChannel, SubmissionTypes};

pub fn challenge_command(ctx: &AdminContext, command: ChallengeCommands) -> Result<()> {
    match command {
        ChallengeCommands::List { json, all } => list(ctx, json, all),
        ChallengeCommands::Show { id, json } => show(ctx, &id, json),
        ChallengeCommands::Add { title, fields } => add(ctx, title, &fields),
        ChallengeCommands::Edit { id, title, fields } => edit(ctx, &id, title, &fields),
        ChallengeCommands::Remove { id } => remove(ctx, &id),
        ChallengeCommands::Reorder { ids } => reorder(ctx, &ids),
        ChallengeCommands::Move { from, to } => move_day(ctx, from, to),
        ChallengeCommands::Import { file, dry_run } => import(ctx, &file, dry_run),
    }
}

/// Parse `channel=value` pairs into the form's points
fn apply_points(form: &mut ChallengeForm, values: &[String]) -> Result<()> {
    for raw in values {
        let Some((channel, value)) = raw.split_once('=') else {
            bail!("Invalid points '{}', expected CHANNEL=N", raw);
        };
        let channel = SubmissionChannel::from_str(channel)
            .with_context(|| format!("Unknown submission channel: {}", channel))?;
        let value: i64 = value
            .trim()
            .parse()
            .with_context(|| format!("Invalid point value in '{}'", raw))?;
        form.points.set(channel, value);
    }
    Ok(())
}

fn parse_types(names: &[String]) -> Result<SubmissionTypes> {
    let mut types = SubmissionTypes {
        text: false,
        image: false,
        audio: false,
        video: false,
    };
    for name in names.iter().filter(|n| !n.trim().is_empty()) {
        match SubmissionChannel::from_str(name) {
            Some(SubmissionChannel::Text) => types.text = true,
            Some(SubmissionChannel::Image) => types.image = true,
            Some(SubmissionChannel::Audio) => types.audio = true,
            Some(SubmissionChannel::Video) => types.video = true,
            Some(SubmissionChannel::Shop) => bail!("The shop channel is gated by --shop-button"),
            None => bail!("Unknown submission channel: {}", name),
        }
    }
    Ok(types)
}

/// Overlay command-line fields onto a form
fn apply_fields(form: &mut ChallengeForm, fields: &ChallengeFields) -> Result<()> {
    if let Some(day) = fields.day {
        form.day_order = Some(day);
    }
    if let Some(description) = &fields.description {
        form.description = description.clone();
    }
    if let Some(tip) = &fields.tip {
        form.tip = tip.clone();
    }
    if let Some(video) = &fields.video {
        form.video_url = Some(video.clone());
    }
    apply_points(form, &fields.points)?;
    if let Some(types) = &fields.types {
        form.enabled_submission_types = Some(parse_types(types)?);
    }

    if fields.clear_associations {
        form.associated_badges.clear();
        form.associated_reactions.clear();
        form.associated_parent_reactions.clear();
    }
    form.associated_badges.extend(fields.badges.iter().cloned());
    form.associated_reactions.extend(fields.reactions.iter().cloned());
    form.associated_parent_reactions
        .extend(fields.parent_reactions.iter().cloned());

    if let Some(shop_type) = &fields.shop_type {
        form.shop_type = ShopType::from_str(shop_type)
            .with_context(|| format!("Unknown shop type: {}", shop_type))?;
    }
    if let Some(visible) = fields.shop_button {
        form.show_shop_button = visible;
    }
    if let Some(id) = &fields.shop_product_id {
        form.shop_product_id = Some(id.clone());
    }
    if let Some(url) = &fields.shop_url {
        form.shop_url = Some(url.clone());
    }
    if let Some(id) = &fields.subscription_product_id {
        form.subscription_product_id = Some(id.clone());
    }
    Ok(())
}

fn print_row(challenge: &Challenge) {
    let status = if !challenge.is_active {
        "removed"
    } else if challenge.is_public() {
        "public"
    } else {
        "gated"
    };
    println!(
        "{:>3}  {:<36}  {:<8} {:>3} pts  {}",
        challenge.day_order,
        challenge.id,
        status,
        challenge.max_points(),
        challenge.title
    );
}

fn list(ctx: &AdminContext, json: bool, all: bool) -> Result<()> {
    let challenges: Vec<Challenge> = if all {
        ctx.store.challenges().list_all()?
    } else {
        ctx.store.challenges().load()?.challenges().to_vec()
    };

    if json {
        return print_json(&challenges);
    }
    if challenges.is_empty() {
        println!("No challenges");
    }
    for challenge in &challenges {
        print_row(challenge);
    }
    Ok(())
}

fn show(ctx: &AdminContext, id: &str, json: bool) -> Result<()> {
    let snapshot = ctx.store.load()?;
    let Some(challenge) = snapshot.challenges.get(id) else {
        bail!("Challenge not found: {}", id);
    };
    let view = ChallengeView::resolve(challenge, &snapshot);

    if json {
        return print_json(&view);
    }

    println!("Day {}: {}", challenge.day_order, challenge.title);
    println!("  id:          {}", challenge.id);
    if !challenge.description.is_empty() {
        println!("  description: {}", challenge.description);
    }
    if !challenge.tip.is_empty() {
        println!("  tip:         {}", challenge.tip);
    }
    if let Some(url) = &challenge.video_url {
        println!("  video:       {}", url);
    }
    for channel in SubmissionChannel::all() {
        let points = challenge.points.get(*channel);
        match challenge.points_for(*channel) {
            Some(_) => println!("  {:<6} {:>3} pts", channel.as_str(), points),
            None => println!("  {:<6} {:>3} pts (off)", channel.as_str(), points),
        }
    }
    match &challenge.subscription_product_id {
        Some(product) if !challenge.is_public() => println!("  unlocked by: {}", product),
        _ => println!("  access:      public"),
    }
    for badge in &view.badges {
        println!("  badge:       {} {} ({})", badge.icon, badge.name, badge.id);
    }
    for reaction in &view.reactions {
        println!("  reaction:    {} {}", reaction.emoji, reaction.label);
    }
    for reaction in &view.parent_reactions {
        println!("  parent:      {} {}", reaction.emoji, reaction.label);
    }
    for reference in &view.dangling {
        println!("  missing:     {}", reference);
    }
    Ok(())
}

fn add(ctx: &AdminContext, title: String, fields: &ChallengeFields) -> Result<()> {
    let rules = ctx.config.settings.challenges.rules();
    let set = ctx.store.challenges().load()?;

    let mut form = ChallengeForm::new(title);
    apply_fields(&mut form, fields)?;
    let (next, created) = set.create(&form, &rules)?;
    ctx.store.challenges().commit(&next)?;

    info!("Created challenge {}", created.id);
    println!("Created {} on day {}", created.id, created.day_order);
    Ok(())
}

fn edit(ctx: &AdminContext, id: &str, title: Option<String>, fields: &ChallengeFields) -> Result<()> {
    let rules = ctx.config.settings.challenges.rules();
    let set = ctx.store.challenges().load()?;

    let mut form = set.to_form(id)?;
    if let Some(title) = title {
        form.title = title;
    }
    apply_fields(&mut form, fields)?;
    let (next, updated) = set.update(id, &form, &rules)?;
    ctx.store.challenges().commit(&next)?;

    println!("Updated {} (day {})", updated.id, updated.day_order);
    Ok(())
}

fn remove(ctx: &AdminContext, id: &str) -> Result<()> {
    let set = ctx.store.challenges().load()?;
    let next = set.delete(id)?;

    let badges = ctx.store.badges().load()?;
    for badge in badges.referencing_challenge(id) {
        println!("Note: badge {} still lists this challenge", badge.id);
    }

    ctx.store.challenges().commit(&next)?;
    println!("Removed {} ({} challenges left)", id, next.len());
    Ok(())
}

fn print_order(set: &ChallengeSet) {
    for challenge in set.challenges() {
        println!("{:>3}  {}", challenge.day_order, challenge.title);
    }
}

fn reorder(ctx: &AdminContext, ids: &[String]) -> Result<()> {
    let set = ctx.store.challenges().load()?;
    let next = set.reorder(ids)?;
    ctx.store.challenges().save_order(&next)?;
    print_order(&next);
    Ok(())
}

fn move_day(ctx: &AdminContext, from: u32, to: u32) -> Result<()> {
    if from == 0 || to == 0 {
        bail!("Days start at 1");
    }
    let set = ctx.store.challenges().load()?;
    let next = set.move_item(from as usize - 1, to as usize - 1)?;
    ctx.store.challenges().save_order(&next)?;
    print_order(&next);
    Ok(())
}

fn import(ctx: &AdminContext, file: &std::path::Path, dry_run: bool) -> Result<()> {
    let rules = ctx.config.settings.challenges.rules();
    let forms: Vec<ChallengeForm> = read_list(file)?;
    let set = ctx.store.challenges().load()?;

    let (next, created) = set.import(&forms, &rules)?;
    if dry_run {
        println!("{} challenges valid, nothing written", created.len());
        return Ok(());
    }

    ctx.store.challenges().commit(&next)?;
    info!("Imported {} challenges from {}", created.len(), file.display());
    for challenge in &created {
        println!("Created {} on day {}", challenge.id, challenge.day_order);
    }
    Ok(())
}
