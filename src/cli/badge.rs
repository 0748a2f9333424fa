//! Badge commands

use anyhow::{Result, bail};

use super::{AdminContext, print_json};
use crate::commands::{BadgeCommands, BadgeFields};
use crate::editor::BadgeForm;
use crate::{ActionTrigger, ActionTriggerType, Badge, BadgeTrigger, TriggerType};

pub fn badge_command(ctx: &AdminContext, command: BadgeCommands) -> Result<()> {
    match command {
        BadgeCommands::List { json } => list(ctx, json),
        BadgeCommands::Show { id, json } => show(ctx, &id, json),
        BadgeCommands::Add { name, fields } => add(ctx, name, &fields),
        BadgeCommands::Edit { id, name, fields } => edit(ctx, &id, name, &fields),
        BadgeCommands::Remove { id } => remove(ctx, &id),
        BadgeCommands::Triggers { json } => triggers(json),
        BadgeCommands::Find {
            condition,
            challenge,
        } => find(ctx, condition.as_deref(), challenge.as_deref()),
    }
}

/// Resolve a catalog name, suggesting the closest entry on a typo
fn parse_action(name: &str) -> Result<ActionTriggerType> {
    match ActionTriggerType::parse(name) {
        Ok(action) => Ok(action),
        Err(err) => match ActionTriggerType::suggest(name) {
            Some(close) => bail!("{}. Did you mean '{}'?", err, close.as_str()),
            None => bail!("{}. Run `dadderup badge triggers` for the catalog.", err),
        },
    }
}

fn apply_fields(form: BadgeForm, fields: &BadgeFields) -> Result<BadgeForm> {
    let mut form = form;
    if let Some(description) = &fields.description {
        form.description = description.clone();
    }
    if let Some(icon) = &fields.icon {
        form.icon = icon.clone();
    }
    if let Some(points) = fields.points {
        form.points = points;
    }

    if let Some(action) = &fields.action {
        form = form.select_action(parse_action(action)?);
    } else if !fields.challenges.is_empty() {
        form = form
            .set_trigger_type(TriggerType::Challenge)
            .with_challenges(fields.challenges.iter().cloned());
    }
    Ok(form)
}

fn describe_trigger(badge: &Badge) -> String {
    match &badge.trigger {
        BadgeTrigger::Challenge { challenge_ids } => format!(
            "challenges: {}",
            challenge_ids.iter().cloned().collect::<Vec<_>>().join(", ")
        ),
        BadgeTrigger::Action { action_trigger } => format!("action: {}", action_trigger.condition),
    }
}

fn list(ctx: &AdminContext, json: bool) -> Result<()> {
    let badges = ctx.store.badges().load()?;
    if json {
        return print_json(badges.badges());
    }
    if badges.is_empty() {
        println!("No badges");
    }
    for badge in badges.badges() {
        println!(
            "{:<24} {:<4} {:>4} pts  {:<28} {}",
            badge.id,
            badge.icon,
            badge.points,
            badge.name,
            describe_trigger(badge)
        );
    }
    if !badges.unparsed().is_empty() {
        println!(
            "({} stored definitions could not be read and are kept unchanged)",
            badges.unparsed().len()
        );
    }
    Ok(())
}

fn show(ctx: &AdminContext, id: &str, json: bool) -> Result<()> {
    let badges = ctx.store.badges().load()?;
    let Some(badge) = badges.get(id) else {
        bail!("Badge not found: {}", id);
    };
    if json {
        return print_json(badge);
    }

    println!("{} {} ({})", badge.icon, badge.name, badge.id);
    if !badge.description.is_empty() {
        println!("  {}", badge.description);
    }
    println!("  points:  {}", badge.points);
    match &badge.trigger {
        BadgeTrigger::Challenge { challenge_ids } => {
            let challenges = ctx.store.challenges().load()?;
            for challenge_id in challenge_ids {
                match challenges.get(challenge_id) {
                    Some(c) => println!("  requires day {}: {}", c.day_order, c.title),
                    None => println!("  requires {} (missing)", challenge_id),
                }
            }
        }
        BadgeTrigger::Action { action_trigger } => {
            println!("  trigger: {}", action_trigger.condition);
            println!("           {}", action_trigger.description);
        }
    }
    Ok(())
}

fn add(ctx: &AdminContext, name: String, fields: &BadgeFields) -> Result<()> {
    let badges = ctx.store.badges().load()?;
    let form = apply_fields(BadgeForm::new(name), fields)?;
    let (next, created) = badges.create(form)?;
    ctx.store.badges().save(&next)?;
    println!("Created badge {}", created.id);
    Ok(())
}

fn edit(ctx: &AdminContext, id: &str, name: Option<String>, fields: &BadgeFields) -> Result<()> {
    let badges = ctx.store.badges().load()?;
    let mut form = badges.to_form(id)?;
    if let Some(name) = name {
        form.name = name;
    }
    let form = apply_fields(form, fields)?;
    let (next, updated) = badges.update(id, form)?;
    ctx.store.badges().save(&next)?;
    println!("Updated badge {} ({})", updated.id, describe_trigger(&updated));
    Ok(())
}

fn remove(ctx: &AdminContext, id: &str) -> Result<()> {
    let badges = ctx.store.badges().load()?;
    let next = badges.delete(id)?;

    let challenges = ctx.store.challenges().load()?;
    let referencing = challenges
        .challenges()
        .iter()
        .filter(|c| c.associated_badges.contains(id))
        .count();
    if referencing > 0 {
        println!("Note: {} challenges still list this badge", referencing);
    }

    ctx.store.badges().save(&next)?;
    println!("Removed badge {}", id);
    Ok(())
}

fn triggers(json: bool) -> Result<()> {
    let catalog: Vec<ActionTrigger> = ActionTriggerType::all()
        .iter()
        .map(|t| ActionTrigger::from_catalog(*t))
        .collect();
    if json {
        return print_json(&catalog);
    }
    for trigger in &catalog {
        println!(
            "{:<24} {:<32} {}",
            trigger.trigger_type.as_str(),
            trigger.condition,
            trigger.description
        );
    }
    Ok(())
}

fn find(ctx: &AdminContext, condition: Option<&str>, challenge: Option<&str>) -> Result<()> {
    let badges = ctx.store.badges().load()?;
    let mut found: Vec<&Badge> = Vec::new();
    if let Some(condition) = condition {
        found.extend(badges.by_condition(condition));
    }
    if let Some(challenge) = challenge {
        found.extend(badges.referencing_challenge(challenge));
    }

    if found.is_empty() {
        println!("No matching badges");
    }
    for badge in found {
        println!("{:<24} {}", badge.id, badge.name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_action_suggests() {
        assert_eq!(
            parse_action("mentor_badge").unwrap(),
            ActionTriggerType::MentorBadge
        );
        let err = parse_action("mentor_bage").unwrap_err().to_string();
        assert!(err.contains("Did you mean 'mentor_badge'"), "{err}");
    }

    #[test]
    fn test_apply_fields_switches_trigger() {
        let form = BadgeForm::new("x").with_challenges(["c1"]);
        let fields = BadgeFields {
            action: Some("streak_milestone".to_string()),
            ..BadgeFields::default()
        };
        let form = apply_fields(form, &fields).unwrap();
        assert!(form.challenge_ids.is_empty());
        assert_eq!(form.trigger_type, TriggerType::Action);
    }
}
