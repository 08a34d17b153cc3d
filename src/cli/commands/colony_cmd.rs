//! colony command - Colony lifecycle: new, list, show, rename, delete

use anyhow::{bail, Context as _, Result};

use crate::cli::args::ColonyCommand;
use crate::core::{Animal, Colony};
use crate::store::schema::encode;
use crate::ui::output;

use super::Context;

/// Handle the `colony` subcommands.
pub fn colony(ctx: &Context, command: ColonyCommand) -> Result<()> {
    match command {
        ColonyCommand::New { name } => new(ctx, &name),
        ColonyCommand::List => list(ctx),
        ColonyCommand::Show { name, json } => show(ctx, &name, json),
        ColonyCommand::Rename { old, new } => rename(ctx, &old, &new),
        ColonyCommand::Delete { name } => delete(ctx, &name),
    }
}

fn new(ctx: &Context, name: &str) -> Result<()> {
    if ctx.store.exists(name)? {
        bail!("Colony '{name}' already exists");
    }
    let colony = Colony::new(name);
    super::save(ctx, &colony)?;
    output::print(format!("Created colony '{name}'"), ctx.verbosity);
    Ok(())
}

fn list(ctx: &Context) -> Result<()> {
    let names = ctx.store.list().context("Failed to list colonies")?;
    if names.is_empty() {
        output::print("No colonies", ctx.verbosity);
        return Ok(());
    }
    for name in names {
        println!("{name}");
    }
    Ok(())
}

fn show(ctx: &Context, name: &str, json: bool) -> Result<()> {
    let colony = super::load(ctx, name)?;

    if json {
        // The flat record form: parent references as ids, not nested
        // records, which is what rendering layers consume.
        return output::json(&encode(&colony));
    }

    println!("Colony: {} ({} animals)", colony.name, colony.len());

    let founders = colony.founders();
    if !founders.is_empty() {
        let ids: Vec<&str> = founders.iter().map(|a| a.id.as_str()).collect();
        println!("Founders: {}", ids.join(", "));
    }

    if !colony.is_empty() {
        println!("\nAnimals:");
        for animal in colony.animals() {
            println!("  {}", describe(animal));
        }
    }

    let cages = colony.unique_cage_ids();
    if !cages.is_empty() {
        println!("\nCages:");
        for cage in &cages {
            let members: Vec<&str> = colony
                .cage_members(cage)
                .iter()
                .map(|a| a.id.as_str())
                .collect();
            println!("  {}: {}", cage, members.join(", "));
        }
    }

    if !colony.breeder_cages().is_empty() {
        println!("\nBreeder cages:");
        for breeder in colony.breeder_cages() {
            let litters: Vec<&str> = breeder.litters.iter().map(|c| c.as_str()).collect();
            println!(
                "  {}: {} x {}{}",
                breeder.cage,
                breeder.mother,
                breeder.father,
                if litters.is_empty() {
                    String::new()
                } else {
                    format!(" (litters: {})", litters.join(", "))
                }
            );
        }
    }
    Ok(())
}

fn describe(animal: &Animal) -> String {
    let mut line = format!(
        "{} ({}) {} dob={}",
        animal.id, animal.sex, animal.genotype, animal.dob
    );
    if let Some(mother) = &animal.mother {
        line.push_str(&format!(" mother={mother}"));
    }
    if let Some(father) = &animal.father {
        line.push_str(&format!(" father={father}"));
    }
    if let Some(cage) = &animal.cage {
        line.push_str(&format!(" cage={cage}"));
    }
    if animal.deceased {
        line.push_str(" [deceased]");
    }
    line
}

fn rename(ctx: &Context, old: &str, new: &str) -> Result<()> {
    ctx.store
        .rename(old, new)
        .with_context(|| format!("Failed to rename colony '{old}'"))?;
    output::print(format!("Renamed colony '{old}' to '{new}'"), ctx.verbosity);
    Ok(())
}

fn delete(ctx: &Context, name: &str) -> Result<()> {
    ctx.store
        .delete(name)
        .with_context(|| format!("Failed to delete colony '{name}'"))?;
    output::print(format!("Deleted colony '{name}'"), ctx.verbosity);
    Ok(())
}
