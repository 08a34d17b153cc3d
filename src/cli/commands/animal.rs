//! animal command - Animal CRUD and kinship queries
//!
//! # Integrity Contract
//!
//! - Parent links are attached via the core integrity operations, never
//!   by writing fields
//! - `rename` rewrites every reference to the old id in one pass
//! - `delete` leaves no dangling reference behind

use anyhow::Result;

use crate::cli::args::AnimalCommand;
use crate::core::{Animal, AnimalEdit};
use crate::ui::output;

use super::{animal_id, change, date, opt_animal_id, opt_date, sex, Context};

/// Handle the `animal` subcommands.
pub fn animal(ctx: &Context, command: AnimalCommand) -> Result<()> {
    match command {
        AnimalCommand::Add {
            colony,
            id,
            sex: sex_arg,
            genotype,
            dob,
            mother,
            father,
            cage,
            weaned,
            notes,
            deceased,
        } => {
            let mut record = Animal::new(animal_id(&id)?, sex(&sex_arg)?, genotype, date(&dob)?);
            record.mother = opt_animal_id(mother.as_deref())?;
            record.father = opt_animal_id(father.as_deref())?;
            record.cage = cage.as_deref().map(super::cage_id).transpose()?;
            record.date_weaned = opt_date(weaned.as_deref())?;
            record.notes = notes;
            record.deceased = deceased;

            let mut state = super::load(ctx, &colony)?;
            state.add_animal(record)?;
            super::save(ctx, &state)?;
            output::print(format!("Added animal '{id}'"), ctx.verbosity);
            Ok(())
        }

        AnimalCommand::Edit {
            colony,
            id,
            sex: sex_arg,
            genotype,
            dob,
            mother,
            clear_mother,
            father,
            clear_father,
            cage,
            clear_cage,
            weaned,
            clear_weaned,
            notes,
            clear_notes,
            deceased,
        } => {
            let edit = AnimalEdit {
                sex: sex_arg.as_deref().map(sex).transpose()?,
                genotype,
                dob: opt_date(dob.as_deref())?,
                date_weaned: change(opt_date(weaned.as_deref())?, clear_weaned),
                cage: change(cage.as_deref().map(super::cage_id).transpose()?, clear_cage),
                notes: change(notes, clear_notes),
                deceased,
                mother: change(opt_animal_id(mother.as_deref())?, clear_mother),
                father: change(opt_animal_id(father.as_deref())?, clear_father),
            };

            let target = animal_id(&id)?;
            let mut state = super::load(ctx, &colony)?;
            state.edit_animal(&target, &edit)?;
            super::save(ctx, &state)?;
            output::print(format!("Updated animal '{id}'"), ctx.verbosity);
            Ok(())
        }

        AnimalCommand::Rename { colony, old, new } => {
            let old_id = animal_id(&old)?;
            let new_id = animal_id(&new)?;
            let mut state = super::load(ctx, &colony)?;
            state.rename_animal(&old_id, &new_id)?;
            super::save(ctx, &state)?;
            output::print(format!("Renamed animal '{old}' to '{new}'"), ctx.verbosity);
            Ok(())
        }

        AnimalCommand::Delete { colony, id } => {
            let target = animal_id(&id)?;
            let mut state = super::load(ctx, &colony)?;
            state.delete_animal(&target)?;
            super::save(ctx, &state)?;
            output::print(format!("Deleted animal '{id}'"), ctx.verbosity);
            Ok(())
        }

        AnimalCommand::Kin { colony, id } => {
            let target = animal_id(&id)?;
            let state = super::load(ctx, &colony)?;

            for (label, kin) in [
                ("Children", state.children_of(&target)?),
                ("Siblings", state.siblings_of(&target)?),
                ("Cousins", state.cousins_of(&target)?),
            ] {
                let ids: Vec<&str> = kin.iter().map(|a| a.id.as_str()).collect();
                println!(
                    "{label}: {}",
                    if ids.is_empty() {
                        "(none)".to_string()
                    } else {
                        ids.join(", ")
                    }
                );
            }
            Ok(())
        }
    }
}
