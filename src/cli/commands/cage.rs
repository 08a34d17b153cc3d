//! cage command - Bulk operations over housed groups

use anyhow::Result;

use crate::cli::args::CageCommand;
use crate::core::{CageEdit, CageSpec};
use crate::ui::output;

use super::{cage_id, change, date, opt_animal_id, opt_date, sex, Context};

/// Handle the `cage` subcommands.
pub fn cage(ctx: &Context, command: CageCommand) -> Result<()> {
    match command {
        CageCommand::Add {
            colony,
            cage,
            count,
            sex: sex_arg,
            genotype,
            dob,
            mother,
            father,
            weaned,
            notes,
        } => {
            let spec = CageSpec {
                cage: cage_id(&cage)?,
                count,
                sex: sex(&sex_arg)?,
                genotype,
                dob: date(&dob)?,
                date_weaned: opt_date(weaned.as_deref())?,
                notes,
                mother: opt_animal_id(mother.as_deref())?,
                father: opt_animal_id(father.as_deref())?,
            };

            let mut state = super::load(ctx, &colony)?;
            let ids = state.add_cage(&spec)?;
            super::save(ctx, &state)?;
            output::print(
                format!(
                    "Added cage '{cage}' with {} animals ({}..{})",
                    ids.len(),
                    ids.first().map(|i| i.as_str()).unwrap_or(""),
                    ids.last().map(|i| i.as_str()).unwrap_or(""),
                ),
                ctx.verbosity,
            );
            Ok(())
        }

        CageCommand::Edit {
            colony,
            cage,
            sex: sex_arg,
            genotype,
            dob,
            weaned,
            clear_weaned,
            notes,
            clear_notes,
            deceased,
            mother,
            clear_mother,
            father,
            clear_father,
            rename_to,
        } => {
            let edit = CageEdit {
                sex: sex_arg.as_deref().map(sex).transpose()?,
                genotype,
                dob: opt_date(dob.as_deref())?,
                date_weaned: change(opt_date(weaned.as_deref())?, clear_weaned),
                notes: change(notes, clear_notes),
                deceased,
                mother: change(opt_animal_id(mother.as_deref())?, clear_mother),
                father: change(opt_animal_id(father.as_deref())?, clear_father),
            };
            let target = cage_id(&cage)?;
            let new_cage = rename_to.as_deref().map(cage_id).transpose()?;

            let mut state = super::load(ctx, &colony)?;
            state.edit_cage(&target, &edit, new_cage.as_ref())?;
            super::save(ctx, &state)?;
            match &new_cage {
                Some(new_cage) => output::print(
                    format!("Updated cage '{cage}' and relabeled it '{new_cage}'"),
                    ctx.verbosity,
                ),
                None => output::print(format!("Updated cage '{cage}'"), ctx.verbosity),
            }
            Ok(())
        }

        CageCommand::Delete { colony, cage } => {
            let target = cage_id(&cage)?;
            let mut state = super::load(ctx, &colony)?;
            let removed = state.delete_cage(&target)?;
            super::save(ctx, &state)?;
            output::print(
                format!("Deleted cage '{cage}' ({removed} animals)"),
                ctx.verbosity,
            );
            Ok(())
        }
    }
}
