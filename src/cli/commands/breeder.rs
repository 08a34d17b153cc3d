//! breeder command - Breeder cages and litter recording

use anyhow::Result;

use crate::cli::args::BreederCommand;
use crate::core::{BreederEdit, CageSpec};
use crate::ui::output;

use super::{animal_id, cage_id, change, date, opt_date, sex, Context};

/// Handle the `breeder` subcommands.
pub fn breeder(ctx: &Context, command: BreederCommand) -> Result<()> {
    match command {
        BreederCommand::Add {
            colony,
            cage,
            mother,
            father,
            mated,
            notes,
        } => {
            let target = cage_id(&cage)?;
            let mother_id = animal_id(&mother)?;
            let father_id = animal_id(&father)?;
            let date_mated = opt_date(mated.as_deref())?;

            let mut state = super::load(ctx, &colony)?;
            state.add_breeder_cage(&target, &mother_id, &father_id, date_mated, notes)?;
            super::save(ctx, &state)?;
            output::print(
                format!("Added breeder cage '{cage}' ({mother} x {father})"),
                ctx.verbosity,
            );
            Ok(())
        }

        BreederCommand::Edit {
            colony,
            cage,
            mated,
            clear_mated,
            notes,
            clear_notes,
        } => {
            let edit = BreederEdit {
                date_mated: change(opt_date(mated.as_deref())?, clear_mated),
                notes: change(notes, clear_notes),
            };
            let target = cage_id(&cage)?;
            let mut state = super::load(ctx, &colony)?;
            state.edit_breeder_cage(&target, &edit)?;
            super::save(ctx, &state)?;
            output::print(format!("Updated breeder cage '{cage}'"), ctx.verbosity);
            Ok(())
        }

        BreederCommand::Delete { colony, cage } => {
            let target = cage_id(&cage)?;
            let mut state = super::load(ctx, &colony)?;
            state.delete_breeder_cage(&target)?;
            super::save(ctx, &state)?;
            output::print(format!("Deleted breeder cage '{cage}'"), ctx.verbosity);
            Ok(())
        }

        BreederCommand::Litter {
            colony,
            breeder,
            litter,
            count,
            sex: sex_arg,
            genotype,
            dob,
            weaned,
            notes,
        } => {
            let breeder_cage = cage_id(&breeder)?;
            let litter_cage = cage_id(&litter)?;

            let mut state = super::load(ctx, &colony)?;
            let record = state
                .breeder_cage(&breeder_cage)
                .ok_or_else(|| {
                    crate::core::ColonyError::BreederNotFound(breeder_cage.clone())
                })?
                .clone();

            let spec = CageSpec {
                cage: litter_cage.clone(),
                count,
                sex: sex(&sex_arg)?,
                genotype,
                dob: date(&dob)?,
                date_weaned: opt_date(weaned.as_deref())?,
                notes,
                mother: Some(record.mother.clone()),
                father: Some(record.father.clone()),
            };
            let ids = state.add_cage(&spec)?;
            state.record_litter(&breeder_cage, &litter_cage)?;
            super::save(ctx, &state)?;
            output::print(
                format!(
                    "Recorded litter '{litter}' ({} pups) for breeder cage '{breeder}'",
                    ids.len()
                ),
                ctx.verbosity,
            );
            Ok(())
        }
    }
}
