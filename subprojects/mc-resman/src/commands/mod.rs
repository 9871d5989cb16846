//! Command handlers, one module per object type.

use std::io::Write;

use mc_cmd::{Interrupts, ObjectTypeName, Session, object::Origin};

use crate::{CMD_FLAGS, Resman, error::CliError, registry::ObjectCommand};

pub mod dpbp;
pub mod dpmcp;
pub mod dprc;
pub mod dpseci;

/// Prints the usage of an object type.
fn print_help(
    ctx: &mut Resman<'_>,
    obj_type: ObjectTypeName,
    commands: &[ObjectCommand],
) -> Result<(), CliError> {
    ctx.expect_no_object_name()?;
    let out = ctx.out();
    writeln!(out, "usage: resman {obj_type} <command> [{obj_type}.<id>] [options]")?;
    writeln!(out)?;
    writeln!(out, "commands:")?;
    for command in commands {
        writeln!(out, "  {:<8} {}", command.name, command.help)?;
        for opt in command.options {
            let value = if opt.has_arg { "=<value>" } else { "" };
            writeln!(out, "           --{}{}", opt.name, value)?;
        }
    }
    Ok(())
}

/// Prints enable state, mask and pending causes of every interrupt line.
fn print_irqs<O: Interrupts, S: Origin>(
    ctx: &mut Resman<'_>,
    session: &Session<O, S>,
) -> Result<(), CliError> {
    for index in 0..O::IRQ_COUNT {
        let enable = session.get_irq_enable(ctx.portal(), CMD_FLAGS, index)?;
        let mask = session.get_irq_mask(ctx.portal(), CMD_FLAGS, index)?;
        let status = session.get_irq_status(ctx.portal(), CMD_FLAGS, index, 0)?;
        writeln!(
            ctx.out(),
            "  irq {index}: {}, mask {mask:#010x}, status {status:#010x}",
            state(enable != 0)
        )?;
    }
    Ok(())
}

fn state(enabled: bool) -> &'static str {
    if enabled { "enabled" } else { "disabled" }
}
