use std::io::Write;

use mc_cmd::object::check_version;
use mc_object_dprc::{Dprc, DprcAttr, DprcSession, TYPE_NAME};

use super::print_help;
use crate::{CMD_FLAGS, Resman, context::released, error::CliError, registry::ObjectCommand};

pub const COMMANDS: &[ObjectCommand] = &[
    ObjectCommand::new("help", "show this help", &[], help),
    ObjectCommand::new(
        "info",
        "show the attributes of a container, the root one by default",
        &[],
        info,
    ),
];

fn help(ctx: &mut Resman<'_>) -> Result<(), CliError> {
    print_help(ctx, TYPE_NAME, COMMANDS)
}

fn info(ctx: &mut Resman<'_>) -> Result<(), CliError> {
    let id = match ctx.obj_name() {
        Some(_) => ctx.object_id(TYPE_NAME)?,
        None => ctx.root_dprc_id(),
    };

    let attr = if id == ctx.root_dprc_id() {
        ctx.root_dprc_attributes()?
    } else {
        let dprc = DprcSession::open(ctx.portal(), CMD_FLAGS, id)?;
        let attr = dprc.get_attributes(ctx.portal(), CMD_FLAGS);
        let closed = released(dprc.close(ctx.portal(), CMD_FLAGS));
        let attr = attr?;
        closed?;
        attr
    };
    check_version::<Dprc>(attr.version)?;
    print_info(ctx, &attr)
}

fn print_info(ctx: &mut Resman<'_>, attr: &DprcAttr) -> Result<(), CliError> {
    let root = attr.container_id == ctx.root_dprc_id();
    let out = ctx.out();
    writeln!(
        out,
        "{TYPE_NAME}.{}:{}",
        attr.container_id,
        if root { " (root)" } else { "" }
    )?;
    writeln!(out, "  version: {}", attr.version)?;
    writeln!(out, "  icid: {}", attr.icid)?;
    writeln!(out, "  portal id: {}", attr.portal_id)?;
    let options = attr.options.names().collect::<Vec<_>>();
    writeln!(out, "  options: {}", options.join(" "))?;
    Ok(())
}
