use std::io::Write;

use mc_cmd::{Created, object::check_version};
use mc_object_dpbp::{Dpbp, DpbpConfig, DpbpSession, TYPE_NAME};

use super::{print_help, print_irqs, state};
use crate::{CMD_FLAGS, Resman, context::released, error::CliError, registry::ObjectCommand};

pub const COMMANDS: &[ObjectCommand] = &[
    ObjectCommand::new("help", "show this help", &[], help),
    ObjectCommand::new("info", "show the attributes of a buffer pool", &[], info),
    ObjectCommand::new("create", "create a buffer pool", &[], create),
];

fn help(ctx: &mut Resman<'_>) -> Result<(), CliError> {
    print_help(ctx, TYPE_NAME, COMMANDS)
}

fn info(ctx: &mut Resman<'_>) -> Result<(), CliError> {
    let id = ctx.object_id(TYPE_NAME)?;
    let dpbp = DpbpSession::open(ctx.portal(), CMD_FLAGS, id)?;
    let result = print_info(ctx, &dpbp);
    let closed = released(dpbp.close(ctx.portal(), CMD_FLAGS));
    result.and(closed)
}

fn print_info(ctx: &mut Resman<'_>, dpbp: &DpbpSession) -> Result<(), CliError> {
    let attr = dpbp.get_attributes(ctx.portal(), CMD_FLAGS)?;
    check_version::<Dpbp>(attr.version)?;
    let enabled = dpbp.is_enabled(ctx.portal(), CMD_FLAGS)?;

    let out = ctx.out();
    writeln!(out, "{TYPE_NAME}.{}:", attr.id)?;
    writeln!(out, "  version: {}", attr.version)?;
    writeln!(out, "  bpid: {:#x}", attr.bpid)?;
    writeln!(out, "  state: {}", state(enabled))?;
    print_irqs(ctx, dpbp)
}

fn create(ctx: &mut Resman<'_>) -> Result<(), CliError> {
    ctx.expect_no_object_name()?;
    let dpbp = DpbpSession::<Created>::create(ctx.portal(), CMD_FLAGS, &DpbpConfig)?;
    let attr = dpbp.get_attributes(ctx.portal(), CMD_FLAGS);
    let closed = released(dpbp.close(ctx.portal(), CMD_FLAGS));
    let attr = attr?;
    closed?;
    writeln!(ctx.out(), "{TYPE_NAME}.{} created", attr.id)?;
    Ok(())
}
