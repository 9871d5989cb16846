use std::io::Write;

use mc_cmd::{Created, object::check_version};
use mc_object_dpmcp::{DPMCP_GET_PORTAL_ID_FROM_POOL, Dpmcp, DpmcpConfig, DpmcpSession, TYPE_NAME};

use super::{print_help, print_irqs};
use crate::{
    CMD_FLAGS, Resman, context::released, error::CliError, options::OptSpec,
    registry::ObjectCommand,
};

const CREATE_OPTIONS: &[OptSpec] = &[OptSpec::with_arg("portal-id")];
const OPT_PORTAL_ID: usize = 0;

pub const COMMANDS: &[ObjectCommand] = &[
    ObjectCommand::new("help", "show this help", &[], help),
    ObjectCommand::new("info", "show the attributes of a command portal", &[], info),
    ObjectCommand::new(
        "create",
        "create a command portal, on a given portal or any free one",
        CREATE_OPTIONS,
        create,
    ),
];

fn help(ctx: &mut Resman<'_>) -> Result<(), CliError> {
    print_help(ctx, TYPE_NAME, COMMANDS)
}

fn info(ctx: &mut Resman<'_>) -> Result<(), CliError> {
    let id = ctx.object_id(TYPE_NAME)?;
    let dpmcp = DpmcpSession::open(ctx.portal(), CMD_FLAGS, id)?;
    let result = print_info(ctx, &dpmcp);
    let closed = released(dpmcp.close(ctx.portal(), CMD_FLAGS));
    result.and(closed)
}

fn print_info(ctx: &mut Resman<'_>, dpmcp: &DpmcpSession) -> Result<(), CliError> {
    let attr = dpmcp.get_attributes(ctx.portal(), CMD_FLAGS)?;
    check_version::<Dpmcp>(attr.version)?;

    let out = ctx.out();
    writeln!(out, "{TYPE_NAME}.{}:", attr.id)?;
    writeln!(out, "  version: {}", attr.version)?;
    print_irqs(ctx, dpmcp)
}

fn create(ctx: &mut Resman<'_>) -> Result<(), CliError> {
    ctx.expect_no_object_name()?;
    let portal_id = match ctx.options().take_arg(OPT_PORTAL_ID) {
        Some(value) => value
            .parse::<i32>()
            .ok()
            .filter(|id| *id >= 0)
            .ok_or(CliError::InvalidOptionValue {
                option: "portal-id",
                value,
            })?,
        None => DPMCP_GET_PORTAL_ID_FROM_POOL,
    };

    let dpmcp = DpmcpSession::<Created>::create(ctx.portal(), CMD_FLAGS, &DpmcpConfig { portal_id })?;
    let attr = dpmcp.get_attributes(ctx.portal(), CMD_FLAGS);
    let closed = released(dpmcp.close(ctx.portal(), CMD_FLAGS));
    let attr = attr?;
    closed?;
    writeln!(ctx.out(), "{TYPE_NAME}.{} created", attr.id)?;
    Ok(())
}
