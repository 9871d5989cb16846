use std::io::Write;

use mc_cmd::{Created, object::check_version};
use mc_object_dpseci::{
    DPSECI_MAX_PRIORITY, DPSECI_PRIO_NUM, DestType, Dpseci, DpseciAttr, DpseciConfig,
    DpseciSession, TYPE_NAME,
};

use super::{print_help, print_irqs, state};
use crate::{
    CMD_FLAGS, Resman, context::released, error::CliError, options::OptSpec,
    registry::ObjectCommand,
};

const INFO_OPTIONS: &[OptSpec] = &[OptSpec::flag("verbose")];
const OPT_VERBOSE: usize = 0;

const CREATE_OPTIONS: &[OptSpec] = &[OptSpec::with_arg("priorities")];
const OPT_PRIORITIES: usize = 0;

/// Priorities of a DPSECI created without `--priorities`.
const DEFAULT_PRIORITIES: [u8; DPSECI_PRIO_NUM] = [1, 2];

pub const COMMANDS: &[ObjectCommand] = &[
    ObjectCommand::new("help", "show this help", &[], help),
    ObjectCommand::new(
        "info",
        "show the attributes of a SEC interface, with its queues if verbose",
        INFO_OPTIONS,
        info,
    ),
    ObjectCommand::new(
        "create",
        "create a SEC interface with comma-separated queue priorities (1-8)",
        CREATE_OPTIONS,
        create,
    ),
];

fn help(ctx: &mut Resman<'_>) -> Result<(), CliError> {
    print_help(ctx, TYPE_NAME, COMMANDS)
}

fn info(ctx: &mut Resman<'_>) -> Result<(), CliError> {
    let id = ctx.object_id(TYPE_NAME)?;
    let verbose = ctx.options().take(OPT_VERBOSE);

    let dpseci = DpseciSession::open(ctx.portal(), CMD_FLAGS, id)?;
    let result = print_info(ctx, &dpseci, verbose);
    let closed = released(dpseci.close(ctx.portal(), CMD_FLAGS));
    result.and(closed)
}

fn print_info(ctx: &mut Resman<'_>, dpseci: &DpseciSession, verbose: bool) -> Result<(), CliError> {
    let attr = dpseci.get_attributes(ctx.portal(), CMD_FLAGS)?;
    check_version::<Dpseci>(attr.version)?;
    let enabled = dpseci.session().is_enabled(ctx.portal(), CMD_FLAGS)?;

    let out = ctx.out();
    writeln!(out, "{TYPE_NAME}.{}:", attr.id)?;
    writeln!(out, "  version: {}", attr.version)?;
    writeln!(out, "  priorities: {}", attr.num_of_priorities)?;
    writeln!(out, "  state: {}", state(enabled))?;
    print_irqs(ctx, dpseci.session())?;

    if verbose {
        print_queues(ctx, dpseci, &attr)?;
    }
    Ok(())
}

fn print_queues(
    ctx: &mut Resman<'_>,
    dpseci: &DpseciSession,
    attr: &DpseciAttr,
) -> Result<(), CliError> {
    for priority in 0..attr.num_of_priorities {
        let rx = dpseci.get_rx_queue(ctx.portal(), CMD_FLAGS, priority)?;
        let tx = dpseci.get_tx_queue(ctx.portal(), CMD_FLAGS, priority)?;

        let out = ctx.out();
        write!(
            out,
            "  rx queue {priority}: fqid {:#x}, user ctx {:#x}, dest {}",
            rx.fqid,
            rx.user_ctx,
            rx.dest_cfg.dest_type.as_str()
        )?;
        if rx.dest_cfg.dest_type != DestType::None {
            write!(
                out,
                ".{} priority {}",
                rx.dest_cfg.dest_id, rx.dest_cfg.priority
            )?;
        }
        writeln!(out)?;
        writeln!(out, "  tx queue {priority}: fqid {:#x}", tx.fqid)?;
    }
    Ok(())
}

fn create(ctx: &mut Resman<'_>) -> Result<(), CliError> {
    ctx.expect_no_object_name()?;
    let priorities = match ctx.options().take_arg(OPT_PRIORITIES) {
        Some(value) => parse_priorities(&value).ok_or(CliError::InvalidOptionValue {
            option: "priorities",
            value,
        })?,
        None => DEFAULT_PRIORITIES,
    };

    let dpseci = DpseciSession::<Created>::create(ctx.portal(), CMD_FLAGS, &DpseciConfig { priorities })?;
    let attr = dpseci.get_attributes(ctx.portal(), CMD_FLAGS);
    let closed = released(dpseci.close(ctx.portal(), CMD_FLAGS));
    let attr = attr?;
    closed?;
    writeln!(ctx.out(), "{TYPE_NAME}.{} created", attr.id)?;
    Ok(())
}

/// Parses `a[,b]` into the priority array, each in `1..=8`.
fn parse_priorities(value: &str) -> Option<[u8; DPSECI_PRIO_NUM]> {
    let mut priorities = [0; DPSECI_PRIO_NUM];
    let mut count = 0;
    for item in value.split(',') {
        let priority = item.trim().parse::<u8>().ok()?;
        if !(1..=DPSECI_MAX_PRIORITY).contains(&priority) {
            return None;
        }
        *priorities.get_mut(count)? = priority;
        count += 1;
    }
    Some(priorities)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_priorities() {
        assert_eq!(parse_priorities("3"), Some([3, 0]));
        assert_eq!(parse_priorities("1, 8"), Some([1, 8]));
        for bad in ["", "0", "9", "1,2,3", "a", "1,"] {
            assert_eq!(parse_priorities(bad), None, "{bad}");
        }
    }
}
