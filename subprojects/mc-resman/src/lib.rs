//! Resource manager for Management Complex objects
//!
//! Command-line front end of the MC command layer: it inspects and creates
//! objects of the root resource container.
//!
//! ```text
//! resman [--help] [--version] [--debug] <object-type> <command> [object-name] [options]
//! ```
//!
//! Each object type has a table of commands ([`Registry`]). The options of a
//! command are tracked in an [`OptionSet`]; a handler consumes the options it
//! uses and any supplied option left over is an error. All per-invocation
//! state lives in the [`Resman`] context passed to every handler.

use std::io::Write;

use log::LevelFilter;
use mc_cmd::{ObjectTypeName, Portal};

mod commands;
mod context;
mod error;
pub mod logger;
mod options;
mod registry;
pub mod topology;

pub use self::{
    context::{CMD_FLAGS, Resman, parse_object_name},
    error::CliError,
    options::{MAX_OPTIONS, OptSpec, OptionSet},
    registry::{CommandFn, ObjectCommand, Registry},
};

const GLOBAL_OPTIONS: &[OptSpec] = &[
    OptSpec::flag("help"),
    OptSpec::flag("version"),
    OptSpec::flag("debug"),
];
const GLOBAL_OPT_HELP: usize = 0;
const GLOBAL_OPT_VERSION: usize = 1;
const GLOBAL_OPT_DEBUG: usize = 2;

/// Runs one invocation with `args` (program name excluded).
///
/// The root container is closed before returning, whether the command
/// succeeded or not; the command's own error takes precedence.
pub fn run(args: &[String], portal: &mut dyn Portal, out: &mut dyn Write) -> Result<(), CliError> {
    let registry = Registry::new();
    let mut global = OptionSet::new(GLOBAL_OPTIONS);
    let rest = global.parse_leading(args)?;

    if global.take(GLOBAL_OPT_DEBUG) {
        log::set_max_level(LevelFilter::Debug);
    }
    if global.take(GLOBAL_OPT_HELP) {
        global.finish()?;
        return print_usage(out, &registry);
    }
    let show_version = global.take(GLOBAL_OPT_VERSION);

    let target = match rest.split_first() {
        Some((obj_type, args)) => Some((registry.lookup(obj_type)?, args)),
        None if show_version => None,
        None => return Err(CliError::MissingObjectType),
    };

    let mut ctx = Resman::connect(portal, out, global)?;
    let result = execute(&mut ctx, show_version, target);
    let closed = ctx.close();
    result.and(closed)
}

type Target<'a> = ((ObjectTypeName, &'static [ObjectCommand]), &'a [String]);

fn execute(
    ctx: &mut Resman<'_>,
    show_version: bool,
    target: Option<Target<'_>>,
) -> Result<(), CliError> {
    if show_version {
        let version = ctx.mc_version();
        writeln!(ctx.out(), "resman version {}", env!("CARGO_PKG_VERSION"))?;
        writeln!(ctx.out(), "MC firmware version {version}")?;
    }
    if let Some(((obj_type, commands), args)) = target {
        ctx.dispatch(obj_type, commands, args)?;
    }
    ctx.global_options().finish()
}

fn print_usage(out: &mut dyn Write, registry: &Registry) -> Result<(), CliError> {
    writeln!(
        out,
        "usage: resman [--help] [--version] [--debug] <object-type> <command> [object-name] [options]"
    )?;
    writeln!(out)?;
    writeln!(out, "object types:")?;
    for obj_type in registry.types() {
        writeln!(out, "  {obj_type}")?;
    }
    writeln!(out)?;
    writeln!(out, "Run `resman <object-type> help` for the commands of a type.")?;
    Ok(())
}
