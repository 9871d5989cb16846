use mc_cmd::{
    Command, CommandError, CommandId, ObjectTypeName, Portal, Response, SendError, Status,
    TransportError,
    mng::{MC_VER_MAJOR, McVersion},
    object::{CMDID_CLOSE, CMDID_GET_ATTR},
};
use mc_resman::{CliError, ObjectCommand, OptSpec, OptionSet, Resman, run, topology};
use mc_sim::Emulator;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Runs one invocation against `mc` and returns its output.
fn resman(mc: &mut Emulator, list: &[&str]) -> Result<String, CliError> {
    let mut out = Vec::new();
    run(&args(list), mc, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

fn emulator() -> Emulator {
    topology::emulator().unwrap()
}

#[test]
fn test_help_sends_no_commands() {
    let mut mc = emulator();
    let out = resman(&mut mc, &["--help"]).unwrap();
    assert!(out.starts_with("usage: resman"));
    assert!(out.contains("  dpseci\n"));
    assert!(mc.history().is_empty());
}

#[test]
fn test_help_rejects_other_options() {
    let mut mc = emulator();
    assert!(matches!(
        resman(&mut mc, &["--help", "--version"]),
        Err(CliError::UnexpectedOptions(names)) if names == ["version"]
    ));
    assert!(mc.history().is_empty());
}

#[test]
fn test_version() {
    let mut mc = emulator();
    let out = resman(&mut mc, &["--version"]).unwrap();
    assert!(out.contains(&format!("MC firmware version {MC_VER_MAJOR}.0.0")));
    assert_eq!(mc.session_count(), 0);
}

#[test]
fn test_unsupported_firmware() {
    let mut mc = Emulator::builder()
        .version(McVersion {
            major: MC_VER_MAJOR + 1,
            minor: 0,
            revision: 0,
        })
        .build()
        .unwrap();
    assert!(matches!(
        resman(&mut mc, &["dprc", "info"]),
        Err(CliError::UnsupportedFirmware(version)) if version.major == MC_VER_MAJOR + 1
    ));
}

#[test]
fn test_root_container_info() {
    let mut mc = emulator();
    let out = resman(&mut mc, &["dprc", "info"]).unwrap();
    assert!(out.starts_with("dprc.1: (root)\n"));
    assert!(out.contains("  version: 5.1\n"));
    assert!(out.contains("obj-create"));
    // Root container session is closed on exit.
    assert_eq!(mc.session_count(), 0);
}

#[test]
fn test_dpbp_info() {
    let mut mc = emulator();
    let out = resman(&mut mc, &["dpbp", "info", "dpbp.1"]).unwrap();
    assert_eq!(
        out,
        "dpbp.1:\n  version: 2.2\n  bpid: 0x41\n  state: disabled\n  \
         irq 0: disabled, mask 0x00000000, status 0x00000000\n"
    );
    assert_eq!(mc.session_count(), 0);
}

#[test]
fn test_dpseci_info_verbose() {
    let mut mc = emulator();
    let out = resman(&mut mc, &["dpseci", "info", "--verbose", "dpseci.0"]).unwrap();
    assert!(out.contains("  priorities: 2\n"));
    assert!(out.contains("  rx queue 0: fqid 0x1000, user ctx 0x0, dest none\n"));
    assert!(out.contains("  tx queue 1: fqid 0x2001\n"));

    let out = resman(&mut mc, &["dpseci", "info", "dpseci.0"]).unwrap();
    assert!(!out.contains("rx queue"));
}

#[test]
fn test_dpseci_create() {
    let mut mc = emulator();
    let out = resman(&mut mc, &["dpseci", "create", "--priorities=3"]).unwrap();
    assert_eq!(out, "dpseci.1 created\n");
    assert_eq!(mc.object_ids(mc_object_dpseci::TYPE_NAME), [0, 1]);

    let out = resman(&mut mc, &["dpseci", "info", "dpseci.1"]).unwrap();
    assert!(out.contains("  priorities: 1\n"));
}

#[test]
fn test_dpseci_create_rejects_bad_priorities() {
    let mut mc = emulator();
    assert!(matches!(
        resman(&mut mc, &["dpseci", "create", "--priorities", "4,9"]),
        Err(CliError::InvalidOptionValue { option: "priorities", value }) if value == "4,9"
    ));
    assert_eq!(mc.object_ids(mc_object_dpseci::TYPE_NAME), [0]);
    assert_eq!(mc.session_count(), 0);
}

#[test]
fn test_dpmcp_create() {
    let mut mc = emulator();
    let out = resman(&mut mc, &["dpmcp", "create", "--portal-id", "5"]).unwrap();
    assert_eq!(out, "dpmcp.5 created\n");
    let out = resman(&mut mc, &["dpmcp", "create"]).unwrap();
    assert_eq!(out, "dpmcp.1 created\n");
}

#[test]
fn test_type_help() {
    let mut mc = emulator();
    let out = resman(&mut mc, &["dpmcp", "help"]).unwrap();
    assert!(out.starts_with("usage: resman dpmcp <command> [dpmcp.<id>] [options]\n"));
    assert!(out.contains("--portal-id=<value>"));
}

#[test]
fn test_usage_errors() {
    let mut mc = emulator();
    assert!(matches!(resman(&mut mc, &[]), Err(CliError::MissingObjectType)));
    assert!(matches!(
        resman(&mut mc, &["dpni", "info"]),
        Err(CliError::UnknownObjectType(t)) if t == "dpni"
    ));
    assert!(matches!(
        resman(&mut mc, &["dpbp", "destroy", "dpbp.0"]),
        Err(CliError::UnknownCommand { command, .. }) if command == "destroy"
    ));
    assert!(matches!(resman(&mut mc, &["dpbp"]), Err(CliError::MissingCommand(_))));
    assert!(matches!(resman(&mut mc, &["dpbp", "info"]), Err(CliError::MissingObjectName)));
    assert!(matches!(
        resman(&mut mc, &["dpbp", "info", "dpseci.0"]),
        Err(CliError::WrongObjectType { .. })
    ));
    assert!(matches!(
        resman(&mut mc, &["dpbp", "info", "dpbp.0", "dpbp.1"]),
        Err(CliError::ExtraArgument(arg)) if arg == "dpbp.1"
    ));
    assert!(matches!(
        resman(&mut mc, &["dpbp", "info", "dpbp.0", "--verbose"]),
        Err(CliError::InvalidOption(opt)) if opt == "--verbose"
    ));
    assert!(matches!(
        resman(&mut mc, &["--frobnicate"]),
        Err(CliError::InvalidOption(_))
    ));
    assert_eq!(mc.session_count(), 0);
}

#[test]
fn test_missing_object() {
    let mut mc = emulator();
    let err = resman(&mut mc, &["dpbp", "info", "dpbp.9"]).unwrap_err();
    assert!(matches!(
        err,
        CliError::Command(CommandError::Send(SendError::Status {
            status: Status::ConfigError,
            ..
        }))
    ));
    assert_eq!(mc.session_count(), 0);
}

#[test]
fn test_unconsumed_command_options_are_all_reported() {
    const OPTIONS: &[OptSpec] = &[OptSpec::flag("a"), OptSpec::flag("b"), OptSpec::flag("c")];

    fn take_a(ctx: &mut Resman<'_>) -> Result<(), CliError> {
        ctx.options().take(0);
        Ok(())
    }

    const COMMANDS: &[ObjectCommand] =
        &[ObjectCommand::new("take-a", "consumes --a only", OPTIONS, take_a)];

    let mut mc = emulator();
    let mut out = Vec::new();
    let mut ctx = Resman::connect(&mut mc, &mut out, OptionSet::new(&[])).unwrap();
    let err = ctx
        .dispatch(
            ObjectTypeName::from_static("dpbp"),
            COMMANDS,
            &args(&["take-a", "--a", "--b", "--c"]),
        )
        .unwrap_err();
    assert!(matches!(err, CliError::UnexpectedOptions(names) if names == ["b", "c"]));
    ctx.close().unwrap();
    assert_eq!(mc.session_count(), 0);
}

/// Emulator whose sessions on one object type fail get-attributes with a
/// status and fail close in the transport.
struct FailingObject {
    mc: Emulator,
    open: CommandId,
    token: Option<u16>,
}

impl Portal for FailingObject {
    fn send(&mut self, cmd: &Command) -> Result<Response, TransportError> {
        if self.token.is_some_and(|token| token == cmd.token()) {
            if cmd.id() == CMDID_GET_ATTR {
                return Ok(Response::new(cmd, Status::Busy));
            }
            if cmd.id() == CMDID_CLOSE {
                return Err(TransportError::Timeout);
            }
        }
        let rsp = self.mc.send(cmd)?;
        if cmd.id() == self.open && rsp.status() == Status::Ok {
            self.token = Some(rsp.token());
        }
        Ok(rsp)
    }
}

#[test]
fn test_command_error_wins_over_close_error() {
    let mut portal = FailingObject {
        mc: emulator(),
        open: mc_object_dpbp::CMDID_OPEN,
        token: None,
    };
    let mut out = Vec::new();
    let err = run(&args(&["dpbp", "info", "dpbp.0"]), &mut portal, &mut out).unwrap_err();
    assert!(matches!(
        err,
        CliError::Command(CommandError::Send(SendError::Status {
            status: Status::Busy,
            ..
        }))
    ));
}
