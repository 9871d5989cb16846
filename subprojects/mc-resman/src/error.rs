use std::io;

use mc_cmd::{CommandError, ObjectTypeName, mng::{MC_VER_MAJOR, McVersion}};

/// Error returned by the resource manager.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Option not in the table of the command.
    #[error("invalid option `{0}`")]
    InvalidOption(String),
    #[error("option --{0} requires an argument")]
    MissingArgument(&'static str),
    #[error("option --{0} does not take an argument")]
    UnexpectedArgument(&'static str),
    #[error("invalid value `{value}` for option --{option}")]
    InvalidOptionValue {
        option: &'static str,
        value: String,
    },
    /// Options supplied but not used by the command.
    #[error("unexpected option(s): {}", option_list(.0))]
    UnexpectedOptions(Vec<&'static str>),

    #[error("missing object type, try --help")]
    MissingObjectType,
    #[error("unknown object type `{0}`")]
    UnknownObjectType(String),
    #[error("missing {0} command")]
    MissingCommand(ObjectTypeName),
    #[error("unknown {obj_type} command `{command}`")]
    UnknownCommand {
        obj_type: ObjectTypeName,
        command: String,
    },

    #[error("missing object name")]
    MissingObjectName,
    #[error("unexpected argument `{0}`")]
    ExtraArgument(String),
    #[error("invalid object name `{0}`")]
    InvalidObjectName(String),
    #[error("`{name}` is not a {expected} object")]
    WrongObjectType {
        name: String,
        expected: ObjectTypeName,
    },

    #[error("unsupported MC firmware version {0}, expected major version {major}", major = MC_VER_MAJOR)]
    UnsupportedFirmware(McVersion),
    #[error("MC command failed")]
    Command(#[from] CommandError),
    #[error("failed to write output")]
    Output(#[from] io::Error),
}

fn option_list(names: &[&str]) -> String {
    names
        .iter()
        .map(|name| format!("--{name}"))
        .collect::<Vec<_>>()
        .join(", ")
}
