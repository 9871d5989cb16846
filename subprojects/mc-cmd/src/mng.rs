//! Management commands.
//!
//! These address the management processor itself rather than an object, so
//! they are sent with a zero token.

use core::fmt;

use crate::{
    command::{Command, CommandFlags, CommandId, ParseError, Response},
    field::Field,
    object::CommandError,
    portal::{Portal, send_command},
    table::CommandSpec,
};

/// Firmware major version this crate speaks.
pub const MC_VER_MAJOR: u32 = 9;

/// Read the ID of the container the portal belongs to.
pub const CMDID_GET_CONT_ID: CommandId = CommandId::new(0x830);
/// Read the firmware version.
pub const CMDID_GET_VERSION: CommandId = CommandId::new(0x831);

pub const GET_CONT_ID_RSP_ID: Field = Field::new(0, 0, 32);
pub const GET_VERSION_RSP_REVISION: Field = Field::new(0, 0, 32);
pub const GET_VERSION_RSP_MAJOR: Field = Field::new(0, 32, 32);
pub const GET_VERSION_RSP_MINOR: Field = Field::new(1, 0, 32);

pub const GET_CONT_ID_RSP_WORDS: u8 = 1;
pub const GET_VERSION_RSP_WORDS: u8 = 2;

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec::new(CMDID_GET_CONT_ID, "get_container_id", 0, GET_CONT_ID_RSP_WORDS),
    CommandSpec::new(CMDID_GET_VERSION, "get_version", 0, GET_VERSION_RSP_WORDS),
];

/// Version of the management processor firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct McVersion {
    pub major: u32,
    pub minor: u32,
    pub revision: u32,
}

impl fmt::Display for McVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.revision)
    }
}

impl McVersion {
    /// Returns whether the firmware speaks the command set of this crate.
    #[inline]
    pub fn is_supported(&self) -> bool {
        self.major == MC_VER_MAJOR
    }
}

pub fn read_get_version_response(rsp: &Response) -> Result<McVersion, ParseError> {
    let params = rsp.expect_words(GET_VERSION_RSP_WORDS as usize)?;
    Ok(McVersion {
        major: GET_VERSION_RSP_MAJOR.read(params),
        minor: GET_VERSION_RSP_MINOR.read(params),
        revision: GET_VERSION_RSP_REVISION.read(params),
    })
}

pub fn write_get_version_response(rsp: &mut Response, version: &McVersion) {
    rsp.set(GET_VERSION_RSP_REVISION, version.revision)
        .set(GET_VERSION_RSP_MAJOR, version.major)
        .set(GET_VERSION_RSP_MINOR, version.minor);
}

pub fn read_get_container_id_response(rsp: &Response) -> Result<i32, ParseError> {
    let params = rsp.expect_words(GET_CONT_ID_RSP_WORDS as usize)?;
    Ok(GET_CONT_ID_RSP_ID.read(params))
}

pub fn write_get_container_id_response(rsp: &mut Response, container_id: i32) {
    rsp.set(GET_CONT_ID_RSP_ID, container_id);
}

/// Reads the firmware version.
pub fn get_version<P: Portal + ?Sized>(
    portal: &mut P,
    flags: CommandFlags,
) -> Result<McVersion, CommandError> {
    let cmd = Command::new(CMDID_GET_VERSION, flags, 0);
    let rsp = send_command(portal, &cmd).map_err(CommandError::Send)?;
    read_get_version_response(&rsp).map_err(CommandError::Parse)
}

/// Reads the ID of the container the portal belongs to.
pub fn get_container_id<P: Portal + ?Sized>(
    portal: &mut P,
    flags: CommandFlags,
) -> Result<i32, CommandError> {
    let cmd = Command::new(CMDID_GET_CONT_ID, flags, 0);
    let rsp = send_command(portal, &cmd).map_err(CommandError::Send)?;
    read_get_container_id_response(&rsp).map_err(CommandError::Parse)
}

#[cfg(test)]
mod tests {
    use std::string::ToString;

    use super::*;
    use crate::{command::Status, portal::TransportError};

    struct Firmware;

    impl Portal for Firmware {
        fn send(&mut self, cmd: &Command) -> Result<Response, TransportError> {
            let mut rsp = Response::new(cmd, Status::Ok);
            if cmd.id() == CMDID_GET_VERSION {
                write_get_version_response(
                    &mut rsp,
                    &McVersion {
                        major: 9,
                        minor: 3,
                        revision: 1,
                    },
                );
            } else {
                write_get_container_id_response(&mut rsp, 1);
            }
            Ok(rsp)
        }
    }

    #[test]
    fn test_get_version() {
        let version = get_version(&mut Firmware, CommandFlags::empty()).unwrap();
        assert_eq!(version.to_string(), "9.3.1");
        assert!(version.is_supported());
    }

    #[test]
    fn test_get_container_id() {
        assert_eq!(get_container_id(&mut Firmware, CommandFlags::empty()).unwrap(), 1);
    }

    #[test]
    fn test_version_layout() {
        let cmd = Command::new(CMDID_GET_VERSION, CommandFlags::empty(), 0);
        let mut rsp = Response::new(&cmd, Status::Ok);
        write_get_version_response(
            &mut rsp,
            &McVersion {
                major: 10,
                minor: 2,
                revision: 7,
            },
        );
        assert_eq!(rsp.params(), &[7 | (10 << 32), 2]);
        assert!(!read_get_version_response(&rsp).unwrap().is_supported());
    }
}
