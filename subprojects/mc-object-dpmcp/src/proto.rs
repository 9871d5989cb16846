//! DPMCP protocol constants and types.

use mc_cmd::{
    CommandId, CommandSpec, Field, ObjectTypeName, Version,
    irq::IRQ_COMMANDS,
    object::{CLOSE_COMMAND, CMDID_GET_ATTR, DESTROY_COMMAND},
};

/// Object type name.
pub const TYPE_NAME: ObjectTypeName = ObjectTypeName::from_static("dpmcp");

/// Command-set revision implemented by this crate.
pub const VERSION: Version = Version::new(3, 0);

/// Number of interrupt lines.
pub const DPMCP_IRQ_COUNT: u8 = 1;

/// `portal_id` asking the firmware to pick a free portal.
pub const DPMCP_GET_PORTAL_ID_FROM_POOL: i32 = -1;

pub const CMDID_OPEN: CommandId = CommandId::new(0x80b);
pub const CMDID_CREATE: CommandId = CommandId::new(0x90b);

pub const CREATE_PORTAL_ID: Field = Field::new(0, 0, 32);

pub const ATTR_RSP_ID: Field = Field::new(0, 32, 32);
pub const ATTR_RSP_VERSION_MAJOR: Field = Field::new(1, 0, 16);
pub const ATTR_RSP_VERSION_MINOR: Field = Field::new(1, 16, 16);

pub const ATTR_RSP_WORDS: u8 = 2;

/// Commands implemented by DPMCP objects.
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec::new(CMDID_OPEN, "open", 1, 0),
    CommandSpec::new(CMDID_CREATE, "create", 1, 0),
    CLOSE_COMMAND,
    DESTROY_COMMAND,
    CommandSpec::new(CMDID_GET_ATTR, "get_attributes", 0, ATTR_RSP_WORDS),
    IRQ_COMMANDS[0],
    IRQ_COMMANDS[1],
    IRQ_COMMANDS[2],
    IRQ_COMMANDS[3],
    IRQ_COMMANDS[4],
    IRQ_COMMANDS[5],
    IRQ_COMMANDS[6],
    IRQ_COMMANDS[7],
];

/// Creation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DpmcpConfig {
    /// Portal backing the object, or [`DPMCP_GET_PORTAL_ID_FROM_POOL`].
    pub portal_id: i32,
}

impl Default for DpmcpConfig {
    fn default() -> Self {
        Self {
            portal_id: DPMCP_GET_PORTAL_ID_FROM_POOL,
        }
    }
}

/// Attributes returned by get-attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DpmcpAttr {
    pub id: i32,
    pub version: Version,
}
