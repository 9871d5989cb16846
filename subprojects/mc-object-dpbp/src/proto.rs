//! DPBP protocol constants and types.

use mc_cmd::{
    CommandId, CommandSpec, Field, ObjectTypeName, Version,
    irq::IRQ_COMMANDS,
    object::{CLOSE_COMMAND, CMDID_GET_ATTR, DESTROY_COMMAND, ENABLE_COMMANDS},
};

/// Object type name.
pub const TYPE_NAME: ObjectTypeName = ObjectTypeName::from_static("dpbp");

/// Command-set revision implemented by this crate.
pub const VERSION: Version = Version::new(2, 2);

/// Number of interrupt lines.
pub const DPBP_IRQ_COUNT: u8 = 1;

pub const CMDID_OPEN: CommandId = CommandId::new(0x804);
pub const CMDID_CREATE: CommandId = CommandId::new(0x904);

pub const ATTR_RSP_BPID: Field = Field::new(0, 16, 16);
pub const ATTR_RSP_ID: Field = Field::new(0, 32, 32);
pub const ATTR_RSP_VERSION_MAJOR: Field = Field::new(1, 0, 16);
pub const ATTR_RSP_VERSION_MINOR: Field = Field::new(1, 16, 16);

pub const ATTR_RSP_WORDS: u8 = 2;

/// Commands implemented by DPBP objects.
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec::new(CMDID_OPEN, "open", 1, 0),
    CommandSpec::new(CMDID_CREATE, "create", 0, 0),
    CLOSE_COMMAND,
    DESTROY_COMMAND,
    CommandSpec::new(CMDID_GET_ATTR, "get_attributes", 0, ATTR_RSP_WORDS),
    ENABLE_COMMANDS[0],
    ENABLE_COMMANDS[1],
    ENABLE_COMMANDS[2],
    ENABLE_COMMANDS[3],
    IRQ_COMMANDS[0],
    IRQ_COMMANDS[1],
    IRQ_COMMANDS[2],
    IRQ_COMMANDS[3],
    IRQ_COMMANDS[4],
    IRQ_COMMANDS[5],
    IRQ_COMMANDS[6],
    IRQ_COMMANDS[7],
];

/// Creation parameters. Buffer pools take none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DpbpConfig;

/// Attributes returned by get-attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DpbpAttr {
    pub id: i32,
    /// Hardware buffer pool ID, used by the buffer manager.
    pub bpid: u16,
    pub version: Version,
}
