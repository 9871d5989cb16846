//! DPRC protocol constants and types.

use bitflags::bitflags;
use mc_cmd::{
    CommandId, CommandSpec, Field, ObjectTypeName, Version,
    object::{CLOSE_COMMAND, CMDID_GET_ATTR},
};

/// Object type name.
pub const TYPE_NAME: ObjectTypeName = ObjectTypeName::from_static("dprc");

/// Command-set revision implemented by this crate.
pub const VERSION: Version = Version::new(5, 1);

pub const CMDID_OPEN: CommandId = CommandId::new(0x805);

pub const ATTR_RSP_CONTAINER_ID: Field = Field::new(0, 0, 32);
pub const ATTR_RSP_ICID: Field = Field::new(0, 32, 16);
pub const ATTR_RSP_OPTIONS: Field = Field::new(1, 0, 32);
pub const ATTR_RSP_PORTAL_ID: Field = Field::new(1, 32, 32);
pub const ATTR_RSP_VERSION_MAJOR: Field = Field::new(2, 0, 16);
pub const ATTR_RSP_VERSION_MINOR: Field = Field::new(2, 16, 16);

pub const ATTR_RSP_WORDS: u8 = 3;

/// Commands implemented by DPRC objects.
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec::new(CMDID_OPEN, "open", 1, 0),
    CLOSE_COMMAND,
    CommandSpec::new(CMDID_GET_ATTR, "get_attributes", 0, ATTR_RSP_WORDS),
];

bitflags! {
    /// Container capabilities.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[repr(transparent)]
    pub struct DprcOptions: u32 {
        /// Child containers may be created.
        const SPAWN_ALLOWED = 0x0000_0001;
        /// Resources may be allocated from the parent.
        const ALLOC_ALLOWED = 0x0000_0002;
        /// Objects may be created inside the container.
        const OBJ_CREATE_ALLOWED = 0x0000_0004;
        /// Topology changes are reported.
        const TOPOLOGY_CHANGES_ALLOWED = 0x0000_0008;
        /// Container belongs to the AIOP.
        const AIOP = 0x0000_0010;
        /// Interrupts of contained objects may be configured.
        const IRQ_CFG_ALLOWED = 0x0000_0020;
    }
}

const OPTION_NAMES: [(DprcOptions, &str); 6] = [
    (DprcOptions::SPAWN_ALLOWED, "spawn"),
    (DprcOptions::ALLOC_ALLOWED, "alloc"),
    (DprcOptions::OBJ_CREATE_ALLOWED, "obj-create"),
    (DprcOptions::TOPOLOGY_CHANGES_ALLOWED, "topology-changes"),
    (DprcOptions::AIOP, "aiop"),
    (DprcOptions::IRQ_CFG_ALLOWED, "irq-cfg"),
];

impl DprcOptions {
    /// Lower-case names of the set flags, in bit order. Unknown bits are skipped.
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        OPTION_NAMES
            .into_iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| name)
    }
}

/// Attributes returned by get-attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DprcAttr {
    pub container_id: i32,
    /// Isolation context ID.
    pub icid: u16,
    pub options: DprcOptions,
    /// Command portal bound to the container.
    pub portal_id: i32,
    pub version: Version,
}
