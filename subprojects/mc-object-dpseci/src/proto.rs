//! DPSECI protocol constants and types.

use bitflags::bitflags;
use mc_cmd::{
    CommandId, CommandSpec, Field, ObjectTypeName, Version,
    irq::IRQ_COMMANDS,
    object::{CLOSE_COMMAND, CMDID_GET_ATTR, DESTROY_COMMAND, ENABLE_COMMANDS},
};

/// Object type name.
pub const TYPE_NAME: ObjectTypeName = ObjectTypeName::from_static("dpseci");

/// Command-set revision implemented by this crate.
pub const VERSION: Version = Version::new(2, 0);

/// Number of transmit priorities (and queue pairs) of an interface.
pub const DPSECI_PRIO_NUM: usize = 2;

/// Highest valid transmit priority.
pub const DPSECI_MAX_PRIORITY: u8 = 8;

/// Number of interrupt lines.
pub const DPSECI_IRQ_COUNT: u8 = 1;

pub const CMDID_OPEN: CommandId = CommandId::new(0x809);
pub const CMDID_CREATE: CommandId = CommandId::new(0x909);
pub const CMDID_SET_RX_QUEUE: CommandId = CommandId::new(0x194);
pub const CMDID_GET_RX_QUEUE: CommandId = CommandId::new(0x196);
pub const CMDID_GET_TX_QUEUE: CommandId = CommandId::new(0x197);

pub const CREATE_PRIORITY_0: Field = Field::new(0, 8, 8);
pub const CREATE_PRIORITY_1: Field = Field::new(0, 16, 8);

pub const ATTR_RSP_ID: Field = Field::new(0, 0, 32);
pub const ATTR_RSP_NUM_OF_PRIORITIES: Field = Field::new(1, 0, 8);
pub const ATTR_RSP_VERSION_MAJOR: Field = Field::new(5, 0, 16);
pub const ATTR_RSP_VERSION_MINOR: Field = Field::new(5, 16, 16);

pub const QUEUE_DEST_ID: Field = Field::new(0, 0, 32);
pub const QUEUE_DEST_PRIORITY: Field = Field::new(0, 32, 8);
pub const QUEUE_PRIORITY: Field = Field::new(0, 40, 8);
pub const QUEUE_DEST_TYPE: Field = Field::new(0, 48, 4);
pub const QUEUE_USER_CTX: Field = Field::new(1, 0, 64);
pub const SET_RX_QUEUE_OPTIONS: Field = Field::new(2, 0, 32);
pub const GET_RX_QUEUE_RSP_FQID: Field = Field::new(2, 0, 32);

pub const GET_TX_QUEUE_RSP_FQID: Field = Field::new(0, 32, 32);

pub const ATTR_RSP_WORDS: u8 = 6;
pub const GET_RX_QUEUE_RSP_WORDS: u8 = 3;
pub const GET_TX_QUEUE_RSP_WORDS: u8 = 1;

/// Commands implemented by DPSECI objects.
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec::new(CMDID_OPEN, "open", 1, 0),
    CommandSpec::new(CMDID_CREATE, "create", 1, 0),
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
    CommandSpec::new(CMDID_SET_RX_QUEUE, "set_rx_queue", 3, 0),
    CommandSpec::new(CMDID_GET_RX_QUEUE, "get_rx_queue", 1, GET_RX_QUEUE_RSP_WORDS),
    CommandSpec::new(CMDID_GET_TX_QUEUE, "get_tx_queue", 1, GET_TX_QUEUE_RSP_WORDS),
];

/// Creation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DpseciConfig {
    /// Priority of each transmit queue towards the SEC engine, `1..=8`.
    /// A zero entry ends the list; the number of non-zero leading entries
    /// is the number of queue pairs.
    pub priorities: [u8; DPSECI_PRIO_NUM],
}

/// Attributes returned by get-attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DpseciAttr {
    pub id: i32,
    pub num_of_priorities: u8,
    pub version: Version,
}

/// Kind of entity notified of frames on a receive queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum DestType {
    /// Frames are dequeued by polling.
    #[default]
    None = 0,
    /// Notifications go to an I/O portal.
    Dpio = 1,
    /// Notifications go to a concentrator channel.
    Dpcon = 2,
}

impl DestType {
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::None),
            1 => Some(Self::Dpio),
            2 => Some(Self::Dpcon),
            _ => None,
        }
    }

    #[inline]
    pub const fn to_raw(self) -> u8 {
        self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Dpio => "dpio",
            Self::Dpcon => "dpcon",
        }
    }
}

/// Notification destination of a receive queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DestConfig {
    pub dest_type: DestType,
    /// ID of the DPIO or DPCON object. Ignored for [`DestType::None`].
    pub dest_id: i32,
    /// Priority within the destination's channels.
    pub priority: u8,
}

bitflags! {
    /// Selects which members of [`RxQueueConfig`] are applied.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[repr(transparent)]
    pub struct RxQueueOptions: u32 {
        /// Apply `user_ctx`.
        const USER_CTX = 0x0000_0001;
        /// Apply `dest_cfg`.
        const DEST = 0x0000_0002;
    }
}

/// Receive queue configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RxQueueConfig {
    pub options: RxQueueOptions,
    /// Value returned with every dequeued frame.
    pub user_ctx: u64,
    pub dest_cfg: DestConfig,
}

/// Receive queue attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RxQueueAttr {
    pub user_ctx: u64,
    pub dest_cfg: DestConfig,
    /// Frame queue ID.
    pub fqid: u32,
}

/// Transmit queue attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TxQueueAttr {
    /// Frame queue ID.
    pub fqid: u32,
}
