//! DPBP (buffer pool) object.
//!
//! A DPBP object owns one hardware buffer pool of the queue manager. Software
//! seeds the pool with buffers; the hardware hands them out to ingress frames.
//! The pool is identified towards the hardware by the `bpid` attribute.

#![cfg_attr(not(any(test, feature = "sim")), no_std)]

use mc_cmd::{
    Command, CommandId, CommandSpec, Creatable, Enable, Interrupts, ObjectAttributes, ObjectType,
    ObjectTypeName, Opened, ParseError, Response, Session, Version,
};

mod cmd;
mod proto;
#[cfg(any(test, feature = "sim"))]
pub mod sim;

pub use self::{
    cmd::{read_attributes_response, write_attributes_response},
    proto::{
        CMDID_CREATE, CMDID_OPEN, COMMANDS, DPBP_IRQ_COUNT, DpbpAttr, DpbpConfig, TYPE_NAME,
        VERSION,
    },
};

/// DPBP object type.
#[derive(Debug)]
pub enum Dpbp {}

/// DPBP control session.
pub type DpbpSession<S = Opened> = Session<Dpbp, S>;

impl ObjectType for Dpbp {
    const TYPE_NAME: ObjectTypeName = TYPE_NAME;
    const CMDID_OPEN: CommandId = CMDID_OPEN;
    const VERSION: Version = VERSION;
    const COMMANDS: &'static [CommandSpec] = COMMANDS;

    type Attributes = DpbpAttr;

    fn read_attributes(rsp: &Response) -> Result<DpbpAttr, ParseError> {
        cmd::read_attributes_response(rsp)
    }
}

impl ObjectAttributes for DpbpAttr {
    fn id(&self) -> i32 {
        self.id
    }

    fn version(&self) -> Version {
        self.version
    }
}

impl Creatable for Dpbp {
    const CMDID_CREATE: CommandId = CMDID_CREATE;

    type Config = DpbpConfig;

    /// Create is header-only.
    fn write_config(_cmd: &mut Command, _cfg: &DpbpConfig) {}
}

impl Enable for Dpbp {}

impl Interrupts for Dpbp {
    const IRQ_COUNT: u8 = DPBP_IRQ_COUNT;
}
