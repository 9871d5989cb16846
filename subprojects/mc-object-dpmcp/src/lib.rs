//! DPMCP (MC command portal) object.
//!
//! A DPMCP object is a portal through which software sends commands to the
//! Management Complex. Creating one either claims a specific portal or lets
//! the firmware pick a free one.

#![cfg_attr(not(any(test, feature = "sim")), no_std)]

use mc_cmd::{
    Command, CommandId, CommandSpec, Creatable, Interrupts, ObjectAttributes, ObjectType,
    ObjectTypeName, Opened, ParseError, Response, Session, Version,
};

mod cmd;
mod proto;
#[cfg(any(test, feature = "sim"))]
pub mod sim;

pub use self::{
    cmd::*,
    proto::{
        CMDID_CREATE, CMDID_OPEN, COMMANDS, DPMCP_GET_PORTAL_ID_FROM_POOL, DPMCP_IRQ_COUNT,
        DpmcpAttr, DpmcpConfig, TYPE_NAME, VERSION,
    },
};

/// DPMCP object type.
#[derive(Debug)]
pub enum Dpmcp {}

/// DPMCP control session.
pub type DpmcpSession<S = Opened> = Session<Dpmcp, S>;

impl ObjectType for Dpmcp {
    const TYPE_NAME: ObjectTypeName = TYPE_NAME;
    const CMDID_OPEN: CommandId = CMDID_OPEN;
    const VERSION: Version = VERSION;
    const COMMANDS: &'static [CommandSpec] = COMMANDS;

    type Attributes = DpmcpAttr;

    fn read_attributes(rsp: &Response) -> Result<DpmcpAttr, ParseError> {
        cmd::read_attributes_response(rsp)
    }
}

impl ObjectAttributes for DpmcpAttr {
    fn id(&self) -> i32 {
        self.id
    }

    fn version(&self) -> Version {
        self.version
    }
}

impl Creatable for Dpmcp {
    const CMDID_CREATE: CommandId = CMDID_CREATE;

    type Config = DpmcpConfig;

    fn write_config(cmd: &mut Command, cfg: &DpmcpConfig) {
        cmd::write_create_request(cmd, cfg);
    }
}

impl Interrupts for Dpmcp {
    const IRQ_COUNT: u8 = DPMCP_IRQ_COUNT;
}
