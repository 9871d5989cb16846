//! DPRC (resource container) object.
//!
//! Containers group the objects a software context may use. Only the root
//! container is opened here, to report its attributes; containers cannot be
//! created or destroyed through this crate.

#![cfg_attr(not(any(test, feature = "sim")), no_std)]

use mc_cmd::{
    CommandId, CommandSpec, ObjectAttributes, ObjectType, ObjectTypeName, Opened, ParseError,
    Response, Session, Version,
};

mod cmd;
mod proto;
#[cfg(any(test, feature = "sim"))]
pub mod sim;

pub use self::{
    cmd::*,
    proto::{CMDID_OPEN, COMMANDS, DprcAttr, DprcOptions, TYPE_NAME, VERSION},
};

/// DPRC object type.
#[derive(Debug)]
pub enum Dprc {}

/// DPRC control session.
pub type DprcSession<S = Opened> = Session<Dprc, S>;

impl ObjectType for Dprc {
    const TYPE_NAME: ObjectTypeName = TYPE_NAME;
    const CMDID_OPEN: CommandId = CMDID_OPEN;
    const VERSION: Version = VERSION;
    const COMMANDS: &'static [CommandSpec] = COMMANDS;

    type Attributes = DprcAttr;

    fn read_attributes(rsp: &Response) -> Result<DprcAttr, ParseError> {
        cmd::read_attributes_response(rsp)
    }
}

impl ObjectAttributes for DprcAttr {
    fn id(&self) -> i32 {
        self.container_id
    }

    fn version(&self) -> Version {
        self.version
    }
}
