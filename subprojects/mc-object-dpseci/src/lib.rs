//! DPSECI (SEC interface) object.
//!
//! A DPSECI object connects software to the SEC crypto engine through pairs
//! of frame queues: a transmit queue per priority carries jobs to the engine
//! and the matching receive queue returns the results.
//!
//! ## Commands
//!
//! Besides the generic open/create/close/destroy, enable/reset and interrupt
//! commands, DPSECI configures its receive queues (`set_rx_queue`) and reports
//! the frame queue IDs of both directions (`get_rx_queue`, `get_tx_queue`).

#![cfg_attr(not(any(test, feature = "sim")), no_std)]

use log::debug;
use mc_cmd::{
    Command, CommandError, CommandFlags, CommandId, CommandSpec, Created, Creatable, Enable,
    Interrupts, ObjectAttributes, ObjectType, ObjectTypeName, Opened, ParseError, Portal,
    ReleaseError, Response, Session, Version, object::Origin,
};

mod cmd;
mod proto;
#[cfg(any(test, feature = "sim"))]
pub mod sim;

pub use self::{
    cmd::*,
    proto::{
        CMDID_CREATE, CMDID_GET_RX_QUEUE, CMDID_GET_TX_QUEUE, CMDID_OPEN, CMDID_SET_RX_QUEUE,
        COMMANDS, DPSECI_IRQ_COUNT, DPSECI_MAX_PRIORITY, DPSECI_PRIO_NUM, DestConfig, DestType,
        DpseciAttr, DpseciConfig, RxQueueAttr, RxQueueConfig, RxQueueOptions, TYPE_NAME,
        TxQueueAttr, VERSION,
    },
};

/// DPSECI object type.
#[derive(Debug)]
pub enum Dpseci {}

impl ObjectType for Dpseci {
    const TYPE_NAME: ObjectTypeName = TYPE_NAME;
    const CMDID_OPEN: CommandId = CMDID_OPEN;
    const VERSION: Version = VERSION;
    const COMMANDS: &'static [CommandSpec] = COMMANDS;

    type Attributes = DpseciAttr;

    fn read_attributes(rsp: &Response) -> Result<DpseciAttr, ParseError> {
        cmd::read_attributes_response(rsp)
    }
}

impl ObjectAttributes for DpseciAttr {
    fn id(&self) -> i32 {
        self.id
    }

    fn version(&self) -> Version {
        self.version
    }
}

impl Creatable for Dpseci {
    const CMDID_CREATE: CommandId = CMDID_CREATE;

    type Config = DpseciConfig;

    fn write_config(cmd: &mut Command, cfg: &DpseciConfig) {
        cmd::write_create_request(cmd, cfg);
    }
}

impl Enable for Dpseci {}

impl Interrupts for Dpseci {
    const IRQ_COUNT: u8 = DPSECI_IRQ_COUNT;
}

/// DPSECI control session.
///
/// Generic commands (enable, interrupts, ...) are reached through
/// [`DpseciSession::session`].
#[repr(transparent)]
#[derive(Debug)]
pub struct DpseciSession<S = Opened>(Session<Dpseci, S>);

impl DpseciSession<Opened> {
    /// Opens the existing DPSECI object `id`.
    #[inline]
    pub fn open<P: Portal + ?Sized>(
        portal: &mut P,
        flags: CommandFlags,
        id: i32,
    ) -> Result<Self, CommandError> {
        Session::<Dpseci>::open(portal, flags, id).map(Self)
    }
}

impl DpseciSession<Created> {
    /// Creates a DPSECI object.
    #[inline]
    pub fn create<P: Portal + ?Sized>(
        portal: &mut P,
        flags: CommandFlags,
        cfg: &DpseciConfig,
    ) -> Result<Self, CommandError> {
        Session::<Dpseci, Created>::create(portal, flags, cfg).map(Self)
    }

    /// Consumes the session and deallocates the object.
    #[inline]
    pub fn destroy<P: Portal + ?Sized>(
        self,
        portal: &mut P,
        flags: CommandFlags,
    ) -> Result<(), ReleaseError<Self>> {
        self.0.destroy(portal, flags).map_err(|e| e.map_session(Self))
    }
}

impl<S: Origin> DpseciSession<S> {
    /// Returns the generic session.
    #[inline]
    pub fn session(&self) -> &Session<Dpseci, S> {
        &self.0
    }

    /// Consumes and closes the session.
    #[inline]
    pub fn close<P: Portal + ?Sized>(
        self,
        portal: &mut P,
        flags: CommandFlags,
    ) -> Result<(), ReleaseError<Self>> {
        self.0.close(portal, flags).map_err(|e| e.map_session(Self))
    }

    #[inline]
    pub fn get_attributes<P: Portal + ?Sized>(
        &self,
        portal: &mut P,
        flags: CommandFlags,
    ) -> Result<DpseciAttr, CommandError> {
        self.0.get_attributes(portal, flags)
    }

    /// Configures the receive queue of transmit `priority`.
    ///
    /// Only the members selected by `cfg.options` are applied.
    pub fn set_rx_queue<P: Portal + ?Sized>(
        &self,
        portal: &mut P,
        flags: CommandFlags,
        priority: u8,
        cfg: &RxQueueConfig,
    ) -> Result<(), CommandError> {
        debug!(
            "dpseci: rx queue {priority}: options {:?}, dest {}",
            cfg.options,
            cfg.dest_cfg.dest_type.as_str()
        );
        let mut cmd = self.0.command(CMDID_SET_RX_QUEUE, flags);
        cmd::write_set_rx_queue_request(&mut cmd, priority, cfg);
        self.0.execute(portal, &cmd).map(drop)
    }

    pub fn get_rx_queue<P: Portal + ?Sized>(
        &self,
        portal: &mut P,
        flags: CommandFlags,
        priority: u8,
    ) -> Result<RxQueueAttr, CommandError> {
        let mut cmd = self.0.command(CMDID_GET_RX_QUEUE, flags);
        cmd::write_queue_request(&mut cmd, priority);
        let rsp = self.0.execute(portal, &cmd)?;
        cmd::read_get_rx_queue_response(&rsp).map_err(CommandError::Parse)
    }

    pub fn get_tx_queue<P: Portal + ?Sized>(
        &self,
        portal: &mut P,
        flags: CommandFlags,
        priority: u8,
    ) -> Result<TxQueueAttr, CommandError> {
        let mut cmd = self.0.command(CMDID_GET_TX_QUEUE, flags);
        cmd::write_queue_request(&mut cmd, priority);
        let rsp = self.0.execute(portal, &cmd)?;
        cmd::read_get_tx_queue_response(&rsp).map_err(CommandError::Parse)
    }
}

#[cfg(test)]
mod tests {
    use mc_cmd::table;

    use super::*;

    #[test]
    fn test_command_table() {
        assert!(table::ids_are_unique(COMMANDS));
        for id in [CMDID_OPEN, CMDID_CREATE, CMDID_SET_RX_QUEUE, CMDID_GET_RX_QUEUE, CMDID_GET_TX_QUEUE] {
            assert!(table::lookup(COMMANDS, id).is_some(), "missing {id}");
        }
        assert_eq!(
            table::lookup(COMMANDS, mc_cmd::object::CMDID_GET_ATTR).map(|c| c.response_words),
            Some(proto::ATTR_RSP_WORDS)
        );
    }
}
