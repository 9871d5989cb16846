//! Interrupt configuration commands.
//!
//! Objects expose a small number of interrupt lines addressed by an index.
//! Each line has a message target (address, value, user id), an enable
//! switch, a 32-bit cause mask and a 32-bit pending-cause status register
//! with write-1-to-clear semantics. Lines share no state.
//!
//! Several commands pack an 8-bit field and the index into the same word:
//!
//! ```text
//! word 0   63        40 39     32 31                      8 7      0
//!          ┌───────────┬─────────┬─────────────────────────┬────────┐
//!          │           │irq_index│        mask/status      │ enable │
//!          └───────────┴─────────┴─────────────────────────┴────────┘
//! ```

use crate::{
    command::{Command, CommandFlags, CommandId, ParseError, Response},
    field::Field,
    object::{CommandError, Interrupts, Origin, Session},
    portal::Portal,
    table::CommandSpec,
};

/// Set the message target of an interrupt line.
pub const CMDID_SET_IRQ: CommandId = CommandId::new(0x010);
/// Read the message target of an interrupt line.
pub const CMDID_GET_IRQ: CommandId = CommandId::new(0x011);
/// Enable or disable an interrupt line.
pub const CMDID_SET_IRQ_ENABLE: CommandId = CommandId::new(0x012);
/// Read the enable state of an interrupt line.
pub const CMDID_GET_IRQ_ENABLE: CommandId = CommandId::new(0x013);
/// Set the cause mask of an interrupt line.
pub const CMDID_SET_IRQ_MASK: CommandId = CommandId::new(0x014);
/// Read the cause mask of an interrupt line.
pub const CMDID_GET_IRQ_MASK: CommandId = CommandId::new(0x015);
/// Read the pending causes of an interrupt line.
pub const CMDID_GET_IRQ_STATUS: CommandId = CommandId::new(0x016);
/// Clear pending causes of an interrupt line.
pub const CMDID_CLEAR_IRQ_STATUS: CommandId = CommandId::new(0x017);

pub const SET_IRQ_INDEX: Field = Field::new(0, 0, 8);
pub const SET_IRQ_VAL: Field = Field::new(0, 32, 32);
pub const SET_IRQ_ADDR: Field = Field::new(1, 0, 64);
pub const SET_IRQ_USER_ID: Field = Field::new(2, 0, 32);

/// Index argument of every command except set-irq.
pub const IRQ_INDEX: Field = Field::new(0, 32, 8);

pub const GET_IRQ_RSP_VAL: Field = Field::new(0, 0, 32);
pub const GET_IRQ_RSP_ADDR: Field = Field::new(1, 0, 64);
pub const GET_IRQ_RSP_USER_ID: Field = Field::new(2, 0, 32);
pub const GET_IRQ_RSP_TYPE: Field = Field::new(2, 32, 32);

pub const IRQ_ENABLE_STATE: Field = Field::new(0, 0, 8);
pub const IRQ_MASK: Field = Field::new(0, 0, 32);
pub const IRQ_STATUS: Field = Field::new(0, 0, 32);

pub const GET_IRQ_RSP_WORDS: u8 = 3;
pub const GET_IRQ_ENABLE_RSP_WORDS: u8 = 1;
pub const GET_IRQ_MASK_RSP_WORDS: u8 = 1;
pub const GET_IRQ_STATUS_RSP_WORDS: u8 = 1;

/// Table entries shared by every type implementing [`Interrupts`].
pub const IRQ_COMMANDS: [CommandSpec; 8] = [
    CommandSpec::new(CMDID_SET_IRQ, "set_irq", 3, 0),
    CommandSpec::new(CMDID_GET_IRQ, "get_irq", 1, GET_IRQ_RSP_WORDS),
    CommandSpec::new(CMDID_SET_IRQ_ENABLE, "set_irq_enable", 1, 0),
    CommandSpec::new(CMDID_GET_IRQ_ENABLE, "get_irq_enable", 1, GET_IRQ_ENABLE_RSP_WORDS),
    CommandSpec::new(CMDID_SET_IRQ_MASK, "set_irq_mask", 1, 0),
    CommandSpec::new(CMDID_GET_IRQ_MASK, "get_irq_mask", 1, GET_IRQ_MASK_RSP_WORDS),
    CommandSpec::new(CMDID_GET_IRQ_STATUS, "get_irq_status", 1, GET_IRQ_STATUS_RSP_WORDS),
    CommandSpec::new(CMDID_CLEAR_IRQ_STATUS, "clear_irq_status", 1, 0),
];

/// Message target of an interrupt line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IrqConfig {
    /// Address the interrupt message is written to.
    pub addr: u64,
    /// Value written to `addr`.
    pub val: u32,
    /// Caller-chosen identifier, opaque to the firmware.
    pub user_irq_id: i32,
}

/// Interrupt line as reported by get-irq.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IrqInfo {
    /// Interrupt type.
    pub irq_type: i32,
    /// Message target.
    pub cfg: IrqConfig,
}

pub fn write_set_irq_request(cmd: &mut Command, irq_index: u8, cfg: &IrqConfig) {
    cmd.set(SET_IRQ_INDEX, irq_index)
        .set(SET_IRQ_VAL, cfg.val)
        .set(SET_IRQ_ADDR, cfg.addr)
        .set(SET_IRQ_USER_ID, cfg.user_irq_id);
}

pub fn read_set_irq_request(cmd: &Command) -> (u8, IrqConfig) {
    let cfg = IrqConfig {
        addr: cmd.get(SET_IRQ_ADDR),
        val: cmd.get(SET_IRQ_VAL),
        user_irq_id: cmd.get(SET_IRQ_USER_ID),
    };
    (cmd.get(SET_IRQ_INDEX), cfg)
}

/// Stores the index of commands that only address a line.
pub fn write_irq_index_request(cmd: &mut Command, irq_index: u8) {
    cmd.set(IRQ_INDEX, irq_index);
}

pub fn read_irq_index_request(cmd: &Command) -> u8 {
    cmd.get(IRQ_INDEX)
}

pub fn read_get_irq_response(rsp: &Response) -> Result<IrqInfo, ParseError> {
    let params = rsp.expect_words(GET_IRQ_RSP_WORDS as usize)?;
    Ok(IrqInfo {
        irq_type: GET_IRQ_RSP_TYPE.read(params),
        cfg: IrqConfig {
            addr: GET_IRQ_RSP_ADDR.read(params),
            val: GET_IRQ_RSP_VAL.read(params),
            user_irq_id: GET_IRQ_RSP_USER_ID.read(params),
        },
    })
}

pub fn write_get_irq_response(rsp: &mut Response, info: &IrqInfo) {
    rsp.set(GET_IRQ_RSP_VAL, info.cfg.val)
        .set(GET_IRQ_RSP_ADDR, info.cfg.addr)
        .set(GET_IRQ_RSP_USER_ID, info.cfg.user_irq_id)
        .set(GET_IRQ_RSP_TYPE, info.irq_type);
}

pub fn write_set_irq_enable_request(cmd: &mut Command, irq_index: u8, enable_state: u8) {
    cmd.set(IRQ_ENABLE_STATE, enable_state)
        .set(IRQ_INDEX, irq_index);
}

pub fn read_set_irq_enable_request(cmd: &Command) -> (u8, u8) {
    (cmd.get(IRQ_INDEX), cmd.get(IRQ_ENABLE_STATE))
}

pub fn read_get_irq_enable_response(rsp: &Response) -> Result<u8, ParseError> {
    let params = rsp.expect_words(GET_IRQ_ENABLE_RSP_WORDS as usize)?;
    Ok(IRQ_ENABLE_STATE.read(params))
}

pub fn write_get_irq_enable_response(rsp: &mut Response, enable_state: u8) {
    rsp.set(IRQ_ENABLE_STATE, enable_state);
}

pub fn write_set_irq_mask_request(cmd: &mut Command, irq_index: u8, mask: u32) {
    cmd.set(IRQ_MASK, mask).set(IRQ_INDEX, irq_index);
}

pub fn read_set_irq_mask_request(cmd: &Command) -> (u8, u32) {
    (cmd.get(IRQ_INDEX), cmd.get(IRQ_MASK))
}

pub fn read_get_irq_mask_response(rsp: &Response) -> Result<u32, ParseError> {
    let params = rsp.expect_words(GET_IRQ_MASK_RSP_WORDS as usize)?;
    Ok(IRQ_MASK.read(params))
}

pub fn write_get_irq_mask_response(rsp: &mut Response, mask: u32) {
    rsp.set(IRQ_MASK, mask);
}

/// Stores a get-irq-status request. `status` selects the causes of
/// interest; zero reads all of them.
pub fn write_get_irq_status_request(cmd: &mut Command, irq_index: u8, status: u32) {
    cmd.set(IRQ_STATUS, status).set(IRQ_INDEX, irq_index);
}

pub fn read_get_irq_status_request(cmd: &Command) -> (u8, u32) {
    (cmd.get(IRQ_INDEX), cmd.get(IRQ_STATUS))
}

pub fn read_get_irq_status_response(rsp: &Response) -> Result<u32, ParseError> {
    let params = rsp.expect_words(GET_IRQ_STATUS_RSP_WORDS as usize)?;
    Ok(IRQ_STATUS.read(params))
}

pub fn write_get_irq_status_response(rsp: &mut Response, status: u32) {
    rsp.set(IRQ_STATUS, status);
}

/// Stores a clear-irq-status request. Each set bit of `status` clears the
/// matching pending cause.
pub fn write_clear_irq_status_request(cmd: &mut Command, irq_index: u8, status: u32) {
    cmd.set(IRQ_STATUS, status).set(IRQ_INDEX, irq_index);
}

pub fn read_clear_irq_status_request(cmd: &Command) -> (u8, u32) {
    (cmd.get(IRQ_INDEX), cmd.get(IRQ_STATUS))
}

/// Rejects interrupt indices beyond the lines of `O`.
pub fn check_irq_index<O: Interrupts>(irq_index: u8) -> Result<(), CommandError> {
    if irq_index >= O::IRQ_COUNT {
        return Err(CommandError::IrqIndex {
            index: irq_index,
            count: O::IRQ_COUNT,
        });
    }
    Ok(())
}

impl<O: Interrupts, S: Origin> Session<O, S> {
    /// Sets the message target of interrupt line `irq_index`.
    pub fn set_irq<P: Portal + ?Sized>(
        &self,
        portal: &mut P,
        flags: CommandFlags,
        irq_index: u8,
        cfg: &IrqConfig,
    ) -> Result<(), CommandError> {
        check_irq_index::<O>(irq_index)?;
        let mut cmd = self.command(CMDID_SET_IRQ, flags);
        write_set_irq_request(&mut cmd, irq_index, cfg);
        self.execute(portal, &cmd).map(drop)
    }

    /// Reads the message target and type of interrupt line `irq_index`.
    pub fn get_irq<P: Portal + ?Sized>(
        &self,
        portal: &mut P,
        flags: CommandFlags,
        irq_index: u8,
    ) -> Result<IrqInfo, CommandError> {
        check_irq_index::<O>(irq_index)?;
        let mut cmd = self.command(CMDID_GET_IRQ, flags);
        write_irq_index_request(&mut cmd, irq_index);
        let rsp = self.execute(portal, &cmd)?;
        read_get_irq_response(&rsp).map_err(CommandError::Parse)
    }

    /// Enables (non-zero) or disables (zero) delivery on `irq_index`.
    pub fn set_irq_enable<P: Portal + ?Sized>(
        &self,
        portal: &mut P,
        flags: CommandFlags,
        irq_index: u8,
        enable_state: u8,
    ) -> Result<(), CommandError> {
        check_irq_index::<O>(irq_index)?;
        let mut cmd = self.command(CMDID_SET_IRQ_ENABLE, flags);
        write_set_irq_enable_request(&mut cmd, irq_index, enable_state);
        self.execute(portal, &cmd).map(drop)
    }

    pub fn get_irq_enable<P: Portal + ?Sized>(
        &self,
        portal: &mut P,
        flags: CommandFlags,
        irq_index: u8,
    ) -> Result<u8, CommandError> {
        check_irq_index::<O>(irq_index)?;
        let mut cmd = self.command(CMDID_GET_IRQ_ENABLE, flags);
        write_irq_index_request(&mut cmd, irq_index);
        let rsp = self.execute(portal, &cmd)?;
        read_get_irq_enable_response(&rsp).map_err(CommandError::Parse)
    }

    /// Sets the cause mask of `irq_index`. Set bits enable causes.
    pub fn set_irq_mask<P: Portal + ?Sized>(
        &self,
        portal: &mut P,
        flags: CommandFlags,
        irq_index: u8,
        mask: u32,
    ) -> Result<(), CommandError> {
        check_irq_index::<O>(irq_index)?;
        let mut cmd = self.command(CMDID_SET_IRQ_MASK, flags);
        write_set_irq_mask_request(&mut cmd, irq_index, mask);
        self.execute(portal, &cmd).map(drop)
    }

    pub fn get_irq_mask<P: Portal + ?Sized>(
        &self,
        portal: &mut P,
        flags: CommandFlags,
        irq_index: u8,
    ) -> Result<u32, CommandError> {
        check_irq_index::<O>(irq_index)?;
        let mut cmd = self.command(CMDID_GET_IRQ_MASK, flags);
        write_irq_index_request(&mut cmd, irq_index);
        let rsp = self.execute(portal, &cmd)?;
        read_get_irq_mask_response(&rsp).map_err(CommandError::Parse)
    }

    /// Reads the pending causes of `irq_index` selected by `status`.
    pub fn get_irq_status<P: Portal + ?Sized>(
        &self,
        portal: &mut P,
        flags: CommandFlags,
        irq_index: u8,
        status: u32,
    ) -> Result<u32, CommandError> {
        check_irq_index::<O>(irq_index)?;
        let mut cmd = self.command(CMDID_GET_IRQ_STATUS, flags);
        write_get_irq_status_request(&mut cmd, irq_index, status);
        let rsp = self.execute(portal, &cmd)?;
        read_get_irq_status_response(&rsp).map_err(CommandError::Parse)
    }

    /// Clears the pending causes of `irq_index` whose bits are set in
    /// `status`.
    pub fn clear_irq_status<P: Portal + ?Sized>(
        &self,
        portal: &mut P,
        flags: CommandFlags,
        irq_index: u8,
        status: u32,
    ) -> Result<(), CommandError> {
        check_irq_index::<O>(irq_index)?;
        let mut cmd = self.command(CMDID_CLEAR_IRQ_STATUS, flags);
        write_clear_irq_status_request(&mut cmd, irq_index, status);
        self.execute(portal, &cmd).map(drop)
    }
}
