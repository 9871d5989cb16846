//! MC command buffer: header word, parameter words and wire image.
//!
//! Every exchange with the Management Complex is one fixed-size frame:
//!
//! ```text
//! Offset  Size   Field
//! ─────────────────────────────────────────────
//! 0x00    0x08   Header (id, token, status, flags)
//! 0x08    0x38   Parameters (7 × u64)
//! ─────────────────────────────────────────────
//! ```
//!
//! The response reuses the request frame: the management processor echoes the
//! header with the status byte filled in and overwrites the parameter words
//! with the command's output.
//!
//! Parameter words are handled in native order. The little-endian wire image
//! is produced and consumed only by [`Command::to_wire`],
//! [`Command::from_wire`], [`Response::to_wire`] and [`Response::from_wire`].

use core::{fmt, mem::size_of};

use bitflags::bitflags;
use modular_bitfield::prelude::*;
use static_assertions::const_assert_eq;

use crate::field::{Field, FieldValue};

/// Number of parameter words following the header.
pub const MC_CMD_NUM_OF_PARAMS: usize = 7;

/// Size in bytes of a complete frame on the wire.
pub const MC_CMD_FRAME_SIZE: usize = (MC_CMD_NUM_OF_PARAMS + 1) * size_of::<u64>();

const_assert_eq!(MC_CMD_FRAME_SIZE, 64);

/// Parameter words of a command or response.
pub type Params = [u64; MC_CMD_NUM_OF_PARAMS];

/// 12-bit command identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct CommandId(u16);

impl CommandId {
    /// Largest representable command identifier.
    pub const MAX: u16 = 0xFFF;

    /// Creates a command ID.
    ///
    /// # Panics
    ///
    /// Panics (at compile time in a `const`) if `raw` does not fit in 12 bits.
    pub const fn new(raw: u16) -> Self {
        assert!(raw <= Self::MAX, "command id must fit in 12 bits");
        Self(raw)
    }

    /// Returns the raw 12-bit value.
    #[inline]
    pub const fn to_raw(self) -> u16 {
        self.0
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#05x}", self.0)
    }
}

/// Command header word.
#[bitfield]
#[derive(Debug, Clone, Copy, Default)]
#[repr(C)]
pub struct Header {
    /// Source identifier, filled by the portal hardware.
    pub src_id: B8,
    /// Hardware flags (priority).
    pub flags_hw: B8,
    /// Completion status, see [`Status`].
    pub status: B8,
    /// Software flags (interrupt disable).
    pub flags_sw: B8,
    /// Session token of the addressed object.
    pub token: B16,
    #[skip]
    __reserved: B4,
    /// Command identifier.
    pub cmd_id: B12,
}

const_assert_eq!(size_of::<Header>(), 8);

impl Header {
    /// Decodes a header from its native-order word.
    #[inline]
    pub fn from_word(word: u64) -> Self {
        Self::from_bytes(word.to_le_bytes())
    }

    /// Encodes the header as a native-order word.
    #[inline]
    pub fn to_word(self) -> u64 {
        u64::from_le_bytes(self.into_bytes())
    }

    /// Returns the command identifier.
    #[inline]
    pub fn command_id(&self) -> CommandId {
        CommandId(self.cmd_id())
    }
}

bitflags! {
    /// Per-command flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[repr(transparent)]
    pub struct CommandFlags: u8 {
        /// High priority command (hardware flag byte).
        const PRIORITY = 0x80;
        /// Do not raise a completion interrupt (software flag byte).
        const INTR_DIS = 0x04;
    }
}

/// Completion status reported by the management processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Status {
    /// Completed successfully.
    Ok = 0x0,
    /// Command is ready to be processed (set on requests).
    Ready = 0x1,
    /// Invalid or closed authentication token.
    AuthError = 0x3,
    /// The portal lacks the privilege for this command.
    NoPrivilege = 0x4,
    /// DMA or I/O error.
    DmaError = 0x5,
    /// Invalid configuration.
    ConfigError = 0x6,
    /// Command timed out inside the firmware.
    Timeout = 0x7,
    /// No resources available.
    NoResource = 0x8,
    /// No memory available.
    NoMemory = 0x9,
    /// Object or firmware is busy.
    Busy = 0xA,
    /// Command ID is not supported.
    UnsupportedOp = 0xB,
    /// Object is in the wrong state for this command.
    InvalidState = 0xC,
    /// Status byte not defined by the protocol.
    Unknown = 0xFF,
}

impl Status {
    /// Converts a raw status byte.
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            0x0 => Self::Ok,
            0x1 => Self::Ready,
            0x3 => Self::AuthError,
            0x4 => Self::NoPrivilege,
            0x5 => Self::DmaError,
            0x6 => Self::ConfigError,
            0x7 => Self::Timeout,
            0x8 => Self::NoResource,
            0x9 => Self::NoMemory,
            0xA => Self::Busy,
            0xB => Self::UnsupportedOp,
            0xC => Self::InvalidState,
            _ => Self::Unknown,
        }
    }

    /// Returns the raw status byte.
    #[inline]
    pub const fn to_raw(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let desc = match self {
            Self::Ok => "success",
            Self::Ready => "ready",
            Self::AuthError => "authentication error",
            Self::NoPrivilege => "no privilege",
            Self::DmaError => "DMA or I/O error",
            Self::ConfigError => "configuration error",
            Self::Timeout => "operation timed out",
            Self::NoResource => "resource not available",
            Self::NoMemory => "not enough memory",
            Self::Busy => "device busy",
            Self::UnsupportedOp => "unsupported operation",
            Self::InvalidState => "invalid state",
            Self::Unknown => "unknown status",
        };
        f.write_str(desc)
    }
}

/// A command on its way to the management processor.
#[derive(Debug, Clone, Copy)]
pub struct Command {
    header: Header,
    params: Params,
    len: u8,
}

impl Command {
    /// Starts a header-only command addressed to `token`.
    pub fn new(id: CommandId, flags: CommandFlags, token: u16) -> Self {
        let mut header = Header::new()
            .with_cmd_id(id.to_raw())
            .with_token(token)
            .with_status(Status::Ready.to_raw());
        if flags.contains(CommandFlags::PRIORITY) {
            header.set_flags_hw(CommandFlags::PRIORITY.bits());
        }
        if flags.contains(CommandFlags::INTR_DIS) {
            header.set_flags_sw(CommandFlags::INTR_DIS.bits());
        }

        Self {
            header,
            params: [0; MC_CMD_NUM_OF_PARAMS],
            len: 0,
        }
    }

    /// Stores `value` at `field`, extending the used word count if needed.
    #[inline]
    pub fn set<T: FieldValue>(&mut self, field: Field, value: T) -> &mut Self {
        field.write(&mut self.params, value);
        self.len = self.len.max(field.word() as u8 + 1);
        self
    }

    /// Reads `field` from the parameter words.
    #[inline]
    pub fn get<T: FieldValue>(&self, field: Field) -> T {
        field.read(&self.params)
    }

    /// Returns the header word.
    #[inline]
    pub fn header(&self) -> Header {
        self.header
    }

    /// Returns the command identifier.
    #[inline]
    pub fn id(&self) -> CommandId {
        self.header.command_id()
    }

    /// Returns the session token carried in the header.
    #[inline]
    pub fn token(&self) -> u16 {
        self.header.token()
    }

    /// Returns the flags encoded in the header.
    pub fn flags(&self) -> CommandFlags {
        CommandFlags::from_bits_truncate(self.header.flags_hw())
            | CommandFlags::from_bits_truncate(self.header.flags_sw())
    }

    /// Returns the parameter words in use.
    #[inline]
    pub fn params(&self) -> &[u64] {
        &self.params[..self.len as usize]
    }

    /// Returns all parameter words, including unused (zero) ones.
    #[inline]
    pub fn raw_params(&self) -> &Params {
        &self.params
    }

    /// Encodes the command as a little-endian frame.
    pub fn to_wire(&self) -> [u8; MC_CMD_FRAME_SIZE] {
        encode_frame(self.header, &self.params)
    }

    /// Decodes a frame. Missing trailing parameter words read as zero.
    pub fn from_wire(bytes: &[u8]) -> Result<Self, WireError> {
        let (header, params, len) = decode_frame(bytes)?;
        Ok(Self {
            header,
            params,
            len,
        })
    }
}

/// A response returned by the management processor.
#[derive(Debug, Clone, Copy)]
pub struct Response {
    header: Header,
    params: Params,
    len: u8,
}

impl Response {
    /// Starts a response to `cmd` with the given completion status.
    ///
    /// The header is echoed from the command and no parameter word is set.
    pub fn new(cmd: &Command, status: Status) -> Self {
        let mut header = cmd.header();
        header.set_status(status.to_raw());
        Self {
            header,
            params: [0; MC_CMD_NUM_OF_PARAMS],
            len: 0,
        }
    }

    /// Stores `value` at `field`, extending the used word count if needed.
    #[inline]
    pub fn set<T: FieldValue>(&mut self, field: Field, value: T) -> &mut Self {
        field.write(&mut self.params, value);
        self.len = self.len.max(field.word() as u8 + 1);
        self
    }

    /// Overrides the token echoed in the header.
    ///
    /// Used by open and create, which return the new session token here.
    #[inline]
    pub fn set_token(&mut self, token: u16) {
        self.header.set_token(token);
    }

    /// Returns the header word.
    #[inline]
    pub fn header(&self) -> Header {
        self.header
    }

    /// Returns the command identifier echoed by the firmware.
    #[inline]
    pub fn id(&self) -> CommandId {
        self.header.command_id()
    }

    /// Returns the token field of the header.
    #[inline]
    pub fn token(&self) -> u16 {
        self.header.token()
    }

    /// Returns the completion status.
    #[inline]
    pub fn status(&self) -> Status {
        Status::from_raw(self.header.status())
    }

    /// Number of parameter words carried by the response.
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Returns whether the response carries no parameter word.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the parameter words in use.
    #[inline]
    pub fn params(&self) -> &[u64] {
        &self.params[..self.len as usize]
    }

    /// Returns the parameter words after checking the response carries at
    /// least `words` of them.
    pub fn expect_words(&self, words: usize) -> Result<&Params, ParseError> {
        if self.len() < words {
            return Err(ParseError::Truncated {
                command: self.id(),
                expected: words,
                actual: self.len(),
            });
        }
        Ok(&self.params)
    }

    /// Encodes the response as a little-endian frame.
    pub fn to_wire(&self) -> [u8; MC_CMD_FRAME_SIZE] {
        encode_frame(self.header, &self.params)
    }

    /// Decodes a frame. The word count is taken from the frame length.
    pub fn from_wire(bytes: &[u8]) -> Result<Self, WireError> {
        let (header, params, len) = decode_frame(bytes)?;
        Ok(Self {
            header,
            params,
            len,
        })
    }
}

fn encode_frame(header: Header, params: &Params) -> [u8; MC_CMD_FRAME_SIZE] {
    let mut frame = [0u8; MC_CMD_FRAME_SIZE];
    let (head, body) = frame.split_at_mut(size_of::<u64>());
    head.copy_from_slice(&header.to_word().to_le_bytes());
    for (chunk, word) in body.chunks_exact_mut(size_of::<u64>()).zip(params) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
    frame
}

fn decode_frame(bytes: &[u8]) -> Result<(Header, Params, u8), WireError> {
    if bytes.len() < size_of::<u64>()
        || bytes.len() > MC_CMD_FRAME_SIZE
        || bytes.len() % size_of::<u64>() != 0
    {
        return Err(WireError::InvalidLength(bytes.len()));
    }

    let mut words = bytes.chunks_exact(size_of::<u64>()).map(|chunk| {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(chunk);
        u64::from_le_bytes(raw)
    });

    // Length was checked above, the header word is always present.
    let header = Header::from_word(words.next().unwrap_or_default());
    let mut params = [0u64; MC_CMD_NUM_OF_PARAMS];
    let mut len = 0u8;
    for (slot, word) in params.iter_mut().zip(words) {
        *slot = word;
        len += 1;
    }
    Ok((header, params, len))
}

/// Error returned when decoding a wire frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    /// Frame is not a whole number of words between 8 and 64 bytes.
    #[error("invalid frame length: {0} bytes")]
    InvalidLength(usize),
}

/// Error returned when a response cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Response carries fewer parameter words than the command declares.
    #[error("response to command {command} truncated: expected {expected} words, got {actual}")]
    Truncated {
        /// Command the response belongs to.
        command: CommandId,
        /// Declared response word count.
        expected: usize,
        /// Words actually received.
        actual: usize,
    },
    /// A field holds a value outside its enumeration.
    #[error("invalid value {value:#x} for field `{field}`")]
    InvalidValue {
        /// Name of the offending field.
        field: &'static str,
        /// Raw value found in the response.
        value: u64,
    },
}
