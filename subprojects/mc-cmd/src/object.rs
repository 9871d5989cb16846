//! Object sessions.
//!
//! Every MC object (buffer pool, command portal, crypto interface, container)
//! follows the same lifecycle:
//!
//! ```text
//!            open(id) / create(cfg)
//!   Closed ─────────────────────────▶ Open ──┐ enable, disable, reset,
//!     ▲                                │  ◀──┘ get_attributes, irq ...
//!     └────── close / destroy ─────────┘
//! ```
//!
//! Open and create return a 16-bit token in the response header. The token
//! must be placed in the header of every later command for that object and
//! stops being valid once the session is closed or the object destroyed.
//!
//! [`Session`] wraps the token. It can only be obtained from [`Session::open`]
//! or [`Session::create`], is not `Clone`, and is consumed by
//! [`Session::close`] and [`Session::destroy`], so a closed token cannot be
//! reused by safe code. The origin parameter records how the session was
//! obtained: only sessions that created their object may destroy it.
//!
//! A token is a capability, not a lock. At most one command may be in flight
//! per portal for a given token; the `&mut` portal argument of every operation
//! enforces this for a single portal.

use core::{fmt, marker::PhantomData};

use crate::{
    command::{Command, CommandFlags, CommandId, ParseError, Response},
    field::Field,
    object_type::ObjectTypeName,
    portal::{Portal, SendError, send_command},
    table::CommandSpec,
};

/// Close the session, keep the object.
pub const CMDID_CLOSE: CommandId = CommandId::new(0x800);
/// Close the session and deallocate the object.
pub const CMDID_DESTROY: CommandId = CommandId::new(0x900);
/// Enable the object.
pub const CMDID_ENABLE: CommandId = CommandId::new(0x002);
/// Disable the object.
pub const CMDID_DISABLE: CommandId = CommandId::new(0x003);
/// Read the object's attributes.
pub const CMDID_GET_ATTR: CommandId = CommandId::new(0x004);
/// Reset the object to its post-create state.
pub const CMDID_RESET: CommandId = CommandId::new(0x005);
/// Query whether the object is enabled.
pub const CMDID_IS_ENABLED: CommandId = CommandId::new(0x006);

/// Object ID argument of every open command.
pub const OPEN_ID: Field = Field::new(0, 0, 32);
/// Enable state returned by is-enabled.
pub const IS_ENABLED_RSP_EN: Field = Field::new(0, 0, 1);

/// Response words of is-enabled.
pub const IS_ENABLED_RSP_WORDS: u8 = 1;

/// Table entry of close.
pub const CLOSE_COMMAND: CommandSpec = CommandSpec::new(CMDID_CLOSE, "close", 0, 0);
/// Table entry of destroy.
pub const DESTROY_COMMAND: CommandSpec = CommandSpec::new(CMDID_DESTROY, "destroy", 0, 0);

/// Table entries shared by every type implementing [`Enable`].
pub const ENABLE_COMMANDS: [CommandSpec; 4] = [
    CommandSpec::new(CMDID_ENABLE, "enable", 0, 0),
    CommandSpec::new(CMDID_DISABLE, "disable", 0, 0),
    CommandSpec::new(CMDID_RESET, "reset", 0, 0),
    CommandSpec::new(CMDID_IS_ENABLED, "is_enabled", 0, IS_ENABLED_RSP_WORDS),
];

/// Command-set revision of an object type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version {
    /// Incompatible revision.
    pub major: u16,
    /// Compatible revision.
    pub minor: u16,
}

impl Version {
    /// Creates a version.
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// An MC object type and its command set.
pub trait ObjectType {
    /// Type name as used in object names (`dpbp.3`).
    const TYPE_NAME: ObjectTypeName;
    /// Command ID of open.
    const CMDID_OPEN: CommandId;
    /// Command-set revision implemented by this crate.
    const VERSION: Version;
    /// Every command the type implements.
    const COMMANDS: &'static [CommandSpec];

    /// Attributes returned by get-attributes.
    type Attributes: ObjectAttributes;

    /// Parses the response of get-attributes.
    fn read_attributes(rsp: &Response) -> Result<Self::Attributes, ParseError>;
}

/// Attributes common to every object type.
pub trait ObjectAttributes {
    /// Object ID.
    fn id(&self) -> i32;
    /// Command-set revision implemented by the firmware object.
    fn version(&self) -> Version;
}

/// Object types that can be allocated through a create command.
pub trait Creatable: ObjectType {
    /// Command ID of create.
    const CMDID_CREATE: CommandId;

    /// Creation parameters.
    type Config;

    /// Stores the configuration in a create command.
    fn write_config(cmd: &mut Command, cfg: &Self::Config);
}

/// Object types implementing enable, disable, is-enabled and reset.
pub trait Enable: ObjectType {}

/// Object types with interrupt lines.
pub trait Interrupts: ObjectType {
    /// Number of interrupt lines, addressed `0..IRQ_COUNT`.
    const IRQ_COUNT: u8;
}

mod sealed {
    pub trait Origin {}
}

/// How a session was obtained.
pub trait Origin: sealed::Origin {}

/// Session bound to an existing object with open.
#[derive(Debug)]
pub enum Opened {}

/// Session of an object allocated with create.
#[derive(Debug)]
pub enum Created {}

impl sealed::Origin for Opened {}
impl sealed::Origin for Created {}
impl Origin for Opened {}
impl Origin for Created {}

/// Open control session of an object of type `O`.
pub struct Session<O, S = Opened> {
    token: u16,
    _marker: PhantomData<fn() -> (O, S)>,
}

impl<O, S> fmt::Debug for Session<O, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}

impl<O: ObjectType> Session<O, Opened> {
    /// Opens a control session for the existing object `id`.
    pub fn open<P: Portal + ?Sized>(
        portal: &mut P,
        flags: CommandFlags,
        id: i32,
    ) -> Result<Self, CommandError> {
        let mut cmd = Command::new(O::CMDID_OPEN, flags, 0);
        cmd.set(OPEN_ID, id);

        let rsp = send_command(portal, &cmd).map_err(CommandError::Send)?;
        let token = rsp.token();
        log::info!("{}.{}: opened (token {:#x})", O::TYPE_NAME, id, token);

        Ok(Self::from_token(token))
    }
}

impl<O: Creatable> Session<O, Created> {
    /// Allocates a new object and opens a control session for it.
    ///
    /// The ID of the new object is reported by [`Session::get_attributes`].
    pub fn create<P: Portal + ?Sized>(
        portal: &mut P,
        flags: CommandFlags,
        cfg: &O::Config,
    ) -> Result<Self, CommandError> {
        let mut cmd = Command::new(O::CMDID_CREATE, flags, 0);
        O::write_config(&mut cmd, cfg);

        let rsp = send_command(portal, &cmd).map_err(CommandError::Send)?;
        let token = rsp.token();
        log::info!("{}: created (token {:#x})", O::TYPE_NAME, token);

        Ok(Self::from_token(token))
    }

    /// Closes the session and deallocates the object.
    ///
    /// On failure the session is handed back unchanged.
    pub fn destroy<P: Portal + ?Sized>(
        self,
        portal: &mut P,
        flags: CommandFlags,
    ) -> Result<(), ReleaseError<Self>> {
        let cmd = self.command(CMDID_DESTROY, flags);
        match send_command(portal, &cmd) {
            Ok(_) => {
                log::info!("{}: destroyed (token {:#x})", O::TYPE_NAME, self.token);
                Ok(())
            }
            Err(err) => Err(ReleaseError {
                session: self,
                source: CommandError::Send(err),
            }),
        }
    }
}

impl<O: ObjectType, S: Origin> Session<O, S> {
    fn from_token(token: u16) -> Self {
        Self {
            token,
            _marker: PhantomData,
        }
    }

    /// Returns the raw token, for diagnostics.
    #[inline]
    pub fn token(&self) -> u16 {
        self.token
    }

    /// Starts a command addressed to this session.
    #[inline]
    pub fn command(&self, id: CommandId, flags: CommandFlags) -> Command {
        Command::new(id, flags, self.token)
    }

    /// Sends a command built with [`Session::command`].
    #[inline]
    pub fn execute<P: Portal + ?Sized>(
        &self,
        portal: &mut P,
        cmd: &Command,
    ) -> Result<Response, CommandError> {
        debug_assert_eq!(cmd.token(), self.token, "command built for another session");
        send_command(portal, cmd).map_err(CommandError::Send)
    }

    /// Closes the session. The object stays allocated.
    ///
    /// On failure the session is handed back unchanged.
    pub fn close<P: Portal + ?Sized>(
        self,
        portal: &mut P,
        flags: CommandFlags,
    ) -> Result<(), ReleaseError<Self>> {
        let cmd = self.command(CMDID_CLOSE, flags);
        match send_command(portal, &cmd) {
            Ok(_) => {
                log::info!("{}: closed (token {:#x})", O::TYPE_NAME, self.token);
                Ok(())
            }
            Err(err) => Err(ReleaseError {
                session: self,
                source: CommandError::Send(err),
            }),
        }
    }

    /// Reads the object's attributes.
    pub fn get_attributes<P: Portal + ?Sized>(
        &self,
        portal: &mut P,
        flags: CommandFlags,
    ) -> Result<O::Attributes, CommandError> {
        let cmd = self.command(CMDID_GET_ATTR, flags);
        let rsp = self.execute(portal, &cmd)?;
        O::read_attributes(&rsp).map_err(CommandError::Parse)
    }
}

impl<O: Enable, S: Origin> Session<O, S> {
    /// Enables the object.
    pub fn enable<P: Portal + ?Sized>(
        &self,
        portal: &mut P,
        flags: CommandFlags,
    ) -> Result<(), CommandError> {
        self.execute(portal, &self.command(CMDID_ENABLE, flags))
            .map(drop)
    }

    /// Disables the object.
    pub fn disable<P: Portal + ?Sized>(
        &self,
        portal: &mut P,
        flags: CommandFlags,
    ) -> Result<(), CommandError> {
        self.execute(portal, &self.command(CMDID_DISABLE, flags))
            .map(drop)
    }

    /// Returns whether the object is enabled.
    pub fn is_enabled<P: Portal + ?Sized>(
        &self,
        portal: &mut P,
        flags: CommandFlags,
    ) -> Result<bool, CommandError> {
        let rsp = self.execute(portal, &self.command(CMDID_IS_ENABLED, flags))?;
        read_is_enabled_response(&rsp).map_err(CommandError::Parse)
    }

    /// Resets the object. The session stays open.
    pub fn reset<P: Portal + ?Sized>(
        &self,
        portal: &mut P,
        flags: CommandFlags,
    ) -> Result<(), CommandError> {
        self.execute(portal, &self.command(CMDID_RESET, flags))
            .map(drop)
    }
}

/// Parses the response of is-enabled.
pub fn read_is_enabled_response(rsp: &Response) -> Result<bool, ParseError> {
    let params = rsp.expect_words(IS_ENABLED_RSP_WORDS as usize)?;
    Ok(IS_ENABLED_RSP_EN.read(params))
}

/// Encodes the response of is-enabled.
pub fn write_is_enabled_response(rsp: &mut Response, enabled: bool) {
    rsp.set(IS_ENABLED_RSP_EN, enabled);
}

/// Decodes the object ID of an open command.
pub fn read_open_request(cmd: &Command) -> i32 {
    cmd.get(OPEN_ID)
}

/// Checks that a firmware object implements the command-set revision of `O`.
///
/// The major versions must match. An older minor version is accepted with a
/// warning, since newer minor revisions only add commands.
pub fn check_version<O: ObjectType>(found: Version) -> Result<(), CommandError> {
    if found.major != O::VERSION.major {
        return Err(CommandError::UnsupportedVersion {
            object: O::TYPE_NAME,
            found,
            expected: O::VERSION,
        });
    }
    if found.minor < O::VERSION.minor {
        log::warn!(
            "{}: firmware object version {} is older than {}",
            O::TYPE_NAME,
            found,
            O::VERSION
        );
    }
    Ok(())
}

/// Error returned by session operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// Failed to send the command.
    #[error("failed to send command")]
    Send(#[source] SendError),
    /// Failed to parse the response.
    #[error("failed to parse response")]
    Parse(#[source] ParseError),
    /// Interrupt index beyond the object's interrupt lines.
    #[error("irq index {index} out of range, object has {count} interrupt lines")]
    IrqIndex {
        /// Requested index.
        index: u8,
        /// Number of lines of the object type.
        count: u8,
    },
    /// Firmware object implements an incompatible command set.
    #[error("unsupported {object} version {found}, expected {expected}")]
    UnsupportedVersion {
        /// Object type.
        object: ObjectTypeName,
        /// Version reported by the firmware.
        found: Version,
        /// Version implemented by this crate.
        expected: Version,
    },
}

impl CommandError {
    /// Returns whether the firmware rejected the session token.
    pub fn is_invalid_session(&self) -> bool {
        matches!(self, Self::Send(SendError::InvalidToken(_)))
    }
}

/// Error returned by [`Session::close`] and [`Session::destroy`].
///
/// Carries the session back so the caller can retry or close it later.
#[derive(thiserror::Error)]
#[error("failed to release session")]
pub struct ReleaseError<T> {
    /// The session, still open.
    pub session: T,
    /// Why the release failed.
    #[source]
    pub source: CommandError,
}

impl<T> ReleaseError<T> {
    /// Returns the session that could not be released.
    pub fn into_session(self) -> T {
        self.session
    }

    /// Wraps the carried session, keeping the cause.
    pub fn map_session<U>(self, f: impl FnOnce(T) -> U) -> ReleaseError<U> {
        ReleaseError {
            session: f(self.session),
            source: self.source,
        }
    }
}

impl<T> fmt::Debug for ReleaseError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleaseError")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        command::Status,
        object_type::ObjectTypeName,
        portal::TransportError,
        table::CommandSpec,
    };

    const ATTR_RSP_ID: Field = Field::new(0, 0, 32);

    struct Widget;

    #[derive(Debug)]
    struct WidgetAttr {
        id: i32,
    }

    impl ObjectAttributes for WidgetAttr {
        fn id(&self) -> i32 {
            self.id
        }

        fn version(&self) -> Version {
            Widget::VERSION
        }
    }

    impl ObjectType for Widget {
        const TYPE_NAME: ObjectTypeName = ObjectTypeName::from_static("wdg");
        const CMDID_OPEN: CommandId = CommandId::new(0x8ff);
        const VERSION: Version = Version::new(1, 2);
        const COMMANDS: &'static [CommandSpec] = &[];

        type Attributes = WidgetAttr;

        fn read_attributes(rsp: &Response) -> Result<WidgetAttr, ParseError> {
            let params = rsp.expect_words(1)?;
            Ok(WidgetAttr {
                id: ATTR_RSP_ID.read(params),
            })
        }
    }

    impl Creatable for Widget {
        const CMDID_CREATE: CommandId = CommandId::new(0x9ff);
        type Config = u8;

        fn write_config(cmd: &mut Command, cfg: &u8) {
            cmd.set(Field::new(0, 8, 8), *cfg);
        }
    }

    impl Enable for Widget {}

    /// Records every command and answers with a scripted status.
    struct Recorder {
        sent: [Option<Command>; 8],
        count: usize,
        status: Status,
        token: u16,
    }

    impl Recorder {
        fn new() -> Self {
            Self {
                sent: [None; 8],
                count: 0,
                status: Status::Ok,
                token: 0x2A,
            }
        }

        fn last(&self) -> Command {
            self.sent[self.count - 1].unwrap()
        }
    }

    impl Portal for Recorder {
        fn send(&mut self, cmd: &Command) -> Result<Response, TransportError> {
            self.sent[self.count] = Some(*cmd);
            self.count += 1;
            let mut rsp = Response::new(cmd, self.status);
            if cmd.id() == Widget::CMDID_OPEN || cmd.id() == Widget::CMDID_CREATE {
                rsp.set_token(self.token);
            }
            if cmd.id() == CMDID_GET_ATTR {
                rsp.set(ATTR_RSP_ID, 17i32);
            }
            if cmd.id() == CMDID_IS_ENABLED {
                write_is_enabled_response(&mut rsp, true);
            }
            Ok(rsp)
        }
    }

    #[test]
    fn test_open_encodes_id_and_returns_token() {
        let mut portal = Recorder::new();
        let session = Session::<Widget>::open(&mut portal, CommandFlags::empty(), 3).unwrap();

        let cmd = portal.last();
        assert_eq!(cmd.id(), Widget::CMDID_OPEN);
        assert_eq!(cmd.token(), 0);
        assert_eq!(read_open_request(&cmd), 3);
        assert_eq!(session.token(), 0x2A);
    }

    #[test]
    fn test_commands_carry_session_token() {
        let mut portal = Recorder::new();
        let session = Session::<Widget>::open(&mut portal, CommandFlags::empty(), 3).unwrap();

        assert!(session.is_enabled(&mut portal, CommandFlags::empty()).unwrap());
        session.reset(&mut portal, CommandFlags::empty()).unwrap();
        let attr = session.get_attributes(&mut portal, CommandFlags::empty()).unwrap();
        assert_eq!(attr.id(), 17);

        for cmd in portal.sent.iter().skip(1).flatten() {
            assert_eq!(cmd.token(), 0x2A);
        }
    }

    #[test]
    fn test_close_is_header_only() {
        let mut portal = Recorder::new();
        let session = Session::<Widget>::open(&mut portal, CommandFlags::empty(), 3).unwrap();
        session.close(&mut portal, CommandFlags::empty()).unwrap();

        let cmd = portal.last();
        assert_eq!(cmd.id(), CMDID_CLOSE);
        assert!(cmd.params().is_empty());
    }

    #[test]
    fn test_create_then_destroy() {
        let mut portal = Recorder::new();
        let session = Session::<Widget, Created>::create(&mut portal, CommandFlags::empty(), &9)
            .unwrap();
        assert_eq!(portal.last().raw_params()[0], 9 << 8);

        session.destroy(&mut portal, CommandFlags::empty()).unwrap();
        assert_eq!(portal.last().id(), CMDID_DESTROY);
        assert_eq!(portal.last().token(), 0x2A);
    }

    #[test]
    fn test_failed_close_returns_session() {
        let mut portal = Recorder::new();
        let session = Session::<Widget>::open(&mut portal, CommandFlags::empty(), 3).unwrap();

        portal.status = Status::Busy;
        let err = session.close(&mut portal, CommandFlags::empty()).unwrap_err();
        assert!(!err.source.is_invalid_session());

        portal.status = Status::Ok;
        let session = err.into_session();
        assert_eq!(session.token(), 0x2A);
        session.close(&mut portal, CommandFlags::empty()).unwrap();
    }

    #[test]
    fn test_rejected_token_is_session_error() {
        let mut portal = Recorder::new();
        let session = Session::<Widget>::open(&mut portal, CommandFlags::empty(), 3).unwrap();
        portal.status = Status::AuthError;
        let err = session.enable(&mut portal, CommandFlags::empty()).unwrap_err();
        assert!(err.is_invalid_session());
    }

    #[test]
    fn test_truncated_attributes() {
        let cmd = Command::new(CMDID_GET_ATTR, CommandFlags::empty(), 1);
        let rsp = Response::new(&cmd, Status::Ok);
        assert!(matches!(
            Widget::read_attributes(&rsp),
            Err(ParseError::Truncated { expected: 1, actual: 0, .. })
        ));
    }

    #[test]
    fn test_check_version() {
        assert!(check_version::<Widget>(Version::new(1, 2)).is_ok());
        assert!(check_version::<Widget>(Version::new(1, 0)).is_ok());
        assert!(check_version::<Widget>(Version::new(1, 7)).is_ok());
        assert!(matches!(
            check_version::<Widget>(Version::new(2, 2)),
            Err(CommandError::UnsupportedVersion { .. })
        ));
    }
}
