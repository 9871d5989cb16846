//! Transport seam between the command codec and the management processor.
//!
//! A [`Portal`] delivers one [`Command`] and blocks until the matching
//! [`Response`] is available. How it gets there (MMIO portal, kernel driver,
//! emulator) is the implementor's business.
//!
//! `send` takes `&mut self`, so a portal carries at most one outstanding
//! command at a time. Callers that share a portal between threads must
//! serialize access to it themselves.

use crate::command::{Command, CommandId, Response, Status};

/// Synchronous command channel to the management processor.
pub trait Portal {
    /// Sends `cmd` and waits for its response.
    ///
    /// Implementations return the response as received, whatever its status;
    /// status interpretation happens in [`send_command`].
    fn send(&mut self, cmd: &Command) -> Result<Response, TransportError>;
}

impl<P: Portal + ?Sized> Portal for &mut P {
    #[inline]
    fn send(&mut self, cmd: &Command) -> Result<Response, TransportError> {
        (**self).send(cmd)
    }
}

/// Sends `cmd` through `portal` and checks the completion status.
///
/// A status of [`Status::AuthError`] means the token in the header does not
/// name an open session and is reported as [`SendError::InvalidToken`].
pub fn send_command<P: Portal + ?Sized>(
    portal: &mut P,
    cmd: &Command,
) -> Result<Response, SendError> {
    log::debug!(
        "mc: sending command {} token {:#x} ({} words)",
        cmd.id(),
        cmd.token(),
        cmd.params().len()
    );
    log::trace!("mc: params {:x?}", cmd.params());

    let rsp = portal.send(cmd).map_err(SendError::Transport)?;

    if rsp.id() != cmd.id() {
        return Err(SendError::Mismatch {
            sent: cmd.id(),
            received: rsp.id(),
        });
    }

    match rsp.status() {
        Status::Ok => Ok(rsp),
        Status::AuthError => Err(SendError::InvalidToken(cmd.token())),
        status => {
            log::debug!("mc: command {} failed: {}", cmd.id(), status);
            Err(SendError::Status {
                command: cmd.id(),
                status,
            })
        }
    }
}

/// Error raised by a [`Portal`] implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The portal is still processing a previous command.
    #[error("portal busy")]
    Busy,
    /// No response arrived in time.
    #[error("timed out waiting for response")]
    Timeout,
    /// The underlying driver reported an OS error.
    #[error("transport failure (errno {0})")]
    Os(i32),
    /// The response frame could not be decoded.
    #[error("malformed response frame")]
    Malformed(#[source] crate::command::WireError),
}

/// Error returned by [`send_command`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SendError {
    /// The transport failed to deliver the command.
    #[error("failed to send command")]
    Transport(#[source] TransportError),
    /// The token does not name an open session.
    #[error("invalid or closed session token {0:#x}")]
    InvalidToken(u16),
    /// The management processor rejected the command.
    #[error("command {command} failed: {status}")]
    Status {
        /// Command that failed.
        command: CommandId,
        /// Completion status reported by the firmware.
        status: Status,
    },
    /// The response belongs to another command.
    #[error("response to {received} received for command {sent}")]
    Mismatch {
        /// Command that was sent.
        sent: CommandId,
        /// Command echoed in the response header.
        received: CommandId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandFlags;
    use crate::field::Field;

    struct Echo {
        status: Status,
        id_override: Option<CommandId>,
        fail: Option<TransportError>,
    }

    impl Portal for Echo {
        fn send(&mut self, cmd: &Command) -> Result<Response, TransportError> {
            if let Some(err) = self.fail {
                return Err(err);
            }
            let echoed = match self.id_override {
                Some(id) => Command::new(id, CommandFlags::empty(), cmd.token()),
                None => *cmd,
            };
            let mut rsp = Response::new(&echoed, self.status);
            rsp.set(Field::new(0, 0, 32), 1u32);
            Ok(rsp)
        }
    }

    fn echo(status: Status) -> Echo {
        Echo {
            status,
            id_override: None,
            fail: None,
        }
    }

    const CMD: CommandId = CommandId::new(0x004);

    #[test]
    fn test_send_ok() {
        let cmd = Command::new(CMD, CommandFlags::empty(), 5);
        let rsp = send_command(&mut echo(Status::Ok), &cmd).unwrap();
        assert_eq!(rsp.params(), &[1]);
    }

    #[test]
    fn test_auth_error_is_invalid_token() {
        let cmd = Command::new(CMD, CommandFlags::empty(), 5);
        let err = send_command(&mut echo(Status::AuthError), &cmd).unwrap_err();
        assert_eq!(err, SendError::InvalidToken(5));
    }

    #[test]
    fn test_other_status_is_reported() {
        let cmd = Command::new(CMD, CommandFlags::empty(), 5);
        let err = send_command(&mut echo(Status::UnsupportedOp), &cmd).unwrap_err();
        assert_eq!(
            err,
            SendError::Status {
                command: CMD,
                status: Status::UnsupportedOp,
            }
        );
    }

    #[test]
    fn test_transport_error_propagates_unchanged() {
        let mut portal = Echo {
            fail: Some(TransportError::Os(-5)),
            ..echo(Status::Ok)
        };
        let cmd = Command::new(CMD, CommandFlags::empty(), 5);
        let err = send_command(&mut portal, &cmd).unwrap_err();
        assert_eq!(err, SendError::Transport(TransportError::Os(-5)));
    }

    #[test]
    fn test_mismatched_response() {
        let mut portal = Echo {
            id_override: Some(CommandId::new(0x005)),
            ..echo(Status::Ok)
        };
        let cmd = Command::new(CMD, CommandFlags::empty(), 5);
        let err = send_command(&mut portal, &cmd).unwrap_err();
        assert!(matches!(err, SendError::Mismatch { .. }));
    }
}
