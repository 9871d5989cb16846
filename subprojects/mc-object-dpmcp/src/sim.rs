//! Emulator model of DPMCP objects.

use log::debug;
use mc_cmd::{Command, Response, Status, object::CMDID_GET_ATTR};
use mc_sim::{NewObject, ObjectClass, ObjectModel};

use crate::{DPMCP_GET_PORTAL_ID_FROM_POOL, Dpmcp, DpmcpAttr, VERSION, cmd};

/// Emulated DPMCP object. The object ID is the portal ID.
#[derive(Debug, Default)]
pub struct DpmcpModel;

impl ObjectModel for DpmcpModel {
    fn handle(&mut self, id: i32, cmd: &Command, rsp: &mut Response) -> Result<(), Status> {
        match cmd.id() {
            CMDID_GET_ATTR => {
                cmd::write_attributes_response(rsp, &DpmcpAttr { id, version: VERSION });
                Ok(())
            }
            _ => Err(Status::UnsupportedOp),
        }
    }
}

fn declare() -> Box<dyn ObjectModel> {
    Box::new(DpmcpModel)
}

fn create(cmd: &Command) -> Result<NewObject, Status> {
    let requested_id = match cmd::read_create_request(cmd).portal_id {
        DPMCP_GET_PORTAL_ID_FROM_POOL => None,
        id if id >= 0 => Some(id),
        _ => return Err(Status::ConfigError),
    };
    debug!("dpmcp: create, portal {requested_id:?}");
    Ok(NewObject {
        requested_id,
        model: Box::new(DpmcpModel),
    })
}

/// Registration of the DPMCP type.
pub fn class() -> ObjectClass {
    ObjectClass::new::<Dpmcp>(declare)
        .with_irqs::<Dpmcp>()
        .creatable::<Dpmcp>(create)
}

#[cfg(test)]
mod tests {
    use mc_cmd::{CommandError, CommandFlags, Created, ObjectType, SendError};
    use mc_sim::Emulator;

    use super::*;
    use crate::{DpmcpConfig, DpmcpSession};

    const FLAGS: CommandFlags = CommandFlags::empty();

    fn emulator() -> Emulator {
        Emulator::builder()
            .class(class())
            .object(Dpmcp::TYPE_NAME, 0)
            .build()
            .unwrap()
    }

    #[test]
    fn test_create_with_portal_id() {
        let mut mc = emulator();
        let cfg = DpmcpConfig { portal_id: 6 };
        let dpmcp = DpmcpSession::<Created>::create(&mut mc, FLAGS, &cfg).unwrap();
        assert_eq!(dpmcp.get_attributes(&mut mc, FLAGS).unwrap().id, 6);

        let err = DpmcpSession::<Created>::create(&mut mc, FLAGS, &cfg).unwrap_err();
        assert!(matches!(
            err,
            CommandError::Send(SendError::Status {
                status: Status::ConfigError,
                ..
            })
        ));
        dpmcp.destroy(&mut mc, FLAGS).unwrap();
    }

    #[test]
    fn test_create_from_pool() {
        let mut mc = emulator();
        let dpmcp = DpmcpSession::<Created>::create(&mut mc, FLAGS, &DpmcpConfig::default())
            .unwrap();
        assert_eq!(dpmcp.get_attributes(&mut mc, FLAGS).unwrap().id, 1);
    }

    #[test]
    fn test_enable_is_unsupported() {
        let mut mc = emulator();
        let dpmcp = DpmcpSession::open(&mut mc, FLAGS, 0).unwrap();
        let cmd = dpmcp.command(mc_cmd::object::CMDID_ENABLE, FLAGS);
        assert!(matches!(
            dpmcp.execute(&mut mc, &cmd),
            Err(CommandError::Send(SendError::Status {
                status: Status::UnsupportedOp,
                ..
            }))
        ));
    }
}
