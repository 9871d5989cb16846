//! Emulator model of DPRC objects.

use log::debug;
use mc_cmd::{Command, Response, Status, object::CMDID_GET_ATTR};
use mc_sim::{ObjectClass, ObjectModel};

use crate::{Dprc, DprcAttr, DprcOptions, VERSION, cmd};

/// Emulated DPRC object.
#[derive(Debug, Clone, Copy)]
pub struct DprcModel {
    pub icid: u16,
    pub options: DprcOptions,
    pub portal_id: i32,
}

impl Default for DprcModel {
    fn default() -> Self {
        Self {
            icid: 0,
            options: DprcOptions::SPAWN_ALLOWED
                | DprcOptions::ALLOC_ALLOWED
                | DprcOptions::OBJ_CREATE_ALLOWED
                | DprcOptions::IRQ_CFG_ALLOWED,
            portal_id: 0,
        }
    }
}

impl ObjectModel for DprcModel {
    fn handle(&mut self, id: i32, cmd: &Command, rsp: &mut Response) -> Result<(), Status> {
        match cmd.id() {
            CMDID_GET_ATTR => {
                debug!("dprc.{id}: attributes");
                cmd::write_attributes_response(
                    rsp,
                    &DprcAttr {
                        container_id: id,
                        icid: self.icid,
                        options: self.options,
                        portal_id: self.portal_id,
                        version: VERSION,
                    },
                );
                Ok(())
            }
            _ => Err(Status::UnsupportedOp),
        }
    }
}

fn declare() -> Box<dyn ObjectModel> {
    Box::new(DprcModel::default())
}

/// Registration of the DPRC type.
pub fn class() -> ObjectClass {
    ObjectClass::new::<Dprc>(declare)
}

#[cfg(test)]
mod tests {
    use mc_cmd::{CommandError, CommandFlags, ObjectType, SendError, irq::CMDID_SET_IRQ, mng};
    use mc_sim::Emulator;

    use super::*;
    use crate::DprcSession;

    const FLAGS: CommandFlags = CommandFlags::empty();

    #[test]
    fn test_root_container() {
        let mut mc = Emulator::builder()
            .container_id(3)
            .class(class())
            .object(Dprc::TYPE_NAME, 3)
            .build()
            .unwrap();

        let id = mng::get_container_id(&mut mc, FLAGS).unwrap();
        let dprc = DprcSession::open(&mut mc, FLAGS, id).unwrap();
        let attr = dprc.get_attributes(&mut mc, FLAGS).unwrap();
        assert_eq!(attr.container_id, 3);
        assert_eq!(attr.version, VERSION);
        assert!(attr.options.contains(DprcOptions::OBJ_CREATE_ALLOWED));
        dprc.close(&mut mc, FLAGS).unwrap();
    }

    #[test]
    fn test_no_irq_commands() {
        let mut mc = Emulator::builder()
            .class(class())
            .object(Dprc::TYPE_NAME, 1)
            .build()
            .unwrap();
        let dprc = DprcSession::open(&mut mc, FLAGS, 1).unwrap();
        let cmd = dprc.command(CMDID_SET_IRQ, FLAGS);
        assert!(matches!(
            dprc.execute(&mut mc, &cmd),
            Err(CommandError::Send(SendError::Status {
                status: Status::UnsupportedOp,
                ..
            }))
        ));
    }
}
