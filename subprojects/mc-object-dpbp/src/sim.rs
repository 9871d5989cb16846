//! Emulator model of DPBP objects.

use log::debug;
use mc_cmd::{Command, Response, Status, object::CMDID_GET_ATTR};
use mc_sim::{NewObject, ObjectClass, ObjectModel};

use crate::{Dpbp, DpbpAttr, VERSION, cmd};

/// Hardware pool IDs are handed out from this base upwards.
const BPID_BASE: u16 = 0x40;

/// Emulated DPBP object. Buffer pools carry no state beyond what the
/// emulator tracks generically.
#[derive(Debug, Default)]
pub struct DpbpModel;

impl ObjectModel for DpbpModel {
    fn handle(&mut self, id: i32, cmd: &Command, rsp: &mut Response) -> Result<(), Status> {
        match cmd.id() {
            CMDID_GET_ATTR => {
                let bpid = u16::try_from(id)
                    .ok()
                    .and_then(|id| id.checked_add(BPID_BASE))
                    .ok_or(Status::NoResource)?;
                debug!("dpbp.{id}: bpid {bpid:#x}");
                cmd::write_attributes_response(
                    rsp,
                    &DpbpAttr {
                        id,
                        bpid,
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
    Box::new(DpbpModel)
}

fn create(_cmd: &Command) -> Result<NewObject, Status> {
    Ok(NewObject {
        requested_id: None,
        model: Box::new(DpbpModel),
    })
}

/// Registration of the DPBP type.
pub fn class() -> ObjectClass {
    ObjectClass::new::<Dpbp>(declare)
        .with_irqs::<Dpbp>()
        .creatable::<Dpbp>(create)
}
