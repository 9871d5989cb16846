//! Emulator model of DPSECI objects.

use log::debug;
use mc_cmd::{Command, Response, Status, object::CMDID_GET_ATTR};
use mc_sim::{NewObject, ObjectClass, ObjectModel};

use crate::{
    Dpseci,
    cmd,
    proto::{
        CMDID_GET_RX_QUEUE, CMDID_GET_TX_QUEUE, CMDID_SET_RX_QUEUE, DPSECI_MAX_PRIORITY,
        DPSECI_PRIO_NUM, DpseciAttr, DpseciConfig, RxQueueAttr, RxQueueOptions, TxQueueAttr,
        VERSION,
    },
};

/// Frame queue IDs are derived from the object ID and queue index.
const RX_FQID_BASE: u32 = 0x1000;
const TX_FQID_BASE: u32 = 0x2000;

/// Emulated DPSECI object.
#[derive(Debug, Clone)]
pub struct DpseciModel {
    num_of_priorities: u8,
    rx_queues: [RxQueueAttr; DPSECI_PRIO_NUM],
}

impl DpseciModel {
    /// Builds an object from its configuration.
    ///
    /// Fails with [`Status::ConfigError`] unless the configuration names at
    /// least one priority and every named priority is in `1..=8`.
    pub fn new(cfg: &DpseciConfig) -> Result<Self, Status> {
        let num_of_priorities = cfg.priorities.iter().take_while(|p| **p != 0).count();
        if num_of_priorities == 0
            || cfg.priorities[..num_of_priorities]
                .iter()
                .any(|p| *p > DPSECI_MAX_PRIORITY)
        {
            return Err(Status::ConfigError);
        }
        Ok(Self {
            num_of_priorities: num_of_priorities as u8,
            rx_queues: [RxQueueAttr::default(); DPSECI_PRIO_NUM],
        })
    }

    fn queue_index(&self, priority: u8) -> Result<usize, Status> {
        if priority >= self.num_of_priorities {
            return Err(Status::ConfigError);
        }
        Ok(priority as usize)
    }
}

/// Frame queue ID of queue `index` of object `id`.
///
/// IDs that do not map into the 32-bit queue space report
/// [`Status::NoResource`].
fn fqid(base: u32, id: i32, index: usize) -> Result<u32, Status> {
    u32::try_from(id)
        .ok()
        .and_then(|id| id.checked_mul(DPSECI_PRIO_NUM as u32))
        .and_then(|first| first.checked_add(index as u32))
        .and_then(|offset| offset.checked_add(base))
        .ok_or(Status::NoResource)
}

impl ObjectModel for DpseciModel {
    fn handle(&mut self, id: i32, cmd: &Command, rsp: &mut Response) -> Result<(), Status> {
        match cmd.id() {
            CMDID_GET_ATTR => cmd::write_attributes_response(
                rsp,
                &DpseciAttr {
                    id,
                    num_of_priorities: self.num_of_priorities,
                    version: VERSION,
                },
            ),
            CMDID_SET_RX_QUEUE => {
                let (priority, cfg) =
                    cmd::read_set_rx_queue_request(cmd).map_err(|_| Status::ConfigError)?;
                let index = self.queue_index(priority)?;
                debug!("dpseci.{id}: rx queue {index} options {:?}", cfg.options);
                let queue = &mut self.rx_queues[index];
                if cfg.options.contains(RxQueueOptions::USER_CTX) {
                    queue.user_ctx = cfg.user_ctx;
                }
                if cfg.options.contains(RxQueueOptions::DEST) {
                    queue.dest_cfg = cfg.dest_cfg;
                }
            }
            CMDID_GET_RX_QUEUE => {
                let index = self.queue_index(cmd::read_queue_request(cmd))?;
                let attr = RxQueueAttr {
                    fqid: fqid(RX_FQID_BASE, id, index)?,
                    ..self.rx_queues[index]
                };
                cmd::write_get_rx_queue_response(rsp, &attr);
            }
            CMDID_GET_TX_QUEUE => {
                let index = self.queue_index(cmd::read_queue_request(cmd))?;
                cmd::write_get_tx_queue_response(
                    rsp,
                    &TxQueueAttr {
                        fqid: fqid(TX_FQID_BASE, id, index)?,
                    },
                );
            }
            _ => return Err(Status::UnsupportedOp),
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.rx_queues = [RxQueueAttr::default(); DPSECI_PRIO_NUM];
    }
}

fn declare() -> Box<dyn ObjectModel> {
    Box::new(DpseciModel {
        num_of_priorities: DPSECI_PRIO_NUM as u8,
        rx_queues: [RxQueueAttr::default(); DPSECI_PRIO_NUM],
    })
}

fn create(cmd: &Command) -> Result<NewObject, Status> {
    let model = DpseciModel::new(&cmd::read_create_request(cmd))?;
    Ok(NewObject {
        requested_id: None,
        model: Box::new(model),
    })
}

/// Registration of the DPSECI type.
pub fn class() -> ObjectClass {
    ObjectClass::new::<Dpseci>(declare)
        .with_irqs::<Dpseci>()
        .creatable::<Dpseci>(create)
}

#[cfg(test)]
mod tests {
    use mc_cmd::{CommandError, CommandFlags, ObjectType, SendError, irq::IrqConfig};
    use mc_sim::Emulator;

    use super::*;
    use crate::{DestConfig, DestType, DpseciSession, RxQueueConfig};

    const FLAGS: CommandFlags = CommandFlags::empty();

    fn emulator() -> Emulator {
        Emulator::builder()
            .class(class())
            .object(Dpseci::TYPE_NAME, 0)
            .build()
            .unwrap()
    }

    #[test]
    fn test_create_reports_priorities() {
        let mut mc = emulator();
        let cfg = DpseciConfig {
            priorities: [3, 0],
        };
        let dpseci = DpseciSession::create(&mut mc, FLAGS, &cfg).unwrap();
        let attr = dpseci.get_attributes(&mut mc, FLAGS).unwrap();
        assert_eq!(attr.id, 1);
        assert_eq!(attr.num_of_priorities, 1);
        assert_eq!(attr.version, VERSION);
        dpseci.destroy(&mut mc, FLAGS).unwrap();
        assert!(!mc.contains(Dpseci::TYPE_NAME, 1));
    }

    #[test]
    fn test_create_rejects_bad_priorities() {
        let mut mc = emulator();
        for priorities in [[0, 0], [9, 1]] {
            let err = DpseciSession::create(&mut mc, FLAGS, &DpseciConfig { priorities })
                .unwrap_err();
            assert!(matches!(
                err,
                CommandError::Send(SendError::Status {
                    status: Status::ConfigError,
                    ..
                })
            ));
        }
        assert_eq!(mc.object_ids(Dpseci::TYPE_NAME), [0]);
    }

    #[test]
    fn test_rx_queue_options_select_members() {
        let mut mc = emulator();
        let dpseci = DpseciSession::open(&mut mc, FLAGS, 0).unwrap();
        let dest_cfg = DestConfig {
            dest_type: DestType::Dpio,
            dest_id: 4,
            priority: 1,
        };

        dpseci
            .set_rx_queue(
                &mut mc,
                FLAGS,
                1,
                &RxQueueConfig {
                    options: RxQueueOptions::DEST,
                    user_ctx: 0xABCD,
                    dest_cfg,
                },
            )
            .unwrap();
        let attr = dpseci.get_rx_queue(&mut mc, FLAGS, 1).unwrap();
        assert_eq!(attr.dest_cfg, dest_cfg);
        assert_eq!(attr.user_ctx, 0);

        dpseci
            .set_rx_queue(
                &mut mc,
                FLAGS,
                1,
                &RxQueueConfig {
                    options: RxQueueOptions::USER_CTX,
                    user_ctx: 0xFFFF_0000_FFFF_0000,
                    dest_cfg: DestConfig::default(),
                },
            )
            .unwrap();
        let attr = dpseci.get_rx_queue(&mut mc, FLAGS, 1).unwrap();
        assert_eq!(attr.dest_cfg, dest_cfg);
        assert_eq!(attr.user_ctx, 0xFFFF_0000_FFFF_0000);
    }

    #[test]
    fn test_queue_ids() {
        let mut mc = emulator();
        let dpseci = DpseciSession::open(&mut mc, FLAGS, 0).unwrap();
        let rx = dpseci.get_rx_queue(&mut mc, FLAGS, 0).unwrap();
        let tx = dpseci.get_tx_queue(&mut mc, FLAGS, 1).unwrap();
        assert_eq!(rx.fqid, RX_FQID_BASE);
        assert_eq!(tx.fqid, TX_FQID_BASE + 1);

        let err = dpseci.get_tx_queue(&mut mc, FLAGS, 2).unwrap_err();
        assert!(matches!(
            err,
            CommandError::Send(SendError::Status {
                status: Status::ConfigError,
                ..
            })
        ));
    }

    #[test]
    fn test_queue_ids_out_of_range() {
        let mut mc = Emulator::builder()
            .class(class())
            .object(Dpseci::TYPE_NAME, 0x7FFF_FFFF)
            .build()
            .unwrap();
        let dpseci = DpseciSession::open(&mut mc, FLAGS, 0x7FFF_FFFF).unwrap();
        let no_resource = |err: CommandError| {
            matches!(
                err,
                CommandError::Send(SendError::Status {
                    status: Status::NoResource,
                    ..
                })
            )
        };
        assert!(no_resource(dpseci.get_rx_queue(&mut mc, FLAGS, 0).unwrap_err()));
        assert!(no_resource(dpseci.get_tx_queue(&mut mc, FLAGS, 0).unwrap_err()));
        assert_eq!(fqid(RX_FQID_BASE, -1, 0), Err(Status::NoResource));
    }

    #[test]
    fn test_single_irq_line() {
        let mut mc = emulator();
        let dpseci = DpseciSession::open(&mut mc, FLAGS, 0).unwrap();
        let session = dpseci.session();
        session
            .set_irq(&mut mc, FLAGS, 0, &IrqConfig::default())
            .unwrap();
        assert_eq!(
            session.set_irq(&mut mc, FLAGS, 1, &IrqConfig::default()),
            Err(CommandError::IrqIndex { index: 1, count: 1 })
        );
    }

    #[test]
    fn test_reset_clears_queue_config() {
        let mut mc = emulator();
        let dpseci = DpseciSession::open(&mut mc, FLAGS, 0).unwrap();
        dpseci
            .set_rx_queue(
                &mut mc,
                FLAGS,
                0,
                &RxQueueConfig {
                    options: RxQueueOptions::USER_CTX,
                    user_ctx: 1,
                    dest_cfg: DestConfig::default(),
                },
            )
            .unwrap();
        dpseci.session().reset(&mut mc, FLAGS).unwrap();
        assert_eq!(dpseci.get_rx_queue(&mut mc, FLAGS, 0).unwrap().user_ctx, 0);
    }
}
