//! DPSECI command layouts.
//!
//! Client-side functions write requests and read responses; the `read_*_request`
//! and `write_*_response` counterparts serve the management-processor side.
//!
//! The receive queue commands share word 0 between the destination fields and
//! the queue priority:
//!
//! ```text
//! word 0   63    52 51  48 47     40 39     32 31               0
//!          ┌───────┬──────┬─────────┬─────────┬──────────────────┐
//!          │       │ type │ q prio  │ d prio  │     dest_id      │
//!          └───────┴──────┴─────────┴─────────┴──────────────────┘
//! ```

use mc_cmd::{Command, ParseError, Response, Version};

use crate::proto::{
    ATTR_RSP_ID, ATTR_RSP_NUM_OF_PRIORITIES, ATTR_RSP_VERSION_MAJOR, ATTR_RSP_VERSION_MINOR,
    ATTR_RSP_WORDS, CREATE_PRIORITY_0, CREATE_PRIORITY_1, DestConfig, DestType, DpseciAttr,
    DpseciConfig, GET_RX_QUEUE_RSP_FQID, GET_RX_QUEUE_RSP_WORDS, GET_TX_QUEUE_RSP_FQID,
    GET_TX_QUEUE_RSP_WORDS, QUEUE_DEST_ID, QUEUE_DEST_PRIORITY, QUEUE_DEST_TYPE, QUEUE_PRIORITY,
    QUEUE_USER_CTX, RxQueueAttr, RxQueueConfig, RxQueueOptions, SET_RX_QUEUE_OPTIONS,
    TxQueueAttr,
};

pub fn write_create_request(cmd: &mut Command, cfg: &DpseciConfig) {
    cmd.set(CREATE_PRIORITY_0, cfg.priorities[0])
        .set(CREATE_PRIORITY_1, cfg.priorities[1]);
}

pub fn read_create_request(cmd: &Command) -> DpseciConfig {
    DpseciConfig {
        priorities: [cmd.get(CREATE_PRIORITY_0), cmd.get(CREATE_PRIORITY_1)],
    }
}

pub fn read_attributes_response(rsp: &Response) -> Result<DpseciAttr, ParseError> {
    let params = rsp.expect_words(ATTR_RSP_WORDS as usize)?;
    Ok(DpseciAttr {
        id: ATTR_RSP_ID.read(params),
        num_of_priorities: ATTR_RSP_NUM_OF_PRIORITIES.read(params),
        version: Version::new(
            ATTR_RSP_VERSION_MAJOR.read(params),
            ATTR_RSP_VERSION_MINOR.read(params),
        ),
    })
}

pub fn write_attributes_response(rsp: &mut Response, attr: &DpseciAttr) {
    rsp.set(ATTR_RSP_ID, attr.id)
        .set(ATTR_RSP_NUM_OF_PRIORITIES, attr.num_of_priorities)
        .set(ATTR_RSP_VERSION_MAJOR, attr.version.major)
        .set(ATTR_RSP_VERSION_MINOR, attr.version.minor);
}

pub fn write_set_rx_queue_request(cmd: &mut Command, priority: u8, cfg: &RxQueueConfig) {
    cmd.set(QUEUE_DEST_ID, cfg.dest_cfg.dest_id)
        .set(QUEUE_DEST_PRIORITY, cfg.dest_cfg.priority)
        .set(QUEUE_PRIORITY, priority)
        .set(QUEUE_DEST_TYPE, cfg.dest_cfg.dest_type.to_raw())
        .set(QUEUE_USER_CTX, cfg.user_ctx)
        .set(SET_RX_QUEUE_OPTIONS, cfg.options.bits());
}

pub fn read_set_rx_queue_request(cmd: &Command) -> Result<(u8, RxQueueConfig), ParseError> {
    let cfg = RxQueueConfig {
        options: RxQueueOptions::from_bits_retain(cmd.get(SET_RX_QUEUE_OPTIONS)),
        user_ctx: cmd.get(QUEUE_USER_CTX),
        dest_cfg: DestConfig {
            dest_type: dest_type(cmd.get(QUEUE_DEST_TYPE))?,
            dest_id: cmd.get(QUEUE_DEST_ID),
            priority: cmd.get(QUEUE_DEST_PRIORITY),
        },
    };
    Ok((cmd.get(QUEUE_PRIORITY), cfg))
}

/// Stores the queue priority of get-rx-queue and get-tx-queue.
pub fn write_queue_request(cmd: &mut Command, priority: u8) {
    cmd.set(QUEUE_PRIORITY, priority);
}

pub fn read_queue_request(cmd: &Command) -> u8 {
    cmd.get(QUEUE_PRIORITY)
}

pub fn read_get_rx_queue_response(rsp: &Response) -> Result<RxQueueAttr, ParseError> {
    let params = rsp.expect_words(GET_RX_QUEUE_RSP_WORDS as usize)?;
    Ok(RxQueueAttr {
        user_ctx: QUEUE_USER_CTX.read(params),
        dest_cfg: DestConfig {
            dest_type: dest_type(QUEUE_DEST_TYPE.read(params))?,
            dest_id: QUEUE_DEST_ID.read(params),
            priority: QUEUE_DEST_PRIORITY.read(params),
        },
        fqid: GET_RX_QUEUE_RSP_FQID.read(params),
    })
}

pub fn write_get_rx_queue_response(rsp: &mut Response, attr: &RxQueueAttr) {
    rsp.set(QUEUE_DEST_ID, attr.dest_cfg.dest_id)
        .set(QUEUE_DEST_PRIORITY, attr.dest_cfg.priority)
        .set(QUEUE_DEST_TYPE, attr.dest_cfg.dest_type.to_raw())
        .set(QUEUE_USER_CTX, attr.user_ctx)
        .set(GET_RX_QUEUE_RSP_FQID, attr.fqid);
}

pub fn read_get_tx_queue_response(rsp: &Response) -> Result<TxQueueAttr, ParseError> {
    let params = rsp.expect_words(GET_TX_QUEUE_RSP_WORDS as usize)?;
    Ok(TxQueueAttr {
        fqid: GET_TX_QUEUE_RSP_FQID.read(params),
    })
}

pub fn write_get_tx_queue_response(rsp: &mut Response, attr: &TxQueueAttr) {
    rsp.set(GET_TX_QUEUE_RSP_FQID, attr.fqid);
}

fn dest_type(raw: u8) -> Result<DestType, ParseError> {
    DestType::from_raw(raw).ok_or(ParseError::InvalidValue {
        field: "dest_type",
        value: raw as u64,
    })
}

#[cfg(test)]
mod tests {
    use mc_cmd::{CommandFlags, Status};

    use super::*;
    use crate::proto::{CMDID_CREATE, CMDID_GET_RX_QUEUE, CMDID_GET_TX_QUEUE, CMDID_SET_RX_QUEUE};

    fn command(id: mc_cmd::CommandId) -> Command {
        Command::new(id, CommandFlags::empty(), 3)
    }

    #[test]
    fn test_create_layout() {
        let cfg = DpseciConfig {
            priorities: [2, 7],
        };
        let mut cmd = command(CMDID_CREATE);
        write_create_request(&mut cmd, &cfg);
        assert_eq!(cmd.params(), &[(2 << 8) | (7 << 16)]);
        assert_eq!(read_create_request(&cmd), cfg);
    }

    #[test]
    fn test_attributes_layout() {
        let attr = DpseciAttr {
            id: 12,
            num_of_priorities: 2,
            version: Version::new(2, 0),
        };
        let mut rsp = Response::new(&command(mc_cmd::object::CMDID_GET_ATTR), Status::Ok);
        write_attributes_response(&mut rsp, &attr);
        assert_eq!(rsp.params(), &[12, 2, 0, 0, 0, 2]);
        assert_eq!(read_attributes_response(&rsp).unwrap(), attr);
    }

    #[test]
    fn test_attributes_truncated() {
        let mut rsp = Response::new(&command(mc_cmd::object::CMDID_GET_ATTR), Status::Ok);
        rsp.set(ATTR_RSP_NUM_OF_PRIORITIES, 2u8);
        assert_eq!(
            read_attributes_response(&rsp),
            Err(ParseError::Truncated {
                command: mc_cmd::object::CMDID_GET_ATTR,
                expected: 6,
                actual: 2,
            })
        );
    }

    #[test]
    fn test_set_rx_queue_layout() {
        let cfg = RxQueueConfig {
            options: RxQueueOptions::USER_CTX | RxQueueOptions::DEST,
            user_ctx: 0xFEED_FACE_CAFE_BEEF,
            dest_cfg: DestConfig {
                dest_type: DestType::Dpcon,
                dest_id: -1,
                priority: 5,
            },
        };
        let mut cmd = command(CMDID_SET_RX_QUEUE);
        write_set_rx_queue_request(&mut cmd, 1, &cfg);

        let params = cmd.params();
        assert_eq!(params[0], 0xFFFF_FFFF | (5 << 32) | (1 << 40) | (2 << 48));
        assert_eq!(params[1], 0xFEED_FACE_CAFE_BEEF);
        assert_eq!(params[2], 0x3);
        assert_eq!(read_set_rx_queue_request(&cmd).unwrap(), (1, cfg));
    }

    #[test]
    fn test_rx_queue_user_ctx_is_full_width() {
        let attr = RxQueueAttr {
            user_ctx: u64::MAX - 1,
            dest_cfg: DestConfig::default(),
            fqid: 0x42,
        };
        let mut rsp = Response::new(&command(CMDID_GET_RX_QUEUE), Status::Ok);
        write_get_rx_queue_response(&mut rsp, &attr);
        assert_eq!(read_get_rx_queue_response(&rsp).unwrap(), attr);
    }

    #[test]
    fn test_rx_queue_response_has_no_queue_priority() {
        let mut cmd = command(CMDID_GET_RX_QUEUE);
        write_queue_request(&mut cmd, 1);
        assert_eq!(cmd.params(), &[1 << 40]);

        let mut rsp = Response::new(&cmd, Status::Ok);
        write_get_rx_queue_response(&mut rsp, &RxQueueAttr::default());
        assert_eq!(rsp.params()[0] & (0xFF << 40), 0);
    }

    #[test]
    fn test_invalid_dest_type() {
        let mut rsp = Response::new(&command(CMDID_GET_RX_QUEUE), Status::Ok);
        rsp.set(QUEUE_DEST_TYPE, 9u8).set(GET_RX_QUEUE_RSP_FQID, 1u32);
        assert_eq!(
            read_get_rx_queue_response(&rsp),
            Err(ParseError::InvalidValue {
                field: "dest_type",
                value: 9,
            })
        );
    }

    #[test]
    fn test_tx_queue_layout() {
        let mut cmd = command(CMDID_GET_TX_QUEUE);
        write_queue_request(&mut cmd, 0);
        assert_eq!(read_queue_request(&cmd), 0);

        let mut rsp = Response::new(&cmd, Status::Ok);
        write_get_tx_queue_response(&mut rsp, &TxQueueAttr { fqid: 0x1234 });
        assert_eq!(rsp.params(), &[0x1234 << 32]);
        assert_eq!(read_get_tx_queue_response(&rsp).unwrap().fqid, 0x1234);
    }
}
