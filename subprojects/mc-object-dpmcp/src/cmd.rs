//! DPMCP command layouts.

use mc_cmd::{Command, ParseError, Response, Version};

use crate::proto::{
    ATTR_RSP_ID, ATTR_RSP_VERSION_MAJOR, ATTR_RSP_VERSION_MINOR, ATTR_RSP_WORDS,
    CREATE_PORTAL_ID, DpmcpAttr, DpmcpConfig,
};

pub fn write_create_request(cmd: &mut Command, cfg: &DpmcpConfig) {
    cmd.set(CREATE_PORTAL_ID, cfg.portal_id);
}

pub fn read_create_request(cmd: &Command) -> DpmcpConfig {
    DpmcpConfig {
        portal_id: cmd.get(CREATE_PORTAL_ID),
    }
}

pub fn read_attributes_response(rsp: &Response) -> Result<DpmcpAttr, ParseError> {
    let params = rsp.expect_words(ATTR_RSP_WORDS as usize)?;
    Ok(DpmcpAttr {
        id: ATTR_RSP_ID.read(params),
        version: Version::new(
            ATTR_RSP_VERSION_MAJOR.read(params),
            ATTR_RSP_VERSION_MINOR.read(params),
        ),
    })
}

pub fn write_attributes_response(rsp: &mut Response, attr: &DpmcpAttr) {
    rsp.set(ATTR_RSP_ID, attr.id)
        .set(ATTR_RSP_VERSION_MAJOR, attr.version.major)
        .set(ATTR_RSP_VERSION_MINOR, attr.version.minor);
}

#[cfg(test)]
mod tests {
    use mc_cmd::{CommandFlags, Status, object::CMDID_GET_ATTR};

    use super::*;
    use crate::proto::{CMDID_CREATE, DPMCP_GET_PORTAL_ID_FROM_POOL};

    #[test]
    fn test_create_from_pool() {
        let mut cmd = Command::new(CMDID_CREATE, CommandFlags::empty(), 0);
        write_create_request(&mut cmd, &DpmcpConfig::default());
        assert_eq!(cmd.params(), &[0xFFFF_FFFF]);
        assert_eq!(read_create_request(&cmd).portal_id, DPMCP_GET_PORTAL_ID_FROM_POOL);
    }

    #[test]
    fn test_attributes_layout() {
        let cmd = Command::new(CMDID_GET_ATTR, CommandFlags::empty(), 1);
        let attr = DpmcpAttr {
            id: 5,
            version: Version::new(3, 0),
        };
        let mut rsp = Response::new(&cmd, Status::Ok);
        write_attributes_response(&mut rsp, &attr);
        assert_eq!(rsp.params(), &[5 << 32, 3]);
        assert_eq!(read_attributes_response(&rsp).unwrap(), attr);
    }
}
