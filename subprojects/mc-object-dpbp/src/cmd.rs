//! DPBP command layouts.

use mc_cmd::{ParseError, Response, Version};

use crate::proto::{
    ATTR_RSP_BPID, ATTR_RSP_ID, ATTR_RSP_VERSION_MAJOR, ATTR_RSP_VERSION_MINOR, ATTR_RSP_WORDS,
    DpbpAttr,
};

pub fn read_attributes_response(rsp: &Response) -> Result<DpbpAttr, ParseError> {
    let params = rsp.expect_words(ATTR_RSP_WORDS as usize)?;
    Ok(DpbpAttr {
        id: ATTR_RSP_ID.read(params),
        bpid: ATTR_RSP_BPID.read(params),
        version: Version::new(
            ATTR_RSP_VERSION_MAJOR.read(params),
            ATTR_RSP_VERSION_MINOR.read(params),
        ),
    })
}

pub fn write_attributes_response(rsp: &mut Response, attr: &DpbpAttr) {
    rsp.set(ATTR_RSP_BPID, attr.bpid)
        .set(ATTR_RSP_ID, attr.id)
        .set(ATTR_RSP_VERSION_MAJOR, attr.version.major)
        .set(ATTR_RSP_VERSION_MINOR, attr.version.minor);
}
