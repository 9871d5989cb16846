//! DPRC command layouts.

use mc_cmd::{ParseError, Response, Version};

use crate::proto::{
    ATTR_RSP_CONTAINER_ID, ATTR_RSP_ICID, ATTR_RSP_OPTIONS, ATTR_RSP_PORTAL_ID,
    ATTR_RSP_VERSION_MAJOR, ATTR_RSP_VERSION_MINOR, ATTR_RSP_WORDS, DprcAttr, DprcOptions,
};

pub fn read_attributes_response(rsp: &Response) -> Result<DprcAttr, ParseError> {
    let params = rsp.expect_words(ATTR_RSP_WORDS as usize)?;
    Ok(DprcAttr {
        container_id: ATTR_RSP_CONTAINER_ID.read(params),
        icid: ATTR_RSP_ICID.read(params),
        options: DprcOptions::from_bits_retain(ATTR_RSP_OPTIONS.read(params)),
        portal_id: ATTR_RSP_PORTAL_ID.read(params),
        version: Version::new(
            ATTR_RSP_VERSION_MAJOR.read(params),
            ATTR_RSP_VERSION_MINOR.read(params),
        ),
    })
}

pub fn write_attributes_response(rsp: &mut Response, attr: &DprcAttr) {
    rsp.set(ATTR_RSP_CONTAINER_ID, attr.container_id)
        .set(ATTR_RSP_ICID, attr.icid)
        .set(ATTR_RSP_OPTIONS, attr.options.bits())
        .set(ATTR_RSP_PORTAL_ID, attr.portal_id)
        .set(ATTR_RSP_VERSION_MAJOR, attr.version.major)
        .set(ATTR_RSP_VERSION_MINOR, attr.version.minor);
}
