//! Emulated management processor the tool runs against.

use mc_sim::{Emulator, TopologyError};

/// ID of the root container.
pub const ROOT_CONTAINER_ID: i32 = 1;

/// Builds an emulator with every supported object type registered and a
/// small set of objects in the root container.
pub fn emulator() -> Result<Emulator, TopologyError> {
    Emulator::builder()
        .container_id(ROOT_CONTAINER_ID)
        .class(mc_object_dprc::sim::class())
        .class(mc_object_dpbp::sim::class())
        .class(mc_object_dpmcp::sim::class())
        .class(mc_object_dpseci::sim::class())
        .object(mc_object_dprc::TYPE_NAME, ROOT_CONTAINER_ID)
        .object(mc_object_dpmcp::TYPE_NAME, 0)
        .object(mc_object_dpbp::TYPE_NAME, 0)
        .object(mc_object_dpbp::TYPE_NAME, 1)
        .object(mc_object_dpseci::TYPE_NAME, 0)
        .build()
}
