//! Emulated Management Complex
//!
//! An in-process [`Portal`](mc_cmd::Portal) that executes MC commands against
//! an in-memory object topology. It is used by the tests of the object crates
//! and as the default backend of the resource manager tool, since the
//! hardware transport lives outside this workspace.
//!
//! Object types plug in through an [`ObjectClass`] registration; each object
//! crate provides one behind its `sim` feature.

mod class;
mod emulator;

pub use class::{CreateFn, DeclareFn, NewObject, ObjectClass, ObjectModel};
pub use emulator::{Emulator, EmulatorBuilder, IrqLine, TopologyError};
