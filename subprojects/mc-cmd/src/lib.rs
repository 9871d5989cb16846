//! Management Complex (MC) command framework
//!
//! This crate implements the **command layer** used to drive the objects of a
//! hardware resource-management subsystem: buffer pools, command portals,
//! crypto interfaces and resource containers are created, configured and
//! torn down by sending fixed-layout binary commands to an out-of-band
//! management processor, the *Management Complex*.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────┐
//! │  Object crates (dpbp, dpseci...) │  Typed configs, attributes, tables
//! ├──────────────────────────────────┤
//! │  Sessions / IRQ / management     │  Token lifecycle, shared commands
//! ├──────────────────────────────────┤
//! │  Command / Response              │  Header word + 7 parameter words
//! ├──────────────────────────────────┤
//! │  Field codec                     │  Bit-addressed typed fields
//! ├──────────────────────────────────┤
//! │  Portal                          │  Transport (MMIO, driver, emulator)
//! └──────────────────────────────────┘
//! ```
//!
//! This crate provides everything but the object crates and the transport.
//!
//! # Modules
//!
//! - [`field`]: `const` [`Field`] descriptors and masked pack/unpack.
//! - [`command`]: the [`Command`] and [`Response`] buffers, the header word
//!   and the little-endian wire image.
//! - [`portal`]: the [`Portal`] transport trait and status checking.
//! - [`object`]: object type traits and the typed [`Session`] handle.
//! - [`irq`]: interrupt line commands shared by every object type.
//! - [`mng`]: tokenless management commands (firmware version, container).
//! - [`table`]: static per-type command tables.

#![no_std]

#[cfg(test)]
extern crate std;

pub mod command;
pub mod field;
pub mod irq;
pub mod mng;
pub mod object;
mod object_type;
pub mod portal;
pub mod table;

pub use command::{Command, CommandFlags, CommandId, ParseError, Response, Status};
pub use field::Field;
pub use object::{
    CommandError, Created, Creatable, Enable, Interrupts, ObjectAttributes, ObjectType, Opened,
    ReleaseError, Session, Version,
};
pub use object_type::ObjectTypeName;
pub use portal::{Portal, SendError, TransportError};
pub use table::CommandSpec;
