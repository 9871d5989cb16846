//! Static command tables.
//!
//! Each object type publishes the list of commands it implements together
//! with their parameter word counts. The tables drive response length checks,
//! let the emulator reject unknown command IDs, and give tooling something to
//! print.

use crate::command::CommandId;

/// Description of one command of an object type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    /// Command identifier.
    pub id: CommandId,
    /// Human readable name.
    pub name: &'static str,
    /// Parameter words used by the request.
    pub request_words: u8,
    /// Parameter words carried by the response.
    pub response_words: u8,
}

impl CommandSpec {
    /// Describes a command.
    pub const fn new(id: CommandId, name: &'static str, request_words: u8, response_words: u8) -> Self {
        Self {
            id,
            name,
            request_words,
            response_words,
        }
    }
}

/// Finds the entry for `id` in `table`.
pub fn lookup(table: &[CommandSpec], id: CommandId) -> Option<&CommandSpec> {
    table.iter().find(|spec| spec.id == id)
}

/// Returns whether every command ID in `table` is unique.
pub fn ids_are_unique(table: &[CommandSpec]) -> bool {
    table
        .iter()
        .enumerate()
        .all(|(i, spec)| table[i + 1..].iter().all(|other| other.id != spec.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &[CommandSpec] = &[
        CommandSpec::new(CommandId::new(0x800), "close", 0, 0),
        CommandSpec::new(CommandId::new(0x004), "get_attributes", 0, 2),
    ];

    #[test]
    fn test_lookup() {
        assert_eq!(lookup(TABLE, CommandId::new(0x004)).map(|s| s.name), Some("get_attributes"));
        assert!(lookup(TABLE, CommandId::new(0x005)).is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        assert!(ids_are_unique(TABLE));
        let dup = [TABLE[0], TABLE[1], TABLE[0]];
        assert!(!ids_are_unique(&dup));
    }
}
