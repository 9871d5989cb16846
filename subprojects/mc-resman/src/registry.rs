//! Object type to command table mapping.

use std::collections::BTreeMap;

use mc_cmd::ObjectTypeName;

use crate::{Resman, commands, error::CliError, options::OptSpec};

/// Handler of an object command.
pub type CommandFn = fn(&mut Resman<'_>) -> Result<(), CliError>;

/// Entry of an object type's command table.
#[derive(Debug, Clone, Copy)]
pub struct ObjectCommand {
    pub name: &'static str,
    /// One-line description for `help`.
    pub help: &'static str,
    pub options: &'static [OptSpec],
    pub func: CommandFn,
}

impl ObjectCommand {
    pub const fn new(
        name: &'static str,
        help: &'static str,
        options: &'static [OptSpec],
        func: CommandFn,
    ) -> Self {
        Self {
            name,
            help,
            options,
            func,
        }
    }
}

/// Command tables of every supported object type.
#[derive(Debug, Clone)]
pub struct Registry {
    tables: BTreeMap<ObjectTypeName, &'static [ObjectCommand]>,
}

impl Registry {
    /// Builds the registry of the built-in object types.
    pub fn new() -> Self {
        let mut registry = Self {
            tables: BTreeMap::new(),
        };
        registry.register(mc_object_dprc::TYPE_NAME, commands::dprc::COMMANDS);
        registry.register(mc_object_dpbp::TYPE_NAME, commands::dpbp::COMMANDS);
        registry.register(mc_object_dpmcp::TYPE_NAME, commands::dpmcp::COMMANDS);
        registry.register(mc_object_dpseci::TYPE_NAME, commands::dpseci::COMMANDS);
        registry
    }

    pub fn register(&mut self, obj_type: ObjectTypeName, commands: &'static [ObjectCommand]) {
        if self.tables.insert(obj_type, commands).is_some() {
            log::warn!("resman: {obj_type} commands registered twice");
        }
    }

    /// Resolves an object type token from the command line.
    pub fn lookup(&self, token: &str) -> Result<(ObjectTypeName, &'static [ObjectCommand]), CliError> {
        ObjectTypeName::new(token)
            .and_then(|name| self.tables.get(&name).map(|table| (name, *table)))
            .ok_or_else(|| CliError::UnknownObjectType(token.to_owned()))
    }

    pub fn types(&self) -> impl Iterator<Item = ObjectTypeName> {
        self.tables.keys().copied()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Finds `name` in a command table.
pub fn find_command(
    obj_type: ObjectTypeName,
    commands: &'static [ObjectCommand],
    name: &str,
) -> Result<&'static ObjectCommand, CliError> {
    commands
        .iter()
        .find(|command| command.name == name)
        .ok_or_else(|| CliError::UnknownCommand {
            obj_type,
            command: name.to_owned(),
        })
}
