//! Per-type behaviour of emulated objects.

use mc_cmd::{
    Command, CommandId, CommandSpec, Creatable, Interrupts, ObjectType, ObjectTypeName, Response,
    Status,
};

/// State of one emulated object beyond what the emulator tracks generically
/// (enable state, interrupt lines, sessions).
pub trait ObjectModel: Send {
    /// Answers get-attributes and the type-specific commands.
    ///
    /// `id` is the ID of the addressed object. Returning an error status
    /// discards whatever was written to `rsp`.
    fn handle(&mut self, id: i32, cmd: &Command, rsp: &mut Response) -> Result<(), Status>;

    /// Restores the post-create state.
    fn reset(&mut self) {}
}

/// Object allocated by a create command.
pub struct NewObject {
    /// ID requested by the configuration, `None` to let the emulator pick.
    pub requested_id: Option<i32>,
    /// Object state.
    pub model: Box<dyn ObjectModel>,
}

/// Builds a model from a create command.
pub type CreateFn = fn(&Command) -> Result<NewObject, Status>;

/// Builds the model of an object declared in the topology.
pub type DeclareFn = fn() -> Box<dyn ObjectModel>;

/// Registration record of an object type.
#[derive(Clone)]
pub struct ObjectClass {
    pub type_name: ObjectTypeName,
    pub cmdid_open: CommandId,
    pub commands: &'static [CommandSpec],
    pub irq_count: u8,
    pub declare: DeclareFn,
    pub create: Option<(CommandId, CreateFn)>,
}

impl ObjectClass {
    /// Registers type `O` without create support or interrupt lines.
    pub fn new<O: ObjectType>(declare: DeclareFn) -> Self {
        Self {
            type_name: O::TYPE_NAME,
            cmdid_open: O::CMDID_OPEN,
            commands: O::COMMANDS,
            irq_count: 0,
            declare,
            create: None,
        }
    }

    /// Enables the interrupt lines of `O`.
    pub fn with_irqs<O: Interrupts>(mut self) -> Self {
        self.irq_count = O::IRQ_COUNT;
        self
    }

    /// Accepts the create command of `O`.
    pub fn creatable<O: Creatable>(mut self, create: CreateFn) -> Self {
        self.create = Some((O::CMDID_CREATE, create));
        self
    }

    /// Returns whether `id` belongs to this type's command set.
    pub fn implements(&self, id: CommandId) -> bool {
        mc_cmd::table::lookup(self.commands, id).is_some()
    }
}

impl core::fmt::Debug for ObjectClass {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ObjectClass")
            .field("type_name", &self.type_name)
            .field("irq_count", &self.irq_count)
            .finish_non_exhaustive()
    }
}
