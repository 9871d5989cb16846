//! Emulated management processor.

use std::collections::{BTreeMap, HashMap};

use mc_cmd::{
    Command, ObjectTypeName, Portal, Response, Status, TransportError,
    irq::{self, IrqConfig, IrqInfo},
    mng::{self, McVersion},
    object,
};

use crate::class::{ObjectClass, ObjectModel};

type ObjectKey = (ObjectTypeName, i32);

/// State of one interrupt line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IrqLine {
    pub cfg: IrqConfig,
    pub irq_type: i32,
    pub enable_state: u8,
    pub mask: u32,
    pub status: u32,
}

struct Object {
    class: usize,
    enabled: bool,
    irqs: Vec<IrqLine>,
    model: Box<dyn ObjectModel>,
}

impl Object {
    fn new(class: usize, irq_count: u8, model: Box<dyn ObjectModel>) -> Self {
        Self {
            class,
            enabled: false,
            irqs: vec![IrqLine::default(); irq_count as usize],
            model,
        }
    }
}

/// In-process stand-in for the Management Complex.
///
/// Objects are registered per type through [`ObjectClass`]. The emulator
/// allocates tokens on open and create, rejects unknown or closed tokens with
/// [`Status::AuthError`], and answers [`Status::UnsupportedOp`] for command
/// IDs the addressed type does not implement. Enable state, reset and
/// interrupt lines are handled here; everything else goes to the type's
/// [`ObjectModel`].
pub struct Emulator {
    version: McVersion,
    container_id: i32,
    classes: Vec<ObjectClass>,
    objects: BTreeMap<ObjectKey, Object>,
    sessions: HashMap<u16, ObjectKey>,
    last_token: u16,
    history: Vec<Command>,
}

impl Emulator {
    /// Starts describing a topology.
    pub fn builder() -> EmulatorBuilder {
        EmulatorBuilder::default()
    }

    /// Executes one command and returns its response.
    pub fn process(&mut self, cmd: &Command) -> Response {
        self.history.push(*cmd);

        let mut rsp = Response::new(cmd, Status::Ok);
        match self.dispatch(cmd, &mut rsp) {
            Ok(()) => rsp,
            Err(status) => {
                log::warn!(
                    "sim: command {} (token {:#x}) rejected: {}",
                    cmd.id(),
                    cmd.token(),
                    status
                );
                Response::new(cmd, status)
            }
        }
    }

    /// Commands received so far, oldest first.
    pub fn history(&self) -> &[Command] {
        &self.history
    }

    /// Number of open sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Returns whether the object exists.
    pub fn contains(&self, type_name: ObjectTypeName, id: i32) -> bool {
        self.objects.contains_key(&(type_name, id))
    }

    /// IDs of the objects of a type, ascending.
    pub fn object_ids(&self, type_name: ObjectTypeName) -> Vec<i32> {
        self.objects
            .keys()
            .filter(|(name, _)| *name == type_name)
            .map(|(_, id)| *id)
            .collect()
    }

    /// Returns whether the object is enabled.
    pub fn is_enabled(&self, type_name: ObjectTypeName, id: i32) -> Option<bool> {
        self.objects.get(&(type_name, id)).map(|obj| obj.enabled)
    }

    /// Returns the state of an interrupt line.
    pub fn irq_line(&self, type_name: ObjectTypeName, id: i32, irq_index: u8) -> Option<IrqLine> {
        self.objects
            .get(&(type_name, id))
            .and_then(|obj| obj.irqs.get(irq_index as usize).copied())
    }

    /// Latches `causes` into the status register of an interrupt line.
    ///
    /// Returns `false` if the object or line does not exist.
    pub fn raise_irq(&mut self, type_name: ObjectTypeName, id: i32, irq_index: u8, causes: u32) -> bool {
        match self
            .objects
            .get_mut(&(type_name, id))
            .and_then(|obj| obj.irqs.get_mut(irq_index as usize))
        {
            Some(line) => {
                line.status |= causes;
                true
            }
            None => false,
        }
    }

    fn dispatch(&mut self, cmd: &Command, rsp: &mut Response) -> Result<(), Status> {
        let id = cmd.id();

        if id == mng::CMDID_GET_VERSION {
            mng::write_get_version_response(rsp, &self.version);
            return Ok(());
        }
        if id == mng::CMDID_GET_CONT_ID {
            mng::write_get_container_id_response(rsp, self.container_id);
            return Ok(());
        }
        if let Some(class) = self.classes.iter().position(|c| c.cmdid_open == id) {
            return self.open(class, cmd, rsp);
        }
        if let Some(class) = self
            .classes
            .iter()
            .position(|c| c.create.is_some_and(|(create, _)| create == id))
        {
            return self.create(class, cmd, rsp);
        }
        if !self.classes.iter().any(|c| c.implements(id)) {
            return Err(Status::UnsupportedOp);
        }

        let token = cmd.token();
        let key = *self.sessions.get(&token).ok_or(Status::AuthError)?;
        let class = self
            .objects
            .get(&key)
            .map(|obj| obj.class)
            .ok_or(Status::AuthError)?;
        if !self.classes[class].implements(id) {
            return Err(Status::UnsupportedOp);
        }

        match id {
            object::CMDID_CLOSE => {
                self.sessions.remove(&token);
                log::debug!("sim: {}.{}: session {:#x} closed", key.0, key.1, token);
                return Ok(());
            }
            object::CMDID_DESTROY => {
                self.objects.remove(&key);
                self.sessions.retain(|_, open| *open != key);
                log::debug!("sim: {}.{}: destroyed", key.0, key.1);
                return Ok(());
            }
            _ => {}
        }

        let obj = self.objects.get_mut(&key).ok_or(Status::AuthError)?;
        match id {
            object::CMDID_ENABLE => obj.enabled = true,
            object::CMDID_DISABLE => obj.enabled = false,
            object::CMDID_IS_ENABLED => object::write_is_enabled_response(rsp, obj.enabled),
            object::CMDID_RESET => {
                obj.enabled = false;
                obj.irqs.fill(IrqLine::default());
                obj.model.reset();
            }
            irq::CMDID_SET_IRQ
            | irq::CMDID_GET_IRQ
            | irq::CMDID_SET_IRQ_ENABLE
            | irq::CMDID_GET_IRQ_ENABLE
            | irq::CMDID_SET_IRQ_MASK
            | irq::CMDID_GET_IRQ_MASK
            | irq::CMDID_GET_IRQ_STATUS
            | irq::CMDID_CLEAR_IRQ_STATUS => irq_command(&mut obj.irqs, cmd, rsp)?,
            _ => obj.model.handle(key.1, cmd, rsp)?,
        }
        Ok(())
    }

    fn open(&mut self, class: usize, cmd: &Command, rsp: &mut Response) -> Result<(), Status> {
        let key = (self.classes[class].type_name, object::read_open_request(cmd));
        if !self.objects.contains_key(&key) {
            return Err(Status::ConfigError);
        }

        let token = self.allocate_token()?;
        self.sessions.insert(token, key);
        rsp.set_token(token);
        log::debug!("sim: {}.{}: opened, token {:#x}", key.0, key.1, token);
        Ok(())
    }

    fn create(&mut self, class: usize, cmd: &Command, rsp: &mut Response) -> Result<(), Status> {
        let ObjectClass {
            type_name,
            irq_count,
            create,
            ..
        } = self.classes[class].clone();
        let (_, build) = create.ok_or(Status::UnsupportedOp)?;
        let new = build(cmd)?;

        let id = match new.requested_id {
            Some(id) if id >= 0 => {
                if self.objects.contains_key(&(type_name, id)) {
                    return Err(Status::ConfigError);
                }
                id
            }
            _ => self.free_id(type_name)?,
        };

        let token = self.allocate_token()?;
        self.objects
            .insert((type_name, id), Object::new(class, irq_count, new.model));
        self.sessions.insert(token, (type_name, id));
        rsp.set_token(token);
        log::debug!("sim: {}.{}: created, token {:#x}", type_name, id, token);
        Ok(())
    }

    fn free_id(&self, type_name: ObjectTypeName) -> Result<i32, Status> {
        (0..i32::MAX)
            .find(|id| !self.objects.contains_key(&(type_name, *id)))
            .ok_or(Status::NoResource)
    }

    fn allocate_token(&mut self) -> Result<u16, Status> {
        for _ in 0..u16::MAX {
            self.last_token = self.last_token.wrapping_add(1);
            if self.last_token != 0 && !self.sessions.contains_key(&self.last_token) {
                return Ok(self.last_token);
            }
        }
        Err(Status::NoResource)
    }
}

fn irq_command(irqs: &mut [IrqLine], cmd: &Command, rsp: &mut Response) -> Result<(), Status> {
    let irq_index = if cmd.id() == irq::CMDID_SET_IRQ {
        irq::read_set_irq_request(cmd).0
    } else {
        irq::read_irq_index_request(cmd)
    };
    let line = irqs
        .get_mut(irq_index as usize)
        .ok_or(Status::ConfigError)?;

    match cmd.id() {
        irq::CMDID_SET_IRQ => line.cfg = irq::read_set_irq_request(cmd).1,
        irq::CMDID_GET_IRQ => irq::write_get_irq_response(
            rsp,
            &IrqInfo {
                irq_type: line.irq_type,
                cfg: line.cfg,
            },
        ),
        irq::CMDID_SET_IRQ_ENABLE => line.enable_state = irq::read_set_irq_enable_request(cmd).1,
        irq::CMDID_GET_IRQ_ENABLE => irq::write_get_irq_enable_response(rsp, line.enable_state),
        irq::CMDID_SET_IRQ_MASK => line.mask = irq::read_set_irq_mask_request(cmd).1,
        irq::CMDID_GET_IRQ_MASK => irq::write_get_irq_mask_response(rsp, line.mask),
        irq::CMDID_GET_IRQ_STATUS => {
            let (_, selected) = irq::read_get_irq_status_request(cmd);
            let pending = if selected == 0 {
                line.status
            } else {
                line.status & selected
            };
            irq::write_get_irq_status_response(rsp, pending);
        }
        irq::CMDID_CLEAR_IRQ_STATUS => line.status &= !irq::read_clear_irq_status_request(cmd).1,
        _ => return Err(Status::UnsupportedOp),
    }
    Ok(())
}

impl Portal for Emulator {
    /// Round-trips both frames through their wire image. The response frame
    /// carries only the words the command produced.
    fn send(&mut self, cmd: &Command) -> Result<Response, TransportError> {
        let request = Command::from_wire(&cmd.to_wire()).map_err(TransportError::Malformed)?;
        let rsp = self.process(&request);

        let frame = rsp.to_wire();
        let used = (rsp.len() + 1) * size_of::<u64>();
        Response::from_wire(&frame[..used]).map_err(TransportError::Malformed)
    }
}

/// Topology of an [`Emulator`].
#[derive(Debug)]
pub struct EmulatorBuilder {
    version: McVersion,
    container_id: i32,
    classes: Vec<ObjectClass>,
    declared: Vec<ObjectKey>,
}

impl Default for EmulatorBuilder {
    fn default() -> Self {
        Self {
            version: McVersion {
                major: mng::MC_VER_MAJOR,
                minor: 0,
                revision: 0,
            },
            container_id: 1,
            classes: Vec::new(),
            declared: Vec::new(),
        }
    }
}

impl EmulatorBuilder {
    /// Firmware version reported by get-version.
    pub fn version(mut self, version: McVersion) -> Self {
        self.version = version;
        self
    }

    /// Container ID reported by get-container-id.
    pub fn container_id(mut self, id: i32) -> Self {
        self.container_id = id;
        self
    }

    /// Registers an object type.
    pub fn class(mut self, class: ObjectClass) -> Self {
        self.classes.push(class);
        self
    }

    /// Declares an object that exists from the start.
    pub fn object(mut self, type_name: ObjectTypeName, id: i32) -> Self {
        self.declared.push((type_name, id));
        self
    }

    pub fn build(self) -> Result<Emulator, TopologyError> {
        for (i, class) in self.classes.iter().enumerate() {
            if self.classes[..i]
                .iter()
                .any(|other| other.type_name == class.type_name)
            {
                return Err(TopologyError::DuplicateClass(class.type_name));
            }
        }

        let mut objects = BTreeMap::new();
        for (type_name, id) in self.declared {
            let class = self
                .classes
                .iter()
                .position(|c| c.type_name == type_name)
                .ok_or(TopologyError::UnknownType(type_name))?;
            let ObjectClass {
                irq_count,
                declare,
                ..
            } = self.classes[class];
            let object = Object::new(class, irq_count, declare());
            if objects.insert((type_name, id), object).is_some() {
                return Err(TopologyError::DuplicateObject { type_name, id });
            }
        }

        Ok(Emulator {
            version: self.version,
            container_id: self.container_id,
            classes: self.classes,
            objects,
            sessions: HashMap::new(),
            last_token: 0,
            history: Vec::new(),
        })
    }
}

/// Error returned by [`EmulatorBuilder::build`].
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("object type `{0}` registered twice")]
    DuplicateClass(ObjectTypeName),
    #[error("object type `{0}` is not registered")]
    UnknownType(ObjectTypeName),
    #[error("object {type_name}.{id} declared twice")]
    DuplicateObject { type_name: ObjectTypeName, id: i32 },
}
