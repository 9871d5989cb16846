//! Invocation context shared by the command handlers.

use std::io::Write;

use log::{debug, warn};
use mc_cmd::{
    CommandFlags, ObjectTypeName, Portal, ReleaseError,
    mng::{self, McVersion},
    object::check_version,
};
use mc_object_dprc::{Dprc, DprcAttr, DprcSession};

use crate::{
    error::CliError,
    options::OptionSet,
    registry::{self, ObjectCommand},
};

/// Flags of every command sent by the tool.
pub const CMD_FLAGS: CommandFlags = CommandFlags::empty();

/// State of one resource manager invocation.
///
/// Holds the portal to the management processor, the output sink, the
/// options of the running command and what was learned from the firmware
/// at start-up. The root container stays open for the whole invocation
/// and is closed by [`Resman::close`].
pub struct Resman<'a> {
    portal: &'a mut dyn Portal,
    out: &'a mut dyn Write,
    global: OptionSet,
    options: OptionSet,
    obj_name: Option<String>,
    mc_version: McVersion,
    root_dprc_id: i32,
    root_dprc: DprcSession,
}

impl<'a> Resman<'a> {
    /// Queries the firmware and opens the root container.
    pub fn connect(
        portal: &'a mut dyn Portal,
        out: &'a mut dyn Write,
        global: OptionSet,
    ) -> Result<Self, CliError> {
        let mc_version = mng::get_version(portal, CMD_FLAGS)?;
        if !mc_version.is_supported() {
            return Err(CliError::UnsupportedFirmware(mc_version));
        }
        let root_dprc_id = mng::get_container_id(portal, CMD_FLAGS)?;
        debug!("resman: MC firmware {mc_version}, root container dprc.{root_dprc_id}");

        let root_dprc = DprcSession::open(portal, CMD_FLAGS, root_dprc_id)?;
        let mut resman = Self {
            portal,
            out,
            global,
            options: OptionSet::default(),
            obj_name: None,
            mc_version,
            root_dprc_id,
            root_dprc,
        };
        if let Err(err) = resman
            .root_dprc_attributes()
            .and_then(|attr| check_version::<Dprc>(attr.version).map_err(CliError::from))
        {
            if let Err(close_err) = resman.close() {
                warn!("resman: closing the root container failed: {close_err}");
            }
            return Err(err);
        }
        Ok(resman)
    }

    /// Closes the root container.
    pub fn close(self) -> Result<(), CliError> {
        let Self {
            portal, root_dprc, ..
        } = self;
        released(root_dprc.close(portal, CMD_FLAGS))
    }

    /// Runs `command` of `obj_type` with the arguments following the
    /// command name.
    pub fn dispatch(
        &mut self,
        obj_type: ObjectTypeName,
        commands: &'static [ObjectCommand],
        args: &[String],
    ) -> Result<(), CliError> {
        let (name, args) = args
            .split_first()
            .ok_or(CliError::MissingCommand(obj_type))?;
        let command = registry::find_command(obj_type, commands, name)?;

        let mut options = OptionSet::new(command.options);
        let mut positional = options.parse(args)?.into_iter();
        self.obj_name = positional.next();
        if let Some(extra) = positional.next() {
            return Err(CliError::ExtraArgument(extra));
        }
        self.options = options;

        debug!("resman: {obj_type} {}", command.name);
        (command.func)(self)?;
        self.options.finish()
    }

    #[inline]
    pub fn portal(&mut self) -> &mut dyn Portal {
        &mut *self.portal
    }

    #[inline]
    pub fn out(&mut self) -> &mut dyn Write {
        &mut *self.out
    }

    /// Options of the running command.
    #[inline]
    pub fn options(&mut self) -> &mut OptionSet {
        &mut self.options
    }

    /// Global options left after start-up.
    #[inline]
    pub fn global_options(&mut self) -> &mut OptionSet {
        &mut self.global
    }

    #[inline]
    pub fn obj_name(&self) -> Option<&str> {
        self.obj_name.as_deref()
    }

    /// Parses the object name of the command, which must name an object of
    /// `obj_type`.
    pub fn object_id(&self, obj_type: ObjectTypeName) -> Result<i32, CliError> {
        let name = self.obj_name().ok_or(CliError::MissingObjectName)?;
        parse_object_name(name, obj_type)
    }

    /// Fails if an object name was given to a command that takes none.
    pub fn expect_no_object_name(&self) -> Result<(), CliError> {
        match &self.obj_name {
            Some(name) => Err(CliError::ExtraArgument(name.clone())),
            None => Ok(()),
        }
    }

    #[inline]
    pub fn mc_version(&self) -> McVersion {
        self.mc_version
    }

    #[inline]
    pub fn root_dprc_id(&self) -> i32 {
        self.root_dprc_id
    }

    /// Reads the attributes of the root container.
    pub fn root_dprc_attributes(&mut self) -> Result<DprcAttr, CliError> {
        Ok(self.root_dprc.get_attributes(self.portal, CMD_FLAGS)?)
    }
}

/// Splits `<type>.<id>` and checks the type.
pub fn parse_object_name(name: &str, obj_type: ObjectTypeName) -> Result<i32, CliError> {
    let (found, id) = name
        .split_once('.')
        .ok_or_else(|| CliError::InvalidObjectName(name.to_owned()))?;
    if obj_type != found {
        return Err(CliError::WrongObjectType {
            name: name.to_owned(),
            expected: obj_type,
        });
    }
    id.parse::<i32>()
        .ok()
        .filter(|id| *id >= 0)
        .ok_or_else(|| CliError::InvalidObjectName(name.to_owned()))
}

/// Maps a failed close or destroy to its cause.
pub fn released<T>(result: Result<(), ReleaseError<T>>) -> Result<(), CliError> {
    result.map_err(|err| CliError::Command(err.source))
}
