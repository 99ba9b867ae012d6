use std::fmt;

use gdscaffold_sys::{
    GDExtensionInitializationLevel, GDEXTENSION_INITIALIZATION_CORE,
    GDEXTENSION_INITIALIZATION_EDITOR, GDEXTENSION_INITIALIZATION_SCENE,
    GDEXTENSION_INITIALIZATION_SERVERS,
};

use crate::error::LevelError;

/// Stage of host startup at which module callbacks fire.
///
/// The host initializes levels in ascending order and deinitializes them in
/// descending order, so `Core` is always the first and the last call of a load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModuleInitializationLevel {
    Core,
    Servers,
    Scene,
    Editor,
}

impl ModuleInitializationLevel {
    pub const ALL: [ModuleInitializationLevel; 4] =
        [Self::Core, Self::Servers, Self::Scene, Self::Editor];

    pub fn as_raw(self) -> GDExtensionInitializationLevel {
        match self {
            Self::Core => GDEXTENSION_INITIALIZATION_CORE,
            Self::Servers => GDEXTENSION_INITIALIZATION_SERVERS,
            Self::Scene => GDEXTENSION_INITIALIZATION_SCENE,
            Self::Editor => GDEXTENSION_INITIALIZATION_EDITOR,
        }
    }
}

impl TryFrom<GDExtensionInitializationLevel> for ModuleInitializationLevel {
    type Error = LevelError;

    fn try_from(raw: GDExtensionInitializationLevel) -> Result<Self, Self::Error> {
        match raw {
            GDEXTENSION_INITIALIZATION_CORE => Ok(Self::Core),
            GDEXTENSION_INITIALIZATION_SERVERS => Ok(Self::Servers),
            GDEXTENSION_INITIALIZATION_SCENE => Ok(Self::Scene),
            GDEXTENSION_INITIALIZATION_EDITOR => Ok(Self::Editor),
            other => Err(LevelError::Unknown(other)),
        }
    }
}

impl fmt::Display for ModuleInitializationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Core => "core",
            Self::Servers => "servers",
            Self::Scene => "scene",
            Self::Editor => "editor",
        };
        f.write_str(name)
    }
}
