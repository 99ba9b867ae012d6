use thiserror::Error;

use crate::level::ModuleInitializationLevel;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("unknown initialization level: {0}")]
    Unknown(i32),
}

#[derive(Debug, Error)]
pub enum BindingError {
    #[error("initialization callback must be registered before init")]
    MissingInitializer,

    #[error("host passed a null get_proc_address")]
    NullProcAddress,

    #[error("host passed a null initialization record")]
    NullInitialization,

    #[error("unable to load GDExtension interface function {0}()")]
    MissingInterfaceFunction(&'static str),

    #[error(
        "cannot load a GDExtension built for Godot {required_major}.{required_minor} \
         using an older version of Godot ({found})"
    )]
    IncompatibleGodotVersion { found: String, required_major: u32, required_minor: u32 },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassDbError {
    #[error("class '{0}' registered outside of a module initialization callback")]
    NotInitializing(&'static str),

    #[error("class '{name}' is already registered (at level {level})")]
    AlreadyRegistered { name: &'static str, level: ModuleInitializationLevel },
}
