//! gdscaffold
//!
//! Skeleton GDExtension plugin. The host loads the built library, calls
//! [`gdscaffold_library_init`] and then drives the two module callbacks once
//! per initialization level. Add your classes in [`register_classes`].

use anyhow::{Context, Result};
use gdscaffold_core::config::extension_config::ExtensionConfigBuilder;
use gdscaffold_core::config::logger_config::LoggerConfig;
use gdscaffold_core::{ClassDb, InitObject, ModuleInitializationLevel};
use gdscaffold_sys::{
    GDExtensionBool, GDExtensionClassLibraryPtr, GDExtensionInitialization,
    GDExtensionInterfaceGetProcAddress, GDEXTENSION_FALSE, GDEXTENSION_TRUE,
};

pub const EXTENSION_NAME: &str = "gdscaffold";

/// Level the module callbacks act at.
pub const MODULE_LEVEL: ModuleInitializationLevel = ModuleInitializationLevel::Scene;

/// Registration extension point, called once per load at [`MODULE_LEVEL`].
///
/// ```ignore
/// db.register_class::<Example>()?;
/// db.register_virtual_class::<ExampleVirtual>()?;
/// db.register_abstract_class::<ExampleAbstractBase>()?;
/// db.register_runtime_class::<ExampleRuntime>()?;
/// ```
pub fn register_classes(_db: &mut ClassDb) -> Result<()> {
    Ok(())
}

pub fn initialize_gdscaffold_module(level: ModuleInitializationLevel, db: &mut ClassDb) {
    if level != MODULE_LEVEL {
        return;
    }

    if let Err(e) = register_classes(db).context("class registration failed") {
        log::error!("{:?}", e);
    }
}

pub fn uninitialize_gdscaffold_module(level: ModuleInitializationLevel, _db: &mut ClassDb) {
    if level != MODULE_LEVEL {
        return;
    }
    // classes registered at this level are unregistered by the binding after this returns
}

/// Library entry point named in `gdscaffold.gdextension`.
///
/// # Safety
/// Must only be called by the host, with the arguments it defines for the
/// GDExtension entry point.
#[no_mangle]
pub unsafe extern "C" fn gdscaffold_library_init(
    p_get_proc_address: GDExtensionInterfaceGetProcAddress,
    p_library: GDExtensionClassLibraryPtr,
    r_initialization: *mut GDExtensionInitialization,
) -> GDExtensionBool {
    let mut init_obj = InitObject::new(p_get_proc_address, p_library, r_initialization);

    init_obj.register_initializer(initialize_gdscaffold_module);
    init_obj.register_terminator(uninitialize_gdscaffold_module);
    init_obj.set_minimum_library_initialization_level(MODULE_LEVEL);
    init_obj.set_config(
        ExtensionConfigBuilder::new()
            .with_extension_name(EXTENSION_NAME)
            .with_logger_config(LoggerConfig::default())
            .get(),
    );

    if init_obj.init() {
        GDEXTENSION_TRUE
    } else {
        GDEXTENSION_FALSE
    }
}
