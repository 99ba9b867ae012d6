//! Raw GDExtension C ABI.
//!
//! Only the slice of `gdextension_interface.h` the entry point and the
//! lifecycle callbacks touch is declared here. Layouts must match the header
//! exactly; nothing in this crate is safe to use without the host's contract.

#![allow(non_camel_case_types)]

use std::ffi::{c_char, c_void};

pub type GDExtensionBool = u8;

pub const GDEXTENSION_TRUE: GDExtensionBool = 1;
pub const GDEXTENSION_FALSE: GDExtensionBool = 0;

/// C enum, passed by value as an `int`.
pub type GDExtensionInitializationLevel = i32;

pub const GDEXTENSION_INITIALIZATION_CORE: GDExtensionInitializationLevel = 0;
pub const GDEXTENSION_INITIALIZATION_SERVERS: GDExtensionInitializationLevel = 1;
pub const GDEXTENSION_INITIALIZATION_SCENE: GDExtensionInitializationLevel = 2;
pub const GDEXTENSION_INITIALIZATION_EDITOR: GDExtensionInitializationLevel = 3;
pub const GDEXTENSION_MAX_INITIALIZATION_LEVEL: GDExtensionInitializationLevel = 4;

pub type GDExtensionClassLibraryPtr = *mut c_void;

/// Type-erased host function, cast to its real signature after resolution.
pub type GDExtensionInterfaceFunctionPtr = Option<unsafe extern "C" fn()>;

pub type GDExtensionInterfaceGetProcAddress =
    Option<unsafe extern "C" fn(p_function_name: *const c_char) -> GDExtensionInterfaceFunctionPtr>;

pub type GDExtensionInitializeCallback =
    Option<unsafe extern "C" fn(p_userdata: *mut c_void, p_level: GDExtensionInitializationLevel)>;

pub type GDExtensionDeinitializeCallback =
    Option<unsafe extern "C" fn(p_userdata: *mut c_void, p_level: GDExtensionInitializationLevel)>;

/// Filled in by the extension during the entry point call.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct GDExtensionInitialization {
    /// Minimum level at which the extension can be (re)loaded.
    pub minimum_initialization_level: GDExtensionInitializationLevel,
    /// Passed back verbatim to `initialize` and `deinitialize`.
    pub userdata: *mut c_void,
    pub initialize: GDExtensionInitializeCallback,
    pub deinitialize: GDExtensionDeinitializeCallback,
}

impl Default for GDExtensionInitialization {
    fn default() -> Self {
        Self {
            minimum_initialization_level: GDEXTENSION_INITIALIZATION_CORE,
            userdata: std::ptr::null_mut(),
            initialize: None,
            deinitialize: None,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct GDExtensionGodotVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub string: *const c_char,
}

impl Default for GDExtensionGodotVersion {
    fn default() -> Self {
        Self { major: 0, minor: 0, patch: 0, string: std::ptr::null() }
    }
}

// Signatures of the interface functions resolved through `get_proc_address`.

/// `get_godot_version`
pub type GDExtensionInterfaceGetGodotVersion =
    unsafe extern "C" fn(r_godot_version: *mut GDExtensionGodotVersion);

/// `print_error`
pub type GDExtensionInterfacePrintError = unsafe extern "C" fn(
    p_description: *const c_char,
    p_function: *const c_char,
    p_file: *const c_char,
    p_line: i32,
    p_editor_notify: GDExtensionBool,
);

/// `print_warning`
pub type GDExtensionInterfacePrintWarning = unsafe extern "C" fn(
    p_description: *const c_char,
    p_function: *const c_char,
    p_file: *const c_char,
    p_line: i32,
    p_editor_notify: GDExtensionBool,
);
