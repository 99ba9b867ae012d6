//! Host functions resolved through `get_proc_address`.

use std::ffi::{c_char, CStr, CString};
use std::fmt;

use gdscaffold_sys::{
    GDExtensionGodotVersion, GDExtensionInterfaceFunctionPtr, GDExtensionInterfaceGetGodotVersion,
    GDExtensionInterfaceGetProcAddress, GDExtensionInterfacePrintError,
    GDExtensionInterfacePrintWarning, GDEXTENSION_FALSE,
};

use crate::error::BindingError;

/// Oldest engine the extension ABI used here is compatible with.
pub const MINIMUM_GODOT_MAJOR: u32 = 4;
pub const MINIMUM_GODOT_MINOR: u32 = 1;

type RawGetProcAddress = unsafe extern "C" fn(*const c_char) -> GDExtensionInterfaceFunctionPtr;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GodotVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub string: String,
}

impl GodotVersion {
    pub fn is_at_least(&self, major: u32, minor: u32) -> bool {
        (self.major, self.minor) >= (major, minor)
    }

    /// # Safety
    /// `raw.string` must be null or a valid NUL-terminated string.
    unsafe fn from_raw(raw: &GDExtensionGodotVersion) -> Self {
        let string = if raw.string.is_null() {
            format!("{}.{}.{}", raw.major, raw.minor, raw.patch)
        } else {
            CStr::from_ptr(raw.string).to_string_lossy().into_owned()
        };
        Self { major: raw.major, minor: raw.minor, patch: raw.patch, string }
    }
}

impl fmt::Display for GodotVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.string)
    }
}

/// Host print functions. Plain function pointers, so this is `Copy` and can
/// be moved into the log backend.
#[derive(Clone, Copy, Debug)]
pub struct HostPrinter {
    print_error: GDExtensionInterfacePrintError,
    print_warning: Option<GDExtensionInterfacePrintWarning>,
}

impl HostPrinter {
    pub fn new(
        print_error: GDExtensionInterfacePrintError,
        print_warning: Option<GDExtensionInterfacePrintWarning>,
    ) -> Self {
        Self { print_error, print_warning }
    }

    /// Resolves `print_error` (required) and `print_warning` (optional).
    ///
    /// # Safety
    /// `get_proc_address` must be the resolver the host passed to the entry
    /// point.
    pub unsafe fn resolve(
        get_proc_address: GDExtensionInterfaceGetProcAddress,
    ) -> Result<Self, BindingError> {
        let resolve = get_proc_address.ok_or(BindingError::NullProcAddress)?;

        let print_error = resolve_fn(resolve, c"print_error")
            .ok_or(BindingError::MissingInterfaceFunction("print_error"))?;
        let print_error: GDExtensionInterfacePrintError = std::mem::transmute(print_error);
        let print_warning = resolve_fn(resolve, c"print_warning").map(|f| {
            std::mem::transmute::<unsafe extern "C" fn(), GDExtensionInterfacePrintWarning>(f)
        });

        Ok(Self::new(print_error, print_warning))
    }

    pub fn error(&self, description: &str, function: &str, file: &str, line: u32) {
        let (d, func, file) = (to_cstring(description), to_cstring(function), to_cstring(file));
        let line = clamp_line(line);
        // SAFETY: resolved from the host; all strings outlive the call.
        unsafe {
            (self.print_error)(d.as_ptr(), func.as_ptr(), file.as_ptr(), line, GDEXTENSION_FALSE)
        }
    }

    /// Falls back to `print_error` when the host has no `print_warning`.
    pub fn warning(&self, description: &str, function: &str, file: &str, line: u32) {
        let Some(print_warning) = self.print_warning else {
            return self.error(description, function, file, line);
        };
        let (d, func, file) = (to_cstring(description), to_cstring(function), to_cstring(file));
        let line = clamp_line(line);
        // SAFETY: as above.
        unsafe {
            print_warning(d.as_ptr(), func.as_ptr(), file.as_ptr(), line, GDEXTENSION_FALSE)
        }
    }
}

fn to_cstring(s: &str) -> CString {
    CString::new(s.replace('\0', "")).unwrap_or_default()
}

fn clamp_line(line: u32) -> i32 {
    i32::try_from(line).unwrap_or(i32::MAX)
}

/// The host functions one load depends on.
#[derive(Clone, Debug)]
pub struct HostInterface {
    printer: HostPrinter,
    godot_version: GodotVersion,
}

impl HostInterface {
    /// Resolves the remaining required functions and checks the engine
    /// version. Failures are returned, not printed; the caller owns reporting.
    ///
    /// # Safety
    /// `get_proc_address` must be the resolver the host passed to the entry
    /// point, and every function it returns must have the signature the
    /// GDExtension header declares for that name.
    pub unsafe fn load(
        get_proc_address: GDExtensionInterfaceGetProcAddress,
        printer: HostPrinter,
    ) -> Result<Self, BindingError> {
        let resolve = get_proc_address.ok_or(BindingError::NullProcAddress)?;

        let get_godot_version = resolve_fn(resolve, c"get_godot_version")
            .ok_or(BindingError::MissingInterfaceFunction("get_godot_version"))?;
        let get_godot_version: GDExtensionInterfaceGetGodotVersion =
            std::mem::transmute(get_godot_version);

        let mut raw = GDExtensionGodotVersion::default();
        get_godot_version(&mut raw);
        let godot_version = GodotVersion::from_raw(&raw);

        if !godot_version.is_at_least(MINIMUM_GODOT_MAJOR, MINIMUM_GODOT_MINOR) {
            return Err(BindingError::IncompatibleGodotVersion {
                found: godot_version.string,
                required_major: MINIMUM_GODOT_MAJOR,
                required_minor: MINIMUM_GODOT_MINOR,
            });
        }

        Ok(Self { printer, godot_version })
    }

    pub fn godot_version(&self) -> &GodotVersion {
        &self.godot_version
    }

    pub fn printer(&self) -> HostPrinter {
        self.printer
    }
}

unsafe fn resolve_fn(resolve: RawGetProcAddress, name: &CStr) -> GDExtensionInterfaceFunctionPtr {
    let f = resolve(name.as_ptr());
    if f.is_none() {
        log::debug!("host does not provide {:?}", name);
    }
    f
}
