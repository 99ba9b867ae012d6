//! The binding object the entry point builds from the host's handles.
//!
//! The host calls the library's entry point once per load with a resolver, a
//! library handle and an initialization record to fill in. [`InitObject`]
//! collects the module callbacks, checks the host, and writes the record.
//! Everything one load needs afterwards lives in a boxed [`LoadedLibrary`]
//! that rides along as the record's `userdata`; the host hands it back on
//! every lifecycle call and it is released once the lowest level it saw
//! initialized has been deinitialized again.

use std::ffi::c_void;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};

use gdscaffold_sys::{
    GDExtensionClassLibraryPtr, GDExtensionInitialization, GDExtensionInitializationLevel,
    GDExtensionInterfaceGetProcAddress,
};

use crate::class_db::ClassDb;
use crate::config::extension_config::ExtensionConfig;
use crate::error::BindingError;
use crate::interface::{HostInterface, HostPrinter};
use crate::level::ModuleInitializationLevel;
use crate::logger::Logger;

/// Module lifecycle callback. Invoked once per initialization level.
pub type ModuleCallback = fn(ModuleInitializationLevel, &mut ClassDb);

/// Builds and hands over the per-load state.
pub struct InitObject {
    get_proc_address: GDExtensionInterfaceGetProcAddress,
    library: GDExtensionClassLibraryPtr,
    initialization: *mut GDExtensionInitialization,
    initializer: Option<ModuleCallback>,
    terminator: Option<ModuleCallback>,
    minimum_level: ModuleInitializationLevel,
    config: ExtensionConfig,
}

impl InitObject {
    /// Wraps the three handles the host passed to the entry point.
    ///
    /// Nothing is dereferenced here; the handles are only checked and used
    /// in [`InitObject::try_init`].
    pub fn new(
        get_proc_address: GDExtensionInterfaceGetProcAddress,
        library: GDExtensionClassLibraryPtr,
        initialization: *mut GDExtensionInitialization,
    ) -> Self {
        Self {
            get_proc_address,
            library,
            initialization,
            initializer: None,
            terminator: None,
            minimum_level: ModuleInitializationLevel::Core,
            config: ExtensionConfig::default(),
        }
    }

    pub fn register_initializer(&mut self, initializer: ModuleCallback) {
        self.initializer = Some(initializer);
    }

    pub fn register_terminator(&mut self, terminator: ModuleCallback) {
        self.terminator = Some(terminator);
    }

    pub fn set_minimum_library_initialization_level(&mut self, level: ModuleInitializationLevel) {
        self.minimum_level = level;
    }

    pub fn set_config(&mut self, config: ExtensionConfig) {
        self.config = config;
    }

    /// Checks the host and fills in the initialization record.
    ///
    /// This is the value to return from the entry point: `false` tells the
    /// host to unload the library.
    pub fn init(self) -> bool {
        self.try_init().is_ok()
    }

    /// Same as [`InitObject::init`], keeping the failure reason.
    ///
    /// Failures are reported to the host through `print_error` as soon as it
    /// is resolved, and to stderr before that. The record is only written on
    /// success.
    pub fn try_init(self) -> Result<(), BindingError> {
        // SAFETY: the resolver came straight from the host's entry point call.
        let printer = match unsafe { HostPrinter::resolve(self.get_proc_address) } {
            Ok(printer) => printer,
            Err(e) => {
                eprintln!("[{}] GDExtension init failed: {}", self.config.extension_name(), e);
                return Err(e);
            }
        };

        self.finish(printer).map_err(|e| {
            let message = format!("GDExtension init failed: {}", e);
            log::debug!("{}", message);
            printer.error(&message, "InitObject::try_init", file!(), line!());
            e
        })
    }

    fn finish(self, printer: HostPrinter) -> Result<(), BindingError> {
        let initializer = self.initializer.ok_or(BindingError::MissingInitializer)?;
        if self.initialization.is_null() {
            return Err(BindingError::NullInitialization);
        }

        // SAFETY: as in `try_init`.
        let interface = unsafe { HostInterface::load(self.get_proc_address, printer)? };

        if let Some(logger_config) = self.config.logger_config() {
            let name = self.config.extension_name();
            Logger::init_logging(name, logger_config.clone(), Some(printer));
        }
        log::info!(
            "{} loading into {} (minimum level {})",
            self.config.extension_name(),
            interface.godot_version(),
            self.minimum_level
        );

        let loaded = Box::new(LoadedLibrary {
            interface,
            library: self.library,
            initializer,
            terminator: self.terminator,
            minimum_level: self.minimum_level,
            lowest_initialized: None,
            class_db: ClassDb::new(),
        });
        LIVE_LOADS.fetch_add(1, Ordering::SeqCst);

        // SAFETY: non-null, and the host guarantees it points at a record it owns.
        unsafe {
            *self.initialization = GDExtensionInitialization {
                minimum_initialization_level: self.minimum_level.as_raw(),
                userdata: Box::into_raw(loaded).cast::<c_void>(),
                initialize: Some(initialize_level),
                deinitialize: Some(deinitialize_level),
            };
        }
        Ok(())
    }
}

static LIVE_LOADS: AtomicUsize = AtomicUsize::new(0);

/// Number of loads whose state the host has not released yet.
pub fn live_loads() -> usize {
    LIVE_LOADS.load(Ordering::SeqCst)
}

/// State of one load, owned by the host through `userdata`.
pub struct LoadedLibrary {
    interface: HostInterface,
    library: GDExtensionClassLibraryPtr,
    initializer: ModuleCallback,
    terminator: Option<ModuleCallback>,
    minimum_level: ModuleInitializationLevel,
    lowest_initialized: Option<ModuleInitializationLevel>,
    class_db: ClassDb,
}

impl LoadedLibrary {
    pub fn interface(&self) -> &HostInterface {
        &self.interface
    }

    /// Library token the host identifies this extension by.
    pub fn library(&self) -> GDExtensionClassLibraryPtr {
        self.library
    }

    pub fn minimum_level(&self) -> ModuleInitializationLevel {
        self.minimum_level
    }

    pub fn class_db(&self) -> &ClassDb {
        &self.class_db
    }

    fn initialize(&mut self, level: ModuleInitializationLevel) {
        self.lowest_initialized = Some(self.lowest_initialized.map_or(level, |l| l.min(level)));
        self.class_db.enter_level(level);
        let initializer = self.initializer;
        guarded("initializer", level, || initializer(level, &mut self.class_db));
    }

    /// Returns `true` once the lowest initialized level has been torn down.
    ///
    /// A load at engine startup walks down to `Core`; a load while the
    /// engine runs (editor, hot reload) only walks down to the minimum level.
    fn deinitialize(&mut self, level: ModuleInitializationLevel) -> bool {
        self.class_db.enter_level(level);
        if let Some(terminator) = self.terminator {
            guarded("terminator", level, || terminator(level, &mut self.class_db));
        }
        self.class_db.deinitialize(level);
        self.lowest_initialized.map_or(true, |lowest| level <= lowest)
    }
}

impl Drop for LoadedLibrary {
    fn drop(&mut self) {
        LIVE_LOADS.fetch_sub(1, Ordering::SeqCst);
    }
}

fn guarded(what: &str, level: ModuleInitializationLevel, f: impl FnOnce()) {
    if catch_unwind(AssertUnwindSafe(f)).is_err() {
        log::error!("module {} panicked at level {}", what, level);
    }
}

fn decode_level(raw: GDExtensionInitializationLevel) -> Option<ModuleInitializationLevel> {
    match ModuleInitializationLevel::try_from(raw) {
        Ok(level) => Some(level),
        Err(e) => {
            log::warn!("ignoring lifecycle call: {}", e);
            None
        }
    }
}

unsafe extern "C" fn initialize_level(
    userdata: *mut c_void,
    level: GDExtensionInitializationLevel,
) {
    if userdata.is_null() {
        return;
    }
    let Some(level) = decode_level(level) else {
        return;
    };
    let loaded = &mut *userdata.cast::<LoadedLibrary>();
    log::debug!("initialize level {}", level);
    loaded.initialize(level);
}

unsafe extern "C" fn deinitialize_level(
    userdata: *mut c_void,
    level: GDExtensionInitializationLevel,
) {
    if userdata.is_null() {
        return;
    }
    let Some(level) = decode_level(level) else {
        return;
    };
    let loaded = &mut *userdata.cast::<LoadedLibrary>();
    log::debug!("deinitialize level {}", level);

    if loaded.deinitialize(level) {
        log::debug!("releasing library state after level {}", level);
        drop(Box::from_raw(userdata.cast::<LoadedLibrary>()));
    }
}

/// Borrows the per-load state behind a `userdata` pointer the binding wrote.
///
/// # Safety
/// `userdata` must come from a record filled by [`InitObject::try_init`],
/// and its lowest initialized level must not have been deinitialized yet.
pub unsafe fn loaded_library<'a>(userdata: *mut c_void) -> Option<&'a LoadedLibrary> {
    userdata.cast::<LoadedLibrary>().as_ref()
}
