//! Plays the host: resolves interface functions, calls the entry point, then
//! walks the initialization levels up and back down like the engine does.

use std::ffi::{c_char, c_void, CStr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use gdscaffold::{
    gdscaffold_library_init, initialize_gdscaffold_module, uninitialize_gdscaffold_module,
};
use gdscaffold_core::binding::{live_loads, loaded_library};
use gdscaffold_core::{ClassDb, InitObject, ModuleInitializationLevel};
use gdscaffold_sys::{
    GDExtensionClassLibraryPtr, GDExtensionGodotVersion, GDExtensionInitialization,
    GDExtensionInterfaceFunctionPtr, GDExtensionInterfaceGetGodotVersion,
    GDExtensionInterfaceGetProcAddress, GDExtensionInterfacePrintError, GDEXTENSION_FALSE,
    GDEXTENSION_TRUE,
};
use pretty_assertions::assert_eq;

use gdscaffold_core::ModuleInitializationLevel::{Core, Editor, Scene, Servers};

type Erased = unsafe extern "C" fn();

static HOST_ERRORS: AtomicUsize = AtomicUsize::new(0);

/// One host at a time: `live_loads` is process-wide.
static HOST: Mutex<()> = Mutex::new(());

fn host() -> MutexGuard<'static, ()> {
    HOST.lock().unwrap_or_else(|e| e.into_inner())
}

unsafe extern "C" fn print_error(
    _: *const c_char,
    _: *const c_char,
    _: *const c_char,
    _: i32,
    _: u8,
) {
    HOST_ERRORS.fetch_add(1, Ordering::SeqCst);
}

unsafe extern "C" fn get_godot_version(r: *mut GDExtensionGodotVersion) {
    let string = c"4.2.1.stable".as_ptr();
    *r = GDExtensionGodotVersion { major: 4, minor: 2, patch: 1, string };
}

unsafe extern "C" fn get_old_godot_version(r: *mut GDExtensionGodotVersion) {
    let string = c"4.0.stable".as_ptr();
    *r = GDExtensionGodotVersion { major: 4, minor: 0, patch: 0, string };
}

unsafe extern "C" fn host_get_proc_address(
    name: *const c_char,
) -> GDExtensionInterfaceFunctionPtr {
    match CStr::from_ptr(name).to_bytes() {
        b"print_error" => {
            Some(std::mem::transmute::<GDExtensionInterfacePrintError, Erased>(print_error))
        }
        b"get_godot_version" => Some(std::mem::transmute::<
            GDExtensionInterfaceGetGodotVersion,
            Erased,
        >(get_godot_version)),
        _ => None,
    }
}

unsafe extern "C" fn old_host_get_proc_address(
    name: *const c_char,
) -> GDExtensionInterfaceFunctionPtr {
    match CStr::from_ptr(name).to_bytes() {
        b"get_godot_version" => Some(std::mem::transmute::<
            GDExtensionInterfaceGetGodotVersion,
            Erased,
        >(get_old_godot_version)),
        _ => host_get_proc_address(name),
    }
}

fn library_token() -> GDExtensionClassLibraryPtr {
    static TOKEN: u8 = 0;
    std::ptr::addr_of!(TOKEN) as *mut c_void
}

fn load(
    resolver: GDExtensionInterfaceGetProcAddress,
    record: &mut GDExtensionInitialization,
) -> u8 {
    unsafe { gdscaffold_library_init(resolver, library_token(), record) }
}

fn initialize(record: &GDExtensionInitialization, levels: &[ModuleInitializationLevel]) {
    for level in levels {
        unsafe { (record.initialize.unwrap())(record.userdata, level.as_raw()) };
    }
}

fn deinitialize(record: &GDExtensionInitialization, levels: &[ModuleInitializationLevel]) {
    for level in levels {
        unsafe { (record.deinitialize.unwrap())(record.userdata, level.as_raw()) };
    }
}

/// Initializes every level, then deinitializes them in reverse.
fn run_lifecycle(record: &GDExtensionInitialization) {
    initialize(record, &[Core, Servers, Scene, Editor]);

    let loaded = unsafe { loaded_library(record.userdata) }.unwrap();
    assert!(loaded.class_db().is_empty());
    assert_eq!(loaded.minimum_level(), Scene);
    assert_eq!(loaded.library(), library_token());

    deinitialize(record, &[Editor, Scene, Servers, Core]);
}

#[test]
fn load_and_drive_all_levels() {
    let _host = host();
    let live = live_loads();

    let mut record = GDExtensionInitialization::default();
    assert_eq!(load(Some(host_get_proc_address), &mut record), GDEXTENSION_TRUE);
    assert_eq!(record.minimum_initialization_level, Scene.as_raw());
    assert_eq!(live_loads(), live + 1);

    run_lifecycle(&record);
    assert_eq!(live_loads(), live);
}

#[test]
fn repeated_load_unload_cycles() {
    let _host = host();
    let live = live_loads();

    for _ in 0..3 {
        let mut record = GDExtensionInitialization::default();
        assert_eq!(load(Some(host_get_proc_address), &mut record), GDEXTENSION_TRUE);
        run_lifecycle(&record);
    }
    assert_eq!(live_loads(), live);
}

#[test]
fn runtime_reload_releases_state() {
    let _host = host();
    let live = live_loads();

    // loaded while the engine runs: only minimum..=current is walked
    for _ in 0..100 {
        let mut record = GDExtensionInitialization::default();
        assert_eq!(load(Some(host_get_proc_address), &mut record), GDEXTENSION_TRUE);
        initialize(&record, &[Scene, Editor]);
        assert_eq!(live_loads(), live + 1);
        deinitialize(&record, &[Editor, Scene]);
        assert_eq!(live_loads(), live);
    }
}

#[test]
fn entry_point_mirrors_init_object() {
    let _host = host();
    let resolvers: [GDExtensionInterfaceGetProcAddress; 3] =
        [Some(host_get_proc_address), Some(old_host_get_proc_address), None];

    for resolver in resolvers {
        let mut via_entry = GDExtensionInitialization::default();
        let entry = load(resolver, &mut via_entry);

        let mut direct = GDExtensionInitialization::default();
        let mut obj = InitObject::new(resolver, library_token(), &mut direct);
        obj.register_initializer(initialize_gdscaffold_module);
        obj.register_terminator(uninitialize_gdscaffold_module);
        obj.set_minimum_library_initialization_level(Scene);
        let expected = if obj.init() { GDEXTENSION_TRUE } else { GDEXTENSION_FALSE };

        assert_eq!(entry, expected);
        for record in [&via_entry, &direct] {
            if !record.userdata.is_null() {
                deinitialize(record, &[Core]);
            }
        }
    }
}

#[test]
fn old_host_is_refused() {
    let _host = host();
    let errors = HOST_ERRORS.load(Ordering::SeqCst);

    let mut record = GDExtensionInitialization::default();
    assert_eq!(load(Some(old_host_get_proc_address), &mut record), GDEXTENSION_FALSE);
    assert!(record.userdata.is_null());
    assert!(record.initialize.is_none());
    assert!(HOST_ERRORS.load(Ordering::SeqCst) > errors);
}

#[test]
fn null_record_is_refused() {
    let _host = host();
    let errors = HOST_ERRORS.load(Ordering::SeqCst);

    let resolver: GDExtensionInterfaceGetProcAddress = Some(host_get_proc_address);
    let null = std::ptr::null_mut();
    let status = unsafe { gdscaffold_library_init(resolver, library_token(), null) };
    assert_eq!(status, GDEXTENSION_FALSE);
    assert!(HOST_ERRORS.load(Ordering::SeqCst) > errors);
}

#[test]
fn non_scene_levels_are_no_ops() {
    let mut db = ClassDb::new();
    for level in [Core, Servers, Editor] {
        initialize_gdscaffold_module(level, &mut db);
        uninitialize_gdscaffold_module(level, &mut db);
        assert!(db.is_empty());
        assert_eq!(db.current_level(), None);
    }
}
