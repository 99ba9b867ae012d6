//! Binding layer between a GDExtension library and the Godot host.
//!
//! This covers what the host expects from any extension: the init object the
//! entry point builds, the host functions it resolves, the lifecycle
//! trampolines, and the per-load class registry. An extension crate only
//! provides its module callbacks and the exported entry point.

pub mod binding;
pub mod class_db;
pub mod config;
pub mod error;
pub mod interface;
pub mod level;
pub mod logger;

pub use binding::{InitObject, ModuleCallback};
pub use class_db::{ClassDb, ClassKind, GodotClass};
pub use level::ModuleInitializationLevel;
