//! Class registration bookkeeping for one loaded library.
//!
//! The module initializer registers classes here while a level is being
//! initialized. When the host tears that level down, every class recorded at
//! it is unregistered again, newest first, so a reload never sees leftovers.

use crate::error::ClassDbError;
use crate::level::ModuleInitializationLevel;

/// A class the extension exposes to the engine.
pub trait GodotClass {
    const CLASS_NAME: &'static str;
    const PARENT_CLASS_NAME: &'static str;
}

/// How a class is exposed to the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassKind {
    /// Instantiable from scripts and the editor.
    Concrete,
    /// Instantiable, with virtual methods scripts may override.
    Virtual,
    /// Cannot be instantiated; only a base for other classes.
    Abstract,
    /// Instantiable, but its code only runs in game, never in the editor.
    Runtime,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassRecord {
    pub name: &'static str,
    pub parent: &'static str,
    pub kind: ClassKind,
    pub level: ModuleInitializationLevel,
}

#[derive(Debug, Default)]
pub struct ClassDb {
    current_level: Option<ModuleInitializationLevel>,
    classes: Vec<ClassRecord>,
}

impl ClassDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_class<T: GodotClass>(&mut self) -> Result<(), ClassDbError> {
        self.register(T::CLASS_NAME, T::PARENT_CLASS_NAME, ClassKind::Concrete)
    }

    pub fn register_virtual_class<T: GodotClass>(&mut self) -> Result<(), ClassDbError> {
        self.register(T::CLASS_NAME, T::PARENT_CLASS_NAME, ClassKind::Virtual)
    }

    pub fn register_abstract_class<T: GodotClass>(&mut self) -> Result<(), ClassDbError> {
        self.register(T::CLASS_NAME, T::PARENT_CLASS_NAME, ClassKind::Abstract)
    }

    pub fn register_runtime_class<T: GodotClass>(&mut self) -> Result<(), ClassDbError> {
        self.register(T::CLASS_NAME, T::PARENT_CLASS_NAME, ClassKind::Runtime)
    }

    fn register(
        &mut self,
        name: &'static str,
        parent: &'static str,
        kind: ClassKind,
    ) -> Result<(), ClassDbError> {
        let Some(level) = self.current_level else {
            return Err(ClassDbError::NotInitializing(name));
        };

        if let Some(existing) = self.classes.iter().find(|c| c.name == name) {
            return Err(ClassDbError::AlreadyRegistered { name, level: existing.level });
        }

        log::debug!("register {:?} class {} : {} at level {}", kind, name, parent, level);
        self.classes.push(ClassRecord { name, parent, kind, level });
        Ok(())
    }

    /// Marks `level` as the one currently being (de)initialized.
    pub(crate) fn enter_level(&mut self, level: ModuleInitializationLevel) {
        self.current_level = Some(level);
    }

    /// Unregisters everything recorded at `level`, newest first.
    ///
    /// Returns the removed class names in removal order.
    pub fn deinitialize(&mut self, level: ModuleInitializationLevel) -> Vec<&'static str> {
        let mut removed = Vec::new();
        while let Some(pos) = self.classes.iter().rposition(|c| c.level == level) {
            let record = self.classes.remove(pos);
            log::debug!("unregister class {} at level {}", record.name, level);
            removed.push(record.name);
        }
        removed
    }

    pub fn current_level(&self) -> Option<ModuleInitializationLevel> {
        self.current_level
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.classes.iter().any(|c| c.name == name)
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassRecord> {
        self.classes.iter()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
