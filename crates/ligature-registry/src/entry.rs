//! Registration entries.

use std::sync::Arc;

use ligature_core::{ClassEntry, Instance};

use crate::loader::TypeLoader;

/// What one registry key maps to.
///
/// The implementation class, singleton flag, cached instance and factory
/// candidates live in the entry's [`TypeLoader`]; the entry adds the
/// registration metadata around it.
#[derive(Debug)]
pub struct RegistrationEntry {
    loader: TypeLoader,
    init_method: Option<String>,
    protected: bool,
}

impl RegistrationEntry {
    pub(crate) fn new(loader: TypeLoader, init_method: Option<String>, protected: bool) -> Self {
        Self {
            loader,
            init_method,
            protected,
        }
    }

    /// The loader producing instances for this entry.
    pub fn loader(&self) -> &TypeLoader {
        &self.loader
    }

    /// The implementation class.
    pub fn implementation(&self) -> &Arc<ClassEntry> {
        self.loader.class()
    }

    /// Name of the static factory used to build instances, if any.
    pub fn init_method(&self) -> Option<&str> {
        self.init_method.as_deref()
    }

    /// Check if the entry caches its first instance.
    pub fn is_singleton(&self) -> bool {
        self.loader.is_singleton()
    }

    /// Check if later registrations may not replace this entry.
    pub fn is_protected(&self) -> bool {
        self.protected
    }

    /// The cached singleton instance, if one was built or seeded.
    pub fn singleton_instance(&self) -> Option<Instance> {
        self.loader.cached()
    }
}
