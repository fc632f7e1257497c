//! TypeCatalog - descriptions of every implementation type.
//!
//! The catalog is the container's view of the type system. It is filled
//! once during bootstrap and then shared read-only (behind an `Arc`) by every
//! manager that needs to construct objects or walk type relations.
//!
//! # Example
//!
//! ```
//! use ligature_core::{TypeCatalog, TypeInfo};
//!
//! trait Greeter: Send + Sync {}
//! #[derive(Default)]
//! struct English;
//! impl Greeter for English {}
//!
//! let mut catalog = TypeCatalog::new();
//! catalog
//!     .class::<English>()
//!     .implements::<dyn Greeter>(|e| e)
//!     .default_constructor()
//!     .build()
//!     .unwrap();
//!
//! assert!(catalog.is_assignable(TypeInfo::of::<English>(), TypeInfo::of::<dyn Greeter>()));
//! ```

use std::any::Any;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::describe_target;
use crate::{ClassBuilder, ClassEntry, Instance, RegistrationError, TypeInfo};

/// Upper bound on base-chain length, guards against declared cycles.
const MAX_BASE_DEPTH: usize = 64;

/// All described implementation types, by type.
#[derive(Default, Debug)]
pub struct TypeCatalog {
    classes: FxHashMap<TypeInfo, Arc<ClassEntry>>,
}

impl TypeCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start describing `T`.
    pub fn class<T: Any + Send + Sync>(&mut self) -> ClassBuilder<'_, T> {
        ClassBuilder::new(self)
    }

    pub(crate) fn insert(
        &mut self,
        entry: ClassEntry,
    ) -> Result<Arc<ClassEntry>, RegistrationError> {
        let ty = entry.type_info();
        if self.classes.contains_key(&ty) {
            return Err(RegistrationError::AlreadyRegistered {
                target: describe_target(&ty.short_name(), None),
            });
        }
        let entry = Arc::new(entry);
        self.classes.insert(ty, Arc::clone(&entry));
        Ok(entry)
    }

    /// Get the class for a type.
    pub fn get(&self, ty: TypeInfo) -> Option<&Arc<ClassEntry>> {
        self.classes.get(&ty)
    }

    /// Check if a type is described.
    pub fn contains(&self, ty: TypeInfo) -> bool {
        self.classes.contains_key(&ty)
    }

    /// Number of described types.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Wrap an existing object using its described class.
    ///
    /// Falls back to an opaque class when `T` is not described, in which
    /// case the instance only casts to `T` and [`TypeInfo::object`].
    pub fn instance<T: Any + Send + Sync>(&self, value: Arc<T>) -> Instance {
        match self.get(TypeInfo::of::<T>()) {
            Some(class) => Instance::new(value, Arc::clone(class)),
            None => Instance::from_arc(value),
        }
    }

    /// The base types of `ty`, nearest first. Does not include `ty`.
    pub fn base_chain(&self, ty: TypeInfo) -> Vec<TypeInfo> {
        let mut chain = Vec::new();
        let mut current = self.get(ty).and_then(|c| c.base());
        while let Some(base) = current {
            if base == ty || chain.contains(&base) || chain.len() >= MAX_BASE_DEPTH {
                break;
            }
            chain.push(base);
            current = self.get(base).and_then(|c| c.base());
        }
        chain
    }

    /// Interfaces implemented by `ty` or any of its bases, nearest first,
    /// without duplicates.
    pub fn interfaces_of(&self, ty: TypeInfo) -> Vec<TypeInfo> {
        let mut seen = FxHashSet::default();
        let mut out = Vec::new();
        for class_ty in std::iter::once(ty).chain(self.base_chain(ty)) {
            if let Some(class) = self.get(class_ty) {
                for &interface in class.interfaces() {
                    if seen.insert(interface) {
                        out.push(interface);
                    }
                }
            }
        }
        out
    }

    /// Check if a value of type `from` may stand in for `to`.
    ///
    /// True when the types are equal, `to` is [`TypeInfo::object`], `to` is
    /// a base of `from`, or `to` is an interface of `from` or of its bases.
    ///
    /// This is the relation view lookup walks. It does not imply that an
    /// instance of `from` can be cast to `to`; see [`ClassEntry::can_cast`].
    pub fn is_assignable(&self, from: TypeInfo, to: TypeInfo) -> bool {
        if from == to || to.is_object() {
            return true;
        }
        self.base_chain(from).contains(&to) || self.interfaces_of(from).contains(&to)
    }
}
