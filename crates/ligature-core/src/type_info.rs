//! Runtime type identity.
//!
//! This module provides [`TypeInfo`], the identity used for contract types,
//! implementation types and parameter types throughout the container. Identity
//! is the Rust [`TypeId`]; the name is kept only for diagnostics.
//!
//! # Examples
//!
//! ```
//! use ligature_core::TypeInfo;
//!
//! trait Greeter {}
//!
//! let a = TypeInfo::of::<dyn Greeter>();
//! let b = TypeInfo::of::<dyn Greeter>();
//! assert_eq!(a, b);
//! assert_ne!(a, TypeInfo::of::<String>());
//! ```

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of a type known to the container.
///
/// Works for sized types as well as trait objects, so contracts can be
/// expressed as `dyn Trait`.
#[derive(Clone, Copy)]
pub struct TypeInfo {
    id: TypeId,
    name: &'static str,
}

impl TypeInfo {
    /// The universal model type.
    ///
    /// Every type is assignable to it, and every [`Instance`](crate::Instance)
    /// can be viewed as it.
    pub fn object() -> Self {
        Self {
            id: TypeId::of::<dyn Any + Send + Sync>(),
            name: "object",
        }
    }

    /// Get the type info for `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// The Rust type id.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The full type name, as reported by the compiler.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The type name without its module path.
    ///
    /// `my_app::views::ItemView` becomes `ItemView`, generic arguments are
    /// shortened the same way.
    pub fn short_name(&self) -> String {
        let mut out = String::with_capacity(self.name.len());
        let mut segment = String::new();
        for ch in self.name.chars() {
            match ch {
                ':' => segment.clear(),
                '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | '&' => {
                    out.push_str(&segment);
                    segment.clear();
                    out.push(ch);
                }
                _ => segment.push(ch),
            }
        }
        out.push_str(&segment);
        out
    }

    /// Check if this is [`TypeInfo::object`].
    pub fn is_object(&self) -> bool {
        self.id == TypeId::of::<dyn Any + Send + Sync>()
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl Hash for TypeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeInfo({})", self.name)
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_name())
    }
}
