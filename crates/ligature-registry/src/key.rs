//! Registration keys.

use std::fmt;
use std::hash::Hash;

use ligature_core::{FormFactor, TypeInfo, describe_target};

/// Identity of one registration in a [`Registry`](crate::Registry).
pub trait RegistryKey: Clone + Eq + Hash + fmt::Debug + fmt::Display {
    /// The contract (or model) type.
    fn type_info(&self) -> TypeInfo;

    /// The optional registration name.
    fn name(&self) -> Option<&str>;
}

/// A `(type, name)` key.
///
/// Names compare ordinally and case-sensitively; `None` differs from every
/// string, including the empty one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegistrationKey {
    ty: TypeInfo,
    name: Option<String>,
}

impl RegistrationKey {
    /// Create a key.
    pub fn new(ty: TypeInfo, name: Option<&str>) -> Self {
        Self {
            ty,
            name: name.map(str::to_owned),
        }
    }

    /// Create a key for `T`.
    pub fn of<T: ?Sized + 'static>(name: Option<&str>) -> Self {
        Self::new(TypeInfo::of::<T>(), name)
    }
}

impl RegistryKey for RegistrationKey {
    fn type_info(&self) -> TypeInfo {
        self.ty
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl fmt::Display for RegistrationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&describe_target(&self.ty.short_name(), self.name()))
    }
}

/// A `(model type, perspective, form factor)` key used by the view manager.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ViewRegistrationKey {
    key: RegistrationKey,
    form_factor: FormFactor,
}

impl ViewRegistrationKey {
    /// Create a key.
    pub fn new(model: TypeInfo, perspective: Option<&str>, form_factor: FormFactor) -> Self {
        Self {
            key: RegistrationKey::new(model, perspective),
            form_factor,
        }
    }

    /// The form factors the view suits.
    pub fn form_factor(&self) -> FormFactor {
        self.form_factor
    }
}

impl RegistryKey for ViewRegistrationKey {
    fn type_info(&self) -> TypeInfo {
        self.key.type_info()
    }

    fn name(&self) -> Option<&str> {
        self.key.name()
    }
}

impl fmt::Display for ViewRegistrationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{:?}]", self.key, self.form_factor)
    }
}
