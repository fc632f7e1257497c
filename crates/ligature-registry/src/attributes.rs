//! Registration declarations.
//!
//! Each attribute describes how one implementation type is registered. They
//! are plain values, collected at startup and applied to the managers in
//! order.

use ligature_core::{FormFactor, RegisterOptions, RegistrationError, TypeInfo};

use crate::key::RegistrationKey;
use crate::manager::{KeyLookup, TypeManager};

/// Registers an implementation for a contract type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterAttribute {
    /// The contract the implementation is resolved through.
    pub contract: TypeInfo,
    /// Registration name.
    pub name: Option<String>,
    /// Cache the first instance.
    pub singleton: bool,
    /// Static factory used to build instances.
    pub init_method: Option<String>,
}

impl RegisterAttribute {
    /// A transient, unnamed registration for `contract`.
    pub fn new(contract: TypeInfo) -> Self {
        Self {
            contract,
            name: None,
            singleton: false,
            init_method: None,
        }
    }

    /// A transient, unnamed registration for `C`.
    pub fn of<C: ?Sized + 'static>() -> Self {
        Self::new(TypeInfo::of::<C>())
    }

    /// Set the registration name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Make the registration a singleton.
    pub fn singleton(mut self) -> Self {
        self.singleton = true;
        self
    }

    /// Build instances through the named static factory.
    pub fn init_method(mut self, method: impl Into<String>) -> Self {
        self.init_method = Some(method.into());
        self
    }
}

/// Registers a navigation controller under a URI pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationControllerAttribute {
    /// `/`-delimited pattern, `{name}` segments are parameters.
    pub pattern: String,
    /// Contract the controller is resolved through. Defaults to the
    /// controller type itself.
    pub contract: Option<TypeInfo>,
    /// Cache the first instance.
    pub singleton: bool,
}

impl NavigationControllerAttribute {
    /// A transient controller for `pattern`.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            contract: None,
            singleton: false,
        }
    }

    /// Resolve the controller through `C`.
    pub fn contract<C: ?Sized + 'static>(mut self) -> Self {
        self.contract = Some(TypeInfo::of::<C>());
        self
    }

    /// Make the controller a singleton.
    pub fn singleton(mut self) -> Self {
        self.singleton = true;
        self
    }
}

/// Registers a view for a model type.
///
/// Without an explicit model the view's declared model
/// ([`ClassBuilder::view_of`](ligature_core::ClassBuilder::view_of)) is
/// used, then [`TypeInfo::object`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewAttribute {
    /// The model type.
    pub model: Option<TypeInfo>,
    /// Perspective name, distinguishing several views of one model.
    pub perspective: Option<String>,
    /// Form factors the view suits.
    pub form_factor: FormFactor,
    /// Cache the first instance.
    pub singleton: bool,
}

impl Default for ViewAttribute {
    fn default() -> Self {
        Self {
            model: None,
            perspective: None,
            form_factor: FormFactor::ALL,
            singleton: false,
        }
    }
}

impl ViewAttribute {
    /// A view of model `M`.
    pub fn of<M: ?Sized + 'static>() -> Self {
        Self {
            model: Some(TypeInfo::of::<M>()),
            ..Self::default()
        }
    }

    /// Set the perspective.
    pub fn perspective(mut self, perspective: impl Into<String>) -> Self {
        self.perspective = Some(perspective.into());
        self
    }

    /// Restrict the view to some form factors.
    pub fn form_factor(mut self, form_factor: FormFactor) -> Self {
        self.form_factor = form_factor;
        self
    }

    /// Make the view a singleton.
    pub fn singleton(mut self) -> Self {
        self.singleton = true;
        self
    }
}

impl<L: KeyLookup<RegistrationKey>> TypeManager<RegistrationKey, L> {
    /// Register `implementation` as declared by `attribute`.
    pub fn register_attribute(
        &mut self,
        implementation: TypeInfo,
        attribute: &RegisterAttribute,
    ) -> Result<(), RegistrationError> {
        let name = attribute.name.as_deref();
        let init_method = attribute.init_method.as_deref();
        let options = RegisterOptions::empty();
        if attribute.singleton {
            self.register_singleton(attribute.contract, name, implementation, init_method, options)
        } else {
            self.register(attribute.contract, name, implementation, init_method, options)
        }
    }
}
