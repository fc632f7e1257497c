//! Startup registration manifest.
//!
//! A [`Bootstrap`] collects registration declarations for implementation
//! types and applies them to a [`Framework`] in the order they were added.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use ligature::prelude::*;
//!
//! trait Store: Send + Sync {}
//!
//! #[derive(Default)]
//! struct MemoryStore;
//! impl Store for MemoryStore {}
//!
//! #[derive(Default)]
//! struct HomeController;
//!
//! let mut catalog = TypeCatalog::new();
//! catalog
//!     .class::<MemoryStore>()
//!     .implements::<dyn Store>(|s| s)
//!     .default_constructor()
//!     .build()
//!     .unwrap();
//! catalog.class::<HomeController>().default_constructor().build().unwrap();
//!
//! let mut framework = Framework::new(Arc::new(catalog), FrameworkConfig::default());
//! Bootstrap::new()
//!     .register::<MemoryStore>(RegisterAttribute::of::<dyn Store>().singleton())
//!     .controller::<HomeController>(NavigationControllerAttribute::new("Home"))
//!     .apply(&mut framework)
//!     .unwrap();
//!
//! assert!(framework.resolve::<dyn Store>(None).unwrap().is_some());
//! ```

use tracing::debug;

use ligature_core::{Instance, RegisterOptions, RegistrationError, TypeInfo};
use ligature_registry::{NavigationControllerAttribute, RegisterAttribute, ViewAttribute};

use crate::framework::Framework;

/// One registration declaration.
#[derive(Debug, Clone)]
pub enum Declaration {
    /// An implementation for the general container.
    Type {
        /// The implementation type.
        implementation: TypeInfo,
        /// How it is registered.
        attribute: RegisterAttribute,
    },
    /// A pre-built singleton for the general container.
    Instance {
        /// The contract type.
        contract: TypeInfo,
        /// Registration name.
        name: Option<String>,
        /// The instance.
        instance: Instance,
    },
    /// A navigation controller.
    Controller {
        /// The controller type.
        controller: TypeInfo,
        /// Its pattern.
        attribute: NavigationControllerAttribute,
    },
    /// A view.
    View {
        /// The view type.
        view: TypeInfo,
        /// Its view declarations. Empty registers the view once with the
        /// default declaration.
        attributes: Vec<ViewAttribute>,
    },
}

impl Declaration {
    fn apply(&self, framework: &mut Framework) -> Result<(), RegistrationError> {
        match self {
            Declaration::Type {
                implementation,
                attribute,
            } => framework.types.register_attribute(*implementation, attribute),
            Declaration::Instance {
                contract,
                name,
                instance,
            } => framework.types.register_instance(
                *contract,
                name.as_deref(),
                instance.clone(),
                RegisterOptions::empty(),
            ),
            Declaration::Controller {
                controller,
                attribute,
            } => framework.controllers.register_controller(*controller, attribute),
            Declaration::View { view, attributes } => {
                framework.views.register_view(*view, attributes)
            }
        }
    }
}

/// Ordered list of registration declarations.
#[derive(Debug, Clone, Default)]
pub struct Bootstrap {
    declarations: Vec<Declaration>,
}

impl Bootstrap {
    /// Create an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `T` for the general container.
    pub fn register<T: 'static>(self, attribute: RegisterAttribute) -> Self {
        self.declare(Declaration::Type {
            implementation: TypeInfo::of::<T>(),
            attribute,
        })
    }

    /// Declare a pre-built singleton of contract `C`.
    pub fn instance<C: ?Sized + 'static>(self, name: Option<&str>, instance: Instance) -> Self {
        self.declare(Declaration::Instance {
            contract: TypeInfo::of::<C>(),
            name: name.map(str::to_owned),
            instance,
        })
    }

    /// Declare `T` as a navigation controller.
    pub fn controller<T: 'static>(self, attribute: NavigationControllerAttribute) -> Self {
        self.declare(Declaration::Controller {
            controller: TypeInfo::of::<T>(),
            attribute,
        })
    }

    /// Declare `T` as a view.
    pub fn view<T: 'static>(self, attributes: impl IntoIterator<Item = ViewAttribute>) -> Self {
        self.declare(Declaration::View {
            view: TypeInfo::of::<T>(),
            attributes: attributes.into_iter().collect(),
        })
    }

    /// Add a declaration.
    pub fn declare(mut self, declaration: Declaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    /// The declarations in order.
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Number of declarations.
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Check if nothing is declared.
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Apply every declaration in order, stopping at the first error.
    ///
    /// Declarations applied before the failing one stay registered.
    pub fn apply(&self, framework: &mut Framework) -> Result<(), RegistrationError> {
        for declaration in &self.declarations {
            declaration.apply(framework)?;
        }
        debug!(declarations = self.declarations.len(), "bootstrap applied");
        Ok(())
    }
}
