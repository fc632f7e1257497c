//! Ligature - an inversion-of-control container for UI applications.
//!
//! Implementation types are described once in a [`TypeCatalog`] and then
//! registered with one of three managers:
//!
//! - [`TypeManager`] maps contract types (and optional names) to
//!   implementations, with singleton caching and fuzzy name and parameter
//!   matching.
//! - [`ControllerManager`] routes navigation URIs to controllers by pattern.
//! - [`ViewManager`] picks the view for a model on the current device form
//!   factor.
//!
//! [`Framework`] bundles the three, and [`Bootstrap`] applies startup
//! registrations to it.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use ligature::prelude::*;
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! struct Polite {
//!     name: String,
//! }
//!
//! impl Greeter for Polite {
//!     fn greet(&self) -> String {
//!         format!("Good day, {}", self.name)
//!     }
//! }
//!
//! let mut catalog = TypeCatalog::new();
//! catalog
//!     .class::<Polite>()
//!     .implements::<dyn Greeter>(|p| p)
//!     .constructor(|name: String| Polite { name })
//!     .build()
//!     .unwrap();
//!
//! let mut framework = Framework::new(Arc::new(catalog), FrameworkConfig::default());
//! framework.types.register_type::<dyn Greeter, Polite>(None).unwrap();
//!
//! let greeter = framework
//!     .resolve_with::<dyn Greeter>(
//!         None,
//!         vec![Argument::value("Ada".to_string())],
//!         ResolveOptions::empty(),
//!     )
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(greeter.greet(), "Good day, Ada");
//! ```

mod bootstrap;
mod framework;

pub use bootstrap::{Bootstrap, Declaration};
pub use framework::{Framework, FrameworkConfig};

pub use ligature_core::{
    Argument, Arguments, BoxError, ClassBuilder, ClassEntry, ConversionError, FormFactor,
    FromArgument, Instance, IntoMethod, LigatureError, Method, Param, ParamKind, RegisterOptions,
    RegistrationError, ResolveError, ResolveOptions, TypeCatalog, TypeInfo, UnregisterError,
    UnregisterOptions, fuzzy, impl_value_argument,
};
pub use ligature_registry::{
    ControllerManager, ControllerMatch, DefaultLookup, KeyLookup, NamedTypeMap,
    NavigationControllerAttribute, RegisterAttribute, RegistrationEntry, RegistrationKey,
    Registry, RegistryKey, SegmentMatch, TypeLoader, TypeManager, UriParameters, UriPattern,
    ViewAttribute, ViewLookup, ViewManager, ViewRegistrationKey, overload, split_uri,
};

/// Common imports.
pub mod prelude {
    pub use crate::{
        Argument, Bootstrap, ControllerManager, ControllerMatch, FormFactor, Framework,
        FrameworkConfig, Instance, LigatureError, NavigationControllerAttribute, RegisterAttribute,
        RegisterOptions, RegistrationError, ResolveError, ResolveOptions, TypeCatalog, TypeInfo,
        TypeManager, UnregisterOptions, ViewAttribute, ViewManager,
    };
}
