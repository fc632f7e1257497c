//! Registration storage and resolution for the ligature container.
//!
//! - [`TypeManager`]: the general container mapping contracts to
//!   implementations.
//! - [`ControllerManager`]: navigation controllers routed by URI pattern.
//! - [`ViewManager`]: views chosen by model type and device form factor.
//! - [`TypeLoader`] and [`NamedTypeMap`]: lazy per-type construction
//!   without contract keys.
//!
//! All managers share the same storage ([`Registry`]) and construction
//! ([`TypeLoader`], [`overload`]) and differ only in their [`KeyLookup`].

mod attributes;
mod controller;
mod entry;
mod key;
mod loader;
mod manager;
pub mod overload;
mod registry;
mod view;

pub use attributes::{NavigationControllerAttribute, RegisterAttribute, ViewAttribute};
pub use controller::{
    ControllerManager, ControllerMatch, SegmentMatch, UriParameters, UriPattern, split_uri,
};
pub use entry::RegistrationEntry;
pub use key::{RegistrationKey, RegistryKey, ViewRegistrationKey};
pub use loader::{NamedTypeMap, TypeLoader};
pub use manager::{DefaultLookup, KeyLookup, TypeManager};
pub use registry::Registry;
pub use view::{ViewLookup, ViewManager};
