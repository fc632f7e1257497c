//! Ligature core types.
//!
//! This crate holds everything the container needs that is not the
//! container itself: type identity, class descriptions standing in for
//! runtime reflection, erased instances and arguments, option flags, fuzzy
//! name matching and the error taxonomy.

mod argument;
mod catalog;
mod class;
mod error;
pub mod fuzzy;
mod instance;
mod method;
mod options;
mod type_info;

pub use argument::{
    Argument, ConversionError, FromArgument, Param, ParamKind, describe_arguments,
};
pub use catalog::TypeCatalog;
pub use class::{ClassBuilder, ClassEntry};
pub use error::{
    BoxError, LigatureError, RegistrationError, ResolveError, UnregisterError, describe_target,
};
pub use instance::Instance;
pub use method::{Arguments, IntoMethod, Method};
pub use options::{FormFactor, RegisterOptions, ResolveOptions, UnregisterOptions};
pub use type_info::TypeInfo;
