//! Constructor arguments and parameter descriptions.
//!
//! Arguments are passed to the container as a list of [`Argument`]s and
//! matched position by position against each candidate's [`Param`]s.
//!
//! ## Parameter Kinds
//!
//! | Rust parameter type | Kind | Accepts `null` | Default when missing |
//! |---|---|---|---|
//! | primitives, `String`, types declared with [`impl_value_argument!`] | value | no | `Default::default()` |
//! | `Option<T>` | nullable | yes | `None` |
//! | `Arc<T>` | required | no | none |
//!
//! [`impl_value_argument!`]: crate::impl_value_argument

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::{Instance, TypeInfo};

/// A single argument passed to a constructor or factory.
pub enum Argument {
    /// Explicit null. Only fits nullable parameters.
    Null,
    /// A plain value. Fits parameters of exactly its type.
    Value {
        /// Runtime type of the boxed value.
        ty: TypeInfo,
        /// The value itself.
        value: Box<dyn Any + Send + Sync>,
    },
    /// A container-managed object. Fits parameters its class can be cast to.
    Object(Instance),
}

impl Argument {
    /// Wrap a plain value.
    pub fn value<T: Any + Send + Sync>(value: T) -> Self {
        Argument::Value {
            ty: TypeInfo::of::<T>(),
            value: Box::new(value),
        }
    }

    /// Wrap a resolved instance.
    pub fn object(instance: Instance) -> Self {
        Argument::Object(instance)
    }

    /// Wrap a shared object that was not produced by the container.
    pub fn shared<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Argument::Object(Instance::from_arc(value))
    }

    /// The null argument.
    pub fn null() -> Self {
        Argument::Null
    }

    /// Check if this is the null argument.
    pub fn is_null(&self) -> bool {
        matches!(self, Argument::Null)
    }

    /// Human readable type name, used in diagnostics.
    pub fn type_name(&self) -> String {
        match self {
            Argument::Null => "null".to_string(),
            Argument::Value { ty, .. } => ty.short_name(),
            Argument::Object(instance) => instance.type_info().short_name(),
        }
    }

    /// Check if this argument can be passed to `param`.
    ///
    /// `null` fits only nullable parameters. Values must match the parameter
    /// type exactly. Objects must be castable to it and never fit value
    /// parameters.
    pub fn fits(&self, param: &Param) -> bool {
        match self {
            Argument::Null => param.is_nullable(),
            Argument::Value { ty, .. } => *ty == param.ty,
            Argument::Object(instance) => {
                !matches!(param.kind, ParamKind::Value { .. }) && instance.can_cast(param.ty)
            }
        }
    }
}

impl fmt::Debug for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Null => write!(f, "Null"),
            Argument::Value { ty, .. } => write!(f, "Value({})", ty.short_name()),
            Argument::Object(instance) => {
                write!(f, "Object({})", instance.type_info().short_name())
            }
        }
    }
}

/// Formats an argument list as `i32, null, Config`.
pub fn describe_arguments(args: &[Argument]) -> String {
    args.iter()
        .map(Argument::type_name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// How a parameter treats null and missing arguments.
#[derive(Debug, Clone, Copy)]
pub enum ParamKind {
    /// A value type. Missing arguments take the type's default.
    Value {
        /// Builds the default argument.
        default: fn() -> Argument,
    },
    /// A reference that may be absent.
    Nullable,
    /// A reference that must be supplied.
    Required,
}

/// One parameter of a constructor or factory.
#[derive(Debug, Clone, Copy)]
pub struct Param {
    /// Parameter type. For `Option<T>` and `Arc<T>` this is `T`.
    pub ty: TypeInfo,
    /// Null and default handling.
    pub kind: ParamKind,
}

impl Param {
    /// A value parameter of type `T`, defaulting to `T::default()`.
    pub fn value<T: Any + Default + Send + Sync>() -> Self {
        Self {
            ty: TypeInfo::of::<T>(),
            kind: ParamKind::Value {
                default: || Argument::value(T::default()),
            },
        }
    }

    /// A nullable parameter of type `T`.
    pub fn nullable<T: ?Sized + 'static>() -> Self {
        Self {
            ty: TypeInfo::of::<T>(),
            kind: ParamKind::Nullable,
        }
    }

    /// A required reference parameter of type `T`.
    pub fn required<T: ?Sized + 'static>() -> Self {
        Self {
            ty: TypeInfo::of::<T>(),
            kind: ParamKind::Required,
        }
    }

    /// Check if `null` can be passed.
    pub fn is_nullable(&self) -> bool {
        matches!(self.kind, ParamKind::Nullable)
    }

    /// Check if the parameter may be left out.
    pub fn has_default(&self) -> bool {
        !matches!(self.kind, ParamKind::Required)
    }

    /// The argument used when the caller supplied none.
    pub fn default_argument(&self) -> Option<Argument> {
        match self.kind {
            ParamKind::Value { default } => Some(default()),
            ParamKind::Nullable => Some(Argument::Null),
            ParamKind::Required => None,
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ParamKind::Nullable => write!(f, "{}?", self.ty),
            _ => write!(f, "{}", self.ty),
        }
    }
}

/// Errors converting an [`Argument`] into a Rust value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The argument holds a different type.
    #[error("expected {expected}, found {actual}")]
    TypeMismatch {
        /// The parameter type.
        expected: String,
        /// The argument type.
        actual: String,
    },

    /// A null argument was passed to a non-nullable parameter.
    #[error("null passed for non-nullable {expected}")]
    UnexpectedNull {
        /// The parameter type.
        expected: String,
    },
}

/// Rust types that can receive an [`Argument`].
pub trait FromArgument: Sized + 'static {
    /// Describe this type as a parameter.
    fn param() -> Param;

    /// Extract the value from an argument.
    fn from_argument(arg: Argument) -> Result<Self, ConversionError>;
}

/// Implements [`FromArgument`] for value types.
///
/// The types must implement `Default` (used for missing arguments),
/// `Send` and `Sync`.
///
/// ```
/// use ligature_core::{impl_value_argument, FromArgument, Argument};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Margin(u32);
/// impl_value_argument!(Margin);
///
/// let margin = Margin::from_argument(Argument::value(Margin(4))).unwrap();
/// assert_eq!(margin, Margin(4));
/// ```
#[macro_export]
macro_rules! impl_value_argument {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::FromArgument for $ty {
                fn param() -> $crate::Param {
                    $crate::Param::value::<$ty>()
                }

                fn from_argument(
                    arg: $crate::Argument,
                ) -> ::std::result::Result<Self, $crate::ConversionError> {
                    match arg {
                        $crate::Argument::Value { value, ty } => value
                            .downcast::<$ty>()
                            .map(|boxed| *boxed)
                            .map_err(|_| $crate::ConversionError::TypeMismatch {
                                expected: $crate::TypeInfo::of::<$ty>().short_name(),
                                actual: ty.short_name(),
                            }),
                        $crate::Argument::Null => Err($crate::ConversionError::UnexpectedNull {
                            expected: $crate::TypeInfo::of::<$ty>().short_name(),
                        }),
                        other => Err($crate::ConversionError::TypeMismatch {
                            expected: $crate::TypeInfo::of::<$ty>().short_name(),
                            actual: other.type_name(),
                        }),
                    }
                }
            }
        )*
    };
}

impl_value_argument!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, String
);

impl<T: FromArgument> FromArgument for Option<T> {
    fn param() -> Param {
        Param {
            ty: T::param().ty,
            kind: ParamKind::Nullable,
        }
    }

    fn from_argument(arg: Argument) -> Result<Self, ConversionError> {
        match arg {
            Argument::Null => Ok(None),
            other => T::from_argument(other).map(Some),
        }
    }
}

impl<T: ?Sized + 'static> FromArgument for Arc<T> {
    fn param() -> Param {
        Param::required::<T>()
    }

    fn from_argument(arg: Argument) -> Result<Self, ConversionError> {
        let expected = || TypeInfo::of::<T>().short_name();
        match arg {
            Argument::Object(instance) => {
                instance
                    .get::<T>()
                    .map_err(|_| ConversionError::TypeMismatch {
                        expected: expected(),
                        actual: instance.type_info().short_name(),
                    })
            }
            Argument::Null => Err(ConversionError::UnexpectedNull {
                expected: expected(),
            }),
            other => Err(ConversionError::TypeMismatch {
                expected: expected(),
                actual: other.type_name(),
            }),
        }
    }
}
