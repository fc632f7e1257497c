//! Constructors and static factory methods.
//!
//! A [`Method`] is a type-erased callable that builds one object from a list
//! of [`Argument`]s. It replaces runtime constructor discovery: each class
//! lists its constructors and factories up front, with their parameters, so
//! the container can pick one by argument shape.
//!
//! Closures taking up to six [`FromArgument`] parameters convert into methods
//! through [`IntoMethod`]. Constructors that can fail are written against
//! [`Arguments`] directly and return a `Result`.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::{Argument, BoxError, FromArgument, Param, ResolveError};

type Invoke = dyn Fn(Arguments) -> Result<Arc<dyn Any + Send + Sync>, ResolveError> + Send + Sync;

/// A constructor or named static factory.
#[derive(Clone)]
pub struct Method {
    name: Option<String>,
    params: Vec<Param>,
    invoke: Arc<Invoke>,
}

impl Method {
    /// Create a method from explicit parameters and a fallible body.
    ///
    /// Errors returned by `body` reach the caller of `resolve` unchanged as
    /// [`ResolveError::Construction`].
    pub fn new<T, F>(name: Option<String>, params: Vec<Param>, body: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(Arguments) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        Self::with_invoke(name, params, move |args| {
            body(args)
                .map(|value| Arc::new(value) as Arc<dyn Any + Send + Sync>)
                .map_err(|err| match err.downcast::<ResolveError>() {
                    Ok(resolve) => *resolve,
                    Err(other) => ResolveError::Construction(other),
                })
        })
    }

    fn with_invoke<F>(name: Option<String>, params: Vec<Param>, invoke: F) -> Self
    where
        F: Fn(Arguments) -> Result<Arc<dyn Any + Send + Sync>, ResolveError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name,
            params,
            invoke: Arc::new(invoke),
        }
    }

    /// The factory name, `None` for constructors.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Declared parameters.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Number of declared parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Check if every argument fits its parameter and the counts agree.
    pub fn accepts(&self, args: &[Argument]) -> bool {
        args.len() == self.params.len() && args.iter().zip(&self.params).all(|(a, p)| a.fits(p))
    }

    /// Call the method. `args` must already be shaped to the parameter list.
    pub fn invoke(&self, args: Vec<Argument>) -> Result<Arc<dyn Any + Send + Sync>, ResolveError> {
        (self.invoke)(Arguments::new(args))
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.params.iter().map(ToString::to_string).collect();
        write!(
            f,
            "{}({})",
            self.name.as_deref().unwrap_or("new"),
            params.join(", ")
        )
    }
}

/// Argument list handed to a method body.
///
/// ```ignore
/// let method = Method::new(None, vec![Param::value::<String>()], |mut args| {
///     let path: String = args.take(0)?;
///     Ok(Store::open(path)?)
/// });
/// ```
pub struct Arguments {
    slots: Vec<Option<Argument>>,
}

impl Arguments {
    pub(crate) fn new(args: Vec<Argument>) -> Self {
        Self {
            slots: args.into_iter().map(Some).collect(),
        }
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if there are no arguments.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Take the argument at `index`, converted to `A`.
    ///
    /// Each argument can be taken once.
    pub fn take<A: FromArgument>(&mut self, index: usize) -> Result<A, ResolveError> {
        let arg = self
            .slots
            .get_mut(index)
            .and_then(Option::take)
            .ok_or_else(|| ResolveError::InvalidArgument {
                index,
                message: "argument missing or already taken".to_string(),
            })?;
        A::from_argument(arg).map_err(|err| ResolveError::InvalidArgument {
            index,
            message: err.to_string(),
        })
    }
}

/// Closures usable as constructors or factories.
///
/// Implemented for `Fn(A1, ..., An) -> T` with `n <= 6` where every `Ai`
/// implements [`FromArgument`].
pub trait IntoMethod<T, Args>: Send + Sync + 'static {
    /// Describe the closure's parameters.
    fn params() -> Vec<Param>;

    /// Convert into a [`Method`].
    fn into_method(self, name: Option<String>) -> Method;
}

macro_rules! impl_into_method {
    ($($arg:ident),*) => {
        impl<F, T, $($arg,)*> IntoMethod<T, ($($arg,)*)> for F
        where
            F: Fn($($arg),*) -> T + Send + Sync + 'static,
            T: Any + Send + Sync,
            $($arg: FromArgument,)*
        {
            fn params() -> Vec<Param> {
                vec![$($arg::param()),*]
            }

            #[allow(non_snake_case, unused_mut, unused_variables, unused_assignments)]
            fn into_method(self, name: Option<String>) -> Method {
                let params = <Self as IntoMethod<T, ($($arg,)*)>>::params();
                Method::with_invoke(name, params, move |mut args| {
                    let mut index = 0;
                    $(
                        let $arg: $arg = args.take(index)?;
                        index += 1;
                    )*
                    Ok(Arc::new((self)($($arg),*)) as Arc<dyn Any + Send + Sync>)
                })
            }
        }
    };
}

impl_into_method!();
impl_into_method!(A1);
impl_into_method!(A1, A2);
impl_into_method!(A1, A2, A3);
impl_into_method!(A1, A2, A3, A4);
impl_into_method!(A1, A2, A3, A4, A5);
impl_into_method!(A1, A2, A3, A4, A5, A6);
