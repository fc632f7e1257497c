//! Class descriptions.
//!
//! A [`ClassEntry`] describes one implementation type: where it sits in the
//! type hierarchy, which interfaces it can be viewed as, and how it is
//! constructed. Entries are built with [`ClassBuilder`] and stored in a
//! [`TypeCatalog`](crate::TypeCatalog).

use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::method::{Arguments, IntoMethod};
use crate::{BoxError, Method, Param, RegistrationError, TypeCatalog, TypeInfo};

/// Converts an erased object of the class type into a boxed `Arc<I>`.
type Upcast = Arc<dyn Fn(Arc<dyn Any + Send + Sync>) -> Option<Box<dyn Any>> + Send + Sync>;

/// Registry entry for an implementation type.
pub struct ClassEntry {
    /// Type identity.
    type_info: TypeInfo,
    /// Base type (single, nominal inheritance).
    base: Option<TypeInfo>,
    /// Implemented interfaces, in declaration order.
    interfaces: Vec<TypeInfo>,
    /// Model type this class is a view of.
    view_model: Option<TypeInfo>,
    /// Unnamed constructors.
    constructors: Vec<Method>,
    /// Named static factory methods.
    factories: Vec<Method>,
    /// Casts by target type id. Always contains the class type itself and
    /// `dyn Any + Send + Sync`.
    casts: FxHashMap<TypeId, Upcast>,
}

impl ClassEntry {
    fn new<T: Any + Send + Sync>() -> Self {
        let mut casts: FxHashMap<TypeId, Upcast> = FxHashMap::default();
        casts.insert(TypeId::of::<T>(), upcast::<T, T>(|this| this));
        casts.insert(
            TypeId::of::<dyn Any + Send + Sync>(),
            upcast::<T, dyn Any + Send + Sync>(|this| this as Arc<dyn Any + Send + Sync>),
        );
        Self {
            type_info: TypeInfo::of::<T>(),
            base: None,
            interfaces: Vec::new(),
            view_model: None,
            constructors: Vec::new(),
            factories: Vec::new(),
            casts,
        }
    }

    /// A bare entry for a type with no description: no hierarchy, no
    /// constructors.
    pub fn opaque<T: Any + Send + Sync>() -> Self {
        Self::new::<T>()
    }

    /// Type identity.
    pub fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    /// Declared base type.
    pub fn base(&self) -> Option<TypeInfo> {
        self.base
    }

    /// Declared interfaces.
    pub fn interfaces(&self) -> &[TypeInfo] {
        &self.interfaces
    }

    /// Model type this class renders, if it is a view.
    pub fn view_model(&self) -> Option<TypeInfo> {
        self.view_model
    }

    /// Unnamed constructors, in declaration order.
    pub fn constructors(&self) -> &[Method] {
        &self.constructors
    }

    /// All named factories, in declaration order.
    pub fn factories(&self) -> &[Method] {
        &self.factories
    }

    /// Factories with the given name.
    pub fn factories_named(&self, name: &str) -> Vec<Method> {
        self.factories
            .iter()
            .filter(|m| m.name() == Some(name))
            .cloned()
            .collect()
    }

    /// The parameterless constructor, if any.
    pub fn default_constructor(&self) -> Option<&Method> {
        self.constructors.iter().find(|m| m.arity() == 0)
    }

    /// Check if this class implements `interface` directly.
    pub fn implements(&self, interface: TypeInfo) -> bool {
        self.interfaces.contains(&interface)
    }

    /// Check if instances can be viewed as `ty`.
    pub fn can_cast(&self, ty: TypeInfo) -> bool {
        self.casts.contains_key(&ty.id())
    }

    pub(crate) fn cast(&self, target: TypeId) -> Option<&Upcast> {
        self.casts.get(&target)
    }
}

impl fmt::Debug for ClassEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassEntry")
            .field("type_info", &self.type_info)
            .field("base", &self.base)
            .field("interfaces", &self.interfaces)
            .field("view_model", &self.view_model)
            .field("constructors", &self.constructors)
            .field("factories", &self.factories)
            .finish()
    }
}

fn upcast<T, I>(f: impl Fn(Arc<T>) -> Arc<I> + Send + Sync + 'static) -> Upcast
where
    T: Any + Send + Sync,
    I: ?Sized + 'static,
{
    Arc::new(move |object: Arc<dyn Any + Send + Sync>| {
        object
            .downcast::<T>()
            .ok()
            .map(|this| Box::new(f(this)) as Box<dyn Any>)
    })
}

/// Builder for describing an implementation type.
///
/// Created by [`TypeCatalog::class`].
///
/// # Example
///
/// ```ignore
/// catalog.class::<SqlStore>()
///     .implements::<dyn Store>(|s| s)
///     .extends::<StoreBase>()
///     .constructor(|| SqlStore::in_memory())
///     .constructor(|path: String| SqlStore::open(path))
///     .factory("WithPool", |path: String, pool: u32| SqlStore::pooled(path, pool))
///     .build()?;
/// ```
pub struct ClassBuilder<'c, T> {
    catalog: &'c mut TypeCatalog,
    entry: ClassEntry,
    _marker: PhantomData<fn() -> T>,
}

impl<'c, T: Any + Send + Sync> ClassBuilder<'c, T> {
    pub(crate) fn new(catalog: &'c mut TypeCatalog) -> Self {
        Self {
            catalog,
            entry: ClassEntry::new::<T>(),
            _marker: PhantomData,
        }
    }

    /// Declare the base type.
    ///
    /// Inheritance is nominal: view lookup walks it, but instances cannot be
    /// cast to the base, so the base cannot serve as a registration contract.
    pub fn extends<B: ?Sized + 'static>(mut self) -> Self {
        self.entry.base = Some(TypeInfo::of::<B>());
        self
    }

    /// Declare an implemented interface and how to view an instance as it.
    pub fn implements<I: ?Sized + 'static>(
        mut self,
        cast: impl Fn(Arc<T>) -> Arc<I> + Send + Sync + 'static,
    ) -> Self {
        let ty = TypeInfo::of::<I>();
        if !self.entry.interfaces.contains(&ty) {
            self.entry.interfaces.push(ty);
        }
        self.entry.casts.insert(ty.id(), upcast::<T, I>(cast));
        self
    }

    /// Declare the model type this class is a view of.
    pub fn view_of<M: ?Sized + 'static>(mut self) -> Self {
        self.entry.view_model = Some(TypeInfo::of::<M>());
        self
    }

    /// Add a constructor.
    pub fn constructor<Args>(mut self, f: impl IntoMethod<T, Args>) -> Self {
        self.entry.constructors.push(f.into_method(None));
        self
    }

    /// Add a constructor that may fail.
    pub fn try_constructor<F>(mut self, params: Vec<Param>, f: F) -> Self
    where
        F: Fn(Arguments) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        self.entry.constructors.push(Method::new(None, params, f));
        self
    }

    /// Add a parameterless constructor using `Default`.
    pub fn default_constructor(self) -> Self
    where
        T: Default,
    {
        self.constructor(T::default)
    }

    /// Add a named static factory.
    pub fn factory<Args>(mut self, name: impl Into<String>, f: impl IntoMethod<T, Args>) -> Self {
        self.entry.factories.push(f.into_method(Some(name.into())));
        self
    }

    /// Add a named static factory that may fail.
    pub fn try_factory<F>(mut self, name: impl Into<String>, params: Vec<Param>, f: F) -> Self
    where
        F: Fn(Arguments) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        self.entry
            .factories
            .push(Method::new(Some(name.into()), params, f));
        self
    }

    /// Store the class in the catalog.
    ///
    /// Fails with `AlreadyRegistered` if the type is already described.
    pub fn build(self) -> Result<Arc<ClassEntry>, RegistrationError> {
        self.catalog.insert(self.entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Shape: Send + Sync {
        fn area(&self) -> f64;
    }

    #[derive(Debug, Default)]
    struct Square(f64);

    impl Shape for Square {
        fn area(&self) -> f64 {
            self.0 * self.0
        }
    }

    #[test]
    fn builder_collects_members() {
        let mut catalog = TypeCatalog::new();
        let class = catalog
            .class::<Square>()
            .implements::<dyn Shape>(|s| s)
            .default_constructor()
            .constructor(|side: f64| Square(side))
            .factory("Unit", || Square(1.0))
            .build()
            .unwrap();

        assert_eq!(class.type_info(), TypeInfo::of::<Square>());
        assert!(class.implements(TypeInfo::of::<dyn Shape>()));
        assert_eq!(class.constructors().len(), 2);
        assert_eq!(class.factories_named("Unit").len(), 1);
        assert!(class.factories_named("Other").is_empty());
        assert_eq!(class.default_constructor().map(Method::arity), Some(0));
    }

    #[test]
    fn casts_include_self_object_and_interfaces() {
        let mut catalog = TypeCatalog::new();
        let class = catalog
            .class::<Square>()
            .implements::<dyn Shape>(|s| s)
            .build()
            .unwrap();

        assert!(class.can_cast(TypeInfo::of::<Square>()));
        assert!(class.can_cast(TypeInfo::object()));
        assert!(class.can_cast(TypeInfo::of::<dyn Shape>()));
        assert!(!class.can_cast(TypeInfo::of::<String>()));
    }

    #[test]
    fn duplicate_class_is_rejected() {
        let mut catalog = TypeCatalog::new();
        catalog.class::<Square>().build().unwrap();
        let err = catalog.class::<Square>().build().unwrap_err();
        assert!(matches!(err, RegistrationError::AlreadyRegistered { .. }));
    }
}
