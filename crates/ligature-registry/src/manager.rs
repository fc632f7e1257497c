//! TypeManager - the inversion-of-control container.
//!
//! A [`TypeManager`] maps a contract type plus an optional name to an
//! implementation type or a pre-built instance, and produces instances on
//! demand.
//!
//! # Resolution
//!
//! 1. The manager's [`KeyLookup`] picks a registry key for the requested
//!    `(type, name)`. The default lookup tries the exact key first, then,
//!    if `USE_FUZZY_NAME_RESOLUTION` is set, the registered name of the
//!    same type closest by edit distance.
//! 2. No key: `Ok(None)`, or `NotRegistered` with `THROW_IF_NOT_REGISTERED`.
//! 3. The entry's [`TypeLoader`] returns the cached singleton or builds a new
//!    instance (named factories, then constructors, then the parameterless
//!    constructor).
//!
//! Registration needs `&mut self`, resolution only `&self`, so managers can
//! be shared across threads once bootstrap is done.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use ligature_core::TypeCatalog;
//! use ligature_registry::TypeManager;
//!
//! trait Clock: Send + Sync {
//!     fn now(&self) -> u64;
//! }
//!
//! #[derive(Default)]
//! struct FixedClock;
//! impl Clock for FixedClock {
//!     fn now(&self) -> u64 { 42 }
//! }
//!
//! let mut catalog = TypeCatalog::new();
//! catalog
//!     .class::<FixedClock>()
//!     .implements::<dyn Clock>(|c| c)
//!     .default_constructor()
//!     .build()
//!     .unwrap();
//!
//! let mut types = TypeManager::new(Arc::new(catalog));
//! types.register_singleton_type::<dyn Clock, FixedClock>(None).unwrap();
//!
//! let clock = types.resolve::<dyn Clock>().unwrap().unwrap();
//! assert_eq!(clock.now(), 42);
//! ```

use std::sync::Arc;

use tracing::{debug, trace};

use ligature_core::{
    Argument, Instance, RegisterOptions, RegistrationError, ResolveError, ResolveOptions,
    TypeCatalog, TypeInfo, UnregisterError, UnregisterOptions, describe_target, fuzzy,
};

use crate::entry::RegistrationEntry;
use crate::key::{RegistrationKey, RegistryKey};
use crate::loader::TypeLoader;
use crate::registry::Registry;

/// Key selection policy of a manager.
///
/// This is the single point where specialized managers change how requests
/// map to registry keys while reusing storage and construction.
pub trait KeyLookup<K: RegistryKey> {
    /// Pick the key that serves a request for `(ty, name)`.
    fn key_for_resolution(
        &self,
        registry: &Registry<K>,
        catalog: &TypeCatalog,
        ty: TypeInfo,
        name: Option<&str>,
        allow_fuzzy: bool,
    ) -> Option<K>;

    /// Pick the keys an unregistration request removes.
    ///
    /// With `REMOVE_ALL_OF_TYPE` every key of `ty` goes, with
    /// `REMOVE_ALL_WITH_NAME` every key named `name`; both flags remove the
    /// union. Otherwise the first key matching both type and name.
    fn keys_for_unregistration(
        &self,
        registry: &Registry<K>,
        ty: TypeInfo,
        name: Option<&str>,
        options: UnregisterOptions,
    ) -> Vec<K> {
        let all_of_type = options.contains(UnregisterOptions::REMOVE_ALL_OF_TYPE);
        let all_with_name = options.contains(UnregisterOptions::REMOVE_ALL_WITH_NAME);

        if !all_of_type && !all_with_name {
            return registry
                .keys()
                .find(|k| k.type_info() == ty && k.name() == name)
                .cloned()
                .into_iter()
                .collect();
        }

        registry
            .keys()
            .filter(|k| (all_of_type && k.type_info() == ty) || (all_with_name && k.name() == name))
            .cloned()
            .collect()
    }
}

/// Exact key, then closest name of the same type.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLookup;

impl KeyLookup<RegistrationKey> for DefaultLookup {
    fn key_for_resolution(
        &self,
        registry: &Registry<RegistrationKey>,
        _catalog: &TypeCatalog,
        ty: TypeInfo,
        name: Option<&str>,
        allow_fuzzy: bool,
    ) -> Option<RegistrationKey> {
        let key = RegistrationKey::new(ty, name);
        if registry.contains(&key) {
            return Some(key);
        }
        if !allow_fuzzy {
            return None;
        }
        closest_key(registry.keys().filter(|k| k.type_info() == ty), name)
    }
}

/// The candidate whose name is closest to `name`, first wins ties.
pub(crate) fn closest_key<'k, K: RegistryKey + 'k>(
    candidates: impl Iterator<Item = &'k K>,
    name: Option<&str>,
) -> Option<K> {
    let candidates: Vec<&K> = candidates.collect();
    let index = fuzzy::closest_name(name, candidates.iter().map(|k| k.name()))?;
    let key = candidates.get(index).map(|k| (*k).clone())?;
    debug!(requested = ?name, matched = %key, "fuzzy name resolution");
    Some(key)
}

/// The inversion-of-control container.
///
/// `K` is the registry key type and `L` the key selection policy. The plain
/// container uses [`RegistrationKey`] and [`DefaultLookup`].
#[derive(Debug)]
pub struct TypeManager<K: RegistryKey = RegistrationKey, L = DefaultLookup> {
    catalog: Arc<TypeCatalog>,
    registry: Registry<K>,
    lookup: L,
}

impl TypeManager {
    /// Create an empty container over `catalog`.
    pub fn new(catalog: Arc<TypeCatalog>) -> Self {
        Self::with_lookup(catalog, DefaultLookup)
    }
}

impl<K: RegistryKey, L: KeyLookup<K>> TypeManager<K, L> {
    /// Create an empty container with a custom key policy.
    pub fn with_lookup(catalog: Arc<TypeCatalog>, lookup: L) -> Self {
        Self {
            catalog,
            registry: Registry::new(),
            lookup,
        }
    }

    /// The catalog implementations are constructed from.
    pub fn catalog(&self) -> &Arc<TypeCatalog> {
        &self.catalog
    }

    /// The key selection policy.
    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    pub(crate) fn lookup_mut(&mut self) -> &mut L {
        &mut self.lookup
    }

    /// The underlying storage.
    pub fn registry(&self) -> &Registry<K> {
        &self.registry
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register `implementation` under `key`.
    ///
    /// The implementation must be described in the catalog. It is not
    /// checked against the key's type, since view keys name a model rather
    /// than a contract. If `init_method` is given, instances are built by the
    /// class's static factories of that name, falling back to constructors.
    pub fn register_key(
        &mut self,
        key: K,
        implementation: TypeInfo,
        init_method: Option<&str>,
        singleton: bool,
        options: RegisterOptions,
    ) -> Result<(), RegistrationError> {
        let class = self.catalog.get(implementation).ok_or_else(|| {
            RegistrationError::invalid_argument(format!(
                "implementation {implementation} is not described in the catalog"
            ))
        })?;

        let loader = match init_method {
            Some(method) => {
                let factories = class.factories_named(method);
                if factories.is_empty() {
                    return Err(RegistrationError::invalid_argument(format!(
                        "{implementation} has no factory named '{method}'"
                    )));
                }
                TypeLoader::with_factories(Arc::clone(class), factories, singleton)
            }
            None => TypeLoader::new(Arc::clone(class), singleton),
        };

        let protected = options.contains(RegisterOptions::PROTECT);
        self.insert(
            key,
            RegistrationEntry::new(loader, init_method.map(str::to_owned), protected),
            options,
        )
    }

    /// Register a pre-built instance under `key` as a singleton.
    pub fn register_instance_key(
        &mut self,
        key: K,
        instance: Instance,
        options: RegisterOptions,
    ) -> Result<(), RegistrationError> {
        let contract = key.type_info();
        if !instance.can_cast(contract) {
            return Err(RegistrationError::invalid_argument(format!(
                "instance of {} cannot be cast to {contract}",
                instance.type_info()
            )));
        }

        let protected = options.contains(RegisterOptions::PROTECT);
        self.insert(
            key,
            RegistrationEntry::new(TypeLoader::with_instance(instance), None, protected),
            options,
        )
    }

    fn insert(
        &mut self,
        key: K,
        entry: RegistrationEntry,
        options: RegisterOptions,
    ) -> Result<(), RegistrationError> {
        if let Some(existing) = self.registry.get(&key) {
            if options.contains(RegisterOptions::SKIP_IF_EXISTS) {
                debug!(key = %key, "registration skipped, key exists");
                return Ok(());
            }
            if options.contains(RegisterOptions::THROW_IF_EXISTS) {
                return Err(RegistrationError::AlreadyRegistered {
                    target: key.to_string(),
                });
            }
            if existing.is_protected() {
                return Err(RegistrationError::ProtectedRegistration {
                    target: key.to_string(),
                });
            }
            debug!(key = %key, "replacing registration");
        }

        debug!(
            key = %key,
            implementation = %entry.implementation().type_info(),
            singleton = entry.is_singleton(),
            "registered"
        );
        self.registry.insert(key, entry);
        Ok(())
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Resolve `(ty, name)` to an instance.
    ///
    /// Returns `Ok(None)` when nothing is registered, unless
    /// `THROW_IF_NOT_REGISTERED` is set. Construction failures propagate
    /// unchanged.
    ///
    /// A constructor must not resolve the singleton it is building; the
    /// singleton's cache stays locked during construction and the nested
    /// call deadlocks.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn resolve_instance(
        &self,
        ty: TypeInfo,
        name: Option<&str>,
        args: Vec<Argument>,
        options: ResolveOptions,
    ) -> Result<Option<Instance>, ResolveError> {
        let allow_fuzzy = options.contains(ResolveOptions::USE_FUZZY_NAME_RESOLUTION);
        match self
            .lookup
            .key_for_resolution(&self.registry, &self.catalog, ty, name, allow_fuzzy)
        {
            Some(key) => self.resolve_key(&key, args, options).map(Some),
            None if options.contains(ResolveOptions::THROW_IF_NOT_REGISTERED) => {
                Err(ResolveError::not_registered(&ty.short_name(), name))
            }
            None => {
                trace!(request = %describe_target(&ty.short_name(), name), "not registered");
                Ok(None)
            }
        }
    }

    /// Build or fetch the instance for an exact registry key.
    pub fn resolve_key(
        &self,
        key: &K,
        args: Vec<Argument>,
        options: ResolveOptions,
    ) -> Result<Instance, ResolveError> {
        let entry = self
            .registry
            .get(key)
            .ok_or_else(|| {
                ResolveError::not_registered(&key.type_info().short_name(), key.name())
            })?;
        entry.loader().load(args, options)
    }

    /// Resolve the unnamed registration of `C`.
    pub fn resolve<C: ?Sized + 'static>(&self) -> Result<Option<Arc<C>>, ResolveError> {
        self.resolve_with::<C>(None, Vec::new(), ResolveOptions::empty())
    }

    /// Resolve the registration of `C` named `name`.
    pub fn resolve_named<C: ?Sized + 'static>(
        &self,
        name: &str,
    ) -> Result<Option<Arc<C>>, ResolveError> {
        self.resolve_with::<C>(Some(name), Vec::new(), ResolveOptions::empty())
    }

    /// Resolve `C` with explicit name, arguments and options.
    ///
    /// Fails with `TypeMismatch` if the instance cannot be viewed as `C`.
    pub fn resolve_with<C: ?Sized + 'static>(
        &self,
        name: Option<&str>,
        args: Vec<Argument>,
        options: ResolveOptions,
    ) -> Result<Option<Arc<C>>, ResolveError> {
        self.resolve_instance(TypeInfo::of::<C>(), name, args, options)?
            .map(|instance| instance.get::<C>())
            .transpose()
    }

    // ========================================================================
    // Unregistration
    // ========================================================================

    /// Remove registrations and return how many were removed.
    ///
    /// `THROW_IF_NOT_REGISTERED` only applies to single-key removal.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn unregister(
        &mut self,
        ty: TypeInfo,
        name: Option<&str>,
        options: UnregisterOptions,
    ) -> Result<usize, UnregisterError> {
        let keys = self
            .lookup
            .keys_for_unregistration(&self.registry, ty, name, options);

        let mut removed = 0;
        for key in &keys {
            if self.registry.remove(key).is_some() {
                debug!(key = %key, "unregistered");
                removed += 1;
            }
        }

        let bulk = UnregisterOptions::REMOVE_ALL_OF_TYPE | UnregisterOptions::REMOVE_ALL_WITH_NAME;
        let single = !options.intersects(bulk);
        if removed == 0 && single && options.contains(UnregisterOptions::THROW_IF_NOT_REGISTERED) {
            return Err(UnregisterError::NotRegistered {
                target: describe_target(&ty.short_name(), name),
            });
        }
        Ok(removed)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Check if a request for `(ty, name)` would find a registration
    /// without fuzzy matching.
    pub fn is_registered(&self, ty: TypeInfo, name: Option<&str>) -> bool {
        self.lookup
            .key_for_resolution(&self.registry, &self.catalog, ty, name, false)
            .is_some()
    }

    /// The entry stored under `key`.
    pub fn registration(&self, key: &K) -> Option<&RegistrationEntry> {
        self.registry.get(key)
    }

    /// Registered keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.registry.keys()
    }

    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Check if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}

impl<L: KeyLookup<RegistrationKey>> TypeManager<RegistrationKey, L> {
    /// Register a transient implementation.
    pub fn register(
        &mut self,
        contract: TypeInfo,
        name: Option<&str>,
        implementation: TypeInfo,
        init_method: Option<&str>,
        options: RegisterOptions,
    ) -> Result<(), RegistrationError> {
        self.ensure_castable(implementation, contract)?;
        let key = RegistrationKey::new(contract, name);
        self.register_key(key, implementation, init_method, false, options)
    }

    /// Register an implementation whose first instance is cached.
    pub fn register_singleton(
        &mut self,
        contract: TypeInfo,
        name: Option<&str>,
        implementation: TypeInfo,
        init_method: Option<&str>,
        options: RegisterOptions,
    ) -> Result<(), RegistrationError> {
        self.ensure_castable(implementation, contract)?;
        let key = RegistrationKey::new(contract, name);
        self.register_key(key, implementation, init_method, true, options)
    }

    /// The implementation class must be castable to the contract. A nominal
    /// base does not qualify.
    fn ensure_castable(
        &self,
        implementation: TypeInfo,
        contract: TypeInfo,
    ) -> Result<(), RegistrationError> {
        match self.catalog.get(implementation) {
            Some(class) if !class.can_cast(contract) => Err(RegistrationError::invalid_argument(
                format!("{implementation} cannot be cast to {contract}"),
            )),
            // undescribed types are rejected by `register_key`
            _ => Ok(()),
        }
    }

    /// Register a pre-built singleton instance.
    pub fn register_instance(
        &mut self,
        contract: TypeInfo,
        name: Option<&str>,
        instance: Instance,
        options: RegisterOptions,
    ) -> Result<(), RegistrationError> {
        let key = RegistrationKey::new(contract, name);
        self.register_instance_key(key, instance, options)
    }

    /// Register `T` as a transient implementation of `C`.
    pub fn register_type<C: ?Sized + 'static, T: 'static>(
        &mut self,
        name: Option<&str>,
    ) -> Result<(), RegistrationError> {
        self.register(
            TypeInfo::of::<C>(),
            name,
            TypeInfo::of::<T>(),
            None,
            RegisterOptions::empty(),
        )
    }

    /// Register `T` as the singleton implementation of `C`.
    pub fn register_singleton_type<C: ?Sized + 'static, T: 'static>(
        &mut self,
        name: Option<&str>,
    ) -> Result<(), RegistrationError> {
        self.register_singleton(
            TypeInfo::of::<C>(),
            name,
            TypeInfo::of::<T>(),
            None,
            RegisterOptions::empty(),
        )
    }

    /// Remove the registration of `C` named `name`.
    pub fn unregister_type<C: ?Sized + 'static>(
        &mut self,
        name: Option<&str>,
    ) -> Result<usize, UnregisterError> {
        self.unregister(TypeInfo::of::<C>(), name, UnregisterOptions::empty())
    }
}
