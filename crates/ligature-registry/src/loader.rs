//! TypeLoader and NamedTypeMap.
//!
//! A [`TypeLoader`] turns one class into instances: it picks a factory or
//! constructor for the supplied arguments, and for singletons caches the
//! first instance it builds. Registration entries wrap a loader; the
//! [`NamedTypeMap`] is a plain name-to-loader table for callers that do not
//! need contract types.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use rustc_hash::FxBuildHasher;
use tracing::trace;

use ligature_core::{
    Argument, ClassEntry, Instance, Method, RegistrationError, ResolveError, ResolveOptions,
    TypeCatalog, TypeInfo, describe_arguments, fuzzy,
};

use crate::overload;

/// Lazily builds instances of one class.
///
/// Singleton loaders hold their cache lock while constructing, so at most
/// one instance is built even when `load` races on several threads.
/// Consequently a constructor must not load its own singleton loader
/// re-entrantly; doing so deadlocks.
pub struct TypeLoader {
    class: Arc<ClassEntry>,
    factories: Option<Vec<Method>>,
    singleton: bool,
    instance: Mutex<Option<Instance>>,
}

impl TypeLoader {
    /// A loader constructing `class` through its constructors.
    pub fn new(class: Arc<ClassEntry>, singleton: bool) -> Self {
        Self {
            class,
            factories: None,
            singleton,
            instance: Mutex::new(None),
        }
    }

    /// A loader that prefers the given static factories over constructors.
    pub fn with_factories(class: Arc<ClassEntry>, factories: Vec<Method>, singleton: bool) -> Self {
        Self {
            factories: Some(factories),
            ..Self::new(class, singleton)
        }
    }

    /// A singleton loader seeded with an existing instance.
    pub fn with_instance(instance: Instance) -> Self {
        Self {
            class: Arc::clone(instance.class()),
            factories: None,
            singleton: true,
            instance: Mutex::new(Some(instance)),
        }
    }

    /// The class this loader builds.
    pub fn class(&self) -> &Arc<ClassEntry> {
        &self.class
    }

    /// Factory candidates, if any.
    pub fn factories(&self) -> Option<&[Method]> {
        self.factories.as_deref()
    }

    /// Check if this loader caches its instance.
    pub fn is_singleton(&self) -> bool {
        self.singleton
    }

    /// Check if a cached instance exists.
    pub fn is_loaded(&self) -> bool {
        self.instance.lock().is_some()
    }

    /// The cached instance, if any.
    pub fn cached(&self) -> Option<Instance> {
        self.instance.lock().clone()
    }

    /// Get an instance.
    ///
    /// Singletons return the cached instance unless `CREATE_NEW` is set; a
    /// newly built singleton replaces the cache.
    pub fn load(
        &self,
        args: Vec<Argument>,
        options: ResolveOptions,
    ) -> Result<Instance, ResolveError> {
        if !self.singleton {
            return self.construct(args, options);
        }

        let mut slot = self.instance.lock();
        if !options.contains(ResolveOptions::CREATE_NEW) {
            if let Some(instance) = slot.as_ref() {
                trace!(class = %self.class.type_info(), "singleton cache hit");
                return Ok(instance.clone());
            }
        }
        let instance = self.construct(args, options)?;
        *slot = Some(instance.clone());
        Ok(instance)
    }

    /// Build a new instance without touching the cache.
    ///
    /// Tries matching factories, then constructors, then the parameterless
    /// constructor with all arguments discarded.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn construct(
        &self,
        args: Vec<Argument>,
        options: ResolveOptions,
    ) -> Result<Instance, ResolveError> {
        let fuzzy = options.contains(ResolveOptions::USE_FUZZY_PARAMETER_RESOLUTION);

        let selection = self
            .factories
            .as_deref()
            .and_then(|factories| overload::select(factories, &args, fuzzy))
            .or_else(|| overload::select(self.class.constructors(), &args, fuzzy));

        let (method, args) = match selection {
            Some(selection) => {
                trace!(
                    class = %self.class.type_info(),
                    method = ?selection.method,
                    kind = ?selection.kind,
                    "selected method"
                );
                (selection.method, selection.prepare(args))
            }
            None => match self.class.default_constructor() {
                Some(method) => (method, Vec::new()),
                None => {
                    return Err(ResolveError::MissingMember {
                        type_name: self.class.type_info().short_name(),
                        arguments: describe_arguments(&args),
                    });
                }
            },
        };

        let object = method.invoke(args)?;
        Ok(Instance::new(object, Arc::clone(&self.class)))
    }
}

impl std::fmt::Debug for TypeLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeLoader")
            .field("class", &self.class.type_info())
            .field("singleton", &self.singleton)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

/// Name-to-loader table.
///
/// Names keep insertion order, which decides ties in [`NamedTypeMap::closest`].
pub struct NamedTypeMap {
    catalog: Arc<TypeCatalog>,
    loaders: IndexMap<String, TypeLoader, FxBuildHasher>,
}

impl NamedTypeMap {
    /// Create an empty map over a catalog.
    pub fn new(catalog: Arc<TypeCatalog>) -> Self {
        Self {
            catalog,
            loaders: IndexMap::default(),
        }
    }

    /// Map `name` to a described type, replacing any previous mapping.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        implementation: TypeInfo,
        singleton: bool,
    ) -> Result<(), RegistrationError> {
        let class = self.catalog.get(implementation).ok_or_else(|| {
            RegistrationError::invalid_argument(format!(
                "type {implementation} is not described in the catalog"
            ))
        })?;
        self.loaders
            .insert(name.into(), TypeLoader::new(Arc::clone(class), singleton));
        Ok(())
    }

    /// Map `name` to an existing instance.
    pub fn add_instance(&mut self, name: impl Into<String>, instance: Instance) {
        self.loaders
            .insert(name.into(), TypeLoader::with_instance(instance));
    }

    /// Get the loader for `name`.
    pub fn get(&self, name: &str) -> Option<&TypeLoader> {
        self.loaders.get(name)
    }

    /// Check if `name` is mapped.
    pub fn contains(&self, name: &str) -> bool {
        self.loaders.contains_key(name)
    }

    /// Remove a mapping. Returns whether it existed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.loaders.shift_remove(name).is_some()
    }

    /// Mapped names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.loaders.keys().map(String::as_str)
    }

    /// Number of mappings.
    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    /// Check if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }

    /// The mapped name closest to `name` by edit distance.
    pub fn closest(&self, name: &str) -> Option<&str> {
        let index = fuzzy::closest_name(Some(name), self.loaders.keys().map(|k| Some(k.as_str())))?;
        self.loaders.get_index(index).map(|(k, _)| k.as_str())
    }

    /// Load the instance mapped to `name`. Returns `Ok(None)` if unmapped.
    pub fn load(&self, name: &str, args: Vec<Argument>) -> Result<Option<Instance>, ResolveError> {
        match self.loaders.get(name) {
            Some(loader) => loader.load(args, ResolveOptions::empty()).map(Some),
            None => Ok(None),
        }
    }
}

impl std::fmt::Debug for NamedTypeMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.loaders.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct Counter(usize);

    static BUILT: AtomicUsize = AtomicUsize::new(0);

    #[derive(Debug)]
    struct Tracked;

    fn catalog() -> Arc<TypeCatalog> {
        let mut catalog = TypeCatalog::new();
        catalog
            .class::<Counter>()
            .default_constructor()
            .constructor(|n: usize| Counter(n))
            .factory("Ten", || Counter(10))
            .build()
            .unwrap();
        catalog
            .class::<Tracked>()
            .constructor(|| {
                BUILT.fetch_add(1, Ordering::SeqCst);
                Tracked
            })
            .build()
            .unwrap();
        catalog.class::<String>().build().unwrap();
        Arc::new(catalog)
    }

    fn counter_value(instance: &Instance) -> usize {
        instance.get::<Counter>().unwrap().0
    }

    #[test]
    fn transient_loader_builds_each_time() {
        let catalog = catalog();
        let loader = TypeLoader::new(
            Arc::clone(catalog.get(TypeInfo::of::<Counter>()).unwrap()),
            false,
        );
        let a = loader.load(vec![], ResolveOptions::empty()).unwrap();
        let b = loader.load(vec![], ResolveOptions::empty()).unwrap();
        assert!(!a.ptr_eq(&b));
        assert!(!loader.is_loaded());
    }

    #[test]
    fn singleton_loader_caches_and_create_new_replaces() {
        let catalog = catalog();
        let class = Arc::clone(catalog.get(TypeInfo::of::<Tracked>()).unwrap());
        let loader = TypeLoader::new(class, true);
        let before = BUILT.load(Ordering::SeqCst);

        let a = loader.load(vec![], ResolveOptions::empty()).unwrap();
        let b = loader.load(vec![], ResolveOptions::empty()).unwrap();
        assert!(a.ptr_eq(&b));
        assert_eq!(BUILT.load(Ordering::SeqCst) - before, 1);

        let c = loader.load(vec![], ResolveOptions::CREATE_NEW).unwrap();
        assert!(!a.ptr_eq(&c));
        assert!(loader.cached().unwrap().ptr_eq(&c));
    }

    #[test]
    fn factories_take_precedence() {
        let catalog = catalog();
        let class = Arc::clone(catalog.get(TypeInfo::of::<Counter>()).unwrap());
        let factories = class.factories_named("Ten");
        let loader = TypeLoader::with_factories(class, factories, false);
        let instance = loader.load(vec![], ResolveOptions::empty()).unwrap();
        assert_eq!(counter_value(&instance), 10);

        // no factory takes a usize, the constructor does
        let instance = loader.load(vec![Argument::value(3usize)], ResolveOptions::empty()).unwrap();
        assert_eq!(counter_value(&instance), 3);
    }

    #[test]
    fn unmatched_arguments_fall_back_to_default_constructor() {
        let catalog = catalog();
        let class = Arc::clone(catalog.get(TypeInfo::of::<Counter>()).unwrap());
        let loader = TypeLoader::new(class, false);
        let instance = loader
            .load(vec![Argument::value("nope".to_string())], ResolveOptions::empty())
            .unwrap();
        assert_eq!(counter_value(&instance), 0);
    }

    #[test]
    fn missing_member_without_default_constructor() {
        let catalog = catalog();
        let class = Arc::clone(catalog.get(TypeInfo::of::<String>()).unwrap());
        let loader = TypeLoader::new(class, false);
        let err = loader.load(vec![Argument::value(1u8)], ResolveOptions::empty()).unwrap_err();
        assert!(err.is_missing_member());
        assert_eq!(err.to_string(), "no constructor or factory of String accepts (u8)");
    }

    #[test]
    fn seeded_loader_returns_seed() {
        let seed = Instance::from_arc(Arc::new(Counter(5)));
        let loader = TypeLoader::with_instance(seed.clone());
        assert!(loader.is_singleton());
        assert!(loader.load(vec![], ResolveOptions::empty()).unwrap().ptr_eq(&seed));
    }

    #[test]
    fn named_map_round_trip() {
        let mut map = NamedTypeMap::new(catalog());
        map.add("counter", TypeInfo::of::<Counter>(), true).unwrap();
        map.add_instance("preset", Instance::from_arc(Arc::new(Counter(7))));

        assert_eq!(map.len(), 2);
        assert_eq!(map.names().collect::<Vec<_>>(), vec!["counter", "preset"]);
        let a = map.load("counter", vec![]).unwrap().unwrap();
        let b = map.load("counter", vec![]).unwrap().unwrap();
        assert!(a.ptr_eq(&b));
        assert_eq!(counter_value(&map.load("preset", vec![]).unwrap().unwrap()), 7);
        assert!(map.load("absent", vec![]).unwrap().is_none());

        assert_eq!(map.closest("countr"), Some("counter"));
        assert!(map.remove("counter"));
        assert!(!map.contains("counter"));
    }

    #[test]
    fn named_map_rejects_unknown_types() {
        let mut map = NamedTypeMap::new(catalog());
        let err = map.add("x", TypeInfo::of::<u64>(), false).unwrap_err();
        assert!(matches!(err, RegistrationError::InvalidArgument(_)));
    }
}
