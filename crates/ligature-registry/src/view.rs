//! ViewManager - views selected by model type and form factor.
//!
//! Views are registered for a model type, an optional perspective name and
//! the form factors they suit. A request for a model walks outward until a
//! registration is found:
//!
//! 1. the model type itself,
//! 2. each base type, nearest first,
//! 3. each interface of the model or its bases,
//! 4. views registered for [`TypeInfo::object`].
//!
//! At every step the view suiting the current form factor is preferred,
//! otherwise the first view registered for that type is used. With fuzzy
//! name resolution a final step picks the closest perspective name among the
//! model's own views.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use tracing::debug;

use ligature_core::{
    Argument, FormFactor, Instance, RegisterOptions, RegistrationError, ResolveError,
    ResolveOptions, TypeCatalog, TypeInfo,
};

use crate::attributes::ViewAttribute;
use crate::key::{RegistryKey, ViewRegistrationKey};
use crate::manager::{KeyLookup, TypeManager, closest_key};
use crate::registry::Registry;

/// Key policy of the [`ViewManager`].
#[derive(Debug, Clone, Copy)]
pub struct ViewLookup {
    form_factor: FormFactor,
}

impl ViewLookup {
    /// A policy preferring views that suit `form_factor`.
    pub fn new(form_factor: FormFactor) -> Self {
        Self { form_factor }
    }

    /// The current device form factor.
    pub fn form_factor(&self) -> FormFactor {
        self.form_factor
    }

    /// Best view registered for exactly `model` and `perspective`.
    fn best_for(
        &self,
        registry: &Registry<ViewRegistrationKey>,
        model: TypeInfo,
        perspective: Option<&str>,
    ) -> Option<ViewRegistrationKey> {
        let mut fallback = None;
        for key in registry
            .keys()
            .filter(|k| k.type_info() == model && k.name() == perspective)
        {
            if key.form_factor().supports(self.form_factor) {
                return Some(key.clone());
            }
            if fallback.is_none() {
                fallback = Some(key);
            }
        }
        fallback.cloned()
    }
}

impl KeyLookup<ViewRegistrationKey> for ViewLookup {
    #[cfg_attr(feature = "profiling", profiling::function)]
    fn key_for_resolution(
        &self,
        registry: &Registry<ViewRegistrationKey>,
        catalog: &TypeCatalog,
        ty: TypeInfo,
        name: Option<&str>,
        allow_fuzzy: bool,
    ) -> Option<ViewRegistrationKey> {
        if let Some(key) = self.best_for(registry, ty, name) {
            return Some(key);
        }

        let inherited = catalog
            .base_chain(ty)
            .into_iter()
            .chain(catalog.interfaces_of(ty))
            .chain((!ty.is_object()).then(TypeInfo::object));
        for model in inherited {
            if let Some(key) = self.best_for(registry, model, name) {
                debug!(requested = %ty, model = %model, "view found through inherited model");
                return Some(key);
            }
        }

        if !allow_fuzzy {
            return None;
        }
        let suited = || {
            registry
                .keys()
                .filter(|k| k.type_info() == ty && k.form_factor().supports(self.form_factor))
        };
        if suited().next().is_some() {
            closest_key(suited(), name)
        } else {
            closest_key(registry.keys().filter(|k| k.type_info() == ty), name)
        }
    }
}

/// Type manager for views.
#[derive(Debug)]
pub struct ViewManager {
    types: TypeManager<ViewRegistrationKey, ViewLookup>,
}

impl ViewManager {
    /// Create an empty manager for a device of `form_factor`.
    pub fn new(catalog: Arc<TypeCatalog>, form_factor: FormFactor) -> Self {
        Self {
            types: TypeManager::with_lookup(catalog, ViewLookup::new(form_factor)),
        }
    }

    /// The current device form factor.
    pub fn form_factor(&self) -> FormFactor {
        self.types.lookup().form_factor()
    }

    /// Change the current device form factor.
    pub fn set_form_factor(&mut self, form_factor: FormFactor) {
        self.types.lookup_mut().form_factor = form_factor;
    }

    /// Register `view` once per attribute.
    ///
    /// No attributes registers the view once with [`ViewAttribute::default`].
    /// An attribute without a model uses the view's declared model, falling
    /// back to [`TypeInfo::object`].
    pub fn register_view(
        &mut self,
        view: TypeInfo,
        attributes: &[ViewAttribute],
    ) -> Result<(), RegistrationError> {
        let declared = self
            .types
            .catalog()
            .get(view)
            .ok_or_else(|| {
                RegistrationError::invalid_argument(format!(
                    "view {view} is not described in the catalog"
                ))
            })?
            .view_model();

        let default = [ViewAttribute::default()];
        let attributes = if attributes.is_empty() { &default[..] } else { attributes };

        for attribute in attributes {
            let model = attribute.model.or(declared).unwrap_or_else(TypeInfo::object);
            let key = ViewRegistrationKey::new(
                model,
                attribute.perspective.as_deref(),
                attribute.form_factor,
            );
            self.types
                .register_key(key, view, None, attribute.singleton, RegisterOptions::empty())?;
        }
        Ok(())
    }

    /// Resolve the view for a model type and perspective.
    pub fn resolve_view(
        &self,
        model: TypeInfo,
        perspective: Option<&str>,
        args: Vec<Argument>,
        options: ResolveOptions,
    ) -> Result<Option<Instance>, ResolveError> {
        self.types.resolve_instance(model, perspective, args, options)
    }

    /// Resolve the view for a model instance.
    ///
    /// The model is offered to the view's constructors as the only argument;
    /// views without a matching constructor are default constructed.
    pub fn resolve_view_for(
        &self,
        model: &Instance,
        perspective: Option<&str>,
        options: ResolveOptions,
    ) -> Result<Option<Instance>, ResolveError> {
        self.types.resolve_instance(
            model.type_info(),
            perspective,
            vec![Argument::object(model.clone())],
            options,
        )
    }
}

impl Deref for ViewManager {
    type Target = TypeManager<ViewRegistrationKey, ViewLookup>;

    fn deref(&self) -> &Self::Target {
        &self.types
    }
}

impl DerefMut for ViewManager {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.types
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Model: Send + Sync {}

    #[derive(Default)]
    struct Entity;
    #[derive(Default)]
    struct Customer;
    impl Model for Customer {}

    struct CustomerView(Option<Arc<Customer>>);
    #[derive(Default)]
    struct PhoneView;
    #[derive(Default)]
    struct TabletView;
    #[derive(Default)]
    struct EntityView;
    #[derive(Default)]
    struct ModelView;
    #[derive(Default)]
    struct AnyView;

    fn catalog() -> Arc<TypeCatalog> {
        let mut catalog = TypeCatalog::new();
        catalog.class::<Entity>().default_constructor().build().unwrap();
        catalog
            .class::<Customer>()
            .extends::<Entity>()
            .implements::<dyn Model>(|c| c)
            .default_constructor()
            .build()
            .unwrap();
        catalog
            .class::<CustomerView>()
            .view_of::<Customer>()
            .constructor(|model: Option<Arc<Customer>>| CustomerView(model))
            .build()
            .unwrap();
        catalog.class::<PhoneView>().default_constructor().build().unwrap();
        catalog.class::<TabletView>().default_constructor().build().unwrap();
        catalog.class::<EntityView>().default_constructor().build().unwrap();
        catalog.class::<ModelView>().default_constructor().build().unwrap();
        catalog.class::<AnyView>().default_constructor().build().unwrap();
        Arc::new(catalog)
    }

    fn customer() -> TypeInfo {
        TypeInfo::of::<Customer>()
    }

    fn view_type(
        views: &ViewManager,
        model: TypeInfo,
        perspective: Option<&str>,
    ) -> Option<TypeInfo> {
        views
            .resolve_view(model, perspective, vec![], ResolveOptions::empty())
            .unwrap()
            .map(|v| v.type_info())
    }

    #[test]
    fn form_factor_preference() {
        let mut views = ViewManager::new(catalog(), FormFactor::TABLET);
        let phone = ViewAttribute::of::<Customer>().form_factor(FormFactor::PHONE);
        let tablet = ViewAttribute::of::<Customer>().form_factor(FormFactor::TABLET);
        views.register_view(TypeInfo::of::<PhoneView>(), &[phone]).unwrap();
        views.register_view(TypeInfo::of::<TabletView>(), &[tablet]).unwrap();

        assert_eq!(view_type(&views, customer(), None), Some(TypeInfo::of::<TabletView>()));
        views.set_form_factor(FormFactor::PHONE);
        assert_eq!(view_type(&views, customer(), None), Some(TypeInfo::of::<PhoneView>()));
        views.set_form_factor(FormFactor::DESKTOP);
        assert_eq!(view_type(&views, customer(), None), Some(TypeInfo::of::<PhoneView>()));
    }

    #[test]
    fn declared_model_and_default_attribute() {
        let mut views = ViewManager::new(catalog(), FormFactor::DESKTOP);
        views.register_view(TypeInfo::of::<CustomerView>(), &[]).unwrap();
        views.register_view(TypeInfo::of::<AnyView>(), &[]).unwrap();

        let key = ViewRegistrationKey::new(customer(), None, FormFactor::ALL);
        assert!(views.registration(&key).is_some());
        assert!(views.is_registered(TypeInfo::object(), None));
        assert_eq!(
            view_type(&views, TypeInfo::of::<String>(), None),
            Some(TypeInfo::of::<AnyView>())
        );
    }

    #[test]
    fn walks_bases_then_interfaces_then_object() {
        let mut views = ViewManager::new(catalog(), FormFactor::DESKTOP);
        views.register_view(TypeInfo::of::<AnyView>(), &[]).unwrap();
        assert_eq!(view_type(&views, customer(), None), Some(TypeInfo::of::<AnyView>()));

        views
            .register_view(TypeInfo::of::<ModelView>(), &[ViewAttribute::of::<dyn Model>()])
            .unwrap();
        assert_eq!(view_type(&views, customer(), None), Some(TypeInfo::of::<ModelView>()));

        views
            .register_view(TypeInfo::of::<EntityView>(), &[ViewAttribute::of::<Entity>()])
            .unwrap();
        assert_eq!(view_type(&views, customer(), None), Some(TypeInfo::of::<EntityView>()));
    }

    #[test]
    fn perspectives_and_fuzzy_names() {
        let mut views = ViewManager::new(catalog(), FormFactor::DESKTOP);
        let attrs = [
            ViewAttribute::of::<Customer>().perspective("Detail"),
            ViewAttribute::of::<Customer>().perspective("List"),
        ];
        views.register_view(TypeInfo::of::<EntityView>(), &attrs[..1]).unwrap();
        views.register_view(TypeInfo::of::<ModelView>(), &attrs[1..]).unwrap();

        assert_eq!(view_type(&views, customer(), Some("List")), Some(TypeInfo::of::<ModelView>()));
        assert_eq!(view_type(&views, customer(), Some("Lst")), None);

        let fuzzy = views
            .resolve_view(
                customer(),
                Some("Lst"),
                vec![],
                ResolveOptions::USE_FUZZY_NAME_RESOLUTION,
            )
            .unwrap()
            .unwrap();
        assert_eq!(fuzzy.type_info(), TypeInfo::of::<ModelView>());
    }

    #[test]
    fn view_receives_model_instance() {
        let catalog = catalog();
        let mut views = ViewManager::new(Arc::clone(&catalog), FormFactor::DESKTOP);
        views.register_view(TypeInfo::of::<CustomerView>(), &[]).unwrap();

        let model = catalog.instance(Arc::new(Customer));
        let view = views
            .resolve_view_for(&model, None, ResolveOptions::empty())
            .unwrap()
            .unwrap();
        let view = view.get::<CustomerView>().unwrap();
        let bound = view.0.as_ref().unwrap();
        assert!(std::ptr::eq(Arc::as_ptr(bound), Arc::as_ptr(&model.get::<Customer>().unwrap())));
    }

    #[test]
    fn unknown_view_types_are_rejected() {
        let mut views = ViewManager::new(catalog(), FormFactor::DESKTOP);
        let err = views.register_view(TypeInfo::of::<u8>(), &[]).unwrap_err();
        assert!(matches!(err, RegistrationError::InvalidArgument(_)));
    }
}
