//! Framework context and configuration.
//!
//! A [`Framework`] owns the three managers an application needs: the
//! general [`TypeManager`], the [`ControllerManager`] used by navigation and
//! the [`ViewManager`] used by view hosting. The application creates one at
//! startup and passes it to whatever needs to resolve types.

use std::sync::Arc;

use ligature_core::{
    Argument, FormFactor, Instance, ResolveError, ResolveOptions, TypeCatalog, TypeInfo,
};
use ligature_registry::{ControllerManager, ControllerMatch, TypeManager, ViewManager};

/// Settings applied when a [`Framework`] is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameworkConfig {
    /// Form factor of the device the application runs on.
    pub form_factor: FormFactor,
    /// Options added to every resolution made through the framework.
    pub default_resolve: ResolveOptions,
}

impl Default for FrameworkConfig {
    fn default() -> Self {
        Self {
            form_factor: FormFactor::DESKTOP,
            default_resolve: ResolveOptions::empty(),
        }
    }
}

impl FrameworkConfig {
    /// Set the device form factor.
    pub fn with_form_factor(mut self, form_factor: FormFactor) -> Self {
        self.form_factor = form_factor;
        self
    }

    /// Set the options added to every resolution.
    pub fn with_default_resolve(mut self, options: ResolveOptions) -> Self {
        self.default_resolve = options;
        self
    }
}

/// The managers of one application.
#[derive(Debug)]
pub struct Framework {
    config: FrameworkConfig,
    /// General contract-to-implementation container.
    pub types: TypeManager,
    /// Navigation controllers.
    pub controllers: ControllerManager,
    /// Views.
    pub views: ViewManager,
}

impl Framework {
    /// Create empty managers over a shared catalog.
    pub fn new(catalog: Arc<TypeCatalog>, config: FrameworkConfig) -> Self {
        Self {
            types: TypeManager::new(Arc::clone(&catalog)),
            controllers: ControllerManager::new(Arc::clone(&catalog)),
            views: ViewManager::new(catalog, config.form_factor),
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &FrameworkConfig {
        &self.config
    }

    /// The shared catalog.
    pub fn catalog(&self) -> &Arc<TypeCatalog> {
        self.types.catalog()
    }

    /// Change the device form factor.
    pub fn set_form_factor(&mut self, form_factor: FormFactor) {
        self.config.form_factor = form_factor;
        self.views.set_form_factor(form_factor);
    }

    /// Resolve `C` from the general container with the default options.
    pub fn resolve<C: ?Sized + 'static>(
        &self,
        name: Option<&str>,
    ) -> Result<Option<Arc<C>>, ResolveError> {
        self.resolve_with::<C>(name, Vec::new(), ResolveOptions::empty())
    }

    /// Resolve `C` from the general container. `options` are combined with
    /// the configured defaults.
    pub fn resolve_with<C: ?Sized + 'static>(
        &self,
        name: Option<&str>,
        args: Vec<Argument>,
        options: ResolveOptions,
    ) -> Result<Option<Arc<C>>, ResolveError> {
        self.types
            .resolve_with::<C>(name, args, options | self.config.default_resolve)
    }

    /// Resolve an instance from the general container. `options` are
    /// combined with the configured defaults.
    pub fn resolve_instance(
        &self,
        ty: TypeInfo,
        name: Option<&str>,
        args: Vec<Argument>,
        options: ResolveOptions,
    ) -> Result<Option<Instance>, ResolveError> {
        self.types
            .resolve_instance(ty, name, args, options | self.config.default_resolve)
    }

    /// Resolve the controller handling `uri`.
    pub fn navigate(&self, contract: TypeInfo, uri: &str) -> Result<ControllerMatch, ResolveError> {
        self.controllers.resolve_uri(contract, uri, Vec::new())
    }

    /// Resolve the view presenting `model` on the current form factor.
    pub fn view_for(
        &self,
        model: &Instance,
        perspective: Option<&str>,
    ) -> Result<Option<Instance>, ResolveError> {
        self.views
            .resolve_view_for(model, perspective, self.config.default_resolve)
    }
}
