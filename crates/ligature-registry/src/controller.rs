//! ControllerManager - navigation controllers routed by URI pattern.
//!
//! Controllers are registered under `/`-delimited patterns such as
//! `Item/{id}`. A request supplies the concrete URI segments and the most
//! specific pattern of the same length wins:
//!
//! - A segment matches literally when pattern and URI text are equal.
//! - Otherwise it matches as a parameter if the pattern segment is wrapped in
//!   braces.
//! - A pattern matching every segment literally is taken immediately.
//! - Otherwise the pattern with the most literal segments wins. Equal counts
//!   are decided at the leftmost position where one pattern is literal and
//!   the other a parameter; the literal one wins. Remaining ties go to the
//!   pattern registered first.
//!
//! When no pattern matches, the contract type is constructed directly
//! from the catalog.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use tracing::debug;

use ligature_core::{
    Argument, Instance, RegisterOptions, RegistrationError, ResolveError, ResolveOptions,
    TypeCatalog, TypeInfo, describe_arguments,
};

use crate::attributes::NavigationControllerAttribute;
use crate::key::{RegistrationKey, RegistryKey};
use crate::loader::TypeLoader;
use crate::manager::TypeManager;

/// Extracted pattern parameters, in pattern order.
pub type UriParameters = IndexMap<String, String, FxBuildHasher>;

/// Split a URI into path segments.
///
/// Query and fragment are ignored; leading and trailing slashes are trimmed.
///
/// ```
/// use ligature_registry::split_uri;
///
/// assert_eq!(split_uri("/Item/42/?tab=info"), vec!["Item", "42"]);
/// assert!(split_uri("/").is_empty());
/// ```
pub fn split_uri(uri: &str) -> Vec<&str> {
    let path = uri.split(['?', '#']).next().unwrap_or_default();
    let path = path.trim_matches('/');
    if path.is_empty() {
        Vec::new()
    } else {
        path.split('/').collect()
    }
}

/// How one pattern segment matched a URI segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentMatch {
    /// Equal text.
    Literal,
    /// A `{name}` placeholder.
    Parameter,
}

/// A parsed controller pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriPattern<'p> {
    segments: Vec<&'p str>,
}

impl<'p> UriPattern<'p> {
    /// Parse a pattern. Leading and trailing slashes are ignored.
    pub fn parse(pattern: &'p str) -> Self {
        let trimmed = pattern.trim_matches('/');
        let segments = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed.split('/').collect()
        };
        Self { segments }
    }

    /// The pattern's segments.
    pub fn segments(&self) -> &[&'p str] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if the pattern has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Match against URI segments. `None` if the lengths differ or some
    /// segment matches neither way.
    pub fn matches(&self, parts: &[&str]) -> Option<Vec<SegmentMatch>> {
        if parts.len() != self.segments.len() {
            return None;
        }
        self.segments
            .iter()
            .zip(parts)
            .map(|(segment, part)| {
                if segment == part {
                    Some(SegmentMatch::Literal)
                } else if parameter_name(segment).is_some() {
                    Some(SegmentMatch::Parameter)
                } else {
                    None
                }
            })
            .collect()
    }

    /// Values of the parameter segments, keyed by parameter name.
    pub fn parameters(&self, parts: &[&str]) -> Option<UriParameters> {
        let matches = self.matches(parts)?;
        let mut parameters = UriParameters::default();
        for ((segment, part), kind) in self.segments.iter().zip(parts).zip(matches) {
            if kind == SegmentMatch::Parameter {
                if let Some(name) = parameter_name(segment) {
                    parameters.insert(name.to_owned(), (*part).to_owned());
                }
            }
        }
        Some(parameters)
    }
}

/// The text inside `{...}`, if the segment is a placeholder. `{}` is a
/// placeholder with an empty name.
fn parameter_name(segment: &str) -> Option<&str> {
    if segment.len() > 1 {
        segment.strip_prefix('{')?.strip_suffix('}')
    } else {
        None
    }
}

/// Check if match `a` is more specific than `b`.
fn more_specific(a: &[SegmentMatch], b: &[SegmentMatch]) -> bool {
    let literals = |m: &[SegmentMatch]| m.iter().filter(|s| **s == SegmentMatch::Literal).count();
    let (la, lb) = (literals(a), literals(b));
    if la != lb {
        return la > lb;
    }
    a.iter()
        .zip(b)
        .find(|(x, y)| x != y)
        .is_some_and(|(x, _)| *x == SegmentMatch::Literal)
}

/// A resolved controller and the pattern that selected it.
#[derive(Debug, Clone)]
pub struct ControllerMatch {
    /// The controller instance.
    pub controller: Instance,
    /// The matched pattern. `None` for unnamed registrations and direct
    /// construction.
    pub pattern: Option<String>,
    /// Parameter values taken from the URI.
    pub parameters: UriParameters,
}

impl ControllerMatch {
    /// View the controller as `C`.
    pub fn get<C: ?Sized + 'static>(&self) -> Result<Arc<C>, ResolveError> {
        self.controller.get::<C>()
    }
}

/// Type manager for navigation controllers.
#[derive(Debug)]
pub struct ControllerManager {
    types: TypeManager,
}

impl ControllerManager {
    /// Create an empty manager.
    pub fn new(catalog: Arc<TypeCatalog>) -> Self {
        Self {
            types: TypeManager::new(catalog),
        }
    }

    /// Register `controller` under the declared pattern.
    pub fn register_controller(
        &mut self,
        controller: TypeInfo,
        attribute: &NavigationControllerAttribute,
    ) -> Result<(), RegistrationError> {
        let contract = attribute.contract.unwrap_or(controller);
        let pattern = Some(attribute.pattern.as_str());
        let options = RegisterOptions::empty();
        if attribute.singleton {
            self.types
                .register_singleton(contract, pattern, controller, None, options)
        } else {
            self.types.register(contract, pattern, controller, None, options)
        }
    }

    /// The key whose pattern best matches `parts`.
    ///
    /// With `parts == None` the unnamed registration of `contract`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn find_registration(
        &self,
        contract: TypeInfo,
        parts: Option<&[&str]>,
    ) -> Option<RegistrationKey> {
        let mut candidates = self.types.keys().filter(|k| k.type_info() == contract);

        let Some(parts) = parts else {
            return candidates.find(|k| k.name().is_none()).cloned();
        };

        let mut best: Option<(&RegistrationKey, Vec<SegmentMatch>)> = None;
        for key in candidates {
            let Some(pattern) = key.name() else {
                continue;
            };
            let Some(matches) = UriPattern::parse(pattern).matches(parts) else {
                continue;
            };
            if matches.iter().all(|m| *m == SegmentMatch::Literal) {
                return Some(key.clone());
            }
            if best.as_ref().is_none_or(|(_, current)| more_specific(&matches, current)) {
                best = Some((key, matches));
            }
        }
        best.map(|(key, _)| key.clone())
    }

    /// Resolve the controller for URI segments.
    ///
    /// Falls back to constructing `contract` itself when nothing matches.
    pub fn resolve_controller(
        &self,
        contract: TypeInfo,
        parts: Option<&[&str]>,
        args: Vec<Argument>,
    ) -> Result<ControllerMatch, ResolveError> {
        let Some(key) = self.find_registration(contract, parts) else {
            debug!(contract = %contract, ?parts, "no controller pattern matched");
            let class = self
                .types
                .catalog()
                .get(contract)
                .ok_or_else(|| ResolveError::MissingMember {
                    type_name: contract.short_name(),
                    arguments: describe_arguments(&args),
                })?;
            let controller =
                TypeLoader::new(Arc::clone(class), false).construct(args, ResolveOptions::empty())?;
            return Ok(ControllerMatch {
                controller,
                pattern: None,
                parameters: UriParameters::default(),
            });
        };

        let pattern = key.name().map(str::to_owned);
        let parameters = match (pattern.as_deref(), parts) {
            (Some(pattern), Some(parts)) => UriPattern::parse(pattern)
                .parameters(parts)
                .unwrap_or_default(),
            _ => UriParameters::default(),
        };
        debug!(contract = %contract, pattern = ?pattern, "controller pattern matched");

        let controller = self.types.resolve_key(&key, args, ResolveOptions::empty())?;
        Ok(ControllerMatch {
            controller,
            pattern,
            parameters,
        })
    }

    /// Resolve the controller for a `/`-delimited URI.
    pub fn resolve_uri(
        &self,
        contract: TypeInfo,
        uri: &str,
        args: Vec<Argument>,
    ) -> Result<ControllerMatch, ResolveError> {
        let parts = split_uri(uri);
        self.resolve_controller(contract, Some(parts.as_slice()), args)
    }
}

impl Deref for ControllerManager {
    type Target = TypeManager;

    fn deref(&self) -> &TypeManager {
        &self.types
    }
}

impl DerefMut for ControllerManager {
    fn deref_mut(&mut self) -> &mut TypeManager {
        &mut self.types
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Controller: Send + Sync {
        fn label(&self) -> &'static str;
    }

    macro_rules! controllers {
        ($($name:ident),*) => {$(
            #[derive(Default)]
            struct $name;
            impl Controller for $name {
                fn label(&self) -> &'static str {
                    stringify!($name)
                }
            }
        )*};
    }

    controllers!(ItemDetail, ItemEdit, ItemAny, Home);

    fn describe<C: Controller + Default + 'static>(catalog: &mut TypeCatalog) {
        catalog
            .class::<C>()
            .implements::<dyn Controller>(|c| c)
            .default_constructor()
            .build()
            .unwrap();
    }

    fn manager() -> ControllerManager {
        let mut catalog = TypeCatalog::new();
        describe::<ItemDetail>(&mut catalog);
        describe::<ItemEdit>(&mut catalog);
        describe::<ItemAny>(&mut catalog);
        describe::<Home>(&mut catalog);
        ControllerManager::new(Arc::new(catalog))
    }

    fn register<C: 'static>(manager: &mut ControllerManager, pattern: &str) {
        let attr = NavigationControllerAttribute::new(pattern).contract::<dyn Controller>();
        manager.register_controller(TypeInfo::of::<C>(), &attr).unwrap();
    }

    fn label(found: &ControllerMatch) -> &'static str {
        found.get::<dyn Controller>().unwrap().label()
    }

    fn contract() -> TypeInfo {
        TypeInfo::of::<dyn Controller>()
    }

    #[test]
    fn split_uri_trims() {
        assert_eq!(split_uri("Item/42"), vec!["Item", "42"]);
        assert_eq!(split_uri("//Item/42//"), vec!["Item", "42"]);
        assert_eq!(split_uri("Item/42#top"), vec!["Item", "42"]);
        assert!(split_uri("").is_empty());
    }

    #[test]
    fn pattern_matching() {
        let pattern = UriPattern::parse("Item/{id}/Edit");
        assert_eq!(pattern.len(), 3);
        assert_eq!(
            pattern.matches(&["Item", "9", "Edit"]),
            Some(vec![SegmentMatch::Literal, SegmentMatch::Parameter, SegmentMatch::Literal])
        );
        assert_eq!(pattern.matches(&["Item", "9"]), None);
        assert_eq!(pattern.matches(&["Other", "9", "Edit"]), None);
        // a bare brace is literal
        assert_eq!(UriPattern::parse("{").matches(&["x"]), None);

        let params = pattern.parameters(&["Item", "9", "Edit"]).unwrap();
        assert_eq!(params.get("id").map(String::as_str), Some("9"));
    }

    #[test]
    fn empty_placeholder_is_a_parameter() {
        let pattern = UriPattern::parse("Item/{}");
        assert_eq!(
            pattern.matches(&["Item", "42"]),
            Some(vec![SegmentMatch::Literal, SegmentMatch::Parameter])
        );
        let params = pattern.parameters(&["Item", "42"]).unwrap();
        assert_eq!(params.get("").map(String::as_str), Some("42"));

        let mut manager = manager();
        register::<ItemAny>(&mut manager, "Item/{}");
        let found = manager
            .resolve_controller(contract(), Some(&["Item", "42"]), vec![])
            .unwrap();
        assert_eq!(found.pattern.as_deref(), Some("Item/{}"));
        assert_eq!(label(&found), "ItemAny");
        assert_eq!(found.parameters.get("").map(String::as_str), Some("42"));
    }

    #[test]
    fn literal_beats_parameter() {
        let mut manager = manager();
        register::<ItemAny>(&mut manager, "Item/{x}");
        register::<ItemDetail>(&mut manager, "Item/Detail");

        let found = manager
            .resolve_controller(contract(), Some(&["Item", "Detail"]), vec![])
            .unwrap();
        assert_eq!(found.pattern.as_deref(), Some("Item/Detail"));
        assert_eq!(label(&found), "ItemDetail");

        let found = manager.resolve_uri(contract(), "Item/42", vec![]).unwrap();
        assert_eq!(found.pattern.as_deref(), Some("Item/{x}"));
        assert_eq!(found.parameters.get("x").map(String::as_str), Some("42"));
    }

    #[test]
    fn leftmost_literal_wins_ties() {
        let mut manager = manager();
        register::<ItemAny>(&mut manager, "{a}/Edit");
        register::<ItemEdit>(&mut manager, "Item/{b}");

        let found = manager
            .resolve_controller(contract(), Some(&["Item", "Edit"]), vec![])
            .unwrap();
        assert_eq!(found.pattern.as_deref(), Some("Item/{b}"));
    }

    #[test]
    fn exact_match_ignores_registration_order() {
        for reversed in [false, true] {
            let mut manager = manager();
            let mut patterns = vec![
                "Item/{id}",
                "{a}/{b}",
                "Item/Edit",
                "Other/Edit",
                "Item/Edit/{z}",
            ];
            if reversed {
                patterns.reverse();
            }
            for pattern in patterns {
                if pattern == "Item/Edit" {
                    register::<ItemEdit>(&mut manager, pattern);
                } else {
                    register::<ItemAny>(&mut manager, pattern);
                }
            }
            let found = manager.resolve_uri(contract(), "/Item/Edit", vec![]).unwrap();
            assert_eq!(found.pattern.as_deref(), Some("Item/Edit"));
            assert_eq!(label(&found), "ItemEdit");
        }
    }

    #[test]
    fn no_parts_uses_unnamed_registration() {
        let mut manager = manager();
        register::<ItemAny>(&mut manager, "Item/{id}");
        manager.register_type::<dyn Controller, Home>(None).unwrap();

        let found = manager.resolve_controller(contract(), None, vec![]).unwrap();
        assert_eq!(found.pattern, None);
        assert_eq!(label(&found), "Home");
    }

    #[test]
    fn unmatched_constructs_contract_directly() {
        let manager = manager();
        let home = TypeInfo::of::<Home>();
        let found = manager.resolve_controller(home, Some(&["Nowhere"]), vec![]).unwrap();
        assert_eq!(found.pattern, None);
        assert_eq!(label(&found), "Home");

        let err = manager.resolve_controller(contract(), Some(&["Nowhere"]), vec![]).unwrap_err();
        assert!(err.is_missing_member());
    }

    #[test]
    fn singleton_controllers() {
        let mut manager = manager();
        let attr = NavigationControllerAttribute::new("Home")
            .contract::<dyn Controller>()
            .singleton();
        manager.register_controller(TypeInfo::of::<Home>(), &attr).unwrap();

        let a = manager.resolve_uri(contract(), "Home", vec![]).unwrap();
        let b = manager.resolve_uri(contract(), "Home", vec![]).unwrap();
        assert!(a.controller.ptr_eq(&b.controller));
    }
}
