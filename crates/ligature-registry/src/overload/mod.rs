//! Constructor and factory selection.
//!
//! This module picks the method that will build an instance from the
//! arguments a caller supplied.
//!
//! ## Algorithm
//!
//! 1. Exact match: the first method whose parameter count equals the
//!    argument count and whose every parameter accepts the argument at the
//!    same position.
//! 2. Closest match (only when fuzzy parameter resolution is requested):
//!    see [`ranking`]. Extra arguments are dropped and missing ones are
//!    filled with parameter defaults.

mod ranking;

pub use ranking::find_closest;

use ligature_core::{Argument, Method};

/// How a selected method matched the arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Counts and types agree.
    Exact,
    /// Chosen by closest arity; arguments must be reshaped.
    Closest,
}

/// Result of successful selection.
#[derive(Debug, Clone, Copy)]
pub struct Selection<'m> {
    /// The selected method.
    pub method: &'m Method,
    /// How it matched.
    pub kind: MatchKind,
}

impl Selection<'_> {
    /// Shape `args` to the selected method's parameter list.
    pub fn prepare(&self, args: Vec<Argument>) -> Vec<Argument> {
        match self.kind {
            MatchKind::Exact => args,
            MatchKind::Closest => reshape(self.method, args),
        }
    }
}

/// Find the first method accepting `args` exactly.
pub fn find_exact<'m>(methods: &'m [Method], args: &[Argument]) -> Option<&'m Method> {
    methods.iter().find(|m| m.accepts(args))
}

/// Select a method for `args`, falling back to the closest arity if
/// `fuzzy` is set.
pub fn select<'m>(methods: &'m [Method], args: &[Argument], fuzzy: bool) -> Option<Selection<'m>> {
    if let Some(method) = find_exact(methods, args) {
        return Some(Selection {
            method,
            kind: MatchKind::Exact,
        });
    }
    if !fuzzy {
        return None;
    }
    find_closest(methods, args).map(|method| Selection {
        method,
        kind: MatchKind::Closest,
    })
}

/// Drop extra arguments and append defaults for missing ones.
fn reshape(method: &Method, mut args: Vec<Argument>) -> Vec<Argument> {
    let arity = method.arity();
    args.truncate(arity);
    for param in &method.params()[args.len()..] {
        // find_closest only returns methods whose missing params have defaults
        args.push(param.default_argument().unwrap_or(Argument::Null));
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use ligature_core::IntoMethod;

    fn methods() -> Vec<Method> {
        vec![
            (|| 0u8).into_method(None),
            (|a: i32| a).into_method(None),
            (|a: i32, b: String| (a, b)).into_method(None),
        ]
    }

    #[test]
    fn exact_by_count_and_type() {
        let methods = methods();
        let args = [Argument::value(1i32)];
        let sel = select(&methods, &args, false).unwrap();
        assert_eq!(sel.kind, MatchKind::Exact);
        assert_eq!(sel.method.arity(), 1);

        let args = [Argument::value(1i32), Argument::value("x".to_string())];
        assert_eq!(select(&methods, &args, false).unwrap().method.arity(), 2);
    }

    #[test]
    fn no_exact_match_without_fuzzy() {
        let methods = methods();
        let args = [Argument::value(1i32), Argument::value(true), Argument::value(2u8)];
        assert!(select(&methods, &args, false).is_none());
    }

    #[test]
    fn fuzzy_drops_extra_arguments() {
        let methods = methods();
        let args = vec![
            Argument::value(1i32),
            Argument::value("x".to_string()),
            Argument::value(9u64),
        ];
        let sel = select(&methods, &args, true).unwrap();
        assert_eq!(sel.kind, MatchKind::Closest);
        assert_eq!(sel.method.arity(), 2);
        assert_eq!(sel.prepare(args).len(), 2);
    }

    #[test]
    fn fuzzy_fills_missing_with_defaults() {
        let methods = vec![(|a: i32, b: Option<String>| (a, b)).into_method(None)];
        let args = vec![Argument::value(5i32)];
        let sel = select(&methods, &args, true).unwrap();
        let shaped = sel.prepare(args);
        assert_eq!(shaped.len(), 2);
        assert!(shaped[1].is_null());
        let out = sel.method.invoke(shaped).unwrap();
        assert_eq!(*out.downcast::<(i32, Option<String>)>().unwrap(), (5, None));
    }
}
