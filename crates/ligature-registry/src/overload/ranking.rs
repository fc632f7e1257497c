//! Arity-based ranking for fuzzy parameter resolution.
//!
//! A method is viable when every argument it will receive fits its
//! parameter and every parameter it will not receive has a default.
//! Among viable methods the smallest difference between parameter count
//! and argument count wins; on equal difference the method with more
//! parameters wins (filling in defaults loses less than dropping supplied
//! arguments); remaining ties go to the method declared first.

use std::cmp::Reverse;

use ligature_core::{Argument, Method};

/// Find the closest viable method by arity.
pub fn find_closest<'m>(methods: &'m [Method], args: &[Argument]) -> Option<&'m Method> {
    methods
        .iter()
        .filter(|m| is_viable(m, args))
        .min_by_key(|m| (m.arity().abs_diff(args.len()), Reverse(m.arity())))
}

fn is_viable(method: &Method, args: &[Argument]) -> bool {
    let params = method.params();
    let shared = params.len().min(args.len());
    args[..shared]
        .iter()
        .zip(&params[..shared])
        .all(|(arg, param)| arg.fits(param))
        && params[shared..].iter().all(|p| p.has_default())
}
