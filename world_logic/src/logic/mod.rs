//! Propositions, rule templates and grounded actions.
//!
//! A [`Rule`] is a template over placeholders; an [`Action`] is the same template
//! with every placeholder replaced by a concrete object. Both split their facts into
//! three partitions:
//! - **kept**: in preconditions and postconditions, untouched by the action
//! - **added**: postconditions only
//! - **removed**: preconditions only

mod action;
mod proposition;
mod rule;

pub use action::*;
pub use proposition::*;
pub use rule::*;

use std::collections::HashSet;

/// Facts present on both sides.
fn kept<'a>(
    pre: &'a [Proposition],
    post: &'a [Proposition],
) -> impl Iterator<Item = &'a Proposition> + 'a {
    pre.iter().filter(move |p| post.contains(p))
}

/// Facts only present in the postconditions.
fn added<'a>(
    pre: &'a [Proposition],
    post: &'a [Proposition],
) -> impl Iterator<Item = &'a Proposition> + 'a {
    post.iter().filter(move |p| !pre.contains(p))
}

/// Facts only present in the preconditions.
fn removed<'a>(
    pre: &'a [Proposition],
    post: &'a [Proposition],
) -> impl Iterator<Item = &'a Proposition> + 'a {
    pre.iter().filter(move |p| !post.contains(p))
}

/// Set equality, ignoring order and repeats.
fn same_facts(a: &[Proposition], b: &[Proposition]) -> bool {
    a.iter().collect::<HashSet<_>>() == b.iter().collect::<HashSet<_>>()
}

/// Render `name :: pre & pre -> post & post`.
fn fmt_template(
    f: &mut std::fmt::Formatter<'_>,
    name: &str,
    pre: &[Proposition],
    post: &[Proposition],
) -> std::fmt::Result {
    let join = |props: &[Proposition]| {
        props
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" & ")
    };
    write!(f, "{} :: {} -> {}", name, join(pre), join(post))
}
