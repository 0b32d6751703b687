//! Unifier: scores how well a query [`TypeTree`] fits a target tree.
//!
//! Matching is heuristic, not a type check: every rule yields a score in
//! `[0, 100]` and the first applicable rule wins. Type variables in the query
//! are bound as they are met; the binding table is a persistent map that each
//! step receives by reference and hands back inside its [`MatchResult`], so a
//! speculative branch can never leak bindings into a sibling.
//!
//! Recursion is capped at [`MAX_UNIFY_DEPTH`]; past it nodes are compared by
//! text alone.

use crate::types::{Bindings, MatchResult, TypeKind, TypeTree};

pub const MAX_UNIFY_DEPTH: usize = 10;

const WILDCARD_SCORE: f64 = 80.0;
const FRESH_BINDING_SCORE: f64 = 90.0;
const SAME_BINDING_SCORE: f64 = 90.0;
const VARIABLE_REBIND_SCORE: f64 = 85.0;
const SAME_SHAPE_BINDING_SCORE: f64 = 80.0;
const TARGET_VARIABLE_SCORE: f64 = 85.0;
const EXACT_SCORE: f64 = 100.0;
const ONE_SIDED_ARGS_SCORE: f64 = 60.0;
const ARITY_MISMATCH_FACTOR: f64 = 0.8;
const TEXT_FALLBACK_SCORE: f64 = 70.0;
const DEPTH_LIMIT_TEXT_SCORE: f64 = 60.0;
const DEPTH_LIMIT_VARIABLE_SCORE: f64 = 50.0;

const NO_PARAMS_FACTOR: f64 = 0.9;
const FAILED_PARAM_SCORE: f64 = 20.0;
const UNCOMPARED_PARAMS_SCORE: f64 = 50.0;
const EXACT_ARITY_BONUS: f64 = 1.1;
const RETURN_WEIGHT: f64 = 0.6;
const PARAM_WEIGHT: f64 = 0.4;

/// Unify `query` against `target` from an empty binding table.
pub fn unify(query: &TypeTree, target: &TypeTree) -> MatchResult {
    unify_with(query, target, &Bindings::new(), 0)
}

/// Unify under existing `bindings` at recursion `depth`. Never fails; a
/// mismatch is a result with `matches == false` carrying `bindings` unchanged.
pub fn unify_with(
    query: &TypeTree,
    target: &TypeTree,
    bindings: &Bindings,
    depth: usize,
) -> MatchResult {
    if depth >= MAX_UNIFY_DEPTH {
        return depth_limited(query, target, bindings);
    }

    match (query, target) {
        (TypeTree::Wildcard, _) => leaf(WILDCARD_SCORE, bindings.clone(), target),
        (TypeTree::TypeVariable { text: name }, _) => unify_variable(name, target, bindings),
        (_, TypeTree::TypeVariable { .. }) => leaf(TARGET_VARIABLE_SCORE, bindings.clone(), target),
        (
            TypeTree::Function { params: qp, ret: qr, .. },
            TypeTree::Function { params: tp, ret: tr, .. },
        ) => unify_functions(qp, qr, tp, tr, bindings, depth),
        _ if !kinds_compatible(query.kind(), target.kind()) => MatchResult::failure(bindings.clone()),
        (
            TypeTree::Generic { name: qn, args: qa, .. } | TypeTree::Effect { name: qn, args: qa, .. },
            TypeTree::Generic { name: tn, args: ta, .. } | TypeTree::Effect { name: tn, args: ta, .. },
        ) => unify_constructors(
            (qn.as_str(), qa.as_slice()),
            (tn.as_str(), ta.as_slice()),
            target,
            bindings,
            depth,
        ),
        (TypeTree::Primitive { text: q }, TypeTree::Primitive { text: t }) => {
            exact_if(q.eq_ignore_ascii_case(t), bindings, target)
        }
        (
            TypeTree::Reference { text: qt, name: qn },
            TypeTree::Reference { text: tt, name: tn },
        ) => exact_if(
            qn.eq_ignore_ascii_case(tn) || qt.eq_ignore_ascii_case(tt),
            bindings,
            target,
        ),
        (TypeTree::Union { members: qm, .. }, TypeTree::Union { members: tm, .. })
            if !qm.is_empty() =>
        {
            unify_unions(qm, tm, bindings, depth)
        }
        (TypeTree::Tuple { elements: qe, .. }, TypeTree::Tuple { elements: te, .. }) => {
            unify_tuples(qe, te, target, bindings, depth)
        }
        _ if query.text().eq_ignore_ascii_case(target.text()) => {
            leaf(TEXT_FALLBACK_SCORE, bindings.clone(), target)
        }
        _ => MatchResult::failure(bindings.clone()),
    }
}

/// Identical kinds, or `generic` against `effect` either way round.
pub fn kinds_compatible(a: TypeKind, b: TypeKind) -> bool {
    a == b
        || matches!(
            (a, b),
            (TypeKind::Generic, TypeKind::Effect) | (TypeKind::Effect, TypeKind::Generic)
        )
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

fn depth_limited(query: &TypeTree, target: &TypeTree, bindings: &Bindings) -> MatchResult {
    tracing::trace!(query = %query, target = %target, "unify: depth limit reached");
    if query.text() == target.text() {
        leaf(DEPTH_LIMIT_TEXT_SCORE, bindings.clone(), target)
    } else if query.is_type_variable() || target.is_type_variable() {
        leaf(DEPTH_LIMIT_VARIABLE_SCORE, bindings.clone(), target)
    } else {
        MatchResult::failure(bindings.clone())
    }
}

fn unify_variable(name: &str, target: &TypeTree, bindings: &Bindings) -> MatchResult {
    let Some(bound) = bindings.get(name) else {
        let bindings = bindings.update(name.to_string(), target.clone());
        return leaf(FRESH_BINDING_SCORE, bindings, target);
    };

    let score = if bound.text() == target.text() {
        SAME_BINDING_SCORE
    } else if bound.is_type_variable() || target.is_type_variable() {
        VARIABLE_REBIND_SCORE
    } else if bound.kind() == target.kind() && constructors_agree(bound, target) {
        SAME_SHAPE_BINDING_SCORE
    } else {
        return MatchResult::failure(bindings.clone());
    };
    leaf(score, bindings.clone(), target)
}

fn constructors_agree(a: &TypeTree, b: &TypeTree) -> bool {
    match (a.constructor(), b.constructor()) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        _ => true,
    }
}

fn unify_constructors(
    (query_name, query_args): (&str, &[TypeTree]),
    (target_name, target_args): (&str, &[TypeTree]),
    target: &TypeTree,
    bindings: &Bindings,
    depth: usize,
) -> MatchResult {
    if !query_name.eq_ignore_ascii_case(target_name) {
        return MatchResult::failure(bindings.clone());
    }
    match (query_args.is_empty(), target_args.is_empty()) {
        (true, true) => return leaf(EXACT_SCORE, bindings.clone(), target),
        (true, false) | (false, true) => return leaf(ONE_SIDED_ARGS_SCORE, bindings.clone(), target),
        (false, false) => {}
    }

    let Some(run) = unify_strictly(query_args.iter().zip(target_args), bindings, depth) else {
        return MatchResult::failure(bindings.clone());
    };
    let mut score = run.mean();
    if query_args.len() != target_args.len() {
        score *= ARITY_MISMATCH_FACTOR;
    }
    MatchResult::success(score, run.bindings, run.parts)
}

/// Every query member must find its best target member; extra target members
/// cost nothing.
fn unify_unions(
    query_members: &[TypeTree],
    target_members: &[TypeTree],
    bindings: &Bindings,
    depth: usize,
) -> MatchResult {
    let mut current = bindings.clone();
    let mut total = 0.0;
    let mut parts = Vec::new();

    for member in query_members {
        // Each candidate starts from `current`; what one binds is invisible
        // to the others.
        let mut best: Option<MatchResult> = None;
        for candidate in target_members {
            let result = unify_with(member, candidate, &current, depth + 1);
            if result.matches && best.as_ref().map_or(true, |b| result.score > b.score) {
                best = Some(result);
            }
        }
        let Some(best) = best else {
            return MatchResult::failure(bindings.clone());
        };
        total += best.score;
        current = best.bindings;
        parts.extend(best.matched_parts);
    }

    MatchResult::success(total / query_members.len() as f64, current, parts)
}

fn unify_tuples(
    query_elements: &[TypeTree],
    target_elements: &[TypeTree],
    target: &TypeTree,
    bindings: &Bindings,
    depth: usize,
) -> MatchResult {
    if query_elements.len() != target_elements.len() {
        return MatchResult::failure(bindings.clone());
    }
    if query_elements.is_empty() {
        return leaf(EXACT_SCORE, bindings.clone(), target);
    }
    match unify_strictly(query_elements.iter().zip(target_elements), bindings, depth) {
        Some(run) => MatchResult::success(run.mean(), run.bindings, run.parts),
        None => MatchResult::failure(bindings.clone()),
    }
}

/// The return type decides whether there is a match at all; parameters only
/// shape the score.
fn unify_functions(
    query_params: &[TypeTree],
    query_ret: &TypeTree,
    target_params: &[TypeTree],
    target_ret: &TypeTree,
    bindings: &Bindings,
    depth: usize,
) -> MatchResult {
    let ret = unify_with(query_ret, target_ret, bindings, depth + 1);
    if !ret.matches {
        return MatchResult::failure(bindings.clone());
    }
    if query_params.is_empty() {
        return MatchResult::success(ret.score * NO_PARAMS_FACTOR, ret.bindings, ret.matched_parts);
    }

    let mut current = ret.bindings;
    let mut parts = ret.matched_parts;
    let mut total = 0.0;
    let mut compared = 0usize;
    let mut matched = 0usize;

    for (query, target) in query_params.iter().zip(target_params) {
        let result = unify_with(query, target, &current, depth + 1);
        compared += 1;
        if result.matches {
            total += result.score;
            matched += 1;
            current = result.bindings;
            parts.extend(result.matched_parts);
        } else {
            total += FAILED_PARAM_SCORE;
        }
    }

    // No successful comparison: parameters neither help nor hurt.
    let param_score = if matched == 0 {
        UNCOMPARED_PARAMS_SCORE
    } else {
        let mean = total / compared as f64;
        if matched == compared && query_params.len() == target_params.len() {
            (mean * EXACT_ARITY_BONUS).min(EXACT_SCORE)
        } else {
            mean
        }
    };

    MatchResult::success(
        RETURN_WEIGHT * ret.score + PARAM_WEIGHT * param_score,
        current,
        parts,
    )
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Accumulated outcome of a pairwise run in which every pair matched.
struct Run {
    total: f64,
    count: usize,
    bindings: Bindings,
    parts: Vec<String>,
}

impl Run {
    fn mean(&self) -> f64 {
        self.total / self.count as f64
    }
}

/// Unify pairs left to right, threading bindings. `None` on the first
/// mismatch.
fn unify_strictly<'a>(
    pairs: impl Iterator<Item = (&'a TypeTree, &'a TypeTree)>,
    bindings: &Bindings,
    depth: usize,
) -> Option<Run> {
    let mut run = Run {
        total: 0.0,
        count: 0,
        bindings: bindings.clone(),
        parts: Vec::new(),
    };
    for (query, target) in pairs {
        let result = unify_with(query, target, &run.bindings, depth + 1);
        if !result.matches {
            return None;
        }
        run.total += result.score;
        run.count += 1;
        run.bindings = result.bindings;
        run.parts.extend(result.matched_parts);
    }
    (run.count > 0).then_some(run)
}

fn leaf(score: f64, bindings: Bindings, target: &TypeTree) -> MatchResult {
    MatchResult::success(score, bindings, vec![target.text().to_string()])
}

fn exact_if(matched: bool, bindings: &Bindings, target: &TypeTree) -> MatchResult {
    if matched {
        leaf(EXACT_SCORE, bindings.clone(), target)
    } else {
        MatchResult::failure(bindings.clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
