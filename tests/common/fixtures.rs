//! Static catalogs used across harnesses.
//!
//! The fixture mirrors a small slice of an effect library: functions
//! returning `Effect`, functions returning `Option`, collection helpers, and
//! a few plain string/number utilities.

use super::builders::EntryBuilder;
use tysearch_core::CatalogEntry;

/// Names of fixture functions whose return type is `Effect<...>`.
pub const EFFECT_RETURNING: &[&str] = &["succeed", "fail", "sync", "map", "flatMap", "promise"];

/// Names of fixture functions whose return type is `Option<...>`.
pub const OPTION_RETURNING: &[&str] = &["some", "none", "fromNullable", "head"];

/// Names of fixture functions returning a collection.
pub const COLLECTION_RETURNING: &[&str] = &["mapArray", "fromIterable", "range"];

/// Representative queries for property tests.
pub const QUERIES: &[&str] = &[
    "A -> Effect<B>",
    "A => Effect<A>",
    "Effect<A, E, R>",
    "Option<A>",
    "Array<A>",
    "string",
    "number",
    "string -> number",
    "*",
    "A",
    "(A, B) => A",
    "Effect<A> | Option<A>",
    "[A, B]",
    "HttpClient",
    "() => Effect<void>",
];

pub fn catalog() -> Vec<CatalogEntry> {
    vec![
        // -- Effect ---------------------------------------------------------
        EntryBuilder::new("Effect", "succeed")
            .type_param("A")
            .param("value", "A")
            .returns("Effect<A, never, never>")
            .build(),
        EntryBuilder::new("Effect", "fail")
            .type_param("E")
            .param("error", "E")
            .returns("Effect<never, E, never>")
            .build(),
        EntryBuilder::new("Effect", "sync")
            .type_param("A")
            .param("thunk", "() => A")
            .returns("Effect<A, never, never>")
            .build(),
        EntryBuilder::new("Effect", "map")
            .param("self", "Effect<A, E, R>")
            .param("f", "(a: A) => B")
            .returns("Effect<B, E, R>")
            .build(),
        EntryBuilder::new("Effect", "flatMap")
            .param("self", "Effect<A, E, R>")
            .param("f", "(a: A) => Effect<B, E1, R1>")
            .returns("Effect<B, E | E1, R | R1>")
            .build(),
        EntryBuilder::new("Effect", "promise")
            .param("evaluate", "() => Promise<A>")
            .returns("Effect<A, never, never>")
            .build(),
        // -- Option ---------------------------------------------------------
        EntryBuilder::new("Option", "some")
            .type_param("A")
            .param("value", "A")
            .returns("Option<A>")
            .build(),
        EntryBuilder::new("Option", "none")
            .returns("Option<never>")
            .build(),
        EntryBuilder::new("Option", "fromNullable")
            .param("value", "A")
            .returns("Option<NonNullable<A>>")
            .build(),
        EntryBuilder::new("Array", "head")
            .param("self", "ReadonlyArray<A>")
            .returns("Option<A>")
            .build(),
        EntryBuilder::new("Option", "getOrElse")
            .param("self", "Option<A>")
            .param("onNone", "() => B")
            .returns("A | B")
            .build(),
        // -- Collections ----------------------------------------------------
        EntryBuilder::new("Array", "mapArray")
            .param("self", "ReadonlyArray<A>")
            .param("f", "(a: A, i: number) => B")
            .returns("Array<B>")
            .build(),
        EntryBuilder::new("Chunk", "fromIterable")
            .param("self", "Iterable<A>")
            .returns("Chunk<A>")
            .build(),
        EntryBuilder::new("Array", "range")
            .param("start", "number")
            .param("end", "number")
            .returns("Array<number>")
            .build(),
        // -- Plain utilities ------------------------------------------------
        EntryBuilder::new("String", "length")
            .param("self", "string")
            .returns("number")
            .build(),
        EntryBuilder::new("String", "toUpperCase")
            .param("self", "string")
            .returns("string")
            .build(),
        EntryBuilder::new("String", "padStart")
            .param("self", "string")
            .param("maxLength", "number")
            .optional_param("fillString", "string")
            .returns("string")
            .build(),
        EntryBuilder::new("Predicate", "isString")
            .param("input", "unknown")
            .returns("boolean")
            .build(),
        // -- Not indexed ----------------------------------------------------
        EntryBuilder::new("Effect", "gen")
            .returns("Effect<A, E, R>")
            .unparsed()
            .build(),
    ]
}

/// A catalog of `n` entries cycling through the fixture, with unique ids.
pub fn large_catalog(n: usize) -> Vec<CatalogEntry> {
    let base = catalog();
    (0..n)
        .map(|i| {
            let mut entry = base[i % base.len()].clone();
            entry.id = format!("{}#{i}", entry.id);
            entry
        })
        .collect()
}
