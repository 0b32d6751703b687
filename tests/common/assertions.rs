//! Domain-specific assertion macros for tysearch harnesses.
//!
//! These add context-rich failure messages that make it clear *which*
//! ranking invariant was violated.

/// Assert that a hit list contains an entry with each of the given names.
///
/// ```rust
/// assert_hits_contain!(hits, &["succeed", "fail"]);
/// ```
#[macro_export]
macro_rules! assert_hits_contain {
    ($hits:expr, $names:expr) => {{
        let hits: &[tysearch_core::SearchHit<'_>] = &$hits;
        let names: &[&str] = $names;
        let found: Vec<&str> = hits.iter().map(|h| h.entry.name.as_str()).collect();
        for name in names {
            if !found.contains(name) {
                panic!(
                    "assert_hits_contain! failed: {:?} missing from results.\n  results: {:?}",
                    name, found
                );
            }
        }
    }};
}

/// Assert that none of the given names appears in a hit list.
#[macro_export]
macro_rules! assert_hits_exclude {
    ($hits:expr, $names:expr) => {{
        let hits: &[tysearch_core::SearchHit<'_>] = &$hits;
        let names: &[&str] = $names;
        for hit in hits {
            if names.contains(&hit.entry.name.as_str()) {
                panic!(
                    "assert_hits_exclude! failed: {:?} should not match (score {:.1}, {}).",
                    hit.entry.name,
                    hit.score(),
                    hit.strategy
                );
            }
        }
    }};
}

/// Assert that scores never increase down the list and stay in `(30, 100]`.
#[macro_export]
macro_rules! assert_ranked {
    ($hits:expr) => {{
        let hits: &[tysearch_core::SearchHit<'_>] = &$hits;
        for hit in hits {
            if !(hit.result.matches && hit.score() > 30.0 && hit.score() <= 100.0) {
                panic!(
                    "assert_ranked! failed: {:?} has score {} (matches = {}).",
                    hit.entry.name,
                    hit.score(),
                    hit.result.matches
                );
            }
        }
        for pair in hits.windows(2) {
            if pair[0].score() < pair[1].score() {
                panic!(
                    "assert_ranked! failed: {:?} ({}) ranked above {:?} ({}).",
                    pair[0].entry.name,
                    pair[0].score(),
                    pair[1].entry.name,
                    pair[1].score()
                );
            }
        }
    }};
}
