//! Permissive containment checks between slash-separated category paths.
//!
//! The router consumer accepts a requested path when it equals a product's
//! canonical path *or* when one is a segment-wise prefix or suffix of the
//! other. Trade-off: a user who bookmarked a shorter (`computers/laptops`)
//! or longer path than the canonical one still lands on the product, at the
//! cost of accepting some paths that were never canonical. Tighten to strict
//! equality only if product requirements demand it.

/// Split a path into segments, tolerating leading/trailing/double slashes.
fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Whether `requested` is consistent with `canonical` under the permissive
/// containment policy. Empty paths match nothing.
pub fn paths_consistent(requested: &str, canonical: &str) -> bool {
    let a = segments(requested);
    let b = segments(canonical);
    if a.is_empty() || b.is_empty() {
        return false;
    }

    let (short, long) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    long.starts_with(short) || long.ends_with(short)
}

/// Whether `requested` is consistent with at least one of `canonical_paths`
/// (typically a product's `categoryPaths`).
pub fn matches_any<S: AsRef<str>>(requested: &str, canonical_paths: &[S]) -> bool {
    canonical_paths
        .iter()
        .any(|canonical| paths_consistent(requested, canonical.as_ref()))
}
