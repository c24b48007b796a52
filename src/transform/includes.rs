//! Client-requested relation expansion.
//!
//! The raw `include` query parameter is a comma separated list of relation
//! paths, e.g. `author,ratings` or `author.ratings`. Each dotted segment is
//! resolved against the transformer that owns it, one level at a time, so a
//! child only ever sees the paths addressed to its own subtree.

use std::fmt;

/// Parsed, normalized set of include paths for a single request.
///
/// Paths keep the order in which they first appeared. Names a transformer
/// does not support are never an error; they simply do not expand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncludeSet {
    paths: Vec<String>,
}

impl IncludeSet {
    /// Parse a raw include string.
    ///
    /// Splits on commas, trims whitespace around every dotted segment, drops
    /// empty segments and entries, and collapses duplicates onto their first
    /// occurrence.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        raw.split(',').collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Normalized paths, in first-seen order.
    #[must_use]
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Top-level relation names, in first-seen order. `author.ratings`
    /// implies `author`.
    #[must_use]
    pub fn requested(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for path in &self.paths {
            let name = head(path);
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Whether `relation` is requested at this level.
    #[must_use]
    pub fn requests(&self, relation: &str) -> bool {
        self.paths.iter().any(|path| head(path) == relation)
    }

    /// The include set addressed to `relation`'s own subtree.
    #[must_use]
    pub fn scoped(&self, relation: &str) -> Self {
        let paths = self
            .paths
            .iter()
            .filter_map(|path| path.strip_prefix(relation)?.strip_prefix('.'))
            .map(str::to_owned)
            .collect();
        Self { paths }
    }

    /// Requested names that appear in `available`, in request order.
    #[must_use]
    pub fn resolve<'s>(&'s self, available: &[&str]) -> Vec<&'s str> {
        self.requested()
            .into_iter()
            .filter(|name| available.contains(name))
            .collect()
    }

    /// Requested names that do not appear in `available`.
    #[must_use]
    pub fn unsupported<'s>(&'s self, available: &[&str]) -> Vec<&'s str> {
        self.requested()
            .into_iter()
            .filter(|name| !available.contains(name))
            .collect()
    }

    /// Re-join into the raw query form; parsing the result yields `self`.
    #[must_use]
    pub fn to_query(&self) -> String {
        self.paths.join(",")
    }
}

fn head(path: &str) -> &str {
    path.split('.').next().unwrap_or(path)
}

fn normalize(entry: &str) -> String {
    entry
        .split('.')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

impl<S: AsRef<str>> FromIterator<S> for IncludeSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut paths: Vec<String> = Vec::new();
        for entry in iter {
            let path = normalize(entry.as_ref());
            if !path.is_empty() && !paths.contains(&path) {
                paths.push(path);
            }
        }
        Self { paths }
    }
}

impl From<&str> for IncludeSet {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl fmt::Display for IncludeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_string() {
        assert!(IncludeSet::parse("").is_empty());
        assert!(IncludeSet::parse(" , ,, ").is_empty());
    }

    #[test]
    fn test_parse_trims_and_deduplicates() {
        let includes = IncludeSet::parse("author, author,  ratings");
        assert_eq!(includes.paths(), ["author", "ratings"]);
    }

    #[test]
    fn test_parse_keeps_first_seen_order() {
        let includes = IncludeSet::parse("ratings,author,ratings");
        assert_eq!(includes.requested(), vec!["ratings", "author"]);
    }

    #[test]
    fn test_parse_normalizes_dotted_segments() {
        let includes = IncludeSet::parse(" author . ratings ,author..books,.");
        assert_eq!(includes.paths(), ["author.ratings", "author.books"]);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let raw = " books ,author.ratings,, books, author .ratings,bundles";
        let once = IncludeSet::parse(raw);
        let twice = IncludeSet::parse(&once.to_query());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_nested_path_implies_parent() {
        let includes = IncludeSet::parse("author.ratings");
        assert!(includes.requests("author"));
        assert!(!includes.requests("ratings"));
        assert_eq!(includes.requested(), vec!["author"]);
    }

    #[test]
    fn test_scoped_only_sees_own_subtree() {
        let includes = IncludeSet::parse("author.ratings,author,books.author,ratings");
        assert_eq!(includes.scoped("author").paths(), ["ratings"]);
        assert_eq!(includes.scoped("books").paths(), ["author"]);
        assert!(includes.scoped("ratings").is_empty());
    }

    #[test]
    fn test_scoped_does_not_match_name_prefixes() {
        let includes = IncludeSet::parse("authors.books");
        assert!(includes.scoped("author").is_empty());
    }

    #[test]
    fn test_resolve_drops_unsupported_names() {
        let includes = IncludeSet::parse("author, author,  ratings");
        assert_eq!(includes.resolve(&["author"]), vec!["author"]);
        assert_eq!(includes.unsupported(&["author"]), vec!["ratings"]);
    }

    #[test]
    fn test_resolve_follows_request_order() {
        let includes = IncludeSet::parse("ratings,author");
        assert_eq!(includes.resolve(&["author", "ratings"]), vec!["ratings", "author"]);
    }

    #[test]
    fn test_display_matches_query() {
        let includes = IncludeSet::parse("author ,ratings");
        assert_eq!(includes.to_string(), "author,ratings");
    }
}
