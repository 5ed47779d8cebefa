//! # Query Module
//!
//! Name search over a scheme.
//!
//! - `SearchOrder::Fifo` scans every member in scheme order
//! - `SearchOrder::FromRoots` walks breadth-first from the cached roots
//!   along child edges, each handle once
//! - Absent names never match

use crate::{ComponentId, Graph, Scheme, SearchOrder};
use regex::Regex;
use std::collections::{BTreeSet, VecDeque};

/// How a component name is matched.
#[derive(Debug, Clone)]
pub enum NameMatcher {
    /// The name equals the text.
    Exact(String),

    /// The whole name matches the pattern.
    Pattern(Regex),
}

impl NameMatcher {
    /// Exact name helper.
    #[must_use]
    pub fn exact(name: impl Into<String>) -> Self {
        Self::Exact(name.into())
    }

    /// Compile a pattern that has to match the whole name.
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(&format!("^(?:{})$", pattern)).map(Self::Pattern)
    }

    /// Names containing `text`, optionally ignoring case.
    #[must_use]
    pub fn substring(text: &str, case_sensitive: bool) -> Self {
        let flags = if case_sensitive { "" } else { "(?i)" };
        let pattern = format!("^{}.*{}.*$", flags, regex::escape(text));
        match Regex::new(&pattern) {
            Ok(regex) => Self::Pattern(regex),
            // escaped literals always compile
            Err(_) => Self::Exact(text.to_string()),
        }
    }

    /// True if `name` is present and matches.
    #[must_use]
    pub fn matches(&self, name: Option<&str>) -> bool {
        match (self, name) {
            (_, None) => false,
            (Self::Exact(wanted), Some(name)) => wanted == name,
            (Self::Pattern(regex), Some(name)) => regex.is_match(name),
        }
    }
}

impl Scheme {
    /// Components whose name satisfies `matcher`, in visiting order.
    ///
    /// With `SearchOrder::FromRoots` the result may include associated
    /// components reachable from a root, and omits members that are not.
    #[must_use]
    pub fn find(&self, graph: &Graph, matcher: &NameMatcher, order: SearchOrder) -> Vec<ComponentId> {
        match order {
            SearchOrder::Fifo => self
                .iter()
                .filter(|&id| matcher.matches(graph.name(id)))
                .collect(),
            SearchOrder::FromRoots => {
                let mut result = Vec::new();
                let mut checked = BTreeSet::new();
                let mut to_check: VecDeque<ComponentId> = self.roots().iter().copied().collect();

                while let Some(current) = to_check.pop_front() {
                    if !checked.insert(current) {
                        continue;
                    }
                    if matcher.matches(graph.name(current)) {
                        result.push(current);
                    }
                    to_check.extend(
                        graph
                            .children(current)
                            .iter()
                            .filter(|c| !checked.contains(*c)),
                    );
                }
                result
            }
        }
    }

    /// Components named exactly `name`.
    #[must_use]
    pub fn get_by_string(&self, graph: &Graph, name: &str, order: SearchOrder) -> Vec<ComponentId> {
        self.find(graph, &NameMatcher::exact(name), order)
    }

    /// Components whose whole name matches `pattern`.
    ///
    /// An invalid pattern yields no components.
    #[must_use]
    pub fn get_by_regex(&self, graph: &Graph, pattern: &str, order: SearchOrder) -> Vec<ComponentId> {
        match NameMatcher::pattern(pattern) {
            Ok(matcher) => self.find(graph, &matcher, order),
            Err(e) => {
                tracing::warn!(pattern, error = %e, "invalid search pattern");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Information;

    fn literature() -> (Graph, Scheme, [ComponentId; 5]) {
        let mut graph = Graph::new();
        let lit = graph.add_named("Literature");
        let aut = graph.add_named("Authors");
        let lino = graph.add_named("Light Novels");
        let isin = graph.add_named("Nisio Isin");
        let dnln = graph.add_named("DN (LN)");
        for (parent, child) in [(lit, aut), (lit, lino), (aut, isin), (isin, dnln), (lino, dnln)] {
            graph.add_child(parent, child);
            graph.add_parent(child, parent);
        }
        let scheme = Scheme::from_components(&graph, [lit, aut, lino, isin, dnln]);
        (graph, scheme, [lit, aut, lino, isin, dnln])
    }

    #[test]
    fn exact_search_in_scheme_order() {
        let (mut graph, mut scheme, [_, aut, ..]) = literature();
        let second = graph.add_named("Authors");
        scheme.add(&graph, second);

        let found = scheme.get_by_string(&graph, "Authors", SearchOrder::Fifo);
        assert_eq!(found, vec![aut, second]);
        assert!(scheme.get_by_string(&graph, "authors", SearchOrder::Fifo).is_empty());
    }

    #[test]
    fn absent_names_never_match() {
        let mut graph = Graph::new();
        let nameless = graph.insert_component(Information::absent());
        let scheme = Scheme::from_components(&graph, [nameless]);

        assert!(scheme.get_by_string(&graph, "", SearchOrder::Fifo).is_empty());
        assert!(scheme.get_by_regex(&graph, ".*", SearchOrder::FromRoots).is_empty());
    }

    #[test]
    fn from_roots_visits_reachable_once() {
        let (graph, scheme, [.., dnln]) = literature();

        let found = scheme.get_by_string(&graph, "DN (LN)", SearchOrder::FromRoots);
        assert_eq!(found, vec![dnln]);
    }

    #[test]
    fn from_roots_includes_associated_and_skips_unreachable() {
        let (mut graph, mut scheme, [lit, aut, ..]) = literature();
        scheme.remove(&graph, aut);
        let island = graph.add_named("Island");
        graph.add_child(island, island);
        graph.add_parent(island, island);
        scheme.add(&graph, island);

        assert_eq!(
            scheme.get_by_string(&graph, "Authors", SearchOrder::FromRoots),
            vec![aut]
        );
        assert!(scheme.get_by_string(&graph, "Authors", SearchOrder::Fifo).is_empty());
        assert!(scheme.get_by_string(&graph, "Island", SearchOrder::FromRoots).is_empty());
        assert_eq!(scheme.roots(), &[lit]);
    }

    #[test]
    fn regex_matches_whole_name() {
        let (graph, scheme, [_, _, lino, isin, _]) = literature();

        assert_eq!(
            scheme.get_by_regex(&graph, "N.*n", SearchOrder::Fifo),
            vec![isin]
        );
        assert!(scheme.get_by_regex(&graph, "Light", SearchOrder::Fifo).is_empty());
        assert_eq!(
            scheme.get_by_regex(&graph, "Light.*", SearchOrder::FromRoots),
            vec![lino]
        );
    }

    #[test]
    fn escaped_literal_equals_exact_search() {
        let (graph, scheme, _) = literature();
        let literal = regex::escape("DN (LN)");

        assert_eq!(
            scheme.get_by_regex(&graph, &literal, SearchOrder::Fifo),
            scheme.get_by_string(&graph, "DN (LN)", SearchOrder::Fifo)
        );
    }

    #[test]
    fn invalid_regex_yields_nothing() {
        let (graph, scheme, _) = literature();
        assert!(scheme.get_by_regex(&graph, "(", SearchOrder::Fifo).is_empty());
    }

    #[test]
    fn substring_matcher() {
        let (graph, scheme, [_, _, lino, isin, dnln]) = literature();

        let sensitive = NameMatcher::substring("N", true);
        assert_eq!(
            scheme.find(&graph, &sensitive, SearchOrder::Fifo),
            vec![lino, isin, dnln]
        );

        let insensitive = NameMatcher::substring("(ln)", false);
        assert_eq!(scheme.find(&graph, &insensitive, SearchOrder::Fifo), vec![dnln]);
    }
}
