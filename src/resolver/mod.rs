//! Page resolver - orders documents and binds each one to a route

use std::collections::HashMap;

use crate::content::Document;
use crate::error::DuplicateRouteError;

/// A document bound to its route and its neighbors in reading order
#[derive(Debug, Clone)]
pub struct ResolvedPage {
    pub document: Document,
    /// URL path without the site root, e.g. `control-structures/`
    pub route: String,
    pub prev: Option<PageRef>,
    pub next: Option<PageRef>,
}

/// Lightweight reference to a neighboring page
#[derive(Debug, Clone, serde::Serialize)]
pub struct PageRef {
    pub title: String,
    pub route: String,
}

/// Resolve documents into an ordered sequence of pages
///
/// Sorts ascending by `order`, ties broken by title so the result is
/// deterministic across runs. Fails if two documents resolve to the same
/// route, naming both offending sources.
pub fn resolve(mut documents: Vec<Document>) -> Result<Vec<ResolvedPage>, DuplicateRouteError> {
    documents.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.title.cmp(&b.title)));

    let mut seen: HashMap<String, std::path::PathBuf> = HashMap::new();
    let mut routes = Vec::with_capacity(documents.len());

    for doc in &documents {
        let route = format!("{}/", doc.slug);
        if let Some(first) = seen.get(&route) {
            return Err(DuplicateRouteError {
                route,
                first: first.clone(),
                second: doc.full_source.clone(),
            });
        }
        if documents
            .iter()
            .filter(|d| d.order == doc.order)
            .count()
            > 1
        {
            tracing::warn!(
                "Duplicate order {} for {:?}; ordering falls back to title",
                doc.order,
                doc.full_source
            );
        }
        seen.insert(route.clone(), doc.full_source.clone());
        routes.push(route);
    }

    let refs: Vec<PageRef> = documents
        .iter()
        .zip(&routes)
        .map(|(doc, route)| PageRef {
            title: doc.title.clone(),
            route: route.clone(),
        })
        .collect();

    let pages = documents
        .into_iter()
        .enumerate()
        .map(|(i, document)| ResolvedPage {
            route: routes[i].clone(),
            prev: (i > 0).then(|| refs[i - 1].clone()),
            next: (i + 1 < refs.len()).then(|| refs[i + 1].clone()),
            document,
        })
        .collect();

    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn doc(title: &str, order: i64, source: &str) -> Document {
        let mut d = Document::new(
            title.to_string(),
            NaiveDate::from_ymd_opt(2014, 5, 1).unwrap(),
            order,
            source.to_string(),
        );
        d.full_source = std::path::PathBuf::from(source);
        d
    }

    #[test]
    fn test_order_determines_sequence() {
        let docs = vec![
            doc("General Advice", 4, "_guides/general_advice.md"),
            doc("Control Structures", 1, "_guides/control_structures.md"),
            doc("Dynamic Typing", 2, "_guides/dynamic_typing.md"),
        ];

        let pages = resolve(docs).unwrap();
        let titles: Vec<_> = pages.iter().map(|p| p.document.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Control Structures", "Dynamic Typing", "General Advice"]
        );
    }

    #[test]
    fn test_equal_order_tie_breaks_by_title() {
        let docs = vec![
            doc("Zebra", 1, "_guides/zebra.md"),
            doc("Apple", 1, "_guides/apple.md"),
        ];

        let pages = resolve(docs).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].document.title, "Apple");
        assert_eq!(pages[1].document.title, "Zebra");
    }

    #[test]
    fn test_routes_derive_from_slugs() {
        let pages = resolve(vec![doc("Control Structures", 1, "_guides/Control_Structures.md")])
            .unwrap();
        assert_eq!(pages[0].route, "control-structures/");
    }

    #[test]
    fn test_duplicate_route_is_rejected() {
        let docs = vec![
            doc("First", 1, "_guides/same-name.md"),
            doc("Second", 2, "_guides/Same_Name.md"),
        ];

        let err = resolve(docs).unwrap_err();
        assert_eq!(err.route, "same-name/");
        assert!(err.first.to_string_lossy().contains("same-name.md"));
        assert!(err.second.to_string_lossy().contains("Same_Name.md"));
    }

    #[test]
    fn test_neighbors_follow_reading_order() {
        let docs = vec![
            doc("Three", 3, "_guides/three.md"),
            doc("One", 1, "_guides/one.md"),
            doc("Two", 2, "_guides/two.md"),
        ];

        let pages = resolve(docs).unwrap();
        assert!(pages[0].prev.is_none());
        assert_eq!(pages[0].next.as_ref().unwrap().title, "Two");
        assert_eq!(pages[1].prev.as_ref().unwrap().title, "One");
        assert_eq!(pages[1].next.as_ref().unwrap().title, "Three");
        assert!(pages[2].next.is_none());
    }

    #[test]
    fn test_sort_is_stable_across_runs() {
        let make = || {
            vec![
                doc("B", 1, "_guides/b.md"),
                doc("A", 1, "_guides/a.md"),
                doc("C", 0, "_guides/c.md"),
            ]
        };
        let first: Vec<_> = resolve(make())
            .unwrap()
            .iter()
            .map(|p| p.route.clone())
            .collect();
        let second: Vec<_> = resolve(make())
            .unwrap()
            .iter()
            .map(|p| p.route.clone())
            .collect();
        assert_eq!(first, second);
    }
}
