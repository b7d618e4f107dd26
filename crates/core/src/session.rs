//! Per-view UI state: bookmarks and the comparison set. Nothing here writes back to the
//! catalog.

use crate::catalog::Catalog;
use crate::compare::ComparisonSet;
use crate::domain::article::Article;
use crate::domain::product::Product;

/// Insertion-ordered id set with toggle semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdSet {
    ids: Vec<String>,
}

impl IdSet {
    /// Returns true when the id is bookmarked after the call.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.remove(id) {
            return false;
        }
        self.ids.push(id.to_string());
        true
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|x| x != id);
        self.ids.len() != before
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|x| x == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Bookmarks {
    pub products: IdSet,
    pub articles: IdSet,
}

impl Bookmarks {
    pub fn total(&self) -> usize {
        self.products.len() + self.articles.len()
    }

    /// Bookmarked products still present in the catalog.
    pub fn resolve_products<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Product> {
        self.products
            .iter()
            .filter_map(|id| catalog.product(id))
            .collect()
    }

    pub fn resolve_articles<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Article> {
        self.articles
            .iter()
            .filter_map(|id| catalog.article(id))
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub bookmarks: Bookmarks,
    pub comparison: ComparisonSet,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogProvider, EmbeddedCatalog};
    use crate::compare::AddOutcome;

    #[test]
    fn toggle_flips_membership() {
        let mut set = IdSet::default();
        assert!(set.toggle("prod-1"));
        assert!(set.contains("prod-1"));
        assert!(!set.toggle("prod-1"));
        assert!(set.is_empty());
    }

    #[test]
    fn toggled_ids_keep_insertion_order() {
        let mut set = IdSet::default();
        set.toggle("b");
        set.toggle("a");
        set.toggle("c");
        set.toggle("a");
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["b", "c"]);
        assert!(set.remove("b"));
        assert!(!set.remove("b"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn resolve_skips_unknown_ids() {
        let catalog = EmbeddedCatalog.load().unwrap();
        let mut session = Session::new();
        session.bookmarks.products.toggle("prod-4");
        session.bookmarks.products.toggle("retired");
        session.bookmarks.articles.toggle("article-2");
        assert_eq!(session.bookmarks.total(), 3);

        let products = session.bookmarks.resolve_products(&catalog);
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, "prod-4");
        assert_eq!(session.bookmarks.resolve_articles(&catalog)[0].id, "article-2");
    }

    #[test]
    fn sessions_are_independent() {
        let catalog = EmbeddedCatalog.load().unwrap();
        let mut a = Session::new();
        let b = Session::new();
        let p = catalog.product("prod-1").unwrap();
        assert_eq!(a.comparison.add(p), AddOutcome::Added);
        assert!(b.comparison.is_empty());
    }
}
