use crate::catalog::Catalog;
use crate::domain::article::Article;
use crate::domain::product::Product;

/// Upper bound on each related-content list.
pub const RELATED_LIMIT: usize = 3;

pub trait Identified {
    fn id(&self) -> &str;
}

impl Identified for Product {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Article {
    fn id(&self) -> &str {
        &self.id
    }
}

pub fn find<'a, T: Identified>(items: &'a [T], id: &str) -> Option<&'a T> {
    items.iter().find(|item| item.id() == id)
}

impl Catalog {
    pub fn product(&self, id: &str) -> Option<&Product> {
        find(self.products(), id)
    }

    pub fn article(&self, id: &str) -> Option<&Article> {
        find(self.articles(), id)
    }

    /// Articles that reference the product.
    pub fn articles_for_product(&self, product_id: &str) -> Vec<&Article> {
        self.articles()
            .iter()
            .filter(|a| a.references(product_id))
            .take(RELATED_LIMIT)
            .collect()
    }

    /// Products referenced by the article, in the article's order.
    pub fn products_for_article(&self, article: &Article) -> Vec<&Product> {
        article
            .products
            .iter()
            .filter_map(|id| self.product(id))
            .collect()
    }

    pub fn similar_products(&self, product: &Product) -> Vec<&Product> {
        self.products()
            .iter()
            .filter(|p| p.id != product.id && p.category == product.category)
            .take(RELATED_LIMIT)
            .collect()
    }

    pub fn related_articles(&self, article: &Article) -> Vec<&Article> {
        self.articles()
            .iter()
            .filter(|a| a.id != article.id && a.category == article.category)
            .take(RELATED_LIMIT)
            .collect()
    }
}
