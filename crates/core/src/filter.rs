use crate::domain::article::Article;
use crate::domain::category::{ArticleCategory, CategoryFilter, ProductCategory};
use crate::domain::product::Product;
use anyhow::bail;
use std::cmp::Ordering;
use std::str::FromStr;

/// Items the catalog filter can narrow.
pub trait Searchable {
    type Category: PartialEq;

    fn category(&self) -> &Self::Category;

    /// `needle` is already lowercased and non-empty.
    fn matches_text(&self, needle: &str) -> bool;
}

impl Searchable for Product {
    type Category = ProductCategory;

    fn category(&self) -> &ProductCategory {
        &self.category
    }

    fn matches_text(&self, needle: &str) -> bool {
        contains_folded(&self.name, needle) || contains_folded(&self.provider, needle)
    }
}

impl Searchable for Article {
    type Category = ArticleCategory;

    fn category(&self) -> &ArticleCategory {
        &self.category
    }

    fn matches_text(&self, needle: &str) -> bool {
        contains_folded(&self.title, needle)
            || contains_folded(&self.summary, needle)
            || self.tags.iter().any(|t| contains_folded(t, needle))
    }
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogQuery<C> {
    pub text: String,
    pub category: CategoryFilter<C>,
}

impl<C> Default for CatalogQuery<C> {
    fn default() -> Self {
        Self {
            text: String::new(),
            category: CategoryFilter::All,
        }
    }
}

impl<C> CatalogQuery<C> {
    pub fn new(text: impl Into<String>, category: CategoryFilter<C>) -> Self {
        Self {
            text: text.into(),
            category,
        }
    }
}

/// Ordered subsequence of `items` matching both the category selector and the text query.
pub fn filter<'a, T: Searchable>(items: &'a [T], query: &CatalogQuery<T::Category>) -> Vec<&'a T> {
    let needle = query.text.to_lowercase();
    items
        .iter()
        .filter(|item| query.category.accepts(item.category()))
        .filter(|item| needle.is_empty() || item.matches_text(&needle))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Catalog order.
    #[default]
    Latest,
    ReturnDesc,
    ReturnAsc,
    RiskAsc,
    RiskDesc,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Latest => "latest",
            SortKey::ReturnDesc => "return-desc",
            SortKey::ReturnAsc => "return-asc",
            SortKey::RiskAsc => "risk-asc",
            SortKey::RiskDesc => "risk-desc",
        }
    }

    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortKey::Latest => Ordering::Equal,
            SortKey::ReturnDesc => b.return_rate.total_cmp(&a.return_rate),
            SortKey::ReturnAsc => a.return_rate.total_cmp(&b.return_rate),
            SortKey::RiskAsc => a.risk_level.cmp(&b.risk_level),
            SortKey::RiskDesc => b.risk_level.cmp(&a.risk_level),
        }
    }
}

impl FromStr for SortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        Ok(match s.trim() {
            "" | "latest" => SortKey::Latest,
            "return-desc" | "return-high" => SortKey::ReturnDesc,
            "return-asc" | "return-low" => SortKey::ReturnAsc,
            "risk-asc" | "risk-low" => SortKey::RiskAsc,
            "risk-desc" | "risk-high" => SortKey::RiskDesc,
            other => bail!("unknown sort key: {other:?}"),
        })
    }
}

/// Stable in-place reorder; equal keys keep their relative order.
pub fn sort_products(products: &mut [&Product], key: SortKey) {
    if key == SortKey::Latest {
        return;
    }
    products.sort_by(|a, b| key.compare(a, b));
}

pub fn filter_products<'a>(
    products: &'a [Product],
    query: &CatalogQuery<ProductCategory>,
    sort: SortKey,
) -> Vec<&'a Product> {
    let mut out = filter(products, query);
    sort_products(&mut out, sort);
    out
}

pub fn filter_articles<'a>(
    articles: &'a [Article],
    query: &CatalogQuery<ArticleCategory>,
) -> Vec<&'a Article> {
    filter(articles, query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogProvider, EmbeddedCatalog};

    fn catalog() -> crate::catalog::Catalog {
        EmbeddedCatalog.load().unwrap()
    }

    fn ids(items: &[&Product]) -> Vec<String> {
        items.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn etf_query_returns_only_kodex() {
        let catalog = catalog();
        let q = CatalogQuery::new("ETF", CategoryFilter::All);
        let out = filter_products(catalog.products(), &q, SortKey::Latest);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "KODEX 200 ETF");
    }

    #[test]
    fn query_is_case_insensitive_and_matches_provider() {
        let catalog = catalog();
        let q = CatalogQuery::new("kodex", CategoryFilter::All);
        assert_eq!(filter(catalog.products(), &q).len(), 1);

        let q = CatalogQuery::new("삼성자산운용", CategoryFilter::All);
        let out = filter(catalog.products(), &q);
        assert_eq!(ids(&out), vec!["prod-3", "prod-4"]);
    }

    #[test]
    fn category_filter_only_yields_that_category() {
        let catalog = catalog();
        for c in ProductCategory::ALL {
            let q = CatalogQuery::new("", CategoryFilter::Only(c));
            for p in filter(catalog.products(), &q) {
                assert_eq!(p.category, c);
            }
        }
        let q = CatalogQuery::new("", CategoryFilter::Only(ProductCategory::Deposit));
        assert_eq!(ids(&filter(catalog.products(), &q)), vec!["prod-1", "prod-7"]);
    }

    #[test]
    fn text_query_never_adds_items() {
        let catalog = catalog();
        let all = filter(catalog.products(), &CatalogQuery::default());
        for q in ["", "펀드", "은행", "zzz", "e"] {
            let out = filter(catalog.products(), &CatalogQuery::new(q, CategoryFilter::All));
            assert!(out.iter().all(|p| all.iter().any(|a| a.id == p.id)));
            assert!(out.len() <= all.len());
        }
    }

    #[test]
    fn no_match_is_an_empty_result() {
        let catalog = catalog();
        let q = CatalogQuery::new("비트코인", CategoryFilter::All);
        assert!(filter_products(catalog.products(), &q, SortKey::ReturnDesc).is_empty());
    }

    #[test]
    fn whitespace_in_the_query_is_matched_literally() {
        let catalog = catalog();
        let q = CatalogQuery::new("ETF ", CategoryFilter::All);
        assert!(filter(catalog.products(), &q).is_empty());
        let q = CatalogQuery::new("   ", CategoryFilter::All);
        assert!(filter(catalog.products(), &q).is_empty());
        let q = CatalogQuery::new(" ETF", CategoryFilter::All);
        assert_eq!(ids(&filter(catalog.products(), &q)), vec!["prod-4"]);
    }

    #[test]
    fn return_sorts_are_reverses_for_distinct_rates() {
        let catalog = catalog();
        let q = CatalogQuery::default();
        let desc = ids(&filter_products(catalog.products(), &q, SortKey::ReturnDesc));
        let mut asc = ids(&filter_products(catalog.products(), &q, SortKey::ReturnAsc));
        asc.reverse();
        assert_eq!(desc, asc);
        assert_eq!(desc.first().map(String::as_str), Some("prod-8"));
    }

    #[test]
    fn risk_sort_is_stable_for_equal_levels() {
        let catalog = catalog();
        let q = CatalogQuery::default();
        let asc = ids(&filter_products(catalog.products(), &q, SortKey::RiskAsc));
        // prod-1, prod-2, prod-5 share level 1 and keep catalog order.
        assert_eq!(&asc[..3], &["prod-1", "prod-2", "prod-5"]);
        let desc = ids(&filter_products(catalog.products(), &q, SortKey::RiskDesc));
        assert_eq!(desc[0], "prod-8");
        // prod-4 and prod-6 share level 4.
        assert_eq!(&desc[1..3], &["prod-4", "prod-6"]);
        assert_eq!(&desc[5..], &["prod-1", "prod-2", "prod-5"]);
    }

    #[test]
    fn equal_returns_keep_relative_order_both_ways() {
        let catalog = catalog();
        let mut a = catalog.products()[0].clone();
        a.id = "tie-a".into();
        let mut b = a.clone();
        b.id = "tie-b".into();
        let mut c = a.clone();
        c.id = "tie-c".into();
        c.return_rate = 9.0;
        let items = vec![a, b, c];

        let q = CatalogQuery::default();
        assert_eq!(
            ids(&filter_products(&items, &q, SortKey::ReturnDesc)),
            vec!["tie-c", "tie-a", "tie-b"]
        );
        assert_eq!(
            ids(&filter_products(&items, &q, SortKey::ReturnAsc)),
            vec!["tie-a", "tie-b", "tie-c"]
        );
    }

    #[test]
    fn latest_keeps_catalog_order() {
        let catalog = catalog();
        let out = filter_products(catalog.products(), &CatalogQuery::default(), SortKey::Latest);
        let expected: Vec<String> = catalog.products().iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids(&out), expected);
    }

    #[test]
    fn articles_match_title_summary_and_tags() {
        let catalog = catalog();
        let by_tag = filter_articles(
            catalog.articles(),
            &CatalogQuery::new("안전자산", CategoryFilter::All),
        );
        let ids: Vec<&str> = by_tag.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["article-1", "article-4"]);

        let strategy = filter_articles(
            catalog.articles(),
            &CatalogQuery::new("", CategoryFilter::Only(ArticleCategory::Strategy)),
        );
        assert_eq!(strategy.len(), 1);
        assert_eq!(strategy[0].id, "article-3");
    }

    #[test]
    fn sort_key_accepts_aliases() {
        assert_eq!("return-high".parse::<SortKey>().unwrap(), SortKey::ReturnDesc);
        assert_eq!("return-low".parse::<SortKey>().unwrap(), SortKey::ReturnAsc);
        assert_eq!("risk-low".parse::<SortKey>().unwrap(), SortKey::RiskAsc);
        assert_eq!("risk-high".parse::<SortKey>().unwrap(), SortKey::RiskDesc);
        assert_eq!("latest".parse::<SortKey>().unwrap(), SortKey::Latest);
        assert!("popular".parse::<SortKey>().is_err());
    }
}
