use crate::catalog::Catalog;
use crate::domain::article::Article;
use crate::domain::category::{ArticleCategory, ProductCategory};
use crate::domain::product::{HistoryPoint, Product};
use crate::domain::risk::{RiskGrade, RiskLevel};
use anyhow::{ensure, Context};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// On-disk shape of the catalog fixtures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub products: Vec<FixtureProduct>,
    pub articles: Vec<FixtureArticle>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureProduct {
    pub id: String,
    pub name: String,
    pub category: ProductCategory,
    pub provider: String,
    pub return_rate: f64,
    pub risk_level: u8,
    pub risk_grade: RiskGrade,
    pub min_investment: u64,
    pub period: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    pub historical_data: Vec<HistoryPoint>,
    pub volatility: f64,
    pub source: String,
    pub updated_at: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureArticle {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub category: ArticleCategory,
    #[serde(default)]
    pub tags: Vec<String>,
    pub published_at: NaiveDate,
    pub updated_at: NaiveDate,
    pub read_time: u32,
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub products: Vec<String>,
    pub content: String,
}

impl CatalogDocument {
    pub fn validate_and_into_catalog(self) -> anyhow::Result<Catalog> {
        let mut product_ids = BTreeSet::<String>::new();
        let mut products = Vec::with_capacity(self.products.len());
        for p in self.products {
            let id = p.id.clone();
            let product = p
                .validate_and_into_product(&mut product_ids)
                .with_context(|| format!("invalid product {id:?}"))?;
            products.push(product);
        }

        // Comparison charts align series by index.
        if let Some(first) = products.first() {
            let expected = first.historical_data.len();
            for p in &products {
                ensure!(
                    p.historical_data.len() == expected,
                    "product {:?} has {} history points, expected {expected}",
                    p.id,
                    p.historical_data.len()
                );
            }
        }

        let mut article_ids = BTreeSet::<String>::new();
        let mut articles = Vec::with_capacity(self.articles.len());
        for a in self.articles {
            let id = a.id.clone();
            let article = a
                .validate_and_into_article(&mut article_ids, &product_ids)
                .with_context(|| format!("invalid article {id:?}"))?;
            articles.push(article);
        }

        Ok(Catalog::new(products, articles))
    }
}

impl FixtureProduct {
    fn validate_and_into_product(
        self,
        seen_ids: &mut BTreeSet<String>,
    ) -> anyhow::Result<Product> {
        let id = self.id.trim().to_string();
        ensure!(!id.is_empty(), "id must be non-empty");
        ensure!(seen_ids.insert(id.clone()), "duplicate product id: {id}");

        let name = self.name.trim().to_string();
        ensure!(!name.is_empty(), "name must be non-empty");

        let risk_level = RiskLevel::new(self.risk_level)?;
        ensure!(
            risk_level.grade() == self.risk_grade,
            "risk_grade {:?} does not match risk_level {}",
            self.risk_grade.label(),
            risk_level.get()
        );

        ensure!(
            self.return_rate.is_finite(),
            "return_rate must be finite (got {})",
            self.return_rate
        );
        ensure!(
            self.volatility.is_finite() && self.volatility >= 0.0,
            "volatility must be a non-negative number (got {})",
            self.volatility
        );

        ensure!(
            !self.historical_data.is_empty(),
            "historical_data must be non-empty"
        );
        for point in &self.historical_data {
            ensure!(
                point.value.is_finite(),
                "history value for {:?} must be finite",
                point.month
            );
        }

        let features = self
            .features
            .into_iter()
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect();

        Ok(Product {
            id,
            name,
            category: self.category,
            provider: self.provider.trim().to_string(),
            return_rate: self.return_rate,
            risk_level,
            risk_grade: self.risk_grade,
            min_investment: self.min_investment,
            period: self.period.trim().to_string(),
            description: self.description.trim().to_string(),
            features,
            historical_data: self.historical_data,
            volatility: self.volatility,
            source: self.source.trim().to_string(),
            updated_at: self.updated_at,
        })
    }
}

impl FixtureArticle {
    fn validate_and_into_article(
        self,
        seen_ids: &mut BTreeSet<String>,
        product_ids: &BTreeSet<String>,
    ) -> anyhow::Result<Article> {
        let id = self.id.trim().to_string();
        ensure!(!id.is_empty(), "id must be non-empty");
        ensure!(seen_ids.insert(id.clone()), "duplicate article id: {id}");

        let title = self.title.trim().to_string();
        ensure!(!title.is_empty(), "title must be non-empty");

        ensure!(
            self.updated_at >= self.published_at,
            "updated_at {} precedes published_at {}",
            self.updated_at,
            self.published_at
        );
        ensure!(self.read_time > 0, "read_time must be positive");

        for product_id in &self.products {
            ensure!(
                product_ids.contains(product_id),
                "unknown product reference: {product_id}"
            );
        }

        let tags = self
            .tags
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        let thumbnail = self
            .thumbnail
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(Article {
            id,
            title,
            summary: self.summary.trim().to_string(),
            category: self.category,
            tags,
            published_at: self.published_at,
            updated_at: self.updated_at,
            read_time: self.read_time,
            thumbnail,
            products: self.products,
            content: self.content,
        })
    }
}
