use crate::domain::category::ArticleCategory;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub category: ArticleCategory,
    pub tags: Vec<String>,
    pub published_at: NaiveDate,
    pub updated_at: NaiveDate,
    /// Minutes.
    pub read_time: u32,
    pub thumbnail: Option<String>,
    /// Ids of referenced products, in display order.
    pub products: Vec<String>,
    pub content: String,
}

impl Article {
    pub fn references(&self, product_id: &str) -> bool {
        self.products.iter().any(|id| id == product_id)
    }
}
