use crate::domain::category::ProductCategory;
use crate::domain::risk::{RiskGrade, RiskLevel};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: ProductCategory,
    pub provider: String,
    /// Annualized return, percent.
    pub return_rate: f64,
    pub risk_level: RiskLevel,
    pub risk_grade: RiskGrade,
    /// Minimum subscription in KRW.
    pub min_investment: u64,
    pub period: String,
    pub description: String,
    pub features: Vec<String>,
    pub historical_data: Vec<HistoryPoint>,
    /// Percent.
    pub volatility: f64,
    pub source: String,
    pub updated_at: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub month: String,
    pub value: f64,
}
