//! Bounded product selection with aggregate statistics.
//!
//! Stats, highlights and chart series are derived from the current members on every call.

use crate::domain::product::Product;
use crate::domain::risk::RiskLevel;
use serde::Serialize;

/// Maximum number of products compared side by side.
pub const CAPACITY: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
    Full,
}

#[derive(Debug, Clone, Default)]
pub struct ComparisonSet {
    members: Vec<Product>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComparisonStats {
    pub highest_return: f64,
    pub lowest_risk: RiskLevel,
    pub avg_return: f64,
    pub avg_volatility: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberHighlight {
    pub product_id: String,
    pub best_return: bool,
    pub lowest_risk: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonChart {
    pub labels: Vec<String>,
    pub series: Vec<ChartSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub product_id: String,
    pub name: String,
    pub values: Vec<f64>,
}

impl ComparisonSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, product: &Product) -> AddOutcome {
        if self.contains(&product.id) {
            return AddOutcome::AlreadyPresent;
        }
        if self.is_full() {
            return AddOutcome::Full;
        }
        self.members.push(product.clone());
        AddOutcome::Added
    }

    /// Returns whether a member was removed.
    pub fn remove(&mut self, product_id: &str) -> bool {
        let before = self.members.len();
        self.members.retain(|p| p.id != product_id);
        self.members.len() != before
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.members.iter().any(|p| p.id == product_id)
    }

    pub fn members(&self) -> &[Product] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= CAPACITY
    }

    pub fn stats(&self) -> Option<ComparisonStats> {
        let first = self.members.first()?;
        let n = self.members.len() as f64;

        let mut highest_return = first.return_rate;
        let mut lowest_risk = first.risk_level;
        let mut return_sum = 0.0;
        let mut volatility_sum = 0.0;
        for p in &self.members {
            highest_return = highest_return.max(p.return_rate);
            lowest_risk = lowest_risk.min(p.risk_level);
            return_sum += p.return_rate;
            volatility_sum += p.volatility;
        }

        Some(ComparisonStats {
            highest_return,
            lowest_risk,
            avg_return: return_sum / n,
            avg_volatility: volatility_sum / n,
        })
    }

    /// Per-member badges in member order. Ties mark every tied member.
    pub fn highlights(&self) -> Vec<MemberHighlight> {
        let Some(stats) = self.stats() else {
            return Vec::new();
        };
        self.members
            .iter()
            .map(|p| MemberHighlight {
                product_id: p.id.clone(),
                best_return: p.return_rate == stats.highest_return,
                lowest_risk: p.risk_level == stats.lowest_risk,
            })
            .collect()
    }

    /// Overlays member histories by position, not by month label.
    pub fn chart(&self) -> ComparisonChart {
        let len = self
            .members
            .iter()
            .map(|p| p.historical_data.len())
            .max()
            .unwrap_or(0);

        let labels = (0..len)
            .map(|i| {
                self.members
                    .iter()
                    .find_map(|p| p.historical_data.get(i))
                    .map(|point| point.month.clone())
                    .unwrap_or_default()
            })
            .collect();

        let series = self
            .members
            .iter()
            .map(|p| ChartSeries {
                product_id: p.id.clone(),
                name: p.name.clone(),
                values: (0..len)
                    .map(|i| p.historical_data.get(i).map_or(0.0, |point| point.value))
                    .collect(),
            })
            .collect();

        ComparisonChart { labels, series }
    }

    /// `products` minus current members, in input order.
    pub fn candidates<'a>(&self, products: Vec<&'a Product>) -> Vec<&'a Product> {
        products
            .into_iter()
            .filter(|p| !self.contains(&p.id))
            .collect()
    }
}
