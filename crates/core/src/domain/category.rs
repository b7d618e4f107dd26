use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Label of the "all categories" selector.
pub const ALL_LABEL: &str = "전체";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProductCategory {
    #[serde(rename = "예금")]
    Deposit,
    #[serde(rename = "적금")]
    InstallmentSavings,
    #[serde(rename = "펀드")]
    Fund,
    #[serde(rename = "ETF")]
    Etf,
    #[serde(rename = "채권")]
    Bond,
    #[serde(rename = "주식")]
    Equity,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 6] = [
        ProductCategory::Deposit,
        ProductCategory::InstallmentSavings,
        ProductCategory::Fund,
        ProductCategory::Etf,
        ProductCategory::Bond,
        ProductCategory::Equity,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ProductCategory::Deposit => "예금",
            ProductCategory::InstallmentSavings => "적금",
            ProductCategory::Fund => "펀드",
            ProductCategory::Etf => "ETF",
            ProductCategory::Bond => "채권",
            ProductCategory::Equity => "주식",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            ProductCategory::Deposit => "deposit",
            ProductCategory::InstallmentSavings => "installment-savings",
            ProductCategory::Fund => "fund",
            ProductCategory::Etf => "etf",
            ProductCategory::Bond => "bond",
            ProductCategory::Equity => "equity",
        }
    }

    /// Badge colour token used by the card layer.
    pub fn style_token(self) -> &'static str {
        match self {
            ProductCategory::Deposit => "blue",
            ProductCategory::InstallmentSavings => "indigo",
            ProductCategory::Fund => "purple",
            ProductCategory::Etf => "pink",
            ProductCategory::Bond => "cyan",
            ProductCategory::Equity => "rose",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ProductCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let s = s.trim();
        for c in ProductCategory::ALL {
            if s == c.label() || s.eq_ignore_ascii_case(c.slug()) {
                return Ok(c);
            }
        }
        bail!("unknown product category: {s:?}")
    }
}

/// Article categories are a superset of product categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ArticleCategory {
    Product(ProductCategory),
    Strategy,
}

impl ArticleCategory {
    const STRATEGY_LABEL: &'static str = "투자전략";
    const STRATEGY_SLUG: &'static str = "strategy";

    pub fn all() -> Vec<ArticleCategory> {
        let mut out: Vec<_> = ProductCategory::ALL
            .into_iter()
            .map(ArticleCategory::Product)
            .collect();
        out.push(ArticleCategory::Strategy);
        out
    }

    pub fn label(self) -> &'static str {
        match self {
            ArticleCategory::Product(c) => c.label(),
            ArticleCategory::Strategy => Self::STRATEGY_LABEL,
        }
    }

    pub fn style_token(self) -> &'static str {
        match self {
            ArticleCategory::Product(c) => c.style_token(),
            ArticleCategory::Strategy => "amber",
        }
    }
}

impl fmt::Display for ArticleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ArticleCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let s = s.trim();
        if s == Self::STRATEGY_LABEL || s.eq_ignore_ascii_case(Self::STRATEGY_SLUG) {
            return Ok(ArticleCategory::Strategy);
        }
        s.parse::<ProductCategory>()
            .map(ArticleCategory::Product)
            .map_err(|_| anyhow::anyhow!("unknown article category: {s:?}"))
    }
}

impl TryFrom<String> for ArticleCategory {
    type Error = anyhow::Error;

    fn try_from(value: String) -> anyhow::Result<Self> {
        value.parse()
    }
}

impl From<ArticleCategory> for String {
    fn from(value: ArticleCategory) -> Self {
        value.label().to_string()
    }
}

impl From<ProductCategory> for ArticleCategory {
    fn from(value: ProductCategory) -> Self {
        ArticleCategory::Product(value)
    }
}

/// Category selector. `All` is the sentinel meaning "no category filter".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter<C> {
    All,
    Only(C),
}

impl<C> Default for CategoryFilter<C> {
    fn default() -> Self {
        CategoryFilter::All
    }
}

impl<C: PartialEq> CategoryFilter<C> {
    pub fn accepts(&self, category: &C) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => c == category,
        }
    }
}

impl<C> FromStr for CategoryFilter<C>
where
    C: FromStr<Err = anyhow::Error>,
{
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let s = s.trim();
        if s.is_empty() || s == ALL_LABEL || s.eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        Ok(CategoryFilter::Only(s.parse()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_korean_labels_and_slugs() {
        assert_eq!("예금".parse::<ProductCategory>().unwrap(), ProductCategory::Deposit);
        assert_eq!("ETF".parse::<ProductCategory>().unwrap(), ProductCategory::Etf);
        assert_eq!("etf".parse::<ProductCategory>().unwrap(), ProductCategory::Etf);
        assert_eq!(
            "installment-savings".parse::<ProductCategory>().unwrap(),
            ProductCategory::InstallmentSavings
        );
        assert!("투자전략".parse::<ProductCategory>().is_err());
    }

    #[test]
    fn strategy_is_an_article_only_category() {
        assert_eq!(
            "투자전략".parse::<ArticleCategory>().unwrap(),
            ArticleCategory::Strategy
        );
        assert_eq!(
            "채권".parse::<ArticleCategory>().unwrap(),
            ArticleCategory::Product(ProductCategory::Bond)
        );
        assert!("암호화폐".parse::<ArticleCategory>().is_err());
    }

    #[test]
    fn article_category_serializes_as_label() {
        let v = serde_json::to_value(ArticleCategory::Strategy).unwrap();
        assert_eq!(v, serde_json::json!("투자전략"));
        let c: ArticleCategory = serde_json::from_value(serde_json::json!("펀드")).unwrap();
        assert_eq!(c, ArticleCategory::Product(ProductCategory::Fund));
    }

    #[test]
    fn sentinel_selector_parses_to_all() {
        let f: CategoryFilter<ProductCategory> = "전체".parse().unwrap();
        assert_eq!(f, CategoryFilter::All);
        let f: CategoryFilter<ProductCategory> = "ALL".parse().unwrap();
        assert_eq!(f, CategoryFilter::All);
        let f: CategoryFilter<ProductCategory> = "".parse().unwrap();
        assert_eq!(f, CategoryFilter::All);
        let f: CategoryFilter<ProductCategory> = "주식".parse().unwrap();
        assert_eq!(f, CategoryFilter::Only(ProductCategory::Equity));
        assert!("없는분류".parse::<CategoryFilter<ProductCategory>>().is_err());
    }

    #[test]
    fn only_accepts_matching_category() {
        let f = CategoryFilter::Only(ProductCategory::Fund);
        assert!(f.accepts(&ProductCategory::Fund));
        assert!(!f.accepts(&ProductCategory::Bond));
        assert!(CategoryFilter::<ProductCategory>::All.accepts(&ProductCategory::Bond));
    }
}
