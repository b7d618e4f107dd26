use crate::config::Settings;
use crate::domain::article::Article;
use crate::domain::contract::CatalogDocument;
use crate::domain::product::Product;
use anyhow::{Context, Result};
use std::path::PathBuf;

const EMBEDDED_FIXTURES: &str = include_str!("../fixtures/catalog.json");

/// Immutable product and article collections, validated at load time.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    articles: Vec<Article>,
}

impl Catalog {
    pub(crate) fn new(products: Vec<Product>, articles: Vec<Article>) -> Self {
        Self { products, articles }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let doc = serde_json::from_str::<CatalogDocument>(json)
            .context("catalog fixtures do not match the catalog schema")?;
        doc.validate_and_into_catalog()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }
}

pub trait CatalogProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    fn load(&self) -> Result<Catalog>;
}

/// Sample fixtures compiled into the binary.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedCatalog;

impl CatalogProvider for EmbeddedCatalog {
    fn provider_name(&self) -> &'static str {
        "embedded"
    }

    fn load(&self) -> Result<Catalog> {
        Catalog::from_json_str(EMBEDDED_FIXTURES).context("embedded catalog fixtures are invalid")
    }
}

/// A JSON file in the fixture schema.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogProvider for FileCatalog {
    fn provider_name(&self) -> &'static str {
        "file"
    }

    fn load(&self) -> Result<Catalog> {
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read catalog file {}", self.path.display()))?;
        Catalog::from_json_str(&text)
            .with_context(|| format!("invalid catalog file {}", self.path.display()))
    }
}

/// Picks the file override from settings, falling back to the embedded fixtures.
pub fn provider_from_settings(settings: &Settings) -> Box<dyn CatalogProvider> {
    match settings.catalog_path.as_deref() {
        Some(path) => Box::new(FileCatalog::new(path)),
        None => Box::new(EmbeddedCatalog),
    }
}

pub fn load(provider: &dyn CatalogProvider) -> Result<Catalog> {
    let catalog = provider.load()?;
    tracing::info!(
        provider = provider.provider_name(),
        products = catalog.products().len(),
        articles = catalog.articles().len(),
        "catalog loaded"
    );
    Ok(catalog)
}
