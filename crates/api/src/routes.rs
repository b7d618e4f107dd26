use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use pinfocus_core::catalog::Catalog;
use pinfocus_core::compare::{
    AddOutcome, ComparisonChart, ComparisonSet, ComparisonStats, MemberHighlight, CAPACITY,
};
use pinfocus_core::content::{self, Block};
use pinfocus_core::domain::article::Article;
use pinfocus_core::domain::category::{ArticleCategory, CategoryFilter, ProductCategory};
use pinfocus_core::domain::product::Product;
use pinfocus_core::filter::{self, CatalogQuery, SortKey};
use pinfocus_core::format;

#[derive(Debug, Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/categories", get(get_categories))
        .route("/products", get(list_products))
        .route("/products/:id", get(get_product))
        .route("/articles", get(list_articles))
        .route("/articles/:id", get(get_article))
        .route("/compare", get(get_comparison))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

/// Product plus the display fields the card layer needs.
#[derive(Debug, Serialize)]
struct ProductView {
    #[serde(flatten)]
    product: Product,
    min_investment_label: String,
    return_rate_label: String,
    category_style: &'static str,
    risk_style: &'static str,
    risk_gauge: f64,
}

impl From<&Product> for ProductView {
    fn from(p: &Product) -> Self {
        Self {
            product: p.clone(),
            min_investment_label: format::krw(p.min_investment),
            return_rate_label: format::percent(p.return_rate),
            category_style: p.category.style_token(),
            risk_style: p.risk_grade.style_token(),
            risk_gauge: p.risk_level.gauge_fraction(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ArticleView {
    #[serde(flatten)]
    article: Article,
    published_label: String,
    read_time_label: String,
    category_style: &'static str,
}

impl From<&Article> for ArticleView {
    fn from(a: &Article) -> Self {
        Self {
            article: a.clone(),
            published_label: format::date_ko(a.published_at),
            read_time_label: format::read_time(a.read_time),
            category_style: a.category.style_token(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Categories {
    all_label: &'static str,
    products: Vec<&'static str>,
    articles: Vec<&'static str>,
}

async fn get_categories() -> Json<Categories> {
    Json(Categories {
        all_label: pinfocus_core::domain::category::ALL_LABEL,
        products: ProductCategory::ALL.iter().map(|c| c.label()).collect(),
        articles: ArticleCategory::all().iter().map(|c| c.label()).collect(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ListParams {
    q: Option<String>,
    category: Option<String>,
    sort: Option<String>,
}

fn parse_query<C>(params: &ListParams) -> Result<CatalogQuery<C>, StatusCode>
where
    C: std::str::FromStr<Err = anyhow::Error>,
{
    let category = params
        .category
        .as_deref()
        .map(str::parse::<CategoryFilter<C>>)
        .transpose()
        .map_err(|e| {
            tracing::debug!(error = %e, "rejecting category selector");
            StatusCode::BAD_REQUEST
        })?
        .unwrap_or_default();
    Ok(CatalogQuery::new(
        params.q.clone().unwrap_or_default(),
        category,
    ))
}

fn parse_sort(params: &ListParams) -> Result<SortKey, StatusCode> {
    params
        .sort
        .as_deref()
        .map(str::parse::<SortKey>)
        .transpose()
        .map_err(|e| {
            tracing::debug!(error = %e, "rejecting sort key");
            StatusCode::BAD_REQUEST
        })
        .map(Option::unwrap_or_default)
}

async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<ProductView>>, StatusCode> {
    let query = parse_query::<ProductCategory>(&params)?;
    let sort = parse_sort(&params)?;
    let products = filter::filter_products(state.catalog.products(), &query, sort);
    Ok(Json(products.into_iter().map(ProductView::from).collect()))
}

async fn list_articles(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<ArticleView>>, StatusCode> {
    let query = parse_query::<ArticleCategory>(&params)?;
    let articles = filter::filter_articles(state.catalog.articles(), &query);
    Ok(Json(articles.into_iter().map(ArticleView::from).collect()))
}

#[derive(Debug, Serialize)]
struct ProductDetail {
    product: ProductView,
    related_articles: Vec<ArticleView>,
    similar_products: Vec<ProductView>,
}

async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductDetail>, StatusCode> {
    let catalog = &state.catalog;
    let product = catalog.product(&id).ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(ProductDetail {
        product: product.into(),
        related_articles: catalog
            .articles_for_product(&product.id)
            .into_iter()
            .map(ArticleView::from)
            .collect(),
        similar_products: catalog
            .similar_products(product)
            .into_iter()
            .map(ProductView::from)
            .collect(),
    }))
}

#[derive(Debug, Serialize)]
struct ArticleDetail {
    article: ArticleView,
    products: Vec<ProductView>,
    related_articles: Vec<ArticleView>,
    blocks: Vec<Block>,
    content_html: String,
}

async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ArticleDetail>, StatusCode> {
    let catalog = &state.catalog;
    let article = catalog.article(&id).ok_or(StatusCode::NOT_FOUND)?;
    let blocks = content::parse(&article.content);
    let content_html = content::render_html(&blocks);

    Ok(Json(ArticleDetail {
        article: article.into(),
        products: catalog
            .products_for_article(article)
            .into_iter()
            .map(ProductView::from)
            .collect(),
        related_articles: catalog
            .related_articles(article)
            .into_iter()
            .map(ArticleView::from)
            .collect(),
        blocks,
        content_html,
    }))
}

#[derive(Debug, Default, Deserialize)]
struct CompareParams {
    /// Comma-separated product ids, in selection order.
    ids: Option<String>,
    q: Option<String>,
    category: Option<String>,
}

#[derive(Debug, Serialize)]
struct ComparisonView {
    capacity: usize,
    is_full: bool,
    members: Vec<ProductView>,
    stats: Option<ComparisonStats>,
    highlights: Vec<MemberHighlight>,
    chart: ComparisonChart,
    candidates: Vec<ProductView>,
}

async fn get_comparison(
    State(state): State<AppState>,
    Query(params): Query<CompareParams>,
) -> Result<Json<ComparisonView>, StatusCode> {
    let catalog = &state.catalog;

    let mut set = ComparisonSet::new();
    let ids = params.ids.as_deref().unwrap_or_default();
    for id in ids.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let product = catalog.product(id).ok_or(StatusCode::NOT_FOUND)?;
        let outcome = set.add(product);
        if outcome != AddOutcome::Added {
            tracing::debug!(product_id = id, ?outcome, "comparison add ignored");
        }
    }

    let query = parse_query::<ProductCategory>(&ListParams {
        q: params.q,
        category: params.category,
        sort: None,
    })?;
    let candidates = set.candidates(filter::filter(catalog.products(), &query));

    Ok(Json(ComparisonView {
        capacity: CAPACITY,
        is_full: set.is_full(),
        members: set.members().iter().map(ProductView::from).collect(),
        stats: set.stats(),
        highlights: set.highlights(),
        chart: set.chart(),
        candidates: candidates.into_iter().map(ProductView::from).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use pinfocus_core::catalog::{CatalogProvider, EmbeddedCatalog};
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> Router {
        let catalog = EmbeddedCatalog.load().unwrap();
        router(AppState {
            catalog: Arc::new(catalog),
        })
    }

    async fn get(uri: &str) -> (StatusCode, Value) {
        let res = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn healthz_is_ok() {
        let res = app()
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn lists_products_by_query() {
        let (status, body) = get("/products?q=ETF").await;
        assert_eq!(status, StatusCode::OK);
        let items = body.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["name"], "KODEX 200 ETF");
        assert_eq!(items[0]["min_investment_label"], "50,000원");
        assert_eq!(items[0]["risk_style"], "orange");
    }

    #[tokio::test]
    async fn sorts_products_by_return() {
        let (status, body) = get("/products?sort=return-high&category=%ED%8E%80%EB%93%9C").await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["prod-8", "prod-3"]);
    }

    #[tokio::test]
    async fn rejects_unknown_selectors() {
        let (status, _) = get("/products?sort=popular").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = get("/articles?category=crypto").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn product_detail_includes_related_content() {
        let (status, body) = get("/products/prod-3").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["product"]["id"], "prod-3");
        let related: Vec<&str> = body["related_articles"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["id"].as_str().unwrap())
            .collect();
        assert_eq!(related, vec!["article-3", "article-5"]);
        assert_eq!(body["similar_products"][0]["id"], "prod-8");
    }

    #[tokio::test]
    async fn missing_entities_are_not_found() {
        let (status, _) = get("/products/nonexistent").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = get("/articles/nonexistent").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = get("/compare?ids=prod-1,nonexistent").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn article_detail_renders_content() {
        let (status, body) = get("/articles/article-2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["article"]["published_label"], "2024년 11월 28일");
        assert_eq!(body["products"][0]["id"], "prod-4");
        let html = body["content_html"].as_str().unwrap();
        assert!(html.starts_with("<h2>ETF란 무엇인가요?</h2>"));
        assert!(html.contains("<strong>분산투자</strong>"));
        assert!(html.contains("class=\"notice\""));
    }

    #[tokio::test]
    async fn comparison_caps_members_and_reports_stats() {
        let (status, body) =
            get("/compare?ids=prod-1,prod-2,prod-3,prod-1,prod-4,prod-5").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_full"], true);
        let members: Vec<&str> = body["members"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_str().unwrap())
            .collect();
        assert_eq!(members, vec!["prod-1", "prod-2", "prod-3", "prod-4"]);
        assert_eq!(body["stats"]["highest_return"], 12.3);
        assert_eq!(body["stats"]["lowest_risk"], 1);
        assert_eq!(body["chart"]["series"].as_array().unwrap().len(), 4);
        assert_eq!(body["chart"]["labels"][0], "7월");
        assert_eq!(body["candidates"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn empty_comparison_has_no_stats() {
        let (status, body) = get("/compare").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["stats"].is_null());
        assert_eq!(body["candidates"].as_array().unwrap().len(), 8);
    }
}
