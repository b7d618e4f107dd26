use anyhow::{bail, Context};
use pinfocus_core::catalog::Catalog;
use pinfocus_core::compare::{AddOutcome, ComparisonSet};
use pinfocus_core::content;
use pinfocus_core::domain::article::Article;
use pinfocus_core::domain::category::{ArticleCategory, CategoryFilter, ProductCategory};
use pinfocus_core::domain::product::Product;
use pinfocus_core::filter::{self, CatalogQuery, SortKey};
use pinfocus_core::format;
use serde_json::json;
use std::fmt::Write;

pub fn validated(catalog: &Catalog, as_json: bool) -> anyhow::Result<String> {
    if as_json {
        return to_json(&json!({
            "ok": true,
            "products": catalog.products().len(),
            "articles": catalog.articles().len(),
        }));
    }
    Ok(format!(
        "catalog ok: {} products, {} articles",
        catalog.products().len(),
        catalog.articles().len()
    ))
}

pub fn products(
    catalog: &Catalog,
    query: &str,
    category: &str,
    sort: &str,
    as_json: bool,
) -> anyhow::Result<String> {
    let category: CategoryFilter<ProductCategory> = category.parse()?;
    let sort: SortKey = sort.parse()?;
    let items = filter::filter_products(catalog.products(), &CatalogQuery::new(query, category), sort);
    tracing::debug!(query, sort = sort.as_str(), matched = items.len(), "filtered products");

    if as_json {
        return to_json(&items);
    }
    if items.is_empty() {
        return Ok("조건에 맞는 상품이 없습니다".to_string());
    }
    let mut out = String::new();
    for p in items {
        writeln!(out, "{}", product_line(p))?;
    }
    Ok(out.trim_end().to_string())
}

pub fn articles(
    catalog: &Catalog,
    query: &str,
    category: &str,
    as_json: bool,
) -> anyhow::Result<String> {
    let category: CategoryFilter<ArticleCategory> = category.parse()?;
    let items = filter::filter_articles(catalog.articles(), &CatalogQuery::new(query, category));

    if as_json {
        return to_json(&items);
    }
    if items.is_empty() {
        return Ok("조건에 맞는 글이 없습니다".to_string());
    }
    let mut out = String::new();
    for a in items {
        writeln!(out, "{}", article_line(a))?;
    }
    Ok(out.trim_end().to_string())
}

pub fn compare(catalog: &Catalog, ids: &[String], as_json: bool) -> anyhow::Result<String> {
    let mut set = ComparisonSet::new();
    for id in ids {
        let product = catalog
            .product(id)
            .with_context(|| format!("상품을 찾을 수 없습니다: {id}"))?;
        match set.add(product) {
            AddOutcome::Added => {}
            AddOutcome::AlreadyPresent => tracing::warn!(product_id = %id, "already selected; skipped"),
            AddOutcome::Full => tracing::warn!(product_id = %id, "comparison set is full; skipped"),
        }
    }

    let Some(stats) = set.stats() else {
        bail!("no products to compare");
    };
    let highlights = set.highlights();

    if as_json {
        let members: Vec<&str> = set.members().iter().map(|p| p.id.as_str()).collect();
        return to_json(&json!({
            "members": members,
            "stats": stats,
            "highlights": highlights,
            "chart": set.chart(),
        }));
    }

    let mut out = String::new();
    writeln!(
        out,
        "최고 수익률 {} | 최저 위험 {} | 평균 수익률 {} | 평균 변동성 {}",
        format::percent(stats.highest_return),
        stats.lowest_risk,
        format::percent(stats.avg_return),
        format::percent(stats.avg_volatility)
    )?;
    for (p, h) in set.members().iter().zip(&highlights) {
        let mut badges = Vec::new();
        if h.best_return {
            badges.push("최고 수익");
        }
        if h.lowest_risk {
            badges.push("최저 위험");
        }
        let badges = if badges.is_empty() {
            String::new()
        } else {
            format!(" [{}]", badges.join(", "))
        };
        writeln!(out, "{}{badges}", product_line(p))?;
    }
    Ok(out.trim_end().to_string())
}

pub fn show(catalog: &Catalog, id: &str, as_json: bool) -> anyhow::Result<String> {
    if let Some(p) = catalog.product(id) {
        if as_json {
            return to_json(p);
        }
        let mut out = String::new();
        writeln!(out, "{}", product_line(p))?;
        writeln!(out, "{}", p.description)?;
        writeln!(out, "기간: {} | 변동성: {}", p.period, format::percent(p.volatility))?;
        writeln!(out, "특징: {}", p.features.join(", "))?;
        writeln!(out, "출처: {} ({})", p.source, format::date_ko(p.updated_at))?;
        for a in catalog.articles_for_product(&p.id) {
            writeln!(out, "관련 글: {}", article_line(a))?;
        }
        return Ok(out.trim_end().to_string());
    }

    if let Some(a) = catalog.article(id) {
        if as_json {
            return to_json(a);
        }
        let mut out = String::new();
        writeln!(out, "{}", article_line(a))?;
        writeln!(out, "{}", content::render_html(&content::parse(&a.content)))?;
        for p in catalog.products_for_article(a) {
            writeln!(out, "관련 상품: {}", product_line(p))?;
        }
        return Ok(out.trim_end().to_string());
    }

    bail!("찾을 수 없습니다: {id}")
}

fn product_line(p: &Product) -> String {
    format!(
        "{} | {} | {} | {} | 수익률 {} | 위험 {} ({}) | 최소 {}",
        p.id,
        p.name,
        p.category,
        p.provider,
        format::percent(p.return_rate),
        p.risk_level,
        p.risk_grade,
        format::krw(p.min_investment)
    )
}

fn article_line(a: &Article) -> String {
    format!(
        "{} | {} | {} | {} | {}",
        a.id,
        a.title,
        a.category,
        format::date_ko(a.published_at),
        format::read_time(a.read_time)
    )
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    serde_json::to_string_pretty(value).context("failed to serialize output")
}
