//! Catalog read endpoints.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};
use serde::Deserialize;
use tracing::instrument;

use lovosis_core::{CategoryId, NavTree, NavbarCategoryId, SubcategoryId};

use crate::db::CatalogRepository;
use crate::db::catalog::{ProductFilter, SubcategoryFilter};
use crate::error::{AppError, Result};
use crate::models::{Category, NavbarCategory, Product, ProductSummary, Subcategory};
use crate::state::AppState;

/// Optional filters for `GET /api/products`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductsQuery {
    pub navbar_category_id: Option<NavbarCategoryId>,
    pub category_id: Option<CategoryId>,
    pub subcategory_id: Option<SubcategoryId>,
}

impl From<ProductsQuery> for ProductFilter {
    fn from(query: ProductsQuery) -> Self {
        Self {
            navbar_category_id: query.navbar_category_id,
            category_id: query.category_id,
            subcategory: query
                .subcategory_id
                .map_or(SubcategoryFilter::Any, SubcategoryFilter::Is),
        }
    }
}

/// `GET /api/search` parameters.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// List navbar categories in insertion order.
#[instrument(skip(state))]
pub async fn navbar_categories(State(state): State<AppState>) -> Result<Json<Vec<NavbarCategory>>> {
    let rows = CatalogRepository::new(state.pool())
        .navbar_categories()
        .await?;
    Ok(Json(rows))
}

/// List categories.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    let rows = CatalogRepository::new(state.pool()).categories().await?;
    Ok(Json(rows))
}

/// List subcategories of every depth.
#[instrument(skip(state))]
pub async fn subcategories(State(state): State<AppState>) -> Result<Json<Vec<Subcategory>>> {
    let rows = CatalogRepository::new(state.pool()).subcategories().await?;
    Ok(Json(rows))
}

/// The nested navigation tree used by the mega-menu.
#[instrument(skip(state))]
pub async fn navigation(State(state): State<AppState>) -> Result<Json<NavTree>> {
    let tree = CatalogRepository::new(state.pool()).navigation().await?;
    Ok(Json(tree))
}

/// List products by name, optionally filtered by taxonomy ids.
#[instrument(skip(state))]
pub async fn products(
    State(state): State<AppState>,
    query: std::result::Result<Query<ProductsQuery>, QueryRejection>,
) -> Result<Json<Vec<Product>>> {
    let Query(query) = query?;
    let rows = CatalogRepository::new(state.pool())
        .products(query.into())
        .await?;
    Ok(Json(rows))
}

/// Get a product by slug.
#[instrument(skip(state))]
pub async fn product(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Product>> {
    CatalogRepository::new(state.pool())
        .product_by_slug(&slug)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
}

/// Search product names.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    query: std::result::Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<ProductSummary>>> {
    let Query(query) = query?;
    let rows = CatalogRepository::new(state.pool())
        .search(&query.q)
        .await?;
    Ok(Json(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_products_query_maps_to_filter() {
        let filter: ProductFilter = ProductsQuery {
            navbar_category_id: None,
            category_id: Some(CategoryId::new(3)),
            subcategory_id: Some(SubcategoryId::new(9)),
        }
        .into();

        assert_eq!(filter.category_id, Some(CategoryId::new(3)));
        assert_eq!(
            filter.subcategory,
            SubcategoryFilter::Is(SubcategoryId::new(9))
        );
    }

    #[test]
    fn test_empty_products_query_is_unfiltered() {
        let filter: ProductFilter = ProductsQuery::default().into();
        assert_eq!(filter, ProductFilter::default());
    }
}
