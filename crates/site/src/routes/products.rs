//! Catalog page route handlers.
//!
//! ```text
//! GET /products                                         - All navbar categories
//! GET /products/{navbar}                                - Navbar category
//! GET /products/{navbar}/{category}                     - Category
//! GET /products/{navbar}/{category}/{subcategory}       - Subcategory
//! GET /products/{navbar}/{category}/{subcategory}/{product} - Product detail
//! ```
//!
//! Every slug is resolved through [`catalog::resolve`]; a miss at any level
//! renders the 404 page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Path, State},
    http::Uri,
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::instrument;

use lovosis_core::{Rating, ReviewItemType};

use super::layout::Layout;
use super::not_found_page;
use crate::catalog::{self, CatalogPath, Resolution, ResolvedPath};
use crate::db::catalog::{ProductFilter, SubcategoryFilter};
use crate::db::{CatalogRepository, ReviewRepository};
use crate::error::Result;
use crate::filters;
use crate::middleware::CspNonce;
use crate::models::catalog::{catalog_href, product_href};
use crate::models::{Category, NavbarCategory, Product, ProductSummary, Review, Subcategory};
use crate::state::AppState;

// =============================================================================
// View types
// =============================================================================

/// A linked card for a category or subcategory.
#[derive(Debug, Clone)]
pub struct Tile {
    pub name: String,
    pub href: String,
    pub image: Option<String>,
    pub description: Option<String>,
}

impl Tile {
    fn category(navbar: &NavbarCategory, category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            href: catalog_href(&[&navbar.slug, &category.slug]),
            image: category.image.clone(),
            description: category.description.clone(),
        }
    }

    fn subcategory(navbar: &NavbarCategory, category: &Category, sub: &Subcategory) -> Self {
        Self {
            name: sub.name.clone(),
            href: catalog_href(&[&navbar.slug, &category.slug, &sub.slug]),
            image: sub.image.clone(),
            description: sub.description.clone(),
        }
    }
}

/// A navbar category and its categories on the catalog index.
#[derive(Debug, Clone)]
pub struct NavbarListing {
    pub navbar: NavbarCategory,
    pub href: String,
    pub categories: Vec<Tile>,
}

// =============================================================================
// Templates
// =============================================================================

/// Catalog index template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub layout: Layout,
    pub listings: Vec<NavbarListing>,
}

/// Navbar category page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/navbar_category.html")]
pub struct NavbarCategoryTemplate {
    pub layout: Layout,
    pub navbar: NavbarCategory,
    pub categories: Vec<Tile>,
    pub products: Vec<ProductSummary>,
}

/// Category page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/category.html")]
pub struct CategoryTemplate {
    pub layout: Layout,
    pub category: Category,
    pub subcategories: Vec<Tile>,
    pub products: Vec<ProductSummary>,
}

/// Subcategory page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/subcategory.html")]
pub struct SubcategoryTemplate {
    pub layout: Layout,
    pub subcategory: Subcategory,
    pub children: Vec<Tile>,
    pub products: Vec<ProductSummary>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub layout: Layout,
    pub product: Product,
    pub category: Category,
    pub reviews: Vec<Review>,
    /// Average rating to one decimal, absent without reviews.
    pub average_rating: Option<String>,
    pub related: Vec<ProductSummary>,
    /// `schema.org` Product markup, already escaped for a `<script>` body.
    pub json_ld: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Resolve `path`, logging which level missed.
async fn resolve_path(state: &AppState, path: &CatalogPath<'_>) -> Result<Option<ResolvedPath>> {
    let repo = CatalogRepository::new(state.pool());

    match catalog::resolve(&repo, path).await? {
        Resolution::Found(resolved) => Ok(Some(*resolved)),
        Resolution::NotFound { level, slug } => {
            tracing::info!(%level, slug, "catalog path not found");
            Ok(None)
        }
    }
}

/// Display all navbar categories with their categories.
#[instrument(skip(state, nonce))]
pub async fn index(State(state): State<AppState>, nonce: CspNonce, uri: Uri) -> Result<Response> {
    let repo = CatalogRepository::new(state.pool());
    let (navbar, categories) =
        tokio::try_join!(repo.navbar_categories_by_name(), repo.categories())?;

    let listings = navbar
        .into_iter()
        .map(|navbar| {
            let mut tiles: Vec<Tile> = categories
                .iter()
                .filter(|c| c.navbar_category_id == navbar.id)
                .map(|c| Tile::category(&navbar, c))
                .collect();
            tiles.sort_by(|a, b| a.name.cmp(&b.name));

            NavbarListing {
                href: navbar.href(),
                navbar,
                categories: tiles,
            }
        })
        .collect();

    let layout = Layout::load(&state, uri.path(), &nonce)
        .await?
        .titled("Products", "Browse the full Lovosis equipment catalog.");

    Ok(ProductsIndexTemplate { layout, listings }.into_response())
}

/// Display a navbar category, its categories and all of its products.
#[instrument(skip(state, nonce))]
pub async fn navbar_category(
    State(state): State<AppState>,
    nonce: CspNonce,
    uri: Uri,
    Path(navbar_slug): Path<String>,
) -> Result<Response> {
    let Some(found) = resolve_path(&state, &CatalogPath::navbar(&navbar_slug)).await? else {
        return Ok(not_found_page(&state, &nonce, &uri).await);
    };
    let navbar = found.navbar;

    let repo = CatalogRepository::new(state.pool());
    let filter = ProductFilter {
        navbar_category_id: Some(navbar.id),
        ..ProductFilter::default()
    };
    let (categories, products) =
        tokio::try_join!(repo.categories_in(navbar.id), repo.product_summaries(filter))?;

    let categories = categories
        .iter()
        .map(|c| Tile::category(&navbar, c))
        .collect();

    let layout = Layout::load(&state, uri.path(), &nonce)
        .await?
        .titled(navbar.name.clone(), navbar.description.clone().unwrap_or_default());

    Ok(NavbarCategoryTemplate {
        layout,
        navbar,
        categories,
        products,
    }
    .into_response())
}

/// Display a category, its top-level subcategories and the products that
/// sit directly in it.
#[instrument(skip(state, nonce))]
pub async fn category(
    State(state): State<AppState>,
    nonce: CspNonce,
    uri: Uri,
    Path((navbar_slug, category_slug)): Path<(String, String)>,
) -> Result<Response> {
    let path = CatalogPath::category(&navbar_slug, &category_slug);
    let Some(ResolvedPath {
        navbar,
        category: Some(category),
        ..
    }) = resolve_path(&state, &path).await?
    else {
        return Ok(not_found_page(&state, &nonce, &uri).await);
    };

    let repo = CatalogRepository::new(state.pool());
    let filter = ProductFilter {
        category_id: Some(category.id),
        subcategory: SubcategoryFilter::Unassigned,
        ..ProductFilter::default()
    };
    let (subcategories, products) = tokio::try_join!(
        repo.top_level_subcategories(category.id),
        repo.product_summaries(filter)
    )?;

    let subcategories = subcategories
        .iter()
        .map(|s| Tile::subcategory(&navbar, &category, s))
        .collect();

    let layout = Layout::load(&state, uri.path(), &nonce).await?.titled(
        category.name.clone(),
        category.description.clone().unwrap_or_default(),
    );

    Ok(CategoryTemplate {
        layout,
        category,
        subcategories,
        products,
    }
    .into_response())
}

/// Display a subcategory, its child subcategories and its products.
#[instrument(skip(state, nonce))]
pub async fn subcategory(
    State(state): State<AppState>,
    nonce: CspNonce,
    uri: Uri,
    Path((navbar_slug, category_slug, subcategory_slug)): Path<(String, String, String)>,
) -> Result<Response> {
    let path = CatalogPath::subcategory(&navbar_slug, &category_slug, &subcategory_slug);
    let Some(ResolvedPath {
        navbar,
        category: Some(category),
        subcategory: Some(subcategory),
        ..
    }) = resolve_path(&state, &path).await?
    else {
        return Ok(not_found_page(&state, &nonce, &uri).await);
    };

    let repo = CatalogRepository::new(state.pool());
    let filter = ProductFilter {
        category_id: Some(category.id),
        subcategory: SubcategoryFilter::Is(subcategory.id),
        ..ProductFilter::default()
    };
    let (children, products) = tokio::try_join!(
        repo.child_subcategories(subcategory.id),
        repo.product_summaries(filter)
    )?;

    let children = children
        .iter()
        .map(|s| Tile::subcategory(&navbar, &category, s))
        .collect();

    let layout = Layout::load(&state, uri.path(), &nonce).await?.titled(
        subcategory.name.clone(),
        subcategory.description.clone().unwrap_or_default(),
    );

    Ok(SubcategoryTemplate {
        layout,
        subcategory,
        children,
        products,
    }
    .into_response())
}

/// Display a product with its images, reviews and request forms.
///
/// The subcategory segment is `_` for products sitting directly in their
/// category.
#[instrument(skip(state, nonce))]
pub async fn show(
    State(state): State<AppState>,
    nonce: CspNonce,
    uri: Uri,
    Path((navbar_slug, category_slug, subcategory_slug, product_slug)): Path<(
        String,
        String,
        String,
        String,
    )>,
) -> Result<Response> {
    let path = CatalogPath::product(
        &navbar_slug,
        &category_slug,
        &subcategory_slug,
        &product_slug,
    );
    let Some(ResolvedPath {
        navbar,
        category: Some(category),
        subcategory,
        product: Some(product),
    }) = resolve_path(&state, &path).await?
    else {
        return Ok(not_found_page(&state, &nonce, &uri).await);
    };

    let sibling_filter = ProductFilter {
        category_id: Some(category.id),
        subcategory: subcategory
            .as_ref()
            .map_or(SubcategoryFilter::Unassigned, |s| SubcategoryFilter::Is(s.id)),
        ..ProductFilter::default()
    };
    let catalog = CatalogRepository::new(state.pool());
    let reviews = ReviewRepository::new(state.pool());
    let (reviews, siblings) = tokio::try_join!(
        reviews.for_item(product.id.as_i32(), ReviewItemType::Product),
        catalog.product_summaries(sibling_filter)
    )?;

    let average = Rating::average(reviews.iter().map(|r| r.rating));
    let canonical = format!(
        "{}{}",
        state.config().base_url.trim_end_matches('/'),
        product_href(
            &navbar.slug,
            &category.slug,
            subcategory.as_ref().map(|s| s.slug.as_str()),
            &product.slug,
        )
    );
    let json_ld = product_json_ld(&product, &canonical, average, reviews.len());
    let related = siblings
        .into_iter()
        .filter(|p| p.id != product.id)
        .take(4)
        .collect();

    let layout = Layout::load(&state, uri.path(), &nonce).await?.titled(
        product.name.clone(),
        product.description.clone().unwrap_or_default(),
    );

    Ok(ProductShowTemplate {
        layout,
        product,
        category,
        reviews,
        average_rating: average.map(|avg| format!("{avg:.1}")),
        related,
        json_ld,
    }
    .into_response())
}

/// Build `schema.org` Product JSON-LD for the detail page.
///
/// `</` is escaped so the markup cannot close its `<script>` element.
fn product_json_ld(
    product: &Product,
    url: &str,
    average: Option<f64>,
    review_count: usize,
) -> String {
    let mut value = serde_json::json!({
        "@context": "https://schema.org",
        "@type": "Product",
        "name": product.name,
        "url": url,
        "image": product.images,
        "brand": { "@type": "Brand", "name": "Lovosis" },
    });

    if let Some(description) = &product.description {
        value["description"] = serde_json::Value::from(description.as_str());
    }
    if let Some(average) = average {
        value["aggregateRating"] = serde_json::json!({
            "@type": "AggregateRating",
            "ratingValue": format!("{average:.1}"),
            "reviewCount": review_count,
        });
    }

    value.to_string().replace("</", "<\\/")
}

/// Create the catalog page routes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/{navbar}", get(navbar_category))
        .route("/{navbar}/{category}", get(category))
        .route("/{navbar}/{category}/{subcategory}", get(subcategory))
        .route("/{navbar}/{category}/{subcategory}/{product}", get(show))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use lovosis_core::{CategoryId, NavbarCategoryId, ProductId};

    use super::*;

    fn product(description: Option<&str>) -> Product {
        Product {
            id: ProductId::new(7),
            navbar_category_id: NavbarCategoryId::new(1),
            category_id: CategoryId::new(2),
            subcategory_id: None,
            name: "Vernier Caliper".to_string(),
            slug: "vernier-caliper".to_string(),
            description: description.map(str::to_string),
            images: vec!["https://cdn.example.com/caliper.jpg".to_string()],
            catalog_images: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_json_ld_includes_rating_when_reviewed() {
        let json = product_json_ld(&product(Some("Precise")), "https://x/p", Some(13.0 / 3.0), 3);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["@type"], "Product");
        assert_eq!(value["name"], "Vernier Caliper");
        assert_eq!(value["description"], "Precise");
        assert_eq!(value["aggregateRating"]["ratingValue"], "4.3");
        assert_eq!(value["aggregateRating"]["reviewCount"], 3);
    }

    #[test]
    fn test_json_ld_omits_rating_without_reviews() {
        let json = product_json_ld(&product(None), "https://x/p", None, 0);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert!(value.get("aggregateRating").is_none());
        assert!(value.get("description").is_none());
    }

    #[test]
    fn test_json_ld_cannot_close_script() {
        let json = product_json_ld(&product(Some("</script><b>")), "https://x/p", None, 0);
        assert!(!json.contains("</script>"));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["description"], "</script><b>");
    }
}
