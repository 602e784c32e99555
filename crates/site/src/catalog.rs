//! Resolution of `/products/...` slug paths into catalog entities.
//!
//! A path is resolved one level at a time, each lookup scoped to the entity
//! found at the previous level:
//!
//! ```text
//! navbar slug ─► category slug (in navbar) ─► subcategory slug (in category)
//!                                          └► product slug (in category [, subcategory])
//! ```
//!
//! The first miss ends the chain with [`Resolution::NotFound`]. Storage errors
//! are returned as `Err` and never turned into a not-found.

use std::fmt;
use std::future::Future;

use lovosis_core::{CategoryId, NavbarCategoryId, SubcategoryId};

use crate::db::{CatalogRepository, RepositoryError};
use crate::models::catalog::NO_SUBCATEGORY;
use crate::models::{Category, NavbarCategory, Product, Subcategory};

/// Slug lookups needed to walk a catalog path.
pub trait CatalogLookup {
    /// Navbar category by slug.
    fn navbar(
        &self,
        slug: &str,
    ) -> impl Future<Output = Result<Option<NavbarCategory>, RepositoryError>> + Send;

    /// Category by slug within a navbar category.
    fn category(
        &self,
        navbar: NavbarCategoryId,
        slug: &str,
    ) -> impl Future<Output = Result<Option<Category>, RepositoryError>> + Send;

    /// Subcategory (any depth) by slug within a category.
    fn subcategory(
        &self,
        category: CategoryId,
        slug: &str,
    ) -> impl Future<Output = Result<Option<Subcategory>, RepositoryError>> + Send;

    /// Product by slug within a category, restricted to `subcategory` when given.
    fn product(
        &self,
        category: CategoryId,
        subcategory: Option<SubcategoryId>,
        slug: &str,
    ) -> impl Future<Output = Result<Option<Product>, RepositoryError>> + Send;
}

impl CatalogLookup for CatalogRepository<'_> {
    async fn navbar(&self, slug: &str) -> Result<Option<NavbarCategory>, RepositoryError> {
        self.navbar_by_slug(slug).await
    }

    async fn category(
        &self,
        navbar: NavbarCategoryId,
        slug: &str,
    ) -> Result<Option<Category>, RepositoryError> {
        self.category_by_slug(navbar, slug).await
    }

    async fn subcategory(
        &self,
        category: CategoryId,
        slug: &str,
    ) -> Result<Option<Subcategory>, RepositoryError> {
        self.subcategory_by_slug(category, slug).await
    }

    async fn product(
        &self,
        category: CategoryId,
        subcategory: Option<SubcategoryId>,
        slug: &str,
    ) -> Result<Option<Product>, RepositoryError> {
        self.product_in(category, subcategory, slug).await
    }
}

/// Level of the catalog hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    NavbarCategory,
    Category,
    Subcategory,
    Product,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NavbarCategory => write!(f, "navbar category"),
            Self::Category => write!(f, "category"),
            Self::Subcategory => write!(f, "subcategory"),
            Self::Product => write!(f, "product"),
        }
    }
}

/// Slugs taken from a `/products/...` URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogPath<'a> {
    pub navbar: &'a str,
    pub category: Option<&'a str>,
    pub subcategory: Option<&'a str>,
    pub product: Option<&'a str>,
}

impl<'a> CatalogPath<'a> {
    /// `/products/{navbar}`
    #[must_use]
    pub const fn navbar(navbar: &'a str) -> Self {
        Self {
            navbar,
            category: None,
            subcategory: None,
            product: None,
        }
    }

    /// `/products/{navbar}/{category}`
    #[must_use]
    pub const fn category(navbar: &'a str, category: &'a str) -> Self {
        Self {
            navbar,
            category: Some(category),
            subcategory: None,
            product: None,
        }
    }

    /// `/products/{navbar}/{category}/{subcategory}`
    #[must_use]
    pub const fn subcategory(navbar: &'a str, category: &'a str, subcategory: &'a str) -> Self {
        Self {
            navbar,
            category: Some(category),
            subcategory: Some(subcategory),
            product: None,
        }
    }

    /// `/products/{navbar}/{category}/{subcategory|_}/{product}`
    #[must_use]
    pub fn product(
        navbar: &'a str,
        category: &'a str,
        subcategory: &'a str,
        product: &'a str,
    ) -> Self {
        Self {
            navbar,
            category: Some(category),
            subcategory: (subcategory != NO_SUBCATEGORY).then_some(subcategory),
            product: Some(product),
        }
    }
}

/// Entities found along a fully resolved path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub navbar: NavbarCategory,
    pub category: Option<Category>,
    pub subcategory: Option<Subcategory>,
    pub product: Option<Product>,
}

/// Outcome of resolving a [`CatalogPath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(Box<ResolvedPath>),
    /// The first level whose slug did not match.
    NotFound { level: Level, slug: String },
}

impl Resolution {
    fn missing(level: Level, slug: &str) -> Self {
        Self::NotFound {
            level,
            slug: slug.to_owned(),
        }
    }
}

/// Walk `path` through `lookup`, stopping at the first miss.
///
/// # Errors
///
/// Returns `RepositoryError` if a lookup fails. Missing entities are reported
/// through [`Resolution::NotFound`], not as errors.
pub async fn resolve<L>(lookup: &L, path: &CatalogPath<'_>) -> Result<Resolution, RepositoryError>
where
    L: CatalogLookup + Sync,
{
    let Some(navbar) = lookup.navbar(path.navbar).await? else {
        return Ok(Resolution::missing(Level::NavbarCategory, path.navbar));
    };

    let mut resolved = ResolvedPath {
        navbar,
        category: None,
        subcategory: None,
        product: None,
    };

    let Some(category_slug) = path.category else {
        return Ok(Resolution::Found(Box::new(resolved)));
    };
    let Some(category) = lookup.category(resolved.navbar.id, category_slug).await? else {
        return Ok(Resolution::missing(Level::Category, category_slug));
    };
    let category_id = category.id;
    resolved.category = Some(category);

    if let Some(subcategory_slug) = path.subcategory {
        let Some(subcategory) = lookup.subcategory(category_id, subcategory_slug).await? else {
            return Ok(Resolution::missing(Level::Subcategory, subcategory_slug));
        };
        resolved.subcategory = Some(subcategory);
    }

    if let Some(product_slug) = path.product {
        let subcategory_id = resolved.subcategory.as_ref().map(|s| s.id);
        let Some(product) = lookup
            .product(category_id, subcategory_id, product_slug)
            .await?
        else {
            return Ok(Resolution::missing(Level::Product, product_slug));
        };
        resolved.product = Some(product);
    }

    Ok(Resolution::Found(Box::new(resolved)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use lovosis_core::ProductId;

    use super::*;

    /// In-memory catalog with the same scoping rules as the SQL queries.
    #[derive(Default)]
    struct MemoryCatalog {
        navbar: Vec<NavbarCategory>,
        categories: Vec<Category>,
        subcategories: Vec<Subcategory>,
        products: Vec<Product>,
        fail: bool,
    }

    impl MemoryCatalog {
        fn check(&self) -> Result<(), RepositoryError> {
            if self.fail {
                return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
            }
            Ok(())
        }
    }

    impl CatalogLookup for MemoryCatalog {
        async fn navbar(&self, slug: &str) -> Result<Option<NavbarCategory>, RepositoryError> {
            self.check()?;
            Ok(self.navbar.iter().find(|n| n.slug == slug).cloned())
        }

        async fn category(
            &self,
            navbar: NavbarCategoryId,
            slug: &str,
        ) -> Result<Option<Category>, RepositoryError> {
            self.check()?;
            Ok(self
                .categories
                .iter()
                .find(|c| c.navbar_category_id == navbar && c.slug == slug)
                .cloned())
        }

        async fn subcategory(
            &self,
            category: CategoryId,
            slug: &str,
        ) -> Result<Option<Subcategory>, RepositoryError> {
            self.check()?;
            Ok(self
                .subcategories
                .iter()
                .find(|s| s.category_id == category && s.slug == slug)
                .cloned())
        }

        async fn product(
            &self,
            category: CategoryId,
            subcategory: Option<SubcategoryId>,
            slug: &str,
        ) -> Result<Option<Product>, RepositoryError> {
            self.check()?;
            Ok(self
                .products
                .iter()
                .find(|p| {
                    p.category_id == category
                        && p.slug == slug
                        && subcategory.is_none_or(|id| p.subcategory_id == Some(id))
                })
                .cloned())
        }
    }

    fn navbar(id: i32, slug: &str) -> NavbarCategory {
        NavbarCategory {
            id: NavbarCategoryId::new(id),
            name: slug.to_owned(),
            slug: slug.to_owned(),
            description: None,
            image: None,
            created_at: Utc::now(),
        }
    }

    fn category(id: i32, navbar_id: i32, slug: &str) -> Category {
        Category {
            id: CategoryId::new(id),
            navbar_category_id: NavbarCategoryId::new(navbar_id),
            name: slug.to_owned(),
            slug: slug.to_owned(),
            description: None,
            image: None,
            created_at: Utc::now(),
        }
    }

    fn subcategory(id: i32, category_id: i32, parent: Option<i32>, slug: &str) -> Subcategory {
        Subcategory {
            id: SubcategoryId::new(id),
            category_id: CategoryId::new(category_id),
            parent_id: parent.map(SubcategoryId::new),
            name: slug.to_owned(),
            slug: slug.to_owned(),
            description: None,
            image: None,
            created_at: Utc::now(),
        }
    }

    fn product(id: i32, category_id: i32, sub: Option<i32>, slug: &str) -> Product {
        Product {
            id: ProductId::new(id),
            navbar_category_id: NavbarCategoryId::new(1),
            category_id: CategoryId::new(category_id),
            subcategory_id: sub.map(SubcategoryId::new),
            name: slug.to_owned(),
            slug: slug.to_owned(),
            description: None,
            images: Vec::new(),
            catalog_images: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn fixture() -> MemoryCatalog {
        MemoryCatalog {
            navbar: vec![navbar(1, "lab"), navbar(2, "trainers")],
            categories: vec![category(10, 1, "physics"), category(20, 2, "electrical")],
            subcategories: vec![
                subcategory(100, 10, None, "optics"),
                subcategory(101, 10, Some(100), "lenses"),
                subcategory(200, 20, None, "motors"),
            ],
            products: vec![
                product(1000, 10, Some(101), "convex-lens"),
                product(1001, 10, None, "vernier-caliper"),
                product(2000, 20, Some(200), "dc-motor-kit"),
            ],
            fail: false,
        }
    }

    fn not_found(level: Level, slug: &str) -> Resolution {
        Resolution::NotFound {
            level,
            slug: slug.to_owned(),
        }
    }

    #[tokio::test]
    async fn test_resolves_full_product_path() {
        let catalog = fixture();
        let path = CatalogPath::product("lab", "physics", "lenses", "convex-lens");

        let Resolution::Found(found) = resolve(&catalog, &path).await.unwrap() else {
            panic!("expected product to resolve");
        };
        assert_eq!(found.navbar.slug, "lab");
        assert_eq!(found.category.unwrap().slug, "physics");
        assert_eq!(found.subcategory.unwrap().slug, "lenses");
        assert_eq!(found.product.unwrap().slug, "convex-lens");
    }

    #[tokio::test]
    async fn test_placeholder_means_no_subcategory() {
        let catalog = fixture();
        let path = CatalogPath::product("lab", "physics", "_", "vernier-caliper");
        assert!(path.subcategory.is_none());

        let Resolution::Found(found) = resolve(&catalog, &path).await.unwrap() else {
            panic!("expected product to resolve");
        };
        assert!(found.subcategory.is_none());
        assert_eq!(found.product.unwrap().slug, "vernier-caliper");
    }

    #[tokio::test]
    async fn test_unknown_slug_at_each_level() {
        let catalog = fixture();

        let cases = [
            (CatalogPath::navbar("nope"), not_found(Level::NavbarCategory, "nope")),
            (
                CatalogPath::category("lab", "nope"),
                not_found(Level::Category, "nope"),
            ),
            (
                CatalogPath::subcategory("lab", "physics", "nope"),
                not_found(Level::Subcategory, "nope"),
            ),
            (
                CatalogPath::product("lab", "physics", "optics", "nope"),
                not_found(Level::Product, "nope"),
            ),
        ];

        for (path, expected) in cases {
            assert_eq!(resolve(&catalog, &path).await.unwrap(), expected);
        }
    }

    #[tokio::test]
    async fn test_lookups_are_scoped_to_parent() {
        let catalog = fixture();

        // `electrical` exists, but under `trainers`
        let path = CatalogPath::category("lab", "electrical");
        assert_eq!(
            resolve(&catalog, &path).await.unwrap(),
            not_found(Level::Category, "electrical")
        );

        // `motors` exists, but under `electrical`
        let path = CatalogPath::subcategory("lab", "physics", "motors");
        assert_eq!(
            resolve(&catalog, &path).await.unwrap(),
            not_found(Level::Subcategory, "motors")
        );

        // product exists in the category but not in this subcategory
        let path = CatalogPath::product("lab", "physics", "optics", "convex-lens");
        assert_eq!(
            resolve(&catalog, &path).await.unwrap(),
            not_found(Level::Product, "convex-lens")
        );
    }

    #[tokio::test]
    async fn test_stops_at_first_miss() {
        let catalog = fixture();
        let path = CatalogPath::product("lab", "nope", "also-nope", "convex-lens");
        assert_eq!(
            resolve(&catalog, &path).await.unwrap(),
            not_found(Level::Category, "nope")
        );
    }

    #[tokio::test]
    async fn test_storage_errors_propagate() {
        let catalog = MemoryCatalog {
            fail: true,
            ..fixture()
        };
        let result = resolve(&catalog, &CatalogPath::navbar("lab")).await;
        assert!(matches!(result, Err(RepositoryError::Database(_))));
    }

    #[test]
    fn test_level_display() {
        assert_eq!(Level::NavbarCategory.to_string(), "navbar category");
        assert_eq!(Level::Product.to_string(), "product");
    }
}
