//! Catalog repository: taxonomy, products and search.
//!
//! List queries used to build the mega-menu keep insertion order (`ORDER BY
//! id`); listings shown on catalog pages are ordered by name.

use sqlx::PgPool;

use lovosis_core::{
    CategoryEntry, CategoryId, NavTree, NavbarCategoryId, NavbarEntry, SubcategoryEntry,
    SubcategoryId,
};

use super::RepositoryError;
use crate::models::{Category, NavbarCategory, Product, ProductSummary, Subcategory};

/// Maximum number of products returned by [`CatalogRepository::search`].
pub const SEARCH_LIMIT: i64 = 20;

/// Which subcategories a product listing may include.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubcategoryFilter {
    /// No restriction.
    #[default]
    Any,
    /// Only products sitting directly in their category.
    Unassigned,
    /// Only products in this subcategory.
    Is(SubcategoryId),
}

impl SubcategoryFilter {
    /// `(unassigned_only, subcategory_id)` query parameters.
    const fn binds(self) -> (bool, Option<SubcategoryId>) {
        match self {
            Self::Any => (false, None),
            Self::Unassigned => (true, None),
            Self::Is(id) => (false, Some(id)),
        }
    }
}

/// Filter for [`CatalogRepository::products`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub navbar_category_id: Option<NavbarCategoryId>,
    pub category_id: Option<CategoryId>,
    pub subcategory: SubcategoryFilter,
}

/// Repository for catalog reads.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Taxonomy listings
    // =========================================================================

    /// All navbar categories in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn navbar_categories(&self) -> Result<Vec<NavbarCategory>, RepositoryError> {
        let rows = sqlx::query_as::<_, NavbarCategory>(
            r"
            SELECT id, name, slug, description, image, created_at
            FROM site.navbar_category
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// All categories in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, Category>(
            r"
            SELECT id, navbar_category_id, name, slug, description, image, created_at
            FROM site.category
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// All subcategories (every depth) in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn subcategories(&self) -> Result<Vec<Subcategory>, RepositoryError> {
        let rows = sqlx::query_as::<_, Subcategory>(
            r"
            SELECT id, category_id, parent_id, name, slug, description, image, created_at
            FROM site.subcategory
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Fetch the three taxonomy tables and nest them into the menu tree.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any query fails.
    pub async fn navigation(&self) -> Result<NavTree, RepositoryError> {
        let (navbar, categories, subcategories) = tokio::try_join!(
            self.navbar_categories(),
            self.categories(),
            self.subcategories(),
        )?;

        let navbar: Vec<NavbarEntry> = navbar.iter().map(NavbarEntry::from).collect();
        let categories: Vec<CategoryEntry> = categories.iter().map(CategoryEntry::from).collect();
        let subcategories: Vec<SubcategoryEntry> =
            subcategories.iter().map(SubcategoryEntry::from).collect();

        let tree = NavTree::build(&navbar, &categories, &subcategories);
        if tree.is_empty() {
            tracing::warn!("navigation tree is empty; has the catalog been seeded?");
        } else {
            tracing::debug!(navbar = tree.len(), "navigation tree loaded");
        }

        Ok(tree)
    }

    /// Navbar categories ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn navbar_categories_by_name(
        &self,
    ) -> Result<Vec<NavbarCategory>, RepositoryError> {
        let rows = sqlx::query_as::<_, NavbarCategory>(
            r"
            SELECT id, name, slug, description, image, created_at
            FROM site.navbar_category
            ORDER BY name
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Categories of a navbar category, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn categories_in(
        &self,
        navbar_category_id: NavbarCategoryId,
    ) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, Category>(
            r"
            SELECT id, navbar_category_id, name, slug, description, image, created_at
            FROM site.category
            WHERE navbar_category_id = $1
            ORDER BY name
            ",
        )
        .bind(navbar_category_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Subcategories directly under a category (no parent), ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn top_level_subcategories(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Subcategory>, RepositoryError> {
        let rows = sqlx::query_as::<_, Subcategory>(
            r"
            SELECT id, category_id, parent_id, name, slug, description, image, created_at
            FROM site.subcategory
            WHERE category_id = $1 AND parent_id IS NULL
            ORDER BY name
            ",
        )
        .bind(category_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Direct children of a subcategory, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn child_subcategories(
        &self,
        parent_id: SubcategoryId,
    ) -> Result<Vec<Subcategory>, RepositoryError> {
        let rows = sqlx::query_as::<_, Subcategory>(
            r"
            SELECT id, category_id, parent_id, name, slug, description, image, created_at
            FROM site.subcategory
            WHERE parent_id = $1
            ORDER BY name
            ",
        )
        .bind(parent_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Products matching `filter`, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn products(&self, filter: ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let (unassigned_only, subcategory_id) = filter.subcategory.binds();

        let rows = sqlx::query_as::<_, Product>(
            r"
            SELECT id, navbar_category_id, category_id, subcategory_id, name, slug,
                   description, images, catalog_images, created_at, updated_at
            FROM site.product
            WHERE ($1::INTEGER IS NULL OR navbar_category_id = $1)
              AND ($2::INTEGER IS NULL OR category_id = $2)
              AND (NOT $3 OR subcategory_id IS NULL)
              AND ($4::INTEGER IS NULL OR subcategory_id = $4)
            ORDER BY name
            ",
        )
        .bind(filter.navbar_category_id)
        .bind(filter.category_id)
        .bind(unassigned_only)
        .bind(subcategory_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Products matching `filter` with the slugs needed to link to them.
    ///
    /// Used by catalog listing pages, whose product cards link into other
    /// categories and subcategories.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn product_summaries(
        &self,
        filter: ProductFilter,
    ) -> Result<Vec<ProductSummary>, RepositoryError> {
        let (unassigned_only, subcategory_id) = filter.subcategory.binds();

        let rows = sqlx::query_as::<_, ProductSummary>(
            r"
            SELECT p.id, p.name, p.slug, p.images[1] AS image,
                   n.slug AS navbar_slug, c.slug AS category_slug, s.slug AS subcategory_slug
            FROM site.product p
            JOIN site.navbar_category n ON n.id = p.navbar_category_id
            JOIN site.category c ON c.id = p.category_id
            LEFT JOIN site.subcategory s ON s.id = p.subcategory_id
            WHERE ($1::INTEGER IS NULL OR p.navbar_category_id = $1)
              AND ($2::INTEGER IS NULL OR p.category_id = $2)
              AND (NOT $3 OR p.subcategory_id IS NULL)
              AND ($4::INTEGER IS NULL OR p.subcategory_id = $4)
            ORDER BY p.name
            ",
        )
        .bind(filter.navbar_category_id)
        .bind(filter.category_id)
        .bind(unassigned_only)
        .bind(subcategory_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Get a product by its globally unique slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn product_by_slug(&self, slug: &str) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, Product>(
            r"
            SELECT id, navbar_category_id, category_id, subcategory_id, name, slug,
                   description, images, catalog_images, created_at, updated_at
            FROM site.product
            WHERE slug = $1
            ",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Case-insensitive substring search on product names.
    ///
    /// Blank queries return no results without touching the database.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search(&self, query: &str) -> Result<Vec<ProductSummary>, RepositoryError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, ProductSummary>(
            r"
            SELECT p.id, p.name, p.slug, p.images[1] AS image,
                   n.slug AS navbar_slug, c.slug AS category_slug, s.slug AS subcategory_slug
            FROM site.product p
            JOIN site.navbar_category n ON n.id = p.navbar_category_id
            JOIN site.category c ON c.id = p.category_id
            LEFT JOIN site.subcategory s ON s.id = p.subcategory_id
            WHERE p.name ILIKE $1 ESCAPE '\'
            ORDER BY p.name
            LIMIT $2
            ",
        )
        .bind(like_pattern(query))
        .bind(SEARCH_LIMIT)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    // =========================================================================
    // Scoped slug lookups (catalog path resolution)
    // =========================================================================

    /// Navbar category by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn navbar_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<NavbarCategory>, RepositoryError> {
        let row = sqlx::query_as::<_, NavbarCategory>(
            r"
            SELECT id, name, slug, description, image, created_at
            FROM site.navbar_category
            WHERE slug = $1
            ",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Category by slug within a navbar category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn category_by_slug(
        &self,
        navbar_category_id: NavbarCategoryId,
        slug: &str,
    ) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query_as::<_, Category>(
            r"
            SELECT id, navbar_category_id, name, slug, description, image, created_at
            FROM site.category
            WHERE navbar_category_id = $1 AND slug = $2
            ",
        )
        .bind(navbar_category_id)
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Subcategory (any depth) by slug within a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn subcategory_by_slug(
        &self,
        category_id: CategoryId,
        slug: &str,
    ) -> Result<Option<Subcategory>, RepositoryError> {
        let row = sqlx::query_as::<_, Subcategory>(
            r"
            SELECT id, category_id, parent_id, name, slug, description, image, created_at
            FROM site.subcategory
            WHERE category_id = $1 AND slug = $2
            ",
        )
        .bind(category_id)
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Product by slug within a category, optionally pinned to a subcategory.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn product_in(
        &self,
        category_id: CategoryId,
        subcategory_id: Option<SubcategoryId>,
        slug: &str,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, Product>(
            r"
            SELECT id, navbar_category_id, category_id, subcategory_id, name, slug,
                   description, images, catalog_images, created_at, updated_at
            FROM site.product
            WHERE category_id = $1
              AND slug = $2
              AND ($3::INTEGER IS NULL OR subcategory_id = $3)
            ",
        )
        .bind(category_id)
        .bind(slug)
        .bind(subcategory_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }
}

/// Wrap `query` in `%` wildcards, escaping `LIKE` metacharacters.
fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("scope"), "%scope%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern(r"c:\"), "%c:\\\\%");
    }

    #[test]
    fn test_default_filter_is_unrestricted() {
        let filter = ProductFilter::default();
        assert!(filter.navbar_category_id.is_none());
        assert!(filter.category_id.is_none());
        assert_eq!(filter.subcategory, SubcategoryFilter::Any);
    }
}
