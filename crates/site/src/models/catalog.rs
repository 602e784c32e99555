//! Taxonomy and product models.

use chrono::{DateTime, Utc};
use serde::Serialize;

use lovosis_core::{
    CategoryEntry, CategoryId, NavbarCategoryId, NavbarEntry, ProductId, SubcategoryEntry,
    SubcategoryId,
};

/// Segment used in product URLs when the product has no subcategory.
pub const NO_SUBCATEGORY: &str = "_";

/// A top-level menu entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NavbarCategory {
    pub id: NavbarCategoryId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NavbarCategory {
    /// Listing page for this navbar category.
    #[must_use]
    pub fn href(&self) -> String {
        catalog_href(&[&self.slug])
    }
}

/// A category within a navbar category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub navbar_category_id: NavbarCategoryId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A subcategory, possibly nested under another subcategory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    pub id: SubcategoryId,
    pub category_id: CategoryId,
    pub parent_id: Option<SubcategoryId>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub navbar_category_id: NavbarCategoryId,
    pub category_id: CategoryId,
    pub subcategory_id: Option<SubcategoryId>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub images: Vec<String>,
    pub catalog_images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// First product image, used as the card thumbnail.
    #[must_use]
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Product joined with the slugs needed to link to it.
///
/// Returned by search so results can link straight to the detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub image: Option<String>,
    pub navbar_slug: String,
    pub category_slug: String,
    pub subcategory_slug: Option<String>,
}

impl ProductSummary {
    /// Detail page URL.
    #[must_use]
    pub fn href(&self) -> String {
        product_href(
            &self.navbar_slug,
            &self.category_slug,
            self.subcategory_slug.as_deref(),
            &self.slug,
        )
    }
}

/// Build `/products/{segment}/...`, percent-encoding each segment.
#[must_use]
pub fn catalog_href(segments: &[&str]) -> String {
    segments
        .iter()
        .fold(String::from("/products"), |mut acc, segment| {
            acc.push('/');
            acc.push_str(&urlencoding::encode(segment));
            acc
        })
}

/// Build `/products/{navbar}/{category}/{subcategory|_}/{product}`.
#[must_use]
pub fn product_href(
    navbar: &str,
    category: &str,
    subcategory: Option<&str>,
    product: &str,
) -> String {
    catalog_href(&[
        navbar,
        category,
        subcategory.unwrap_or(NO_SUBCATEGORY),
        product,
    ])
}

impl From<&NavbarCategory> for NavbarEntry {
    fn from(n: &NavbarCategory) -> Self {
        Self {
            id: n.id,
            name: n.name.clone(),
            slug: n.slug.clone(),
            image: n.image.clone(),
        }
    }
}

impl From<&Category> for CategoryEntry {
    fn from(c: &Category) -> Self {
        Self {
            id: c.id,
            navbar_category_id: c.navbar_category_id,
            name: c.name.clone(),
            slug: c.slug.clone(),
        }
    }
}

impl From<&Subcategory> for SubcategoryEntry {
    fn from(s: &Subcategory) -> Self {
        Self {
            id: s.id,
            category_id: s.category_id,
            parent_id: s.parent_id,
            name: s.name.clone(),
            slug: s.slug.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_href_uses_placeholder_without_subcategory() {
        assert_eq!(
            product_href("lab", "physics", None, "vernier-caliper"),
            "/products/lab/physics/_/vernier-caliper"
        );
        assert_eq!(
            product_href("lab", "physics", Some("optics"), "prism"),
            "/products/lab/physics/optics/prism"
        );
    }

    #[test]
    fn test_catalog_href_prefixes_products() {
        assert_eq!(catalog_href(&[]), "/products");
        assert_eq!(catalog_href(&["lab", "physics"]), "/products/lab/physics");
    }

    #[test]
    fn test_product_href_encodes_segments() {
        assert_eq!(
            product_href("lab", "a b", None, "x&y"),
            "/products/lab/a%20b/_/x%26y"
        );
    }
}
