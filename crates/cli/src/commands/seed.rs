//! Seed the catalog taxonomy and products from a YAML file.
//!
//! ```yaml
//! - name: Lab Equipment
//!   description: Apparatus for school and college laboratories
//!   categories:
//!     - name: Physics
//!       subcategories:
//!         - name: Optics
//!           subcategories:
//!             - name: Lenses
//!               products:
//!                 - name: Convex Lens Set
//!                   images: [/api/files/4b1f...]
//!       products:
//!         - name: Vernier Caliper
//! ```
//!
//! Slugs are derived from names when omitted. The file is validated before
//! any connection is made, and everything is written in one transaction.
//! Rows are upserted by slug, so re-running a file updates it in place.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use sqlx::{Postgres, Transaction};
use tracing::{error, info};

use lovosis_site::db;
use lovosis_site::models::catalog::NO_SUBCATEGORY;

use super::database_url;

#[derive(Debug, Deserialize)]
pub struct SeedNavbar {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    #[serde(default)]
    pub categories: Vec<SeedCategory>,
}

#[derive(Debug, Deserialize)]
pub struct SeedCategory {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    #[serde(default)]
    pub subcategories: Vec<SeedSubcategory>,
    /// Products filed directly under the category.
    #[serde(default)]
    pub products: Vec<SeedProduct>,
}

#[derive(Debug, Deserialize)]
pub struct SeedSubcategory {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    #[serde(default)]
    pub subcategories: Vec<SeedSubcategory>,
    #[serde(default)]
    pub products: Vec<SeedProduct>,
}

#[derive(Debug, Deserialize)]
pub struct SeedProduct {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub catalog_images: Vec<String>,
}

/// Rows written by a seeding run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub navbar_categories: usize,
    pub categories: usize,
    pub subcategories: usize,
    pub products: usize,
}

/// Turn a display name into a URL slug: `Lab Equipment` -> `lab-equipment`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

fn slug_for(name: &str, slug: Option<&String>) -> String {
    slug.map_or_else(|| slugify(name), |s| s.trim().to_owned())
}

fn check(kind: &str, name: &str, slug: &str, errors: &mut Vec<String>) {
    if name.trim().is_empty() {
        errors.push(format!("{kind} with slug '{slug}' has no name"));
    }
    if slug.is_empty() {
        errors.push(format!("{kind} '{name}' has an empty slug"));
    }
}

/// Check a parsed file for problems that would fail or corrupt the insert.
///
/// Returns one message per problem; an empty list means the file is usable.
pub fn validate(navbars: &[SeedNavbar]) -> Vec<String> {
    let mut errors = Vec::new();
    let mut navbar_slugs = HashSet::new();
    let mut product_slugs = HashSet::new();

    for navbar in navbars {
        let slug = slug_for(&navbar.name, navbar.slug.as_ref());
        check("Navbar category", &navbar.name, &slug, &mut errors);
        if !navbar_slugs.insert(slug.clone()) {
            errors.push(format!("Duplicate navbar category slug '{slug}'"));
        }

        let mut category_slugs = HashSet::new();
        for category in &navbar.categories {
            let slug = slug_for(&category.name, category.slug.as_ref());
            check("Category", &category.name, &slug, &mut errors);
            if !category_slugs.insert(slug.clone()) {
                errors.push(format!(
                    "Duplicate category slug '{slug}' in navbar category '{}'",
                    navbar.name
                ));
            }

            let mut subcategory_slugs = HashSet::new();
            let mut products: Vec<&SeedProduct> = category.products.iter().collect();
            let mut stack: Vec<&SeedSubcategory> = category.subcategories.iter().collect();

            while let Some(sub) = stack.pop() {
                let slug = slug_for(&sub.name, sub.slug.as_ref());
                check("Subcategory", &sub.name, &slug, &mut errors);
                if slug == NO_SUBCATEGORY {
                    errors.push(format!(
                        "Subcategory '{}' uses the reserved slug '{NO_SUBCATEGORY}'",
                        sub.name
                    ));
                }
                if !subcategory_slugs.insert(slug.clone()) {
                    errors.push(format!(
                        "Duplicate subcategory slug '{slug}' in category '{}'",
                        category.name
                    ));
                }
                products.extend(&sub.products);
                stack.extend(&sub.subcategories);
            }

            for product in products {
                let slug = slug_for(&product.name, product.slug.as_ref());
                check("Product", &product.name, &slug, &mut errors);
                if !product_slugs.insert(slug.clone()) {
                    errors.push(format!("Duplicate product slug '{slug}'"));
                }
            }
        }
    }

    errors
}

/// Load a catalog YAML file into the database.
///
/// # Arguments
///
/// * `file_path` - Path to the YAML file
/// * `clear_existing` - If true, delete the whole catalog first
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, fails validation,
/// or a database operation fails. On failure nothing is written.
pub async fn catalog(
    file_path: &str,
    clear_existing: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let url = database_url()?;

    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading catalog from file");

    let content = tokio::fs::read_to_string(path).await?;
    let navbars: Vec<SeedNavbar> = serde_yaml::from_str(&content)?;

    info!(navbar_categories = navbars.len(), "Parsed catalog");

    let errors = validate(&navbars);
    if !errors.is_empty() {
        error!("Catalog validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }

    let pool = db::create_pool(&url).await?;
    info!("Connected to database");

    let mut tx = pool.begin().await?;

    if clear_existing {
        // Categories, subcategories and products cascade.
        let cleared = sqlx::query("DELETE FROM site.navbar_category")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        info!(cleared, "Cleared existing catalog");
    }

    let mut summary = SeedSummary::default();
    for navbar in &navbars {
        insert_navbar(&mut tx, navbar, &mut summary).await?;
    }

    tx.commit().await?;

    info!("Seeding complete!");
    info!("  Navbar categories: {}", summary.navbar_categories);
    info!("  Categories: {}", summary.categories);
    info!("  Subcategories: {}", summary.subcategories);
    info!("  Products: {}", summary.products);

    Ok(())
}

/// Flatten a subcategory forest into insertion order.
///
/// Depth-first, parents before children, siblings in file order. Each entry
/// carries the position of its parent in the returned list.
fn subcategory_order(roots: &[SeedSubcategory]) -> Vec<(Option<usize>, &SeedSubcategory)> {
    let mut order = Vec::new();
    let mut stack: Vec<(Option<usize>, &SeedSubcategory)> =
        roots.iter().rev().map(|s| (None, s)).collect();

    while let Some((parent, sub)) = stack.pop() {
        let index = order.len();
        order.push((parent, sub));
        stack.extend(sub.subcategories.iter().rev().map(|s| (Some(index), s)));
    }
    order
}

/// Where a product sits in the taxonomy.
#[derive(Clone, Copy)]
struct Placement {
    navbar_id: i32,
    category_id: i32,
    subcategory_id: Option<i32>,
}

async fn insert_navbar(
    tx: &mut Transaction<'_, Postgres>,
    navbar: &SeedNavbar,
    summary: &mut SeedSummary,
) -> Result<(), sqlx::Error> {
    let navbar_id: i32 = sqlx::query_scalar(
        r"
        INSERT INTO site.navbar_category (name, slug, description, image)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (slug) DO UPDATE
            SET name = EXCLUDED.name,
                description = EXCLUDED.description,
                image = EXCLUDED.image
        RETURNING id
        ",
    )
    .bind(navbar.name.trim())
    .bind(slug_for(&navbar.name, navbar.slug.as_ref()))
    .bind(&navbar.description)
    .bind(&navbar.image)
    .fetch_one(&mut **tx)
    .await?;
    summary.navbar_categories += 1;

    for category in &navbar.categories {
        let category_id: i32 = sqlx::query_scalar(
            r"
            INSERT INTO site.category (navbar_category_id, name, slug, description, image)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (navbar_category_id, slug) DO UPDATE
                SET name = EXCLUDED.name,
                    description = EXCLUDED.description,
                    image = EXCLUDED.image
            RETURNING id
            ",
        )
        .bind(navbar_id)
        .bind(category.name.trim())
        .bind(slug_for(&category.name, category.slug.as_ref()))
        .bind(&category.description)
        .bind(&category.image)
        .fetch_one(&mut **tx)
        .await?;
        summary.categories += 1;

        let placement = Placement {
            navbar_id,
            category_id,
            subcategory_id: None,
        };
        for product in &category.products {
            insert_product(tx, placement, product).await?;
            summary.products += 1;
        }

        let mut inserted: Vec<i32> = Vec::new();
        for (parent, sub) in subcategory_order(&category.subcategories) {
            let parent_id = parent.and_then(|index| inserted.get(index).copied());
            let subcategory_id: i32 = sqlx::query_scalar(
                r"
                INSERT INTO site.subcategory (category_id, parent_id, name, slug, description, image)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (category_id, slug) DO UPDATE
                    SET parent_id = EXCLUDED.parent_id,
                        name = EXCLUDED.name,
                        description = EXCLUDED.description,
                        image = EXCLUDED.image
                RETURNING id
                ",
            )
            .bind(category_id)
            .bind(parent_id)
            .bind(sub.name.trim())
            .bind(slug_for(&sub.name, sub.slug.as_ref()))
            .bind(&sub.description)
            .bind(&sub.image)
            .fetch_one(&mut **tx)
            .await?;
            summary.subcategories += 1;

            let placement = Placement {
                subcategory_id: Some(subcategory_id),
                ..placement
            };
            for product in &sub.products {
                insert_product(tx, placement, product).await?;
                summary.products += 1;
            }

            inserted.push(subcategory_id);
        }
    }

    Ok(())
}

async fn insert_product(
    tx: &mut Transaction<'_, Postgres>,
    placement: Placement,
    product: &SeedProduct,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"
        INSERT INTO site.product
            (navbar_category_id, category_id, subcategory_id, name, slug, description, images, catalog_images)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (slug) DO UPDATE
            SET navbar_category_id = EXCLUDED.navbar_category_id,
                category_id = EXCLUDED.category_id,
                subcategory_id = EXCLUDED.subcategory_id,
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                images = EXCLUDED.images,
                catalog_images = EXCLUDED.catalog_images,
                updated_at = NOW()
        ",
    )
    .bind(placement.navbar_id)
    .bind(placement.category_id)
    .bind(placement.subcategory_id)
    .bind(product.name.trim())
    .bind(slug_for(&product.name, product.slug.as_ref()))
    .bind(&product.description)
    .bind(&product.images)
    .bind(&product.catalog_images)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const SAMPLE: &str = r"
- name: Lab Equipment
  categories:
    - name: Physics
      products:
        - name: Vernier Caliper
      subcategories:
        - name: Optics
          subcategories:
            - name: Lenses
              products:
                - name: Convex Lens Set
                  images: [/api/files/a, /api/files/b]
- name: Trainers
  slug: trainers
";

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Lab Equipment"), "lab-equipment");
        assert_eq!(slugify("  AC/DC  Trainer (v2) "), "ac-dc-trainer-v2");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_parse_nested_sample() {
        let navbars: Vec<SeedNavbar> = serde_yaml::from_str(SAMPLE).unwrap();
        assert_eq!(navbars.len(), 2);
        let physics = &navbars[0].categories[0];
        assert_eq!(physics.products.len(), 1);
        let lenses = &physics.subcategories[0].subcategories[0];
        assert_eq!(lenses.name, "Lenses");
        assert_eq!(lenses.products[0].images.len(), 2);
        assert!(navbars[1].categories.is_empty());
        assert!(validate(&navbars).is_empty());
    }

    #[test]
    fn test_validate_duplicate_product_slugs() {
        let yaml = r"
- name: Lab
  categories:
    - name: A
      products:
        - name: Burette
    - name: B
      subcategories:
        - name: Glass
          products:
            - name: burette
";
        let navbars: Vec<SeedNavbar> = serde_yaml::from_str(yaml).unwrap();
        let errors = validate(&navbars);
        assert_eq!(errors, vec!["Duplicate product slug 'burette'".to_owned()]);
    }

    #[test]
    fn test_validate_reserved_and_empty_slugs() {
        let yaml = r"
- name: Lab
  categories:
    - name: A
      subcategories:
        - name: Misc
          slug: _
        - name: '!!!'
";
        let navbars: Vec<SeedNavbar> = serde_yaml::from_str(yaml).unwrap();
        let errors = validate(&navbars);
        assert!(errors.iter().any(|e| e.contains("reserved slug")));
        assert!(errors.iter().any(|e| e.contains("empty slug")));
    }

    #[test]
    fn test_validate_duplicate_category_slugs() {
        let yaml = r"
- name: Lab
  categories:
    - name: Optics
    - name: optics
- name: Trainers
  categories:
    - name: Optics
";
        let navbars: Vec<SeedNavbar> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            validate(&navbars),
            vec!["Duplicate category slug 'optics' in navbar category 'Lab'".to_owned()]
        );
    }

    #[test]
    fn test_subcategory_order_follows_file() {
        let yaml = r"
- name: Lab
  categories:
    - name: Physics
      subcategories:
        - name: Optics
          subcategories:
            - name: Lenses
            - name: Prisms
        - name: Mechanics
        - name: Electricity
";
        let navbars: Vec<SeedNavbar> = serde_yaml::from_str(yaml).unwrap();
        let order = subcategory_order(&navbars[0].categories[0].subcategories);

        let names: Vec<&str> = order.iter().map(|(_, s)| s.name.as_str()).collect();
        assert_eq!(
            names,
            ["Optics", "Lenses", "Prisms", "Mechanics", "Electricity"]
        );

        let parents: Vec<Option<usize>> = order.iter().map(|(p, _)| *p).collect();
        assert_eq!(parents, [None, Some(0), Some(0), None, None]);
    }
}
