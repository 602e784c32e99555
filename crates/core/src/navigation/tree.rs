//! Nesting of the flat taxonomy tables into the mega-menu tree.
//!
//! ```text
//! NavbarCategory
//! └── Category            (category.navbar_category_id == navbar.id)
//!     └── Subcategory     (subcategory.category_id == category.id, no parent)
//!         └── Subcategory (child.parent_id == subcategory.id, recursive)
//! ```
//!
//! Records whose parent reference does not resolve are dropped together with
//! everything beneath them. Order at every level is the order of the input
//! slices.

use std::collections::HashMap;

use serde::Serialize;

use crate::types::{CategoryId, NavbarCategoryId, SubcategoryId};

/// Flat navbar category record as fetched from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavbarEntry {
    pub id: NavbarCategoryId,
    pub name: String,
    pub slug: String,
    pub image: Option<String>,
}

/// Flat category record as fetched from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryEntry {
    pub id: CategoryId,
    pub navbar_category_id: NavbarCategoryId,
    pub name: String,
    pub slug: String,
}

/// Flat subcategory record as fetched from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubcategoryEntry {
    pub id: SubcategoryId,
    pub category_id: CategoryId,
    pub parent_id: Option<SubcategoryId>,
    pub name: String,
    pub slug: String,
}

/// A navbar category with its nested categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavbarNode {
    pub id: NavbarCategoryId,
    pub name: String,
    pub slug: String,
    pub image: Option<String>,
    pub categories: Vec<CategoryNode>,
}

/// A category with its top-level subcategories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryNode {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub sub_categories: Vec<SubcategoryNode>,
}

/// A subcategory with its (recursively nested) children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryNode {
    pub id: SubcategoryId,
    pub name: String,
    pub slug: String,
    pub sub_categories: Vec<SubcategoryNode>,
}

/// The complete mega-menu tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NavTree {
    navbar: Vec<NavbarNode>,
}

impl NavTree {
    /// Nest the three flat collections into a tree.
    ///
    /// Categories whose navbar category is missing, subcategories whose
    /// category is missing, and subcategories whose parent subcategory is
    /// missing (or unreachable) are omitted silently.
    #[must_use]
    pub fn build(
        navbar: &[NavbarEntry],
        categories: &[CategoryEntry],
        subcategories: &[SubcategoryEntry],
    ) -> Self {
        let mut by_navbar: HashMap<NavbarCategoryId, Vec<&CategoryEntry>> = HashMap::new();
        for category in categories {
            by_navbar
                .entry(category.navbar_category_id)
                .or_default()
                .push(category);
        }

        let mut roots: HashMap<CategoryId, Vec<&SubcategoryEntry>> = HashMap::new();
        let mut children: HashMap<SubcategoryId, Vec<&SubcategoryEntry>> = HashMap::new();
        for sub in subcategories {
            match sub.parent_id {
                None => roots.entry(sub.category_id).or_default().push(sub),
                Some(parent) => children.entry(parent).or_default().push(sub),
            }
        }

        let navbar = navbar
            .iter()
            .map(|entry| NavbarNode {
                id: entry.id,
                name: entry.name.clone(),
                slug: entry.slug.clone(),
                image: entry.image.clone(),
                categories: by_navbar
                    .get(&entry.id)
                    .map(|cats| {
                        cats.iter()
                            .map(|cat| CategoryNode {
                                id: cat.id,
                                name: cat.name.clone(),
                                slug: cat.slug.clone(),
                                sub_categories: roots
                                    .get(&cat.id)
                                    .map(|subs| nest(subs, &children))
                                    .unwrap_or_default(),
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
            })
            .collect();

        Self { navbar }
    }

    /// Top-level navbar categories in menu order.
    #[must_use]
    pub fn navbar(&self) -> &[NavbarNode] {
        &self.navbar
    }

    /// Number of navbar categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.navbar.len()
    }

    /// Whether the tree has no navbar categories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.navbar.is_empty()
    }
}

/// Recursively attach children to each subcategory.
///
/// Each subcategory has exactly one parent, and recursion only starts from
/// parentless nodes, so every node is visited at most once. Cycles can never
/// be reached from a root.
fn nest(
    level: &[&SubcategoryEntry],
    children: &HashMap<SubcategoryId, Vec<&SubcategoryEntry>>,
) -> Vec<SubcategoryNode> {
    level
        .iter()
        .map(|sub| SubcategoryNode {
            id: sub.id,
            name: sub.name.clone(),
            slug: sub.slug.clone(),
            sub_categories: children
                .get(&sub.id)
                .map(|kids| nest(kids, children))
                .unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn navbar(id: i32, slug: &str) -> NavbarEntry {
        NavbarEntry {
            id: NavbarCategoryId::new(id),
            name: slug.to_uppercase(),
            slug: slug.to_string(),
            image: None,
        }
    }

    fn category(id: i32, navbar_id: i32, slug: &str) -> CategoryEntry {
        CategoryEntry {
            id: CategoryId::new(id),
            navbar_category_id: NavbarCategoryId::new(navbar_id),
            name: slug.to_uppercase(),
            slug: slug.to_string(),
        }
    }

    fn sub(id: i32, category_id: i32, parent: Option<i32>, slug: &str) -> SubcategoryEntry {
        SubcategoryEntry {
            id: SubcategoryId::new(id),
            category_id: CategoryId::new(category_id),
            parent_id: parent.map(SubcategoryId::new),
            name: slug.to_uppercase(),
            slug: slug.to_string(),
        }
    }

    #[test]
    fn test_nests_children_under_correct_parents() {
        let tree = NavTree::build(
            &[navbar(1, "lab-equipment"), navbar(2, "trainers")],
            &[
                category(10, 1, "physics"),
                category(11, 2, "electrical"),
                category(12, 1, "chemistry"),
            ],
            &[
                sub(100, 10, None, "optics"),
                sub(101, 10, Some(100), "lenses"),
                sub(102, 10, Some(101), "convex"),
                sub(103, 11, None, "motors"),
            ],
        );

        assert_eq!(tree.len(), 2);
        let lab = &tree.navbar()[0];
        assert_eq!(lab.slug, "lab-equipment");
        let slugs: Vec<_> = lab.categories.iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(slugs, ["physics", "chemistry"]);

        let optics = &lab.categories[0].sub_categories[0];
        assert_eq!(optics.slug, "optics");
        assert_eq!(optics.sub_categories[0].slug, "lenses");
        assert_eq!(optics.sub_categories[0].sub_categories[0].slug, "convex");
        assert!(lab.categories[1].sub_categories.is_empty());

        let trainers = &tree.navbar()[1];
        assert_eq!(trainers.categories[0].sub_categories[0].slug, "motors");
    }

    #[test]
    fn test_omits_orphans() {
        let tree = NavTree::build(
            &[navbar(1, "lab")],
            &[category(10, 1, "physics"), category(11, 99, "lost-category")],
            &[
                sub(100, 10, None, "optics"),
                sub(101, 10, Some(555), "orphan-child"),
                sub(102, 10, Some(101), "grandchild-of-orphan"),
                sub(103, 77, None, "unknown-category"),
            ],
        );

        let lab = &tree.navbar()[0];
        assert_eq!(lab.categories.len(), 1);
        assert_eq!(lab.categories[0].sub_categories.len(), 1);
        assert!(lab.categories[0].sub_categories[0].sub_categories.is_empty());

        let json = serde_json::to_string(&tree).unwrap_or_default();
        assert!(!json.contains("orphan"));
        assert!(!json.contains("lost-category"));
        assert!(!json.contains("unknown-category"));
    }

    #[test]
    fn test_cycles_are_unreachable() {
        let tree = NavTree::build(
            &[navbar(1, "lab")],
            &[category(10, 1, "physics")],
            &[
                sub(100, 10, Some(101), "a"),
                sub(101, 10, Some(100), "b"),
                sub(102, 10, Some(102), "self"),
            ],
        );

        assert!(tree.navbar()[0].categories[0].sub_categories.is_empty());
    }

    #[test]
    fn test_preserves_input_order() {
        let tree = NavTree::build(
            &[navbar(2, "zeta"), navbar(1, "alpha")],
            &[],
            &[],
        );
        let slugs: Vec<_> = tree.navbar().iter().map(|n| n.slug.as_str()).collect();
        assert_eq!(slugs, ["zeta", "alpha"]);
    }

    #[test]
    fn test_is_empty() {
        let tree = NavTree::build(&[navbar(1, "lab")], &[], &[]);
        assert_eq!(tree.len(), 1);
        assert!(!tree.is_empty());
        assert!(NavTree::default().is_empty());
    }

    #[test]
    fn test_serializes_camel_case() {
        let tree = NavTree::build(
            &[navbar(1, "lab")],
            &[category(10, 1, "physics")],
            &[sub(100, 10, None, "optics")],
        );
        let json = serde_json::to_value(&tree).unwrap_or_default();
        assert_eq!(json[0]["categories"][0]["subCategories"][0]["slug"], "optics");
    }
}
