//! Data shared by every HTML page: the mega-menu, breadcrumbs and footer.

use lovosis_core::{Breadcrumb, CategoryNode, NavTree, NavbarNode, SubcategoryNode};

use crate::db::{CatalogRepository, RepositoryError};
use crate::middleware::CspNonce;
use crate::models::catalog::catalog_href;
use crate::state::AppState;

/// A top-level menu entry with its category columns.
#[derive(Debug, Clone)]
pub struct MenuSection {
    pub name: String,
    pub href: String,
    pub image: Option<String>,
    pub columns: Vec<MenuColumn>,
}

/// One category column in a mega-menu panel.
#[derive(Debug, Clone)]
pub struct MenuColumn {
    pub name: String,
    pub href: String,
    pub links: Vec<MenuLink>,
}

/// A subcategory link; `depth` is 0 for direct children of the category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuLink {
    pub label: String,
    pub href: String,
    pub depth: usize,
}

/// Footer link to a content page.
#[derive(Debug, Clone)]
pub struct FooterLink {
    pub title: String,
    pub href: String,
}

/// Layout data rendered by `base.html`.
#[derive(Debug, Clone)]
pub struct Layout {
    pub title: String,
    pub description: String,
    pub menu: Vec<MenuSection>,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub footer_pages: Vec<FooterLink>,
    pub nonce: String,
}

impl Layout {
    /// Build the layout for the page at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the navigation tree cannot be loaded.
    pub async fn load(
        state: &AppState,
        path: &str,
        nonce: &CspNonce,
    ) -> Result<Self, RepositoryError> {
        let tree = CatalogRepository::new(state.pool()).navigation().await?;
        Ok(Self::from_tree(state, &tree, path, nonce))
    }

    /// Layout without a menu, for pages rendered after the database failed.
    #[must_use]
    pub fn bare(state: &AppState, path: &str, nonce: &CspNonce) -> Self {
        Self::from_tree(state, &NavTree::default(), path, nonce)
    }

    fn from_tree(state: &AppState, tree: &NavTree, path: &str, nonce: &CspNonce) -> Self {
        let footer_pages = state
            .content()
            .pages_in_order()
            .into_iter()
            .map(|page| FooterLink {
                title: page.meta.title.clone(),
                href: format!("/{}", page.slug),
            })
            .collect();

        Self {
            title: "Lovosis Technologies".to_string(),
            description: String::new(),
            menu: menu_sections(tree),
            breadcrumbs: Breadcrumb::trail(path),
            footer_pages,
            nonce: nonce.value().to_string(),
        }
    }

    /// Set the page title and meta description.
    #[must_use]
    pub fn titled(mut self, title: impl Into<String>, description: impl Into<String>) -> Self {
        self.title = title.into();
        self.description = description.into();
        self
    }
}

/// Flatten the navigation tree into renderable menu panels.
#[must_use]
pub fn menu_sections(tree: &NavTree) -> Vec<MenuSection> {
    tree.navbar().iter().map(menu_section).collect()
}

fn menu_section(navbar: &NavbarNode) -> MenuSection {
    MenuSection {
        name: navbar.name.clone(),
        href: catalog_href(&[&navbar.slug]),
        image: navbar.image.clone(),
        columns: navbar
            .categories
            .iter()
            .map(|category| menu_column(&navbar.slug, category))
            .collect(),
    }
}

fn menu_column(navbar_slug: &str, category: &CategoryNode) -> MenuColumn {
    let mut links = Vec::new();
    push_links(
        navbar_slug,
        &category.slug,
        &category.sub_categories,
        0,
        &mut links,
    );

    MenuColumn {
        name: category.name.clone(),
        href: catalog_href(&[navbar_slug, &category.slug]),
        links,
    }
}

/// Depth-first, so each child link directly follows its parent.
fn push_links(
    navbar_slug: &str,
    category_slug: &str,
    nodes: &[SubcategoryNode],
    depth: usize,
    out: &mut Vec<MenuLink>,
) {
    for node in nodes {
        out.push(MenuLink {
            label: node.name.clone(),
            href: catalog_href(&[navbar_slug, category_slug, &node.slug]),
            depth,
        });
        push_links(
            navbar_slug,
            category_slug,
            &node.sub_categories,
            depth + 1,
            out,
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lovosis_core::{
        CategoryEntry, CategoryId, NavbarCategoryId, NavbarEntry, SubcategoryEntry, SubcategoryId,
    };

    use super::*;

    fn tree() -> NavTree {
        let navbar = vec![NavbarEntry {
            id: NavbarCategoryId::new(1),
            name: "Lab Equipment".to_string(),
            slug: "lab-equipment".to_string(),
            image: None,
        }];
        let categories = vec![CategoryEntry {
            id: CategoryId::new(10),
            navbar_category_id: NavbarCategoryId::new(1),
            name: "Physics".to_string(),
            slug: "physics".to_string(),
        }];
        let subcategory = |id, parent: Option<i32>, name: &str, slug: &str| SubcategoryEntry {
            id: SubcategoryId::new(id),
            category_id: CategoryId::new(10),
            parent_id: parent.map(SubcategoryId::new),
            name: name.to_string(),
            slug: slug.to_string(),
        };
        let subcategories = vec![
            subcategory(100, None, "Optics", "optics"),
            subcategory(101, Some(100), "Lenses", "lenses"),
            subcategory(102, None, "Mechanics", "mechanics"),
        ];

        NavTree::build(&navbar, &categories, &subcategories)
    }

    #[test]
    fn test_menu_flattens_subcategories_depth_first() {
        let sections = menu_sections(&tree());
        assert_eq!(sections.len(), 1);

        let section = sections.first().unwrap();
        assert_eq!(section.href, "/products/lab-equipment");

        let column = section.columns.first().unwrap();
        assert_eq!(column.href, "/products/lab-equipment/physics");

        let links: Vec<_> = column
            .links
            .iter()
            .map(|l| (l.label.as_str(), l.depth))
            .collect();
        assert_eq!(links, [("Optics", 0), ("Lenses", 1), ("Mechanics", 0)]);
        assert_eq!(
            column.links.get(1).unwrap().href,
            "/products/lab-equipment/physics/lenses"
        );
    }

    #[test]
    fn test_empty_tree_has_no_sections() {
        assert!(menu_sections(&NavTree::default()).is_empty());
    }
}
