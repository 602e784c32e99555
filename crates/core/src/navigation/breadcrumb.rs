//! Breadcrumb derivation from a request path.
//!
//! `/products/lab-equipment/physics` becomes
//! `Products › Lab Equipment › Physics`, each linking to its path prefix.

use std::borrow::Cow;

use serde::Serialize;

/// Path segments that are artifacts of broken links rather than real pages.
const SENTINEL_SEGMENTS: &[&str] = &["undefined", "null"];

/// Keywords whose following segment is the entity name and gets its own crumb.
const KEYWORD_SEGMENTS: &[&str] = &["category", "subcategory"];

/// A single breadcrumb entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    /// Human readable label, e.g. `Lab Equipment`.
    pub label: String,
    /// Link to the path prefix ending at this segment.
    pub href: String,
}

impl Breadcrumb {
    /// Derive the breadcrumb trail for a path.
    ///
    /// The root ("Home") crumb is not included; callers render it
    /// themselves. Returns an empty trail when no meaningful segment remains.
    ///
    /// ```
    /// use lovosis_core::Breadcrumb;
    ///
    /// let trail = Breadcrumb::trail("/products/lab-equipment/undefined");
    /// assert_eq!(trail.len(), 2);
    /// assert_eq!(trail[1].label, "Lab Equipment");
    /// assert_eq!(trail[1].href, "/products/lab-equipment");
    /// ```
    #[must_use]
    pub fn trail(path: &str) -> Vec<Self> {
        let segments: Vec<Segment<'_>> = path
            .split('/')
            .filter(|raw| is_meaningful(raw))
            .map(Segment::parse)
            .collect();

        let mut crumbs = Vec::with_capacity(segments.len());
        let mut i = 0;
        while let Some(segment) = segments.get(i) {
            crumbs.push(Self::at(&segments, i));

            if KEYWORD_SEGMENTS.contains(&segment.text.as_ref()) && segments.get(i + 1).is_some() {
                crumbs.push(Self::at(&segments, i + 1));
                i += 1;
            }
            i += 1;
        }

        crumbs
    }

    /// Build the crumb for `segments[index]`, linking the prefix up to it.
    fn at(segments: &[Segment<'_>], index: usize) -> Self {
        let prefix = segments.iter().take(index + 1);
        let href = prefix.fold(String::new(), |mut acc, seg| {
            acc.push('/');
            acc.push_str(&urlencoding::encode(&seg.text));
            acc
        });
        let label = segments
            .get(index)
            .map(Segment::label)
            .unwrap_or_default();

        Self { label, href }
    }
}

/// A path segment, percent-decoded when its escapes are valid UTF-8.
struct Segment<'a> {
    text: Cow<'a, str>,
    /// False when decoding failed and `text` is the raw segment.
    decoded: bool,
}

impl<'a> Segment<'a> {
    fn parse(raw: &'a str) -> Self {
        match urlencoding::decode(raw) {
            Ok(text) => Self {
                text,
                decoded: true,
            },
            Err(_) => Self {
                text: Cow::Borrowed(raw),
                decoded: false,
            },
        }
    }

    /// Title-cased label; a segment that failed to decode is shown verbatim.
    fn label(&self) -> String {
        if self.decoded {
            format_label(&self.text)
        } else {
            self.text.to_string()
        }
    }
}

/// Percent-decode a segment, keeping the raw text if it is not valid UTF-8.
fn decode(raw: &str) -> Cow<'_, str> {
    urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw))
}

/// Whether a raw path segment should produce a breadcrumb.
fn is_meaningful(raw: &str) -> bool {
    if raw.is_empty() || SENTINEL_SEGMENTS.contains(&raw) {
        return false;
    }

    let decoded = decode(raw);
    if decoded.trim().is_empty() {
        return false;
    }

    // Punctuation-only segments such as `_` (the "no subcategory" placeholder)
    decoded.chars().any(|c| c.is_ascii_alphanumeric())
}

/// Turn a slug into a title: `lab-equipment` -> `Lab Equipment`.
fn format_label(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut prev_is_word = false;

    for c in segment.chars() {
        let c = if c == '-' { ' ' } else { c };
        let is_word = c.is_ascii_alphanumeric() || c == '_';
        if is_word && !prev_is_word {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
        prev_is_word = is_word;
    }

    out
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn labels(path: &str) -> Vec<String> {
        Breadcrumb::trail(path).into_iter().map(|c| c.label).collect()
    }

    #[test]
    fn test_basic_trail() {
        let trail = Breadcrumb::trail("/products/lab-equipment/physics");
        assert_eq!(
            trail,
            vec![
                Breadcrumb {
                    label: "Products".to_string(),
                    href: "/products".to_string(),
                },
                Breadcrumb {
                    label: "Lab Equipment".to_string(),
                    href: "/products/lab-equipment".to_string(),
                },
                Breadcrumb {
                    label: "Physics".to_string(),
                    href: "/products/lab-equipment/physics".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_root_has_no_crumbs() {
        assert!(Breadcrumb::trail("/").is_empty());
        assert!(Breadcrumb::trail("").is_empty());
    }

    #[test]
    fn test_drops_placeholder_tokens() {
        assert_eq!(
            labels("/products/undefined/null/trainers"),
            ["Products", "Trainers"]
        );
        assert_eq!(labels("/products/lab/physics/_/microscope"), [
            "Products",
            "Lab",
            "Physics",
            "Microscope"
        ]);
        assert_eq!(labels("/about/---/%20/.../contact"), ["About", "Contact"]);
    }

    #[test]
    fn test_placeholder_tokens_do_not_appear_in_hrefs() {
        let trail = Breadcrumb::trail("/products/undefined/trainers");
        assert_eq!(trail[1].href, "/products/trainers");
    }

    #[test]
    fn test_keyword_surfaces_following_segment() {
        let trail = Breadcrumb::trail("/shop/category/automotive/widgets");
        let got: Vec<_> = trail
            .iter()
            .map(|c| (c.label.as_str(), c.href.as_str()))
            .collect();
        assert_eq!(
            got,
            vec![
                ("Shop", "/shop"),
                ("Category", "/shop/category"),
                ("Automotive", "/shop/category/automotive"),
                ("Widgets", "/shop/category/automotive/widgets"),
            ]
        );
    }

    #[test]
    fn test_keyword_at_end_stands_alone() {
        assert_eq!(labels("/shop/subcategory"), ["Shop", "Subcategory"]);
        assert_eq!(
            labels("/subcategory/null/sensors"),
            ["Subcategory", "Sensors"]
        );
    }

    #[test]
    fn test_decodes_percent_escapes() {
        let trail = Breadcrumb::trail("/products/test%20%26%20measurement");
        assert_eq!(trail[1].label, "Test & Measurement");
        assert_eq!(trail[1].href, "/products/test%20%26%20measurement");
    }

    #[test]
    fn test_invalid_utf8_escape_kept_raw() {
        let trail = Breadcrumb::trail("/products/bad-%FF-slug");
        assert_eq!(trail[1].label, "bad-%FF-slug");
        assert_eq!(trail[1].href, "/products/bad-%25FF-slug");
        assert_eq!(trail[0].label, "Products");
    }

    #[test]
    fn test_format_label_word_boundaries() {
        assert_eq!(format_label("digital-multimeter"), "Digital Multimeter");
        assert_eq!(format_label("o'neil"), "O'Neil");
        assert_eq!(format_label("snake_case"), "Snake_case");
        assert_eq!(format_label("3d-printers"), "3d Printers");
        assert_eq!(format_label("ALREADY-Upper"), "ALREADY Upper");
    }
}
