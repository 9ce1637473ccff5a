//! Shared navigation types.
//!
//! These are the validated, immutable shapes handed to the renderer. The
//! authored (TOML) shapes live in [`crate::config`] and are converted into
//! these once, at load time.

use serde::{Deserialize, Serialize};

/// One node of the navigation bar.
///
/// A node is either a direct link or a dropdown group. Groups nest; a group
/// inside another group may have empty `text` (an untitled block inside a
/// dropdown).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NavEntry {
    Link {
        text: String,
        link: String,
        /// Prefix used for highlighting. Falls back to `link` when absent.
        #[serde(skip_serializing_if = "Option::is_none")]
        active_match: Option<String>,
    },
    Group {
        text: String,
        items: Vec<NavEntry>,
    },
}

impl NavEntry {
    pub fn text(&self) -> &str {
        match self {
            NavEntry::Link { text, .. } | NavEntry::Group { text, .. } => text,
        }
    }

    /// Every link in this subtree, depth-first in authored order.
    pub fn links(&self) -> Vec<&str> {
        match self {
            NavEntry::Link { link, .. } => vec![link.as_str()],
            NavEntry::Group { items, .. } => items.iter().flat_map(NavEntry::links).collect(),
        }
    }
}

/// A titled block of links shown in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SidebarSection {
    pub text: String,
    #[serde(default)]
    pub items: Vec<SidebarLink>,
    /// `Some(true)` renders the section folded, `Some(false)` foldable but
    /// open, `None` not foldable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
}

/// A sidebar leaf pointing at one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SidebarLink {
    pub text: String,
    pub link: String,
}

/// Icon link shown in the navigation bar (GitHub, etc.).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SocialLink {
    pub icon: String,
    pub link: String,
}

/// Whether a link leaves the site. External links are never checked against
/// the content tree.
pub fn is_external(link: &str) -> bool {
    link.starts_with("http://")
        || link.starts_with("https://")
        || link.starts_with("mailto:")
        || link.starts_with("//")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(text: &str, link: &str) -> NavEntry {
        NavEntry::Link {
            text: text.into(),
            link: link.into(),
            active_match: None,
        }
    }

    #[test]
    fn links_walks_groups_in_order() {
        let nav = NavEntry::Group {
            text: "Frontend".into(),
            items: vec![
                link("Javascript", "/handbook/javascript/"),
                NavEntry::Group {
                    text: String::new(),
                    items: vec![link("HTML5", "/handbook/html5/"), link("CSS", "/handbook/css3/")],
                },
                link("Patterns", "/computer/design-patterns/"),
            ],
        };
        assert_eq!(
            nav.links(),
            vec![
                "/handbook/javascript/",
                "/handbook/html5/",
                "/handbook/css3/",
                "/computer/design-patterns/"
            ]
        );
    }

    #[test]
    fn link_serializes_without_empty_active_match() {
        let json = serde_json::to_value(link("Computer", "/computer/")).unwrap();
        assert_eq!(json, serde_json::json!({"text": "Computer", "link": "/computer/"}));
    }

    #[test]
    fn group_serializes_items() {
        let group = NavEntry::Group {
            text: "Life".into(),
            items: vec![link("Food", "/good-life/food")],
        };
        let json = serde_json::to_value(&group).unwrap();
        assert_eq!(json["items"][0]["link"], "/good-life/food");
        assert_eq!(group.text(), "Life");
    }

    #[test]
    fn external_links_detected() {
        assert!(is_external("https://github.com/someone"));
        assert!(is_external("mailto:me@example.com"));
        assert!(!is_external("/handbook/"));
        assert!(!is_external("./chapter_2"));
    }

    #[test]
    fn sidebar_section_rejects_unknown_keys() {
        let result: Result<SidebarSection, _> = toml::from_str(
            r#"
text = "Vue"
itemz = []
"#,
        );
        assert!(result.is_err());
    }
}
