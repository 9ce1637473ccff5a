//! CLI output formatting.
//!
//! Output leads with what the reader navigates by: positional index and
//! title, with link targets shown after an arrow. Nesting is shown with four
//! spaces per level.
//!
//! ## Nav
//!
//! ```text
//! Nav
//! 001 Frontend
//!     001 Javascript → /handbook/javascript/
//!     002 (untitled)
//!         001 HTML5 → /handbook/html5/
//! 002 Computer Science → /computer/ (active)
//! ```
//!
//! ## Sidebar
//!
//! ```text
//! Sidebar /handbook/react/chapter_1
//! 001 React.js
//!     001 Chapter 1 → /handbook/react/chapter_1 (current)
//!     002 Chapter 2 → /handbook/react/chapter_2
//!
//! Prev: none
//! Next: Chapter 2 → /handbook/react/chapter_2
//! ```
//!
//! ## Check
//!
//! ```text
//! Config
//!     config.toml
//!     sidebar/handbook.toml
//!
//! Sidebars
//! 001 /handbook/react/ (1 section, 12 links)
//! 002 /computer/ (1 section, 5 links)
//!
//! Documents: 42
//! Dead links: 1 (ignored)
//!     /good-life/ (in nav)
//! ```
//!
//! Each `format_*` function returns `Vec<String>` and does no I/O; the
//! `print_*` wrappers write to stdout.

use crate::links::DeadLink;
use crate::paths;
use crate::resolve::{SidebarMap, is_active};
use crate::types::{NavEntry, SidebarLink, SidebarSection};

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// `001 Title → /target`
fn link_line(index: usize, text: &str, link: &str) -> String {
    format!("{} {} → {}", format_index(index), text, link)
}

// ============================================================================
// Nav
// ============================================================================

pub fn format_nav(nav: &[NavEntry], current: Option<&str>) -> Vec<String> {
    let mut lines = vec!["Nav".to_string()];
    if nav.is_empty() {
        lines.push("    (empty)".to_string());
    }
    format_nav_level(nav, 0, current, &mut lines);
    lines
}

fn format_nav_level(items: &[NavEntry], depth: usize, current: Option<&str>, lines: &mut Vec<String>) {
    for (i, entry) in items.iter().enumerate() {
        // Only top-level entries are highlighted by the renderer
        let marker = match current {
            Some(path) if depth == 0 && is_active(entry, path) => " (active)",
            _ => "",
        };
        match entry {
            NavEntry::Link { text, link, .. } => {
                lines.push(format!("{}{}{}", indent(depth), link_line(i + 1, text, link), marker));
            }
            NavEntry::Group { text, items } => {
                let title = if text.is_empty() { "(untitled)" } else { text.as_str() };
                lines.push(format!("{}{} {}{}", indent(depth), format_index(i + 1), title, marker));
                format_nav_level(items, depth + 1, current, lines);
            }
        }
    }
}

pub fn print_nav(nav: &[NavEntry], current: Option<&str>) {
    for line in format_nav(nav, current) {
        println!("{}", line);
    }
}

// ============================================================================
// Sidebar
// ============================================================================

pub fn format_sidebar(
    path: &str,
    sidebar: &[SidebarSection],
    prev: Option<&SidebarLink>,
    next: Option<&SidebarLink>,
) -> Vec<String> {
    if sidebar.is_empty() {
        return vec![format!("No sidebar for {}", path)];
    }

    let mut lines = vec![format!("Sidebar {}", path)];
    for (i, section) in sidebar.iter().enumerate() {
        let folded = match section.collapsed {
            Some(true) => " (collapsed)",
            _ => "",
        };
        lines.push(format!("{} {}{}", format_index(i + 1), section.text, folded));
        for (j, link) in section.items.iter().enumerate() {
            let marker = if paths::same_page(&link.link, path) {
                " (current)"
            } else {
                ""
            };
            lines.push(format!("{}{}{}", indent(1), link_line(j + 1, &link.text, &link.link), marker));
        }
    }

    lines.push(String::new());
    lines.push(format!("Prev: {}", neighbour(prev)));
    lines.push(format!("Next: {}", neighbour(next)));
    lines
}

fn neighbour(link: Option<&SidebarLink>) -> String {
    match link {
        Some(l) => format!("{} → {}", l.text, l.link),
        None => "none".to_string(),
    }
}

pub fn print_sidebar(
    path: &str,
    sidebar: &[SidebarSection],
    prev: Option<&SidebarLink>,
    next: Option<&SidebarLink>,
) {
    for line in format_sidebar(path, sidebar, prev, next) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Summary of a configuration check.
pub struct CheckSummary<'a> {
    /// Config files that were read, relative to the content root.
    pub config_files: Vec<String>,
    pub sidebar: &'a SidebarMap,
    pub document_count: usize,
    pub dead_links: &'a [DeadLink],
    pub ignore_dead_links: bool,
}

pub fn format_check_output(summary: &CheckSummary<'_>) -> Vec<String> {
    let mut lines = vec!["Config".to_string()];
    if summary.config_files.is_empty() {
        lines.push("    (stock defaults)".to_string());
    }
    for file in &summary.config_files {
        lines.push(format!("    {}", file));
    }

    lines.push(String::new());
    lines.push("Sidebars".to_string());
    let mut sidebars: Vec<_> = summary.sidebar.iter().collect();
    sidebars.sort_by_key(|(prefix, _)| *prefix);
    for (i, (prefix, sections)) in sidebars.iter().enumerate() {
        let links: usize = sections.iter().map(|s| s.items.len()).sum();
        lines.push(format!(
            "{} {} ({}, {})",
            format_index(i + 1),
            prefix,
            plural(sections.len(), "section"),
            plural(links, "link")
        ));
    }

    lines.push(String::new());
    lines.push(format!("Documents: {}", summary.document_count));

    if !summary.dead_links.is_empty() {
        let status = if summary.ignore_dead_links { " (ignored)" } else { "" };
        lines.push(format!("Dead links: {}{}", summary.dead_links.len(), status));
        for dead in summary.dead_links {
            lines.push(format!("    {}", dead));
        }
    }

    lines
}

pub fn print_check_output(summary: &CheckSummary<'_>) {
    for line in format_check_output(summary) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::LinkOrigin;

    fn link(text: &str, link: &str) -> NavEntry {
        NavEntry::Link {
            text: text.into(),
            link: link.into(),
            active_match: Some(link.into()),
        }
    }

    fn sidebar_link(text: &str, link: &str) -> SidebarLink {
        SidebarLink {
            text: text.into(),
            link: link.into(),
        }
    }

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(123), "123");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn plural_words() {
        assert_eq!(plural(1, "link"), "1 link");
        assert_eq!(plural(0, "link"), "0 links");
        assert_eq!(plural(3, "section"), "3 sections");
    }

    #[test]
    fn nav_tree_with_nested_groups() {
        let nav = vec![
            NavEntry::Group {
                text: "Frontend".into(),
                items: vec![
                    link("Javascript", "/handbook/javascript/"),
                    NavEntry::Group {
                        text: String::new(),
                        items: vec![link("HTML5", "/handbook/html5/")],
                    },
                ],
            },
            link("Computer Science", "/computer/"),
        ];
        let lines = format_nav(&nav, Some("/computer/graph"));
        assert_eq!(
            lines,
            vec![
                "Nav",
                "001 Frontend",
                "    001 Javascript → /handbook/javascript/",
                "    002 (untitled)",
                "        001 HTML5 → /handbook/html5/",
                "002 Computer Science → /computer/ (active)",
            ]
        );
    }

    #[test]
    fn nav_empty() {
        assert_eq!(format_nav(&[], None), vec!["Nav", "    (empty)"]);
    }

    #[test]
    fn sidebar_marks_current_and_neighbours() {
        let sidebar = vec![SidebarSection {
            text: "React.js".into(),
            items: vec![
                sidebar_link("Chapter 1", "/handbook/react/chapter_1"),
                sidebar_link("Chapter 2", "/handbook/react/chapter_2"),
            ],
            collapsed: Some(false),
        }];
        let next = sidebar_link("Chapter 2", "/handbook/react/chapter_2");
        let lines = format_sidebar("/handbook/react/chapter_1", &sidebar, None, Some(&next));
        assert_eq!(
            lines,
            vec![
                "Sidebar /handbook/react/chapter_1",
                "001 React.js",
                "    001 Chapter 1 → /handbook/react/chapter_1 (current)",
                "    002 Chapter 2 → /handbook/react/chapter_2",
                "",
                "Prev: none",
                "Next: Chapter 2 → /handbook/react/chapter_2",
            ]
        );
    }

    #[test]
    fn sidebar_missing() {
        assert_eq!(
            format_sidebar("/unknown/", &[], None, None),
            vec!["No sidebar for /unknown/"]
        );
    }

    #[test]
    fn check_output_lists_sidebars_and_dead_links() {
        let sidebar = SidebarMap::new(vec![(
            "/computer/".to_string(),
            vec![SidebarSection {
                text: "CS".into(),
                items: vec![sidebar_link("Home", "/computer/")],
                collapsed: None,
            }],
        )])
        .unwrap();
        let dead = vec![DeadLink {
            link: "/good-life/".into(),
            origin: LinkOrigin::Nav,
        }];
        let summary = CheckSummary {
            config_files: vec!["config.toml".into()],
            sidebar: &sidebar,
            document_count: 3,
            dead_links: &dead,
            ignore_dead_links: true,
        };
        assert_eq!(
            format_check_output(&summary),
            vec![
                "Config",
                "    config.toml",
                "",
                "Sidebars",
                "001 /computer/ (1 section, 1 link)",
                "",
                "Documents: 3",
                "Dead links: 1 (ignored)",
                "    /good-life/ (in nav)",
            ]
        );
    }
}
