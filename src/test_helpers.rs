//! Shared test utilities.
//!
//! Fixture setup plus lookup helpers for resolved navigation data.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let resolver = fixture_resolver(tmp.path());
//!
//! let sidebar = resolver.resolve_sidebar("/handbook/vue/chapter_1");
//! assert_eq!(section_titles(sidebar), vec!["Vue: fundamentals", "Vue: internals"]);
//!
//! assert_nav_shape(resolver.resolve_nav("/"), &[
//!     ("Quotes", &["Literature", ""]),
//!     ("Computer Science", &[]),
//! ]);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::config;
use crate::resolve::SiteResolver;
use crate::types::{NavEntry, SidebarSection};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/docs/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/docs");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Load the configuration under `root` and build a resolver. Panics on error.
pub fn fixture_resolver(root: &Path) -> SiteResolver {
    let site_config = config::load_config(root)
        .unwrap_or_else(|e| panic!("fixture config failed to load: {e}"));
    SiteResolver::new(&site_config).unwrap_or_else(|e| panic!("fixture config invalid: {e}"))
}

// =========================================================================
// Extractors
// =========================================================================

/// Section titles in display order.
pub fn section_titles(sidebar: &[SidebarSection]) -> Vec<&str> {
    sidebar.iter().map(|s| s.text.as_str()).collect()
}

/// Every link target in display order, across sections.
pub fn sidebar_links(sidebar: &[SidebarSection]) -> Vec<&str> {
    sidebar
        .iter()
        .flat_map(|s| s.items.iter())
        .map(|l| l.link.as_str())
        .collect()
}

/// Top-level nav titles in order.
pub fn nav_titles(nav: &[NavEntry]) -> Vec<&str> {
    nav.iter().map(NavEntry::text).collect()
}

/// Assert the top two levels of the nav bar.
///
/// Each entry is `(title, children)`. Use `&[]` for links; untitled groups
/// appear as `""`.
pub fn assert_nav_shape(nav: &[NavEntry], expected: &[(&str, &[&str])]) {
    let expected_titles: Vec<&str> = expected.iter().map(|(t, _)| *t).collect();
    assert_eq!(nav_titles(nav), expected_titles, "nav top-level titles mismatch");

    for (entry, (title, children)) in nav.iter().zip(expected) {
        let actual: Vec<&str> = match entry {
            NavEntry::Link { .. } => Vec::new(),
            NavEntry::Group { items, .. } => nav_titles(items),
        };
        assert_eq!(actual, children.to_vec(), "nav children of '{title}' mismatch");
    }
}
