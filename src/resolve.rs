//! Page path → navigation bar and sidebar.
//!
//! The resolver is built once from a validated [`SiteConfig`] and is
//! immutable afterwards, so one instance can serve any number of page
//! resolutions, concurrently or not. Nothing here can fail: every check
//! happens when the configuration is loaded.
//!
//! ## Sidebar selection
//!
//! Sidebars are keyed by path prefix. The key that is the **longest** prefix
//! of the requested path wins:
//!
//! ```text
//! "/handbook/"        → A
//! "/handbook/react/"  → B
//!
//! /handbook/react/chapter_1  → B
//! /handbook/vue/             → A
//! /unknown/                  → (no sidebar)
//! ```
//!
//! Keys are sorted by descending length at load time, so lookup is a single
//! scan that stops at the first match.

use crate::config::{ConfigError, DocFooterConfig, EditLinkConfig, SiteConfig};
use crate::paths;
use crate::types::{NavEntry, SidebarLink, SidebarSection};
use rayon::prelude::*;
use serde::Serialize;

/// Sidebar sections keyed by path prefix, ordered for longest-prefix lookup.
#[derive(Debug, Clone, Default)]
pub struct SidebarMap {
    entries: Vec<(String, Vec<SidebarSection>)>,
}

impl SidebarMap {
    /// Build the map, rejecting malformed or repeated prefixes.
    pub fn new<I>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, Vec<SidebarSection>)>,
    {
        let mut entries: Vec<_> = entries.into_iter().collect();
        if let Some((prefix, _)) = entries
            .iter()
            .find(|(prefix, _)| !is_valid_prefix(prefix))
        {
            return Err(ConfigError::InvalidSidebarPrefix(prefix.clone()));
        }

        entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        if let Some(pair) = entries.windows(2).find(|pair| pair[0].0 == pair[1].0) {
            return Err(ConfigError::DuplicateSidebarPrefix {
                prefix: pair[0].0.clone(),
                origin: "sidebar map".to_string(),
            });
        }

        Ok(Self { entries })
    }

    /// Sections of the longest prefix of `requested_path`, or empty.
    pub fn resolve(&self, requested_path: &str) -> &[SidebarSection] {
        self.entries
            .iter()
            .find(|(prefix, _)| requested_path.starts_with(prefix.as_str()))
            .map(|(_, sections)| sections.as_slice())
            .unwrap_or(&[])
    }

    /// Prefixes in lookup order (longest first).
    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(prefix, _)| prefix.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SidebarSection])> {
        self.entries
            .iter()
            .map(|(prefix, sections)| (prefix.as_str(), sections.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn is_valid_prefix(prefix: &str) -> bool {
    prefix.starts_with('/')
}

/// Sidebar for `requested_path`: the sections of the longest matching
/// prefix, in authored order, or an empty slice when no prefix matches.
pub fn resolve_sidebar<'a>(requested_path: &str, sidebar_map: &'a SidebarMap) -> &'a [SidebarSection] {
    sidebar_map.resolve(requested_path)
}

/// Whether a nav entry should be highlighted on `requested_path`.
///
/// A link is active when its `active_match` (or its `link`, if none) is a
/// prefix of the path. A group is active when any of its items is.
pub fn is_active(entry: &NavEntry, requested_path: &str) -> bool {
    match entry {
        NavEntry::Link {
            link, active_match, ..
        } => {
            let pattern = active_match.as_deref().unwrap_or(link);
            if active_match.is_none() && (pattern == "/" || pattern.is_empty()) {
                // The site root would otherwise match every page
                return paths::same_page(pattern, requested_path);
            }
            requested_path.starts_with(pattern)
        }
        NavEntry::Group { items, .. } => items.iter().any(|item| is_active(item, requested_path)),
    }
}

/// Everything the renderer needs for one page.
#[derive(Debug, Serialize)]
pub struct ResolvedPage<'a> {
    /// Normalized page path.
    pub path: String,
    pub nav: &'a [NavEntry],
    /// Text of the top-level nav entry to highlight.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_nav: Option<&'a str>,
    pub sidebar: &'a [SidebarSection],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<&'a SidebarLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<&'a SidebarLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_link: Option<String>,
    pub doc_footer: &'a DocFooterConfig,
}

/// Immutable resolver built from a validated configuration.
#[derive(Debug, Clone)]
pub struct SiteResolver {
    nav: Vec<NavEntry>,
    sidebar: SidebarMap,
    base: String,
    edit_link: Option<EditLinkConfig>,
    doc_footer: DocFooterConfig,
}

impl SiteResolver {
    pub fn new(config: &SiteConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let resolver = Self {
            nav: config.nav_entries()?,
            sidebar: config.sidebar_map()?,
            base: config.base.clone(),
            edit_link: config.theme.edit_link.clone(),
            doc_footer: config.theme.doc_footer.clone(),
        };
        tracing::debug!(
            nav = resolver.nav.len(),
            sidebars = resolver.sidebar.len(),
            "Site resolver ready"
        );
        Ok(resolver)
    }

    /// The navigation bar. Identical for every page.
    pub fn resolve_nav(&self, _requested_path: &str) -> &[NavEntry] {
        &self.nav
    }

    pub fn resolve_sidebar(&self, requested_path: &str) -> &[SidebarSection] {
        resolve_sidebar(requested_path, &self.sidebar)
    }

    pub fn sidebar_map(&self) -> &SidebarMap {
        &self.sidebar
    }

    /// Raw request (may carry the deployment base, a query or a fragment)
    /// to page path.
    pub fn normalize(&self, raw: &str) -> String {
        paths::normalize_request(raw, &self.base)
    }

    /// Previous and next links around `requested_path` in its sidebar.
    ///
    /// Sections are flattened in authored order, so the last link of one
    /// section is followed by the first link of the next.
    pub fn prev_next(&self, requested_path: &str) -> (Option<&SidebarLink>, Option<&SidebarLink>) {
        let links: Vec<&SidebarLink> = self
            .resolve_sidebar(requested_path)
            .iter()
            .flat_map(|section| section.items.iter())
            .collect();

        match links
            .iter()
            .position(|link| paths::same_page(&link.link, requested_path))
        {
            Some(idx) => {
                let prev = idx.checked_sub(1).map(|i| links[i]);
                let next = links.get(idx + 1).copied();
                (prev, next)
            }
            None => (None, None),
        }
    }

    /// "Edit this page" URL for a content-root-relative document path.
    pub fn edit_link(&self, relative_path: &str) -> Option<String> {
        self.edit_link
            .as_ref()
            .map(|edit| edit.url_for(relative_path))
    }

    /// Resolve everything for one raw request path.
    pub fn page(&self, raw_path: &str) -> ResolvedPage<'_> {
        let path = self.normalize(raw_path);
        let nav = self.resolve_nav(&path);
        let (prev, next) = self.prev_next(&path);
        ResolvedPage {
            active_nav: nav
                .iter()
                .find(|entry| is_active(entry, &path))
                .map(NavEntry::text),
            nav,
            sidebar: self.resolve_sidebar(&path),
            prev,
            next,
            edit_link: self.edit_link(&paths::document_file(&path)),
            doc_footer: &self.doc_footer,
            path,
        }
    }

    /// Resolve many pages in parallel. Output order matches input order.
    pub fn pages<S: AsRef<str> + Sync>(&self, raw_paths: &[S]) -> Vec<ResolvedPage<'_>> {
        raw_paths
            .par_iter()
            .map(|raw| self.page(raw.as_ref()))
            .collect()
    }
}
