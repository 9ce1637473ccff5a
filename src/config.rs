//! Site configuration module.
//!
//! Handles loading, validating, and merging the site configuration. Stock
//! defaults are overridden by `config.toml` in the content root, and sidebars
//! may be split across fragment files in `sidebar/`:
//!
//! ```text
//! docs/
//! ├── config.toml              # Site config (overrides stock defaults)
//! ├── sidebar/
//! │   ├── computer.toml        # Sidebar fragment: "/computer/" sections
//! │   └── handbook.toml        # Sidebar fragment: "/handbook/*/" sections
//! ├── index.md
//! └── handbook/
//!     └── react/
//!         └── chapter_1.md
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! title = "WThinking"
//! description = "Just playing around."
//! base = "/wujihuan-doc/"   # Deployment path, must start and end with "/"
//! lang = "en-US"
//! ignore_dead_links = true  # Demote dead links from errors to warnings
//!
//! [[theme.nav]]
//! text = "Computer Science"
//! link = "/computer/"
//! active_match = "/computer/"
//!
//! [[theme.nav]]
//! text = "Frontend"
//! items = [
//!     { text = "Javascript", link = "/handbook/javascript/" },
//!     { items = [{ text = "HTML5", link = "/handbook/html5/" }] },
//! ]
//!
//! [[theme.sidebar."/handbook/react/"]]
//! text = "React.js"
//! items = [{ text = "Chapter 1", link = "/handbook/react/chapter_1" }]
//!
//! [theme.edit_link]
//! pattern = "https://github.com/someone/site/edit/main/docs/:path"
//! ```
//!
//! A sidebar fragment holds sidebar entries at its top level:
//!
//! ```toml
//! [["/computer/"]]
//! text = "Computer Science"
//! items = [{ text = "Home", link = "/computer/" }]
//! ```
//!
//! Unknown keys are rejected to catch typos early. Every check that can fail
//! runs here, at load time; resolution afterwards cannot fail.

use crate::resolve::SidebarMap;
use crate::types::{NavEntry, SidebarSection, SocialLink};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Site config file name, looked up in the content root.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Directory (under the content root) holding sidebar fragment files.
pub const SIDEBAR_DIR: &str = "sidebar";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML parse error in {0}: {1}")]
    Fragment(PathBuf, toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Invalid sidebar prefix {0:?}: must be a non-empty path starting with '/'")]
    InvalidSidebarPrefix(String),
    #[error("Nav entry {0} has neither `link` nor `items`")]
    EmptyNavEntry(String),
    #[error("Nav entry {0} has both `link` and `items`")]
    AmbiguousNavEntry(String),
    #[error("Sidebar prefix {prefix:?} is defined more than once (again in {origin})")]
    DuplicateSidebarPrefix { prefix: String, origin: String },
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site title shown in the navigation bar and the `<title>` suffix.
    pub title: String,
    /// Meta description.
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Path the site is deployed under. Must start and end with `/`.
    pub base: String,
    /// `lang` attribute of the rendered pages.
    pub lang: String,
    /// Show a "last updated" timestamp on pages.
    pub last_updated: bool,
    /// Report dead links as warnings instead of failing the check.
    pub ignore_dead_links: bool,
    pub markdown: MarkdownConfig,
    /// Extra tags for the page `<head>`, passed through to the renderer.
    pub head: Vec<HeadTag>,
    pub theme: ThemeConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Docs".to_string(),
            description: String::new(),
            author: None,
            base: "/".to_string(),
            lang: "en-US".to_string(),
            last_updated: false,
            ignore_dead_links: false,
            markdown: MarkdownConfig::default(),
            head: Vec::new(),
            theme: ThemeConfig::default(),
        }
    }
}

/// An extra `<head>` element, e.g. a font preconnect `<link>`.
///
/// ```toml
/// [[head]]
/// tag = "link"
/// attrs = { rel = "preconnect", href = "https://fonts.gstatic.com", crossorigin = "" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeadTag {
    pub tag: String,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkdownConfig {
    /// Number the lines of fenced code blocks.
    pub line_numbers: bool,
}

/// Theme settings: menus, footer, edit link, search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Navigation bar, as authored.
    pub nav: Vec<NavEntryConfig>,
    /// Author shown in the theme, when it differs from the site author.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Sidebar sections keyed by URL path prefix.
    pub sidebar: BTreeMap<String, Vec<SidebarSection>>,
    pub social_links: Vec<SocialLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_link: Option<EditLinkConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<FooterConfig>,
    /// Labels of the previous/next links under each page.
    pub doc_footer: DocFooterConfig,
    pub last_updated_text: String,
    pub aside: AsidePosition,
    pub search: SearchConfig,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            nav: Vec::new(),
            author: None,
            sidebar: BTreeMap::new(),
            social_links: Vec::new(),
            edit_link: None,
            footer: None,
            doc_footer: DocFooterConfig::default(),
            last_updated_text: "Last updated".to_string(),
            aside: AsidePosition::default(),
            search: SearchConfig::default(),
        }
    }
}

/// A navigation bar entry in its authored form.
///
/// Exactly one of `link` and `items` must be set; this is checked when the
/// entry is converted into a [`NavEntry`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavEntryConfig {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_match: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<NavEntryConfig>>,
}

impl NavEntryConfig {
    /// Convert into the tagged form. `location` names the entry in error
    /// messages, e.g. `theme.nav[1].items[0]`.
    pub fn to_entry(&self, location: &str, nested: bool) -> Result<NavEntry, ConfigError> {
        match (&self.link, &self.items) {
            (None, None) => Err(ConfigError::EmptyNavEntry(location.to_string())),
            (Some(_), Some(_)) => Err(ConfigError::AmbiguousNavEntry(location.to_string())),
            (Some(link), None) => {
                if self.text.trim().is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "{location}: nav link needs text"
                    )));
                }
                if link.trim().is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "{location}: nav link must not be empty"
                    )));
                }
                if let Some(pattern) = &self.active_match
                    && !pattern.starts_with('/')
                {
                    return Err(ConfigError::Validation(format!(
                        "{location}: active_match {pattern:?} must be a path starting with '/'"
                    )));
                }
                Ok(NavEntry::Link {
                    text: self.text.clone(),
                    link: link.clone(),
                    active_match: self.active_match.clone(),
                })
            }
            (None, Some(items)) => {
                if !nested && self.text.trim().is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "{location}: top-level nav group needs text"
                    )));
                }
                if self.active_match.is_some() {
                    return Err(ConfigError::Validation(format!(
                        "{location}: active_match only applies to links"
                    )));
                }
                if items.is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "{location}: nav group has no items"
                    )));
                }
                let items = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| item.to_entry(&format!("{location}.items[{i}]"), true))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(NavEntry::Group {
                    text: self.text.clone(),
                    items,
                })
            }
        }
    }
}

/// "Edit this page" link settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditLinkConfig {
    /// URL with a `:path` placeholder for the document's relative path.
    pub pattern: String,
    #[serde(default = "default_edit_link_text")]
    pub text: String,
}

fn default_edit_link_text() -> String {
    "Edit this page".to_string()
}

impl EditLinkConfig {
    /// Substitute `:path` with a content-root-relative document path such as
    /// `handbook/react/chapter_1.md`.
    pub fn url_for(&self, relative_path: &str) -> String {
        self.pattern
            .replace(":path", relative_path.trim_start_matches('/'))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FooterConfig {
    pub message: String,
    pub copyright: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocFooterConfig {
    pub prev: String,
    pub next: String,
}

impl Default for DocFooterConfig {
    fn default() -> Self {
        Self {
            prev: "Previous page".to_string(),
            next: "Next page".to_string(),
        }
    }
}

/// Where the on-page outline is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AsidePosition {
    Left,
    #[default]
    Right,
    Hidden,
}

/// Search provider selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum SearchConfig {
    /// In-browser index built from the site's own pages.
    #[default]
    Local,
    /// Hosted DocSearch index.
    Algolia {
        app_id: String,
        api_key: String,
        index_name: String,
    },
}

impl SiteConfig {
    /// Validate the whole configuration: scalar settings, every nav entry,
    /// and every sidebar prefix and link.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base.starts_with('/') || !self.base.ends_with('/') {
            return Err(ConfigError::Validation(format!(
                "base {:?} must start and end with '/'",
                self.base
            )));
        }
        if self.lang.trim().is_empty() {
            return Err(ConfigError::Validation("lang must not be empty".into()));
        }
        if let Some(edit_link) = &self.theme.edit_link
            && !edit_link.pattern.contains(":path")
        {
            return Err(ConfigError::Validation(
                "theme.edit_link.pattern must contain the :path placeholder".into(),
            ));
        }
        if let SearchConfig::Algolia {
            app_id,
            api_key,
            index_name,
        } = &self.theme.search
            && [app_id, api_key, index_name].iter().any(|v| v.is_empty())
        {
            return Err(ConfigError::Validation(
                "theme.search: algolia needs app_id, api_key and index_name".into(),
            ));
        }
        for (i, head) in self.head.iter().enumerate() {
            if head.tag.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "head[{i}]: tag must not be empty"
                )));
            }
        }
        for (i, social) in self.theme.social_links.iter().enumerate() {
            if social.link.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "theme.social_links[{i}]: link must not be empty"
                )));
            }
        }
        self.nav_entries()?;
        self.sidebar_map()?;
        Ok(())
    }

    /// The navigation bar in tagged form.
    pub fn nav_entries(&self) -> Result<Vec<NavEntry>, ConfigError> {
        self.theme
            .nav
            .iter()
            .enumerate()
            .map(|(i, entry)| entry.to_entry(&format!("theme.nav[{i}]"), false))
            .collect()
    }

    /// The sidebar map, sorted for longest-prefix lookup.
    pub fn sidebar_map(&self) -> Result<SidebarMap, ConfigError> {
        for (prefix, sections) in &self.theme.sidebar {
            for (i, section) in sections.iter().enumerate() {
                for (j, link) in section.items.iter().enumerate() {
                    if link.text.trim().is_empty() || link.link.trim().is_empty() {
                        return Err(ConfigError::Validation(format!(
                            "theme.sidebar.{prefix:?}[{i}].items[{j}]: text and link must not be empty"
                        )));
                    }
                }
            }
        }
        SidebarMap::new(
            self.theme
                .sidebar
                .iter()
                .map(|(prefix, sections)| (prefix.clone(), sections.clone())),
        )
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Sidebar entries contributed by one `sidebar/*.toml` file.
#[derive(Debug, Clone)]
pub struct SidebarFragment {
    pub path: PathBuf,
    pub sidebar: BTreeMap<String, Vec<SidebarSection>>,
}

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer that user overrides are merged on top of.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely, so an authored
///   `nav` array replaces the stock one rather than extending it.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load every `sidebar/*.toml` under `root`, sorted by file name.
///
/// A missing `sidebar/` directory yields no fragments.
pub fn load_sidebar_fragments(root: &Path) -> Result<Vec<SidebarFragment>, ConfigError> {
    fragment_files(root)?
        .into_iter()
        .map(|path| {
            let content = fs::read_to_string(&path)?;
            let sidebar = toml::from_str(&content)
                .map_err(|e| ConfigError::Fragment(path.clone(), e))?;
            Ok(SidebarFragment { path, sidebar })
        })
        .collect()
}

/// Paths of the `sidebar/*.toml` fragment files under `root`, sorted.
pub fn fragment_files(root: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let dir = root.join(SIDEBAR_DIR);
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files: Vec<PathBuf> = fs::read_dir(&dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .map(|e| e.eq_ignore_ascii_case("toml"))
                    .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Fold fragments into `config.theme.sidebar`. A prefix may be defined only
/// once across `config.toml` and all fragments.
pub fn merge_sidebar_fragments(
    config: &mut SiteConfig,
    fragments: Vec<SidebarFragment>,
) -> Result<(), ConfigError> {
    for fragment in fragments {
        let origin = fragment
            .path
            .file_name()
            .map(|n| format!("{SIDEBAR_DIR}/{}", n.to_string_lossy()))
            .unwrap_or_else(|| fragment.path.display().to_string());
        for (prefix, sections) in fragment.sidebar {
            if config.theme.sidebar.contains_key(&prefix) {
                return Err(ConfigError::DuplicateSidebarPrefix { prefix, origin });
            }
            config.theme.sidebar.insert(prefix, sections);
        }
    }
    Ok(())
}

/// Merge an optional overlay onto a base value, fold in sidebar fragments,
/// then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
    fragments: Vec<SidebarFragment>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let mut config: SiteConfig = merged.try_into()?;
    merge_sidebar_fragments(&mut config, fragments)?;
    config.validate()?;
    Ok(config)
}

/// Load the site configuration from a content root.
///
/// Merges `config.toml` on top of stock defaults, folds in `sidebar/*.toml`,
/// rejects unknown keys, and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    let fragments = load_sidebar_fragments(root)?;
    tracing::debug!(
        root = %root.display(),
        has_config = overlay.is_some(),
        fragments = fragments.len(),
        "Loading site configuration"
    );
    resolve_config(base, overlay, fragments)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# docnav Configuration
# ====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Sidebars may also live in sidebar/*.toml next to this file. Each sidebar
# prefix may be defined only once across all files.
# Unknown keys will cause an error.

title = "Docs"
description = ""
# author = "someone"

# Path the site is deployed under. Must start and end with "/".
base = "/"

lang = "en-US"

# Show a "last updated" timestamp on pages.
last_updated = false

# Report links to missing documents as warnings instead of errors.
ignore_dead_links = false

# Extra <head> tags, passed through to the renderer.
head = []
# [[head]]
# tag = "link"
# attrs = { rel = "preconnect", href = "https://fonts.gstatic.com", crossorigin = "" }

[markdown]
# Number the lines of fenced code blocks.
line_numbers = false

# ---------------------------------------------------------------------------
# Theme
# ---------------------------------------------------------------------------
[theme]
last_updated_text = "Last updated"
# author = "someone"

# Outline position: "left", "right" or "hidden".
aside = "right"

# Navigation bar. An entry has either `link` (direct link) or `items`
# (dropdown). `active_match` is a path prefix used for highlighting.
nav = []
# [[theme.nav]]
# text = "Guide"
# link = "/guide/"
# active_match = "/guide/"

# Social icon links.
social_links = []
# [[theme.social_links]]
# icon = "github"
# link = "https://github.com/someone"

# Sidebars keyed by URL path prefix. The longest matching prefix wins.
# [[theme.sidebar."/guide/"]]
# text = "Guide"
# items = [{ text = "Introduction", link = "/guide/" }]

# Labels of the previous/next links under each page.
[theme.doc_footer]
prev = "Previous page"
next = "Next page"

# "Edit this page" link. :path is replaced by the document's path.
# [theme.edit_link]
# pattern = "https://github.com/someone/site/edit/main/docs/:path"
# text = "Edit this page"

# [theme.footer]
# message = ""
# copyright = ""

# Search provider: "local", or "algolia" with app_id, api_key, index_name.
[theme.search]
provider = "local"
"##
}
