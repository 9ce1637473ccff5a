//! # docnav
//!
//! Navigation bar and sidebar resolution for a static documentation site.
//! The site declares its menus in TOML; for any requested page path, docnav
//! returns the navigation bar and the sidebar that apply. Rendering is left
//! to an external static-site generator, which consumes the result as-is.
//!
//! # Architecture: Load Once, Resolve Many
//!
//! ```text
//! 1. Load     docs/config.toml + docs/sidebar/*.toml  →  SiteConfig   (may fail)
//! 2. Build    SiteConfig                               →  SiteResolver (may fail)
//! 3. Resolve  SiteResolver + page path                 →  nav, sidebar (never fails)
//! ```
//!
//! Every error is raised in steps 1 and 2. A resolver that was built can
//! answer every request, so a misconfigured site fails at startup instead of
//! rendering some pages and not others.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.toml` and sidebar fragment loading, merging over stock defaults, validation |
//! | [`types`] | Validated shapes handed to the renderer (`NavEntry`, `SidebarSection`, `SidebarLink`) |
//! | [`resolve`] | `SiteResolver`: longest-prefix sidebar lookup, nav, active entry, prev/next, edit link |
//! | [`paths`] | Request normalization and document file ↔ page path conversion |
//! | [`links`] | Dead-link detection against the content tree |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Tagged Nav Entries
//!
//! An authored nav entry has `link` or `items`. Field presence is checked
//! once, at load time, and the entry becomes a [`types::NavEntry::Link`] or
//! [`types::NavEntry::Group`]. Everything downstream matches on the variant.
//!
//! ## Longest Prefix Wins
//!
//! Sidebar keys like `/handbook/` and `/handbook/react/` overlap. The map is
//! sorted by descending key length when it is built, so the first key that
//! is a prefix of the page path is the most specific one.
//!
//! ## No Global State
//!
//! The resolver is a plain value passed by reference. It is `Send + Sync`,
//! and [`resolve::SiteResolver::pages`] resolves many pages in parallel.

pub mod config;
pub mod links;
pub mod output;
pub mod paths;
pub mod resolve;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
