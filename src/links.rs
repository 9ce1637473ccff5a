//! Dead-link detection.
//!
//! Every internal link the site configuration declares (nav bar and every
//! sidebar) must point at a document in the content tree. Links inside the
//! markdown documents themselves are checked the same way, with relative
//! links resolved against the linking document.
//!
//! Whether a dead link is fatal is a policy decision made by [`enforce`]:
//! with `ignore_dead_links` set, dead links are logged as warnings and the
//! check passes.

use crate::paths;
use crate::resolve::SiteResolver;
use crate::types::is_external;
use pulldown_cmark::{Event, Parser, Tag};
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Directory names never treated as content.
const SKIP_DIRS: &[&str] = &["node_modules", "dist"];

/// Static files served verbatim from here (favicons, PDFs, images).
const PUBLIC_DIR: &str = "public";

#[derive(Error, Debug)]
pub enum LinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Content walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("{} dead link(s):\n{}", .0.len(), format_dead_links(.0))]
    DeadLinks(Vec<DeadLink>),
}

fn format_dead_links(dead: &[DeadLink]) -> String {
    dead.iter()
        .map(|d| format!("    {d}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Where a checked link was declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOrigin {
    Nav,
    Sidebar { prefix: String },
    Document { file: PathBuf },
}

impl fmt::Display for LinkOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkOrigin::Nav => write!(f, "nav"),
            LinkOrigin::Sidebar { prefix } => write!(f, "sidebar {prefix}"),
            LinkOrigin::Document { file } => write!(f, "{}", file.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadLink {
    pub link: String,
    pub origin: LinkOrigin,
}

impl fmt::Display for DeadLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (in {})", self.link, self.origin)
    }
}

/// The set of pages that exist, discovered from markdown files on disk.
#[derive(Debug)]
pub struct ContentTree {
    root: PathBuf,
    /// Content-root-relative markdown files, sorted.
    documents: Vec<PathBuf>,
    /// Canonical page paths of `documents`.
    pages: BTreeSet<String>,
}

impl ContentTree {
    /// Walk `root` for `.md` files, skipping hidden entries, the sidebar
    /// fragment directory, and build output.
    pub fn scan(root: &Path) -> Result<Self, LinkError> {
        let mut documents = Vec::new();
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_skipped(e.file_name().to_string_lossy().as_ref()));

        for entry in walker {
            let entry = entry?;
            let path = entry.path();
            let is_markdown = entry.file_type().is_file()
                && path
                    .extension()
                    .map(|e| e.eq_ignore_ascii_case("md"))
                    .unwrap_or(false);
            if !is_markdown {
                continue;
            }
            if let Ok(rel) = path.strip_prefix(root) {
                documents.push(rel.to_path_buf());
            }
        }

        Ok(Self::from_documents(root, documents))
    }

    /// Build a tree from an already known document list.
    pub fn from_documents(root: &Path, documents: Vec<PathBuf>) -> Self {
        let pages = documents
            .iter()
            .map(|doc| paths::canonical(&paths::page_path(doc)))
            .collect();
        Self {
            root: root.to_path_buf(),
            documents,
            pages,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn documents(&self) -> &[PathBuf] {
        &self.documents
    }

    /// Page paths of every document, in document order.
    pub fn page_paths(&self) -> Vec<String> {
        self.documents.iter().map(|d| paths::page_path(d)).collect()
    }

    /// Whether an absolute internal link resolves to something that exists:
    /// a document, or a static file under the root or `public/`.
    pub fn contains(&self, link: &str) -> bool {
        let target = link.split(['?', '#']).next().unwrap_or_default();
        if target.is_empty() {
            return true;
        }
        if has_static_extension(target) {
            let rel = target.trim_start_matches('/');
            return self.root.join(rel).is_file() || self.root.join(PUBLIC_DIR).join(rel).is_file();
        }
        self.pages.contains(&paths::canonical(target))
    }
}

fn is_skipped(name: &str) -> bool {
    name.starts_with('.') || name == crate::config::SIDEBAR_DIR || SKIP_DIRS.contains(&name)
}

fn has_static_extension(target: &str) -> bool {
    let last = target.rsplit('/').next().unwrap_or_default();
    match last.rsplit_once('.') {
        Some((stem, ext)) => !stem.is_empty() && ext != "html" && ext != "md",
        None => false,
    }
}

/// Dead links declared by the nav bar and sidebars.
pub fn check_config_links(resolver: &SiteResolver, tree: &ContentTree) -> Vec<DeadLink> {
    let mut dead = Vec::new();

    for entry in resolver.resolve_nav("/") {
        for link in entry.links() {
            if !is_external(link) && !tree.contains(link) {
                dead.push(DeadLink {
                    link: link.to_string(),
                    origin: LinkOrigin::Nav,
                });
            }
        }
    }

    let mut sidebars: Vec<_> = resolver.sidebar_map().iter().collect();
    sidebars.sort_by_key(|(prefix, _)| *prefix);
    for (prefix, sections) in sidebars {
        for link in sections.iter().flat_map(|s| s.items.iter()) {
            if !is_external(&link.link) && !tree.contains(&link.link) {
                dead.push(DeadLink {
                    link: link.link.clone(),
                    origin: LinkOrigin::Sidebar {
                        prefix: prefix.to_string(),
                    },
                });
            }
        }
    }

    dead
}

/// Dead links inside the markdown documents.
pub fn check_document_links(tree: &ContentTree) -> Result<Vec<DeadLink>, LinkError> {
    let mut dead = Vec::new();
    for doc in tree.documents() {
        let content = fs::read_to_string(tree.root().join(doc))?;
        let page = paths::page_path(doc);
        for link in markdown_links(&content) {
            let absolute = paths::resolve_relative(&page, &link);
            if !tree.contains(&absolute) {
                dead.push(DeadLink {
                    link,
                    origin: LinkOrigin::Document { file: doc.clone() },
                });
            }
        }
    }
    Ok(dead)
}

/// Internal link destinations in a markdown document, in order.
fn markdown_links(content: &str) -> Vec<String> {
    Parser::new(content)
        .filter_map(|event| match event {
            Event::Start(Tag::Link { dest_url, .. }) => Some(dest_url.into_string()),
            _ => None,
        })
        .filter(|url| !url.is_empty() && !url.starts_with('#') && !is_external(url))
        .collect()
}

/// Every dead link: configuration first, then documents.
pub fn check_links(resolver: &SiteResolver, tree: &ContentTree) -> Result<Vec<DeadLink>, LinkError> {
    let mut dead = check_config_links(resolver, tree);
    dead.extend(check_document_links(tree)?);
    Ok(dead)
}

/// Scan the content tree under `root` and collect every dead link.
pub fn scan_site(resolver: &SiteResolver, root: &Path) -> Result<SiteReport, LinkError> {
    let tree = ContentTree::scan(root)?;
    let dead_links = check_links(resolver, &tree)?;
    Ok(SiteReport {
        document_count: tree.documents().len(),
        page_paths: tree.page_paths(),
        dead_links,
    })
}

/// Scan, then apply the dead-link policy.
///
/// Every command that produces pages for a renderer goes through this, so a
/// site with dead links fails unless `ignore_dead_links` is set.
pub fn verify_site(
    resolver: &SiteResolver,
    root: &Path,
    ignore_dead_links: bool,
) -> Result<SiteReport, LinkError> {
    scan_site(resolver, root)?.enforce(ignore_dead_links)
}

/// Content tree summary with the dead links found in it.
#[derive(Debug)]
pub struct SiteReport {
    pub document_count: usize,
    /// Page path of every document, in document order.
    pub page_paths: Vec<String>,
    pub dead_links: Vec<DeadLink>,
}

impl SiteReport {
    /// Apply [`enforce`] to the dead links. On success the kept links are
    /// the ones demoted to warnings.
    pub fn enforce(self, ignore_dead_links: bool) -> Result<Self, LinkError> {
        Ok(Self {
            dead_links: enforce(self.dead_links, ignore_dead_links)?,
            ..self
        })
    }
}

/// Apply the dead-link policy.
///
/// With `ignore_dead_links`, each dead link is logged as a warning and
/// returned; otherwise any dead link is an error.
pub fn enforce(dead: Vec<DeadLink>, ignore_dead_links: bool) -> Result<Vec<DeadLink>, LinkError> {
    if dead.is_empty() {
        return Ok(dead);
    }
    if ignore_dead_links {
        for d in &dead {
            tracing::warn!(link = %d.link, origin = %d.origin, "Dead link");
        }
        Ok(dead)
    } else {
        Err(LinkError::DeadLinks(dead))
    }
}
