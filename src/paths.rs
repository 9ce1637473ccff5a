//! URL path and document path conversions.
//!
//! Page paths are what the sidebar and nav link to: they start with `/`, have
//! no `.md` extension, and a directory's `index.md` is addressed by its
//! directory path with a trailing slash.
//!
//! ```text
//! index.md                        →  /
//! handbook/vue/index.md           →  /handbook/vue/
//! handbook/react/chapter_1.md     →  /handbook/react/chapter_1
//! ```

use std::path::Path;

/// Turn a raw request into a page path: drop query and fragment, strip the
/// deployment base, guarantee a leading slash.
pub fn normalize_request(raw: &str, base: &str) -> String {
    let path = raw.split(['?', '#']).next().unwrap_or_default();

    let path = if base != "/" {
        let bare_base = base.trim_end_matches('/');
        if path == bare_base {
            ""
        } else {
            path.strip_prefix(bare_base)
                .filter(|rest| rest.starts_with('/'))
                .unwrap_or(path)
        }
    } else {
        path
    };

    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// Page path for a markdown file relative to the content root.
pub fn page_path(relative: &Path) -> String {
    let rel = relative.to_string_lossy().replace('\\', "/");
    let stem = rel.strip_suffix(".md").unwrap_or(&rel);
    let stem = strip_index(stem);
    format!("/{stem}")
}

/// Canonical form used to decide whether two links address the same page.
///
/// `/a/index`, `/a/index.html` and `/a/` are the same page; `/a/b.html`
/// and `/a/b` are the same page.
pub fn canonical(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let path = path
        .strip_suffix(".html")
        .or_else(|| path.strip_suffix(".md"))
        .unwrap_or(path);
    let path = path.strip_prefix('/').unwrap_or(path);
    format!("/{}", strip_index(path))
}

pub fn same_page(a: &str, b: &str) -> bool {
    canonical(a) == canonical(b)
}

/// The content-root-relative markdown file a page path is served from.
pub fn document_file(page: &str) -> String {
    let canonical = canonical(page);
    let rel = canonical.trim_start_matches('/');
    if rel.is_empty() || rel.ends_with('/') {
        format!("{rel}index.md")
    } else {
        format!("{rel}.md")
    }
}

/// Resolve a link found in the document at `from_page` to an absolute page
/// path. Absolute links come back unchanged apart from `.`/`..` folding.
pub fn resolve_relative(from_page: &str, link: &str) -> String {
    let joined = if link.starts_with('/') {
        link.to_string()
    } else {
        let dir = match from_page.rfind('/') {
            Some(idx) => &from_page[..=idx],
            None => "/",
        };
        format!("{dir}{link}")
    };

    let trailing = joined.ends_with('/') || joined.ends_with("/.") || joined.ends_with("/..");
    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let mut out = format!("/{}", segments.join("/"));
    if trailing && out != "/" {
        out.push('/');
    }
    out
}

fn strip_index(path: &str) -> &str {
    if path == "index" {
        ""
    } else {
        path.strip_suffix("/index")
            .map(|dir| &path[..=dir.len()])
            .unwrap_or(path)
    }
}
