//! Static site export.
//!
//! # Architecture
//!
//! ```text
//! build_site()
//!     │
//!     ├── collect_pages()     content/*.toml, or the built-in pages
//!     │
//!     ├── prepare_output()    optional clean, create <output>/<base_path>
//!     │
//!     ├── render + write      one page per rayon task
//!     │       │
//!     │       └── render_page() → minify_html() → page_path()
//!     │
//!     └── style.css
//! ```

use crate::{
    citation::Bibliography,
    config::SiteConfig,
    log,
    page::{Page, builtin_pages, load_pages},
    render::{PageLink, STYLESHEET, page_url, render_page},
    utils::minify::minify_html,
};
use anyhow::{Context, Result, anyhow, bail};
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, Ordering},
};

/// Build the entire site.
///
/// Returns the paths of the written pages, in page order.
/// If `config.build.clean` is true, clears the entire output directory first.
pub fn build_site(config: &SiteConfig) -> Result<Vec<PathBuf>> {
    let pages = collect_pages(config)?;
    let bib = Bibliography::builtin().context("Invalid built-in bibliography")?;
    let site_dir = config.site_dir();

    prepare_output(&config.build.output, &site_dir, config.build.clean)?;

    let links: Vec<PageLink> = pages
        .iter()
        .filter(|page| !page.is_index())
        .map(|page| PageLink {
            title: page.title.clone(),
            url: page_url(&page.slug, config),
        })
        .collect();

    log!("build"; "rendering {} pages, {} references available...", pages.len(), bib.len());
    let has_error = AtomicBool::new(false);

    let written = pages
        .par_iter()
        .map(|page| {
            if has_error.load(Ordering::Relaxed) {
                return Err(anyhow!("Aborted"));
            }
            write_page(page, &bib, config, &links).map_err(|e| {
                if !has_error.swap(true, Ordering::Relaxed) {
                    log!("error"; "{}: {:#}", display_slug(page), e);
                }
                anyhow!("Build failed")
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let stylesheet = site_dir.join("style.css");
    fs::write(&stylesheet, STYLESHEET)
        .with_context(|| format!("Failed to write {}", stylesheet.display()))?;

    log!("build"; "done, {} pages in {}", written.len(), site_dir.display());
    Ok(written)
}

/// Pages from the content directory when it exists, otherwise the built-in ones.
fn collect_pages(config: &SiteConfig) -> Result<Vec<Page>> {
    let content = &config.build.content;
    let pages = if content.is_dir() {
        log!("build"; "loading pages from {}", content.display());
        load_pages(content)?
    } else {
        builtin_pages()?
    };

    if pages.is_empty() {
        bail!("No pages found in {}", content.display());
    }

    let mut slugs = FxHashSet::default();
    for page in &pages {
        if !slugs.insert(page.slug.as_str()) {
            bail!("Two pages share the slug `{}`", display_slug(page));
        }
    }

    Ok(pages)
}

/// Clear the output directory if asked, then make sure the site directory exists.
fn prepare_output(output: &Path, site_dir: &Path, clean: bool) -> Result<()> {
    if clean && output.exists() {
        fs::remove_dir_all(output)
            .with_context(|| format!("Failed to clear output directory: {}", output.display()))?;
    }
    fs::create_dir_all(site_dir)
        .with_context(|| format!("Failed to create {}", site_dir.display()))
}

fn write_page(
    page: &Page,
    bib: &Bibliography,
    config: &SiteConfig,
    links: &[PageLink],
) -> Result<PathBuf> {
    let html = render_page(page, bib, config, links);
    let html = minify_html(html.as_bytes(), config);

    let path = page_path(&config.site_dir(), &page.slug, config.build.trailing_slash);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, &*html).with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(path)
}

/// Output file of a page.
///
/// | slug | trailing_slash | Path |
/// |------|----------------|------|
/// | `""` | any | `site/index.html` |
/// | `essay` | true | `site/essay/index.html` |
/// | `essay` | false | `site/essay.html` |
pub fn page_path(site_dir: &Path, slug: &str, trailing_slash: bool) -> PathBuf {
    match (slug.is_empty(), trailing_slash) {
        (true, _) => site_dir.join("index.html"),
        (false, true) => site_dir.join(slug).join("index.html"),
        (false, false) => site_dir.join(format!("{slug}.html")),
    }
}

fn display_slug(page: &Page) -> &str {
    if page.is_index() { "index" } else { &page.slug }
}
