//! Directory page lookups.
//!
//! Directory pages list every group or teacher in `<td>` cells: the display
//! label (sometimes several comma-joined names) and a link to the schedule.

use std::collections::HashSet;

use futures::future;
use scraper::{Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{EntityKind, SourcesConfig};
use crate::parser::page_heading;
use crate::utils::{http::PageSource, resolve_url};

/// One linked cell of a directory page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Names from the cell label, in order
    pub names: Vec<String>,
    /// Absolute URL of the schedule page
    pub url: String,
}

impl DirectoryEntry {
    pub fn lists(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

/// A schedule page found through a directory and checked against its heading.
#[derive(Debug, Clone)]
pub struct ResolvedPage {
    pub url: String,
    pub html: String,
}

/// Finds schedule pages of groups and teachers.
pub struct DirectoryResolver<'a> {
    source: &'a dyn PageSource,
    sources: &'a SourcesConfig,
}

impl<'a> DirectoryResolver<'a> {
    pub fn new(source: &'a dyn PageSource, sources: &'a SourcesConfig) -> Self {
        Self { source, sources }
    }

    /// URL of the schedule page listing `name`, scanning directory pages in
    /// order until the first hit.
    pub async fn find(&self, kind: EntityKind, name: &str) -> Result<String> {
        for directory in self.sources.directories(kind) {
            let html = self.source.fetch(directory).await?;
            let entries = parse_directory(&html, directory)?;
            if let Some(entry) = entries.into_iter().find(|e| e.lists(name)) {
                log::debug!("Found {} on {}: {}", name, directory, entry.url);
                return Ok(entry.url);
            }
        }
        Err(AppError::not_found(name))
    }

    /// Find and fetch the schedule page of `name`, making sure the page
    /// heading names it.
    pub async fn resolve(&self, kind: EntityKind, name: &str) -> Result<ResolvedPage> {
        let url = self.find(kind, name).await?;
        let html = self.source.fetch(&url).await?;

        let heading = page_heading(&html)?.unwrap_or_default();
        if !heading.contains(name) {
            return Err(AppError::LinkMismatch {
                expected: name.to_string(),
                found: heading,
            });
        }
        Ok(ResolvedPage { url, html })
    }

    /// Every linked entry of the directory pages for `kind`.
    pub async fn entries(&self, kind: EntityKind) -> Result<Vec<DirectoryEntry>> {
        let pages = future::try_join_all(self.sources.directories(kind).iter().map(
            |directory| async move {
                let html = self.source.fetch(directory).await?;
                parse_directory(&html, directory)
            },
        ))
        .await?;
        Ok(pages.into_iter().flatten().collect())
    }

    /// Names listed on the directory pages, without duplicates, in page
    /// order. Teacher labels contribute only their first name.
    pub async fn list(&self, kind: EntityKind) -> Result<Vec<String>> {
        let entries = self.entries(kind).await?;
        let mut seen = HashSet::new();
        let names = entries
            .into_iter()
            .flat_map(|entry| match kind {
                EntityKind::Teacher => entry.names.into_iter().take(1).collect::<Vec<_>>(),
                _ => entry.names,
            })
            .filter(|name| seen.insert(name.clone()))
            .collect::<Vec<_>>();
        log::info!("Listed {} {} names", names.len(), kind);
        Ok(names)
    }
}

/// Parse the linked cells of a directory page.
pub fn parse_directory(html: &str, base_url: &str) -> Result<Vec<DirectoryEntry>> {
    let td = Selector::parse("td").map_err(|e| AppError::selector("td", e))?;
    let font = Selector::parse("font").map_err(|e| AppError::selector("font", e))?;
    let link = Selector::parse("a[href]").map_err(|e| AppError::selector("a[href]", e))?;
    let base = Url::parse(base_url)?;

    let document = Html::parse_document(html);
    let entries = document
        .select(&td)
        .filter_map(|cell| {
            let href = cell.select(&link).next()?.value().attr("href")?;

            let mut label: String = cell.select(&font).flat_map(|f| f.text()).collect();
            if label.trim().is_empty() {
                label = cell.text().collect();
            }
            let names: Vec<String> = label
                .split(',')
                .map(|n| n.split_whitespace().collect::<Vec<_>>().join(" "))
                .filter(|n| !n.is_empty())
                .collect();

            (!names.is_empty()).then(|| DirectoryEntry {
                names,
                url: resolve_url(&base, href),
            })
        })
        .collect();
    Ok(entries)
}
