use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use lopdf::Document;
use once_cell::sync::Lazy;
use regex::Regex;

/// One table row: positional cells, `None` where the document leaves a cell
/// blank (merged date cells show up this way).
pub type Row = Vec<Option<String>>;

pub type Table = Vec<Row>;

/// Per-page content handed to the parser: the raw text stream plus the table
/// rows reconstructed from it.
#[derive(Debug, Clone)]
pub struct Page {
    pub text: String,
    pub tables: Vec<Table>,
}

static COLUMNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]{2,}").unwrap());

/// Reads the document and tokenizes every page, in document order.
///
/// The handle is released once this returns; all downstream processing works
/// on the returned pages.
pub fn read_pages(path: &Path) -> Result<Vec<Page>> {
    let document = Document::load(path)
        .with_context(|| format!("impossible d'ouvrir {}", path.display()))?;

    let mut pages = Vec::new();
    for (number, _id) in document.get_pages() {
        let text = document
            .extract_text(&[number])
            .with_context(|| format!("impossible de lire la page {number}"))?;
        let tables = tokenize_tables(&text);
        pages.push(Page { text, tables });
    }

    debug!("read {} page(s) from {}", pages.len(), path.display());
    Ok(pages)
}

// lopdf exposes no cell geometry, so column boundaries are taken to be runs
// of two or more spaces. Lines that are not table rows survive tokenization
// and are discarded by the parser's row validation.
fn tokenize_tables(text: &str) -> Vec<Table> {
    let rows: Table = text.lines().filter_map(tokenize_row).collect();

    if rows.is_empty() {
        Vec::new()
    } else {
        vec![rows]
    }
}

fn tokenize_row(line: &str) -> Option<Row> {
    if line.trim().is_empty() {
        return None;
    }

    let cells: Row = COLUMNS
        .split(line.trim_end())
        .map(|cell| {
            let cell = cell.trim();
            (!cell.is_empty()).then(|| cell.to_string())
        })
        .collect();

    (cells.len() >= 2).then_some(cells)
}
