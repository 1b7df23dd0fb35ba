//! Read-side presentation of the home document
//!
//! Fills display defaults the admin page and the public site rely on. The
//! stored document is never modified.

use super::dates::normalize_entries;
use shared::models::{HomeDocument, MIN_PROTECTED_SECTORS};

pub const DEFAULT_EXPOSITOR_TITULO: &str = "O CORAÇÃO DA FEIRA";

/// Default names of the protected sectors, in order
pub const DEFAULT_SECTOR_NAMES: [&str; MIN_PROTECTED_SECTORS] = [
    "ESPAÇO LEGADO",
    "ESPAÇO EVOLUÇÃO",
    "ESPAÇO CONEXÃO",
    "ESPAÇO RAIZ",
];

pub fn present(doc: &HomeDocument) -> HomeDocument {
    let mut view = doc.clone();

    for entries in [&mut view.programacao_online, &mut view.programacao_presencial]
        .into_iter()
        .flatten()
    {
        normalize_entries(entries);
    }

    if view.expositor_titulo.as_deref().is_none_or(str::is_empty) {
        view.expositor_titulo = Some(DEFAULT_EXPOSITOR_TITULO.to_string());
    }

    view.normalize_sectors();
    for (sector, default) in view.sectors.iter_mut().zip(DEFAULT_SECTOR_NAMES) {
        let name = sector
            .texto
            .as_deref()
            .map(collapse_whitespace)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| default.to_string());
        sector.texto = Some(name);
    }

    view
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
