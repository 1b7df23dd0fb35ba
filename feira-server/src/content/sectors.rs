//! Exhibitor sector removals
//!
//! Both operations return the upload paths that are no longer referenced so
//! the caller can delete them after the document is saved.

use shared::error::{AppError, AppResult};
use shared::models::{HomeDocument, MIN_PROTECTED_SECTORS};

/// Remove one logo from sector `setor`
///
/// Returns the logo path when it was part of the sector, `None` when the
/// sector did not hold it.
pub fn remove_logo(doc: &mut HomeDocument, setor: usize, logo: &str) -> AppResult<Option<String>> {
    let sector = doc
        .sector_mut(setor)
        .ok_or_else(|| AppError::sector_not_found(setor))?;
    let before = sector.logos.len();
    sector.logos.retain(|l| l != logo);
    let removed = sector.logos.len() != before;
    Ok(removed.then(|| logo.to_string()))
}

/// Remove sector `setor`, shifting every later sector down by one
///
/// Sectors 1..=4 are protected. Returns the removed sector's logos.
pub fn remove_sector(doc: &mut HomeDocument, setor: usize) -> AppResult<Vec<String>> {
    if setor <= MIN_PROTECTED_SECTORS {
        return Err(AppError::sector_protected(setor));
    }
    if doc.sector(setor).is_none() {
        return Err(AppError::sector_not_found(setor));
    }
    let removed = doc.sectors.remove(setor - 1);
    doc.normalize_sectors();
    Ok(removed.logos)
}
