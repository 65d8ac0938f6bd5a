use vigil_core::models::result::ResolvedBand;
use vigil_core::models::schema::Band;

/// Map a value onto the first band whose inclusive range contains it.
///
/// Bands are checked in declaration order, so overlapping tables resolve to
/// the earliest entry. No match, an empty table or a non-finite value all
/// yield the empty band.
pub fn resolve(value: f64, bands: &[Band]) -> ResolvedBand {
    if !value.is_finite() {
        return ResolvedBand::empty();
    }
    bands
        .iter()
        .find(|band| band.contains(value))
        .map(|band| ResolvedBand {
            label: band.label.clone(),
            level: band.level.clone(),
        })
        .unwrap_or_default()
}

/// Like [`resolve`], but nothing answered means no band at all.
pub fn resolve_answered(value: f64, bands: &[Band], answered: u32) -> ResolvedBand {
    if answered == 0 {
        ResolvedBand::empty()
    } else {
        resolve(value, bands)
    }
}
