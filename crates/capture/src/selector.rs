//! Preview and still-capture size selection.

use {
    crate::{AspectMatch, AspectRatioPolicy, Resolution},
    base::Vec2,
};

/// Which rule produced a [`SizeSelection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    /// Smallest qualifying size that covers the desired viewport.
    BigEnough,
    /// Largest qualifying size, none covered the viewport.
    NotBigEnough,
    /// Nothing qualified; the first candidate was taken as-is.
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeSelection {
    pub resolution: Resolution,
    pub kind: SelectionKind,
}

impl SizeSelection {
    pub fn is_fallback(&self) -> bool {
        self.kind == SelectionKind::Fallback
    }
}

// Both reductions keep the first of equal areas, so results only depend on input order.
fn min_area(sizes: impl IntoIterator<Item = Resolution>) -> Option<Resolution> {
    sizes
        .into_iter()
        .reduce(|best, r| if r.area() < best.area() { r } else { best })
}

fn max_area(sizes: impl IntoIterator<Item = Resolution>) -> Option<Resolution> {
    sizes
        .into_iter()
        .reduce(|best, r| if r.area() > best.area() { r } else { best })
}

/// Largest candidate by area, first one wins on ties.
pub fn largest(candidates: &[Resolution]) -> Option<Resolution> {
    max_area(candidates.iter().copied())
}

/// Keep the candidates whose ratio matches `policy`.
///
/// An unset policy keeps everything. If nothing matches, the unfiltered list
/// is returned so capture can still proceed.
pub fn filter_aspect(candidates: &[Resolution], policy: &AspectRatioPolicy) -> Vec<Resolution> {
    if !policy.is_set() {
        return candidates.to_vec();
    }
    let matching: Vec<Resolution> = candidates
        .iter()
        .copied()
        .filter(|r| policy.classify(r.ratio()) == AspectMatch::Match)
        .collect();
    if matching.is_empty() && !candidates.is_empty() {
        log::warn!(
            "No supported size matches aspect ratio {:?} ± {}, ignoring the aspect filter",
            policy.ratio(),
            policy.tolerance()
        );
        return candidates.to_vec();
    }
    matching
}

/// Choose the preview size for a `desired` viewport, bounded by `max`.
///
/// Candidates qualify when they fit within `max` and pass the aspect check
/// (`policy` if set, otherwise the exact ratio of `reference`). Among those,
/// the smallest that covers `desired` wins; failing that, the largest. If
/// nothing qualifies the first candidate is returned as a
/// [`SelectionKind::Fallback`]. Returns `None` only for an empty slice.
pub fn choose_optimal(
    candidates: &[Resolution],
    desired: Vec2<u32>,
    max: Vec2<u32>,
    reference: &Resolution,
    policy: &AspectRatioPolicy,
) -> Option<SizeSelection> {
    let mut big_enough = Vec::new();
    let mut not_big_enough = Vec::new();
    for option in candidates {
        if option.fits_within(max) && policy.accepts(option, reference) {
            if option.covers(desired) {
                big_enough.push(*option);
            } else {
                not_big_enough.push(*option);
            }
        }
    }

    if let Some(resolution) = min_area(big_enough) {
        return Some(SizeSelection {
            resolution,
            kind: SelectionKind::BigEnough,
        });
    }
    if let Some(resolution) = max_area(not_big_enough) {
        return Some(SizeSelection {
            resolution,
            kind: SelectionKind::NotBigEnough,
        });
    }

    // TODO: the first candidate may not even pass the aspect check; consider
    // falling back to the closest-ratio candidate instead.
    let resolution = *candidates.first()?;
    log::warn!(
        "Couldn't find any suitable preview size, returning default size -> {}",
        resolution
    );
    Some(SizeSelection {
        resolution,
        kind: SelectionKind::Fallback,
    })
}
