//! Distance ranking of unselected bindings around the current selection.

use crate::binding::state::{PRIORITY_SELECTED, PRIORITY_UNRANKED};
use crate::foundation::core::{BindingId, Rect};

#[derive(Clone, Copy, Debug)]
pub(crate) struct RankInput {
    pub(crate) binding: BindingId,
    pub(crate) attached: bool,
    pub(crate) rect: Rect,
    pub(crate) previous: u32,
}

/// Smallest rectangle covering every non-empty rectangle. `None` when nothing has area.
pub(crate) fn covering_rect(rects: impl IntoIterator<Item = Rect>) -> Option<Rect> {
    rects
        .into_iter()
        .filter(|r| r.area() > 0.0)
        .reduce(|acc, r| acc.union(r))
}

/// Manhattan distance between centers, normalized by the cover's half extents.
pub(crate) fn distance(rect: Rect, cover: Rect) -> f64 {
    let target = cover.center();
    let center = rect.center();
    let half_w = cover.width() / 2.0;
    let half_h = cover.height() / 2.0;
    (center.x - target.x).abs() / half_w + (center.y - target.y).abs() / half_h
}

/// Compute new priorities: selected bindings get [`PRIORITY_SELECTED`], detached ones
/// [`PRIORITY_UNRANKED`], attached ones ascending ranks from 1 by distance to the selection.
///
/// Without a usable cover (empty selection or zero-area rects) attached bindings keep their
/// relative order from the previous cycle.
pub(crate) fn rank_priorities(
    selection: &[(BindingId, Rect)],
    others: &[RankInput],
) -> Vec<(BindingId, u32)> {
    let cover = covering_rect(selection.iter().map(|(_, r)| *r))
        .filter(|c| c.width() > 0.0 && c.height() > 0.0);

    let mut out = Vec::with_capacity(selection.len() + others.len());
    let mut attached: Vec<(BindingId, f64)> = Vec::new();
    for input in others {
        if !input.attached {
            out.push((input.binding, PRIORITY_UNRANKED));
            continue;
        }
        let key = match cover {
            Some(cover) => distance(input.rect, cover),
            None => f64::from(input.previous),
        };
        attached.push((input.binding, key));
    }

    // Stable: equal distances keep arena order.
    attached.sort_by(|a, b| a.1.total_cmp(&b.1));
    out.extend(
        attached
            .into_iter()
            .enumerate()
            .map(|(i, (binding, _))| (binding, u32::try_from(i + 1).unwrap_or(u32::MAX - 1))),
    );
    out.extend(selection.iter().map(|(b, _)| (*b, PRIORITY_SELECTED)));
    out
}

#[cfg(test)]
#[path = "../../tests/unit/policy/priority.rs"]
mod tests;
