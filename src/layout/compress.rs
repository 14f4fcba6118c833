use std::collections::HashSet;

use super::types::{LayoutUnit, UnitMembers};

const EPSILON: f32 = 1e-6;

/// Pulls pinned single units back toward their desired left edge by
/// shrinking the gaps to their left, nearest first, never below `min_gap`.
///
/// `units` must already be swept. Every unit from the shrunk gap rightwards
/// moves with the pinned one, so ordering and the floor are preserved.
pub(super) fn compress_gaps(units: &mut [LayoutUnit], pinned: &HashSet<usize>, min_gap: f32) {
    for idx in 0..units.len() {
        let UnitMembers::Single(member) = units[idx].members else {
            continue;
        };
        if !pinned.contains(&member) {
            continue;
        }
        let mut shift_needed = units[idx].left - units[idx].desired_left();
        if shift_needed <= EPSILON {
            continue;
        }
        for j in (0..idx).rev() {
            let gap = units[j + 1].left - units[j].right();
            let reducible = gap - min_gap;
            if reducible <= EPSILON {
                continue;
            }
            let take = reducible.min(shift_needed);
            for unit in &mut units[j + 1..] {
                unit.left -= take;
            }
            tracing::trace!(unit = idx, gap = j, take, "compressed unit gap");
            shift_needed -= take;
            if shift_needed <= EPSILON {
                break;
            }
        }
    }
}
