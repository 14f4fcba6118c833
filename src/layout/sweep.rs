use std::cmp::Ordering;

use crate::config::LayoutConfig;

use super::types::{LayoutUnit, UnitMembers};

/// Orders units by anchor, then by their earliest member in the input.
pub(super) fn sort_units(units: &mut [LayoutUnit]) {
    units.sort_by(|a, b| {
        a.anchor
            .partial_cmp(&b.anchor)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.min_order().cmp(&b.min_order()))
    });
}

/// Single left-to-right pass: each unit sits at its desired left edge unless
/// the previous unit plus `unit_gap` pushes it further right.
pub(super) fn sweep(units: &mut [LayoutUnit], unit_gap: f32) {
    let mut cursor: Option<f32> = None;
    for unit in units.iter_mut() {
        let desired = unit.desired_left();
        let left = match cursor {
            Some(cursor) => desired.max(cursor),
            None => desired,
        };
        unit.left = left;
        cursor = Some(left + unit.width + unit_gap);
    }
}

/// Writes member centers for every unit into `xs`.
pub(super) fn write_member_positions(
    units: &[LayoutUnit],
    config: &LayoutConfig,
    xs: &mut [Option<f32>],
) {
    for unit in units {
        match unit.members {
            UnitMembers::Single(idx) => {
                xs[idx] = Some(unit.left + unit.width / 2.0);
            }
            UnitMembers::Couple(left, right) => {
                let left_x = unit.left + config.symbol_size / 2.0;
                xs[left] = Some(left_x);
                xs[right] = Some(left_x + config.couple_offset());
            }
        }
    }
}
