use std::collections::{HashMap, HashSet};

use crate::config::LayoutConfig;
use crate::ir::{Family, Partners, Pedigree};

use super::types::{LayoutUnit, UnitMembers};

/// Read-only view of what the engine knows while placing one generation.
pub(super) struct AnchorContext<'a> {
    pub pedigree: &'a Pedigree,
    pub generation: u32,
    /// Final x of every individual in already-placed generations.
    pub placed_x: &'a [Option<f32>],
    pub config: &'a LayoutConfig,
}

impl AnchorContext<'_> {
    /// Final x of `id` if it sits in the generation directly above.
    fn parent_x(&self, id: &str) -> Option<f32> {
        let idx = self.pedigree.input_order(id)?;
        let parent_generation = self.generation.checked_sub(1)?;
        if self.pedigree.individuals[idx].generation != parent_generation {
            return None;
        }
        self.placed_x[idx]
    }

    fn child_in_generation(&self, id: &str) -> Option<usize> {
        let idx = self.pedigree.input_order(id)?;
        (self.pedigree.individuals[idx].generation == self.generation).then_some(idx)
    }

    /// Parent x when `member` is the only child of a single recorded parent.
    fn sole_child_parent_x(&self, member: usize) -> Option<f32> {
        let id = self.pedigree.individuals[member].id.as_str();
        self.pedigree.families.iter().find_map(|family| match &family.partners {
            Partners::SingleParent { parent }
                if family.children.len() == 1 && family.children[0] == id =>
            {
                self.parent_x(parent)
            }
            _ => None,
        })
    }
}

/// Fills in every unit's anchor and returns the members pinned under a
/// single parent.
///
/// Individuals start anchored at their input index. When `refine` is set,
/// children of a family placed one generation up are spread symmetrically
/// under the parents' midpoint; a lone child of a single parent is pinned to
/// the parent's x instead. Later families overwrite earlier ones.
pub(super) fn resolve_anchors(
    ctx: &AnchorContext<'_>,
    units: &mut [LayoutUnit],
    refine: bool,
) -> HashSet<usize> {
    let mut anchors: HashMap<usize, f32> = units
        .iter()
        .flat_map(|unit| unit.member_indices())
        .map(|idx| (idx, idx as f32))
        .collect();
    let mut pinned = HashSet::new();

    if refine {
        for family in &ctx.pedigree.families {
            match &family.partners {
                Partners::SingleParent { parent } => {
                    let Some(parent_x) = ctx.parent_x(parent) else {
                        continue;
                    };
                    if family.children.len() == 1 {
                        if let Some(child) = ctx.child_in_generation(&family.children[0]) {
                            anchors.insert(child, parent_x);
                            pinned.insert(child);
                        }
                        continue;
                    }
                    spread_children(ctx, family, parent_x, &mut anchors);
                }
                Partners::Couple { a, b, .. } => {
                    let (Some(ax), Some(bx)) = (ctx.parent_x(a), ctx.parent_x(b)) else {
                        continue;
                    };
                    spread_children(ctx, family, (ax + bx) / 2.0, &mut anchors);
                }
            }
        }
    }

    for unit in units.iter_mut() {
        let fixed = match unit.members {
            UnitMembers::Couple(a, b) => ctx
                .sole_child_parent_x(a)
                .or_else(|| ctx.sole_child_parent_x(b)),
            UnitMembers::Single(_) => None,
        };
        unit.anchor = fixed.unwrap_or_else(|| {
            let members = unit.member_indices();
            let sum: f32 = members
                .iter()
                .map(|idx| anchors.get(idx).copied().unwrap_or(0.0))
                .sum();
            sum / members.len().max(1) as f32
        });
    }

    pinned
}

fn spread_children(
    ctx: &AnchorContext<'_>,
    family: &Family,
    midpoint: f32,
    anchors: &mut HashMap<usize, f32>,
) {
    let spacing = ctx.config.child_spacing();
    let center = (family.children.len() as f32 - 1.0) / 2.0;
    for (i, child) in family.children.iter().enumerate() {
        let Some(idx) = ctx.child_in_generation(child) else {
            continue;
        };
        anchors.insert(idx, midpoint + (i as f32 - center) * spacing);
    }
}
