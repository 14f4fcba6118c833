use std::collections::HashSet;

use crate::config::LayoutConfig;
use crate::ir::{Partners, Pedigree};

use super::types::LayoutUnit;

/// Partitions one generation into couple and single units.
///
/// Couples come first, in order of their earliest partner in the input;
/// a partner already claimed by an earlier couple leaves the later
/// partnership uncoupled. Everyone left over becomes a single, in input order.
pub(super) fn group_units(
    pedigree: &Pedigree,
    generation: u32,
    config: &LayoutConfig,
) -> Vec<LayoutUnit> {
    let in_generation = |idx: usize| pedigree.individuals[idx].generation == generation;

    let mut candidates: Vec<(usize, usize)> = pedigree
        .families
        .iter()
        .filter_map(|family| match &family.partners {
            Partners::Couple { a, b, .. } => {
                let a = pedigree.input_order(a)?;
                let b = pedigree.input_order(b)?;
                (a != b && in_generation(a) && in_generation(b)).then_some((a, b))
            }
            Partners::SingleParent { .. } => None,
        })
        .collect();
    candidates.sort_by_key(|(a, b)| (*a).min(*b));

    let couple_width = 2.0 * config.symbol_size + config.spouse_gap;
    let mut claimed = HashSet::new();
    let mut units = Vec::new();
    for (a, b) in candidates {
        if claimed.contains(&a) || claimed.contains(&b) {
            continue;
        }
        claimed.insert(a);
        claimed.insert(b);
        units.push(LayoutUnit::couple(a, b, couple_width));
    }

    units.extend(
        (0..pedigree.len())
            .filter(|idx| in_generation(*idx) && !claimed.contains(idx))
            .map(|idx| LayoutUnit::single(idx, config.symbol_size)),
    );
    units
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Family, Individual, RelationKind, Sex};
    use crate::layout::types::UnitMembers;

    fn couple(a: &str, b: &str) -> Family {
        Family::new(
            Partners::Couple {
                a: a.to_string(),
                b: b.to_string(),
                kind: RelationKind::Spouse,
            },
            Vec::new(),
        )
    }

    fn pedigree(people: &[(&str, Sex, u32)]) -> Pedigree {
        let mut pedigree = Pedigree::new();
        for (id, sex, generation) in people {
            pedigree.add_individual(Individual::new(*id, *sex, *generation));
        }
        pedigree
    }

    #[test]
    fn couples_precede_singles() {
        let mut p = pedigree(&[
            ("A", Sex::Male, 1),
            ("B", Sex::Female, 1),
            ("C", Sex::Male, 1),
        ]);
        p.families.push(couple("C", "B"));
        let units = group_units(&p, 1, &LayoutConfig::default());
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].members, UnitMembers::Couple(2, 1));
        assert_eq!(units[0].width, 160.0);
        assert_eq!(units[1].members, UnitMembers::Single(0));
        assert_eq!(units[1].width, 40.0);
    }

    #[test]
    fn earliest_partnership_claims_shared_partner() {
        let mut p = pedigree(&[
            ("A", Sex::Male, 1),
            ("B", Sex::Female, 1),
            ("C", Sex::Female, 1),
        ]);
        p.families.push(couple("A", "C"));
        p.families.push(couple("B", "A"));
        let units = group_units(&p, 1, &LayoutConfig::default());
        // Both candidates sort to input index 0; the declared one stays first.
        assert_eq!(units[0].members, UnitMembers::Couple(0, 2));
        assert_eq!(units[1].members, UnitMembers::Single(1));
    }

    #[test]
    fn cross_generation_partners_stay_single() {
        let mut p = pedigree(&[("A", Sex::Male, 1), ("B", Sex::Female, 2)]);
        p.families.push(couple("A", "B"));
        let first = group_units(&p, 1, &LayoutConfig::default());
        let second = group_units(&p, 2, &LayoutConfig::default());
        assert_eq!(first, vec![LayoutUnit::single(0, 40.0)]);
        assert_eq!(second, vec![LayoutUnit::single(1, 40.0)]);
    }

    #[test]
    fn every_member_appears_once() {
        let mut p = pedigree(&[
            ("A", Sex::Male, 1),
            ("B", Sex::Female, 1),
            ("C", Sex::Male, 1),
            ("D", Sex::Female, 1),
            ("E", Sex::Unknown, 1),
        ]);
        p.families.push(couple("C", "D"));
        p.families.push(couple("A", "B"));
        p.families.push(couple("B", "C"));
        let units = group_units(&p, 1, &LayoutConfig::default());
        let mut seen: Vec<usize> = units.iter().flat_map(|u| u.member_indices()).collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
        assert_eq!(units[0].members, UnitMembers::Couple(0, 1));
        assert_eq!(units[1].members, UnitMembers::Couple(2, 3));
    }
}
