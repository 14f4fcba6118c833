use crate::ir::{Family, RelationKind, Sibship, Zygosity};

use super::svg::sid;
use super::{Painter, Placed};

/// Fraction of the parent-to-child drop where the sibship bar sits.
const SIBSHIP_BAR_RATIO: f32 = 0.75;
const ADOPTIVE_DASH: &str = "6,4";

impl Painter<'_> {
    pub(super) fn draw_spouse_line(&mut self, p1: Placed<'_>, p2: Placed<'_>, kind: RelationKind) {
        if p1.generation() != p2.generation() {
            return;
        }
        // Edge to edge so the line never crosses a symbol.
        let y = p1.y();
        let half = self.symbol_size / 2.0;
        let (x1, x2) = if p1.x() <= p2.x() {
            (p1.x() + half, p2.x() - half)
        } else {
            (p1.x() - half, p2.x() + half)
        };
        self.svg.line(
            &sid(&["spouse", kind.as_str(), p1.id(), p2.id()]),
            (x1, y),
            (x2, y),
        );

        let mid_x = (x1 + x2) / 2.0;
        let (dx, dy) = (6.0, 10.0);
        match kind {
            RelationKind::Consanguineous => {
                self.svg.line(
                    &sid(&["spouse", "consanguineous2", p1.id(), p2.id()]),
                    (x1, y + 6.0),
                    (x2, y + 6.0),
                );
            }
            RelationKind::Divorced => {
                self.svg.line(
                    &sid(&["divorce", "1", p1.id(), p2.id()]),
                    (mid_x - dx, y - dy),
                    (mid_x - 3.0 * dx, y + dy),
                );
                self.svg.line(
                    &sid(&["divorce", "2", p1.id(), p2.id()]),
                    (mid_x + 3.0 * dx, y - dy),
                    (mid_x + dx, y + dy),
                );
            }
            RelationKind::Separated => {
                self.svg.line(
                    &sid(&["separated", p1.id(), p2.id()]),
                    (mid_x - dx, y - dy),
                    (mid_x - 3.0 * dx, y + dy),
                );
            }
            RelationKind::Spouse => {}
        }
    }

    pub(super) fn draw_couple_descent(
        &mut self,
        p1: Placed<'_>,
        p2: Placed<'_>,
        children: &[Placed<'_>],
        family: &Family,
    ) {
        if children.is_empty() || p1.generation() != p2.generation() {
            return;
        }
        if children.iter().map(|c| c.generation()).min() != Some(p1.generation() + 1) {
            return;
        }

        // The drop starts on the relationship line, not at a symbol edge.
        let mx = (p1.x() + p2.x()) / 2.0;
        let parent_bottom = p1.y();
        let child_top = self.children_top(children);
        let bar_y = parent_bottom + (child_top - parent_bottom) * SIBSHIP_BAR_RATIO;

        self.svg
            .line(&sid(&["down", p1.id(), p2.id()]), (mx, parent_bottom), (mx, bar_y));
        let (min_x, max_x) = if let [only] = children {
            (mx.min(only.x()), mx.max(only.x()))
        } else {
            span(children)
        };
        self.svg
            .line(&sid(&["sib", p1.id(), p2.id()]), (min_x, bar_y), (max_x, bar_y));

        let twin_groups = twin_groups(children);
        for child in children {
            if twin_groups
                .iter()
                .any(|(_, members, _)| members.iter().any(|m| m.id() == child.id()))
            {
                continue;
            }
            self.svg.line_styled(
                &sid(&["child", p1.id(), p2.id(), child.id()]),
                (child.x(), bar_y),
                (child.x(), child.y() - self.symbol_size / 2.0),
                None,
                family.is_adoptive(child.id()).then_some(ADOPTIVE_DASH),
            );
        }

        for (group, members, zygosity) in &twin_groups {
            self.draw_twin_group(group, members, *zygosity, bar_y);
        }
    }

    /// Twins share one stem off the sibship bar and split diagonally; identical
    /// pairs get a crossbar.
    fn draw_twin_group(
        &mut self,
        group: &str,
        members: &[Placed<'_>],
        zygosity: Zygosity,
        bar_y: f32,
    ) {
        let mut sorted = members.to_vec();
        sorted.sort_by(|a, b| a.x().total_cmp(&b.x()));
        let (Some(left), Some(right)) = (sorted.first(), sorted.last()) else {
            return;
        };
        let group_x = (left.x() + right.x()) / 2.0;
        let child_top = self.children_top(&sorted);
        let branch_y = bar_y + 14.0;

        self.svg.line(
            &sid(&["twin", group, "stem"]),
            (group_x, bar_y),
            (group_x, branch_y),
        );
        for child in &sorted {
            self.svg.line(
                &sid(&["twin", group, "to", child.id()]),
                (group_x, branch_y),
                (child.x(), child_top),
            );
        }

        if zygosity == Zygosity::Monozygotic && sorted.len() == 2 {
            let t = 0.45;
            let x1 = group_x + (left.x() - group_x) * t;
            let x2 = group_x + (right.x() - group_x) * t;
            let y = branch_y + (child_top - branch_y) * t;
            self.svg
                .line(&sid(&["twin", group, "mz"]), (x1, y), (x2, y));
        }
    }

    pub(super) fn draw_single_parent_descent(
        &mut self,
        parent: Placed<'_>,
        children: &[Placed<'_>],
        family: &Family,
    ) {
        if children.is_empty() {
            return;
        }
        if children.iter().map(|c| c.generation()).min() != Some(parent.generation() + 1) {
            return;
        }
        let px = parent.x();
        let parent_bottom = parent.y();
        let child_top = self.children_top(children);

        if let [child] = children {
            self.svg.line_styled(
                &sid(&["child", parent.id(), child.id()]),
                (px, parent_bottom),
                (px, child_top),
                None,
                family.is_adoptive(child.id()).then_some(ADOPTIVE_DASH),
            );
            return;
        }

        let bar_y = parent_bottom + (child_top - parent_bottom) * SIBSHIP_BAR_RATIO;
        self.svg
            .line(&sid(&["down", parent.id()]), (px, parent_bottom), (px, bar_y));
        let (min_x, max_x) = span(children);
        self.svg
            .line(&sid(&["sib", parent.id()]), (min_x, bar_y), (max_x, bar_y));
        for child in children {
            self.svg.line_styled(
                &sid(&["child", parent.id(), child.id()]),
                (child.x(), bar_y),
                (child.x(), child_top),
                None,
                family.is_adoptive(child.id()).then_some(ADOPTIVE_DASH),
            );
        }
    }

    /// Bar above parentless siblings with a drop to each of them.
    pub(super) fn draw_sibship(&mut self, sibship: &Sibship) {
        let mut siblings: Vec<Placed<'_>> = sibship
            .siblings
            .iter()
            .filter_map(|id| self.placed(id))
            .collect();
        if siblings.len() < 2 {
            return;
        }
        let generation = siblings[0].generation();
        if siblings.iter().any(|s| s.generation() != generation) {
            return;
        }
        siblings.sort_by(|a, b| a.x().total_cmp(&b.x()));
        let (left, right) = (siblings[0], siblings[siblings.len() - 1]);
        let y = left.y() - self.symbol_size / 2.0 - 15.0;

        self.svg.line(
            &sid(&["sibship", &format!("{}_{}", siblings[0].id(), siblings[1].id())]),
            (left.x(), y),
            (right.x(), y),
        );
        for sibling in &siblings {
            self.svg.line(
                &sid(&["sibship", "to", sibling.id()]),
                (sibling.x(), y),
                (sibling.x(), sibling.y() - self.symbol_size / 2.0),
            );
        }
    }

    fn children_top(&self, children: &[Placed<'_>]) -> f32 {
        children
            .iter()
            .map(|c| c.y())
            .fold(f32::INFINITY, f32::min)
            - self.symbol_size / 2.0
    }
}

fn span(children: &[Placed<'_>]) -> (f32, f32) {
    children.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), c| {
        (lo.min(c.x()), hi.max(c.x()))
    })
}

/// Twin groups with at least two members among `children`, in order of
/// first appearance.
fn twin_groups<'a>(children: &[Placed<'a>]) -> Vec<(String, Vec<Placed<'a>>, Zygosity)> {
    let mut groups: Vec<(String, Vec<Placed<'a>>, Zygosity)> = Vec::new();
    for child in children {
        let Some(twin) = &child.person.twin else {
            continue;
        };
        match groups.iter_mut().find(|(group, _, _)| *group == twin.group) {
            Some((_, members, _)) => members.push(*child),
            None => groups.push((twin.group.clone(), vec![*child], twin.zygosity)),
        }
    }
    groups.retain(|(_, members, _)| members.len() >= 2);
    groups
}
