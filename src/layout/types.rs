use std::collections::HashMap;

/// Final placement of one individual, in SVG px.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeLayout {
    pub id: String,
    pub generation: u32,
    pub x: f32,
    pub y: f32,
    /// 1-based left-to-right number within the generation.
    pub rank: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Layout {
    /// Parallel to `Pedigree::individuals`.
    pub nodes: Vec<NodeLayout>,
    pub min_generation: u32,
    pub width: f32,
    pub height: f32,
    pub(super) index: HashMap<String, usize>,
}

impl Layout {
    pub fn node(&self, id: &str) -> Option<&NodeLayout> {
        self.index.get(id).map(|idx| &self.nodes[*idx])
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Distinct generations present in the chart, ascending.
    pub fn generations(&self) -> Vec<u32> {
        let mut generations: Vec<u32> = self.nodes.iter().map(|n| n.generation).collect();
        generations.sort_unstable();
        generations.dedup();
        generations
    }

    /// Nodes of one generation ordered by display rank.
    pub fn row(&self, generation: u32) -> Vec<&NodeLayout> {
        let mut row: Vec<&NodeLayout> = self
            .nodes
            .iter()
            .filter(|n| n.generation == generation)
            .collect();
        row.sort_by_key(|n| n.rank);
        row
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UnitMembers {
    Single(usize),
    /// Left member first, as declared in the partnership.
    Couple(usize, usize),
}

/// Indivisible horizontal placement group for one generation's sweep.
/// Members are input-order indices into `Pedigree::individuals`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LayoutUnit {
    pub members: UnitMembers,
    pub width: f32,
    pub anchor: f32,
    pub left: f32,
}

impl LayoutUnit {
    pub fn single(member: usize, width: f32) -> Self {
        Self {
            members: UnitMembers::Single(member),
            width,
            anchor: 0.0,
            left: 0.0,
        }
    }

    pub fn couple(left: usize, right: usize, width: f32) -> Self {
        Self {
            members: UnitMembers::Couple(left, right),
            width,
            anchor: 0.0,
            left: 0.0,
        }
    }

    pub fn member_indices(&self) -> Vec<usize> {
        match self.members {
            UnitMembers::Single(idx) => vec![idx],
            UnitMembers::Couple(a, b) => vec![a, b],
        }
    }

    pub fn min_order(&self) -> usize {
        match self.members {
            UnitMembers::Single(idx) => idx,
            UnitMembers::Couple(a, b) => a.min(b),
        }
    }

    pub fn desired_left(&self) -> f32 {
        self.anchor - self.width / 2.0
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }
}
