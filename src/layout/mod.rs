mod anchors;
mod compress;
pub mod generation;
mod sweep;
pub(crate) mod types;
mod units;
pub use types::*;

use anchors::{AnchorContext, resolve_anchors};
use compress::compress_gaps;
use sweep::{sort_units, sweep, write_member_positions};
use units::group_units;

use crate::config::LayoutConfig;
use crate::ir::Pedigree;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Places every individual of the pedigree.
///
/// Generations are laid out top-down, each one only after the one above is
/// final. Within a generation, units are anchored, swept left to right and,
/// if any child was pinned under a single parent, gap-compressed. The whole
/// chart is then shifted so it starts at the configured margins and ranks
/// are numbered left to right per generation.
pub fn compute_layout(pedigree: &Pedigree, config: &LayoutConfig) -> Layout {
    let generations = pedigree.generations();
    let Some(&min_generation) = generations.first() else {
        return empty_layout(config);
    };

    let count = pedigree.len();
    let mut xs: Vec<Option<f32>> = vec![None; count];
    let mut ys: Vec<f32> = vec![0.0; count];

    for generation in generations {
        let mut units = group_units(pedigree, generation, config);

        let ctx = AnchorContext {
            pedigree,
            generation,
            placed_x: &xs,
            config,
        };
        let pinned = resolve_anchors(&ctx, &mut units, generation > min_generation);

        sort_units(&mut units);
        sweep(&mut units, config.unit_gap);
        if !pinned.is_empty() {
            compress_gaps(&mut units, &pinned, config.min_unit_gap);
        }
        write_member_positions(&units, config, &mut xs);

        let y = (generation - min_generation) as f32 * config.generation_gap;
        for idx in units.iter().flat_map(|unit| unit.member_indices()) {
            ys[idx] = y;
        }
        tracing::debug!(
            generation,
            units = units.len(),
            pinned = pinned.len(),
            "placed generation"
        );
    }

    let xs: Vec<f32> = xs.into_iter().map(|x| x.unwrap_or(0.0)).collect();
    let min_x = xs.iter().copied().fold(f32::INFINITY, f32::min);
    let min_y = ys.iter().copied().fold(f32::INFINITY, f32::min);

    let mut nodes: Vec<NodeLayout> = pedigree
        .individuals
        .iter()
        .enumerate()
        .map(|(idx, person)| NodeLayout {
            id: person.id.clone(),
            generation: person.generation,
            x: xs[idx] - min_x + config.margin_x,
            y: ys[idx] - min_y + config.margin_y,
            rank: 0,
        })
        .collect();
    assign_ranks(&mut nodes);

    let max_x = nodes.iter().map(|n| n.x).fold(f32::NEG_INFINITY, f32::max);
    let max_y = nodes.iter().map(|n| n.y).fold(f32::NEG_INFINITY, f32::max);
    let index = nodes
        .iter()
        .enumerate()
        .map(|(idx, node)| (node.id.clone(), idx))
        .collect();

    Layout {
        nodes,
        min_generation,
        width: max_x + config.margin_x + config.symbol_size,
        height: max_y + config.margin_y + config.symbol_size + config.canvas_bottom_pad,
        index,
    }
}

fn empty_layout(config: &LayoutConfig) -> Layout {
    Layout {
        nodes: Vec::new(),
        min_generation: 1,
        width: 2.0 * config.margin_x,
        height: 2.0 * config.margin_y,
        index: HashMap::new(),
    }
}

/// Numbers each generation 1, 2, 3... from left to right. Equal x keeps
/// input order.
fn assign_ranks(nodes: &mut [NodeLayout]) {
    let mut by_generation: HashMap<u32, Vec<usize>> = HashMap::new();
    for (idx, node) in nodes.iter().enumerate() {
        by_generation.entry(node.generation).or_default().push(idx);
    }
    for members in by_generation.values_mut() {
        members.sort_by(|a, b| {
            nodes[*a]
                .x
                .partial_cmp(&nodes[*b].x)
                .unwrap_or(Ordering::Equal)
        });
        for (rank, idx) in members.iter().enumerate() {
            nodes[*idx].rank = rank + 1;
        }
    }
}
