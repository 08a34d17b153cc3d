//! core::layout
//!
//! Generation assignment and 2-D pedigree layout.
//!
//! # Algorithm
//!
//! 1. Every founder (no recorded parents) is generation 0
//! 2. Generations propagate by relaxation over parent->child edges until
//!    a fixed point, each child settling one level below its deepest
//!    known parent, so a child always sits strictly below both parents.
//!    The loop is bounded by the animal count, so malformed data cannot
//!    hang it (parent cycles are already rejected at assignment time by
//!    [`crate::core::pedigree`])
//! 3. Within a generation, animals keep colony insertion order and get
//!    `x = i/(k-1)` across the unit interval (a singleton sits at 0.5)
//! 4. `y = -generation * vertical_gap`, so generation 0 renders at the
//!    top and later generations below
//!
//! The output is plain serializable nodes and edges; this module is the
//! entire contract with any rendering front end and never touches
//! pixels, colors, or chart widgets.

use serde::{Deserialize, Serialize};

use super::colony::Colony;
use super::types::{AnimalId, Sex};

/// Layout tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    /// Vertical distance between consecutive generations.
    pub vertical_gap: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self { vertical_gap: 1.0 }
    }
}

/// One positioned animal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub id: AnimalId,
    pub x: f64,
    pub y: f64,
    pub generation: u32,
    pub sex: Sex,
    pub genotype: String,
}

/// One parent->child edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutEdge {
    pub source: AnimalId,
    pub target: AnimalId,
}

/// A renderable pedigree: positioned nodes plus parent edges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeLayout {
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
}

/// Compute the generation-layered layout for a colony.
///
/// An empty colony yields an empty layout. Disconnected founders each
/// take their own generation-0 slot.
pub fn layout(colony: &Colony, options: &LayoutOptions) -> TreeLayout {
    let n = colony.len();
    let mut generation: Vec<Option<u32>> = Vec::with_capacity(n);
    let animals: Vec<_> = colony.animals().collect();
    for animal in &animals {
        generation.push(if animal.is_founder() { Some(0) } else { None });
    }

    // Relax until a fixed point, raising each child to one past its
    // deepest known parent. Depth is bounded by n for acyclic data.
    for _ in 0..n {
        let mut changed = false;
        for (i, animal) in animals.iter().enumerate() {
            if animal.is_founder() {
                continue;
            }
            let deepest = [animal.mother.as_ref(), animal.father.as_ref()]
                .into_iter()
                .flatten()
                .filter_map(|pid| colony.idx(pid))
                .filter_map(|p| generation[p])
                .max();
            if let Some(g) = deepest {
                // None < Some(_), so unassigned nodes are raised too.
                if generation[i] < Some(g + 1) {
                    generation[i] = Some(g + 1);
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }

    // Bucket by generation, preserving insertion order within a bucket.
    let max_gen = generation.iter().flatten().copied().max().unwrap_or(0);
    let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); max_gen as usize + 1];
    for (i, g) in generation.iter().enumerate() {
        if let Some(g) = g {
            buckets[*g as usize].push(i);
        }
    }

    let mut nodes = Vec::with_capacity(n);
    for (g, bucket) in buckets.iter().enumerate() {
        let k = bucket.len();
        for (slot, &i) in bucket.iter().enumerate() {
            let x = if k > 1 {
                slot as f64 / (k - 1) as f64
            } else {
                0.5
            };
            let animal = animals[i];
            nodes.push(LayoutNode {
                id: animal.id.clone(),
                x,
                y: -(g as f64) * options.vertical_gap,
                generation: g as u32,
                sex: animal.sex,
                genotype: animal.genotype.clone(),
            });
        }
    }

    let mut edges = Vec::new();
    for animal in &animals {
        for parent in [animal.mother.as_ref(), animal.father.as_ref()]
            .into_iter()
            .flatten()
        {
            edges.push(LayoutEdge {
                source: parent.clone(),
                target: animal.id.clone(),
            });
        }
    }

    TreeLayout { nodes, edges }
}
