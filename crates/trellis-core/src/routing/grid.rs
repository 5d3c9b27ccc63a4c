//! A* search over a regular grid with 4-directional movement.

use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashMap},
};

use log::trace;

use crate::geometry::{Bounds, Point};

/// Fixed-point scale applied to step costs so the open set orders on integers.
const COST_SCALE: f32 = 1000.0;

/// Orthogonal neighbor offsets: up, down, left, right.
const DIRECTIONS: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// A grid coordinate in cell units.
pub(super) type Cell = (i32, i32);

/// Search state of one grid node; lives only for a single search.
#[derive(Debug, Clone, Copy)]
struct GridNode {
    /// Accumulated cost from the start.
    cost: u32,
    /// Heuristic estimate to the goal.
    estimate: u32,
    /// Predecessor on the best known path.
    previous: Option<Cell>,
    closed: bool,
}

impl GridNode {
    fn total(&self) -> u32 {
        self.cost.saturating_add(self.estimate)
    }
}

/// Entry of the open set. Ordered so that [`BinaryHeap`] pops the lowest
/// total cost first, preferring deeper nodes on ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenEntry {
    total: u32,
    cost: u32,
    cell: Cell,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .total
            .cmp(&self.total)
            .then_with(|| self.cost.cmp(&other.cost))
            .then_with(|| other.cell.1.cmp(&self.cell.1))
            .then_with(|| other.cell.0.cmp(&self.cell.0))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Largest absolute cell coordinate the grid accepts. Keeps every cell
/// difference and Manhattan distance well inside `i32`.
const MAX_CELL_COORD: f32 = (1 << 24) as f32;

/// The bounded search area: an inclusive range of cells plus the cell ranges
/// covered by obstacles. Nodes are tested against the obstacles when they are
/// reached; nothing is rasterised up front.
pub(super) struct Grid {
    cell_size: f32,
    min: Cell,
    max: Cell,
    blocked: Vec<(Cell, Cell)>,
}

impl Grid {
    /// Builds a grid covering `area`. A node inside any of the (already
    /// expanded) `obstacles` is blocked; containment is inclusive, so a node
    /// on an obstacle edge is blocked.
    ///
    /// Returns `None` when the area does not fit in the addressable cell
    /// range at this cell size.
    pub(super) fn new(cell_size: f32, area: Bounds, obstacles: &[Bounds]) -> Option<Self> {
        let min = (
            to_cell((area.min_x() / cell_size).floor())?,
            to_cell((area.min_y() / cell_size).floor())?,
        );
        let max = (
            to_cell((area.max_x() / cell_size).ceil())?,
            to_cell((area.max_y() / cell_size).ceil())?,
        );

        let blocked = obstacles
            .iter()
            .filter_map(|obstacle| {
                let x0 = clamp_cell((obstacle.min_x() / cell_size).ceil()).max(min.0);
                let x1 = clamp_cell((obstacle.max_x() / cell_size).floor()).min(max.0);
                let y0 = clamp_cell((obstacle.min_y() / cell_size).ceil()).max(min.1);
                let y1 = clamp_cell((obstacle.max_y() / cell_size).floor()).min(max.1);
                (x0 <= x1 && y0 <= y1).then_some(((x0, y0), (x1, y1)))
            })
            .collect();

        Some(Self {
            cell_size,
            min,
            max,
            blocked,
        })
    }

    /// Number of nodes in the search area.
    pub(super) fn cell_count(&self) -> u64 {
        let cols = u64::from((self.max.0 - self.min.0).unsigned_abs()) + 1;
        let rows = u64::from((self.max.1 - self.min.1).unsigned_abs()) + 1;
        cols.saturating_mul(rows)
    }

    /// Snaps a point to the nearest grid node, clamped to the search area.
    pub(super) fn snap(&self, point: Point) -> Cell {
        (
            clamp_cell((point.x() / self.cell_size).round()).clamp(self.min.0, self.max.0),
            clamp_cell((point.y() / self.cell_size).round()).clamp(self.min.1, self.max.1),
        )
    }

    pub(super) fn point(&self, cell: Cell) -> Point {
        Point::new(cell.0 as f32 * self.cell_size, cell.1 as f32 * self.cell_size)
    }

    fn contains(&self, cell: Cell) -> bool {
        (self.min.0..=self.max.0).contains(&cell.0) && (self.min.1..=self.max.1).contains(&cell.1)
    }

    fn is_blocked(&self, cell: Cell) -> bool {
        !self.contains(cell)
            || self.blocked.iter().any(|(lo, hi)| {
                (lo.0..=hi.0).contains(&cell.0) && (lo.1..=hi.1).contains(&cell.1)
            })
    }

    /// Runs A* from `start` to `goal`.
    ///
    /// Each step costs one cell; the heuristic is the Manhattan distance to
    /// the goal, which is admissible and consistent for unit orthogonal
    /// steps, so the first time the goal is popped its path is optimal. The
    /// start and goal nodes are always enterable even when they fall inside
    /// an expanded obstacle.
    ///
    /// Returns `None` when the open set is exhausted or more than
    /// `max_expansions` nodes are expanded.
    pub(super) fn search(&self, start: Cell, goal: Cell, max_expansions: usize) -> Option<Vec<Cell>> {
        if !self.contains(start) || !self.contains(goal) {
            return None;
        }

        let step_cost = (self.cell_size * COST_SCALE).round() as u32;
        let heuristic = |cell: Cell| {
            ((cell.0 - goal.0).unsigned_abs() + (cell.1 - goal.1).unsigned_abs())
                .saturating_mul(step_cost)
        };

        let mut nodes: HashMap<Cell, GridNode> = HashMap::new();
        let mut open = BinaryHeap::new();

        let start_node = GridNode {
            cost: 0,
            estimate: heuristic(start),
            previous: None,
            closed: false,
        };
        nodes.insert(start, start_node);
        open.push(OpenEntry {
            total: start_node.total(),
            cost: 0,
            cell: start,
        });

        let mut expansions = 0usize;
        while let Some(entry) = open.pop() {
            let node = nodes.get_mut(&entry.cell)?;
            if node.closed || entry.cost != node.cost {
                continue;
            }
            node.closed = true;

            if entry.cell == goal {
                trace!(expansions = expansions, cost = entry.cost; "Grid search reached goal");
                return Some(self.reconstruct(&nodes, goal));
            }

            expansions += 1;
            if expansions > max_expansions {
                trace!(expansions = expansions; "Grid search exceeded expansion bound");
                return None;
            }

            for (dx, dy) in DIRECTIONS {
                let next = (entry.cell.0 + dx, entry.cell.1 + dy);
                if !self.contains(next) {
                    continue;
                }
                if next != goal && next != start && self.is_blocked(next) {
                    continue;
                }

                let cost = entry.cost.saturating_add(step_cost);
                let improves = match nodes.get(&next) {
                    Some(existing) => !existing.closed && cost < existing.cost,
                    None => true,
                };
                if !improves {
                    continue;
                }

                let node = GridNode {
                    cost,
                    estimate: heuristic(next),
                    previous: Some(entry.cell),
                    closed: false,
                };
                nodes.insert(next, node);
                open.push(OpenEntry {
                    total: node.total(),
                    cost,
                    cell: next,
                });
            }
        }

        trace!(expansions = expansions; "Grid search exhausted open set");
        None
    }

    fn reconstruct(&self, nodes: &HashMap<Cell, GridNode>, goal: Cell) -> Vec<Cell> {
        let mut cells = vec![goal];
        let mut current = goal;
        while let Some(previous) = nodes.get(&current).and_then(|node| node.previous) {
            cells.push(previous);
            current = previous;
        }
        cells.reverse();
        cells
    }
}

/// Converts a cell coordinate, rejecting values outside the addressable range.
fn to_cell(value: f32) -> Option<i32> {
    (value.is_finite() && value.abs() <= MAX_CELL_COORD).then_some(value as i32)
}

/// Converts a cell coordinate, saturating at the addressable range.
fn clamp_cell(value: f32) -> i32 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(-MAX_CELL_COORD, MAX_CELL_COORD) as i32
}
