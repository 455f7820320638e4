//! Legacy obstacle-weighted distance predicate.
//!
//! Penalises the straight line between two cells by the obstacles it
//! crosses: cells the line passes straight through count as *full*
//! occlusions (weight 0.8), cells it only grazes count as *partial*
//! occlusions (weight 0.2). The weighted total is added to the Euclidean
//! distance. Every term is rounded to two decimals so historical graphs
//! are reproduced exactly.
//!
//! Kept for compatibility with previously generated graphs; the
//! path-length predicate supersedes it.

use std::collections::BTreeSet;

use crate::models::{round2, GridMap, Node};

/// Weight of an obstacle the line passes straight through.
pub const FULL_OBSTACLE_WEIGHT: f64 = 0.8;
/// Weight of an obstacle the line grazes.
pub const PARTIAL_OBSTACLE_WEIGHT: f64 = 0.2;

/// Euclidean distance plus weighted occlusion penalties.
pub fn obstacle_weighted_distance(map: &GridMap, a: Node, b: Node) -> f64 {
    let (full, partial) = count_occlusions(map, a, b);
    let full_weight = round2(full as f64 * FULL_OBSTACLE_WEIGHT);
    let partial_weight = round2(partial as f64 * PARTIAL_OBSTACLE_WEIGHT);
    round2(a.euclidean_distance(&b) + full_weight + partial_weight)
}

/// Counts `(full, partial)` occlusions on the line from `a` to `b`.
///
/// Three cases: axis-aligned lines walk the cells between the endpoints;
/// exact diagonals walk the main diagonal plus the two flanking diagonals;
/// any other line inspects the endpoint neighbourhoods and the bounding
/// rectangle between them, all as partial occlusions.
pub fn count_occlusions(map: &GridMap, a: Node, b: Node) -> (u32, u32) {
    let (x1, y1, x2, y2) = (a.x, a.y, b.x, b.y);
    let xs = if x2 < x1 { -1 } else { 1 };
    let ys = if y2 < y1 { -1 } else { 1 };
    let blocked = |x: i32, y: i32| map.is_obstacle(Node::new(x, y));

    let mut full = 0u32;
    let mut partial = 0u32;

    if x1 == x2 {
        let mut y = y1;
        while y != y2 {
            full += u32::from(blocked(x1, y));
            y += ys;
        }
    } else if y1 == y2 {
        let mut x = x1;
        while x != x2 {
            full += u32::from(blocked(x, y1));
            x += xs;
        }
    } else if (x2 - x1).abs() == (y2 - y1).abs() {
        let (mut x, mut y) = (x1, y1);
        while x != x2 && y != y2 {
            full += u32::from(blocked(x, y));
            x += xs;
            y += ys;
        }

        // Flanking diagonals, one step off the main one on either axis.
        for (start, end) in [
            ((x1, y1 + ys), (x2 - xs, y2)),
            ((x1 + xs, y1), (x2, y2 - ys)),
        ] {
            let (mut x, mut y) = start;
            while x != end.0 + xs && y != end.1 + ys {
                partial += u32::from(blocked(x, y));
                x += xs;
                y += ys;
            }
        }
    } else {
        let mut cells: BTreeSet<(i32, i32)> = BTreeSet::new();
        let corner1 = (x1 + xs, y1 + ys);
        let corner2 = (x2 - xs, y2 - ys);
        cells.extend([
            (x1, y1 + ys),
            (x1 + xs, y1),
            corner1,
            (x2, y2 - ys),
            (x2 - xs, y2),
            corner2,
        ]);

        let (rect_start, rect_end) = if (x2 - x1).abs() > (y2 - y1).abs() {
            ((x1 + 2 * xs, y1 + ys), (x2 - 2 * xs, y2 - ys))
        } else {
            ((x1 + xs, y1 + 2 * ys), (x2 - xs, y2 - 2 * ys))
        };

        let rx = if corner2.0 < corner1.0 { -1 } else { 1 };
        let ry = if corner2.1 < corner1.1 { -1 } else { 1 };
        for x in stepped(rect_start.0, rect_end.0 + rx, rx) {
            for y in stepped(rect_start.1, rect_end.1 + ry, ry) {
                cells.insert((x, y));
            }
        }

        partial = cells.iter().filter(|&&(x, y)| blocked(x, y)).count() as u32;
    }

    (full, partial)
}

/// Half-open stepped range `[start, stop)` in the direction of `step`.
fn stepped(start: i32, stop: i32, step: i32) -> Vec<i32> {
    let mut out = Vec::new();
    let mut v = start;
    while (step > 0 && v < stop) || (step < 0 && v > stop) {
        out.push(v);
        v += step;
    }
    out
}
