//! Adjacency tests - neighbour tables and lanes across board sizes

use hexmatch::core::hex::{MIRRORED_CENTER, MIRRORED_LEFT, MIRRORED_RIGHT, OFFSET_EVEN, OFFSET_ODD};
use hexmatch::core::{HexGrid, Topology};
use hexmatch::types::{Coord, Lane};

fn grids() -> Vec<HexGrid> {
    let mut out = Vec::new();
    for width in [3u8, 5, 7, 9, 11] {
        for height in [1u8, 2, 5, 8] {
            out.push(HexGrid::new(width, height, Topology::MirroredAtCenter).unwrap());
        }
    }
    for width in [1u8, 2, 4, 6, 9] {
        for height in [1u8, 3, 6] {
            out.push(HexGrid::new(width, height, Topology::OffsetColumns).unwrap());
        }
    }
    out
}

#[test]
fn test_adjacency_is_symmetric_everywhere() {
    for grid in grids() {
        for a in grid.coords() {
            for b in grid.neighbors(a) {
                assert!(
                    grid.is_neighbor(b, a),
                    "{:?}: {} -> {} is one-sided",
                    grid,
                    a,
                    b
                );
            }
        }
    }
}

#[test]
fn test_at_most_six_distinct_neighbours() {
    for grid in grids() {
        for a in grid.coords() {
            let mut ns: Vec<Coord> = grid.neighbors(a).into_iter().collect();
            assert!(ns.len() <= 6);
            assert!(!ns.contains(&a));
            ns.sort();
            ns.dedup();
            assert_eq!(ns.len(), grid.neighbors(a).len());
        }
    }
}

#[test]
fn test_interior_cells_have_six_neighbours() {
    let grid = HexGrid::new(9, 5, Topology::MirroredAtCenter).unwrap();
    for x in 1..8 {
        for y in 1..4 {
            assert_eq!(grid.neighbors(Coord::new(x, y)).len(), 6, "({}, {})", x, y);
        }
    }
}

#[test]
fn test_literal_tables() {
    let mirrored = HexGrid::new(9, 5, Topology::MirroredAtCenter).unwrap();
    assert_eq!(mirrored.neighbor_offsets(0), &MIRRORED_LEFT);
    assert_eq!(mirrored.neighbor_offsets(3), &MIRRORED_LEFT);
    assert_eq!(mirrored.neighbor_offsets(4), &MIRRORED_CENTER);
    assert_eq!(mirrored.neighbor_offsets(5), &MIRRORED_RIGHT);
    assert_eq!(mirrored.neighbor_offsets(8), &MIRRORED_RIGHT);

    let offset = HexGrid::new(6, 4, Topology::OffsetColumns).unwrap();
    assert_eq!(offset.neighbor_offsets(0), &OFFSET_EVEN);
    assert_eq!(offset.neighbor_offsets(1), &OFFSET_ODD);
    assert_eq!(offset.neighbor_offsets(4), &OFFSET_EVEN);
}

#[test]
fn test_centre_column_links_to_both_sides() {
    let grid = HexGrid::new(9, 5, Topology::MirroredAtCenter).unwrap();
    let centre = Coord::new(4, 2);
    let ns = grid.neighbors(centre);
    for n in [(4, 3), (4, 1), (3, 2), (3, 3), (5, 2), (5, 3)] {
        assert!(ns.contains(&Coord::new(n.0, n.1)), "missing {:?}", n);
    }
}

#[test]
fn test_mirrored_even_width_rejected() {
    assert!(HexGrid::new(8, 5, Topology::MirroredAtCenter).is_err());
    assert!(HexGrid::new(8, 5, Topology::OffsetColumns).is_ok());
}

#[test]
fn test_lane_steps_reverse_each_other() {
    for grid in grids() {
        for c in grid.coords() {
            for lane in Lane::STRAIGHT {
                if let Some(next) = grid.step(c, lane, true) {
                    assert_eq!(grid.step(next, lane, false), Some(c));
                }
            }
        }
    }
}

#[test]
fn test_lane_path_stays_on_grid_without_repeats() {
    let grid = HexGrid::new(9, 5, Topology::MirroredAtCenter).unwrap();
    for c in grid.coords() {
        for lane in Lane::STRAIGHT {
            let mut path = grid.lane_path(c, lane);
            assert!(path.iter().all(|&p| grid.contains(p)));
            assert!(!path.contains(&c));
            let len = path.len();
            path.sort();
            path.dedup();
            assert_eq!(path.len(), len);
        }
    }
}
