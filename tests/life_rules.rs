//! Behaviour of the Life step on small hand-checked boards.

use cellular::{Grid, GridError};

fn grid_with(w: usize, h: usize, alive: &[(usize, usize)]) -> Grid {
    let mut g = Grid::new(w, h).unwrap();
    for &(x, y) in alive {
        g.set(x, y, true).unwrap();
    }
    g
}

fn alive_cells(g: &Grid) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    for y in 0..g.height() {
        for x in 0..g.width() {
            if g.get(x, y).unwrap() {
                out.push((x, y));
            }
        }
    }
    out
}

#[test]
fn new_grid_is_all_dead() {
    let g = Grid::new(400, 400).unwrap();
    assert_eq!(g.population(), 0);
    assert!(!g.get(399, 399).unwrap());
}

#[test]
fn negative_space_constructor_fails() {
    assert!(matches!(
        Grid::new(0, 0),
        Err(GridError::InvalidDimensions { width: 0, height: 0 })
    ));
}

#[test]
fn empty_grid_stays_empty() {
    let mut g = Grid::new(9, 6).unwrap();
    g.step();
    assert_eq!(g.population(), 0);
}

// Every cell of a 3x3 torus neighbours the other eight, so the dead cells
// each see 3 live neighbours and the live ones see 2.
#[test]
fn l_tromino_on_3x3_torus_fills_the_board() {
    let mut g = grid_with(3, 3, &[(1, 0), (0, 1), (1, 1)]);
    g.step();
    #[rustfmt::skip]
    let expected = [
        true, true, true,
        true, true, true,
        true, true, true,
    ];
    assert_eq!(g.cells(), &expected);
}

#[test]
fn l_tromino_on_open_board_becomes_block() {
    let mut g = grid_with(6, 6, &[(2, 1), (1, 2), (2, 2)]);
    g.step();
    assert_eq!(alive_cells(&g), vec![(1, 1), (2, 1), (1, 2), (2, 2)]);
    g.step();
    assert_eq!(alive_cells(&g), vec![(1, 1), (2, 1), (1, 2), (2, 2)]);
}

#[test]
fn clear_kills_everything() {
    let mut g = grid_with(5, 4, &[(0, 0), (4, 3), (2, 2)]);
    g.clear();
    for y in 0..4 {
        for x in 0..5 {
            assert!(!g.get(x, y).unwrap());
        }
    }
}

#[test]
fn set_is_visible_before_step() {
    let mut g = Grid::new(3, 3).unwrap();
    g.set(2, 1, true).unwrap();
    assert!(g.get(2, 1).unwrap());
}

#[test]
fn lonely_cell_dies() {
    let mut g = grid_with(5, 5, &[(2, 2)]);
    g.step();
    assert!(!g.get(2, 2).unwrap());
    assert_eq!(g.population(), 0);
}

#[test]
fn three_neighbours_mean_alive_next() {
    let neighbours = [(1, 1), (2, 1), (3, 1)];
    for prior in [false, true] {
        let mut g = grid_with(6, 6, &neighbours);
        g.set(2, 2, prior).unwrap();
        assert_eq!(g.live_neighbors(2, 2).unwrap(), 3);
        g.step();
        assert!(g.get(2, 2).unwrap(), "prior state {prior}");
    }
}

#[test]
fn two_neighbours_keep_prior_state() {
    let neighbours = [(1, 1), (3, 3)];
    for prior in [false, true] {
        let mut g = grid_with(6, 6, &neighbours);
        g.set(2, 2, prior).unwrap();
        assert_eq!(g.live_neighbors(2, 2).unwrap(), 2);
        g.step();
        assert_eq!(g.get(2, 2).unwrap(), prior);
    }
}

#[test]
fn overcrowded_cell_dies() {
    let mut g = grid_with(5, 5, &[(1, 1), (2, 1), (3, 1), (1, 2), (2, 2)]);
    assert_eq!(g.live_neighbors(2, 2).unwrap(), 4);
    g.step();
    assert!(!g.get(2, 2).unwrap());
}

#[test]
fn diagonal_wrap_is_adjacent() {
    for n in [3usize, 4, 10] {
        let g = grid_with(n, n, &[(n - 1, n - 1)]);
        assert_eq!(g.live_neighbors(0, 0).unwrap(), 1, "{n}x{n}");
    }
}

#[test]
fn glider_crosses_the_seam() {
    // glider heading down-right, 4 generations per cell of travel
    let start = [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];
    let mut g = grid_with(6, 6, &start);
    for _ in 0..4 * 6 {
        g.step();
    }
    // a full lap on the 6x6 torus lands it back where it started
    let mut expected = start.to_vec();
    expected.sort_by_key(|&(x, y)| (y, x));
    assert_eq!(alive_cells(&g), expected);
}
