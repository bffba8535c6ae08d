//! Tests for the playfield grid primitives
//!
//! Test categories:
//! - Construction and indexing
//! - Fill and stamp clipping
//! - Collision (`fits`)
//! - Rotation
//! - Row removal

use proptest::prelude::*;
use tetris_engine::Grid;

fn grid_from(width: usize, height: usize, values: &[u8]) -> Grid {
    let mut grid = Grid::new(width, height);
    for (i, &value) in values.iter().enumerate() {
        grid.set(i % width, i / width, value);
    }
    grid
}

fn arb_grid() -> impl Strategy<Value = Grid> {
    (1usize..6, 1usize..6).prop_flat_map(|(width, height)| {
        prop::collection::vec(0u8..=7, width * height)
            .prop_map(move |values| grid_from(width, height, &values))
    })
}

// ============================================================================
// Construction Tests
// ============================================================================

mod construction {
    use super::*;

    #[test]
    fn new_grid_is_zero_filled() {
        let grid = Grid::new(4, 3);

        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.occupied(), 0);
        assert!(grid.cells().all(|(_, _, value)| value == 0));
    }

    #[test]
    #[should_panic]
    fn zero_width_is_rejected() {
        let _ = Grid::new(0, 5);
    }

    #[test]
    fn template_rows_map_to_y() {
        let grid = Grid::from_rows([[1, 2, 3], [4, 5, 6]]);

        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.get(2, 0), 3);
        assert_eq!(grid.get(0, 1), 4);
    }

    #[test]
    fn set_then_get() {
        let mut grid = Grid::new(3, 3);
        grid.set(2, 1, 7);

        assert_eq!(grid.get(2, 1), 7);
        assert!(!grid.is_empty(2, 1));
        assert!(grid.is_empty(1, 2));
    }

    #[test]
    #[should_panic]
    fn get_out_of_bounds_panics() {
        let grid = Grid::new(3, 3);
        let _ = grid.get(3, 0);
    }

    #[test]
    fn clone_is_deep() {
        let original = Grid::from_rows([[1, 0], [0, 1]]);
        let mut copy = original.clone();
        copy.set(1, 0, 5);

        assert_eq!(original.get(1, 0), 0);
        assert_eq!(copy.get(1, 0), 5);
    }
}

// ============================================================================
// Fill and Stamp Tests
// ============================================================================

mod fill_and_stamp {
    use super::*;

    #[test]
    fn fill_clips_rectangle_to_bounds() {
        let mut grid = Grid::new(4, 3);
        grid.fill(-1, -1, 3, 3, 5);

        assert_eq!(grid.occupied(), 4);
        assert_eq!(grid.get(0, 0), 5);
        assert_eq!(grid.get(1, 1), 5);
        assert_eq!(grid.get(2, 1), 0);
        assert_eq!(grid.get(0, 2), 0);
    }

    #[test]
    fn fill_entirely_outside_is_a_noop() {
        let mut grid = Grid::new(3, 3);
        grid.fill(5, 5, 2, 2, 1);
        grid.fill(-4, 0, 2, 2, 1);

        assert_eq!(grid.occupied(), 0);
    }

    #[test]
    fn stamp_preserves_background_under_holes() {
        let mut dest = Grid::new(4, 4);
        dest.fill(0, 0, 4, 4, 3);
        let t_piece = Grid::from_rows([[0, 6, 0], [6, 6, 6], [0, 0, 0]]);

        t_piece.copy_into(&mut dest, 0, 0);

        assert_eq!(dest.get(0, 0), 3);
        assert_eq!(dest.get(2, 0), 3);
        assert_eq!(dest.get(1, 2), 3);
        assert_eq!(dest.get(1, 0), 6);
        assert_eq!(dest.get(0, 1), 6);
        assert_eq!(dest.get(2, 1), 6);
        assert_eq!(dest.get(3, 1), 3);
    }

    #[test]
    fn stamp_clips_at_every_edge() {
        let block = Grid::from_rows([[4, 4], [4, 4]]);

        let mut top_left = Grid::new(3, 3);
        block.copy_into(&mut top_left, -1, -1);
        assert_eq!(top_left.occupied(), 1);
        assert_eq!(top_left.get(0, 0), 4);

        let mut bottom_right = Grid::new(3, 3);
        block.copy_into(&mut bottom_right, 2, 2);
        assert_eq!(bottom_right.occupied(), 1);
        assert_eq!(bottom_right.get(2, 2), 4);
    }

    proptest! {
        #[test]
        fn stamp_never_erases_destination(dest in arb_grid(), src in arb_grid(), x in -6i32..6, y in -6i32..6) {
            let mut stamped = dest.clone();
            src.copy_into(&mut stamped, x, y);

            for (cx, cy, value) in dest.cells() {
                let sx = cx as i32 - x;
                let sy = cy as i32 - y;
                let covered = sx >= 0
                    && sy >= 0
                    && (sx as usize) < src.width()
                    && (sy as usize) < src.height()
                    && !src.is_empty(sx as usize, sy as usize);
                if covered {
                    prop_assert_eq!(stamped.get(cx, cy), src.get(sx as usize, sy as usize));
                } else {
                    prop_assert_eq!(stamped.get(cx, cy), value);
                }
            }
        }
    }
}

// ============================================================================
// Collision Tests
// ============================================================================

mod collision {
    use super::*;

    /// Reference answer: every occupied cell of `other` lands in bounds on an empty cell.
    fn expected_fit(dest: &Grid, other: &Grid, x: i32, y: i32) -> bool {
        other.cells().filter(|&(_, _, v)| v != 0).all(|(ox, oy, _)| {
            let tx = x + ox as i32;
            let ty = y + oy as i32;
            tx >= 0
                && ty >= 0
                && (tx as usize) < dest.width()
                && (ty as usize) < dest.height()
                && dest.is_empty(tx as usize, ty as usize)
        })
    }

    fn pattern(width: usize, height: usize, bits: u32) -> Grid {
        let values: Vec<u8> = (0..width * height)
            .map(|i| if bits & (1 << i) != 0 { 1 } else { 0 })
            .collect();
        grid_from(width, height, &values)
    }

    #[test]
    fn fits_matches_reference_on_every_small_configuration() {
        let mut checked = 0;
        for dest_bits in 0..(1u32 << 4) {
            let dest = pattern(2, 2, dest_bits);
            for other_bits in 0..(1u32 << 4) {
                let other = pattern(2, 2, other_bits);
                for y in -2..=2 {
                    for x in -2..=2 {
                        assert_eq!(
                            dest.fits(&other, x, y),
                            expected_fit(&dest, &other, x, y),
                            "dest:\n{dest}other:\n{other}origin ({x}, {y})"
                        );
                        checked += 1;
                    }
                }
            }
        }
        assert_eq!(checked, 16 * 16 * 25);
    }

    #[test]
    fn fits_matches_reference_for_non_square_shapes() {
        for dest_bits in 0..(1u32 << 6) {
            let dest = pattern(3, 2, dest_bits);
            for other_bits in 0..(1u32 << 3) {
                let other = pattern(1, 3, other_bits);
                for y in -3..=3 {
                    for x in -2..=3 {
                        assert_eq!(dest.fits(&other, x, y), expected_fit(&dest, &other, x, y));
                    }
                }
            }
        }
    }

    #[test]
    fn empty_shape_fits_anywhere() {
        let dest = Grid::from_rows([[1, 1], [1, 1]]);
        let empty = Grid::new(3, 3);

        assert!(dest.fits(&empty, 0, 0));
        assert!(dest.fits(&empty, -10, 40));
    }

    #[test]
    fn empty_cells_of_other_may_hang_outside() {
        let dest = Grid::new(3, 3);
        let t_piece = Grid::from_rows([[0, 6, 0], [6, 6, 6], [0, 0, 0]]);

        // Bottom template row is empty and sits below the floor.
        assert!(dest.fits(&t_piece, 0, 1));
        assert!(!dest.fits(&t_piece, 0, 2));
    }

    #[test]
    fn overlap_of_occupied_cells_is_rejected() {
        let mut dest = Grid::new(4, 4);
        dest.set(1, 1, 2);
        let block = Grid::from_rows([[4, 4], [4, 4]]);

        assert!(!dest.fits(&block, 0, 0));
        assert!(!dest.fits(&block, 1, 1));
        assert!(dest.fits(&block, 2, 2));
    }
}

// ============================================================================
// Rotation Tests
// ============================================================================

mod rotation {
    use super::*;

    #[test]
    fn rotate_cw_swaps_dimensions_and_turns_right() {
        let mut grid = Grid::from_rows([[1, 2, 3], [4, 5, 6]]);
        grid.rotate_cw();

        assert_eq!(grid, Grid::from_rows([[4, 1], [5, 2], [6, 3]]));
    }

    #[test]
    fn rotate_ccw_swaps_dimensions_and_turns_left() {
        let mut grid = Grid::from_rows([[1, 2, 3], [4, 5, 6]]);
        grid.rotate_ccw();

        assert_eq!(grid, Grid::from_rows([[3, 6], [2, 5], [1, 4]]));
    }

    proptest! {
        #[test]
        fn cw_then_ccw_restores_grid(grid in arb_grid()) {
            let mut rotated = grid.clone();
            rotated.rotate_cw();
            rotated.rotate_ccw();
            prop_assert_eq!(rotated, grid);
        }

        #[test]
        fn four_quarter_turns_restore_grid(grid in arb_grid()) {
            let mut rotated = grid.clone();
            for _ in 0..4 {
                rotated.rotate_cw();
            }
            prop_assert_eq!(rotated, grid);
        }

        #[test]
        fn rotation_keeps_cell_values(grid in arb_grid()) {
            let mut rotated = grid.clone();
            rotated.rotate_ccw();
            let mut before: Vec<u8> = grid.cells().map(|(_, _, v)| v).collect();
            let mut after: Vec<u8> = rotated.cells().map(|(_, _, v)| v).collect();
            before.sort_unstable();
            after.sort_unstable();
            prop_assert_eq!(before, after);
            prop_assert_eq!(rotated.width(), grid.height());
        }
    }
}

// ============================================================================
// Row Tests
// ============================================================================

mod rows {
    use super::*;

    #[test]
    fn full_row_detection() {
        let grid = Grid::from_rows([[1, 0, 2], [3, 3, 3]]);

        assert!(!grid.is_row_full(0));
        assert!(grid.is_row_full(1));
    }

    #[test]
    fn remove_row_shifts_rows_above_down() {
        let mut grid = Grid::from_rows([[1, 0, 0], [2, 2, 2], [0, 3, 0]]);
        grid.remove_row(1);

        assert_eq!(grid, Grid::from_rows([[0, 0, 0], [1, 0, 0], [0, 3, 0]]));
    }

    #[test]
    fn remove_top_row_only_clears_it() {
        let mut grid = Grid::from_rows([[5, 5], [0, 1]]);
        grid.remove_row(0);

        assert_eq!(grid, Grid::from_rows([[0, 0], [0, 1]]));
    }

    #[test]
    fn rows_iterate_top_to_bottom() {
        let grid = Grid::from_rows([[1, 2], [3, 4]]);
        let rows: Vec<&[u8]> = grid.rows().collect();

        assert_eq!(rows, vec![&[1u8, 2][..], &[3, 4][..]]);
    }
}
