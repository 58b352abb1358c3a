//! Property tests over arbitrary board contents and placements.

use falling_blocks::{Board, CellState, Color, ShapeId};
use proptest::prelude::*;

const WIDTH: usize = 10;
const HEIGHT: usize = 20;

fn board_from(rows: &[Vec<bool>]) -> Board {
    let mut board = Board::new(WIDTH, HEIGHT);
    for (y, row) in rows.iter().enumerate() {
        for (x, filled) in row.iter().enumerate() {
            if *filled {
                board.set(x, y, CellState::Filled(Color::RED));
            }
        }
    }
    board
}

/// Rows biased towards being full so clears actually happen.
fn arb_rows() -> impl Strategy<Value = Vec<Vec<bool>>> {
    let row = prop_oneof![
        3 => prop::collection::vec(any::<bool>(), WIDTH),
        1 => Just(vec![true; WIDTH]),
    ];
    prop::collection::vec(row, HEIGHT)
}

proptest! {
    #[test]
    fn clear_keeps_geometry(rows in arb_rows()) {
        let mut board = board_from(&rows);
        let full_rows = rows.iter().filter(|r| r.iter().all(|c| *c)).count();
        let filled_before = board.total_filled_cells();

        let cleared = board.clear_full_lines() as usize;

        prop_assert_eq!(cleared, full_rows);
        prop_assert!(cleared <= HEIGHT);
        prop_assert_eq!(board.rows().len(), HEIGHT);
        prop_assert!(board.rows().iter().all(|row| row.len() == WIDTH));
        prop_assert_eq!(board.total_filled_cells(), filled_before - cleared * WIDTH);
    }

    #[test]
    fn clear_twice_is_idempotent(rows in arb_rows()) {
        let mut board = board_from(&rows);

        board.clear_full_lines();
        let after_first = board.clone();

        prop_assert_eq!(board.clear_full_lines(), 0);
        prop_assert_eq!(board, after_first);
    }

    #[test]
    fn clear_preserves_order_of_remaining_rows(rows in arb_rows()) {
        let mut board = board_from(&rows);
        let kept: Vec<Vec<bool>> = rows
            .iter()
            .filter(|r| !r.iter().all(|c| *c))
            .cloned()
            .collect();

        board.clear_full_lines();

        let offset = HEIGHT - kept.len();
        for (i, row) in kept.iter().enumerate() {
            for (x, filled) in row.iter().enumerate() {
                let cell = board.get(x, offset + i);
                prop_assert_eq!(cell != Some(CellState::Empty), *filled);
            }
        }
    }

    #[test]
    fn placements_outside_grid_are_rejected(
        index in 0usize..7,
        turns in 0usize..4,
        x in -6i32..14,
        y in -6i32..24,
    ) {
        let board = Board::new(WIDTH, HEIGHT);
        let mut shape = ShapeId::ALL[index].shape();
        for _ in 0..turns {
            shape = shape.rotated_clockwise();
        }

        let escapes = shape.filled_cells().any(|(i, j)| {
            let col = x + j as i32;
            let row = y + i as i32;
            col < 0 || col >= WIDTH as i32 || row >= HEIGHT as i32
        });

        prop_assert_eq!(board.is_valid(&shape, x, y), !escapes);
    }
}
