//! Three-by-three slot machine.
//!
//! Every cell draws uniformly from the symbol table. A matched row or column pays
//! stake times the symbol multiplier; a matched diagonal pays double that. Line wins
//! are additive, so a grid of nine identical symbols pays all eight lines.

use rand::Rng;

use super::GameRng;

/// Symbol table: (emoji, line multiplier).
pub const SYMBOLS: [(&str, u64); 6] = [
    ("🍋", 2),
    ("🍊", 3),
    ("🍇", 4),
    ("🍒", 5),
    ("⭐", 10),
    ("💎", 20),
];

/// One resolved spin: symbol indices per cell plus total line winnings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Spin {
    pub grid: [[u8; 3]; 3],
    /// Sum of line payouts; zero means the stake is lost.
    pub winnings: u64,
}

pub fn spin(stake: u64, rng: &mut GameRng) -> Spin {
    let mut grid = [[0u8; 3]; 3];
    for row in grid.iter_mut() {
        for cell in row.iter_mut() {
            *cell = rng.gen_range(0..SYMBOLS.len() as u8);
        }
    }
    Spin {
        winnings: line_winnings(&grid, stake),
        grid,
    }
}

/// Payout across all eight lines of `grid`.
pub fn line_winnings(grid: &[[u8; 3]; 3], stake: u64) -> u64 {
    let mut winnings = 0u64;
    for row in 0..3 {
        if grid[row][0] == grid[row][1] && grid[row][1] == grid[row][2] {
            winnings = winnings.saturating_add(line_payout(grid[row][0], stake, 1));
        }
    }
    for col in 0..3 {
        if grid[0][col] == grid[1][col] && grid[1][col] == grid[2][col] {
            winnings = winnings.saturating_add(line_payout(grid[0][col], stake, 1));
        }
    }
    if grid[0][0] == grid[1][1] && grid[1][1] == grid[2][2] {
        winnings = winnings.saturating_add(line_payout(grid[1][1], stake, 2));
    }
    if grid[0][2] == grid[1][1] && grid[1][1] == grid[2][0] {
        winnings = winnings.saturating_add(line_payout(grid[1][1], stake, 2));
    }
    winnings
}

/// Symbol emojis for presenting a resolved grid.
pub fn grid_symbols(grid: &[[u8; 3]; 3]) -> [[String; 3]; 3] {
    grid.map(|row| {
        row.map(|cell| {
            SYMBOLS
                .get(cell as usize)
                .map_or("?", |(emoji, _)| *emoji)
                .to_string()
        })
    })
}

fn line_payout(symbol: u8, stake: u64, line_multiplier: u64) -> u64 {
    let multiplier = SYMBOLS
        .get(symbol as usize)
        .map_or(0, |(_, multiplier)| *multiplier);
    stake
        .saturating_mul(multiplier)
        .saturating_mul(line_multiplier)
}
