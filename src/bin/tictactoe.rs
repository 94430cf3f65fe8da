// ============================================================================
// bin/tictactoe.rs — Sketchbook
// Entry point for the Tic-Tac-Toe demo.
// ============================================================================

use sketchbook::demos::tictactoe::TicTacToe;

fn main() -> anyhow::Result<()> {
    sketchbook::init_logging();
    sketchbook::run::<TicTacToe>()?;
    Ok(())
}
