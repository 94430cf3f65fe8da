// ============================================================================
// bin/snake.rs — Sketchbook
// Entry point for the Snake demo.
// ============================================================================

use sketchbook::demos::snake::SnakeDemo;

fn main() -> anyhow::Result<()> {
    sketchbook::init_logging();
    sketchbook::run::<SnakeDemo>()?;
    Ok(())
}
