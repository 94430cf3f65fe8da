// ============================================================================
// bin/arcade.rs — Sketchbook
// Entry point for the Arcade demo.
// ============================================================================

use sketchbook::demos::arcade::Arcade;

fn main() -> anyhow::Result<()> {
    sketchbook::init_logging();
    sketchbook::run::<Arcade>()?;
    Ok(())
}
