// ============================================================================
// bin/catch_the_dot.rs — Sketchbook
// Entry point for the Catch the Dot demo.
// ============================================================================

use sketchbook::demos::catch_the_dot::CatchTheDot;

fn main() -> anyhow::Result<()> {
    sketchbook::init_logging();
    sketchbook::run::<CatchTheDot>()?;
    Ok(())
}
