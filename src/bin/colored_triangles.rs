// ============================================================================
// bin/colored_triangles.rs — Sketchbook
// Entry point for the Colored Triangles demo.
// ============================================================================

use sketchbook::demos::colored_triangles::ColoredTriangles;

fn main() -> anyhow::Result<()> {
    sketchbook::init_logging();
    sketchbook::run::<ColoredTriangles>()?;
    Ok(())
}
