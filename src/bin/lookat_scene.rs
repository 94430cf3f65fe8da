// ============================================================================
// bin/lookat_scene.rs — Sketchbook
// Entry point for the LookAt Scene demo.
// ============================================================================

use sketchbook::demos::lookat_scene::LookAtScene;

fn main() -> anyhow::Result<()> {
    sketchbook::init_logging();
    sketchbook::run::<LookAtScene>()?;
    Ok(())
}
