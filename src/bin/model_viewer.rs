// ============================================================================
// bin/model_viewer.rs — Sketchbook
// Entry point for the Model Viewer demo.
// ============================================================================

use sketchbook::demos::model_viewer::ModelViewer;

fn main() -> anyhow::Result<()> {
    sketchbook::init_logging();
    sketchbook::run::<ModelViewer>()?;
    Ok(())
}
