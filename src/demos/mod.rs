// ============================================================================
// demos/mod.rs — Sketchbook
// The demos, one per binary.
// ============================================================================

pub mod arcade;
pub mod catch_the_dot;
pub mod colored_triangles;
pub mod lookat_scene;
pub mod model_viewer;
pub mod snake;
pub mod tictactoe;
