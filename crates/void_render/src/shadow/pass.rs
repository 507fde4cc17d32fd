//! Shadow pass seam

use void_scene::{NodeId, SceneGraph};
use void_shader::ProgramManager;

use super::map::ShadowMap;

/// The renderer's depth pass.
///
/// Called once per frame for every light whose shadow is active, before the
/// main pass. The light being rendered for is borrowed out of the graph for
/// the duration of the call, so `graph` does not report it.
pub trait ShadowPass {
    /// Render the scene's depth from the shadow map's viewpoint into its
    /// depth texture. Returns true if anything was drawn.
    fn render_shadow_map(
        &mut self,
        graph: &SceneGraph,
        light_node: NodeId,
        shadow_map: &ShadowMap,
        manager: &mut dyn ProgramManager,
    ) -> bool;
}
