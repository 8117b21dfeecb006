//! Render passes, in submission order.

mod geometry;
mod lighting;
mod present;
mod skybox;
mod ssao;
mod ssao_blur;

pub use geometry::GeometryPass;
pub use lighting::LightingPass;
pub use present::PresentPass;
pub use skybox::SkyboxPass;
pub use ssao::SsaoPass;
pub use ssao_blur::SsaoBlurPass;
