//! Rendering Module
//!
//! [`Renderer`] owns the GPU context, the render targets and the pass chain:
//!
//! ```text
//! Geometry ─► SSAO ─► SSAO Blur ─► Skybox ─► Lighting ─► Present
//! ```
//!
//! Every target is allocated once at the initial size and lives until
//! [`Renderer::shutdown`]. Resizing the window only reconfigures the
//! presentation surface.

pub mod core;
pub mod debug_view;
pub mod graph;
pub mod pipeline;
pub mod settings;
pub mod ssao_state;
pub mod uniforms;

use raw_window_handle::{HasDisplayHandle, HasWindowHandle};

pub use debug_view::DebugView;
pub use settings::{PowerMode, RenderSettings};
pub use ssao_state::SsaoState;
pub use uniforms::{FrameBindings, FrameUniforms};

use self::core::readback::read_target;
use self::core::{GpuContext, GpuCubemap, GpuMesh, ResourceSet, TextureReadback};
use self::graph::passes::{GeometryPass, LightingPass, PresentPass, SkyboxPass, SsaoBlurPass, SsaoPass};
use self::graph::{ExecuteContext, FrameGraph, FrameReport, PrepareContext, RenderGraph, Resource, ResourceLedger};
use self::pipeline::ShaderManager;
use crate::config::AppConfig;
use crate::errors::{Result, UmbraError};
use crate::resources::{MeshData, NoiseTile, SceneAssets, SsaoSettings};
use crate::scene::FrameState;

/// Half extent of the skybox cube; only its direction matters.
const SKYBOX_HALF_EXTENT: f32 = 1.0;

pub struct Renderer {
    context: GpuContext,
    resources: ResourceSet,
    frame_bindings: FrameBindings,
    graph: RenderGraph,
    shaders: ShaderManager,

    meshes: Vec<GpuMesh>,
    skybox_mesh: GpuMesh,
    cubemap: GpuCubemap,
    ssao: SsaoState,

    released: bool,
}

impl Renderer {
    /// Creates a renderer presenting to `window` with targets of
    /// `width`×`height`.
    pub fn new<W>(window: W, width: u32, height: u32, config: &AppConfig, assets: &SceneAssets) -> Result<Self>
    where
        W: HasWindowHandle + HasDisplayHandle + Send + Sync + 'static,
    {
        let context = pollster::block_on(GpuContext::new(window, &config.render, width, height))?;
        Self::build(context, width, height, config, assets)
    }

    /// Creates a renderer that presents into an offscreen texture.
    pub fn new_headless(width: u32, height: u32, config: &AppConfig, assets: &SceneAssets) -> Result<Self> {
        let context = pollster::block_on(GpuContext::new_headless(&config.render))?;
        Self::build(context, width, height, config, assets)
    }

    fn build(context: GpuContext, width: u32, height: u32, config: &AppConfig, assets: &SceneAssets) -> Result<Self> {
        let device = &context.device;
        let queue = &context.queue;
        let (width, height) = (width.max(1), height.max(1));

        // =========================================================
        // 1. Targets, kernel and noise
        // =========================================================
        let ssao = SsaoState::new(config.ssao.clone());
        let noise = NoiseTile::generate(config.ssao.seed.wrapping_add(1));
        let resources = ResourceSet::create(device, queue, width, height, &noise, context.is_headless())?;
        let frame_bindings = FrameBindings::new(device);

        // =========================================================
        // 2. Geometry and environment
        // =========================================================
        if assets.meshes.is_empty() {
            return Err(UmbraError::EmptyMeshCatalog);
        }
        let meshes: Vec<GpuMesh> = assets.meshes.iter().map(|mesh| GpuMesh::upload(device, mesh)).collect();
        let skybox_mesh = GpuMesh::upload(device, &MeshData::cube(SKYBOX_HALF_EXTENT));
        let cubemap = GpuCubemap::upload(device, queue, &assets.cubemap);

        // =========================================================
        // 3. Passes, in execution order
        // =========================================================
        let mut shaders = ShaderManager::new();
        let frame_layout = &frame_bindings.layout;

        let mut graph = RenderGraph::new();
        graph.add_node(Box::new(GeometryPass::new(device, &mut shaders, frame_layout)?));
        graph.add_node(Box::new(SsaoPass::new(device, &mut shaders, frame_layout, &resources, &ssao)?));
        graph.add_node(Box::new(SsaoBlurPass::new(device, &mut shaders, frame_layout, &resources)?));
        graph.add_node(Box::new(SkyboxPass::new(device, &mut shaders, frame_layout, &cubemap)?));
        graph.add_node(Box::new(LightingPass::new(device, &mut shaders, frame_layout, &resources, &cubemap)?));
        graph.add_node(Box::new(PresentPass::new(
            device,
            &mut shaders,
            frame_layout,
            &resources,
            context.present_format,
        )?));
        graph.validate()?;

        log::info!(
            "Renderer ready: {} passes, {} meshes, {} shader modules",
            graph.node_count(),
            meshes.len(),
            shaders.module_count()
        );

        Ok(Self {
            context,
            resources,
            frame_bindings,
            graph,
            shaders,
            meshes,
            skybox_mesh,
            cubemap,
            ssao,
            released: false,
        })
    }

    /// Runs the pass chain for one frame and presents it.
    ///
    /// Returns `Ok(None)` when the surface could not be acquired; the frame
    /// is skipped.
    pub fn render(&mut self, frame: &FrameState) -> Result<Option<FrameReport>> {
        if self.released {
            log::warn!("Frame {} skipped: renderer already shut down", frame.frame_index);
            return Ok(None);
        }
        let device = &self.context.device;
        let queue = &self.context.queue;

        // =========================================================
        // 1. Uploads
        // =========================================================
        let mut uniforms = FrameUniforms::from(frame);
        let (width, height) = self.resources.size();
        uniforms.screen_size = glam::Vec2::new(width as f32, height as f32);
        self.frame_bindings.write(queue, &uniforms);
        self.graph.prepare(&mut PrepareContext {
            queue,
            frame,
            ssao: &self.ssao,
        });

        // =========================================================
        // 2. Display target
        // =========================================================
        let surface_texture = match &self.context.surface {
            Some(state) => match state.surface.get_current_texture() {
                wgpu::CurrentSurfaceTexture::Success(texture) => Some(texture),
                wgpu::CurrentSurfaceTexture::Suboptimal(texture) => {
                    self.context.reconfigure_surface();
                    Some(texture)
                }
                wgpu::CurrentSurfaceTexture::Lost | wgpu::CurrentSurfaceTexture::Outdated => {
                    self.context.reconfigure_surface();
                    return Ok(None);
                }
                wgpu::CurrentSurfaceTexture::Timeout | wgpu::CurrentSurfaceTexture::Occluded => {
                    log::trace!("Frame {} skipped: surface not ready", frame.frame_index);
                    return Ok(None);
                }
                wgpu::CurrentSurfaceTexture::Validation => {
                    log::error!("Render error: surface acquisition failed validation");
                    return Ok(None);
                }
            },
            None => None,
        };
        let surface_view = surface_texture
            .as_ref()
            .map(|output| output.texture.create_view(&wgpu::TextureViewDescriptor::default()));

        let display = match (&surface_view, &self.resources.presented) {
            (Some(view), _) => view,
            (None, Some(target)) => &target.view,
            (None, None) => {
                return Err(UmbraError::GraphOrdering {
                    pass: "Present".to_string(),
                    resource: format!("{:?}", Resource::Display),
                });
            }
        };

        // Selection is wrapped upstream; the modulo only guards the slice.
        let mesh = &self.meshes[frame.mesh_index % self.meshes.len()];

        // =========================================================
        // 3. Record & submit
        // =========================================================
        let ctx = ExecuteContext {
            resources: &self.resources,
            frame,
            frame_bind_group: &self.frame_bindings.bind_group,
            mesh,
            skybox_mesh: &self.skybox_mesh,
            display,
            clear_color: self.context.clear_color,
        };
        let report = self.graph.execute(device, queue, &ctx)?;

        if let Some(output) = surface_texture {
            output.present();
        }

        log::trace!("Frame {} submitted: {:?}", report.frame_index, report.passes);
        Ok(Some(report))
    }

    // =========================================================
    // Readback
    // =========================================================

    /// The last presented image. Windowed renderers return the composite,
    /// since surface textures cannot be copied from.
    pub fn read_presented(&self) -> Result<image::RgbaImage> {
        self.ensure_live()?;
        let target = self.resources.presented.as_ref().unwrap_or(&self.resources.composite);
        let readback = read_target(&self.context.device, &self.context.queue, target)?;
        image::RgbaImage::from_raw(readback.width, readback.height, readback.bytes)
            .ok_or_else(|| UmbraError::ReadbackFailed(format!("'{}' is not RGBA8", target.label)))
    }

    /// Raw texels of the target behind a debug view.
    pub fn read_view(&self, view: DebugView) -> Result<TextureReadback> {
        self.ensure_live()?;
        let target = self
            .resources
            .target(view.source())
            .ok_or_else(|| UmbraError::ReadbackFailed(format!("no target for {} view", view.label())))?;
        read_target(&self.context.device, &self.context.queue, target)
    }

    fn ensure_live(&self) -> Result<()> {
        if self.released {
            return Err(UmbraError::ReadbackFailed("renderer has been shut down".to_string()));
        }
        Ok(())
    }

    pub fn save_screenshot(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let path = path.as_ref();
        self.read_presented()?.save(path)?;
        log::info!("Screenshot saved to {}", path.display());
        Ok(())
    }

    // =========================================================
    // State
    // =========================================================

    /// Updates radius, bias and intensity; takes effect on the next
    /// rendered frame. The kernel stays as built.
    pub fn set_ssao_settings(&mut self, settings: SsaoSettings) -> bool {
        self.ssao.update(settings)
    }

    #[must_use]
    pub fn ssao(&self) -> &SsaoState {
        &self.ssao
    }

    /// Reconfigures the presentation surface only.
    pub fn resize_surface(&mut self, width: u32, height: u32) {
        self.context.resize_surface(width, height);
    }

    /// Render target size, fixed at creation.
    #[inline]
    #[must_use]
    pub fn target_size(&self) -> (u32, u32) {
        self.resources.size()
    }

    #[must_use]
    pub fn frame_graph(&self) -> FrameGraph {
        self.graph.frame_graph()
    }

    #[must_use]
    pub fn ledger(&self) -> &ResourceLedger {
        self.graph.ledger()
    }

    #[inline]
    #[must_use]
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    #[inline]
    #[must_use]
    pub fn context(&self) -> &GpuContext {
        &self.context
    }

    #[inline]
    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.released
    }

    /// Destroys every GPU resource. Safe to call more than once; later
    /// renders are skipped and readbacks fail.
    pub fn shutdown(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        self.resources.destroy();
        self.cubemap.texture.destroy();
        for mesh in &self.meshes {
            mesh.destroy();
        }
        self.skybox_mesh.destroy();
        self.frame_bindings.buffer.destroy();

        log::info!(
            "Renderer shut down: released {} meshes, {} shader modules",
            self.meshes.len(),
            self.shaders.module_count()
        );
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
