//! Offscreen height pass.
//!
//! The sphere is rendered from behind the surface with an orthographic camera into a square texture. Every fragment
//! of the sphere that lies behind the surface plane writes how deep it goes; the depth test keeps the deepest press
//! per texel. The framebuffer is never cleared between frames (unless asked to), so the texture accumulates the
//! sphere's trail. The main pass then samples that texture as a displacement map.

use crate::{
  camera::SnowCamera,
  mesh::{sphere_vertices, Semantics, SphereIndex, SphereVertex},
  shared::{log_warnings, nearest_sampler, program_error},
  SceneError,
};
use cgmath::Matrix4;
use luminance::UniformInterface;
use luminance_front::{
  context::GraphicsContext,
  framebuffer::Framebuffer,
  pipeline::{PipelineError, PipelineState},
  pixel::{Depth32F, NormRGB8UI},
  render_state::RenderState,
  shader::{types::Mat44, Program, Uniform},
  tess::{Mode, Tess},
  texture::{Dim2, Texture},
  Backend,
};

const VS: &str = include_str!("shaders/deformation-vs.glsl");
const FS: &str = include_str!("shaders/deformation-fs.glsl");

/// Default side of the deformation texture.
pub const DEFAULT_RESOLUTION: u32 = 500;

/// Sectors and stacks of the pressing sphere.
const SPHERE_DETAIL: u16 = 16;

// nothing pressed
const CLEAR_COLOR: [f32; 4] = [0., 0., 0., 1.];

#[derive(UniformInterface)]
struct DeformationInterface {
  model: Uniform<Mat44<f32>>,
  view: Uniform<Mat44<f32>>,
  projection: Uniform<Mat44<f32>>,
  height_scale: Uniform<f32>,
}

/// Parameters of a [`DeformationPass`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeformationConfig {
  pub resolution: u32,
  pub sphere_radius: f32,
  pub camera: SnowCamera,
  /// Deepest press, as a fraction of the camera depth, that maps to a fully pressed texel.
  pub height_scale: f32,
}

pub struct DeformationPass {
  program: Program<Semantics, (), DeformationInterface>,
  sphere: Tess<SphereVertex, SphereIndex>,
  framebuffer: Framebuffer<Dim2, NormRGB8UI, Depth32F>,
  config: DeformationConfig,
  needs_clear: bool,
}

impl DeformationPass {
  pub fn new(
    context: &mut impl GraphicsContext<Backend = Backend>,
    config: DeformationConfig,
  ) -> Result<Self, SceneError> {
    let program = context
      .new_shader_program::<Semantics, (), DeformationInterface>()
      .from_strings(VS, None, None, FS)
      .map(|built| log_warnings("deformation", built))
      .map_err(program_error("deformation"))?;

    let (vertices, indices) = sphere_vertices(config.sphere_radius, SPHERE_DETAIL, SPHERE_DETAIL);
    let sphere = context
      .new_tess()
      .set_vertices(vertices)
      .set_indices(indices)
      .set_mode(Mode::Triangle)
      .build()?;

    let resolution = config.resolution.max(1);
    let framebuffer = context.new_framebuffer::<Dim2, NormRGB8UI, Depth32F>(
      [resolution, resolution],
      0,
      nearest_sampler(),
    )?;

    log::info!("deformation texture is {}×{}", resolution, resolution);

    Ok(DeformationPass {
      program,
      sphere,
      framebuffer,
      config,
      needs_clear: true,
    })
  }

  /// Forget every press on the next render.
  pub fn reset(&mut self) {
    log::debug!("resetting deformation");
    self.needs_clear = true;
  }

  /// Press the sphere, placed with `model`, into the deformation texture.
  pub fn render(
    &mut self,
    context: &mut impl GraphicsContext<Backend = Backend>,
    model: Matrix4<f32>,
  ) -> Result<(), PipelineError> {
    let clear = std::mem::replace(&mut self.needs_clear, false);
    let pipeline_state = PipelineState::default()
      .set_clear_color(if clear { Some(CLEAR_COLOR) } else { None })
      .set_clear_depth(if clear { Some(1.) } else { None });

    let program = &mut self.program;
    let sphere = &self.sphere;
    let model = Mat44::new(model);
    let view = Mat44::new(self.config.camera.view());
    let projection = Mat44::new(self.config.camera.projection());
    let height_scale = self.config.height_scale;

    context
      .new_pipeline_gate()
      .pipeline(
        &self.framebuffer,
        &pipeline_state,
        |_, mut shd_gate| {
          shd_gate.shade(program, |mut iface, uni, mut rdr_gate| {
            iface.set(&uni.model, model);
            iface.set(&uni.view, view);
            iface.set(&uni.projection, projection);
            iface.set(&uni.height_scale, height_scale);

            rdr_gate.render(&RenderState::default(), |mut tess_gate| {
              tess_gate.render(sphere)
            })
          })
        },
      )
      .assume()
      .into_result()
  }

  /// The accumulated deformation, to bind as a displacement map, along with the sphere tessellation, to render it in
  /// other passes as well.
  pub fn outputs(&mut self) -> (&mut Texture<Dim2, NormRGB8UI>, &Tess<SphereVertex, SphereIndex>) {
    (self.framebuffer.color_slot(), &self.sphere)
  }
}
