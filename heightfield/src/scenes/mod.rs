//! The scenes, and the pieces they share: the parallax-mapped surface, its materials and the visible sphere.

use crate::{
  camera,
  material::Material,
  mesh::{surface_quad, Semantics, SphereIndex, SphereVertex, SurfaceVertex},
  shared::{load_texture, log_warnings, program_error, RGBTexture},
  PlatformServices, SceneError,
};
use cgmath::Matrix4;
use luminance::UniformInterface;
use luminance_front::{
  context::GraphicsContext,
  pipeline::{PipelineError, TextureBinding},
  pixel::NormUnsigned,
  render_state::RenderState,
  shader::{
    types::{Mat44, Vec3},
    Program, Uniform,
  },
  shading_gate::ShadingGate,
  tess::{Mode, Tess},
  texture::Dim2,
  Backend,
};

pub mod deforming;
pub mod height_field;
pub mod parallax;

const SURFACE_VS: &str = include_str!("../shaders/surface-vs.glsl");
const PARALLAX_FS: &str = include_str!("../shaders/parallax-fs.glsl");
const SPHERE_VS: &str = include_str!("../shaders/sphere-vs.glsl");
const SPHERE_FS: &str = include_str!("../shaders/sphere-fs.glsl");

/// Color the back buffer is cleared with.
const BACKGROUND: [f32; 4] = [1., 1., 1., 1.];

/// Uniforms of the single-material parallax program.
#[derive(UniformInterface)]
pub(crate) struct SurfaceInterface {
  model: Uniform<Mat44<f32>>,
  view: Uniform<Mat44<f32>>,
  projection: Uniform<Mat44<f32>>,
  view_pos: Uniform<Vec3<f32>>,
  light_pos: Uniform<Vec3<f32>>,
  diffuse_map: Uniform<TextureBinding<Dim2, NormUnsigned>>,
  normal_map: Uniform<TextureBinding<Dim2, NormUnsigned>>,
  depth_map: Uniform<TextureBinding<Dim2, NormUnsigned>>,
  height_scale: Uniform<f32>,
}

/// Uniforms of the program drawing the sphere itself.
#[derive(UniformInterface)]
pub(crate) struct SphereInterface {
  model: Uniform<Mat44<f32>>,
  view: Uniform<Mat44<f32>>,
  projection: Uniform<Mat44<f32>>,
  light_pos: Uniform<Vec3<f32>>,
}

/// Matrices and lighting of a frame of the main pass.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Transforms {
  pub model: Matrix4<f32>,
  pub view: Matrix4<f32>,
  pub projection: Matrix4<f32>,
  pub light_pos: [f32; 3],
}

impl Transforms {
  fn model(&self) -> Mat44<f32> {
    Mat44::new(self.model)
  }

  fn view(&self) -> Mat44<f32> {
    Mat44::new(self.view)
  }

  fn projection(&self) -> Mat44<f32> {
    Mat44::new(self.projection)
  }

  fn light_pos(&self) -> Vec3<f32> {
    vec3(self.light_pos)
  }
}

fn vec3([x, y, z]: [f32; 3]) -> Vec3<f32> {
  Vec3::new(x, y, z)
}

/// GPU textures of a [`Material`].
pub(crate) struct MaterialTextures {
  pub diffuse: RGBTexture,
  pub normal: RGBTexture,
  pub displacement: RGBTexture,
}

impl MaterialTextures {
  pub fn load(
    context: &mut impl GraphicsContext<Backend = Backend>,
    platform: &mut impl PlatformServices,
    material: &Material,
  ) -> Result<Self, SceneError> {
    log::info!("loading material {}", material.name);

    Ok(MaterialTextures {
      diffuse: load_texture(context, platform, material.diffuse)?,
      normal: load_texture(context, platform, material.normal)?,
      displacement: load_texture(context, platform, material.displacement)?,
    })
  }
}

/// Resolve the material asked for on the command line, or the scene's default.
pub(crate) fn pick_material(asked: Option<&str>, default: &str) -> Result<Material, SceneError> {
  Ok(asked.unwrap_or(default).parse()?)
}

pub(crate) fn surface_tess(
  context: &mut impl GraphicsContext<Backend = Backend>,
) -> Result<Tess<SurfaceVertex>, SceneError> {
  let vertices: Vec<SurfaceVertex> = surface_quad()?.iter().copied().map(SurfaceVertex::from).collect();

  Ok(
    context
      .new_tess()
      .set_vertices(vertices)
      .set_mode(Mode::Triangle)
      .build()?,
  )
}

pub(crate) fn surface_program(
  context: &mut impl GraphicsContext<Backend = Backend>,
) -> Result<Program<Semantics, (), SurfaceInterface>, SceneError> {
  context
    .new_shader_program::<Semantics, (), SurfaceInterface>()
    .from_strings(SURFACE_VS, None, None, PARALLAX_FS)
    .map(|built| log_warnings("surface", built))
    .map_err(program_error("surface"))
}

pub(crate) fn sphere_program(
  context: &mut impl GraphicsContext<Backend = Backend>,
) -> Result<Program<Semantics, (), SphereInterface>, SceneError> {
  context
    .new_shader_program::<Semantics, (), SphereInterface>()
    .from_strings(SPHERE_VS, None, None, SPHERE_FS)
    .map(|built| log_warnings("sphere", built))
    .map_err(program_error("sphere"))
}

/// Texture bindings of a single-material surface.
pub(crate) struct SurfaceMaps {
  pub diffuse: TextureBinding<Dim2, NormUnsigned>,
  pub normal: TextureBinding<Dim2, NormUnsigned>,
  pub depth: TextureBinding<Dim2, NormUnsigned>,
}

/// Render the parallax-mapped surface.
pub(crate) fn shade_surface(
  shd_gate: &mut ShadingGate,
  program: &mut Program<Semantics, (), SurfaceInterface>,
  surface: &Tess<SurfaceVertex>,
  transforms: &Transforms,
  maps: SurfaceMaps,
  height_scale: f32,
) -> Result<(), PipelineError> {
  shd_gate.shade(program, |mut iface, uni, mut rdr_gate| {
    iface.set(&uni.model, transforms.model());
    iface.set(&uni.view, transforms.view());
    iface.set(&uni.projection, transforms.projection());
    iface.set(&uni.view_pos, vec3(camera::VIEWER_POSITION));
    iface.set(&uni.light_pos, transforms.light_pos());
    iface.set(&uni.diffuse_map, maps.diffuse);
    iface.set(&uni.normal_map, maps.normal);
    iface.set(&uni.depth_map, maps.depth);
    iface.set(&uni.height_scale, height_scale);

    rdr_gate.render(&RenderState::default(), |mut tess_gate| {
      tess_gate.render(surface)
    })
  })
}

/// Render the sphere at `model`, reusing the camera and light of `transforms`.
pub(crate) fn shade_sphere(
  shd_gate: &mut ShadingGate,
  program: &mut Program<Semantics, (), SphereInterface>,
  sphere: &Tess<SphereVertex, SphereIndex>,
  transforms: &Transforms,
  model: Matrix4<f32>,
) -> Result<(), PipelineError> {
  shd_gate.shade(program, |mut iface, uni, mut rdr_gate| {
    iface.set(&uni.model, Mat44::new(model));
    iface.set(&uni.view, transforms.view());
    iface.set(&uni.projection, transforms.projection());
    iface.set(&uni.light_pos, transforms.light_pos());

    rdr_gate.render(&RenderState::default(), |mut tess_gate| {
      tess_gate.render(sphere)
    })
  })
}

/// Projection matrix for a framebuffer of the given size.
pub(crate) fn projection_for(width: u32, height: u32, z_far: f32) -> Matrix4<f32> {
  let aspect_ratio = camera::aspect_ratio(width, height);
  log::debug!("resized: {}×{} (aspect ratio {})", width, height, aspect_ratio);

  camera::projection(aspect_ratio, z_far)
}
