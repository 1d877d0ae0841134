//! Snow deformation.
//!
//! The surface is made of two materials: a surface one (snow) lying on top of an exposed one (ice). The sphere is
//! pressed into the surface through the deformation pass; where it sinks the surface all the way down, the exposed
//! material shows through. Nothing is ever cleared unless asked, so the sphere carves paths as it moves.
//!
//! Keys: forward / backward / left / right move the sphere, pitch / yaw tilt the surface, the main toggle shows the
//! sphere, and reset flattens the surface again.

use crate::{
  camera::{self, SnowCamera},
  controls::{ControlScheme, Controls, MainToggle, Response},
  deformation::{DeformationConfig, DeformationPass, DEFAULT_RESOLUTION},
  material::MaterialPair,
  mesh::{Semantics, SurfaceVertex},
  scenes::{
    projection_for, shade_sphere, sphere_program, surface_tess, vec3, MaterialTextures,
    SphereInterface, Transforms, BACKGROUND, SURFACE_VS,
  },
  shared::{log_warnings, program_error},
  Features, InputAction, LoopFeedback, PlatformServices, Scene, SceneError, SceneOptions,
};
use cgmath::Matrix4;
use luminance::UniformInterface;
use luminance_front::{
  context::GraphicsContext,
  framebuffer::Framebuffer,
  pipeline::{PipelineError, PipelineState, TextureBinding},
  pixel::NormUnsigned,
  render_state::RenderState,
  shader::{
    types::{Mat44, Vec3},
    Program, Uniform,
  },
  tess::Tess,
  texture::Dim2,
  Backend,
};

const BLEND_FS: &str = include_str!("../shaders/blend-fs.glsl");

const DEFAULT_PAIR: &str = "snow-ice";
const Z_FAR: f32 = 100.;
const HEIGHT_SCALE: f32 = 0.4;
const PUSHED_SCALE: f32 = 0.2;
const SPHERE_RADIUS: f32 = 0.3;
const LIGHT_POS: [f32; 3] = [1., 0.4, 0.7];

const SNOW_CAMERA: SnowCamera = SnowCamera {
  eye_distance: 0.5,
  depth: 0.5,
};

const SCHEME: ControlScheme = ControlScheme {
  sphere_step: 0.02,
  sphere_moves_vertically: true,
  sphere_key: false,
  spin_key: false,
  manual_rotation: true,
  main_toggle: MainToggle::Sphere,
};

#[derive(UniformInterface)]
struct BlendInterface {
  model: Uniform<Mat44<f32>>,
  view: Uniform<Mat44<f32>>,
  projection: Uniform<Mat44<f32>>,
  view_pos: Uniform<Vec3<f32>>,
  light_pos: Uniform<Vec3<f32>>,
  diffuse_map: Uniform<TextureBinding<Dim2, NormUnsigned>>,
  normal_map: Uniform<TextureBinding<Dim2, NormUnsigned>>,
  static_depth_map: Uniform<TextureBinding<Dim2, NormUnsigned>>,
  depth_map: Uniform<TextureBinding<Dim2, NormUnsigned>>,
  exposed_diffuse_map: Uniform<TextureBinding<Dim2, NormUnsigned>>,
  exposed_normal_map: Uniform<TextureBinding<Dim2, NormUnsigned>>,
  exposed_depth_map: Uniform<TextureBinding<Dim2, NormUnsigned>>,
  height_scale: Uniform<f32>,
  pushed_scale: Uniform<f32>,
}

pub struct LocalScene {
  program: Program<Semantics, (), BlendInterface>,
  sphere_program: Program<Semantics, (), SphereInterface>,
  surface: Tess<SurfaceVertex>,
  textures: MaterialTextures,
  exposed: MaterialTextures,
  deformation: DeformationPass,
  controls: Controls,
  projection: Matrix4<f32>,
}

fn pick_pair(options: &SceneOptions) -> Result<MaterialPair, SceneError> {
  Ok(options.material.as_deref().unwrap_or(DEFAULT_PAIR).parse()?)
}

impl Scene for LocalScene {
  fn features(options: &SceneOptions) -> Features {
    match pick_pair(options) {
      Ok(pair) => Features::none()
        .material(&pair.surface)
        .material(&pair.exposed),
      Err(_) => Features::none(),
    }
  }

  fn bootstrap(
    options: &SceneOptions,
    platform: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<Self, SceneError> {
    let pair = pick_pair(options)?;
    log::info!("pressing {} into {}", pair.exposed.name, pair.surface.name);

    let textures = MaterialTextures::load(context, platform, &pair.surface)?;
    let exposed = MaterialTextures::load(context, platform, &pair.exposed)?;

    let deformation = DeformationPass::new(
      context,
      DeformationConfig {
        resolution: options.deformation_resolution.unwrap_or(DEFAULT_RESOLUTION),
        sphere_radius: SPHERE_RADIUS,
        camera: SNOW_CAMERA,
        height_scale: HEIGHT_SCALE,
      },
    )?;

    let program = context
      .new_shader_program::<Semantics, (), BlendInterface>()
      .from_strings(SURFACE_VS, None, None, BLEND_FS)
      .map(|built| log_warnings("blend", built))
      .map_err(program_error("blend"))?;
    let sphere_program = sphere_program(context)?;
    let surface = surface_tess(context)?;

    Ok(LocalScene {
      program,
      sphere_program,
      surface,
      textures,
      exposed,
      deformation,
      controls: Controls::default(),
      projection: projection_for(1, 1, Z_FAR),
    })
  }

  fn render_frame(
    mut self,
    _: f32,
    back_buffer: Framebuffer<Dim2, (), ()>,
    actions: impl Iterator<Item = InputAction>,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> LoopFeedback<Self> {
    for action in actions {
      match SCHEME.apply(&mut self.controls, &action) {
        Response::Quit => return LoopFeedback::Exit,
        Response::Handled => (),
        Response::Unhandled => match action {
          InputAction::Reset => self.deformation.reset(),

          InputAction::Resized { width, height } => {
            self.projection = projection_for(width, height, Z_FAR);
          }

          _ => (),
        },
      }
    }

    let pressing_model = camera::deforming_press(self.controls.sphere);
    if let Err(e) = self.deformation.render(context, pressing_model) {
      log::error!("cannot press the sphere into the surface: {}", e);
      return LoopFeedback::Exit;
    }

    let rotation = camera::model_rotation(self.controls.theta);
    let sphere_model = camera::sphere_model(self.controls.theta, self.controls.sphere);
    let transforms = Transforms {
      model: rotation,
      view: camera::look_at_origin(),
      projection: self.projection,
      light_pos: LIGHT_POS,
    };

    let program = &mut self.program;
    let sphere_program = &mut self.sphere_program;
    let surface = &self.surface;
    let textures = &mut self.textures;
    let exposed = &mut self.exposed;
    let (pressed, sphere) = self.deformation.outputs();
    let sphere_visible = self.controls.sphere_visible;

    let render = context
      .new_pipeline_gate()
      .pipeline(
        &back_buffer,
        &PipelineState::default().set_clear_color(BACKGROUND),
        |pipeline, mut shd_gate| {
          let diffuse = pipeline.bind_texture(&mut textures.diffuse)?;
          let normal = pipeline.bind_texture(&mut textures.normal)?;
          let static_depth = pipeline.bind_texture(&mut textures.displacement)?;
          let depth = pipeline.bind_texture(pressed)?;
          let exposed_diffuse = pipeline.bind_texture(&mut exposed.diffuse)?;
          let exposed_normal = pipeline.bind_texture(&mut exposed.normal)?;
          let exposed_depth = pipeline.bind_texture(&mut exposed.displacement)?;

          shd_gate.shade(program, |mut iface, uni, mut rdr_gate| -> Result<(), PipelineError> {
            iface.set(&uni.model, transforms.model());
            iface.set(&uni.view, transforms.view());
            iface.set(&uni.projection, transforms.projection());
            iface.set(&uni.view_pos, vec3(camera::VIEWER_POSITION));
            iface.set(&uni.light_pos, transforms.light_pos());
            iface.set(&uni.diffuse_map, diffuse.binding());
            iface.set(&uni.normal_map, normal.binding());
            iface.set(&uni.static_depth_map, static_depth.binding());
            iface.set(&uni.depth_map, depth.binding());
            iface.set(&uni.exposed_diffuse_map, exposed_diffuse.binding());
            iface.set(&uni.exposed_normal_map, exposed_normal.binding());
            iface.set(&uni.exposed_depth_map, exposed_depth.binding());
            iface.set(&uni.height_scale, HEIGHT_SCALE);
            iface.set(&uni.pushed_scale, PUSHED_SCALE);

            rdr_gate.render(&RenderState::default(), |mut tess_gate| {
              tess_gate.render(surface)
            })
          })?;

          if sphere_visible {
            shade_sphere(&mut shd_gate, sphere_program, sphere, &transforms, sphere_model)?;
          }

          Ok(())
        },
      )
      .assume()
      .into_result();

    match render {
      Ok(()) => LoopFeedback::Continue(self),
      Err(e) => {
        log::error!("cannot render frame: {}", e);
        LoopFeedback::Exit
      }
    }
  }
}
