//! Height field pressed by a sphere.
//!
//! A sphere slides along the X axis of the surface and, every frame, is rendered from behind into the deformation
//! texture. That texture is used as the displacement map of the surface instead of the material's own, so the sphere
//! leaves a groove behind it.
//!
//! Keys: main toggle reverses the spin, auxiliary toggle starts / stops it, the sphere toggle shows the sphere, and
//! left / right move the sphere. Mouse buttons select the spin axis.

use crate::{
  camera::{self, SnowCamera},
  controls::{ControlScheme, Controls, MainToggle, Response},
  deformation::{DeformationConfig, DeformationPass, DEFAULT_RESOLUTION},
  mesh::{Semantics, SurfaceVertex},
  scenes::{
    pick_material, projection_for, shade_sphere, shade_surface, sphere_program, surface_program,
    surface_tess, MaterialTextures, SphereInterface, SurfaceInterface, SurfaceMaps, Transforms,
    BACKGROUND,
  },
  Features, InputAction, LoopFeedback, PlatformServices, Scene, SceneError, SceneOptions,
};
use cgmath::Matrix4;
use luminance_front::{
  context::GraphicsContext, framebuffer::Framebuffer, pipeline::PipelineState, shader::Program,
  tess::Tess, texture::Dim2, Backend,
};

const DEFAULT_MATERIAL: &str = "snow";
const Z_FAR: f32 = 100.;
const HEIGHT_SCALE: f32 = 0.2;
const SPHERE_RADIUS: f32 = 0.2;
const SPIN_STEP: f32 = 0.3;
const LIGHT_POS: [f32; 3] = [1., 0.2, 0.7];

const SNOW_CAMERA: SnowCamera = SnowCamera {
  eye_distance: 1.,
  depth: 1.,
};

const SCHEME: ControlScheme = ControlScheme {
  sphere_step: 0.01,
  sphere_moves_vertically: false,
  sphere_key: true,
  spin_key: true,
  manual_rotation: false,
  main_toggle: MainToggle::ReverseSpin,
};

pub struct LocalScene {
  program: Program<Semantics, (), SurfaceInterface>,
  sphere_program: Program<Semantics, (), SphereInterface>,
  surface: Tess<SurfaceVertex>,
  textures: MaterialTextures,
  deformation: DeformationPass,
  controls: Controls,
  projection: Matrix4<f32>,
}

impl Scene for LocalScene {
  fn features(options: &SceneOptions) -> Features {
    match pick_material(options.material.as_deref(), DEFAULT_MATERIAL) {
      Ok(material) => Features::none().material(&material),
      Err(_) => Features::none(),
    }
  }

  fn bootstrap(
    options: &SceneOptions,
    platform: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<Self, SceneError> {
    let material = pick_material(options.material.as_deref(), DEFAULT_MATERIAL)?;
    let textures = MaterialTextures::load(context, platform, &material)?;

    let deformation = DeformationPass::new(
      context,
      DeformationConfig {
        resolution: options.deformation_resolution.unwrap_or(DEFAULT_RESOLUTION),
        sphere_radius: SPHERE_RADIUS,
        camera: SNOW_CAMERA,
        height_scale: HEIGHT_SCALE,
      },
    )?;

    let program = surface_program(context)?;
    let sphere_program = sphere_program(context)?;
    let surface = surface_tess(context)?;

    Ok(LocalScene {
      program,
      sphere_program,
      surface,
      textures,
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

    self.controls.tick(SPIN_STEP);

    let rotation = camera::model_rotation(self.controls.theta);
    let sphere_model = camera::height_field_press(self.controls.theta, self.controls.sphere[0]);

    if let Err(e) = self.deformation.render(context, sphere_model) {
      log::error!("cannot press the sphere into the surface: {}", e);
      return LoopFeedback::Exit;
    }

    let transforms = Transforms {
      model: rotation,
      view: camera::look_at_origin(),
      projection: self.projection,
      light_pos: LIGHT_POS,
    };

    let program = &mut self.program;
    let sphere_program = &mut self.sphere_program;
    let surface = &self.surface;
    let diffuse = &mut self.textures.diffuse;
    let normal = &mut self.textures.normal;
    let (pressed, sphere) = self.deformation.outputs();
    let sphere_visible = self.controls.sphere_visible;

    let render = context
      .new_pipeline_gate()
      .pipeline(
        &back_buffer,
        &PipelineState::default().set_clear_color(BACKGROUND),
        |pipeline, mut shd_gate| {
          let bound_diffuse = pipeline.bind_texture(diffuse)?;
          let bound_normal = pipeline.bind_texture(normal)?;
          let bound_pressed = pipeline.bind_texture(pressed)?;
          let maps = SurfaceMaps {
            diffuse: bound_diffuse.binding(),
            normal: bound_normal.binding(),
            depth: bound_pressed.binding(),
          };

          shade_surface(&mut shd_gate, program, surface, &transforms, maps, HEIGHT_SCALE)?;

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
