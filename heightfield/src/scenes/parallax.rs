//! Parallax mapping on a spinning quad.
//!
//! The quad is rendered with steep parallax mapping using the diffuse, normal and displacement maps of a material.
//! It spins continuously around the selected axis (mouse buttons pick X, Y or Z), while the light sweeps over it.
//!
//! Press the main toggle to swap the material's displacement map for a procedural striped one.

use crate::{
  camera,
  controls::{ControlScheme, Controls, MainToggle, Response},
  heightmap::{striped_heightmap, STRIPES_LEVEL, STRIPES_PERIOD, STRIPES_SIZE},
  mesh::{Semantics, SurfaceVertex},
  scenes::{
    pick_material, projection_for, shade_surface, surface_program, surface_tess, MaterialTextures,
    SurfaceInterface, SurfaceMaps, Transforms, BACKGROUND,
  },
  shared::{upload_nearest, RGBTexture},
  Features, InputAction, LoopFeedback, PlatformServices, Scene, SceneError, SceneOptions,
};
use cgmath::Matrix4;
use luminance_front::{
  context::GraphicsContext, framebuffer::Framebuffer, pipeline::PipelineState, shader::Program,
  tess::Tess, texture::Dim2, Backend,
};

const DEFAULT_MATERIAL: &str = "bricks";
const Z_FAR: f32 = 5.;
const HEIGHT_SCALE: f32 = 0.1;
const SPIN_STEP: f32 = 0.1;
const LIGHT_POS: [f32; 3] = [1., 0.2, 0.7];

const SCHEME: ControlScheme = ControlScheme {
  sphere_step: 0.,
  sphere_moves_vertically: false,
  sphere_key: false,
  spin_key: false,
  manual_rotation: false,
  main_toggle: MainToggle::Scene,
};

pub struct LocalScene {
  program: Program<Semantics, (), SurfaceInterface>,
  surface: Tess<SurfaceVertex>,
  textures: MaterialTextures,
  stripes: RGBTexture,
  use_stripes: bool,
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
    let stripes = upload_nearest(
      context,
      [STRIPES_SIZE, STRIPES_SIZE],
      &striped_heightmap(STRIPES_SIZE, STRIPES_PERIOD, STRIPES_LEVEL),
    )?;

    let program = surface_program(context)?;
    let surface = surface_tess(context)?;

    let controls = Controls {
      spinning: true,
      ..Controls::default()
    };

    Ok(LocalScene {
      program,
      surface,
      textures,
      stripes,
      use_stripes: false,
      controls,
      projection: projection_for(1, 1, Z_FAR),
    })
  }

  fn render_frame(
    mut self,
    time: f32,
    back_buffer: Framebuffer<Dim2, (), ()>,
    actions: impl Iterator<Item = InputAction>,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> LoopFeedback<Self> {
    for action in actions {
      match SCHEME.apply(&mut self.controls, &action) {
        Response::Quit => return LoopFeedback::Exit,
        Response::Handled => (),
        Response::Unhandled => match action {
          InputAction::MainToggle => {
            self.use_stripes = !self.use_stripes;
            log::info!("using {} displacement", if self.use_stripes { "striped" } else { "material" });
          }

          InputAction::Resized { width, height } => {
            self.projection = projection_for(width, height, Z_FAR);
          }

          _ => (),
        },
      }
    }

    self.controls.tick(SPIN_STEP);

    let transforms = Transforms {
      model: camera::parallax_model(self.controls.theta),
      view: camera::step_back(),
      projection: self.projection,
      light_pos: [LIGHT_POS[0] * time.cos(), LIGHT_POS[1], LIGHT_POS[2]],
    };

    let program = &mut self.program;
    let surface = &self.surface;
    let diffuse = &mut self.textures.diffuse;
    let normal = &mut self.textures.normal;
    let depth = if self.use_stripes {
      &mut self.stripes
    } else {
      &mut self.textures.displacement
    };

    let render = context
      .new_pipeline_gate()
      .pipeline(
        &back_buffer,
        &PipelineState::default().set_clear_color(BACKGROUND),
        |pipeline, mut shd_gate| {
          let bound_diffuse = pipeline.bind_texture(diffuse)?;
          let bound_normal = pipeline.bind_texture(normal)?;
          let bound_depth = pipeline.bind_texture(depth)?;
          let maps = SurfaceMaps {
            diffuse: bound_diffuse.binding(),
            normal: bound_normal.binding(),
            depth: bound_depth.binding(),
          };

          shade_surface(&mut shd_gate, program, surface, &transforms, maps, HEIGHT_SCALE)
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
