mod platform;

use glfw::{Action, Context as _, Key, MouseButton, SwapInterval, WindowEvent, WindowMode};
use heightfield::{Axis, InputAction, LoopFeedback, Scene, SceneError, SceneOptions};
use luminance::framebuffer::FramebufferError;
use luminance_glfw::{GlfwSurface, GlfwSurfaceError};
use platform::{DesktopFetchError, DesktopPlatformServices};
use std::{error::Error, fmt, iter, path::PathBuf, process, time::Instant};
use structopt::StructOpt;

const WINDOW_SIZE: u32 = 700;
const WINDOW_TITLE: &str = "Height Field (mesh view)";

#[derive(Debug, StructOpt)]
pub struct CLIOpts {
  #[structopt(short, long)]
  /// Directory where to pick textures from.
  textures: Option<PathBuf>,

  #[structopt(short, long)]
  /// List available scenes.
  list_scenes: bool,

  #[structopt(short, long)]
  /// Material (or material pair, for the deforming scene) to render instead of the scene's default.
  material: Option<String>,

  #[structopt(short, long)]
  /// Side, in pixels, of the deformation texture.
  deformation_resolution: Option<u32>,

  /// Scene to run.
  scene: Option<String>,
}

/// Macro to declaratively add scenes.
macro_rules! scenes {
  ($($name:literal, $module:ident),* $(,)?) => {
    fn show_available_scenes() {
      println!("available scenes:");
      $( println!("  - {}", $name); )*

      println!("\navailable materials:");
      for material in heightfield::Material::presets() {
        println!("  - {}", material.name);
      }

      println!("\navailable material pairs (deforming):");
      for pair in heightfield::MaterialPair::names() {
        println!("  - {}", pair);
      }
    }

    // run a scene based on its name
    fn pick_and_run_scene(cli_opts: CLIOpts) -> Result<(), AppError> {
      let scene_name = cli_opts.scene.as_deref();
      match scene_name {
        $(
          Some($name) => {
            run_scene::<heightfield::scenes::$module::LocalScene>(&cli_opts, $name)
          }
        ),*

        _ => {
          log::error!("no scene found");
          show_available_scenes();
          Ok(())
        }
      }
    }
  }
}

/// Window creation failure, reported through the GLFW surface.
#[derive(Debug)]
pub struct CannotCreateWindow;

impl fmt::Display for CannotCreateWindow {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str("cannot create the window")
  }
}

impl Error for CannotCreateWindow {}

#[derive(Debug)]
pub enum AppError {
  Surface(GlfwSurfaceError<CannotCreateWindow>),
  Textures(DesktopFetchError),
  Scene(SceneError),
  BackBuffer(FramebufferError),
}

impl fmt::Display for AppError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      AppError::Surface(ref e) => write!(f, "cannot create GLFW surface: {}", e),
      AppError::Textures(ref e) => write!(f, "{}", e),
      AppError::Scene(ref e) => write!(f, "cannot bootstrap scene: {}", e),
      AppError::BackBuffer(ref e) => write!(f, "cannot get the back buffer: {}", e),
    }
  }
}

impl Error for AppError {}

impl From<GlfwSurfaceError<CannotCreateWindow>> for AppError {
  fn from(e: GlfwSurfaceError<CannotCreateWindow>) -> Self {
    AppError::Surface(e)
  }
}

impl From<DesktopFetchError> for AppError {
  fn from(e: DesktopFetchError) -> Self {
    AppError::Textures(e)
  }
}

impl From<SceneError> for AppError {
  fn from(e: SceneError) -> Self {
    AppError::Scene(e)
  }
}

impl From<FramebufferError> for AppError {
  fn from(e: FramebufferError) -> Self {
    AppError::BackBuffer(e)
  }
}

fn create_surface(name: &str) -> Result<GlfwSurface, AppError> {
  let title = format!("{} - {}", WINDOW_TITLE, name);

  let surface = GlfwSurface::new(|glfw| -> Result<_, GlfwSurfaceError<CannotCreateWindow>> {
    let (mut window, events) = glfw
      .create_window(WINDOW_SIZE, WINDOW_SIZE, &title, WindowMode::Windowed)
      .ok_or(GlfwSurfaceError::UserError(CannotCreateWindow))?;

    window.make_current();
    window.set_all_polling(true);
    glfw.set_swap_interval(SwapInterval::Sync(1));

    Ok((window, events))
  })?;

  Ok(surface)
}

// Run a scene.
fn run_scene<E>(cli_opts: &CLIOpts, name: &str) -> Result<(), AppError>
where
  E: Scene,
{
  let options = SceneOptions {
    material: cli_opts.material.clone(),
    deformation_resolution: cli_opts.deformation_resolution,
  };

  // Check the features so that we know what we need to load.
  let mut services = DesktopPlatformServices::new(cli_opts.textures.as_deref(), E::features(&options))?;

  let surface = create_surface(name)?;
  let mut context = surface.context;
  let events = surface.events_rx;

  log::info!("running {}", name);
  let scene = E::bootstrap(&options, &mut services, &mut context)?;
  let start_t = Instant::now();

  // render a dummy frame to pass a single action containing the initial framebuffer size, so that the projection is
  // right from the start
  let (fb_w, fb_h) = context.window.get_framebuffer_size();
  let back_buffer = context.back_buffer()?;
  let feedback = scene.render_frame(
    0.,
    back_buffer,
    iter::once(InputAction::Resized {
      width: fb_w as _,
      height: fb_h as _,
    }),
    &mut context,
  );
  let mut scene = match feedback {
    LoopFeedback::Exit => return Ok(()),
    LoopFeedback::Continue(scene) => scene,
  };

  'app: loop {
    // handle events
    context.window.glfw.poll_events();
    let actions = glfw::flush_messages(&events).flat_map(|(_, event)| adapt_events(event));

    let t = start_t.elapsed().as_secs_f32();
    let back_buffer = context.back_buffer()?;
    let feedback = scene.render_frame(t, back_buffer, actions, &mut context);

    if let LoopFeedback::Continue(stepped) = feedback {
      scene = stepped;
      context.window.swap_buffers();
    } else {
      break 'app;
    }
  }

  log::info!("bye");
  Ok(())
}

fn adapt_events(event: WindowEvent) -> Vec<InputAction> {
  match event {
    WindowEvent::Close => vec![InputAction::Quit],

    WindowEvent::Key(key, _, Action::Press, _) => {
      log::debug!("key press: {:?}", key);
      match key {
        Key::Escape | Key::Q => vec![InputAction::Quit],
        Key::Space => vec![InputAction::MainToggle],
        Key::R => vec![InputAction::AuxiliaryToggle],
        Key::C => vec![InputAction::Reset],
        // the sphere toggle of one scene is the backward move of another
        Key::S => vec![InputAction::Backward, InputAction::SphereToggle],
        _ => adapt_repeatable(key).into_iter().collect(),
      }
    }

    WindowEvent::Key(key, _, Action::Repeat, _) => match key {
      Key::S => vec![InputAction::Backward],
      _ => adapt_repeatable(key).into_iter().collect(),
    },

    WindowEvent::MouseButton(button, Action::Press, _) => match button {
      MouseButton::Button1 => vec![InputAction::SelectAxis(Axis::X)],
      MouseButton::Button3 => vec![InputAction::SelectAxis(Axis::Y)],
      MouseButton::Button2 => vec![InputAction::SelectAxis(Axis::Z)],
      _ => Vec::new(),
    },

    WindowEvent::FramebufferSize(width, height) => vec![InputAction::Resized {
      width: width as _,
      height: height as _,
    }],

    _ => Vec::new(),
  }
}

// keys that keep acting while held down
fn adapt_repeatable(key: Key) -> Option<InputAction> {
  match key {
    Key::W => Some(InputAction::Forward),
    Key::A => Some(InputAction::Left),
    Key::D => Some(InputAction::Right),
    Key::I => Some(InputAction::PitchUp),
    Key::K => Some(InputAction::PitchDown),
    Key::J => Some(InputAction::YawLeft),
    Key::L => Some(InputAction::YawRight),
    _ => None,
  }
}

scenes! {
  "parallax", parallax,
  "height-field", height_field,
  "deforming", deforming,
}

fn main() {
  env_logger::builder()
    .filter_level(log::LevelFilter::Info)
    .parse_default_env()
    .init();
  let cli_opts = CLIOpts::from_args();

  if cli_opts.list_scenes {
    show_available_scenes();
  } else if let Err(e) = pick_and_run_scene(cli_opts) {
    log::error!("{}", e);
    process::exit(1);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use glfw::Modifiers;

  fn press(key: Key) -> WindowEvent {
    WindowEvent::Key(key, 0, Action::Press, Modifiers::empty())
  }

  fn repeat(key: Key) -> WindowEvent {
    WindowEvent::Key(key, 0, Action::Repeat, Modifiers::empty())
  }

  #[test]
  fn quit_keys() {
    assert_eq!(adapt_events(press(Key::Escape)), vec![InputAction::Quit]);
    assert_eq!(adapt_events(press(Key::Q)), vec![InputAction::Quit]);
    assert_eq!(adapt_events(WindowEvent::Close), vec![InputAction::Quit]);
  }

  #[test]
  fn s_moves_back_and_toggles_sphere() {
    assert_eq!(
      adapt_events(press(Key::S)),
      vec![InputAction::Backward, InputAction::SphereToggle]
    );
    assert_eq!(adapt_events(repeat(Key::S)), vec![InputAction::Backward]);
  }

  #[test]
  fn toggles_do_not_repeat() {
    assert_eq!(adapt_events(press(Key::Space)), vec![InputAction::MainToggle]);
    assert!(adapt_events(repeat(Key::Space)).is_empty());
    assert!(adapt_events(repeat(Key::R)).is_empty());
  }

  #[test]
  fn held_keys_repeat() {
    assert_eq!(adapt_events(repeat(Key::J)), vec![InputAction::YawLeft]);
    assert_eq!(adapt_events(press(Key::I)), vec![InputAction::PitchUp]);
  }

  #[test]
  fn mouse_buttons_select_axes() {
    let click = |button| WindowEvent::MouseButton(button, Action::Press, Modifiers::empty());

    assert_eq!(
      adapt_events(click(MouseButton::Button1)),
      vec![InputAction::SelectAxis(Axis::X)]
    );
    assert_eq!(
      adapt_events(click(MouseButton::Button3)),
      vec![InputAction::SelectAxis(Axis::Y)]
    );
    assert_eq!(
      adapt_events(click(MouseButton::Button2)),
      vec![InputAction::SelectAxis(Axis::Z)]
    );
  }
}
