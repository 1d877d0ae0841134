//! Height-field scenes.
//!
//! This crate provides a set of small scenes rendering a textured quad with parallax mapping. Some of them also run an
//! offscreen pass that rasterizes a sphere into a height texture, which is then sampled as an extra displacement map
//! to press the sphere's trail into the surface (“snow deformation”).
//!
//! # Scene architecture
//!
//! Scenes are simple modules exposed from [`scenes`]. They do not depend on any platform-specific concepts, such as
//! system events or system window capacities. Whenever a scene requires user interaction, an abstract
//! [`InputAction`] is used, which the platform code running the scene produces from its own events.
//!
//! Scenes are responsible in allocating the luminance resources and implementing their render loop by using the
//! [`Scene`] trait. Everything a scene needs from the outside world (textures, mostly) goes through
//! [`PlatformServices`].

use luminance_front::{context::GraphicsContext, framebuffer::Framebuffer, texture::Dim2, Backend};
use std::{collections::HashSet, error::Error, fmt};

pub mod camera;
pub mod controls;
pub mod deformation;
pub mod heightmap;
pub mod material;
pub mod mesh;
pub mod scenes;
mod shared;
pub mod tangent;

pub use crate::controls::Axis;
pub use crate::material::{Material, MaterialPair};

/// Scene interface.
pub trait Scene: Sized {
  /// Features (textures, mostly) the scene needs the platform to provide.
  fn features(options: &SceneOptions) -> Features {
    let _ = options;
    Features::none()
  }

  /// Bootstrap the scene.
  fn bootstrap(
    options: &SceneOptions,
    platform: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<Self, SceneError>;

  /// Render a frame of the scene.
  fn render_frame(
    self,
    time: f32,
    back_buffer: Framebuffer<Dim2, (), ()>,
    actions: impl Iterator<Item = InputAction>,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> LoopFeedback<Self>;
}

/// Options shared by all scenes, usually coming from the command line.
#[derive(Clone, Debug, Default)]
pub struct SceneOptions {
  /// Material to render; scenes fall back to their own default when absent.
  pub material: Option<String>,

  /// Side, in pixels, of the square deformation texture.
  pub deformation_resolution: Option<u32>,
}

/// A type used to pass “inputs” to scenes.
#[derive(Clone, Debug, PartialEq)]
pub enum InputAction {
  /// Quit the application.
  Quit,

  /// Main action. Typically used to switch an effect on and off or to reverse it.
  MainToggle,

  /// Auxiliary action. Often used to start and stop the automatic spin.
  AuxiliaryToggle,

  /// Show or hide the sphere.
  SphereToggle,

  /// Reset the accumulated deformation.
  Reset,

  /// Move forward (up the surface).
  Forward,

  /// Move backward (down the surface).
  Backward,

  /// Move left.
  Left,

  /// Move right.
  Right,

  /// Tilt the surface around the X axis, positively.
  PitchUp,

  /// Tilt the surface around the X axis, negatively.
  PitchDown,

  /// Turn the surface around the Y axis, negatively.
  YawLeft,

  /// Turn the surface around the Y axis, positively.
  YawRight,

  /// Select the axis the surface spins around.
  SelectAxis(Axis),

  /// Framebuffer size changed.
  Resized { width: u32, height: u32 },
}

/// Scene feedback after a frame has been rendered.
#[derive(Debug)]
pub enum LoopFeedback<T> {
  Continue(T),
  Exit,
}

/// Platform services, such as texture fetching.
pub trait PlatformServices {
  type FetchError: Error + 'static;

  fn fetch_texture(&mut self, name: impl AsRef<str>) -> Result<&image::RgbImage, Self::FetchError>;
}

/// Features a scene requires from its platform.
#[derive(Debug, Default)]
pub struct Features {
  textures: HashSet<String>,
}

impl Features {
  pub fn none() -> Self {
    Self::default()
  }

  pub fn texture(mut self, name: impl Into<String>) -> Self {
    self.textures.insert(name.into());
    self
  }

  pub fn material(self, material: &Material) -> Self {
    material
      .texture_names()
      .iter()
      .fold(self, |features, name| features.texture(*name))
  }

  pub fn textures(&self) -> &HashSet<String> {
    &self.textures
  }
}

/// Everything that can go wrong while bootstrapping a scene.
#[derive(Debug)]
pub enum SceneError {
  /// A texture could not be fetched from the platform.
  CannotFetchTexture {
    name: String,
    source: Box<dyn Error>,
  },

  /// A texture could not be created on the GPU.
  CannotCreateTexture(luminance::texture::TextureError),

  /// A shader program failed to build.
  CannotBuildProgram {
    name: &'static str,
    source: luminance::shader::ProgramError,
  },

  /// A tessellation failed to build.
  CannotBuildTess(luminance::tess::TessError),

  /// An offscreen framebuffer could not be created.
  CannotCreateFramebuffer(luminance::framebuffer::FramebufferError),

  /// The mesh data is unusable.
  InvalidMesh(mesh::MeshError),

  /// An unknown material name was asked for.
  UnknownMaterial(material::UnknownMaterial),
}

impl fmt::Display for SceneError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      SceneError::CannotFetchTexture {
        ref name,
        ref source,
      } => write!(f, "cannot fetch texture {}: {}", name, source),
      SceneError::CannotCreateTexture(ref e) => write!(f, "cannot create texture: {}", e),
      SceneError::CannotBuildProgram {
        name,
        ref source,
      } => write!(f, "cannot build {} program: {}", name, source),
      SceneError::CannotBuildTess(ref e) => write!(f, "cannot build tessellation: {}", e),
      SceneError::CannotCreateFramebuffer(ref e) => write!(f, "cannot create framebuffer: {}", e),
      SceneError::InvalidMesh(ref e) => write!(f, "invalid mesh: {}", e),
      SceneError::UnknownMaterial(ref e) => write!(f, "{}", e),
    }
  }
}

impl Error for SceneError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match *self {
      SceneError::CannotFetchTexture { ref source, .. } => Some(source.as_ref()),
      SceneError::CannotCreateTexture(ref e) => Some(e),
      SceneError::CannotBuildProgram { ref source, .. } => Some(source),
      SceneError::CannotBuildTess(ref e) => Some(e),
      SceneError::CannotCreateFramebuffer(ref e) => Some(e),
      SceneError::InvalidMesh(ref e) => Some(e),
      SceneError::UnknownMaterial(ref e) => Some(e),
    }
  }
}

impl From<luminance::texture::TextureError> for SceneError {
  fn from(e: luminance::texture::TextureError) -> Self {
    SceneError::CannotCreateTexture(e)
  }
}

impl From<luminance::tess::TessError> for SceneError {
  fn from(e: luminance::tess::TessError) -> Self {
    SceneError::CannotBuildTess(e)
  }
}

impl From<luminance::framebuffer::FramebufferError> for SceneError {
  fn from(e: luminance::framebuffer::FramebufferError) -> Self {
    SceneError::CannotCreateFramebuffer(e)
  }
}

impl From<mesh::MeshError> for SceneError {
  fn from(e: mesh::MeshError) -> Self {
    SceneError::InvalidMesh(e)
  }
}

impl From<material::UnknownMaterial> for SceneError {
  fn from(e: material::UnknownMaterial) -> Self {
    SceneError::UnknownMaterial(e)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn features_collect_material_textures_once() {
    let snow = Material::preset("snow").unwrap();
    let features = Features::none()
      .texture("SnowTextures/diffuse.jpg")
      .material(&snow);

    assert_eq!(features.textures().len(), 3);
    assert!(features.textures().contains("SnowTextures/height.jpg"));
  }

  #[test]
  fn scene_errors_keep_their_cause() {
    let err = SceneError::from(mesh::MeshError::DegenerateUV(1));
    let source = err.source().unwrap();

    assert_eq!(source.to_string(), "triangle 1 has degenerate texture coordinates");

    let unknown = "lava".parse::<Material>().unwrap_err();
    let err = SceneError::CannotFetchTexture {
      name: "LavaTextures/diffuse.jpg".to_owned(),
      source: Box::new(unknown.clone()),
    };

    assert_eq!(err.source().unwrap().to_string(), unknown.to_string());
  }
}
