use luminance_front::{
  context::GraphicsContext,
  pixel::NormRGB8UI,
  shader::{BuiltProgram, Program},
  texture::{Dim2, MagFilter, MinFilter, Sampler, TexelUpload, Texture, Wrap},
  Backend,
};

use crate::{PlatformServices, SceneError};
use luminance::shader::ProgramError;

/// RGB texture.
pub type RGBTexture = Texture<Dim2, NormRGB8UI>;

/// Sampler used by material textures: tiled, trilinear.
pub fn material_sampler() -> Sampler {
  Sampler {
    wrap_r: Wrap::Repeat,
    wrap_s: Wrap::Repeat,
    wrap_t: Wrap::Repeat,
    min_filter: MinFilter::LinearMipmapLinear,
    mag_filter: MagFilter::Linear,
    depth_comparison: None,
  }
}

/// Sampler used by generated height textures: no filtering, so that texels stay crisp.
pub fn nearest_sampler() -> Sampler {
  Sampler {
    min_filter: MinFilter::Nearest,
    mag_filter: MagFilter::Nearest,
    ..Sampler::default()
  }
}

/// Number of mipmaps below the base level for a texture of the given size.
pub fn mipmap_count(width: u32, height: u32) -> usize {
  let side = width.max(height).max(1);
  (u32::BITS - 1 - side.leading_zeros()) as usize
}

pub fn load_texture(
  context: &mut impl GraphicsContext<Backend = Backend>,
  platform: &mut impl PlatformServices,
  name: impl AsRef<str>,
) -> Result<RGBTexture, SceneError> {
  let name = name.as_ref();
  let img = platform
    .fetch_texture(name)
    .map_err(|e| SceneError::CannotFetchTexture {
      name: name.to_owned(),
      source: Box::new(e),
    })?;
  let (width, height) = img.dimensions();
  let texels = img.as_raw();
  let mipmaps = mipmap_count(width, height);

  log::debug!("uploading {} ({}×{}, {} mipmaps)", name, width, height, mipmaps);

  context
    .new_texture_raw(
      [width, height],
      material_sampler(),
      TexelUpload::base_level(texels, mipmaps),
    )
    .map_err(SceneError::CannotCreateTexture)
}

/// Upload raw RGB8 texels as a texture sampled with nearest filtering.
pub fn upload_nearest(
  context: &mut impl GraphicsContext<Backend = Backend>,
  size: [u32; 2],
  texels: &[u8],
) -> Result<RGBTexture, SceneError> {
  context
    .new_texture_raw(
      size,
      nearest_sampler(),
      TexelUpload::base_level(texels, 0),
    )
    .map_err(SceneError::CannotCreateTexture)
}

/// Turn a shader program build failure into a [`SceneError`]; the caller reports it.
pub fn program_error(name: &'static str) -> impl FnOnce(ProgramError) -> SceneError {
  move |source| SceneError::CannotBuildProgram { name, source }
}

/// Unwrap a freshly built program, logging its warnings.
pub fn log_warnings<Sem, Out, Uni>(
  name: &str,
  built: BuiltProgram<Sem, Out, Uni>,
) -> Program<Sem, Out, Uni> {
  let BuiltProgram { program, warnings } = built;

  for warning in &warnings {
    log::warn!("{} shader warning: {:?}", name, warning);
  }

  program
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn mipmaps_go_down_to_one_texel() {
    assert_eq!(mipmap_count(1, 1), 0);
    assert_eq!(mipmap_count(2, 1), 1);
    assert_eq!(mipmap_count(512, 512), 9);
    assert_eq!(mipmap_count(1024, 300), 10);
    assert_eq!(mipmap_count(1000, 700), 9);
  }

  #[test]
  fn degenerate_size_has_no_mipmaps() {
    assert_eq!(mipmap_count(0, 0), 0);
  }

  #[test]
  fn program_error_names_the_program() {
    let err = program_error("blend")(ProgramError::LinkFailed("missing main".to_owned()));

    match err {
      SceneError::CannotBuildProgram { name, .. } => assert_eq!(name, "blend"),
      _ => panic!("unexpected error: {}", err),
    }
  }
}
