//! Platform services implementation.

use heightfield::{Features, PlatformServices};
use image::ImageError;
use std::{
  collections::HashMap,
  error::Error,
  fmt,
  path::{Path, PathBuf},
};

/// Desktop implementation of the [`PlatformServices`] API.
///
/// Every texture a scene declares in its [`Features`] is read from disk up front, so that fetching them later cannot
/// fail on I/O.
#[derive(Debug)]
pub struct DesktopPlatformServices {
  textures: HashMap<String, image::RgbImage>,
}

impl DesktopPlatformServices {
  pub fn new(texture_root: Option<&Path>, features: Features) -> Result<Self, DesktopFetchError> {
    let names = features.textures();

    if names.is_empty() {
      return Ok(Self {
        textures: HashMap::new(),
      });
    }

    let texture_root = texture_root.ok_or(DesktopFetchError::NoTextureRoot)?;
    let textures = names
      .iter()
      .map(|name| {
        let path = texture_root.join(name);
        log::debug!("loading texture {}", path.display());

        let texture = image::open(&path)
          .map(|img| img.flipv().to_rgb8())
          .map_err(|source| DesktopFetchError::ImageError { path, source })?;

        Ok((name.clone(), texture))
      })
      .collect::<Result<_, DesktopFetchError>>()?;

    Ok(Self { textures })
  }
}

#[derive(Debug)]
pub enum DesktopFetchError {
  NoTextureRoot,
  UnknownTexture(String),
  ImageError { path: PathBuf, source: ImageError },
}

impl fmt::Display for DesktopFetchError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      DesktopFetchError::NoTextureRoot => {
        write!(f, "this scene needs textures; pass their directory with --textures")
      }
      DesktopFetchError::UnknownTexture(ref name) => write!(f, "unknown texture to load: {}", name),
      DesktopFetchError::ImageError {
        ref path,
        ref source,
      } => write!(f, "cannot fetch texture {}: {}", path.display(), source),
    }
  }
}

impl Error for DesktopFetchError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match self {
      DesktopFetchError::ImageError { ref source, .. } => Some(source),
      _ => None,
    }
  }
}

impl PlatformServices for DesktopPlatformServices {
  type FetchError = DesktopFetchError;

  fn fetch_texture(&mut self, name: impl AsRef<str>) -> Result<&image::RgbImage, Self::FetchError> {
    let path = name.as_ref();
    self
      .textures
      .get(path)
      .ok_or_else(|| DesktopFetchError::UnknownTexture(path.to_owned()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn no_texture_needed_no_root_needed() {
    let mut services = DesktopPlatformServices::new(None, Features::none()).unwrap();

    assert!(matches!(
      services.fetch_texture("SnowTextures/diffuse.jpg"),
      Err(DesktopFetchError::UnknownTexture(_))
    ));
  }

  #[test]
  fn textures_require_a_root() {
    let features = Features::none().texture("SnowTextures/diffuse.jpg");

    assert!(matches!(
      DesktopPlatformServices::new(None, features),
      Err(DesktopFetchError::NoTextureRoot)
    ));
  }

  #[test]
  fn missing_texture_reports_its_path() {
    let features = Features::none().texture("nope.png");
    let err = DesktopPlatformServices::new(Some(Path::new("/nonexistent-texture-root")), features).unwrap_err();

    match err {
      DesktopFetchError::ImageError { ref path, .. } => {
        assert_eq!(path, Path::new("/nonexistent-texture-root/nope.png"))
      }
      _ => panic!("unexpected error: {}", err),
    }
  }
}
