//! Texture sets.
//!
//! A [`Material`] is the triple of images a parallax-mapped surface needs: a diffuse (albedo) map, a tangent-space
//! normal map and a displacement (height) map. Paths are relative to the texture root handed to the platform.

use std::{error::Error, fmt, str::FromStr};

/// Diffuse, normal and displacement maps of a surface.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Material {
  pub name: &'static str,
  pub diffuse: &'static str,
  pub normal: &'static str,
  pub displacement: &'static str,
}

const fn material(
  name: &'static str,
  diffuse: &'static str,
  normal: &'static str,
  displacement: &'static str,
) -> Material {
  Material {
    name,
    diffuse,
    normal,
    displacement,
  }
}

#[rustfmt::skip]
const PRESETS: [Material; 9] = [
  material("snow", "SnowTextures/diffuse.jpg", "SnowTextures/normal.jpg", "SnowTextures/height.jpg"),
  material("fresh-snow", "SnowTextures2/diffuse.jpg", "SnowTextures2/normal.png", "SnowTextures2/displacement.png"),
  material("ice", "IceTextures/diffuse.jpg", "IceTextures/normal.png", "IceTextures/displacement.png"),
  material("sand", "SandTextures/diffuse.jpg", "SandTextures/normal.png", "SandTextures/displacement.png"),
  material("path", "PathTextures/diffuse.jpg", "PathTextures/normal.png", "PathTextures/displacement.png"),
  material("mud", "MudTextures/diffuse.jpg", "MudTextures/normal.png", "MudTextures/displacement.png"),
  material("dry-mud", "DryMudTextures/diffuse.jpg", "DryMudTextures/normal.png", "DryMudTextures/displacement.png"),
  material("bricks", "BrickTextures/bricks2.jpg", "BrickTextures/bricks2_normal.jpg", "BrickTextures/parallax_mapping_height_map.png"),
  material("wood", "WoodTextures/wood.png", "WoodTextures/toy_box_normal.png", "WoodTextures/toy_box_disp.png"),
];

impl Material {
  /// All known presets.
  pub fn presets() -> &'static [Material] {
    &PRESETS
  }

  /// Look a preset up by name.
  pub fn preset(name: &str) -> Option<Material> {
    PRESETS.iter().copied().find(|m| m.name == name)
  }

  /// Diffuse, normal and displacement paths, in that order.
  pub fn texture_names(&self) -> [&'static str; 3] {
    [self.diffuse, self.normal, self.displacement]
  }
}

impl FromStr for Material {
  type Err = UnknownMaterial;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Material::preset(s).ok_or_else(|| UnknownMaterial {
      name: s.to_owned(),
      known: PRESETS.iter().map(|m| m.name).collect(),
    })
  }
}

/// Two materials blended together: `surface` on top, `exposed` revealed where the surface is pushed down.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MaterialPair {
  pub name: &'static str,
  pub surface: Material,
  pub exposed: Material,
}

const PAIRS: [(&str, &str, &str); 3] = [
  ("snow-ice", "fresh-snow", "ice"),
  ("sand-path", "sand", "path"),
  ("mud-dry-mud", "mud", "dry-mud"),
];

impl MaterialPair {
  pub fn names() -> impl Iterator<Item = &'static str> {
    PAIRS.iter().map(|&(name, _, _)| name)
  }
}

impl FromStr for MaterialPair {
  type Err = UnknownMaterial;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    PAIRS
      .iter()
      .find(|&&(name, _, _)| name == s)
      .and_then(|&(name, surface, exposed)| {
        Some(MaterialPair {
          name,
          surface: Material::preset(surface)?,
          exposed: Material::preset(exposed)?,
        })
      })
      .ok_or_else(|| UnknownMaterial {
        name: s.to_owned(),
        known: MaterialPair::names().collect(),
      })
  }
}

/// A material name that matches no preset.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownMaterial {
  pub name: String,
  pub known: Vec<&'static str>,
}

impl fmt::Display for UnknownMaterial {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(
      f,
      "unknown material {}; expected one of: {}",
      self.name,
      self.known.join(", ")
    )
  }
}

impl Error for UnknownMaterial {}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn presets_parse_by_name() {
    for preset in Material::presets() {
      assert_eq!(preset.name.parse::<Material>(), Ok(*preset));
    }
  }

  #[test]
  fn snow_textures() {
    let snow: Material = "snow".parse().unwrap();

    assert_eq!(
      snow.texture_names(),
      [
        "SnowTextures/diffuse.jpg",
        "SnowTextures/normal.jpg",
        "SnowTextures/height.jpg"
      ]
    );
  }

  #[test]
  fn unknown_material_lists_presets() {
    let err = "lava".parse::<Material>().unwrap_err();

    assert_eq!(err.name, "lava");
    assert!(err.known.contains(&"bricks"));
    assert!(err.to_string().contains("unknown material lava"));
  }

  #[test]
  fn pairs_resolve_to_presets() {
    for name in MaterialPair::names() {
      let pair: MaterialPair = name.parse().unwrap();
      assert_ne!(pair.surface, pair.exposed);
    }

    let snow_ice: MaterialPair = "snow-ice".parse().unwrap();
    assert_eq!(snow_ice.surface.diffuse, "SnowTextures2/diffuse.jpg");
    assert_eq!(snow_ice.exposed.normal, "IceTextures/normal.png");
  }

  #[test]
  fn material_is_not_a_pair() {
    assert!("snow".parse::<MaterialPair>().is_err());
  }
}
