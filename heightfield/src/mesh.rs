//! Geometry shared by the scenes: the tangent-space surface quad and the UV sphere pressed into it.

use crate::tangent::{tangent_basis, TangentBasis};
use cgmath::{Point2, Point3};
use luminance::{Semantics, Vertex};
use std::{error::Error, f32::consts::PI, fmt};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Semantics)]
pub enum Semantics {
  // reference vertex positions with the position variable in vertex shaders
  #[sem(name = "position", repr = "[f32; 3]", wrapper = "VertexPosition")]
  Position,
  // reference vertex normals with the normal variable in vertex shaders
  #[sem(name = "normal", repr = "[f32; 3]", wrapper = "VertexNormal")]
  Normal,
  // reference texture coordinates with the uv variable in vertex shaders
  #[sem(name = "uv", repr = "[f32; 2]", wrapper = "VertexUV")]
  UV,
  #[sem(name = "tangent", repr = "[f32; 3]", wrapper = "VertexTangent")]
  Tangent,
  #[sem(name = "bitangent", repr = "[f32; 3]", wrapper = "VertexBitangent")]
  Bitangent,
}

/// A vertex of the parallax-mapped surface.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Vertex)]
#[vertex(sem = "Semantics")]
pub struct SurfaceVertex {
  pub position: VertexPosition,
  pub normal: VertexNormal,
  pub uv: VertexUV,
  pub tangent: VertexTangent,
  pub bitangent: VertexBitangent,
}

/// A vertex of the sphere; only its position matters.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Vertex)]
#[vertex(sem = "Semantics")]
pub struct SphereVertex {
  pub position: VertexPosition,
}

/// Index type of the sphere; a 16×16 sphere has more vertices than a u8 can address.
pub type SphereIndex = u32;

/// CPU-side corner of the surface quad, before it is turned into a [`SurfaceVertex`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceCorner {
  pub position: [f32; 3],
  pub normal: [f32; 3],
  pub uv: [f32; 2],
  pub tangent: [f32; 3],
  pub bitangent: [f32; 3],
}

impl From<SurfaceCorner> for SurfaceVertex {
  fn from(corner: SurfaceCorner) -> Self {
    SurfaceVertex::new(
      VertexPosition::new(corner.position),
      VertexNormal::new(corner.normal),
      VertexUV::new(corner.uv),
      VertexTangent::new(corner.tangent),
      VertexBitangent::new(corner.bitangent),
    )
  }
}

/// Errors that can happen while building meshes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MeshError {
  /// The triangle at the given index has collinear texture coordinates.
  DegenerateUV(usize),
}

impl fmt::Display for MeshError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      MeshError::DegenerateUV(i) => write!(f, "triangle {} has degenerate texture coordinates", i),
    }
  }
}

impl Error for MeshError {}

/// The 2×2 quad spanning [-1; 1]² in the XY plane, facing +Z, as two triangles each carrying its own tangent basis.
pub fn surface_quad() -> Result<[SurfaceCorner; 6], MeshError> {
  let p1 = Point3::new(-1., 1., 0.);
  let p2 = Point3::new(-1., -1., 0.);
  let p3 = Point3::new(1., -1., 0.);
  let p4 = Point3::new(1., 1., 0.);

  let uv1 = Point2::new(0., 1.);
  let uv2 = Point2::new(0., 0.);
  let uv3 = Point2::new(1., 0.);
  let uv4 = Point2::new(1., 1.);

  let triangles = [[(p1, uv1), (p2, uv2), (p3, uv3)], [(p1, uv1), (p3, uv3), (p4, uv4)]];
  let normal = [0., 0., 1.];
  let mut corners = [SurfaceCorner {
    position: [0.; 3],
    normal,
    uv: [0.; 2],
    tangent: [0.; 3],
    bitangent: [0.; 3],
  }; 6];

  for (i, triangle) in triangles.iter().enumerate() {
    let TangentBasis { tangent, bitangent } = tangent_basis(
      [triangle[0].0, triangle[1].0, triangle[2].0],
      [triangle[0].1, triangle[1].1, triangle[2].1],
    )
    .ok_or(MeshError::DegenerateUV(i))?;

    for (j, &(position, uv)) in triangle.iter().enumerate() {
      corners[i * 3 + j] = SurfaceCorner {
        position: position.into(),
        normal,
        uv: uv.into(),
        tangent: tangent.into(),
        bitangent: bitangent.into(),
      };
    }
  }

  Ok(corners)
}

/// Build a UV sphere centered on the origin.
///
/// Vertices are laid out stack by stack, from the north pole (+Z) to the south pole, each stack holding
/// `sectors + 1` vertices (the seam is duplicated). Indices describe a triangle list; the pole stacks only get one
/// triangle per sector.
pub fn uv_sphere(radius: f32, sectors: u16, stacks: u16) -> (Vec<[f32; 3]>, Vec<SphereIndex>) {
  let sector_step = 2. * PI / sectors as f32;
  let stack_step = PI / stacks as f32;

  let mut vertices = Vec::with_capacity((stacks as usize + 1) * (sectors as usize + 1));
  for i in 0..=stacks {
    let stack_angle = PI / 2. - i as f32 * stack_step;
    let xy = radius * stack_angle.cos();
    let z = radius * stack_angle.sin();

    for j in 0..=sectors {
      let sector_angle = j as f32 * sector_step;
      vertices.push([xy * sector_angle.cos(), xy * sector_angle.sin(), z]);
    }
  }

  let mut indices = Vec::new();
  let stride = sectors as SphereIndex + 1;
  for i in 0..stacks as SphereIndex {
    let mut k1 = i * stride;
    let mut k2 = k1 + stride;

    for _ in 0..sectors {
      if i != 0 {
        indices.extend_from_slice(&[k1, k2, k1 + 1]);
      }

      if i != stacks as SphereIndex - 1 {
        indices.extend_from_slice(&[k1 + 1, k2, k2 + 1]);
      }

      k1 += 1;
      k2 += 1;
    }
  }

  (vertices, indices)
}

/// Same as [`uv_sphere`], with vertices ready for upload.
pub fn sphere_vertices(radius: f32, sectors: u16, stacks: u16) -> (Vec<SphereVertex>, Vec<SphereIndex>) {
  let (positions, indices) = uv_sphere(radius, sectors, stacks);
  let vertices = positions
    .into_iter()
    .map(|p| SphereVertex::new(VertexPosition::new(p)))
    .collect();

  (vertices, indices)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn quad_covers_unit_square_with_shared_normal() {
    let corners = surface_quad().unwrap();

    for corner in &corners {
      assert_eq!(corner.normal, [0., 0., 1.]);
      assert_eq!(corner.position[0].abs(), 1.);
      assert_eq!(corner.position[1].abs(), 1.);
      assert_eq!(corner.position[2], 0.);

      // uv follow positions
      assert_eq!(corner.uv[0], (corner.position[0] + 1.) * 0.5);
      assert_eq!(corner.uv[1], (corner.position[1] + 1.) * 0.5);
    }
  }

  #[test]
  fn quad_tangents_follow_x_and_y() {
    for corner in &surface_quad().unwrap() {
      assert!((corner.tangent[0] - 1.).abs() < 1e-6);
      assert!(corner.tangent[1].abs() < 1e-6);
      assert!((corner.bitangent[1] - 1.).abs() < 1e-6);
      assert!(corner.bitangent[0].abs() < 1e-6);
    }
  }

  #[test]
  fn quad_triangles_share_first_corner() {
    let corners = surface_quad().unwrap();

    assert_eq!(corners[0].position, corners[3].position);
    assert_eq!(corners[2].position, corners[4].position);
  }

  #[test]
  fn sphere_counts() {
    let (vertices, indices) = uv_sphere(0.3, 16, 16);

    assert_eq!(vertices.len(), 17 * 17);
    assert_eq!(indices.len(), 6 * 16 * 15);
    assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
  }

  #[test]
  fn sphere_vertices_lie_on_radius() {
    let (vertices, _) = uv_sphere(0.2, 8, 6);

    for [x, y, z] in vertices {
      let d = (x * x + y * y + z * z).sqrt();
      assert!((d - 0.2).abs() < 1e-5);
    }
  }

  #[test]
  fn sphere_starts_at_north_pole() {
    let (vertices, _) = uv_sphere(1., 4, 4);

    assert!((vertices[0][2] - 1.).abs() < 1e-6);
    assert!((vertices.last().unwrap()[2] + 1.).abs() < 1e-6);
  }
}
