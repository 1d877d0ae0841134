//! Tangent-space basis of a textured triangle.
//!
//! Normal maps store their perturbations in the local frame of the texture: *x* follows the *u* texture axis, *y*
//! follows *v* and *z* is the surface normal. To bring a normal-map sample into world space, each triangle needs the
//! world-space directions of *u* and *v*: its tangent and bitangent. They are obtained by expressing the triangle
//! edges as a linear combination of the UV deltas:
//!
//! ```text
//! e₁ = Δu₁·T + Δv₁·B
//! e₂ = Δu₂·T + Δv₂·B
//! ```
//!
//! and inverting that 2×2 system.

use cgmath::{InnerSpace as _, Point2, Point3, Vector3};

/// Unit tangent and bitangent of a triangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TangentBasis {
  pub tangent: Vector3<f32>,
  pub bitangent: Vector3<f32>,
}

/// Compute the tangent basis of the triangle `positions`, textured with `uvs`.
///
/// Returns [`None`] if the UV triangle is degenerate (its vertices are collinear in texture space), in which case no
/// basis can be derived.
pub fn tangent_basis(positions: [Point3<f32>; 3], uvs: [Point2<f32>; 3]) -> Option<TangentBasis> {
  let edge1 = positions[1] - positions[0];
  let edge2 = positions[2] - positions[0];
  let delta_uv1 = uvs[1] - uvs[0];
  let delta_uv2 = uvs[2] - uvs[0];

  let det = delta_uv1.x * delta_uv2.y - delta_uv2.x * delta_uv1.y;
  if det.abs() < f32::EPSILON {
    return None;
  }

  let f = det.recip();
  let tangent = (edge1 * delta_uv2.y - edge2 * delta_uv1.y) * f;
  let bitangent = (edge2 * delta_uv1.x - edge1 * delta_uv2.x) * f;

  Some(TangentBasis {
    tangent: normalized(tangent)?,
    bitangent: normalized(bitangent)?,
  })
}

fn normalized(v: Vector3<f32>) -> Option<Vector3<f32>> {
  let len = v.magnitude();

  if len > f32::EPSILON && len.is_finite() {
    Some(v / len)
  } else {
    None
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn assert_close(a: Vector3<f32>, b: Vector3<f32>) {
    assert!((a - b).magnitude() < 1e-5, "{:?} != {:?}", a, b);
  }

  #[test]
  fn axis_aligned_quad_follows_uv_axes() {
    let basis = tangent_basis(
      [
        Point3::new(-1., 1., 0.),
        Point3::new(-1., -1., 0.),
        Point3::new(1., -1., 0.),
      ],
      [Point2::new(0., 1.), Point2::new(0., 0.), Point2::new(1., 0.)],
    )
    .unwrap();

    assert_close(basis.tangent, Vector3::unit_x());
    assert_close(basis.bitangent, Vector3::unit_y());
  }

  #[test]
  fn flipped_u_flips_tangent() {
    let basis = tangent_basis(
      [
        Point3::new(0., 0., 0.),
        Point3::new(2., 0., 0.),
        Point3::new(0., 3., 0.),
      ],
      [Point2::new(1., 0.), Point2::new(0., 0.), Point2::new(1., 1.)],
    )
    .unwrap();

    assert_close(basis.tangent, -Vector3::unit_x());
    assert_close(basis.bitangent, Vector3::unit_y());
  }

  #[test]
  fn basis_is_unit_length_on_slanted_triangle() {
    let basis = tangent_basis(
      [
        Point3::new(0., 0., 0.),
        Point3::new(1., 0., 1.),
        Point3::new(0., 2., 0.5),
      ],
      [Point2::new(0., 0.), Point2::new(0.5, 0.), Point2::new(0., 0.25)],
    )
    .unwrap();

    assert!((basis.tangent.magnitude() - 1.).abs() < 1e-5);
    assert!((basis.bitangent.magnitude() - 1.).abs() < 1e-5);
  }

  #[test]
  fn degenerate_uvs_have_no_basis() {
    let basis = tangent_basis(
      [
        Point3::new(0., 0., 0.),
        Point3::new(1., 0., 0.),
        Point3::new(0., 1., 0.),
      ],
      [Point2::new(0., 0.), Point2::new(0.5, 0.5), Point2::new(1., 1.)],
    );

    assert_eq!(basis, None);
  }
}
