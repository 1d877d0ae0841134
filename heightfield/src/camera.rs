//! Transforms used by the scenes.

use cgmath::{ortho, perspective, Deg, Matrix4, Point3, Vector3};

/// Where the viewer stands.
pub const VIEWER_POSITION: [f32; 3] = [0., 0., 3.];

/// Vertical field of view of the perspective camera.
pub const FOVY: Deg<f32> = Deg(45.);

/// Near clipping plane of the perspective camera.
pub const Z_NEAR: f32 = 0.5;

/// Aspect ratio of a framebuffer; degenerate sizes (e.g. a minimized window) yield 1.
pub fn aspect_ratio(width: u32, height: u32) -> f32 {
  if width == 0 || height == 0 {
    1.
  } else {
    width as f32 / height as f32
  }
}

/// Perspective projection of the main camera.
pub fn projection(aspect_ratio: f32, z_far: f32) -> Matrix4<f32> {
  perspective(FOVY, aspect_ratio, Z_NEAR, z_far)
}

/// View matrix looking at the origin from [`VIEWER_POSITION`].
pub fn look_at_origin() -> Matrix4<f32> {
  Matrix4::look_at_rh(
    Point3::from(VIEWER_POSITION),
    Point3::new(0., 0., 0.),
    Vector3::unit_y(),
  )
}

/// View matrix that only moves the world away from the viewer, without turning toward anything.
pub fn step_back() -> Matrix4<f32> {
  Matrix4::from_translation(-Vector3::from(VIEWER_POSITION))
}

/// Rotation of the surface: X first, then Y, then Z, angles in degrees.
pub fn model_rotation(theta: [f32; 3]) -> Matrix4<f32> {
  Matrix4::from_angle_x(Deg(theta[0]))
    * Matrix4::from_angle_y(Deg(theta[1]))
    * Matrix4::from_angle_z(Deg(theta[2]))
}

/// Where the parallax quad sits before being rotated; the rotation swings it around the origin.
pub const PARALLAX_OFFSET: [f32; 3] = [0., 0., -0.5];

/// How far behind the surface plane the deforming sphere is pressed from, as seen from the snow camera.
pub const PRESS_DEPTH: f32 = 0.1;

/// Model matrix of the parallax quad.
pub fn parallax_model(theta: [f32; 3]) -> Matrix4<f32> {
  model_rotation(theta) * Matrix4::from_translation(Vector3::from(PARALLAX_OFFSET))
}

/// Model matrix of the sphere lying at `position` on the rotated surface.
pub fn sphere_model(theta: [f32; 3], [x, y]: [f32; 2]) -> Matrix4<f32> {
  model_rotation(theta) * Matrix4::from_translation(Vector3::new(x, y, 0.))
}

/// Model matrix of the sphere in the height-field deformation pass: it follows the surface and only slides along X.
pub fn height_field_press(theta: [f32; 3], x: f32) -> Matrix4<f32> {
  sphere_model(theta, [x, 0.])
}

/// Model matrix of the sphere in the deforming pass.
///
/// The snow camera looks at the surface from behind, so X is mirrored to keep the press under the visible sphere.
pub fn deforming_press([x, y]: [f32; 2]) -> Matrix4<f32> {
  Matrix4::from_translation(Vector3::new(-x, y, PRESS_DEPTH))
}

/// Orthographic camera rendering the sphere into the deformation texture.
///
/// It looks at the surface from behind (from -Z), so that whatever part of the sphere pokes through the surface plane
/// gets rasterized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnowCamera {
  /// Distance of the eye behind the surface.
  pub eye_distance: f32,
  /// Far plane of the orthographic volume; the near plane sits on the eye.
  pub depth: f32,
}

impl SnowCamera {
  pub fn view(&self) -> Matrix4<f32> {
    Matrix4::look_at_rh(
      Point3::new(0., 0., -self.eye_distance),
      Point3::new(0., 0., 0.),
      Vector3::unit_y(),
    )
  }

  pub fn projection(&self) -> Matrix4<f32> {
    ortho(-1., 1., -1., 1., 0., self.depth)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use cgmath::{InnerSpace as _, Vector4};

  fn assert_close(a: Vector4<f32>, b: Vector4<f32>) {
    assert!((a - b).magnitude() < 1e-5, "{:?} != {:?}", a, b);
  }

  #[test]
  fn aspect_of_degenerate_framebuffer() {
    assert_eq!(aspect_ratio(0, 0), 1.);
    assert_eq!(aspect_ratio(800, 0), 1.);
    assert_eq!(aspect_ratio(800, 400), 2.);
  }

  #[test]
  fn viewer_sees_origin_straight_ahead() {
    let origin = look_at_origin() * Vector4::new(0., 0., 0., 1.);

    assert_close(origin, Vector4::new(0., 0., -3., 1.));
  }

  #[test]
  fn step_back_matches_look_at_without_rotation() {
    let p = Vector4::new(0.3, -0.2, 0.1, 1.);

    assert_close(step_back() * p, look_at_origin() * p);
  }

  #[test]
  fn rotation_applies_x_last_to_points() {
    let rot = model_rotation([90., 90., 0.]);
    // Ry(90) sends +X to -Z, then Rx(90) sends -Z to +Y
    let p = rot * Vector4::new(1., 0., 0., 1.);

    assert_close(p, Vector4::new(0., 1., 0., 1.));
  }

  #[test]
  fn parallax_quad_swings_around_origin() {
    let center = parallax_model([0., 90., 0.]) * Vector4::new(0., 0., 0., 1.);

    // Ry(90) sends -Z to -X
    assert_close(center, Vector4::new(-0.5, 0., 0., 1.));
    assert_close(
      parallax_model([0.; 3]) * Vector4::new(0., 0., 0., 1.),
      Vector4::new(0., 0., -0.5, 1.),
    );
  }

  #[test]
  fn sphere_moves_with_the_surface() {
    let center = sphere_model([0., 0., 90.], [0.3, 0.1]) * Vector4::new(0., 0., 0., 1.);

    // translated on the surface first, then rotated with it
    assert_close(center, Vector4::new(-0.1, 0.3, 0., 1.));
  }

  #[test]
  fn height_field_press_slides_along_surface_x() {
    let theta = [0., 90., 0.];
    let center = height_field_press(theta, 0.2) * Vector4::new(0., 0., 0., 1.);

    assert_close(center, Vector4::new(0., 0., -0.2, 1.));
    assert_close(
      center,
      sphere_model(theta, [0.2, 0.]) * Vector4::new(0., 0., 0., 1.),
    );
  }

  #[test]
  fn deforming_press_mirrors_x() {
    let center = deforming_press([0.2, -0.4]) * Vector4::new(0., 0., 0., 1.);

    assert_close(center, Vector4::new(-0.2, -0.4, PRESS_DEPTH, 1.));
  }

  #[test]
  fn deforming_press_lands_under_the_visible_sphere() {
    let camera = SnowCamera {
      eye_distance: 0.5,
      depth: 0.5,
    };
    let position = [0.3, 0.2];
    let pressed = camera.projection() * camera.view() * deforming_press(position) * Vector4::new(0., 0., 0., 1.);

    // the snow camera mirrors X back, so the press shows up where the sphere sits on the unrotated surface
    assert!((pressed.x - position[0]).abs() < 1e-5);
    assert!((pressed.y - position[1]).abs() < 1e-5);
  }

  #[test]
  fn snow_camera_maps_surface_plane_into_depth_range() {
    let camera = SnowCamera {
      eye_distance: 0.5,
      depth: 0.5,
    };
    let clip = camera.projection() * camera.view() * Vector4::new(0.5, 0.5, 0., 1.);

    // the surface plane sits at the far end of the volume, mirrored in X since we look from behind
    assert_close(clip, Vector4::new(-0.5, 0.5, 1., 1.));
  }
}
