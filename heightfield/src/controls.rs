//! Interaction state shared by the scenes.
//!
//! [`Controls`] holds everything the user can change while a scene runs: the orientation of the surface, whether it
//! spins on its own and where the sphere is. A [`ControlScheme`] tells how a scene maps abstract
//! [`InputAction`]s onto it, since scenes don't all react to the same keys.

use crate::InputAction;

/// Coordinate axes the surface can be rotated around.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Axis {
  X = 0,
  Y = 1,
  Z = 2,
}

/// Interaction state.
#[derive(Clone, Debug, PartialEq)]
pub struct Controls {
  /// Rotation angles of the surface around each axis, in degrees.
  pub theta: [f32; 3],
  /// Axis the surface spins around.
  pub axis: Axis,
  pub spinning: bool,
  /// Either 1 or -1.
  pub spin_direction: f32,
  /// Position of the sphere on the surface.
  pub sphere: [f32; 2],
  pub sphere_visible: bool,
}

impl Default for Controls {
  fn default() -> Self {
    Controls {
      theta: [0.; 3],
      axis: Axis::Y,
      spinning: false,
      spin_direction: 1.,
      sphere: [0.; 2],
      sphere_visible: false,
    }
  }
}

impl Controls {
  pub fn select_axis(&mut self, axis: Axis) {
    self.axis = axis;
  }

  pub fn rotate(&mut self, axis: Axis, degrees: f32) {
    self.theta[axis as usize] += degrees;
  }

  pub fn nudge_sphere(&mut self, dx: f32, dy: f32) {
    self.sphere[0] += dx;
    self.sphere[1] += dy;
  }

  pub fn toggle_spin(&mut self) {
    self.spinning = !self.spinning;
  }

  pub fn reverse_spin(&mut self) {
    self.spin_direction = -self.spin_direction;
  }

  pub fn toggle_sphere(&mut self) {
    self.sphere_visible = !self.sphere_visible;
  }

  /// Advance the automatic spin by one frame.
  pub fn tick(&mut self, step: f32) {
    let theta = &mut self.theta[self.axis as usize];

    if self.spinning {
      *theta += step * self.spin_direction;
    }

    if *theta > 360. {
      *theta -= 360.;
    }
  }
}

/// What the main toggle does in a given scene.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MainToggle {
  /// Reverse the spin direction.
  ReverseSpin,
  /// Show or hide the sphere.
  Sphere,
  /// Let the scene handle it.
  Scene,
}

/// How a scene maps input actions onto its [`Controls`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlScheme {
  /// Distance the sphere moves per key press.
  pub sphere_step: f32,
  /// Whether the sphere can move along the Y axis (forward / backward).
  pub sphere_moves_vertically: bool,
  /// Whether the dedicated sphere toggle key is honored.
  pub sphere_key: bool,
  /// Whether the auxiliary toggle starts and stops the automatic spin.
  pub spin_key: bool,
  /// Whether the surface can be tilted with the pitch / yaw actions.
  pub manual_rotation: bool,
  pub main_toggle: MainToggle,
}

/// What a scene must do after its controls processed an action.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Response {
  /// Nothing more to do; the action was consumed or ignored.
  Handled,
  /// The user wants to quit.
  Quit,
  /// The action is scene-specific and was not consumed.
  Unhandled,
}

impl ControlScheme {
  /// Apply an action to the controls.
  pub fn apply(&self, controls: &mut Controls, action: &InputAction) -> Response {
    match *action {
      InputAction::Quit => return Response::Quit,

      InputAction::MainToggle => match self.main_toggle {
        MainToggle::ReverseSpin => controls.reverse_spin(),
        MainToggle::Sphere => controls.toggle_sphere(),
        MainToggle::Scene => return Response::Unhandled,
      },

      InputAction::AuxiliaryToggle if self.spin_key => controls.toggle_spin(),

      InputAction::SphereToggle if self.sphere_key => controls.toggle_sphere(),

      InputAction::Left => controls.nudge_sphere(-self.sphere_step, 0.),
      InputAction::Right => controls.nudge_sphere(self.sphere_step, 0.),
      InputAction::Forward if self.sphere_moves_vertically => {
        controls.nudge_sphere(0., self.sphere_step)
      }
      InputAction::Backward if self.sphere_moves_vertically => {
        controls.nudge_sphere(0., -self.sphere_step)
      }

      InputAction::PitchUp if self.manual_rotation => controls.rotate(Axis::X, 1.),
      InputAction::PitchDown if self.manual_rotation => controls.rotate(Axis::X, -1.),
      InputAction::YawRight if self.manual_rotation => controls.rotate(Axis::Y, 1.),
      InputAction::YawLeft if self.manual_rotation => controls.rotate(Axis::Y, -1.),

      InputAction::SelectAxis(axis) => controls.select_axis(axis),

      InputAction::Reset | InputAction::Resized { .. } => return Response::Unhandled,

      _ => (),
    }

    Response::Handled
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const HEIGHT_FIELD: ControlScheme = ControlScheme {
    sphere_step: 0.01,
    sphere_moves_vertically: false,
    sphere_key: true,
    spin_key: true,
    manual_rotation: false,
    main_toggle: MainToggle::ReverseSpin,
  };

  const DEFORMING: ControlScheme = ControlScheme {
    sphere_step: 0.02,
    sphere_moves_vertically: true,
    sphere_key: false,
    spin_key: false,
    manual_rotation: true,
    main_toggle: MainToggle::Sphere,
  };

  #[test]
  fn spin_only_when_enabled() {
    let mut controls = Controls::default();

    controls.tick(0.3);
    assert_eq!(controls.theta, [0.; 3]);

    controls.toggle_spin();
    controls.tick(0.3);
    assert_eq!(controls.theta, [0., 0.3, 0.]);
  }

  #[test]
  fn spin_wraps_past_full_turn() {
    let mut controls = Controls {
      theta: [0., 359.9, 0.],
      spinning: true,
      ..Controls::default()
    };

    controls.tick(0.3);
    assert!((controls.theta[1] - 0.2).abs() < 1e-3);
  }

  #[test]
  fn reversed_spin_goes_backward() {
    let mut controls = Controls::default();
    controls.select_axis(Axis::Z);
    controls.toggle_spin();
    controls.reverse_spin();
    controls.tick(1.);

    assert_eq!(controls.theta, [0., 0., -1.]);
  }

  #[test]
  fn height_field_keys() {
    let mut controls = Controls::default();

    HEIGHT_FIELD.apply(&mut controls, &InputAction::Right);
    HEIGHT_FIELD.apply(&mut controls, &InputAction::Right);
    HEIGHT_FIELD.apply(&mut controls, &InputAction::Left);
    HEIGHT_FIELD.apply(&mut controls, &InputAction::Forward);
    assert!((controls.sphere[0] - 0.01).abs() < 1e-6);
    assert_eq!(controls.sphere[1], 0.);

    HEIGHT_FIELD.apply(&mut controls, &InputAction::SphereToggle);
    assert!(controls.sphere_visible);

    HEIGHT_FIELD.apply(&mut controls, &InputAction::MainToggle);
    assert_eq!(controls.spin_direction, -1.);

    HEIGHT_FIELD.apply(&mut controls, &InputAction::PitchUp);
    assert_eq!(controls.theta, [0.; 3]);
  }

  #[test]
  fn deforming_keys() {
    let mut controls = Controls::default();

    DEFORMING.apply(&mut controls, &InputAction::Forward);
    DEFORMING.apply(&mut controls, &InputAction::Backward);
    DEFORMING.apply(&mut controls, &InputAction::Backward);
    DEFORMING.apply(&mut controls, &InputAction::Right);
    assert!((controls.sphere[0] - 0.02).abs() < 1e-6);
    assert!((controls.sphere[1] + 0.02).abs() < 1e-6);

    // the s key also sends a sphere toggle, which this scheme ignores
    DEFORMING.apply(&mut controls, &InputAction::SphereToggle);
    assert!(!controls.sphere_visible);
    DEFORMING.apply(&mut controls, &InputAction::MainToggle);
    assert!(controls.sphere_visible);

    DEFORMING.apply(&mut controls, &InputAction::PitchUp);
    DEFORMING.apply(&mut controls, &InputAction::YawLeft);
    assert_eq!(controls.theta, [1., -1., 0.]);
  }

  #[test]
  fn spin_key_only_where_enabled() {
    let mut controls = Controls::default();

    HEIGHT_FIELD.apply(&mut controls, &InputAction::AuxiliaryToggle);
    assert!(controls.spinning);

    let mut controls = Controls {
      spinning: true,
      ..Controls::default()
    };
    let continuous = ControlScheme {
      main_toggle: MainToggle::Scene,
      ..DEFORMING
    };

    assert_eq!(
      continuous.apply(&mut controls, &InputAction::AuxiliaryToggle),
      Response::Handled
    );
    assert!(controls.spinning);
  }

  #[test]
  fn mouse_selects_axis() {
    let mut controls = Controls::default();

    DEFORMING.apply(&mut controls, &InputAction::SelectAxis(Axis::X));
    assert_eq!(controls.axis, Axis::X);
  }

  #[test]
  fn scene_specific_actions_fall_through() {
    let mut controls = Controls::default();
    let scheme = ControlScheme {
      main_toggle: MainToggle::Scene,
      ..DEFORMING
    };

    assert_eq!(scheme.apply(&mut controls, &InputAction::Quit), Response::Quit);
    assert_eq!(scheme.apply(&mut controls, &InputAction::Reset), Response::Unhandled);
    assert_eq!(scheme.apply(&mut controls, &InputAction::MainToggle), Response::Unhandled);
    assert_eq!(
      scheme.apply(
        &mut controls,
        &InputAction::Resized {
          width: 1,
          height: 1
        }
      ),
      Response::Unhandled
    );
    assert_eq!(controls, Controls::default());
  }
}
