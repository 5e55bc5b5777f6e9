use crate::{constants::DEFAULT_MAX_HANDLE_ROTATION_DEGREES, error::ConfigError};
use log::{debug, warn};
use nalgebra::UnitQuaternion;

/// Per-tick samples a steering source may draw from. Absent samples are
/// not errors; the affected source reports a centered steer instead.
#[derive(Debug, Clone, Default)]
pub struct SteeringInput {
    /// Rotary knob position in `[0, 1]`, if a knob is linked.
    pub knob_value: Option<f64>,
    /// World orientation of the grabbing actor, if one is tracked.
    pub controller_orientation: Option<UnitQuaternion<f64>>,
}

/// Rotary knob steering. The knob itself lives outside the loop; its
/// position is polled each tick. 0 is full left, 1 full right, 0.5 center.
#[derive(Debug, Clone, Copy, Default)]
pub struct KnobSteering;

impl KnobSteering {
    pub fn evaluate(&self, value: f64) -> f64 {
        (value * 2.0 - 1.0).clamp(-1.0, 1.0)
    }
}

/// Eases a released knob back toward its center position. Returns the new
/// knob value for the host to apply; a held knob is left alone.
pub fn auto_center(value: f64, held: bool, dt: f64, return_speed: f64) -> f64 {
    if held {
        return value;
    }
    let gain = (dt * return_speed).clamp(0.0, 1.0);
    (value + (0.5 - value) * gain).clamp(0.0, 1.0)
}

#[derive(Debug, Clone)]
pub struct HandleSteeringInit {
    /// Maximum handle rotation from center, degrees, symmetric both ways.
    pub max_handle_rotation: f64,
}

impl Default for HandleSteeringInit {
    fn default() -> Self {
        Self {
            max_handle_rotation: DEFAULT_MAX_HANDLE_ROTATION_DEGREES,
        }
    }
}

impl HandleSteeringInit {
    pub fn build(&self) -> Result<HandleSteering, ConfigError> {
        let Self {
            max_handle_rotation,
        } = *self;
        if !max_handle_rotation.is_finite()
            || max_handle_rotation <= 0.0
            || max_handle_rotation > 180.0
        {
            return Err(ConfigError::InvalidMaxHandleRotation(max_handle_rotation));
        }
        Ok(HandleSteering {
            max_handle_rotation,
            grab: None,
            visual_local_rotation: UnitQuaternion::identity(),
        })
    }
}

// Captured only while the handle is held.
#[derive(Debug, Clone)]
struct GrabState {
    initial_local_rotation: UnitQuaternion<f64>,
    initial_controller_rotation: UnitQuaternion<f64>,
}

/// Grabbable steering handle. While held, the grabbing actor's rotation
/// delta turns the handle about its yaw axis, bounded by a symmetric
/// rotation limit.
#[derive(Debug, Clone)]
pub struct HandleSteering {
    max_handle_rotation: f64,
    grab: Option<GrabState>,
    visual_local_rotation: UnitQuaternion<f64>,
}

impl HandleSteering {
    pub fn is_grabbed(&self) -> bool {
        self.grab.is_some()
    }

    /// The handle's current local rotation, for the host to mirror onto
    /// its scene node.
    pub fn visual_local_rotation(&self) -> &UnitQuaternion<f64> {
        &self.visual_local_rotation
    }

    /// Grab started. Captures the handle's local rotation and the
    /// grabbing actor's world orientation as the reference frame for
    /// subsequent deltas. A missing actor orientation degrades to
    /// identity rather than failing the grab.
    pub fn on_grab_start(&mut self, actor_orientation: Option<UnitQuaternion<f64>>) {
        self.grab = Some(GrabState {
            initial_local_rotation: self.visual_local_rotation,
            initial_controller_rotation: actor_orientation
                .unwrap_or_else(UnitQuaternion::identity),
        });
        debug!("steering handle grabbed");
    }

    /// Grab ended. The visual snaps straight back to center so the next
    /// frame does not jitter at the released angle.
    pub fn on_grab_end(&mut self) {
        self.grab = None;
        self.visual_local_rotation = UnitQuaternion::identity();
        debug!("steering handle released");
    }

    /// Per-tick evaluation. Returns the steer fraction in `[-1, 1]`;
    /// 0 when idle or when the tracked actor vanished mid-grab.
    pub fn evaluate(&mut self, controller_orientation: Option<UnitQuaternion<f64>>) -> f64 {
        let Some(grab) = self.grab.clone() else {
            return 0.0;
        };
        let Some(current) = controller_orientation else {
            warn!("steering handle lost its grabbing actor, releasing");
            self.on_grab_end();
            return 0.0;
        };

        let delta = current * grab.initial_controller_rotation.inverse();
        let delta_yaw = yaw_degrees(&delta);
        let target_yaw = wrap_degrees(yaw_degrees(&grab.initial_local_rotation) + delta_yaw);
        let limit = self.max_handle_rotation;
        let clamped = clamp_handle_yaw(target_yaw, limit);

        // The handle turns about yaw only; its other two axes stay put.
        let (roll, pitch, _) = self.visual_local_rotation.euler_angles();
        self.visual_local_rotation =
            UnitQuaternion::from_euler_angles(roll, pitch, clamped.to_radians());

        let signed_yaw = if clamped > 180.0 {
            clamped - 360.0
        } else {
            clamped
        };
        signed_yaw / limit
    }
}

fn yaw_degrees(rotation: &UnitQuaternion<f64>) -> f64 {
    rotation.euler_angles().2.to_degrees()
}

fn wrap_degrees(angle: f64) -> f64 {
    angle.rem_euclid(360.0)
}

/// Yaw is stored in `[0, 360)` but the handle stops at a symmetric limit
/// around zero. Angles past 180 are negative-direction rotations and
/// clamp against the far boundary; exactly 180 takes the positive branch.
fn clamp_handle_yaw(target_yaw: f64, limit: f64) -> f64 {
    if target_yaw > 180.0 {
        target_yaw.max(360.0 - limit)
    } else {
        target_yaw.min(limit)
    }
}

/// The active steering strategy for a vehicle.
#[derive(Debug, Clone)]
pub enum SteeringSource {
    Knob(KnobSteering),
    Handle(HandleSteering),
}

impl SteeringSource {
    /// Evaluates the source against this tick's samples. A source whose
    /// sample is absent contributes a centered steer.
    pub fn evaluate(&mut self, input: &SteeringInput) -> f64 {
        match self {
            SteeringSource::Knob(knob) => match input.knob_value {
                Some(value) => knob.evaluate(value),
                None => 0.0,
            },
            SteeringSource::Handle(handle) => handle.evaluate(input.controller_orientation),
        }
    }

    pub fn on_grab_start(&mut self, actor_orientation: Option<UnitQuaternion<f64>>) {
        if let SteeringSource::Handle(handle) = self {
            handle.on_grab_start(actor_orientation);
        }
    }

    pub fn on_grab_end(&mut self) {
        if let SteeringSource::Handle(handle) = self {
            handle.on_grab_end();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn yaw_rotation(degrees: f64) -> UnitQuaternion<f64> {
        UnitQuaternion::from_euler_angles(0.0, 0.0, degrees.to_radians())
    }

    fn grabbed_handle(limit: f64) -> HandleSteering {
        let mut handle = HandleSteeringInit {
            max_handle_rotation: limit,
        }
        .build()
        .unwrap();
        handle.on_grab_start(Some(UnitQuaternion::identity()));
        handle
    }

    #[test]
    fn knob_endpoints_and_center() {
        let knob = KnobSteering;
        assert_relative_eq!(knob.evaluate(0.0), -1.0);
        assert_relative_eq!(knob.evaluate(0.5), 0.0);
        assert_relative_eq!(knob.evaluate(1.0), 1.0);
    }

    #[test]
    fn knob_clamps_out_of_range() {
        let knob = KnobSteering;
        assert_relative_eq!(knob.evaluate(1.8), 1.0);
        assert_relative_eq!(knob.evaluate(-0.4), -1.0);
    }

    #[test]
    fn auto_center_converges_to_center() {
        let mut value = 0.9;
        for _ in 0..200 {
            value = auto_center(value, false, 0.02, 2.0);
        }
        assert_abs_diff_eq!(value, 0.5, epsilon = 1e-3);
    }

    #[test]
    fn auto_center_leaves_held_knob_alone() {
        assert_relative_eq!(auto_center(0.9, true, 0.02, 2.0), 0.9);
    }

    #[test]
    fn invalid_rotation_limit_is_rejected() {
        for bad in [0.0, -10.0, 181.0, f64::NAN] {
            let init = HandleSteeringInit {
                max_handle_rotation: bad,
            };
            assert!(init.build().is_err());
        }
    }

    #[test]
    fn idle_handle_steers_center() {
        let mut handle = HandleSteeringInit::default().build().unwrap();
        assert_relative_eq!(handle.evaluate(Some(yaw_rotation(90.0))), 0.0);
    }

    #[test]
    fn quarter_turn_is_half_steer() {
        let mut handle = grabbed_handle(180.0);
        let fraction = handle.evaluate(Some(yaw_rotation(90.0)));
        assert_abs_diff_eq!(fraction, 0.5, epsilon = 1e-9);
    }

    #[test]
    fn grab_with_no_actor_orientation_uses_identity() {
        let mut handle = HandleSteeringInit::default().build().unwrap();
        handle.on_grab_start(None);
        let fraction = handle.evaluate(Some(yaw_rotation(90.0)));
        assert_abs_diff_eq!(fraction, 0.5, epsilon = 1e-9);
    }

    #[test]
    fn wraparound_sweep_is_monotonic_then_flips_sign() {
        let mut handle = grabbed_handle(180.0);
        let mut prev = 0.0;
        for yaw in (0..=175).step_by(5) {
            let fraction = handle.evaluate(Some(yaw_rotation(yaw as f64)));
            assert!(fraction >= prev, "fraction regressed at {yaw}");
            prev = fraction;
        }
        assert_abs_diff_eq!(handle.evaluate(Some(yaw_rotation(180.0))), 1.0, epsilon = 1e-9);

        // One step past 180 reads as a rotation from the negative side.
        let fraction = handle.evaluate(Some(yaw_rotation(185.0)));
        assert!(fraction < -0.9, "expected near -1, got {fraction}");
    }

    #[test]
    fn clamp_never_lands_in_forbidden_zone() {
        let limit = 90.0;
        let mut handle = grabbed_handle(limit);
        for yaw in (0..360).step_by(3) {
            let fraction = handle.evaluate(Some(yaw_rotation(yaw as f64)));
            assert!(fraction.abs() <= 1.0 + 1e-9);

            let visual_yaw =
                wrap_degrees(handle.visual_local_rotation().euler_angles().2.to_degrees());
            let in_forbidden_zone =
                visual_yaw > limit + 1e-6 && visual_yaw < 360.0 - limit - 1e-6;
            assert!(!in_forbidden_zone, "visual yaw {visual_yaw} inside forbidden zone");
        }
    }

    #[test]
    fn release_resets_visual_to_identity() {
        let mut handle = grabbed_handle(180.0);
        handle.evaluate(Some(yaw_rotation(60.0)));
        assert!(handle.visual_local_rotation().angle() > 0.1);

        handle.on_grab_end();
        assert!(!handle.is_grabbed());
        assert_abs_diff_eq!(handle.visual_local_rotation().angle(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn lost_actor_is_an_implicit_release() {
        let mut handle = grabbed_handle(180.0);
        handle.evaluate(Some(yaw_rotation(60.0)));

        let fraction = handle.evaluate(None);
        assert_relative_eq!(fraction, 0.0);
        assert!(!handle.is_grabbed());
        assert_abs_diff_eq!(handle.visual_local_rotation().angle(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn regrab_recaptures_reference_frame() {
        let mut handle = grabbed_handle(180.0);
        handle.evaluate(Some(yaw_rotation(90.0)));
        handle.on_grab_end();

        // New grab at a rotated controller pose: no delta, no steer.
        handle.on_grab_start(Some(yaw_rotation(90.0)));
        let fraction = handle.evaluate(Some(yaw_rotation(90.0)));
        assert_abs_diff_eq!(fraction, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn source_with_missing_knob_sample_is_centered() {
        let mut source = SteeringSource::Knob(KnobSteering);
        assert_relative_eq!(source.evaluate(&SteeringInput::default()), 0.0);

        let input = SteeringInput {
            knob_value: Some(1.0),
            ..Default::default()
        };
        assert_relative_eq!(source.evaluate(&input), 1.0);
    }
}
