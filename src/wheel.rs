use nalgebra::{Point3, UnitQuaternion};

/// Resulting world pose of a wheel, as reported by the physics
/// integration after actuation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelPose {
    pub position: Point3<f64>,
    pub orientation: UnitQuaternion<f64>,
}

impl Default for WheelPose {
    fn default() -> Self {
        Self {
            position: Point3::origin(),
            orientation: UnitQuaternion::identity(),
        }
    }
}

/// Physics-side wheel handle. The controller writes torque, brake and
/// steer each tick; the underlying integration reports the resulting pose.
pub trait WheelActuator {
    fn set_motor_torque(&mut self, torque: f64);
    fn set_brake_torque(&mut self, torque: f64);
    fn set_steer_angle(&mut self, degrees: f64);
    fn world_pose(&self) -> WheelPose;
}

/// Scene-side transform paired with a wheel, mirroring its physics pose.
pub trait VisualTransform {
    fn set_world_pose(&mut self, pose: &WheelPose);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WheelRole {
    FrontLeft,
    FrontRight,
    RearLeft,
    RearRight,
}

impl WheelRole {
    pub const ALL: [WheelRole; 4] = [
        WheelRole::FrontLeft,
        WheelRole::FrontRight,
        WheelRole::RearLeft,
        WheelRole::RearRight,
    ];

    /// The front axle steers and is driven; all wheels brake.
    pub fn is_front(self) -> bool {
        matches!(self, WheelRole::FrontLeft | WheelRole::FrontRight)
    }
}

/// One wheel slot: an actuator plus an optional paired visual. A missing
/// visual just skips the pose mirror, it is never an error.
pub struct Wheel {
    pub role: WheelRole,
    pub actuator: Box<dyn WheelActuator>,
    pub visual: Option<Box<dyn VisualTransform>>,
}

impl Wheel {
    pub fn new(role: WheelRole, actuator: Box<dyn WheelActuator>) -> Self {
        Self {
            role,
            actuator,
            visual: None,
        }
    }

    pub fn with_visual(mut self, visual: Box<dyn VisualTransform>) -> Self {
        self.visual = Some(visual);
        self
    }

    /// Copies the actuator's world pose onto the paired visual. Direct
    /// copy, no interpolation; runs every tick regardless of grab or
    /// tilt state.
    pub fn sync_visual(&mut self) {
        if let Some(visual) = &mut self.visual {
            let pose = self.actuator.world_pose();
            visual.set_world_pose(&pose);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::{testing::mock_wheel, *};
    use nalgebra::Vector3;

    #[test]
    fn front_axle_roles() {
        assert!(WheelRole::FrontLeft.is_front());
        assert!(WheelRole::FrontRight.is_front());
        assert!(!WheelRole::RearLeft.is_front());
        assert!(!WheelRole::RearRight.is_front());
    }

    #[test]
    fn sync_copies_pose_verbatim() {
        let (mut wheel, record) = mock_wheel(WheelRole::FrontLeft);
        let pose = WheelPose {
            position: Point3::new(1.0, 2.0, 0.3),
            orientation: UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 1.2),
        };
        record.borrow_mut().pose = pose;

        wheel.sync_visual();
        assert_eq!(record.borrow().visual_pose, Some(pose));
    }

    #[test]
    fn sync_without_visual_is_a_no_op() {
        let (mut wheel, record) = mock_wheel(WheelRole::RearLeft);
        wheel.visual = None;
        wheel.sync_visual();
        assert_eq!(record.borrow().visual_pose, None);
    }
}
