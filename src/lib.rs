pub mod constants;
pub mod error;
pub mod input;
pub mod motor_control;
pub mod rollover;
pub mod steering;
pub mod vehicle_control;
pub mod wheel;

pub use error::ConfigError;
pub use input::{DriveCommand, Gear, GearThrottle, PedalPair, ThrottleScheme};
pub use motor_control::{MotorBrakeController, MotorBrakeControllerInit, MotorBrakeOutput};
pub use steering::{HandleSteering, HandleSteeringInit, KnobSteering, SteeringInput, SteeringSource};
pub use vehicle_control::{TickInput, VehicleController, VehicleControllerInit};
pub use wheel::{VisualTransform, Wheel, WheelActuator, WheelPose, WheelRole};
