/// Analog samples at or below this value are treated as controller noise.
pub const THROTTLE_DEADZONE: f64 = 0.1;

/// Fraction of the configured brake force applied while coasting with the
/// throttle released. A gentle brake, not a full lock.
pub const COAST_BRAKE_FACTOR: f64 = 0.5;

/// Fixed scale on the torque smoothing gain. Tunes perceived
/// responsiveness independently of the exposed acceleration rate.
pub const TORQUE_RESPONSE_SCALE: f64 = 5.0;

pub const DEFAULT_MOTOR_FORCE: f64 = 2000.0;
pub const DEFAULT_BRAKE_FORCE: f64 = 5000.0;
pub const DEFAULT_ACCELERATION_RATE: f64 = 2.0;
pub const DEFAULT_MAX_STEERING_DEGREES: f64 = 30.0;
pub const DEFAULT_MAX_HANDLE_ROTATION_DEGREES: f64 = 180.0;
pub const DEFAULT_KNOB_RETURN_SPEED: f64 = 2.0;
