use thiserror::Error;

/// Configuration errors rejected when a controller is built. The per-tick
/// path never produces errors; bad inputs there degrade to neutral output.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("max handle rotation must be in (0, 180] degrees, got {0}")]
    InvalidMaxHandleRotation(f64),
    #[error("max steering angle must be finite and positive, got {0}")]
    InvalidMaxSteeringAngle(f64),
    #[error("{name} must be finite and {bound}, got {value}")]
    InvalidTunable {
        name: &'static str,
        bound: &'static str,
        value: f64,
    },
}
