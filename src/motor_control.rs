use crate::{
    constants::{
        COAST_BRAKE_FACTOR, DEFAULT_ACCELERATION_RATE, DEFAULT_BRAKE_FORCE, DEFAULT_MOTOR_FORCE,
        TORQUE_RESPONSE_SCALE,
    },
    error::ConfigError,
    input::DriveCommand,
};

#[derive(Debug, Clone)]
pub struct MotorBrakeControllerInit {
    pub motor_force: f64,
    pub brake_force: f64,
    pub acceleration_rate: f64,
}

impl Default for MotorBrakeControllerInit {
    fn default() -> Self {
        Self {
            motor_force: DEFAULT_MOTOR_FORCE,
            brake_force: DEFAULT_BRAKE_FORCE,
            acceleration_rate: DEFAULT_ACCELERATION_RATE,
        }
    }
}

impl MotorBrakeControllerInit {
    pub fn build(&self) -> Result<MotorBrakeController, ConfigError> {
        let Self {
            motor_force,
            brake_force,
            acceleration_rate,
        } = *self;

        for (name, value) in [
            ("motor_force", motor_force),
            ("acceleration_rate", acceleration_rate),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidTunable {
                    name,
                    bound: "positive",
                    value,
                });
            }
        }
        if !brake_force.is_finite() || brake_force < 0.0 {
            return Err(ConfigError::InvalidTunable {
                name: "brake_force",
                bound: "non-negative",
                value: brake_force,
            });
        }

        Ok(MotorBrakeController {
            motor_force,
            brake_force,
            acceleration_rate,
            current_motor_torque: 0.0,
        })
    }
}

/// Turns fused drive commands into smoothed motor torque and brake force.
/// The smoothed torque persists across ticks so releasing or stamping the
/// throttle never produces an instantaneous torque step.
#[derive(Debug, Clone)]
pub struct MotorBrakeController {
    motor_force: f64,
    brake_force: f64,
    acceleration_rate: f64,
    current_motor_torque: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorBrakeOutput {
    pub motor_torque: f64,
    pub brake_torque: f64,
}

impl MotorBrakeController {
    pub fn current_motor_torque(&self) -> f64 {
        self.current_motor_torque
    }

    pub fn reset(&mut self) {
        self.current_motor_torque = 0.0;
    }

    pub fn step(&mut self, command: DriveCommand, dt: f64) -> MotorBrakeOutput {
        let Self {
            motor_force,
            brake_force,
            acceleration_rate,
            current_motor_torque,
        } = *self;

        let (target_torque, brake_torque) = if command.is_active() {
            (command.signed_magnitude() * motor_force, 0.0)
        } else {
            // Throttle released: coast down under a gentle brake.
            (0.0, brake_force * COAST_BRAKE_FACTOR)
        };

        let gain = (dt * acceleration_rate * TORQUE_RESPONSE_SCALE).clamp(0.0, 1.0);
        let motor_torque = current_motor_torque + (target_torque - current_motor_torque) * gain;
        self.current_motor_torque = motor_torque;

        MotorBrakeOutput {
            motor_torque,
            brake_torque,
        }
    }
}
