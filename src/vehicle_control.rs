use crate::{
    constants::DEFAULT_MAX_STEERING_DEGREES,
    error::ConfigError,
    input::{DriveCommand, Gear, ThrottleScheme},
    motor_control::{MotorBrakeController, MotorBrakeControllerInit, MotorBrakeOutput},
    rollover,
    steering::{SteeringInput, SteeringSource},
    wheel::Wheel,
};
use log::warn;
use nalgebra::{UnitQuaternion, Vector3};

#[derive(Debug, Clone)]
pub struct VehicleControllerInit {
    pub motor: MotorBrakeControllerInit,
    /// Maximum front wheel steer angle, degrees.
    pub max_steering_angle: f64,
}

impl Default for VehicleControllerInit {
    fn default() -> Self {
        Self {
            motor: MotorBrakeControllerInit::default(),
            max_steering_angle: DEFAULT_MAX_STEERING_DEGREES,
        }
    }
}

impl VehicleControllerInit {
    pub fn build(
        &self,
        scheme: ThrottleScheme,
        steering: SteeringSource,
    ) -> Result<VehicleController, ConfigError> {
        let Self {
            ref motor,
            max_steering_angle,
        } = *self;

        if !max_steering_angle.is_finite() || max_steering_angle <= 0.0 {
            return Err(ConfigError::InvalidMaxSteeringAngle(max_steering_angle));
        }

        Ok(VehicleController {
            scheme,
            steering,
            motor: motor.build()?,
            max_steering_angle,
            wheels: Vec::new(),
            last_command: DriveCommand::neutral(),
            steer_fraction: 0.0,
            is_tilted: false,
            warned_no_wheels: false,
        })
    }
}

/// Per-tick samples polled from the host simulation.
#[derive(Debug, Clone)]
pub struct TickInput {
    /// Analog accelerator sample in `[0, 1]`; 0 when no analog source.
    pub throttle_raw: f64,
    /// Analog reverse-pedal sample, consumed by the dual-pedal scheme.
    pub reverse_raw: f64,
    pub steering: SteeringInput,
    /// The vehicle rigid body's current up axis.
    pub vehicle_up: Vector3<f64>,
}

impl Default for TickInput {
    fn default() -> Self {
        Self {
            throttle_raw: 0.0,
            reverse_raw: 0.0,
            steering: SteeringInput::default(),
            vehicle_up: Vector3::z(),
        }
    }
}

/// The per-tick drive control loop of one vehicle. Owns the vehicle's
/// full drive state; nothing here is shared between vehicle instances.
pub struct VehicleController {
    scheme: ThrottleScheme,
    steering: SteeringSource,
    motor: MotorBrakeController,
    max_steering_angle: f64,
    wheels: Vec<Wheel>,
    last_command: DriveCommand,
    steer_fraction: f64,
    is_tilted: bool,
    warned_no_wheels: bool,
}

impl VehicleController {
    pub fn attach_wheel(&mut self, wheel: Wheel) {
        self.wheels.push(wheel);
    }

    /// Runs one fixed-timestep control tick: rollover gate, then input
    /// fusion and steering, then motor/brake, then actuator writes, then
    /// pose read-back. A non-positive `dt` degrades to a pose-sync-only
    /// tick.
    pub fn step(&mut self, dt: f64, input: &TickInput) {
        if self.wheels.is_empty() && !self.warned_no_wheels {
            warn!("vehicle has no wheel actuators attached; drive commands go nowhere");
            self.warned_no_wheels = true;
        }

        if !dt.is_finite() || dt <= 0.0 {
            self.sync_wheel_visuals();
            return;
        }

        self.is_tilted = rollover::is_tilted(&input.vehicle_up);

        if self.is_tilted {
            // Rollover cutoff: wheels go idle. No full brake, and the
            // steer angle keeps its previous value on purpose.
            for wheel in &mut self.wheels {
                wheel.actuator.set_motor_torque(0.0);
                wheel.actuator.set_brake_torque(0.0);
            }
        } else {
            let command = self.scheme.command(input.throttle_raw, input.reverse_raw);
            self.last_command = command;
            self.steer_fraction = self.steering.evaluate(&input.steering);

            let MotorBrakeOutput {
                motor_torque,
                brake_torque,
            } = self.motor.step(command, dt);
            let steer_angle = self.steer_fraction * self.max_steering_angle;

            for wheel in &mut self.wheels {
                if wheel.role.is_front() {
                    wheel.actuator.set_motor_torque(motor_torque);
                    wheel.actuator.set_steer_angle(steer_angle);
                }
                wheel.actuator.set_brake_torque(brake_torque);
            }
        }

        self.sync_wheel_visuals();
    }

    fn sync_wheel_visuals(&mut self) {
        for wheel in &mut self.wheels {
            wheel.sync_visual();
        }
    }

    pub fn notify_accelerate_start(&mut self) {
        self.scheme.notify_accelerate_start();
    }

    pub fn notify_accelerate_stop(&mut self) {
        self.scheme.notify_accelerate_stop();
    }

    pub fn notify_reverse_start(&mut self) {
        self.scheme.notify_reverse_start();
    }

    pub fn notify_reverse_stop(&mut self) {
        self.scheme.notify_reverse_stop();
    }

    pub fn toggle_gear(&mut self) {
        self.scheme.toggle_gear();
    }

    pub fn on_grab_start(&mut self, actor_orientation: Option<UnitQuaternion<f64>>) {
        self.steering.on_grab_start(actor_orientation);
    }

    pub fn on_grab_end(&mut self) {
        self.steering.on_grab_end();
    }

    /// The gear an external display should show. For the dual-pedal
    /// scheme this is the direction of the most recent command.
    pub fn current_gear(&self) -> Gear {
        self.scheme.gear().unwrap_or(self.last_command.direction)
    }

    pub fn current_motor_torque(&self) -> f64 {
        self.motor.current_motor_torque()
    }

    pub fn steer_fraction(&self) -> f64 {
        self.steer_fraction
    }

    pub fn is_tilted(&self) -> bool {
        self.is_tilted
    }

    pub fn steering(&self) -> &SteeringSource {
        &self.steering
    }
}
