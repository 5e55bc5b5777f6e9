use anyhow::Result;
use clap::Parser;
use drive_control::{
    GearThrottle, KnobSteering, SteeringInput, SteeringSource, ThrottleScheme, TickInput,
    VehicleControllerInit, VisualTransform, Wheel, WheelActuator, WheelPose,
    WheelRole,
};
use nalgebra::{Point3, UnitQuaternion, Vector3};
use rand::prelude::*;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::{cell::RefCell, rc::Rc};

#[derive(Parser)]
struct Opts {
    /// Number of fixed-timestep ticks to simulate.
    #[clap(default_value = "200")]
    pub ticks: usize,
    /// Fixed timestep in seconds.
    #[clap(default_value = "0.02")]
    pub dt: f64,
}

/// Toy stand-in for a physics wheel: integrates torque into spin and
/// reports the resulting pose.
#[derive(Default)]
struct SimWheel {
    motor_torque: f64,
    brake_torque: f64,
    steer_angle: f64,
    spin: f64,
    offset: Vector3<f64>,
}

struct SharedWheel(Rc<RefCell<SimWheel>>);

impl WheelActuator for SharedWheel {
    fn set_motor_torque(&mut self, torque: f64) {
        self.0.borrow_mut().motor_torque = torque;
    }

    fn set_brake_torque(&mut self, torque: f64) {
        self.0.borrow_mut().brake_torque = torque;
    }

    fn set_steer_angle(&mut self, degrees: f64) {
        self.0.borrow_mut().steer_angle = degrees;
    }

    fn world_pose(&self) -> WheelPose {
        let wheel = self.0.borrow();
        WheelPose {
            position: Point3::from(wheel.offset),
            orientation: UnitQuaternion::from_euler_angles(
                0.0,
                wheel.spin,
                wheel.steer_angle.to_radians(),
            ),
        }
    }
}

struct NullTransform;

impl VisualTransform for NullTransform {
    fn set_world_pose(&mut self, _pose: &WheelPose) {
        // A real host would copy the pose onto its scene node here.
    }
}

fn main() -> Result<()> {
    TermLogger::init(
        LevelFilter::Debug,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    let Opts { ticks, dt } = Opts::parse();

    // Build a vehicle with the gear-toggle scheme and a steering knob.
    let mut controller = VehicleControllerInit::default().build(
        ThrottleScheme::GearToggle(GearThrottle::default()),
        SteeringSource::Knob(KnobSteering),
    )?;

    let mut sim_wheels = Vec::new();
    for (role, offset) in [
        (WheelRole::FrontLeft, Vector3::new(1.2, 0.8, 0.3)),
        (WheelRole::FrontRight, Vector3::new(1.2, -0.8, 0.3)),
        (WheelRole::RearLeft, Vector3::new(-1.2, 0.8, 0.3)),
        (WheelRole::RearRight, Vector3::new(-1.2, -0.8, 0.3)),
    ] {
        let wheel = Rc::new(RefCell::new(SimWheel {
            offset,
            ..Default::default()
        }));
        sim_wheels.push(wheel.clone());
        controller
            .attach_wheel(Wheel::new(role, Box::new(SharedWheel(wheel))).with_visual(Box::new(NullTransform)));
    }

    // Hold the accelerator and drift the knob with a little noise.
    let mut rng = rand::thread_rng();
    controller.notify_accelerate_start();
    let mut knob_value: f64 = 0.5;

    for tick in 0..ticks {
        if tick == ticks / 2 {
            controller.notify_accelerate_stop();
            controller.toggle_gear();
        }

        knob_value = (knob_value + rng.gen_range(-0.02..0.02)).clamp(0.0, 1.0);
        let input = TickInput {
            throttle_raw: rng.gen_range(0.0..0.05),
            steering: SteeringInput {
                knob_value: Some(knob_value),
                ..Default::default()
            },
            ..Default::default()
        };
        controller.step(dt, &input);

        for wheel in &sim_wheels {
            let mut wheel = wheel.borrow_mut();
            wheel.spin += wheel.motor_torque * 1e-3 * dt;
            wheel.spin /= 1.0 + wheel.brake_torque * 1e-5 * dt;
        }

        if tick % 20 == 0 {
            println!(
                "t={:6.2}s gear={} torque={:8.1} steer={:+.2}",
                tick as f64 * dt,
                controller.current_gear().label(),
                controller.current_motor_torque(),
                controller.steer_fraction(),
            );
        }
    }

    Ok(())
}
