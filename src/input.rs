use crate::constants::THROTTLE_DEADZONE;
use log::debug;

/// Merges a digital held flag with an analog sample into one normalized
/// throttle command in `[0, 1]`.
///
/// Either source alone reaches full authority; analog pressure above the
/// deadzone can exceed a plain on/off press.
pub fn fuse_throttle(held: bool, raw: f64) -> f64 {
    let raw = raw.clamp(0.0, 1.0);
    let digital = if held { 1.0 } else { 0.0 };
    if raw > THROTTLE_DEADZONE {
        raw.max(digital)
    } else {
        digital
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Gear {
    #[default]
    Drive,
    Reverse,
}

impl Gear {
    pub fn toggled(self) -> Self {
        match self {
            Gear::Drive => Gear::Reverse,
            Gear::Reverse => Gear::Drive,
        }
    }

    /// Display label for the external gear indicator.
    pub fn label(self) -> &'static str {
        match self {
            Gear::Drive => "D",
            Gear::Reverse => "R",
        }
    }

    /// Display color (RGB) paired with [`Gear::label`].
    pub fn display_color(self) -> [f32; 3] {
        match self {
            Gear::Drive => [0.0, 1.0, 0.0],
            Gear::Reverse => [1.0, 0.0, 0.0],
        }
    }

    fn sign(self) -> f64 {
        match self {
            Gear::Drive => 1.0,
            Gear::Reverse => -1.0,
        }
    }
}

/// A fused per-tick drive command: which way to push and how hard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveCommand {
    pub direction: Gear,
    pub magnitude: f64,
}

impl DriveCommand {
    pub fn neutral() -> Self {
        Self {
            direction: Gear::Drive,
            magnitude: 0.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.magnitude > THROTTLE_DEADZONE
    }

    pub fn signed_magnitude(&self) -> f64 {
        self.direction.sign() * self.magnitude
    }
}

/// Gear-toggle input scheme: one throttle pedal plus a D/R toggle.
#[derive(Debug, Clone, Default)]
pub struct GearThrottle {
    gear: Gear,
    throttle_held: bool,
}

impl GearThrottle {
    pub fn notify_accelerate_start(&mut self) {
        self.throttle_held = true;
    }

    pub fn notify_accelerate_stop(&mut self) {
        self.throttle_held = false;
    }

    /// Flips between Drive and Reverse. Does not brake by itself; only
    /// releasing the throttle does.
    pub fn toggle_gear(&mut self) {
        self.gear = self.gear.toggled();
        debug!("gear changed to {}", self.gear.label());
    }

    pub fn gear(&self) -> Gear {
        self.gear
    }

    pub fn command(&self, throttle_raw: f64) -> DriveCommand {
        DriveCommand {
            direction: self.gear,
            magnitude: fuse_throttle(self.throttle_held, throttle_raw),
        }
    }
}

/// Dual-pedal input scheme: separate forward and reverse pedals.
#[derive(Debug, Clone, Default)]
pub struct PedalPair {
    forward_held: bool,
    reverse_held: bool,
}

impl PedalPair {
    pub fn notify_accelerate_start(&mut self) {
        self.forward_held = true;
    }

    pub fn notify_accelerate_stop(&mut self) {
        self.forward_held = false;
    }

    pub fn notify_reverse_start(&mut self) {
        self.reverse_held = true;
    }

    pub fn notify_reverse_stop(&mut self) {
        self.reverse_held = false;
    }

    /// Forward wins when both pedals are active.
    pub fn command(&self, forward_raw: f64, reverse_raw: f64) -> DriveCommand {
        let forward = fuse_throttle(self.forward_held, forward_raw);
        if forward > THROTTLE_DEADZONE {
            return DriveCommand {
                direction: Gear::Drive,
                magnitude: forward,
            };
        }

        let reverse = fuse_throttle(self.reverse_held, reverse_raw);
        if reverse > THROTTLE_DEADZONE {
            return DriveCommand {
                direction: Gear::Reverse,
                magnitude: reverse,
            };
        }

        DriveCommand::neutral()
    }
}

/// The two interchangeable producers of [`DriveCommand`].
#[derive(Debug, Clone)]
pub enum ThrottleScheme {
    GearToggle(GearThrottle),
    DualPedal(PedalPair),
}

impl ThrottleScheme {
    pub fn command(&self, throttle_raw: f64, reverse_raw: f64) -> DriveCommand {
        match self {
            ThrottleScheme::GearToggle(scheme) => scheme.command(throttle_raw),
            ThrottleScheme::DualPedal(scheme) => scheme.command(throttle_raw, reverse_raw),
        }
    }

    pub fn notify_accelerate_start(&mut self) {
        match self {
            ThrottleScheme::GearToggle(scheme) => scheme.notify_accelerate_start(),
            ThrottleScheme::DualPedal(scheme) => scheme.notify_accelerate_start(),
        }
    }

    pub fn notify_accelerate_stop(&mut self) {
        match self {
            ThrottleScheme::GearToggle(scheme) => scheme.notify_accelerate_stop(),
            ThrottleScheme::DualPedal(scheme) => scheme.notify_accelerate_stop(),
        }
    }

    pub fn notify_reverse_start(&mut self) {
        if let ThrottleScheme::DualPedal(scheme) = self {
            scheme.notify_reverse_start();
        }
    }

    pub fn notify_reverse_stop(&mut self) {
        if let ThrottleScheme::DualPedal(scheme) = self {
            scheme.notify_reverse_stop();
        }
    }

    pub fn toggle_gear(&mut self) {
        if let ThrottleScheme::GearToggle(scheme) = self {
            scheme.toggle_gear();
        }
    }

    /// The latched gear, for schemes that have one.
    pub fn gear(&self) -> Option<Gear> {
        match self {
            ThrottleScheme::GearToggle(scheme) => Some(scheme.gear()),
            ThrottleScheme::DualPedal(_) => None,
        }
    }
}
