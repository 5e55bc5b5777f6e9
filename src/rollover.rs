use nalgebra::Vector3;

/// World down axis in the z-up convention used throughout the crate.
pub fn world_down() -> Vector3<f64> {
    -Vector3::z()
}

/// A vehicle whose up axis points more down than up has rolled past
/// horizontal. While tilted, drive actuation is cut: zero motor torque and
/// zero brake, wheels simply idle. Steering is deliberately left alone.
pub fn is_tilted(vehicle_up: &Vector3<f64>) -> bool {
    vehicle_up.dot(&world_down()) > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upright_is_not_tilted() {
        assert!(!is_tilted(&Vector3::z()));
    }

    #[test]
    fn inverted_is_tilted() {
        assert!(is_tilted(&-Vector3::z()));
    }

    #[test]
    fn exactly_sideways_is_not_tilted() {
        // The cutoff requires a strictly positive dot product.
        assert!(!is_tilted(&Vector3::x()));
        assert!(!is_tilted(&Vector3::y()));
    }

    #[test]
    fn slightly_past_horizontal_is_tilted() {
        let up = Vector3::new(1.0, 0.0, -0.01);
        assert!(is_tilted(&up));
    }
}
