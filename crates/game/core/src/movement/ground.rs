//! Ground contact as reported by the physics collaborator.

use glam::Vec3;

/// Result of one ground check.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroundContact {
    pub grounded: bool,
    /// Surface normal under the entity; `Vec3::Y` when airborne.
    pub normal: Vec3,
}

impl GroundContact {
    pub const AIRBORNE: Self = Self {
        grounded: false,
        normal: Vec3::Y,
    };

    pub const FLAT: Self = Self {
        grounded: true,
        normal: Vec3::Y,
    };

    pub fn on_surface(normal: Vec3) -> Self {
        Self {
            grounded: true,
            normal: normal.try_normalize().unwrap_or(Vec3::Y),
        }
    }

    /// Angle between the surface normal and world up.
    pub fn slope_degrees(&self) -> f32 {
        self.normal.angle_between(Vec3::Y).to_degrees()
    }

    pub fn is_walkable(&self, slope_limit_degrees: f32) -> bool {
        self.slope_degrees() <= slope_limit_degrees
    }

    /// Direction a body slides down the surface, zero on flat ground.
    pub fn downhill(&self) -> Vec3 {
        let down = Vec3::NEG_Y;
        (down - self.normal * down.dot(self.normal)).normalize_or_zero()
    }
}

impl Default for GroundContact {
    fn default() -> Self {
        Self::AIRBORNE
    }
}

/// Ground sensing performed outside this crate (ray or shape casts).
pub trait GroundSensor {
    /// Probes the ground below `position`.
    fn sense(&mut self, position: Vec3) -> GroundContact;
}

impl<F> GroundSensor for F
where
    F: FnMut(Vec3) -> GroundContact,
{
    fn sense(&mut self, position: Vec3) -> GroundContact {
        self(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_ground_is_walkable() {
        assert!(GroundContact::FLAT.slope_degrees() < 1e-3);
        assert!(GroundContact::FLAT.is_walkable(45.0));
        assert_eq!(GroundContact::FLAT.downhill(), Vec3::ZERO);
    }

    #[test]
    fn steep_ground_exceeds_limit() {
        let contact = GroundContact::on_surface(Vec3::new(1.0, 0.5, 0.0));

        assert!(contact.slope_degrees() > 60.0);
        assert!(!contact.is_walkable(45.0));
        assert!(contact.downhill().x > 0.0);
        assert!(contact.downhill().y < 0.0);
    }

    #[test]
    fn closures_are_sensors() {
        let mut sensor = |position: Vec3| {
            if position.y <= 0.0 {
                GroundContact::FLAT
            } else {
                GroundContact::AIRBORNE
            }
        };

        assert!(sensor.sense(Vec3::ZERO).grounded);
        assert!(!sensor.sense(Vec3::Y).grounded);
    }
}
