//! Velocity integration helpers.

use glam::{Quat, Vec2, Vec3};

/// Frame a direction is expressed in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FrameOfReference {
    #[default]
    World,
    /// Relative to the entity's facing.
    Local,
}

impl FrameOfReference {
    /// Converts `direction` from this frame to world space.
    pub fn to_world(self, direction: Vec3, facing: Quat) -> Vec3 {
        match self {
            FrameOfReference::World => direction,
            FrameOfReference::Local => facing * direction,
        }
    }
}

/// World-space velocity of an entity.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Momentum {
    pub velocity: Vec3,
}

impl Momentum {
    /// Replaces horizontal velocity with `planar * speed`, keeping vertical.
    ///
    /// `planar` is an XZ input vector (x = right, y = forward) in `frame`.
    pub fn drive(&mut self, planar: Vec2, speed: f32, frame: FrameOfReference, facing: Quat) {
        let local = Vec3::new(planar.x, 0.0, planar.y).clamp_length_max(1.0);
        let world = frame.to_world(local, facing) * speed;
        self.velocity.x = world.x;
        self.velocity.z = world.z;
    }

    pub fn apply_gravity(&mut self, gravity: f32, dt: f32) {
        self.velocity.y -= gravity * dt;
    }

    pub fn accelerate(&mut self, acceleration: Vec3, dt: f32) {
        self.velocity += acceleration * dt;
    }

    /// Scales horizontal velocity so that `retained_per_sec` of it survives one second.
    pub fn apply_friction(&mut self, retained_per_sec: f32, dt: f32) {
        let factor = retained_per_sec.clamp(0.0, 1.0).powf(dt);
        self.velocity.x *= factor;
        self.velocity.z *= factor;
    }

    /// Removes the component pointing into a surface with `normal`.
    pub fn settle_on(&mut self, normal: Vec3) {
        let into = self.velocity.dot(normal);
        if into < 0.0 {
            self.velocity -= normal * into;
        }
    }

    pub fn stop_horizontal(&mut self) {
        self.velocity.x = 0.0;
        self.velocity.z = 0.0;
    }

    pub fn displacement(&self, dt: f32) -> Vec3 {
        self.velocity * dt
    }

    pub fn horizontal_speed(&self) -> f32 {
        Vec2::new(self.velocity.x, self.velocity.z).length()
    }
}
