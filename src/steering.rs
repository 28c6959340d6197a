//! Per-frame steering: seek with arrival, semi-implicit Euler integration and
//! the settle snap.

use glam::Vec2;

use crate::particle::Particle;

/// Distance below which an agent may snap onto its target.
pub const SETTLE_DISTANCE: f32 = 2.0;
/// Color weight an agent must reach before it is allowed to settle.
pub const SETTLE_WEIGHT: f32 = 0.98;

/// Speed scale for an agent `distance` away from its target: full speed
/// outside `close_enough`, linearly slower inside it.
pub fn proximity_multiplier(distance: f32, close_enough: f32) -> f32 {
    if distance >= close_enough || close_enough <= 0.0 {
        1.0
    } else {
        distance / close_enough
    }
}

/// Bounded corrective force turning `velocity` toward `desired`.
pub fn steering_force(desired: Vec2, velocity: Vec2, max_force: f32) -> Vec2 {
    (desired - velocity).normalize_or_zero() * max_force
}

/// Advance one agent by one frame. Returns `true` if it settled this frame.
pub fn step(p: &mut Particle) -> bool {
    if p.settled {
        return false;
    }

    let distance = p.distance_to_target();
    if distance < SETTLE_DISTANCE && p.color_weight >= SETTLE_WEIGHT {
        p.position = p.target;
        p.velocity = Vec2::ZERO;
        p.acceleration = Vec2::ZERO;
        p.color_weight = 1.0;
        p.settled = true;
        return true;
    }

    let proximity = proximity_multiplier(distance, p.close_enough);
    let desired = (p.target - p.position).normalize_or_zero() * p.max_speed * proximity;
    p.acceleration += steering_force(desired, p.velocity, p.max_force);

    p.velocity += p.acceleration;
    p.position += p.velocity;
    p.acceleration = Vec2::ZERO;
    false
}
