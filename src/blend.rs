//! Color-weight policies.

use crate::config::BlendPolicy;
use crate::particle::Particle;

/// Distance at which the distance-driven weight bottoms out.
pub const FADE_DISTANCE: f32 = 400.0;
/// Floor for the distance-driven weight so far-away agents stay faintly visible.
pub const MIN_VISIBLE_WEIGHT: f32 = 0.12;
/// Fraction of the gap to the distance target closed per frame.
pub const SMOOTHING: f32 = 0.08;

/// Advance `p.color_weight` by one frame under `policy`. The weight stays in [0, 1].
pub fn advance(p: &mut Particle, policy: BlendPolicy) {
    match policy {
        BlendPolicy::FixedRate => {
            if p.color_weight < 1.0 {
                p.color_weight = (p.color_weight + p.color_blend_rate).min(1.0);
            }
        }
        BlendPolicy::DistanceDriven => {
            if p.settled {
                return;
            }
            let goal = distance_weight(p.distance_to_target());
            p.color_weight += (goal - p.color_weight) * SMOOTHING;
        }
    }
    p.color_weight = p.color_weight.clamp(0.0, 1.0);
}

/// Weight an agent `distance` away from its target is easing toward.
pub fn distance_weight(distance: f32) -> f32 {
    (1.0 - distance / FADE_DISTANCE).clamp(MIN_VISIBLE_WEIGHT, 1.0)
}
