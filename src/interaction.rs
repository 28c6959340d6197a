//! Pointer and touch influence on resting agents.
//!
//! Agents at (or next to) their rest position are pushed away from the pointer
//! while it is within `influence_radius`, and shimmer between a blue and a
//! white tint. Once the pointer moves away they ease back to rest.

use glam::Vec2;

use crate::color::Rgb;
use crate::config::Config;
use crate::particle::Particle;

/// Offsets smaller than this snap back onto the rest position.
const REST_EPSILON: f32 = 0.01;

/// A mouse move this close to where a finger lifted is the browser replaying
/// the tap as mouse input.
const TAP_ECHO_RADIUS: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerKind {
    #[default]
    Mouse,
    Touch,
}

/// Last known pointer position relative to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    position: Option<Vec2>,
    kind: PointerKind,
    touch_active: bool,
    lifted_at: Option<Vec2>,
}

impl PointerState {
    pub fn mouse_move(&mut self, at: Vec2) {
        if let Some(lifted) = self.lifted_at.take() {
            if lifted.distance(at) <= TAP_ECHO_RADIUS {
                return;
            }
        }
        self.kind = PointerKind::Mouse;
        self.position = Some(at);
    }

    /// Pointer left the surface: park it at the neutral position.
    pub fn mouse_leave(&mut self) {
        self.position = None;
    }

    pub fn touch_start(&mut self, at: Vec2) {
        self.kind = PointerKind::Touch;
        self.touch_active = true;
        self.lifted_at = None;
        self.position = Some(at);
    }

    pub fn touch_move(&mut self, at: Vec2) {
        self.kind = PointerKind::Touch;
        self.position = Some(at);
    }

    /// Last finger lifted.
    pub fn touch_end(&mut self) {
        self.touch_active = false;
        self.lifted_at = self.position.take();
    }

    /// Where influence is applied this frame, if anywhere. Touch input only
    /// counts while a finger is down.
    pub fn influence(&self) -> Option<Vec2> {
        match self.kind {
            PointerKind::Mouse => self.position,
            PointerKind::Touch if self.touch_active => self.position,
            PointerKind::Touch => None,
        }
    }
}

/// Offset from `rest` away from `pointer`, scaled by `(radius - d) / radius`.
/// `None` outside the radius. A pointer exactly on the rest point pushes nowhere.
pub fn displacement(rest: Vec2, pointer: Vec2, radius: f32, push_distance: f32) -> Option<Vec2> {
    let distance = rest.distance(pointer);
    if distance >= radius {
        return None;
    }
    let strength = (radius - distance) / radius;
    Some((rest - pointer).normalize_or_zero() * strength * push_distance)
}

/// Shimmer color for a given phase, alternating blue and white.
pub fn glitter_color(phase: f32) -> Rgb {
    let t = (phase.sin() + 1.0) / 2.0;
    Rgb::GLITTER_BLUE.lerp(Rgb::WHITE, t)
}

/// Apply one frame of pointer influence to `p`.
pub fn apply(p: &mut Particle, pointer: Option<Vec2>, config: &Config) {
    if p.is_killed {
        p.highlighted = false;
        return;
    }
    // A pushed agent that has not settled yet rests near its displaced target.
    let resting = p.settled
        || p.position.distance(p.base_target) <= config.arrival_tolerance
        || p.position.distance(p.target) <= config.arrival_tolerance;
    if !resting {
        p.highlighted = false;
        return;
    }

    let push = pointer.and_then(|at| {
        displacement(
            p.base_target,
            at,
            config.influence_radius,
            config.push_distance,
        )
    });

    match push {
        Some(offset) => {
            p.target = p.base_target + offset;
            p.highlighted = true;
            p.glitter_phase = (p.glitter_phase + config.glitter_speed) % std::f32::consts::TAU;
        }
        None => {
            let remaining = p.base_target - p.target;
            if remaining.length() < REST_EPSILON {
                p.target = p.base_target;
            } else {
                p.target += remaining * config.return_damping;
            }
            p.highlighted = false;
        }
    }

    if p.settled {
        p.position = p.target;
    }
}

/// Color to draw `p` with this frame.
pub fn draw_color(p: &Particle) -> Rgb {
    if p.highlighted {
        glitter_color(p.glitter_phase)
    } else {
        p.current_color()
    }
}
