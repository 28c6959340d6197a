//! A single steered agent and the surface it lives on.

use glam::Vec2;
use rand::Rng;

use crate::color::Rgb;

/// Default radius inside which an agent starts to slow down.
pub const CLOSE_ENOUGH_RADIUS: f32 = 100.0;

/// Visible drawing area in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Surface {
    pub width: f32,
    pub height: f32,
}

impl Surface {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Inclusive bounds check against `[0, width] x [0, height]`.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height
    }

    /// Random point on the circle of radius `(w + h) / 2` around the center.
    ///
    /// That radius is never shorter than the half diagonal, so the point is
    /// always outside the visible area.
    pub fn ring_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let mag = (self.width + self.height) / 2.0;
        self.center() + Vec2::from_angle(angle) * mag
    }

    /// Random point just past one of the four edges.
    pub fn edge_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        let margin = rng.gen_range(20.0..120.0);
        let along_x = rng.gen_range(0.0..=self.width);
        let along_y = rng.gen_range(0.0..=self.height);
        match rng.gen_range(0..4) {
            0 => Vec2::new(along_x, -margin),
            1 => Vec2::new(self.width + margin, along_y),
            2 => Vec2::new(along_x, self.height + margin),
            _ => Vec2::new(-margin, along_y),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub target: Vec2,
    /// Rest position from the last reconcile; `target` drifts from it while
    /// the pointer pushes the agent around.
    pub base_target: Vec2,

    pub max_speed: f32,
    pub max_force: f32,
    pub close_enough: f32,
    pub size: f32,

    pub start_color: Rgb,
    pub target_color: Rgb,
    pub color_weight: f32,
    pub color_blend_rate: f32,

    pub is_killed: bool,
    pub settled: bool,

    pub glitter_phase: f32,
    /// Set while under pointer influence; selects the glitter palette.
    pub highlighted: bool,
}

impl Particle {
    /// Fresh agent at `position` with randomized speed, force, size and blend rate.
    /// It starts black with no target of its own.
    pub fn spawn<R: Rng + ?Sized>(position: Vec2, rng: &mut R) -> Self {
        let max_speed = rng.gen_range(10.0..18.0);
        Self {
            position,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            target: position,
            base_target: position,
            max_speed,
            max_force: max_speed * 0.08,
            close_enough: CLOSE_ENOUGH_RADIUS,
            size: rng.gen_range(6.0..12.0),
            start_color: Rgb::BLACK,
            target_color: Rgb::BLACK,
            color_weight: 0.0,
            color_blend_rate: rng.gen_range(0.015..0.045),
            is_killed: false,
            settled: false,
            glitter_phase: rng.gen_range(0.0..std::f32::consts::TAU),
            highlighted: false,
        }
    }

    pub fn current_color(&self) -> Rgb {
        self.start_color.lerp(self.target_color, self.color_weight)
    }

    pub fn distance_to_target(&self) -> f32 {
        self.position.distance(self.target)
    }

    /// Point the agent at a new rest position, continuing from whatever color
    /// it is showing right now.
    pub fn retarget(&mut self, target: Vec2, color: Rgb) {
        self.start_color = self.current_color();
        self.target_color = color;
        self.color_weight = 0.0;
        self.target = target;
        self.base_target = target;
        self.is_killed = false;
        self.settled = false;
        self.highlighted = false;
    }

    /// Send the agent off-surface and fade it to black. No-op if already killed.
    pub fn kill<R: Rng + ?Sized>(&mut self, surface: Surface, rng: &mut R) {
        if self.is_killed {
            return;
        }
        let exit = surface.ring_point(rng);
        self.start_color = self.current_color();
        self.target_color = Rgb::BLACK;
        self.color_weight = 0.0;
        self.target = exit;
        self.base_target = exit;
        self.is_killed = true;
        self.settled = false;
        self.highlighted = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn ring_points_are_off_surface() {
        let mut rng = SmallRng::seed_from_u64(7);
        let surface = Surface::new(800.0, 300.0);
        for _ in 0..500 {
            assert!(!surface.contains(surface.ring_point(&mut rng)));
        }
    }

    #[test]
    fn edge_points_are_off_surface() {
        let mut rng = SmallRng::seed_from_u64(8);
        let surface = Surface::new(640.0, 480.0);
        for _ in 0..500 {
            assert!(!surface.contains(surface.edge_point(&mut rng)));
        }
    }

    #[test]
    fn spawn_ranges() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..100 {
            let p = Particle::spawn(Vec2::ZERO, &mut rng);
            assert!((10.0..18.0).contains(&p.max_speed));
            assert!((p.max_force - p.max_speed * 0.08).abs() < 1e-6);
            assert!((6.0..12.0).contains(&p.size));
            assert!((0.015..0.045).contains(&p.color_blend_rate));
        }
    }

    #[test]
    fn retarget_starts_from_current_color() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut p = Particle::spawn(Vec2::ZERO, &mut rng);
        p.target_color = Rgb::WHITE;
        p.color_weight = 0.5;
        p.settled = true;
        p.retarget(Vec2::new(5.0, 5.0), Rgb::WHITE);
        assert_eq!(p.start_color, Rgb::new(127.5, 127.5, 127.5));
        assert_eq!(p.color_weight, 0.0);
        assert_eq!(p.target, Vec2::new(5.0, 5.0));
        assert_eq!(p.base_target, p.target);
        assert!(!p.settled);
    }

    #[test]
    fn kill_is_idempotent() {
        let mut rng = SmallRng::seed_from_u64(3);
        let surface = Surface::new(200.0, 100.0);
        let mut p = Particle::spawn(Vec2::new(50.0, 50.0), &mut rng);
        p.kill(surface, &mut rng);
        let exit = p.target;
        assert!(p.is_killed);
        assert!(!surface.contains(exit));
        p.kill(surface, &mut rng);
        assert_eq!(p.target, exit);
    }
}
