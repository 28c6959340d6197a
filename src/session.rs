//! One mounted reveal: owns the pool, pointer, surface and completion latch.

use glam::{UVec2, Vec2};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::blend;
use crate::color::Rgb;
use crate::completion::{Completion, Phase};
use crate::config::{Config, DrawMode};
use crate::interaction::{self, PointerState};
use crate::particle::Surface;
use crate::pool::{ParticlePool, ReconcileReport};
use crate::sampler::{self, GlyphRaster};
use crate::steering;

/// Drawing backend for a frame.
pub trait Painter {
    fn clear(&mut self, surface: Surface);
    fn fill(&mut self, at: Vec2, size: f32, mode: DrawMode, color: Rgb);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    pub alive: usize,
    pub arrived: usize,
    pub settled_now: usize,
    pub pruned: usize,
    /// Set on the single frame that reached the completion threshold; the host
    /// should call [`Session::fire_completion`] after `completion_delay_ms`.
    pub completion_due: bool,
}

pub struct Session {
    config: Config,
    pool: ParticlePool,
    pointer: PointerState,
    surface: Surface,
    completion: Completion,
    rng: SmallRng,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self::with_rng(config, SmallRng::from_entropy())
    }

    /// Deterministic session, for tests and replays.
    pub fn with_seed(config: Config, seed: u64) -> Self {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(config: Config, rng: SmallRng) -> Self {
        Self {
            config,
            pool: ParticlePool::new(),
            pointer: PointerState::default(),
            surface: Surface::default(),
            completion: Completion::new(),
            rng,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn pointer_mut(&mut self) -> &mut PointerState {
        &mut self.pointer
    }

    pub fn phase(&self) -> Phase {
        self.completion.phase()
    }

    /// Resize to `width` x `height`, re-sample the text and reconcile.
    pub fn resize<G: GlyphRaster + ?Sized>(&mut self, width: u32, height: u32, raster: &mut G) -> ReconcileReport {
        self.surface = Surface::new(width as f32, height as f32);
        let targets = sampler::sample_text(raster, width, height, &self.config, &mut self.rng);
        self.retarget(&targets)
    }

    /// Reconcile the pool against an already sampled target set.
    pub fn retarget(&mut self, targets: &[UVec2]) -> ReconcileReport {
        self.pool.reconcile(
            targets,
            self.surface,
            self.config.reveal_color,
            self.config.spawn,
            &mut self.rng,
        )
    }

    /// Advance, draw and prune every agent, then check completion.
    pub fn frame<P: Painter + ?Sized>(&mut self, painter: &mut P) -> FrameReport {
        let mut report = FrameReport::default();
        painter.clear(self.surface);

        let pointer = if self.config.interactive {
            self.pointer.influence()
        } else {
            None
        };

        for p in self.pool.particles_mut() {
            if steering::step(p) {
                report.settled_now += 1;
            }
            blend::advance(p, self.config.blend);
            if self.config.interactive {
                interaction::apply(p, pointer, &self.config);
            }
            painter.fill(p.position, p.size, self.config.draw_mode, interaction::draw_color(p));
        }

        report.pruned = self.pool.prune_exited(self.surface);
        report.alive = self.pool.len();
        report.arrived = self.pool.arrived_count(self.config.arrival_tolerance);
        report.completion_due =
            self.completion
                .observe(report.arrived, report.alive, self.config.completion_ratio);
        report
    }

    /// The delayed completion timer elapsed. `true` if the notification should
    /// be delivered now; never `true` twice.
    pub fn fire_completion(&mut self) -> bool {
        self.completion.fire()
    }
}
