//! The agent arena and the reconcile pass that maps a fresh target sample
//! onto it.

use glam::{UVec2, Vec2};
use rand::Rng;

use crate::color::Rgb;
use crate::config::SpawnStrategy;
use crate::particle::{Particle, Surface};

/// What a reconcile pass did to the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileReport {
    pub retargeted: usize,
    pub created: usize,
    pub killed: usize,
}

/// Growable arena of agents. Agents are reused across reconciles and only
/// leave the arena after they are killed and have flown off the surface.
#[derive(Debug, Default)]
pub struct ParticlePool {
    particles: Vec<Particle>,
}

impl ParticlePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Assign `targets` in order to agents `0..targets.len()`, growing the pool
    /// with off-surface spawns as needed and killing any trailing surplus.
    pub fn reconcile<R: Rng + ?Sized>(
        &mut self,
        targets: &[UVec2],
        surface: Surface,
        color: Rgb,
        spawn: SpawnStrategy,
        rng: &mut R,
    ) -> ReconcileReport {
        let existing = self.particles.len();
        let mut report = ReconcileReport::default();

        for (index, coord) in targets.iter().enumerate() {
            let target = coord.as_vec2();
            if index < existing {
                report.retargeted += 1;
            } else {
                let start = match spawn {
                    SpawnStrategy::Ring => surface.ring_point(rng),
                    SpawnStrategy::Edges => surface.edge_point(rng),
                };
                self.particles.push(Particle::spawn(start, rng));
                report.created += 1;
            }
            self.particles[index].retarget(target, color);
        }

        for particle in self.particles.iter_mut().skip(targets.len()) {
            particle.kill(surface, rng);
            report.killed += 1;
        }

        log::debug!(
            "reconcile: {} retargeted, {} created, {} killed",
            report.retargeted,
            report.created,
            report.killed
        );
        report
    }

    /// Drop killed agents that have left the surface. Returns how many went.
    pub fn prune_exited(&mut self, surface: Surface) -> usize {
        let before = self.particles.len();
        self.particles
            .retain(|p| !(p.is_killed && !surface.contains(p.position)));
        before - self.particles.len()
    }

    /// Agents within `tolerance` of their current target.
    pub fn arrived_count(&self, tolerance: f32) -> usize {
        self.particles
            .iter()
            .filter(|p| p.distance_to_target() <= tolerance)
            .count()
    }

    pub fn killed_count(&self) -> usize {
        self.particles.iter().filter(|p| p.is_killed).count()
    }

    /// Positions of every agent, in pool order.
    pub fn positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.particles.iter().map(|p| p.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn coords(n: u32) -> Vec<UVec2> {
        (0..n).map(|i| UVec2::new(10 + i, 20 + i)).collect()
    }

    #[test]
    fn grow_then_shrink() {
        let mut rng = SmallRng::seed_from_u64(9);
        let surface = Surface::new(300.0, 200.0);
        let mut pool = ParticlePool::new();

        let r = pool.reconcile(&coords(4), surface, Rgb::WHITE, SpawnStrategy::Ring, &mut rng);
        assert_eq!(r, ReconcileReport { retargeted: 0, created: 4, killed: 0 });

        let r = pool.reconcile(&coords(6), surface, Rgb::WHITE, SpawnStrategy::Edges, &mut rng);
        assert_eq!(r, ReconcileReport { retargeted: 4, created: 2, killed: 0 });
        assert_eq!(pool.len(), 6);

        let r = pool.reconcile(&coords(1), surface, Rgb::WHITE, SpawnStrategy::Ring, &mut rng);
        assert_eq!(r, ReconcileReport { retargeted: 1, created: 0, killed: 5 });
        assert_eq!(pool.len(), 6);
        assert_eq!(pool.killed_count(), 5);
    }

    #[test]
    fn reconcile_revives_killed_agents_first() {
        let mut rng = SmallRng::seed_from_u64(10);
        let surface = Surface::new(300.0, 200.0);
        let mut pool = ParticlePool::new();
        pool.reconcile(&coords(3), surface, Rgb::WHITE, SpawnStrategy::Ring, &mut rng);
        pool.reconcile(&[], surface, Rgb::WHITE, SpawnStrategy::Ring, &mut rng);
        assert_eq!(pool.killed_count(), 3);

        let r = pool.reconcile(&coords(2), surface, Rgb::WHITE, SpawnStrategy::Ring, &mut rng);
        assert_eq!(r.retargeted, 2);
        assert_eq!(r.created, 0);
        assert_eq!(pool.killed_count(), 1);
        assert!(!pool.particles()[0].is_killed);
    }

    #[test]
    fn prune_only_removes_exited_killed_agents() {
        let mut rng = SmallRng::seed_from_u64(12);
        let surface = Surface::new(100.0, 100.0);
        let mut pool = ParticlePool::new();
        pool.reconcile(&coords(3), surface, Rgb::WHITE, SpawnStrategy::Ring, &mut rng);
        pool.reconcile(&coords(0), surface, Rgb::WHITE, SpawnStrategy::Ring, &mut rng);

        let parts = pool.particles_mut();
        parts[0].position = Vec2::new(50.0, 50.0);
        parts[1].position = Vec2::new(100.0, 0.0);
        parts[2].position = Vec2::new(-1.0, 50.0);

        assert_eq!(pool.prune_exited(surface), 1);
        assert_eq!(pool.len(), 2);
        assert!(pool.positions().all(|p| surface.contains(p)));
    }

    #[test]
    fn arrived_count_uses_tolerance() {
        let mut rng = SmallRng::seed_from_u64(13);
        let surface = Surface::new(100.0, 100.0);
        let mut pool = ParticlePool::new();
        pool.reconcile(&coords(3), surface, Rgb::WHITE, SpawnStrategy::Ring, &mut rng);
        let parts = pool.particles_mut();
        parts[0].position = parts[0].target;
        parts[1].position = parts[1].target + Vec2::new(10.0, 0.0);
        assert_eq!(pool.arrived_count(10.0), 2);
    }
}
