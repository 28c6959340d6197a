use glam::{UVec2, Vec2};
use particle_name::color::Rgb;
use particle_name::completion::Phase;
use particle_name::config::{BlendPolicy, Config, DrawMode, SpawnStrategy};
use particle_name::particle::Surface;
use particle_name::pool::{ParticlePool, ReconcileReport};
use particle_name::sampler::{Coverage, GlyphRaster};
use particle_name::{blend, steering, Painter, Session};
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Covers a 20x8 block in the middle of the surface.
struct Block;

impl GlyphRaster for Block {
    fn rasterize(&mut self, _: &str, _: f32, width: u32, height: u32) -> Coverage {
        let mut alpha = vec![0u8; (width * height) as usize];
        for y in height / 2 - 4..height / 2 + 4 {
            for x in width / 2 - 10..width / 2 + 10 {
                alpha[(y * width + x) as usize] = 255;
            }
        }
        Coverage::new(width, height, alpha)
    }
}

struct NullPainter;

impl Painter for NullPainter {
    fn clear(&mut self, _: Surface) {}
    fn fill(&mut self, _: Vec2, _: f32, _: DrawMode, _: Rgb) {}
}

fn small_stride() -> Config {
    Config {
        pixel_stride: 3,
        ..Config::default()
    }
}

#[test]
fn two_targets_into_empty_pool() {
    let mut rng = SmallRng::seed_from_u64(100);
    let surface = Surface::new(100.0, 100.0);
    let mut pool = ParticlePool::new();
    let targets = [UVec2::new(10, 10), UVec2::new(20, 20)];

    let report = pool.reconcile(&targets, surface, Rgb::WHITE, SpawnStrategy::Ring, &mut rng);

    assert_eq!(report, ReconcileReport { retargeted: 0, created: 2, killed: 0 });
    let parts = pool.particles();
    assert_eq!(parts[0].target, Vec2::new(10.0, 10.0));
    assert_eq!(parts[1].target, Vec2::new(20.0, 20.0));
    assert!(parts.iter().all(|p| !surface.contains(p.position)));
}

#[test]
fn five_settled_shrink_to_three() {
    let mut rng = SmallRng::seed_from_u64(101);
    let surface = Surface::new(200.0, 200.0);
    let mut pool = ParticlePool::new();
    let five: Vec<UVec2> = (0..5).map(|i| UVec2::new(20 * i + 10, 50)).collect();
    pool.reconcile(&five, surface, Rgb::WHITE, SpawnStrategy::Ring, &mut rng);
    for p in pool.particles_mut() {
        p.position = p.target;
        p.color_weight = 1.0;
        p.settled = true;
    }

    let three = [UVec2::new(1, 1), UVec2::new(2, 2), UVec2::new(3, 3)];
    let report = pool.reconcile(&three, surface, Rgb::WHITE, SpawnStrategy::Ring, &mut rng);

    assert_eq!(report, ReconcileReport { retargeted: 3, created: 0, killed: 2 });
    assert_eq!(pool.len(), 5);
    for (p, coord) in pool.particles().iter().zip(three.iter()) {
        assert_eq!(p.target, coord.as_vec2());
        assert!(!p.is_killed && !p.settled);
        assert_eq!(p.color_weight, 0.0);
    }
    for p in &pool.particles()[3..] {
        assert!(p.is_killed);
        assert!(!p.settled);
        assert!(!surface.contains(p.target));
        assert_eq!(p.target_color, Rgb::BLACK);
    }
}

#[test]
fn killed_agents_leave_only_when_off_surface() {
    let mut session = Session::with_seed(small_stride(), 7);
    session.resize(200, 100, &mut Block);
    let surface = session.surface();
    for _ in 0..400 {
        session.frame(&mut NullPainter);
    }
    let before = session.pool().len();
    session.retarget(&[UVec2::new(100, 50)]);

    let mut remaining = before;
    for _ in 0..600 {
        // Replay the frame's motion on a copy to see who ends up off-surface.
        let exits = session
            .pool()
            .particles()
            .iter()
            .filter(|p| p.is_killed)
            .map(|p| {
                let mut p = p.clone();
                steering::step(&mut p);
                blend::advance(&mut p, BlendPolicy::FixedRate);
                p
            })
            .filter(|p| !surface.contains(p.position))
            .count();
        let report = session.frame(&mut NullPainter);
        assert_eq!(report.pruned, exits);
        assert_eq!(report.alive + report.pruned, remaining);
        remaining = report.alive;
        assert!(session
            .pool()
            .particles()
            .iter()
            .all(|p| (0.0..=1.0).contains(&p.color_weight)));
    }
    assert_eq!(session.pool().len(), 1);
    assert_eq!(session.pool().killed_count(), 0);
}

#[test]
fn reveal_settles_and_completes_once() {
    let mut session = Session::with_seed(small_stride(), 8);
    let report = session.resize(240, 120, &mut Block);
    assert!(report.created > 0);

    let mut due = 0;
    let mut settled = 0;
    for _ in 0..1500 {
        let frame = session.frame(&mut NullPainter);
        settled += frame.settled_now;
        if frame.completion_due {
            due += 1;
        }
    }
    assert_eq!(due, 1);
    // Each agent settles exactly once.
    assert_eq!(settled, report.created);
    assert_eq!(session.phase(), Phase::Completing);
    assert!(session.fire_completion());
    assert!(!session.fire_completion());
    assert_eq!(session.phase(), Phase::Completed);

    for p in session.pool().particles() {
        assert!(p.settled);
        assert_eq!(p.position, p.target);
        assert_eq!(p.velocity, Vec2::ZERO);
        assert_eq!(p.color_weight, 1.0);
    }

    // A later resize re-targets the pool but never re-arms completion.
    session.resize(300, 150, &mut Block);
    for _ in 0..1500 {
        assert!(!session.frame(&mut NullPainter).completion_due);
    }
}

#[test]
fn interactive_session_reacts_to_pointer() {
    let config = Config {
        pixel_stride: 3,
        ..Config::interactive_preset()
    };
    let mut session = Session::with_seed(config, 9);
    session.resize(240, 120, &mut Block);
    for _ in 0..1500 {
        session.frame(&mut NullPainter);
    }

    session.pointer_mut().mouse_move(Vec2::new(120.0, 60.0));
    session.frame(&mut NullPainter);
    let displaced = session
        .pool()
        .particles()
        .iter()
        .filter(|p| p.settled && p.target != p.base_target)
        .count();
    assert!(displaced > 0);
    assert!(session.pool().particles().iter().any(|p| p.highlighted));

    session.pointer_mut().mouse_leave();
    for _ in 0..200 {
        session.frame(&mut NullPainter);
    }
    assert!(session
        .pool()
        .particles()
        .iter()
        .filter(|p| p.settled)
        .all(|p| p.position == p.base_target && !p.highlighted));
}
