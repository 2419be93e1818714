//! Raycast scanner.
//!
//! A scan fires a burst of rays in a jittered cone around an aim direction and
//! records where each one lands. The recorded [`ScanDot`]s are kept in a
//! bounded ring, oldest dropped first, for visualisation consumers.

use std::collections::VecDeque;
use std::f32::consts::TAU;

use log::{debug, warn};
use rand::prelude::*;
use rand::rngs::StdRng;

use crate::benchmarks;
use crate::config::ScannerConfig;
use crate::game::collision::CollisionSystem;
use crate::geometry::Ray;
use crate::math::mat::Mat4;
use crate::math::vec::Vec3;

/// A single scan hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanDot {
    pub position: Vec3,
    pub normal: Vec3,
    /// World distance from the scan origin.
    pub distance: f32,
}

pub struct Scanner {
    config: ScannerConfig,
    dots: VecDeque<ScanDot>,
    rng: StdRng,
}

impl Scanner {
    /// Creates a scanner. A fixed `seed` makes the jitter reproducible.
    pub fn new(config: ScannerConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            dots: VecDeque::with_capacity(config.max_dots.min(4096)),
            config,
            rng,
        }
    }

    pub fn dots(&self) -> &VecDeque<ScanDot> {
        &self.dots
    }

    pub fn clear(&mut self) {
        self.dots.clear();
    }

    /// Fires the configured number of rays.
    pub fn scan(&mut self, world: &CollisionSystem, origin: Vec3, aim: Vec3) -> usize {
        self.burst(world, origin, aim, self.config.rays_per_burst)
    }

    /// Fires `count` rays from `origin` in a cone around `aim`.
    ///
    /// `count` is clamped to `max_burst`. Each ray reaches at most `range`
    /// units; hits are appended to the dot ring.
    ///
    /// # Returns
    ///
    /// The number of rays that hit something.
    pub fn burst(&mut self, world: &CollisionSystem, origin: Vec3, aim: Vec3, count: usize) -> usize {
        let _timer = benchmarks::scoped_timer("scan_burst");

        let count = if count > self.config.max_burst {
            warn!(
                "Scan burst of {} rays clamped to {}",
                count, self.config.max_burst
            );
            self.config.max_burst
        } else {
            count
        };

        let basis = Mat4::face_towards(aim);
        let spread = self.config.spread_degrees.to_radians().tan();
        let range = self.config.range;
        let mut hits = 0;

        for _ in 0..count {
            // Uniform over the cone's cross-section disc.
            let radius = spread * self.rng.gen_range(0.0f32..=1.0).sqrt();
            let angle = self.rng.gen_range(0.0..TAU);
            let direction = (basis.forward()
                + basis.right() * (radius * angle.cos())
                + basis.up() * (radius * angle.sin()))
            .normalize();

            let ray = Ray::new(origin, direction * range);
            let Some(hit) = world.raycast(&ray) else {
                continue;
            };
            if hit.distance > 1.0 {
                continue;
            }

            hits += 1;
            self.push(ScanDot {
                position: hit.position,
                normal: hit.normal,
                distance: hit.distance * range,
            });
        }

        debug!("Scan burst: {} rays, {} hits", count, hits);
        hits
    }

    fn push(&mut self, dot: ScanDot) {
        if self.config.max_dots == 0 {
            return;
        }
        while self.dots.len() >= self.config.max_dots {
            self.dots.pop_front();
        }
        self.dots.push_back(dot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Large wall in the plane z = -5 facing +z.
    fn wall_world() -> CollisionSystem {
        let corner = Vec3::new(-50.0, -50.0, -5.0);
        let u = Vec3::Y * 100.0;
        let v = Vec3::X * 100.0;
        CollisionSystem::from_models(&[vec![
            [corner, corner + u, corner + u + v],
            [corner, corner + u + v, corner + v],
        ]])
        .unwrap()
    }

    fn config() -> ScannerConfig {
        ScannerConfig {
            rays_per_burst: 20,
            max_burst: 50,
            spread_degrees: 10.0,
            range: 20.0,
            max_dots: 64,
        }
    }

    #[test]
    fn every_ray_hits_a_facing_wall() {
        let world = wall_world();
        let mut scanner = Scanner::new(config(), Some(1));
        let hits = scanner.scan(&world, Vec3::ZERO, -Vec3::Z);

        assert_eq!(hits, 20);
        let max_distance = 5.0 / 10.0f32.to_radians().cos() + 1e-4;
        for dot in scanner.dots() {
            assert!((dot.position.z() + 5.0).abs() < 1e-4);
            assert_eq!(dot.normal, Vec3::Z);
            assert!(dot.distance >= 5.0 - 1e-4 && dot.distance <= max_distance);
        }
    }

    #[test]
    fn facing_away_records_nothing() {
        let world = wall_world();
        let mut scanner = Scanner::new(config(), Some(2));
        assert_eq!(scanner.scan(&world, Vec3::ZERO, Vec3::Z), 0);
        assert!(scanner.dots().is_empty());
    }

    #[test]
    fn hits_beyond_range_are_ignored() {
        let world = wall_world();
        let mut scanner = Scanner::new(config(), Some(3));
        assert_eq!(scanner.scan(&world, Vec3::new(0.0, 0.0, 30.0), -Vec3::Z), 0);
    }

    #[test]
    fn oversized_burst_is_clamped() {
        let world = wall_world();
        let mut scanner = Scanner::new(config(), Some(4));
        assert_eq!(scanner.burst(&world, Vec3::ZERO, -Vec3::Z, 1000), 50);
    }

    #[test]
    fn dot_ring_is_bounded() {
        let world = wall_world();
        let mut scanner = Scanner::new(config(), Some(5));
        for _ in 0..10 {
            scanner.scan(&world, Vec3::ZERO, -Vec3::Z);
        }
        assert_eq!(scanner.dots().len(), 64);

        scanner.clear();
        assert!(scanner.dots().is_empty());
    }

    #[test]
    fn same_seed_same_dots() {
        let world = wall_world();
        let mut a = Scanner::new(config(), Some(9));
        let mut b = Scanner::new(config(), Some(9));
        a.scan(&world, Vec3::ZERO, -Vec3::Z);
        b.scan(&world, Vec3::ZERO, -Vec3::Z);
        assert_eq!(a.dots(), b.dots());
    }
}
