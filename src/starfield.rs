use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::instance::{Instance, InstanceRaw};
use crate::system::STAR_LAYER;

pub const STAR_COUNT: usize = 150;
pub const STAR_RADIUS: f32 = 0.15;

/// The fixed backdrop of small white spheres scattered around the scene.
/// Generated once at startup and never mutated. Overlapping stars are fine.
pub struct Starfield {
    stars: Vec<glam::Vec3>,
}

impl Starfield {
    /// Scatters [`STAR_COUNT`] stars, each axis sampled independently and
    /// uniformly from `[-spread / 2, spread / 2]`. Deterministic per seed.
    pub fn generate(seed: u64, spread: f32) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let half = spread / 2.0;
        let stars = (0..STAR_COUNT)
            .map(|_| {
                glam::Vec3::new(
                    rng.random_range(-half..half),
                    rng.random_range(-half..half),
                    rng.random_range(-half..half),
                )
            })
            .collect();
        Starfield { stars }
    }

    pub fn stars(&self) -> &[glam::Vec3] {
        &self.stars
    }

    /// Instance records for the GPU, all drawing through the white
    /// texture-array layer.
    pub fn instance_data(&self) -> Vec<InstanceRaw> {
        self.stars
            .iter()
            .map(|&position| {
                InstanceRaw::from(&Instance {
                    position,
                    rotation: glam::Vec3::ZERO,
                    scale: STAR_RADIUS,
                    texture_layer: STAR_LAYER,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_exactly_the_fixed_star_count() {
        let field = Starfield::generate(42, 150.0);
        assert_eq!(field.stars().len(), STAR_COUNT);
    }

    #[test]
    fn stars_stay_inside_the_spread_on_every_axis() {
        let field = Starfield::generate(7, 100.0);
        for star in field.stars() {
            assert!(star.x.abs() <= 50.0);
            assert!(star.y.abs() <= 50.0);
            assert!(star.z.abs() <= 50.0);
        }
    }

    #[test]
    fn same_seed_same_field() {
        let a = Starfield::generate(1234, 150.0);
        let b = Starfield::generate(1234, 150.0);
        assert_eq!(a.stars(), b.stars());
    }

    #[test]
    fn different_seeds_differ() {
        let a = Starfield::generate(1, 150.0);
        let b = Starfield::generate(2, 150.0);
        assert_ne!(a.stars(), b.stars());
    }

    #[test]
    fn instance_data_covers_every_star() {
        let field = Starfield::generate(9, 150.0);
        assert_eq!(field.instance_data().len(), STAR_COUNT);
    }
}
