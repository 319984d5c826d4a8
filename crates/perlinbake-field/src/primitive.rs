use fastnoise_lite::{FastNoiseLite, NoiseType};

pub const DEFAULT_SEED: i32 = 1337;

/// Base 2D gradient-noise kernel sampled by the engine.
///
/// Implementations return values nominally in [-1, 1]; small overshoot is
/// tolerated and clamped downstream. Must be pure: the same input always
/// yields the same output, from any thread.
pub trait NoisePrimitive: Sync {
    fn noise_2d(&self, x: f32, y: f32) -> f32;
}

impl<F> NoisePrimitive for F
where
    F: Fn(f32, f32) -> f32 + Sync,
{
    #[inline]
    fn noise_2d(&self, x: f32, y: f32) -> f32 {
        self(x, y)
    }
}

/// Classic Perlin noise from `fastnoise-lite`.
///
/// The kernel runs at frequency 1.0 with no internal fractal so that all
/// domain scaling and octave stacking stays in [`crate::sampling`].
pub struct PerlinNoise {
    inner: FastNoiseLite,
    seed: i32,
}

impl PerlinNoise {
    pub fn with_seed(seed: i32) -> Self {
        let mut inner = FastNoiseLite::with_seed(seed);
        inner.set_noise_type(Some(NoiseType::Perlin));
        inner.set_frequency(Some(1.0));
        Self { inner, seed }
    }

    pub fn seed(&self) -> i32 {
        self.seed
    }
}

impl Default for PerlinNoise {
    fn default() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }
}

impl NoisePrimitive for PerlinNoise {
    #[inline]
    fn noise_2d(&self, x: f32, y: f32) -> f32 {
        self.inner.get_noise_2d(x, y)
    }
}
