use std::time::Instant;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::FieldError;
use crate::primitive::NoisePrimitive;
use crate::sampling::{quantize, sample_intensity};
use crate::settings::{DEFAULT_MAX_RESOLUTION, NoiseSettings};

/// Scheduling knobs for a fill. None of them change the output bytes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FillOptions {
    /// Samples per parallel work item; 0 is treated as 1.
    pub chunk_len: usize,
    /// Per-dimension resolution limit.
    pub max_resolution: i32,
    /// Size of a dedicated worker pool. `None` runs on rayon's global pool.
    pub workers: Option<usize>,
}

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            chunk_len: 64,
            max_resolution: DEFAULT_MAX_RESOLUTION,
            workers: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayField {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldStats {
    pub min: u8,
    pub max: u8,
    pub mean: f64,
}

impl FieldStats {
    /// Min, max and mean over a stream of intensities. An empty stream
    /// reports mean 0.
    pub fn from_bytes(bytes: impl IntoIterator<Item = u8>) -> Self {
        let mut min = u8::MAX;
        let mut max = u8::MIN;
        let mut sum = 0u64;
        let mut n = 0usize;
        for v in bytes {
            min = min.min(v);
            max = max.max(v);
            sum += u64::from(v);
            n += 1;
        }
        let mean = if n == 0 { 0.0 } else { sum as f64 / n as f64 };
        FieldStats { min, max, mean }
    }
}

impl GrayField {
    #[inline]
    pub fn get(&self, col: usize, row: usize) -> u8 {
        self.data[row * self.width + col]
    }

    pub fn stats(&self) -> FieldStats {
        FieldStats::from_bytes(self.data.iter().copied())
    }

    pub fn to_rgba(&self) -> RgbaField {
        RgbaField {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| gray_to_rgba(v)).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbaField {
    pub width: usize,
    pub height: usize,
    pub data: Vec<[u8; 4]>,
}

impl RgbaField {
    /// Interleaved RGBA bytes, 4 per sample.
    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_flattened()
    }

    /// Statistics of the replicated gray channel, read in place.
    pub fn stats(&self) -> FieldStats {
        FieldStats::from_bytes(self.data.iter().map(|px| px[0]))
    }
}

#[inline]
fn gray_to_rgba(v: u8) -> [u8; 4] {
    [v, v, v, u8::MAX]
}

/// Parallel noise-field engine over a base primitive.
///
/// Holds no per-fill state; every fill allocates and returns a fresh buffer.
pub struct NoiseField<P> {
    noise: P,
    options: FillOptions,
    pool: Option<ThreadPool>,
}

impl<P: NoisePrimitive> NoiseField<P> {
    pub fn new(noise: P) -> Self {
        Self {
            noise,
            options: FillOptions::default(),
            pool: None,
        }
    }

    /// Engine with explicit options. Builds a dedicated pool when
    /// `options.workers` is set.
    pub fn with_options(noise: P, options: FillOptions) -> Result<Self, FieldError> {
        let pool = match options.workers {
            Some(n) => Some(
                ThreadPoolBuilder::new()
                    .num_threads(n.max(1))
                    .thread_name(|i| format!("perlinbake-fill-{i}"))
                    .build()
                    .map_err(|e| FieldError::ThreadPool(e.to_string()))?,
            ),
            None => None,
        };
        Ok(Self {
            noise,
            options,
            pool,
        })
    }

    pub fn options(&self) -> &FillOptions {
        &self.options
    }

    pub fn primitive(&self) -> &P {
        &self.noise
    }

    /// Validates `settings` against the record invariants and the host limit,
    /// returning the sample count.
    pub fn check(&self, settings: &NoiseSettings) -> Result<usize, FieldError> {
        settings.validate()?;
        let (w, h) = settings.resolution;
        if w > self.options.max_resolution || h > self.options.max_resolution {
            return Err(FieldError::ResourceExhaustion {
                width: w,
                height: h,
            });
        }
        settings.sample_count()
    }

    /// One byte per sample, row-major.
    pub fn fill_gray(&self, settings: &NoiseSettings) -> Result<GrayField, FieldError> {
        let data = self.fill_with(settings, |v| v)?;
        Ok(GrayField {
            width: settings.width() as usize,
            height: settings.height() as usize,
            data,
        })
    }

    /// RGBA quads with the intensity in R, G and B and opaque alpha.
    pub fn fill_rgba(&self, settings: &NoiseSettings) -> Result<RgbaField, FieldError> {
        let data = self.fill_with(settings, gray_to_rgba)?;
        Ok(RgbaField {
            width: settings.width() as usize,
            height: settings.height() as usize,
            data,
        })
    }

    fn fill_with<T, F>(&self, settings: &NoiseSettings, texel: F) -> Result<Vec<T>, FieldError>
    where
        T: Copy + Default + Send,
        F: Fn(u8) -> T + Sync,
    {
        let len = self.check(settings)?;
        let mut data: Vec<T> = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| FieldError::ResourceExhaustion {
                width: settings.width(),
                height: settings.height(),
            })?;
        data.resize(len, T::default());

        let chunk_len = self.options.chunk_len.max(1);
        let noise = &self.noise;
        let fill = |out: &mut [T]| {
            out.par_chunks_mut(chunk_len)
                .enumerate()
                .for_each(|(chunk_idx, chunk)| {
                    let base = chunk_idx * chunk_len;
                    for (k, slot) in chunk.iter_mut().enumerate() {
                        *slot = texel(quantize(sample_intensity(noise, settings, base + k)));
                    }
                });
        };

        let t0 = Instant::now();
        let workers = match &self.pool {
            Some(pool) => {
                pool.install(|| fill(&mut data));
                pool.current_num_threads()
            }
            None => {
                fill(&mut data);
                rayon::current_num_threads()
            }
        };
        log::debug!(
            target: "field",
            "filled {}x{} octaves={} in {:.2} ms (chunk={} workers={})",
            settings.width(),
            settings.height(),
            settings.octaves,
            t0.elapsed().as_secs_f64() * 1000.0,
            chunk_len,
            workers
        );
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::PerlinNoise;

    #[test]
    fn single_sample_grid() {
        let field = NoiseField::new(PerlinNoise::default());
        let out = field.fill_gray(&NoiseSettings::new(1, 1)).unwrap();
        assert_eq!(out.data.len(), 1);
        assert_eq!((out.width, out.height), (1, 1));
    }

    #[test]
    fn rgba_replicates_gray() {
        let field = NoiseField::new(PerlinNoise::with_seed(3));
        let s = NoiseSettings::new(17, 9).with_fractal(3, 0.5, 2.0);
        let gray = field.fill_gray(&s).unwrap();
        let rgba = field.fill_rgba(&s).unwrap();
        assert_eq!(rgba, gray.to_rgba());
        for (g, c) in gray.data.iter().zip(&rgba.data) {
            assert_eq!(*c, [*g, *g, *g, 255]);
        }
        assert_eq!(rgba.as_bytes().len(), 17 * 9 * 4);
    }

    #[test]
    fn oversize_grid_is_resource_exhaustion() {
        let field = NoiseField::new(PerlinNoise::default());
        let err = field.fill_gray(&NoiseSettings::new(8193, 4)).unwrap_err();
        assert_eq!(err, FieldError::ResourceExhaustion { width: 8193, height: 4 });
    }

    #[test]
    fn custom_limit_applies() {
        let opts = FillOptions {
            max_resolution: 16,
            ..FillOptions::default()
        };
        let field = NoiseField::with_options(PerlinNoise::default(), opts).unwrap();
        assert!(field.fill_gray(&NoiseSettings::new(16, 16)).is_ok());
        assert!(matches!(
            field.fill_gray(&NoiseSettings::new(16, 17)),
            Err(FieldError::ResourceExhaustion { .. })
        ));
    }

    #[test]
    fn stats_of_known_buffer() {
        let g = GrayField {
            width: 2,
            height: 2,
            data: vec![0, 10, 20, 255],
        };
        let s = g.stats();
        assert_eq!((s.min, s.max), (0, 255));
        assert!((s.mean - 71.25).abs() < 1e-9);
        assert_eq!(g.get(1, 1), 255);
        assert_eq!(g.get(0, 1), 20);
    }

    #[test]
    fn rgba_stats_read_the_gray_channel() {
        let g = GrayField {
            width: 3,
            height: 1,
            data: vec![7, 200, 41],
        };
        let c = g.to_rgba();
        assert_eq!(c.stats(), g.stats());
        assert_eq!(c.stats(), FieldStats::from_bytes([7, 200, 41]));

        let empty = FieldStats::from_bytes(std::iter::empty());
        assert_eq!(empty.mean, 0.0);
    }
}
