use crate::error::FieldError;

/// Largest octave stack accepted; beyond this the per-octave frequency
/// leaves the range where f32 coordinates carry any detail.
pub const MAX_OCTAVES: i32 = 32;

/// Default per-dimension resolution limit applied by [`crate::FillOptions`].
pub const DEFAULT_MAX_RESOLUTION: i32 = 8192;

/// Largest absolute domain coordinate any octave may reach. Past 2^24 an f32
/// no longer resolves fractional lattice positions, and the kernel's integer
/// floor overflows near 2^31.
pub const MAX_DOMAIN_EXTENT: f64 = (1u32 << 24) as f64;

/// One field-generation request. Plain value, never mutated during a fill;
/// two records with equal fields always produce equal output.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseSettings {
    /// Output grid as (width, height).
    pub resolution: (i32, i32),
    /// Translation in frequency-scaled domain units.
    pub offset: (f32, f32),
    pub frequency: f32,
    /// Number of fractal layers; 1 is plain single-frequency noise.
    pub octaves: i32,
    /// Amplitude multiplier applied after each octave.
    pub persistence: f32,
    /// Frequency multiplier applied after each octave.
    pub lacunarity: f32,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            resolution: (256, 256),
            offset: (0.0, 0.0),
            frequency: 5.0,
            octaves: 1,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

impl NoiseSettings {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            resolution: (width, height),
            ..Self::default()
        }
    }

    pub fn with_offset(mut self, x: f32, y: f32) -> Self {
        self.offset = (x, y);
        self
    }

    pub fn with_frequency(mut self, frequency: f32) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn with_fractal(mut self, octaves: i32, persistence: f32, lacunarity: f32) -> Self {
        self.octaves = octaves;
        self.persistence = persistence;
        self.lacunarity = lacunarity;
        self
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.resolution.0
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.resolution.1
    }

    #[inline]
    pub fn is_fractal(&self) -> bool {
        self.octaves > 1
    }

    /// Checks every range invariant of the record.
    pub fn validate(&self) -> Result<(), FieldError> {
        let (w, h) = self.resolution;
        if w <= 0 || h <= 0 {
            return Err(FieldError::InvalidConfiguration(
                "resolution must be positive in both dimensions",
            ));
        }
        if !self.offset.0.is_finite() || !self.offset.1.is_finite() {
            return Err(FieldError::InvalidConfiguration("offset must be finite"));
        }
        if !self.frequency.is_finite() || self.frequency < 0.0 {
            return Err(FieldError::InvalidConfiguration(
                "frequency must be finite and non-negative",
            ));
        }
        if self.octaves < 1 {
            return Err(FieldError::InvalidConfiguration("octaves must be at least 1"));
        }
        if self.octaves > MAX_OCTAVES {
            return Err(FieldError::InvalidConfiguration("octaves exceeds the supported maximum"));
        }
        if !self.persistence.is_finite() || !(0.0..=1.0).contains(&self.persistence) {
            return Err(FieldError::InvalidConfiguration("persistence must lie in [0, 1]"));
        }
        if !self.lacunarity.is_finite() || self.lacunarity < 1.0 {
            return Err(FieldError::InvalidConfiguration("lacunarity must be at least 1"));
        }
        if self.domain_extent() > MAX_DOMAIN_EXTENT {
            return Err(FieldError::InvalidConfiguration(
                "offset, frequency and octave stack reach past the sampling domain",
            ));
        }
        Ok(())
    }

    /// Upper bound on |coordinate| over every sample and octave:
    /// `(1 + |offset|) * frequency * lacunarity^(octaves - 1)`. Normalized
    /// coordinates lie in [0, 1) and lacunarity >= 1, so the last octave
    /// reaches furthest.
    pub fn domain_extent(&self) -> f64 {
        let reach = 1.0 + f64::from(self.offset.0.abs().max(self.offset.1.abs()));
        let top_freq =
            f64::from(self.frequency) * f64::from(self.lacunarity).powi(self.octaves.max(1) - 1);
        reach * top_freq
    }

    /// Number of samples in the grid. Fails on non-positive dimensions or
    /// when the product does not fit in `usize`.
    pub fn sample_count(&self) -> Result<usize, FieldError> {
        let (w, h) = self.resolution;
        if w <= 0 || h <= 0 {
            return Err(FieldError::InvalidConfiguration(
                "resolution must be positive in both dimensions",
            ));
        }
        (w as usize)
            .checked_mul(h as usize)
            .ok_or(FieldError::ResourceExhaustion { width: w, height: h })
    }
}
