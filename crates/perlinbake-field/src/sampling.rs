//! Per-sample evaluation: grid index → domain coordinate → raw noise →
//! normalized intensity → 8-bit value.
//!
//! Everything here is a pure function of its arguments, which is what lets the
//! fill run samples in any order on any thread.

use crate::primitive::NoisePrimitive;
use crate::settings::NoiseSettings;

/// Conversion from offset units to frequency-scaled domain units. Offsets are
/// multiplied by the current octave frequency and then by this constant, so a
/// pan of one offset unit moves the domain by one unit per unit of frequency.
pub const OFFSET_SCALE: f32 = 1.0;

/// (col, row) of a row-major grid index.
#[inline]
pub fn grid_position(index: usize, width: usize) -> (usize, usize) {
    (index % width, index / width)
}

/// Normalized sample coordinate in [0, 1)²: (col / width, row / height).
#[inline]
pub fn normalized_coord(index: usize, width: usize, height: usize) -> (f32, f32) {
    let (col, row) = grid_position(index, width);
    (col as f32 / width as f32, row as f32 / height as f32)
}

/// Maps a normalized coordinate into the noise domain at one frequency.
#[inline]
pub fn domain_coord(uv: (f32, f32), offset: (f32, f32), frequency: f32) -> (f32, f32) {
    (
        uv.0 * frequency + offset.0 * frequency * OFFSET_SCALE,
        uv.1 * frequency + offset.1 * frequency * OFFSET_SCALE,
    )
}

/// Turns a raw kernel value into an intensity in [0, 1].
///
/// The value is clamped to [-1, 1] first and then shifted with
/// `(v + 1) * 0.5`. Non-finite input maps to the midpoint.
#[inline]
pub fn remap_unit(raw: f32) -> f32 {
    if !raw.is_finite() {
        return 0.5;
    }
    ((raw.clamp(-1.0, 1.0) + 1.0) * 0.5).clamp(0.0, 1.0)
}

/// Round-to-nearest quantization of an intensity to one byte.
#[inline]
pub fn quantize(intensity: f32) -> u8 {
    (intensity.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Single-frequency evaluation; ignores `octaves`, `persistence` and
/// `lacunarity`.
#[inline]
pub fn sample_single<P: NoisePrimitive + ?Sized>(
    noise: &P,
    settings: &NoiseSettings,
    uv: (f32, f32),
) -> f32 {
    let (x, y) = domain_coord(uv, settings.offset, settings.frequency);
    remap_unit(noise.noise_2d(x, y))
}

/// Fractal sum over `settings.octaves` layers, normalized by the summed
/// amplitude so the result stays in the kernel's range for any octave count.
pub fn sample_fractal<P: NoisePrimitive + ?Sized>(
    noise: &P,
    settings: &NoiseSettings,
    uv: (f32, f32),
) -> f32 {
    let mut amp = 1.0_f32;
    let mut freq = settings.frequency;
    let mut sum = 0.0_f32;
    let mut max_amp = 0.0_f32;
    for _ in 0..settings.octaves.max(1) {
        let (x, y) = domain_coord(uv, settings.offset, freq);
        sum += noise.noise_2d(x, y) * amp;
        max_amp += amp;
        amp *= settings.persistence;
        freq *= settings.lacunarity;
    }
    remap_unit(sum / max_amp)
}

/// Intensity of the sample at `index` in the settings' grid.
#[inline]
pub fn sample_intensity<P: NoisePrimitive + ?Sized>(
    noise: &P,
    settings: &NoiseSettings,
    index: usize,
) -> f32 {
    let uv = normalized_coord(
        index,
        settings.width() as usize,
        settings.height() as usize,
    );
    if settings.is_fractal() {
        sample_fractal(noise, settings, uv)
    } else {
        sample_single(noise, settings, uv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::PerlinNoise;

    #[test]
    fn grid_position_is_row_major() {
        assert_eq!(grid_position(0, 4), (0, 0));
        assert_eq!(grid_position(3, 4), (3, 0));
        assert_eq!(grid_position(4, 4), (0, 1));
        assert_eq!(grid_position(11, 4), (3, 2));
    }

    #[test]
    fn strip_coordinates() {
        for i in 0..4 {
            assert_eq!(normalized_coord(i, 4, 1), (i as f32 / 4.0, 0.0));
        }
        for i in 0..3 {
            assert_eq!(normalized_coord(i, 1, 3), (0.0, i as f32 / 3.0));
        }
    }

    #[test]
    fn offset_scales_with_frequency() {
        assert_eq!(domain_coord((0.5, 0.25), (0.0, 0.0), 4.0), (2.0, 1.0));
        assert_eq!(domain_coord((0.5, 0.25), (1.0, -2.0), 4.0), (6.0, -7.0));
        assert_eq!(domain_coord((0.5, 0.25), (3.0, 3.0), 0.0), (0.0, 0.0));
    }

    #[test]
    fn remap_clamps_overshoot() {
        assert_eq!(remap_unit(-1.0), 0.0);
        assert_eq!(remap_unit(0.0), 0.5);
        assert_eq!(remap_unit(1.0), 1.0);
        assert_eq!(remap_unit(1.3), 1.0);
        assert_eq!(remap_unit(-7.0), 0.0);
        assert_eq!(remap_unit(f32::NAN), 0.5);
    }

    #[test]
    fn quantize_rounds_to_nearest() {
        assert_eq!(quantize(0.0), 0);
        assert_eq!(quantize(1.0), 255);
        assert_eq!(quantize(0.5), 128);
        assert_eq!(quantize(1.0 / 255.0 * 0.49), 0);
        assert_eq!(quantize(1.0 / 255.0 * 0.51), 1);
        assert_eq!(quantize(2.0), 255);
        assert_eq!(quantize(-1.0), 0);
    }

    #[test]
    fn single_octave_fractal_matches_single_path() {
        let noise = PerlinNoise::with_seed(7);
        let settings = NoiseSettings::new(32, 32)
            .with_frequency(5.0)
            .with_offset(0.3, -1.7)
            .with_fractal(1, 0.8, 3.0);
        for i in 0..32 * 32 {
            let uv = normalized_coord(i, 32, 32);
            let a = sample_single(&noise, &settings, uv);
            let b = sample_fractal(&noise, &settings, uv);
            assert_eq!(a.to_bits(), b.to_bits(), "index {i}");
        }
    }

    #[test]
    fn fractal_divides_by_summed_amplitude() {
        // Constant kernel: any normalized sum of identical values is that value.
        let constant = |_x: f32, _y: f32| 0.6_f32;
        let settings = NoiseSettings::new(4, 4).with_fractal(6, 0.5, 2.0);
        let v = sample_fractal(&constant, &settings, (0.25, 0.75));
        assert!((v - 0.8).abs() < 1e-6, "got {v}");
    }

    #[test]
    fn fractal_weights_octaves_by_persistence() {
        // Kernel returns 1 at the first octave's coordinate and -1 elsewhere.
        let settings = NoiseSettings::new(4, 4)
            .with_frequency(1.0)
            .with_fractal(2, 0.5, 2.0);
        let kernel = |x: f32, _y: f32| if x < 0.6 { 1.0_f32 } else { -1.0 };
        // uv.x = 0.5: octave 0 at x = 0.5 (1.0), octave 1 at x = 1.0 (-1.0).
        // (1 - 0.5) / 1.5 = 1/3 → remapped to 2/3.
        let v = sample_fractal(&kernel, &settings, (0.5, 0.0));
        assert!((v - 2.0 / 3.0).abs() < 1e-6, "got {v}");
    }

    #[test]
    fn fractal_frequencies_follow_lacunarity() {
        use std::sync::Mutex;
        let seen = Mutex::new(Vec::new());
        let recorder = |x: f32, y: f32| {
            seen.lock().unwrap().push((x, y));
            0.0_f32
        };
        let settings = NoiseSettings::new(2, 2)
            .with_frequency(2.0)
            .with_offset(1.0, 0.0)
            .with_fractal(3, 0.5, 3.0);
        sample_fractal(&recorder, &settings, (0.5, 0.5));
        let seen = seen.into_inner().unwrap();
        assert_eq!(seen, vec![(3.0, 1.0), (9.0, 3.0), (27.0, 9.0)]);
    }
}
