/// Intensity mapper: normalized intensity [0, 1] → device amplitude.
///
/// Amplitude 0 means "no actuation" inside a waveform, never "weakest buzz".
/// Any nonzero intensity therefore maps to at least 1.

pub const MIN_AMPLITUDE: u8 = 1;
pub const MAX_AMPLITUDE: u8 = 255;

/// Clamp an intensity into [0, 1]. Out-of-range input saturates; NaN is silence.
pub fn normalize(intensity: f64) -> f64 {
    if intensity.is_nan() {
        return 0.0;
    }
    intensity.clamp(0.0, 1.0)
}

/// Map an intensity to the device amplitude domain [1, 255].
pub fn to_device_amplitude(intensity: f64) -> u8 {
    let scaled = (normalize(intensity) * MAX_AMPLITUDE as f64).round();
    scaled.clamp(MIN_AMPLITUDE as f64, MAX_AMPLITUDE as f64) as u8
}

/// Amplitude for one waveform segment: 0 for a pause, mapped otherwise.
pub fn waveform_amplitude(intensity: f64) -> u8 {
    if normalize(intensity) > 0.0 {
        to_device_amplitude(intensity)
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_and_reference_points() {
        assert_eq!(to_device_amplitude(1.0), 255);
        assert_eq!(to_device_amplitude(0.6), 153);
        assert_eq!(to_device_amplitude(0.5), 128); // 127.5 rounds up
    }

    #[test]
    fn tiny_intensity_never_maps_to_zero() {
        assert_eq!(to_device_amplitude(0.0001), 1);
        assert_eq!(to_device_amplitude(f64::MIN_POSITIVE), 1);
    }

    #[test]
    fn out_of_range_saturates() {
        assert_eq!(to_device_amplitude(3.0), 255);
        assert_eq!(to_device_amplitude(-1.0), 1);
        assert_eq!(normalize(-0.2), 0.0);
        assert_eq!(normalize(f64::NAN), 0.0);
    }

    #[test]
    fn monotonic_over_unit_interval() {
        let mut prev = 0u8;
        for step in 0..=1000 {
            let amp = to_device_amplitude(step as f64 / 1000.0);
            assert!(amp >= prev, "amplitude dropped at step {step}");
            assert!(amp >= MIN_AMPLITUDE);
            prev = amp;
        }
    }

    #[test]
    fn pause_segments_are_zero() {
        assert_eq!(waveform_amplitude(0.0), 0);
        assert_eq!(waveform_amplitude(-0.5), 0);
        assert_eq!(waveform_amplitude(0.001), 1);
        assert_eq!(waveform_amplitude(0.9), 230);
    }
}
