use glam::Vec3;

/// Below this length a vector has no usable direction.
pub const DEGENERATE_EPSILON: f32 = 1e-8;

/// Split a vector into its unit direction and length.
///
/// A degenerate vector yields `Vec3::ZERO` as direction, so whatever it
/// scales contributes nothing.
#[inline]
pub fn direction_and_length(v: Vec3) -> (Vec3, f32) {
    let len = v.length();
    if len < DEGENERATE_EPSILON {
        (Vec3::ZERO, len)
    } else {
        (v / len, len)
    }
}

/// SplitMix64 finaliser, used to derive independent RNG streams
/// (one per image row) from a single render seed.
#[inline]
pub fn mix_seed(seed: u64, stream: u64) -> u64 {
    let mut z = seed
        .wrapping_add(stream.wrapping_mul(0x9E37_79B9_7F4A_7C15))
        .wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// True when every component is finite.
#[inline]
pub fn is_finite(v: Vec3) -> bool {
    v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_of_zero_vector() {
        let (dir, len) = direction_and_length(Vec3::ZERO);
        assert_eq!(dir, Vec3::ZERO);
        assert_eq!(len, 0.0);
    }

    #[test]
    fn test_direction_is_unit() {
        let (dir, len) = direction_and_length(Vec3::new(3.0, 4.0, 0.0));
        assert!((len - 5.0).abs() < 1e-6);
        assert!((dir.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_mix_seed_streams_differ() {
        let a = mix_seed(7, 0);
        let b = mix_seed(7, 1);
        assert_ne!(a, b);
        assert_eq!(a, mix_seed(7, 0));
    }
}
