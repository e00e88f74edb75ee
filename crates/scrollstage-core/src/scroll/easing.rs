//! L4 Atomic Layer: Pure easing functions
//!
//! Maps input [0, 1] to output [0, 1] with various acceleration curves.
//! `smoothstep` is the reshaping applied before every staged interpolation.

pub use crate::config::EasingType;

/// Extension trait for EasingType with calculation methods
pub trait EasingTypeExt {
    /// Apply the easing function to a progress value
    ///
    /// # Arguments
    /// * `t` - Progress value in range [0, 1]
    ///
    /// # Returns
    /// Eased value in range [0, 1]
    fn apply(&self, t: f64) -> f64;
}

impl EasingTypeExt for EasingType {
    #[inline]
    fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingType::None => {
                if t < 1.0 {
                    0.0
                } else {
                    1.0
                }
            }
            EasingType::Linear => t,
            EasingType::Quadratic => power_ease_out(t, 2),
            EasingType::Cubic => power_ease_out(t, 3),
            EasingType::Quartic => power_ease_out(t, 4),
            EasingType::Quintic => power_ease_out(t, 5),
            EasingType::EaseOut => exponential_ease_out(t),
            EasingType::Smoothstep => smoothstep(t),
        }
    }
}

/// Hermite smoothstep: f(p) = p²(3 - 2p)
///
/// Zero first derivative at both ends, so a segment eased with it
/// starts and stops without a velocity jump.
#[inline]
pub fn smoothstep(p: f64) -> f64 {
    let p = p.clamp(0.0, 1.0);
    p * p * (3.0 - 2.0 * p)
}

/// Power ease-out: f(t) = 1 - (1-t)ⁿ
#[inline]
fn power_ease_out(t: f64, n: i32) -> f64 {
    (1.0 - (1.0 - t).powi(n)).min(1.0)
}

/// Exponential ease-out: f(t) = 1 - 2^(-10t)
#[inline]
fn exponential_ease_out(t: f64) -> f64 {
    if t >= 1.0 {
        1.0
    } else {
        1.0 - 2.0_f64.powf(-10.0 * t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [EasingType; 8] = [
        EasingType::None,
        EasingType::Linear,
        EasingType::Quadratic,
        EasingType::Cubic,
        EasingType::Quartic,
        EasingType::Quintic,
        EasingType::EaseOut,
        EasingType::Smoothstep,
    ];

    #[test]
    fn test_easing_boundaries() {
        for easing in ALL {
            if easing != EasingType::None {
                assert!((easing.apply(0.0) - 0.0).abs() < 0.001, "{:?} at t=0", easing);
            }
            assert!((easing.apply(1.0) - 1.0).abs() < 0.001, "{:?} at t=1", easing);
        }
    }

    #[test]
    fn test_none_is_a_step_at_the_end() {
        assert_eq!(EasingType::None.apply(0.0), 0.0);
        assert_eq!(EasingType::None.apply(0.999), 0.0);
        assert_eq!(EasingType::None.apply(1.0), 1.0);
    }

    #[test]
    fn test_easing_monotonic() {
        for easing in ALL.into_iter().filter(|e| *e != EasingType::None) {
            let mut prev = 0.0;
            for i in 0..=100 {
                let t = i as f64 / 100.0;
                let v = easing.apply(t);
                assert!(v >= prev, "{:?} not monotonic at t={}", easing, t);
                prev = v;
            }
        }
    }

    #[test]
    fn test_quartic_matches_formula() {
        let t: f64 = 0.3;
        let expected = 1.0 - (1.0 - t).powi(4);
        assert!((EasingType::Quartic.apply(t) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_smoothstep_properties() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
        assert_eq!(smoothstep(0.5), 0.5);

        let mut prev = 0.0;
        for i in 0..=1000 {
            let p = i as f64 / 1000.0;
            let v = smoothstep(p);
            assert!((0.0..=1.0).contains(&v));
            assert!(v >= prev, "smoothstep not monotonic at {}", p);
            prev = v;
        }
    }

    #[test]
    fn test_smoothstep_flat_at_ends() {
        let h = 1e-6;
        assert!(smoothstep(h) / h < 1e-4);
        assert!((1.0 - smoothstep(1.0 - h)) / h < 1e-4);
    }
}
