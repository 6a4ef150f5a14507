//! Numeric conversion helpers used across the project.
//!
//! Tick counts are integers while cadences and distances are derived from
//! floating-point health ratios and lengths. These helpers make the float to
//! tick conversions explicit and saturating.

/// Floors `value` into the `u32` domain, saturating at both ends.
///
/// Non-finite inputs map to zero.
///
/// # Examples
/// ```
/// use talon::numeric::floor_to_u32;
/// assert_eq!(floor_to_u32(299.99), 299);
/// assert_eq!(floor_to_u32(-4.0), 0);
/// assert_eq!(floor_to_u32(f64::NAN), 0);
/// ```
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "The value is floored and clamped to the u32 domain before casting."
)]
#[must_use]
pub fn floor_to_u32(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    value.floor().clamp(0.0, f64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 0)]
    #[case(60.0, 60)]
    #[case(180.7, 180)]
    #[case(1e12, u32::MAX)]
    #[case(f64::INFINITY, 0)]
    fn floors_and_saturates(#[case] input: f64, #[case] expected: u32) {
        assert_eq!(floor_to_u32(input), expected);
    }
}
