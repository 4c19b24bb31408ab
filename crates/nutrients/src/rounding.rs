/// Round to `decimals` places, half away from zero.
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Storage precision for every canonical value.
#[must_use]
pub fn round3(value: f64) -> f64 {
    round_to(value, 3)
}
