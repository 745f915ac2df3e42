//! ADC counts → g → mm/s² → mm/s

/// Full-scale count of the 12-bit accelerometer ADC.
pub const ADC_RESOLUTION: f64 = 4096.0;

/// Standard gravity (m/s²)
pub const STANDARD_GRAVITY: f64 = 9.806_65;

/// Convert one ADC count to acceleration in g.
pub fn to_acceleration_g(adc: i32, g_scale: f64) -> f64 {
    (f64::from(adc) / ADC_RESOLUTION) * g_scale
}

/// Convert a whole axis buffer to g.
pub fn counts_to_g(counts: &[i32], g_scale: f64) -> Vec<f64> {
    counts
        .iter()
        .map(|&adc| to_acceleration_g(adc, g_scale))
        .collect()
}

/// Acceleration in g to mm/s².
pub fn g_to_si(g: f64) -> f64 {
    g * STANDARD_GRAVITY * 1000.0
}

/// Running Euler integration: `v[i] = v[i-1] + a[i] * dt`, with `v[-1] = 0`.
pub fn integrate_to_velocity(accel: &[f64], dt: f64) -> Vec<f64> {
    accel
        .iter()
        .scan(0.0_f64, |v, &a| {
            *v += a * dt;
            Some(*v)
        })
        .collect()
}
