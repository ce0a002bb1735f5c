pub fn sigmoid(z: f64) -> f64 {
    1. / (1. + (-z).exp())
}

/// `ln(1 + e^z)` without overflow.
pub fn softplus(z: f64) -> f64 {
    z.max(0.) + (-z.abs()).exp().ln_1p()
}
