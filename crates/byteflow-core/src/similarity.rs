use crate::fingerprint::Fingerprint;

/// Binary cosine similarity over the common prefix of `a` and `b`.
///
/// Both vectors are truncated to the shorter length; scores are therefore not
/// normalized across inputs of different sizes. An empty overlap or an
/// all-zero side yields `0.0`. Identical non-zero prefixes yield exactly `1.0`.
pub fn score(a: &Fingerprint, b: &Fingerprint) -> f64 {
    let len = a.len().min(b.len());
    if len == 0 {
        return 0.0;
    }

    let (mut dot, mut mag_a, mut mag_b) = (0u64, 0u64, 0u64);
    for (&x, &y) in a.as_slice()[..len].iter().zip(&b.as_slice()[..len]) {
        dot += u64::from(x & y);
        mag_a += u64::from(x);
        mag_b += u64::from(y);
    }

    if mag_a == 0 || mag_b == 0 {
        return 0.0;
    }

    // sqrt(mag_a * mag_b) rather than sqrt(mag_a) * sqrt(mag_b): the product of
    // two roundings would miss 1.0 for identical vectors.
    let denom = ((mag_a as f64) * (mag_b as f64)).sqrt();
    (dot as f64 / denom).min(1.0)
}
