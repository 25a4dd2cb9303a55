use crate::space::Domain;

/// Generate a random `f64` in the range `[low, high)`.
#[inline]
pub(crate) fn f64_range(rng: &mut fastrand::Rng, low: f64, high: f64) -> f64 {
    low + rng.f64() * (high - low)
}

/// Combine a base seed, trial id, and domain fingerprint into a
/// deterministic per-call seed using `MurmurHash3`'s 64-bit finalizer.
#[inline]
pub(crate) fn mix_seed(base: u64, trial_id: u64, domain_fingerprint: u64) -> u64 {
    let mut h = base
        .wrapping_mul(0xff51_afd7_ed55_8ccd)
        .wrapping_add(trial_id)
        .wrapping_mul(0xc4ce_b9fe_1a85_ec53)
        .wrapping_add(domain_fingerprint);
    h ^= h >> 33;
    h = h.wrapping_mul(0xff51_afd7_ed55_8ccd);
    h ^= h >> 33;
    h = h.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    h ^= h >> 33;
    h
}

/// Stable `u64` fingerprint for a [`Domain`], using variant tags and
/// `f64::to_bits()` for float fields so that distinct domains within the
/// same trial produce different RNG streams.
pub(crate) fn domain_fingerprint(domain: &Domain) -> u64 {
    match domain {
        Domain::Uniform { low, high } => {
            let mut h: u64 = 1;
            h = h.wrapping_mul(31).wrapping_add(low.to_bits());
            h = h.wrapping_mul(31).wrapping_add(high.to_bits());
            h
        }
        Domain::QuantizedUniform { low, high, step } => {
            let mut h: u64 = 2;
            h = h.wrapping_mul(31).wrapping_add(low.to_bits());
            h = h.wrapping_mul(31).wrapping_add(high.to_bits());
            h = h.wrapping_mul(31).wrapping_add(step.to_bits());
            h
        }
        Domain::Categorical { choices } => {
            let mut h: u64 = 3;
            h = h.wrapping_mul(31).wrapping_add(choices.len() as u64);
            for c in choices {
                h = h.wrapping_mul(31).wrapping_add(c.to_bits());
            }
            h
        }
    }
}
