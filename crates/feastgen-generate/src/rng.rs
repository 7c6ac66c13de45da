use chrono::{DateTime, Utc};
use feastgen_core::GeoPoint;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

/// Derive a stage seed from the run seed and a stage key.
pub fn hash_seed(seed: u64, key: &str) -> u64 {
    let mut hash = seed ^ 0xcbf29ce484222325;
    for byte in key.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

/// Independent RNG for one generation stage.
pub fn stage_rng(seed: u64, stage: &str) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(hash_seed(seed, stage))
}

/// Draw a fresh run seed from OS entropy.
pub fn fresh_seed() -> u64 {
    rand::rng().next_u64()
}

/// Version 4 UUID drawn from the supplied RNG.
pub fn random_uuid<R: RngCore + ?Sized>(rng: &mut R) -> Uuid {
    let mut bytes = [0_u8; 16];
    rng.fill_bytes(&mut bytes);
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;
    Uuid::from_bytes(bytes)
}

/// Point drawn uniformly from the square of half-width `radius` around `center`.
pub fn jitter<R: Rng + ?Sized>(rng: &mut R, center: GeoPoint, radius: f64) -> GeoPoint {
    if radius == 0.0 {
        return center;
    }
    GeoPoint::new(
        center.lat + rng.random_range(-radius..=radius),
        center.lng + rng.random_range(-radius..=radius),
    )
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to the nearest multiple of 100.
pub fn round_hundred(value: f64) -> f64 {
    (value / 100.0).round() * 100.0
}

/// Millisecond-truncated timestamp, so values survive a store round trip.
pub fn truncate_millis(at: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(at.timestamp_millis()).unwrap_or(at)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_seeds_differ_per_key() {
        assert_ne!(hash_seed(42, "users.CUSTOMER"), hash_seed(42, "users.COURIER"));
        assert_eq!(hash_seed(42, "orders"), hash_seed(42, "orders"));
    }

    #[test]
    fn uuid_has_v4_layout() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let id = random_uuid(&mut rng);
        assert_eq!(id.get_version_num(), 4);
        assert_eq!(id.get_variant(), uuid::Variant::RFC4122);
    }

    #[test]
    fn jitter_stays_within_radius() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let center = GeoPoint::new(6.5244, 3.3792);
        for _ in 0..200 {
            let point = jitter(&mut rng, center, 0.05);
            assert!((point.lat - center.lat).abs() <= 0.05 + 1e-12);
            assert!((point.lng - center.lng).abs() <= 0.05 + 1e-12);
        }
    }

    #[test]
    fn rounding_helpers() {
        assert_eq!(round_hundred(2549.0), 2500.0);
        assert_eq!(round_hundred(2550.0), 2600.0);
        assert_eq!(round1(4.26), 4.3);
    }
}
