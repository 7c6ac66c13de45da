use feastgen_core::{VendorProfile, VendorStatus};
use rand::Rng;
use tracing::info;
use uuid::Uuid;

use super::{FactoryContext, pick};
use crate::catalog::{LAGOS_AREAS, LAGOS_SIDES, VENDOR_SUFFIXES};
use crate::errors::GenerationError;
use crate::foreign::ParentKeys;
use crate::rng::{random_uuid, round1};

/// Approval draw weighted 3:1 toward approved.
const STATUS_DRAW: [VendorStatus; 4] = [
    VendorStatus::Pending,
    VendorStatus::Approved,
    VendorStatus::Approved,
    VendorStatus::Approved,
];

/// One vendor profile per owner id, in owner order.
pub fn generate_vendors<R: Rng + ?Sized>(
    ctx: &mut FactoryContext<'_>,
    rng: &mut R,
    owner_ids: &[Uuid],
) -> Result<Vec<VendorProfile>, GenerationError> {
    let owners = ParentKeys::new("vendors", "vendor owner", owner_ids)?;
    info!(owners = owner_ids.len(), parent = owners.parent(), "generating vendor profiles");

    let mut vendors = Vec::with_capacity(owner_ids.len());
    for &owner_id in owner_ids {
        let suffix = *pick(VENDOR_SUFFIXES, rng);
        let mut name = format!("{}'s {suffix}", ctx.faker.first_name(rng));
        if rng.random_bool(0.3) {
            name = format!("Lagos {} {}", pick(LAGOS_SIDES, rng), pick(VENDOR_SUFFIXES, rng));
        }
        let category = if name.contains("Kitchen") {
            "African"
        } else {
            "Continental"
        };

        vendors.push(VendorProfile {
            id: random_uuid(rng),
            user_id: owner_id,
            location: pick(LAGOS_AREAS, rng).to_string(),
            address: ctx.faker.address(rng),
            status: *pick(&STATUS_DRAW, rng),
            rating: round1(rng.random_range(3.5..=5.0)),
            category: category.to_string(),
            is_open: true,
            created_at: ctx.anchor,
            updated_at: ctx.anchor,
            name,
        });
    }

    Ok(vendors)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::model::GenerateOptions;

    #[test]
    fn one_profile_per_owner() {
        let options = GenerateOptions::default();
        let anchor = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut ctx = FactoryContext::new(&options, anchor);
        let owners: Vec<Uuid> = (0..15).map(|n| Uuid::from_bytes([n; 16])).collect();

        let vendors =
            generate_vendors(&mut ctx, &mut ChaCha8Rng::seed_from_u64(3), &owners).expect("vendors");

        assert_eq!(vendors.len(), 15);
        for (vendor, owner) in vendors.iter().zip(&owners) {
            assert_eq!(vendor.user_id, *owner);
            assert!((3.5..=5.0).contains(&vendor.rating));
            let expected = if vendor.name.contains("Kitchen") {
                "African"
            } else {
                "Continental"
            };
            assert_eq!(vendor.category, expected);
        }
    }

    #[test]
    fn no_owners_is_a_precondition_failure() {
        let options = GenerateOptions::default();
        let anchor = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut ctx = FactoryContext::new(&options, anchor);
        let result = generate_vendors(&mut ctx, &mut ChaCha8Rng::seed_from_u64(3), &[]);
        assert!(matches!(result, Err(GenerationError::EmptyUpstream { .. })));
    }
}
