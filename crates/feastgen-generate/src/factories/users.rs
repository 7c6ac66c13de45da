use feastgen_core::{Role, User};
use rand::Rng;
use tracing::info;
use uuid::Uuid;

use super::FactoryContext;
use crate::catalog::PLACEHOLDER_PASSWORD;
use crate::errors::GenerationError;
use crate::faker::msisdn;
use crate::rng::{jitter, random_uuid};

/// Generate `count` users of one role. Only couriers get a position.
pub fn generate_users<R: Rng + ?Sized>(
    ctx: &mut FactoryContext<'_>,
    rng: &mut R,
    role: Role,
    count: u32,
) -> Result<(Vec<Uuid>, Vec<User>), GenerationError> {
    info!(role = %role, count, "generating users");

    let mut users = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let id = random_uuid(rng);
        let email = ctx.mint_email(rng, role)?;
        let phone = msisdn(rng);
        let full_name = ctx.faker.full_name(rng);

        let position = match role {
            Role::Courier => Some(jitter(
                rng,
                ctx.options.reference_point,
                ctx.options.jitter_degrees,
            )),
            Role::Customer | Role::Vendor => None,
        };

        users.push(User {
            id,
            email,
            phone,
            password: PLACEHOLDER_PASSWORD.to_string(),
            full_name,
            role,
            created_at: ctx.anchor,
            updated_at: ctx.anchor,
            current_lat: position.map(|point| point.lat),
            current_lng: position.map(|point| point.lng),
            cash_balance: 0.0,
        });
    }

    let ids = users.iter().map(|user| user.id).collect();
    Ok((ids, users))
}
