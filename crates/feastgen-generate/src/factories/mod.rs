//! Entity factories. Each stage consumes the identifiers of the previous one.

mod menu;
mod orders;
mod users;
mod vendors;

pub use menu::generate_menu_items;
pub use orders::generate_orders;
pub use users::generate_users;
pub use vendors::generate_vendors;

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use feastgen_core::Role;
use rand::Rng;

use crate::errors::GenerationError;
use crate::faker::FakeRsAdapter;
use crate::model::GenerateOptions;
use crate::rng::random_uuid;

/// Shared state threaded through the factories of one run.
#[derive(Debug)]
pub struct FactoryContext<'a> {
    pub options: &'a GenerateOptions,
    pub anchor: DateTime<Utc>,
    pub faker: FakeRsAdapter,
    emails: HashSet<String>,
    email_retries: u64,
}

impl<'a> FactoryContext<'a> {
    pub fn new(options: &'a GenerateOptions, anchor: DateTime<Utc>) -> Self {
        Self {
            options,
            anchor,
            faker: FakeRsAdapter::new(options.locale),
            emails: HashSet::new(),
            email_retries: 0,
        }
    }

    pub fn email_retries(&self) -> u64 {
        self.email_retries
    }

    /// Mint an email not used by any other user of this run.
    ///
    /// Vendor owners get a random hex suffix on a fixed domain; everyone else
    /// gets a faker address.
    pub fn mint_email<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        role: Role,
    ) -> Result<String, GenerationError> {
        let attempts = self.options.max_attempts_unique;
        for _ in 0..attempts {
            let candidate = match role {
                Role::Vendor => {
                    let suffix = random_uuid(rng).simple().to_string();
                    format!("vendor_{}@example.com", &suffix[..6])
                }
                Role::Customer | Role::Courier => self.faker.email(rng),
            };
            if self.emails.insert(candidate.clone()) {
                return Ok(candidate);
            }
            self.email_retries += 1;
        }
        Err(GenerationError::UniqueExhausted {
            field: "email",
            attempts,
        })
    }
}

fn pick<'v, T, R: Rng + ?Sized>(values: &'v [T], rng: &mut R) -> &'v T {
    &values[rng.random_range(0..values.len())]
}
