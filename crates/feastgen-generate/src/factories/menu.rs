use feastgen_core::MenuItem;
use rand::Rng;
use tracing::info;
use uuid::Uuid;

use super::{FactoryContext, pick};
use crate::catalog::{
    DISH_MODIFIERS, MENU_CATEGORIES, MENU_PRICE_RANGE, PLACEHOLDER_IMAGE_URL, PREP_TIMES_MINUTES,
    RICE_CUSTOMIZATION,
};
use crate::errors::GenerationError;
use crate::foreign::{LookupEntry, MenuLookup, ParentKeys};
use crate::rng::{random_uuid, round_hundred, round1};

/// Generate a menu for every vendor and the lookup set orders are drawn from.
pub fn generate_menu_items<R: Rng + ?Sized>(
    ctx: &mut FactoryContext<'_>,
    rng: &mut R,
    vendor_ids: &[Uuid],
) -> Result<(MenuLookup, Vec<MenuItem>), GenerationError> {
    ParentKeys::new("menu items", "vendor", vendor_ids)?;
    info!(vendors = vendor_ids.len(), "generating menu items");

    let bounds = ctx.options.menu_items_per_vendor;
    let mut lookup = MenuLookup::new();
    let mut items = Vec::new();

    for &vendor_id in vendor_ids {
        let count = rng.random_range(bounds.min..=bounds.max);
        for _ in 0..count {
            let (category, dishes) = *pick(MENU_CATEGORIES, rng);
            let mut name = pick(dishes, rng).to_string();
            if rng.random_bool(0.5) {
                name = format!("{} {name}", pick(DISH_MODIFIERS, rng));
            }

            let price = round_hundred(rng.random_range(MENU_PRICE_RANGE.0..=MENU_PRICE_RANGE.1));
            let customization = name
                .contains("Rice")
                .then(|| RICE_CUSTOMIZATION.to_string());

            let item = MenuItem {
                id: random_uuid(rng),
                vendor_id,
                description: format!("Delicious {name} prepared with fresh ingredients."),
                price,
                category: category.to_string(),
                customization,
                image_url: PLACEHOLDER_IMAGE_URL.to_string(),
                is_available: true,
                prep_time_minutes: *pick(PREP_TIMES_MINUTES, rng),
                rating: round1(rng.random_range(4.0..=5.0)),
                likes: rng.random_range(10..=500),
                created_at: ctx.anchor,
                updated_at: ctx.anchor,
                name,
            };
            lookup.push(LookupEntry {
                menu_item_id: item.id,
                vendor_id,
                price,
            });
            items.push(item);
        }
    }

    Ok((lookup, items))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::model::GenerateOptions;

    #[test]
    fn menus_respect_bounds_and_price_rounding() {
        let options = GenerateOptions::default();
        let anchor = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut ctx = FactoryContext::new(&options, anchor);
        let vendors: Vec<Uuid> = (0..15).map(|n| Uuid::from_bytes([n; 16])).collect();

        let (lookup, items) =
            generate_menu_items(&mut ctx, &mut ChaCha8Rng::seed_from_u64(21), &vendors)
                .expect("menu");

        assert!((75..=150).contains(&items.len()));
        assert_eq!(lookup.len(), items.len());
        assert_eq!(lookup.vendor_count(), 15);
        for vendor in &vendors {
            let menu = lookup.vendor_menu(vendor);
            assert!((5..=10).contains(&menu.len()));
        }
        for item in &items {
            assert_eq!(item.price % 100.0, 0.0);
            assert!((2500.0..=8000.0).contains(&item.price));
            assert!((4.0..=5.0).contains(&item.rating));
            assert!((10..=500).contains(&item.likes));
            assert_eq!(item.customization.is_some(), item.name.contains("Rice"));
        }
    }

    #[test]
    fn lookup_prices_match_items() {
        let options = GenerateOptions::default();
        let anchor = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut ctx = FactoryContext::new(&options, anchor);
        let vendors = vec![Uuid::from_bytes([1; 16])];

        let (lookup, items) =
            generate_menu_items(&mut ctx, &mut ChaCha8Rng::seed_from_u64(2), &vendors)
                .expect("menu");
        for (entry, item) in lookup.entries().iter().zip(&items) {
            assert_eq!(entry.menu_item_id, item.id);
            assert_eq!(entry.vendor_id, item.vendor_id);
            assert_eq!(entry.price, item.price);
        }
    }
}
