//! Relationship binding between generation stages.
//!
//! Every foreign key is drawn from an identifier set produced by an earlier
//! stage, so referential integrity follows from stage ordering alone.

use std::collections::BTreeMap;

use rand::Rng;
use rand::seq::IndexedRandom;
use uuid::Uuid;

use crate::errors::GenerationError;
use crate::model::CountRange;

/// Identifiers of an already generated parent entity.
#[derive(Debug, Clone)]
pub struct ParentKeys<'a> {
    parent: &'static str,
    ids: &'a [Uuid],
}

impl<'a> ParentKeys<'a> {
    /// Bind a non-empty parent set. `stage` names the consumer for errors.
    pub fn new(
        stage: &'static str,
        parent: &'static str,
        ids: &'a [Uuid],
    ) -> Result<Self, GenerationError> {
        if ids.is_empty() {
            return Err(GenerationError::EmptyUpstream { stage, parent });
        }
        Ok(Self { parent, ids })
    }

    pub fn parent(&self) -> &'static str {
        self.parent
    }

    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Uuid {
        // non-empty by construction
        self.ids[rng.random_range(0..self.ids.len())]
    }
}

/// `(menu item id, vendor id, price)` captured at menu generation time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookupEntry {
    pub menu_item_id: Uuid,
    pub vendor_id: Uuid,
    pub price: f64,
}

/// Menu items available for ordering, indexed by vendor.
#[derive(Debug, Clone, Default)]
pub struct MenuLookup {
    entries: Vec<LookupEntry>,
    by_vendor: BTreeMap<Uuid, Vec<usize>>,
}

impl MenuLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: LookupEntry) {
        self.by_vendor
            .entry(entry.vendor_id)
            .or_default()
            .push(self.entries.len());
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[LookupEntry] {
        &self.entries
    }

    pub fn vendor_count(&self) -> usize {
        self.by_vendor.len()
    }

    pub fn vendor_menu(&self, vendor_id: &Uuid) -> Vec<LookupEntry> {
        self.by_vendor
            .get(vendor_id)
            .map(|indexes| indexes.iter().map(|&idx| self.entries[idx]).collect())
            .unwrap_or_default()
    }

    /// Pick a vendor by drawing a random menu entry, then draw a basket of
    /// distinct items from that vendor's menu only.
    pub fn pick_basket<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        size: CountRange,
    ) -> Result<(Uuid, Vec<LookupEntry>), GenerationError> {
        let first = self
            .entries
            .choose(rng)
            .ok_or(GenerationError::EmptyUpstream {
                stage: "orders",
                parent: "menu item",
            })?;
        let menu = self.vendor_menu(&first.vendor_id);
        let wanted = rng.random_range(size.min..=size.max) as usize;
        let basket = menu
            .choose_multiple(rng, wanted.min(menu.len()))
            .copied()
            .collect();
        Ok((first.vendor_id, basket))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn id(byte: u8) -> Uuid {
        Uuid::from_bytes([byte; 16])
    }

    #[test]
    fn empty_parent_set_is_rejected() {
        let err = ParentKeys::new("vendors", "vendor owner", &[]).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::EmptyUpstream {
                stage: "vendors",
                parent: "vendor owner"
            }
        ));
    }

    #[test]
    fn baskets_never_cross_vendors() {
        let mut lookup = MenuLookup::new();
        for n in 0..6 {
            lookup.push(LookupEntry {
                menu_item_id: id(10 + n),
                vendor_id: id(1),
                price: 1000.0,
            });
            lookup.push(LookupEntry {
                menu_item_id: id(40 + n),
                vendor_id: id(2),
                price: 2000.0,
            });
        }

        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..100 {
            let (vendor, basket) = lookup
                .pick_basket(&mut rng, CountRange::new(1, 3))
                .expect("basket");
            assert!((1..=3).contains(&basket.len()));
            assert!(basket.iter().all(|entry| entry.vendor_id == vendor));
            let mut ids: Vec<Uuid> = basket.iter().map(|entry| entry.menu_item_id).collect();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), basket.len(), "items drawn without replacement");
        }
    }

    #[test]
    fn basket_is_clamped_to_menu_size() {
        let mut lookup = MenuLookup::new();
        lookup.push(LookupEntry {
            menu_item_id: id(9),
            vendor_id: id(1),
            price: 500.0,
        });
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let (_, basket) = lookup
            .pick_basket(&mut rng, CountRange::new(3, 3))
            .expect("basket");
        assert_eq!(basket.len(), 1);
    }

    #[test]
    fn empty_lookup_cannot_produce_a_basket() {
        let lookup = MenuLookup::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(lookup.pick_basket(&mut rng, CountRange::new(1, 3)).is_err());
    }
}
