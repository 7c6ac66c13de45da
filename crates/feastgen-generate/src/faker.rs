//! Locale-aware adapter over the `fake` crate.

use std::fmt;

use fake::Fake;
use fake::faker::address::raw::{BuildingNumber, CityName, StreetName};
use fake::faker::internet::raw::SafeEmail;
use fake::faker::name::raw::{FirstName, Name};
use fake::locales::{EN, PT_BR};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocaleKey {
    #[default]
    #[serde(rename = "en_US")]
    EnUs,
    #[serde(rename = "pt_BR")]
    PtBr,
}

impl LocaleKey {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "en_US" => Some(Self::EnUs),
            "pt_BR" => Some(Self::PtBr),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::EnUs => "en_US",
            Self::PtBr => "pt_BR",
        }
    }
}

impl fmt::Display for LocaleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Faker bound to one locale.
#[derive(Clone, Copy, Debug)]
pub struct FakeRsAdapter {
    locale: LocaleKey,
}

impl FakeRsAdapter {
    pub fn new(locale: LocaleKey) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> LocaleKey {
        self.locale
    }

    pub fn full_name<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        match self.locale {
            LocaleKey::EnUs => Name(EN).fake_with_rng(rng),
            LocaleKey::PtBr => Name(PT_BR).fake_with_rng(rng),
        }
    }

    pub fn first_name<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        match self.locale {
            LocaleKey::EnUs => FirstName(EN).fake_with_rng(rng),
            LocaleKey::PtBr => FirstName(PT_BR).fake_with_rng(rng),
        }
    }

    pub fn email<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        match self.locale {
            LocaleKey::EnUs => SafeEmail(EN).fake_with_rng(rng),
            LocaleKey::PtBr => SafeEmail(PT_BR).fake_with_rng(rng),
        }
    }

    /// Single-line street address: `<number> <street>, <city>`.
    pub fn address<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let (number, street, city): (String, String, String) = match self.locale {
            LocaleKey::EnUs => (
                BuildingNumber(EN).fake_with_rng(rng),
                StreetName(EN).fake_with_rng(rng),
                CityName(EN).fake_with_rng(rng),
            ),
            LocaleKey::PtBr => (
                BuildingNumber(PT_BR).fake_with_rng(rng),
                StreetName(PT_BR).fake_with_rng(rng),
                CityName(PT_BR).fake_with_rng(rng),
            ),
        };
        format!("{number} {street}, {city}")
    }
}

/// Nigerian mobile number in international form, e.g. `+2348031234567`.
pub fn msisdn<R: Rng + ?Sized>(rng: &mut R) -> String {
    let prefix = rng.random_range(7..=9);
    let network = rng.random_range(0..=1);
    let subscriber: u32 = rng.random_range(0..100_000_000);
    format!("+234{prefix}{network}{subscriber:08}")
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn locale_keys_parse_and_print() {
        for key in [LocaleKey::EnUs, LocaleKey::PtBr] {
            assert_eq!(LocaleKey::parse(key.as_str()), Some(key));
        }
        assert_eq!(LocaleKey::parse("en_NG"), None);
    }

    #[test]
    fn msisdn_has_country_code_and_ten_digits() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..50 {
            let phone = msisdn(&mut rng);
            let digits = phone.strip_prefix("+234").expect("country code");
            assert_eq!(digits.len(), 10, "{phone}");
            assert!(digits.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn same_seed_same_fake_values() {
        let faker = FakeRsAdapter::new(LocaleKey::EnUs);
        let mut a = ChaCha8Rng::seed_from_u64(11);
        let mut b = ChaCha8Rng::seed_from_u64(11);
        assert_eq!(faker.full_name(&mut a), faker.full_name(&mut b));
        assert_eq!(faker.address(&mut a), faker.address(&mut b));
    }
}
