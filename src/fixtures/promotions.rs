//! Promotion Fixtures

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{
    fixtures::{FixtureError, prices::parse_percentage},
    promotions::PromoEngine,
};

/// Wrapper for promo codes in YAML
#[derive(Debug, Deserialize)]
pub struct PromotionsFixture {
    /// Map of promo code -> rate (e.g., "10%")
    pub promotions: FxHashMap<String, String>,
}

impl TryFrom<PromotionsFixture> for PromoEngine {
    type Error = FixtureError;

    fn try_from(fixture: PromotionsFixture) -> Result<Self, Self::Error> {
        let rules = fixture
            .promotions
            .into_iter()
            .map(|(code, rate)| Ok((code, parse_percentage(&rate)?)))
            .collect::<Result<Vec<_>, FixtureError>>()?;

        Ok(PromoEngine::try_with_rules(rules)?)
    }
}
