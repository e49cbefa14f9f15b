use chrono::NaiveDateTime;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Catalog product identifier, owned by the host
pub type ProductId = i64;

/// Fractional digits kept for stored prices (NUMERIC(10, 2))
pub const PRICE_SCALE: u32 = 2;

/// Integer digits left by NUMERIC(10, 2); prices must stay below 10^8
pub const PRICE_INTEGER_DIGITS: u32 = 8;

/// One recorded price point for a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PriceObservation {
    pub id: i64,
    pub product_id: ProductId,
    pub price: Decimal, // NUMERIC(10, 2) in database
    pub change_date: NaiveDateTime,
}

impl PriceObservation {
    /// Normalize a price to the stored scale, rejecting negatives and
    /// anything the NUMERIC(10, 2) column would overflow on
    pub fn normalize_price(price: Decimal) -> Result<Decimal, String> {
        if price.is_sign_negative() && !price.is_zero() {
            return Err(format!("Price must not be negative: {}", price));
        }
        // Postgres rounds NUMERIC half away from zero
        let mut rounded =
            price.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
        if rounded >= Decimal::from(10_i64.pow(PRICE_INTEGER_DIGITS)) {
            return Err(format!(
                "Price {} exceeds {} integer digits",
                price, PRICE_INTEGER_DIGITS
            ));
        }
        rounded.rescale(PRICE_SCALE);
        rounded.set_sign_positive(true);
        Ok(rounded)
    }
}
