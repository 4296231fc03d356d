use crate::{CheckoutError, FULL_BPS, apply_bps};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub sku: String,
    pub name: String,
    pub unit_price: i64,
    pub quantity: i64,
}

impl LineItem {
    pub fn new(sku: impl Into<String>, name: impl Into<String>, unit_price: i64, quantity: i64) -> Self {
        Self {
            sku: sku.into(),
            name: name.into(),
            unit_price,
            quantity,
        }
    }

    pub fn line_total(&self) -> Result<i64, CheckoutError> {
        if self.quantity < 0 {
            return Err(CheckoutError::NegativeQuantity {
                sku: self.sku.clone(),
            });
        }
        if self.unit_price < 0 {
            return Err(CheckoutError::NegativePrice {
                sku: self.sku.clone(),
            });
        }
        self.unit_price
            .checked_mul(self.quantity)
            .ok_or(CheckoutError::Overflow)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Discount {
    /// Basis points of the subtotal; 1000 = 10%.
    Percent(i64),
    /// Fixed amount in minor units.
    Nominal(i64),
}

impl Discount {
    /// The amount taken off `subtotal`, never more than the subtotal itself.
    pub fn amount(&self, subtotal: i64) -> Result<i64, CheckoutError> {
        let raw = match *self {
            Discount::Percent(bps) if (0..=FULL_BPS).contains(&bps) => apply_bps(subtotal, bps)?,
            Discount::Nominal(amount) if amount >= 0 => amount,
            _ => return Err(CheckoutError::InvalidDiscount),
        };
        Ok(raw.min(subtotal))
    }
}

/// One point per `spend_per_point` minor units of the final total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoyaltyRule {
    pub spend_per_point: i64,
}

impl LoyaltyRule {
    pub fn points_for(&self, total: i64) -> Result<i64, CheckoutError> {
        if self.spend_per_point <= 0 {
            return Err(CheckoutError::InvalidLoyaltyRule);
        }
        Ok(total / self.spend_per_point)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<Discount>,
    #[serde(default)]
    pub tax_rate_bps: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loyalty: Option<LoyaltyRule>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CartTotals {
    pub subtotal: i64,
    pub discount: i64,
    pub taxable: i64,
    pub tax: i64,
    pub total: i64,
    pub loyalty_points: i64,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges into an existing line with the same sku and price.
    pub fn add_item(&mut self, item: LineItem) -> Result<(), CheckoutError> {
        match self.items.iter_mut().find(|existing| {
            existing.sku == item.sku && existing.unit_price == item.unit_price
        }) {
            Some(existing) => {
                existing.quantity = existing
                    .quantity
                    .checked_add(item.quantity)
                    .ok_or(CheckoutError::Overflow)?;
            }
            None => self.items.push(item),
        }
        Ok(())
    }

    pub fn remove_item(&mut self, sku: &str) -> Option<LineItem> {
        let idx = self.items.iter().position(|item| item.sku == sku)?;
        Some(self.items.remove(idx))
    }

    /// Discount comes off first, tax is charged on what is left.
    pub fn totals(&self) -> Result<CartTotals, CheckoutError> {
        if self.tax_rate_bps < 0 {
            return Err(CheckoutError::InvalidTaxRate);
        }
        let mut subtotal: i64 = 0;
        for item in &self.items {
            subtotal = subtotal
                .checked_add(item.line_total()?)
                .ok_or(CheckoutError::Overflow)?;
        }
        let discount = match &self.discount {
            Some(discount) => discount.amount(subtotal)?,
            None => 0,
        };
        let taxable = subtotal - discount;
        let tax = apply_bps(taxable, self.tax_rate_bps)?;
        let total = taxable.checked_add(tax).ok_or(CheckoutError::Overflow)?;
        let loyalty_points = match &self.loyalty {
            Some(rule) => rule.points_for(total)?,
            None => 0,
        };
        tracing::debug!(subtotal, discount, tax, total, "cart totals computed");
        Ok(CartTotals {
            subtotal,
            discount,
            taxable,
            tax,
            total,
            loyalty_points,
        })
    }
}
