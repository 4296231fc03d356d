use crate::CheckoutError;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payment {
    pub method: String,
    pub amount: i64,
}

/// Splits a balance due across payment methods.
///
/// Each method appears at most once and the recorded payments never exceed
/// the total, so `paid() + remaining() == total()` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentPlan {
    total: i64,
    payments: Vec<Payment>,
}

impl PaymentPlan {
    pub fn new(total: i64) -> Self {
        Self {
            total: total.max(0),
            payments: Vec::new(),
        }
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn paid(&self) -> i64 {
        self.payments.iter().map(|p| p.amount).sum()
    }

    pub fn remaining(&self) -> i64 {
        self.total - self.paid()
    }

    pub fn is_settled(&self) -> bool {
        self.remaining() == 0
    }

    /// Records `amount` against `method`, adding to an existing entry for it.
    pub fn add(&mut self, method: impl Into<String>, amount: i64) -> Result<(), CheckoutError> {
        if amount <= 0 {
            return Err(CheckoutError::NonPositiveAmount);
        }
        let remaining = self.remaining();
        if amount > remaining {
            return Err(CheckoutError::Overpayment { amount, remaining });
        }
        let method = method.into();
        match self.payments.iter_mut().find(|p| p.method == method) {
            Some(existing) => existing.amount += amount,
            None => self.payments.push(Payment { method, amount }),
        }
        Ok(())
    }

    /// Puts whatever is still due on `method`. Returns the amount added.
    pub fn settle_with(&mut self, method: impl Into<String>) -> Result<i64, CheckoutError> {
        let remaining = self.remaining();
        if remaining > 0 {
            self.add(method, remaining)?;
        }
        Ok(remaining)
    }

    pub fn remove(&mut self, method: &str) -> Result<Payment, CheckoutError> {
        let idx = self
            .payments
            .iter()
            .position(|p| p.method == method)
            .ok_or_else(|| CheckoutError::UnknownMethod(method.to_string()))?;
        Ok(self.payments.remove(idx))
    }

    /// Replaces the amount for `method`; zero drops the entry.
    pub fn set_amount(&mut self, method: &str, amount: i64) -> Result<(), CheckoutError> {
        if amount < 0 {
            return Err(CheckoutError::NonPositiveAmount);
        }
        let idx = self
            .payments
            .iter()
            .position(|p| p.method == method)
            .ok_or_else(|| CheckoutError::UnknownMethod(method.to_string()))?;
        let available = self.remaining() + self.payments[idx].amount;
        if amount > available {
            return Err(CheckoutError::Overpayment {
                amount,
                remaining: available,
            });
        }
        if amount == 0 {
            self.payments.remove(idx);
        } else {
            self.payments[idx].amount = amount;
        }
        Ok(())
    }
}
