use pos_checkout::{Cart, CheckoutError, Discount, LineItem, LoyaltyRule, PaymentPlan};

fn sample_cart() -> Cart {
    let mut cart = Cart::new();
    cart.add_item(LineItem::new("MEM-1M", "Monthly membership", 4_999, 1)).unwrap();
    cart.add_item(LineItem::new("WATER", "Water bottle", 250, 2)).unwrap();
    cart.tax_rate_bps = 825;
    cart
}

#[test]
fn totals_apply_discount_before_tax() {
    let mut cart = sample_cart();
    cart.discount = Some(Discount::Percent(1_000));
    cart.loyalty = Some(LoyaltyRule {
        spend_per_point: 100,
    });

    let totals = cart.totals().unwrap();
    assert_eq!(totals.subtotal, 5_499);
    assert_eq!(totals.discount, 550);
    assert_eq!(totals.taxable, 4_949);
    // 4949 * 8.25% = 408.29
    assert_eq!(totals.tax, 408);
    assert_eq!(totals.total, 5_357);
    assert_eq!(totals.loyalty_points, 53);
}

#[test]
fn nominal_discount_is_capped_at_subtotal() {
    let mut cart = sample_cart();
    cart.discount = Some(Discount::Nominal(10_000));
    let totals = cart.totals().unwrap();
    assert_eq!(totals.discount, totals.subtotal);
    assert_eq!(totals.total, 0);
}

#[test]
fn same_item_is_merged() {
    let mut cart = sample_cart();
    cart.add_item(LineItem::new("WATER", "Water bottle", 250, 1)).unwrap();
    assert_eq!(cart.items.len(), 2);
    assert_eq!(cart.items[1].quantity, 3);
    assert!(cart.remove_item("WATER").is_some());
    assert!(cart.remove_item("WATER").is_none());
}

#[test]
fn invalid_carts_are_rejected() {
    let mut cart = sample_cart();
    cart.add_item(LineItem::new("BAD", "Refund", 100, -1)).unwrap();
    assert_eq!(
        cart.totals(),
        Err(CheckoutError::NegativeQuantity { sku: "BAD".into() })
    );

    let mut cart = sample_cart();
    cart.discount = Some(Discount::Percent(12_000));
    assert_eq!(cart.totals(), Err(CheckoutError::InvalidDiscount));
}

#[test]
fn oversized_amounts_report_overflow() {
    let mut cart = Cart::new();
    cart.add_item(LineItem::new("PASS", "Day pass", 1, i64::MAX)).unwrap();
    assert_eq!(
        cart.add_item(LineItem::new("PASS", "Day pass", 1, 1)),
        Err(CheckoutError::Overflow)
    );
    assert_eq!(cart.items[0].quantity, i64::MAX);

    let mut cart = Cart::new();
    cart.add_item(LineItem::new("GOLD", "Lifetime membership", i64::MAX, 1)).unwrap();
    cart.tax_rate_bps = 1;
    assert_eq!(cart.totals(), Err(CheckoutError::Overflow));
}

#[test]
fn payments_merge_and_never_exceed_total() {
    let mut plan = PaymentPlan::new(5_357);
    plan.add("card", 2_000).unwrap();
    plan.add("cash", 1_000).unwrap();
    plan.add("card", 357).unwrap();
    assert_eq!(plan.payments().len(), 2);
    assert_eq!(plan.payments()[0].amount, 2_357);
    assert_eq!(plan.paid() + plan.remaining(), plan.total());

    assert_eq!(
        plan.add("voucher", 5_000),
        Err(CheckoutError::Overpayment {
            amount: 5_000,
            remaining: 2_000,
        })
    );
    assert_eq!(plan.settle_with("voucher"), Ok(2_000));
    assert!(plan.is_settled());
}

#[test]
fn payments_can_be_edited_and_removed() {
    let mut plan = PaymentPlan::new(1_000);
    plan.add("card", 600).unwrap();
    plan.add("cash", 400).unwrap();

    assert!(matches!(
        plan.set_amount("card", 700),
        Err(CheckoutError::Overpayment { .. })
    ));
    plan.set_amount("card", 100).unwrap();
    assert_eq!(plan.remaining(), 500);

    let removed = plan.remove("cash").unwrap();
    assert_eq!(removed.amount, 400);
    assert_eq!(plan.remaining(), 900);
    assert_eq!(
        plan.remove("cash"),
        Err(CheckoutError::UnknownMethod("cash".into()))
    );

    plan.set_amount("card", 0).unwrap();
    assert!(plan.payments().is_empty());
    assert_eq!(plan.add("card", 0), Err(CheckoutError::NonPositiveAmount));
}

#[test]
fn discount_round_trips_as_tagged_json() {
    let json = serde_json::to_string(&Discount::Percent(1_500)).unwrap();
    assert_eq!(json, r#"{"type":"percent","value":1500}"#);
}
