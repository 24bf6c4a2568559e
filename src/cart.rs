//! Client-held view of a shopper's cart.
//!
//! A cart is either empty or holds lines from exactly one vendor branch. The
//! vendor is tracked explicitly: it is set by the first add and dropped again
//! whenever the cart empties. Totals are never stored; they are recomputed from
//! the lines and the active coupon on every read.

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{BranchId, CartLine, Coupon, FoodId, Money},
};

/// An item the shopper wants to put in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartLine {
    pub food_id: FoodId,
    pub branch_id: BranchId,
    pub name: String,
    pub unit_price: Money,
    pub quantity: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct CartTotals {
    #[schema(value_type = f64)]
    pub subtotal: Money,
    #[schema(value_type = f64)]
    pub discount_amount: Money,
    #[schema(value_type = f64)]
    pub total: Money,
}

#[derive(Debug, Clone, Default)]
pub struct Cart {
    vendor: Option<BranchId>,
    lines: Vec<CartLine>,
    coupon: Option<Coupon>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vendor(&self) -> Option<BranchId> {
        self.vendor
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn coupon(&self) -> Option<&Coupon> {
        self.coupon.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Fails without touching the cart when `branch_id` is not the cart's vendor.
    pub fn check_vendor(&self, food_id: FoodId, branch_id: BranchId) -> AppResult<()> {
        match self.vendor {
            Some(current) if current != branch_id => Err(AppError::VendorConflict {
                food_id,
                attempted_branch: branch_id,
                current_branch: current,
            }),
            _ => Ok(()),
        }
    }

    /// Checks an add without applying it and returns the line's resulting
    /// quantity.
    pub fn check_add(&self, food_id: FoodId, branch_id: BranchId, quantity: i32) -> AppResult<i32> {
        if quantity < 1 {
            return Err(AppError::InvalidQuantity(quantity));
        }
        self.check_vendor(food_id, branch_id)?;

        match self.lines.iter().find(|l| l.food_id == food_id) {
            Some(line) => line
                .quantity
                .checked_add(quantity)
                .ok_or(AppError::InvalidQuantity(quantity)),
            None => Ok(quantity),
        }
    }

    pub fn add_item(&mut self, item: NewCartLine) -> AppResult<&CartLine> {
        let merged = self.check_add(item.food_id, item.branch_id, item.quantity)?;

        let index = match self.lines.iter().position(|l| l.food_id == item.food_id) {
            Some(index) => {
                self.lines[index].quantity = merged;
                index
            }
            None => {
                self.lines.push(CartLine {
                    food_id: item.food_id,
                    branch_id: item.branch_id,
                    name: item.name,
                    unit_price: item.unit_price,
                    quantity: merged,
                });
                self.lines.len() - 1
            }
        };
        self.vendor = Some(item.branch_id);

        Ok(&self.lines[index])
    }

    pub fn update_quantity(&mut self, food_id: FoodId, quantity: i32) -> AppResult<()> {
        if quantity < 1 {
            return Err(AppError::InvalidQuantity(quantity));
        }
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.food_id == food_id)
            .ok_or(AppError::NotFound)?;
        line.quantity = quantity;
        Ok(())
    }

    /// Activates a coupon the gateway has verified.
    ///
    /// Anything unusable for the current cart clears the previously active
    /// coupon before the rejection is reported.
    pub fn apply_coupon(&mut self, coupon: Coupon) -> AppResult<&Coupon> {
        self.coupon = None;
        let vendor = self.vendor.ok_or(AppError::EmptyCart)?;

        if !coupon.valid {
            return Err(AppError::CouponRejected(format!(
                "coupon {} is not valid",
                coupon.code
            )));
        }
        if coupon.branch_id != vendor {
            return Err(AppError::CouponRejected(format!(
                "coupon {} does not belong to this branch",
                coupon.code
            )));
        }
        if coupon.discount_percent > 100 {
            return Err(AppError::CouponRejected(format!(
                "coupon {} has an invalid discount",
                coupon.code
            )));
        }

        Ok(&*self.coupon.insert(coupon))
    }

    pub fn clear_coupon(&mut self) {
        self.coupon = None;
    }

    pub fn clear(&mut self) {
        self.vendor = None;
        self.lines.clear();
        self.coupon = None;
    }

    /// Replaces every line with a fresh snapshot, e.g. one loaded from the
    /// gateway. Lines from more than one branch are refused.
    pub fn replace_lines(&mut self, lines: Vec<CartLine>) -> AppResult<()> {
        let vendor = lines.first().map(|l| l.branch_id);
        if let (Some(vendor), Some(stray)) = (
            vendor,
            lines.iter().find(|l| Some(l.branch_id) != vendor),
        ) {
            return Err(AppError::VendorConflict {
                food_id: stray.food_id,
                attempted_branch: stray.branch_id,
                current_branch: vendor,
            });
        }
        if let Some(line) = lines.iter().find(|l| l.quantity < 1) {
            return Err(AppError::InvalidQuantity(line.quantity));
        }

        self.vendor = vendor;
        self.lines = lines;
        if self
            .coupon
            .as_ref()
            .is_some_and(|c| Some(c.branch_id) != self.vendor)
        {
            self.coupon = None;
        }
        Ok(())
    }

    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    pub fn totals(&self) -> CartTotals {
        let subtotal = self.subtotal();
        let discount_amount = match &self.coupon {
            Some(coupon) => {
                subtotal * Decimal::from(coupon.discount_percent) / Decimal::ONE_HUNDRED
            }
            None => Decimal::ZERO,
        };
        CartTotals {
            subtotal,
            discount_amount,
            total: subtotal - discount_amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(food_id: FoodId, branch_id: BranchId, price: i64, quantity: i32) -> NewCartLine {
        NewCartLine {
            food_id,
            branch_id,
            name: format!("food-{food_id}"),
            unit_price: Decimal::from(price),
            quantity,
        }
    }

    fn coupon(branch_id: BranchId, percent: u8) -> Coupon {
        Coupon {
            code: "SAVE".into(),
            discount_percent: percent,
            valid: true,
            branch_id,
        }
    }

    #[test]
    fn first_add_sets_vendor() {
        let mut cart = Cart::new();
        assert_eq!(cart.vendor(), None);
        cart.add_item(item(1, 7, 10_000, 1)).unwrap();
        assert_eq!(cart.vendor(), Some(7));
    }

    #[test]
    fn same_branch_adds_merge_by_food() {
        let mut cart = Cart::new();
        let adds = [(1, 2), (2, 1), (1, 3), (3, 1), (2, 4)];
        for (food_id, qty) in adds {
            cart.add_item(item(food_id, 7, 1_000, qty)).unwrap();
        }

        assert_eq!(cart.lines().len(), 3);
        let qty = |id| cart.lines().iter().find(|l| l.food_id == id).unwrap().quantity;
        assert_eq!(qty(1), 5);
        assert_eq!(qty(2), 5);
        assert_eq!(qty(3), 1);
    }

    #[test]
    fn cross_branch_add_is_a_conflict_and_leaves_cart_alone() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 7, 10_000, 2)).unwrap();
        let before = cart.lines().to_vec();

        let err = cart.add_item(item(9, 8, 5_000, 1)).unwrap_err();
        match err {
            AppError::VendorConflict {
                food_id,
                attempted_branch,
                current_branch,
            } => {
                assert_eq!(food_id, 9);
                assert_eq!(attempted_branch, 8);
                assert_eq!(current_branch, 7);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(cart.lines(), before.as_slice());
        assert_eq!(cart.vendor(), Some(7));
    }

    #[test]
    fn add_rejects_non_positive_quantity() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.add_item(item(1, 7, 10_000, 0)),
            Err(AppError::InvalidQuantity(0))
        ));
        assert!(cart.is_empty());
        assert_eq!(cart.vendor(), None);
    }

    #[test]
    fn merge_past_i32_max_is_rejected() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 7, 1, i32::MAX)).unwrap();

        assert!(matches!(
            cart.add_item(item(1, 7, 1, 1)),
            Err(AppError::InvalidQuantity(1))
        ));
        assert_eq!(cart.lines()[0].quantity, i32::MAX);
        assert!(cart.totals().total >= Decimal::ZERO);
    }

    #[test]
    fn totals_without_coupon() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 7, 50_000, 2)).unwrap();
        let totals = cart.totals();
        assert_eq!(totals.subtotal, Decimal::from(100_000));
        assert_eq!(totals.discount_amount, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::from(100_000));
    }

    #[test]
    fn totals_with_ten_percent_coupon() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 7, 50_000, 2)).unwrap();
        cart.apply_coupon(coupon(7, 10)).unwrap();
        let totals = cart.totals();
        assert_eq!(totals.discount_amount, Decimal::from(10_000));
        assert_eq!(totals.total, Decimal::from(90_000));
        assert!(totals.total <= totals.subtotal);
    }

    #[test]
    fn totals_follow_quantity_changes_with_coupon() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 7, 20_000, 1)).unwrap();
        cart.apply_coupon(coupon(7, 25)).unwrap();
        cart.update_quantity(1, 4).unwrap();
        let totals = cart.totals();
        assert_eq!(totals.subtotal, Decimal::from(80_000));
        assert_eq!(totals.total, Decimal::from(60_000));
    }

    #[test]
    fn update_to_zero_is_rejected() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 7, 50_000, 2)).unwrap();
        assert!(matches!(
            cart.update_quantity(1, 0),
            Err(AppError::InvalidQuantity(0))
        ));
        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn update_unknown_food_is_not_found() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 7, 50_000, 2)).unwrap();
        assert!(matches!(cart.update_quantity(2, 3), Err(AppError::NotFound)));
    }

    #[test]
    fn coupon_needs_items() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.apply_coupon(coupon(7, 10)),
            Err(AppError::EmptyCart)
        ));
    }

    #[test]
    fn coupon_for_other_branch_is_rejected_and_clears_active() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 7, 50_000, 2)).unwrap();
        cart.apply_coupon(coupon(7, 10)).unwrap();

        let err = cart.apply_coupon(coupon(8, 50)).unwrap_err();
        assert!(matches!(err, AppError::CouponRejected(_)));
        assert!(cart.coupon().is_none());
        assert_eq!(cart.totals().total, cart.totals().subtotal);
    }

    #[test]
    fn invalid_coupon_clears_active() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 7, 50_000, 2)).unwrap();
        cart.apply_coupon(coupon(7, 10)).unwrap();

        let mut bad = coupon(7, 10);
        bad.valid = false;
        assert!(cart.apply_coupon(bad).is_err());
        assert!(cart.coupon().is_none());
    }

    #[test]
    fn full_discount_never_goes_negative() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 7, 33_333, 3)).unwrap();
        cart.apply_coupon(coupon(7, 100)).unwrap();
        let totals = cart.totals();
        assert_eq!(totals.total, Decimal::ZERO);
        assert!(totals.total >= Decimal::ZERO);
    }

    #[test]
    fn clear_is_idempotent() {
        let mut cart = Cart::new();
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.vendor(), None);

        cart.add_item(item(1, 7, 50_000, 2)).unwrap();
        cart.apply_coupon(coupon(7, 10)).unwrap();
        cart.clear();
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.vendor(), None);
        assert!(cart.coupon().is_none());
        assert_eq!(cart.totals().total, Decimal::ZERO);
    }

    #[test]
    fn cleared_cart_accepts_another_vendor() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 7, 50_000, 1)).unwrap();
        cart.clear();
        cart.add_item(item(2, 8, 10_000, 1)).unwrap();
        assert_eq!(cart.vendor(), Some(8));
    }

    #[test]
    fn replace_lines_keeps_coupon_only_for_same_vendor() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 7, 50_000, 1)).unwrap();
        cart.apply_coupon(coupon(7, 10)).unwrap();

        let same = vec![CartLine {
            food_id: 2,
            branch_id: 7,
            name: "x".into(),
            unit_price: Decimal::from(1_000),
            quantity: 1,
        }];
        cart.replace_lines(same).unwrap();
        assert!(cart.coupon().is_some());

        let other = vec![CartLine {
            food_id: 3,
            branch_id: 9,
            name: "y".into(),
            unit_price: Decimal::from(1_000),
            quantity: 1,
        }];
        cart.replace_lines(other).unwrap();
        assert_eq!(cart.vendor(), Some(9));
        assert!(cart.coupon().is_none());

        cart.replace_lines(Vec::new()).unwrap();
        assert_eq!(cart.vendor(), None);
    }

    #[test]
    fn replace_lines_refuses_mixed_vendors() {
        let mut cart = Cart::new();
        let mixed = vec![
            CartLine {
                food_id: 1,
                branch_id: 7,
                name: "a".into(),
                unit_price: Decimal::from(1_000),
                quantity: 1,
            },
            CartLine {
                food_id: 2,
                branch_id: 8,
                name: "b".into(),
                unit_price: Decimal::from(1_000),
                quantity: 1,
            },
        ];
        assert!(matches!(
            cart.replace_lines(mixed),
            Err(AppError::VendorConflict { .. })
        ));
        assert!(cart.is_empty());
    }
}
