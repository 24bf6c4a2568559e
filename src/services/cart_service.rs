use futures::future::join_all;
use rust_decimal::Decimal;

use crate::{
    cart::{Cart, NewCartLine},
    dto::cart::{AddToCartRequest, RemoteCartItem, UpdateCartRequest},
    error::{AppError, AppResult},
    gateway::Gateway,
    models::{CartLine, Coupon},
    session::Session,
};

pub const UNAVAILABLE_ITEM: &str = "Unavailable item";

/// Reloads the cart mirror from the gateway, enriching every line.
pub async fn load_cart(gateway: &dyn Gateway, session: &Session, cart: &mut Cart) -> AppResult<()> {
    let items = gateway.get_cart(&session.token).await?;
    let lines = enrich_lines(gateway, items).await;
    cart.replace_lines(lines)?;
    tracing::debug!(lines = cart.lines().len(), vendor = ?cart.vendor(), "cart loaded");
    Ok(())
}

/// Fetches name and price for each line concurrently. A line whose food can't
/// be fetched keeps its ids and quantity but gets a placeholder name and a zero
/// price; it never fails the batch.
pub async fn enrich_lines(gateway: &dyn Gateway, items: Vec<RemoteCartItem>) -> Vec<CartLine> {
    join_all(items.into_iter().map(|item| async move {
        match gateway.food(item.food_id).await {
            Ok(food) => CartLine {
                food_id: item.food_id,
                branch_id: item.branch_id,
                name: food.name.clone(),
                unit_price: food.effective_price(),
                quantity: item.quantity,
            },
            Err(err) => {
                tracing::warn!(food_id = item.food_id, error = %err, "cart line enrichment failed");
                placeholder_line(&item)
            }
        }
    }))
    .await
}

fn placeholder_line(item: &RemoteCartItem) -> CartLine {
    CartLine {
        food_id: item.food_id,
        branch_id: item.branch_id,
        name: UNAVAILABLE_ITEM.to_string(),
        unit_price: Decimal::ZERO,
        quantity: item.quantity,
    }
}

pub async fn add_item(
    gateway: &dyn Gateway,
    session: &Session,
    cart: &mut Cart,
    payload: AddToCartRequest,
) -> AppResult<CartLine> {
    cart.check_add(payload.food_id, payload.branch_id, payload.quantity)?;

    let remote = RemoteCartItem {
        food_id: payload.food_id,
        branch_id: payload.branch_id,
        quantity: payload.quantity,
    };
    if let Err(err) = gateway.add_to_cart(&session.token, &remote).await {
        if !err.is_conflict() {
            return Err(err.into());
        }
        // The remote cart holds another branch the mirror didn't know about.
        load_cart(gateway, session, cart).await?;
        cart.check_vendor(payload.food_id, payload.branch_id)?;
        return Err(err.into());
    }

    let line = enrich_lines(gateway, vec![remote.clone()])
        .await
        .pop()
        .unwrap_or_else(|| placeholder_line(&remote));
    let added = cart.add_item(NewCartLine {
        food_id: line.food_id,
        branch_id: line.branch_id,
        name: line.name,
        unit_price: line.unit_price,
        quantity: line.quantity,
    })?;
    tracing::info!(
        food_id = added.food_id,
        branch_id = added.branch_id,
        quantity = added.quantity,
        "cart item added"
    );
    Ok(added.clone())
}

/// Explicit "replace cart" after a vendor conflict: clear everything, then add.
pub async fn replace_with(
    gateway: &dyn Gateway,
    session: &Session,
    cart: &mut Cart,
    payload: AddToCartRequest,
) -> AppResult<CartLine> {
    if payload.quantity < 1 {
        return Err(AppError::InvalidQuantity(payload.quantity));
    }
    clear(gateway, session, cart).await?;
    add_item(gateway, session, cart, payload).await
}

pub async fn update_quantity(
    gateway: &dyn Gateway,
    session: &Session,
    cart: &mut Cart,
    payload: UpdateCartRequest,
) -> AppResult<()> {
    if payload.quantity < 1 {
        return Err(AppError::InvalidQuantity(payload.quantity));
    }
    if !cart.lines().iter().any(|l| l.food_id == payload.food_id) {
        return Err(AppError::NotFound);
    }

    gateway.update_cart(&session.token, &payload).await?;
    cart.update_quantity(payload.food_id, payload.quantity)
}

pub async fn apply_coupon(
    gateway: &dyn Gateway,
    session: &Session,
    cart: &mut Cart,
    code: &str,
) -> AppResult<Coupon> {
    let code = code.trim().to_uppercase();
    if code.is_empty() {
        return Err(AppError::Validation("coupon code is required".into()));
    }
    let Some(vendor) = cart.vendor() else {
        cart.clear_coupon();
        return Err(AppError::EmptyCart);
    };

    let verified = match gateway.verify_coupon(&session.token, &code, vendor).await {
        Ok(verified) => verified,
        Err(err) => {
            cart.clear_coupon();
            tracing::info!(code = %code, branch_id = vendor, error = %err, "coupon rejected");
            return Err(AppError::CouponRejected(err.to_string()));
        }
    };

    let coupon = cart.apply_coupon(verified.for_branch(vendor))?.clone();
    tracing::info!(
        code = %coupon.code,
        percent = coupon.discount_percent,
        branch_id = vendor,
        "coupon applied"
    );
    Ok(coupon)
}

/// Clears the remote cart, then the mirror. The mirror is left untouched when
/// the gateway refuses.
pub async fn clear(gateway: &dyn Gateway, session: &Session, cart: &mut Cart) -> AppResult<()> {
    gateway.clear_cart(&session.token).await?;
    cart.clear();
    tracing::info!("cart cleared");
    Ok(())
}
