use crate::{
    error::{AppError, AppResult},
    gateway::Gateway,
    middleware::auth::ensure_seller,
    models::{Order, OrderId, OrderStatus},
    session::Session,
};

pub async fn my_orders(gateway: &dyn Gateway, session: &Session) -> AppResult<Vec<Order>> {
    let user_id = session.require_user_id()?;
    Ok(gateway.my_orders(&session.token, user_id).await?)
}

pub async fn branch_orders(gateway: &dyn Gateway, session: &Session) -> AppResult<Vec<Order>> {
    let branch_id = ensure_seller(session)?;
    Ok(gateway.branch_orders(&session.token, branch_id).await?)
}

/// Requests a seller-side status change. Only the transitions the dashboard
/// offers for the order's current status are sent to the gateway.
pub async fn update_order_status(
    gateway: &dyn Gateway,
    session: &Session,
    order_id: OrderId,
    next: OrderStatus,
) -> AppResult<Order> {
    let branch_id = ensure_seller(session)?;
    let mut order = gateway
        .branch_orders(&session.token, branch_id)
        .await?
        .into_iter()
        .find(|o| o.id == order_id)
        .ok_or(AppError::NotFound)?;

    if !order.status.can_transition_to(next) {
        return Err(AppError::Validation(format!(
            "cannot move order {order_id} from {} to {next}",
            order.status
        )));
    }

    gateway
        .update_order_status(&session.token, order_id, next)
        .await?;
    tracing::info!(order_id, from = %order.status, to = %next, "order status updated");

    order.status = next;
    Ok(order)
}
