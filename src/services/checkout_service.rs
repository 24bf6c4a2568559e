//! Checkout: order creation, then payment, then cart clear.
//!
//! The orchestrator sits in `Collecting` until a submit succeeds. A failed
//! submit drops back to `Collecting` with the error attached; nothing is
//! retried or compensated automatically.

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    cart::Cart,
    dto::orders::{CheckoutItem, CheckoutReceipt, CheckoutRequest, DeliveryInfo, PayRequest},
    error::{AppError, AppResult},
    gateway::Gateway,
    models::OrderStatus,
    session::Session,
};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CheckoutState {
    Collecting { last_error: Option<String> },
    Submitting,
    Completed { receipt: CheckoutReceipt },
}

#[derive(Debug)]
pub struct CheckoutOrchestrator {
    state: CheckoutState,
}

impl Default for CheckoutOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckoutOrchestrator {
    pub fn new() -> Self {
        Self {
            state: CheckoutState::Collecting { last_error: None },
        }
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.state, CheckoutState::Completed { .. })
    }

    /// Starts over for a new cart.
    pub fn reset(&mut self) {
        self.state = CheckoutState::Collecting { last_error: None };
    }

    pub async fn submit(
        &mut self,
        gateway: &dyn Gateway,
        session: &Session,
        delivery: &DeliveryInfo,
        cart: &mut Cart,
    ) -> AppResult<CheckoutReceipt> {
        if self.is_completed() {
            if cart.is_empty() {
                return Err(AppError::EmptyCart);
            }
            return Err(AppError::Validation(
                "checkout already completed; start a new one".into(),
            ));
        }

        match self.run(gateway, session, delivery, cart).await {
            Ok(receipt) => Ok(receipt),
            Err(err) => {
                self.state = CheckoutState::Collecting {
                    last_error: Some(err.to_string()),
                };
                Err(err)
            }
        }
    }

    async fn run(
        &mut self,
        gateway: &dyn Gateway,
        session: &Session,
        delivery: &DeliveryInfo,
        cart: &mut Cart,
    ) -> AppResult<CheckoutReceipt> {
        let branch_id = cart.vendor().ok_or(AppError::EmptyCart)?;
        let missing = delivery.missing_fields();
        if !missing.is_empty() {
            return Err(AppError::MissingFields(missing));
        }

        self.state = CheckoutState::Submitting;

        let request = CheckoutRequest {
            user_id: session.user_id,
            branch_id,
            items: cart
                .lines()
                .iter()
                .map(|line| CheckoutItem {
                    food_id: line.food_id,
                    quantity: line.quantity,
                })
                .collect(),
            coupon_code: cart.coupon().map(|c| c.code.clone()),
            customer_name: delivery.name.trim().to_string(),
            customer_phone: delivery.phone.trim().to_string(),
            delivery_address: delivery.address.trim().to_string(),
            note: delivery
                .note
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
        };

        let created = gateway
            .create_order(&session.token, &request)
            .await
            .map_err(AppError::OrderCreationFailed)?;
        tracing::info!(
            order_id = created.order_id,
            total_price = %created.total_price,
            status = %created.status,
            "order created"
        );

        // Charge exactly what the gateway priced, not the local estimate.
        let payment = PayRequest {
            order_id: created.order_id,
            amount: created.total_price,
        };
        gateway
            .pay(&session.token, &payment)
            .await
            .map_err(|source| AppError::PaymentFailed {
                order_id: created.order_id,
                source,
            })?;
        tracing::info!(order_id = created.order_id, "order paid");

        let receipt = CheckoutReceipt {
            order_id: created.order_id,
            total_price: created.total_price,
            status: OrderStatus::Paid,
        };
        self.state = CheckoutState::Completed {
            receipt: receipt.clone(),
        };

        if let Err(err) = gateway.clear_cart(&session.token).await {
            tracing::warn!(
                order_id = receipt.order_id,
                error = %err,
                "cart clear after checkout failed"
            );
        }
        cart.clear();

        Ok(receipt)
    }
}
