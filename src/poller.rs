//! Background refresh of a buyer's order history.
//!
//! The task fetches once immediately, then again on every tick until it is
//! cancelled, dropped, or nobody has read the snapshot for `idle_after`. Only
//! that first fetch flips `loading`; later refreshes swap the data in place.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::{
    sync::{oneshot, watch},
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use utoipa::ToSchema;

use crate::{gateway::Gateway, models::Order, services::order_service, session::Session};

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct OrderHistory {
    pub loading: bool,
    pub orders: Vec<Order>,
    pub last_error: Option<String>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
pub struct OrderHistoryPoller {
    snapshot: watch::Receiver<OrderHistory>,
    last_read: watch::Sender<Instant>,
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl OrderHistoryPoller {
    pub fn spawn(
        gateway: Arc<dyn Gateway>,
        session: Session,
        every: Duration,
        idle_after: Duration,
    ) -> Self {
        let (tx, rx) = watch::channel(OrderHistory {
            loading: true,
            ..OrderHistory::default()
        });
        let (last_read, read_rx) = watch::channel(Instant::now());
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            refresh(gateway.as_ref(), &session, &tx).await;
            tx.send_modify(|history| history.loading = false);

            let mut ticker = time::interval_at(Instant::now() + every, every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        let last_read = *read_rx.borrow();
                        if last_read + idle_after <= Instant::now() {
                            tracing::debug!(session_id = %session.id, "order history unread, going idle");
                            break;
                        }
                        refresh(gateway.as_ref(), &session, &tx).await;
                    }
                }
            }
            tracing::debug!(session_id = %session.id, "order history refresh stopped");
        });

        Self {
            snapshot: rx,
            last_read,
            stop: Some(stop_tx),
            task: Some(task),
        }
    }

    /// Latest history. Reading it keeps the refresh task alive.
    pub fn snapshot(&self) -> OrderHistory {
        self.last_read.send_replace(Instant::now());
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<OrderHistory> {
        self.snapshot.clone()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stops the task and waits for it to wind down.
    pub async fn cancel(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                tracing::warn!(error = %err, "order history task ended abnormally");
            }
        }
    }
}

impl Drop for OrderHistoryPoller {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}

async fn refresh(gateway: &dyn Gateway, session: &Session, tx: &watch::Sender<OrderHistory>) {
    match order_service::my_orders(gateway, session).await {
        Ok(orders) => tx.send_modify(|history| {
            history.orders = orders;
            history.last_error = None;
            history.refreshed_at = Some(Utc::now());
        }),
        Err(err) => {
            tracing::warn!(session_id = %session.id, error = %err, "order history refresh failed");
            tx.send_modify(|history| history.last_error = Some(err.to_string()));
        }
    }
}
