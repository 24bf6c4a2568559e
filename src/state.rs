use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::{
    sync::{Mutex, RwLock},
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use uuid::Uuid;

use crate::{
    cart::Cart,
    dto::cart::CartView,
    error::AppResult,
    gateway::Gateway,
    models::BranchId,
    poller::{OrderHistory, OrderHistoryPoller},
    services::{cart_service, catalog_service, checkout_service::CheckoutOrchestrator},
    session::{Session, SessionStore},
};

pub const DEFAULT_HISTORY_IDLE: Duration = Duration::from_secs(60);
pub const DEFAULT_WORKSPACE_IDLE: Duration = Duration::from_secs(30 * 60);

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn Gateway>,
    pub sessions: Arc<SessionStore>,
    pub workspaces: Arc<Workspaces>,
    pub order_refresh: Duration,
    pub history_idle: Duration,
    pub workspace_idle: Duration,
}

impl AppState {
    pub fn new(gateway: Arc<dyn Gateway>, sessions: SessionStore, order_refresh: Duration) -> Self {
        Self {
            gateway,
            sessions: Arc::new(sessions),
            workspaces: Arc::new(Workspaces::default()),
            order_refresh,
            history_idle: DEFAULT_HISTORY_IDLE,
            workspace_idle: DEFAULT_WORKSPACE_IDLE,
        }
    }

    pub fn with_idle_limits(mut self, history_idle: Duration, workspace_idle: Duration) -> Self {
        self.history_idle = history_idle;
        self.workspace_idle = workspace_idle;
        self
    }

    /// Periodically drops workspaces nobody has touched for `workspace_idle`.
    pub fn spawn_workspace_sweeper(&self) -> JoinHandle<()> {
        let workspaces = self.workspaces.clone();
        let max_idle = self.workspace_idle;
        let every = max_idle.min(Duration::from_secs(60));
        tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + every, every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let evicted = workspaces.evict_idle(max_idle).await;
                if evicted > 0 {
                    tracing::info!(evicted, "idle workspaces dropped");
                }
            }
        })
    }
}

/// Per-session state held by the edge service. Access goes through a mutex,
/// so a shopper runs one flow at a time.
#[derive(Debug, Default)]
pub struct ShopperWorkspace {
    pub cart: Cart,
    cart_loaded: bool,
    pub checkout: CheckoutOrchestrator,
    history: Option<OrderHistoryPoller>,
    vendor_name: Option<(BranchId, String)>,
}

impl ShopperWorkspace {
    /// The cart mirror, loaded from the gateway on first use.
    pub async fn synced_cart(
        &mut self,
        gateway: &dyn Gateway,
        session: &Session,
    ) -> AppResult<&mut Cart> {
        if !self.cart_loaded {
            cart_service::load_cart(gateway, session, &mut self.cart).await?;
            self.cart_loaded = true;
        }
        Ok(&mut self.cart)
    }

    /// Reloads the cart mirror regardless of what it holds.
    pub async fn reload_cart(
        &mut self,
        gateway: &dyn Gateway,
        session: &Session,
    ) -> AppResult<&mut Cart> {
        self.cart_loaded = false;
        self.synced_cart(gateway, session).await
    }

    /// The cart with totals and the vendor's display name.
    pub async fn cart_view(&mut self, gateway: &dyn Gateway) -> CartView {
        let vendor_name = match self.cart.vendor() {
            Some(branch_id) => Some(self.vendor_name(gateway, branch_id).await),
            None => None,
        };
        CartView::new(&self.cart, vendor_name)
    }

    async fn vendor_name(&mut self, gateway: &dyn Gateway, branch_id: BranchId) -> String {
        if let Some((cached, name)) = &self.vendor_name {
            if *cached == branch_id {
                return name.clone();
            }
        }
        let name = catalog_service::branch_name(gateway, branch_id).await;
        self.vendor_name = Some((branch_id, name.clone()));
        name
    }

    /// Latest order history. Starts the refresh task on first call and again
    /// once a previous one has gone idle.
    pub fn order_history(
        &mut self,
        gateway: Arc<dyn Gateway>,
        session: &Session,
        every: Duration,
        idle_after: Duration,
    ) -> OrderHistory {
        let stale = self.history.as_ref().is_some_and(|h| !h.is_running());
        if stale || self.history.is_none() {
            self.history = Some(OrderHistoryPoller::spawn(
                gateway,
                session.clone(),
                every,
                idle_after,
            ));
        }
        self.history
            .as_ref()
            .map(OrderHistoryPoller::snapshot)
            .unwrap_or_default()
    }

    pub fn history_running(&self) -> bool {
        self.history.as_ref().is_some_and(OrderHistoryPoller::is_running)
    }

    pub async fn shutdown(&mut self) {
        if let Some(history) = self.history.take() {
            history.cancel().await;
        }
    }
}

#[derive(Debug)]
struct WorkspaceSlot {
    workspace: Arc<Mutex<ShopperWorkspace>>,
    last_used: Instant,
}

#[derive(Debug, Default)]
pub struct Workspaces {
    inner: RwLock<HashMap<Uuid, WorkspaceSlot>>,
}

impl Workspaces {
    pub async fn get_or_create(&self, session_id: Uuid) -> Arc<Mutex<ShopperWorkspace>> {
        let mut inner = self.inner.write().await;
        let slot = inner.entry(session_id).or_insert_with(|| WorkspaceSlot {
            workspace: Arc::default(),
            last_used: Instant::now(),
        });
        slot.last_used = Instant::now();
        slot.workspace.clone()
    }

    /// Drops the workspace and stops its background work.
    pub async fn close(&self, session_id: Uuid) {
        let removed = self.inner.write().await.remove(&session_id);
        if let Some(slot) = removed {
            slot.workspace.lock().await.shutdown().await;
        }
    }

    /// Drops every workspace unused for at least `max_idle` and not held by a
    /// request. Returns how many went.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let evicted: Vec<WorkspaceSlot> = {
            let mut inner = self.inner.write().await;
            let idle: Vec<Uuid> = inner
                .iter()
                .filter(|(_, slot)| {
                    now.duration_since(slot.last_used) >= max_idle
                        && Arc::strong_count(&slot.workspace) == 1
                })
                .map(|(id, _)| *id)
                .collect();
            idle.iter().filter_map(|id| inner.remove(id)).collect()
        };

        for slot in &evicted {
            slot.workspace.lock().await.shutdown().await;
        }
        evicted.len()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}
