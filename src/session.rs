//! Session context and its durable store.
//!
//! A [`Session`] is created on login and removed on logout. The store keeps
//! every live session in a JSON file so shoppers stay signed in across
//! restarts; without a path it only lives in memory.

use std::{collections::HashMap, path::PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{fs, sync::RwLock};
use uuid::Uuid;

use crate::{
    dto::auth::GatewayLoginResponse,
    error::{AppError, AppResult},
    models::{BranchId, UserId},
};

pub const SELLER_ROLE: &str = "seller";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub token: String,
    pub user_id: Option<UserId>,
    pub role: String,
    pub branch_id: Option<BranchId>,
    pub seller_mode: bool,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn from_login(login: GatewayLoginResponse) -> Self {
        let seller_mode = match &login.seller_mode {
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(s)) => !s.is_empty() && s != "false",
            Some(serde_json::Value::Number(n)) => n.as_i64().is_some_and(|n| n != 0),
            _ => false,
        };
        Self {
            id: Uuid::new_v4(),
            token: login.access_token,
            user_id: login.id,
            role: login.role,
            branch_id: login.branch_id,
            seller_mode,
            created_at: Utc::now(),
        }
    }

    pub fn is_seller(&self) -> bool {
        self.role == SELLER_ROLE
    }

    pub fn require_user_id(&self) -> AppResult<UserId> {
        self.user_id.ok_or(AppError::Unauthorized)
    }
}

#[derive(Debug, Default)]
pub struct SessionStore {
    path: Option<PathBuf>,
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl SessionStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens the store at `path`, loading whatever sessions it already holds.
    pub async fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let sessions = match fs::read(&path).await {
            Ok(bytes) if !bytes.is_empty() => {
                let list: Vec<Session> = serde_json::from_slice(&bytes)
                    .with_context(|| format!("corrupt session store {}", path.display()))?;
                list.into_iter().map(|s| (s.id, s)).collect()
            }
            Ok(_) => HashMap::new(),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => {
                return Err(err).with_context(|| format!("reading {}", path.display()));
            }
        };
        tracing::info!(path = %path.display(), sessions = sessions.len(), "session store opened");
        Ok(Self {
            path: Some(path),
            sessions: RwLock::new(sessions),
        })
    }

    pub async fn get(&self, id: Uuid) -> Option<Session> {
        self.sessions.read().await.get(&id).cloned()
    }

    pub async fn insert(&self, session: Session) -> AppResult<()> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id, session);
        self.persist(&sessions).await
    }

    pub async fn remove(&self, id: Uuid) -> AppResult<Option<Session>> {
        let mut sessions = self.sessions.write().await;
        let removed = sessions.remove(&id);
        if removed.is_some() {
            self.persist(&sessions).await?;
        }
        Ok(removed)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn persist(&self, sessions: &HashMap<Uuid, Session>) -> AppResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let mut list: Vec<&Session> = sessions.values().collect();
        list.sort_by_key(|s| s.created_at);
        let bytes = serde_json::to_vec_pretty(&list).context("encoding sessions")?;

        // Replace atomically.
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, bytes)
            .await
            .with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, path)
            .await
            .with_context(|| format!("replacing {}", path.display()))?;
        Ok(())
    }
}
