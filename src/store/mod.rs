// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuerySculptor-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of QuerySculptor and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Session persistence: Redis primary with an in-process fallback map.
//!
//! One verified connect attempt decides the mode for the process lifetime:
//! connect within 2 seconds, then PING. Failure before verification flips to
//! memory (logged once); errors after verification degrade per call without
//! flipping the mode, so a transient outage cannot flap the store.

use std::collections::HashMap;
use std::time::Duration;

use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tokio::sync::{Mutex, OnceCell};
use tracing::{info, warn};

use crate::error::ToolError;
use crate::model::{QueryState, SessionId};

pub const SESSION_KEY_PREFIX: &str = "querystate:";
pub const SESSION_TTL_SECS: u64 = 3600;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

pub struct SessionStore {
    redis_url: Option<String>,
    verified: OnceCell<bool>,
    connection: Mutex<Option<MultiplexedConnection>>,
    memory: Mutex<HashMap<String, String>>,
}

impl SessionStore {
    pub fn new(redis_url: Option<String>) -> Self {
        Self {
            redis_url,
            verified: OnceCell::new(),
            connection: Mutex::new(None),
            memory: Mutex::new(HashMap::new()),
        }
    }

    pub fn memory_only() -> Self {
        Self::new(None)
    }

    fn key(session_id: &SessionId) -> String {
        format!("{SESSION_KEY_PREFIX}{session_id}")
    }

    /// One-shot init: `true` only after a connect + PING succeeded.
    async fn redis_verified(&self) -> bool {
        *self
            .verified
            .get_or_init(|| async {
                let Some(url) = self.redis_url.as_deref() else {
                    return false;
                };
                match Self::connect(url).await {
                    Ok(connection) => {
                        *self.connection.lock().await = Some(connection);
                        info!("session store connected to Redis");
                        true
                    }
                    Err(err) => {
                        warn!(error = %err, "Redis unavailable, using in-memory session store");
                        false
                    }
                }
            })
            .await
    }

    async fn connect(url: &str) -> Result<MultiplexedConnection, redis::RedisError> {
        let client = redis::Client::open(url)?;
        let mut connection =
            tokio::time::timeout(CONNECT_TIMEOUT, client.get_multiplexed_async_connection())
                .await
                .map_err(|_| {
                    redis::RedisError::from((
                        redis::ErrorKind::IoError,
                        "connect timed out",
                    ))
                })??;
        let _pong: String = redis::cmd("PING").query_async(&mut connection).await?;
        Ok(connection)
    }

    /// Writes the full state and refreshes the TTL window.
    pub async fn save(&self, session_id: &SessionId, state: &QueryState) -> Result<(), ToolError> {
        let encoded = serde_json::to_string(state)
            .map_err(|err| ToolError::internal(format!("cannot serialize session state: {err}")))?;

        if self.redis_verified().await {
            let mut guard = self.connection.lock().await;
            if let Some(connection) = guard.as_mut() {
                match connection
                    .set_ex::<_, _, ()>(Self::key(session_id), &encoded, SESSION_TTL_SECS)
                    .await
                {
                    Ok(()) => return Ok(()),
                    Err(err) => {
                        warn!(error = %err, session_id = %session_id, "Redis save failed, degrading to memory");
                    }
                }
            }
        }

        self.memory.lock().await.insert(session_id.as_str().to_owned(), encoded);
        Ok(())
    }

    /// Reads the state; the memory map is a secondary lookup whenever Redis
    /// has no value.
    pub async fn load(&self, session_id: &SessionId) -> Result<Option<QueryState>, ToolError> {
        if self.redis_verified().await {
            let mut guard = self.connection.lock().await;
            if let Some(connection) = guard.as_mut() {
                match connection.get::<_, Option<String>>(Self::key(session_id)).await {
                    Ok(Some(encoded)) => return decode(&encoded).map(Some),
                    Ok(None) => {}
                    Err(err) => {
                        warn!(error = %err, session_id = %session_id, "Redis load failed, degrading to memory");
                    }
                }
            }
        }

        match self.memory.lock().await.get(session_id.as_str()) {
            Some(encoded) => decode(encoded).map(Some),
            None => Ok(None),
        }
    }

    /// Removes the state from both backends.
    pub async fn delete(&self, session_id: &SessionId) -> Result<(), ToolError> {
        if self.redis_verified().await {
            let mut guard = self.connection.lock().await;
            if let Some(connection) = guard.as_mut() {
                if let Err(err) = connection.del::<_, ()>(Self::key(session_id)).await {
                    warn!(error = %err, session_id = %session_id, "Redis delete failed, degrading to memory");
                }
            }
        }

        self.memory.lock().await.remove(session_id.as_str());
        Ok(())
    }
}

fn decode(encoded: &str) -> Result<QueryState, ToolError> {
    serde_json::from_str(encoded)
        .map_err(|err| ToolError::store(format!("stored session state is unreadable: {err}")))
}

#[cfg(test)]
mod tests;
