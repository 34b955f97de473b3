use crate::recency::RecencyBuffer;
use tokio::time::Instant;

/// State which is lost across sessions
pub struct VolatileState {
    /// Recently sent or uploaded images, excluded from random selection
    pub recent: RecencyBuffer,
    pub started_at: Instant,
    /// Set once Discord reports the connection as ready
    pub bot_user: Option<String>,
}

impl VolatileState {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            recent: RecencyBuffer::new(history_capacity),
            started_at: Instant::now(),
            bot_user: None,
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
