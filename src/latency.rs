//! Artificial processing delays.
//!
//! The demonstrator fakes remote-sensing latency before each analysis run.
//! The delay goes through an injected strategy so tests run instantly
//! while the demo keeps its deliberate pauses.

use std::time::Duration;

use async_trait::async_trait;

/// Strategy for the pause simulated before an analysis completes.
#[async_trait]
pub trait Latency: Send + Sync {
    async fn pause(&self, duration: Duration);
}

/// Real pauses via the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedDelay;

#[async_trait]
impl Latency for SimulatedDelay {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// No pause at all. The strategy used by the test suites.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait]
impl Latency for NoDelay {
    async fn pause(&self, _duration: Duration) {}
}
