//! Runtime abstraction layer for async operations
//!
//! Placement futures are runtime-agnostic; this module only matters to callers
//! that want them driven in the background instead of awaiting them.

use crate::prelude::{Future, Pin};
use crate::{MapError, Result};

/// A trait for spawning async tasks (object-safe version)
pub trait AsyncSpawner: Send + Sync + 'static {
    /// Spawn a future and return a handle to it
    fn spawn_boxed(
        &self,
        future: Pin<Box<dyn Future<Output = ()> + Send + 'static>>,
    ) -> Result<Box<dyn AsyncHandle>>;
}

/// Handle to a spawned async task
pub trait AsyncHandle: Send + Sync {
    /// Check if the task is finished
    fn is_finished(&self) -> bool;

    /// Cancel the task
    fn cancel(&self);
}

/// Spawns `future` on the configured runtime
pub fn spawn<F>(future: F) -> Result<Box<dyn AsyncHandle>>
where
    F: Future<Output = ()> + Send + 'static,
{
    log::debug!("spawning background task");
    runtime()?.spawn_boxed(Box::pin(future))
}

/// Default spawner implementations
pub mod spawners {
    #[cfg(feature = "tokio-runtime")]
    pub mod tokio_impl {
        use super::super::*;
        use ::tokio::task::JoinHandle;

        /// Tokio-based async spawner; requires being called from within a tokio runtime
        pub struct TokioSpawner;

        impl AsyncSpawner for TokioSpawner {
            fn spawn_boxed(
                &self,
                future: Pin<Box<dyn Future<Output = ()> + Send + 'static>>,
            ) -> Result<Box<dyn AsyncHandle>> {
                let handle = ::tokio::runtime::Handle::try_current()
                    .map_err(|e| MapError::Runtime(e.to_string()))?
                    .spawn(future);
                Ok(Box::new(TokioHandle(handle)))
            }
        }

        struct TokioHandle(JoinHandle<()>);

        impl AsyncHandle for TokioHandle {
            fn is_finished(&self) -> bool {
                self.0.is_finished()
            }

            fn cancel(&self) {
                self.0.abort();
            }
        }
    }
}

/// Global runtime instance
static RUNTIME: std::sync::OnceLock<Box<dyn AsyncSpawner>> = std::sync::OnceLock::new();

/// Installs a spawner; only the first call takes effect
pub fn init_runtime(spawner: Box<dyn AsyncSpawner>) -> bool {
    RUNTIME.set(spawner).is_ok()
}

/// Get the global runtime spawner, defaulting to tokio when that feature is on
pub fn runtime() -> Result<&'static dyn AsyncSpawner> {
    #[cfg(feature = "tokio-runtime")]
    {
        Ok(RUNTIME
            .get_or_init(|| Box::new(spawners::tokio_impl::TokioSpawner))
            .as_ref())
    }

    #[cfg(not(feature = "tokio-runtime"))]
    {
        RUNTIME.get().map(|spawner| spawner.as_ref()).ok_or_else(|| {
            MapError::Runtime(
                "no async runtime available; enable 'tokio-runtime' or call init_runtime"
                    .to_string(),
            )
        })
    }
}
