//! Authentication gate in front of the reactor

use super::engine::Reactor;
use super::event::ReactorHandle;
use crate::error::{RoomwatchError, RoomwatchResult};
use crate::ports::{AlarmSound, DisplaySurface, IdentityProvider, NotificationSurface, SchemaAdapter};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Entry point of the dashboard view
///
/// Checks for an authenticated session before any subscription exists.
/// Without one the caller gets [`RoomwatchError::Unauthenticated`] and is
/// expected to send the user to the login flow.
pub struct Dashboard<I: ?Sized> {
    identity: Arc<I>,
}

impl<I: IdentityProvider + ?Sized> Dashboard<I> {
    pub fn new(identity: Arc<I>) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> &Arc<I> {
        &self.identity
    }

    /// Start `reactor` if someone is signed in
    ///
    /// Must be called from within a tokio runtime.
    pub fn enter<S, D, N, A>(&self, reactor: Reactor<S, D, N, A>) -> RoomwatchResult<DashboardRun>
    where
        S: SchemaAdapter + 'static,
        D: DisplaySurface + 'static,
        N: NotificationSurface + 'static,
        A: AlarmSound + 'static,
    {
        let session = match self.identity.current_session() {
            Some(session) => session,
            None => {
                warn!("No authenticated session, redirecting to login");
                return Err(RoomwatchError::Unauthenticated);
            }
        };
        info!("Entering dashboard as {}", session.email);

        let handle = reactor.handle();
        let changes = self.identity.session_changes();
        let task = tokio::spawn(reactor.run(changes));
        Ok(DashboardRun {
            handle,
            task: Some(task),
        })
    }
}

/// A running dashboard
pub struct DashboardRun {
    pub handle: ReactorHandle,
    task: Option<JoinHandle<RoomwatchResult<()>>>,
}

impl DashboardRun {
    /// Wait for the reactor loop to finish
    pub async fn wait(mut self) -> RoomwatchResult<()> {
        self.join().await
    }

    /// Like [`wait`](Self::wait) but usable inside `select!`
    pub async fn join(&mut self) -> RoomwatchResult<()> {
        let Some(task) = self.task.as_mut() else {
            return Ok(());
        };
        let result = task.await;
        self.task = None;
        match result {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Ok(()),
            Err(_) => Err(RoomwatchError::ReactorStopped),
        }
    }

    /// Ask the reactor to stop and wait for it
    pub async fn stop(self) -> RoomwatchResult<()> {
        // Already-stopped reactors are fine here
        let _ = self.handle.shutdown();
        self.wait().await
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }
}
