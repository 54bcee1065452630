//! Profile view state: phase, loaded profile, busy flag of the membership
//! control, and the lifetime guard for late responses.
//!
//! Responses are applied when they arrive. A fetch and a toggle that overlap
//! are not coordinated, so whichever resolves last wins for the fields it
//! touches. Anything resolving after [`ProfileView::unmount`] (or after a
//! remount) is dropped without touching state or notifying.

use crate::{
    client::{ClientError, MembershipAction, MembershipStatus, ProfileClient, ProfileData},
    session::Notifier,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error};

pub const FETCH_FAILED_MESSAGE: &str = "Error fetching profile data";
pub const ACTION_FAILED_MESSAGE: &str = "Error performing membership action";
pub const ACTION_SUCCEEDED_MESSAGE: &str = "Membership updated";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewPhase {
    Loading,
    Ready,
    /// The session was rejected; the user has been sent to the login view.
    Redirected,
}

#[derive(Debug)]
struct ViewState {
    phase: ViewPhase,
    profile: Option<ProfileData>,
    action_busy: bool,
    mounted: bool,
    generation: u64,
}

/// Why a membership action was not sent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Skipped {
    NotReady,
    NoProfile,
    Busy,
    /// The control for this action is disabled in the current state.
    Unchanged,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    Applied(MembershipStatus),
    Skipped(Skipped),
    /// The response arrived after unmount and was dropped.
    Discarded,
}

#[derive(Debug)]
pub struct ProfileView {
    client: Arc<ProfileClient>,
    state: Mutex<ViewState>,
}

impl ProfileView {
    #[must_use]
    pub fn new(client: Arc<ProfileClient>) -> Self {
        Self {
            client,
            state: Mutex::new(ViewState {
                phase: ViewPhase::Loading,
                profile: None,
                action_busy: false,
                mounted: false,
                generation: 0,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notifier(&self) -> &dyn Notifier {
        self.client.capabilities().notifier.as_ref()
    }

    #[must_use]
    pub fn phase(&self) -> ViewPhase {
        self.state().phase
    }

    #[must_use]
    pub fn profile(&self) -> Option<ProfileData> {
        self.state().profile.clone()
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.state().mounted
    }

    #[must_use]
    pub fn is_action_busy(&self) -> bool {
        self.state().action_busy
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state().phase == ViewPhase::Loading
    }

    /// Action the single toggle control would send, once a profile is loaded.
    #[must_use]
    pub fn next_action(&self) -> Option<MembershipAction> {
        self.state().profile.as_ref().map(|profile| {
            if profile.membership_active.is_active() {
                MembershipAction::Deactivate
            } else {
                MembershipAction::Activate
            }
        })
    }

    #[must_use]
    pub fn can_perform(&self, action: MembershipAction) -> bool {
        let state = self.state();
        state.phase == ViewPhase::Ready
            && !state.action_busy
            && state
                .profile
                .as_ref()
                .is_some_and(|profile| action.applies_to(profile.membership_active))
    }

    /// Mounts the view and loads the profile. Mounting again starts from a
    /// clean state: in-flight responses of the previous mount are dropped.
    ///
    /// # Errors
    /// See [`ProfileView::refresh`].
    pub async fn mount(&self) -> Result<Option<ProfileData>, ClientError> {
        {
            let mut state = self.state();
            state.mounted = true;
            state.generation += 1;
            state.profile = None;
            state.action_busy = false;
        }
        self.refresh().await
    }

    /// Drops the profile and invalidates every in-flight response.
    pub fn unmount(&self) {
        let mut state = self.state();
        state.mounted = false;
        state.generation += 1;
        state.profile = None;
        state.action_busy = false;
        debug!("profile view unmounted");
    }

    /// Fetches the profile again. Without a session token nothing is sent and
    /// loading simply ends. Failures are surfaced through the notifier and
    /// also returned; a failed fetch leaves the current profile as it was.
    ///
    /// # Errors
    /// Whatever [`ProfileClient::fetch_profile`] returns.
    pub async fn refresh(&self) -> Result<Option<ProfileData>, ClientError> {
        let generation = {
            let mut state = self.state();
            if !state.mounted {
                return Ok(None);
            }
            state.phase = ViewPhase::Loading;
            state.generation
        };

        let result = self.client.fetch_profile().await;

        let mut state = self.state();
        if !state.mounted || state.generation != generation {
            debug!("discarding profile response for a stale view");
            return Ok(None);
        }

        match result {
            Ok(Some(profile)) => {
                state.phase = ViewPhase::Ready;
                state.profile = Some(profile.clone());
                Ok(Some(profile))
            }
            Ok(None) => {
                state.phase = ViewPhase::Ready;
                Ok(state.profile.clone())
            }
            Err(ClientError::AuthExpired) => {
                state.phase = ViewPhase::Redirected;
                state.profile = None;
                Err(ClientError::AuthExpired)
            }
            Err(err) => {
                state.phase = ViewPhase::Ready;
                drop(state);
                error!("Error fetching profile: {err}");
                self.notifier().error(FETCH_FAILED_MESSAGE);
                Err(err)
            }
        }
    }

    /// Runs a membership action from the view's control. Skips silently when
    /// the control would be disabled. On success only the membership field
    /// changes; on rejection or failure the profile stays as it was.
    ///
    /// # Errors
    /// [`ClientError::Rejected`], [`ClientError::AuthExpired`] or a transport
    /// error, each already surfaced to the user.
    pub async fn toggle_membership(
        &self,
        action: MembershipAction,
    ) -> Result<ToggleOutcome, ClientError> {
        let generation = {
            let mut state = self.state();
            let skipped = match (&state.profile, state.phase) {
                (_, ViewPhase::Loading | ViewPhase::Redirected) => Some(Skipped::NotReady),
                (None, ViewPhase::Ready) => Some(Skipped::NoProfile),
                _ if state.action_busy => Some(Skipped::Busy),
                (Some(profile), ViewPhase::Ready)
                    if !action.applies_to(profile.membership_active) =>
                {
                    Some(Skipped::Unchanged)
                }
                _ => None,
            };
            if let Some(reason) = skipped {
                debug!(?reason, "membership {action} skipped");
                return Ok(ToggleOutcome::Skipped(reason));
            }
            state.action_busy = true;
            state.generation
        };

        let result = self.client.toggle_membership(action).await;

        let mut state = self.state();
        if !state.mounted || state.generation != generation {
            debug!("discarding membership response for a stale view");
            return Ok(ToggleOutcome::Discarded);
        }
        state.action_busy = false;

        match result {
            Ok(change) => {
                if let Some(profile) = state.profile.as_mut() {
                    profile.membership_active = change.membership_active;
                }
                drop(state);
                let message = change.message.as_deref().unwrap_or(ACTION_SUCCEEDED_MESSAGE);
                self.notifier().success(message);
                Ok(ToggleOutcome::Applied(change.membership_active))
            }
            Err(ClientError::AuthExpired) => {
                state.phase = ViewPhase::Redirected;
                state.profile = None;
                Err(ClientError::AuthExpired)
            }
            Err(ClientError::Rejected(message)) => {
                drop(state);
                self.notifier().error(&message);
                Err(ClientError::Rejected(message))
            }
            Err(err) => {
                drop(state);
                error!("Error performing membership {action}: {err}");
                self.notifier().error(ACTION_FAILED_MESSAGE);
                Err(err)
            }
        }
    }
}
