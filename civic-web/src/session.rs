//! The session store: the one owner of "who is signed in".
//!
//! The store starts out loading, materialises the identity from the API once
//! at boot and is updated by sign-in, registration, verification and
//! sign-out. Everything else reads snapshots.

use civic_shared::models::{LoginRequest, RegisterRequest, Role, User, VerifyEmailRequest};
use futures::future::{FutureExt, LocalBoxFuture, Shared};
use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::{ApiError, IdentityApi, LoginKind};
use crate::scoped_path::PortalContext;

/// Snapshot of the current identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: Option<User>,
    /// True until the boot-time identity check has finished.
    pub loading: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }
}

impl Session {
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }

    #[must_use]
    pub fn is_super_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|user| user.is_super_admin)
    }

    #[must_use]
    pub fn is_volunteer(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_volunteer)
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(User::role)
    }
}

/// Failure surfaced to sign-in and registration forms.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("Unable to connect to server")]
    Unreachable,
    #[error("Unexpected response from server")]
    InvalidResponse,
    #[error("Not available on this portal")]
    Unsupported,
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Status { status, message } => Self::Rejected { status, message },
            ApiError::Transport(_) | ApiError::Url(_) => Self::Unreachable,
            ApiError::Decode(_) => Self::InvalidResponse,
            ApiError::Unsupported => Self::Unsupported,
        }
    }
}

/// Handle returned by [`SessionStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Listener = Rc<dyn Fn(&Session)>;

struct InFlight {
    generation: u64,
    check: Shared<LocalBoxFuture<'static, ()>>,
}

/// Owner of the [`Session`]. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct SessionStore {
    api: Rc<dyn IdentityApi>,
    state: Rc<RefCell<Session>>,
    // bumped whenever identity changes locally; older checks are discarded
    generation: Rc<Cell<u64>>,
    in_flight: Rc<RefCell<Option<InFlight>>>,
    listeners: Rc<RefCell<Vec<(SubscriptionId, Listener)>>>,
    next_listener: Rc<Cell<u64>>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &*self.state.borrow())
            .field("generation", &self.generation.get())
            .finish_non_exhaustive()
    }
}

impl PartialEq for SessionStore {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl SessionStore {
    pub fn new(api: Rc<dyn IdentityApi>) -> Self {
        Self {
            api,
            state: Rc::new(RefCell::new(Session::default())),
            generation: Rc::new(Cell::new(0)),
            in_flight: Rc::new(RefCell::new(None)),
            listeners: Rc::new(RefCell::new(Vec::new())),
            next_listener: Rc::new(Cell::new(0)),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Call `listener` after every state change.
    pub fn subscribe(&self, listener: impl Fn(&Session) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners.borrow_mut().retain(|(existing, _)| *existing != id);
    }

    /// Materialise the identity from the API.
    ///
    /// Concurrent callers share one request. Any failure means "no session".
    /// A local sign-in or sign-out while the request runs wins over its
    /// answer; the caller returns without asking again.
    pub async fn check_auth_status(&self) {
        self.join_or_start_check().await;
    }

    fn join_or_start_check(&self) -> Shared<LocalBoxFuture<'static, ()>> {
        let generation = self.generation.get();
        let mut slot = self.in_flight.borrow_mut();
        if let Some(in_flight) = slot.as_ref()
            && in_flight.generation == generation
        {
            return in_flight.check.clone();
        }

        let store = self.clone();
        let check = async move { store.run_identity_check(generation).await }
            .boxed_local()
            .shared();
        *slot = Some(InFlight {
            generation,
            check: check.clone(),
        });
        check
    }

    async fn run_identity_check(&self, generation: u64) {
        let result = self.api.me().await;
        {
            let mut slot = self.in_flight.borrow_mut();
            if slot.as_ref().is_some_and(|in_flight| in_flight.generation == generation) {
                slot.take();
            }
        }

        if generation != self.generation.get() {
            debug!(generation, "discarding identity check overtaken by a local change");
            return;
        }

        let user = match result {
            Ok(user) => {
                debug!(role = %user.role(), "identity check resolved a session");
                Some(user)
            }
            Err(err) => {
                debug!(error = %err, "identity check found no session");
                None
            }
        };
        self.update(|session| {
            session.user = user;
            session.loading = false;
        });
    }

    /// Sign in through the surface for `kind`.
    ///
    /// # Errors
    /// Returns the API's complaint as an [`AuthError`]; the session is left
    /// untouched in that case.
    pub async fn login(
        &self,
        kind: LoginKind,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        match self.api.login(kind, &request).await {
            Ok(user) => {
                info!(?kind, role = %user.role(), "signed in");
                self.replace_identity(Some(user.clone()));
                self.check_auth_status().await;
                Ok(user)
            }
            Err(err) => {
                warn!(?kind, error = %err, "sign in rejected");
                Err(err.into())
            }
        }
    }

    /// Create an account and sign it in.
    ///
    /// # Errors
    /// Returns [`AuthError::Unsupported`] for administrator registration and
    /// the API's complaint otherwise; the session is left untouched.
    pub async fn register(
        &self,
        kind: LoginKind,
        request: &RegisterRequest,
    ) -> Result<User, AuthError> {
        match self.api.register(kind, request).await {
            Ok(user) => {
                info!(?kind, role = %user.role(), "registered");
                self.replace_identity(Some(user.clone()));
                self.check_auth_status().await;
                Ok(user)
            }
            Err(err) => {
                warn!(?kind, error = %err, "registration rejected");
                Err(err.into())
            }
        }
    }

    /// Confirm an email address, then reload the identity.
    ///
    /// # Errors
    /// Returns the API's complaint if the token is rejected.
    pub async fn verify_email(&self, token: &str) -> Result<(), AuthError> {
        let request = VerifyEmailRequest {
            token: token.to_string(),
        };
        self.api.verify_email(&request).await.map_err(|err| {
            warn!(error = %err, "email verification rejected");
            AuthError::from(err)
        })?;
        self.refresh().await;
        Ok(())
    }

    /// Reload the identity, discarding any check already under way.
    ///
    /// The only path that sends a fresh request after a superseded one.
    pub async fn refresh(&self) {
        self.generation.set(self.generation.get() + 1);
        self.check_auth_status().await;
    }

    /// Sign out and return where the browser should go next.
    ///
    /// The local session is cleared even when the API call fails.
    pub async fn logout(&self, context: &PortalContext) -> String {
        if let Err(err) = self.api.logout().await {
            warn!(error = %err, "remote sign out failed; clearing local session anyway");
        }
        self.replace_identity(None);
        info!(portal = %context.portal, "signed out");
        context.login_path()
    }

    fn replace_identity(&self, user: Option<User>) {
        self.generation.set(self.generation.get() + 1);
        self.update(|session| {
            session.user = user;
            session.loading = false;
        });
    }

    fn update(&self, mutate: impl FnOnce(&mut Session)) {
        let snapshot = {
            let mut state = self.state.borrow_mut();
            mutate(&mut state);
            state.clone()
        };
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(&snapshot);
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
pub(crate) mod testing {
    use super::*;
    use async_trait::async_trait;
    use civic_shared::models::{AccountKind, UserId, VolunteerStatus};
    use std::collections::VecDeque;

    pub fn user_with(kind: AccountKind) -> User {
        User {
            id: Some(UserId::Number(1)),
            email: Some("someone@example.com".to_string()),
            name: None,
            kind,
            is_super_admin: matches!(kind, AccountKind::SuperAdmin),
        }
    }

    pub fn volunteer(status: VolunteerStatus) -> User {
        user_with(AccountKind::Volunteer { status })
    }

    /// Scripted identity API. Each call pops the next scripted reply.
    #[derive(Debug, Default)]
    pub struct FakeIdentityApi {
        pub me_replies: RefCell<VecDeque<Result<User, ApiError>>>,
        pub login_replies: RefCell<VecDeque<Result<User, ApiError>>>,
        pub logout_reply: RefCell<Option<ApiError>>,
        pub verify_reply: RefCell<Option<ApiError>>,
        pub me_calls: Cell<usize>,
        pub login_calls: RefCell<Vec<LoginKind>>,
        pub logout_calls: Cell<usize>,
        /// Yield once inside `me` so concurrent callers can overlap.
        pub yield_in_me: Cell<bool>,
    }

    impl FakeIdentityApi {
        pub fn answering_me(reply: Result<User, ApiError>) -> Self {
            let api = Self::default();
            api.me_replies.borrow_mut().push_back(reply);
            api
        }
    }

    #[async_trait(?Send)]
    impl IdentityApi for FakeIdentityApi {
        async fn me(&self) -> Result<User, ApiError> {
            self.me_calls.set(self.me_calls.get() + 1);
            if self.yield_in_me.get() {
                tokio::task::yield_now().await;
            }
            self.me_replies
                .borrow_mut()
                .pop_front()
                .unwrap_or(Err(ApiError::Status {
                    status: 401,
                    message: "Unauthorized".to_string(),
                }))
        }

        async fn login(&self, kind: LoginKind, _request: &LoginRequest) -> Result<User, ApiError> {
            self.login_calls.borrow_mut().push(kind);
            self.login_replies
                .borrow_mut()
                .pop_front()
                .unwrap_or(Err(ApiError::Transport("no reply scripted".to_string())))
        }

        async fn register(
            &self,
            kind: LoginKind,
            _request: &RegisterRequest,
        ) -> Result<User, ApiError> {
            match kind {
                LoginKind::Admin => Err(ApiError::Unsupported),
                LoginKind::User => Ok(user_with(AccountKind::User)),
                LoginKind::Volunteer => Ok(volunteer(VolunteerStatus::Pending)),
            }
        }

        async fn verify_email(&self, _request: &VerifyEmailRequest) -> Result<(), ApiError> {
            self.verify_reply.borrow_mut().take().map_or(Ok(()), Err)
        }

        async fn logout(&self) -> Result<(), ApiError> {
            self.logout_calls.set(self.logout_calls.get() + 1);
            self.logout_reply.borrow_mut().take().map_or(Ok(()), Err)
        }
    }
}
