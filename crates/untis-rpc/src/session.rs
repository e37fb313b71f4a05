//! Authentication state machine for one set of credentials.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use untis_config::{CacheConfig, ServiceConfig};
use untis_core::{PersonType, SessionState};

use crate::context::CallContext;
use crate::error::RpcError;
use crate::reference::ReferenceCache;
use crate::transport::HttpTransport;
use crate::wire::{self, AuthenticateParams, AuthenticateResult, EmptyParams};

/// An authenticated (or not yet, or no longer) connection to the service.
///
/// ```text
/// unauthenticated ──authenticate──▶ authenticated ──close──▶ closed
/// ```
///
/// A closed session cannot be re-opened. Build a new one instead.
pub struct Session {
    transport: HttpTransport,
    username: String,
    password: String,
    client_name: String,
    state: SessionState,
    session_id: Option<String>,
    person_type: PersonType,
    person_id: i64,
    pub(crate) references: ReferenceCache,
}

impl Session {
    /// A fresh, unauthenticated session. `reference_ttl` of `None` disables
    /// the reference listing cache.
    #[must_use]
    pub fn new(
        transport: HttpTransport,
        username: impl Into<String>,
        password: impl Into<String>,
        reference_ttl: Option<Duration>,
    ) -> Self {
        Self {
            transport,
            username: username.into(),
            password: password.into(),
            client_name: ServiceConfig::default().client_name,
            state: SessionState::Unauthenticated,
            session_id: None,
            person_type: PersonType::Unknown,
            person_id: -1,
            references: ReferenceCache::new(reference_ttl),
        }
    }

    /// Build the transport and session from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::Network`] if the HTTP client cannot be built.
    pub fn from_config(
        service: &ServiceConfig,
        cache: &CacheConfig,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, RpcError> {
        let transport = HttpTransport::new(service)?;
        Ok(Self::new(transport, username, password, cache.reference_ttl())
            .with_client_name(service.client_name.clone()))
    }

    /// Client name reported to the service in `authenticate`.
    #[must_use]
    pub fn with_client_name(mut self, client_name: impl Into<String>) -> Self {
        self.client_name = client_name.into();
        self
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state == SessionState::Closed
    }

    /// Session token. Present exactly while the session is authenticated.
    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    #[must_use]
    pub const fn person_type(&self) -> PersonType {
        self.person_type
    }

    /// Person id of the logged-in account, `-1` before authentication.
    #[must_use]
    pub const fn person_id(&self) -> i64 {
        self.person_id
    }

    /// Log in with the stored credentials.
    ///
    /// # Errors
    ///
    /// [`RpcError::AlreadyAuthenticated`] unless the session is still
    /// unauthenticated. Any transport or decode failure, including
    /// [`RpcError::IdentifierMismatch`], leaves the session unauthenticated.
    pub async fn authenticate(&mut self, ctx: &CallContext) -> Result<(), RpcError> {
        if self.state != SessionState::Unauthenticated {
            return Err(RpcError::AlreadyAuthenticated);
        }

        let params = AuthenticateParams {
            user: &self.username,
            password: &self.password,
            client: &self.client_name,
        };
        let (body, request_id) = self
            .transport
            .send(ctx, "authenticate", &params, None)
            .await?;
        let result: AuthenticateResult = wire::decode(&body, request_id)?;
        if result.session_id.trim().is_empty() {
            return Err(RpcError::MalformedResponse(
                "authenticate returned an empty sessionId".to_owned(),
            ));
        }

        self.state = self.state.transition(SessionState::Authenticated)?;
        self.session_id = Some(result.session_id);
        self.person_type = PersonType::from_code(result.person_type);
        self.person_id = result.person_id;

        tracing::info!(
            username = %self.username,
            person_type = %self.person_type,
            person_id = self.person_id,
            "session authenticated"
        );
        Ok(())
    }

    /// Log out and mark the session closed.
    ///
    /// Once `logout` is on its way the session is closed and its token
    /// dropped, so it ends up closed even if the round trip fails. The
    /// content of the logout result is ignored.
    ///
    /// # Errors
    ///
    /// [`RpcError::NotAuthenticated`] unless the session is authenticated.
    /// A context that is already cancelled or expired fails with the session
    /// still authenticated. Otherwise any transport failure of the logout
    /// call.
    pub async fn close(&mut self, ctx: &CallContext) -> Result<(), RpcError> {
        if self.state != SessionState::Authenticated {
            return Err(RpcError::NotAuthenticated);
        }
        ctx.check()?;

        self.state = self.state.transition(SessionState::Closed)?;
        let token = self.session_id.take();
        self.references.clear();

        self.transport
            .send(ctx, "logout", &EmptyParams {}, token.as_deref())
            .await?;

        tracing::info!(username = %self.username, "session closed");
        Ok(())
    }

    pub(crate) fn ensure_authenticated(&self) -> Result<(), RpcError> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(RpcError::NotAuthenticated)
        }
    }

    /// Authenticated call: sends with the session cookie and decodes the
    /// typed result.
    pub(crate) async fn call<P, T>(
        &self,
        ctx: &CallContext,
        method: &str,
        params: &P,
    ) -> Result<T, RpcError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.ensure_authenticated()?;
        let (body, request_id) = self
            .transport
            .send(ctx, method, params, self.session_id.as_deref())
            .await?;
        wire::decode(&body, request_id)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("endpoint", &self.transport.endpoint())
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("client_name", &self.client_name)
            .field("state", &self.state)
            .field("session_id", &self.session_id.as_ref().map(|_| "[REDACTED]"))
            .field("person_type", &self.person_type)
            .field("person_id", &self.person_id)
            .finish_non_exhaustive()
    }
}
