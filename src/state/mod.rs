//! Client session state.
//!
//! SYSTEM CONTEXT
//! ==============
//! `session` holds the shared authentication state, `store` runs the async
//! operations that mutate it, and `permission` evaluates capabilities over the
//! held identity.

pub mod permission;
pub mod session;
pub mod store;

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use tokio::sync::Notify;

    use crate::net::api::{ApiError, AuthApi};
    use crate::net::types::{CheckResponse, Credentials, LoginResponse, MessageResponse, Permissions, User};

    /// A non-admin user with every explicit grant off.
    #[must_use]
    pub fn reader_user() -> User {
        User {
            id: 11,
            username: "reader".into(),
            email: Some("reader@example.test".into()),
            first_name: None,
            last_name: None,
            full_name: None,
            display_name: Some("reader".into()),
            is_admin: false,
            is_active: true,
            permissions: Permissions::default(),
            created_at: None,
            last_login: None,
        }
    }

    /// A non-admin editor who may create, edit and upload.
    #[must_use]
    pub fn editor_user() -> User {
        User {
            id: 12,
            username: "editor".into(),
            permissions: Permissions { can_edit: true, can_create: true, can_delete: false, can_upload: true },
            ..reader_user()
        }
    }

    /// An administrator with no explicit grants.
    #[must_use]
    pub fn admin_user() -> User {
        User { id: 1, username: "admin".into(), is_admin: true, ..reader_user() }
    }

    #[must_use]
    pub fn credentials() -> Credentials {
        Credentials::new("reader", "hunter2")
    }

    pub fn login_ok(user: User) -> Result<LoginResponse, ApiError> {
        Ok(LoginResponse { message: Some("Login successful".into()), user })
    }

    pub fn check_authenticated(user: User) -> Result<CheckResponse, ApiError> {
        Ok(CheckResponse { authenticated: true, user: Some(user) })
    }

    pub fn check_anonymous() -> Result<CheckResponse, ApiError> {
        Ok(CheckResponse { authenticated: false, user: None })
    }

    #[must_use]
    pub fn server_error(status: u16, message: &str) -> ApiError {
        ApiError::Response { status, message: Some(message.into()) }
    }

    #[must_use]
    pub fn transport_error() -> ApiError {
        ApiError::Request("connection refused".into())
    }

    // =========================================================================
    // MockAuthApi
    // =========================================================================

    /// Scripted [`AuthApi`]. Each call pops the next queued result; an empty
    /// queue answers with a transport error. A `check_session` with an empty
    /// queue repeats the last scripted check result instead, so repeated boot
    /// checks see an unchanged remote state.
    #[derive(Default)]
    pub struct MockAuthApi {
        login: Mutex<VecDeque<Result<LoginResponse, ApiError>>>,
        logout: Mutex<VecDeque<Result<MessageResponse, ApiError>>>,
        check: Mutex<VecDeque<Result<CheckResponse, ApiError>>>,
        last_check: Mutex<Option<Result<CheckResponse, ApiError>>>,
        me: Mutex<VecDeque<Result<User, ApiError>>>,
        login_gate: Option<Arc<Notify>>,
        login_calls: AtomicUsize,
        logout_calls: AtomicUsize,
        check_calls: AtomicUsize,
        me_calls: AtomicUsize,
    }

    impl MockAuthApi {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Hold every `login` call until `gate` is notified.
        #[must_use]
        pub fn with_login_gate(mut self, gate: Arc<Notify>) -> Self {
            self.login_gate = Some(gate);
            self
        }

        pub fn push_login(&self, result: Result<LoginResponse, ApiError>) {
            self.login.lock().unwrap().push_back(result);
        }

        pub fn push_logout(&self, result: Result<MessageResponse, ApiError>) {
            self.logout.lock().unwrap().push_back(result);
        }

        pub fn push_check(&self, result: Result<CheckResponse, ApiError>) {
            self.check.lock().unwrap().push_back(result);
        }

        pub fn push_me(&self, result: Result<User, ApiError>) {
            self.me.lock().unwrap().push_back(result);
        }

        pub fn login_calls(&self) -> usize {
            self.login_calls.load(Ordering::SeqCst)
        }

        pub fn logout_calls(&self) -> usize {
            self.logout_calls.load(Ordering::SeqCst)
        }

        pub fn check_calls(&self) -> usize {
            self.check_calls.load(Ordering::SeqCst)
        }

        pub fn me_calls(&self) -> usize {
            self.me_calls.load(Ordering::SeqCst)
        }
    }

    fn unscripted<T>() -> Result<T, ApiError> {
        Err(ApiError::Request("no scripted response".into()))
    }

    #[async_trait::async_trait]
    impl AuthApi for MockAuthApi {
        async fn login(&self, _credentials: &Credentials) -> Result<LoginResponse, ApiError> {
            self.login_calls.fetch_add(1, Ordering::SeqCst);
            let result = self.login.lock().unwrap().pop_front();
            if let Some(gate) = &self.login_gate {
                gate.notified().await;
            }
            result.unwrap_or_else(unscripted)
        }

        async fn logout(&self) -> Result<MessageResponse, ApiError> {
            self.logout_calls.fetch_add(1, Ordering::SeqCst);
            let result = self.logout.lock().unwrap().pop_front();
            result.unwrap_or_else(unscripted)
        }

        async fn check_session(&self) -> Result<CheckResponse, ApiError> {
            self.check_calls.fetch_add(1, Ordering::SeqCst);
            let next = self.check.lock().unwrap().pop_front();
            let mut last = self.last_check.lock().unwrap();
            match next {
                Some(result) => {
                    *last = Some(result.clone());
                    result
                }
                None => last.clone().unwrap_or_else(unscripted),
            }
        }

        async fn current_user(&self) -> Result<User, ApiError> {
            self.me_calls.fetch_add(1, Ordering::SeqCst);
            let result = self.me.lock().unwrap().pop_front();
            result.unwrap_or_else(unscripted)
        }
    }
}
