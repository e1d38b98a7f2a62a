use std::sync::Arc;

use auth::Authenticator;
use auth::JwtError;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::Method;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::handlers::error_response;

/// Caller identity bound into request extensions by the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub username: Username,
}

/// Why the gate refused a request. Every reason answers 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateRejection {
    MissingCredentials,
    MalformedToken,
    InvalidSignature,
    UnknownPrincipal,
    ExpiredToken,
}

impl GateRejection {
    pub fn message(&self) -> &'static str {
        match self {
            GateRejection::MissingCredentials => "Missing or invalid Authorization header",
            GateRejection::MalformedToken => "Invalid or malformed token",
            GateRejection::InvalidSignature => "Token signature could not be verified",
            GateRejection::UnknownPrincipal => "User authentication failed",
            GateRejection::ExpiredToken => "Expired or invalid token",
        }
    }
}

/// Terminal state of a gate evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    Bypassed,
    Authenticated(AuthenticatedUser),
    Rejected(GateRejection),
}

/// Request-time authentication gate.
///
/// Checks run in a fixed order and the first one that decides wins:
/// an already bound identity, CORS preflight, the public path allowlist,
/// the bearer header, token decoding, principal lookup, then expiry and
/// subject match.
pub struct AuthGate {
    authenticator: Arc<Authenticator>,
    users: Arc<dyn UserRepository>,
    public_prefixes: Vec<String>,
}

impl AuthGate {
    pub fn new(
        authenticator: Arc<Authenticator>,
        users: Arc<dyn UserRepository>,
        public_prefixes: Vec<String>,
    ) -> Self {
        Self {
            authenticator,
            users,
            public_prefixes,
        }
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.public_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    pub async fn evaluate(&self, parts: &Parts) -> GateOutcome {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return GateOutcome::Authenticated(user.clone());
        }

        if parts.method == Method::OPTIONS || self.is_public(parts.uri.path()) {
            return GateOutcome::Bypassed;
        }

        let Some(token) = bearer_token(parts) else {
            return GateOutcome::Rejected(GateRejection::MissingCredentials);
        };

        let claims = match self.authenticator.decode_token(token) {
            Ok(claims) => claims,
            Err(JwtError::InvalidSignature) => {
                return GateOutcome::Rejected(GateRejection::InvalidSignature)
            }
            Err(e) => {
                tracing::debug!(error = %e, "Token could not be decoded");
                return GateOutcome::Rejected(GateRejection::MalformedToken);
            }
        };

        let Ok(username) = Username::new(claims.sub) else {
            return GateOutcome::Rejected(GateRejection::UnknownPrincipal);
        };

        let user = match self.users.find_by_username(&username).await {
            Ok(Some(user)) => user,
            Ok(None) => return GateOutcome::Rejected(GateRejection::UnknownPrincipal),
            Err(e) => {
                tracing::warn!(error = %e, "Principal lookup failed");
                return GateOutcome::Rejected(GateRejection::UnknownPrincipal);
            }
        };

        if !self
            .authenticator
            .is_token_valid_for(token, user.username.as_str())
        {
            return GateOutcome::Rejected(GateRejection::ExpiredToken);
        }

        GateOutcome::Authenticated(AuthenticatedUser {
            user_id: user.id,
            username: user.username,
        })
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();

    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Middleware that runs the gate and binds the caller identity on success.
///
/// Rejected requests are answered here; the inner service never sees them.
pub async fn authenticate(State(gate): State<Arc<AuthGate>>, req: Request, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    match gate.evaluate(&parts).await {
        GateOutcome::Bypassed => {}
        GateOutcome::Authenticated(user) => {
            parts.extensions.insert(user);
        }
        GateOutcome::Rejected(rejection) => {
            tracing::warn!(
                method = %parts.method,
                path = %parts.uri.path(),
                reason = ?rejection,
                "Request rejected by authentication gate"
            );
            return error_response(StatusCode::UNAUTHORIZED, rejection.message());
        }
    }

    next.run(Request::from_parts(parts, body)).await
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicBool;
    use std::sync::atomic::Ordering;

    use async_trait::async_trait;
    use auth::TokenConfig;
    use axum::body::Body;
    use axum::middleware;
    use axum::routing::get;
    use axum::Extension;
    use axum::Router;
    use chrono::Duration;
    use http_body_util::BodyExt;
    use mockall::mock;
    use tower::ServiceExt;

    use super::*;
    use crate::config::default_public_prefixes;
    use crate::domain::user::models::User;
    use crate::outbound::repositories::InMemoryUserRepository;
    use crate::user::errors::UserError;

    const SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

    mock! {
        pub FailingUserRepository {}

        #[async_trait]
        impl UserRepository for FailingUserRepository {
            async fn create(&self, user: User) -> Result<User, UserError>;
            async fn find_by_username(
                &self,
                username: &Username,
            ) -> Result<Option<User>, UserError>;
            async fn exists(&self, username: &Username) -> Result<bool, UserError>;
            async fn update(&self, user: User) -> Result<User, UserError>;
        }
    }

    fn authenticator(ttl: Duration) -> Arc<Authenticator> {
        Arc::new(Authenticator::new(TokenConfig::new(SECRET, ttl)))
    }

    async fn gate_with(names: &[&str], authenticator: Arc<Authenticator>) -> AuthGate {
        let users = InMemoryUserRepository::new();
        for name in names {
            users
                .create(User::new(
                    Username::new(name.to_string()).unwrap(),
                    "hash".to_string(),
                ))
                .await
                .unwrap();
        }

        AuthGate::new(authenticator, Arc::new(users), default_public_prefixes())
    }

    fn parts(method: Method, path: &str, authorization: Option<&str>) -> Parts {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_public_paths_and_preflight_bypass() {
        let gate = gate_with(&[], authenticator(Duration::hours(1))).await;

        for path in ["/api/auth/login", "/api/auth/register", "/health", "/error"] {
            assert_eq!(
                gate.evaluate(&parts(Method::POST, path, None)).await,
                GateOutcome::Bypassed
            );
        }
        assert_eq!(
            gate.evaluate(&parts(Method::OPTIONS, "/api/tasks", None)).await,
            GateOutcome::Bypassed
        );
    }

    #[tokio::test]
    async fn test_missing_or_non_bearer_header_is_rejected() {
        let gate = gate_with(&["alice"], authenticator(Duration::hours(1))).await;

        let headers = [
            None,
            Some("Token xyz"),
            Some("Bearer "),
            Some("Bearer    "),
            Some("bearer abc"),
        ];
        for header in headers {
            assert_eq!(
                gate.evaluate(&parts(Method::GET, "/api/tasks", header)).await,
                GateOutcome::Rejected(GateRejection::MissingCredentials)
            );
        }
    }

    #[tokio::test]
    async fn test_undecodable_tokens_are_rejected() {
        let gate = gate_with(&["alice"], authenticator(Duration::hours(1))).await;

        assert_eq!(
            gate.evaluate(&parts(Method::GET, "/api/tasks", Some("Bearer not-a-token"))).await,
            GateOutcome::Rejected(GateRejection::MalformedToken)
        );

        let foreign = Authenticator::new(TokenConfig::new(
            b"another-secret-key-that-is-also-32-bytes!",
            Duration::hours(1),
        ))
        .issue_token("alice")
        .unwrap();
        let header = format!("Bearer {}", foreign);
        assert_eq!(
            gate.evaluate(&parts(Method::GET, "/api/tasks", Some(&header))).await,
            GateOutcome::Rejected(GateRejection::InvalidSignature)
        );
    }

    #[tokio::test]
    async fn test_unknown_principal_is_rejected() {
        let authenticator = authenticator(Duration::hours(1));
        let gate = gate_with(&["alice"], Arc::clone(&authenticator)).await;

        let header = format!("Bearer {}", authenticator.issue_token("mallory").unwrap());
        assert_eq!(
            gate.evaluate(&parts(Method::GET, "/api/tasks", Some(&header))).await,
            GateOutcome::Rejected(GateRejection::UnknownPrincipal)
        );
    }

    #[tokio::test]
    async fn test_store_failure_is_rejected_as_unknown_principal() {
        let authenticator = authenticator(Duration::hours(1));
        let mut users = MockFailingUserRepository::new();
        users
            .expect_find_by_username()
            .returning(|_| Err(UserError::DatabaseError("connection reset".into())));

        let gate = AuthGate::new(
            Arc::clone(&authenticator),
            Arc::new(users),
            default_public_prefixes(),
        );

        let header = format!("Bearer {}", authenticator.issue_token("alice").unwrap());
        assert_eq!(
            gate.evaluate(&parts(Method::GET, "/api/tasks", Some(&header))).await,
            GateOutcome::Rejected(GateRejection::UnknownPrincipal)
        );
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let authenticator = authenticator(Duration::zero());
        let gate = gate_with(&["alice"], Arc::clone(&authenticator)).await;

        let header = format!("Bearer {}", authenticator.issue_token("alice").unwrap());
        assert_eq!(
            gate.evaluate(&parts(Method::GET, "/api/tasks", Some(&header))).await,
            GateOutcome::Rejected(GateRejection::ExpiredToken)
        );
    }

    #[tokio::test]
    async fn test_valid_token_authenticates() {
        let authenticator = authenticator(Duration::hours(1));
        let gate = gate_with(&["alice"], Arc::clone(&authenticator)).await;

        let header = format!("Bearer {}", authenticator.issue_token("alice").unwrap());
        match gate
            .evaluate(&parts(Method::GET, "/api/tasks", Some(&header)))
            .await
        {
            GateOutcome::Authenticated(user) => assert_eq!(user.username.as_str(), "alice"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_bound_identity_is_not_rechecked() {
        let gate = gate_with(&[], authenticator(Duration::hours(1))).await;

        let bound = AuthenticatedUser {
            user_id: UserId::new(),
            username: Username::new("alice".to_string()).unwrap(),
        };
        let mut request = parts(Method::GET, "/api/tasks", None);
        request.extensions.insert(bound.clone());

        assert_eq!(
            gate.evaluate(&request).await,
            GateOutcome::Authenticated(bound)
        );
    }

    fn guarded_router(gate: AuthGate, invoked: Arc<AtomicBool>) -> Router {
        Router::new()
            .route(
                "/api/tasks",
                get(move |Extension(user): Extension<AuthenticatedUser>| {
                    let invoked = Arc::clone(&invoked);
                    async move {
                        invoked.store(true, Ordering::SeqCst);
                        user.username.to_string()
                    }
                }),
            )
            .layer(middleware::from_fn_with_state(Arc::new(gate), authenticate))
    }

    #[tokio::test]
    async fn test_rejected_request_never_reaches_handler() {
        let gate = gate_with(&["alice"], authenticator(Duration::hours(1))).await;
        let invoked = Arc::new(AtomicBool::new(false));

        let response = guarded_router(gate, Arc::clone(&invoked))
            .oneshot(
                Request::builder()
                    .uri("/api/tasks")
                    .header(AUTHORIZATION, "Token xyz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(!invoked.load(Ordering::SeqCst));

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Missing or invalid Authorization header");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_authenticated_request_binds_identity() {
        let authenticator = authenticator(Duration::hours(1));
        let gate = gate_with(&["alice"], Arc::clone(&authenticator)).await;
        let invoked = Arc::new(AtomicBool::new(false));

        let token = authenticator.issue_token("alice").unwrap();
        let response = guarded_router(gate, Arc::clone(&invoked))
            .oneshot(
                Request::builder()
                    .uri("/api/tasks")
                    .header(AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(invoked.load(Ordering::SeqCst));

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"alice");
    }
}
