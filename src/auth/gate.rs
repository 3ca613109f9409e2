use std::fmt;
use std::sync::Arc;

use crate::auth::{AuthorizationError, AuthorizationService};
use crate::types::PermissionLevel;

/// Length of a well-formed client key
pub const CLIENT_KEY_LENGTH: usize = 32;

/// How much of a client key may appear in logs
pub const CLIENT_KEY_PREVIEW_LENGTH: usize = 10;

/// Transport scheme of the inbound request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scheme {
    Https,
    Http,
    Other(String),
}

impl Scheme {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "https" => Scheme::Https,
            "http" => Scheme::Http,
            other => Scheme::Other(other.to_string()),
        }
    }

    pub fn is_secure(&self) -> bool {
        matches!(self, Scheme::Https)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Scheme::Https => "https",
            Scheme::Http => "http",
            Scheme::Other(s) => s,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the gate for a request that did not hit a system error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    /// Rejected before authorization was attempted (insecure transport)
    Forbidden,
    /// The authorization service said no
    Unauthorized,
}

/// Transport check in front of the authorization service
#[derive(Clone)]
pub struct AuthorizationGate {
    service: Arc<dyn AuthorizationService>,
}

impl AuthorizationGate {
    pub fn new(service: Arc<dyn AuthorizationService>) -> Self {
        Self { service }
    }

    /// Transport check alone; a client key sent over plain http is reported
    pub fn admits(&self, scheme: &Scheme, client_key: Option<&str>) -> bool {
        if scheme.is_secure() {
            return true;
        }
        if *scheme == Scheme::Http {
            if let Some(key) = client_key.filter(|k| looks_like_client_key(k)) {
                tracing::warn!(
                    "Client key beginning with {}... was received over an insecure connection",
                    key_preview(key)
                );
            }
        }
        false
    }

    /// Only https requests reach the authorization service
    ///
    /// Errors returned here are service failures and have already been logged.
    pub async fn check(
        &self,
        scheme: &Scheme,
        client_key: Option<&str>,
        required: &[PermissionLevel],
    ) -> Result<AccessDecision, AuthorizationError> {
        if !self.admits(scheme, client_key) {
            return Ok(AccessDecision::Forbidden);
        }

        match self.service.authorize(client_key, required).await {
            Ok(true) => Ok(AccessDecision::Allow),
            Ok(false) => Ok(AccessDecision::Unauthorized),
            Err(e) => {
                tracing::error!(
                    "Authorization service failed while checking permissions {:?}: {}",
                    required,
                    e
                );
                Err(e)
            }
        }
    }
}

fn looks_like_client_key(key: &str) -> bool {
    !key.trim().is_empty() && key.chars().count() == CLIENT_KEY_LENGTH
}

fn key_preview(key: &str) -> String {
    key.chars().take(CLIENT_KEY_PREVIEW_LENGTH).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::io;
    use std::sync::Mutex;

    struct Recording {
        answer: Option<bool>,
        calls: AtomicUsize,
        seen: Mutex<Vec<PermissionLevel>>,
    }

    impl Recording {
        fn new(answer: Option<bool>) -> Arc<Self> {
            Arc::new(Self {
                answer,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl AuthorizationService for Recording {
        async fn authorize(
            &self,
            _client_key: Option<&str>,
            required: &[PermissionLevel],
        ) -> Result<bool, AuthorizationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().extend_from_slice(required);
            self.answer
                .ok_or_else(|| AuthorizationError::Unavailable("backend down".into()))
        }
    }

    const KEY: &str = "0123456789abcdef0123456789abcdef";

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Run the transport check once under a subscriber that records its output
    fn logged_by(scheme: Scheme, key: Option<&str>) -> String {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let gate = AuthorizationGate::new(Recording::new(Some(true)));
        tracing::subscriber::with_default(subscriber, || {
            assert!(!gate.admits(&scheme, key));
        });
        logs.text()
    }

    #[test]
    fn test_insecure_key_warning_logs_only_a_preview() {
        let output = logged_by(Scheme::Http, Some(KEY));
        assert!(output.contains("WARN"));
        assert!(output.contains("0123456789..."));
        assert!(!output.contains(KEY));
        assert!(!output.contains("0123456789a"));
    }

    #[test]
    fn test_insecure_warning_needs_http_and_a_full_length_key() {
        assert_eq!(logged_by(Scheme::parse("ws"), Some(KEY)), "");
        assert_eq!(logged_by(Scheme::Http, Some("short-key")), "");
        assert_eq!(logged_by(Scheme::Http, None), "");
    }

    #[tokio::test]
    async fn test_insecure_transport_is_forbidden_without_asking() {
        let service = Recording::new(Some(true));
        let gate = AuthorizationGate::new(service.clone());

        for scheme in [Scheme::Http, Scheme::parse("ws"), Scheme::Http] {
            let decision = gate
                .check(&scheme, Some(KEY), &[PermissionLevel::Read])
                .await
                .unwrap();
            assert_eq!(decision, AccessDecision::Forbidden);
        }
        let decision = gate.check(&Scheme::Http, None, &[]).await.unwrap();
        assert_eq!(decision, AccessDecision::Forbidden);

        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_secure_transport_delegates() {
        let allow = AuthorizationGate::new(Recording::new(Some(true)));
        let deny = AuthorizationGate::new(Recording::new(Some(false)));

        assert_eq!(
            allow.check(&Scheme::Https, Some(KEY), &[]).await.unwrap(),
            AccessDecision::Allow
        );
        assert_eq!(
            deny.check(&Scheme::Https, Some(KEY), &[]).await.unwrap(),
            AccessDecision::Unauthorized
        );
    }

    #[tokio::test]
    async fn test_service_failure_is_not_a_denial() {
        let gate = AuthorizationGate::new(Recording::new(None));
        let result = gate
            .check(&Scheme::Https, Some(KEY), &[PermissionLevel::Admin])
            .await;
        assert!(matches!(result, Err(AuthorizationError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_every_required_level_is_forwarded() {
        let service = Recording::new(Some(true));
        let gate = AuthorizationGate::new(service.clone());
        let required = [PermissionLevel::Read, PermissionLevel::Write, PermissionLevel::Read];

        gate.check(&Scheme::Https, Some(KEY), &required).await.unwrap();
        assert_eq!(*service.seen.lock().unwrap(), required.to_vec());
    }

    #[test]
    fn test_key_preview_is_short() {
        assert!(looks_like_client_key(KEY));
        assert!(!looks_like_client_key("short"));
        assert_eq!(key_preview(KEY), "0123456789");
        assert_eq!(Scheme::parse("HTTPS"), Scheme::Https);
    }
}
