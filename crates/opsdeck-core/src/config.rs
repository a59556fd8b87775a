// ── Runtime connection configuration ──
//
// These types describe *how* to connect to an opsdeck server. They carry
// credential data and connection tuning, but never touch disk. The
// CLI/TUI constructs a `ServerConfig` and hands it in.

use secrecy::SecretString;
use url::Url;

/// How to authenticate with the server.
///
/// The admin API is session-based: login sets an access-token cookie that
/// subsequent requests carry automatically.
#[derive(Debug, Clone)]
pub enum AuthCredentials {
    Credentials {
        username: String,
        password: SecretString,
    },
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default)]
pub enum TlsVerification {
    /// System CA store (strict). Default.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed staging servers).
    DangerAcceptInvalid,
}

impl PartialEq for TlsVerification {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::SystemDefaults, Self::SystemDefaults)
            | (Self::DangerAcceptInvalid, Self::DangerAcceptInvalid) => true,
            (Self::CustomCa(a), Self::CustomCa(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for TlsVerification {}

/// Configuration for connecting to a single server.
///
/// Built by CLI/TUI, passed to `Controller` -- core never reads config files.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server URL (e.g., `https://admin.example.com`).
    pub url: Url,
    /// Authentication credentials.
    pub auth: AuthCredentials,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: std::time::Duration,
    /// How often to perform a full refresh (seconds). 0 = never.
    pub refresh_interval_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: "https://localhost:8443".parse().expect("static URL"),
            auth: AuthCredentials::Credentials {
                username: "admin".into(),
                password: SecretString::from(String::new()),
            },
            tls: TlsVerification::default(),
            timeout: std::time::Duration::from_secs(30),
            refresh_interval_secs: 60,
        }
    }
}
