//! Shared helpers for domain tests: config construction from explicit flags
//! and a process-wide generated service account key (RSA key generation is
//! slow enough to be worth amortizing across tests).

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use rsa::pkcs8::{EncodePrivateKey, LineEnding};
use rsa::RsaPrivateKey;
use service::config::{Config, ServiceAccountKey};
use std::sync::OnceLock;

static TEST_PRIVATE_KEY_PEM: OnceLock<String> = OnceLock::new();

pub(crate) fn test_private_key_pem() -> &'static str {
    TEST_PRIVATE_KEY_PEM.get_or_init(|| {
        let mut rng = rand::thread_rng();
        let key = RsaPrivateKey::new(&mut rng, 2048).expect("generate test RSA key");
        key.to_pkcs8_pem(LineEnding::LF)
            .expect("encode test RSA key")
            .to_string()
    })
}

pub(crate) fn test_service_account_key() -> ServiceAccountKey {
    ServiceAccountKey {
        client_email: "scribe@clinical-scribe.iam.gserviceaccount.com".to_string(),
        private_key: test_private_key_pem().to_string(),
        token_uri: None,
        project_id: Some("clinical-scribe".to_string()),
    }
}

/// Base64-encoded service account key JSON, as the config expects it.
pub(crate) fn test_credentials_base64() -> String {
    let key = test_service_account_key();
    BASE64_STANDARD.encode(
        serde_json::json!({
            "client_email": key.client_email,
            "private_key": key.private_key,
            "project_id": key.project_id,
        })
        .to_string(),
    )
}

/// Builds a Config from explicit CLI flags only, so tests are independent of
/// the surrounding environment.
pub(crate) fn config_from_args(args: &[(&str, &str)]) -> Config {
    use clap::Parser;
    let mut argv: Vec<String> = vec!["clinical_scribe_rs".to_string()];
    for (flag, value) in args {
        argv.push((*flag).to_string());
        argv.push((*value).to_string());
    }
    Config::try_parse_from(argv).expect("test config should parse")
}

/// A config wired for mock-server tests: credentials plus every provider
/// base URL pointed at `server_url`.
pub(crate) fn mock_provider_config(server_url: &str, extra: &[(&str, &str)]) -> Config {
    let credentials = test_credentials_base64();
    let token_url = format!("{server_url}/token");
    let mut args: Vec<(&str, &str)> = vec![
        ("--gcp-project-id", "clinical-scribe"),
        ("--gcs-bucket", "scribe-audio"),
        ("--google-application-credentials-json", &credentials),
        ("--oauth-token-url", &token_url),
        ("--storage-base-url", server_url),
        ("--speech-base-url", server_url),
        ("--vertex-base-url", server_url),
    ];
    args.extend_from_slice(extra);
    config_from_args(&args)
}
