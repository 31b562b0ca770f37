use std::net::{IpAddr, Ipv4Addr, SocketAddr};

// Environment label that enables the development profile.
pub const DEV_ENVIRONMENT: &str = "dev";

// Fixed bind used by the alternate launcher.
const FIXED_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const FIXED_PORT: u16 = 8000;

// Process-wide configuration, built once at startup and threaded through
// handler state. Values are read from the environment; optional ones fall
// back to defaults with a warning instead of aborting startup.
#[derive(Clone, Debug)]
pub struct Settings {
    pub app_name: String,
    pub version: String,
    pub environment: String,
    pub debug: bool,
    pub host: String,
    pub port: u16,
    pub api_v1_prefix: String,
    pub database_url: String,
    pub database_name: String,
}

impl Settings {
    // Build settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    // Build settings from an arbitrary key lookup. Tests use this to avoid
    // mutating process-wide environment variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| {
            tracing::warn!("cannot read `ENVIRONMENT`, defaulting to `dev`");
            DEV_ENVIRONMENT.to_string()
        });

        // Debug follows the environment unless overridden explicitly.
        let debug = match lookup("DEBUG") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "cannot parse `DEBUG`, deriving from environment");
                environment == DEV_ENVIRONMENT
            }),
            None => environment == DEV_ENVIRONMENT,
        };

        let app_name = lookup("APP_NAME").unwrap_or_else(|| "OneTap API".to_string());

        let version = lookup("APP_VERSION").unwrap_or_else(|| "1.0.0".to_string());

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = lookup("PORT")
            .unwrap_or_else(|| {
                tracing::warn!("cannot read `PORT`, defaulting to `8000`");
                "8000".to_string()
            })
            .parse()
            .unwrap_or_else(|err| {
                tracing::error!(?err, "cannot parse `PORT`, defaulting to 8000");
                8000
            });

        let api_v1_prefix = normalize_prefix(
            lookup("API_V1_PREFIX").unwrap_or_else(|| "/api/v1".to_string()),
        );

        let database_url = lookup("MONGODB_URI").unwrap_or_else(|| {
            tracing::warn!("cannot read `MONGODB_URI`, defaulting to local instance");
            "mongodb://localhost:27017".to_string()
        });

        let database_name = lookup("MONGODB_DATABASE").unwrap_or_else(|| "onetap".to_string());

        Settings {
            app_name,
            version,
            environment,
            debug,
            host,
            port,
            api_v1_prefix,
            database_url,
            database_name,
        }
    }
}

// Router nesting requires a leading slash; trailing slashes would produce
// double-slash paths when nested.
fn normalize_prefix(raw: String) -> String {
    let trimmed = raw.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/api/v1".to_string();
    }
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

// Where and how a launcher wants the listener started. `reload` mirrors the
// launch contract of the original deployment scripts; a compiled binary has
// no hot reload, so the flag only surfaces in startup logs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchProfile {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub reload: bool,
}

impl LaunchProfile {
    // Primary launcher: bind address from settings, reload tied to debug.
    pub fn from_settings(settings: &Settings) -> Self {
        LaunchProfile {
            environment: settings.environment.clone(),
            host: settings.host.clone(),
            port: settings.port,
            reload: settings.debug,
        }
    }

    // Alternate launcher: fixed bind, reload only for the dev label.
    pub fn fixed(environment: &str) -> Self {
        LaunchProfile {
            environment: environment.to_string(),
            host: FIXED_HOST.to_string(),
            port: FIXED_PORT,
            reload: environment == DEV_ENVIRONMENT,
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        let ip: IpAddr = self.host.parse()?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
