use serde::Deserialize;

const PLACEHOLDER_JWT_SECRET: &str = "CHANGE_ME_JWT_SECRET";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    /// Postgres connection string. When unset the server runs on the in-memory store.
    pub database_url: Option<String>,
    /// HS256 secret used to verify session tokens.
    pub jwt_secret: String,
    /// Name of the cookie carrying the session token.
    pub auth_cookie: String,
    /// Frontend origin allowed to make credentialed CORS requests.
    pub frontend_origin: String,
    /// Emit logs as JSON lines instead of human-readable text.
    pub json_logs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            database_url: None,
            jwt_secret: PLACEHOLDER_JWT_SECRET.into(),
            auth_cookie: "token".into(),
            frontend_origin: "http://localhost:5173".into(),
            json_logs: false,
        }
    }
}

pub fn load() -> anyhow::Result<Config> {
    dotenvy::dotenv().ok();

    let defaults = Config::default();

    let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| PLACEHOLDER_JWT_SECRET.into());

    if jwt_secret == PLACEHOLDER_JWT_SECRET {
        let env_mode = std::env::var("APP_ENV")
            .or_else(|_| std::env::var("RUST_ENV"))
            .unwrap_or_default();
        if env_mode == "production" {
            anyhow::bail!(
                "JWT_SECRET is still the insecure placeholder. \
                 Set a real secret before running in production."
            );
        }
        eprintln!("⚠️  JWT_SECRET is not set — using insecure placeholder. Set a real secret for production.");
    }

    let frontend_origin = std::env::var("FRONTEND_ORIGIN").unwrap_or(defaults.frontend_origin);
    validate_origin(&frontend_origin)?;

    Ok(Config {
        port: std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.port),
        database_url: std::env::var("DATABASE_URL").ok().filter(|s| !s.trim().is_empty()),
        jwt_secret,
        auth_cookie: std::env::var("AUTH_COOKIE").unwrap_or(defaults.auth_cookie),
        frontend_origin,
        json_logs: std::env::var("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false),
    })
}

/// Credentialed CORS needs one concrete origin; a wildcard is refused by the browser and by tower-http.
pub fn validate_origin(origin: &str) -> anyhow::Result<()> {
    if origin.trim() == "*" {
        anyhow::bail!("FRONTEND_ORIGIN must be a single origin, not '*', because session cookies are sent with credentials");
    }
    Ok(())
}
