use std::env;

use rust_decimal::Decimal;

use crate::domain::CirculationPolicy;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    /// Directory of legacy CSV files to import at startup, if any.
    pub import_dir: Option<String>,
    pub policy: CirculationPolicy,
}

impl Config {
    pub fn from_env() -> Self {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://library.db?mode=rwc".to_string());

        let mut policy = CirculationPolicy::default();
        if let Some(days) = env::var("LOAN_PERIOD_DAYS").ok().and_then(|v| v.parse().ok()) {
            policy.loan_period_days = days;
        }
        if let Some(rate) = env::var("DAILY_FINE_RATE")
            .ok()
            .and_then(|v| v.parse::<Decimal>().ok())
        {
            policy.daily_fine_rate = rate;
        }
        if let Some(max) = env::var("MAX_ACTIVE_LOANS").ok().and_then(|v| v.parse().ok()) {
            policy.max_active_loans = max;
        }
        if let Some(max) = env::var("MAX_CHECKIN_BATCH").ok().and_then(|v| v.parse().ok()) {
            policy.max_checkin_batch = max;
        }

        Self {
            database_url,
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(Vec::new),
            import_dir: env::var("IMPORT_DIR").ok(),
            policy,
        }
    }
}
