use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,

    /// Whole-hour civil-time offset east of UTC (+9 at the origin site).
    pub utc_offset_hours: i32,

    /// Open shifts older than this are force-closed by the sweep.
    pub stale_shift_hours: i64,

    /// Minimum minutes between clock-in and clock-out; 0 disables the guard.
    pub min_shift_minutes: i64,

    /// Seconds between sweep passes; 0 runs the sweeps once at startup only.
    pub sweep_interval_secs: u64,

    // Rate limiting
    pub rate_work_per_min: u32,
    pub rate_admin_per_min: u32,

    pub api_prefix: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),

            utc_offset_hours: env::var("UTC_OFFSET_HOURS")
                .unwrap_or_else(|_| "9".to_string())
                .parse()
                .unwrap(),
            stale_shift_hours: env::var("STALE_SHIFT_HOURS")
                .unwrap_or_else(|_| "8".to_string())
                .parse()
                .unwrap(),
            min_shift_minutes: env::var("MIN_SHIFT_MINUTES")
                .unwrap_or_else(|_| "0".to_string()) // guard disabled by default
                .parse()
                .unwrap(),
            sweep_interval_secs: env::var("SWEEP_INTERVAL_SECS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()
                .unwrap(),

            rate_work_per_min: env::var("RATE_WORK_PER_MIN")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap(),
            rate_admin_per_min: env::var("RATE_ADMIN_PER_MIN")
                .unwrap_or_else(|_| "120".to_string())
                .parse()
                .unwrap(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
        }
    }
}
