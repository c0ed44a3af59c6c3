use std::env;

const DEFAULT_INDEX_DAYS: i64 = 7;
const MAX_INDEX_DAYS: i64 = 31;

/// Rendering knobs for the index grid, read from the environment once at
/// startup and handed to the rendering layer. The aggregation core takes
/// no configuration.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    pub index_days: i64,
    pub reverse_days: bool,
    pub show_count: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            index_days: DEFAULT_INDEX_DAYS,
            reverse_days: false,
            show_count: true,
        }
    }
}

impl IndexConfig {
    pub fn from_env() -> Self {
        let index_days = env::var("HABIT_INDEX_DAYS")
            .ok()
            .and_then(|value| value.parse::<i64>().ok())
            .map(|days| days.clamp(1, MAX_INDEX_DAYS))
            .unwrap_or(DEFAULT_INDEX_DAYS);

        Self {
            index_days,
            reverse_days: env_flag("HABIT_INDEX_REVERSE", false),
            show_count: env_flag("HABIT_INDEX_SHOW_COUNT", true),
        }
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(value) => matches!(value.trim(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}
