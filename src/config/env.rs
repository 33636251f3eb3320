use super::TrailConfig;

/// Apply `COLORTRAIL_*` environment overrides on top of a loaded config.
pub fn apply_env_overrides(config: &mut TrailConfig) {
    apply_overrides(config, |key| std::env::var(key).ok());
}

/// Same as [`apply_env_overrides`] with an arbitrary variable lookup.
///
/// Values that fail to parse are ignored and the loaded value stays.
pub fn apply_overrides<F>(config: &mut TrailConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("COLORTRAIL_BIND_ADDR") {
        if !v.trim().is_empty() {
            config.server.bind_addr = v.trim().to_string();
        }
    }
    if let Some(v) = lookup("COLORTRAIL_MAX_SESSIONS") {
        if let Ok(n) = v.parse::<usize>() {
            config.server.max_sessions = n;
        }
    }
    if let Some(v) = lookup("COLORTRAIL_BASE_SPEED_MS") {
        if let Ok(n) = v.parse::<u64>() {
            config.game.base_speed_ms = n;
        }
    }
    if let Some(v) = lookup("COLORTRAIL_MIN_SPEED_MS") {
        if let Ok(n) = v.parse::<u64>() {
            config.game.min_speed_ms = n;
        }
    }
}
