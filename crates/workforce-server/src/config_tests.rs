use std::sync::Mutex;

use super::*;

// Environment variables are process-global; serialize tests that touch them.
static ENV_LOCK: Mutex<()> = Mutex::new(());

#[test]
fn defaults_match_the_documented_values() {
    let _guard = ENV_LOCK.lock().unwrap();
    let config = RuntimeConfig::default();
    assert_eq!(config.pool_size, 4);
    assert_eq!(config.max_retries, 3);
    assert!(!config.quality_evaluation_enabled);
    assert_eq!(config.quality_threshold, 70);
}

#[test]
fn env_overrides_are_applied() {
    let _guard = ENV_LOCK.lock().unwrap();
    std::env::set_var("WORKFORCE_POOL_SIZE", "9");
    std::env::set_var("WORKFORCE_QUALITY_EVALUATION_ENABLED", "true");
    std::env::set_var("WORKFORCE_QUALITY_THRESHOLD", "55");

    let config = RuntimeConfig::load();
    assert_eq!(config.pool_size, 9);
    assert!(config.quality_evaluation_enabled);
    assert_eq!(config.quality_threshold, 55);

    std::env::remove_var("WORKFORCE_POOL_SIZE");
    std::env::remove_var("WORKFORCE_QUALITY_EVALUATION_ENABLED");
    std::env::remove_var("WORKFORCE_QUALITY_THRESHOLD");
}

#[test]
fn scheduler_config_mirrors_runtime_config() {
    let _guard = ENV_LOCK.lock().unwrap();
    let config = RuntimeConfig {
        pool_size: 2,
        max_retries: 5,
        ..RuntimeConfig::default()
    };
    let scheduler = config.scheduler_config();
    assert_eq!(scheduler.pool_size, 2);
    assert_eq!(scheduler.max_retries, 5);
}
