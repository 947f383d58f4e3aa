// tests/common/mod.rs
use std::sync::Once;

static INIT: Once = Once::new();

/// Installs a `tracing_subscriber::fmt` subscriber once per test binary.
/// The library itself never installs one (§7A) — this is the harness
/// taking on that job, the same way a binary crate would.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
