use std::sync::Once;

static INIT: Once = Once::new();

/// Shared test setup: tracing subscriber plus may coroutine stack size,
/// applied once per test binary.
pub fn init() {
    INIT.call_once(|| {
        mulligan::telemetry::init_tracing();
        may::config().set_stack_size(0x8000);
    });
}
