use onetap_api::config::{LaunchProfile, DEV_ENVIRONMENT};
use onetap_api::frameworks::server;

// Alternate launcher: picks the environment from the first argument (dev by
// default), exports it for the settings loader, and serves on the fixed
// 0.0.0.0:8000 bind with reload enabled only for dev.
fn main() {
    let environment = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEV_ENVIRONMENT.to_string());

    // Exported before the runtime spawns any threads.
    std::env::set_var("ENVIRONMENT", &environment);

    let profile = LaunchProfile::fixed(&environment);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build tokio runtime");

    runtime.block_on(server::run_with_profile(profile));
}
