//! Tracing/logging bootstrap for catena.

use catena_kernel::settings::{LogFormat, TelemetrySettings};
use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

static INSTALLED: OnceCell<()> = OnceCell::new();

/// Install the global tracing subscriber once.
///
/// `RUST_LOG` wins over the configured filter; repeated calls (tests,
/// embedded use) are no-ops.
pub fn init(settings: &TelemetrySettings) {
    INSTALLED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(settings.filter.clone()));

        let installed = match settings.log_format {
            LogFormat::Json => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .try_init(),
            LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).try_init(),
        };

        if installed.is_err() {
            // A subscriber was installed out-of-band (e.g. by a test harness).
            tracing::debug!(target: "catena-telemetry", "subscriber already set, keeping it");
        }
    });
}
