//! Ball sandbox drawing each ball as a single point
//!
//! Useful to push the ball count far past what the full rendering can keep
//! at 60 Hz. No overlay; same controls as the fullscreen sandbox.

use sandbox::{app, SandboxConfig};

fn main() -> anyhow::Result<()> {
    common::init_logging();
    app::run_balls(SandboxConfig::points())
}
