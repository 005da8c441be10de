//! Ball sandbox in a 1280x720 window
//!
//! Same controls as the fullscreen sandbox.

use sandbox::{app, SandboxConfig};

fn main() -> anyhow::Result<()> {
    common::init_logging();
    app::run_balls(SandboxConfig::windowed())
}
