//! Ball sandbox, fullscreen with the status overlay
//!
//! Controls:
//! - Left click: Spawn balls (one at the cursor, or a random batch)
//! - Right click + drag: Grab a ball
//! - P / +: Spawn 10 more balls per click
//! - M / -: Spawn 10 fewer balls per click
//! - R: Remove every ball
//! - Space: Pause
//! - Escape: Quit

use sandbox::{app, SandboxConfig};

fn main() -> anyhow::Result<()> {
    common::init_logging();
    app::run_balls(SandboxConfig::fullscreen())
}
