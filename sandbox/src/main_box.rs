//! A single box dropped onto a ledge
//!
//! Controls:
//! - Click: Move the box under the cursor
//! - Left / Right arrows: Push the box sideways
//! - Mouse wheel: Turn the box a quarter
//! - Space: Pause
//! - Escape: Quit

use sandbox::{app, SandboxConfig};

fn main() -> anyhow::Result<()> {
    common::init_logging();
    app::run_falling_box(SandboxConfig::falling_box())
}
