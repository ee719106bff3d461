use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;
use winit::event_loop::{ControlFlow, EventLoop};

use key_dispatch::app::App;
use key_dispatch::build_info;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,key_dispatch=debug")),
        )
        .init();

    info!("{}", build_info::detailed_info());

    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::from_env();
    event_loop
        .run_app(&mut app)
        .context("Failed to run event loop")?;

    Ok(())
}
