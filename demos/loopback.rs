//! Frame and parent endpoint talking over the in-memory host.
//!
//! Demonstrates:
//! - Binding a bridge and the load announcement
//! - Visible-size, window-size and resize requests
//! - A parent endpoint answering from fixed window metrics
//! - Driving both sides with the async delivery loop
//!
//! Usage:
//!   cargo run --example loopback
//!   cargo run --example loopback -- --debug

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use frame_messenger::{
    ElementSize, FrameBridge, FrameEvent, MemoryHost, NamedFields, ParentEndpoint, ParentPort,
};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Constants
// ============================================================================

/// How long the parent waits for another frame message before hanging up.
const IDLE_TIMEOUT: Duration = Duration::from_millis(100);

const WINDOW: NamedFields = NamedFields {
    window_width: 1280.0,
    window_height: 720.0,
    scroll_top: 240.0,
    scroll_left: 0.0,
    frame_top: 180.0,
    frame_left: 0.0,
    frame_width: 960.0,
    frame_height: 2400.0,
};

// ============================================================================
// Main
// ============================================================================

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let debug = std::env::args().any(|a| a == "--debug");
    init_logging(debug);

    if let Err(e) = run().await {
        eprintln!("\n[ERROR] {e}");
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let filter = if debug {
        "frame_messenger=trace"
    } else {
        "frame_messenger=debug"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();
}

async fn run() -> anyhow::Result<()> {
    println!("=== Loopback ===\n");

    let (host, port) = MemoryHost::builder().path("/offers?page=2").build();
    let sender = port.sender();
    let endpoint = ParentEndpoint::new(move |data| sender.send(data));

    let bridge = FrameBridge::builder()
        .host(host)
        .scroll_to_frame(true)
        .build()?;

    println!("[Frame] capabilities: {:?}", bridge.capabilities());
    bridge.bind();

    bridge.request_window_size(|fields| {
        println!("[Frame] window is {}x{}", fields.window_width, fields.window_height);
    })?;

    bridge.center_element(ElementSize::new(320.0, 200.0), WINDOW.window_width, |placement| {
        println!(
            "[Frame] dialog goes at top={} left={}",
            placement.top, placement.left
        );
    })?;

    bridge.request_resize_callback(|fields| {
        println!("[Frame] parent resized to width {}", fields.window_width);
    })?;

    bridge.show_loader()?;
    bridge.hide_loader()?;

    let (delivered, handled) = tokio::join!(bridge.host().run(), parent(port, endpoint));
    let handled = handled?;

    println!("\n[Done] parent handled {handled} messages, frame received {delivered}");
    Ok(())
}

/// Answers frame messages until the frame goes quiet.
async fn parent(mut port: ParentPort, endpoint: ParentEndpoint) -> anyhow::Result<usize> {
    let mut handled = 0;

    while let Ok(Some(message)) = tokio::time::timeout(IDLE_TIMEOUT, port.recv()).await {
        let Some(event) = endpoint.handle(&message.data) else {
            println!("[Parent] ignored {:?}", message.data);
            continue;
        };
        println!("[Parent] {event:?}");
        handled += 1;

        match event {
            FrameEvent::FrameVisibleSizeRequested => {
                endpoint.reply_visible_size(WINDOW.visible_area())?;
            }
            FrameEvent::WindowSizeRequested => endpoint.reply_window_size(&WINDOW)?,
            FrameEvent::ResizeSubscribed => {
                let narrow = NamedFields {
                    window_width: 1024.0,
                    ..WINDOW
                };
                endpoint.notify_resize(&narrow)?;
            }
            _ => {}
        }
    }

    // Dropping the port and endpoint closes the frame's inbound channel.
    Ok(handled)
}
