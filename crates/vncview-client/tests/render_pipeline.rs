//! Integration tests for the render path and the async engine event pump.
//!
//! # Purpose
//!
//! The render contract is pull-based: the presentation layer calls
//! `render(viewport_w, viewport_h)` whenever it repaints and must always get
//! a usable answer: a letterboxed composite once frames are flowing, a
//! defined blank state before that, the last frame after close, and `None`
//! only for viewports that cannot be drawn at all.
//!
//! The pump tests verify the asynchronous delivery path: engine callbacks
//! pushed onto an mpsc channel from another task are routed into the session
//! in order, and dropping the channel ends the pump.

use std::sync::Arc;

use tokio::sync::mpsc;

use vncview_client::{
    spawn_event_pump, ConnectionState, EngineEvent, RecordingEngine, SessionConfig, SessionEvent,
    VncSession,
};
use vncview_core::viewport::local_to_remote;
use vncview_core::ScaleFilter;

fn solid(width: u32, height: u32, value: u8) -> Vec<u8> {
    vec![value; (width * height * 4) as usize]
}

/// A session streaming a solid 8x8 frame of the given byte value.
fn session_with_frame(
    value: u8,
) -> (Arc<RecordingEngine>, Arc<VncSession>) {
    let engine = Arc::new(RecordingEngine::new());
    let (session, _rx) = VncSession::new(
        engine.clone() as Arc<dyn vncview_client::ProtocolEngine>,
        SessionConfig::default(),
    );
    session.start().unwrap();
    session.handle_engine_event(EngineEvent::ConnectionMade { width: 8, height: 8 });
    session.handle_engine_event(EngineEvent::RectangleUpdate {
        x: 0,
        y: 0,
        width: 8,
        height: 8,
        pixels: solid(8, 8, value),
    });
    session.handle_engine_event(EngineEvent::UpdateFinished);
    (engine, session)
}

// ── Render contract ───────────────────────────────────────────────────────────

#[test]
fn test_render_before_any_frame_is_the_blank_state() {
    let engine = Arc::new(RecordingEngine::new());
    let (session, _rx) = VncSession::new(
        engine as Arc<dyn vncview_client::ProtocolEngine>,
        SessionConfig::default(),
    );

    let frame = session.render(32, 16).unwrap();
    assert_eq!((frame.width, frame.height), (32, 16));
    assert!(frame.data.iter().all(|&b| b == 0));
    assert!(frame.fit.is_degenerate());
    assert_eq!(frame.generation, 0);
}

#[test]
fn test_render_letterboxes_published_frame() {
    let (_engine, session) = session_with_frame(0x77);

    // 8x8 source in a 32x16 viewport: scale 2, centered horizontally.
    let frame = session.render(32, 16).unwrap();
    assert_eq!(frame.generation, 1);
    assert_eq!(frame.fit.scale, 2.0);
    assert_eq!((frame.fit.offset_x, frame.fit.offset_y), (8, 0));
    assert_eq!((frame.fit.scaled_width, frame.fit.scaled_height), (16, 16));

    let stride = 32 * 4;
    // Letterbox margin on the left of the first row is black...
    assert!(frame.data[..8 * 4].iter().all(|&b| b == 0));
    // ...the centered region carries the frame...
    assert!(frame.data[8 * 4..24 * 4].iter().all(|&b| b == 0x77));
    // ...and the margin on the right is black again.
    assert!(frame.data[24 * 4..stride].iter().all(|&b| b == 0));
}

#[test]
fn test_render_after_stop_yields_last_frame_without_panicking() {
    let (_engine, session) = session_with_frame(0x42);
    session.stop();

    let frame = session.render(8, 8).unwrap();
    assert_eq!(frame.generation, 1);
    assert!(frame.data.iter().all(|&b| b == 0x42));

    // Repeated renders on the closed session stay stable.
    let again = session.render(8, 8).unwrap();
    assert_eq!(again, frame);
}

#[test]
fn test_render_zero_area_viewport_is_none() {
    let (_engine, session) = session_with_frame(0x42);
    assert!(session.render(0, 8).is_none());
    assert!(session.render(8, 0).is_none());
}

#[test]
fn test_render_respects_configured_scale_filter() {
    let engine = Arc::new(RecordingEngine::new());
    let config = SessionConfig { scale_filter: ScaleFilter::Bilinear, ..SessionConfig::default() };
    let (session, _rx) = VncSession::new(
        engine as Arc<dyn vncview_client::ProtocolEngine>,
        config,
    );
    session.start().unwrap();
    session.handle_engine_event(EngineEvent::ConnectionMade { width: 2, height: 2 });

    // Left column dark, right column bright.
    let mut pixels = solid(1, 1, 0);
    pixels.extend_from_slice(&solid(1, 1, 200));
    pixels.extend_from_slice(&solid(1, 1, 0));
    pixels.extend_from_slice(&solid(1, 1, 200));
    session.handle_engine_event(EngineEvent::RectangleUpdate {
        x: 0,
        y: 0,
        width: 2,
        height: 2,
        pixels,
    });
    session.handle_engine_event(EngineEvent::UpdateFinished);

    // At 2x bilinear upscale the two inner columns are interpolated, so the
    // frame must contain values strictly between the two source levels.
    let frame = session.render(4, 4).unwrap();
    assert!(frame.data.iter().any(|&b| b > 0 && b < 200));
}

/// The presentation adapter translates local clicks with the fit transform
/// of the frame it just drew; the mapped coordinates land in remote space.
#[test]
fn test_pointer_translation_through_rendered_fit() {
    let (engine, session) = session_with_frame(0x10);

    let frame = session.render(32, 16).unwrap();
    // Click the bottom-right corner of the rendered (letterboxed) area.
    let (rx, ry) = local_to_remote(23, 15, 8, 8, &frame.fit);
    assert_eq!((rx, ry), (7, 7));

    session.pointer_event(rx, ry, vncview_core::ButtonMask::EMPTY);
    assert_eq!(
        engine.pointer_events.lock().unwrap().as_slice(),
        &[(7, 7, 0)]
    );
}

// ── Event pump ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_event_pump_routes_callbacks_in_order() {
    let engine = Arc::new(RecordingEngine::new());
    let (session, mut session_rx) = VncSession::new(
        engine.clone() as Arc<dyn vncview_client::ProtocolEngine>,
        SessionConfig::default(),
    );
    session.start().unwrap();

    let (tx, rx) = mpsc::unbounded_channel();
    let pump = spawn_event_pump(Arc::clone(&session), rx);

    tx.send(EngineEvent::ConnectionMade { width: 16, height: 16 }).unwrap();
    tx.send(EngineEvent::RectangleUpdate {
        x: 0,
        y: 0,
        width: 16,
        height: 16,
        pixels: solid(16, 16, 0x99),
    })
    .unwrap();
    tx.send(EngineEvent::UpdateFinished).unwrap();
    drop(tx); // engine gone: the pump drains the queue and exits

    pump.await.unwrap();

    assert_eq!(session.state(), ConnectionState::Streaming);
    assert_eq!(
        session_rx.recv().await.unwrap(),
        SessionEvent::SizeNegotiated { width: 16, height: 16 }
    );
    assert_eq!(
        session_rx.recv().await.unwrap(),
        SessionEvent::FrameCompleted { generation: 1 }
    );
}

#[tokio::test]
async fn test_stop_races_safely_with_pumped_updates() {
    let engine = Arc::new(RecordingEngine::new());
    let (session, _rx) = VncSession::new(
        engine.clone() as Arc<dyn vncview_client::ProtocolEngine>,
        SessionConfig::default(),
    );
    session.start().unwrap();

    let (tx, rx) = mpsc::unbounded_channel();
    let pump = spawn_event_pump(Arc::clone(&session), rx);

    tx.send(EngineEvent::ConnectionMade { width: 32, height: 32 }).unwrap();
    for i in 0..100u32 {
        tx.send(EngineEvent::RectangleUpdate {
            x: 0,
            y: 0,
            width: 32,
            height: 32,
            pixels: solid(32, 32, i as u8),
        })
        .unwrap();
        tx.send(EngineEvent::UpdateFinished).unwrap();
    }
    drop(tx);

    // Stop concurrently with the in-flight stream; late updates must be
    // dropped without panicking or erroring.
    session.stop();
    pump.await.unwrap();

    assert!(matches!(session.state(), ConnectionState::Closed(_)));
}
