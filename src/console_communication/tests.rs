use super::ConsoleMessenger;
use super::carbsim_messages::{
    self, Channel, Downstream, DownstreamContent, Phase, Upstream, UpstreamContent,
};
use super::console_messenger::downstream_for;
use crate::config::SimConfig;
use crate::render_feed::VisualParams;
use crate::sim_control::{ControlChannel, ControlEvent, SimContext};
use crate::telemetry_sink::{TelemetrySink, TickFrame};
use chrono::{DateTime, TimeDelta, Utc};
use prost::Message;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::timeout;

const IO_TIMEOUT: Duration = Duration::from_secs(5);

fn t0() -> DateTime<Utc> { DateTime::from_timestamp(1_700_000_000, 0).unwrap() }

fn running_context(ticks: u32) -> SimContext {
    let mut ctx = SimContext::new(&SimConfig::default());
    let mut now = t0();
    ctx.apply(ControlEvent::SetEngine(true), now);
    ctx.apply(ControlEvent::SetTarget(ControlChannel::Throttle, 90.0), now);
    for _ in 0..ticks {
        now += TimeDelta::milliseconds(16);
        ctx.tick(now);
    }
    ctx
}

async fn write_upstream(stream: &mut TcpStream, content: UpstreamContent) {
    let buf = Upstream { content: Some(content) }.encode_to_vec();
    stream.write_u32(u32::try_from(buf.len()).unwrap()).await.unwrap();
    stream.write_all(&buf).await.unwrap();
}

async fn read_downstream(stream: &mut TcpStream) -> DownstreamContent {
    let len = timeout(IO_TIMEOUT, stream.read_u32()).await.unwrap().unwrap();
    let mut buf = vec![0u8; len as usize];
    stream.read_exact(&mut buf).await.unwrap();
    Downstream::decode(buf.as_slice()).unwrap().content.unwrap()
}

#[test]
fn test_upstream_to_control_event() {
    let set = UpstreamContent::SetTarget(carbsim_messages::SetTarget {
        channel: Channel::Mixture as i32,
        percent: 42.5,
    });
    assert_eq!(
        set.to_control_event(),
        Some(ControlEvent::SetTarget(ControlChannel::Mixture, 42.5))
    );
    let engine = UpstreamContent::SetEngine(carbsim_messages::SetEngine { on: true });
    assert_eq!(engine.to_control_event(), Some(ControlEvent::SetEngine(true)));
    let toggle = UpstreamContent::ToggleEngine(carbsim_messages::ToggleEngine {});
    assert_eq!(toggle.to_control_event(), Some(ControlEvent::ToggleEngine));
    let ping = UpstreamContent::Ping(carbsim_messages::Ping { echo: None });
    assert_eq!(ping.to_control_event(), None);
    let bogus = UpstreamContent::SetTarget(carbsim_messages::SetTarget { channel: 7, percent: 1.0 });
    assert_eq!(bogus.to_control_event(), None);
}

#[test]
fn test_telemetry_from_snapshot() {
    let ctx = running_context(120);
    let snap = ctx.last_snapshot();
    let msg = carbsim_messages::Telemetry::from_snapshot(snap);
    assert_eq!(msg.tick, 120);
    assert!(msg.engine_on);
    assert_eq!(msg.phase, Phase::from(snap.phase) as i32);
    assert!((msg.chamber_b - snap.chambers.b).abs() < 1e-12);
    assert!((msg.fuel_flow_rate - snap.fuel_flow_rate).abs() < 1e-12);
    assert_eq!(msg.throttle_percent, snap.throttle_percent());
    assert_eq!(msg.elapsed_label, "00:01");
    assert!(msg.airborne);
}

#[test]
fn test_downstream_order() {
    let ctx = running_context(10);
    let snap = *ctx.last_snapshot();
    let visuals = VisualParams::derive(snap.throttle, snap.mixture, snap.engine_on, ctx.frame_time());
    let frame = TickFrame { snapshot: &snap, history: ctx.history(), visuals: &visuals, history_reset: true };
    let msgs = downstream_for(&frame);
    assert_eq!(msgs.len(), 4);
    assert!(matches!(msgs[0], DownstreamContent::HistoryReset(_)));
    assert!(matches!(msgs[1], DownstreamContent::Telemetry(_)));
    let DownstreamContent::ChartSample(sample) = &msgs[2] else { panic!("expected chart sample") };
    let last = ctx.history().back().unwrap();
    assert!((sample.altitude - last.altitude).abs() < 1e-12);
    assert!((sample.pressure - last.pressure).abs() < 1e-12);
    assert!(matches!(msgs[3], DownstreamContent::Scene(_)));

    let idle = SimContext::new(&SimConfig::default());
    let idle_snap = *idle.last_snapshot();
    let idle_frame = TickFrame { snapshot: &idle_snap, history: idle.history(), visuals: &visuals, history_reset: false };
    let msgs = downstream_for(&idle_frame);
    assert_eq!(msgs.len(), 2);
    assert!(matches!(msgs[0], DownstreamContent::Telemetry(_)));
    assert!(matches!(msgs[1], DownstreamContent::Scene(_)));
}

#[tokio::test]
async fn test_console_round_trip() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
    let mut messenger = ConsoleMessenger::start(addr, tx).await.unwrap();
    assert!(!messenger.is_console_connected());

    let mut stream = TcpStream::connect(messenger.local_addr()).await.unwrap();
    write_upstream(&mut stream, UpstreamContent::Ping(carbsim_messages::Ping { echo: Some("hi".into()) }))
        .await;
    let DownstreamContent::Pong(pong) = read_downstream(&mut stream).await else {
        panic!("expected pong")
    };
    assert_eq!(pong.echo.as_deref(), Some("hi"));
    assert!(messenger.is_console_connected());

    write_upstream(&mut stream, UpstreamContent::SetEngine(carbsim_messages::SetEngine { on: true })).await;
    let ev = timeout(IO_TIMEOUT, rx.recv()).await.unwrap().unwrap();
    assert_eq!(ev, ControlEvent::SetEngine(true));

    let ctx = SimContext::new(&SimConfig::default());
    let snap = *ctx.last_snapshot();
    let visuals = VisualParams::derive(0.0, 0.0, false, 0.0);
    messenger.publish(&TickFrame { snapshot: &snap, history: ctx.history(), visuals: &visuals, history_reset: false });
    let DownstreamContent::Telemetry(telemetry) = read_downstream(&mut stream).await else {
        panic!("expected telemetry")
    };
    assert!(!telemetry.engine_on);
    assert_eq!(telemetry.phase, Phase::GroundIdle as i32);
    assert!(!telemetry.airborne);
    assert!(matches!(read_downstream(&mut stream).await, DownstreamContent::Scene(_)));
}
