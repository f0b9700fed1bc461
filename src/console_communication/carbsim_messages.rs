use crate::render_feed::VisualParams;
use crate::sim_control::{
    ControlChannel, ControlEvent, FlightPhase, TelemetrySample, TelemetrySnapshot,
};

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Upstream {
    #[prost(oneof = "UpstreamContent", tags = "1, 2, 3, 4")]
    pub content: Option<UpstreamContent>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Ping {
    #[prost(string, optional, tag = "1")]
    pub echo: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Downstream {
    #[prost(oneof = "DownstreamContent", tags = "1, 2, 3, 4, 5")]
    pub content: Option<DownstreamContent>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Pong {
    #[prost(string, optional, tag = "1")]
    pub echo: Option<String>,
}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct SetTarget {
    #[prost(enumeration = "Channel", tag = "1")]
    pub channel: i32,
    #[prost(double, tag = "2")]
    pub percent: f64,
}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct SetEngine {
    #[prost(bool, tag = "1")]
    pub on: bool,
}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct ToggleEngine {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Telemetry {
    #[prost(uint64, tag = "1")]
    pub tick: u64,
    #[prost(bool, tag = "2")]
    pub engine_on: bool,
    #[prost(enumeration = "Phase", tag = "3")]
    pub phase: i32,
    #[prost(double, tag = "4")]
    pub throttle: f64,
    #[prost(double, tag = "5")]
    pub mixture: f64,
    #[prost(double, tag = "6")]
    pub altitude: f64,
    #[prost(double, tag = "7")]
    pub velocity: f64,
    #[prost(double, tag = "8")]
    pub chamber_a: f64,
    #[prost(double, tag = "9")]
    pub chamber_b: f64,
    #[prost(double, tag = "10")]
    pub chamber_c: f64,
    #[prost(double, tag = "11")]
    pub chamber_d: f64,
    #[prost(double, tag = "12")]
    pub mass_air_flow: f64,
    #[prost(double, tag = "13")]
    pub fuel_flow_rate: f64,
    #[prost(double, tag = "14")]
    pub elapsed_time: f64,
    #[prost(string, tag = "15")]
    pub elapsed_label: String,
    #[prost(double, tag = "16")]
    pub total_fuel_consumed: f64,
    #[prost(int32, tag = "17")]
    pub throttle_percent: i32,
    #[prost(int32, tag = "18")]
    pub mixture_percent: i32,
    #[prost(bool, tag = "19")]
    pub airborne: bool,
}

impl Telemetry {
    pub(crate) fn from_snapshot(snap: &TelemetrySnapshot) -> Self {
        Self {
            tick: snap.tick,
            engine_on: snap.engine_on,
            phase: Phase::from(snap.phase) as i32,
            throttle: snap.throttle,
            mixture: snap.mixture,
            altitude: snap.altitude,
            velocity: snap.velocity,
            chamber_a: snap.chambers.a,
            chamber_b: snap.chambers.b,
            chamber_c: snap.chambers.c,
            chamber_d: snap.chambers.d,
            mass_air_flow: snap.mass_air_flow,
            fuel_flow_rate: snap.fuel_flow_rate,
            elapsed_time: snap.elapsed_time,
            elapsed_label: snap.elapsed_mm_ss(),
            total_fuel_consumed: snap.total_fuel_consumed,
            throttle_percent: snap.throttle_percent(),
            mixture_percent: snap.mixture_percent(),
            airborne: snap.phase.is_airborne(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct ChartSample {
    #[prost(double, tag = "1")]
    pub altitude: f64,
    #[prost(double, tag = "2")]
    pub pressure: f64,
}

impl From<TelemetrySample> for ChartSample {
    fn from(sample: TelemetrySample) -> Self {
        Self { altitude: sample.altitude, pressure: sample.pressure }
    }
}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct HistoryReset {}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct Scene {
    #[prost(double, tag = "1")]
    pub throttle_lever_rot: f64,
    #[prost(double, tag = "2")]
    pub linkage_rot: f64,
    #[prost(double, tag = "3")]
    pub connecting_lever_rot: f64,
    #[prost(double, tag = "4")]
    pub mixture_lever_rot: f64,
    #[prost(double, tag = "5")]
    pub diaphragm_offset: f64,
    #[prost(double, tag = "6")]
    pub throttle_flow_speed: f64,
    #[prost(double, tag = "7")]
    pub combined_flow_speed: f64,
    #[prost(double, tag = "8")]
    pub base_phase: f64,
    #[prost(double, tag = "9")]
    pub mixture_phase: f64,
    #[prost(double, tag = "10")]
    pub inlet_phase: f64,
}

impl From<&VisualParams> for Scene {
    fn from(v: &VisualParams) -> Self {
        Self {
            throttle_lever_rot: v.throttle_lever_rot,
            linkage_rot: v.linkage_rot,
            connecting_lever_rot: v.connecting_lever_rot,
            mixture_lever_rot: v.mixture_lever_rot,
            diaphragm_offset: v.diaphragm_offset,
            throttle_flow_speed: v.throttle_flow_speed,
            combined_flow_speed: v.combined_flow_speed,
            base_phase: v.base_phase,
            mixture_phase: v.mixture_phase,
            inlet_phase: v.inlet_phase,
        }
    }
}

#[derive(Clone, PartialEq, prost::Oneof)]
pub enum DownstreamContent {
    #[prost(message, tag = "1")]
    Pong(Pong),
    #[prost(message, tag = "2")]
    Telemetry(Telemetry),
    #[prost(message, tag = "3")]
    ChartSample(ChartSample),
    #[prost(message, tag = "4")]
    HistoryReset(HistoryReset),
    #[prost(message, tag = "5")]
    Scene(Scene),
}

#[derive(Clone, PartialEq, prost::Oneof)]
pub enum UpstreamContent {
    #[prost(message, tag = "1")]
    Ping(Ping),
    #[prost(message, tag = "2")]
    SetTarget(SetTarget),
    #[prost(message, tag = "3")]
    SetEngine(SetEngine),
    #[prost(message, tag = "4")]
    ToggleEngine(ToggleEngine),
}

impl UpstreamContent {
    /// The simulation input carried by this message, `None` for pings and unknown channels.
    pub(crate) fn to_control_event(&self) -> Option<ControlEvent> {
        match self {
            UpstreamContent::Ping(_) => None,
            UpstreamContent::SetTarget(set) => {
                let channel = Channel::try_from(set.channel).ok()?;
                Some(ControlEvent::SetTarget(channel.into(), set.percent))
            }
            UpstreamContent::SetEngine(set) => Some(ControlEvent::SetEngine(set.on)),
            UpstreamContent::ToggleEngine(_) => Some(ControlEvent::ToggleEngine),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum Channel {
    Throttle = 0,
    Mixture = 1,
}

impl From<Channel> for ControlChannel {
    fn from(value: Channel) -> Self {
        match value {
            Channel::Throttle => ControlChannel::Throttle,
            Channel::Mixture => ControlChannel::Mixture,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum Phase {
    GroundIdle = 0,
    TakeoffRoll = 1,
    Climb = 2,
    Descent = 3,
    Cruise = 4,
}

impl From<FlightPhase> for Phase {
    fn from(value: FlightPhase) -> Self {
        match value {
            FlightPhase::GroundIdle => Phase::GroundIdle,
            FlightPhase::TakeoffRoll => Phase::TakeoffRoll,
            FlightPhase::Climb => Phase::Climb,
            FlightPhase::Descent => Phase::Descent,
            FlightPhase::Cruise => Phase::Cruise,
        }
    }
}
