use super::{ChartFrame, VisualParams};
use crate::sim_control::{TelemetryBuffer, TelemetrySample};
use std::f64::consts::FRAC_PI_2;

const TOL: f64 = 1e-9;

fn history(samples: &[(f64, f64)]) -> TelemetryBuffer {
    let mut buffer = TelemetryBuffer::new(100);
    for &(altitude, pressure) in samples {
        buffer.append(TelemetrySample::new(altitude, pressure));
    }
    buffer
}

#[test]
fn test_chart_needs_two_samples() {
    assert!(ChartFrame::from_history(&history(&[])).is_none());
    assert!(ChartFrame::from_history(&history(&[(10.0, 11.7)])).is_none());
    assert!(ChartFrame::from_history(&history(&[(10.0, 11.7), (12.0, 11.8)])).is_some());
}

#[test]
fn test_chart_normalises_points() {
    let frame =
        ChartFrame::from_history(&history(&[(0.0, 10.0), (5.0, 20.0), (9.0, 15.0)])).unwrap();
    let pts = frame.points();
    assert_eq!(pts.len(), 3);
    assert!((pts[0].x).abs() < TOL && (pts[0].y).abs() < TOL);
    assert!((pts[1].x - 0.5).abs() < TOL && (pts[1].y - 1.0).abs() < TOL);
    assert!((pts[2].x - 1.0).abs() < TOL && (pts[2].y - 0.5).abs() < TOL);
    assert_eq!(frame.marker(), pts.last());
    assert_eq!(frame.pressure_range(), (10.0, 20.0));
    assert_eq!(frame.altitude_range(), (0.0, 9.0));
    assert!((frame.latest_altitude() - 9.0).abs() < TOL);
    assert!((frame.latest_pressure() - 15.0).abs() < TOL);
}

#[test]
fn test_chart_flat_history_stays_finite() {
    let frame = ChartFrame::from_history(&history(&[(0.0, 11.7); 40])).unwrap();
    assert!((frame.pressure_span() - 1.0).abs() < TOL);
    assert!((frame.altitude_span() - 1.0).abs() < TOL);
    for p in frame.points() {
        assert!(p.x.is_finite() && p.y.is_finite());
        assert!(p.y.abs() < TOL);
    }
}

#[test]
fn test_visuals_at_full_inputs() {
    let v = VisualParams::derive(100.0, 100.0, true, 2.0);
    assert!((v.throttle_lever_rot + FRAC_PI_2).abs() < TOL);
    assert!((v.linkage_rot + 15f64.to_radians()).abs() < TOL);
    assert!((v.connecting_lever_rot - 8f64.to_radians()).abs() < TOL);
    assert!((v.mixture_lever_rot + 30f64.to_radians()).abs() < TOL);
    assert!((v.diaphragm_offset - 0.2).abs() < TOL);
    assert!((v.throttle_flow_speed - 2.0).abs() < TOL);
    assert!((v.combined_flow_speed - 3.1).abs() < TOL);
    assert!((v.base_phase - 6.0).abs() < TOL);
    assert!((v.mixture_phase - 10.0).abs() < TOL);
    assert!((v.inlet_phase - 2.0).abs() < TOL);
}

#[test]
fn test_visual_phases_stop_with_engine_off() {
    let v = VisualParams::derive(40.0, 40.0, false, 12.5);
    assert!(v.base_phase.abs() < TOL);
    assert!(v.mixture_phase.abs() < TOL);
    assert!(v.inlet_phase.abs() < TOL);
    // levers still follow the easing controls
    assert!(v.throttle_lever_rot < 0.0);
    assert!((v.throttle_flow_speed - 0.86).abs() < TOL);
}
