use crate::*;

#[test]
fn default_state_is_neutral_cross_section() {
    let s = DeformationState::default();
    assert_eq!((s.axial, s.lateral, s.angular, s.pressure), (0.0, 0.0, 0.0, 0.0));
    assert!(s.cross_section_mode);
}

#[test]
fn restricted_to_zeroes_unsupported_fields_only() {
    let s = DeformationState::new(30.0, 50.0, 12.0)
        .with_pressure(10.0)
        .with_cross_section(false);

    let hinged = s.for_topology(JointTopology::Hinged);
    assert_eq!(hinged.axial, 0.0);
    assert_eq!(hinged.lateral, 0.0);
    assert_eq!(hinged.angular, 12.0);
    assert_eq!(hinged.pressure, 10.0);
    assert!(!hinged.cross_section_mode);

    let universal = s.for_topology(JointTopology::Universal);
    assert_eq!(universal.axial, 30.0);
    assert_eq!(universal.lateral, 50.0);
    assert_eq!(universal.angular, 0.0);

    let pb = s.for_topology(JointTopology::PressureBalanced);
    assert_eq!((pb.axial, pb.lateral, pb.angular), (0.0, 0.0, 0.0));
}

#[test]
fn clamped_enforces_ranges_and_drops_non_finite() {
    let cfg = VisualizerConfig::default();
    let s = DeformationState {
        axial: 250.0,
        lateral: -5.0,
        angular: -90.0,
        pressure: f64::NAN,
        cross_section_mode: true,
    }
    .clamped(&cfg);
    assert_eq!(s.axial, 100.0);
    assert_eq!(s.lateral, 0.0);
    assert_eq!(s.angular, -20.0);
    assert_eq!(s.pressure, 0.0);
}

#[test]
fn load_status_tracks_active_inputs() {
    let idle = DeformationState::default().load_status();
    assert_eq!(idle, LoadStatus::default());

    let busy = DeformationState::new(-10.0, 5.0, 0.0)
        .with_pressure(21.0)
        .load_status();
    assert!(busy.axial_load);
    assert!(busy.shear);
    assert!(busy.pressure_high);

    let at_limit = DeformationState::default().with_pressure(20.0).load_status();
    assert!(!at_limit.pressure_high);
}

#[test]
fn state_deserializes_partial_camel_case_documents() {
    let s: DeformationState =
        serde_json::from_str(r#"{"angular": 12.5, "showCrossSection": false}"#).unwrap();
    assert_eq!(s.angular, 12.5);
    assert_eq!(s.axial, 0.0);
    assert!(!s.cross_section_mode);

    let s: DeformationState = serde_yaml::from_str("lateral: 40\ncrossSectionMode: true\n").unwrap();
    assert_eq!(s.lateral, 40.0);
    assert!(s.cross_section_mode);
}
