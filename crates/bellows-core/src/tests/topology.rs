use crate::*;

#[test]
fn topology_parses_aliases() {
    assert_eq!("axial".parse::<JointTopology>().unwrap(), JointTopology::Axial);
    assert_eq!(
        "LATERAL".parse::<JointTopology>().unwrap(),
        JointTopology::Universal
    );
    assert_eq!(
        " universal ".parse::<JointTopology>().unwrap(),
        JointTopology::Universal
    );
    assert_eq!(
        "pressure_balanced".parse::<JointTopology>().unwrap(),
        JointTopology::PressureBalanced
    );
    let err = "bogus".parse::<JointTopology>().unwrap_err().to_string();
    assert_eq!(err, "Unknown joint topology: bogus");
}

#[test]
fn topology_display_round_trips_through_from_str() {
    for t in JointTopology::ALL {
        assert_eq!(t.to_string().parse::<JointTopology>().unwrap(), t);
    }
}

#[test]
fn catalog_covers_every_solvable_topology_once() {
    assert_eq!(JOINT_CATALOG.len(), 4);
    for t in [
        JointTopology::Axial,
        JointTopology::Universal,
        JointTopology::Hinged,
        JointTopology::Gimbal,
    ] {
        let cfg = t.config().expect("catalog entry");
        assert_eq!(cfg.id, t);
        assert!(!cfg.features.is_empty());
    }
}

#[test]
fn pressure_balanced_is_declared_but_uncatalogued() {
    let t = JointTopology::PressureBalanced;
    assert!(t.config().is_none());
    assert_eq!(t.capabilities(), AllowedDeformation::NONE);
    let err = t.require_config().unwrap_err().to_string();
    assert_eq!(
        err,
        "Joint topology has no catalog entry: pressure-balanced"
    );
}

#[test]
fn capability_sets_match_joint_mechanics() {
    let axial = JointTopology::Axial.capabilities();
    assert!(axial.axial && !axial.lateral && !axial.angular);

    let universal = JointTopology::Universal.capabilities();
    assert!(universal.axial && universal.lateral && !universal.angular);

    for t in [JointTopology::Hinged, JointTopology::Gimbal] {
        let c = t.capabilities();
        assert!(!c.axial && !c.lateral && c.angular);
    }
}

#[test]
fn topology_serializes_kebab_case() {
    assert_eq!(
        serde_json::to_string(&JointTopology::PressureBalanced).unwrap(),
        "\"pressure-balanced\""
    );
    let t: JointTopology = serde_json::from_str("\"lateral\"").unwrap();
    assert_eq!(t, JointTopology::Universal);
}
