use bellows_render::convolution::{BoundarySide, ConvolutionProfile, Direction, generate_boundary};
use bellows_render::model::{LayoutPoint, PathGeometry};
use bellows_render::ribs::generate_feature_lines;

fn assert_same_path(a: &PathGeometry, b: &PathGeometry, eps: f64) {
    let pa: Vec<LayoutPoint> = a.all_points().collect();
    let pb: Vec<LayoutPoint> = b.all_points().collect();
    assert_eq!(pa.len(), pb.len());
    for (p, q) in pa.iter().zip(&pb) {
        assert!(p.distance_to(*q) <= eps, "{p:?} vs {q:?}");
    }
}

#[test]
fn reversed_forward_matches_backward() {
    for &(count, angle) in &[(10usize, 0.0), (10, 0.349), (5, -0.6), (1, 0.2), (0, 0.4)] {
        for side in [BoundarySide::Outer, BoundarySide::Inner] {
            let fwd = generate_boundary(350.0, count, side, Direction::Forward, angle);
            let back = generate_boundary(350.0, count, side, Direction::Backward, angle);
            assert_same_path(&fwd.reversed(), &back, 1e-9);

            let fj = fwd.junctions();
            let bj = back.junctions();
            for (p, q) in fj.iter().rev().zip(&bj) {
                assert!(p.distance_to(*q) <= 1e-9);
            }
        }
    }
}

#[test]
fn straight_outer_boundary_alternates_base_and_peak() {
    let p = generate_boundary(350.0, 10, BoundarySide::Outer, Direction::Forward, 0.0);
    assert_eq!(p.segments.len(), 20);
    assert_eq!(p.start, LayoutPoint::new(0.0, -60.0));
    assert_eq!(p.end(), LayoutPoint::new(350.0, -60.0));

    let w = 35.0;
    for (i, seg) in p.segments.iter().enumerate() {
        let conv = (i / 2) as f64;
        if i % 2 == 0 {
            assert!((seg.to.x - (conv * w + w / 2.0)).abs() < 1e-9);
            assert_eq!(seg.to.y, -85.0);
            // Handles sit 35 % of a convolution width away from their anchors.
            assert!((seg.ctrl1.x - (conv * w + 0.35 * w)).abs() < 1e-9);
            assert_eq!(seg.ctrl1.y, -60.0);
            assert_eq!(seg.ctrl2.y, -85.0);
        } else {
            assert!((seg.to.x - (conv + 1.0) * w).abs() < 1e-9);
            assert_eq!(seg.to.y, -60.0);
        }
    }

    let b = p.bounds().expect("non-empty path");
    assert_eq!((b.min_x, b.max_x), (0.0, 350.0));
    assert_eq!((b.min_y, b.max_y), (-85.0, -60.0));
    assert_eq!(b.height(), 25.0);
}

#[test]
fn inner_boundary_mirrors_outer_when_straight() {
    let outer = generate_boundary(120.0, 4, BoundarySide::Outer, Direction::Forward, 0.0);
    let inner = generate_boundary(120.0, 4, BoundarySide::Inner, Direction::Forward, 0.0);
    for (o, i) in outer.all_points().zip(inner.all_points()) {
        assert_eq!(o.x, i.x);
        assert_eq!(o.y, -i.y);
    }
}

#[test]
fn convolution_widths_sum_to_the_segment_length() {
    let len = 100.0;
    let count = 7;
    let p = generate_boundary(len, count, BoundarySide::Outer, Direction::Forward, 0.0);
    let bases: Vec<f64> = p.junctions().iter().step_by(2).map(|j| j.x).collect();
    assert_eq!(bases.len(), count + 1);
    assert_eq!(bases[0], 0.0);
    assert_eq!(*bases.last().unwrap(), len);
    let widths: f64 = bases.windows(2).map(|w| w[1] - w[0]).sum();
    assert!((widths - len).abs() < 1e-9);
}

#[test]
fn zero_convolutions_is_a_single_straight_span() {
    let p = generate_boundary(350.0, 0, BoundarySide::Inner, Direction::Forward, 0.0);
    assert_eq!(p.segments.len(), 1);
    assert_eq!(p.start, LayoutPoint::new(0.0, 60.0));
    assert_eq!(p.end(), LayoutPoint::new(350.0, 60.0));
    assert!(p.all_points().all(|q| q.y == 60.0));
}

#[test]
fn bent_boundary_is_finite_and_starts_on_the_flange_face() {
    let p = generate_boundary(87.5, 5, BoundarySide::Outer, Direction::Forward, -0.9);
    assert!(p.all_points().all(|q| q.x.is_finite() && q.y.is_finite()));
    assert!(p.start.distance_to(LayoutPoint::new(0.0, -60.0)) < 1e-9);
}

#[test]
fn closed_outline_joins_outer_and_inner_walls_at_the_far_end() {
    let profile = ConvolutionProfile::default();
    let angle = 0.349;
    let outline = profile.closed_outline(350.0, 10, angle);
    let frame = profile.frame(350.0, angle);

    let (from, to) = outline.closing_line();
    assert!(from.distance_to(frame.transform(350.0, -60.0).into()) < 1e-9);
    assert!(to.distance_to(frame.transform(350.0, 60.0).into()) < 1e-9);
    assert!(outline.backward.end().distance_to(LayoutPoint::new(0.0, 60.0)) < 1e-9);
}

#[test]
fn straight_segment_has_ten_peaks_and_nine_valleys() {
    let lines = generate_feature_lines(350.0, 10, 0.0);
    let peaks = lines
        .iter()
        .filter(|l| l.kind == bellows_render::model::FeatureKind::Peak)
        .count();
    let valleys = lines.len() - peaks;
    assert_eq!(peaks, 10);
    assert_eq!(valleys, 9);

    // No valley on the flange seam.
    assert!(lines.iter().all(|l| l.from.x > 0.0));
}

#[test]
fn degenerate_counts_produce_no_valleys() {
    assert!(generate_feature_lines(350.0, 0, 0.3).is_empty());
    let one = generate_feature_lines(350.0, 1, 0.3);
    assert_eq!(one.len(), 1);
    assert_eq!(one[0].kind, bellows_render::model::FeatureKind::Peak);
}

#[test]
fn peak_ribs_coincide_with_boundary_peaks_when_bent() {
    let angle = -0.5;
    let outer = generate_boundary(175.0, 5, BoundarySide::Outer, Direction::Forward, angle);
    let inner = generate_boundary(175.0, 5, BoundarySide::Inner, Direction::Forward, angle);
    let peaks: Vec<_> = generate_feature_lines(175.0, 5, angle)
        .into_iter()
        .filter(|l| l.kind == bellows_render::model::FeatureKind::Peak)
        .collect();
    assert_eq!(peaks.len(), 5);
    for (i, rib) in peaks.iter().enumerate() {
        assert!(rib.from.distance_to(outer.segments[2 * i].to) < 1e-9);
        assert!(rib.to.distance_to(inner.segments[2 * i].to) < 1e-9);
    }
}
