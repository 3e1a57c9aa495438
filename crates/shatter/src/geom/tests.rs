use super::*;
use proptest::prelude::*;

fn assert_dual_consistent(p: &Point) {
    let q = Point::new(p.x(), p.y());
    let scale = 1.0 + p.r().abs();
    assert_close(q.r(), p.r().abs(), 1e-9 * scale);
    if p.r().abs() > 1e-9 {
        // stored polar pair must reproduce the cartesian pair
        let back = Point::polar(p.r(), p.a());
        assert_close(back.x(), p.x(), 1e-9 * scale);
        assert_close(back.y(), p.y(), 1e-9 * scale);
    }
}

fn assert_close(a: f64, b: f64, tol: f64) {
    assert!((a - b).abs() <= tol, "{a} vs {b} (tol {tol})");
}

proptest! {
    #[test]
    fn dual_representation_survives_mutation(
        x in -1e3f64..1e3,
        y in -1e3f64..1e3,
        tx in -1e3f64..1e3,
        ty in -1e3f64..1e3,
        px in -1e3f64..1e3,
        py in -1e3f64..1e3,
        ang in -10.0f64..10.0,
        k in 0.0f64..10.0,
    ) {
        let mut p = Point::new(x, y);
        assert_dual_consistent(&p);
        p.translate(Point::new(tx, ty));
        assert_dual_consistent(&p);
        p.rotate(Point::new(px, py), ang);
        assert_dual_consistent(&p);
        p.scale(k);
        assert_dual_consistent(&p);
        let mut q = Point::polar(k, ang);
        assert_dual_consistent(&q);
        q -= Point::new(tx, ty);
        assert_dual_consistent(&q);
    }

    #[test]
    fn segment_distance_is_symmetric(
        a in prop::array::uniform4(-50.0f64..50.0),
        b in prop::array::uniform4(-50.0f64..50.0),
    ) {
        let s1 = Segment::new(Point::new(a[0], a[1]), Point::new(a[2], a[3]));
        let s2 = Segment::new(Point::new(b[0], b[1]), Point::new(b[2], b[3]));
        let d12 = s1.dist_to_segment(&s2);
        let d21 = s2.dist_to_segment(&s1);
        prop_assert!((d12 - d21).abs() < 1e-9);
        prop_assert!(d12 >= 0.0);
    }
}

#[test]
fn polyline_merge_then_self_check() {
    let mut p = Polyline::default();
    assert!(p.add_points(&[Point::new(0.0, 0.0), Point::new(1.0, 0.0)]));
    assert!(p.add_points(&[Point::new(1.0, 0.0), Point::new(1.0, 1.0)]));
    assert!(p.add_points(&[Point::new(0.0, 1.0), Point::new(1.0, 1.0)]));
    assert_eq!(p.len(), 4);
    assert!(!p.self_intersects());
    // the closing leg runs 1.0 away from the first segment
    let hits = p.check_distances(None, 1.5);
    assert_eq!(hits.offenders, vec![0]);
    assert_eq!(hits.offended, vec![2]);
}
