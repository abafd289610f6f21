//! Unit tests for fleet-core primitives.

#[cfg(test)]
mod ids {
    use crate::{EdgeId, NodeId};

    #[test]
    fn canonical_edge_id_collides_both_orientations() {
        let a = NodeId::from("n3");
        let b = NodeId::from("n12");
        // "n12" < "n3" lexicographically.
        assert_eq!(EdgeId::canonical(&a, &b), EdgeId::canonical(&b, &a));
        assert_eq!(EdgeId::canonical(&a, &b).as_str(), "n12-n3");
    }

    #[test]
    fn display_is_raw_string() {
        assert_eq!(NodeId::from("depot-7").to_string(), "depot-7");
    }

    #[test]
    fn ordering_is_lexicographic() {
        assert!(NodeId::from("a") < NodeId::from("b"));
        assert!(NodeId::from("n10") < NodeId::from("n9")); // string order, not numeric
    }

    #[test]
    fn map_lookup_by_str() {
        use std::collections::HashMap;
        let mut m: HashMap<NodeId, u32> = HashMap::new();
        m.insert(NodeId::from("n0"), 7);
        assert_eq!(m.get("n0"), Some(&7));
    }

    #[test]
    fn serde_as_plain_string() {
        let id = NodeId::from("n42");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"n42\"");
        let back: NodeId = serde_json::from_str("\"n42\"").unwrap();
        assert_eq!(back, id);
    }
}

#[cfg(test)]
mod geom {
    use crate::Point2D;

    #[test]
    fn distance_3_4_5() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(b.distance(a), 5.0);
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(100.0, 50.0);
        assert_eq!(Point2D::lerp(a, b, 0.0), a);
        assert_eq!(Point2D::lerp(a, b, 1.0), b);
        assert_eq!(a.midpoint(b), Point2D::new(50.0, 25.0));
    }

    #[test]
    fn direction_is_unit_length() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(30.0, 40.0);
        let dir = a.direction_to(b);
        assert!((dir.x - 0.6).abs() < 1e-12);
        assert!((dir.y - 0.8).abs() < 1e-12);
    }

    #[test]
    fn coincident_points_give_zero_direction() {
        let p = Point2D::new(5.0, 5.0);
        let dir = p.direction_to(p);
        assert_eq!(dir, Point2D::ZERO);
        // Scaling the zero direction must not produce NaN.
        let v = dir.scale(13.4);
        assert!(v.x == 0.0 && v.y == 0.0);
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = SimRng::new(12345);
        let mut r2 = SimRng::new(12345);
        for _ in 0..100 {
            let a: f64 = r1.random();
            let b: f64 = r2.random();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn child_streams_diverge() {
        let mut r1 = SimRng::new(1);
        let mut r2 = SimRng::new(1);
        let mut c1 = r1.child(0);
        let mut c2 = r2.child(1);
        let a: u64 = c1.random();
        let b: u64 = c2.random();
        assert_ne!(a, b, "children with different labels should diverge");
    }

    #[test]
    fn gen_range_in_bounds() {
        let mut rng = SimRng::new(0);
        for _ in 0..1000 {
            let v = rng.gen_range(0.0f64..1.0);
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn choose_empty_is_none() {
        let mut rng = SimRng::new(0);
        let empty: [u8; 0] = [];
        assert!(rng.choose(&empty).is_none());
        assert_eq!(rng.choose(&[7]), Some(&7));
    }
}
