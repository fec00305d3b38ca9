// Flow field sampling and the seeded random helpers.

use ambient_core::sampling::{derive_seed, random_point_in_sphere, random_unit_vector};
use ambient_core::{FlowField, MotionField};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn samples_are_finite_and_unit_length() {
    let field = FlowField::default();
    let mut rng = StdRng::seed_from_u64(42);
    let mut produced = 0;
    for _ in 0..10_000 {
        let p = Vec3::new(
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
        );
        let t = rng.gen_range(0.0..500.0);
        if let Some(v) = field.sample(p, t) {
            assert!(v.is_finite(), "non-finite sample at {p:?}");
            assert!((v.length() - 1.0).abs() < 1e-4, "length {}", v.length());
            produced += 1;
        }
    }
    // A degenerate raw vector is vanishingly rare.
    assert!(produced > 9_990);
}

#[test]
fn sampling_is_deterministic() {
    let field = FlowField::default();
    let p = Vec3::new(1.5, -2.0, 0.25);
    assert_eq!(field.sample(p, 3.0), field.sample(p, 3.0));
}

#[test]
fn raw_field_follows_the_trig_formula() {
    let field = FlowField::new(0.25);
    let p = Vec3::new(2.0, 4.0, -1.0);
    let t = 1.0;
    let s = p * 0.25;
    let expected = Vec3::new(
        (s.y + t).sin() + (s.z * 0.5 + t * 0.7).cos(),
        (s.z + t * 0.8).sin() + (s.x * 0.6 - t * 0.3).cos(),
        (s.x - t * 0.4).sin() - (s.y * 0.4 + t * 0.9).cos(),
    );
    assert!((field.raw(p, t) - expected).length() < 1e-5);
}

#[test]
fn sphere_points_stay_inside_the_radius() {
    let mut rng = StdRng::seed_from_u64(9);
    for _ in 0..2_000 {
        let p = random_point_in_sphere(&mut rng, 3.0);
        assert!(p.length() <= 3.0 + 1e-4);
        let u = random_unit_vector(&mut rng);
        assert!((u.length() - 1.0).abs() < 1e-4);
    }
}

#[test]
fn derived_seeds_differ_per_entity() {
    let a = derive_seed(7, 0);
    let b = derive_seed(7, 1);
    let c = derive_seed(8, 0);
    assert_ne!(a, b);
    assert_ne!(a, c);
    assert_eq!(a, derive_seed(7, 0));
}

#[test]
fn derived_seed_never_passes_the_base_through() {
    for base in [0, 7, 8, u64::MAX] {
        for index in [0, 1, u64::MAX - 1, u64::MAX] {
            assert_ne!(derive_seed(base, index), base, "base {base} index {index}");
        }
    }
}
