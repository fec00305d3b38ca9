// Growth branches and the capped forest.

use ambient_core::constants::{BRANCH_MIN_STEP_LENGTH, BRANCH_SPAWN_MIN_POINTS};
use ambient_core::{BranchForest, GrowthBranch, Palette, Rgb};
use glam::Vec3;

fn branch(max_points: usize, seed: u64) -> GrowthBranch {
    GrowthBranch::new(Vec3::new(0.1, 0.0, 0.0), Vec3::X, 0.08, max_points, Rgb::WHITE, seed)
}

#[test]
fn points_never_exceed_the_budget_and_terminal_is_final() {
    for seed in 0..16 {
        let mut b = branch(60, seed);
        let mut was_terminal = false;
        for _ in 0..200 {
            b.grow(true);
            assert!(b.points().len() <= b.max_points());
            if was_terminal {
                assert!(!b.is_growing(), "terminal branch revived");
            }
            was_terminal = !b.is_growing();
        }
        assert!(!b.is_growing());
        assert_eq!(b.points().len(), 60);
    }
}

#[test]
fn terminal_branches_are_left_untouched() {
    let mut b = branch(5, 1);
    for _ in 0..10 {
        b.grow(true);
    }
    let frozen = b.points().to_vec();
    b.take_dirty();
    assert!(b.grow(true).is_none());
    assert_eq!(b.points(), frozen.as_slice());
    assert!(!b.take_dirty());
}

#[test]
fn velocity_stays_unit_and_steps_have_fixed_length() {
    let mut b = branch(120, 9);
    for _ in 0..119 {
        b.grow(false);
        assert!((b.velocity().length() - 1.0).abs() < 1e-4);
    }
    for pair in b.points().windows(2) {
        assert!(((pair[1] - pair[0]).length() - 0.08).abs() < 1e-4);
    }
}

#[test]
fn single_point_budget_is_terminal_from_birth() {
    let mut b = branch(1, 2);
    assert!(!b.is_growing());
    assert!(b.grow(true).is_none());
    assert_eq!(b.points().len(), 1);
}

#[test]
fn no_spawn_without_room_or_before_min_points() {
    let mut b = branch(200, 3);
    for _ in 0..199 {
        assert!(b.grow(false).is_none());
    }

    let mut young = branch(BRANCH_SPAWN_MIN_POINTS, 4);
    for _ in 0..BRANCH_SPAWN_MIN_POINTS {
        assert!(young.grow(true).is_none());
    }
}

#[test]
fn children_inherit_color_and_shrink_their_step() {
    let mut found = None;
    'search: for seed in 0..500 {
        let color = Rgb::new(0.2, 0.4, 0.6);
        let mut b = GrowthBranch::new(Vec3::ZERO, Vec3::Y, 0.08, 140, color, seed);
        for _ in 0..139 {
            if let Some(spawn) = b.grow(true) {
                found = Some((spawn, *b.points().last().unwrap()));
                break 'search;
            }
        }
    }
    let (spawn, tip) = found.expect("some seed spawns a child");
    assert_eq!(spawn.color, Rgb::new(0.2, 0.4, 0.6));
    assert_eq!(spawn.origin, tip);
    assert!((spawn.step_length - 0.064).abs() < 1e-5);
    assert!((spawn.heading.length() - 1.0).abs() < 1e-4);
}

#[test]
fn step_length_has_a_floor() {
    let b = GrowthBranch::new(Vec3::ZERO, Vec3::X, 0.001, 10, Rgb::WHITE, 0);
    assert_eq!(b.step_length(), BRANCH_MIN_STEP_LENGTH);
}

#[test]
fn forest_with_cap_one_refuses_every_addition() {
    let palette = Palette::default();
    let mut forest = BranchForest::new(1, 77);
    assert_eq!(forest.add_new_branch(&palette), Some(0));
    assert!(forest.is_full());
    assert_eq!(forest.add_new_branch(&palette), None);
    assert!(forest.push(branch(10, 1)).is_none());

    // The lone branch may never fork.
    for _ in 0..500 {
        let added = forest.grow_all();
        assert!(added.is_empty());
    }
    assert_eq!(forest.len(), 1);
}

#[test]
fn forest_never_exceeds_its_cap() {
    let palette = Palette::default();
    for seed in 0..10 {
        let mut forest = BranchForest::new(6, seed);
        for _ in 0..3 {
            forest.add_new_branch(&palette);
        }
        for tick in 0..2_000 {
            let added = forest.grow_all();
            assert!(added.end == forest.len());
            if tick % 50 == 0 {
                forest.add_new_branch(&palette);
            }
            assert!(forest.len() <= 6, "forest grew to {}", forest.len());
        }
    }
}

#[test]
fn new_roots_start_near_the_origin() {
    let palette = Palette::default();
    let mut forest = BranchForest::new(20, 5);
    for _ in 0..20 {
        let index = forest.add_new_branch(&palette).unwrap();
        let b = &forest.branches()[index];
        assert!(b.points()[0].length() <= 0.5 + 1e-4);
        assert!(palette.colors().contains(&b.color()));
        assert!((60..140).contains(&b.max_points()));
    }
}
