//! Growth-branch mode: poly-lines that extend outward from the origin,
//! occasionally forking, until they reach their own point budget.
//!
//! The rules are cheap approximations (damping, outward bias, wobble,
//! continuity, periodic kicks), not a growth law.

use crate::backend::Vertex;
use crate::color::{Palette, Rgb};
use crate::constants::*;
use crate::sampling::{derive_seed, random_in_cube, random_point_in_sphere, random_unit_vector};
use glam::{Quat, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smallvec::SmallVec;

/// A child requested by a growing branch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BranchSpawn {
    pub origin: Vec3,
    pub heading: Vec3,
    pub step_length: f32,
    pub color: Rgb,
}

pub struct GrowthBranch {
    points: Vec<Vec3>,
    /// Unit heading; `step_length` is applied when appending.
    velocity: Vec3,
    step_length: f32,
    max_points: usize,
    growing: bool,
    color: Rgb,
    rng: StdRng,
    dirty: bool,
}

impl GrowthBranch {
    pub fn new(
        seed_point: Vec3,
        heading: Vec3,
        step_length: f32,
        max_points: usize,
        color: Rgb,
        rng_seed: u64,
    ) -> Self {
        let max_points = max_points.max(1);
        Self {
            points: vec![seed_point],
            velocity: heading.try_normalize().unwrap_or(Vec3::Y),
            step_length: step_length.max(BRANCH_MIN_STEP_LENGTH),
            max_points,
            growing: max_points > 1,
            color,
            rng: StdRng::seed_from_u64(rng_seed),
            dirty: true,
        }
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn step_length(&self) -> f32 {
        self.step_length
    }

    pub fn max_points(&self) -> usize {
        self.max_points
    }

    pub fn is_growing(&self) -> bool {
        self.growing
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Extend the branch by one point. `may_spawn` is false when the global
    /// branch cap leaves no room for a child.
    ///
    /// Terminal branches are left untouched. A tick whose heading cannot be
    /// normalized is skipped.
    pub fn grow(&mut self, may_spawn: bool) -> Option<BranchSpawn> {
        if !self.growing {
            return None;
        }
        let last = *self.points.last()?;

        let mut v = self.velocity * BRANCH_DAMPING;
        if let Some(outward) = last.try_normalize() {
            v += outward * BRANCH_OUTWARD_BIAS;
        }
        v += random_in_cube(&mut self.rng) * BRANCH_WOBBLE;

        let n = self.points.len();
        if n >= 3 {
            if let Some(recent) = (self.points[n - 1] - self.points[n - 2]).try_normalize() {
                v = v.lerp(recent * v.length(), BRANCH_CONTINUITY_BLEND);
            }
        }
        if n % BRANCH_SHARP_TURN_EVERY == 0 {
            v += random_unit_vector(&mut self.rng) * BRANCH_SHARP_TURN_KICK;
        }

        let heading = v.try_normalize()?;
        self.velocity = heading;
        let next = last + heading * self.step_length;
        self.points.push(next);
        self.dirty = true;

        if self.points.len() >= self.max_points {
            self.growing = false;
        }

        let roll = self.rng.gen::<f32>();
        if may_spawn && self.points.len() > BRANCH_SPAWN_MIN_POINTS && roll < BRANCH_SPAWN_CHANCE {
            return Some(self.child_at(next));
        }
        None
    }

    fn child_at(&mut self, origin: Vec3) -> BranchSpawn {
        let axis = random_unit_vector(&mut self.rng);
        let angle = (self.rng.gen::<f32>() * 2.0 - 1.0) * BRANCH_CHILD_MAX_ANGLE;
        let heading = Quat::from_axis_angle(axis, angle) * self.velocity;
        BranchSpawn {
            origin,
            heading,
            step_length: (self.step_length * BRANCH_CHILD_STEP_SCALE).max(BRANCH_MIN_STEP_LENGTH),
            color: self.color,
        }
    }

    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    pub fn fill_vertices(&self, out: &mut Vec<Vertex>) {
        out.clear();
        out.extend(self.points.iter().map(|p| Vertex::new(*p, self.color)));
    }
}

/// All live branches plus the cap and spawning policy.
///
/// Branches are only added, never removed, until the whole forest is dropped.
pub struct BranchForest {
    branches: Vec<GrowthBranch>,
    max_branches: usize,
    base_seed: u64,
    spawned: u64,
    rng: StdRng,
}

impl BranchForest {
    pub fn new(max_branches: usize, seed: u64) -> Self {
        Self {
            branches: Vec::new(),
            max_branches: max_branches.max(1),
            base_seed: seed,
            spawned: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    pub fn max_branches(&self) -> usize {
        self.max_branches
    }

    pub fn is_full(&self) -> bool {
        self.branches.len() >= self.max_branches
    }

    pub fn branches(&self) -> &[GrowthBranch] {
        &self.branches
    }

    pub fn branches_mut(&mut self) -> &mut [GrowthBranch] {
        &mut self.branches
    }

    /// Add a fresh root branch near the origin. Returns its index, or `None`
    /// when the forest is at its cap.
    pub fn add_new_branch(&mut self, palette: &Palette) -> Option<usize> {
        if self.is_full() {
            return None;
        }
        let seed_point = random_point_in_sphere(&mut self.rng, BRANCH_SEED_RADIUS);
        let heading = random_unit_vector(&mut self.rng);
        let max_points = BRANCH_MAX_POINTS_MIN + self.rng.gen_range(0..BRANCH_MAX_POINTS_SPAN);
        let color = palette.pick(&mut self.rng);
        let spawn = BranchSpawn {
            origin: seed_point,
            heading,
            step_length: BRANCH_STEP_LENGTH,
            color,
        };
        Some(self.insert(spawn, max_points))
    }

    /// Insert an already-built branch.
    /// Returns `None` when the forest is at its cap.
    pub fn push(&mut self, branch: GrowthBranch) -> Option<usize> {
        if self.is_full() {
            return None;
        }
        self.branches.push(branch);
        Some(self.branches.len() - 1)
    }

    fn insert(&mut self, spawn: BranchSpawn, max_points: usize) -> usize {
        let seed = derive_seed(self.base_seed, self.spawned);
        self.spawned += 1;
        self.branches.push(GrowthBranch::new(
            spawn.origin,
            spawn.heading,
            spawn.step_length,
            max_points,
            spawn.color,
            seed,
        ));
        self.branches.len() - 1
    }

    /// Grow every branch once and attach any children they spawn. Returns the
    /// index range of branches added this tick.
    pub fn grow_all(&mut self) -> std::ops::Range<usize> {
        let first_new = self.branches.len();
        let mut pending: SmallVec<[BranchSpawn; 4]> = SmallVec::new();
        for branch in &mut self.branches {
            let room = first_new + pending.len() < self.max_branches;
            if let Some(spawn) = branch.grow(room) {
                pending.push(spawn);
            }
        }
        for spawn in pending {
            let max_points = BRANCH_MAX_POINTS_MIN + self.rng.gen_range(0..BRANCH_MAX_POINTS_SPAN);
            self.insert(spawn, max_points);
        }
        first_new..self.branches.len()
    }
}
