use glam::Vec3;
use rand::Rng;

/// Random point inside a ball: uniform direction from a cube sample, uniform
/// (not volume-weighted) radius, so points cluster toward the center.
pub fn random_point_in_sphere<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec3 {
    let v = random_in_cube(rng);
    let dir = v.try_normalize().unwrap_or(Vec3::Y);
    dir * (rng.gen::<f32>() * radius)
}

pub fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    random_in_cube(rng).try_normalize().unwrap_or(Vec3::Y)
}

/// Each component uniform in `[-1, 1)`.
pub fn random_in_cube<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    Vec3::new(
        rng.gen::<f32>() * 2.0 - 1.0,
        rng.gen::<f32>() * 2.0 - 1.0,
        rng.gen::<f32>() * 2.0 - 1.0,
    )
}

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// Mix a base seed with an entity index so entities get independent streams.
/// Every index, `u64::MAX` included, goes through the full mix.
pub fn derive_seed(base: u64, index: u64) -> u64 {
    splitmix64(base ^ splitmix64(index.wrapping_add(GOLDEN_GAMMA)))
}

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(GOLDEN_GAMMA);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
