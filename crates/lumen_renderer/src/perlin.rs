//! Perlin gradient noise.
//!
//! The tables are built once per `Perlin` value and only read afterwards,
//! so one instance can be shared (via `Arc`) by every noise texture in a scene.

use crate::sampling::gen_f32;
use lumen_math::Vec3;
use rand::RngCore;

const POINT_COUNT: usize = 256;

/// Default number of octaves summed by [`Perlin::turbulence`].
pub const DEFAULT_TURBULENCE_DEPTH: u32 = 7;

/// Gradient noise tables: random unit vectors plus one permutation per axis.
pub struct Perlin {
    ranvec: Vec<Vec3>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}

impl Perlin {
    /// Generate fresh noise tables.
    pub fn new(rng: &mut dyn RngCore) -> Self {
        let ranvec = (0..POINT_COUNT)
            .map(|_| {
                Vec3::new(
                    gen_f32(rng) * 2.0 - 1.0,
                    gen_f32(rng) * 2.0 - 1.0,
                    gen_f32(rng) * 2.0 - 1.0,
                )
                .normalize_or_zero()
            })
            .collect();

        Self {
            ranvec,
            perm_x: generate_perm(rng),
            perm_y: generate_perm(rng),
            perm_z: generate_perm(rng),
        }
    }

    /// Noise value at `p`, roughly in [-1, 1].
    pub fn noise(&self, p: Vec3) -> f32 {
        let floor = p.floor();
        let u = p.x - floor.x;
        let v = p.y - floor.y;
        let w = p.z - floor.z;

        let i = floor.x as i32;
        let j = floor.y as i32;
        let k = floor.z as i32;

        let mut c = [[[Vec3::ZERO; 2]; 2]; 2];
        for (di, plane) in c.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, corner) in row.iter_mut().enumerate() {
                    *corner = self.ranvec[self.perm_x[wrap(i + di as i32)]
                        ^ self.perm_y[wrap(j + dj as i32)]
                        ^ self.perm_z[wrap(k + dk as i32)]];
                }
            }
        }

        perlin_interp(&c, u, v, w)
    }

    /// Sum of `depth` octaves at doubling frequency and halving weight.
    pub fn turbulence(&self, p: Vec3, depth: u32) -> f32 {
        let mut accum = 0.0;
        let mut temp_p = p;
        let mut weight = 1.0;

        for _ in 0..depth {
            accum += weight * self.noise(temp_p);
            weight *= 0.5;
            temp_p *= 2.0;
        }

        accum.abs()
    }
}

/// Lattice coordinate to table index; negative coordinates wrap too.
#[inline]
fn wrap(n: i32) -> usize {
    (n & (POINT_COUNT as i32 - 1)) as usize
}

/// Fisher-Yates shuffle of `0..POINT_COUNT`.
fn generate_perm(rng: &mut dyn RngCore) -> Vec<usize> {
    let mut p: Vec<usize> = (0..POINT_COUNT).collect();
    for i in (1..POINT_COUNT).rev() {
        let target = ((gen_f32(rng) * (i + 1) as f32) as usize).min(i);
        p.swap(i, target);
    }
    p
}

/// Trilinear blend of corner gradient dot products with smoothstep weights.
fn perlin_interp(c: &[[[Vec3; 2]; 2]; 2], u: f32, v: f32, w: f32) -> f32 {
    let uu = u * u * (3.0 - 2.0 * u);
    let vv = v * v * (3.0 - 2.0 * v);
    let ww = w * w * (3.0 - 2.0 * w);

    let mut accum = 0.0;
    for (i, plane) in c.iter().enumerate() {
        for (j, row) in plane.iter().enumerate() {
            for (k, gradient) in row.iter().enumerate() {
                let (fi, fj, fk) = (i as f32, j as f32, k as f32);
                let weight_v = Vec3::new(u - fi, v - fj, w - fk);
                accum += (fi * uu + (1.0 - fi) * (1.0 - uu))
                    * (fj * vv + (1.0 - fj) * (1.0 - vv))
                    * (fk * ww + (1.0 - fk) * (1.0 - ww))
                    * gradient.dot(weight_v);
            }
        }
    }
    accum
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn perlin() -> Perlin {
        Perlin::new(&mut StdRng::seed_from_u64(42))
    }

    #[test]
    fn test_permutations_are_permutations() {
        let p = perlin();
        for perm in [&p.perm_x, &p.perm_y, &p.perm_z] {
            let mut sorted = perm.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, (0..POINT_COUNT).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_gradients_are_unit() {
        let p = perlin();
        assert_eq!(p.ranvec.len(), POINT_COUNT);
        for g in &p.ranvec {
            assert!((g.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_noise_vanishes_on_lattice_points() {
        let p = perlin();
        for point in [Vec3::ZERO, Vec3::new(3.0, -2.0, 7.0), Vec3::new(-100.0, 5.0, 1.0)] {
            assert!(p.noise(point).abs() < 1e-5);
        }
    }

    #[test]
    fn test_noise_is_bounded_and_continuous() {
        let p = perlin();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..500 {
            let point = Vec3::new(
                gen_f32(&mut rng) * 40.0 - 20.0,
                gen_f32(&mut rng) * 40.0 - 20.0,
                gen_f32(&mut rng) * 40.0 - 20.0,
            );
            let n = p.noise(point);
            assert!(n.abs() <= 1.5, "noise {n} at {point:?}");
            let nearby = p.noise(point + Vec3::splat(1e-3));
            assert!((n - nearby).abs() < 0.05);
        }
    }

    #[test]
    fn test_same_seed_same_noise() {
        let a = perlin();
        let b = perlin();
        let point = Vec3::new(1.3, 2.7, -0.4);
        assert_eq!(a.noise(point), b.noise(point));
    }

    #[test]
    fn test_turbulence_non_negative() {
        let p = perlin();
        for x in 0..50 {
            let point = Vec3::new(x as f32 * 0.37, 1.1, -2.3);
            assert!(p.turbulence(point, DEFAULT_TURBULENCE_DEPTH) >= 0.0);
        }
        assert_eq!(p.turbulence(Vec3::new(0.5, 0.5, 0.5), 0), 0.0);
    }
}
