//! Deterministic per-tile seeding.
//!
//! Derives a tile-local seed from the world seed and a tile coordinate, and
//! a ChaCha8 RNG from that seed. Every probabilistic decoration decision on a
//! tile draws from this stream, so a tile decorates identically no matter
//! when, or on which thread, it is generated.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::tile::TileCoord;

/// splitmix64 finalizer.
#[inline]
fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

/// Derive the tile-local seed for `coord`.
///
/// Each input is folded in through a full avalanche round, so distinct
/// coordinates (including mirrored ones such as `(2, 3)` and `(3, 2)`, or
/// pairs sharing the same product) get unrelated seeds.
pub fn derive_tile_seed(world_seed: u64, coord: TileCoord) -> u64 {
    let mut h = mix64(world_seed.wrapping_add(GOLDEN_GAMMA));
    h = mix64(h ^ u64::from(coord.x as u32).wrapping_add(GOLDEN_GAMMA));
    h = mix64(h ^ u64::from(coord.z as u32).wrapping_mul(GOLDEN_GAMMA));
    h
}

/// Derive a deterministic RNG for a specific tile.
pub fn tile_rng(world_seed: u64, coord: TileCoord) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(derive_tile_seed(world_seed, coord))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;
    use std::collections::HashSet;

    #[test]
    fn test_derive_tile_seed_deterministic() {
        let coord = TileCoord::new(3, -2);
        assert_eq!(derive_tile_seed(42, coord), derive_tile_seed(42, coord));
    }

    #[test]
    fn test_mirrored_coords_differ() {
        assert_ne!(
            derive_tile_seed(42, TileCoord::new(2, 3)),
            derive_tile_seed(42, TileCoord::new(3, 2))
        );
    }

    #[test]
    fn test_equal_products_differ() {
        // These all share x * z == 12 or 0, which a product hash would collide on.
        let coords = [
            TileCoord::new(3, 4),
            TileCoord::new(4, 3),
            TileCoord::new(2, 6),
            TileCoord::new(-3, -4),
            TileCoord::new(0, 5),
            TileCoord::new(5, 0),
            TileCoord::new(0, 0),
        ];
        let seeds: HashSet<u64> = coords.iter().map(|&c| derive_tile_seed(42, c)).collect();
        assert_eq!(seeds.len(), coords.len());
    }

    #[test]
    fn test_no_collisions_in_neighbourhood() {
        let mut seeds = HashSet::new();
        for x in -32..32 {
            for z in -32..32 {
                assert!(
                    seeds.insert(derive_tile_seed(7, TileCoord::new(x, z))),
                    "seed collision at ({x}, {z})"
                );
            }
        }
    }

    #[test]
    fn test_different_world_seeds_differ() {
        let coord = TileCoord::new(5, 5);
        assert_ne!(derive_tile_seed(0, coord), derive_tile_seed(1, coord));
    }

    #[test]
    fn test_tile_rng_deterministic() {
        let coord = TileCoord::new(10, 20);
        let mut a = tile_rng(42, coord);
        let mut b = tile_rng(42, coord);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }
}
