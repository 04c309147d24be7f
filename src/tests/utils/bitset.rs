use crate::utils::bitset::BitSet;
use rand::prelude::*;

type Cycle = BitSet<usize, 2>;

#[test]
fn bits() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..20 {
        let count = rng.gen_range(10..200);
        let mut indices: Vec<usize> = (0..count).map(|_| rng.gen_range(0..2000)).collect();
        indices.sort_unstable();
        indices.dedup();

        let set: Cycle = indices.iter().copied().collect();
        assert_eq!(set.count_ones(), indices.len());
        assert_eq!(set.first_one(), indices.first().copied());
        for i in 0..2000 {
            assert_eq!(set.get(i), indices.binary_search(&i).is_ok());
        }
        assert!(set.iter_ones().eq(indices.iter().copied()));
    }
}

#[test]
fn clearing_high_bits() {
    let mut set: Cycle = [65].into_iter().collect();
    set.set(65, false);
    assert!(set.is_zero());
    assert_eq!(set.first_one(), None);
    // trailing zero words don't make sets unequal
    assert_eq!(set, Cycle::new());

    set.set(300, false);
    assert_eq!(set, Cycle::new());
}

#[test]
fn toggle() {
    let mut set = Cycle::new();
    set.toggle(3);
    set.toggle(130);
    set.toggle(3);
    assert!(set.iter_ones().eq([130]));
}

#[test]
fn xor_reduces() {
    let mut a: Cycle = [0, 3, 70].into_iter().collect();
    let b: Cycle = [3, 70, 200].into_iter().collect();
    a ^= &b;
    assert!(a.iter_ones().eq([0, 200]));
    assert_eq!(a.first_one(), Some(0));
    a ^= &[0, 200].into_iter().collect::<Cycle>();
    assert!(a.is_zero());
    assert_eq!(a.first_one(), None);
}

#[test]
fn reducing_a_dependent_cycle() {
    // three rings of a triangulated square: the third is the sum of the other two
    let left: Cycle = [0, 1, 4].into_iter().collect();
    let right: Cycle = [2, 3, 4].into_iter().collect();
    let outer: Cycle = [0, 1, 2, 3].into_iter().collect();
    let mut reduced = outer;
    reduced ^= &left;
    assert_eq!(reduced.first_one(), Some(2));
    reduced ^= &right;
    assert!(reduced.is_zero());
}
