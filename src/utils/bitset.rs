//! Growable bit vectors, used as cycle vectors over GF(2) when building a ring basis.

use num_traits::PrimInt;
use smallvec::SmallVec;
use std::fmt::{self, Binary, Debug, Formatter};
use std::ops::BitXorAssign;

/// A set of small integers packed into words of `T`, with the first `N` words inline.
#[derive(Default, Clone)]
pub struct BitSet<T, const N: usize>(SmallVec<T, N>);
impl<T: PrimInt, const N: usize> BitSet<T, N> {
    const BITS: usize = std::mem::size_of::<T>() * 8;

    pub const fn new() -> Self {
        Self(SmallVec::new())
    }

    fn split(idx: usize) -> (usize, T) {
        (idx / Self::BITS, T::one() << (idx % Self::BITS))
    }

    pub fn get(&self, idx: usize) -> bool {
        let (word, mask) = Self::split(idx);
        self.0.get(word).map_or(false, |&w| w & mask != T::zero())
    }
    pub fn set(&mut self, idx: usize, bit: bool) {
        let (word, mask) = Self::split(idx);
        if word >= self.0.len() {
            if !bit {
                return;
            }
            self.0.resize(word + 1, T::zero());
        }
        let w = &mut self.0[word];
        *w = if bit { *w | mask } else { *w & !mask };
    }
    /// Flip a bit, which is addition in GF(2).
    pub fn toggle(&mut self, idx: usize) {
        let on = self.get(idx);
        self.set(idx, !on);
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|w| w.is_zero())
    }
    pub fn count_ones(&self) -> usize {
        self.0.iter().map(|w| w.count_ones() as usize).sum()
    }
    /// The lowest set bit. This is the pivot when reducing against a basis.
    pub fn first_one(&self) -> Option<usize> {
        self.0
            .iter()
            .position(|w| !w.is_zero())
            .map(|n| n * Self::BITS + self.0[n].trailing_zeros() as usize)
    }
    /// Indices of the set bits, ascending.
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().enumerate().flat_map(|(n, &w)| {
            let mut rest = w;
            std::iter::from_fn(move || {
                if rest.is_zero() {
                    return None;
                }
                let bit = rest.trailing_zeros() as usize;
                rest = rest & (rest - T::one());
                Some(n * Self::BITS + bit)
            })
        })
    }

    fn trimmed(&self) -> &[T] {
        let len = self
            .0
            .iter()
            .rposition(|w| !w.is_zero())
            .map_or(0, |i| i + 1);
        &self.0[..len]
    }
}

impl<T: PrimInt, const N: usize> PartialEq for BitSet<T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.trimmed() == other.trimmed()
    }
}
impl<T: PrimInt, const N: usize> Eq for BitSet<T, N> {}

impl<T: PrimInt, const N: usize> FromIterator<usize> for BitSet<T, N> {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut out = Self::new();
        for i in iter {
            out.set(i, true);
        }
        out
    }
}

impl<T: PrimInt, const N: usize> BitXorAssign<&Self> for BitSet<T, N> {
    fn bitxor_assign(&mut self, rhs: &Self) {
        if rhs.0.len() > self.0.len() {
            self.0.resize(rhs.0.len(), T::zero());
        }
        for (l, &r) in self.0.iter_mut().zip(&rhs.0) {
            *l = *l ^ r;
        }
    }
}

impl<T: PrimInt + Binary, const N: usize> Debug for BitSet<T, N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut l = f.debug_list();
        for w in self.trimmed() {
            l.entry(&format_args!("{w:0>0$b}", Self::BITS));
        }
        l.finish()
    }
}
