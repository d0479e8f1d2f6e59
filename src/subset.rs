//! The constraint index set: a subset of `[0, n)` represented as a bitset.

use std::fmt;

/// A subset of constraint indices in `[0, n)`, stored as packed 64-bit words.
///
/// Cloning is cheap relative to a `HashSet<usize>` and membership/union/diff
/// operations are word-at-a-time, which matters since the enumerator
/// clones and compares subsets on every iteration.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Subset {
    words: Vec<u64>,
    len: usize,
}

impl Subset {
    pub fn empty(n: usize) -> Self {
        Subset {
            words: vec![0; n.div_ceil(64)],
            len: n,
        }
    }

    pub fn full(n: usize) -> Self {
        let mut s = Subset::empty(n);
        for i in 0..n {
            s.insert(i);
        }
        s
    }

    pub fn from_indices<I: IntoIterator<Item = usize>>(n: usize, indices: I) -> Self {
        let mut s = Subset::empty(n);
        for i in indices {
            s.insert(i);
        }
        s
    }

    pub fn n(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn contains(&self, i: usize) -> bool {
        debug_assert!(i < self.len);
        (self.words[i / 64] >> (i % 64)) & 1 != 0
    }

    #[inline]
    pub fn insert(&mut self, i: usize) {
        debug_assert!(i < self.len);
        self.words[i / 64] |= 1 << (i % 64);
    }

    #[inline]
    pub fn remove(&mut self, i: usize) {
        debug_assert!(i < self.len);
        self.words[i / 64] &= !(1 << (i % 64));
    }

    pub fn cardinality(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(move |&i| self.contains(i))
    }

    /// The complement `[0, n) \ self`.
    pub fn complement(&self) -> Subset {
        let mut out = self.clone();
        for w in out.words.iter_mut() {
            *w = !*w;
        }
        // clear the padding bits above `len` in the final word
        let rem = self.len % 64;
        if rem != 0 {
            if let Some(last) = out.words.last_mut() {
                *last &= (1u64 << rem) - 1;
            }
        }
        out
    }

    pub fn union(&self, other: &Subset) -> Subset {
        let mut out = self.clone();
        for (a, b) in out.words.iter_mut().zip(&other.words) {
            *a |= b;
        }
        out
    }

    pub fn is_subset_of(&self, other: &Subset) -> bool {
        self.words
            .iter()
            .zip(&other.words)
            .all(|(a, b)| a & !b == 0)
    }

    /// A canonical key for deduplication (e.g. in the Hub's result set).
    pub fn canonical_key(&self) -> Vec<u64> {
        self.words.clone()
    }
}

impl fmt::Debug for Subset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        let mut first = true;
        for i in self.iter() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{i}")?;
            first = false;
        }
        write!(f, "}}")
    }
}
