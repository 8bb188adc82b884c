use std::fmt::{self, Debug, Formatter};

type BitBlock = u64;

const BLOCK_NBITS: usize = std::mem::size_of::<BitBlock>() * 8;

/// Fixed size set of small integers. Used for per-production flags, indexed
/// by a production's position in its grammar.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BitSet {
    slice: Box<[BitBlock]>,
}

impl BitSet {
    pub fn new(num_bits: usize) -> Self {
        let len = (num_bits + BLOCK_NBITS - 1) / BLOCK_NBITS;
        Self {
            slice: vec![0; len].into_boxed_slice(),
        }
    }

    /// Returns whether the bit was newly inserted.
    pub fn insert(&mut self, bit: usize) -> bool {
        let mask = 1 << (bit % BLOCK_NBITS);
        let block = &mut self.slice[bit / BLOCK_NBITS];
        let inserted = *block & mask == 0;
        *block |= mask;
        inserted
    }

    pub fn contains(&self, bit: usize) -> bool {
        self.slice
            .get(bit / BLOCK_NBITS)
            .map_or(false, |block| block & (1 << (bit % BLOCK_NBITS)) != 0)
    }

    pub fn iter(&self) -> Iter {
        Iter {
            slice: &*self.slice,
            bit: 0,
            index: 0,
        }
    }
}

pub struct Iter<'a> {
    slice: &'a [BitBlock],
    bit: usize,
    index: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while self.index < self.slice.len() {
            if self.bit < BLOCK_NBITS {
                let bit = (self.slice[self.index] & !((1 << self.bit) - 1)).trailing_zeros() as usize;
                if bit < BLOCK_NBITS {
                    self.bit = bit + 1;
                    return Some(self.index * BLOCK_NBITS + bit);
                }
            }

            self.index += 1;
            self.bit = 0;
        }
        None
    }
}

impl Debug for BitSet {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::BitSet;
    use pretty_assertions::assert_eq;

    #[test]
    fn insert() {
        let mut set = BitSet::new(70);

        assert!(set.insert(7));
        assert!(set.insert(3));
        assert!(!set.insert(7));
        assert!(set.insert(64));

        let vec = set.iter().collect::<Vec<_>>();

        assert_eq!(vec, vec![3, 7, 64]);
        assert!(set.contains(64));
        assert!(!set.contains(65));
        assert!(!set.contains(1000));
    }
}
