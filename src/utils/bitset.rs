use num::{BigUint, Zero};

/// Set bit counting.
///
/// An integer is read as a set of small positive integers: bit `i` set means `i + 1` is a member.
///
/// ```
/// use tf_idf_similarity::utils::bitset::cardinality;
/// assert_eq!(cardinality(&0b1101_u32), 3); // {1, 3, 4}
/// ```
pub trait Cardinality {
    /// number of set bits
    fn cardinality(&self) -> u64;
}

macro_rules! impl_cardinality_prim {
    ($($t:ty),*) => {
        $(
            impl Cardinality for $t {
                #[inline]
                fn cardinality(&self) -> u64 {
                    self.count_ones() as u64
                }
            }
        )*
    };
}

impl_cardinality_prim!(u8, u16, u32, u64, u128, usize);

impl Cardinality for BigUint {
    #[inline]
    fn cardinality(&self) -> u64 {
        self.to_u64_digits()
            .iter()
            .map(|digit| digit.count_ones() as u64)
            .sum()
    }
}

/// Count the set bits of any bitset.
#[inline]
pub fn cardinality<B: Cardinality + ?Sized>(bitset: &B) -> u64 {
    bitset.cardinality()
}

/// Growable bitset of document positions.
///
/// Backed by an unbounded integer, so the highest position decides the memory footprint.
/// Dense, small positions are the intended use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocBitSet {
    bits: BigUint,
}

impl DocBitSet {
    pub fn new() -> Self {
        Self { bits: BigUint::zero() }
    }

    /// set bit `position` (0-based)
    #[inline]
    pub fn insert(&mut self, position: u64) {
        self.bits.set_bit(position, true);
    }

    /// check bit `position` (0-based)
    #[inline]
    pub fn contains(&self, position: u64) -> bool {
        self.bits.bit(position)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_zero()
    }

    /// Borrow the raw integer.
    pub fn as_biguint(&self) -> &BigUint {
        &self.bits
    }
}

impl Cardinality for DocBitSet {
    #[inline]
    fn cardinality(&self) -> u64 {
        self.bits.cardinality()
    }
}

impl FromIterator<u64> for DocBitSet {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        let mut set = DocBitSet::new();
        for position in iter {
            set.insert(position);
        }
        set
    }
}
