use std::{fmt::Debug, hash::Hash};

/// Document identifier supplied by the caller.
///
/// Keys only need to be comparable and hashable. `bit_position` is consulted by the
/// bitset document count alone, which maps id `n` to bit `n - 1`; ids without an integer
/// form (or integers below 1) return `None` there and are rejected by that strategy.
pub trait DocumentId: Clone + Eq + Hash + Ord + Debug + Send + Sync {
    /// 0-based bit for the bitset document count
    fn bit_position(&self) -> Option<u64> {
        None
    }
}

macro_rules! impl_document_id_int {
    ($($t:ty),*) => {
        $(
            impl DocumentId for $t {
                #[inline]
                fn bit_position(&self) -> Option<u64> {
                    num::ToPrimitive::to_u64(self)
                        .and_then(|id| id.checked_sub(1))
                }
            }
        )*
    };
}

impl_document_id_int!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

impl DocumentId for String {}
impl DocumentId for Box<str> {}
impl DocumentId for &'static str {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_ids_map_to_zero_based_bits() {
        assert_eq!(1u32.bit_position(), Some(0));
        assert_eq!(64i64.bit_position(), Some(63));
        assert_eq!(0usize.bit_position(), None);
        assert_eq!((-3i32).bit_position(), None);
    }

    #[test]
    fn string_ids_have_no_bit() {
        assert_eq!("doc1".to_string().bit_position(), None);
        assert_eq!("doc1".bit_position(), None);
    }
}
