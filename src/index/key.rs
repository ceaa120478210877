//! Bucket hashing for index keys.
//!
//! Every key type stored in a [`KeyedIndex`](super::KeyedIndex) must say how it
//! maps onto a bucket for a given table capacity. There is deliberately no
//! blanket implementation over [`std::hash::Hash`]: a key type without an
//! [`IndexKey`] impl is rejected at compile time.

/// Table sizes, in growth order. All prime.
pub const CAPACITIES: &[usize] = &[
    7, 17, 37, 79, 163, 331, 673, 1361, 2729, 5471, 10949, 21911, 43853, 87719, 175447, 350899,
    701819, 1403641, 2807303,
];

/// Multiplier for the polynomial string hash.
const STRING_BASE: u64 = 31;

/// Maps a key onto a bucket in `0..capacity`.
///
/// Implementations must be consistent with `Eq` and, where a key is looked up
/// through a borrowed form (`String` via `&str`), the owned and borrowed forms
/// must land in the same bucket.
pub trait IndexKey {
    fn bucket(&self, capacity: usize) -> usize;
}

macro_rules! unsigned_key {
    ($($ty:ty),*) => {
        $(
            impl IndexKey for $ty {
                #[inline]
                fn bucket(&self, capacity: usize) -> usize {
                    (*self as u64 % capacity as u64) as usize
                }
            }
        )*
    };
}

macro_rules! signed_key {
    ($($ty:ty),*) => {
        $(
            impl IndexKey for $ty {
                #[inline]
                fn bucket(&self, capacity: usize) -> usize {
                    (*self as i64).rem_euclid(capacity as i64) as usize
                }
            }
        )*
    };
}

unsigned_key!(u8, u16, u32, u64, usize);
signed_key!(i8, i16, i32, i64, isize);

impl IndexKey for str {
    fn bucket(&self, capacity: usize) -> usize {
        let modulus = capacity as u64;
        let mut hash = 0u64;
        let mut power = 1u64;
        for byte in self.bytes() {
            hash = (hash + (u64::from(byte) + 1) * power) % modulus;
            power = (power * STRING_BASE) % modulus;
        }
        hash as usize
    }
}

impl IndexKey for String {
    #[inline]
    fn bucket(&self, capacity: usize) -> usize {
        self.as_str().bucket(capacity)
    }
}

impl<T: IndexKey + ?Sized> IndexKey for &T {
    #[inline]
    fn bucket(&self, capacity: usize) -> usize {
        (**self).bucket(capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacities_are_ascending_primes() {
        let is_prime = |n: usize| n > 1 && (2..).take_while(|d| d * d <= n).all(|d| n % d != 0);
        assert!(CAPACITIES.iter().all(|&c| is_prime(c)));
        assert!(CAPACITIES.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn integers_hash_by_modulus() {
        assert_eq!(23u32.bucket(7), 2);
        assert_eq!(7usize.bucket(7), 0);
        assert_eq!((-1i32).bucket(7), 6);
    }

    #[test]
    fn string_and_str_agree() {
        for capacity in [7, 17, 1361] {
            let owned = String::from("notes.txt");
            assert_eq!(owned.bucket(capacity), "notes.txt".bucket(capacity));
            assert!(owned.bucket(capacity) < capacity);
        }
    }

    #[test]
    fn string_hash_is_positional() {
        // "ab" = (97 + 1) + (98 + 1) * 31 = 3167, "ba" = (98 + 1) + (97 + 1) * 31 = 3137
        assert_eq!("ab".bucket(10949), 3167);
        assert_eq!("ba".bucket(10949), 3137);
        assert_eq!("".bucket(7), 0);
    }
}
