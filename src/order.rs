use std::cmp::Ordering;

/// A strict total order over keys.
///
/// The tree trusts the order: an implementation that is not a strict total
/// order leaves the tree in an unspecified (but memory safe) shape, which
/// [`crate::Tree::check`] will report.
pub trait KeyOrder<K: ?Sized> {
    fn compare(&self, a: &K, b: &K) -> Ordering;

    #[inline]
    fn less_than(&self, a: &K, b: &K) -> bool {
        self.compare(a, b) == Ordering::Less
    }

    #[inline]
    fn not_equal(&self, a: &K, b: &K) -> bool {
        self.compare(a, b) != Ordering::Equal
    }
}

/// Shorter keys first; keys of equal length compare bytewise.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ShortLex;

impl<K: AsRef<[u8]> + ?Sized> KeyOrder<K> for ShortLex {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        let (a, b) = (a.as_ref(), b.as_ref());
        a.len().cmp(&b.len()).then_with(|| a.cmp(b))
    }
}

/// The key type's own [`Ord`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Natural;

impl<K: Ord + ?Sized> KeyOrder<K> for Natural {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

impl<K: ?Sized, F> KeyOrder<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn shortlex_puts_length_first() {
        assert!(ShortLex.less_than("z", "aa"));
        assert!(ShortLex.less_than("9", "10"));
        assert!(!ShortLex.less_than("10", "9"));
        assert!(ShortLex.less_than("ab", "ac"));
        assert!(!ShortLex.less_than("ab", "ab"));
        assert!(!ShortLex.not_equal("ab", "ab"));
        assert!(ShortLex.not_equal("ab", "ba"));
        assert!(ShortLex.less_than("", "a"));
    }

    #[test]
    fn shortlex_over_owned_and_bytes() {
        let a = String::from("abc");
        let b = String::from("abd");
        assert_eq!(Ordering::Less, ShortLex.compare(&a, &b));
        assert_eq!(
            Ordering::Greater,
            ShortLex.compare(&b"abcd"[..], &b"zzz"[..])
        );
    }

    #[test]
    fn natural_and_closures() {
        assert_eq!(Ordering::Less, Natural.compare(&9, &10));
        assert_eq!(Ordering::Greater, Natural.compare("9", "10"));

        let reversed = |a: &i64, b: &i64| b.cmp(a);
        assert!(reversed.less_than(&10, &9));
        assert!(!reversed.not_equal(&3, &3));
    }
}
