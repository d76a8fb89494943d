//! Short identifier generation for mangled keys.

/// Digits used for generated identifiers, in code-point order.
pub const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Encode `n` in base 62 using [`ALPHABET`] as digits, most significant first.
///
/// ```
/// use keymangle::core::id_gen::encode;
///
/// assert_eq!(encode(0), "0");
/// assert_eq!(encode(61), "z");
/// assert_eq!(encode(62), "10");
/// ```
pub fn encode(mut n: u64) -> String {
    let base = ALPHABET.len() as u64;
    let mut digits = Vec::new();
    loop {
        digits.push(ALPHABET[(n % base) as usize]);
        n /= base;
        if n == 0 {
            break;
        }
    }
    digits.reverse();
    // Every byte comes from the ASCII alphabet.
    digits.into_iter().map(char::from).collect()
}

/// Infinite sequence of identifiers: `0`, `1`, ..., `z`, `10`, `11`, ...
///
/// A generator never yields the same value twice. Values grow in shortlex
/// order, so a later identifier is never shorter than an earlier one.
#[derive(Debug, Default)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next identifier in the sequence.
    pub fn next_id(&mut self) -> String {
        let id = encode(self.next);
        self.next += 1;
        id
    }
}

impl Iterator for IdGenerator {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        Some(self.next_id())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_first_values() {
        let ids: Vec<String> = IdGenerator::new().take(12).collect();
        assert_eq!(
            ids,
            vec!["0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "A", "B"]
        );
    }

    #[test]
    fn test_alphabet_boundaries() {
        assert_eq!(encode(9), "9");
        assert_eq!(encode(10), "A");
        assert_eq!(encode(35), "Z");
        assert_eq!(encode(36), "a");
        assert_eq!(encode(61), "z");
        assert_eq!(encode(62), "10");
        assert_eq!(encode(63), "11");
        assert_eq!(encode(62 * 62 - 1), "zz");
        assert_eq!(encode(62 * 62), "100");
    }

    #[test]
    fn test_generator_matches_encode() {
        let mut id_gen = IdGenerator::new();
        for n in 0..500 {
            assert_eq!(id_gen.next().unwrap(), encode(n));
        }
        assert_eq!(id_gen.next_id(), encode(500));
    }

    #[test]
    fn test_values_are_distinct_and_increasing() {
        let ids: Vec<String> = IdGenerator::new().take(5000).collect();
        let unique: HashSet<&String> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());

        for pair in ids.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(
                (a.len(), a.as_str()) < (b.len(), b.as_str()),
                "{a} should sort before {b}"
            );
        }
    }

    #[test]
    fn test_fresh_generators_restart() {
        let mut first = IdGenerator::new();
        first.by_ref().take(3).for_each(drop);
        let mut second = IdGenerator::new();
        assert_eq!(second.next().as_deref(), Some("0"));
        assert_eq!(first.next().as_deref(), Some("3"));
    }
}
