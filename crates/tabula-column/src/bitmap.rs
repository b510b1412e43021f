#![forbid(unsafe_code)]

/// A compact bit vector used for missing-value bitmaps and boolean storage.
///
/// Bits are stored little-endian within each `u64` word:
/// - bit 0 is the LSB of word 0
/// - bit 63 is the MSB of word 0
///
/// Bits past `len` are always zero, so two vectors built from the same history compare equal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitVec {
    words: Vec<u64>,
    len: usize,
    ones: usize,
}

impl BitVec {
    pub fn new() -> Self {
        Self {
            words: Vec::new(),
            len: 0,
            ones: 0,
        }
    }

    pub fn with_capacity_bits(bits: usize) -> Self {
        let words = (bits + 63) / 64;
        Self {
            words: Vec::with_capacity(words),
            len: 0,
            ones: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity_bits(&self) -> usize {
        self.words.capacity() * 64
    }

    pub fn push(&mut self, value: bool) {
        let bit = self.len % 64;
        if bit == 0 {
            self.words.push(0);
        }

        if value {
            let word = self.len / 64;
            self.words[word] |= 1u64 << bit;
            self.ones += 1;
        }

        self.len += 1;
    }

    /// Append `count` copies of `value`, filling whole words at a time.
    pub fn push_repeated(&mut self, value: bool, count: usize) {
        if count == 0 {
            return;
        }

        let new_len = self.len + count;
        self.words.resize((new_len + 63) / 64, 0);

        if value {
            let mut idx = self.len;
            while idx < new_len {
                let word = idx / 64;
                let bit = idx % 64;
                let take = (64 - bit).min(new_len - idx);
                let mask = if take == 64 {
                    u64::MAX
                } else {
                    ((1u64 << take) - 1) << bit
                };
                self.words[word] |= mask;
                idx += take;
            }
            self.ones += count;
        }

        self.len = new_len;
    }

    /// Append every bit of `other`, in order.
    pub fn extend_from_bitvec(&mut self, other: &BitVec) {
        if self.len % 64 == 0 {
            // Word-aligned: copy whole words.
            self.words.extend_from_slice(&other.words);
            self.len += other.len;
            self.ones += other.ones;
            return;
        }

        for idx in 0..other.len {
            self.push(other.get(idx));
        }
    }

    pub fn get(&self, index: usize) -> bool {
        debug_assert!(index < self.len, "BitVec index out of bounds");
        let word = self.words[index / 64];
        let bit = index % 64;
        ((word >> bit) & 1) == 1
    }

    pub fn count_ones(&self) -> usize {
        self.ones
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        self.words.shrink_to_fit();
    }
}

impl Default for BitVec {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_repeated_matches_individual_pushes() {
        let mut bulk = BitVec::new();
        let mut single = BitVec::new();
        for (value, count) in [(true, 3), (false, 70), (true, 130), (false, 1), (true, 64)] {
            bulk.push_repeated(value, count);
            for _ in 0..count {
                single.push(value);
            }
        }

        assert_eq!(bulk, single);
        assert_eq!(bulk.len(), 268);
        assert_eq!(bulk.count_ones(), 197);
    }

    #[test]
    fn extend_handles_unaligned_tail() {
        let mut a = BitVec::new();
        a.push(true);
        let mut b = BitVec::new();
        b.push_repeated(true, 65);
        b.push(false);

        a.extend_from_bitvec(&b);
        assert_eq!(a.len(), 67);
        assert_eq!(a.count_ones(), 66);
        assert!(a.get(65));
        assert!(!a.get(66));

        let mut aligned = BitVec::new();
        aligned.extend_from_bitvec(&b);
        assert_eq!(aligned, b);
    }
}
