/// Small seeded PRNG for word and profile picks.
///
/// This is `xoshiro256**` seeded via SplitMix64, so an engine built with the
/// same seed makes the same picks.
#[derive(Clone, Debug)]
pub struct GameRng {
    state: [u64; 4],
}

impl GameRng {
    pub fn seed_from_u64(seed: u64) -> Self {
        // SplitMix64 expansion of the seed into the four state words.
        let mut acc = seed;
        let state = std::array::from_fn(|_| {
            acc = acc.wrapping_add(0x9e37_79b9_7f4a_7c15);
            let mut z = acc;
            z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
            z ^ (z >> 31)
        });
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        let result = self.state[1].wrapping_mul(5).rotate_left(7).wrapping_mul(9);

        let t = self.state[1] << 17;

        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];

        self.state[2] ^= t;

        self.state[3] = self.state[3].rotate_left(45);

        result
    }

    /// Uniform index in `0..len`. Returns 0 for an empty range.
    pub fn index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        let span = len as u64;
        let threshold = u64::MAX - (u64::MAX % span);
        loop {
            let x = self.next_u64();
            if x < threshold {
                return (x % span) as usize;
            }
        }
    }

    /// Uniform pick from `items`.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let i = self.index(items.len());
        items.get(i)
    }

    /// Up to `count` distinct elements of `items`, in random order.
    ///
    /// Partial Fisher-Yates over an index table, so no element is drawn twice
    /// within one call.
    pub fn sample<'a, T>(&mut self, items: &'a [T], count: usize) -> Vec<&'a T> {
        let mut order: Vec<usize> = (0..items.len()).collect();
        let count = count.min(order.len());
        for i in 0..count {
            let j = i + self.index(order.len() - i);
            order.swap(i, j);
        }
        order[..count].iter().map(|&i| &items[i]).collect()
    }
}
