//! 洗牌服务 - 业务能力层
//!
//! 所有题目顺序、选项顺序的随机化都走这里

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use std::str::FromStr;

/// 洗牌时生成交换位置所用的随机数模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShuffleMode {
    /// 三次均匀随机数取平均（与网页版行为一致，交换位置略偏向中间）
    #[default]
    Averaged,
    /// 标准均匀洗牌（`SliceRandom::shuffle`）
    Uniform,
}

impl FromStr for ShuffleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "averaged" => Ok(ShuffleMode::Averaged),
            "uniform" => Ok(ShuffleMode::Uniform),
            other => Err(format!("未知的洗牌模式: {}", other)),
        }
    }
}

/// 洗牌器
#[derive(Debug, Clone, Copy, Default)]
pub struct Shuffler {
    mode: ShuffleMode,
}

impl Shuffler {
    pub fn new(mode: ShuffleMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ShuffleMode {
        self.mode
    }

    /// 返回一个打乱后的新序列，不修改输入
    pub fn shuffle<T: Clone, R: Rng + ?Sized>(&self, items: &[T], rng: &mut R) -> Vec<T> {
        let mut shuffled = items.to_vec();

        match self.mode {
            ShuffleMode::Averaged => averaged_shuffle(&mut shuffled, rng),
            ShuffleMode::Uniform => shuffled.shuffle(rng),
        }

        shuffled
    }
}

/// 从最后一个位置往前遍历，每个位置 `i` 用三次随机数的平均值在 `[0, i]` 中选出交换目标
fn averaged_shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let a: f64 = rng.random();
        let b: f64 = rng.random();
        let c: f64 = rng.random();
        let fraction = (a + b + c) / 3.0;
        // fraction < 1，所以 j 不会超过 i
        let j = ((fraction * (i + 1) as f64) as usize).min(i);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sorted<T: Ord + Clone>(items: &[T]) -> Vec<T> {
        let mut v = items.to_vec();
        v.sort();
        v
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = StdRng::seed_from_u64(42);
        let input: Vec<u32> = (0..50).collect();

        for mode in [ShuffleMode::Averaged, ShuffleMode::Uniform] {
            let shuffler = Shuffler::new(mode);
            for _ in 0..20 {
                let out = shuffler.shuffle(&input, &mut rng);
                assert_eq!(out.len(), input.len());
                assert_eq!(sorted(&out), input);
            }
        }
    }

    #[test]
    fn test_shuffle_does_not_touch_input() {
        let mut rng = StdRng::seed_from_u64(7);
        let input = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let copy = input.clone();

        let _ = Shuffler::default().shuffle(&input, &mut rng);

        assert_eq!(input, copy);
    }

    #[test]
    fn test_shuffle_handles_duplicates_and_small_inputs() {
        let mut rng = StdRng::seed_from_u64(1);
        let shuffler = Shuffler::default();

        let empty: Vec<String> = Vec::new();
        assert!(shuffler.shuffle(&empty, &mut rng).is_empty());
        assert_eq!(shuffler.shuffle(&["x"], &mut rng), vec!["x"]);

        // 值相同的元素也按位置处理，不依赖身份
        let dup = vec!["same", "same", "other"];
        assert_eq!(sorted(&shuffler.shuffle(&dup, &mut rng)), sorted(&dup));
    }

    #[test]
    fn test_shuffle_actually_reorders() {
        let mut rng = StdRng::seed_from_u64(3);
        let input: Vec<u32> = (0..20).collect();
        let shuffler = Shuffler::default();

        let changed = (0..10).any(|_| shuffler.shuffle(&input, &mut rng) != input);
        assert!(changed);
    }

    /// 三个元素时最后位置的交换目标 j=1 的概率：均匀模式为 1/3，平均模式为 2/3
    #[test]
    fn test_averaged_mode_biases_toward_middle() {
        let mut rng = StdRng::seed_from_u64(2024);
        let input = [0u8, 1, 2];
        let rounds = 20_000;

        let count_last_from_middle = |mode: ShuffleMode, rng: &mut StdRng| {
            let shuffler = Shuffler::new(mode);
            (0..rounds)
                .filter(|_| {
                    // 只看第一次交换：最后位置的元素来自哪里
                    let out = shuffler.shuffle(&input, &mut *rng);
                    out[2] == 1
                })
                .count() as f64
                / rounds as f64
        };

        let averaged = count_last_from_middle(ShuffleMode::Averaged, &mut rng);
        let uniform = count_last_from_middle(ShuffleMode::Uniform, &mut rng);

        assert!((uniform - 1.0 / 3.0).abs() < 0.03, "uniform = {}", uniform);
        assert!(averaged > 0.5, "averaged = {}", averaged);
    }

    #[test]
    fn test_uniform_mode_matches_slice_shuffle() {
        let input: Vec<u32> = (0..30).collect();

        let out = Shuffler::new(ShuffleMode::Uniform).shuffle(&input, &mut StdRng::seed_from_u64(11));

        let mut expected = input.clone();
        expected.shuffle(&mut StdRng::seed_from_u64(11));
        assert_eq!(out, expected);
        assert_eq!(Shuffler::new(ShuffleMode::Uniform).mode(), ShuffleMode::Uniform);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("Uniform".parse::<ShuffleMode>(), Ok(ShuffleMode::Uniform));
        assert_eq!("averaged".parse::<ShuffleMode>(), Ok(ShuffleMode::Averaged));
        assert!("random".parse::<ShuffleMode>().is_err());
    }
}
