//! 向量比对引擎的合成基准：随机 query 居中嵌入随机侧翼构成 target，重复比对计时。

use std::time::{Duration, Instant};

use rand::Rng;

use crate::align::sw::{self, SwBuffer};
use crate::align::vsw::{ScoredAlignment, VswOpt, VswQuery};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy)]
pub struct VswBenchOpt {
    pub query_len: usize,
    pub target_len: usize,
    pub iterations: usize,
    pub seed: u64,
    pub score_thr: i32,
    /// 每次迭代再用标量实现比对一次并比较结果
    pub verify: bool,
    pub scoring: VswOpt,
}

impl Default for VswBenchOpt {
    fn default() -> Self {
        Self {
            query_len: 150,
            target_len: 256,
            iterations: 1000,
            seed: 0,
            score_thr: 30,
            verify: false,
            scoring: VswOpt::default(),
        }
    }
}

impl VswBenchOpt {
    pub fn validate(&self) -> Result<()> {
        self.scoring.validate()?;
        if self.query_len == 0 {
            return Err(Error::InvalidConfig("query length must be positive".into()));
        }
        if self.target_len < self.query_len {
            return Err(Error::InvalidConfig(format!(
                "target length ({}) must be at least the query length ({})",
                self.target_len, self.query_len
            )));
        }
        if self.iterations == 0 {
            return Err(Error::InvalidConfig("iteration count must be positive".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BenchReport {
    /// 最后一次迭代的结果
    pub last: ScoredAlignment,
    pub elapsed: Duration,
    /// 与标量实现不一致的迭代数（未开启校验时为 0）
    pub mismatches: u64,
}

fn random_bases<R: Rng>(rng: &mut R, out: &mut [u8]) {
    out.iter_mut().for_each(|b| *b = rng.gen_range(0..4u8));
}

pub fn run_vsw_benchmark<R: Rng>(opt: &VswBenchOpt, rng: &mut R) -> Result<BenchReport> {
    opt.validate()?;

    let mut query = vec![0u8; opt.query_len];
    random_bases(rng, &mut query);
    let vq = VswQuery::<i16>::new(&query, &opt.scoring);

    let left = (opt.target_len - opt.query_len) / 2;
    let mut target = vec![0u8; opt.target_len];
    target[left..left + opt.query_len].copy_from_slice(&query);

    let mut buf = SwBuffer::new();
    let mut mismatches = 0u64;
    let mut last = ScoredAlignment::default();

    log::info!(
        "starting benchmark: query {} bp, target {} bp, {} iterations",
        opt.query_len,
        opt.target_len,
        opt.iterations
    );
    let start = Instant::now();
    for i in 0..opt.iterations {
        let (head, rest) = target.split_at_mut(left);
        random_bases(rng, head);
        random_bases(rng, &mut rest[opt.query_len..]);

        last = vq.align(&target, true, true, opt.score_thr);

        if opt.verify {
            let want = sw::align_with_buf(&query, &target, true, true, &opt.scoring, opt.score_thr, &mut buf);
            if want != last {
                mismatches += 1;
                log::warn!("iteration {}: vector {:?} != scalar {:?}", i, last, want);
            }
        }
    }
    let elapsed = start.elapsed();
    log::info!(
        "ending benchmark: {:.3} s ({:.1} us/alignment)",
        elapsed.as_secs_f64(),
        elapsed.as_secs_f64() * 1e6 / opt.iterations as f64
    );
    if opt.verify {
        log::info!(
            "verification: {} of {} iterations differ from the scalar aligner",
            mismatches,
            opt.iterations
        );
    }

    Ok(BenchReport { last, elapsed, mismatches })
}
