use std::fs::File;
use std::io::{BufReader, BufWriter, Write};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

use fmap_rust::align::{map_exact, VswOpt};
use fmap_rust::bench::{run_vsw_benchmark, VswBenchOpt};
use fmap_rust::index::fm::{index_path, FmIndex, IndexMeta, IndexOpt};
use fmap_rust::io::fasta::FastaReader;
use fmap_rust::io::reads::ReadSource;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "fmap-rust", author, version, about = "FM-index exact mapper and vector Smith-Waterman engine", arg_required_else_help = true)]
struct Cli {
    /// 日志级别：0 关闭，1 error，2 warn，3 info，4 debug，5 trace
    #[arg(short = 'v', long = "verbosity", global = true, default_value_t = 3)]
    verbosity: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build an FM index of the reference FASTA
    Index {
        /// Reference FASTA file
        reference: String,
        /// Output prefix (defaults to the reference path)
        #[arg(short = 'p', long)]
        prefix: Option<String>,
        /// Suffix array sampling interval (ranks)
        #[arg(long, default_value_t = 32)]
        sa_interval: u32,
        /// Occurrence table sampling interval
        #[arg(long, default_value_t = 128)]
        occ_interval: u32,
    },
    /// Map reads by exact matching on both strands
    Exact {
        /// Reference FASTA; its index is read from <REF.FA>.fmi
        #[arg(short = 'f', long = "fn-fasta")]
        reference: String,
        /// Reads (FASTQ or FASTA)
        #[arg(short = 'r', long = "fn-reads")]
        reads: String,
        /// Output SAM path (stdout if omitted)
        #[arg(short = 'o', long)]
        out: Option<String>,
    },
    /// Benchmark the vector Smith-Waterman engine on synthetic data
    Vswbm {
        /// Query length
        #[arg(short = 'q', long = "query-length", default_value_t = 150)]
        query_len: usize,
        /// Target length
        #[arg(short = 't', long = "target-length", default_value_t = 256)]
        target_len: usize,
        /// Number of iterations
        #[arg(short = 'n', long = "iterations", default_value_t = 1000)]
        iterations: usize,
        /// Random seed
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Re-score every iteration with the scalar aligner and report differences
        #[arg(long)]
        verify: bool,
        #[command(flatten)]
        scoring: ScoringArgs,
    },
}

#[derive(Args, Debug)]
struct ScoringArgs {
    /// Match score
    #[arg(short = 'A', long = "match", default_value_t = 5)]
    match_score: i32,
    /// Mismatch penalty
    #[arg(short = 'M', long = "mismatch", default_value_t = 3)]
    mismatch_penalty: i32,
    /// Gap open penalty
    #[arg(short = 'O', long = "gap-open", default_value_t = 12)]
    gap_open: i32,
    /// Gap extension penalty
    #[arg(short = 'E', long = "gap-extend", default_value_t = 6)]
    gap_extend: i32,
    /// Minimum score for computing start coordinates
    #[arg(short = 'T', long = "score-thr", default_value_t = 30)]
    score_thr: i32,
}

impl ScoringArgs {
    fn opt(&self) -> VswOpt {
        VswOpt {
            match_score: self.match_score,
            mismatch_penalty: self.mismatch_penalty,
            gap_open: self.gap_open,
            gap_extend: self.gap_extend,
        }
    }
}

fn init_logger(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Off,
        1 => log::LevelFilter::Error,
        2 => log::LevelFilter::Warn,
        3 => log::LevelFilter::Info,
        4 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbosity);

    match cli.command {
        Commands::Index { reference, prefix, sa_interval, occ_interval } => {
            let opt = IndexOpt { sa_interval, occ_interval, ..IndexOpt::default() };
            let prefix = prefix.unwrap_or_else(|| reference.clone());
            run_index(&reference, &prefix, &opt)
        }
        Commands::Exact { reference, reads, out } => run_exact(&reference, &reads, out.as_deref()),
        Commands::Vswbm { query_len, target_len, iterations, seed, verify, scoring } => {
            let opt = VswBenchOpt {
                query_len,
                target_len,
                iterations,
                seed,
                score_thr: scoring.score_thr,
                verify,
                scoring: scoring.opt(),
            };
            run_vswbm(&opt)
        }
    }
}

fn run_index(reference: &str, prefix: &str, opt: &IndexOpt) -> Result<()> {
    if opt.sa_interval == 0 || opt.occ_interval == 0 {
        bail!("sampling intervals must be positive");
    }
    let fh = File::open(reference).with_context(|| format!("cannot open reference FASTA '{}'", reference))?;
    let mut reader = FastaReader::new(BufReader::new(fh));
    let mut fm = FmIndex::from_fasta(&mut reader, opt)
        .with_context(|| format!("cannot build index from '{}'", reference))?;
    fm.set_meta(IndexMeta {
        reference_file: Some(reference.to_string()),
        build_args: Some(std::env::args().collect::<Vec<_>>().join(" ")),
        build_timestamp: Some(chrono::Utc::now().to_rfc3339()),
    });
    log::info!("reference: {} ({} contigs, {} bp)", reference, fm.pac.contigs().len(), fm.pac.len());

    let out_path = index_path(prefix);
    fm.save_to_file(&out_path)
        .with_context(|| format!("cannot write index to '{}'", out_path))?;
    log::info!("index saved: {}", out_path);
    Ok(())
}

fn run_exact(reference: &str, reads: &str, out: Option<&str>) -> Result<()> {
    let idx_path = index_path(reference);
    let fm = FmIndex::load_from_file(&idx_path).with_context(|| format!("cannot load index '{}'", idx_path))?;
    log::info!("loaded index {} ({} contigs, {} bp)", idx_path, fm.pac.contigs().len(), fm.pac.len());

    let mut src = ReadSource::open(reads).with_context(|| format!("cannot open reads '{}'", reads))?;
    let mut writer: Box<dyn Write> = match out {
        Some(p) => Box::new(BufWriter::new(File::create(p).with_context(|| format!("cannot create '{}'", p))?)),
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };
    map_exact(&fm, &mut src, &mut writer)?;
    Ok(())
}

fn run_vswbm(opt: &VswBenchOpt) -> Result<()> {
    opt.validate().context("invalid benchmark options")?;
    let mut rng = StdRng::seed_from_u64(opt.seed);
    let report = run_vsw_benchmark(opt, &mut rng)?;
    let r = report.last;
    println!(
        "score_fwd={} score_rev={} query=[{},{}] target=[{},{}] n_best={} overflow={}",
        r.score_fwd, r.score_rev, r.query_start, r.query_end, r.target_start, r.target_end, r.n_best, r.overflow
    );
    if opt.verify && report.mismatches > 0 {
        bail!("{} iterations disagree with the scalar aligner", report.mismatches);
    }
    Ok(())
}
