use std::path::PathBuf;

/// 库级错误类型
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid format: {0}")]
    InvalidFormat(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("index serialization failed: {0}")]
    Serialization(#[from] bincode::Error),
    #[error("missing file: {0}")]
    MissingFile(PathBuf),
    #[error(transparent)]
    OutOfBounds(#[from] OutOfBounds),
}

/// 命中跨越 contig 边界或超出参考总长。属于预期结果，调用方丢弃该命中即可。
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("span [{pos}, {pos}+{span}) does not fit inside a single contig")]
pub struct OutOfBounds {
    pub pos: u64,
    pub span: u64,
}

pub type Result<T> = std::result::Result<T, Error>;
