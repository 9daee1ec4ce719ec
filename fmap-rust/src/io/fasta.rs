use std::io::BufRead;

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct FastaRecord {
    pub id: String,
    pub desc: Option<String>,
    /// 原样保留大小写，只去掉空白
    pub seq: Vec<u8>,
}

/// 按字节读取的 FASTA 解析器，支持多行序列与 CRLF。
pub struct FastaReader<R: BufRead> {
    reader: R,
    line: Vec<u8>,
    peek_header: Option<Vec<u8>>,
    done: bool,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, line: Vec::new(), peek_header: None, done: false }
    }

    fn read_line(&mut self) -> Result<bool> {
        self.line.clear();
        Ok(self.reader.read_until(b'\n', &mut self.line)? > 0)
    }

    pub fn next_record(&mut self) -> Result<Option<FastaRecord>> {
        if self.done {
            return Ok(None);
        }

        let header = match self.peek_header.take() {
            Some(h) => h,
            None => loop {
                if !self.read_line()? {
                    self.done = true;
                    return Ok(None);
                }
                if self.line.first() == Some(&b'>') {
                    break self.line[1..].to_vec();
                }
            },
        };
        let (id, desc) = split_header(&header);

        let mut seq = Vec::new();
        loop {
            if !self.read_line()? {
                self.done = true;
                break;
            }
            if self.line.first() == Some(&b'>') {
                self.peek_header = Some(self.line[1..].to_vec());
                break;
            }
            seq.extend(self.line.iter().copied().filter(|b| !b.is_ascii_whitespace()));
        }

        Ok(Some(FastaRecord { id, desc, seq }))
    }
}

/// 拆分 `>`/`@` 之后的标题行：首个空白前为 id，其余为描述
pub(crate) fn split_header(header: &[u8]) -> (String, Option<String>) {
    let text = String::from_utf8_lossy(header);
    let text = text.trim();
    let mut parts = text.splitn(2, char::is_whitespace);
    let id = parts.next().unwrap_or("").to_string();
    let desc = parts.next().map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    (id, desc)
}
