//! Length-prefixed binary container for formula streams.
//!
//! Layout, repeated until end of stream, all integers native byte order:
//! `u64` clause count, then per clause a `u64` literal count followed by
//! that many `(i32 var, i32 negated)` pairs.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use thiserror::Error;

use super::dnf::{Dnf, Lit};

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("stream truncated while reading {what}")]
    Truncated { what: &'static str },
    #[error("{what} of {value} does not fit in memory")]
    TooLarge { what: &'static str, value: u64 },
}

/// Fills `buf` completely. Returns `false` if the stream was already at its end.
fn read_or_eof<R: Read>(
    r: &mut R,
    buf: &mut [u8],
    what: &'static str,
) -> Result<bool, FormatError> {
    let mut filled = 0usize;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(k) => filled += k,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    if filled == 0 {
        return Ok(false);
    }
    if filled < buf.len() {
        return Err(FormatError::Truncated { what });
    }
    Ok(true)
}

fn read_exact<R: Read>(r: &mut R, buf: &mut [u8], what: &'static str) -> Result<(), FormatError> {
    if read_or_eof(r, buf, what)? {
        Ok(())
    } else {
        Err(FormatError::Truncated { what })
    }
}

fn read_u64<R: Read>(r: &mut R, what: &'static str) -> Result<u64, FormatError> {
    let mut buf = [0u8; 8];
    read_exact(r, &mut buf, what)?;
    Ok(u64::from_ne_bytes(buf))
}

fn to_len(value: u64, what: &'static str) -> Result<usize, FormatError> {
    usize::try_from(value).map_err(|_| FormatError::TooLarge { what, value })
}

/// Reads the next formula. `Ok(None)` means the stream ended cleanly between formulas.
pub fn read_formula<R: Read>(r: &mut R) -> Result<Option<Dnf>, FormatError> {
    let mut head = [0u8; 8];
    if !read_or_eof(r, &mut head, "clause count")? {
        return Ok(None);
    }
    let rows = to_len(u64::from_ne_bytes(head), "clause count")?;

    // counts come from the file; don't trust them for preallocation
    let mut dnf = Dnf::new();
    for _ in 0..rows {
        let cols = to_len(read_u64(r, "literal count")?, "literal count")?;
        let mut clause = Vec::with_capacity(cols.min(1 << 16));
        for _ in 0..cols {
            let mut rec = [0u8; 8];
            read_exact(r, &mut rec, "literal record")?;
            let var = i32::from_ne_bytes([rec[0], rec[1], rec[2], rec[3]]);
            let negated = i32::from_ne_bytes([rec[4], rec[5], rec[6], rec[7]]);
            clause.push(Lit::new(var, negated != 0));
        }
        dnf.add_clause(clause);
    }
    Ok(Some(dnf))
}

pub fn write_formula<W: Write>(w: &mut W, dnf: &Dnf) -> Result<(), FormatError> {
    w.write_all(&(dnf.clauses.len() as u64).to_ne_bytes())?;
    for clause in &dnf.clauses {
        w.write_all(&(clause.len() as u64).to_ne_bytes())?;
        for lit in clause {
            w.write_all(&lit.var.to_ne_bytes())?;
            w.write_all(&i32::from(lit.negated).to_ne_bytes())?;
        }
    }
    Ok(())
}

/// Iterator over the formulas of a stream. Stops after the first error.
pub struct FormulaReader<R> {
    inner: R,
    done: bool,
}

impl<R: Read> FormulaReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, done: false }
    }
}

impl<R: Read> Iterator for FormulaReader<R> {
    type Item = Result<Dnf, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match read_formula(&mut self.inner) {
            Ok(Some(dnf)) => Some(Ok(dnf)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

pub fn open_formulas(path: &Path) -> Result<FormulaReader<BufReader<File>>, FormatError> {
    let file = File::open(path)?;
    Ok(FormulaReader::new(BufReader::new(file)))
}

pub fn read_formulas_from_path(path: &Path) -> Result<Vec<Dnf>, FormatError> {
    open_formulas(path)?.collect()
}

pub fn write_formulas_to_path(path: &Path, formulas: &[Dnf]) -> Result<(), FormatError> {
    let mut w = BufWriter::new(File::create(path)?);
    for dnf in formulas {
        write_formula(&mut w, dnf)?;
    }
    w.flush()?;
    Ok(())
}
