//! A record-oriented view over a [`SuccinctFile`].
//!
//! Adds exactly one thing to the core index: a sorted array of record-start
//! offsets, searched with a binary search to translate a raw text offset
//! into `(record_id, offset_within_record)`. Everything else -- searching,
//! counting, extracting -- is delegated straight through to the wrapped
//! `SuccinctFile`.

use crate::error::{Result, SuccinctFileError};
use crate::succinct_file::SuccinctFile;

#[derive(Debug)]
pub struct IndexedFile {
    inner: SuccinctFile,
    record_starts: Vec<usize>,
}

impl IndexedFile {
    /// Builds an index over `text`, with records split on `delimiter`
    /// (each record runs up to and excluding the delimiter that follows
    /// it; a final unterminated record is kept).
    pub fn build(text: &[u8], delimiter: u8) -> Result<Self> {
        let mut record_starts = vec![0usize];
        for (i, &b) in text.iter().enumerate() {
            if b == delimiter && i + 1 < text.len() {
                record_starts.push(i + 1);
            }
        }
        Self::from_boundaries(text, record_starts)
    }

    /// Builds an index with explicit record-start offsets. `record_starts`
    /// must be sorted ascending and start with `0` (unless `text` is
    /// empty, in which case it must be empty too).
    pub fn from_boundaries(text: &[u8], record_starts: Vec<usize>) -> Result<Self> {
        if text.is_empty() {
            if !record_starts.is_empty() {
                return Err(SuccinctFileError::Build(
                    "record_starts must be empty for empty text".into(),
                ));
            }
        } else if record_starts.first() != Some(&0) {
            return Err(SuccinctFileError::Build(
                "record_starts must begin with offset 0".into(),
            ));
        }

        if !record_starts.windows(2).all(|w| w[0] < w[1]) {
            return Err(SuccinctFileError::Build(
                "record_starts must be strictly increasing".into(),
            ));
        }
        if let Some(&last) = record_starts.last() {
            if last >= text.len() {
                return Err(SuccinctFileError::Build(
                    "record_starts must all be within the text".into(),
                ));
            }
        }

        let inner = SuccinctFile::build(text)?;
        Ok(Self {
            inner,
            record_starts,
        })
    }

    pub fn inner(&self) -> &SuccinctFile {
        &self.inner
    }

    pub fn num_records(&self) -> usize {
        self.record_starts.len()
    }

    pub fn record_start(&self, record_id: usize) -> Result<usize> {
        self.record_starts.get(record_id).copied().ok_or_else(|| {
            SuccinctFileError::RangeOutOfBounds(format!(
                "record {record_id} out of range, have {} records",
                self.record_starts.len()
            ))
        })
    }

    /// One past the record's last byte: the next record's start, or the
    /// text length for the final record.
    pub fn record_end(&self, record_id: usize) -> Result<usize> {
        let start = self.record_start(record_id)?;
        Ok(self
            .record_starts
            .get(record_id + 1)
            .copied()
            .unwrap_or(self.inner.len())
            .max(start))
    }

    pub fn record_len(&self, record_id: usize) -> Result<usize> {
        Ok(self.record_end(record_id)? - self.record_start(record_id)?)
    }

    /// The id of the record containing text offset `offset`.
    pub fn record_of_offset(&self, offset: usize) -> Result<usize> {
        if offset >= self.inner.len() {
            return Err(SuccinctFileError::RangeOutOfBounds(format!(
                "offset {offset} exceeds text length {}",
                self.inner.len()
            )));
        }
        match self.record_starts.binary_search(&offset) {
            Ok(id) => Ok(id),
            Err(0) => unreachable!("record_starts always begins at 0"),
            Err(next) => Ok(next - 1),
        }
    }

    /// Translates an absolute text offset into `(record_id, local_offset)`.
    pub fn locate(&self, offset: usize) -> Result<(usize, usize)> {
        let record_id = self.record_of_offset(offset)?;
        Ok((record_id, offset - self.record_start(record_id)?))
    }

    /// Whether offsets `a` and `b` fall within the same record.
    pub fn same_record(&self, a: usize, b: usize) -> Result<bool> {
        Ok(self.record_of_offset(a)? == self.record_of_offset(b)?)
    }

    /// Reads an entire record's bytes.
    pub fn extract_record(&self, record_id: usize) -> Result<Vec<u8>> {
        let start = self.record_start(record_id)?;
        let len = self.record_len(record_id)?;
        self.inner.extract(start, len)
    }

    /// All occurrences of `pattern`, translated to `(record_id, local_offset)`.
    pub fn search_records(&self, pattern: &[u8]) -> Result<Vec<(usize, usize)>> {
        self.inner
            .search(pattern)
            .into_iter()
            .map(|offset| self.locate(offset))
            .collect()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(self.record_starts.len() as u64).to_be_bytes());
        for &s in &self.record_starts {
            out.extend_from_slice(&(s as u64).to_be_bytes());
        }
        out.extend_from_slice(&self.inner.to_bytes());
        out
    }

    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        let mut pos = 0usize;
        let num_records = read_u64(buf, &mut pos)? as usize;
        let mut record_starts = Vec::with_capacity(num_records);
        for _ in 0..num_records {
            record_starts.push(read_u64(buf, &mut pos)? as usize);
        }
        let inner = SuccinctFile::from_bytes(&buf[pos..])?;
        Ok(Self {
            inner,
            record_starts,
        })
    }
}

fn read_u64(buf: &[u8], pos: &mut usize) -> Result<u64> {
    if *pos + 8 > buf.len() {
        return Err(SuccinctFileError::Truncated("expected 8 more bytes".into()));
    }
    let v = u64::from_be_bytes(buf[*pos..*pos + 8].try_into().unwrap());
    *pos += 8;
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_delimiter() {
        let text = b"one\ntwo\nthree";
        let file = IndexedFile::build(text, b'\n').unwrap();

        assert_eq!(file.num_records(), 3);
        assert_eq!(file.extract_record(0).unwrap(), b"one\n");
        assert_eq!(file.extract_record(1).unwrap(), b"two\n");
        assert_eq!(file.extract_record(2).unwrap(), b"three");
    }

    #[test]
    fn locate_and_same_record() {
        let text = b"one\ntwo\nthree";
        let file = IndexedFile::build(text, b'\n').unwrap();

        assert_eq!(file.locate(5).unwrap(), (1, 1));
        assert!(file.same_record(0, 2).unwrap());
        assert!(!file.same_record(0, 5).unwrap());
    }

    #[test]
    fn search_records_maps_hits() {
        let text = b"apple\nbanana\napplesauce";
        let file = IndexedFile::build(text, b'\n').unwrap();
        let hits = file.search_records(b"apple").unwrap();
        assert_eq!(hits, vec![(0, 0), (2, 0)]);
    }

    #[test]
    fn out_of_range_record_errors() {
        let text = b"one\ntwo";
        let file = IndexedFile::build(text, b'\n').unwrap();
        assert!(file.record_start(5).is_err());
    }

    #[test]
    fn serialize_roundtrip() {
        let text = b"one\ntwo\nthree";
        let file = IndexedFile::build(text, b'\n').unwrap();
        let bytes = file.to_bytes();
        let restored = IndexedFile::from_bytes(&bytes).unwrap();

        assert_eq!(restored.num_records(), 3);
        assert_eq!(restored.extract_record(1).unwrap(), b"two\n");
        assert_eq!(restored.search_records(b"three").unwrap(), vec![(2, 0)]);
    }
}
