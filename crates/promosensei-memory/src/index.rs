//! Flat (exhaustive) Euclidean vector index.
//!
//! Vectors are stored contiguously. The dimension is unset until the first
//! insertion and fixed afterwards.
//!
//! On-disk layout, little-endian:
//!
//! ```text
//! magic "PSFI" | u32 version | u32 dimension (0 = unset) | u64 count | count * dimension f32
//! ```

use crate::error::MemoryError;
use crate::Result;
use std::io::{Read, Write};

const MAGIC: &[u8; 4] = b"PSFI";
const FORMAT_VERSION: u32 = 1;

/// Squared Euclidean distance between two equal-length vectors.
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Append-only flat index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatIndex {
    dimension: Option<usize>,
    data: Vec<f32>,
}

impl FlatIndex {
    /// Create an empty, dimensionless index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Dimension fixed by the first insertion.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Number of stored vectors.
    pub fn len(&self) -> usize {
        match self.dimension {
            Some(dim) if dim > 0 => self.data.len() / dim,
            _ => 0,
        }
    }

    /// Check whether the index holds no vectors.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The vector at `position`.
    pub fn vector(&self, position: usize) -> Option<&[f32]> {
        let dim = self.dimension?;
        let start = position.checked_mul(dim)?;
        self.data.get(start..start + dim)
    }

    /// Append a batch of vectors.
    ///
    /// The whole batch is checked before anything is appended: either every
    /// vector goes in or none does.
    pub fn add(&mut self, vectors: &[Vec<f32>]) -> Result<()> {
        let Some(first) = vectors.first() else {
            return Ok(());
        };

        let expected = self.dimension.unwrap_or(first.len());
        if expected == 0 {
            return Err(MemoryError::DimensionMismatch {
                expected: 0,
                actual: 0,
            });
        }
        if let Some(bad) = vectors.iter().find(|v| v.len() != expected) {
            return Err(MemoryError::DimensionMismatch {
                expected,
                actual: bad.len(),
            });
        }

        self.dimension = Some(expected);
        self.data.reserve(expected * vectors.len());
        for vector in vectors {
            self.data.extend_from_slice(vector);
        }
        Ok(())
    }

    /// Exhaustive k-nearest-neighbour search.
    ///
    /// Returns `(position, squared distance)` pairs in ascending distance,
    /// ties resolved by lower position first.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>> {
        let Some(dim) = self.dimension else {
            return Ok(Vec::new());
        };
        if k == 0 || self.data.is_empty() {
            return Ok(Vec::new());
        }
        if query.len() != dim {
            return Err(MemoryError::DimensionMismatch {
                expected: dim,
                actual: query.len(),
            });
        }

        let mut scored: Vec<(usize, f32)> = self
            .data
            .chunks_exact(dim)
            .enumerate()
            .map(|(i, v)| (i, squared_l2(query, v)))
            .collect();

        // Stable sort keeps insertion order among equal distances.
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        scored.truncate(k);
        Ok(scored)
    }

    /// Drop everything past `len` vectors and restore the given dimension.
    pub(crate) fn rollback(&mut self, len: usize, dimension: Option<usize>) {
        self.dimension = dimension;
        let keep = dimension.map_or(0, |d| len * d);
        self.data.truncate(keep);
    }

    /// Serialize the index.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(MAGIC)?;
        writer.write_all(&FORMAT_VERSION.to_le_bytes())?;
        let dim = u32::try_from(self.dimension.unwrap_or(0))
            .map_err(|_| MemoryError::InvalidIndex("dimension exceeds u32".to_string()))?;
        writer.write_all(&dim.to_le_bytes())?;
        writer.write_all(&(self.len() as u64).to_le_bytes())?;
        for value in &self.data {
            writer.write_all(&value.to_le_bytes())?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Deserialize an index written by [`FlatIndex::write_to`].
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut magic = [0u8; 4];
        read_exact(&mut reader, &mut magic, "magic")?;
        if &magic != MAGIC {
            return Err(MemoryError::InvalidIndex("bad magic bytes".to_string()));
        }

        let mut word = [0u8; 4];
        read_exact(&mut reader, &mut word, "version")?;
        let version = u32::from_le_bytes(word);
        if version != FORMAT_VERSION {
            return Err(MemoryError::InvalidIndex(format!(
                "unsupported format version {}",
                version
            )));
        }

        read_exact(&mut reader, &mut word, "dimension")?;
        let dim = u32::from_le_bytes(word) as usize;

        let mut long = [0u8; 8];
        read_exact(&mut reader, &mut long, "count")?;
        let count = usize::try_from(u64::from_le_bytes(long))
            .map_err(|_| MemoryError::InvalidIndex("vector count overflows".to_string()))?;

        if dim == 0 {
            if count != 0 {
                return Err(MemoryError::InvalidIndex(
                    "vectors present without a dimension".to_string(),
                ));
            }
            ensure_eof(&mut reader)?;
            return Ok(Self::new());
        }

        let values = count
            .checked_mul(dim)
            .ok_or_else(|| MemoryError::InvalidIndex("payload size overflows".to_string()))?;
        // Header counts are untrusted until the payload is read.
        let mut data = Vec::with_capacity(values.min(1 << 20));
        let mut buf = [0u8; 4];
        for _ in 0..values {
            read_exact(&mut reader, &mut buf, "vector data")?;
            data.push(f32::from_le_bytes(buf));
        }
        ensure_eof(&mut reader)?;

        Ok(Self {
            dimension: Some(dim),
            data,
        })
    }
}

fn read_exact<R: Read>(reader: &mut R, buf: &mut [u8], what: &str) -> Result<()> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        std::io::ErrorKind::UnexpectedEof => {
            MemoryError::InvalidIndex(format!("truncated while reading {}", what))
        }
        _ => MemoryError::Io(e),
    })
}

fn ensure_eof<R: Read>(reader: &mut R) -> Result<()> {
    let mut probe = [0u8; 1];
    match reader.read(&mut probe)? {
        0 => Ok(()),
        _ => Err(MemoryError::InvalidIndex("trailing bytes after vector data".to_string())),
    }
}
