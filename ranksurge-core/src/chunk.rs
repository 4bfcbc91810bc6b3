//! Splitting a requested row count into sequential query windows

use crate::error::FetchError;

/// One windowed read: `LIMIT limit OFFSET offset`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkWindow {
    /// Zero-based position of the chunk in its plan
    pub index: usize,
    pub offset: usize,
    pub limit: usize,
}

/// How a request for `requested` rows is cut into `chunk_size` windows.
///
/// Built by ceiling division, so the last chunk may be smaller than the
/// others and the chunk sizes always sum to the requested count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    requested: usize,
    chunk_size: usize,
    total_chunks: usize,
    last_chunk_size: usize,
}

impl ChunkPlan {
    pub fn new(requested: usize, chunk_size: usize) -> Result<Self, FetchError> {
        if chunk_size == 0 {
            return Err(FetchError::InvalidChunkSize);
        }

        let total_chunks = requested.div_ceil(chunk_size);
        let last_chunk_size = match total_chunks {
            0 => 0,
            n => requested - (n - 1) * chunk_size,
        };

        Ok(Self {
            requested,
            chunk_size,
            total_chunks,
            last_chunk_size,
        })
    }

    pub fn requested(&self) -> usize {
        self.requested
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn total_chunks(&self) -> usize {
        self.total_chunks
    }

    pub fn last_chunk_size(&self) -> usize {
        self.last_chunk_size
    }

    /// Window for a single chunk, or `None` past the end of the plan
    pub fn window(&self, index: usize) -> Option<ChunkWindow> {
        if index >= self.total_chunks {
            return None;
        }
        let offset = index * self.chunk_size;
        Some(ChunkWindow {
            index,
            offset,
            limit: self.chunk_size.min(self.requested - offset),
        })
    }

    /// Windows in strictly increasing chunk order
    pub fn windows(&self) -> impl Iterator<Item = ChunkWindow> + '_ {
        (0..self.total_chunks).filter_map(move |index| self.window(index))
    }
}
