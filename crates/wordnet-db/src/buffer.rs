use memmap2::Mmap;

/// The bytes backing a data source: either a memory-mapped file or an owned
/// buffer produced by a full background load. Swapping between the two
/// preserves byte offsets exactly, so readers and iterators mid-descent stay
/// valid across the swap.
pub(crate) enum Buffer {
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl Buffer {
    pub(crate) fn as_slice(&self) -> &[u8] {
        match self {
            Buffer::Mmap(m) => m.as_ref(),
            Buffer::Owned(v) => v.as_slice(),
        }
    }
}
