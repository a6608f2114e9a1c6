use std::ops::Deref;

use memmap2::Mmap;

/// The contents of a file, held in whichever kind of memory the read strategy chose.
///
/// Dereferences to the file bytes.
#[derive(Debug)]
pub struct FileBuffer {
    storage: Storage,
}

#[derive(Debug)]
enum Storage {
    // Growable heap allocation.
    Heap(Vec<u8>),

    // Allocated once at the exact file size and never resized.
    Fixed(Box<[u8]>),

    Mapped(Mmap),
}

impl FileBuffer {
    pub(crate) fn heap(bytes: Vec<u8>) -> Self {
        Self {
            storage: Storage::Heap(bytes),
        }
    }

    pub(crate) fn fixed(bytes: Box<[u8]>) -> Self {
        Self {
            storage: Storage::Fixed(bytes),
        }
    }

    pub(crate) fn mapped(map: Mmap) -> Self {
        Self {
            storage: Storage::Mapped(map),
        }
    }

    /// Whether the contents are a memory mapping of the file rather than a copy.
    #[must_use]
    pub fn is_mapped(&self) -> bool {
        matches!(self.storage, Storage::Mapped(_))
    }
}

impl Deref for FileBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match &self.storage {
            Storage::Heap(bytes) => bytes,
            Storage::Fixed(bytes) => bytes,
            Storage::Mapped(map) => map,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn heap_derefs_to_contents() {
        let buffer = FileBuffer::heap(vec![1, 2, 3]);

        assert_eq!(&*buffer, &[1, 2, 3]);
        assert!(!buffer.is_mapped());
    }

    #[test]
    fn fixed_derefs_to_contents() {
        let buffer = FileBuffer::fixed(vec![4, 5].into_boxed_slice());

        assert_eq!(buffer.len(), 2);
        assert!(!buffer.is_mapped());
    }
}
