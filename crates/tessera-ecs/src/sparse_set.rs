use std::{iter::Copied, num::NonZeroUsize, slice::Iter};

use rustc_hash::FxHashMap;

use crate::error::EcsError;

pub const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(32) {
    Some(size) => size,
    None => panic!("default page size must be non-zero"),
};

/// Largest id stored in the page table. Anything above goes to the overflow map, which bounds the
/// page table to 2^32 entries no matter how sparse the id space is.
pub const MAX_PAGED_ID: u64 = u32::MAX as u64;

/// Marks a sparse slot with no dense entry.
const EMPTY: usize = usize::MAX;

/// Unsigned ids usable as sparse set members.
pub trait SparseIndex: Copy + Eq {
    fn sparse_index(self) -> u64;
}

macro_rules! sparse_index_impl {
    ( $( $ty:ty )+ ) => {
        $(
            impl SparseIndex for $ty {
                #[inline]
                fn sparse_index(self) -> u64 {
                    self as u64
                }
            }
        )+
    }
}

sparse_index_impl! { u8 u16 u32 u64 usize }

/// Paged bidirectional index between a sparse id space and a densely packed list of members.
///
/// Add, remove and contains are O(1). Removal swaps the last member into the freed dense slot, so
/// the dense list never has gaps but its order is not stable.
#[derive(Debug, Clone)]
pub struct SparseSet<I: SparseIndex> {
    /// Members, packed.
    dense: Vec<I>,
    /// Dense index of every paged id, or `EMPTY`. Pages are allocated on first write.
    pages: Vec<Option<Box<[usize]>>>,
    /// Dense index of ids above `MAX_PAGED_ID`.
    overflow: FxHashMap<u64, usize>,
    page_size: NonZeroUsize,
}

impl<I: SparseIndex> Default for SparseSet<I> {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl<I: SparseIndex> SparseSet<I> {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(page_size: NonZeroUsize) -> Self {
        Self {
            dense: Vec::new(),
            pages: Vec::new(),
            overflow: FxHashMap::default(),
            page_size,
        }
    }

    /// Same as `with_page_size`, but rejects a page size of 0.
    pub fn try_with_page_size(page_size: usize) -> Result<Self, EcsError> {
        NonZeroUsize::new(page_size)
            .map(Self::with_page_size)
            .ok_or(EcsError::ZeroPageSize)
    }

    #[inline]
    pub fn page_size(&self) -> usize {
        self.page_size.get()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// The packed members. Order is arbitrary and changes across removals.
    #[inline]
    pub fn density(&self) -> &[I] {
        &self.dense
    }

    #[inline]
    pub fn iter(&self) -> Copied<Iter<'_, I>> {
        self.dense.iter().copied()
    }

    #[inline]
    pub fn contains(&self, id: I) -> bool {
        self.index_of(id).is_some()
    }

    /// Position of `id` within `density()`.
    pub fn index_of(&self, id: I) -> Option<usize> {
        let raw = id.sparse_index();
        let index = if raw > MAX_PAGED_ID {
            *self.overflow.get(&raw)?
        } else {
            let (page, offset) = self.locate(raw);
            *self.pages.get(page)?.as_ref()?.get(offset)?
        };

        (index != EMPTY).then_some(index)
    }

    /// Adds a member. Returns `false` if it was already present, in which case nothing changes.
    pub fn add(&mut self, id: I) -> bool {
        if self.contains(id) {
            return false;
        }

        self.dense.push(id);
        self.set_index(id.sparse_index(), self.dense.len() - 1);
        true
    }

    /// Removes a member. Returns `false` if it was not present.
    pub fn remove(&mut self, id: I) -> bool {
        let index = match self.index_of(id) {
            Some(index) => index,
            None => return false,
        };

        // Move the last member into the hole
        let last = self.dense.len() - 1;
        if index != last {
            let moved = self.dense[last];
            self.dense.swap(index, last);
            self.set_index(moved.sparse_index(), index);
        }

        self.dense.pop();
        self.set_index(id.sparse_index(), EMPTY);
        true
    }

    /// Removes every member and releases the pages.
    pub fn clear(&mut self) {
        self.dense.clear();
        self.pages = Vec::new();
        self.overflow = FxHashMap::default();
    }

    /// Number of pages that have been allocated.
    pub fn allocated_pages(&self) -> usize {
        self.pages.iter().filter(|page| page.is_some()).count()
    }

    #[inline]
    fn locate(&self, raw: u64) -> (usize, usize) {
        let page_size = self.page_size.get() as u64;
        ((raw / page_size) as usize, (raw % page_size) as usize)
    }

    fn set_index(&mut self, raw: u64, index: usize) {
        if raw > MAX_PAGED_ID {
            if index == EMPTY {
                self.overflow.remove(&raw);
            } else {
                self.overflow.insert(raw, index);
            }
            return;
        }

        let (page, offset) = self.locate(raw);
        if page >= self.pages.len() {
            // Nothing to clear in a page that was never allocated
            if index == EMPTY {
                return;
            }
            self.pages.resize_with(page + 1, Option::default);
        }

        let page_size = self.page_size.get();
        let entries = self.pages[page]
            .get_or_insert_with(|| vec![EMPTY; page_size].into_boxed_slice());
        entries[offset] = index;
    }
}

impl<'a, I: SparseIndex> IntoIterator for &'a SparseSet<I> {
    type Item = I;
    type IntoIter = Copied<Iter<'a, I>>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
