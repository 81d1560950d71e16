//! The structural heap validator.
//!
//! [`Heap::check`] certifies the invariants the allocator relies on:
//! the region is one gapless chain of aligned blocks ending in the
//! sentinel, boundary tags agree between neighbors, every filed block is
//! marked free and has no free physical neighbor, every free-marked block
//! is filed. None of the normal paths call this; it exists for tests and
//! for debugging sessions on corrupted heaps.

use super::header::Header;
use super::{bin_of, Heap, ALIGNMENT, NIL};

/// A structural invariant violation found by [`Heap::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckError {
    /// A stored block size is not a multiple of the alignment.
    MisalignedSize,
    /// A header disagrees with its physical predecessor.
    BoundaryTagMismatch,
    /// The physical walk does not land exactly on the sentinel.
    WalkPastEnd,
    /// A block is filed in a bin that does not match its size class.
    WrongBin,
    /// A block is filed in a bin but not marked free.
    NotMarkedFree,
    /// A filed block has a free physical neighbor (missed coalescing).
    NeighborFree,
    /// The doubly linked list of a bin is inconsistent.
    BrokenLinks,
    /// The number of free-marked blocks differs from the bins' population.
    FreeBitMismatch,
}

impl<const N: usize> Heap<N> {
    /// Validate the heap's structural invariants.
    ///
    /// Two scans: a physical walk over all headers from the low bound,
    /// which must land exactly on the terminating sentinel with every
    /// boundary tag agreeing along the way, and a scan over all bins,
    /// verifying for each filed block that it is marked free, that neither
    /// physical neighbor is free, that it sits in the bin its size class
    /// selects and that its links are intact. A final count comparison
    /// witnesses that free-marked blocks and filed blocks are the same
    /// set.
    pub fn check(&self) -> Result<(), CheckError> {
        let top = self.region.top();

        let mut payload = self.region.low_bound() + Header::SIZE;
        let mut prev_size = 0;
        let mut blocks = 0_usize;
        let mut flagged = 0_usize;
        while payload < top {
            let header = self.region.header_at(payload);
            if header.size() % ALIGNMENT != 0 {
                return Err(CheckError::MisalignedSize);
            }
            if header.prev_size() != prev_size {
                return Err(CheckError::BoundaryTagMismatch);
            }
            if header.is_prev_free() {
                if payload == Header::SIZE {
                    // the first block has no predecessor to be free
                    return Err(CheckError::BoundaryTagMismatch);
                }
                flagged += 1;
            }
            let next = payload + header.size() + Header::SIZE;
            if next > top {
                return Err(CheckError::WalkPastEnd);
            }
            prev_size = header.size();
            payload = next;
            blocks += 1;
        }
        let sentinel = self.region.header_at(top);
        if sentinel.size() != 0 || sentinel.prev_size() != prev_size {
            return Err(CheckError::BoundaryTagMismatch);
        }
        if sentinel.is_prev_free() {
            if blocks == 0 {
                return Err(CheckError::BoundaryTagMismatch);
            }
            flagged += 1;
        }

        let mut members = 0_usize;
        for (i, &head) in self.bins.iter().enumerate() {
            let mut p = head;
            let mut back = NIL;
            while p != NIL {
                members += 1;
                if members > blocks {
                    return Err(CheckError::BrokenLinks);
                }
                if bin_of(self.size_of(p) + Header::SIZE) != i {
                    return Err(CheckError::WrongBin);
                }
                if !self.is_free(p) {
                    return Err(CheckError::NotMarkedFree);
                }
                if self.is_prev_free(p) {
                    return Err(CheckError::NeighborFree);
                }
                if self.has_next(p) && self.is_free(self.next_payload(p)) {
                    return Err(CheckError::NeighborFree);
                }
                let links = self.region.links_at(p);
                if links.prev != back {
                    return Err(CheckError::BrokenLinks);
                }
                back = p;
                p = links.next;
            }
        }
        if members != flagged {
            return Err(CheckError::FreeBitMismatch);
        }
        Ok(())
    }
}
