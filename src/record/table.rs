use crate::cell::Cell;
use crate::error::{Error, Result};

/// Field slots allocated up front, past $0.
const MINFLD: usize = 2;

/// The field-slot table: $0 plus the numbered fields.
///
/// Slot 0 always exists and holds the whole record. `lastfld` is the
/// logical field count (NF). Slots between `lastfld` and the allocated
/// capacity exist but hold cleared cells and are never live fields.
/// Capacity only grows for the lifetime of a session.
pub(crate) struct FieldTable {
    slots: Vec<Cell>,
    lastfld: usize,
}

impl FieldTable {
    pub fn new() -> Self {
        let mut slots = Vec::with_capacity(MINFLD + 1);
        slots.resize_with(MINFLD + 1, Cell::default);
        Self { slots, lastfld: 0 }
    }

    /// Highest addressable field index without growing.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len() - 1
    }

    /// The logical field count (NF).
    #[inline]
    pub fn lastfld(&self) -> usize {
        self.lastfld
    }

    /// Make fields up to at least `n` addressable: capacity becomes
    /// max(n, 2 x current). The size arithmetic is checked; overflow is
    /// fatal, never wrapped.
    pub fn grow(&mut self, n: usize) -> Result<()> {
        let mut cap = self
            .capacity()
            .checked_mul(2)
            .ok_or(Error::FieldTableOverflow(n))?;
        if n > cap {
            cap = n;
        }
        let total = cap
            .checked_add(1)
            .filter(|t| t.checked_mul(size_of::<Cell>()).is_some())
            .ok_or(Error::FieldTableOverflow(cap))?;
        self.slots.resize_with(total, Cell::default);
        Ok(())
    }

    /// Read access to field `n`. Grows past capacity; fields past NF read
    /// as cleared cells and the logical count is not altered.
    pub fn access(&mut self, n: usize) -> Result<&Cell> {
        if n > self.capacity() {
            self.grow(n)?;
        }
        Ok(&self.slots[n])
    }

    /// Overwrite slot `n`, growing if needed. The caller maintains the
    /// logical count.
    pub fn put(&mut self, n: usize, cell: Cell) -> Result<()> {
        if n > self.capacity() {
            self.grow(n)?;
        }
        self.slots[n] = cell;
        Ok(())
    }

    /// Slot `n`, which must already be addressable.
    #[inline]
    pub fn get(&self, n: usize) -> &Cell {
        &self.slots[n]
    }

    /// Clear slots n1..=n2 inclusive so stale contents cannot leak into a
    /// later widening access.
    pub fn clean(&mut self, n1: usize, n2: usize) {
        let hi = n2.min(self.capacity());
        if n1 > hi {
            return;
        }
        for slot in &mut self.slots[n1..=hi] {
            *slot = Cell::Uninit;
        }
    }

    /// Extend the logical count to `n` for a write just past the current
    /// fields, clearing the newly included range.
    pub fn extend_to(&mut self, n: usize) -> Result<()> {
        if n > self.capacity() {
            self.grow(n)?;
        }
        self.clean(self.lastfld + 1, n);
        self.lastfld = n;
        Ok(())
    }

    /// Explicit assignment of the logical count. Newly included slots are
    /// cleared; excluded slots are discarded, not merely hidden.
    pub fn set_lastfld(&mut self, n: usize) -> Result<()> {
        if n > self.capacity() {
            self.grow(n)?;
        }
        if self.lastfld < n {
            self.clean(self.lastfld + 1, n);
        } else {
            self.clean(n + 1, self.lastfld);
        }
        self.lastfld = n;
        Ok(())
    }

    /// Install the field count after a split. The splitter has already
    /// stored slots 1..=n; anything above, up to the previous count, is
    /// leftover from the previous record and gets cleared.
    pub fn commit_fields(&mut self, n: usize) {
        self.clean(n + 1, self.lastfld);
        self.lastfld = n;
    }

    /// The whole-record slot.
    #[inline]
    pub fn record(&self) -> &Cell {
        &self.slots[0]
    }

    pub fn set_record(&mut self, cell: Cell) {
        self.slots[0] = cell;
    }
}
