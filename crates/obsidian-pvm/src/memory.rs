//! Paged memory with per-page access control.
//!
//! The address space is 4 GiB split into 4 KiB pages. Pages absent from
//! the map are zero-filled and inaccessible to the running program until
//! the embedder inserts an ACL entry. Access checks and data transfers
//! wrap modulo 2^32, consistent with register arithmetic.

use std::collections::BTreeMap;

use crate::PAGE_SIZE;

/// Per-page access-control entry. `Write` implies `Read`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PageAccess {
    None,
    Read,
    Write,
}

#[derive(Clone)]
struct Page {
    data: Box<[u8; PAGE_SIZE as usize]>,
    access: PageAccess,
}

impl Page {
    fn zeroed(access: PageAccess) -> Self {
        Self {
            data: Box::new([0u8; PAGE_SIZE as usize]),
            access,
        }
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page").field("access", &self.access).finish()
    }
}

/// Sparse paged address space plus the heap growth bounds.
///
/// Invariant: `heap_start <= heap_pointer <= heap_end`.
#[derive(Debug, Clone, Default)]
pub struct Memory {
    pages: BTreeMap<u32, Page>,
    heap_start: u32,
    heap_end: u32,
    heap_pointer: u32,
}

impl Memory {
    /// Empty memory: no pages, heap pinned at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty memory with a heap region; the growth pointer starts at
    /// `heap_start`.
    pub fn with_heap(heap_start: u32, heap_end: u32) -> Self {
        debug_assert!(heap_start <= heap_end);
        Self {
            pages: BTreeMap::new(),
            heap_start,
            heap_end,
            heap_pointer: heap_start,
        }
    }

    /// Current heap growth pointer.
    pub fn heap_pointer(&self) -> u32 {
        self.heap_pointer
    }

    fn page_of(addr: u32) -> u32 {
        addr / PAGE_SIZE
    }

    fn access_of(&self, page: u32) -> PageAccess {
        self.pages
            .get(&page)
            .map(|p| p.access)
            .unwrap_or(PageAccess::None)
    }

    /// Insert or update the ACL for one page. Content is preserved if
    /// the page already exists, zero-filled otherwise.
    pub fn upsert_acl(&mut self, page: u32, access: PageAccess) {
        match self.pages.get_mut(&page) {
            Some(p) => p.access = access,
            None => {
                self.pages.insert(page, Page::zeroed(access));
            }
        }
    }

    /// Apply an ACL to every page touched by `[addr, addr + len)`.
    pub fn upsert_acl_range(&mut self, addr: u32, len: u32, access: PageAccess) {
        let mut cursor = addr;
        let mut remaining = len;
        while remaining > 0 {
            let in_page = (PAGE_SIZE - cursor % PAGE_SIZE).min(remaining);
            self.upsert_acl(Self::page_of(cursor), access);
            cursor = cursor.wrapping_add(in_page);
            remaining -= in_page;
        }
    }

    /// Lowest address in `[addr, addr + len)` whose page lacks the
    /// required access, in wrap-around iteration order from `addr`.
    fn first_denied(&self, addr: u32, len: u32, required: PageAccess) -> Option<u32> {
        let mut cursor = addr;
        let mut remaining = len;
        while remaining > 0 {
            if self.access_of(Self::page_of(cursor)) < required {
                return Some(cursor);
            }
            let in_page = (PAGE_SIZE - cursor % PAGE_SIZE).min(remaining);
            cursor = cursor.wrapping_add(in_page);
            remaining -= in_page;
        }
        None
    }

    /// First address in range not covered by a readable page.
    pub fn first_unreadable(&self, addr: u32, len: u32) -> Option<u32> {
        self.first_denied(addr, len, PageAccess::Read)
    }

    /// First address in range not covered by a writable page.
    pub fn first_unwriteable(&self, addr: u32, len: u32) -> Option<u32> {
        self.first_denied(addr, len, PageAccess::Write)
    }

    /// Whether the whole range is readable by the program.
    pub fn can_read(&self, addr: u32, len: u32) -> bool {
        self.first_unreadable(addr, len).is_none()
    }

    /// Whether the whole range is writable by the program.
    pub fn can_write(&self, addr: u32, len: u32) -> bool {
        self.first_unwriteable(addr, len).is_none()
    }

    /// Read `buf.len()` bytes starting at `addr`. On an access failure
    /// nothing is copied and the fault address is returned.
    pub fn read_into(&self, addr: u32, buf: &mut [u8]) -> Result<(), u32> {
        let len = buf.len() as u32;
        if let Some(fault) = self.first_unreadable(addr, len) {
            return Err(fault);
        }
        self.copy_out(addr, buf);
        Ok(())
    }

    /// Write `buf` starting at `addr`. The whole range is checked first;
    /// a faulting write commits nothing.
    pub fn write_at(&mut self, addr: u32, buf: &[u8]) -> Result<(), u32> {
        if let Some(fault) = self.first_unwriteable(addr, buf.len() as u32) {
            return Err(fault);
        }
        self.copy_in(addr, buf);
        Ok(())
    }

    /// Embedder-side read ignoring ACLs; absent pages read as zero.
    pub fn peek(&self, addr: u32, len: u32) -> Vec<u8> {
        let mut buf = vec![0u8; len as usize];
        self.copy_out(addr, &mut buf);
        buf
    }

    /// Embedder-side write ignoring ACLs; absent pages are created with
    /// no program access.
    pub fn poke(&mut self, addr: u32, data: &[u8]) {
        let mut cursor = addr;
        let mut offset = 0usize;
        while offset < data.len() {
            let page = Self::page_of(cursor);
            let page_off = (cursor % PAGE_SIZE) as usize;
            let in_page = (PAGE_SIZE as usize - page_off).min(data.len() - offset);
            let entry = self
                .pages
                .entry(page)
                .or_insert_with(|| Page::zeroed(PageAccess::None));
            entry.data[page_off..page_off + in_page]
                .copy_from_slice(&data[offset..offset + in_page]);
            offset += in_page;
            cursor = cursor.wrapping_add(in_page as u32);
        }
    }

    /// Grow the heap by `delta` bytes. Pages newly covered become
    /// writable. A request that would push the pointer past `heap_end`
    /// changes nothing and returns the pre-call pointer; callers must
    /// not assume growth occurred.
    pub fn sbrk(&mut self, delta: u32) -> u32 {
        let new_pointer = self.heap_pointer as u64 + delta as u64;
        if new_pointer > self.heap_end as u64 {
            return self.heap_pointer;
        }
        if delta > 0 {
            self.upsert_acl_range(self.heap_pointer, delta, PageAccess::Write);
            self.heap_pointer = new_pointer as u32;
        }
        self.heap_pointer
    }

    fn copy_out(&self, addr: u32, buf: &mut [u8]) {
        let mut cursor = addr;
        let mut offset = 0usize;
        while offset < buf.len() {
            let page_off = (cursor % PAGE_SIZE) as usize;
            let in_page = (PAGE_SIZE as usize - page_off).min(buf.len() - offset);
            match self.pages.get(&Self::page_of(cursor)) {
                Some(p) => buf[offset..offset + in_page]
                    .copy_from_slice(&p.data[page_off..page_off + in_page]),
                None => buf[offset..offset + in_page].fill(0),
            }
            offset += in_page;
            cursor = cursor.wrapping_add(in_page as u32);
        }
    }

    fn copy_in(&mut self, addr: u32, data: &[u8]) {
        let mut cursor = addr;
        let mut offset = 0usize;
        while offset < data.len() {
            let page_off = (cursor % PAGE_SIZE) as usize;
            let in_page = (PAGE_SIZE as usize - page_off).min(data.len() - offset);
            // Writable pages always exist in the map.
            if let Some(p) = self.pages.get_mut(&Self::page_of(cursor)) {
                p.data[page_off..page_off + in_page]
                    .copy_from_slice(&data[offset..offset + in_page]);
            }
            offset += in_page;
            cursor = cursor.wrapping_add(in_page as u32);
        }
    }
}
