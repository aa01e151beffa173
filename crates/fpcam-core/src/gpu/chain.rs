//! Ordering tables and packet arenas for linked-list DMA.
//!
//! A [`DmaChain`] pairs an [`OrderingTable`] with a [`CommandBuffer`] laid out
//! back to back in main RAM. Packets are bump-allocated from the buffer and
//! spliced onto the front of their depth bucket, so each bucket is a LIFO
//! stack. The words written are the exact tags the DMA engine follows; the
//! traversal helpers decode them back into bucket and packet indices.

use core::fmt;

use fpcam_hal::{DmaPort, WordMemory, END_OF_LIST};

use super::commands;
use crate::config::{CHAIN_BUFFER_SIZE, ORDERING_TABLE_SIZE};

/// Most command words a single packet tag can describe.
pub const MAX_PACKET_WORDS: usize = 0xFF;

/// Decoded linked-list tag: number of command words that follow, and the
/// address of the next tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PacketTag {
    pub len: u8,
    pub next: u32,
}

impl PacketTag {
    pub fn encode(self) -> u32 {
        commands::tag(self.len.into(), self.next)
    }

    pub fn decode(word: u32) -> Self {
        Self {
            len: (word >> 24) as u8,
            next: word & END_OF_LIST,
        }
    }

    pub fn is_end(&self) -> bool {
        self.next == END_OF_LIST
    }
}

/// Offset of a packet's tag word within its command buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct PacketId(pub usize);

/// Where a linked-list address points inside a chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Link {
    /// An ordering table entry.
    Bucket(usize),
    /// An allocated packet.
    Packet(PacketId),
    /// The end-of-list marker.
    End,
}

/// Arena misuse. Each variant means the static configuration does not fit
/// the workload and is fatal in the frame loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainError {
    BucketOutOfRange { bucket: usize, size: usize },
    Overrun { requested: usize, available: usize },
    PacketTooLong { len: usize },
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainError::BucketOutOfRange { bucket, size } => {
                write!(f, "bucket {bucket} outside ordering table of {size} entries")
            }
            ChainError::Overrun {
                requested,
                available,
            } => write!(
                f,
                "command buffer overrun: {requested} words requested, {available} left"
            ),
            ChainError::PacketTooLong { len } => {
                write!(f, "packet of {len} words exceeds the {MAX_PACKET_WORDS}-word tag limit")
            }
        }
    }
}

/// Depth-indexed bucket heads. Index 0 is nearest the camera and drawn last.
#[derive(Clone)]
pub struct OrderingTable {
    entries: [u32; ORDERING_TABLE_SIZE],
    base: u32,
}

impl OrderingTable {
    fn new(base: u32) -> Self {
        let mut entries = [0; ORDERING_TABLE_SIZE];
        fpcam_hal::reverse_fill(&mut entries, base);
        Self { entries, base }
    }

    pub const fn len(&self) -> usize {
        ORDERING_TABLE_SIZE
    }

    pub const fn is_empty(&self) -> bool {
        ORDERING_TABLE_SIZE == 0
    }

    /// Byte address of bucket `index`'s head.
    pub fn address_of(&self, index: usize) -> u32 {
        self.base + (index * 4) as u32
    }

    /// Decoded head tag of bucket `index`.
    pub fn head(&self, index: usize) -> PacketTag {
        PacketTag::decode(self.entries[index])
    }

    /// Raw head words.
    pub fn entries(&self) -> &[u32] {
        &self.entries
    }

    fn resolve(&self, addr: u32) -> Option<usize> {
        let offset = addr.checked_sub(self.base)? as usize;
        (offset % 4 == 0 && offset / 4 < ORDERING_TABLE_SIZE).then_some(offset / 4)
    }
}

/// Append-only arena of tagged command words.
#[derive(Clone)]
pub struct CommandBuffer<const WORDS: usize> {
    words: [u32; WORDS],
    cursor: usize,
    base: u32,
}

impl<const WORDS: usize> CommandBuffer<WORDS> {
    fn new(base: u32) -> Self {
        Self {
            words: [0; WORDS],
            cursor: 0,
            base,
        }
    }

    pub const fn capacity(&self) -> usize {
        WORDS
    }

    /// Words allocated since the last reset.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self) -> usize {
        WORDS - self.cursor
    }

    /// Byte address of the word at `offset`.
    pub fn address_of(&self, offset: usize) -> u32 {
        self.base + (offset * 4) as u32
    }

    /// All words allocated so far.
    pub fn words(&self) -> &[u32] {
        &self.words[..self.cursor]
    }

    fn resolve(&self, addr: u32) -> Option<usize> {
        let offset = addr.checked_sub(self.base)? as usize;
        (offset % 4 == 0 && offset / 4 < self.cursor).then_some(offset / 4)
    }
}

/// A packet as seen through the chain: its tag and its command words.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Packet<'a> {
    pub id: PacketId,
    pub tag: PacketTag,
    pub words: &'a [u32],
}

/// Ordering table plus packet arena for one frame.
#[derive(Clone)]
pub struct DmaChain<const WORDS: usize = CHAIN_BUFFER_SIZE> {
    table: OrderingTable,
    buffer: CommandBuffer<WORDS>,
}

impl<const WORDS: usize> DmaChain<WORDS> {
    /// Bytes of RAM the chain occupies.
    pub const BYTES: u32 = ((ORDERING_TABLE_SIZE + WORDS) * 4) as u32;

    /// Lay out a chain at byte address `base` (word aligned). The table starts
    /// out cleared.
    pub fn new(base: u32) -> Self {
        debug_assert!(base % 4 == 0, "chain base must be word aligned");
        debug_assert!(
            base + Self::BYTES <= END_OF_LIST,
            "chain must fit below the end-of-list marker"
        );
        Self {
            table: OrderingTable::new(base),
            buffer: CommandBuffer::new(base + (ORDERING_TABLE_SIZE * 4) as u32),
        }
    }

    pub fn table(&self) -> &OrderingTable {
        &self.table
    }

    pub fn buffer(&self) -> &CommandBuffer<WORDS> {
        &self.buffer
    }

    /// Empty every bucket with the DMA controller's reverse fill and rewind
    /// the packet arena.
    pub fn reset<D: DmaPort + ?Sized>(&mut self, dma: &mut D) {
        let base = self.table.base;
        dma.clear_ordering_table(&mut self.table.entries, base);
        self.buffer.cursor = 0;
    }

    /// Byte address the DMA transfer starts from: the farthest bucket.
    pub fn head_address(&self) -> u32 {
        self.table.address_of(ORDERING_TABLE_SIZE - 1)
    }

    /// Reserve a packet of `len` command words in `bucket` and return the
    /// words for the caller to fill.
    ///
    /// The packet's tag links to whatever the bucket pointed at before, and
    /// the bucket now points at the packet, so it is drained before every
    /// packet previously added to the same bucket.
    pub fn try_allocate(&mut self, bucket: usize, len: usize) -> Result<&mut [u32], ChainError> {
        if bucket >= ORDERING_TABLE_SIZE {
            return Err(ChainError::BucketOutOfRange {
                bucket,
                size: ORDERING_TABLE_SIZE,
            });
        }
        if len > MAX_PACKET_WORDS {
            return Err(ChainError::PacketTooLong { len });
        }
        if len + 1 > self.buffer.remaining() {
            return Err(ChainError::Overrun {
                requested: len + 1,
                available: self.buffer.remaining(),
            });
        }

        let offset = self.buffer.cursor;
        self.buffer.cursor += len + 1;

        let previous = self.table.head(bucket).next;
        self.buffer.words[offset] = PacketTag {
            len: len as u8,
            next: previous,
        }
        .encode();
        self.table.entries[bucket] = PacketTag {
            len: 0,
            next: self.buffer.address_of(offset),
        }
        .encode();

        Ok(&mut self.buffer.words[offset + 1..offset + 1 + len])
    }

    /// [`try_allocate`](Self::try_allocate), treating any failure as fatal.
    pub fn allocate(&mut self, bucket: usize, len: usize) -> &mut [u32] {
        match self.try_allocate(bucket, len) {
            Ok(words) => words,
            Err(err) => panic!("fatal: {err}"),
        }
    }

    /// Classify a linked-list address.
    pub fn resolve(&self, addr: u32) -> Option<Link> {
        if addr == END_OF_LIST {
            return Some(Link::End);
        }
        if let Some(index) = self.table.resolve(addr) {
            return Some(Link::Bucket(index));
        }
        self.buffer
            .resolve(addr)
            .map(|offset| Link::Packet(PacketId(offset)))
    }

    /// Look up an allocated packet.
    pub fn packet(&self, id: PacketId) -> Option<Packet<'_>> {
        let words = self.buffer.words();
        let tag = PacketTag::decode(*words.get(id.0)?);
        let body = words.get(id.0 + 1..id.0 + 1 + usize::from(tag.len))?;
        Some(Packet {
            id,
            tag,
            words: body,
        })
    }

    /// Packets in `bucket`, most recently allocated first.
    pub fn bucket(&self, bucket: usize) -> BucketIter<'_, WORDS> {
        BucketIter {
            chain: self,
            next: self.table.head(bucket).next,
        }
    }

    pub fn is_bucket_empty(&self, bucket: usize) -> bool {
        self.bucket(bucket).next().is_none()
    }

    /// Every packet in the order the DMA engine sends them, with its bucket:
    /// farthest bucket first, LIFO within a bucket.
    pub fn walk(&self) -> Walk<'_, WORDS> {
        Walk {
            chain: self,
            next: self.head_address(),
            bucket: ORDERING_TABLE_SIZE - 1,
            steps: 0,
        }
    }
}

impl<const WORDS: usize> WordMemory for DmaChain<WORDS> {
    fn read_word(&self, addr: u32) -> Option<u32> {
        match self.resolve(addr)? {
            Link::Bucket(index) => Some(self.table.entries[index]),
            Link::Packet(id) => Some(self.buffer.words[id.0]),
            Link::End => None,
        }
    }
}

/// Iterator over one bucket's packets.
pub struct BucketIter<'a, const WORDS: usize> {
    chain: &'a DmaChain<WORDS>,
    next: u32,
}

impl<'a, const WORDS: usize> Iterator for BucketIter<'a, WORDS> {
    type Item = Packet<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.chain.resolve(self.next)? {
            Link::Packet(id) => {
                let packet = self.chain.packet(id)?;
                self.next = packet.tag.next;
                Some(packet)
            }
            Link::Bucket(_) | Link::End => None,
        }
    }
}

/// Iterator over the whole chain in DMA order.
pub struct Walk<'a, const WORDS: usize> {
    chain: &'a DmaChain<WORDS>,
    next: u32,
    bucket: usize,
    steps: usize,
}

impl<'a, const WORDS: usize> Iterator for Walk<'a, WORDS> {
    type Item = (usize, Packet<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        // Every tag is visited at most once in a well-formed chain.
        while self.steps <= ORDERING_TABLE_SIZE + self.chain.buffer.cursor {
            self.steps += 1;
            match self.chain.resolve(self.next)? {
                Link::End => return None,
                Link::Bucket(index) => {
                    self.bucket = index;
                    self.next = self.chain.table.head(index).next;
                }
                Link::Packet(id) => {
                    let packet = self.chain.packet(id)?;
                    self.next = packet.tag.next;
                    return Some((self.bucket, packet));
                }
            }
        }
        None
    }
}
