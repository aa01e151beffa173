//! Shared mock hardware for the integration tests.
//!
//! Every port call is recorded in order. Busy and not-ready states clear
//! after a fixed number of polls so the driver's wait loops always finish.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use fpcam_core::gpu::commands::{STAT_CMD_READY, STAT_MODE_PAL};
use fpcam_hal::{ControllerBus, DmaPort, GpuPort, VblankSource, WordMemory, END_OF_LIST};

/// Upper bound on tags followed in one linked-list transfer.
const MAX_LINKS: usize = 1 << 16;

/// One recorded hardware interaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Gp0(u32),
    Gp1(u32),
    /// A status read that reported GP0 ready.
    Gp0Ready,
    ChannelsEnabled,
    DmaPoll { busy: bool },
    /// Linked-list transfer: start address and the non-empty packets in
    /// the order they were sent.
    LinkedList { head: u32, packets: Vec<Vec<u32>> },
    BlockWrite { words: usize, chunk_words: u16, chunks: u16 },
    TableCleared { addr: u32, len: usize },
    Vblank,
}

pub struct MockState {
    pub events: Vec<Event>,
    pub pal: bool,
    /// Polls a transfer stays busy for.
    pub dma_latency: u32,
    dma_busy: u32,
    /// Status reads before GP0 reports ready.
    pub gp0_ready_after: u32,
    gp0_polls: u32,
    /// Polls between vertical blanks.
    pub vblank_period: u32,
    vblank_polls: u32,
}

#[derive(Clone)]
pub struct MockHardware {
    pub state: Rc<RefCell<MockState>>,
}

impl MockHardware {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(MockState {
                events: Vec::new(),
                pal: false,
                dma_latency: 2,
                dma_busy: 0,
                gp0_ready_after: 1,
                gp0_polls: 0,
                vblank_period: 3,
                vblank_polls: 0,
            })),
        }
    }

    pub fn pal() -> Self {
        let hw = Self::new();
        hw.state.borrow_mut().pal = true;
        hw
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.borrow().events.clone()
    }

    pub fn clear_events(&self) {
        self.state.borrow_mut().events.clear();
    }

    pub fn gp1_writes(&self) -> Vec<u32> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Gp1(word) => Some(word),
                _ => None,
            })
            .collect()
    }

    pub fn gp0_writes(&self) -> Vec<u32> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Gp0(word) => Some(word),
                _ => None,
            })
            .collect()
    }

    pub fn linked_lists(&self) -> Vec<(u32, Vec<Vec<u32>>)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::LinkedList { head, packets } => Some((head, packets)),
                _ => None,
            })
            .collect()
    }

    pub fn block_writes(&self) -> Vec<(usize, u16, u16)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::BlockWrite {
                    words,
                    chunk_words,
                    chunks,
                } => Some((words, chunk_words, chunks)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: Event) {
        self.state.borrow_mut().events.push(event);
    }
}

impl GpuPort for MockHardware {
    fn write_gp0(&mut self, word: u32) {
        self.record(Event::Gp0(word));
    }

    fn write_gp1(&mut self, word: u32) {
        self.record(Event::Gp1(word));
    }

    fn read_status(&mut self) -> u32 {
        let mut s = self.state.borrow_mut();
        let mut status = if s.pal { STAT_MODE_PAL } else { 0 };
        s.gp0_polls += 1;
        if s.gp0_polls > s.gp0_ready_after {
            s.gp0_polls = 0;
            status |= STAT_CMD_READY;
            s.events.push(Event::Gp0Ready);
        }
        status
    }
}

impl DmaPort for MockHardware {
    fn enable_channels(&mut self) {
        self.record(Event::ChannelsEnabled);
    }

    fn is_gpu_busy(&mut self) -> bool {
        let mut s = self.state.borrow_mut();
        let busy = s.dma_busy > 0;
        if busy {
            s.dma_busy -= 1;
        }
        s.events.push(Event::DmaPoll { busy });
        busy
    }

    fn start_linked_list(&mut self, head: u32, memory: &dyn WordMemory) {
        let packets = walk_linked_list(head, memory);
        let mut s = self.state.borrow_mut();
        s.dma_busy = s.dma_latency;
        s.events.push(Event::LinkedList { head, packets });
    }

    fn start_block_write(&mut self, data: &[u32], chunk_words: u16, chunks: u16) {
        assert_eq!(
            data.len(),
            usize::from(chunk_words) * usize::from(chunks),
            "block write length must match its chunking"
        );
        let mut s = self.state.borrow_mut();
        s.dma_busy = s.dma_latency;
        s.events.push(Event::BlockWrite {
            words: data.len(),
            chunk_words,
            chunks,
        });
    }

    fn clear_ordering_table(&mut self, table: &mut [u32], table_addr: u32) {
        fpcam_hal::reverse_fill(table, table_addr);
        self.record(Event::TableCleared {
            addr: table_addr,
            len: table.len(),
        });
    }
}

impl VblankSource for MockHardware {
    fn take_vblank(&mut self) -> bool {
        let mut s = self.state.borrow_mut();
        s.vblank_polls += 1;
        if s.vblank_polls >= s.vblank_period {
            s.vblank_polls = 0;
            s.events.push(Event::Vblank);
            true
        } else {
            false
        }
    }
}

/// Follow a linked list the way the DMA engine does and collect the command
/// words of every non-empty packet.
pub fn walk_linked_list(head: u32, memory: &dyn WordMemory) -> Vec<Vec<u32>> {
    let mut packets = Vec::new();
    let mut addr = head;
    for _ in 0..MAX_LINKS {
        if addr == END_OF_LIST {
            return packets;
        }
        let tag = memory
            .read_word(addr)
            .unwrap_or_else(|| panic!("link to unmapped address {addr:#08x}"));
        let len = tag >> 24;
        if len > 0 {
            let body = (1..=len)
                .map(|i| {
                    memory
                        .read_word(addr + 4 * i)
                        .unwrap_or_else(|| panic!("packet body past {addr:#08x} unmapped"))
                })
                .collect();
            packets.push(body);
        }
        addr = tag & END_OF_LIST;
    }
    panic!("linked list starting at {head:#08x} does not terminate");
}

/// Controller bus that answers every poll with a fixed response.
pub struct MockPad {
    pub response: Vec<u8>,
    pub selected_port: Option<u8>,
    pub requests: Vec<(u8, Vec<u8>)>,
}

impl MockPad {
    pub fn new(response: &[u8]) -> Self {
        Self {
            response: response.to_vec(),
            selected_port: None,
            requests: Vec::new(),
        }
    }

    pub fn disconnected() -> Self {
        Self::new(&[])
    }
}

impl ControllerBus for MockPad {
    fn init(&mut self) {}

    fn select_port(&mut self, port: u8) {
        self.selected_port = Some(port);
    }

    fn exchange_packet(&mut self, address: u8, request: &[u8], response: &mut [u8]) -> usize {
        self.requests.push((address, request.to_vec()));
        let len = self.response.len().min(response.len());
        response[..len].copy_from_slice(&self.response[..len]);
        len
    }
}

/// Index of the first event matching `pred` at or after `from`.
pub fn position_after(events: &[Event], from: usize, pred: impl Fn(&Event) -> bool) -> Option<usize> {
    events[from..].iter().position(pred).map(|i| i + from)
}
