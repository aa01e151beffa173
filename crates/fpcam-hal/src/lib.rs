#![no_std]

//! Hardware seams between the renderer and the console it runs on.
//!
//! Every wait in the frame loop is a busy poll on one of these traits. Real
//! hardware makes progress on its own clock; test and host implementations
//! complete after a bounded number of polls.

/// End-of-list marker stored in the low 24 bits of a DMA linked-list tag.
pub const END_OF_LIST: u32 = 0x00FF_FFFF;

/// GPU register access (GP0 command port, GP1 display control, status).
pub trait GpuPort {
    /// Write one word to the GP0 rendering command port.
    fn write_gp0(&mut self, word: u32);

    /// Write one word to the GP1 display control port.
    fn write_gp1(&mut self, word: u32);

    /// Read the GPU status register (GPUSTAT).
    fn read_status(&mut self) -> u32;
}

/// Read access to the memory a linked-list transfer walks.
///
/// Addresses are byte addresses as they appear in the low 24 bits of a
/// packet tag. Returns `None` for addresses outside the backing memory.
pub trait WordMemory {
    fn read_word(&self, addr: u32) -> Option<u32>;
}

/// DMA controller channels used by the renderer (GPU and OTC).
pub trait DmaPort {
    /// Enable the GPU and ordering-table-clear channels in the DMA controller.
    fn enable_channels(&mut self);

    /// Returns true while the GPU channel is still transferring.
    fn is_gpu_busy(&mut self) -> bool;

    /// Start a linked-list transfer to GP0 beginning at the tag at `head`.
    ///
    /// The transfer runs asynchronously; `memory` must not be mutated until
    /// `is_gpu_busy` reports false.
    fn start_linked_list(&mut self, head: u32, memory: &dyn WordMemory);

    /// Start a chunked block transfer of `data` to GP0
    /// (`chunks` chunks of `chunk_words` words each).
    fn start_block_write(&mut self, data: &[u32], chunk_words: u16, chunks: u16);

    /// Reverse-fill an ordering table located at `table_addr`.
    ///
    /// Entry `i` becomes a zero-length tag pointing at entry `i - 1`; entry 0
    /// holds the end-of-list marker. Hardware runs the OTC channel and blocks
    /// until it finishes; the default fills the table in software.
    fn clear_ordering_table(&mut self, table: &mut [u32], table_addr: u32) {
        reverse_fill(table, table_addr);
    }
}

/// Vertical blank interrupt source.
pub trait VblankSource {
    /// Returns true (and acknowledges the interrupt) if a vertical blank has
    /// occurred since the last acknowledged one.
    fn take_vblank(&mut self) -> bool;
}

/// Serial bus shared by controllers and memory cards.
pub trait ControllerBus {
    /// Initialize the serial interface.
    fn init(&mut self);

    /// Select which of the two ports subsequent packets address.
    fn select_port(&mut self, port: u8);

    /// Exchange one packet with the device at `address`.
    ///
    /// Sends `request` (padded with zeros) while filling `response`, and stops
    /// early when the device stops acknowledging. Returns the number of response
    /// bytes received; 0 means nothing is connected.
    fn exchange_packet(&mut self, address: u8, request: &[u8], response: &mut [u8]) -> usize;
}

/// Software equivalent of the OTC channel's reverse fill.
pub fn reverse_fill(table: &mut [u32], table_addr: u32) {
    for (i, entry) in table.iter_mut().enumerate() {
        *entry = if i == 0 {
            END_OF_LIST
        } else {
            table_addr.wrapping_add(((i - 1) * 4) as u32) & END_OF_LIST
        };
    }
}
