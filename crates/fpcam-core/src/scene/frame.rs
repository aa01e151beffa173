//! Double-buffered frame scheduling.
//!
//! Two command chains alternate by frame parity. While one is being drained
//! by the DMA engine the other is rebuilt; [`FrameScheduler::begin_frame`]
//! blocks until the previous transfer has finished before handing out a chain.
//! Each chain also owns one framebuffer: slot `n` draws at
//! `(0, n * SCREEN_HEIGHT)` while the display shows the other slot's image.

use fpcam_hal::{DmaPort, GpuPort, VblankSource};

use crate::config::{BACKGROUND_COLOR, CHAIN_BASE_ADDR, CHAIN_BUFFER_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::gpu::chain::DmaChain;
use crate::gpu::commands;
use crate::gpu::driver::{GpuDriver, GpuError};

/// Number of alternating chain slots.
pub const SLOTS: usize = 2;

/// Bucket the trailing background and draw-area packets go in.
pub const BACKGROUND_BUCKET: usize = crate::config::ORDERING_TABLE_SIZE - 1;

/// What a chain slot is currently used for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotRole {
    /// Not touched since the last transfer completed (or never used).
    Idle,
    /// Being filled by the frame in progress.
    Building,
    /// Submitted to the DMA engine; read-only until the transfer completes.
    InFlight,
}

/// Owns both command chains and their roles.
pub struct FrameScheduler<const WORDS: usize = CHAIN_BUFFER_SIZE> {
    chains: [DmaChain<WORDS>; SLOTS],
    roles: [SlotRole; SLOTS],
    frame: u32,
}

impl<const WORDS: usize> Default for FrameScheduler<WORDS> {
    fn default() -> Self {
        Self::new(CHAIN_BASE_ADDR)
    }
}

impl<const WORDS: usize> FrameScheduler<WORDS> {
    /// Lay both chains out back to back from byte address `base`.
    pub fn new(base: u32) -> Self {
        Self {
            chains: [
                DmaChain::new(base),
                DmaChain::new(base + DmaChain::<WORDS>::BYTES),
            ],
            roles: [SlotRole::Idle; SLOTS],
            frame: 0,
        }
    }

    /// Frames presented so far.
    pub fn frame_number(&self) -> u32 {
        self.frame
    }

    /// Slot the next frame will build into.
    pub fn next_slot(&self) -> usize {
        self.frame as usize % SLOTS
    }

    pub fn role(&self, slot: usize) -> SlotRole {
        self.roles[slot]
    }

    pub fn chain(&self, slot: usize) -> &DmaChain<WORDS> {
        &self.chains[slot]
    }

    /// Wait for the previous transfer, then reset and hand out the next chain.
    ///
    /// Panics if the slot is still marked as building, which happens when a
    /// [`Frame`] was dropped without being presented.
    pub fn begin_frame<H: GpuPort + DmaPort>(&mut self, gpu: &mut GpuDriver<H>) -> Frame<'_, WORDS> {
        gpu.wait_dma_done();
        for role in &mut self.roles {
            if *role == SlotRole::InFlight {
                *role = SlotRole::Idle;
            }
        }

        let slot = self.next_slot();
        self.transition(slot, SlotRole::Idle, SlotRole::Building);
        gpu.clear_ordering_table(&mut self.chains[slot]);

        Frame {
            scheduler: self,
            slot,
        }
    }

    fn transition(&mut self, slot: usize, from: SlotRole, to: SlotRole) {
        let current = self.roles[slot];
        assert!(
            current == from,
            "chain slot {slot}: cannot go {current:?} -> {to:?}, expected {from:?}"
        );
        self.roles[slot] = to;
    }
}

/// VRAM origin of the framebuffer slot `slot` draws into.
pub fn framebuffer_origin(slot: usize) -> (i32, i32) {
    (0, slot as i32 * SCREEN_HEIGHT)
}

/// A frame being built into one chain slot.
pub struct Frame<'a, const WORDS: usize> {
    scheduler: &'a mut FrameScheduler<WORDS>,
    slot: usize,
}

impl<'a, const WORDS: usize> Frame<'a, WORDS> {
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Sequence number of this frame.
    pub fn number(&self) -> u32 {
        self.scheduler.frame
    }

    pub fn chain(&mut self) -> &mut DmaChain<WORDS> {
        &mut self.scheduler.chains[self.slot]
    }

    /// Finish the chain and hand it to the DMA engine.
    ///
    /// Appends the background fill and draw-area packets to the farthest
    /// bucket, waits for GP0 and the vertical blank, flips the display to the
    /// previous frame's framebuffer and starts the transfer.
    pub fn present<H>(mut self, gpu: &mut GpuDriver<H>) -> Result<(), GpuError>
    where
        H: GpuPort + DmaPort + VblankSource,
    {
        let slot = self.slot;
        append_trailing_packets(self.chain(), framebuffer_origin(slot));

        gpu.wait_gp0_ready();
        gpu.wait_vsync();
        let (display_x, display_y) = framebuffer_origin((slot + 1) % SLOTS);
        gpu.set_display_offset(display_x, display_y);

        let scheduler = self.scheduler;
        let chain = &scheduler.chains[slot];
        gpu.send_linked_list(chain)?;
        log::debug!(
            "frame {}: slot {slot} submitted, {} words",
            scheduler.frame,
            chain.buffer().cursor()
        );

        scheduler.transition(slot, SlotRole::Building, SlotRole::InFlight);
        scheduler.frame = scheduler.frame.wrapping_add(1);
        Ok(())
    }
}

/// Background fill of the framebuffer at `origin`, then the draw-area
/// setup. Allocated last in the farthest bucket, so the draw area is set
/// first and the fill runs before any geometry.
pub fn append_trailing_packets<const WORDS: usize>(chain: &mut DmaChain<WORDS>, origin: (i32, i32)) {
    let (x, y) = origin;
    let [r, g, b] = BACKGROUND_COLOR;

    let fill = chain.allocate(BACKGROUND_BUCKET, 3);
    fill[0] = commands::rgb(r, g, b) | commands::vram_fill();
    fill[1] = commands::xy(x, y);
    fill[2] = commands::xy(SCREEN_WIDTH, SCREEN_HEIGHT);

    let area = chain.allocate(BACKGROUND_BUCKET, 4);
    area[0] = commands::texpage(0, true, false);
    area[1] = commands::fb_offset1(x, y);
    area[2] = commands::fb_offset2(x + SCREEN_WIDTH - 1, y + SCREEN_HEIGHT - 2);
    area[3] = commands::fb_origin(x, y);
}
