//! Software console: GPU status, DMA channels and vertical blank.
//!
//! Linked-list transfers are walked and decoded as soon as they start; the
//! channel then reports busy for a configurable number of polls so the frame
//! loop's barriers are exercised the same way hardware would.

use fpcam_core::gpu::commands::{STAT_CMD_READY, STAT_MODE_PAL};
use fpcam_hal::{DmaPort, GpuPort, VblankSource, WordMemory, END_OF_LIST};
use thiserror::Error;

/// Tags followed before a transfer is declared cyclic.
const MAX_LINKS: usize = 1 << 20;

/// Malformed command streams.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("link to unmapped address {addr:#08x}")]
    UnmappedLink { addr: u32 },
    #[error("linked list from {head:#08x} did not terminate after {steps} tags")]
    Cycle { head: u32, steps: usize },
    #[error("unknown GP0 opcode {opcode:#04x} in packet at {addr:#08x}")]
    UnknownOpcode { opcode: u8, addr: u32 },
    #[error("command {opcode:#04x} needs {needed} words, packet at {addr:#08x} has {left} left")]
    TruncatedCommand {
        opcode: u8,
        needed: usize,
        left: usize,
        addr: u32,
    },
}

/// Timing knobs of the simulated hardware.
#[derive(Debug, Clone, Copy)]
pub struct SimConfig {
    pub pal: bool,
    /// Polls a DMA transfer reports busy for.
    pub dma_latency: u32,
    /// Status reads after a transfer before GP0 accepts commands again.
    pub gp0_latency: u32,
    /// Polls between vertical blanks.
    pub vblank_period: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            pal: false,
            dma_latency: 4,
            gp0_latency: 2,
            vblank_period: 8,
        }
    }
}

/// GP0 commands seen, by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommandCounts {
    pub flat_triangles: u32,
    pub textured_triangles: u32,
    pub other_polygons: u32,
    pub rectangles: u32,
    pub fills: u32,
    pub draw_modes: u32,
    pub vram_writes: u32,
}

impl CommandCounts {
    fn add(&mut self, other: &CommandCounts) {
        self.flat_triangles += other.flat_triangles;
        self.textured_triangles += other.textured_triangles;
        self.other_polygons += other.other_polygons;
        self.rectangles += other.rectangles;
        self.fills += other.fills;
        self.draw_modes += other.draw_modes;
        self.vram_writes += other.vram_writes;
    }
}

/// What one linked-list transfer contained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListReport {
    pub head: u32,
    pub packets: u32,
    pub words: u32,
    pub commands: CommandCounts,
}

/// Totals since power-on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimSummary {
    pub lists: u32,
    pub vblanks: u32,
    pub block_words: u32,
    pub commands: CommandCounts,
    /// Last framebuffer offset written through GP1.
    pub display_offset: (u32, u32),
    pub display_enabled: bool,
}

pub struct SimHardware {
    config: SimConfig,
    dma_busy: u32,
    gp0_busy: u32,
    vblank_polls: u32,
    last_list: Option<ListReport>,
    summary: SimSummary,
    error: Option<SimError>,
}

impl SimHardware {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            dma_busy: 0,
            gp0_busy: 0,
            vblank_polls: 0,
            last_list: None,
            summary: SimSummary::default(),
            error: None,
        }
    }

    pub fn summary(&self) -> &SimSummary {
        &self.summary
    }

    /// Report of the most recent linked-list transfer.
    pub fn last_list(&self) -> Option<&ListReport> {
        self.last_list.as_ref()
    }

    /// First decode error since the last call, if any.
    pub fn take_error(&mut self) -> Option<SimError> {
        self.error.take()
    }

    fn fail(&mut self, err: SimError) {
        log::warn!("sim: {err}");
        self.error.get_or_insert(err);
    }

    fn start_transfer(&mut self) {
        self.dma_busy = self.config.dma_latency;
        self.gp0_busy = self.config.gp0_latency;
    }
}

impl GpuPort for SimHardware {
    fn write_gp0(&mut self, word: u32) {
        if word >> 24 == 0xA0 {
            self.summary.commands.vram_writes += 1;
        }
    }

    fn write_gp1(&mut self, word: u32) {
        match word >> 24 {
            0x00 => self.summary.display_enabled = false,
            0x03 => self.summary.display_enabled = word & 1 == 0,
            0x05 => self.summary.display_offset = (word & 0x3FF, (word >> 10) & 0x1FF),
            0x08 => log::trace!("sim: display mode {:#x}", word & 0xFF_FFFF),
            _ => {}
        }
    }

    fn read_status(&mut self) -> u32 {
        let mut status = if self.config.pal { STAT_MODE_PAL } else { 0 };
        if self.gp0_busy > 0 {
            self.gp0_busy -= 1;
        } else {
            status |= STAT_CMD_READY;
        }
        status
    }
}

impl DmaPort for SimHardware {
    fn enable_channels(&mut self) {
        log::trace!("sim: GPU and OTC DMA channels enabled");
    }

    fn is_gpu_busy(&mut self) -> bool {
        if self.dma_busy > 0 {
            self.dma_busy -= 1;
            true
        } else {
            false
        }
    }

    fn start_linked_list(&mut self, head: u32, memory: &dyn WordMemory) {
        self.start_transfer();
        match decode_linked_list(head, memory) {
            Ok(report) => {
                self.summary.lists += 1;
                self.summary.commands.add(&report.commands);
                self.last_list = Some(report);
            }
            Err(err) => self.fail(err),
        }
    }

    fn start_block_write(&mut self, data: &[u32], chunk_words: u16, chunks: u16) {
        self.start_transfer();
        let expected = usize::from(chunk_words) * usize::from(chunks);
        if data.len() != expected {
            log::warn!(
                "sim: block write of {} words with {chunks} x {chunk_words} chunking",
                data.len()
            );
        }
        self.summary.block_words += data.len() as u32;
    }
}

impl VblankSource for SimHardware {
    fn take_vblank(&mut self) -> bool {
        self.vblank_polls += 1;
        if self.vblank_polls >= self.config.vblank_period {
            self.vblank_polls = 0;
            self.summary.vblanks += 1;
            true
        } else {
            false
        }
    }
}

/// Words taken by the GP0 command starting with `word`, or `None` if the
/// opcode is not one the renderer emits.
pub fn command_words(word: u32) -> Option<usize> {
    let opcode = (word >> 24) as u8;
    match opcode {
        0x00 => Some(1),
        0x02 => Some(3),
        0x20..=0x3F => {
            let gouraud = opcode & 0x10 != 0;
            let vertices = if opcode & 0x08 != 0 { 4 } else { 3 };
            let per_vertex = if opcode & 0x04 != 0 { 2 } else { 1 };
            Some(1 + vertices * per_vertex + if gouraud { vertices - 1 } else { 0 })
        }
        0x60..=0x7F => {
            let textured = usize::from(opcode & 0x04 != 0);
            let variable = usize::from((opcode >> 3) & 3 == 0);
            Some(2 + textured + variable)
        }
        0xA0 => Some(3),
        0xE1..=0xE6 => Some(1),
        _ => None,
    }
}

fn classify(word: u32, counts: &mut CommandCounts) {
    let opcode = (word >> 24) as u8;
    match opcode {
        0x02 => counts.fills += 1,
        0x20..=0x3F if opcode & 0x18 == 0 => {
            if opcode & 0x04 != 0 {
                counts.textured_triangles += 1;
            } else {
                counts.flat_triangles += 1;
            }
        }
        0x20..=0x3F => counts.other_polygons += 1,
        0x60..=0x7F => counts.rectangles += 1,
        0xA0 => counts.vram_writes += 1,
        0xE1..=0xE6 => counts.draw_modes += 1,
        _ => {}
    }
}

/// Follow a linked list from `head` and decode every packet's commands.
pub fn decode_linked_list(head: u32, memory: &dyn WordMemory) -> Result<ListReport, SimError> {
    let mut report = ListReport {
        head,
        ..ListReport::default()
    };
    let mut addr = head;

    for _ in 0..MAX_LINKS {
        if addr == END_OF_LIST {
            return Ok(report);
        }
        let tag = memory
            .read_word(addr)
            .ok_or(SimError::UnmappedLink { addr })?;
        let len = (tag >> 24) as usize;

        if len > 0 {
            let body = (1..=len as u32)
                .map(|i| {
                    let word_addr = addr + 4 * i;
                    memory
                        .read_word(word_addr)
                        .ok_or(SimError::UnmappedLink { addr: word_addr })
                })
                .collect::<Result<Vec<_>, _>>()?;
            decode_packet(addr, &body, &mut report.commands)?;
            report.packets += 1;
            report.words += len as u32;
        }
        addr = tag & END_OF_LIST;
    }
    Err(SimError::Cycle {
        head,
        steps: MAX_LINKS,
    })
}

fn decode_packet(addr: u32, body: &[u32], counts: &mut CommandCounts) -> Result<(), SimError> {
    let mut rest = body;
    while let Some(&word) = rest.first() {
        let opcode = (word >> 24) as u8;
        let needed = command_words(word).ok_or(SimError::UnknownOpcode { opcode, addr })?;
        if needed > rest.len() {
            return Err(SimError::TruncatedCommand {
                opcode,
                needed,
                left: rest.len(),
                addr,
            });
        }
        classify(word, counts);
        rest = &rest[needed..];
    }
    Ok(())
}
