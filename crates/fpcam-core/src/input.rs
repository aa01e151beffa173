//! Controller polling over the serial bus.
//!
//! A poll exchanges a 4-byte request for up to 8 response bytes. Controllers
//! answer with at least 4 bytes; fewer means nothing is connected.

use fpcam_hal::ControllerBus;

/// Bus address controllers respond to (memory cards use 0x81).
pub const ADDR_CONTROLLER: u8 = 0x01;
/// Poll command byte ('B').
pub const CMD_POLL: u8 = b'B';

/// Device type of an analog (DualShock-style) controller.
pub const PAD_TYPE_ANALOG: u8 = 0x7;

/// Stick reading at rest.
pub const STICK_CENTER: u8 = 127;

/// Button bit masks (after inverting the active-low wire format).
pub mod buttons {
    pub const SELECT: u16 = 1 << 0;
    pub const L3: u16 = 1 << 1;
    pub const R3: u16 = 1 << 2;
    pub const START: u16 = 1 << 3;
    pub const UP: u16 = 1 << 4;
    pub const RIGHT: u16 = 1 << 5;
    pub const DOWN: u16 = 1 << 6;
    pub const LEFT: u16 = 1 << 7;
    pub const L2: u16 = 1 << 8;
    pub const R2: u16 = 1 << 9;
    pub const L1: u16 = 1 << 10;
    pub const R1: u16 = 1 << 11;
    pub const TRIANGLE: u16 = 1 << 12;
    pub const CIRCLE: u16 = 1 << 13;
    pub const X: u16 = 1 << 14;
    pub const SQUARE: u16 = 1 << 15;
}

/// One controller snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PadReport {
    /// Device type from the high nibble of the first response byte.
    pub kind: u8,
    /// Pressed buttons (1 = pressed).
    pub buttons: u16,
    pub rx: u8,
    pub ry: u8,
    pub lx: u8,
    pub ly: u8,
}

impl Default for PadReport {
    fn default() -> Self {
        Self {
            kind: 0,
            buttons: 0,
            rx: STICK_CENTER,
            ry: STICK_CENTER,
            lx: STICK_CENTER,
            ly: STICK_CENTER,
        }
    }
}

impl PadReport {
    /// Decode a poll response. `None` if fewer than 4 bytes came back.
    pub fn parse(response: &[u8]) -> Option<Self> {
        if response.len() < 4 {
            return None;
        }
        let stick = |i: usize| response.get(i).copied().unwrap_or(STICK_CENTER);
        Some(Self {
            kind: response[0] >> 4,
            buttons: (u16::from(response[2]) | (u16::from(response[3]) << 8)) ^ 0xFFFF,
            rx: stick(4),
            ry: stick(5),
            lx: stick(6),
            ly: stick(7),
        })
    }

    pub fn is_pressed(&self, mask: u16) -> bool {
        self.buttons & mask != 0
    }

    pub fn is_analog(&self) -> bool {
        self.kind == PAD_TYPE_ANALOG
    }
}

/// Poll the controller on `port` (0 or 1).
pub fn poll_pad<B: ControllerBus + ?Sized>(bus: &mut B, port: u8) -> Option<PadReport> {
    let request = [CMD_POLL, 0x00, 0x00, 0x00];
    let mut response = [0u8; 8];

    bus.select_port(port);
    let len = bus.exchange_packet(ADDR_CONTROLLER, &request, &mut response);
    PadReport::parse(&response[..len.min(response.len())])
}

/// Build the raw response a controller would send for `report`.
///
/// Used by host-side controller emulation.
pub fn encode_response(report: &PadReport) -> [u8; 8] {
    let raw = !report.buttons;
    [
        (report.kind << 4) | 0x3,
        0x5A,
        raw as u8,
        (raw >> 8) as u8,
        report.rx,
        report.ry,
        report.lx,
        report.ly,
    ]
}
