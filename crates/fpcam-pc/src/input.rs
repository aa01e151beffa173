//! Scripted controller for the host simulator.
//!
//! Replays a fixed tour of the room: walk forward, turn, strafe, rise, and
//! flip the wall texture and help overlay, then loop.

use fpcam_core::input::{buttons, encode_response, PadReport, ADDR_CONTROLLER, PAD_TYPE_ANALOG};
use fpcam_hal::ControllerBus;

/// One held input and how many polls it lasts.
#[derive(Debug, Clone, Copy)]
pub struct Step {
    pub polls: u32,
    pub report: PadReport,
}

const fn sticks(lx: u8, ly: u8, rx: u8, ry: u8, held: u16) -> PadReport {
    PadReport {
        kind: PAD_TYPE_ANALOG,
        buttons: held,
        rx,
        ry,
        lx,
        ly,
    }
}

const IDLE: PadReport = sticks(127, 127, 127, 127, 0);

const TOUR: [Step; 9] = [
    Step { polls: 20, report: sticks(127, 0, 127, 127, 0) },
    Step { polls: 1, report: sticks(127, 127, 127, 127, buttons::SQUARE) },
    Step { polls: 30, report: sticks(127, 127, 255, 127, 0) },
    Step { polls: 15, report: sticks(255, 127, 127, 60, 0) },
    Step { polls: 1, report: sticks(127, 127, 127, 127, buttons::TRIANGLE) },
    Step { polls: 10, report: sticks(127, 127, 127, 127, buttons::L2) },
    Step { polls: 10, report: sticks(127, 127, 127, 127, buttons::R2) },
    Step { polls: 20, report: sticks(127, 255, 0, 200, 0) },
    Step { polls: 1, report: sticks(127, 127, 127, 127, buttons::SQUARE | buttons::TRIANGLE) },
];

pub struct ScriptedPad {
    script: &'static [Step],
    step: usize,
    polls: u32,
    connected: bool,
    port: u8,
}

impl ScriptedPad {
    /// Analog pad replaying the built-in room tour.
    pub fn tour() -> Self {
        Self::new(&TOUR)
    }

    pub fn new(script: &'static [Step]) -> Self {
        Self {
            script,
            step: 0,
            polls: 0,
            connected: true,
            port: 0,
        }
    }

    /// A port with nothing plugged in.
    pub fn disconnected() -> Self {
        Self {
            connected: false,
            ..Self::new(&[])
        }
    }

    fn next_report(&mut self) -> PadReport {
        let Some(step) = self.script.get(self.step) else {
            return IDLE;
        };
        let report = step.report;
        self.polls += 1;
        if self.polls >= step.polls {
            self.polls = 0;
            self.step = (self.step + 1) % self.script.len();
        }
        report
    }
}

impl ControllerBus for ScriptedPad {
    fn init(&mut self) {
        log::info!(
            "scripted pad: {} ({} steps)",
            if self.connected { "connected" } else { "disconnected" },
            self.script.len()
        );
    }

    fn select_port(&mut self, port: u8) {
        self.port = port;
    }

    fn exchange_packet(&mut self, address: u8, _request: &[u8], response: &mut [u8]) -> usize {
        if !self.connected || self.port != 0 || address != ADDR_CONTROLLER {
            return 0;
        }
        let bytes = encode_response(&self.next_report());
        let n = bytes.len().min(response.len());
        response[..n].copy_from_slice(&bytes[..n]);
        n
    }
}
