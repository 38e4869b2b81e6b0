// Bus and delay recorder for timing checks. `embedded-hal-mock` verifies I2C and delay traffic
// separately, so it can't tell how long Enable stayed high between two particular writes. The
// recorder logs both kinds of event into one shared, ordered log.

extern crate std;

use std::{cell::RefCell, rc::Rc, vec::Vec};

use embedded_hal::{
    delay::DelayNs,
    i2c::{self, ErrorKind, Operation},
};

const ENABLE_BIT: u8 = 0b0000_0100;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BusEvent {
    /// address, byte
    Write(u8, u8),
    DelayNs(u64),
}

#[derive(Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<BusEvent>>>);

impl EventLog {
    fn push(&self, event: BusEvent) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<BusEvent> {
        self.0.borrow().clone()
    }

    pub fn written_bytes(&self) -> Vec<u8> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                BusEvent::Write(_, byte) => Some(byte),
                BusEvent::DelayNs(_) => None,
            })
            .collect()
    }

    /// The pin state latched by each Enable pulse, with the Enable bit masked off.
    pub fn latched_nibbles(&self) -> Vec<u8> {
        self.written_bytes()
            .into_iter()
            .filter(|byte| byte & ENABLE_BIT != 0)
            .map(|byte| byte & !ENABLE_BIT)
            .collect()
    }

    /// Bytes latched by the controller, reassembled from nibble pairs. Only meaningful for traffic
    /// that is entirely two-nibble transfers.
    pub fn latched_bytes(&self) -> Vec<u8> {
        self.latched_nibbles()
            .chunks(2)
            .map(|pair| (pair[0] & 0xF0) | (pair.get(1).copied().unwrap_or(0) >> 4))
            .collect()
    }

    /// Total delay recorded between event indexes `from` (exclusive) and the next write.
    fn delay_until_next_write(events: &[BusEvent], from: usize) -> u64 {
        events[from + 1..]
            .iter()
            .take_while(|event| matches!(event, BusEvent::DelayNs(_)))
            .map(|event| match event {
                BusEvent::DelayNs(ns) => *ns,
                BusEvent::Write(..) => 0,
            })
            .sum()
    }

    /// Panics unless every Enable pulse is held at least 1us and followed by at least 42us of
    /// settle time after Enable drops.
    pub fn assert_strobe_timing(&self) {
        let events = self.events();
        for (index, event) in events.iter().enumerate() {
            let BusEvent::Write(_, byte) = event else {
                continue;
            };
            if byte & ENABLE_BIT == 0 {
                continue;
            }
            let held = Self::delay_until_next_write(&events, index);
            assert!(held >= 1_000, "enable pulse at event {} held {}ns", index, held);

            let fall = events[index + 1..]
                .iter()
                .position(|event| matches!(event, BusEvent::Write(..)))
                .map(|offset| index + 1 + offset)
                .expect("enable pulse never dropped");
            assert!(
                matches!(events[fall], BusEvent::Write(_, fallen) if fallen == byte & !ENABLE_BIT),
                "enable pulse at event {} did not drop cleanly",
                index
            );
            let settle = Self::delay_until_next_write(&events, fall);
            assert!(settle >= 42_000, "settle after event {} was {}ns", fall, settle);
        }
    }
}

pub struct RecordingI2c {
    log: EventLog,
    fail_after: Option<usize>,
}

impl RecordingI2c {
    /// Make every write after the first `count` successful ones fail.
    pub fn failing_after(mut self, count: usize) -> Self {
        self.fail_after = Some(count);
        self
    }
}

impl i2c::ErrorType for RecordingI2c {
    type Error = ErrorKind;
}

impl i2c::I2c for RecordingI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        for operation in operations.iter() {
            if let Operation::Write(bytes) = operation {
                for byte in bytes.iter() {
                    if let Some(remaining) = self.fail_after.as_mut() {
                        if *remaining == 0 {
                            return Err(ErrorKind::Other);
                        }
                        *remaining -= 1;
                    }
                    self.log.push(BusEvent::Write(address, *byte));
                }
            }
        }
        Ok(())
    }
}

pub struct RecordingDelay {
    log: EventLog,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.push(BusEvent::DelayNs(ns as u64));
    }

    fn delay_us(&mut self, us: u32) {
        self.log.push(BusEvent::DelayNs(us as u64 * 1_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.push(BusEvent::DelayNs(ms as u64 * 1_000_000));
    }
}

/// An I2C bus and a delay that record into the same log.
pub fn recorder() -> (RecordingI2c, RecordingDelay, EventLog) {
    let log = EventLog::default();
    (
        RecordingI2c {
            log: log.clone(),
            fail_after: None,
        },
        RecordingDelay { log: log.clone() },
        log,
    )
}
