//! Test doubles shared by the unit tests

use std::vec::Vec;

use trackbot_hal::I2cBus;

use crate::pwm::pca9685::reg;

/// Bus error raised by [`RecordingBus`] when `fail` is set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusFault;

/// I2C bus that records every write
#[derive(Debug, Default)]
pub struct RecordingBus {
    /// (address, bytes) of every write, in order
    pub writes: Vec<(u8, Vec<u8>)>,
    /// Value returned for MODE1 reads
    pub mode1: u8,
    /// Fail every transaction
    pub fail: bool,
}

impl RecordingBus {
    /// Channel writes decoded as (channel, on, off)
    pub fn channel_writes(&self) -> Vec<(u8, u16, u16)> {
        self.writes
            .iter()
            .filter(|(_, data)| data.len() == 5 && data[0] >= reg::LED0_ON_L)
            .map(|(_, d)| {
                (
                    (d[0] - reg::LED0_ON_L) / 4,
                    u16::from_le_bytes([d[1], d[2]]),
                    u16::from_le_bytes([d[3], d[4]]),
                )
            })
            .collect()
    }

    /// Single-register writes as (register, value)
    pub fn register_writes(&self) -> Vec<(u8, u8)> {
        self.writes
            .iter()
            .filter(|(_, data)| data.len() == 2)
            .map(|(_, d)| (d[0], d[1]))
            .collect()
    }

    /// Digital pin writes as (channel, high)
    pub fn pin_writes(&self) -> Vec<(u8, bool)> {
        self.channel_writes()
            .into_iter()
            .filter(|&(_, on, off)| off == 0 && (on == 0 || on == 4096))
            .map(|(ch, on, _)| (ch, on == 4096))
            .collect()
    }
}

impl I2cBus for RecordingBus {
    type Error = BusFault;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), BusFault> {
        if self.fail {
            return Err(BusFault);
        }
        self.writes.push((address, data.to_vec()));
        Ok(())
    }

    fn read(&mut self, _address: u8, buf: &mut [u8]) -> Result<(), BusFault> {
        if self.fail {
            return Err(BusFault);
        }
        buf.fill(0);
        Ok(())
    }

    fn write_read(
        &mut self,
        _address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), BusFault> {
        if self.fail {
            return Err(BusFault);
        }
        read_buf.fill(0);
        if write_data == [reg::MODE1] {
            read_buf[0] = self.mode1;
        }
        Ok(())
    }
}

/// Delay that returns immediately and sums the requested time
#[derive(Debug, Default)]
pub struct NoDelay {
    pub total_ns: u64,
    pub calls: u32,
}

impl embedded_hal::delay::DelayNs for NoDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
        self.calls += 1;
    }
}

impl embedded_hal_async::delay::DelayNs for NoDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
        self.calls += 1;
    }
}
