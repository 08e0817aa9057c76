use embassy_futures::block_on;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embedded_hal::i2c::ErrorKind;
use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
use trackbot_core::config::ShieldConfig;
use trackbot_core::traits::{HBridgeMotor, MotorDirection, StepStyle};
use trackbot_drivers::pwm;
use trackbot_drivers::{Error, MotorShield};
use trackbot_hal::EmbeddedHalI2c;

type Shield = MotorShield<NoopRawMutex, EmbeddedHalI2c<I2cMock>>;

fn shield(expectations: &[I2cTransaction], config: ShieldConfig) -> Shield {
    MotorShield::new(EmbeddedHalI2c::new(I2cMock::new(expectations)), config)
}

/// Channel block write: register, on (LE), off (LE)
fn channel(address: u8, ch: u8, on: u16, off: u16) -> I2cTransaction {
    let [on_l, on_h] = on.to_le_bytes();
    let [off_l, off_h] = off.to_le_bytes();
    I2cTransaction::write(address, vec![0x06 + 4 * ch, on_l, on_h, off_l, off_h])
}

/// Async delay that only counts
#[derive(Default)]
struct CountingDelay {
    total_us: u64,
}

impl embedded_hal_async::delay::DelayNs for CountingDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.total_us += ns as u64 / 1000;
    }
}

#[test]
fn begin_programs_default_frequency() {
    let mut expectations = vec![
        I2cTransaction::write(0x60, vec![0x00, 0x00]),
        I2cTransaction::write_read(0x60, vec![0x00], vec![0x00]),
        I2cTransaction::write(0x60, vec![0x00, 0x10]),
        I2cTransaction::write(0x60, vec![0xFE, 0x03]),
        I2cTransaction::write(0x60, vec![0x00, 0x00]),
        I2cTransaction::write(0x60, vec![0x00, 0xA1]),
    ];
    expectations.extend((0..16).map(|ch| channel(0x60, ch, 0, 0)));

    let shield = shield(&expectations, ShieldConfig::default());
    let result = shield.begin(&mut NoopDelay::new());
    assert!(result.is_ok());

    shield.release().release().done();
}

#[test]
fn frequency_change_keeps_mode_bits() {
    let expectations = [
        I2cTransaction::write_read(0x61, vec![0x00], vec![0x21]),
        I2cTransaction::write(0x61, vec![0x00, 0x31]),
        I2cTransaction::write(0x61, vec![0xFE, 112]),
        I2cTransaction::write(0x61, vec![0x00, 0x21]),
        I2cTransaction::write(0x61, vec![0x00, 0xA1]),
    ];

    let shield = shield(&expectations, ShieldConfig::default().with_address(0x61));
    assert_eq!(shield.set_pwm_frequency(60, &mut NoopDelay::new()), Ok(112));

    shield.release().release().done();
}

#[test]
fn dc_motor_forward_then_speed() {
    let expectations = [
        channel(0x60, 3, 0, 0),
        channel(0x60, 4, 4096, 0),
        channel(0x60, 2, 0, 1600),
    ];

    let shield = shield(&expectations, ShieldConfig::default());
    let mut motor = shield.motor(3).unwrap();
    motor.run(MotorDirection::Forward).unwrap();
    motor.set_speed(100).unwrap();

    shield.release().release().done();
}

#[test]
fn engine_turn_in_place() {
    // Left (M1) forward, right (M2) backward, both at full speed
    let expectations = [
        channel(0x60, 9, 0, 0),
        channel(0x60, 10, 4096, 0),
        channel(0x60, 11, 0, 0),
        channel(0x60, 12, 4096, 0),
        channel(0x60, 8, 0, 4080),
        channel(0x60, 13, 0, 4080),
    ];

    let shield = shield(&expectations, ShieldConfig::default());
    let mut engine = shield.engine();
    engine.turn(255, 255).unwrap();
    drop(engine);

    shield.release().release().done();
}

#[test]
fn async_double_step() {
    // Position 8, latch 0x3: coil A IN2 (9) and coil B IN1 (11) high
    let expectations = [
        channel(0x60, 8, 0, 4080),
        channel(0x60, 13, 0, 4080),
        channel(0x60, 9, 4096, 0),
        channel(0x60, 11, 4096, 0),
        channel(0x60, 10, 0, 0),
        channel(0x60, 12, 0, 0),
    ];

    let shield = shield(&expectations, ShieldConfig::default());
    let mut stepper = shield.stepper(200, 1).unwrap();
    stepper.set_speed_rpm(60).unwrap();

    let mut delay = CountingDelay::default();
    let result = block_on(stepper.step_async(
        1,
        MotorDirection::Forward,
        StepStyle::Double,
        &mut delay,
    ));
    assert!(result.is_ok());
    assert_eq!(stepper.position(), 8);
    assert_eq!(delay.total_us, 5000);

    shield.release().release().done();
}

#[test]
fn bus_error_is_reported() {
    let expectations = [channel(0x60, 8, 0, 800).with_error(ErrorKind::Other)];

    let shield = shield(&expectations, ShieldConfig::default());
    let mut motor = shield.motor(1).unwrap();
    assert_eq!(
        motor.set_speed(50),
        Err(Error::Pwm(pwm::Error::Bus(ErrorKind::Other)))
    );

    shield.release().release().done();
}
