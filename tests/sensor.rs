mod common;

mod tests {
    use std::collections::VecDeque;

    use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
    use lumen_fixture::sensor::transport::MAX_TRANSFER_ATTEMPTS;
    use lumen_fixture::sensor::tsl2591::{
        DEVICE_ID, Gain, IntegrationTime, MAX_VALID_POLLS, compute_lux,
    };
    use lumen_fixture::sensor::{I2cBus, RegisterBus, Tsl2591};
    use lumen_fixture::{AmbientSensor, SensorError, TransportError};

    use super::common::FakeBus;

    #[test]
    fn test_compute_lux() {
        assert_eq!(compute_lux(0, 0, Gain::Low, IntegrationTime::Ms100), Ok(0));
        // cpl = 100 / 408, lux = 1000 * 1 / cpl
        assert_eq!(
            compute_lux(1000, 0, Gain::Low, IntegrationTime::Ms100),
            Ok(4080)
        );
        assert_eq!(
            compute_lux(1000, 500, Gain::Medium, IntegrationTime::Ms200),
            Ok(20)
        );
        // Infrared above full spectrum still squares to a positive reading.
        assert_eq!(
            compute_lux(10, 20, Gain::Low, IntegrationTime::Ms100),
            Ok(40)
        );
    }

    #[test]
    fn test_compute_lux_overflow() {
        assert_eq!(
            compute_lux(0xFFFF, 10, Gain::Low, IntegrationTime::Ms100),
            Err(SensorError::Overflow)
        );
        assert_eq!(
            compute_lux(10, 0xFFFF, Gain::Low, IntegrationTime::Ms100),
            Err(SensorError::Overflow)
        );
    }

    #[test]
    fn test_read_device_id() {
        let mut sensor = Tsl2591::new(FakeBus::with_counts(0, 0));
        assert_eq!(sensor.read_device_id(), Ok(DEVICE_ID));
        assert!(sensor.probe());
    }

    #[test]
    fn test_probe_rejects_wrong_id() {
        let mut bus = FakeBus::new();
        bus.registers[0x12] = 0x42;
        let mut sensor = Tsl2591::new(bus);
        assert!(!sensor.probe());
    }

    #[test]
    fn test_read_illuminance_cycle() {
        let mut bus = FakeBus::with_counts(1000, 0);
        bus.valid_after = 3;
        let mut sensor = Tsl2591::new(bus);

        assert_eq!(sensor.read_illuminance(), Ok(4080));
        let bus = sensor.release();
        assert_eq!(bus.status_reads, 4);
        // Powered on, then off again.
        assert_eq!(bus.writes[0], (0xA0, vec![0x03]));
        assert_eq!(bus.writes[1], (0xA0, vec![0x00]));
        assert_eq!(bus.registers[0], 0x00);
    }

    #[test]
    fn test_read_illuminance_overflow() {
        let mut sensor = Tsl2591::new(FakeBus::with_counts(0xFFFF, 0));
        assert_eq!(sensor.read_illuminance(), Err(SensorError::Overflow));
    }

    #[test]
    fn test_read_illuminance_never_valid() {
        let mut bus = FakeBus::with_counts(100, 0);
        bus.valid_after = usize::MAX;
        let mut sensor = Tsl2591::new(bus);
        assert_eq!(sensor.read_illuminance(), Err(SensorError::NotReady));
        assert_eq!(sensor.release().status_reads, usize::from(MAX_VALID_POLLS));
    }

    #[test]
    fn test_transport_error_propagates() {
        let mut bus = FakeBus::new();
        bus.fail_with = Some(TransportError::AddressNack);
        let mut sensor = Tsl2591::new(bus);
        assert_eq!(
            sensor.read_illuminance(),
            Err(SensorError::Transport(TransportError::AddressNack))
        );
    }

    #[test]
    fn test_gain_and_integration_settings() {
        let mut bus = FakeBus::new();
        bus.registers[0x01] = 0x35;
        let mut sensor = Tsl2591::new(bus);

        sensor.set_gain(Gain::Medium).unwrap();
        assert_eq!(sensor.gain(), Gain::Medium);
        sensor.set_integration_time(IntegrationTime::Ms300).unwrap();
        assert_eq!(sensor.integration_time(), IntegrationTime::Ms300);

        assert_eq!(sensor.release().registers[0x01], 0x12);
    }

    #[test]
    fn test_update_bits() {
        let mut bus = FakeBus::new();
        bus.registers[0x04] = 0b1010_0000;
        bus.update_bits(0x29, 0x04, 0b0000_0011, true).unwrap();
        assert_eq!(bus.registers[0x04], 0b1010_0011);
        bus.update_bits(0x29, 0x04, 0b1000_0001, false).unwrap();
        assert_eq!(bus.registers[0x04], 0b0010_0010);
    }

    /// I2C controller failing with queued errors before succeeding.
    struct FlakyI2c {
        errors: VecDeque<ErrorKind>,
        attempts: usize,
        last_write: Vec<u8>,
        read_value: u8,
    }

    impl FlakyI2c {
        fn new(errors: &[ErrorKind]) -> Self {
            Self {
                errors: errors.iter().copied().collect(),
                attempts: 0,
                last_write: Vec::new(),
                read_value: 0x50,
            }
        }
    }

    impl ErrorType for FlakyI2c {
        type Error = ErrorKind;
    }

    impl I2c for FlakyI2c {
        fn transaction(
            &mut self,
            _address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            self.attempts += 1;
            if let Some(err) = self.errors.pop_front() {
                return Err(err);
            }
            self.last_write.clear();
            for operation in operations {
                match operation {
                    Operation::Write(bytes) => self.last_write.extend_from_slice(bytes),
                    Operation::Read(buf) => buf.fill(self.read_value),
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_i2c_bus_reads_register() {
        let mut bus = I2cBus::new(FlakyI2c::new(&[]));
        let mut buf = [0u8; 2];
        bus.read_register(0x29, 0xB2, &mut buf).unwrap();
        assert_eq!(buf, [0x50, 0x50]);
        assert_eq!(bus.release().last_write, vec![0xB2]);
    }

    #[test]
    fn test_i2c_bus_writes_register_prefixed() {
        let mut bus = I2cBus::new(FlakyI2c::new(&[]));
        bus.write_register(0x29, 0xA1, &[0x10, 0x20]).unwrap();
        assert_eq!(bus.release().last_write, vec![0xA1, 0x10, 0x20]);
    }

    #[test]
    fn test_i2c_bus_retries_transient_faults() {
        let mut bus = I2cBus::new(FlakyI2c::new(&[ErrorKind::Bus, ErrorKind::ArbitrationLoss]));
        bus.write_register(0x29, 0xA0, &[0x03]).unwrap();
        assert_eq!(bus.release().attempts, 3);
    }

    #[test]
    fn test_i2c_bus_gives_up() {
        let errors = [ErrorKind::Overrun; MAX_TRANSFER_ATTEMPTS as usize];
        let mut bus = I2cBus::new(FlakyI2c::new(&errors));
        assert_eq!(
            bus.write_register(0x29, 0xA0, &[0x03]),
            Err(TransportError::Busy)
        );
        assert_eq!(bus.release().attempts, usize::from(MAX_TRANSFER_ATTEMPTS));

        let errors = [ErrorKind::ArbitrationLoss; MAX_TRANSFER_ATTEMPTS as usize];
        let mut bus = I2cBus::new(FlakyI2c::new(&errors));
        assert_eq!(
            bus.write_register(0x29, 0xA0, &[0x03]),
            Err(TransportError::ArbitrationLost)
        );
    }

    #[test]
    fn test_i2c_bus_nack_is_not_retried() {
        let mut bus = I2cBus::new(FlakyI2c::new(&[ErrorKind::NoAcknowledge(
            NoAcknowledgeSource::Address,
        )]));
        let mut buf = [0u8];
        assert_eq!(
            bus.read_register(0x29, 0xB2, &mut buf),
            Err(TransportError::AddressNack)
        );
        assert_eq!(bus.release().attempts, 1);

        let mut bus = I2cBus::new(FlakyI2c::new(&[ErrorKind::NoAcknowledge(
            NoAcknowledgeSource::Data,
        )]));
        assert_eq!(
            bus.write_register(0x29, 0xA0, &[0x00]),
            Err(TransportError::DataNack)
        );
    }

    #[test]
    fn test_tsl2591_over_i2c_bus() {
        let mut sensor = Tsl2591::new(I2cBus::new(FlakyI2c::new(&[])));
        assert!(sensor.probe());
    }
}
