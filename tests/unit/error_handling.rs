//! Error propagation: the first failure ends the operation

use crate::common::{RecordingDelay, SimChip, create_sim_driver};
use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};
use hscdtd008a::{Error, Hscdtd008a, I2cAddr, PowerMode, Register};

#[test]
fn test_failed_status_read_aborts_measure() {
    let (mut driver, chip, _) = create_sim_driver();
    chip.fail_next(1);

    let err = driver.measure().unwrap_err();

    assert!(matches!(err, Error::I2c(ErrorKind::Other)));
    assert!(err.is_transport());
    assert!(chip.ops().is_empty(), "nothing may follow the failed access");
}

#[test]
fn test_failed_read_skips_write_back() {
    let (mut driver, chip, _) = create_sim_driver();
    chip.fail_next(1);

    assert!(driver.set_mode(PowerMode::Active).is_err());
    assert_eq!(chip.writes_to(Register::Ctrl1), 0);
    assert_eq!(chip.register(Register::Ctrl1), 0x22);
}

#[test]
fn test_failure_is_not_sticky() {
    let (mut driver, chip, _) = create_sim_driver();
    chip.fail_next(1);

    assert!(driver.who_i_am_check().is_err());
    driver.who_i_am_check().unwrap();
}

#[test]
fn test_wrong_identity_is_not_a_bus_error() {
    let (mut driver, chip, _) = create_sim_driver();
    chip.set_identity(0x48);

    let err = driver.who_i_am_check().unwrap_err();

    assert!(matches!(err, Error::WrongDevice(0x48)));
    assert!(!err.is_transport());
}

#[test]
fn test_initialize_stops_at_wrong_identity() {
    let (mut driver, chip, _) = create_sim_driver();
    chip.set_identity(0x00);

    assert!(matches!(driver.initialize(), Err(Error::WrongDevice(0x00))));
    assert_eq!(chip.writes_to(Register::Ctrl4), 0);
    assert_eq!(chip.writes_to(Register::Ctrl1), 0);
    assert_eq!(chip.reads_of(Register::SelfTestResp), 0);
}

#[test]
fn test_absent_device_fails_initialize() {
    let chip = SimChip::new().at_address(0x0D);
    let mut driver = Hscdtd008a::open(chip.clone(), RecordingDelay::default(), I2cAddr::Default).unwrap();

    let result = driver.initialize();

    assert!(matches!(
        result,
        Err(Error::I2c(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)))
    ));
    assert_eq!(chip.reset_attempts(), 0);
}

#[test]
fn test_unselectable_address_is_rejected() {
    let result = Hscdtd008a::open(SimChip::new(), RecordingDelay::default(), I2cAddr::Custom(0x7F));

    assert!(matches!(result, Err(Error::InvalidAddress(0x7F))));
}

#[test]
fn test_error_display() {
    let err: Error<ErrorKind> = Error::WrongDevice(0x48);
    assert_eq!(format!("{err}"), "unexpected WIA 0x48");

    let err: Error<ErrorKind> = Error::BufferCapacity(32);
    assert_eq!(format!("{err}"), "32 bytes exceed a single transaction");
}
