//! Simulated HSCDTD008A behind an `embedded_hal::i2c::I2c` implementation

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use hscdtd008a::{I2C_ADDRESS_DEFAULT, Register};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

const SRST: u8 = 0x80;
const FRC: u8 = 0x40;
const STC: u8 = 0x10;
const TCS: u8 = 0x02;
const OCL: u8 = 0x01;

const DRDY: u8 = 0x40;
const TRDY: u8 = 0x02;

/// Records bus accesses seen by the simulated chip
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    /// Register read
    Read {
        /// First register index
        reg: u8,
        /// Number of bytes read
        len: usize,
    },
    /// Register write
    Write {
        /// First register index
        reg: u8,
        /// Payload after the index byte
        bytes: Vec<u8>,
    },
}

#[derive(Debug)]
struct ChipState {
    address: u8,
    wia: u8,
    regs: [u8; 0x40],
    ops: Vec<Op>,

    reset_attempts: usize,
    stuck_resets: usize,
    offset_calibrations: usize,

    /// STATUS polls after FRC until DRDY comes up; `None` never
    drdy_after: Option<usize>,
    drdy_countdown: Option<usize>,
    /// STATUS polls after TCS until TRDY comes up; `None` never
    trdy_after: Option<usize>,
    trdy_countdown: Option<usize>,

    /// Overrides the self-test response register, one byte per read
    selftest_script: VecDeque<u8>,

    fail_next: usize,
}

impl ChipState {
    fn new() -> Self {
        let mut state = Self {
            address: I2C_ADDRESS_DEFAULT,
            wia: 0x49,
            regs: [0; 0x40],
            ops: Vec::new(),
            reset_attempts: 0,
            stuck_resets: 0,
            offset_calibrations: 0,
            drdy_after: Some(1),
            drdy_countdown: None,
            trdy_after: Some(1),
            trdy_countdown: None,
            selftest_script: VecDeque::new(),
            fail_next: 0,
        };
        state.power_on_defaults();
        state
    }

    fn power_on_defaults(&mut self) {
        let temp = self.regs[Register::Temp.addr() as usize];
        let mut axes = [0u8; 6];
        axes.copy_from_slice(&self.regs[0x10..0x16]);

        self.regs = [0; 0x40];
        self.regs[Register::SelfTestResp.addr() as usize] = 0x55;
        self.regs[Register::Wia.addr() as usize] = self.wia;
        // stand-by, 0.5 Hz, force state, reserved bit 5 set
        self.regs[Register::Ctrl1.addr() as usize] = 0x22;
        self.regs[Register::Ctrl2.addr() as usize] = 0x04;
        self.regs[Register::Ctrl4.addr() as usize] = 0x80;
        // measurement results are not registers the reset touches
        self.regs[Register::Temp.addr() as usize] = temp;
        self.regs[0x10..0x16].copy_from_slice(&axes);
        self.drdy_countdown = None;
        self.trdy_countdown = None;
    }

    fn write_reg(&mut self, reg: u8, value: u8) {
        if reg == Register::Ctrl3.addr() {
            self.write_ctrl3(value);
            return;
        }
        if reg == Register::Wia.addr() || reg == Register::Status.addr() {
            return;
        }
        self.regs[reg as usize] = value;
    }

    fn write_ctrl3(&mut self, value: u8) {
        let ctrl3 = Register::Ctrl3.addr() as usize;
        if value & SRST != 0 {
            self.reset_attempts += 1;
            if self.stuck_resets > 0 {
                self.stuck_resets -= 1;
                self.regs[ctrl3] = SRST;
            } else {
                self.power_on_defaults();
            }
            return;
        }
        if value & FRC != 0 {
            self.drdy_countdown = self.drdy_after;
        }
        if value & STC != 0 {
            self.regs[Register::SelfTestResp.addr() as usize] = 0xAA;
        }
        if value & TCS != 0 {
            self.trdy_countdown = self.trdy_after;
        }
        if value & OCL != 0 {
            self.offset_calibrations += 1;
        }
        // action bits clear themselves once the action has started
        self.regs[ctrl3] &= SRST;
    }

    fn read_reg(&mut self, reg: u8) -> u8 {
        let status = Register::Status.addr() as usize;
        match reg {
            r if r == Register::Status.addr() => {
                if let Some(n) = self.drdy_countdown {
                    if n <= 1 {
                        self.regs[status] |= DRDY;
                        self.drdy_countdown = None;
                    } else {
                        self.drdy_countdown = Some(n - 1);
                    }
                }
                if let Some(n) = self.trdy_countdown {
                    if n <= 1 {
                        self.regs[status] |= TRDY;
                        self.trdy_countdown = None;
                    } else {
                        self.trdy_countdown = Some(n - 1);
                    }
                }
                self.regs[status]
            }
            r if r == Register::SelfTestResp.addr() => {
                if let Some(value) = self.selftest_script.pop_front() {
                    return value;
                }
                let value = self.regs[r as usize];
                if value == 0xAA {
                    self.regs[r as usize] = 0x55;
                }
                value
            }
            r if r == Register::Temp.addr() => {
                self.regs[status] &= !TRDY;
                self.regs[r as usize]
            }
            r if (0x10..0x16).contains(&r) => {
                self.regs[status] &= !DRDY;
                self.regs[r as usize]
            }
            r => self.regs[r as usize],
        }
    }
}

/// Simulated chip; clones share the same state
#[derive(Clone)]
pub struct SimChip {
    state: Rc<RefCell<ChipState>>,
}

#[allow(dead_code)]
impl SimChip {
    /// Chip in its power-on state at 0x0C
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(ChipState::new())),
        }
    }

    /// Answer on a different bus address
    pub fn at_address(self, address: u8) -> Self {
        self.state.borrow_mut().address = address;
        self
    }

    /// Identity the WIA register reports, also after resets
    pub fn set_identity(&self, wia: u8) {
        let mut state = self.state.borrow_mut();
        state.wia = wia;
        state.regs[Register::Wia.addr() as usize] = wia;
    }

    /// Current value of a register, without side effects
    pub fn register(&self, reg: Register) -> u8 {
        self.state.borrow().regs[reg.addr() as usize]
    }

    /// Force a register value, without side effects
    pub fn set_register(&self, reg: Register, value: u8) {
        self.state.borrow_mut().regs[reg.addr() as usize] = value;
    }

    /// Axis values the next data read returns
    pub fn set_mag_data(&self, x: i16, y: i16, z: i16) {
        let mut state = self.state.borrow_mut();
        state.regs[0x10..0x12].copy_from_slice(&x.to_le_bytes());
        state.regs[0x12..0x14].copy_from_slice(&y.to_le_bytes());
        state.regs[0x14..0x16].copy_from_slice(&z.to_le_bytes());
    }

    /// Temperature the TEMP register returns
    pub fn set_temperature(&self, celsius: i8) {
        self.set_register(Register::Temp, celsius as u8);
    }

    /// The next `n` soft resets leave SRST set
    pub fn stick_resets(&self, n: usize) {
        self.state.borrow_mut().stuck_resets = n;
    }

    /// DRDY comes up on the `n`th STATUS poll after a force trigger; `None` never
    pub fn drdy_after(&self, n: Option<usize>) {
        self.state.borrow_mut().drdy_after = n;
    }

    /// TRDY comes up on the `n`th STATUS poll after TCS; `None` never
    pub fn trdy_after(&self, n: Option<usize>) {
        self.state.borrow_mut().trdy_after = n;
    }

    /// Replace the self-test responses of the next reads
    pub fn script_selftest(&self, responses: &[u8]) {
        self.state.borrow_mut().selftest_script = responses.iter().copied().collect();
    }

    /// The next `n` transactions fail with a bus error
    pub fn fail_next(&self, n: usize) {
        self.state.borrow_mut().fail_next = n;
    }

    /// Number of SRST writes seen
    pub fn reset_attempts(&self) -> usize {
        self.state.borrow().reset_attempts
    }

    /// Number of OCL writes seen
    pub fn offset_calibrations(&self) -> usize {
        self.state.borrow().offset_calibrations
    }

    /// All accesses so far
    pub fn ops(&self) -> Vec<Op> {
        self.state.borrow().ops.clone()
    }

    /// Forget the recorded accesses
    pub fn clear_ops(&self) {
        self.state.borrow_mut().ops.clear();
    }

    /// Number of reads that started at `reg`
    pub fn reads_of(&self, reg: Register) -> usize {
        self.state
            .borrow()
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Read { reg: r, .. } if *r == reg.addr()))
            .count()
    }

    /// Number of writes that started at `reg`
    pub fn writes_to(&self, reg: Register) -> usize {
        self.state
            .borrow()
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Write { reg: r, .. } if *r == reg.addr()))
            .count()
    }
}

impl ErrorType for SimChip {
    type Error = ErrorKind;
}

impl I2c for SimChip {
    fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        if state.fail_next > 0 {
            state.fail_next -= 1;
            return Err(ErrorKind::Other);
        }
        if address != state.address {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        match operations {
            [Operation::Write(frame)] => {
                let reg = frame[0];
                let bytes = frame[1..].to_vec();
                for (i, value) in bytes.iter().enumerate() {
                    state.write_reg(reg + i as u8, *value);
                }
                state.ops.push(Op::Write { reg, bytes });
            }
            [Operation::Write(index), Operation::Read(buf)] => {
                let reg = index[0];
                for (i, byte) in buf.iter_mut().enumerate() {
                    *byte = state.read_reg(reg + i as u8);
                }
                state.ops.push(Op::Read { reg, len: buf.len() });
            }
            _ => panic!("unsupported transaction shape"),
        }
        Ok(())
    }
}
