//! Common types used in the protocol.

use crate::constants::*;
use crate::error::ProtocolError;

/// Address width of the module revision.
///
/// Older module revisions mask addresses to 10 bits (0..=1023); newer ones
/// use 11 bits with the top value reserved as the broadcast address. The
/// width decides both the validation bound and the mask applied to the high
/// address byte on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressWidth {
    /// 10-bit addresses, 0..=1023.
    #[default]
    Bits10,
    /// 11-bit addresses, 0..=2047, with 2047 reserved for broadcast.
    Bits11,
}

impl AddressWidth {
    /// Largest address representable at this width.
    pub fn max_address(self) -> u16 {
        match self {
            AddressWidth::Bits10 => 0x03FF,
            AddressWidth::Bits11 => 0x07FF,
        }
    }

    /// Mask applied to a 16-bit address on the wire.
    pub fn mask(self) -> u16 {
        self.max_address()
    }

    /// The broadcast address, where the revision defines one.
    pub fn broadcast(self) -> Option<u16> {
        match self {
            AddressWidth::Bits10 => None,
            AddressWidth::Bits11 => Some(0x07FF),
        }
    }
}

/// Wire-format parameters of a module revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Revision {
    /// Address width used for validation and masking.
    pub address_width: AddressWidth,
    /// Exclusive upper bound on payload length.
    pub max_payload: usize,
}

impl Default for Revision {
    fn default() -> Self {
        Revision {
            address_width: AddressWidth::default(),
            max_payload: DEFAULT_MAX_PAYLOAD,
        }
    }
}

/// Energy economy class of the module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PowerClass {
    /// Deep sleep between receive windows.
    A = 0,
    /// Undocumented intermediate class.
    B = 1,
    /// Always-on operation.
    C = 2,
}

/// Receive window kept open before deep sleep. Only meaningful in class A.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RxWindow {
    /// 5 second window.
    Seconds5 = 0,
    /// 10 second window.
    Seconds10 = 1,
    /// 15 second window.
    Seconds15 = 2,
}

/// LoRa channel bandwidth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Bandwidth {
    /// 125 kHz.
    Khz125 = 0,
    /// 250 kHz.
    Khz250 = 1,
    /// 500 kHz.
    Khz500 = 2,
}

/// LoRa coding rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CodingRate {
    /// 4/5.
    Cr4_5 = 1,
    /// 4/6.
    Cr4_6 = 2,
    /// 4/7.
    Cr4_7 = 3,
    /// 4/8.
    Cr4_8 = 4,
}

/// LoRa radio parameters carried by [`CMD_LORA_PARAMETER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadioParams {
    /// Transmit power setting.
    pub power: u8,
    /// Channel bandwidth.
    pub bandwidth: Bandwidth,
    /// Spreading factor, 7..=12.
    pub spreading_factor: u8,
    /// Coding rate.
    pub coding_rate: CodingRate,
}

impl RadioParams {
    /// Validate the spreading factor bound the module enforces.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        if !(7..=12).contains(&self.spreading_factor) {
            return Err(ProtocolError::InvalidRadioParams(format!(
                "spreading factor must be 7..=12, got {}",
                self.spreading_factor
            )));
        }
        Ok(())
    }

    /// Encode as the 4 parameter bytes the module expects, in wire order.
    pub fn to_bytes(&self) -> [u8; 4] {
        [
            self.power,
            self.bandwidth as u8,
            self.spreading_factor,
            self.coding_rate as u8,
        ]
    }
}

/// GPIO pin on the module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GpioPin {
    Gpio0 = 0,
    Gpio1 = 1,
    Gpio2 = 2,
    Gpio3 = 3,
    Gpio4 = 4,
    Gpio5 = 5,
    Gpio6 = 6,
    Gpio7 = 7,
}

/// GPIO pin mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GpioMode {
    /// Digital input.
    DigitalIn = 0,
    /// Digital output.
    DigitalOut = 1,
    /// Analog input.
    AnalogIn = 3,
}

/// GPIO pull resistor configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GpioPull {
    /// No pull resistor.
    Off = 0,
    /// Pull-up.
    Up = 1,
    /// Pull-down.
    Down = 2,
}
