use crc::{Algorithm, Crc};

/// CRC-8 used by the AHT2x family over the first six frame bytes.
///
/// Polynomial x^8 + x^5 + x^4 + 1 (0x31), initial value 0xFF, MSB first,
/// no reflection and no final XOR.
pub const CRC_8_AHT: Algorithm<u8> = Algorithm {
    width: 8,
    poly: 0x31,
    init: 0xFF,
    refin: false,
    refout: false,
    xorout: 0x00,
    check: 0xF7,
    residue: 0x00,
};

const CRC_COMPUTER: Crc<u8> = Crc::<u8>::new(&CRC_8_AHT);

/// Calculates the CRC-8 of `data`.
#[inline]
pub fn crc8(data: &[u8]) -> u8 {
    CRC_COMPUTER.checksum(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_value() {
        assert_eq!(crc8(b"123456789"), 0xF7);
    }

    #[test]
    fn test_aht20_capture() {
        // status, humidity, humidity, humidity/temperature, temperature, temperature
        let data = [0x1C, 0x65, 0xB4, 0x25, 0xCD, 0x26];
        assert_eq!(crc8(&data), 0xC6);
    }

    #[test]
    fn test_empty_is_init() {
        assert_eq!(crc8(&[]), 0xFF);
    }
}
