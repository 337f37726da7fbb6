//! Factory calibration coefficients.
//!
//! Read once at start-up from the device's non-volatile memory and
//! immutable afterwards. Both compensation inputs come from here.

/// The trimming parameters, decoded per the datasheet memory map
/// (little-endian 16-bit words, dig_H4/dig_H5 nibble-packed across
/// 0xe4..0xe6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calibration {
    pub(crate) dig_t1: u16,
    pub(crate) dig_t2: i16,
    pub(crate) dig_t3: i16,
    pub(crate) dig_p1: u16,
    pub(crate) dig_p2: i16,
    pub(crate) dig_p3: i16,
    pub(crate) dig_p4: i16,
    pub(crate) dig_p5: i16,
    pub(crate) dig_p6: i16,
    pub(crate) dig_p7: i16,
    pub(crate) dig_p8: i16,
    pub(crate) dig_p9: i16,
    pub(crate) dig_h1: u8,
    pub(crate) dig_h2: i16,
    pub(crate) dig_h3: u8,
    pub(crate) dig_h4: i16,
    pub(crate) dig_h5: i16,
    pub(crate) dig_h6: i8,
}

impl Calibration {
    /// Decodes the two calibration bursts: 26 bytes from 0x88 (which
    /// covers dig_T1..dig_P9, a reserved byte at 0xa0 and dig_H1 at
    /// 0xa1) and 7 bytes from 0xe1 (dig_H2..dig_H6).
    pub(crate) fn from_registers(tp: &[u8; 26], h: &[u8; 7]) -> Self {
        Self {
            dig_t1: u16::from_le_bytes([tp[0], tp[1]]),
            dig_t2: i16::from_le_bytes([tp[2], tp[3]]),
            dig_t3: i16::from_le_bytes([tp[4], tp[5]]),
            dig_p1: u16::from_le_bytes([tp[6], tp[7]]),
            dig_p2: i16::from_le_bytes([tp[8], tp[9]]),
            dig_p3: i16::from_le_bytes([tp[10], tp[11]]),
            dig_p4: i16::from_le_bytes([tp[12], tp[13]]),
            dig_p5: i16::from_le_bytes([tp[14], tp[15]]),
            dig_p6: i16::from_le_bytes([tp[16], tp[17]]),
            dig_p7: i16::from_le_bytes([tp[18], tp[19]]),
            dig_p8: i16::from_le_bytes([tp[20], tp[21]]),
            dig_p9: i16::from_le_bytes([tp[22], tp[23]]),
            // tp[24] is the reserved register 0xa0
            dig_h1: tp[25],
            dig_h2: i16::from_le_bytes([h[0], h[1]]),
            dig_h3: h[2],
            // dig_H4 is 0xe4[7:0] << 4 | 0xe5[3:0],
            // dig_H5 is 0xe6[7:0] << 4 | 0xe5[7:4]
            dig_h4: (h[3] as i16) << 4 | (h[4] as i16) & 0x0f,
            dig_h5: (h[5] as i16) << 4 | (h[4] as i16) >> 4,
            dig_h6: h[6] as i8,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    // The worked-example trimming set from the datasheet, as it sits in
    // the registers.
    pub(crate) const TP_REGISTERS: [u8; 26] = [
        0x70, 0x6b, // dig_T1 = 27504
        0x43, 0x67, // dig_T2 = 26435
        0x18, 0xfc, // dig_T3 = -1000
        0x7d, 0x8e, // dig_P1 = 36477
        0x43, 0xd6, // dig_P2 = -10685
        0xd0, 0x0b, // dig_P3 = 3024
        0x27, 0x0b, // dig_P4 = 2855
        0x8c, 0x00, // dig_P5 = 140
        0xf9, 0xff, // dig_P6 = -7
        0x8c, 0x3c, // dig_P7 = 15500
        0xf8, 0xc6, // dig_P8 = -14600
        0x70, 0x17, // dig_P9 = 6000
        0x00, // reserved (0xa0)
        0x4b, // dig_H1 = 75
    ];
    pub(crate) const H_REGISTERS: [u8; 7] = [
        0x6a, 0x01, // dig_H2 = 362
        0x00, // dig_H3 = 0
        0x13, 0x2b, 0x03, // dig_H4 = 315, dig_H5 = 50 (nibble-packed)
        0x1e, // dig_H6 = 30
    ];

    pub(crate) fn datasheet_calibration() -> Calibration {
        Calibration::from_registers(&TP_REGISTERS, &H_REGISTERS)
    }

    #[test]
    fn decodes_temperature_and_pressure_words() {
        let cal = datasheet_calibration();
        assert_eq!(cal.dig_t1, 27504);
        assert_eq!(cal.dig_t2, 26435);
        assert_eq!(cal.dig_t3, -1000);
        assert_eq!(cal.dig_p1, 36477);
        assert_eq!(cal.dig_p2, -10685);
        assert_eq!(cal.dig_p3, 3024);
        assert_eq!(cal.dig_p4, 2855);
        assert_eq!(cal.dig_p5, 140);
        assert_eq!(cal.dig_p6, -7);
        assert_eq!(cal.dig_p7, 15500);
        assert_eq!(cal.dig_p8, -14600);
        assert_eq!(cal.dig_p9, 6000);
    }

    #[test]
    fn decodes_humidity_coefficients_including_nibble_split() {
        let cal = datasheet_calibration();
        assert_eq!(cal.dig_h1, 75);
        assert_eq!(cal.dig_h2, 362);
        assert_eq!(cal.dig_h3, 0);
        assert_eq!(cal.dig_h4, 315);
        assert_eq!(cal.dig_h5, 50);
        assert_eq!(cal.dig_h6, 30);
    }

    #[test]
    fn shared_middle_byte_feeds_both_h4_and_h5() {
        let mut h = H_REGISTERS;
        // 0xe5 low nibble belongs to dig_H4, high nibble to dig_H5
        h[4] = 0x5a;
        let cal = Calibration::from_registers(&TP_REGISTERS, &h);
        assert_eq!(cal.dig_h4, (0x13 << 4) | 0x0a);
        assert_eq!(cal.dig_h5, (0x03 << 4) | 0x05);
    }
}
