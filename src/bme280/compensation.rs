//! Fixed-point compensation formulas from the Bosch reference
//! implementation (datasheet 4.2.3). The shift and rounding constants
//! are reproduced bit-for-bit; downstream consumers rely on exact
//! numeric agreement with the datasheet, not approximate physics.

use super::calibration::Calibration;

/// Converts a raw temperature code to 0.01 degC, and returns the
/// `t_fine` carry that the pressure and humidity formulas consume.
/// Must run first in every acquisition cycle.
pub fn temperature(cal: &Calibration, adc_t: i32) -> (i32, i32) {
    let var1 = (((adc_t >> 3) - ((cal.dig_t1 as i32) << 1)) * (cal.dig_t2 as i32)) >> 11;
    let var2 = (((((adc_t >> 4) - (cal.dig_t1 as i32)) * ((adc_t >> 4) - (cal.dig_t1 as i32)))
        >> 12)
        * (cal.dig_t3 as i32))
        >> 14;
    let t_fine = var1 + var2;
    let t = (t_fine * 5 + 128) >> 8;
    (t, t_fine)
}

/// Converts a raw pressure code to integer Pa. The intermediate result
/// is Pa in Q24.8; the final scaling drops the fraction. Returns 0
/// instead of dividing when `var1` collapses to zero (possible with a
/// corrupt dig_P1).
pub fn pressure(cal: &Calibration, t_fine: i32, adc_p: i32) -> u32 {
    let mut var1 = (t_fine as i64) - 128000;
    let mut var2 = var1 * var1 * (cal.dig_p6 as i64);
    var2 += (var1 * (cal.dig_p5 as i64)) << 17;
    var2 += (cal.dig_p4 as i64) << 35;
    var1 = ((var1 * var1 * (cal.dig_p3 as i64)) >> 8) + ((var1 * (cal.dig_p2 as i64)) << 12);
    var1 = (((1i64 << 47) + var1) * (cal.dig_p1 as i64)) >> 33;
    if var1 == 0 {
        return 0;
    }
    let mut p = 1048576 - (adc_p as i64);
    p = (((p << 31) - var2) * 3125) / var1;
    var1 = ((cal.dig_p9 as i64) * (p >> 13) * (p >> 13)) >> 25;
    var2 = ((cal.dig_p8 as i64) * p) >> 19;
    p = ((p + var1 + var2) >> 8) + ((cal.dig_p7 as i64) << 4);
    (p / 256) as u32
}

/// Converts a raw humidity code to 1/1024 %RH. The Q22.10 intermediate
/// is clamped to [0, 419430400] (0..100 %RH) before the final shift.
pub fn humidity(cal: &Calibration, t_fine: i32, adc_h: i32) -> u32 {
    let v = t_fine - 76800;
    let mut v = (((adc_h << 14) - ((cal.dig_h4 as i32) << 20) - ((cal.dig_h5 as i32) * v)
        + 16384)
        >> 15)
        * (((((((v * (cal.dig_h6 as i32)) >> 10)
            * (((v * (cal.dig_h3 as i32)) >> 11) + 32768))
            >> 10)
            + 2097152)
            * (cal.dig_h2 as i32)
            + 8192)
            >> 14);
    v -= (((v >> 15) * (v >> 15)) >> 7) * (cal.dig_h1 as i32) >> 4;
    let v = v.clamp(0, 419430400);
    (v >> 12) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bme280::calibration::tests::datasheet_calibration;

    // Worked example from the datasheet: 25.08 degC, 100653 Pa.
    const ADC_T: i32 = 519888;
    const ADC_P: i32 = 415148;

    #[test]
    fn temperature_matches_datasheet_worked_example() {
        let cal = datasheet_calibration();
        let (t, t_fine) = temperature(&cal, ADC_T);
        assert_eq!(t, 2508);
        assert_eq!(t_fine, 128422);
    }

    #[test]
    fn pressure_matches_datasheet_worked_example() {
        let cal = datasheet_calibration();
        let (_, t_fine) = temperature(&cal, ADC_T);
        assert_eq!(pressure(&cal, t_fine, ADC_P), 100653);
    }

    #[test]
    fn pressure_returns_sentinel_instead_of_dividing_by_zero() {
        let mut cal = datasheet_calibration();
        cal.dig_p1 = 0;
        assert_eq!(pressure(&cal, 128422, ADC_P), 0);
    }

    #[test]
    fn humidity_matches_reference_values() {
        let cal = datasheet_calibration();
        assert_eq!(humidity(&cal, 128422, 32768), 71319);
        assert_eq!(humidity(&cal, 128422, 30000), 55588);
    }

    #[test]
    fn humidity_is_clamped_to_the_valid_range() {
        let cal = datasheet_calibration();
        // saturates at 100 %RH = 102400 in 1/1024 units
        assert_eq!(humidity(&cal, 128422, 0xffff), 102400);
        assert_eq!(humidity(&cal, 128422, 0), 0);
    }
}
