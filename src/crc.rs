//! NovAtel ASCII log integrity
const CRC32_POLYNOMIAL: u32 = 0xEDB8_8320;

/// Single byte CRC step, 8 shift and conditional XOR iterations
fn crc32_value(value: u32) -> u32 {
    let mut crc = value;
    for _ in 0..8 {
        if crc & 1 > 0 {
            crc = (crc >> 1) ^ CRC32_POLYNOMIAL;
        } else {
            crc >>= 1;
        }
    }
    crc
}

/// Computes the CRC-32 of a block of bytes, seeded with zero
pub fn block_crc32(data: &[u8]) -> u32 {
    data.iter().fold(0, |crc, byte| {
        let lhs = (crc >> 8) & 0x00FF_FFFF;
        let rhs = crc32_value((crc ^ *byte as u32) & 0xFF);
        lhs ^ rhs
    })
}

/// Verifies a `#payload*hhhhhhhh` ASCII message.
/// Returns false on any malformed input: this never fails.
pub fn crc_ok(message: &str) -> bool {
    let Some((payload, digest)) = message.trim_end().rsplit_once('*') else {
        return false;
    };

    let payload = payload.strip_prefix('#').unwrap_or(payload);

    match u32::from_str_radix(digest, 16) {
        Ok(crc) => block_crc32(payload.as_bytes()) == crc,
        Err(_) => false,
    }
}

#[cfg(test)]
mod test {
    use super::{block_crc32, crc_ok};

    const RANGEA: &str = "#RANGEA,COM1,0,63.5,FINESTEERING,1429,226780.000,00000000,5103,1984;2,6,0,23359924.081,0.078,-122757217.106875,0.015,-3538.602,43.3,2305.000,08109c04,6,0,23359926.375,0.167,-95654966.812270,0.019,-2757.355,36.9,2298.660,01309c0b*1bba6761";

    #[test]
    fn crc32_check_value() {
        assert_eq!(block_crc32(b"123456789"), 0x2DFD_2D88);
        assert_eq!(block_crc32(b""), 0);
    }

    #[test]
    fn valid_message() {
        assert!(crc_ok(RANGEA));
        assert!(crc_ok(&RANGEA.replace("1bba6761", "1BBA6761")));
        assert!(crc_ok(&format!("{}\r\n", RANGEA)));
    }

    #[test]
    fn corrupt_message() {
        let corrupt = RANGEA.replace("23359924.081", "23359924.091");
        assert!(!crc_ok(&corrupt));

        let corrupt = RANGEA.replace("FINESTEERING", "FINESTEERINH");
        assert!(!crc_ok(&corrupt));
    }

    #[test]
    fn malformed_message() {
        let (payload, _) = RANGEA.split_once('*').unwrap();
        assert!(!crc_ok(payload));
        assert!(!crc_ok(&format!("{}*zzzzzzzz", payload)));
        assert!(!crc_ok(&format!("{}*", payload)));
        assert!(!crc_ok(""));
    }
}
