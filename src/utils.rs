pub(crate) fn abs_diff_i16(a: i16, b: i16) -> u16 {
    (i32::from(a) - i32::from(b)).unsigned_abs() as u16
}

pub(crate) fn squared_distance(ax: i16, ay: i16, bx: i16, by: i16) -> u64 {
    let dx = i64::from(ax) - i64::from(bx);
    let dy = i64::from(ay) - i64::from(by);
    (dx * dx + dy * dy) as u64
}

pub(crate) fn int_sqrt_u128(value: u128) -> u64 {
    if value == 0 {
        return 0;
    }
    let mut lo = 0u128;
    let mut hi = 1u128 << 64;
    while lo + 1 < hi {
        let mid = lo + (hi - lo) / 2;
        if mid * mid <= value {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    lo as u64
}
