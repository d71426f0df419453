use crate::error::Result;
use crate::value_objects::sqrt_price::SqrtPriceX96;
use crate::value_objects::tick::{MAX_TICK, MIN_TICK, Tick};
use primitive_types::U256;

/// `2^128 / sqrt(1.0001)^(2^i)` in Q128.128 for bits 1..=19 of `|tick|`.
const BIT_FACTORS: [u128; 19] = [
    0xfff97272373d413259a46990580e213a,
    0xfff2e50f5f656932ef12357cf3c7fdcc,
    0xffe5caca7e10e4e61c3624eaa0941cd0,
    0xffcb9843d60f6159c9db58835c926644,
    0xff973b41fa98c081472e6896dfb254c0,
    0xff2ea16466c96a3843ec78b326b52861,
    0xfe5dee046a99a2a811c461f1969c3053,
    0xfcbe86c7900a88aedcffc83b479aa3a4,
    0xf987a7253ac413176f2b074cf7815e54,
    0xf3392b0822b70005940c7a398e4b70f3,
    0xe7159475a2c29b7443b29c7fa6e889d9,
    0xd097f3bdfd2022b8845ad8f792aa5825,
    0xa9f746462d870fdf8a65dc1f90e061e5,
    0x70d869a156d2a1b890bb3df62baf32f7,
    0x31be135f97d08fd981231505542fcfa6,
    0x9aa508b5b7a84e1c677de54f3e99bc9,
    0x5d6af8dedb81196699c329225ee604,
    0x2216e584f5fa1ea926041bedfe98,
    0x48a170391f7dc42444e8fa2,
];

/// Factor for bit 0 of `|tick|`.
const BIT_ZERO_FACTOR: u128 = 0xfffcb933bd6fad37aa2d162d1a594001;

/// Returns `sqrt(1.0001^tick) * 2^96`, rounded up, as the canonical
/// bit-decomposition.
///
/// Fails with `Range` for ticks outside `[MIN_TICK, MAX_TICK]`.
pub fn sqrt_price_at_tick(tick: i32) -> Result<SqrtPriceX96> {
    Ok(Tick::new(tick)?.sqrt_price())
}

/// Returns the greatest tick whose sqrt-price is `<=` `sqrt_price_x96`.
///
/// Fails with `Range` for inputs outside `[MIN_SQRT_RATIO, MAX_SQRT_RATIO]`.
pub fn tick_at_sqrt_price(sqrt_price_x96: U256) -> Result<Tick> {
    Ok(SqrtPriceX96::new(sqrt_price_x96)?.tick())
}

/// Caller guarantees `tick` is inside the tick domain.
pub(crate) fn ratio_at_tick(tick: i32) -> U256 {
    let abs_tick = tick.unsigned_abs();

    let mut ratio = if abs_tick & 1 != 0 {
        U256::from(BIT_ZERO_FACTOR)
    } else {
        U256::one() << 128usize
    };
    for (bit, factor) in BIT_FACTORS.iter().enumerate() {
        if abs_tick & (1u32 << (bit + 1)) != 0 {
            ratio = (ratio * U256::from(*factor)) >> 128usize;
        }
    }

    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    // Q128.128 -> Q64.96, rounding up so the result is never below the exact value.
    let remainder = ratio & U256::from(u32::MAX);
    let ratio = ratio >> 32usize;
    if remainder.is_zero() {
        ratio
    } else {
        ratio + U256::one()
    }
}

/// Caller guarantees `sqrt_price` is inside `[MIN_SQRT_RATIO, MAX_SQRT_RATIO]`.
pub(crate) fn tick_at_ratio(sqrt_price: U256) -> i32 {
    let (mut low, mut high) = (MIN_TICK, MAX_TICK);
    while low < high {
        let mid = low + (high - low + 1) / 2;
        if ratio_at_tick(mid) <= sqrt_price {
            low = mid;
        } else {
            high = mid - 1;
        }
    }
    low
}
