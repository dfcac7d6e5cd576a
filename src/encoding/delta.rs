use crate::error::Result;
use crate::types::NativeInteger;

/// Returns the first differences of `values`; the first delta is the first value itself.
pub fn encode<T: NativeInteger>(values: &[T]) -> Vec<T> {
    let mut previous = T::default();
    values
        .iter()
        .map(|value| {
            let delta = value.wrapping_sub(previous);
            previous = *value;
            delta
        })
        .collect()
}

/// Inverse of [`encode`], in place.
#[inline]
pub fn decode<T: NativeInteger>(values: &mut [T]) {
    let mut previous = T::default();
    values.iter_mut().for_each(|value| {
        previous = previous.wrapping_add(*value);
        *value = previous;
    });
}

/// Zigzag delta encodes interleaved `x, y` pairs, each component against its own previous
/// value.
pub fn encode_componentwise(vertices: &[i32]) -> Vec<u64> {
    let mut previous = [0i32; 2];
    vertices
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let component = &mut previous[i % 2];
            let delta = value.wrapping_sub(*component);
            *component = *value;
            delta.zigzag()
        })
        .collect()
}

/// Inverse of [`encode_componentwise`].
pub fn decode_componentwise<T: NativeInteger>(values: &[u64]) -> Result<Vec<T>> {
    if values.len() % 2 != 0 {
        return Err(oos!(
            "A component-wise delta stream must hold pairs but has {} values",
            values.len()
        ));
    }
    let mut previous = [T::default(); 2];
    Ok(values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let component = &mut previous[i % 2];
            *component = component.wrapping_add(T::from_zigzag(*value));
            *component
        })
        .collect())
}
