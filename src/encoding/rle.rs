//! Run-length encoding of integer sequences.
//!
//! Runs are laid out as all run lengths followed by all run values:
//! `[len_0, ..., len_{n-1}, value_0, ..., value_{n-1}]`.
use crate::error::Result;

/// Returns the number of maximal runs of equal consecutive values.
pub fn count_runs<T: PartialEq>(values: &[T]) -> usize {
    match values.first() {
        None => 0,
        Some(_) => 1 + values.windows(2).filter(|w| w[0] != w[1]).count(),
    }
}

/// Splits `values` into run lengths and run values.
pub fn encode<T: PartialEq + Copy>(values: &[T]) -> (Vec<u64>, Vec<T>) {
    let mut lengths = vec![];
    let mut run_values: Vec<T> = vec![];
    for value in values {
        match run_values.last() {
            Some(last) if last == value => {
                // a run is open whenever a value has been pushed
                if let Some(length) = lengths.last_mut() {
                    *length += 1;
                }
            }
            _ => {
                run_values.push(*value);
                lengths.push(1);
            }
        }
    }
    (lengths, run_values)
}

/// Expands `runs` run pairs of `data` into `num_values` values, mapping each run value
/// through `op`.
pub fn decode<T: Copy, F: Fn(u64) -> T>(
    data: &[u64],
    runs: usize,
    num_values: usize,
    op: F,
) -> Result<Vec<T>> {
    if data.len() != runs * 2 {
        return Err(oos!(
            "A run-length stream with {} runs must hold {} values but holds {}",
            runs,
            runs * 2,
            data.len()
        ));
    }
    let (lengths, run_values) = data.split_at(runs);

    // the declared count is only trusted once the runs add up to it
    let total = lengths
        .iter()
        .try_fold(0usize, |total, length| total.checked_add(*length as usize));
    if total != Some(num_values) {
        return Err(oos!(
            "A run-length stream declares {} values but its runs sum to {:?}",
            num_values,
            total
        ));
    }

    let mut result = Vec::with_capacity(num_values);
    for (length, value) in lengths.iter().zip(run_values) {
        result.extend(std::iter::repeat(op(*value)).take(*length as usize));
    }
    Ok(result)
}
