use super::{MAX_LITERALS, MAX_RUN, MIN_RUN};

fn flush_literals(literals: &[u8], buffer: &mut Vec<u8>) {
    literals.chunks(MAX_LITERALS).for_each(|chunk| {
        buffer.push((256 - chunk.len()) as u8);
        buffer.extend_from_slice(chunk);
    })
}

/// Encodes `values` into `buffer`.
pub fn encode(values: &[u8], buffer: &mut Vec<u8>) {
    let mut literal_start = 0;
    let mut i = 0;
    while i < values.len() {
        let run = values[i..]
            .iter()
            .take(MAX_RUN)
            .take_while(|value| **value == values[i])
            .count();
        if run >= MIN_RUN {
            flush_literals(&values[literal_start..i], buffer);
            buffer.push((run - MIN_RUN) as u8);
            buffer.push(values[i]);
            i += run;
            literal_start = i;
        } else {
            i += 1;
        }
    }
    flush_literals(&values[literal_start..], buffer);
}
