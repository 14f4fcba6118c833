/// Resolves an individual's generation.
///
/// An explicit positive generation wins. Otherwise the part of the id before
/// the first `-` is read as a Roman numeral (`"III-2"` is generation 3).
/// Anything else lands in generation 1.
pub fn resolve_generation(explicit: Option<i64>, id: &str) -> u32 {
    if let Some(generation) = explicit.filter(|g| *g > 0) {
        return generation.min(i64::from(u32::MAX)) as u32;
    }
    id.split_once('-')
        .and_then(|(prefix, _)| roman_to_int(prefix))
        .unwrap_or(1)
}

/// Decodes a Roman numeral, case-insensitively. Returns `None` for empty
/// input, unknown symbols or a non-positive total.
pub fn roman_to_int(numeral: &str) -> Option<u32> {
    let numeral = numeral.trim();
    if numeral.is_empty() {
        return None;
    }
    let mut total: i64 = 0;
    let mut prev: i64 = 0;
    for ch in numeral.chars().rev() {
        let value = roman_value(ch.to_ascii_uppercase())?;
        if value < prev {
            total -= value;
        } else {
            total += value;
            prev = value;
        }
    }
    if total > 0 {
        u32::try_from(total).ok()
    } else {
        None
    }
}

fn roman_value(ch: char) -> Option<i64> {
    match ch {
        'I' => Some(1),
        'V' => Some(5),
        'X' => Some(10),
        'L' => Some(50),
        'C' => Some(100),
        'D' => Some(500),
        'M' => Some(1000),
        _ => None,
    }
}

const ROMAN_TABLE: [(u32, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

pub fn int_to_roman(mut value: u32) -> String {
    let mut out = String::new();
    for (step, symbol) in ROMAN_TABLE {
        while value >= step {
            out.push_str(symbol);
            value -= step;
        }
    }
    out
}
