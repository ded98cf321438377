//! A1-style cell names

/// Convert a 0-based column index to letters (0 = A, 25 = Z, 26 = AA)
pub fn column_to_letters(col: u32) -> String {
    let mut result = String::new();
    let mut n = col as u64 + 1;

    while n > 0 {
        n -= 1;
        let c = ((n % 26) as u8 + b'A') as char;
        result.insert(0, c);
        n /= 26;
    }

    result
}

/// Convert column letters to a 0-based index (A = 0, Z = 25, AA = 26)
pub fn letters_to_column(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }

    let mut col: u64 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        col = col * 26 + (c.to_ascii_uppercase() as u64 - 'A' as u64 + 1);
        if col > u32::MAX as u64 {
            return None;
        }
    }

    Some((col - 1) as u32)
}

/// `A1`-style name of a 0-based (row, col) pair
pub fn cell_name(row: u32, col: u32) -> String {
    format!("{}{}", column_to_letters(col), row as u64 + 1)
}

/// Parse `A1`, `$A$1`, `a1` into a 0-based (row, col) pair
pub fn parse_cell_name(s: &str) -> Option<(u32, u32)> {
    let s = s.strip_prefix('$').unwrap_or(s);
    let split = s.find(|c: char| !c.is_ascii_alphabetic())?;
    let (letters, rest) = s.split_at(split);
    let digits = rest.strip_prefix('$').unwrap_or(rest);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let col = letters_to_column(letters)?;
    let row: u32 = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((row - 1, col))
}
