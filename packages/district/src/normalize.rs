//! District name normalization.
//!
//! Source tables spell district names inconsistently ("Consolação",
//! "CONSOLACAO", "consolacao "). Every name is folded to the same form
//! before comparison: diacritics stripped, uppercased, single spaces.

/// Maps an accented Latin character to its unaccented base letter.
const fn fold_char(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        'ñ' => 'n',
        'Ñ' => 'N',
        _ => c,
    }
}

/// Normalizes a district name for comparison.
///
/// 1. Strip diacritics
/// 2. Uppercase
/// 3. Collapse whitespace and trim
#[must_use]
pub fn normalize_district_name(name: &str) -> String {
    let folded: String = name.chars().map(fold_char).collect();
    folded
        .to_uppercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
