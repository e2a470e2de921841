//! Syllable-based names for stars, planets and species.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

const ONSETS: &[&str] = &[
    "K", "V", "T", "Dr", "S", "Ael", "Or", "Z", "M", "Qu", "Th", "L", "R", "N", "Gh",
];
const VOWELS: &[&str] = &["a", "e", "i", "o", "u", "ae", "io", "ou"];
const CODAS: &[&str] = &["n", "r", "s", "x", "th", "l", "m", "", "", ""];

const NUMERALS: &[&str] = &[
    "I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X", "XI", "XII",
];

fn pick<'a>(rng: &mut ChaCha8Rng, options: &[&'a str]) -> &'a str {
    options[rng.gen_range(0..options.len())]
}

/// A capitalized name of two or three syllables.
pub fn proper_name(rng: &mut ChaCha8Rng) -> String {
    let syllables = rng.gen_range(2..=3);
    let mut name = String::new();
    for i in 0..syllables {
        let onset = pick(rng, ONSETS);
        if i == 0 {
            name.push_str(onset);
        } else {
            name.push_str(&onset.to_lowercase());
        }
        name.push_str(pick(rng, VOWELS));
    }
    name.push_str(pick(rng, CODAS));
    name
}

/// `"<star> <numeral>"`, numbered from the innermost planet outward.
pub fn planet_name(star: &str, index: usize) -> String {
    match NUMERALS.get(index) {
        Some(numeral) => format!("{star} {numeral}"),
        None => format!("{star} {}", index + 1),
    }
}

/// Name of an alien species.
pub fn species_name(rng: &mut ChaCha8Rng) -> String {
    let root = proper_name(rng);
    let suffix = match rng.gen_range(0..3) {
        0 => "ans",
        1 => "i",
        _ => "ites",
    };
    format!("{root}{suffix}")
}
