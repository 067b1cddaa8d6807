//! Rescaling of ingredient quantities for a different number of servings.
//!
//! Only the leading quantity of an ingredient line is touched; the rest of the
//! line is reattached byte-for-byte.

use once_cell::sync::Lazy;
use regex::Regex;

/// Fractional parts within this distance of a culinary fraction snap to it.
const FRACTION_TOLERANCE: f64 = 0.06;

const CULINARY_FRACTIONS: [(f64, char); 9] = [
    (0.125, '⅛'),
    (0.25, '¼'),
    (1.0 / 3.0, '⅓'),
    (0.375, '⅜'),
    (0.5, '½'),
    (0.625, '⅝'),
    (2.0 / 3.0, '⅔'),
    (0.75, '¾'),
    (0.875, '⅞'),
];

const GLYPH_VALUES: [(char, f64); 15] = [
    ('½', 0.5),
    ('⅓', 1.0 / 3.0),
    ('⅔', 2.0 / 3.0),
    ('¼', 0.25),
    ('¾', 0.75),
    ('⅕', 0.2),
    ('⅖', 0.4),
    ('⅗', 0.6),
    ('⅘', 0.8),
    ('⅙', 1.0 / 6.0),
    ('⅚', 5.0 / 6.0),
    ('⅛', 0.125),
    ('⅜', 0.375),
    ('⅝', 0.625),
    ('⅞', 0.875),
];

static MIXED_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\s+(\d+)/(\d+)").expect("Invalid mixed number regex"));

static FRACTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)/(\d+)").expect("Invalid fraction regex"));

static DECIMAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(?:[.,]\d+)?").expect("Invalid decimal regex"));

static THOUSANDS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,3}(?:,\d{3})+").expect("Invalid thousands regex"));

static GLYPH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d*)\s?([½⅓⅔¼¾⅕⅖⅗⅘⅙⅚⅛⅜⅝⅞])").expect("Invalid glyph regex"));

static LEADING_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(?:[.,]\d+)?").expect("Invalid number regex"));

/// Multiply the leading quantity of `ingredient` by `factor`.
///
/// A factor of exactly 1 returns the input untouched, as does a line with no
/// leading quantity.
pub fn scale_ingredient(ingredient: &str, factor: f64) -> String {
    if factor == 1.0 || !factor.is_finite() || factor <= 0.0 {
        return ingredient.to_string();
    }

    let Some((value, consumed)) = leading_quantity(ingredient) else {
        return ingredient.to_string();
    };

    format!(
        "{}{}",
        format_quantity(value * factor),
        &ingredient[consumed..]
    )
}

/// Scale every ingredient of a list.
pub fn scale_ingredients(ingredients: &[String], factor: f64) -> Vec<String> {
    ingredients
        .iter()
        .map(|ingredient| scale_ingredient(ingredient, factor))
        .collect()
}

/// Derive a scale factor from a free-form servings string ("4 servings",
/// "4-6", "6 portioner") and the number of servings wanted.
///
/// The first number in the string is taken as the base.
pub fn scale_factor(base_servings: &str, desired: f64) -> Option<f64> {
    let base = LEADING_NUMBER_RE
        .find(base_servings)?
        .as_str()
        .replace(',', ".")
        .parse::<f64>()
        .ok()?;
    if base <= 0.0 || !desired.is_finite() || desired <= 0.0 {
        return None;
    }
    Some(desired / base)
}

/// Parse the leading quantity and return it with the byte length it spans.
fn leading_quantity(text: &str) -> Option<(f64, usize)> {
    if let Some(caps) = MIXED_NUMBER_RE.captures(text) {
        let whole: f64 = caps[1].parse().ok()?;
        let numerator: f64 = caps[2].parse().ok()?;
        let denominator: f64 = caps[3].parse().ok()?;
        if denominator != 0.0 {
            return Some((whole + numerator / denominator, caps[0].len()));
        }
    }

    if let Some(caps) = FRACTION_RE.captures(text) {
        let numerator: f64 = caps[1].parse().ok()?;
        let denominator: f64 = caps[2].parse().ok()?;
        if denominator != 0.0 {
            return Some((numerator / denominator, caps[0].len()));
        }
    }

    if let Some(caps) = GLYPH_RE.captures(text) {
        let whole: f64 = if caps[1].is_empty() {
            0.0
        } else {
            caps[1].parse().ok()?
        };
        let glyph = caps[2].chars().next()?;
        let fraction = GLYPH_VALUES
            .iter()
            .find(|(g, _)| *g == glyph)
            .map(|(_, v)| *v)?;
        return Some((whole + fraction, caps[0].len()));
    }

    // "1,000 g" groups thousands; "1,5 dl" is a decimal comma.
    if let Some(number) = THOUSANDS_RE.find(text) {
        let grouped = !text[number.end()..].starts_with(|c: char| c.is_ascii_digit());
        if grouped {
            let value = number.as_str().replace(',', "").parse().ok()?;
            return Some((value, number.end()));
        }
    }

    let number = DECIMAL_RE.find(text)?;
    let value = number.as_str().replace(',', ".").parse().ok()?;
    Some((value, number.end()))
}

/// Render a quantity with a culinary fraction glyph when one is close enough,
/// otherwise with one decimal place.
fn format_quantity(value: f64) -> String {
    let whole = value.trunc();
    let fraction = value - whole;

    if fraction < FRACTION_TOLERANCE && whole > 0.0 {
        return format!("{}", whole as u64);
    }
    if fraction > 1.0 - FRACTION_TOLERANCE {
        return format!("{}", whole as u64 + 1);
    }

    let nearest = CULINARY_FRACTIONS
        .iter()
        .map(|(v, glyph)| ((fraction - v).abs(), *glyph))
        .filter(|(distance, _)| *distance <= FRACTION_TOLERANCE)
        .min_by(|a, b| a.0.total_cmp(&b.0));

    match nearest {
        Some((_, glyph)) if whole == 0.0 => glyph.to_string(),
        Some((_, glyph)) => format!("{}{}", whole as u64, glyph),
        None => {
            let rendered = format!("{value:.1}");
            rendered
                .strip_suffix(".0")
                .map(str::to_string)
                .unwrap_or(rendered)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor_one_is_identity() {
        for input in ["1 1/2 cups flour", "½ tsp salt", "2,5 dl mjölk", "salt", ""] {
            assert_eq!(scale_ingredient(input, 1.0), input);
        }
    }

    #[test]
    fn test_integer_scaling_keeps_rest() {
        assert_eq!(scale_ingredient("2 cups flour", 2.0), "4 cups flour");
        assert_eq!(scale_ingredient("3 eggs", 0.5), "1½ eggs");
        assert_eq!(scale_ingredient("1 cup milk", 0.5), "½ cup milk");
        assert_eq!(scale_ingredient("200g butter", 1.5), "300g butter");
    }

    #[test]
    fn test_mixed_numbers_and_fractions() {
        assert_eq!(scale_ingredient("1 1/2 cups sugar", 2.0), "3 cups sugar");
        assert_eq!(scale_ingredient("1/2 tsp salt", 0.5), "¼ tsp salt");
        assert_eq!(scale_ingredient("3/4 cup oil", 2.0), "1½ cup oil");
        assert_eq!(scale_ingredient("1/3 cup water", 2.0), "⅔ cup water");
    }

    #[test]
    fn test_glyphs_and_comma_decimals() {
        assert_eq!(scale_ingredient("½ cup cream", 2.0), "1 cup cream");
        assert_eq!(scale_ingredient("1½ cups stock", 2.0), "3 cups stock");
        assert_eq!(scale_ingredient("1,5 dl grädde", 2.0), "3 dl grädde");
    }

    #[test]
    fn test_thousands_separator() {
        assert_eq!(scale_ingredient("1,000 g flour", 2.0), "2000 g flour");
        assert_eq!(scale_ingredient("1,250 ml water", 0.5), "625 ml water");
        assert_eq!(scale_ingredient("1,25 l water", 2.0), "2½ l water");
    }

    #[test]
    fn test_falls_back_to_one_decimal() {
        assert_eq!(scale_ingredient("1 cup rice", 1.4375), "1.4 cup rice");
        assert_eq!(scale_ingredient("4 cups rice", 0.515625), "2.1 cups rice");
    }

    #[test]
    fn test_without_leading_quantity_passes_through() {
        assert_eq!(scale_ingredient("salt to taste", 3.0), "salt to taste");
        assert_eq!(scale_ingredient("a pinch of pepper", 2.0), "a pinch of pepper");
    }

    #[test]
    fn test_scale_factor_from_servings() {
        assert_eq!(scale_factor("4 servings", 8.0), Some(2.0));
        assert_eq!(scale_factor("4-6 portioner", 2.0), Some(0.5));
        assert_eq!(scale_factor("serves many", 2.0), None);
        assert_eq!(scale_factor("0", 2.0), None);
    }
}
