//! ID, time and slug utilities shared across the platform.

use chrono::{NaiveDate, NaiveTime};

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms, collision-free at directory scale)
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    (ts << 12) | rand_bits
}

/// Derive a URL-safe slug from a display name.
///
/// Lowercases, folds Latin diacritics, drops everything outside
/// `[a-z0-9 -]`, collapses whitespace and hyphen runs to a single hyphen
/// and trims leading/trailing hyphens. The output only ever contains
/// `[a-z0-9-]`.
///
/// Collision handling is the caller's job: callers check the result against
/// the store and reject with a conflict, there is no auto-suffix scheme.
pub fn generate_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut prev_hyphen = false;
    for c in name.to_lowercase().chars() {
        let c = fold_diacritic(c);
        let mapped = match c {
            'a'..='z' | '0'..='9' => Some(c),
            '-' => Some('-'),
            c if c.is_whitespace() => Some('-'),
            _ => None,
        };
        let Some(m) = mapped else { continue };
        if m == '-' {
            // 折叠连续连字符，且不以连字符开头
            if !prev_hyphen && !slug.is_empty() {
                slug.push('-');
                prev_hyphen = true;
            }
        } else {
            slug.push(m);
            prev_hyphen = false;
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// Fold common Latin diacritics to their ASCII base letter.
///
/// Covers the accented characters that actually occur in restaurant and
/// cuisine names (Spanish, Portuguese, French, Italian).
fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' | 'ã' | 'å' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        _ => c,
    }
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// UTC millisecond bounds of a calendar day: `[00:00:00.000, 23:59:59.999]`.
pub fn day_bounds_millis(date: NaiveDate) -> (i64, i64) {
    let start = date.and_time(NaiveTime::MIN).and_utc().timestamp_millis();
    (start, start + 86_399_999)
}

/// UTC midnight of a calendar day in epoch milliseconds.
pub fn date_to_millis(date: NaiveDate) -> i64 {
    day_bounds_millis(date).0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_basic() {
        assert_eq!(generate_slug("La Casa de Tono"), "la-casa-de-tono");
        assert_eq!(generate_slug("Sushi Zen"), "sushi-zen");
    }

    #[test]
    fn slug_folds_diacritics() {
        assert_eq!(generate_slug("Café São João"), "cafe-sao-joao");
        assert_eq!(generate_slug("Peña Ñam"), "pena-nam");
    }

    #[test]
    fn slug_strips_symbols_and_collapses() {
        assert_eq!(generate_slug("Tacos!  &  Más"), "tacos-mas");
        assert_eq!(generate_slug("--Bar -- Uno--"), "bar-uno");
        assert_eq!(generate_slug("  spaced   out  "), "spaced-out");
    }

    #[test]
    fn slug_charset_properties() {
        for name in [
            "La Trattoria",
            "Dragón Dorado #1",
            "Le Petit Bistro (Centro)",
            "雲吞面店 Wonton",
            "%%%",
        ] {
            let slug = generate_slug(name);
            assert!(
                slug.chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
                "bad char in slug {slug:?}"
            );
            assert!(!slug.starts_with('-'), "leading hyphen in {slug:?}");
            assert!(!slug.ends_with('-'), "trailing hyphen in {slug:?}");
            assert!(!slug.contains("--"), "double hyphen in {slug:?}");
        }
    }

    #[test]
    fn snowflake_fits_in_53_bits() {
        for _ in 0..100 {
            let id = snowflake_id();
            assert!(id > 0);
            assert!(id < (1 << 53));
        }
    }

    #[test]
    fn day_bounds_cover_whole_day() {
        let date = parse_date("2024-12-25").unwrap();
        let (start, end) = day_bounds_millis(date);
        assert_eq!(end - start, 86_399_999);
        assert_eq!(start % 1000, 0);
        assert_eq!(date_to_millis(date), start);
    }
}
