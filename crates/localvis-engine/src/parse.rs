//! Low-level parsing of copy-pasted listing text.
//!
//! Listing attributes arrive as whatever the user copied from the directory
//! page: `"230 reseñas"`, `"1.234 reviews"`, `"hace 2 semanas"`. These helpers
//! scan the text by hand and return `None` when nothing usable is found;
//! [`crate::normalize`] decides whether that is an error.

/// Extracts the first decimal number in `text`, accepting `.` or `,` as the
/// decimal separator (`"4,5"` and `"4.5 estrellas"` both yield `4.5`).
///
/// A `-` directly before the digits makes the value negative so callers can
/// reject it instead of silently dropping the sign.
#[must_use]
pub(crate) fn parse_decimal(text: &str) -> Option<f64> {
    let chars: Vec<char> = text.chars().collect();
    let start = chars.iter().position(char::is_ascii_digit)?;
    let negative = start > 0 && chars[start - 1] == '-';

    let mut number = String::new();
    let mut i = start;
    while i < chars.len() && chars[i].is_ascii_digit() {
        number.push(chars[i]);
        i += 1;
    }
    if i + 1 < chars.len() && matches!(chars[i], '.' | ',') && chars[i + 1].is_ascii_digit() {
        number.push('.');
        i += 1;
        while i < chars.len() && chars[i].is_ascii_digit() {
            number.push(chars[i]);
            i += 1;
        }
    }

    let value: f64 = number.parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Extracts a count such as a review or photo total.
///
/// Handles thousands separators (`"1.234"`, `"1,234"`, `"1 234"`), trailing
/// words (`"230 reseñas"`) and `k` / `mil` multipliers (`"1,2 mil"`, `"3.4k"`).
/// The result is not clamped.
#[must_use]
pub(crate) fn parse_count(text: &str) -> Option<f64> {
    let lower = text.to_lowercase();
    let chars: Vec<char> = lower.chars().collect();
    let start = chars.iter().position(char::is_ascii_digit)?;

    let mut whole = String::new();
    let mut fraction = String::new();
    let mut i = start;

    while i < chars.len() {
        let c = chars[i];
        if c.is_ascii_digit() {
            whole.push(c);
            i += 1;
        } else if is_group_separator(c) && is_thousands_group(&chars, i + 1) {
            i += 1;
        } else if matches!(c, '.' | ',') && chars.get(i + 1).is_some_and(char::is_ascii_digit) {
            i += 1;
            while i < chars.len() && chars[i].is_ascii_digit() {
                fraction.push(chars[i]);
                i += 1;
            }
            break;
        } else {
            break;
        }
    }

    let multiplier = count_multiplier(&chars[i..]);
    let literal = if fraction.is_empty() {
        whole
    } else {
        format!("{whole}.{fraction}")
    };
    let value: f64 = literal.parse().ok()?;

    // A fraction only means something alongside a multiplier ("1,2 mil").
    let value = if multiplier > 1.0 {
        value * multiplier
    } else {
        value.trunc()
    };
    Some(value)
}

fn is_group_separator(c: char) -> bool {
    matches!(c, '.' | ',' | ' ' | '\u{a0}' | '\u{202f}' | '\'')
}

/// True when exactly three digits start at `from` and no fourth digit follows.
fn is_thousands_group(chars: &[char], from: usize) -> bool {
    let group = chars.get(from..from + 3);
    group.is_some_and(|g| g.iter().all(char::is_ascii_digit))
        && !chars.get(from + 3).is_some_and(char::is_ascii_digit)
}

fn count_multiplier(rest: &[char]) -> f64 {
    let tail: String = rest.iter().collect();
    let tail = tail.trim_start();
    let word: String = tail.chars().take_while(|c| c.is_alphabetic()).collect();
    match word.as_str() {
        "k" | "mil" => 1_000.0,
        _ => 1.0,
    }
}

/// Splits text into lower-cased alphanumeric tokens, also breaking between
/// digits and letters so `"14d"` becomes `["14", "d"]`.
fn tokens(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut current_is_digit = false;

    for c in text.to_lowercase().chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            continue;
        }
        let is_digit = c.is_ascii_digit();
        if !current.is_empty() && is_digit != current_is_digit {
            out.push(std::mem::take(&mut current));
        }
        current_is_digit = is_digit;
        current.push(c);
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn quantity(token: &str) -> Option<u64> {
    match token {
        "un" | "una" | "uno" | "a" | "an" | "one" => Some(1),
        "dos" | "two" => Some(2),
        "tres" | "three" => Some(3),
        _ => token.parse().ok(),
    }
}

/// Days per unit, or `None` if `token` is not a time unit.
fn unit_days(token: &str) -> Option<u64> {
    match token {
        "d" | "dia" | "día" | "dias" | "días" | "day" | "days" => Some(1),
        "sem" | "semana" | "semanas" | "w" | "wk" | "week" | "weeks" => Some(7),
        "mes" | "meses" | "month" | "months" => Some(30),
        "año" | "años" | "ano" | "anos" | "y" | "yr" | "year" | "years" => Some(365),
        "h" | "hora" | "horas" | "hour" | "hours" | "min" | "minuto" | "minutos" | "minute"
        | "minutes" | "segundo" | "segundos" | "second" | "seconds" => Some(0),
        _ => None,
    }
}

/// Parses a relative-time phrase into a day count.
///
/// Understands Spanish and English forms: `"hoy"`, `"ayer"`, `"hace 2 semanas"`,
/// `"540 días"`, `"hace un mes"`, `"3 weeks ago"`, `"a year ago"`, or a bare
/// number of days. Months count as 30 days and years as 365.
#[must_use]
pub(crate) fn parse_relative_days(text: &str) -> Option<u64> {
    let tokens = tokens(text);

    for token in &tokens {
        match token.as_str() {
            "hoy" | "today" | "ahora" | "now" => return Some(0),
            "ayer" | "yesterday" => return Some(1),
            "anteayer" => return Some(2),
            _ => {}
        }
    }

    for pair in tokens.windows(2) {
        if let (Some(n), Some(days)) = (quantity(&pair[0]), unit_days(&pair[1])) {
            return Some(n.saturating_mul(days));
        }
    }

    match tokens.as_slice() {
        [only] => only.parse().ok(),
        _ => None,
    }
}

/// Phrases shown on listings nobody has claimed yet. Checked before the
/// positive phrases because several of them contain a positive phrase.
const UNCLAIMED_PHRASES: &[&str] = &[
    "reclamar este negocio",
    "reclama este negocio",
    "eres el propietario",
    "es el propietario de este negocio",
    "sin reclamar",
    "no reclamado",
    "no verificado",
    "own this business",
    "claim this business",
    "unclaimed",
    "not claimed",
    "unverified",
    "not verified",
];

const CLAIMED_PHRASES: &[&str] = &[
    "propietario verificado",
    "perfil verificado",
    "negocio verificado",
    "verificado",
    "reclamado",
    "administrado por el propietario",
    "claimed",
    "verified",
    "managed by this business",
    "managed by the owner",
];

/// Interprets free text describing the claim state of a listing.
///
/// Empty or unrecognised text is reported as not claimed, the higher-risk
/// assumption.
#[must_use]
pub(crate) fn detect_claim(text: &str) -> bool {
    let normalized = text
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if UNCLAIMED_PHRASES.iter().any(|p| normalized.contains(p)) {
        return false;
    }
    CLAIMED_PHRASES.iter().any(|p| normalized.contains(p))
}

/// Parses a yes/no answer in Spanish or English.
#[must_use]
pub(crate) fn parse_yes_no(text: &str) -> Option<bool> {
    match text.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "si" | "sí" | "1" | "x" | "verdadero" => Some(true),
        "false" | "no" | "n" | "0" | "falso" | "ninguno" | "ninguna" | "none" => Some(false),
        _ => None,
    }
}

/// Whether `text` looks like a web address (`"pizzeria.com.ar"`, `"https://…"`).
#[must_use]
pub(crate) fn looks_like_url(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.contains(char::is_whitespace) {
        return false;
    }
    let lower = trimmed.to_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("www.")
    {
        return true;
    }
    // bare domain: at least one dot with text on both sides
    lower
        .split_once('.')
        .is_some_and(|(host, tld)| !host.is_empty() && tld.len() >= 2)
}

/// Distinct secondary category names in a delimited list.
///
/// Entries are split on `,` `;` `|` and newlines, trimmed, de-duplicated
/// case-insensitively, and any entry equal to `primary` is dropped.
#[must_use]
pub(crate) fn secondary_categories<'a>(list: &'a str, primary: Option<&str>) -> Vec<&'a str> {
    let primary = primary.map(str::to_lowercase);
    let mut seen: Vec<String> = Vec::new();
    let mut out = Vec::new();

    for entry in list.split([',', ';', '|', '\n']) {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let key = entry.to_lowercase();
        if primary.as_deref() == Some(key.as_str()) || seen.contains(&key) {
            continue;
        }
        seen.push(key);
        out.push(entry);
    }
    out
}

/// Phrases meaning "this listing has no reviews at all".
#[must_use]
pub(crate) fn means_no_reviews(text: &str) -> bool {
    let lower = text.trim().to_lowercase();
    matches!(
        lower.as_str(),
        "sin reseñas" | "sin opiniones" | "ninguna reseña" | "no reviews" | "no reviews yet" | "none"
    )
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
