//! Normalizers for the board's loosely typed textual fields.
//!
//! The mobile endpoints serve nearly everything as strings: counters,
//! booleans ("Y"/"N"), member codes and half a dozen date shapes. These
//! helpers are pure functions of their input and deliberately permissive —
//! a counter that does not parse reads as zero, a date that matches no
//! known shape reads as absent. Callers must not rely on telling "zero"
//! apart from "unparsable".

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime};

use super::{ArticleKind, MemberLevel};

/// Permissive integer conversion. `"N/A"`, `""` and other non-numeric
/// input yield 0.
pub(crate) fn lenient_int(s: &str) -> i64 {
    s.trim().parse().unwrap_or(0)
}

/// The board encodes booleans as `"Y"`/`"N"`.
pub(crate) fn yn(s: &str) -> bool {
    s == "Y"
}

impl MemberLevel {
    /// Decodes the `member_icon` / `level` code.
    pub(crate) fn from_code(code: i64) -> Self {
        match code {
            1 => MemberLevel::Member,
            2 => MemberLevel::FixedMember,
            _ => MemberLevel::Guest,
        }
    }
}

/// Derives the article classification from the raw image and best flags.
pub(crate) fn article_kind(image_flag: &str, best_flag: &str) -> ArticleKind {
    match (yn(image_flag), yn(best_flag)) {
        (false, false) => ArticleKind::Plain,
        (true, false) => ArticleKind::Picture,
        (false, true) => ArticleKind::Best,
        (true, true) => ArticleKind::BestPicture,
    }
}

/// Normalizes the board's date strings against a reference "now".
///
/// Recent entries come as `"HH:MM"` (today) or `"MM.DD"` (this year),
/// older ones as `"YYYY.MM.DD"` with an optional time suffix.
pub(crate) fn normalize_date_at(s: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let s = s.trim();
    for fmt in ["%Y.%m.%d %H:%M:%S", "%Y.%m.%d %H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in ["%Y.%m.%d", "%Y-%m-%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(&format!("{}.{s}", now.year()), "%Y.%m.%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    if let Ok(t) = NaiveTime::parse_from_str(s, "%H:%M") {
        return Some(NaiveDateTime::new(now.date(), t));
    }
    None
}

pub(crate) fn normalize_date(s: &str) -> Option<NaiveDateTime> {
    normalize_date_at(s, Local::now().naive_local())
}
