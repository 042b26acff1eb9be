//! Natural-language date parsing.
//!
//! Turns phrases like "tomorrow", "in 3 days", "next Friday", or "March 15"
//! into instants. Matchers run in a fixed order and the first hit wins. Every
//! matcher except ISO-8601 lands on the last millisecond of the local day.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Utc, Weekday};
use regex::{Captures, Regex};
use serde::Serialize;
use stride_core::calendar::{end_of_day, last_day_of_month, local_date, local_instant, start_of_day};
use tracing::debug;

static RE_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(today|tonight|tomorrow|yesterday)\b").expect("keyword regex")
});

static RE_NEXT_WEEK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bnext\s+week\b").expect("next-week regex"));

static RE_OFFSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\bin\s+(\d{1,3}|a|an|one|two|three|four|five|six|seven|eight|nine|ten)\s+(days?|weeks?)\b",
    )
    .expect("offset regex")
});

static RE_WEEKDAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:(next|this|by|on)\s+)?(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b",
    )
    .expect("weekday regex")
});

const MONTHS: &str = r"(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";

static RE_MONTH_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b{MONTHS}\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?\b")).expect("month-day regex")
});

static RE_DAY_MONTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b(\d{{1,2}})(?:st|nd|rd|th)?\s+(?:of\s+)?{MONTHS}\b"))
        .expect("day-month regex")
});

static RE_END_OF_WEEK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bend\s+of\s+(?:the\s+)?week\b").expect("end-of-week regex")
});

static RE_END_OF_MONTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bend\s+of\s+(?:the\s+)?month\b").expect("end-of-month regex")
});

static RE_ISO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b\d{4}-\d{2}-\d{2}(?:[t ]\d{2}:\d{2}(?::\d{2}(?:\.\d+)?)?(?:z|[+-]\d{2}:\d{2})?)?",
    )
    .expect("iso regex")
});

static RE_TRIGGER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\b(?:by|due|before|until)\b|\bdeadline\s*:)").expect("trigger regex")
});

/// Ends a deadline clause. A period only counts when a word follows, so
/// "mar. 3" and fractional seconds stay inside the clause.
static RE_CLAUSE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;]|\.(?:\s*$|\s+[^\d\s])").expect("clause-break regex"));

/// A matcher returns the byte offset where its expression starts, plus the date.
type Matcher = fn(&str, NaiveDate) -> Option<(usize, ParsedDate)>;

const MATCHERS: [Matcher; 8] = [
    next_week,
    keyword,
    relative_offset,
    weekday,
    month_day,
    end_of_week,
    end_of_month,
    iso,
];

/// Which matcher recognised the date. Each carries a fixed confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateMatcher {
    Keyword,
    NextWeek,
    RelativeOffset,
    NextWeekday,
    Weekday,
    MonthDay,
    EndOfWeek,
    EndOfMonth,
    Iso,
}

impl DateMatcher {
    #[must_use]
    pub const fn confidence(self) -> f64 {
        match self {
            Self::Keyword | Self::Iso => 1.0,
            Self::RelativeOffset => 0.95,
            Self::NextWeek | Self::NextWeekday | Self::MonthDay | Self::EndOfWeek | Self::EndOfMonth => {
                0.9
            }
            Self::Weekday => 0.85,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParsedDate {
    pub instant: DateTime<Utc>,
    pub confidence: f64,
    pub matcher: DateMatcher,
}

impl ParsedDate {
    fn new(instant: DateTime<Utc>, matcher: DateMatcher) -> Self {
        Self {
            instant,
            confidence: matcher.confidence(),
            matcher,
        }
    }

    fn end_of(date: NaiveDate, matcher: DateMatcher) -> Self {
        Self::new(end_of_day(date), matcher)
    }
}

/// A deadline found inside free text, with the byte offset where its trigger
/// phrase starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeadlineMatch {
    pub date: ParsedDate,
    pub clause_start: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalDateParser;

impl NaturalDateParser {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Parse the first date expression in `text`, relative to `reference`.
    ///
    /// Returns `None` when nothing matches; that means "no date", not an error.
    #[must_use]
    pub fn parse(&self, text: &str, reference: DateTime<Utc>) -> Option<ParsedDate> {
        let lowered = text.to_lowercase();
        let today = local_date(reference);

        let parsed = MATCHERS
            .iter()
            .find_map(|matcher| matcher(&lowered, today))
            .map(|(_, date)| date);

        if let Some(p) = &parsed {
            debug!(text, matcher = ?p.matcher, instant = %p.instant, "parsed date");
        }
        parsed
    }

    /// Parse a date expression that opens `text` (after an optional "the").
    /// A date further into the text does not count.
    #[must_use]
    pub fn parse_leading(&self, text: &str, reference: DateTime<Utc>) -> Option<ParsedDate> {
        let lowered = text.trim_start().to_lowercase();
        let lowered = lowered.strip_prefix("the ").map_or(lowered.as_str(), str::trim_start);
        let today = local_date(reference);

        MATCHERS
            .iter()
            .filter_map(|matcher| matcher(lowered, today))
            .find(|(start, _)| *start == 0)
            .map(|(_, date)| date)
    }

    /// Find a deadline phrase ("by Friday", "due tomorrow", "deadline: 2026-04-01",
    /// "before March 3", "until next week"). The date must open the clause right
    /// after the trigger; the clause stops at `,` `;` a sentence break, or the
    /// next trigger. Triggers without such a date are skipped.
    #[must_use]
    pub fn extract_deadline(&self, text: &str, reference: DateTime<Utc>) -> Option<DeadlineMatch> {
        RE_TRIGGER.find_iter(text).find_map(|trigger| {
            let rest = &text[trigger.end()..];
            let end = [RE_TRIGGER.find(rest), RE_CLAUSE_BREAK.find(rest)]
                .into_iter()
                .flatten()
                .map(|m| m.start())
                .min()
                .unwrap_or(rest.len());
            self.parse_leading(&rest[..end], reference)
                .map(|date| DeadlineMatch {
                    date,
                    clause_start: trigger.start(),
                })
        })
    }

    /// A display title for raw input: the deadline clause is dropped,
    /// whitespace collapsed, and the first letter capitalised.
    #[must_use]
    pub fn derive_title(&self, raw: &str, reference: DateTime<Utc>) -> String {
        let body = self
            .extract_deadline(raw, reference)
            .map_or(raw, |m| &raw[..m.clause_start]);
        let body = body.trim().trim_end_matches([',', ';', ':', '-', '.']).trim();
        let source = if body.is_empty() { raw } else { body };

        let collapsed = source.split_whitespace().collect::<Vec<_>>().join(" ");
        let mut chars = collapsed.chars();
        chars
            .next()
            .map(|first| first.to_uppercase().chain(chars).collect())
            .unwrap_or_default()
    }
}

fn next_week(text: &str, today: NaiveDate) -> Option<(usize, ParsedDate)> {
    let m = RE_NEXT_WEEK.find(text)?;
    Some((m.start(), ParsedDate::end_of(today + Duration::days(7), DateMatcher::NextWeek)))
}

fn keyword(text: &str, today: NaiveDate) -> Option<(usize, ParsedDate)> {
    let caps = RE_KEYWORD.captures(text)?;
    let date = match &caps[1] {
        "tomorrow" => today.succ_opt()?,
        "yesterday" => today.pred_opt()?,
        _ => today,
    };
    Some((caps.get(0)?.start(), ParsedDate::end_of(date, DateMatcher::Keyword)))
}

fn relative_offset(text: &str, today: NaiveDate) -> Option<(usize, ParsedDate)> {
    let caps = RE_OFFSET.captures(text)?;
    let count = count_word(&caps[1])?;
    let days = if caps[2].starts_with("week") { count * 7 } else { count };
    let date = today.checked_add_signed(Duration::days(days))?;
    Some((caps.get(0)?.start(), ParsedDate::end_of(date, DateMatcher::RelativeOffset)))
}

fn count_word(word: &str) -> Option<i64> {
    let n = match word {
        "a" | "an" | "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        digits => digits.parse().ok()?,
    };
    Some(n)
}

fn weekday(text: &str, today: NaiveDate) -> Option<(usize, ParsedDate)> {
    let caps = RE_WEEKDAY.captures(text)?;
    let start = caps.get(0)?.start();
    let target: Weekday = caps[2].parse().ok()?;
    let upcoming = next_weekday_after(today, target);
    if caps.get(1).is_some_and(|m| m.as_str() == "next") {
        let date = ParsedDate::end_of(upcoming + Duration::days(7), DateMatcher::NextWeekday);
        return Some((start, date));
    }
    Some((start, ParsedDate::end_of(upcoming, DateMatcher::Weekday)))
}

/// The first `target` strictly after `date`.
fn next_weekday_after(date: NaiveDate, target: Weekday) -> NaiveDate {
    let current = i64::from(date.weekday().num_days_from_monday());
    let wanted = i64::from(target.num_days_from_monday());
    let ahead = (wanted - current).rem_euclid(7);
    date + Duration::days(if ahead == 0 { 7 } else { ahead })
}

fn month_day(text: &str, today: NaiveDate) -> Option<(usize, ParsedDate)> {
    let (start, month, day) = RE_MONTH_DAY
        .captures(text)
        .and_then(|caps| month_day_parts(&caps, 1, 2))
        .or_else(|| {
            RE_DAY_MONTH
                .captures(text)
                .and_then(|caps| month_day_parts(&caps, 2, 1))
        })?;

    let this_year = NaiveDate::from_ymd_opt(today.year(), month, day)?;
    let date = if this_year < today {
        NaiveDate::from_ymd_opt(today.year() + 1, month, day)?
    } else {
        this_year
    };
    Some((start, ParsedDate::end_of(date, DateMatcher::MonthDay)))
}

fn month_day_parts(
    caps: &Captures<'_>,
    month_group: usize,
    day_group: usize,
) -> Option<(usize, u32, u32)> {
    let month = month_number(caps.get(month_group)?.as_str())?;
    let day: u32 = caps.get(day_group)?.as_str().parse().ok()?;
    Some((caps.get(0)?.start(), month, day))
}

fn month_number(name: &str) -> Option<u32> {
    let month = match name.get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn end_of_week(text: &str, today: NaiveDate) -> Option<(usize, ParsedDate)> {
    let m = RE_END_OF_WEEK.find(text)?;
    let friday = next_weekday_after(today, Weekday::Fri);
    Some((m.start(), ParsedDate::end_of(friday, DateMatcher::EndOfWeek)))
}

fn end_of_month(text: &str, today: NaiveDate) -> Option<(usize, ParsedDate)> {
    let m = RE_END_OF_MONTH.find(text)?;
    Some((m.start(), ParsedDate::end_of(last_day_of_month(today), DateMatcher::EndOfMonth)))
}

/// ISO-8601: an offset-qualified timestamp keeps its instant, a naive
/// timestamp is read as local time, and a bare date means local midnight.
fn iso(text: &str, _today: NaiveDate) -> Option<(usize, ParsedDate)> {
    let m = RE_ISO.find(text)?;
    let token = m.as_str().to_uppercase();

    if let Ok(dt) = DateTime::parse_from_rfc3339(&token) {
        return Some((m.start(), ParsedDate::new(dt.with_timezone(&Utc), DateMatcher::Iso)));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&token, format) {
            return Some((m.start(), ParsedDate::new(local_instant(naive), DateMatcher::Iso)));
        }
    }
    NaiveDate::parse_from_str(&token, "%Y-%m-%d")
        .ok()
        .map(|date| (m.start(), ParsedDate::new(start_of_day(date), DateMatcher::Iso)))
}
