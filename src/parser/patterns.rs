//! Regular expressions shared by the cell decomposer and the layout mapper.

use std::sync::LazyLock;

use regex::Regex;

/// Surname with two initials, the department placeholder (Latin look-alike
/// letters tolerated) or a vacancy.
const TEACHER: &str =
    r"(?:[А-ЯЁ][а-яё]+(?:-[А-ЯЁ][а-яё]+)? [А-ЯЁ] [А-ЯЁ])|(?:[Прpеeпоoдаaватели]{13} [каaфеeдры]{7})|(?:Вакансия)";

/// Digit-led code with a delimiter, building prefix with digits, bare digits.
const ROOM: &str = r"(?:\d.*[-_].+)|(?:[А-ЯЁA-Z]+-\d+)|(?:\d+)";

pub static TEACHER_AND_ROOM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^(?P<teacher>{TEACHER})\s+(?P<room>{ROOM})$"))
        .expect("teacher and room pattern")
});

/// `1 п/г`, `2п/г.`
pub static SUBGROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d)\s*п/г\.?").expect("subgroup pattern"));

pub static PRACTICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:практика\s+)?на\s+предприятии").expect("practice pattern")
});

pub static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*<br\s*/?>\s*").expect("line break pattern"));

pub static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern"));

/// Teaching week number in a heading such as `Неделя: 15-я`.
pub static WEEK_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":\s*(\d+)").expect("week number pattern"));

pub static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,2}").expect("number pattern"));
