// src/format.rs

//! Human-readable schedule texts.

use chrono::NaiveDate;

use crate::calendar::{self, WEEKDAY_NAMES};
use crate::models::{Day, EntityKind, Lesson, SubLesson, Week};

/// Text of one day for a group, teacher or room.
///
/// `today` decides between "сегодня", "завтра" and an explicit date.
pub fn day_text(kind: EntityKind, name: &str, day: &Day, date: NaiveDate, today: NaiveDate) -> String {
    let offset = (date - today).num_days();
    let date_str = calendar::format_date(date);
    let weekday = calendar::weekday_name(date);
    let week = day.week_number;

    let mut out = match (kind, offset) {
        (EntityKind::Teacher, 0) => format!(
            "{name} проводит следующие пары сегодня ({weekday}, {date_str}, {week}-ая учебная неделя):\n\n"
        ),
        (EntityKind::Teacher, 1) => format!(
            "{name} проводит следующие пары завтра ({weekday}, {date_str}, {week}-ая учебная неделя):\n\n"
        ),
        (EntityKind::Teacher, _) => format!(
            "{name} проводит следующие пары {date_str} ({weekday}, {week}-ая учебная неделя):\n\n"
        ),
        (_, 0) => format!(
            "{} на сегодня ({weekday}, {date_str}, {week}-ая учебная неделя):\n\n",
            title(kind, name)
        ),
        (_, 1) => format!(
            "{} на завтра ({weekday}, {date_str}, {week}-ая учебная неделя):\n\n",
            title(kind, name)
        ),
        _ => format!(
            "{} на {date_str} ({weekday}, {week}-ая учебная неделя):\n\n",
            title(kind, name)
        ),
    };

    if day.is_empty() {
        out.push_str(&match offset {
            0 => "Сегодня пар нет".to_string(),
            1 => "Завтра пар нет".to_string(),
            _ => format!("{date_str} пар нет"),
        });
        return out;
    }

    for lesson in day.lessons.iter().filter(|l| !l.is_empty()) {
        out.push_str(&lesson_line(kind, lesson));
        out.push_str("\n\n");
    }
    out
}

/// Text of a whole week, one block per weekday with lessons.
pub fn week_text(kind: EntityKind, name: &str, week: &Week) -> String {
    let mut out = format!("{}, {}-ая учебная неделя", title(kind, name), week.number);
    if let Some(range) = week.range {
        out.push_str(&format!(
            " ({} - {})",
            calendar::format_date(range.start),
            calendar::format_date(range.end.pred_opt().unwrap_or(range.end))
        ));
    }
    out.push_str(":\n\n");

    if week.is_empty() {
        out.push_str("Пар нет");
        return out;
    }

    for (index, day) in week.days.iter().enumerate().filter(|(_, d)| !d.is_empty()) {
        out.push_str(WEEKDAY_NAMES[index]);
        if let Some(range) = week.range {
            let date = range.start + chrono::Duration::days(index as i64);
            out.push_str(&format!(", {}", calendar::format_date(date)));
        }
        out.push_str(":\n");
        for lesson in day.lessons.iter().filter(|l| !l.is_empty()) {
            out.push_str(&lesson_line(kind, lesson));
            out.push('\n');
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}

fn title(kind: EntityKind, name: &str) -> String {
    match kind {
        EntityKind::Group => format!("Расписание {name}"),
        EntityKind::Teacher => format!("Расписание преподавателя {name}"),
        EntityKind::Room => format!("Расписание кабинета {name}"),
    }
}

/// `{k}-ая пара ({time}): ...` for a non-empty lesson.
fn lesson_line(kind: EntityKind, lesson: &Lesson) -> String {
    let Some(first) = lesson.sub_lessons.first() else {
        return String::new();
    };
    let head = format!("{}-ая пара ({}): ", first.period.number(), first.period.time());

    let body = match kind {
        EntityKind::Group => {
            let mut parts: Vec<String> = Vec::new();
            for part in lesson.sub_lessons.iter().map(group_part) {
                if !parts.contains(&part) {
                    parts.push(part);
                }
            }
            parts.join("; ")
        }
        EntityKind::Teacher => {
            let groups = groups_of(lesson);
            if groups.len() > 1 {
                format!(
                    "{}, аудитория {}. Группы: {}",
                    subject(first),
                    first.room,
                    groups.join(", ")
                )
            } else {
                format!(
                    "{}, {}, аудитория {}",
                    subject(first),
                    groups.join(", "),
                    first.room
                )
            }
        }
        EntityKind::Room => {
            let groups = groups_of(lesson);
            if groups.len() > 1 {
                format!(
                    "{}, {}. Группы: {}",
                    subject(first),
                    first.teacher,
                    groups.join(", ")
                )
            } else {
                format!("{}, {}, {}", subject(first), first.teacher, groups.join(", "))
            }
        }
    };
    head + &body
}

fn group_part(sub: &SubLesson) -> String {
    let prefix = sub
        .subgroup
        .map(|n| format!("{n} п/г: "))
        .unwrap_or_default();
    match &sub.practice {
        Some(practice) => format!("{prefix}{}, {practice}", subject(sub)),
        None if sub.teacher.is_empty() => {
            format!("{prefix}{}, аудитория {}", subject(sub), sub.room)
        }
        None => format!(
            "{prefix}{}, {}, аудитория {}",
            subject(sub),
            sub.teacher,
            sub.room
        ),
    }
}

/// `Лек. Физика`, or the bare name for unknown types.
fn subject(sub: &SubLesson) -> String {
    match sub.kind.abbreviation() {
        "" => sub.name.clone(),
        abbreviation => format!("{abbreviation} {}", sub.name),
    }
}

fn groups_of(lesson: &Lesson) -> Vec<&str> {
    let mut groups: Vec<&str> = Vec::new();
    for sub in &lesson.sub_lessons {
        if !groups.contains(&sub.group.as_str()) {
            groups.push(&sub.group);
        }
    }
    groups
}
