//! Decomposition of one timetable cell into sub-lessons.
//!
//! Cells hold free text separated by `<br>` tags. Group cells look like
//!
//! ```text
//! Лаб.Программирование <br/>1 п/г Иванов И И 3-305 <br/>2 п/г Петров П П 3-307 <br/>
//! ```
//!
//! and teacher cells like
//!
//! ```text
//! ПИбд-21,ПИбд-22<br/>Лек.Физика<br/>6-101
//! ```
//!
//! Decomposition never fails: pieces that cannot be recognized end up as
//! empty strings.

use crate::models::{Lesson, LessonType, Period, SubLesson};

use super::patterns::{LINE_BREAK, PRACTICE, SUBGROUP, TAG, TEACHER_AND_ROOM};

/// Decompose a cell of a group page.
///
/// Segments are folded left to right. Each one is classified in this order:
///
/// 1. a subgroup marker is cut out of the segment;
/// 2. teacher followed by room yields a sub-lesson;
/// 3. the first segment carries `type.name`;
/// 4. a later off-site practice phrase yields a sub-lesson with only that text;
/// 5. any other segment continues (replaces) the subject name.
///
/// A marker found on a name line is held for the next sub-lesson segment
/// without a marker of its own.
///
/// A marker found on a name segment is held until the next teacher line.
pub fn decompose_group_cell(markup: &str, period: Period, group: &str) -> Lesson {
    let segments = split_segments(markup);
    let fold = segments
        .iter()
        .enumerate()
        .fold(GroupFold::new(period, group), |acc, (index, segment)| {
            acc.absorb(index, segment)
        });
    Lesson {
        sub_lessons: fold.sub_lessons,
    }
}

/// Decompose a cell of a teacher page: groups, then `type.name`, then room.
///
/// Produces one sub-lesson per listed group.
pub fn decompose_teacher_cell(markup: &str, period: Period, teacher: &str) -> Lesson {
    let segments = split_segments(markup);
    let Some(groups_line) = segments.first() else {
        return Lesson::default();
    };

    let (kind, name) = segments
        .get(1)
        .map(|s| split_type_and_name(s))
        .unwrap_or_default();
    let room = segments.get(2).map(|s| tidy_room(s)).unwrap_or_default();

    let mut groups: Vec<(String, Option<u8>)> = groups_line
        .split(',')
        .map(extract_subgroup)
        .filter(|(group, _)| !group.is_empty())
        .collect();
    if groups.is_empty() {
        groups.push((String::new(), None));
    }

    let sub_lessons = groups
        .into_iter()
        .map(|(group, subgroup)| SubLesson {
            period,
            kind,
            group,
            name: name.clone(),
            teacher: teacher.to_string(),
            room: room.clone(),
            subgroup,
            practice: None,
        })
        .collect();

    Lesson { sub_lessons }
}

/// Accumulator threaded through the segments of a group cell.
struct GroupFold<'a> {
    period: Period,
    group: &'a str,
    kind: LessonType,
    name: String,
    pending_subgroup: Option<u8>,
    sub_lessons: Vec<SubLesson>,
}

impl<'a> GroupFold<'a> {
    fn new(period: Period, group: &'a str) -> Self {
        Self {
            period,
            group,
            kind: LessonType::Unknown,
            name: String::new(),
            pending_subgroup: None,
            sub_lessons: Vec::new(),
        }
    }

    fn absorb(mut self, index: usize, segment: &str) -> Self {
        let (text, marker) = extract_subgroup(segment);

        let teacher_and_room = TEACHER_AND_ROOM
            .captures(&text)
            .map(|caps| (caps["teacher"].to_string(), tidy_room(&caps["room"])));

        if let Some((teacher, room)) = teacher_and_room {
            let subgroup = marker.or_else(|| self.pending_subgroup.take());
            let sub_lesson = self.sub_lesson(subgroup, &teacher, &room);
            self.sub_lessons.push(sub_lesson);
        } else if index == 0 {
            // the first line is always `type.name`, even when it mentions practice
            (self.kind, self.name) = split_type_and_name(&text);
            self.pending_subgroup = marker;
        } else if PRACTICE.is_match(&text) {
            let subgroup = marker.or_else(|| self.pending_subgroup.take());
            let mut sub_lesson = self.sub_lesson(subgroup, "", "");
            sub_lesson.practice = Some(text);
            self.sub_lessons.push(sub_lesson);
        } else {
            self.name = tidy_name(&text);
            if marker.is_some() {
                self.pending_subgroup = marker;
            }
        }
        self
    }

    fn sub_lesson(&self, subgroup: Option<u8>, teacher: &str, room: &str) -> SubLesson {
        SubLesson {
            period: self.period,
            kind: self.kind,
            group: self.group.to_string(),
            name: self.name.clone(),
            teacher: teacher.to_string(),
            room: room.to_string(),
            subgroup,
            practice: None,
        }
    }
}

/// Apply markup fixups, split on line breaks and strip leftover tags.
///
/// Returns nothing for blank cells and for the `_` marker used by teacher
/// pages. A trailing empty segment is dropped.
pub(crate) fn split_segments(markup: &str) -> Vec<String> {
    let markup = markup
        .replace("&quot;", "\"")
        .replace("&nbsp;", " ")
        .replace('\u{a0}', " ")
        .replace("&amp;", "&");
    let trimmed = markup.trim();
    if trimmed.is_empty() || trimmed.starts_with('_') {
        return Vec::new();
    }

    let mut segments: Vec<String> = LINE_BREAK
        .split(trimmed)
        .map(|s| TAG.replace_all(s, "").trim().to_string())
        .collect();
    if segments.last().is_some_and(|s| s.is_empty()) {
        segments.pop();
    }
    if segments.iter().all(|s| s.is_empty()) {
        return Vec::new();
    }
    segments
}

/// Cut a `N п/г` marker out of `text`.
fn extract_subgroup(text: &str) -> (String, Option<u8>) {
    match SUBGROUP.captures(text) {
        Some(caps) => {
            let number = caps[1].parse().ok();
            let rest = SUBGROUP.replace(text, " ");
            (collapse_whitespace(&rest), number)
        }
        None => (text.trim().to_string(), None),
    }
}

/// Split `Лек.Название` into type and name. Text without a known type code
/// is taken whole as the name.
fn split_type_and_name(text: &str) -> (LessonType, String) {
    match text.split_once('.') {
        Some((code, rest)) => match LessonType::from_code(code) {
            LessonType::Unknown => (LessonType::Unknown, tidy_name(text)),
            kind => (kind, tidy_name(rest)),
        },
        None => (LessonType::Unknown, tidy_name(text)),
    }
}

pub(crate) fn tidy_name(name: &str) -> String {
    let spaced = name
        .replace(',', ", ")
        .replace('.', ". ")
        .replace("- ", " - ")
        .replace(" -", " - ");
    collapse_whitespace(&spaced)
}

pub(crate) fn tidy_room(room: &str) -> String {
    room.replace('.', "")
        .replace('_', "-")
        .replace(" - ", "-")
        .replace(" -", "-")
        .replace("- ", "-")
        .trim()
        .to_string()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
