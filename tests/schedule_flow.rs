// tests/schedule_flow.rs
//
// Directory lookup, page parsing and queries against an in-memory site.
//
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;

use ulstu_schedule::error::{AppError, Result};
use ulstu_schedule::format;
use ulstu_schedule::models::{Config, EntityKind, LessonType, SourcesConfig};
use ulstu_schedule::services::{DayQuery, ScheduleService};
use ulstu_schedule::utils::http::PageSource;

const SITE: &str = "https://schedule.test";

/// Pages served from memory; unknown URLs answer 404.
struct FakeSite {
    pages: HashMap<String, String>,
}

impl FakeSite {
    fn new(pages: &[(&str, String)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(path, html)| (format!("{SITE}/{path}"), html.clone()))
                .collect(),
        }
    }
}

#[async_trait]
impl PageSource for FakeSite {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.pages.get(url).cloned().ok_or(AppError::Status {
            code: 404,
            reason: "Not Found".to_string(),
        })
    }
}

fn config() -> Config {
    Config {
        sources: SourcesConfig {
            group_directories: vec![format!("{SITE}/part1.html"), format!("{SITE}/part2.html")],
            teacher_directories: vec![format!("{SITE}/teachers.html")],
        },
        ..Config::default()
    }
}

fn directory(links: &[(&str, &str)]) -> String {
    let rows: String = links
        .iter()
        .map(|(label, href)| format!(r#"<tr><td><a href="{href}"><font>{label}</font></a></td></tr>"#))
        .collect();
    format!("<html><body><table><tr><td><font>Список</font></td></tr>{rows}</table></body></html>")
}

/// Fixed two-week page: cell 0 is the heading, `cells` fill given indexes.
fn fixed_page(heading: &str, cells: &[(usize, &str)]) -> String {
    let body: String = (0..182)
        .map(|i| {
            let text = match i {
                0 => heading,
                _ => cells
                    .iter()
                    .find(|(index, _)| *index == i)
                    .map(|(_, text)| *text)
                    .unwrap_or(""),
            };
            format!("<tr><td><p><font>{text}</font></p></td></tr>")
        })
        .collect();
    format!("<html><body><table>{body}</table></body></html>")
}

fn site() -> FakeSite {
    FakeSite::new(&[
        ("part1.html", directory(&[("ИСТбд-11", "ist11.html")])),
        ("part2.html", directory(&[("ПИбд-21, ПИбд-22", "pi21.html")])),
        (
            "pi21.html",
            fixed_page(
                "Группа ПИбд-21, ПИбд-22",
                // week 2, Wednesday, first period
                &[(133, "Лек.Физика <br/>Иванов И И 1-205 <br/>")],
            ),
        ),
        (
            "teachers.html",
            directory(&[
                ("Иванов И И, доцент", "t1.html"),
                ("Петров П П", "t2.html"),
                ("Сидоров С С", "t3.html"),
                ("Кузнецов К К", "t4.html"),
            ]),
        ),
        (
            "t1.html",
            fixed_page(
                "Иванов И И",
                &[(23, "ПИбд-21<br/>Лек.Физика<br/>3-305"), (25, "ПИбд-22<br/>Лек.Физика<br/>3-307")],
            ),
        ),
        ("t2.html", fixed_page("Петров П П", &[(24, "ПИбд-22,ПИбд-23<br/>Пр.Химия<br/>3_305")])),
        ("t4.html", fixed_page("Петров П П", &[])),
    ])
}

/// Wednesday of ISO week 16, which maps to the second slot.
fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, 17).unwrap()
}

#[tokio::test]
async fn group_day_is_found_parsed_and_formatted() {
    let site = site();
    let config = config();
    let service = ScheduleService::new(&site, &config);

    let report = service
        .day(EntityKind::Group, "ПИбд-21", &DayQuery::Offset(0), today())
        .await
        .unwrap();

    assert_eq!(report.week_slot, 1);
    let lesson = &report.day.lessons[0].sub_lessons[0];
    assert_eq!(lesson.kind, LessonType::Lecture);
    assert_eq!(lesson.name, "Физика");
    assert_eq!(lesson.teacher, "Иванов И И");
    assert_eq!(lesson.room, "1-205");

    let text = format::day_text(EntityKind::Group, "ПИбд-21", &report.day, report.date, today());
    assert!(text.starts_with("Расписание ПИбд-21 на сегодня (Среда, 17.04.2024, 2-ая учебная неделя)"));
    assert!(text.contains("1-ая пара (08:30-09:50): Лек. Физика, Иванов И И, аудитория 1-205"));
}

#[tokio::test]
async fn empty_week_is_unavailable() {
    let site = site();
    let config = config();
    let service = ScheduleService::new(&site, &config);

    let err = service
        .day(EntityKind::Group, "ПИбд-22", &DayQuery::Offset(7), today())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::UnavailableSchedule {
            week: Some(0),
            weekday: Some(2),
            ..
        }
    ));

    // Sunday needs no published week
    let report = service
        .day(EntityKind::Group, "ПИбд-22", &DayQuery::Weekday("воскресенье".into()), today())
        .await
        .unwrap();
    assert!(report.day.is_empty());
}

#[tokio::test]
async fn unknown_names_and_bad_input() {
    let site = site();
    let config = config();
    let service = ScheduleService::new(&site, &config);

    let err = service.full(EntityKind::Group, "ПИбд-99", today()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));

    let err = service
        .day(EntityKind::Group, "ПИбд-21", &DayQuery::Date("31.02".into()), today())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::IncorrectDate { .. }));

    let err = service
        .week_by_slot(EntityKind::Group, "ПИбд-21", 2, today())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::IncorrectWeekNumber { week: 2 }));

    // directory link present but page missing
    let err = service.full(EntityKind::Group, "ИСТбд-11", today()).await.unwrap_err();
    assert!(matches!(err, AppError::Status { code: 404, .. }));
}

#[tokio::test]
async fn link_to_another_teacher_is_a_mismatch() {
    // directory entry for Иванов points at Петров's page
    let broken = FakeSite::new(&[
        ("teachers.html", directory(&[("Иванов И И", "t2.html")])),
        ("t2.html", fixed_page("Петров П П", &[])),
    ]);
    let config = config();
    let service = ScheduleService::new(&broken, &config);

    match service.full(EntityKind::Teacher, "Иванов И И", today()).await {
        Err(AppError::LinkMismatch { expected, found }) => {
            assert_eq!(expected, "Иванов И И");
            assert_eq!(found, "Петров П П");
        }
        other => panic!("expected a link mismatch, got {other:?}"),
    }

    let err = service
        .full(EntityKind::Teacher, "Кузнецов К К", today())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));

    // extra words after a comma do not hide the name
    let site = site();
    let service = ScheduleService::new(&site, &config);
    let schedule = service.full(EntityKind::Teacher, "Иванов И И", today()).await.unwrap();
    assert_eq!(schedule.weeks[0].days[0].lessons[1].sub_lessons[0].group, "ПИбд-21");
}

#[tokio::test]
async fn directory_listing_is_ordered_and_unique() {
    let site = site();
    let config = config();
    let service = ScheduleService::new(&site, &config);

    let groups = service.resolver().list(EntityKind::Group).await.unwrap();
    assert_eq!(groups, vec!["ИСТбд-11", "ПИбд-21", "ПИбд-22"]);

    let teachers = service.resolver().list(EntityKind::Teacher).await.unwrap();
    assert_eq!(teachers, vec!["Иванов И И", "Петров П П", "Сидоров С С", "Кузнецов К К"]);
}

#[tokio::test]
async fn room_schedule_gathers_teacher_lessons() {
    let site = site();
    let config = config();
    let service = ScheduleService::new(&site, &config);

    let room = service.schedule(EntityKind::Room, "3-305", today()).await.unwrap();
    let found: Vec<_> = room.lessons().map(|(at, lesson)| (at, lesson.sub_lessons.len())).collect();

    // t3.html is missing and skipped
    assert_eq!(found.len(), 2);
    assert!(found.contains(&((0, 0, 1), 1)));
    assert!(found.contains(&((0, 0, 2), 2)));
    assert!(room.weeks[0].days[0].lessons[3].is_empty());
}

/// Page listing a single week; the heading carries its number.
fn single_week_page(heading: &str) -> String {
    let body: String = (0..100)
        .map(|i| {
            let text = if i == 0 { heading } else { "" };
            format!("<tr><td><p><font>{text}</font></p></td></tr>")
        })
        .collect();
    format!("<html><body><table>{body}</table></body></html>")
}

/// Serves `site`, answering `slow` only after the others had a chance to run.
struct SlowPage {
    site: FakeSite,
    slow: String,
}

#[async_trait]
impl PageSource for SlowPage {
    async fn fetch(&self, url: &str) -> Result<String> {
        if url == self.slow {
            for _ in 0..32 {
                tokio::task::yield_now().await;
            }
        }
        self.site.fetch(url).await
    }
}

#[tokio::test]
async fn room_week_numbers_follow_directory_order() {
    let source = SlowPage {
        site: FakeSite::new(&[
            (
                "teachers.html",
                directory(&[("Иванов И И", "t1.html"), ("Петров П П", "t2.html")]),
            ),
            ("t1.html", single_week_page("Иванов И И. Неделя: 7")),
            ("t2.html", single_week_page("Петров П П. Неделя: 10")),
        ]),
        slow: format!("{SITE}/t1.html"),
    };
    let config = config();
    let service = ScheduleService::new(&source, &config);

    let room = service.room_schedule("3-305", today()).await.unwrap();
    assert_eq!(room.weeks[0].number, 7);
    assert_eq!(room.weeks[1].number, 8);
}
