use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::models::GroupType;
use crate::tests::{draft, test_user};
use crate::{InMemoryStorage, TimeflowService};

fn noon(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

#[test]
fn test_progress_is_zero_without_today_activities() {
    let _ = env_logger::try_init();
    let mut storage = InMemoryStorage::new();
    let mut service = TimeflowService::new(&mut storage);

    let user = test_user("Ana");
    let stats = service.dashboard_stats_at(&user, noon(2025, 6, 10));
    assert_eq!(stats.progress_percentage, 0);
    assert_eq!(stats.total_today, 0);

    // A task dated tomorrow changes nothing about today.
    let mut tomorrow = draft("Amanhã", None);
    tomorrow.date = NaiveDate::from_ymd_opt(2025, 6, 11).unwrap();
    service.add_activity(&user, tomorrow).unwrap();

    let stats = service.dashboard_stats_at(&user, noon(2025, 6, 10));
    assert_eq!(stats.progress_percentage, 0);
    assert_eq!(stats.total_today, 0);
    assert_eq!(stats.overdue_activities, 0);
}

#[test]
fn test_today_counts_and_progress() {
    let _ = env_logger::try_init();
    let mut storage = InMemoryStorage::new();
    let mut service = TimeflowService::new(&mut storage);

    let user = test_user("Ana");
    // Both dated today at 23:00, so neither is overdue at noon.
    let evening = NaiveTime::from_hms_opt(23, 0, 0).unwrap();
    let mut first = draft("Primeira", None);
    first.time = evening;
    let first = service.add_activity(&user, first).unwrap();
    let mut second = draft("Segunda", None);
    second.time = evening;
    service.add_activity(&user, second).unwrap();

    service.toggle_complete(&user, first.id).unwrap();

    let stats = service.dashboard_stats_at(&user, noon(2025, 6, 10));
    assert_eq!(stats.today_activities, 2);
    assert_eq!(stats.total_today, 2);
    assert_eq!(stats.completed_today, 1);
    assert_eq!(stats.progress_percentage, 50);
    assert_eq!(stats.overdue_activities, 0);
}

#[test]
fn test_overdue_spans_all_history() {
    let _ = env_logger::try_init();
    let mut storage = InMemoryStorage::new();
    let mut service = TimeflowService::new(&mut storage);

    let user = test_user("Ana");
    let mut old_pending = draft("Antiga", None);
    old_pending.date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
    service.add_activity(&user, old_pending).unwrap();

    let mut old_done = draft("Antiga feita", None);
    old_done.date = NaiveDate::from_ymd_opt(2025, 1, 16).unwrap();
    let old_done = service.add_activity(&user, old_done).unwrap();
    service.toggle_complete(&user, old_done.id).unwrap();

    let mut future = draft("Futura", None);
    future.date = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
    service.add_activity(&user, future).unwrap();

    // Today 09:00, already past noon.
    service.add_activity(&user, draft("De hoje", None)).unwrap();

    let stats = service.dashboard_stats_at(&user, noon(2025, 6, 10));
    assert_eq!(stats.overdue_activities, 2);
}

#[test]
fn test_weekly_progress_runs_from_sunday() {
    let _ = env_logger::try_init();
    let mut storage = InMemoryStorage::new();
    let mut service = TimeflowService::new(&mut storage);

    let user = test_user("Ana");
    // 2025-06-10 is a Tuesday; the week began Sunday 2025-06-08.
    let mut sunday = draft("De domingo", None);
    sunday.date = NaiveDate::from_ymd_opt(2025, 6, 8).unwrap();
    let sunday = service.add_activity(&user, sunday).unwrap();
    service.toggle_complete(&user, sunday.id).unwrap();

    let mut last_week = draft("Da semana passada", None);
    last_week.date = NaiveDate::from_ymd_opt(2025, 6, 5).unwrap();
    service.add_activity(&user, last_week).unwrap();

    service.add_activity(&user, draft("De hoje", None)).unwrap();

    let stats = service.dashboard_stats_at(&user, noon(2025, 6, 10));
    // In week: Sunday task (done) and today's (pending).
    assert_eq!(stats.weekly_progress, 50);
}

#[test]
fn test_personal_and_group_pending_counts() {
    let _ = env_logger::try_init();
    let mut storage = InMemoryStorage::new();
    let mut service = TimeflowService::new(&mut storage);

    let user = test_user("Ana");
    let group = service
        .create_group(&user, "Equipe", "", GroupType::Empresarial)
        .unwrap();

    service.add_activity(&user, draft("Pessoal", None)).unwrap();
    let done = service.add_activity(&user, draft("Feita", None)).unwrap();
    service.toggle_complete(&user, done.id).unwrap();
    service
        .add_activity(&user, draft("Da equipe", Some(group.id)))
        .unwrap();

    let stats = service.dashboard_stats_at(&user, noon(2025, 6, 10));
    assert_eq!(stats.personal_tasks, 1);
    assert_eq!(stats.group_tasks, 1);
}
