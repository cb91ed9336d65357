use crate::modules::super_calendar::adapters::outbound::calendar_records::CalendarRecordRepository;
use crate::modules::super_calendar::adapters::outbound::calendar_records_in_memory::InMemoryCalendarRecords;
use crate::modules::super_calendar::adapters::outbound::configurators::ConfiguratorRepository;
use crate::modules::super_calendar::adapters::outbound::configurators_in_memory::InMemoryConfigurators;
use crate::modules::super_calendar::core::calendar_record::{CalendarEventValues, CalendarRecord};
use crate::modules::super_calendar::use_cases::list_calendar_events::queries_port::CalendarEventQueries;
use crate::modules::super_calendar::use_cases::regenerate_calendar::handler::RegenerateCalendarHandler;
use crate::shared::core::primitives::RawRecordId;
use crate::shared::infrastructure::record_store::in_memory::InMemoryRecordStore;
use crate::shared::infrastructure::user_context::StaticUserContext;
use crate::shell::seed::Seed;
use crate::tests::fixtures::configurators::{MappingLineBuilder, make_configurator};
use crate::tests::fixtures::models::make_task_model;
use crate::tests::fixtures::records::make_task;
use std::sync::Arc;

fn sorted_values(records: Vec<CalendarRecord>) -> Vec<CalendarEventValues> {
    let mut values: Vec<_> = records.into_iter().map(|record| record.values).collect();
    values.sort_by(|left, right| {
        (left.configurator_id, &left.res_id, &left.date_start).cmp(&(
            right.configurator_id,
            &right.res_id,
            &right.date_start,
        ))
    });
    values
}

#[tokio::test]
async fn regenerating_twice_yields_the_same_calendar() {
    let store = Arc::new(InMemoryRecordStore::new().with_model(
        make_task_model(),
        vec![
            make_task(1, "Write release notes", "open"),
            make_task(2, "Plan sprint", "done"),
        ],
    ));
    let configurators = Arc::new(InMemoryConfigurators::from(vec![make_configurator(
        1,
        vec![MappingLineBuilder::new().build()],
    )]));
    let calendar = Arc::new(InMemoryCalendarRecords::new());
    let handler = RegenerateCalendarHandler::new(
        store,
        configurators,
        calendar.clone(),
        Arc::new(StaticUserContext::default()),
    );

    handler.regenerate().await.unwrap();
    let first = calendar.all().await.unwrap();
    handler.regenerate().await.unwrap();
    let second = calendar.all().await.unwrap();

    assert_eq!(first.len(), 2);
    assert_ne!(first[0].id, second[0].id);
    assert_eq!(sorted_values(first), sorted_values(second));
}

#[tokio::test]
async fn stale_records_disappear_after_a_run() {
    let store = Arc::new(InMemoryRecordStore::new().with_model(
        make_task_model(),
        vec![
            make_task(1, "Write release notes", "open"),
            make_task(2, "Plan sprint", "open"),
        ],
    ));
    let configurators = Arc::new(InMemoryConfigurators::from(vec![make_configurator(
        1,
        vec![MappingLineBuilder::new().build()],
    )]));
    let calendar = Arc::new(InMemoryCalendarRecords::new());
    let handler = RegenerateCalendarHandler::new(
        store.clone(),
        configurators.clone(),
        calendar.clone(),
        Arc::new(StaticUserContext::default()),
    );
    handler.regenerate().await.unwrap();
    assert_eq!(calendar.all().await.unwrap().len(), 2);

    store
        .remove("project.task", &RawRecordId::Numeric(2))
        .await
        .unwrap();
    handler.regenerate().await.unwrap();
    let remaining: Vec<_> = calendar
        .all()
        .await
        .unwrap()
        .into_iter()
        .map(|record| record.values.res_id.to_string())
        .collect();
    assert_eq!(remaining, vec!["project.task,1"]);

    assert!(configurators.delete(1).await.unwrap());
    let report = handler.regenerate().await.unwrap();
    assert_eq!(report.records, 0);
    assert!(calendar.all().await.unwrap().is_empty());
}

#[tokio::test]
async fn the_demo_seed_produces_a_calendar_per_user() {
    let seed = Seed::parse(include_str!("../../../demos/seed.json")).unwrap();
    let calendar = Arc::new(InMemoryCalendarRecords::new());
    let handler = RegenerateCalendarHandler::new(
        Arc::new(InMemoryRecordStore::from_tables(seed.models)),
        Arc::new(InMemoryConfigurators::from(seed.configurators)),
        calendar.clone(),
        Arc::new(StaticUserContext::new(Some("Europe/Brussels".into()), None)),
    );

    let report = handler.regenerate().await.unwrap();
    assert_eq!(report.configurators, 2);
    assert_eq!(report.lines, 3);
    // task 3 has no start date on either task line
    assert_eq!(report.skipped, 2);
    assert_eq!(report.records, 5);

    let user_five = calendar.list_by_user_id(5, 0, 10, false).await.unwrap();
    let names: Vec<_> = user_five
        .iter()
        .map(|view| (view.name.as_str(), view.date_start.as_str()))
        .collect();
    assert_eq!(
        names,
        vec![
            ("Weekly sync", "2015-11-10 12:00:00"),
            ("Weekly sync", "2015-11-17 12:00:00"),
            ("Write release notes", "2024-01-01 10:00:00"),
            ("Deadline: Write release notes [OPEN]", "2024-02-29 23:00:00"),
        ]
    );
    assert!(
        user_five[..2]
            .iter()
            .all(|view| view.res_id == "calendar.event,14" && view.duration == Some(0.75))
    );

    let user_six = calendar.list_by_user_id(6, 0, 10, true).await.unwrap();
    assert_eq!(user_six.len(), 1);
    assert_eq!(user_six[0].name, "Deadline: Plan sprint [DONE]");
    assert_eq!(user_six[0].duration, Some(2.0));
}
