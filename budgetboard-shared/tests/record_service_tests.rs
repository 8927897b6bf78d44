/// Record service behavior over the in-memory store

mod common;

use budgetboard_shared::error::ServiceError;
use budgetboard_shared::models::category::{Category, CreateCategory};
use budgetboard_shared::models::record::{
    CreateRecord, Record, RecordFilter, SortDirection, UpdateRecord,
};
use budgetboard_shared::models::Family;
use chrono::NaiveDate;
use serde_json::json;
use common::{field_pairs, fields, Fixture, EXPENSE_TYPE_ID};

fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
}

async fn add_record(fx: &Fixture, category: &Category, amount: f64, on: &str) -> Record {
    let john = fx.john().await;
    fx.services
        .records(category.family)
        .create(
            &john,
            CreateRecord {
                amount: Some(amount.into()),
                category_id: Some(category.id.into()),
                date: Some(on.to_string().into()),
                currency_slug: category.family.uses_currency().then(|| "eur".to_string().into()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
}

fn ids(records: &[Record]) -> Vec<i64> {
    records.iter().map(|r| r.id).collect()
}

#[tokio::test]
async fn test_create_then_find() {
    let fx = Fixture::new().await;
    let john = fx.john().await;
    let food = fx.category(Family::Finance, "Food").await;

    let created = fx
        .services
        .records(Family::Finance)
        .create(
            &john,
            CreateRecord {
                amount: Some(12.5.into()),
                category_id: Some(food.id.into()),
                date: Some("2022-08-05".to_string().into()),
                comment: Some("lunch".to_string().into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(created.amount, 12.5);
    assert_eq!(created.date, date("2022-08-05"));
    assert_eq!(created.comment, "lunch");
    assert!(!created.is_trashed);
    assert_eq!(created.category, food);
    assert!(created.currency.is_none());

    let found = fx
        .services
        .records(Family::Finance)
        .find(&john, created.id)
        .await
        .unwrap();
    assert_eq!(found, created);
}

#[tokio::test]
async fn test_create_reports_amount_and_date_together() {
    let fx = Fixture::new().await;
    let john = fx.john().await;
    let food = fx.category(Family::Finance, "Food").await;

    let err = fx
        .services
        .records(Family::Finance)
        .create(
            &john,
            CreateRecord {
                amount: Some((-20.5).into()),
                category_id: Some(food.id.into()),
                date: Some("2022|08|05".to_string().into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert_eq!(
        fields(err),
        field_pairs(&[
            ("amount", "Should be positive."),
            ("date", "Should have format YYYY-MM-DD."),
        ])
    );
}

#[tokio::test]
async fn test_wrong_json_types_are_field_errors() {
    let fx = Fixture::new().await;
    let john = fx.john().await;
    let food = fx.category(Family::Finance, "Food").await;
    let service = fx.services.records(Family::Finance);

    let dto: CreateRecord = serde_json::from_value(json!({
        "amount": "abc",
        "categoryId": food.id,
        "date": "2022|08|05",
    }))
    .unwrap();
    let err = service.create(&john, dto).await.unwrap_err();
    assert_eq!(
        fields(err),
        field_pairs(&[
            ("amount", "Should be positive."),
            ("date", "Should have format YYYY-MM-DD."),
        ])
    );

    let dto: CreateRecord = serde_json::from_value(json!({
        "amount": 5,
        "categoryId": "1",
        "date": 20220805,
        "comment": 7,
    }))
    .unwrap();
    let err = service.create(&john, dto).await.unwrap_err();
    assert_eq!(
        fields(err),
        field_pairs(&[
            ("categoryId", "Invalid value."),
            ("comment", "Should be a string."),
            ("date", "Should have format YYYY-MM-DD."),
        ])
    );

    let record = add_record(&fx, &food, 10.0, "2022-01-01").await;
    let dto: UpdateRecord =
        serde_json::from_value(json!({ "isTrashed": "yes", "amount": 2 })).unwrap();
    let err = service.update(&john, record.id, dto).await.unwrap_err();
    assert_eq!(fields(err), field_pairs(&[("isTrashed", "Should be a boolean.")]));
    assert_eq!(service.find(&john, record.id).await.unwrap(), record);
}

#[tokio::test]
async fn test_create_missing_fields() {
    let fx = Fixture::new().await;
    let john = fx.john().await;

    let err = fx
        .services
        .records(Family::Budget)
        .create(&john, CreateRecord::default())
        .await
        .unwrap_err();
    assert_eq!(
        fields(err),
        field_pairs(&[
            ("amount", "Required field."),
            ("categoryId", "Required field."),
            ("currencySlug", "Required field."),
            ("date", "Required field."),
        ])
    );

    let err = fx
        .services
        .records(Family::Activity)
        .create(
            &john,
            CreateRecord {
                amount: Some(5.0.into()),
                category_id: Some(1_i64.into()),
                date: Some("2022-02-30".to_string().into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(fields(err), field_pairs(&[("date", "Should be a valid date.")]));
}

#[tokio::test]
async fn test_budget_record_currency() {
    let fx = Fixture::new().await;
    let john = fx.john().await;
    let rent = fx.category(Family::Budget, "Rent").await;
    let service = fx.services.records(Family::Budget);

    let err = service
        .create(
            &john,
            CreateRecord {
                amount: Some(800.0.into()),
                category_id: Some(rent.id.into()),
                date: Some("2022-09-01".to_string().into()),
                currency_slug: Some("xyz".to_string().into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(fields(err), field_pairs(&[("currencySlug", "Invalid value.")]));

    let record = service
        .create(
            &john,
            CreateRecord {
                amount: Some(800.0.into()),
                category_id: Some(rent.id.into()),
                date: Some("2022-09-01".to_string().into()),
                currency_slug: Some("usd".to_string().into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(record.currency.as_ref().unwrap().slug, "usd");

    let switched = service
        .update(
            &john,
            record.id,
            UpdateRecord {
                currency_slug: Some("gbp".to_string().into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(switched.currency.unwrap().slug, "gbp");
}

#[tokio::test]
async fn test_category_must_match_family_and_board() {
    let fx = Fixture::new().await;
    let running = fx.category(Family::Activity, "Running").await;

    let jessica = fx.jessica().await;
    let books = fx
        .services
        .categories(Family::Finance)
        .create(
            &jessica,
            CreateCategory {
                name: Some("Books".to_string().into()),
                board_id: Some(fx.mega_economists_id.into()),
                type_id: Some(EXPENSE_TYPE_ID.into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let john = fx.john().await;
    for category_id in [running.id, books.id, 9999] {
        let err = fx
            .services
            .records(Family::Finance)
            .create(
                &john,
                CreateRecord {
                    amount: Some(1.0.into()),
                    category_id: Some(category_id.into()),
                    date: Some("2022-01-01".to_string().into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(fields(err), field_pairs(&[("categoryId", "Invalid value.")]));
    }
}

#[tokio::test]
async fn test_default_order_is_newest_first() {
    let fx = Fixture::new().await;
    let john = fx.john().await;
    let food = fx.category(Family::Finance, "Food").await;

    let first = add_record(&fx, &food, 1.0, "2022-03-01").await;
    let second = add_record(&fx, &food, 2.0, "2022-01-01").await;
    let third = add_record(&fx, &food, 3.0, "2022-02-01").await;

    let records = fx
        .services
        .records(Family::Finance)
        .search(&john, RecordFilter::default())
        .await
        .unwrap();
    assert_eq!(ids(&records), vec![third.id, second.id, first.id]);
}

#[tokio::test]
async fn test_ordering_by_date_with_paging() {
    let fx = Fixture::new().await;
    let john = fx.john().await;
    let food = fx.category(Family::Finance, "Food").await;

    let march = add_record(&fx, &food, 1.0, "2022-03-01").await;
    let january = add_record(&fx, &food, 2.0, "2022-01-01").await;
    let february = add_record(&fx, &food, 3.0, "2022-02-01").await;
    let january_again = add_record(&fx, &food, 4.0, "2022-01-01").await;

    let service = fx.services.records(Family::Finance);
    let ascending = service
        .search(
            &john,
            RecordFilter {
                ordering_by_date: Some(SortDirection::Asc),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(
        ids(&ascending),
        vec![january.id, january_again.id, february.id, march.id]
    );

    let page = service
        .search(
            &john,
            RecordFilter {
                ordering_by_date: Some(SortDirection::Asc),
                skip: Some(1),
                take: Some(2),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(ids(&page), vec![january_again.id, february.id]);

    let newest_by_date = service
        .search(
            &john,
            RecordFilter {
                ordering_by_date: Some(SortDirection::Desc),
                ordering_by_id: Some(SortDirection::Desc),
                take: Some(3),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(
        ids(&newest_by_date),
        vec![march.id, february.id, january_again.id]
    );
}

#[tokio::test]
async fn test_search_filters() {
    let fx = Fixture::new().await;
    let john = fx.john().await;
    let food = fx.category(Family::Finance, "Food").await;
    let rent = fx.category(Family::Finance, "Rent").await;

    let lunch = add_record(&fx, &food, 12.0, "2022-05-01").await;
    let dinner = add_record(&fx, &food, 30.0, "2022-05-02").await;
    let may_rent = add_record(&fx, &rent, 800.0, "2022-05-01").await;

    let service = fx.services.records(Family::Finance);
    let search = |filter: RecordFilter| {
        let service = service.clone();
        let john = john.clone();
        async move { ids(&service.search(&john, filter).await.unwrap()) }
    };

    assert_eq!(
        search(RecordFilter {
            category_ids: Some(vec![food.id]),
            ..Default::default()
        })
        .await,
        vec![dinner.id, lunch.id]
    );
    assert_eq!(
        search(RecordFilter {
            dates: Some(vec![date("2022-05-01")]),
            ..Default::default()
        })
        .await,
        vec![may_rent.id, lunch.id]
    );
    assert_eq!(
        search(RecordFilter {
            amounts: Some(vec![30.0, 800.0]),
            ..Default::default()
        })
        .await,
        vec![may_rent.id, dinner.id]
    );
    assert_eq!(
        search(RecordFilter {
            ids: Some(vec![lunch.id]),
            ..Default::default()
        })
        .await,
        vec![lunch.id]
    );
}

#[tokio::test]
async fn test_trash_through_update() {
    let fx = Fixture::new().await;
    let john = fx.john().await;
    let food = fx.category(Family::Finance, "Food").await;
    let kept = add_record(&fx, &food, 1.0, "2022-01-01").await;
    let trashed = add_record(&fx, &food, 2.0, "2022-01-02").await;

    let service = fx.services.records(Family::Finance);
    let updated = service
        .update(
            &john,
            trashed.id,
            UpdateRecord {
                is_trashed: Some(true.into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(updated.is_trashed);
    assert_eq!(updated.amount, trashed.amount);

    let in_trash = service
        .search(
            &john,
            RecordFilter {
                is_trashed: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(ids(&in_trash), vec![trashed.id]);

    let live = service
        .search(
            &john,
            RecordFilter {
                is_trashed: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(ids(&live), vec![kept.id]);
}

#[tokio::test]
async fn test_update_validates_present_fields() {
    let fx = Fixture::new().await;
    let john = fx.john().await;
    let food = fx.category(Family::Finance, "Food").await;
    let rent = fx.category(Family::Finance, "Rent").await;
    let record = add_record(&fx, &food, 10.0, "2022-01-01").await;
    let service = fx.services.records(Family::Finance);

    let err = service
        .update(
            &john,
            record.id,
            UpdateRecord {
                amount: Some(0.0.into()),
                date: Some("01/02/2022".to_string().into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(
        fields(err),
        field_pairs(&[
            ("amount", "Should be positive."),
            ("date", "Should have format YYYY-MM-DD."),
        ])
    );

    let moved = service
        .update(
            &john,
            record.id,
            UpdateRecord {
                category_id: Some(rent.id.into()),
                comment: Some("moved".to_string().into()),
                date: Some("2022-06-30".to_string().into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.category.id, rent.id);
    assert_eq!(moved.comment, "moved");
    assert_eq!(moved.date, date("2022-06-30"));
    assert_eq!(moved.amount, 10.0);

    let unchanged = service
        .update(&john, record.id, UpdateRecord::default())
        .await
        .unwrap();
    assert_eq!(unchanged, moved);
}

#[tokio::test]
async fn test_outsider_is_denied() {
    let fx = Fixture::new().await;
    let food = fx.category(Family::Finance, "Food").await;
    let record = add_record(&fx, &food, 10.0, "2022-01-01").await;
    let jessica = fx.jessica().await;
    let service = fx.services.records(Family::Finance);

    assert!(matches!(
        service.find(&jessica, record.id).await,
        Err(ServiceError::Forbidden(_))
    ));
    assert!(matches!(
        service
            .update(
                &jessica,
                record.id,
                UpdateRecord {
                    is_trashed: Some(true.into()),
                    ..Default::default()
                }
            )
            .await,
        Err(ServiceError::Forbidden(_))
    ));
    assert!(matches!(
        service.delete(&jessica, record.id).await,
        Err(ServiceError::Forbidden(_))
    ));

    let john = fx.john().await;
    assert!(!service.find(&john, record.id).await.unwrap().is_trashed);
}

#[tokio::test]
async fn test_board_filter_is_intersected_with_access() {
    let fx = Fixture::new().await;
    let food = fx.category(Family::Finance, "Food").await;
    let mine = add_record(&fx, &food, 10.0, "2022-01-01").await;

    let jessica = fx.jessica().await;
    let books = fx
        .services
        .categories(Family::Finance)
        .create(
            &jessica,
            CreateCategory {
                name: Some("Books".to_string().into()),
                board_id: Some(fx.mega_economists_id.into()),
                type_id: Some(EXPENSE_TYPE_ID.into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let hers = fx
        .services
        .records(Family::Finance)
        .create(
            &jessica,
            CreateRecord {
                amount: Some(25.0.into()),
                category_id: Some(books.id.into()),
                date: Some("2022-01-01".to_string().into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let john = fx.john().await;
    let service = fx.services.records(Family::Finance);
    let requested = service
        .search(
            &john,
            RecordFilter {
                board_ids: Some(vec![fx.clever_budgetiers_id, fx.mega_economists_id]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(ids(&requested), vec![mine.id]);

    let all = service.search(&jessica, RecordFilter::default()).await.unwrap();
    assert_eq!(ids(&all), vec![hers.id]);
}

#[tokio::test]
async fn test_families_are_separate() {
    let fx = Fixture::new().await;
    let john = fx.john().await;
    let food = fx.category(Family::Finance, "Food").await;
    let record = add_record(&fx, &food, 10.0, "2022-01-01").await;

    assert!(matches!(
        fx.services.records(Family::Activity).find(&john, record.id).await,
        Err(ServiceError::NotFound(_))
    ));
    assert!(fx
        .services
        .records(Family::Budget)
        .search(&john, RecordFilter::default())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_delete_removes_record() {
    let fx = Fixture::new().await;
    let john = fx.john().await;
    let food = fx.category(Family::Finance, "Food").await;
    let record = add_record(&fx, &food, 10.0, "2022-01-01").await;
    let service = fx.services.records(Family::Finance);

    let deleted = service.delete(&john, record.id).await.unwrap();
    assert_eq!(deleted.id, record.id);
    assert!(matches!(
        service.find(&john, record.id).await,
        Err(ServiceError::NotFound(_))
    ));

    // Deleting the category takes its records along
    let other = add_record(&fx, &food, 5.0, "2022-01-02").await;
    fx.services
        .categories(Family::Finance)
        .delete(&john, food.id)
        .await
        .unwrap();
    assert!(matches!(
        service.find(&john, other.id).await,
        Err(ServiceError::NotFound(_))
    ));
}
