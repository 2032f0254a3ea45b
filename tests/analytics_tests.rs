//! Analytics fetch scenarios

mod common;

use common::{expect_table_response, fast_walker, start_api, BodyPagedTable};
use lfm_api::{AnalyticsRequest, Filter, SortField};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

fn metric_columns() -> Vec<Value> {
    vec![
        json!({"id": "lfm.audience_ratings.public_fan_acquisition_score",
               "name": "Fan Acquisition Score", "class": "METRIC", "data_type": "FLOAT"}),
        json!({"id": "lfm.fact.date_str",
               "name": "Date", "class": "DIMENSION", "data_type": "STRING"}),
        json!({"id": "lfm.brand_view.id",
               "name": "Brand View ID", "class": "DIMENSION", "data_type": "INTEGER"}),
    ]
}

#[tokio::test]
async fn retrieve_metrics_for_a_single_brand() {
    let (server, session) = start_api().await;

    Mock::given(method("POST"))
        .and(path("/v20200626/analytics/fetch"))
        .and(body_partial_json(json!({
            "ids": [176_817],
            "dataset_id": "dataset_brand_listenfirst"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [[98.5, "2020-06-01", 176_817]],
            "columns": metric_columns(),
            "page": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = AnalyticsRequest::new("dataset_brand_listenfirst")
        .ids(vec![176_817])
        .date_range("2020-06-01", "2020-06-07")
        .metrics(["lfm.audience_ratings.public_fan_acquisition_score"])
        .group_by(["lfm.fact.date_str", "lfm.brand_view.id"])
        .sort(SortField::desc("lfm.fact.date_str"));

    let data = request.fetch(&session).await.unwrap();
    expect_table_response(
        &data,
        Some(&[
            "lfm.audience_ratings.public_fan_acquisition_score",
            "lfm.fact.date_str",
            "lfm.brand_view.id",
        ]),
    );
}

#[tokio::test]
async fn body_paging_walks_the_full_result() {
    let (server, session) = start_api().await;

    let rows: Vec<Value> = (0..23)
        .map(|i| json!([f64::from(i), "2020-06-01", 176_817]))
        .collect();
    Mock::given(method("POST"))
        .and(path("/v20200626/analytics/fetch"))
        .respond_with(BodyPagedTable::new(rows, metric_columns(), 10))
        .mount(&server)
        .await;

    let request = AnalyticsRequest::new("dataset_brand_listenfirst")
        .ids(vec![176_817])
        .date_range("2020-06-01", "2020-06-07")
        .metrics(["lfm.audience_ratings.public_fan_acquisition_score"])
        .per_page(10);

    let mut rows_seen = 0;
    let walk = request
        .fetch_all_with(&session, &fast_walker(), |page| {
            rows_seen += page["records"].as_array().map_or(0, Vec::len);
        })
        .await
        .unwrap();

    // ceil(23 / 10) pages, every row exactly once
    assert_eq!(walk.pages, 3);
    assert_eq!(rows_seen, 23);
}

#[tokio::test]
async fn strict_private_data_is_rejected_with_coded_error() {
    let (server, session) = start_api().await;

    Mock::given(method("POST"))
        .and(path("/v20200626/analytics/fetch"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error_ts": 1_600_000_000,
            "error_msg": "Requested metrics are private for part of the cohort",
            "service_code": 200_010,
            "error_code": 401
        })))
        .mount(&server)
        .await;

    let request = AnalyticsRequest::new("dataset_brand_facebook")
        .ids(vec![1, 2, 3])
        .date_range("2020-06-01", "2020-06-14")
        .metrics(["facebook.page_insight.fbpai_impressions_organic"])
        .group_by(["lfm.brand_view.id"]);

    let err = request.fetch(&session).await.unwrap_err();
    let envelope = err.as_api().expect("expected the server error envelope");
    assert_eq!(envelope.error_code, 401);
    assert_eq!(envelope.service_code, 200_010);
}

#[tokio::test]
async fn filters_and_sort_serialize_into_the_request_body() {
    let (server, session) = start_api().await;

    Mock::given(method("POST"))
        .and(path("/v20200626/analytics/fetch"))
        .and(body_partial_json(json!({
            "filters": [
                {"field": "lfm.content.channel", "operator": "=", "values": ["facebook"]},
                {"field": "lfm.content.type", "operator": "=", "values": ["video"]}
            ],
            "sort": [{"field": "facebook.post.interactions", "dir": "DESC"}],
            "per_page": 100
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [[1000]],
            "columns": [{"id": "facebook.post.interactions", "name": "Interactions",
                         "class": "METRIC", "data_type": "INTEGER"}],
            "page": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = AnalyticsRequest::new("dataset_content_facebook")
        .ids(vec![4626])
        .date_range("2020-06-01", "2020-06-30")
        .metrics(["facebook.post.interactions"])
        .filter(Filter::eq("lfm.content.channel", "facebook"))
        .filter(Filter::eq("lfm.content.type", "video"))
        .sort(SortField::desc("facebook.post.interactions"))
        .per_page(100);

    let data = request.fetch(&session).await.unwrap();
    expect_table_response(&data, None);
}
