//! End-to-end tests for the Redfish collector against a mocked BMC and InfluxDB.

use std::time::Duration;

use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::json;
use tempsight_collector_framework::shutdown;
use tempsight_collector_framework::{
    CollectorError, CollectorLoop, FailurePolicy, FetchError, InfluxConfig, InfluxWriter,
    Schedule, Shutdown,
};
use tempsight_collector_redfish::client::RedfishClient;
use tempsight_collector_redfish::config::{DEFAULT_SENSOR_NAME, RedfishConfig};
use tempsight_collector_redfish::source::RedfishSource;

const TOKEN: &str = "0f4c8e2a";
const SESSION_PATH: &str = "/redfish/v1/SessionService/Sessions/42";

fn source(bmc: &ServerGuard) -> RedfishSource {
    let client = RedfishClient::new(&RedfishConfig {
        host: bmc.url(),
        user: "root".into(),
        password: "calvin".into(),
        ..Default::default()
    })
    .unwrap();
    RedfishSource::new(client, DEFAULT_SENSOR_NAME, "rack-1")
}

fn sink(influx: &ServerGuard) -> InfluxWriter {
    InfluxWriter::new(&InfluxConfig {
        url: influx.url(),
        org: "home".into(),
        bucket: "hardware".into(),
        token: "secret".into(),
        location_tag: Some("rack-1".into()),
        ..Default::default()
    })
    .unwrap()
}

async fn mock_login(bmc: &mut ServerGuard) -> Mock {
    bmc.mock("POST", "/redfish/v1/SessionService/Sessions")
        .match_body(Matcher::Json(json!({ "UserName": "root", "Password": "calvin" })))
        .with_status(201)
        .with_header("X-Auth-Token", TOKEN)
        .with_header("Location", SESSION_PATH)
        .with_header("content-type", "application/json")
        .with_body(json!({ "@odata.id": SESSION_PATH, "Id": "42" }).to_string())
        .expect(1)
        .create_async()
        .await
}

async fn mock_logout(bmc: &mut ServerGuard) -> Mock {
    bmc.mock("DELETE", SESSION_PATH)
        .match_header("x-auth-token", TOKEN)
        .with_status(204)
        .expect(1)
        .create_async()
        .await
}

async fn mock_get(bmc: &mut ServerGuard, path: &str, body: serde_json::Value) -> Mock {
    bmc.mock("GET", path)
        .match_header("x-auth-token", TOKEN)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}

async fn mock_two_chassis(bmc: &mut ServerGuard) -> (Mock, Mock, Mock) {
    let chassis = mock_get(
        bmc,
        "/redfish/v1/Chassis",
        json!({
            "@odata.id": "/redfish/v1/Chassis",
            "Members": [
                { "@odata.id": "/redfish/v1/Chassis/1" },
                { "@odata.id": "/redfish/v1/Chassis/2" }
            ]
        }),
    )
    .await;
    let thermal_1 = mock_get(
        bmc,
        "/redfish/v1/Chassis/1/Thermal",
        json!({
            "Temperatures": [
                { "Name": "System Temp", "ReadingCelsius": 27 },
                { "Name": "CPU1 Temp", "ReadingCelsius": 58 },
                { "Name": "Inlet Temp", "ReadingCelsius": null }
            ]
        }),
    )
    .await;
    let thermal_2 = mock_get(
        bmc,
        "/redfish/v1/Chassis/2/Thermal",
        json!({
            "Temperatures": [
                { "Name": "System Temp", "ReadingCelsius": "31.5" }
            ]
        }),
    )
    .await;
    (chassis, thermal_1, thermal_2)
}

fn influx_write(influx: &mut ServerGuard) -> mockito::Mock {
    influx
        .mock("POST", "/api/v2/write")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("org".into(), "home".into()),
            Matcher::UrlEncoded("bucket".into(), "hardware".into()),
        ]))
        .match_header("authorization", "Token secret")
        .with_status(204)
}

#[tokio::test]
async fn test_collect_once() {
    let mut bmc = Server::new_async().await;
    let mut influx = Server::new_async().await;

    let login = mock_login(&mut bmc).await;
    let logout = mock_logout(&mut bmc).await;
    let _chassis = mock_two_chassis(&mut bmc).await;
    let write = influx_write(&mut influx)
        .match_body(
            "location_temperature,location=rack-1 temperature=27\n\
             location_temperature,location=rack-1 temperature=31.5",
        )
        .expect(1)
        .create_async()
        .await;

    let collector = CollectorLoop::new(source(&bmc), sink(&influx), "hardware", Schedule::Once);
    let summary = collector.run(Shutdown::never()).await.unwrap();

    assert_eq!(summary.cycles, 1);
    assert_eq!(summary.points_written, 2);
    login.assert_async().await;
    write.assert_async().await;
    logout.assert_async().await;
}

#[tokio::test]
async fn test_logout_after_fetch_failure() {
    let mut bmc = Server::new_async().await;
    let mut influx = Server::new_async().await;

    let _login = mock_login(&mut bmc).await;
    let logout = mock_logout(&mut bmc).await;
    let _chassis = mock_get(
        &mut bmc,
        "/redfish/v1/Chassis",
        json!({ "Members": [{ "@odata.id": "/redfish/v1/Chassis/1" }] }),
    )
    .await;
    let _thermal = bmc
        .mock("GET", "/redfish/v1/Chassis/1/Thermal")
        .with_status(500)
        .create_async()
        .await;
    let write = influx_write(&mut influx).expect(0).create_async().await;

    let collector = CollectorLoop::new(source(&bmc), sink(&influx), "hardware", Schedule::Once);
    let err = collector.run(Shutdown::never()).await.unwrap_err();

    assert!(matches!(
        err,
        CollectorError::Fetch(FetchError::Status { status: 500, .. })
    ));
    write.assert_async().await;
    logout.assert_async().await;
}

#[tokio::test]
async fn test_logout_after_write_failure() {
    let mut bmc = Server::new_async().await;
    let mut influx = Server::new_async().await;

    let _login = mock_login(&mut bmc).await;
    let logout = mock_logout(&mut bmc).await;
    let _chassis = mock_two_chassis(&mut bmc).await;
    let _write = influx
        .mock("POST", "/api/v2/write")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body(r#"{"code":"internal error"}"#)
        .create_async()
        .await;

    let collector = CollectorLoop::new(source(&bmc), sink(&influx), "hardware", Schedule::Once);
    let err = collector.run(Shutdown::never()).await.unwrap_err();

    assert_eq!(err.kind(), "write");
    logout.assert_async().await;
}

#[tokio::test]
async fn test_rejected_login_runs_no_cycle() {
    let mut bmc = Server::new_async().await;
    let mut influx = Server::new_async().await;

    let _login = bmc
        .mock("POST", "/redfish/v1/SessionService/Sessions")
        .with_status(401)
        .create_async()
        .await;
    let chassis = bmc
        .mock("GET", "/redfish/v1/Chassis")
        .expect(0)
        .create_async()
        .await;
    let logout = bmc
        .mock("DELETE", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let write = influx_write(&mut influx).expect(0).create_async().await;

    let collector = CollectorLoop::new(
        source(&bmc),
        sink(&influx),
        "hardware",
        Schedule::Every(Duration::from_secs(60)),
    );
    let err = collector.run(Shutdown::never()).await.unwrap_err();

    assert!(matches!(err, CollectorError::Fetch(FetchError::Auth(_))));
    chassis.assert_async().await;
    logout.assert_async().await;
    write.assert_async().await;
}

#[tokio::test]
async fn test_login_without_token_is_auth_error() {
    let mut bmc = Server::new_async().await;
    let _login = bmc
        .mock("POST", "/redfish/v1/SessionService/Sessions")
        .with_status(201)
        .with_header("Location", SESSION_PATH)
        .create_async()
        .await;

    let source = source(&bmc);
    let err = source.client().login().await.unwrap_err();

    assert!(matches!(err, CollectorError::Fetch(FetchError::Auth(_))));
}

#[tokio::test]
async fn test_absolute_session_location() {
    let mut bmc = Server::new_async().await;
    let location = format!("{}{}", bmc.url(), SESSION_PATH);
    let _login = bmc
        .mock("POST", "/redfish/v1/SessionService/Sessions")
        .with_status(201)
        .with_header("X-Auth-Token", TOKEN)
        .with_header("Location", &location)
        .create_async()
        .await;
    let logout = mock_logout(&mut bmc).await;

    let source = source(&bmc);
    let session = source.client().login().await.unwrap();
    assert_eq!(session.location(), location);

    source.client().logout(session).await.unwrap();
    logout.assert_async().await;
}

#[tokio::test]
async fn test_empty_chassis_collection_fails() {
    let mut bmc = Server::new_async().await;
    let mut influx = Server::new_async().await;

    let _login = mock_login(&mut bmc).await;
    let logout = mock_logout(&mut bmc).await;
    let _chassis = mock_get(&mut bmc, "/redfish/v1/Chassis", json!({ "Members": [] })).await;
    let write = influx_write(&mut influx).expect(0).create_async().await;

    let collector = CollectorLoop::new(source(&bmc), sink(&influx), "hardware", Schedule::Once);
    let err = collector.run(Shutdown::never()).await.unwrap_err();

    assert!(matches!(err, CollectorError::Fetch(FetchError::NoData(_))));
    write.assert_async().await;
    logout.assert_async().await;
}

#[tokio::test]
async fn test_unexpected_json_is_parse_error() {
    let mut bmc = Server::new_async().await;
    let mut influx = Server::new_async().await;

    let _login = mock_login(&mut bmc).await;
    let logout = mock_logout(&mut bmc).await;
    let _chassis = mock_get(&mut bmc, "/redfish/v1/Chassis", json!({ "Members": "all" })).await;
    let write = influx_write(&mut influx).expect(0).create_async().await;

    let collector = CollectorLoop::new(source(&bmc), sink(&influx), "hardware", Schedule::Once);
    let err = collector.run(Shutdown::never()).await.unwrap_err();

    assert!(matches!(err, CollectorError::Parse(_)));
    write.assert_async().await;
    logout.assert_async().await;
}

#[tokio::test]
async fn test_session_reused_across_cycles() {
    let mut bmc = Server::new_async().await;
    let mut influx = Server::new_async().await;

    let login = mock_login(&mut bmc).await;
    let logout = mock_logout(&mut bmc).await;
    let (chassis, _, _) = mock_two_chassis(&mut bmc).await;
    let write = influx_write(&mut influx)
        .expect_at_least(2)
        .create_async()
        .await;

    let (trigger, shutdown) = shutdown::channel();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(250)).await;
        trigger.trigger();
    });

    let collector = CollectorLoop::new(
        source(&bmc),
        sink(&influx),
        "hardware",
        Schedule::Every(Duration::from_millis(50)),
    )
    .with_failure_policy(FailurePolicy::Abort);
    let summary = collector.run(shutdown).await.unwrap();

    assert!(summary.cycles >= 2, "{:?}", summary);
    assert_eq!(summary.points_written as u64, summary.cycles * 2);
    login.assert_async().await;
    logout.assert_async().await;
    write.assert_async().await;
    assert!(chassis.matched_async().await);
}

#[tokio::test]
async fn test_expired_session_is_fatal_under_default_policy() {
    let mut bmc = Server::new_async().await;
    let mut influx = Server::new_async().await;

    let login = mock_login(&mut bmc).await;
    let logout = mock_logout(&mut bmc).await;
    let chassis = bmc
        .mock("GET", "/redfish/v1/Chassis")
        .with_status(401)
        .expect(1)
        .create_async()
        .await;
    let write = influx_write(&mut influx).expect(0).create_async().await;

    let (trigger, shutdown) = shutdown::channel();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(400)).await;
        trigger.trigger();
    });

    let collector = CollectorLoop::new(
        source(&bmc),
        sink(&influx),
        "hardware",
        Schedule::Every(Duration::from_millis(20)),
    );
    let err = collector.run(shutdown).await.unwrap_err();

    assert!(matches!(err, CollectorError::Fetch(FetchError::Auth(_))));
    login.assert_async().await;
    chassis.assert_async().await;
    write.assert_async().await;
    logout.assert_async().await;
}
