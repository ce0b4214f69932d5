//! Test helpers for the Pterodactyl API

use mockito::{Matcher, Mock, ServerGuard};

pub const TEST_API_KEY: &str = "ptla_test";

pub fn create_test_client(url: &str) -> super::Client {
    super::Client::new(url, TEST_API_KEY).unwrap()
}

/// Wrap attribute objects in a single-page list envelope.
pub fn list_body(object: &str, items: &[&str]) -> String {
    let data = items
        .iter()
        .map(|attrs| format!(r#"{{"object":"{}","attributes":{}}}"#, object, attrs))
        .collect::<Vec<_>>()
        .join(",");

    format!(
        r#"{{"object":"list","data":[{}],"meta":{{"pagination":{{"total":{n},"count":{n},"per_page":100,"current_page":1,"total_pages":1}}}}}}"#,
        data,
        n = items.len()
    )
}

/// Wrap one attribute object in its envelope.
pub fn object_body(object: &str, attrs: &str) -> String {
    format!(r#"{{"object":"{}","attributes":{}}}"#, object, attrs)
}

/// Mock a listing endpoint regardless of its pagination query.
pub async fn mock_list(server: &mut ServerGuard, path: &str, body: String) -> Mock {
    server
        .mock("GET", path)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

pub fn user_attrs(id: i32, username: &str, email: &str) -> String {
    format!(
        r#"{{"id":{id},"external_id":null,"uuid":"c4022c6c-9bf1-4a23-bff9-519cceb38335","username":"{username}","email":"{email}","first_name":"Jane","last_name":"Doe","language":"en","root_admin":false,"2fa":false,"created_at":"2024-01-02T03:04:05+00:00","updated_at":"2024-01-02T03:04:05+00:00"}}"#
    )
}

pub fn node_attrs(id: i32, uuid: &str, name: &str, location_id: i32) -> String {
    format!(
        r#"{{"id":{id},"uuid":"{uuid}","public":true,"name":"{name}","description":null,"location_id":{location_id},"fqdn":"{name}.example.com","scheme":"https","behind_proxy":false,"maintenance_mode":false,"memory":4096,"memory_overallocate":0,"disk":20480,"disk_overallocate":0,"upload_size":100,"daemon_listen":8080,"daemon_sftp":2022,"created_at":"2024-01-02T03:04:05+00:00","updated_at":"2024-01-03T03:04:05+00:00"}}"#
    )
}

pub fn location_attrs(id: i32, short: &str, long: &str) -> String {
    format!(
        r#"{{"id":{id},"short":"{short}","long":"{long}","created_at":"2024-01-02T03:04:05+00:00","updated_at":"2024-01-02T03:04:05+00:00"}}"#
    )
}

pub fn allocation_attrs(id: i32, port: u16) -> String {
    format!(
        r#"{{"id":{id},"ip":"10.0.0.5","alias":null,"port":{port},"notes":null,"assigned":false}}"#
    )
}

pub fn create_test_provider_data(url: &str) -> crate::provider_data::PterodactylProviderData {
    crate::provider_data::PterodactylProviderData::new(create_test_client(url))
}
