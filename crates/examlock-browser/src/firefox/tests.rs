use super::*;
use crate::testutil::spawn_endpoint;

const TAB_LIST: &str = r#"[
  {"actor": "server1.conn0.tab1", "title": "Exam", "url": "http://localhost:5000/exam"},
  {"title": "Docs", "url": "https://docs.example.org/"}
]"#;

#[tokio::test]
async fn list_tabs_uses_actor_identifiers() {
    let port = spawn_endpoint(200, TAB_LIST, &[]).await;
    let driver = FirefoxDriver::with_ports(vec![port]);

    let tabs = driver.list_tabs().await;
    assert_eq!(tabs.len(), 2);
    assert_eq!(tabs[0].id, "server1.conn0.tab1");
    // Descriptor without an actor still lists, with an empty identifier.
    assert_eq!(tabs[1].id, "");
    assert_eq!(tabs[1].title, "Docs");
}

#[tokio::test]
async fn never_reports_an_active_tab() {
    let port = spawn_endpoint(200, TAB_LIST, &[]).await;
    let driver = FirefoxDriver::with_ports(vec![port]);

    let tabs = driver.list_tabs().await;
    assert!(tabs.iter().all(|tab| !tab.is_active));
}

#[tokio::test]
async fn close_is_best_effort_and_flagged_unreliable() {
    let driver = FirefoxDriver::with_ports(Vec::new());
    assert!(!driver.reliable_close());

    let tab = BrowserTab {
        id: String::from("server1.conn0.tab1"),
        title: String::from("Exam"),
        url: String::from("http://localhost:5000/exam"),
        is_active: false,
        browser_family: BrowserFamily::Firefox,
        endpoint_port: 9228,
    };
    // No endpoint is contacted; the attempt itself always succeeds.
    assert!(driver.close_tab(&tab).await.is_ok());
}

#[test]
fn uses_the_firefox_candidate_table() {
    assert_eq!(FirefoxDriver::new().ports, vec![9228, 9229, 9230]);
}
