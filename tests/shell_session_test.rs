use anyhow::Result;
use contact_directory::app::run_shell;
use contact_directory::core::reference::ReferenceData;
use contact_directory::{HttpContactClient, ResultCache, SearchSession, SelectionController};
use httpmock::prelude::*;
use std::sync::Arc;

fn session(backend_url: String) -> SearchSession<HttpContactClient> {
    let controller = SelectionController::new(Arc::new(ReferenceData::bundled().unwrap()));
    SearchSession::new(controller, ResultCache::new(4), HttpContactClient::new(backend_url))
}

async fn run_script(
    session: &mut SearchSession<HttpContactClient>,
    script: &str,
) -> Result<String> {
    let mut output = Vec::new();
    run_shell(session, script.as_bytes(), &mut output).await?;
    Ok(String::from_utf8(output)?)
}

/// 下拉選單連動與重複查詢走快取
#[tokio::test]
async fn test_shell_cascading_selection_and_cached_submit() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/contacts")
            .query_param("entityId", "lc-coral-bay");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "status": 200,
                "data": [["Mei Tan", "mei@x.org", "@mei", "+65000", "LCP", "President", "EB"]]
            }));
    });

    let mut session = session(server.url("/contacts"));
    let script = "\
options mc
region region-apac
options mc
lc lc-coral-bay
term 1
func 6
submit
submit
link
quit
";
    let output = run_script(&mut session, script).await?;

    api_mock.assert_hits(1);
    assert!(output.contains("  mc-acme    Acme MC"));
    assert!(output.contains("region: Asia Pacific (region-apac)"));
    assert!(output.contains("  mc-coral   Coral MC\n  mc-zenith  Zenith MC"));
    assert!(output.contains("lc: Coral Bay (lc-coral-bay)"));
    assert_eq!(output.matches("Search results for Coral Bay, function Executive Board").count(), 2);
    assert_eq!(output.matches("⏳ Searching...").count(), 1);
    assert!(output.contains("?region=region-apac&mc=mc-coral&lc=lc-coral-bay&func=6&term=1"));

    let state = session.controller().state();
    assert_eq!(state.mc.as_ref().unwrap().value, "mc-coral");
    Ok(())
}

#[tokio::test]
async fn test_shell_reports_incomplete_selection_and_unknown_ids() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/contacts");
        then.status(200).json_body(serde_json::json!({"status": 200, "data": []}));
    });

    let mut session = session(server.url("/contacts"));
    let output = run_script(&mut session, "mc mc-nowhere\nfunc 0\nsubmit\nbogus\n").await?;

    assert_eq!(api_mock.hits(), 0);
    assert!(output.contains("Unknown mc 'mc-nowhere'"));
    assert!(output.contains("❌ Please complete all fields before submitting."));
    assert!(output.contains("unknown command 'bogus'"));
    Ok(())
}

#[tokio::test]
async fn test_shell_shows_backend_error_banner() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/contacts");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"status": 404, "error": "not found"}));
    });

    let mut session = session(server.url("/contacts"));
    let output = run_script(&mut session, "mc mc-acme\nfunc 0\nterm 1\nsubmit\n").await?;

    assert!(output.contains("❌ Error: not found"));
    assert!(!output.contains("Search results for"));
    assert!(session.results().is_none());
    Ok(())
}
