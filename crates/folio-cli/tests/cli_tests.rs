use folio_cli::{cli, commands};
use folio_core::Portfolio;
use folio_test_utils::setup_portfolio;
use pretty_assertions::assert_eq;

async fn folio(portfolio: &Portfolio, args: &[&str]) -> String {
    let matches = cli::build()
        .try_get_matches_from(std::iter::once("folio").chain(args.iter().copied()))
        .unwrap();
    let mut out = Vec::new();
    commands::run(&matches, portfolio, &mut out).await.unwrap();
    String::from_utf8(out).unwrap()
}

fn first_line(output: &str) -> String {
    output.lines().next().unwrap_or_default().trim().to_string()
}

#[tokio::test]
async fn test_branch_toggle_unlink_flow() {
    let portfolio = setup_portfolio();

    let college = first_line(&folio(&portfolio, &["college", "add", "Reed"]).await);
    let prompt = first_line(
        &folio(&portfolio, &["prompt", "add", &college, "Why Reed?", "--limit", "300"]).await,
    );
    let base = first_line(&folio(&portfolio, &["idea", "Robotics", "Losing well"]).await);
    let value = folio(&portfolio, &["value", "add", "Grit"]).await;
    let value = value.split_whitespace().next().unwrap().to_string();

    let branched = folio(&portfolio, &["essay", "branch", &prompt, &base]).await;
    let branch = branched.lines().last().unwrap().trim().to_string();
    assert!(branched.contains("created essay"));

    folio(&portfolio, &["value", "toggle", &base, &value]).await;
    let shown = folio(&portfolio, &["essay", "show", &branch]).await;
    assert!(shown.contains("values:   Grit"));
    assert!(shown.contains("words:    2 / 300"));

    let coverage = folio(&portfolio, &["coverage", &college]).await;
    assert!(coverage.contains("covered: Grit"));

    let unlinked = folio(&portfolio, &["essay", "unlink", &prompt]).await;
    assert_eq!(unlinked.trim(), format!("unlinked; branch {branch} deleted"));

    assert_eq!(folio(&portfolio, &["audit"]).await.trim(), "no issues");
}

#[tokio::test]
async fn test_repeated_set_reports_up_to_date() {
    let portfolio = setup_portfolio();
    let essay = first_line(&folio(&portfolio, &["idea", "CA", "--common-app"]).await);
    let value = folio(&portfolio, &["value", "add", "Humor"]).await;
    let value = value.split_whitespace().next().unwrap().to_string();

    folio(&portfolio, &["value", "set", &essay, &value]).await;
    let again = folio(&portfolio, &["value", "set", &essay, &value]).await;
    assert_eq!(again.trim(), "already up to date");
}

#[tokio::test]
async fn test_suggest_and_pick() {
    let portfolio = setup_portfolio();
    let listed = folio(
        &portfolio,
        &["suggest", "Describe a challenge", "--activity", "Debate:captain", "--honor", "AIME"],
    )
    .await;
    assert_eq!(listed.lines().count(), 2);

    let essay = first_line(
        &folio(
            &portfolio,
            &["suggest", "Describe a challenge", "--activity", "Debate", "--pick", "1"],
        )
        .await,
    );
    let shown = folio(&portfolio, &["essay", "show", &essay]).await;
    assert!(shown.contains("title:    Debate"));
    assert!(shown.contains("for:      Describe a challenge"));
}

#[tokio::test]
async fn test_status_accepts_loose_names() {
    let portfolio = setup_portfolio();
    let essay = first_line(&folio(&portfolio, &["idea", "Draft"]).await);

    folio(&portfolio, &["essay", "status", &essay, "in-progress"]).await;
    let listed = folio(&portfolio, &["essay", "list"]).await;
    assert!(listed.contains("In Progress"));
}
