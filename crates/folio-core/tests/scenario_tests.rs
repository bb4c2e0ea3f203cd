use folio_core::prelude::*;
use folio_core::Unlinked;
use folio_test_utils::{college_with_prompts, setup_portfolio};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

#[tokio::test]
async fn test_branch_base_into_prompt() {
    let portfolio = setup_portfolio();
    let (c1, prompts) = college_with_prompts(&portfolio, "C1", 1).await;
    let p1 = &prompts[0];

    let base = portfolio
        .graph()
        .create_idea("My Leadership Story", "Captain of the robotics team", false, None)
        .await
        .unwrap();
    assert_eq!(base.status, EssayStatus::Idea);

    let branch = portfolio
        .graph()
        .branch_essay(p1.id, base.id)
        .await
        .unwrap()
        .into_value();

    let stored = portfolio.graph().essay(branch.id).await.unwrap();
    assert_eq!(stored.source_essay_id(), Some(base.id));
    assert_eq!(stored.prompt_id(), Some(p1.id));
    assert_eq!(stored.college_id(), Some(c1.id));
    assert_eq!(stored.status, EssayStatus::InProgress);
    assert_eq!(stored.body, base.body);

    let base = portfolio.graph().essay(base.id).await.unwrap();
    assert!(base.assigned_colleges.contains(&c1.id));

    let p1 = portfolio.registry().prompt(p1.id).await.unwrap();
    assert_eq!(p1.linked_essay_id, Some(branch.id));
}

#[tokio::test]
async fn test_value_on_base_reaches_branch() {
    let portfolio = setup_portfolio();
    let (_, prompts) = college_with_prompts(&portfolio, "C1", 1).await;
    let base = portfolio
        .graph()
        .create_idea("My Leadership Story", "", false, None)
        .await
        .unwrap();
    let branch = portfolio
        .graph()
        .branch_essay(prompts[0].id, base.id)
        .await
        .unwrap()
        .into_value();
    let resilience = portfolio.values().create_value("Resilience").await.unwrap();

    portfolio
        .graph()
        .toggle_value_on_essay(base.id, resilience.id)
        .await
        .unwrap();

    let branch = portfolio.graph().essay(branch.id).await.unwrap();
    assert!(branch.assigned_values.contains(&resilience.id));
}

#[tokio::test]
async fn test_unlink_forked_branch_deletes_it() {
    let portfolio = setup_portfolio();
    let (_, prompts) = college_with_prompts(&portfolio, "C1", 1).await;
    let p1 = &prompts[0];
    let base = portfolio
        .graph()
        .create_idea("My Leadership Story", "", false, None)
        .await
        .unwrap();
    let branch = portfolio
        .graph()
        .branch_essay(p1.id, base.id)
        .await
        .unwrap()
        .into_value();

    let outcome = portfolio
        .graph()
        .unlink_essay_from_prompt(p1.id)
        .await
        .unwrap();

    assert_eq!(outcome.value, Unlinked::DeletedFork(branch.id));
    assert!(portfolio.graph().essay(branch.id).await.unwrap_err().is_not_found());
    assert_eq!(portfolio.registry().prompt(p1.id).await.unwrap().linked_essay_id, None);
    // base survives
    portfolio.graph().essay(base.id).await.unwrap();
}

#[tokio::test]
async fn test_unlink_custom_branch_keeps_it() {
    let portfolio = setup_portfolio();
    let (_, prompts) = college_with_prompts(&portfolio, "C2", 1).await;
    let p2 = &prompts[0];

    let custom = portfolio
        .graph()
        .write_custom_for_prompt(p2.id)
        .await
        .unwrap()
        .into_value();
    assert_eq!(custom.source_essay_id(), None);
    assert!(custom.body.is_empty());

    let outcome = portfolio
        .graph()
        .unlink_essay_from_prompt(p2.id)
        .await
        .unwrap();

    assert_eq!(outcome.value, Unlinked::Detached(custom.id));
    portfolio.graph().essay(custom.id).await.unwrap();
    assert_eq!(portfolio.registry().prompt(p2.id).await.unwrap().linked_essay_id, None);
}

#[tokio::test]
async fn test_unlink_common_app_keeps_it() {
    let portfolio = setup_portfolio();
    let (_, prompts) = college_with_prompts(&portfolio, "C3", 1).await;
    let common = portfolio
        .graph()
        .create_idea("Personal statement", "text", true, None)
        .await
        .unwrap();
    portfolio
        .graph()
        .link_essay_to_prompt(prompts[0].id, common.id)
        .await
        .unwrap();

    let outcome = portfolio
        .graph()
        .unlink_essay_from_prompt(prompts[0].id)
        .await
        .unwrap();

    assert_eq!(outcome.value, Unlinked::Detached(common.id));
    portfolio.graph().essay(common.id).await.unwrap();
}

#[tokio::test]
async fn test_delete_value_sweeps_referencing_essays() {
    let portfolio = setup_portfolio();
    let resilience = portfolio.values().create_value("Resilience").await.unwrap();
    let a = portfolio.graph().create_idea("A", "", true, None).await.unwrap();
    let b = portfolio.graph().create_idea("B", "", false, None).await.unwrap();
    for essay in [a.id, b.id] {
        portfolio
            .graph()
            .set_value_on_essay(essay, resilience.id, true)
            .await
            .unwrap();
    }

    let outcome = portfolio.values().delete_value(resilience.id).await.unwrap();
    assert_eq!(outcome.value.essays_updated, 2);

    for essay in [a.id, b.id] {
        let essay = portfolio.graph().essay(essay).await.unwrap();
        assert!(!essay.assigned_values.contains(&resilience.id));
    }
    assert!(portfolio.values().values().await.unwrap().is_empty());

    // second run on an absent value does not error
    let again = portfolio.values().delete_value(resilience.id).await.unwrap();
    assert!(again.was_noop());
}

#[tokio::test]
async fn test_fork_bodies_are_independent() {
    let portfolio = setup_portfolio();
    let (_, prompts) = college_with_prompts(&portfolio, "C1", 1).await;
    let base = portfolio
        .graph()
        .create_idea("Story", "original", false, None)
        .await
        .unwrap();
    let branch = portfolio
        .graph()
        .branch_essay(prompts[0].id, base.id)
        .await
        .unwrap()
        .into_value();

    portfolio
        .graph()
        .update_body(branch.id, "tailored for C1")
        .await
        .unwrap();
    assert_eq!(portfolio.graph().essay(base.id).await.unwrap().body, "original");

    portfolio
        .graph()
        .update_body(base.id, "rewritten base")
        .await
        .unwrap();
    assert_eq!(
        portfolio.graph().essay(branch.id).await.unwrap().body,
        "tailored for C1"
    );
}

#[tokio::test]
async fn test_coverage_follows_links() {
    let portfolio = setup_portfolio();
    let (reed, prompts) = college_with_prompts(&portfolio, "Reed", 2).await;
    let grit = portfolio.values().create_value("Grit").await.unwrap();
    let humor = portfolio.values().create_value("Humor").await.unwrap();

    let base = portfolio.graph().create_idea("Base", "", false, None).await.unwrap();
    portfolio
        .graph()
        .set_value_on_essay(base.id, grit.id, true)
        .await
        .unwrap();
    portfolio
        .graph()
        .branch_essay(prompts[0].id, base.id)
        .await
        .unwrap();

    let custom = portfolio
        .graph()
        .write_custom_for_prompt(prompts[1].id)
        .await
        .unwrap()
        .into_value();
    portfolio
        .graph()
        .toggle_value_on_essay(custom.id, humor.id)
        .await
        .unwrap();

    let covered = portfolio.coverage().coverage_for_college(reed.id).await.unwrap();
    assert_eq!(covered, BTreeSet::from([grit.id, humor.id]));

    portfolio
        .graph()
        .unlink_essay_from_prompt(prompts[0].id)
        .await
        .unwrap();
    let covered = portfolio.coverage().coverage_for_college(reed.id).await.unwrap();
    assert_eq!(covered, BTreeSet::from([humor.id]));

    let missing = portfolio.coverage().missing_values(reed.id).await.unwrap();
    assert_eq!(missing, vec![grit]);
}

#[tokio::test]
async fn test_deleting_prompt_leaves_stale_reference() {
    let portfolio = setup_portfolio();
    let (_, prompts) = college_with_prompts(&portfolio, "Reed", 1).await;
    let custom = portfolio
        .graph()
        .write_custom_for_prompt(prompts[0].id)
        .await
        .unwrap()
        .into_value();

    portfolio.registry().delete_prompt(prompts[0].id).await.unwrap();

    let custom = portfolio.graph().essay(custom.id).await.unwrap();
    assert_eq!(custom.prompt_id(), Some(prompts[0].id));
    // limit is gone with the prompt
    assert_eq!(portfolio.graph().word_budget(custom.id).await.unwrap().limit, None);

    let report = portfolio.audit().await.unwrap();
    assert_eq!(report.len(), 1);
}
