//! Tests for network selection.

mod support;

use netdeploy_core::deploy::{Selection, TargetSelector};
use netdeploy_core::error::TaskError;
use netdeploy_core::network::Stage;
use support::{ScriptedPrompter, network, staged};

fn networks() -> Vec<netdeploy_core::network::NetworkTarget> {
    vec![
        staged("ethereum", Stage::Mainnet),
        staged("sepolia", Stage::Testnet),
        staged("fuji", Stage::Testnet),
        network("local"),
    ]
}

#[tokio::test]
async fn targeting_explicit_list_skips_prompt() {
    let networks = networks();
    let prompter = ScriptedPrompter::selecting(vec![0]);
    let names = vec!["fuji".to_string(), "ethereum".to_string()];

    let selection = TargetSelector::new(&networks)
        .select(Some(names.as_slice()), &prompter, false)
        .await
        .unwrap();

    match selection {
        Selection::Targets(set) => assert_eq!(set.names(), vec!["fuji", "ethereum"]),
        Selection::Aborted => panic!("explicit selection cannot abort"),
    }
    assert_eq!(prompter.selection_count(), 0);
}

#[tokio::test]
async fn targeting_prompt_offers_stage_candidates_only() {
    let networks = networks();
    let prompter = ScriptedPrompter::selecting(vec![1]);

    let selection = TargetSelector::new(&networks)
        .with_stage(Some(Stage::Testnet))
        .select(None, &prompter, false)
        .await
        .unwrap();

    assert_eq!(
        prompter.selections_asked.lock().unwrap()[0],
        vec!["sepolia (testnet)", "fuji (testnet)"]
    );
    match selection {
        Selection::Targets(set) => assert_eq!(set.names(), vec!["fuji"]),
        Selection::Aborted => panic!("selection was answered"),
    }
}

#[tokio::test]
async fn targeting_unattended_takes_every_candidate() {
    let networks = networks();
    let prompter = ScriptedPrompter::rejecting();

    let selection = TargetSelector::new(&networks)
        .with_stage(Some(Stage::Testnet))
        .select(None, &prompter, true)
        .await
        .unwrap();

    match selection {
        Selection::Targets(set) => assert_eq!(set.names(), vec!["sepolia", "fuji"]),
        Selection::Aborted => panic!("unattended selection cannot abort"),
    }
    assert_eq!(prompter.selection_count(), 0);
}

#[tokio::test]
async fn targeting_no_candidates_resolves_empty_without_prompt() {
    let networks = networks();
    let prompter = ScriptedPrompter::rejecting();

    let selection = TargetSelector::new(&networks)
        .with_stage(Some(Stage::Sandbox))
        .select(None, &prompter, false)
        .await
        .unwrap();

    assert!(matches!(selection, Selection::Targets(ref set) if set.is_empty()));
    assert_eq!(prompter.selection_count(), 0);
}

#[tokio::test]
async fn targeting_rejected_prompt_aborts() {
    let networks = networks();
    let prompter = ScriptedPrompter::rejecting();

    let selection = TargetSelector::new(&networks)
        .select(None, &prompter, false)
        .await
        .unwrap();

    assert_eq!(selection, Selection::Aborted);
}

#[tokio::test]
async fn targeting_out_of_range_answer_is_a_fault() {
    let networks = networks();
    let prompter = ScriptedPrompter::selecting(vec![9]);

    let err = TargetSelector::new(&networks)
        .select(None, &prompter, false)
        .await
        .unwrap_err();

    assert!(matches!(err, TaskError::Unexpected(_)));
}
