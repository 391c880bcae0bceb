//! Integration tests registering a full workflow set into a filesystem registry.

use cogflow_builder::{GraphName, WorkflowBuilder, WorkflowSet};
use cogflow_config::{ComputeFunctions, Environment, FunctionRef, QueueRef, Queues};
use cogflow_registry::{
  FsStateMachineRegistry, RegistrationOutcome, RegistryError, StateMachineRegistry, register_all,
};

fn workflows(environment: Environment, cogify_arn: &str) -> WorkflowSet {
  workflows_for("my-stack", environment, cogify_arn)
}

fn workflows_for(stack_id: &str, environment: Environment, cogify_arn: &str) -> WorkflowSet {
  let functions = ComputeFunctions {
    s3_discovery: FunctionRef::new("arn:aws:lambda:us-east-1:123456789012:function:s3-discovery"),
    cmr_discovery: FunctionRef::new("arn:aws:lambda:us-east-1:123456789012:function:cmr-discovery"),
    cogify: FunctionRef::new(cogify_arn),
    build_ndjson: FunctionRef::new("arn:aws:lambda:us-east-1:123456789012:function:build-ndjson"),
    db_write: FunctionRef::new("arn:aws:lambda:us-east-1:123456789012:function:db-write"),
    data_transfer: Some(FunctionRef::new(
      "arn:aws:lambda:us-east-1:123456789012:function:data-transfer",
    )),
  };
  let queues = Queues {
    cogify_queue: QueueRef::new("https://sqs.us-east-1.amazonaws.com/123456789012/cogify"),
    stac_ready_queue: QueueRef::new("https://sqs.us-east-1.amazonaws.com/123456789012/stac-ready"),
  };

  WorkflowBuilder::new(stack_id, environment, functions, queues)
    .build_all()
    .expect("failed to build workflows")
}

const COGIFY_ARN: &str = "arn:aws:lambda:us-east-1:123456789012:function:cogify";

#[tokio::test]
async fn test_register_all_creates_three_state_machines() {
  let dir = tempfile::tempdir().expect("failed to create temp dir");
  let registry = FsStateMachineRegistry::new(dir.path(), "us-east-1", "123456789012");

  let registrations = register_all(&registry, &workflows(Environment::Prod, COGIFY_ARN))
    .await
    .expect("registration should succeed");

  assert_eq!(registrations.len(), 3);
  for (graph, suffix) in [
    (GraphName::Discovery, "discover"),
    (GraphName::Cogify, "cogify"),
    (GraphName::Publication, "publication"),
  ] {
    let registration = &registrations[&graph];
    assert_eq!(registration.outcome, RegistrationOutcome::Created);
    assert_eq!(registration.state_machine.name, format!("my-stack-{}", suffix));
    assert_eq!(
      registration.state_machine.arn,
      format!(
        "arn:aws:states:us-east-1:123456789012:stateMachine:my-stack-{}",
        suffix
      )
    );
  }

  let stored = registry.list().await.expect("list should succeed");
  assert_eq!(stored.len(), 3);
}

#[tokio::test]
async fn test_register_all_twice_is_idempotent() {
  let dir = tempfile::tempdir().expect("failed to create temp dir");
  let registry = FsStateMachineRegistry::new(dir.path(), "us-east-1", "123456789012");
  let set = workflows(Environment::Dev, COGIFY_ARN);

  let first = register_all(&registry, &set).await.expect("first registration");
  let second = register_all(&registry, &set).await.expect("second registration");

  for graph in GraphName::ALL {
    assert_eq!(second[&graph].outcome, RegistrationOutcome::Unchanged);
    assert_eq!(first[&graph].state_machine, second[&graph].state_machine);
  }
  assert_eq!(registry.list().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_register_all_updates_only_changed_graphs() {
  let dir = tempfile::tempdir().expect("failed to create temp dir");
  let registry = FsStateMachineRegistry::new(dir.path(), "us-east-1", "123456789012");

  register_all(&registry, &workflows(Environment::Dev, COGIFY_ARN))
    .await
    .expect("first registration");

  let changed = workflows(
    Environment::Dev,
    "arn:aws:lambda:us-east-1:123456789012:function:cogify-v2",
  );
  let registrations = register_all(&registry, &changed)
    .await
    .expect("second registration");

  assert_eq!(
    registrations[&GraphName::Cogify].outcome,
    RegistrationOutcome::Updated
  );
  assert_eq!(
    registrations[&GraphName::Discovery].outcome,
    RegistrationOutcome::Unchanged
  );
  assert_eq!(
    registrations[&GraphName::Publication].outcome,
    RegistrationOutcome::Unchanged
  );
}

#[tokio::test]
async fn test_registered_publication_definition_matches_environment() {
  let dir = tempfile::tempdir().expect("failed to create temp dir");
  let registry = FsStateMachineRegistry::new(dir.path(), "us-east-1", "123456789012");

  register_all(&registry, &workflows(Environment::Stage, COGIFY_ARN))
    .await
    .expect("registration should succeed");

  let publication = registry
    .get("my-stack-publication")
    .await
    .expect("get should succeed")
    .expect("publication should be registered");

  assert_eq!(publication.definition["StartAt"], "Data Transfer");
  assert_eq!(
    publication.definition["States"]["Data Transfer"]["OutputPath"],
    "$.Payload"
  );
  assert_eq!(
    publication.definition["States"]["Write to database Task"]["InputPath"],
    "$.Payload"
  );
}

#[tokio::test]
async fn test_register_all_rejects_long_stack_before_writing() {
  let dir = tempfile::tempdir().expect("failed to create temp dir");
  let registry = FsStateMachineRegistry::new(dir.path(), "us-east-1", "123456789012");

  // "-discover" and "-cogify" fit in 80 characters, "-publication" does not.
  let stack_id = "s".repeat(70);
  let result = register_all(&registry, &workflows_for(&stack_id, Environment::Dev, COGIFY_ARN)).await;

  match result {
    Err(RegistryError::InvalidName { name }) => {
      assert_eq!(name, format!("{}-publication", stack_id));
    }
    other => panic!("expected InvalidName, got {:?}", other),
  }
  assert!(registry.list().await.expect("list should succeed").is_empty());
}
