use std::collections::BTreeMap;

use cogflow_builder::{GraphName, WorkflowSet};
use tracing::{info, instrument};

use crate::error::RegistryError;
use crate::record::{Registration, validate_state_machine_name};
use crate::registry::StateMachineRegistry;

/// Register every graph of `workflows` as "{stack_id}-{suffix}".
///
/// All names are validated before anything is written. After that each graph
/// is an independent upsert: a failure stops the loop but does not roll back
/// graphs registered before it.
#[instrument(
  name = "register_all",
  skip(registry, workflows),
  fields(stack_id = %workflows.stack_id())
)]
pub async fn register_all<R>(
  registry: &R,
  workflows: &WorkflowSet,
) -> Result<BTreeMap<GraphName, Registration>, RegistryError>
where
  R: StateMachineRegistry + ?Sized,
{
  let names: BTreeMap<GraphName, String> = workflows
    .iter()
    .map(|(graph, _)| (graph, workflows.state_machine_name(graph)))
    .collect();
  for name in names.values() {
    validate_state_machine_name(name)?;
  }

  let mut registrations = BTreeMap::new();

  for (graph, machine) in workflows.iter() {
    let name = &names[&graph];
    let registration = registry.upsert(name, machine).await?;

    info!(
      graph = %graph,
      name = %name,
      arn = %registration.state_machine.arn,
      outcome = ?registration.outcome,
      "registered state machine"
    );

    registrations.insert(graph, registration);
  }

  Ok(registrations)
}
