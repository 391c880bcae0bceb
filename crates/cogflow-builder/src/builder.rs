use cogflow_config::{
  ComputeFunctions, DeployConfig, Environment, FunctionRef, QueueRef, Queues, state_machine_arn,
};
use cogflow_workflow::{
  ChoiceRule, ChoiceState, FailState, JsonPath, MapState, StateMachine, StateMachineBuilder,
  TaskState,
};
use tracing::{debug, info};

use crate::error::BuildError;
use crate::names::{GraphName, states};
use crate::set::WorkflowSet;

/// Parallel iterations allowed in every map state.
pub const MAX_CONCURRENCY: u32 = 100;

const DISCOVERY_FIELD: &str = "$.discovery";
const COGIFY_FLAG: &str = "$.Payload.cogify";
const DISCOVERED_OBJECTS: &str = "$.Payload.objects";
const FUNCTION_OUTPUT: &str = "$.Payload";

/// Assembles the workflow graphs of one stack from its resource handles.
///
/// Building is pure: nothing is fetched or registered here.
#[derive(Debug, Clone)]
pub struct WorkflowBuilder {
  stack_id: String,
  environment: Environment,
  functions: ComputeFunctions,
  queues: Queues,
}

impl WorkflowBuilder {
  pub fn new(
    stack_id: impl Into<String>,
    environment: Environment,
    functions: ComputeFunctions,
    queues: Queues,
  ) -> Self {
    Self {
      stack_id: stack_id.into(),
      environment,
      functions,
      queues,
    }
  }

  pub fn from_config(config: &DeployConfig) -> Self {
    Self::new(
      config.stack_id.clone(),
      config.environment,
      config.functions.clone(),
      config.queues.clone(),
    )
  }

  /// Build all three graphs. Either every graph builds or none is returned.
  pub fn build_all(&self) -> Result<WorkflowSet, BuildError> {
    let discovery = self.build_discovery_graph()?;
    let cogify = self.build_cogify_graph()?;
    let publication = self.build_publication_graph()?;

    info!(
      stack_id = %self.stack_id,
      environment = %self.environment,
      publication_start = %publication.start_at(),
      "built workflow graphs"
    );

    Ok(WorkflowSet {
      stack_id: self.stack_id.clone(),
      discovery,
      cogify,
      publication,
    })
  }

  /// Route on `$.discovery`: "s3" and "cmr" run the matching discovery
  /// function, anything else fails. Both discovery tasks continue into the
  /// same cogify-or-not decision.
  pub fn build_discovery_graph(&self) -> Result<StateMachine, BuildError> {
    let mut machine = StateMachine::builder();
    let decision = self.build_cogify_or_not_decision(&mut machine)?;

    machine
      .add_state(
        states::S3_DISCOVER,
        TaskState::invoke(self.functions.s3_discovery.clone()).next(decision),
      )?
      .add_state(
        states::CMR_DISCOVER,
        TaskState::invoke(self.functions.cmr_discovery.clone()).next(decision),
      )?
      .add_state(
        states::UNSUPPORTED_DISCOVERY,
        FailState::new()
          .error("UnsupportedDiscoveryType")
          .cause("discovery must be \"s3\" or \"cmr\""),
      )?
      .add_state(
        states::DISCOVERY_CHOICE,
        ChoiceState::new(states::UNSUPPORTED_DISCOVERY)
          .when(ChoiceRule::string_equals(
            DISCOVERY_FIELD,
            "s3",
            states::S3_DISCOVER,
          ))
          .when(ChoiceRule::string_equals(
            DISCOVERY_FIELD,
            "cmr",
            states::CMR_DISCOVER,
          )),
      )?;

    let graph = machine.build(states::DISCOVERY_CHOICE)?;
    debug!(states = graph.states().len(), "built discovery graph");
    Ok(graph)
  }

  /// Add the cogify-or-not decision and its two fan-out maps to `machine`,
  /// returning the name of the decision state to route into.
  ///
  /// `$.Payload.cogify == true` queues every discovered object for
  /// cogification; anything else queues them straight to stac-ready.
  pub fn build_cogify_or_not_decision(
    &self,
    machine: &mut StateMachineBuilder,
  ) -> Result<&'static str, BuildError> {
    machine
      .add_state(
        states::QUEUE_TO_COGIFY,
        self.queue_fan_out(states::SEND_TO_COGIFY, &self.queues.cogify_queue)?,
      )?
      .add_state(
        states::QUEUE_TO_STAC_READY,
        self.queue_fan_out(states::SEND_TO_STAC_READY, &self.queues.stac_ready_queue)?,
      )?
      .add_state(
        states::COGIFY_DECISION,
        ChoiceState::new(states::QUEUE_TO_STAC_READY).when(ChoiceRule::boolean_equals(
          COGIFY_FLAG,
          true,
          states::QUEUE_TO_COGIFY,
        )),
      )?;

    Ok(states::COGIFY_DECISION)
  }

  /// Cogify every element of the input array, forwarding each result to the
  /// stac-ready queue.
  pub fn build_cogify_graph(&self) -> Result<StateMachine, BuildError> {
    let mut iterator = StateMachine::builder();
    iterator
      .add_state(
        states::COGIFY,
        TaskState::invoke(self.functions.cogify.clone()).next(states::SEND_COGIFIED),
      )?
      .add_state(
        states::SEND_COGIFIED,
        TaskState::send_message(
          self.queues.stac_ready_queue.clone(),
          JsonPath::new(FUNCTION_OUTPUT),
        ),
      )?;
    let iterator = iterator.build(states::COGIFY)?;

    let mut machine = StateMachine::builder();
    machine.add_state(
      states::COGIFY_MAP,
      MapState::new(JsonPath::root(), MAX_CONCURRENCY, iterator),
    )?;

    Ok(machine.build(states::COGIFY_MAP)?)
  }

  /// Build ndjson then write it to the database. Environments that require
  /// it run the data transfer first and hand its output to the build step.
  pub fn build_publication_graph(&self) -> Result<StateMachine, BuildError> {
    let data_transfer = self.data_transfer_function()?;

    let mut machine = StateMachine::builder();
    machine
      .add_state(
        states::BUILD_NDJSON,
        TaskState::invoke(self.functions.build_ndjson.clone()).next(states::DB_WRITE),
      )?
      .add_state(
        states::DB_WRITE,
        TaskState::invoke(self.functions.db_write.clone()).input_path(FUNCTION_OUTPUT),
      )?;

    let start_at = match data_transfer {
      Some(function) => {
        machine.add_state(
          states::DATA_TRANSFER,
          TaskState::invoke(function.clone())
            .output_path(FUNCTION_OUTPUT)
            .next(states::BUILD_NDJSON),
        )?;
        states::DATA_TRANSFER
      }
      None => states::BUILD_NDJSON,
    };

    Ok(machine.build(start_at)?)
  }

  /// Registered name of one graph.
  pub fn state_machine_name(&self, graph: GraphName) -> String {
    graph.state_machine_name(&self.stack_id)
  }

  /// ARNs of the cogify and publication state machines, in that order.
  ///
  /// The discovery ARN is not part of this pair.
  pub fn get_arns(&self, account_id: &str, region: &str) -> (String, String) {
    (
      state_machine_arn(region, account_id, &self.state_machine_name(GraphName::Cogify)),
      state_machine_arn(
        region,
        account_id,
        &self.state_machine_name(GraphName::Publication),
      ),
    )
  }

  /// The data-transfer function if this environment needs one.
  fn data_transfer_function(&self) -> Result<Option<&FunctionRef>, BuildError> {
    if !self.environment.requires_data_transfer() {
      return Ok(None);
    }

    match &self.functions.data_transfer {
      Some(function) => Ok(Some(function)),
      None => Err(BuildError::MissingDataTransfer {
        environment: self.environment,
      }),
    }
  }

  /// A map over the discovered objects sending each one, whole, to `queue`.
  fn queue_fan_out(&self, send_state: &str, queue: &QueueRef) -> Result<MapState, BuildError> {
    let mut iterator = StateMachine::builder();
    iterator.add_state(
      send_state,
      TaskState::send_message(queue.clone(), JsonPath::root()),
    )?;
    let iterator = iterator.build(send_state)?;

    Ok(MapState::new(DISCOVERED_OBJECTS, MAX_CONCURRENCY, iterator))
  }
}
