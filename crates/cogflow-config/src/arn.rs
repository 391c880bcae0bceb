/// Format the ARN of a state machine from its name.
///
/// Example: ("us-east-1", "123456789012", "my-stack-cogify") becomes
/// "arn:aws:states:us-east-1:123456789012:stateMachine:my-stack-cogify"
pub fn state_machine_arn(region: &str, account_id: &str, name: &str) -> String {
  format!("arn:aws:states:{}:{}:stateMachine:{}", region, account_id, name)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_state_machine_arn() {
    assert_eq!(
      state_machine_arn("eu-west-1", "000000000000", "stack-discover"),
      "arn:aws:states:eu-west-1:000000000000:stateMachine:stack-discover"
    );
  }
}
