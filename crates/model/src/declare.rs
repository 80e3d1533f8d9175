//! Declaration events produced by a model reader.
//!
//! A reader walks a model description and reports, in order, the declared
//! states, zero or more action blocks, and the transitions. Each transition
//! declaration may fan out to several `(weight, target)` branches sharing the
//! same source (and action, when present).

/// Receiver of model declaration events.
pub trait DeclarationSink {
    /// Error returned when an event is rejected.
    type Error;

    /// A state was declared, optionally with an integer reward.
    fn on_state_declared(&mut self, label: &str, reward: Option<i64>) -> Result<(), Self::Error>;

    /// A block of action labels was declared.
    fn on_actions_declared(&mut self, labels: &[&str]) -> Result<(), Self::Error>;

    /// A transition under a named action, fanning out to `branches`.
    fn on_transition_with_action(
        &mut self,
        source: &str,
        action: &str,
        branches: &[(u64, &str)],
    ) -> Result<(), Self::Error>;

    /// A transition without an action (Markov-chain edge), fanning out to `branches`.
    fn on_transition_no_action(
        &mut self,
        source: &str,
        branches: &[(u64, &str)],
    ) -> Result<(), Self::Error>;
}
