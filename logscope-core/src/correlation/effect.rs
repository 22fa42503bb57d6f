use super::CorrelationState;
use crate::explorer::Effect;

/// A fetch for one correlated stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEffect {
    pub stream: String,
    pub effect: Effect,
}

impl StreamEffect {
    pub fn sql(&self) -> &str {
        self.effect.sql()
    }

    pub fn is_count(&self) -> bool {
        matches!(self.effect, Effect::FetchCount { .. })
    }
}

#[derive(Debug, Clone)]
pub struct CorrelationTransition {
    pub state: CorrelationState,
    pub effects: Vec<StreamEffect>,
}
