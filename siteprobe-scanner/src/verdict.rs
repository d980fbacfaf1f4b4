use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Live,
    Dead,
}

/// How convincing the evidence for a live verdict was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiveSignal {
    /// The body parsed as a collection of records.
    Strong,
    /// Success status, but the body was not recognizable.
    Weak,
}

/// Result of probing one candidate. Built once, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeVerdict {
    pub candidate_id: String,
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal: Option<LiveSignal>,
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl ProbeVerdict {
    pub fn live(
        candidate_id: String,
        signal: LiveSignal,
        attempts: u32,
        status_code: u16,
        last_error: Option<String>,
    ) -> Self {
        Self {
            candidate_id,
            outcome: Outcome::Live,
            signal: Some(signal),
            attempts,
            last_status_code: Some(status_code),
            last_error,
        }
    }

    pub fn dead(
        candidate_id: String,
        attempts: u32,
        last_status_code: Option<u16>,
        last_error: Option<String>,
    ) -> Self {
        Self {
            candidate_id,
            outcome: Outcome::Dead,
            signal: None,
            attempts,
            last_status_code,
            last_error,
        }
    }

    pub fn is_live(&self) -> bool {
        self.outcome == Outcome::Live
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_dead_verdict() {
        let verdict = ProbeVerdict::dead(
            "b".to_string(),
            3,
            None,
            Some("connection error: refused".to_string()),
        );
        let json = serde_json::to_string(&verdict).unwrap();
        assert!(json.contains(r#""outcome":"dead""#));
        assert!(json.contains(r#""attempts":3"#));
        assert!(!json.contains("signal"));
        assert!(!json.contains("last_status_code"));
    }

    #[test]
    fn test_live_verdict() {
        let verdict = ProbeVerdict::live("a".to_string(), LiveSignal::Weak, 2, 200, None);
        assert!(verdict.is_live());
        assert_eq!(verdict.signal, Some(LiveSignal::Weak));
        assert_eq!(verdict.last_status_code, Some(200));
    }
}
