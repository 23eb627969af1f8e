//! Per-principal trust engine (§4.8): an append-only outcome log and the
//! exponentially decaying composite score it feeds. Scores are always
//! derived from the log, never stored.

use std::collections::HashMap;

use delegation_core::{PrincipalId, Timestamp};

use crate::types::Attestation;

#[derive(Clone, Debug, PartialEq)]
pub struct TrustOutcome {
    pub timestamp: Timestamp,
    pub success: bool,
    pub quality_score: f64,
    pub duration_ms: u64,
    pub contract_id: String,
    pub attestation_id: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrustProfile {
    pub outcomes: Vec<TrustOutcome>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrustScore {
    pub composite: f64,
    pub reliability: f64,
    pub quality: f64,
    pub speed: f64,
    pub confidence: f64,
    pub total_outcomes: usize,
}

#[derive(Clone, Debug)]
pub struct TrustEngineConfig {
    pub half_life_ms: f64,
    pub expected_duration_ms: f64,
    pub min_outcomes_for_confidence: f64,
    pub cold_start_score: f64,
}

impl Default for TrustEngineConfig {
    fn default() -> Self {
        Self {
            half_life_ms: 7.0 * 24.0 * 60.0 * 60.0 * 1000.0,
            expected_duration_ms: 60_000.0,
            min_outcomes_for_confidence: 10.0,
            cold_start_score: 0.5,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct TrustEngine {
    profiles: HashMap<PrincipalId, TrustProfile>,
    config: TrustEngineConfig,
}

impl TrustEngine {
    pub fn new(config: TrustEngineConfig) -> Self {
        Self {
            profiles: HashMap::new(),
            config,
        }
    }

    /// Appends a `TrustOutcome` derived from `attestation`'s result.
    /// `quality_score` defaults to `verification_outcome.score` when
    /// present, else `1.0` on success and `0.0` on failure (§4.8).
    pub fn record_outcome(&mut self, principal: PrincipalId, attestation: &Attestation) {
        let quality_score = attestation
            .result
            .verification_outcome
            .as_ref()
            .and_then(|v| v.score)
            .unwrap_or(if attestation.result.success { 1.0 } else { 0.0 });

        let outcome = TrustOutcome {
            timestamp: attestation.created_at.clone(),
            success: attestation.result.success,
            quality_score,
            duration_ms: attestation.result.duration_ms,
            contract_id: attestation.contract_id.clone(),
            attestation_id: attestation.id.clone(),
        };
        self.profiles.entry(principal).or_default().outcomes.push(outcome);
    }

    /// Cold-start principals (no profile, or an empty outcome log) get the
    /// configured cold-start score on every axis and zero confidence.
    pub fn get_score(&self, principal: &PrincipalId, now: &Timestamp) -> TrustScore {
        let Some(profile) = self.profiles.get(principal) else {
            return self.cold_start();
        };
        if profile.outcomes.is_empty() {
            return self.cold_start();
        }

        let now_millis = parse_millis(now);
        let decay = std::f64::consts::LN_2 / self.config.half_life_ms;

        let mut weight_sum = 0.0_f64;
        let mut reliability_sum = 0.0_f64;
        let mut quality_sum = 0.0_f64;
        let mut speed_sum = 0.0_f64;

        for outcome in &profile.outcomes {
            let age_ms = (now_millis - parse_millis(&outcome.timestamp)).max(0.0);
            let weight = (-decay * age_ms).exp();
            weight_sum += weight;
            reliability_sum += weight * if outcome.success { 1.0 } else { 0.0 };
            quality_sum += weight * outcome.quality_score;
            let speed_component = (self.config.expected_duration_ms / (outcome.duration_ms as f64).max(1.0)).min(1.0);
            speed_sum += weight * speed_component;
        }

        let reliability = safe_div(reliability_sum, weight_sum);
        let quality = safe_div(quality_sum, weight_sum);
        let speed = safe_div(speed_sum, weight_sum);
        let confidence = (profile.outcomes.len() as f64 / self.config.min_outcomes_for_confidence).min(1.0);
        let composite = (0.4 * reliability + 0.4 * quality + 0.2 * speed).clamp(0.0, 1.0);

        TrustScore {
            composite,
            reliability: reliability.clamp(0.0, 1.0),
            quality: quality.clamp(0.0, 1.0),
            speed: speed.clamp(0.0, 1.0),
            confidence,
            total_outcomes: profile.outcomes.len(),
        }
    }

    /// `composite >= min_score`. Unknown principals return the cold-start
    /// score, so thresholds at or below it are trivially satisfied.
    pub fn meets_threshold(&self, principal: &PrincipalId, min_score: f64, now: &Timestamp) -> bool {
        self.get_score(principal, now).composite >= min_score
    }

    fn cold_start(&self) -> TrustScore {
        TrustScore {
            composite: self.config.cold_start_score,
            reliability: self.config.cold_start_score,
            quality: self.config.cold_start_score,
            speed: self.config.cold_start_score,
            confidence: 0.0,
            total_outcomes: 0,
        }
    }
}

fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Parses an RFC 3339 timestamp to milliseconds since the epoch. Malformed
/// timestamps are treated as epoch zero rather than panicking — the trust
/// engine is read-mostly and must never crash a caller's scoring pass.
fn parse_millis(ts: &Timestamp) -> f64 {
    chrono::DateTime::parse_from_rfc3339(ts.as_str())
        .map(|dt| dt.timestamp_millis() as f64)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attestation::create_completion_attestation;
    use crate::types::AttestationResult;
    use delegation_crypto::generate_keypair;

    fn outcome_attestation(success: bool, duration_ms: u64, created_at: &str) -> Attestation {
        let signer = generate_keypair(None);
        let mut att = create_completion_attestation(
            &signer,
            "ct_1",
            "del_1",
            AttestationResult {
                success,
                cost_microcents: 10,
                duration_ms,
                output: None,
                output_hash: None,
                verification_outcome: None,
            },
            vec![],
        )
        .unwrap();
        att.created_at = Timestamp(created_at.into());
        att
    }

    #[test]
    fn cold_start_is_exact_and_deterministic() {
        let engine = TrustEngine::new(TrustEngineConfig::default());
        let unknown = PrincipalId::from("unknown");
        let score = engine.get_score(&unknown, &Timestamp::now());
        assert_eq!(score.composite, 0.5);
        assert_eq!(score.reliability, 0.5);
        assert_eq!(score.quality, 0.5);
        assert_eq!(score.speed, 0.5);
        assert_eq!(score.confidence, 0.0);
        assert_eq!(score.total_outcomes, 0);
    }

    #[test]
    fn ten_successes_then_one_failure_s6() {
        let mut engine = TrustEngine::new(TrustEngineConfig::default());
        let principal = PrincipalId::from("principal-p");
        let now = Timestamp("2026-01-10T00:00:00.000Z".into());

        for _ in 0..10 {
            let att = outcome_attestation(true, 1000, "2026-01-09T00:00:00.000Z");
            engine.record_outcome(principal.clone(), &att);
        }
        let score = engine.get_score(&principal, &now);
        assert!(score.composite >= 0.9, "composite was {}", score.composite);
        assert_eq!(score.confidence, 1.0);

        let failure = outcome_attestation(false, 1000, "2026-01-09T12:00:00.000Z");
        engine.record_outcome(principal.clone(), &failure);
        let score_after_failure = engine.get_score(&principal, &now);
        assert!(score_after_failure.reliability < 1.0);
        assert!(score_after_failure.composite > 0.5);
    }

    #[test]
    fn composite_is_the_weighted_average_within_tolerance() {
        let mut engine = TrustEngine::new(TrustEngineConfig::default());
        let principal = PrincipalId::from("principal-q");
        let now = Timestamp("2026-01-01T00:00:00.000Z".into());
        let att = outcome_attestation(true, 60_000, "2026-01-01T00:00:00.000Z");
        engine.record_outcome(principal.clone(), &att);

        let score = engine.get_score(&principal, &now);
        let expected = 0.4 * score.reliability + 0.4 * score.quality + 0.2 * score.speed;
        assert!((score.composite - expected).abs() < 1e-9);
    }

    #[test]
    fn all_axes_stay_within_unit_interval() {
        let mut engine = TrustEngine::new(TrustEngineConfig::default());
        let principal = PrincipalId::from("principal-r");
        for i in 0..5 {
            let att = outcome_attestation(i % 2 == 0, 200_000, "2020-01-01T00:00:00.000Z");
            engine.record_outcome(principal.clone(), &att);
        }
        let score = engine.get_score(&principal, &Timestamp::now());
        for v in [score.composite, score.reliability, score.quality, score.speed, score.confidence] {
            assert!((0.0..=1.0).contains(&v), "{v} out of range");
        }
    }

    #[test]
    fn meets_threshold_trivially_satisfied_for_unknown_principal() {
        let engine = TrustEngine::new(TrustEngineConfig::default());
        let unknown = PrincipalId::from("unknown");
        assert!(engine.meets_threshold(&unknown, 0.5, &Timestamp::now()));
        assert!(!engine.meets_threshold(&unknown, 0.51, &Timestamp::now()));
    }
}
