//! GeoConsistencyMatrix: weighted-signal country inference and attribute checks.

use veritas_core::config::GeoConfig;
use veritas_core::models::{ClassificationHints, Country, FeatureSet, GeoDiagnostics, GeoProfile};

use crate::detectors::{registry, SignalHit, Strength};
use crate::evidence::{CheckStatus, ConsistencyCheck, GeoAssessment, GeoEvidence, GeoInference};
use crate::reference::{cross_border_markers, currency_regions, detect_tax_regimes};

/// Weight of the upstream geography hint.
const UPSTREAM_HINT_WEIGHT: f64 = 1.0;

struct RegionScore {
    country: Country,
    score: f64,
    strong: bool,
    hits: Vec<SignalHit>,
}

/// Infers a document's country and checks currency and tax regime against it.
#[derive(Debug, Clone, Default)]
pub struct GeoConsistencyMatrix {
    config: GeoConfig,
}

impl GeoConsistencyMatrix {
    pub fn new(config: GeoConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeoConfig {
        &self.config
    }

    /// Infer the issuing country from document text and an optional merchant name.
    pub fn infer(&self, text: &str, merchant_hint: Option<&str>) -> GeoInference {
        self.infer_with_hint(text, merchant_hint, None)
    }

    /// Like [`Self::infer`], with an upstream country guess counted as one weak signal.
    pub fn infer_with_hint(
        &self,
        text: &str,
        merchant_hint: Option<&str>,
        upstream: Option<Country>,
    ) -> GeoInference {
        let corpus = match merchant_hint {
            Some(merchant) => format!("{text}\n{merchant}"),
            None => text.to_string(),
        };

        let mut regions: Vec<RegionScore> = registry()
            .iter()
            .map(|detector| {
                let mut hits = (detector.detect)(&corpus);
                if upstream == Some(detector.country) {
                    hits.push(SignalHit {
                        name: "upstream_hint".to_string(),
                        weight: UPSTREAM_HINT_WEIGHT,
                        strength: Strength::Weak,
                        fragment: detector.country.as_str().to_string(),
                    });
                }
                RegionScore {
                    country: detector.country,
                    score: hits.iter().map(|h| h.weight).sum(),
                    strong: hits.iter().any(|h| h.strength == Strength::Strong),
                    hits,
                }
            })
            .collect();
        // Stable: ties keep registry order.
        regions.sort_by(|a, b| b.score.total_cmp(&a.score));

        let total: f64 = regions.iter().map(|r| r.score).sum();
        let region_scores: Vec<(Country, f64)> =
            regions.iter().map(|r| (r.country, r.score)).collect();

        let Some(winner) = regions.first().filter(|r| r.score > 0.0) else {
            return GeoInference {
                profile: GeoProfile::unknown(vec!["no geography signals".to_string()]),
                diagnostics: GeoDiagnostics {
                    raw_winner: Country::Unknown,
                    raw_score: 0.0,
                    raw_confidence: 0.0,
                    region_scores,
                },
                plausible: Vec::new(),
                hits: Vec::new(),
            };
        };

        let mut confidence = winner.score / self.config.denominator_floor.max(total);
        if confidence < self.config.low_confidence_cutoff {
            confidence *= self.config.low_confidence_penalty;
        }
        if !winner.strong {
            confidence = confidence.min(self.config.no_strong_signal_cap);
        }

        let mut evidence: Vec<String> = winner
            .hits
            .iter()
            .map(|h| format!("{}: {}", h.name, h.fragment))
            .collect();

        let profile = if winner.score < self.config.min_winner_score {
            evidence.push(format!(
                "winner score {:.1} below minimum {:.1}",
                winner.score, self.config.min_winner_score
            ));
            GeoProfile::unknown(evidence)
        } else {
            if confidence < self.config.unknown_floor {
                evidence.push(format!(
                    "confidence {:.3} below floor {:.3}",
                    confidence, self.config.unknown_floor
                ));
            }
            GeoProfile::gated(winner.country, confidence, evidence, self.config.unknown_floor)
        };

        let plausible_at = (winner.score * self.config.plausible_ratio).max(self.config.min_winner_score);
        let plausible: Vec<Country> = regions
            .iter()
            .filter(|r| r.strong && r.score >= plausible_at)
            .map(|r| r.country)
            .collect();

        tracing::debug!(
            winner = %winner.country,
            raw_score = winner.score,
            raw_confidence = confidence,
            gated = %profile.country(),
            plausible = plausible.len(),
            "geography inferred"
        );

        let diagnostics = GeoDiagnostics {
            raw_winner: winner.country,
            raw_score: winner.score,
            raw_confidence: confidence,
            region_scores,
        };
        let mut hits: Vec<(Country, Vec<SignalHit>)> = regions
            .into_iter()
            .filter(|r| !r.hits.is_empty())
            .map(|r| (r.country, r.hits))
            .collect();
        hits.sort_by_key(|(country, _)| *country);

        GeoInference {
            profile,
            diagnostics,
            plausible,
            hits,
        }
    }

    /// Infer geography for a document and check its currency and tax regime.
    pub fn assess(&self, features: &FeatureSet, hints: &ClassificationHints) -> GeoAssessment {
        let upstream = hints
            .geo_country
            .as_deref()
            .map(Country::from_code)
            .filter(Country::is_known);
        let inference = self.infer_with_hint(&features.text, features.merchant_name(), upstream);

        let markers = cross_border_markers(&features.text);
        let cross_border = inference.plausible.len() > 1 || !markers.is_empty();
        let country = inference.profile.country();

        let currency = self.check_currency(features, country, cross_border);
        let tax = self.check_tax(&features.text, country, cross_border);

        GeoAssessment {
            evidence: GeoEvidence {
                profile: inference.profile,
                plausible: inference.plausible,
                cross_border,
                cross_border_markers: markers,
                currency,
                tax,
            },
            diagnostics: inference.diagnostics,
        }
    }

    fn check_currency(&self, features: &FeatureSet, country: Country, cross_border: bool) -> ConsistencyCheck {
        if !country.is_known() {
            return ConsistencyCheck::unverifiable(country, "country unknown");
        }
        let Some(code) = features.currency_code() else {
            return ConsistencyCheck::unverifiable(country, "no currency detected");
        };
        let Some(regions) = currency_regions(&code) else {
            let mut check = ConsistencyCheck::unverifiable(country, "currency not in reference table");
            check.subject = Some(code);
            return check;
        };

        let (status, note) = if regions.contains(&country) {
            (CheckStatus::Consistent, format!("{code} is issued in {country}"))
        } else if cross_border {
            (
                CheckStatus::SuppressedCrossBorder,
                format!("{code} is not issued in {country}; cross-border document"),
            )
        } else {
            (CheckStatus::Mismatch, format!("{code} is not issued in {country}"))
        };
        ConsistencyCheck {
            status,
            subject: Some(code),
            expected: regions.to_vec(),
            detected: country,
            note,
        }
    }

    fn check_tax(&self, text: &str, country: Country, cross_border: bool) -> ConsistencyCheck {
        if !country.is_known() {
            return ConsistencyCheck::unverifiable(country, "country unknown");
        }
        let regimes = detect_tax_regimes(text);
        if regimes.is_empty() {
            return ConsistencyCheck::unverifiable(country, "no tax regime detected");
        }

        let foreign: Vec<_> = regimes
            .iter()
            .filter(|r| !r.regions().contains(&country))
            .copied()
            .collect();
        let checked = if foreign.is_empty() { &regimes } else { &foreign };

        let subject = checked.iter().map(|r| r.as_str()).collect::<Vec<_>>().join(",");
        let mut expected: Vec<Country> = checked.iter().flat_map(|r| r.regions().iter().copied()).collect();
        expected.sort();
        expected.dedup();

        let (status, note) = if foreign.is_empty() {
            (CheckStatus::Consistent, format!("{subject} is levied in {country}"))
        } else if cross_border {
            (
                CheckStatus::SuppressedCrossBorder,
                format!("{subject} is not levied in {country}; cross-border document"),
            )
        } else {
            (CheckStatus::Mismatch, format!("{subject} is not levied in {country}"))
        };
        ConsistencyCheck {
            status,
            subject: Some(subject),
            expected,
            detected: country,
            note,
        }
    }
}
