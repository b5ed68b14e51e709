//! Derived metric calculation: the per-record composites every view reads.
//!
//! Two positive/negative definitions coexist across views and are kept as
//! named variants rather than unified; callers pick one per
//! [`ScoreVariant`]. Both are computed once per record at normalization
//! time and cached on it.

use crate::core::metrics::mean;
use crate::core::{
    DerivedScores, Identity, IdentityFlags, IntersectionalCategory, Pillar, PillarScores,
    PrecomputedScores, SurveyResponses, SyntheticNegative,
};

/// Signed-split scores for one pillar: positive is the mean of the answers
/// greater than zero, negative the magnitude of the mean of the answers
/// below zero. An empty sign-subset collapses to `0.0` — the documented
/// sentinel for "no responses on this side".
pub fn signed_split(values: &[f64; 5]) -> PillarScores {
    let positives: Vec<f64> = values.iter().copied().filter(|v| *v > 0.0).collect();
    let negatives: Vec<f64> = values.iter().copied().filter(|v| *v < 0.0).collect();

    PillarScores {
        positive: mean(&positives).unwrap_or(0.0),
        negative: mean(&negatives).map(f64::abs).unwrap_or(0.0),
    }
}

/// All-mean positive score for one pillar: the mean of every parseable
/// answer, sign included. All-NaN input collapses to `0.0`.
pub fn all_mean_positive(values: &[f64; 5]) -> f64 {
    mean(values).unwrap_or(0.0)
}

/// Compute both score variants for all three pillars.
///
/// Under the all-mean variant a precomputed source column always wins over
/// the question-derived value; a missing negative column is filled with the
/// configured deterministic synthetic mode.
pub fn derive_scores(
    responses: &SurveyResponses,
    precomputed: &PrecomputedScores,
    synthetic: SyntheticNegative,
) -> DerivedScores {
    let mut scores = DerivedScores::default();

    for pillar in Pillar::ALL {
        let idx = pillar.index();
        let answers = responses.pillar(pillar);

        scores.signed_split[idx] = signed_split(answers);

        let positive = precomputed.positive[idx].unwrap_or_else(|| all_mean_positive(answers));
        let negative = precomputed.negative[idx].unwrap_or(match synthetic {
            SyntheticNegative::Zero => 0.0,
            SyntheticNegative::MirrorPositive => positive,
        });
        scores.all_mean[idx] = PillarScores { positive, negative };
    }

    scores
}

/// Coarse intersectional bucket. Named two-flag pairs are checked before
/// the generic `Multiple` case; the single-flag branch follows the fixed
/// priority order LGBTQ, Minority, Disability, Indigenous, Veteran.
pub fn intersectional_category(flags: &IdentityFlags) -> IntersectionalCategory {
    match flags.count() {
        0 => IntersectionalCategory::None,
        1 => {
            if flags.lgbtq {
                IntersectionalCategory::Lgbtq
            } else if flags.minority {
                IntersectionalCategory::Minority
            } else if flags.disability {
                IntersectionalCategory::Disability
            } else if flags.indigenous {
                IntersectionalCategory::Indigenous
            } else {
                IntersectionalCategory::Veteran
            }
        }
        2 => {
            if flags.lgbtq && flags.minority {
                IntersectionalCategory::LgbtqMinority
            } else if flags.disability && flags.veteran {
                IntersectionalCategory::DisabilityVeteran
            } else {
                IntersectionalCategory::Multiple
            }
        }
        _ => IntersectionalCategory::Multiple,
    }
}

/// Joined identity label used as an intersectional grouping key, e.g.
/// `"Minority + LGBTQ+"`. Records with no active flag fall into
/// `"Majority Group"`.
pub fn intersection_label(flags: &IdentityFlags) -> String {
    const LABEL_ORDER: [(Identity, &str); 5] = [
        (Identity::Minority, "Minority"),
        (Identity::Lgbtq, "LGBTQ+"),
        (Identity::Disability, "Disability"),
        (Identity::Indigenous, "Indigenous"),
        (Identity::Veteran, "Veteran"),
    ];

    let identities: Vec<&str> = LABEL_ORDER
        .iter()
        .filter(|(identity, _)| flags.has(*identity))
        .map(|(_, label)| *label)
        .collect();

    if identities.is_empty() {
        "Majority Group".to_string()
    } else {
        identities.join(" + ")
    }
}
