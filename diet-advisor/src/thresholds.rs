//! Keyword rules that turn guideline text into recipe nutrient limits.

use knowledge_graph::NutrientLimits;

/// Limits used when no keyword matches.
pub const RELAXED: NutrientLimits = NutrientLimits {
    min_protein_g: 0,
    max_sodium_mg: 2000,
    max_kcal: 2000,
};

const PROTEIN_KEYWORDS: [&str; 2] = ["단백질", "근감소"];
const SODIUM_KEYWORDS: [&str; 2] = ["나트륨", "어르신"];
const KCAL_KEYWORDS: [&str; 2] = ["저열량", "비만"];

fn mentions(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// Derives limits from the joined guideline contents.
///
/// Each rule is independent; substring matching only, no stemming.
///
/// ```
/// use diet_advisor::thresholds::derive_limits;
/// let limits = derive_limits("어르신은 단백질 섭취를 늘린다");
/// assert_eq!(limits.min_protein_g, 20);
/// assert_eq!(limits.max_sodium_mg, 500);
/// assert_eq!(limits.max_kcal, 2000);
/// ```
pub fn derive_limits(guideline_text: &str) -> NutrientLimits {
    NutrientLimits {
        min_protein_g: if mentions(guideline_text, &PROTEIN_KEYWORDS) {
            20
        } else {
            RELAXED.min_protein_g
        },
        max_sodium_mg: if mentions(guideline_text, &SODIUM_KEYWORDS) {
            500
        } else {
            RELAXED.max_sodium_mg
        },
        max_kcal: if mentions(guideline_text, &KCAL_KEYWORDS) {
            600
        } else {
            RELAXED.max_kcal
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_relaxed() {
        assert_eq!(derive_limits(""), RELAXED);
    }

    #[test]
    fn every_rule_can_fire() {
        let limits = derive_limits("근감소 예방, 나트륨 제한, 저열량 식사");
        assert_eq!(
            limits,
            NutrientLimits {
                min_protein_g: 20,
                max_sodium_mg: 500,
                max_kcal: 600,
            }
        );
    }

    #[test]
    fn obesity_alone_only_tightens_kcal() {
        let limits = derive_limits("비만 환자의 체중 감량");
        assert_eq!(limits.min_protein_g, 0);
        assert_eq!(limits.max_sodium_mg, 2000);
        assert_eq!(limits.max_kcal, 600);
    }

    #[test]
    fn unrelated_text_does_not_match() {
        assert_eq!(derive_limits("규칙적인 운동을 권고한다"), RELAXED);
    }
}
