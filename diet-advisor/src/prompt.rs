//! Prompt builder: guideline evidence + recipe block + fixed dietitian template.

use std::fmt::Write as _;

use knowledge_graph::{GuidelineRow, RecipeRow};

/// Dietitian instructions placed before the knowledge context.
pub const INSTRUCTIONS: &str = "당신은 비만 지침의 영양 기준을 엄격히 준수하는 AI 영양사입니다.
주어진 지침 근거를 먼저 설명하고, 영양 수치가 검증된 레시피를 추천하세요.";

pub const GUIDELINE_HEADER: &str = "[지침 근거]\n";
pub const RECIPE_HEADER: &str = "\n\n[영양 분석 기반 추천 식단]\n";
pub const NO_RECIPES: &str = "조건에 맞는 레시피를 찾지 못했습니다.";

/// Shown in place of a missing chapter, food or recipe title.
const MISSING_TEXT: &str = "정보 없음";
/// Shown in place of a missing nutrient value.
const MISSING_NUMBER: &str = "-";

/// `[지침 근거]` followed by one `- {chapter}: {content}` line per row.
pub fn guideline_section(rows: &[GuidelineRow]) -> String {
    let lines = rows
        .iter()
        .map(|r| {
            format!(
                "- {}: {}",
                text_or_missing(r.chapter_title.as_deref()),
                r.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!("{GUIDELINE_HEADER}{lines}")
}

/// Recipe blocks, each terminated by a blank line. Empty input yields an empty string.
pub fn recipe_section(rows: &[RecipeRow]) -> String {
    let mut out = String::new();
    for rec in rows {
        // Writing into a String cannot fail.
        let _ = write!(
            out,
            "- 추천 메뉴: {}\n- 주요 레시피: {}\n  * 주요 식재료: {}\n  * 영양분석: {}kcal, 단백질 {}g, 나트륨 {}mg\n\n",
            text_or_missing(rec.food_title.as_deref()),
            text_or_missing(rec.recipe_title.as_deref()),
            rec.ingredients.join(", "),
            number(rec.kcal),
            number(rec.protein),
            number(rec.sodium),
        );
    }
    out
}

/// Full knowledge context handed to the model.
///
/// ```
/// use diet_advisor::prompt::knowledge_context;
/// let ctx = knowledge_context(&[], &[]);
/// assert!(ctx.ends_with("조건에 맞는 레시피를 찾지 못했습니다."));
/// ```
pub fn knowledge_context(guidelines: &[GuidelineRow], recipes: &[RecipeRow]) -> String {
    let recipes = recipe_section(recipes);
    let body = if recipes.is_empty() {
        NO_RECIPES.to_string()
    } else {
        recipes
    };
    format!("{}{RECIPE_HEADER}{body}", guideline_section(guidelines))
}

/// Instructions, then the context, then `질문: {question}`.
///
/// Both inputs are inserted verbatim; braces in user text are not placeholders.
pub fn render(context: &str, question: &str) -> String {
    format!("{INSTRUCTIONS}\n{context}\n질문: {question}")
}

fn text_or_missing(v: Option<&str>) -> &str {
    match v {
        Some(s) if !s.trim().is_empty() => s,
        _ => MISSING_TEXT,
    }
}

/// Whole numbers print without a fractional part (`350`, not `350.0`).
fn number(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() && x.fract() == 0.0 => format!("{x:.0}"),
        Some(x) => x.to_string(),
        None => MISSING_NUMBER.to_string(),
    }
}
