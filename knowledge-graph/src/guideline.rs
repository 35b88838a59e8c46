//! Guideline graph: Chapter → Section → Recommendation.

use neo4rs::query;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{GraphClient, GraphError};

/// Evidence rows for a set of recommendation ids.
pub const GUIDELINE_QUERY: &str = "
MATCH (ch:Chapter)-[:HAS_SECTION]->(sec:Section)-[:HAS_RECOMMENDATION]->(reco:Recommendation)
WHERE reco.id IN $doc_ids
RETURN ch.title AS chapter_title, reco.content AS content
";

/// Every recommendation with text, used when (re)building the vector index.
pub const ALL_RECOMMENDATIONS_QUERY: &str = "
MATCH (ch:Chapter)-[:HAS_SECTION]->(:Section)-[:HAS_RECOMMENDATION]->(reco:Recommendation)
WHERE reco.id IS NOT NULL AND reco.content IS NOT NULL
RETURN reco.id AS id, ch.title AS chapter_title, reco.content AS content
ORDER BY id
";

/// One recommendation with the chapter it belongs to.
///
/// `chapter_title` is `None` for a chapter without a title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuidelineRow {
    pub chapter_title: Option<String>,
    pub content: String,
}

/// A recommendation as a document for embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationDoc {
    pub id: String,
    pub chapter_title: Option<String>,
    pub content: String,
}

impl RecommendationDoc {
    /// Text that gets embedded: chapter title (when present) gives the
    /// recommendation its topic.
    pub fn embedding_text(&self) -> String {
        match self.chapter_title.as_deref().map(str::trim) {
            Some(chapter) if !chapter.is_empty() => {
                format!("{chapter}\n{}", self.content.trim())
            }
            _ => self.content.trim().to_string(),
        }
    }
}

/// Fetches chapter title and content for the given recommendation ids.
///
/// An empty id list returns no rows without touching the database.
pub async fn fetch_recommendations(
    client: &GraphClient,
    doc_ids: &[String],
) -> Result<Vec<GuidelineRow>, GraphError> {
    if doc_ids.is_empty() {
        debug!("fetch_recommendations: no ids, skipping query");
        return Ok(Vec::new());
    }

    let q = query(GUIDELINE_QUERY).param("doc_ids", doc_ids.to_vec());
    client.fetch_all(q, "guideline recommendations").await
}

/// Lists every recommendation that has an id and content.
pub async fn all_recommendations(
    client: &GraphClient,
) -> Result<Vec<RecommendationDoc>, GraphError> {
    client
        .fetch_all(query(ALL_RECOMMENDATIONS_QUERY), "all recommendations")
        .await
}

/// Joins every recommendation content with a single space.
pub fn joined_content(rows: &[GuidelineRow]) -> String {
    rows.iter()
        .map(|r| r.content.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_deserialize_from_column_names() {
        let row: GuidelineRow = serde_json::from_value(serde_json::json!({
            "chapter_title": "식사 치료",
            "content": "단백질 섭취를 유지한다."
        }))
        .unwrap();
        assert_eq!(row.chapter_title.as_deref(), Some("식사 치료"));
    }

    #[test]
    fn untitled_chapter_is_none() {
        let row: GuidelineRow = serde_json::from_value(serde_json::json!({
            "chapter_title": null,
            "content": "단백질 섭취를 유지한다."
        }))
        .unwrap();
        assert_eq!(row.chapter_title, None);
        assert_eq!(row.content, "단백질 섭취를 유지한다.");
    }

    #[test]
    fn joined_content_uses_single_spaces() {
        let rows = vec![
            GuidelineRow {
                chapter_title: Some("a".into()),
                content: "저열량 식사".into(),
            },
            GuidelineRow {
                chapter_title: None,
                content: "나트륨 제한".into(),
            },
        ];
        assert_eq!(joined_content(&rows), "저열량 식사 나트륨 제한");
        assert_eq!(joined_content(&[]), "");
    }

    #[test]
    fn guideline_query_is_parameterized() {
        assert!(GUIDELINE_QUERY.contains("reco.id IN $doc_ids"));
        assert!(GUIDELINE_QUERY.contains("AS chapter_title"));
    }

    #[test]
    fn embedding_text_includes_chapter() {
        let doc = RecommendationDoc {
            id: "R1".into(),
            chapter_title: Some(" 운동 치료 ".into()),
            content: "주 150분 이상".into(),
        };
        assert_eq!(doc.embedding_text(), "운동 치료\n주 150분 이상");

        let untitled = RecommendationDoc {
            chapter_title: None,
            ..doc
        };
        assert_eq!(untitled.embedding_text(), "주 150분 이상");
    }
}
