//! AI 分析结果
//!
//! 单张图片的缺陷检测 / 沙特建筑规范符合度 / 修复建议。
//! 所有字段都可能缺失或为 `null`，缺失的列表按空列表处理。

use serde::{Deserialize, Deserializer, Serialize};

/// 字段缺失或为 `null` 时取默认值
fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(d).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisPayload {
    #[serde(default)]
    pub confidence_score: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub detected_issues: Vec<DetectedIssue>,
    #[serde(default)]
    pub saudi_code_compliance: Option<CodeCompliance>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub suggested_fixes: Vec<SuggestedFix>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedIssue {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub severity: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub confidence: f64,
}

impl DetectedIssue {
    pub fn severity_label(&self) -> &str {
        match self.severity.as_str() {
            "critical" => "حرج",
            "high" => "عالي",
            "medium" => "متوسط",
            "low" => "منخفض",
            other => other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeCompliance {
    pub overall_grade: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub compliance_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedFix {
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub estimated_cost: f64,
}

impl AnalysisPayload {
    /// 置信度百分比（后端返回 0..1）
    pub fn confidence_percent(&self) -> Option<f64> {
        self.confidence_score.map(|c| (c * 100.0).round())
    }

    pub fn total_estimated_cost(&self) -> f64 {
        self.suggested_fixes.iter().map(|f| f.estimated_cost).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.confidence_score.is_none()
            && self.detected_issues.is_empty()
            && self.saudi_code_compliance.is_none()
            && self.suggested_fixes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_full_payload() {
        let payload: AnalysisPayload = serde_json::from_value(json!({
            "confidence_score": 0.873,
            "detected_issues": [
                { "type": "crack", "severity": "high", "description": "شرخ في الجدار", "confidence": 0.9 }
            ],
            "saudi_code_compliance": { "overall_grade": "B", "compliance_percentage": 78.5 },
            "suggested_fixes": [
                { "description": "حقن إيبوكسي", "estimated_cost": 1200.0 },
                { "description": "إعادة لياسة", "estimated_cost": 300.0 }
            ]
        }))
        .unwrap();

        assert_eq!(payload.confidence_percent(), Some(87.0));
        assert_eq!(payload.detected_issues[0].kind, "crack");
        assert_eq!(payload.detected_issues[0].severity_label(), "عالي");
        assert_eq!(payload.total_estimated_cost(), 1500.0);
    }

    #[test]
    fn test_missing_fields_decode_as_empty() {
        let payload: AnalysisPayload = serde_json::from_value(json!({})).unwrap();
        assert!(payload.is_empty());
    }

    #[test]
    fn test_null_fields_decode_as_defaults() {
        let payload: AnalysisPayload = serde_json::from_str(
            r#"{"confidence_score":0.8,"detected_issues":null,"saudi_code_compliance":null,"suggested_fixes":null}"#,
        )
        .unwrap();
        assert_eq!(payload.confidence_percent(), Some(80.0));
        assert!(payload.detected_issues.is_empty());
        assert!(payload.suggested_fixes.is_empty());
        assert!(payload.saudi_code_compliance.is_none());

        let nested: AnalysisPayload = serde_json::from_value(json!({
            "confidence_score": null,
            "detected_issues": [
                { "type": "leak", "severity": null, "description": null, "confidence": null }
            ],
            "saudi_code_compliance": { "overall_grade": "C", "compliance_percentage": null },
            "suggested_fixes": [ { "description": "عزل", "estimated_cost": null } ]
        }))
        .unwrap();
        assert_eq!(nested.confidence_score, None);
        assert_eq!(nested.detected_issues[0].confidence, 0.0);
        assert_eq!(nested.detected_issues[0].severity, "");
        assert_eq!(nested.saudi_code_compliance.unwrap().compliance_percentage, 0.0);
        assert_eq!(nested.total_estimated_cost(), 0.0);
    }
}
