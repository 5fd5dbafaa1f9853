//! 固定选项目录
//!
//! 表单下拉框使用的取值与阿拉伯语标签。

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    #[default]
    Residential,
    Commercial,
    Industrial,
    Mixed,
}

impl PropertyType {
    pub const ALL: [PropertyType; 4] = [
        PropertyType::Residential,
        PropertyType::Commercial,
        PropertyType::Industrial,
        PropertyType::Mixed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Residential => "residential",
            PropertyType::Commercial => "commercial",
            PropertyType::Industrial => "industrial",
            PropertyType::Mixed => "mixed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PropertyType::Residential => "سكني",
            PropertyType::Commercial => "تجاري",
            PropertyType::Industrial => "صناعي",
            PropertyType::Mixed => "مختلط",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageCategory {
    #[default]
    Exterior,
    Interior,
    Structural,
    Electrical,
    Plumbing,
    Hvac,
    Defects,
    Thermal,
}

impl ImageCategory {
    pub const ALL: [ImageCategory; 8] = [
        ImageCategory::Exterior,
        ImageCategory::Interior,
        ImageCategory::Structural,
        ImageCategory::Electrical,
        ImageCategory::Plumbing,
        ImageCategory::Hvac,
        ImageCategory::Defects,
        ImageCategory::Thermal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageCategory::Exterior => "exterior",
            ImageCategory::Interior => "interior",
            ImageCategory::Structural => "structural",
            ImageCategory::Electrical => "electrical",
            ImageCategory::Plumbing => "plumbing",
            ImageCategory::Hvac => "hvac",
            ImageCategory::Defects => "defects",
            ImageCategory::Thermal => "thermal",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ImageCategory::Exterior => "الخارج",
            ImageCategory::Interior => "الداخل",
            ImageCategory::Structural => "إنشائية",
            ImageCategory::Electrical => "كهربائية",
            ImageCategory::Plumbing => "سباكة",
            ImageCategory::Hvac => "تكييف وتهوية",
            ImageCategory::Defects => "عيوب",
            ImageCategory::Thermal => "تصوير حراري",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Normal,
        Priority::High,
        Priority::Urgent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "منخفضة",
            Priority::Normal => "عادية",
            Priority::High => "عالية",
            Priority::Urgent => "عاجلة",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_matches_wire_names() {
        for t in PropertyType::ALL {
            assert_eq!(PropertyType::parse(t.as_str()), Some(t));
        }
        assert_eq!(ImageCategory::parse("hvac"), Some(ImageCategory::Hvac));
        assert_eq!(Priority::parse("urgent"), Some(Priority::Urgent));
        assert_eq!(PropertyType::parse("castle"), None);
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let v = serde_json::to_value(ImageCategory::Thermal).unwrap();
        assert_eq!(v, serde_json::json!("thermal"));
    }
}
