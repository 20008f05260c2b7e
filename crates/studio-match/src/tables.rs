use studio_core::types::{Dimension, Dynasty};

/// Fixed lookup data for domain-term detection.
///
/// Read-only; build your own for tests or use [`DomainTables::standard`].
#[derive(Debug, Clone, Copy)]
pub struct DomainTables {
    pub dynasties: &'static [Dynasty],
    pub dimensions: &'static [Dimension],
    /// Per-dimension substrings checked after the literal labels.
    pub dimension_hints: &'static [(Dimension, &'static [&'static str])],
}

static DIMENSION_HINTS: [(Dimension, &[&str]); 8] = [
    (Dimension::Fiscal, &["税", "财政", "预算", "债", "债务", "货币", "银", "金", "通胀", "物价"]),
    (Dimension::Power, &["权力", "官员", "官场", "领导", "权斗", "反腐", "巡视"]),
    (Dimension::Institutions, &["制度", "改革", "政策", "立法", "条例", "监管", "规则", "机制"]),
    (Dimension::PublicOpinion, &["舆论", "热搜", "媒体", "网民", "流量", "公关", "辟谣"]),
    (Dimension::Livelihood, &["民生", "就业", "工资", "社保", "教育", "医疗", "房价", "租房", "消费"]),
    (Dimension::War, &["战争", "军", "兵", "冲突", "战场", "导弹", "武器", "入侵"]),
    (Dimension::Diplomacy, &["外交", "谈判", "条约", "制裁", "签证", "峰会", "使馆", "大使"]),
    (Dimension::Technology, &["技术", "ai", "芯片", "算法", "开源", "网络安全", "数据", "隐私"]),
];

static STANDARD: DomainTables = DomainTables {
    dynasties: Dynasty::ALL,
    dimensions: Dimension::ALL,
    dimension_hints: &DIMENSION_HINTS,
};

impl DomainTables {
    pub fn standard() -> &'static DomainTables {
        &STANDARD
    }

    /// Eras whose label occurs in `text`. `text` must already be lowercased.
    pub fn detect_dynasties(&self, text: &str) -> Vec<Dynasty> {
        self.dynasties
            .iter()
            .copied()
            .filter(|d| text.contains(&d.label().to_lowercase()))
            .collect()
    }

    /// Dimensions named literally in `text`, then those with a hint present.
    /// Each dimension appears once, at its first detection.
    pub fn detect_dimensions(&self, text: &str) -> Vec<Dimension> {
        let literal = self
            .dimensions
            .iter()
            .copied()
            .filter(|d| text.contains(&d.label().to_lowercase()));
        let hinted = self
            .dimension_hints
            .iter()
            .filter(|(_, words)| words.iter().any(|w| text.contains(w)))
            .map(|(d, _)| *d);

        let mut out: Vec<Dimension> = Vec::new();
        for d in literal.chain(hinted) {
            if !out.contains(&d) {
                out.push(d);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_labels_come_before_hints() {
        let dims = DomainTables::standard().detect_dimensions("外交部就芯片出口发表声明");
        assert_eq!(dims, vec![Dimension::Diplomacy, Dimension::Technology]);

        let dims = DomainTables::standard().detect_dimensions("货币与战争");
        assert_eq!(dims, vec![Dimension::War, Dimension::Fiscal]);
    }

    #[test]
    fn hint_match_is_deduplicated() {
        let dims = DomainTables::standard().detect_dimensions("财政 预算 税");
        assert_eq!(dims, vec![Dimension::Fiscal]);
    }

    #[test]
    fn dynasty_needs_full_label() {
        let tables = DomainTables::standard();
        assert!(tables.detect_dynasties("宋朝争议").is_empty());
        assert_eq!(tables.detect_dynasties("宋元之际与明清"), vec![Dynasty::SongYuan, Dynasty::MingQing]);
    }
}
