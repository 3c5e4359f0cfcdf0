//! KPI codes known to the migraine evaluation and their logical grouping.

use biapp_core::models::kpi::KpiDefinition;
use serde::Serialize;

/// Stable KPI codes used by the evaluation rules.
pub mod code {
    pub const HEADACHE_DAYS_MONTH: &str = "HEADACHE_DAYS_MONTH";
    pub const MIGRAINE_DAYS_MONTH: &str = "MIGRAINE_DAYS_MONTH";
    pub const MEETS_CM_CRITERIA: &str = "MEETS_CM_CRITERIA";
    pub const HEADACHE_DURATION_MONTHS: &str = "HEADACHE_DURATION_MONTHS";
    pub const ACUTE_MEDICATION_DAYS_MONTH: &str = "ACUTE_MEDICATION_DAYS_MONTH";
    pub const ACUTE_MEDICATION_TYPE: &str = "ACUTE_MEDICATION_TYPE";
    pub const PAIN_INTENSITY_AVG: &str = "PAIN_INTENSITY_AVG";
    /// Older catalogs published pain intensity under this code.
    pub const PAIN_INTENSITY_VAS: &str = "PAIN_INTENSITY_VAS";
    pub const DISABILITY_MIDAS: &str = "DISABILITY_MIDAS";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    Frequency,
    PatternHistory,
    Treatment,
    Impact,
}

/// A logical cluster of KPIs shown and validated together.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct KpiGroup {
    pub key: GroupKey,
    pub title: &'static str,
    /// Member codes in display order.
    pub codes: &'static [&'static str],
}

pub const FREQUENCY: KpiGroup = KpiGroup {
    key: GroupKey::Frequency,
    title: "Frequency (last 30 days)",
    codes: &[
        code::HEADACHE_DAYS_MONTH,
        code::MIGRAINE_DAYS_MONTH,
        code::MEETS_CM_CRITERIA,
    ],
};

pub const PATTERN_HISTORY: KpiGroup = KpiGroup {
    key: GroupKey::PatternHistory,
    title: "Pattern history",
    codes: &[code::HEADACHE_DURATION_MONTHS],
};

pub const TREATMENT: KpiGroup = KpiGroup {
    key: GroupKey::Treatment,
    title: "Treatment / medication",
    codes: &[code::ACUTE_MEDICATION_DAYS_MONTH, code::ACUTE_MEDICATION_TYPE],
};

pub const IMPACT: KpiGroup = KpiGroup {
    key: GroupKey::Impact,
    title: "Severity / impact",
    codes: &[code::PAIN_INTENSITY_AVG, code::DISABILITY_MIDAS],
};

pub const GROUPS: [KpiGroup; 4] = [FREQUENCY, PATTERN_HISTORY, TREATMENT, IMPACT];

impl KpiGroup {
    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|c| *c == code)
    }

    /// Position of `code` within the group's display order.
    fn rank(&self, code: &str) -> usize {
        self.codes
            .iter()
            .position(|c| *c == code)
            .unwrap_or(usize::MAX)
    }

    /// Catalog members of this group, in the group's display order.
    pub fn members<'a>(&self, catalog: &'a [KpiDefinition]) -> Vec<&'a KpiDefinition> {
        let mut members: Vec<&KpiDefinition> =
            catalog.iter().filter(|k| self.contains(&k.code)).collect();
        members.sort_by_key(|k| self.rank(&k.code));
        members
    }
}

/// A catalog split by group, plus the KPIs outside every group.
pub struct GroupedCatalog<'a> {
    pub groups: Vec<(KpiGroup, Vec<&'a KpiDefinition>)>,
    pub ungrouped: Vec<&'a KpiDefinition>,
}

/// Split a catalog into its non-empty groups. KPIs outside every group keep
/// their catalog order.
pub fn group_catalog(catalog: &[KpiDefinition]) -> GroupedCatalog<'_> {
    let groups = GROUPS
        .iter()
        .map(|group| (*group, group.members(catalog)))
        .filter(|(_, members)| !members.is_empty())
        .collect();

    let ungrouped = catalog
        .iter()
        .filter(|k| !GROUPS.iter().any(|g| g.contains(&k.code)))
        .collect();

    GroupedCatalog { groups, ungrouped }
}

/// Display label and helper text overriding the catalog's wording.
pub struct DisplayOverride {
    pub name: &'static str,
    pub description: &'static str,
}

pub fn display_override(kpi_code: &str) -> Option<DisplayOverride> {
    match kpi_code {
        code::MEETS_CM_CRITERIA => Some(DisplayOverride {
            name: "On 8 or more days/month did the pain meet migraine criteria?",
            description: "Select per clinical judgement. Useful when \"migraine days/month\" is \
                          uncertain or incomplete.",
        }),
        _ => None,
    }
}

/// Name shown to the user for a KPI.
pub fn display_name(kpi: &KpiDefinition) -> &str {
    display_override(&kpi.code)
        .map(|o| o.name)
        .unwrap_or(kpi.name.as_str())
}

/// Helper text shown under a KPI, if any.
pub fn display_description(kpi: &KpiDefinition) -> Option<&str> {
    display_override(&kpi.code)
        .map(|o| o.description)
        .or(kpi.description.as_deref())
        .filter(|d| !d.trim().is_empty())
}
