use biapp_clinical::catalog::{self, GroupKey, code};
use biapp_clinical::rules::{self, KpiRule, NumericRange, RangeViolation};
use biapp_clinical::value::{ParseError, RawValue, parse_value};
use biapp_core::models::evaluation::TypedValue;
use biapp_core::models::kpi::{KpiDefinition, KpiType};

fn kpi(code: &str, kpi_type: KpiType) -> KpiDefinition {
    KpiDefinition {
        id: 1,
        code: code.to_string(),
        name: "Some KPI".to_string(),
        description: Some("From the catalog".to_string()),
        kpi_type,
        min_value: None,
        max_value: None,
        unit: None,
    }
}

#[test]
fn rule_table_lists_the_overrides() {
    assert!(matches!(
        rules::rule_for(code::MEETS_CM_CRITERIA),
        Some(KpiRule::Select(options)) if options.len() == 3
    ));
    assert!(matches!(
        rules::rule_for(code::ACUTE_MEDICATION_TYPE),
        Some(KpiRule::Select(options)) if options.len() == 8
    ));
    assert_eq!(
        rules::rule_for(code::HEADACHE_DURATION_MONTHS),
        Some(&KpiRule::Bounds(NumericRange {
            min: Some(1.0),
            max: Some(240.0),
        }))
    );
    assert_eq!(rules::rule_for(code::HEADACHE_DAYS_MONTH), None);
}

#[test]
fn override_bounds_replace_catalog_bounds() {
    let history = KpiDefinition {
        min_value: Some(0.0),
        max_value: Some(12.0),
        ..kpi(code::HEADACHE_DURATION_MONTHS, KpiType::Integer)
    };
    let range = rules::effective_range(&history);
    assert_eq!(range.min, Some(1.0));
    assert_eq!(range.max, Some(240.0));

    let days = KpiDefinition {
        min_value: Some(0.0),
        max_value: Some(31.0),
        ..kpi(code::HEADACHE_DAYS_MONTH, KpiType::Integer)
    };
    assert_eq!(rules::effective_range(&days), NumericRange::declared(&days));
}

#[test]
fn range_violations() {
    let range = NumericRange {
        min: Some(1.0),
        max: Some(240.0),
    };
    assert!(range.contains(1.0));
    assert!(range.contains(240.0));
    assert_eq!(range.violations(0.5), vec![RangeViolation::BelowMin(1.0)]);
    assert_eq!(range.violations(241.0), vec![RangeViolation::AboveMax(240.0)]);

    let open = NumericRange::default();
    assert!(open.is_unbounded());
    assert!(open.contains(-1e9));
}

#[test]
fn range_hints() {
    let history = KpiDefinition {
        unit: Some("months".to_string()),
        ..kpi(code::HEADACHE_DURATION_MONTHS, KpiType::Integer)
    };
    assert_eq!(
        rules::range_hint(&history).as_deref(),
        Some("Range: 1 - 240 months")
    );

    let half_open = KpiDefinition {
        min_value: Some(0.0),
        ..kpi(code::DISABILITY_MIDAS, KpiType::Integer)
    };
    assert_eq!(
        rules::range_hint(&half_open).as_deref(),
        Some("Range: 0 - no max")
    );

    let unit_only = KpiDefinition {
        unit: Some("days".to_string()),
        ..kpi(code::MIGRAINE_DAYS_MONTH, KpiType::Integer)
    };
    assert_eq!(rules::range_hint(&unit_only).as_deref(), Some("Unit: days"));
    assert_eq!(rules::range_hint(&kpi("X", KpiType::Float)), None);
}

#[test]
fn select_parse_is_case_insensitive_and_canonical() {
    let criteria = kpi(code::MEETS_CM_CRITERIA, KpiType::Boolean);
    assert_eq!(
        parse_value(&criteria, Some(&"inconclusive".into())),
        Ok(Some(TypedValue::Text("INCONCLUSIVE".to_string())))
    );
    assert_eq!(parse_value(&criteria, Some(&"".into())), Ok(None));
    assert_eq!(parse_value(&criteria, None), Ok(None));
    assert_eq!(
        parse_value(&criteria, Some(&"MAYBE".into())),
        Err(ParseError::NotAnOption {
            allowed: vec!["YES", "NO", "INCONCLUSIVE"],
        })
    );
}

#[test]
fn boolean_parse_distinguishes_untouched_from_false() {
    let aura = kpi("AURA_PRESENCE", KpiType::Boolean);
    assert_eq!(parse_value(&aura, None), Ok(None));
    assert_eq!(
        parse_value(&aura, Some(&false.into())),
        Ok(Some(TypedValue::Boolean(false)))
    );
    assert_eq!(
        parse_value(&aura, Some(&"yes".into())),
        Ok(Some(TypedValue::Boolean(true)))
    );
    assert_eq!(
        parse_value(&aura, Some(&0.0.into())),
        Ok(Some(TypedValue::Boolean(false)))
    );
    assert_eq!(
        parse_value(&aura, Some(&2.0.into())),
        Ok(Some(TypedValue::Boolean(true)))
    );
    assert_eq!(
        parse_value(&aura, Some(&"perhaps".into())),
        Err(ParseError::NotABoolean)
    );
}

#[test]
fn numeric_parse() {
    let days = kpi(code::HEADACHE_DAYS_MONTH, KpiType::Integer);
    assert_eq!(
        parse_value(&days, Some(&" 12 ".into())),
        Ok(Some(TypedValue::Numeric(12.0)))
    );
    assert_eq!(parse_value(&days, Some(&"   ".into())), Ok(None));
    assert_eq!(
        parse_value(&days, Some(&"12 days".into())),
        Err(ParseError::NotANumber)
    );
    assert_eq!(
        parse_value(&days, Some(&"inf".into())),
        Err(ParseError::NotANumber)
    );
    assert_eq!(
        parse_value(&days, Some(&true.into())),
        Err(ParseError::NotANumber)
    );
}

#[test]
fn string_parse_keeps_text_verbatim() {
    let notes = kpi("TRIGGER_NOTES", KpiType::String);
    assert_eq!(
        parse_value(&notes, Some(&" chocolate ".into())),
        Ok(Some(TypedValue::Text(" chocolate ".to_string())))
    );
    assert_eq!(parse_value(&notes, Some(&"".into())), Ok(None));
}

#[test]
fn raw_values_decode_untagged() {
    let values: Vec<RawValue> = serde_json::from_str(r#"[true, 3.5, "YES"]"#).unwrap();
    assert_eq!(
        values,
        vec![RawValue::Bool(true), RawValue::Number(3.5), RawValue::Text("YES".into())]
    );
}

#[test]
fn groups_follow_display_order() {
    let catalog = vec![
        kpi(code::MEETS_CM_CRITERIA, KpiType::String),
        kpi("UNRELATED", KpiType::String),
        kpi(code::HEADACHE_DAYS_MONTH, KpiType::Integer),
        kpi(code::DISABILITY_MIDAS, KpiType::Integer),
    ];
    let grouped = catalog::group_catalog(&catalog);

    let keys: Vec<GroupKey> = grouped.groups.iter().map(|(g, _)| g.key).collect();
    assert_eq!(keys, vec![GroupKey::Frequency, GroupKey::Impact]);

    let frequency: Vec<&str> = grouped.groups[0].1.iter().map(|k| k.code.as_str()).collect();
    assert_eq!(
        frequency,
        vec![code::HEADACHE_DAYS_MONTH, code::MEETS_CM_CRITERIA]
    );
    assert_eq!(grouped.ungrouped.len(), 1);
    assert_eq!(grouped.ungrouped[0].code, "UNRELATED");
}

#[test]
fn display_overrides() {
    let criteria = kpi(code::MEETS_CM_CRITERIA, KpiType::String);
    assert!(catalog::display_name(&criteria).starts_with("On 8 or more days"));
    assert!(catalog::display_description(&criteria).is_some());

    let days = kpi(code::HEADACHE_DAYS_MONTH, KpiType::Integer);
    assert_eq!(catalog::display_name(&days), "Some KPI");
    assert_eq!(catalog::display_description(&days), Some("From the catalog"));
}
