use crate::picker::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    #[serde(rename = "filePath")]
    pub file_path: Option<String>,
    pub provider: Option<String>,
    pub encoding: Option<String>,
    pub delimiter: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

/// When provided, the lists replace the default ones.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierSettings {
    #[serde(rename = "datePattern")]
    pub date_pattern: Option<String>,
    #[serde(rename = "excludedSubstrings")]
    pub excluded_substrings: Option<Vec<String>>,
    #[serde(rename = "excludedBrackets")]
    pub excluded_brackets: Option<Vec<(String, String)>>,
    #[serde(rename = "excludedLabels")]
    pub excluded_labels: Option<Vec<String>>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesSettings {
    pub predicates: Option<String>,
    pub ordering: Option<String>,
    #[serde(rename = "requiredParticipants")]
    pub required_participants: Option<usize>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionSettings {
    pub members: Option<Vec<String>>,
    pub scenario: Option<String>,
    pub host: Option<String>,
    pub pool: Option<Vec<String>>,
    pub day: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    pub source: SourceSettings,
    pub classifier: ClassifierSettings,
    pub rules: RulesSettings,
    pub selection: SelectionSettings,
}

pub fn read_config(path: &str) -> PickerResult<PickerConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: PickerConfig = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

pub fn read_summary(path: &str) -> PickerResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

pub fn validate_classifier(settings: &ClassifierSettings) -> PickerResult<ClassifierRules> {
    let mut rules = match &settings.date_pattern {
        Some(pattern) => {
            ClassifierRules::with_date_pattern(pattern).context(InvalidPatternSnafu { pattern })?
        }
        None => ClassifierRules::default(),
    };
    if let Some(l) = &settings.excluded_substrings {
        rules.excluded_substrings = l.clone();
    }
    if let Some(l) = &settings.excluded_brackets {
        rules.excluded_brackets = l.clone();
    }
    if let Some(l) = &settings.excluded_labels {
        rules.excluded_labels = l.clone();
    }
    Ok(rules)
}

pub fn validate_predicates(predicates: Option<&str>) -> PickerResult<PredicateSet> {
    match predicates {
        None | Some("atLeast") => Ok(PredicateSet::DEFAULT),
        Some("strict") => Ok(PredicateSet::STRICT),
        Some(x) => whatever!(
            "Cannot use predicates {:?}: expected atLeast or strict",
            x
        ),
    }
}

pub fn validate_ordering(ordering: Option<&str>) -> PickerResult<TierOrdering> {
    match ordering {
        None | Some("wildcard") => Ok(TierOrdering::Wildcard),
        Some("total") => Ok(TierOrdering::Total),
        Some(x) => whatever!(
            "Cannot use ordering {:?}: expected wildcard or total",
            x
        ),
    }
}

pub fn validate_provider(provider: &str) -> PickerResult<String> {
    match provider {
        "csv" | "xlsx" => Ok(provider.to_string()),
        x => whatever!("Provider not implemented {:?}: expected csv or xlsx", x),
    }
}

pub fn validate_delimiter(delimiter: Option<&str>) -> PickerResult<u8> {
    match delimiter {
        None => Ok(b','),
        Some("\\t") => Ok(b'\t'),
        Some(s) if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        Some(x) => whatever!("The delimiter must be a single ASCII character, got {:?}", x),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: PickerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, PickerConfig::default());
        let rules = validate_classifier(&config.classifier).unwrap();
        assert_eq!(rules.excluded_labels, vec!["最終更新日時".to_string()]);
    }

    #[test]
    fn classifier_lists_replace_defaults() {
        let config: PickerConfig = serde_json::from_str(
            r#"{"classifier": {"excludedLabels": ["コメント"], "excludedBrackets": [["[", "]"]]}}"#,
        )
        .unwrap();
        let rules = validate_classifier(&config.classifier).unwrap();
        assert_eq!(rules.excluded_labels, vec!["コメント".to_string()]);
        assert_eq!(
            rules.excluded_brackets,
            vec![("[".to_string(), "]".to_string())]
        );
        assert_eq!(rules.excluded_substrings, vec!["----".to_string()]);
        assert!(rules.is_excluded("[heading]"));
    }

    #[test]
    fn bad_date_pattern() {
        let settings = ClassifierSettings {
            date_pattern: Some("(".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            validate_classifier(&settings),
            Err(PickerError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn rule_options() {
        assert_eq!(validate_predicates(None).unwrap(), PredicateSet::DEFAULT);
        assert_eq!(
            validate_predicates(Some("strict")).unwrap(),
            PredicateSet::STRICT
        );
        assert!(validate_predicates(Some("loose")).is_err());
        assert_eq!(
            validate_ordering(Some("total")).unwrap(),
            TierOrdering::Total
        );
        assert!(validate_ordering(Some("partial")).is_err());
        assert_eq!(validate_delimiter(Some("\\t")).unwrap(), b'\t');
        assert_eq!(validate_delimiter(Some(";")).unwrap(), b';');
        assert!(validate_delimiter(Some("、")).is_err());
        assert!(validate_provider("ods").is_err());
    }
}
