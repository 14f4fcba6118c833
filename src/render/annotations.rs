use crate::ir::{Individual, PregnancyKind, Status};
use once_cell::sync::Lazy;
use regex::Regex;

/// Ages that already read as a date or event marker and take no unit.
static DATED_AGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(d\.|b\.|lmp|edd)").unwrap());
static UNIT_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ymdw]$").unwrap());
static AGE_LIKE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^([0-9]|b\.|d\.)").unwrap());

/// Splits text into fixed-width chunks.
pub(crate) fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }
    if max_chars == 0 {
        return vec![text.to_string()];
    }
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(max_chars)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Appends `unit` to a bare age such as `"56"`.
pub(crate) fn with_age_unit(age: &str, unit: &str) -> String {
    let age = age.trim();
    if age.is_empty() || DATED_AGE_RE.is_match(age) || UNIT_SUFFIX_RE.is_match(age) {
        return age.to_string();
    }
    format!("{age}{unit}")
}

pub(crate) fn is_ectopic(person: &Individual) -> bool {
    person.has(Status::Ectopic)
        || person
            .pregnancy
            .as_ref()
            .is_some_and(|p| p.kind == Some(PregnancyKind::Ectopic))
}

/// Text lines printed under a symbol, top to bottom.
pub(crate) fn annotation_lines(person: &Individual, wrap_chars: usize) -> Vec<String> {
    let pregnancy = person.pregnancy.clone().unwrap_or_default();
    let mut below = Vec::new();

    if let Some(sex_at_birth) = &person.sex_at_birth {
        below.push(sex_at_birth.clone());
    }
    if person.has(Status::Stillbirth) {
        below.push("SB".to_string());
    }
    if let Some(gestational_age) = &pregnancy.gestational_age {
        below.push(gestational_age.clone());
    } else if let Some(age) = &person.age {
        below.push(with_age_unit(age, &person.age_unit));
    }
    if let Some(karyotype) = &pregnancy.karyotype {
        below.push(karyotype.clone());
    }
    if let Some(lmp) = &pregnancy.lmp {
        below.push(format!("LMP {lmp}"));
    }
    if let Some(edd) = &pregnancy.edd {
        below.push(format!("EDD {edd}"));
    }
    let label = pregnancy
        .label
        .clone()
        .or_else(|| is_ectopic(person).then(|| "ECT".to_string()));
    if let Some(label) = label {
        below.push(label);
    }

    if person.has(Status::Deceased) && person.age.is_some() {
        mark_deceased_age(&mut below);
    }

    if let Some(gt) = &person.genetic_testing {
        if gt.tested || gt.result.is_some() {
            let mut label = gt
                .display
                .clone()
                .or_else(|| gt.label.clone())
                .or_else(|| gt.result.clone())
                .or_else(|| gt.test_type.clone())
                .unwrap_or_default();
            if let Some(variant) = &gt.variant {
                if !label.contains(variant.as_str()) {
                    label = if label.is_empty() {
                        variant.clone()
                    } else {
                        format!("{label} ({variant})")
                    };
                }
            }
            below.extend(wrap_text(&label, wrap_chars));
        }
    }

    for dx in &person.diagnoses {
        match &dx.age_at_diagnosis {
            Some(age) => {
                let unit = dx.age_unit.as_deref().unwrap_or(&person.age_unit);
                below.push(format!("{} {}", with_age_unit(age, unit), dx.condition));
            }
            None => below.push(dx.condition.clone()),
        }
    }
    below.extend(person.medical_notes.iter().cloned());

    if let Some(note) = &pregnancy.note {
        below.extend(wrap_text(note, wrap_chars));
    }
    if let Some(name) = &person.name {
        below.extend(wrap_text(name, wrap_chars));
    }
    below
}

/// Prefixes the first age-like entry with `d.` unless it already has one.
fn mark_deceased_age(below: &mut [String]) {
    if below
        .first()
        .is_some_and(|first| first.to_ascii_lowercase().starts_with("d."))
    {
        return;
    }
    if let Some(entry) = below.iter_mut().find(|s| AGE_LIKE_RE.is_match(s)) {
        if !entry.to_ascii_lowercase().starts_with("d.") {
            *entry = format!("d. {entry}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Diagnosis, GeneticTesting, PregnancyEvent, Sex};

    #[test]
    fn wraps_by_characters() {
        assert_eq!(wrap_text("abcdef", 4), vec!["abcd", "ef"]);
        assert_eq!(wrap_text("  ", 4), Vec::<String>::new());
        assert_eq!(wrap_text("乳癌の既往あり", 3), vec!["乳癌の", "既往あ", "り"]);
        assert_eq!(wrap_text("abc", 0), vec!["abc"]);
    }

    #[test]
    fn age_unit_is_added_only_to_bare_ages() {
        assert_eq!(with_age_unit("56", "y"), "56y");
        assert_eq!(with_age_unit("3m", "y"), "3m");
        assert_eq!(with_age_unit("d. 1990", "y"), "d. 1990");
        assert_eq!(with_age_unit("LMP 2024-01-01", "y"), "LMP 2024-01-01");
    }

    #[test]
    fn deceased_age_gets_prefix() {
        let mut person = Individual::new("I-2", Sex::Female, 1).with_status(Status::Deceased);
        person.age = Some("60".to_string());
        person.diagnoses.push(Diagnosis {
            condition: "Breast cancer".to_string(),
            age_at_diagnosis: Some("55".to_string()),
            age_unit: None,
        });
        person.medical_notes.push("MI".to_string());
        let lines = annotation_lines(&person, 18);
        assert_eq!(lines, vec!["d. 60y", "55y Breast cancer", "MI"]);
    }

    #[test]
    fn pregnancy_fields_replace_age() {
        let mut person = Individual::new("P", Sex::Unknown, 3);
        person.age = Some("1".to_string());
        person.pregnancy = Some(PregnancyEvent {
            kind: Some(PregnancyKind::Ectopic),
            gestational_age: Some("8w".to_string()),
            lmp: Some("2025-01-01".to_string()),
            ..Default::default()
        });
        let lines = annotation_lines(&person, 18);
        assert_eq!(lines, vec!["8w", "LMP 2025-01-01", "ECT"]);
    }

    #[test]
    fn genetic_testing_label_with_variant() {
        let mut person = Individual::new("A", Sex::Female, 1);
        person.genetic_testing = Some(GeneticTesting {
            tested: true,
            result: Some("BRCA1 positive".to_string()),
            variant: Some("c.68_69delAG".to_string()),
            ..Default::default()
        });
        let lines = annotation_lines(&person, 18);
        assert_eq!(lines.concat(), "BRCA1 positive (c.68_69delAG)");
        assert!(lines.iter().all(|l| l.chars().count() <= 18));
    }
}
