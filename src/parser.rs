use crate::error::{ParseError, Result};
use crate::ir::{
    ChartMeta, ChildRelation, Diagnosis, Family, GeneticTesting, Individual, Partners, Pedigree,
    PregnancyEvent, PregnancyKind, RelationKind, Sex, Sibship, Status, Twin, Zygosity,
};
use crate::layout::generation::resolve_generation;
use serde::Deserialize;
use serde_json::Value;

/// JSON scalar that may arrive as a string, a number or a boolean.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Text(text) => text,
            Scalar::Number(number) => number.to_string(),
            Scalar::Flag(flag) => flag.to_string(),
        }
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Text(text) => text.trim().parse::<i64>().ok(),
            Scalar::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().map(|v| v.trunc() as i64)),
            Scalar::Flag(_) => None,
        }
    }
}

/// Trimmed text, with empty values treated as absent.
fn text(value: Option<Scalar>) -> Option<String> {
    let text = value?.into_text();
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PedigreeFile {
    meta: Option<MetaFile>,
    individuals: Option<Vec<Value>>,
    donors_surrogates: Option<Vec<Value>>,
    relationships: Option<Vec<RelationshipFile>>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct MetaFile {
    date: Option<Scalar>,
    title: Option<Scalar>,
    show_legend: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct IndividualFile {
    id: Option<String>,
    gender: Option<String>,
    generation: Option<Scalar>,
    status: Option<Vec<String>>,
    age: Option<Scalar>,
    age_at_death: Option<Scalar>,
    current_age: Option<Scalar>,
    death_year: Option<Scalar>,
    birth_year: Option<Scalar>,
    age_unit: Option<String>,
    diagnoses: Option<Vec<DiagnosisFile>>,
    medical_notes: Option<Vec<String>>,
    genetic_testing: Option<GeneticTestingFile>,
    name: Option<Scalar>,
    sex_at_birth: Option<Scalar>,
    adoption_info: Option<AdoptionInfoFile>,
    count: Option<Scalar>,
    twin: Option<TwinFile>,
    twin_info: Option<TwinInfoFile>,
    pregnancy_event: Option<PregnancyFile>,
    pregnancy_info: Option<PregnancyInfoFile>,
    pregnancy_event_type: Option<String>,
    gestational_age: Option<Scalar>,
    karyotype: Option<Scalar>,
    lmp: Option<Scalar>,
    edd: Option<Scalar>,
    note: Option<Scalar>,
    label: Option<Scalar>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DiagnosisFile {
    condition: Option<Scalar>,
    age_at_diagnosis: Option<Scalar>,
    age_unit: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct GeneticTestingFile {
    tested: Option<bool>,
    result: Option<Scalar>,
    display: Option<Scalar>,
    label: Option<Scalar>,
    test_type: Option<Scalar>,
    variant: Option<Scalar>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct AdoptionInfoFile {
    adopted: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct TwinFile {
    group: Option<Scalar>,
    zygosity: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct TwinInfoFile {
    is_twin: Option<bool>,
    twin_sibling_id: Option<Scalar>,
    twin_type: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PregnancyFile {
    #[serde(rename = "type")]
    kind: Option<String>,
    gestational_age: Option<Scalar>,
    lmp: Option<Scalar>,
    edd: Option<Scalar>,
    karyotype: Option<Scalar>,
    note: Option<Scalar>,
    label: Option<Scalar>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PregnancyInfoFile {
    pregnancy_outcome: Option<String>,
    gestational_age: Option<Scalar>,
    lmp: Option<Scalar>,
    edd: Option<Scalar>,
    karyotype: Option<Scalar>,
    note: Option<Scalar>,
    label: Option<Scalar>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RelationshipFile {
    partners: Option<Vec<String>>,
    #[serde(rename = "type")]
    kind: Option<String>,
    children: Option<Vec<ChildEntry>>,
    siblings: Option<Vec<String>>,
    adoption: Option<AdoptionFile>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChildEntry {
    Id(String),
    Detailed(ChildEntryFile),
    Other(Value),
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ChildEntryFile {
    id: Option<String>,
    relation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct AdoptionFile {
    adopted_child_id: Option<String>,
}

/// Parses the pedigree JSON document into a validated entity graph.
///
/// Strict JSON is tried first, then JSON5. Relationships that point at
/// unknown individuals are dropped rather than reported.
pub fn parse_pedigree(input: &str) -> Result<Pedigree> {
    let value: Value = match serde_json::from_str(input) {
        Ok(value) => value,
        Err(err) => json5::from_str::<Value>(input).map_err(|_| ParseError::Json(err))?,
    };
    if !value.is_object() {
        return Err(ParseError::NotAnObject);
    }
    let file: PedigreeFile = serde_json::from_value(value).map_err(ParseError::Schema)?;

    let mut pedigree = Pedigree::new();
    if let Some(meta) = file.meta {
        pedigree.meta = ChartMeta {
            date: text(meta.date),
            title: text(meta.title),
            show_legend: meta.show_legend.unwrap_or(false),
        };
    }

    // Donors and surrogates may be listed separately; they are laid out like
    // everyone else, after the main list.
    let records = file.individuals.unwrap_or_default().into_iter().chain(
        file.donors_surrogates
            .unwrap_or_default()
            .into_iter()
            .filter(Value::is_object),
    );
    for (index, record) in records.enumerate() {
        let record: IndividualFile =
            serde_json::from_value(record).map_err(ParseError::Schema)?;
        let individual = build_individual(index, record)?;
        let id = individual.id.clone();
        if !pedigree.add_individual(individual) {
            return Err(ParseError::DuplicateId { id });
        }
    }

    let relationships = file.relationships.unwrap_or_default();
    for rel in &relationships {
        if let Some(family) = build_family(&mut pedigree, rel) {
            pedigree.families.push(family);
        }
    }
    for rel in &relationships {
        let is_sibship = rel
            .kind
            .as_deref()
            .is_some_and(|kind| kind.trim().eq_ignore_ascii_case("siblings"));
        if !is_sibship {
            continue;
        }
        let siblings: Vec<String> = rel
            .siblings
            .iter()
            .flatten()
            .filter(|id| pedigree.contains(id))
            .cloned()
            .collect();
        if siblings.len() >= 2 {
            pedigree.sibships.push(Sibship { siblings });
        } else {
            tracing::debug!(count = siblings.len(), "dropping sibship with fewer than two members");
        }
    }

    tracing::debug!(
        individuals = pedigree.len(),
        families = pedigree.families.len(),
        sibships = pedigree.sibships.len(),
        "parsed pedigree"
    );
    Ok(pedigree)
}

fn build_individual(index: usize, record: IndividualFile) -> Result<Individual> {
    let id = record
        .id
        .filter(|id| !id.is_empty())
        .ok_or(ParseError::MissingId { index })?;
    let explicit_generation = record.generation.as_ref().and_then(Scalar::as_i64);
    let generation = resolve_generation(explicit_generation, &id);
    let sex = Sex::from_code(record.gender.as_deref().unwrap_or("U"));
    let mut person = Individual::new(id, sex, generation);

    for tag in record.status.unwrap_or_default() {
        match Status::from_tag(&tag) {
            Some(status) => {
                person.status.insert(status);
            }
            None => tracing::debug!(id = %person.id, tag = %tag, "ignoring unknown status tag"),
        }
    }

    person.age = text(record.age)
        .or_else(|| text(record.age_at_death))
        .or_else(|| text(record.current_age))
        .or_else(|| text(record.death_year).map(|year| format!("d. {year}")))
        .or_else(|| text(record.birth_year).map(|year| format!("b. {year}")));
    if let Some(unit) = record.age_unit.map(|u| u.trim().to_string()) {
        if !unit.is_empty() {
            person.age_unit = unit;
        }
    }

    person.diagnoses = record
        .diagnoses
        .unwrap_or_default()
        .into_iter()
        .filter_map(|dx| {
            Some(Diagnosis {
                condition: text(dx.condition)?,
                age_at_diagnosis: text(dx.age_at_diagnosis),
                age_unit: dx.age_unit.filter(|u| !u.trim().is_empty()),
            })
        })
        .collect();
    person.medical_notes = record
        .medical_notes
        .unwrap_or_default()
        .into_iter()
        .map(|note| note.trim().to_string())
        .filter(|note| !note.is_empty())
        .collect();
    person.genetic_testing = record.genetic_testing.map(|gt| GeneticTesting {
        tested: gt.tested.unwrap_or(false),
        result: text(gt.result),
        display: text(gt.display),
        label: text(gt.label),
        test_type: text(gt.test_type),
        variant: text(gt.variant),
    });
    person.name = text(record.name);
    person.sex_at_birth = text(record.sex_at_birth);
    person.count = text(record.count);

    person.adoption_bracket = record
        .adoption_info
        .and_then(|info| info.adopted)
        .unwrap_or(false)
        || person.has(Status::Adopted);

    if let Some(twin) = record.twin {
        if let Some(group) = text(twin.group) {
            person.twin = Some(Twin {
                group,
                zygosity: Zygosity::from_token(twin.zygosity.as_deref().unwrap_or("")),
            });
        }
    }
    if let Some(info) = record.twin_info {
        let sibling = text(info.twin_sibling_id);
        if let (Some(true), Some(sibling)) = (info.is_twin, sibling) {
            let (a, b) = if person.id <= sibling {
                (person.id.as_str(), sibling.as_str())
            } else {
                (sibling.as_str(), person.id.as_str())
            };
            let twin_type = info.twin_type.unwrap_or_default().to_ascii_lowercase();
            let zygosity = if twin_type.contains("mono") {
                Zygosity::Monozygotic
            } else if twin_type.contains("di") {
                Zygosity::Dizygotic
            } else {
                Zygosity::Unknown
            };
            person.twin = Some(Twin {
                group: format!("T_{a}_{b}"),
                zygosity,
            });
        }
    }

    // `pregnancy_info` applies only without an event; flat fields replace an event.
    let event = pregnancy_from_event(record.pregnancy_event);
    let info = if event.is_none() {
        pregnancy_from_info(record.pregnancy_info)
    } else {
        None
    };
    let has_flat = record.pregnancy_event_type.is_some()
        || record.gestational_age.is_some()
        || record.karyotype.is_some()
        || record.lmp.is_some()
        || record.edd.is_some();
    let flat = has_flat.then(|| PregnancyEvent {
        kind: record
            .pregnancy_event_type
            .as_deref()
            .and_then(PregnancyKind::from_token),
        gestational_age: text(record.gestational_age),
        lmp: text(record.lmp),
        edd: text(record.edd),
        karyotype: text(record.karyotype),
        note: text(record.note),
        label: text(record.label),
    });
    person.pregnancy = info.or(flat).or(event);

    Ok(person)
}

fn pregnancy_from_event(event: Option<PregnancyFile>) -> Option<PregnancyEvent> {
    let event = event?;
    let parsed = PregnancyEvent {
        kind: event.kind.as_deref().and_then(PregnancyKind::from_token),
        gestational_age: text(event.gestational_age),
        lmp: text(event.lmp),
        edd: text(event.edd),
        karyotype: text(event.karyotype),
        note: text(event.note),
        label: text(event.label),
    };
    (parsed != PregnancyEvent::default()).then_some(parsed)
}

fn pregnancy_from_info(info: Option<PregnancyInfoFile>) -> Option<PregnancyEvent> {
    let info = info?;
    let outcome = info
        .pregnancy_outcome
        .as_deref()
        .map(|o| o.trim().to_ascii_lowercase());
    let parsed = PregnancyEvent {
        kind: match outcome.as_deref() {
            Some("miscarriage") => Some(PregnancyKind::Sab),
            Some("abortion") => Some(PregnancyKind::Top),
            Some("ectopic") => Some(PregnancyKind::Ectopic),
            _ => None,
        },
        gestational_age: text(info.gestational_age),
        lmp: text(info.lmp),
        edd: text(info.edd),
        karyotype: text(info.karyotype),
        note: text(info.note),
        label: text(info.label),
    };
    (outcome.is_some() || parsed != PregnancyEvent::default()).then_some(parsed)
}

fn build_family(pedigree: &mut Pedigree, rel: &RelationshipFile) -> Option<Family> {
    let partners = rel.partners.as_deref().unwrap_or_default();
    let partners = match partners {
        [] => return None,
        [parent] => {
            if !pedigree.contains(parent) {
                tracing::debug!(parent = %parent, "dropping family with unknown parent");
                return None;
            }
            Partners::SingleParent {
                parent: parent.clone(),
            }
        }
        [a, b, ..] => {
            if !pedigree.contains(a) || !pedigree.contains(b) {
                tracing::debug!(a = %a, b = %b, "dropping family with unknown partner");
                return None;
            }
            if a == b {
                tracing::debug!(partner = %a, "dropping self-partnership");
                return None;
            }
            Partners::Couple {
                a: a.clone(),
                b: b.clone(),
                kind: RelationKind::from_token(rel.kind.as_deref().unwrap_or("spouse")),
            }
        }
    };

    let mut family = Family::new(partners, Vec::new());

    if let Some(adopted) = rel
        .adoption
        .as_ref()
        .and_then(|a| a.adopted_child_id.as_deref())
    {
        if let Some(child) = pedigree.get_mut(adopted) {
            child.adoption_bracket = true;
            family
                .child_relations
                .insert(adopted.to_string(), ChildRelation::AdoptedIn);
        }
    }

    for entry in rel.children.iter().flatten() {
        let (id, relation) = match entry {
            ChildEntry::Id(id) => (id.as_str(), None),
            ChildEntry::Detailed(detail) => match detail.id.as_deref() {
                Some(id) => (id, Some(detail.relation.as_deref().unwrap_or(""))),
                None => continue,
            },
            ChildEntry::Other(_) => continue,
        };
        let Some(child) = pedigree.get_mut(id) else {
            tracing::debug!(child = %id, "dropping unknown child");
            continue;
        };
        family.children.push(id.to_string());
        // A detailed entry replaces whatever was recorded for this child.
        if let Some(relation) = relation {
            match ChildRelation::from_token(relation) {
                Some(relation) => {
                    child.adoption_bracket = true;
                    family.child_relations.insert(id.to_string(), relation);
                }
                None => {
                    family.child_relations.remove(id);
                }
            }
        }
    }

    Some(family)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_chart() {
        let input = r#"{
            "individuals": [
                {"id": "I-1", "gender": "M"},
                {"id": "I-2", "gender": "f", "status": ["affected", "deceased"], "age_at_death": 60},
                {"id": "II-1"}
            ],
            "relationships": [
                {"partners": ["I-1", "I-2"], "type": "consanguineous", "children": ["II-1"]}
            ]
        }"#;
        let pedigree = parse_pedigree(input).unwrap();
        assert_eq!(pedigree.len(), 3);
        let mother = pedigree.get("I-2").unwrap();
        assert_eq!(mother.sex, Sex::Female);
        assert!(mother.has(Status::Affected));
        assert_eq!(mother.age.as_deref(), Some("60"));
        assert_eq!(pedigree.get("II-1").unwrap().generation, 2);
        assert_eq!(pedigree.get("II-1").unwrap().sex, Sex::Unknown);
        assert_eq!(
            pedigree.families[0].partners,
            Partners::Couple {
                a: "I-1".to_string(),
                b: "I-2".to_string(),
                kind: RelationKind::Consanguineous,
            }
        );
    }

    #[test]
    fn dangling_references_are_dropped() {
        let input = r#"{
            "individuals": [{"id": "A"}, {"id": "B"}],
            "relationships": [
                {"partners": ["A", "ghost"], "children": ["B"]},
                {"partners": ["A"], "children": ["ghost", "B"]},
                {"type": "siblings", "siblings": ["A", "ghost"]}
            ]
        }"#;
        let pedigree = parse_pedigree(input).unwrap();
        assert_eq!(pedigree.families.len(), 1);
        assert_eq!(pedigree.families[0].children, vec!["B".to_string()]);
        assert!(pedigree.sibships.is_empty());
    }

    #[test]
    fn sibships_and_adoption_are_recorded() {
        let input = r#"{
            "individuals": [{"id": "I-1"}, {"id": "I-2"}, {"id": "II-1"}, {"id": "II-2"}],
            "relationships": [
                {"type": "siblings", "siblings": ["I-1", "I-2"]},
                {"partners": ["I-1"], "children": [{"id": "II-1", "relation": "foster"}, "II-2"]}
            ]
        }"#;
        let pedigree = parse_pedigree(input).unwrap();
        assert_eq!(pedigree.sibships.len(), 1);
        assert_eq!(pedigree.families.len(), 1);
        assert!(pedigree.families[0].is_adoptive("II-1"));
        assert!(!pedigree.families[0].is_adoptive("II-2"));
        assert!(pedigree.get("II-1").unwrap().adoption_bracket);
    }

    #[test]
    fn age_fallbacks() {
        let input = r#"{"individuals": [
            {"id": "A", "current_age": "48"},
            {"id": "B", "death_year": 1990},
            {"id": "C", "birth_year": "2001"}
        ]}"#;
        let pedigree = parse_pedigree(input).unwrap();
        assert_eq!(pedigree.get("A").unwrap().age.as_deref(), Some("48"));
        assert_eq!(pedigree.get("B").unwrap().age.as_deref(), Some("d. 1990"));
        assert_eq!(pedigree.get("C").unwrap().age.as_deref(), Some("b. 2001"));
    }

    #[test]
    fn twin_info_builds_shared_group() {
        let input = r#"{"individuals": [
            {"id": "II-2", "twin_info": {"is_twin": true, "twin_sibling_id": "II-1", "twin_type": "monozygotic"}},
            {"id": "II-1", "twin": {"group": "T1", "zygosity": "DZ"}}
        ]}"#;
        let pedigree = parse_pedigree(input).unwrap();
        let twin = pedigree.get("II-2").unwrap().twin.clone().unwrap();
        assert_eq!(twin.group, "T_II-1_II-2");
        assert_eq!(twin.zygosity, Zygosity::Monozygotic);
        let other = pedigree.get("II-1").unwrap().twin.clone().unwrap();
        assert_eq!(other.zygosity, Zygosity::Dizygotic);
    }

    #[test]
    fn pregnancy_info_maps_outcomes() {
        let input = r#"{"individuals": [
            {"id": "A", "pregnancy_info": {"pregnancy_outcome": "Ectopic", "gestational_age": "8w"}},
            {"id": "B", "gestational_age": "20w", "pregnancy_event_type": "top"}
        ]}"#;
        let pedigree = parse_pedigree(input).unwrap();
        let a = pedigree.get("A").unwrap().pregnancy.clone().unwrap();
        assert_eq!(a.kind, Some(PregnancyKind::Ectopic));
        assert_eq!(a.gestational_age.as_deref(), Some("8w"));
        let b = pedigree.get("B").unwrap().pregnancy.clone().unwrap();
        assert_eq!(b.kind, Some(PregnancyKind::Top));
    }

    #[test]
    fn flat_pregnancy_fields_override_event() {
        let input = r#"{"individuals": [
            {"id": "A", "pregnancy_event": {"type": "SAB", "gestational_age": "10w"}, "lmp": "2025-02-01"},
            {"id": "B", "pregnancy_event": {"type": "ECT"}, "pregnancy_info": {"pregnancy_outcome": "abortion"}},
            {"id": "C", "pregnancy_info": {"pregnancy_outcome": "miscarriage"}, "gestational_age": "6w"}
        ]}"#;
        let pedigree = parse_pedigree(input).unwrap();
        let a = pedigree.get("A").unwrap().pregnancy.clone().unwrap();
        assert_eq!(a.kind, None);
        assert_eq!(a.gestational_age, None);
        assert_eq!(a.lmp.as_deref(), Some("2025-02-01"));
        let b = pedigree.get("B").unwrap().pregnancy.clone().unwrap();
        assert_eq!(b.kind, Some(PregnancyKind::Ectopic));
        let c = pedigree.get("C").unwrap().pregnancy.clone().unwrap();
        assert_eq!(c.kind, Some(PregnancyKind::Sab));
        assert_eq!(c.gestational_age, None);
    }

    #[test]
    fn donors_follow_main_list() {
        let input = r#"{
            "individuals": [{"id": "A"}],
            "donors_surrogates": [{"id": "D", "status": ["donor"]}, "junk"]
        }"#;
        let pedigree = parse_pedigree(input).unwrap();
        assert_eq!(pedigree.input_order("D"), Some(1));
        assert!(pedigree.get("D").unwrap().has(Status::Donor));
    }

    #[test]
    fn accepts_json5() {
        let input = "{individuals: [{id: 'I-1', gender: 'M',},], /* trailing */}";
        let pedigree = parse_pedigree(input).unwrap();
        assert_eq!(pedigree.len(), 1);
    }

    #[test]
    fn rejects_missing_and_duplicate_ids() {
        let missing = parse_pedigree(r#"{"individuals": [{"gender": "M"}]}"#);
        assert!(matches!(missing, Err(ParseError::MissingId { index: 0 })));
        let duplicate = parse_pedigree(r#"{"individuals": [{"id": "A"}, {"id": "A"}]}"#);
        assert!(matches!(duplicate, Err(ParseError::DuplicateId { .. })));
        assert!(matches!(parse_pedigree("[1, 2]"), Err(ParseError::NotAnObject)));
        assert!(matches!(parse_pedigree("{nope"), Err(ParseError::Json(_))));
    }

    #[test]
    fn empty_document_is_an_empty_chart() {
        let pedigree = parse_pedigree("{}").unwrap();
        assert!(pedigree.is_empty());
    }
}
